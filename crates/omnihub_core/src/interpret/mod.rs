//! Natural-language entry interpretation.
//!
//! # Responsibility
//! - Turn free-form text into one typed record draft via a
//!   schema-constrained language-model call.
//! - Ask the model to break a task title into subtasks.
//!
//! # Invariants
//! - Model output is always decoded into typed structs before use; raw JSON
//!   never reaches the store.
//! - No retries: one request per call, failures are returned to the caller.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod gemini;
pub mod interpreter;
pub mod schema;

pub use gemini::GeminiClient;
pub use interpreter::Interpreter;
pub use schema::{SmartEntry, SmartEntryKind};

pub type InterpretResult<T> = Result<T, InterpretError>;

/// One structured-output request to a language model.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    /// Model name, e.g. `gemini-3-flash-preview`.
    pub model: String,
    /// User prompt text.
    pub prompt: String,
    /// Response schema in the provider's schema dialect.
    pub response_schema: serde_json::Value,
}

/// Language model able to answer with schema-constrained JSON.
pub trait LanguageModel {
    fn generate_json(&self, request: &GenerateRequest) -> InterpretResult<serde_json::Value>;
}

impl<M: LanguageModel + ?Sized> LanguageModel for &M {
    fn generate_json(&self, request: &GenerateRequest) -> InterpretResult<serde_json::Value> {
        (**self).generate_json(request)
    }
}

impl<M: LanguageModel + ?Sized> LanguageModel for Box<M> {
    fn generate_json(&self, request: &GenerateRequest) -> InterpretResult<serde_json::Value> {
        (**self).generate_json(request)
    }
}

#[derive(Debug)]
pub enum InterpretError {
    /// Client is not usable (missing API key, bad base URL).
    Config(String),
    /// Request could not be sent or the body could not be read.
    Transport(reqwest::Error),
    /// Provider answered with a non-success status.
    Status { code: u16, body: String },
    /// Provider answered without any text candidate.
    EmptyResponse,
    /// Candidate text is not the JSON shape requested.
    Decode(String),
    /// A field required for the chosen record kind is absent.
    MissingField(&'static str),
    /// A field is present but unusable.
    InvalidField { field: &'static str, value: String },
    /// Input text is blank; nothing to interpret.
    EmptyInput,
}

impl Display for InterpretError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(message) => write!(f, "language model not configured: {message}"),
            Self::Transport(err) => write!(f, "language model request failed: {err}"),
            Self::Status { code, body } => write!(f, "language model returned {code}: {body}"),
            Self::EmptyResponse => write!(f, "language model returned no content"),
            Self::Decode(message) => write!(f, "unexpected language model output: {message}"),
            Self::MissingField(field) => write!(f, "interpreted entry is missing `{field}`"),
            Self::InvalidField { field, value } => {
                write!(f, "interpreted entry has invalid `{field}`: `{value}`")
            }
            Self::EmptyInput => write!(f, "nothing to interpret"),
        }
    }
}

impl Error for InterpretError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for InterpretError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value)
    }
}
