//! Prompting on top of a `LanguageModel`.

use crate::interpret::schema::{breakdown_schema, smart_entry_schema, BreakdownResponse, SmartEntry};
use crate::interpret::{GenerateRequest, InterpretError, InterpretResult, LanguageModel};
use chrono::NaiveDateTime;
use log::info;

pub const DEFAULT_SMART_INPUT_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_BREAKDOWN_MODEL: &str = "gemini-3-flash-preview";
/// Upper bound on subtasks accepted from one breakdown answer.
pub const MAX_BREAKDOWN_ITEMS: usize = 5;

/// Builds prompts, calls the model, and decodes typed answers.
pub struct Interpreter<M: LanguageModel> {
    model: M,
    smart_input_model: String,
    breakdown_model: String,
}

impl<M: LanguageModel> Interpreter<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            smart_input_model: DEFAULT_SMART_INPUT_MODEL.to_string(),
            breakdown_model: DEFAULT_BREAKDOWN_MODEL.to_string(),
        }
    }

    pub fn with_models(
        mut self,
        smart_input_model: impl Into<String>,
        breakdown_model: impl Into<String>,
    ) -> Self {
        self.smart_input_model = smart_input_model.into();
        self.breakdown_model = breakdown_model.into();
        self
    }

    /// Classifies free text into one typed entry.
    ///
    /// `now` is stated in the prompt so relative dates resolve correctly.
    pub fn interpret(&self, text: &str, now: NaiveDateTime) -> InterpretResult<SmartEntry> {
        let text = text.trim();
        if text.is_empty() {
            return Err(InterpretError::EmptyInput);
        }

        let request = GenerateRequest {
            model: self.smart_input_model.clone(),
            prompt: smart_input_prompt(text, now),
            response_schema: smart_entry_schema(),
        };
        let value = self.model.generate_json(&request)?;
        let entry: SmartEntry =
            serde_json::from_value(value).map_err(|err| InterpretError::Decode(err.to_string()))?;
        info!(
            "event=smart_input module=interpret status=ok kind={:?}",
            entry.kind
        );
        Ok(entry)
    }

    /// Asks for 3 to 5 actionable subtasks for `title`.
    ///
    /// Blank items are dropped and the list is capped.
    pub fn breakdown(&self, title: &str) -> InterpretResult<Vec<String>> {
        let title = title.trim();
        if title.is_empty() {
            return Err(InterpretError::EmptyInput);
        }

        let request = GenerateRequest {
            model: self.breakdown_model.clone(),
            prompt: breakdown_prompt(title),
            response_schema: breakdown_schema(),
        };
        let value = self.model.generate_json(&request)?;
        let response: BreakdownResponse =
            serde_json::from_value(value).map_err(|err| InterpretError::Decode(err.to_string()))?;

        let subtasks: Vec<String> = response
            .subtasks
            .into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .take(MAX_BREAKDOWN_ITEMS)
            .collect();
        info!(
            "event=task_breakdown module=interpret status=ok items={}",
            subtasks.len()
        );
        Ok(subtasks)
    }
}

fn smart_input_prompt(text: &str, now: NaiveDateTime) -> String {
    format!(
        "Analyze: \"{text}\". Today is {}. Output JSON with type (task/event/note/finance). \
         Use YYYY-MM-DD for date and HH:MM (24h) for startTime.",
        now.format("%Y-%m-%dT%H:%M:%S")
    )
}

fn breakdown_prompt(title: &str) -> String {
    format!(
        "Break down the following task or event into 3 to 5 logical, actionable sub-tasks: \"{title}\""
    )
}

#[cfg(test)]
mod tests {
    use super::{Interpreter, DEFAULT_BREAKDOWN_MODEL, DEFAULT_SMART_INPUT_MODEL};
    use crate::interpret::{
        GenerateRequest, InterpretError, InterpretResult, LanguageModel, SmartEntryKind,
    };
    use chrono::NaiveDate;
    use serde_json::{json, Value};
    use std::cell::RefCell;

    struct Canned {
        answer: Value,
        seen: RefCell<Vec<GenerateRequest>>,
    }

    impl LanguageModel for Canned {
        fn generate_json(&self, request: &GenerateRequest) -> InterpretResult<Value> {
            self.seen.borrow_mut().push(request.clone());
            Ok(self.answer.clone())
        }
    }

    fn canned(answer: Value) -> Canned {
        Canned {
            answer,
            seen: RefCell::new(Vec::new()),
        }
    }

    #[test]
    fn interpret_states_today_and_uses_smart_model() {
        let model = canned(json!({ "type": "note", "title": "idea" }));
        let interpreter = Interpreter::new(&model);
        let now = NaiveDate::from_ymd_opt(2026, 10, 17)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();

        let entry = interpreter.interpret("  jot down idea ", now).unwrap();
        assert_eq!(entry.kind, Some(SmartEntryKind::Note));

        let seen = model.seen.borrow();
        assert_eq!(seen[0].model, DEFAULT_SMART_INPUT_MODEL);
        assert!(seen[0].prompt.contains("2026-10-17T08:00:00"));
        assert!(seen[0].prompt.contains("\"jot down idea\""));
    }

    #[test]
    fn breakdown_cleans_and_caps_items() {
        let model = canned(json!({ "subtasks": ["a", " ", "b", "c", "d", "e", "f"] }));
        let interpreter = Interpreter::new(&model);

        let items = interpreter.breakdown("plan trip").unwrap();
        assert_eq!(items, vec!["a", "b", "c", "d", "e"]);
        assert_eq!(model.seen.borrow()[0].model, DEFAULT_BREAKDOWN_MODEL);
    }

    #[test]
    fn blank_input_never_reaches_the_model() {
        let model = canned(json!({}));
        let interpreter = Interpreter::new(&model);
        let now = NaiveDate::from_ymd_opt(2026, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        assert!(matches!(
            interpreter.interpret("   ", now),
            Err(InterpretError::EmptyInput)
        ));
        assert!(matches!(
            interpreter.breakdown(""),
            Err(InterpretError::EmptyInput)
        ));
        assert!(model.seen.borrow().is_empty());
    }

    #[test]
    fn wrong_shape_is_a_decode_error() {
        let model = canned(json!({ "subtasks": "not a list" }));
        let interpreter = Interpreter::new(&model);
        assert!(matches!(
            interpreter.breakdown("x"),
            Err(InterpretError::Decode(_))
        ));
    }

    #[test]
    fn custom_models_are_used() {
        let model = canned(json!({ "subtasks": [] }));
        let interpreter = Interpreter::new(&model).with_models("smart", "fast");
        interpreter.breakdown("x").unwrap();
        assert_eq!(model.seen.borrow()[0].model, "fast");
    }
}
