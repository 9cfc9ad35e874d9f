//! Derived views computed from raw collections at read time.
//!
//! # Responsibility
//! - Aggregate spending, task progress and upcoming schedules.
//! - Provide the sort/filter subsets shown by list screens.
//!
//! # Invariants
//! - Every function is pure: no caching, no I/O, no clock reads.
//! - "Today" is always supplied by the caller.

pub mod dashboard;
pub mod events;
pub mod finance;
pub mod notes;
pub mod tasks;

/// Direction for list sorting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Flips the order; used when the active sort key is selected again.
    pub fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub(crate) fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// Case-insensitive title comparison with a byte-order tie-break.
pub(crate) fn compare_titles(left: &str, right: &str) -> std::cmp::Ordering {
    left.to_lowercase()
        .cmp(&right.to_lowercase())
        .then_with(|| left.cmp(right))
}
