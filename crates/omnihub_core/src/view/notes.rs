//! Note list orderings.

use crate::model::note::Note;
use crate::view::compare_titles;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListSort {
    #[default]
    DateDesc,
    DateAsc,
    TitleAsc,
}

pub fn sort_notes(notes: &[Note], sort: ListSort) -> Vec<&Note> {
    let mut sorted: Vec<&Note> = notes.iter().collect();
    match sort {
        ListSort::DateDesc => sorted.sort_by(|left, right| right.created_at.cmp(&left.created_at)),
        ListSort::DateAsc => sorted.sort_by_key(|note| note.created_at),
        ListSort::TitleAsc => sorted.sort_by(|left, right| compare_titles(&left.title, &right.title)),
    }
    sorted
}

/// The `count` most recently added notes (store order is newest first).
pub fn recent_notes(notes: &[Note], count: usize) -> Vec<&Note> {
    notes.iter().take(count).collect()
}
