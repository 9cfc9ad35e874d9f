//! Calendar event schedules.

use crate::model::event::CalendarEvent;
use crate::view::{compare_titles, SortOrder};
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSortKey {
    Date,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventSort {
    pub key: EventSortKey,
    pub order: SortOrder,
}

impl Default for EventSort {
    fn default() -> Self {
        Self {
            key: EventSortKey::Date,
            order: SortOrder::Asc,
        }
    }
}

/// Events starting on `today`.
pub fn todays_events(events: &[CalendarEvent], today: NaiveDate) -> Vec<&CalendarEvent> {
    events
        .iter()
        .filter(|event| event.start.date() == today)
        .collect()
}

/// Events starting at or after the start of `today`, soonest first.
pub fn upcoming_events(events: &[CalendarEvent], today: NaiveDate) -> Vec<&CalendarEvent> {
    sort_events(events, today, EventSort::default())
}

/// Upcoming events (see `upcoming_events`) ordered by `sort`.
pub fn sort_events(events: &[CalendarEvent], today: NaiveDate, sort: EventSort) -> Vec<&CalendarEvent> {
    let mut upcoming: Vec<&CalendarEvent> = events
        .iter()
        .filter(|event| event.start.date() >= today)
        .collect();
    upcoming.sort_by(|left, right| {
        let ordering = match sort.key {
            EventSortKey::Date => left.start.cmp(&right.start),
            EventSortKey::Title => compare_titles(&left.title, &right.title),
        };
        sort.order.apply(ordering)
    });
    upcoming
}

#[cfg(test)]
mod tests {
    use super::{sort_events, todays_events, upcoming_events, EventSort, EventSortKey};
    use crate::model::event::NewEvent;
    use crate::view::SortOrder;
    use chrono::{NaiveDate, NaiveDateTime};
    use uuid::Uuid;

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 6, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn upcoming_includes_earlier_today_and_sorts_ascending() {
        let events = vec![
            NewEvent::starting_at("later", at(12, 9)).into_event(Uuid::new_v4()),
            NewEvent::starting_at("past", at(9, 23)).into_event(Uuid::new_v4()),
            NewEvent::starting_at("this morning", at(10, 1)).into_event(Uuid::new_v4()),
        ];
        let today = at(10, 0).date();
        let titles: Vec<_> = upcoming_events(&events, today)
            .into_iter()
            .map(|event| event.title.as_str())
            .collect();
        assert_eq!(titles, vec!["this morning", "later"]);
        assert_eq!(todays_events(&events, today).len(), 1);
    }

    #[test]
    fn title_sort_descending() {
        let events = vec![
            NewEvent::starting_at("alpha", at(11, 9)).into_event(Uuid::new_v4()),
            NewEvent::starting_at("Beta", at(12, 9)).into_event(Uuid::new_v4()),
        ];
        let sort = EventSort {
            key: EventSortKey::Title,
            order: SortOrder::Desc,
        };
        let titles: Vec<_> = sort_events(&events, at(10, 0).date(), sort)
            .into_iter()
            .map(|event| event.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Beta", "alpha"]);
    }
}
