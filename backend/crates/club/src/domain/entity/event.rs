//! Event Entity

use chrono::{DateTime, Utc};

use crate::domain::value_object::{EventId, slug::Slug};

/// Default team size when none is given
pub const DEFAULT_TEAM_SIZE: i32 = 3;

/// Club event
#[derive(Debug, Clone)]
pub struct Event {
    pub event_id: EventId,
    /// Unique display name
    pub name: String,
    /// Unique, derived from name
    pub slug: Slug,
    pub description: String,
    pub rules: String,
    pub team_size: i32,
    pub venue: String,
    pub date_of_event: DateTime<Utc>,
    /// Public URLs of uploaded images
    pub photos: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields of a new event
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub name: String,
    pub description: String,
    pub rules: String,
    pub team_size: i32,
    pub venue: String,
    pub date_of_event: DateTime<Utc>,
}

impl Event {
    pub fn new(fields: NewEvent, slug: Slug, photos: Vec<String>) -> Self {
        let now = Utc::now();

        Self {
            event_id: EventId::new(),
            name: fields.name,
            slug,
            description: fields.description,
            rules: fields.rules,
            team_size: fields.team_size,
            venue: fields.venue,
            date_of_event: fields.date_of_event,
            photos,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Event search filter
#[derive(Debug, Clone, Default)]
pub struct EventSearch {
    /// Case-insensitive substring of name, description or slug
    pub text: Option<String>,
    /// `date_of_event >= start`
    pub start: Option<DateTime<Utc>>,
    /// `date_of_event <= end`
    pub end: Option<DateTime<Utc>>,
}

impl EventSearch {
    pub fn matches(&self, event: &Event) -> bool {
        let text_ok = self.text.as_deref().is_none_or(|needle| {
            let needle = needle.to_lowercase();
            event.name.to_lowercase().contains(&needle)
                || event.description.to_lowercase().contains(&needle)
                || event.slug.as_str().contains(&needle)
        });

        text_ok
            && self.start.is_none_or(|start| event.date_of_event >= start)
            && self.end.is_none_or(|end| event.date_of_event <= end)
    }
}
