//! Event Use Cases
//!
//! Create (admin, with images), list, get by slug, search, delete.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use kernel::pagination::{PageRequest, Paged};
use platform::media::{MediaStore, MediaUpload};

use crate::application::aggregator::{Engaged, EngagementAggregator};
use crate::application::config::ClubConfig;
use crate::application::integrity::{Deleted, IntegrityCoordinator};
use crate::application::uploads;
use crate::domain::entity::{Event, EventSearch, NewEvent, event::DEFAULT_TEAM_SIZE};
use crate::domain::repository::ClubStore;
use crate::domain::value_object::{EventId, UserId, slug::Slug, text};
use crate::error::{ClubError, ClubResult};

/// Raw event form fields
#[derive(Debug, Clone, Default)]
pub struct CreateEventInput {
    pub name: String,
    pub description: String,
    pub rules: String,
    pub team_size: Option<String>,
    pub venue: String,
    pub date_of_event: String,
}

/// Raw search parameters
#[derive(Debug, Clone, Default)]
pub struct SearchEventsInput {
    pub text: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

pub struct EventService<S, M>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    store: Arc<S>,
    media: Arc<M>,
    config: Arc<ClubConfig>,
    aggregator: EngagementAggregator<S>,
    integrity: IntegrityCoordinator<S, M>,
}

impl<S, M> EventService<S, M>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>, media: Arc<M>, config: Arc<ClubConfig>) -> Self {
        Self {
            aggregator: EngagementAggregator::new(store.clone()),
            integrity: IntegrityCoordinator::new(store.clone(), media.clone()),
            store,
            media,
            config,
        }
    }

    /// Create an event from form fields and `image` files
    ///
    /// ## Errors
    /// - `Validation` - broken field rules, no image, too many images, bad file
    /// - `Conflict` - name already used
    pub async fn create(&self, input: CreateEventInput, images: Vec<MediaUpload>) -> ClubResult<Event> {
        let fields = self.validate(&input, &images)?;

        if self.store.event_name_exists(&fields.name).await? {
            return Err(ClubError::Conflict("Event name already exists".to_string()));
        }

        let assets = uploads::upload_all(self.media.as_ref(), images).await?;
        let urls = assets.iter().map(|a| a.url.clone()).collect();

        match self.insert_with_unique_slug(fields, urls).await {
            Ok(event) => {
                tracing::info!(event_id = %event.event_id, slug = %event.slug, "Event created");
                Ok(event)
            }
            Err(e) => {
                uploads::discard(self.media.as_ref(), &assets).await;
                Err(e)
            }
        }
    }

    /// Newest first; paging optional
    pub async fn list(
        &self,
        page: Option<PageRequest>,
        viewer: Option<&UserId>,
    ) -> ClubResult<Paged<Engaged<Event>>> {
        let (events, total) = self.store.list_events(page).await?;
        self.aggregator
            .page(Paged::new(events, total, page), viewer)
            .await
    }

    pub async fn get_by_slug(&self, slug: &str, viewer: Option<&UserId>) -> ClubResult<Engaged<Event>> {
        let event = self
            .store
            .find_event_by_slug(slug.trim())
            .await?
            .ok_or(ClubError::EventNotFound)?;

        self.aggregator.one(event, viewer).await
    }

    /// Text and date range search; always paged
    pub async fn search(
        &self,
        input: SearchEventsInput,
        page: PageRequest,
        viewer: Option<&UserId>,
    ) -> ClubResult<Paged<Engaged<Event>>> {
        let filter = parse_search(input)?;
        let (events, total) = self.store.search_events(&filter, page).await?;
        self.aggregator
            .page(Paged::new(events, total, Some(page)), viewer)
            .await
    }

    pub async fn delete(&self, event_id: &EventId) -> ClubResult<Deleted<Event>> {
        self.integrity.delete_event(event_id).await
    }

    fn validate(&self, input: &CreateEventInput, images: &[MediaUpload]) -> ClubResult<NewEvent> {
        let mut errors = Vec::new();

        let name = text::EVENT_NAME.collect(&input.name, &mut errors);
        let description = text::EVENT_DESCRIPTION.collect(&input.description, &mut errors);
        let rules = text::EVENT_RULES.collect(&input.rules, &mut errors);
        let venue = text::EVENT_VENUE.collect(&input.venue, &mut errors);

        let team_size = match input.team_size.as_deref().map(str::trim) {
            None | Some("") => Some(DEFAULT_TEAM_SIZE),
            Some(raw) => match raw.parse::<i32>() {
                Ok(n) if n >= 1 => Some(n),
                _ => {
                    errors.push("Team size must be a positive integer".to_string());
                    None
                }
            },
        };

        let date_of_event = match parse_date(&input.date_of_event, false) {
            Ok(date) => Some(date),
            Err(e) => {
                errors.push(e);
                None
            }
        };

        if images.is_empty() {
            errors.push("At least one image is required".to_string());
        } else if images.len() > self.config.event_max_images {
            errors.push(format!(
                "At most {} images are allowed",
                self.config.event_max_images
            ));
        }
        for file in images {
            if let Err(e) = self.config.check_image(file) {
                errors.push(e);
            }
        }

        match (name, description, rules, venue, team_size, date_of_event) {
            (
                Some(name),
                Some(description),
                Some(rules),
                Some(venue),
                Some(team_size),
                Some(date_of_event),
            ) if errors.is_empty() => Ok(NewEvent {
                name,
                description,
                rules,
                team_size,
                venue,
                date_of_event,
            }),
            _ => Err(ClubError::Validation(errors)),
        }
    }

    /// Insert with the base slug, then `{slug}-{millis}-{counter}` until free
    async fn insert_with_unique_slug(&self, fields: NewEvent, photos: Vec<String>) -> ClubResult<Event> {
        let base = Slug::from_name(&fields.name);
        let mut slug = base.clone();
        let mut counter: u32 = 0;

        loop {
            if !self.store.event_slug_exists(&slug).await? {
                let event = Event::new(fields.clone(), slug.clone(), photos.clone());
                match self.store.insert_event(&event).await {
                    Ok(()) => return Ok(event),
                    // 同時作成で先を越された
                    Err(ClubError::SlugTaken) => {}
                    Err(e) => return Err(e),
                }
            }
            counter = counter.wrapping_add(1);
            slug = base.with_suffix(Utc::now().timestamp_millis(), counter);
        }
    }
}

/// `YYYY-MM-DD` or RFC 3339
///
/// A bare date is the start of that day (UTC), or its last millisecond when
/// `end_of_day` is set.
pub fn parse_date(raw: &str, end_of_day: bool) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("Date is required".to_string());
    }

    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Ok(date.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date {:?}, expected YYYY-MM-DD or RFC 3339", raw))?;
    let time = if end_of_day {
        date.and_hms_milli_opt(23, 59, 59, 999)
    } else {
        date.and_hms_opt(0, 0, 0)
    };

    time.map(|t| t.and_utc())
        .ok_or_else(|| format!("Invalid date {:?}", raw))
}

fn parse_search(input: SearchEventsInput) -> ClubResult<EventSearch> {
    let mut errors = Vec::new();

    let mut bound = |raw: Option<String>, end: bool| {
        raw.filter(|s| !s.trim().is_empty())
            .and_then(|s| parse_date(&s, end).map_err(|e| errors.push(e)).ok())
    };
    let start = bound(input.start_date, false);
    let end = bound(input.end_date, true);

    if matches!((start, end), (Some(s), Some(e)) if s > e) {
        errors.push("Start date must not be after end date".to_string());
    }

    if !errors.is_empty() {
        return Err(ClubError::Validation(errors));
    }

    Ok(EventSearch {
        text: input
            .text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()),
        start,
        end,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_forms() {
        let day = parse_date("2025-03-01", false).unwrap();
        assert_eq!(day.to_rfc3339(), "2025-03-01T00:00:00+00:00");

        let end = parse_date("2025-03-01", true).unwrap();
        assert!(end > day);
        assert_eq!(end.date_naive(), day.date_naive());

        let exact = parse_date("2025-03-01T10:00:00+05:30", false).unwrap();
        assert_eq!(exact.to_rfc3339(), "2025-03-01T04:30:00+00:00");

        assert!(parse_date("01/03/2025", false).is_err());
        assert!(parse_date("  ", false).is_err());
    }

    #[test]
    fn test_search_rejects_inverted_range() {
        let result = parse_search(SearchEventsInput {
            text: None,
            start_date: Some("2025-05-01".into()),
            end_date: Some("2025-04-01".into()),
        });
        assert!(matches!(result, Err(ClubError::Validation(_))));
    }

    #[test]
    fn test_search_blank_text_is_none() {
        let filter = parse_search(SearchEventsInput {
            text: Some("   ".into()),
            ..Default::default()
        })
        .unwrap();
        assert!(filter.text.is_none());
        assert!(filter.start.is_none());
    }
}
