//! Testimonial Entity

use chrono::{DateTime, Utc};

use crate::domain::value_object::{TestimonialId, UserId};

#[derive(Debug, Clone)]
pub struct Testimonial {
    pub testimonial_id: TestimonialId,
    pub author: UserId,
    pub description: String,
    pub profile_photo: Option<String>,
    pub displayed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Testimonial {
    pub fn new(
        author: UserId,
        description: String,
        profile_photo: Option<String>,
        displayed: bool,
    ) -> Self {
        let now = Utc::now();

        Self {
            testimonial_id: TestimonialId::new(),
            author,
            description,
            profile_photo,
            displayed,
            created_at: now,
            updated_at: now,
        }
    }
}
