//! Testimonial Use Cases

use std::collections::HashMap;
use std::sync::Arc;

use auth::domain::repository::UserRepository;
use kernel::error::app_error::AppError;
use kernel::pagination::{PageRequest, Paged};

use crate::application::actor::Actor;
use crate::domain::entity::Testimonial;
use crate::domain::repository::ClubStore;
use crate::domain::value_object::{TestimonialId, UserId, text};
use crate::error::{ClubError, ClubResult};

#[derive(Debug, Clone, Default)]
pub struct CreateTestimonialInput {
    pub description: String,
    pub profile_photo: Option<String>,
    pub displayed: Option<bool>,
}

/// A testimonial with its author's user name
///
/// `username` is `None` once the author's account is gone.
#[derive(Debug, Clone)]
pub struct AuthoredTestimonial {
    pub testimonial: Testimonial,
    pub username: Option<String>,
}

pub struct TestimonialService<S, U>
where
    S: ClubStore,
    U: UserRepository,
{
    store: Arc<S>,
    users: Arc<U>,
}

impl<S, U> TestimonialService<S, U>
where
    S: ClubStore,
    U: UserRepository,
{
    pub fn new(store: Arc<S>, users: Arc<U>) -> Self {
        Self { store, users }
    }

    /// Create a testimonial authored by the caller
    pub async fn create(&self, author: &UserId, input: CreateTestimonialInput) -> ClubResult<Testimonial> {
        let description = text::TESTIMONIAL_DESCRIPTION
            .apply(&input.description)
            .map_err(ClubError::validation)?;
        let profile_photo = input
            .profile_photo
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        let testimonial = Testimonial::new(
            *author,
            description,
            profile_photo,
            input.displayed.unwrap_or(false),
        );
        self.store.insert_testimonial(&testimonial).await?;

        tracing::info!(testimonial_id = %testimonial.testimonial_id, author = %author, "Testimonial created");
        Ok(testimonial)
    }

    /// Every testimonial, most recently updated first (admin)
    pub async fn list_all(&self) -> ClubResult<Vec<AuthoredTestimonial>> {
        let testimonials = self.store.list_testimonials().await?;
        self.with_authors(testimonials).await
    }

    /// Testimonials written by one user, newest first, always paged
    pub async fn list_for_user(
        &self,
        author: &UserId,
        page: PageRequest,
    ) -> ClubResult<Paged<AuthoredTestimonial>> {
        let (items, total) = self.store.testimonials_by_author(author, page).await?;
        let items = self.with_authors(items).await?;
        Ok(Paged::new(items, total, Some(page)))
    }

    /// Delete; only the author may, unless the actor is an admin
    pub async fn delete(&self, actor: Actor, testimonial_id: &TestimonialId) -> ClubResult<Testimonial> {
        let testimonial = self
            .store
            .find_testimonial(testimonial_id)
            .await?
            .ok_or(ClubError::TestimonialNotFound)?;

        if !actor.may_manage(Some(&testimonial.author)) {
            return Err(ClubError::forbidden(
                "Only the author can delete this testimonial",
            ));
        }

        if !self.store.delete_testimonial(testimonial_id).await? {
            return Err(ClubError::TestimonialNotFound);
        }

        tracing::info!(testimonial_id = %testimonial_id, by = %actor.user_id, "Testimonial deleted");
        Ok(testimonial)
    }

    /// Attach user names with one lookup for all distinct authors
    async fn with_authors(&self, testimonials: Vec<Testimonial>) -> ClubResult<Vec<AuthoredTestimonial>> {
        let mut authors: Vec<UserId> = testimonials.iter().map(|t| t.author).collect();
        authors.sort_by(|a, b| a.as_uuid().cmp(b.as_uuid()));
        authors.dedup();

        let names: HashMap<UserId, String> = self
            .users
            .find_by_ids(&authors)
            .await
            .map_err(AppError::from)?
            .into_iter()
            .map(|user| (user.user_id, user.user_name.as_str().to_string()))
            .collect();

        Ok(testimonials
            .into_iter()
            .map(|testimonial| AuthoredTestimonial {
                username: names.get(&testimonial.author).cloned(),
                testimonial,
            })
            .collect())
    }
}
