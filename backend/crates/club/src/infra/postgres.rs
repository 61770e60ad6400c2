//! PostgreSQL Repository Implementations

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use kernel::error::conversions::{foreign_key_violation, unique_violation};
use kernel::pagination::PageRequest;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{
    EngagementSummary, Event, EventSearch, Like, LikeTarget, Member, Photo, PhotoOwner,
    TargetKind, Testimonial,
};
use crate::domain::repository::{
    EventRepository, LikeRepository, MemberRepository, PhotoRepository, TestimonialRepository,
};
use crate::domain::value_object::{
    EventId, LikeId, MemberId, PhotoId, TestimonialId, UserId, member_role::MemberRole,
    slug::Slug,
};
use crate::error::{ClubError, ClubResult};

// 制約名は database/migrations と一致させる
const EVENT_NAME_CONSTRAINT: &str = "events_name_key";
const EVENT_SLUG_CONSTRAINT: &str = "events_slug_key";
const MEMBER_USER_CONSTRAINT: &str = "members_user_id_key";
const LIKE_EVENT_UNIQUE: &str = "likes_user_event_idx";
const LIKE_PHOTO_UNIQUE: &str = "likes_user_photo_idx";
const LIKE_USER_FK: &str = "likes_user_id_fkey";
const LIKE_EVENT_FK: &str = "likes_event_id_fkey";
const LIKE_PHOTO_FK: &str = "likes_photo_id_fkey";
const PHOTO_AUTHOR_FK: &str = "photos_author_id_fkey";
const PHOTO_EVENT_FK: &str = "photos_event_id_fkey";
const PHOTO_MEMBER_FK: &str = "photos_member_id_fkey";

const EVENT_COLUMNS: &str = r#"
    event_id,
    name,
    slug,
    description,
    rules,
    team_size,
    venue,
    date_of_event,
    photos,
    created_at,
    updated_at
"#;

const PHOTO_COLUMNS: &str = r#"
    photo_id,
    img_url,
    external_id,
    author_id,
    content,
    displayed,
    event_id,
    member_id,
    created_at,
    updated_at
"#;

const MEMBER_COLUMNS: &str = r#"
    member_id,
    user_id,
    name,
    description,
    profile_photo,
    photo_ids,
    displayed,
    member_role,
    created_at,
    updated_at
"#;

const TESTIMONIAL_COLUMNS: &str = r#"
    testimonial_id,
    author_id,
    description,
    profile_photo,
    displayed,
    created_at,
    updated_at
"#;

/// Shared WHERE clause of the event search (`$1` pattern, `$2` start, `$3` end)
const EVENT_SEARCH_FILTER: &str = r#"
    ($1::text IS NULL OR name ILIKE $1 OR description ILIKE $1 OR slug ILIKE $1)
    AND ($2::timestamptz IS NULL OR date_of_event >= $2)
    AND ($3::timestamptz IS NULL OR date_of_event <= $3)
"#;

/// PostgreSQL-backed club store
#[derive(Clone)]
pub struct PgClubRepository {
    pool: PgPool,
}

impl PgClubRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn count(&self, sql: &str) -> ClubResult<u64> {
        let total: i64 = sqlx::query_scalar(sql).fetch_one(&self.pool).await?;
        Ok(total.max(0) as u64)
    }
}

/// `(LIMIT, OFFSET)` binds; a NULL limit means all rows
fn limit_offset(page: Option<PageRequest>) -> (Option<i64>, i64) {
    match page {
        Some(page) => (
            Some(i64::try_from(page.limit()).unwrap_or(i64::MAX)),
            i64::try_from(page.offset()).unwrap_or(i64::MAX),
        ),
        None => (None, 0),
    }
}

/// `%text%` for ILIKE with `\`, `%` and `_` taken literally
fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn target_column(kind: TargetKind) -> &'static str {
    match kind {
        TargetKind::Event => "event_id",
        TargetKind::Photo => "photo_id",
    }
}

// ============================================================================
// Error Mapping
// ============================================================================

fn map_event_insert(err: sqlx::Error) -> ClubError {
    let mapped = match unique_violation(&err) {
        Some(EVENT_NAME_CONSTRAINT) => {
            Some(ClubError::Conflict("Event name already exists".to_string()))
        }
        Some(EVENT_SLUG_CONSTRAINT) => Some(ClubError::SlugTaken),
        _ => None,
    };
    mapped.unwrap_or(ClubError::Database(err))
}

fn map_photo_insert(err: sqlx::Error) -> ClubError {
    let mapped = match foreign_key_violation(&err) {
        Some(PHOTO_AUTHOR_FK) => Some(ClubError::UserNotFound),
        Some(PHOTO_EVENT_FK) => Some(ClubError::EventNotFound),
        Some(PHOTO_MEMBER_FK) => Some(ClubError::MemberNotFound),
        _ => None,
    };
    mapped.unwrap_or(ClubError::Database(err))
}

fn map_member_insert(err: sqlx::Error) -> ClubError {
    let mapped = match unique_violation(&err) {
        Some(MEMBER_USER_CONSTRAINT) => Some(ClubError::Conflict(
            "Member already exists for this user".to_string(),
        )),
        _ => None,
    };
    mapped.unwrap_or(ClubError::Database(err))
}

fn map_like_insert(err: sqlx::Error) -> ClubError {
    let mapped = match (unique_violation(&err), foreign_key_violation(&err)) {
        (Some(LIKE_EVENT_UNIQUE | LIKE_PHOTO_UNIQUE), _) => Some(ClubError::AlreadyLiked),
        // 存在確認の後に対象が消えた
        (_, Some(LIKE_EVENT_FK)) => Some(ClubError::EventNotFound),
        (_, Some(LIKE_PHOTO_FK)) => Some(ClubError::PhotoNotFound),
        (_, Some(LIKE_USER_FK)) => Some(ClubError::UserNotFound),
        _ => None,
    };
    mapped.unwrap_or(ClubError::Database(err))
}

// ============================================================================
// Event Repository Implementation
// ============================================================================

impl EventRepository for PgClubRepository {
    async fn insert_event(&self, event: &Event) -> ClubResult<()> {
        sqlx::query(
            r#"
            INSERT INTO events (
                event_id,
                name,
                slug,
                description,
                rules,
                team_size,
                venue,
                date_of_event,
                photos,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(event.event_id.as_uuid())
        .bind(&event.name)
        .bind(event.slug.as_str())
        .bind(&event.description)
        .bind(&event.rules)
        .bind(event.team_size)
        .bind(&event.venue)
        .bind(event.date_of_event)
        .bind(&event.photos)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_event_insert)?;

        Ok(())
    }

    async fn find_event(&self, event_id: &EventId) -> ClubResult<Option<Event>> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE event_id = $1");
        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(event_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(EventRow::into_event))
    }

    async fn find_event_by_slug(&self, slug: &str) -> ClubResult<Option<Event>> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE slug = $1");
        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(EventRow::into_event))
    }

    async fn event_name_exists(&self, name: &str) -> ClubResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM events WHERE name = $1)")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn event_slug_exists(&self, slug: &Slug) -> ClubResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM events WHERE slug = $1)")
            .bind(slug.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn list_events(&self, page: Option<PageRequest>) -> ClubResult<(Vec<Event>, u64)> {
        let (limit, offset) = limit_offset(page);
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at DESC, event_id DESC LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query_as::<_, EventRow>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        let total = self.count("SELECT COUNT(*) FROM events").await?;

        Ok((rows.into_iter().map(EventRow::into_event).collect(), total))
    }

    async fn search_events(
        &self,
        filter: &EventSearch,
        page: PageRequest,
    ) -> ClubResult<(Vec<Event>, u64)> {
        let pattern = filter.text.as_deref().map(like_pattern);
        let (limit, offset) = limit_offset(Some(page));

        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE {EVENT_SEARCH_FILTER} \
             ORDER BY created_at DESC, event_id DESC LIMIT $4 OFFSET $5"
        );
        let rows = sqlx::query_as::<_, EventRow>(&sql)
            .bind(pattern.as_deref())
            .bind(filter.start)
            .bind(filter.end)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) FROM events WHERE {EVENT_SEARCH_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(pattern.as_deref())
            .bind(filter.start)
            .bind(filter.end)
            .fetch_one(&self.pool)
            .await?;

        Ok((
            rows.into_iter().map(EventRow::into_event).collect(),
            total.max(0) as u64,
        ))
    }

    async fn delete_event(&self, event_id: &EventId) -> ClubResult<bool> {
        let result = sqlx::query("DELETE FROM events WHERE event_id = $1")
            .bind(event_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Photo Repository Implementation
// ============================================================================

impl PhotoRepository for PgClubRepository {
    async fn insert_photo(&self, photo: &Photo) -> ClubResult<()> {
        let (event_id, member_id) = photo.owner.columns();

        sqlx::query(
            r#"
            INSERT INTO photos (
                photo_id,
                img_url,
                external_id,
                author_id,
                content,
                displayed,
                event_id,
                member_id,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(photo.photo_id.as_uuid())
        .bind(&photo.img_url)
        .bind(&photo.external_id)
        .bind(photo.author.map(|a| a.into_uuid()))
        .bind(photo.content.as_deref())
        .bind(photo.displayed)
        .bind(event_id)
        .bind(member_id)
        .bind(photo.created_at)
        .bind(photo.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_photo_insert)?;

        Ok(())
    }

    async fn find_photo(&self, photo_id: &PhotoId) -> ClubResult<Option<Photo>> {
        let sql = format!("SELECT {PHOTO_COLUMNS} FROM photos WHERE photo_id = $1");
        let row = sqlx::query_as::<_, PhotoRow>(&sql)
            .bind(photo_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(PhotoRow::into_photo).transpose()
    }

    async fn list_photos(&self, page: Option<PageRequest>) -> ClubResult<(Vec<Photo>, u64)> {
        let (limit, offset) = limit_offset(page);
        let sql = format!(
            "SELECT {PHOTO_COLUMNS} FROM photos ORDER BY created_at DESC, photo_id DESC LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query_as::<_, PhotoRow>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        let total = self.count("SELECT COUNT(*) FROM photos").await?;

        let photos = rows
            .into_iter()
            .map(PhotoRow::into_photo)
            .collect::<ClubResult<Vec<_>>>()?;
        Ok((photos, total))
    }

    async fn photos_of_members(&self, member_ids: &[MemberId]) -> ClubResult<Vec<Photo>> {
        if member_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = member_ids.iter().map(|id| id.into_uuid()).collect();
        let sql = format!(
            "SELECT {PHOTO_COLUMNS} FROM photos WHERE member_id = ANY($1) ORDER BY created_at ASC"
        );
        let rows = sqlx::query_as::<_, PhotoRow>(&sql)
            .bind(&ids)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(PhotoRow::into_photo).collect()
    }

    async fn detach_event_photos(&self, event_id: &EventId) -> ClubResult<u64> {
        let result = sqlx::query(
            "UPDATE photos SET event_id = NULL, updated_at = NOW() WHERE event_id = $1",
        )
        .bind(event_id.as_uuid())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_photo(&self, photo_id: &PhotoId) -> ClubResult<bool> {
        let result = sqlx::query("DELETE FROM photos WHERE photo_id = $1")
            .bind(photo_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Member Repository Implementation
// ============================================================================

impl MemberRepository for PgClubRepository {
    async fn insert_member(&self, member: &Member) -> ClubResult<()> {
        let photo_ids: Vec<Uuid> = member.photos.iter().map(|id| id.into_uuid()).collect();

        sqlx::query(
            r#"
            INSERT INTO members (
                member_id,
                user_id,
                name,
                description,
                profile_photo,
                photo_ids,
                displayed,
                member_role,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(member.member_id.as_uuid())
        .bind(member.user_id.as_uuid())
        .bind(&member.name)
        .bind(&member.description)
        .bind(member.profile_photo.as_deref())
        .bind(&photo_ids)
        .bind(member.displayed)
        .bind(member.role.code())
        .bind(member.created_at)
        .bind(member.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_member_insert)?;

        Ok(())
    }

    async fn find_member(&self, member_id: &MemberId) -> ClubResult<Option<Member>> {
        let sql = format!("SELECT {MEMBER_COLUMNS} FROM members WHERE member_id = $1");
        let row = sqlx::query_as::<_, MemberRow>(&sql)
            .bind(member_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(MemberRow::into_member).transpose()
    }

    async fn find_member_by_user(&self, user_id: &UserId) -> ClubResult<Option<Member>> {
        let sql = format!("SELECT {MEMBER_COLUMNS} FROM members WHERE user_id = $1");
        let row = sqlx::query_as::<_, MemberRow>(&sql)
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(MemberRow::into_member).transpose()
    }

    async fn list_members(&self) -> ClubResult<Vec<Member>> {
        let sql = format!("SELECT {MEMBER_COLUMNS} FROM members ORDER BY created_at DESC, member_id DESC");
        let rows = sqlx::query_as::<_, MemberRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(MemberRow::into_member).collect()
    }

    async fn update_member(&self, member: &Member) -> ClubResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE members
            SET name = $2,
                description = $3,
                displayed = $4,
                member_role = $5,
                profile_photo = $6,
                updated_at = $7
            WHERE member_id = $1
            "#,
        )
        .bind(member.member_id.as_uuid())
        .bind(&member.name)
        .bind(&member.description)
        .bind(member.displayed)
        .bind(member.role.code())
        .bind(member.profile_photo.as_deref())
        .bind(member.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn append_member_photo(
        &self,
        member_id: &MemberId,
        photo_id: &PhotoId,
    ) -> ClubResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE members
            SET photo_ids = array_append(photo_ids, $2), updated_at = NOW()
            WHERE member_id = $1 AND NOT ($2 = ANY(photo_ids))
            "#,
        )
        .bind(member_id.as_uuid())
        .bind(photo_id.as_uuid())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        // 既に含まれているのか、メンバーが存在しないのかを区別する
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM members WHERE member_id = $1)")
                .bind(member_id.as_uuid())
                .fetch_one(&self.pool)
                .await?;
        if exists {
            Ok(false)
        } else {
            Err(ClubError::MemberNotFound)
        }
    }

    async fn remove_member_photo(
        &self,
        member_id: &MemberId,
        photo_id: &PhotoId,
    ) -> ClubResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE members
            SET photo_ids = array_remove(photo_ids, $2), updated_at = NOW()
            WHERE member_id = $1 AND $2 = ANY(photo_ids)
            "#,
        )
        .bind(member_id.as_uuid())
        .bind(photo_id.as_uuid())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_member(&self, member_id: &MemberId) -> ClubResult<bool> {
        let result = sqlx::query("DELETE FROM members WHERE member_id = $1")
            .bind(member_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Testimonial Repository Implementation
// ============================================================================

impl TestimonialRepository for PgClubRepository {
    async fn insert_testimonial(&self, testimonial: &Testimonial) -> ClubResult<()> {
        sqlx::query(
            r#"
            INSERT INTO testimonials (
                testimonial_id,
                author_id,
                description,
                profile_photo,
                displayed,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(testimonial.testimonial_id.as_uuid())
        .bind(testimonial.author.as_uuid())
        .bind(&testimonial.description)
        .bind(testimonial.profile_photo.as_deref())
        .bind(testimonial.displayed)
        .bind(testimonial.created_at)
        .bind(testimonial.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_testimonial(
        &self,
        testimonial_id: &TestimonialId,
    ) -> ClubResult<Option<Testimonial>> {
        let sql = format!("SELECT {TESTIMONIAL_COLUMNS} FROM testimonials WHERE testimonial_id = $1");
        let row = sqlx::query_as::<_, TestimonialRow>(&sql)
            .bind(testimonial_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(TestimonialRow::into_testimonial))
    }

    async fn list_testimonials(&self) -> ClubResult<Vec<Testimonial>> {
        let sql = format!(
            "SELECT {TESTIMONIAL_COLUMNS} FROM testimonials ORDER BY updated_at DESC, testimonial_id DESC"
        );
        let rows = sqlx::query_as::<_, TestimonialRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(TestimonialRow::into_testimonial).collect())
    }

    async fn testimonials_by_author(
        &self,
        author: &UserId,
        page: PageRequest,
    ) -> ClubResult<(Vec<Testimonial>, u64)> {
        let (limit, offset) = limit_offset(Some(page));
        let sql = format!(
            "SELECT {TESTIMONIAL_COLUMNS} FROM testimonials WHERE author_id = $1 \
             ORDER BY created_at DESC, testimonial_id DESC LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, TestimonialRow>(&sql)
            .bind(author.as_uuid())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM testimonials WHERE author_id = $1")
            .bind(author.as_uuid())
            .fetch_one(&self.pool)
            .await?;

        Ok((
            rows.into_iter().map(TestimonialRow::into_testimonial).collect(),
            total.max(0) as u64,
        ))
    }

    async fn delete_testimonial(&self, testimonial_id: &TestimonialId) -> ClubResult<bool> {
        let result = sqlx::query("DELETE FROM testimonials WHERE testimonial_id = $1")
            .bind(testimonial_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Like Repository Implementation
// ============================================================================

impl LikeRepository for PgClubRepository {
    async fn insert_like(&self, like: &Like) -> ClubResult<()> {
        let (event_id, photo_id) = like.target.columns();

        sqlx::query(
            r#"
            INSERT INTO likes (like_id, user_id, event_id, photo_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(like.like_id.as_uuid())
        .bind(like.user_id.as_uuid())
        .bind(event_id)
        .bind(photo_id)
        .bind(like.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_like_insert)?;

        Ok(())
    }

    async fn delete_like(
        &self,
        user_id: &UserId,
        target: &LikeTarget,
    ) -> ClubResult<Option<Like>> {
        let sql = format!(
            "DELETE FROM likes WHERE user_id = $1 AND {} = $2 \
             RETURNING like_id, user_id, event_id, photo_id, created_at",
            target_column(target.kind())
        );
        let row = sqlx::query_as::<_, LikeRow>(&sql)
            .bind(user_id.as_uuid())
            .bind(target.uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(LikeRow::into_like).transpose()
    }

    async fn delete_likes_on(&self, target: &LikeTarget) -> ClubResult<u64> {
        let sql = format!("DELETE FROM likes WHERE {} = $1", target_column(target.kind()));
        let result = sqlx::query(&sql)
            .bind(target.uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_likes_by_user(&self, user_id: &UserId) -> ClubResult<u64> {
        let result = sqlx::query("DELETE FROM likes WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn count_likes(&self, target: &LikeTarget) -> ClubResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM likes WHERE {} = $1", target_column(target.kind()));
        let total: i64 = sqlx::query_scalar(&sql)
            .bind(target.uuid())
            .fetch_one(&self.pool)
            .await?;

        Ok(total.max(0) as u64)
    }

    async fn has_liked(&self, user_id: &UserId, target: &LikeTarget) -> ClubResult<bool> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM likes WHERE user_id = $1 AND {} = $2)",
            target_column(target.kind())
        );
        let exists: bool = sqlx::query_scalar(&sql)
            .bind(user_id.as_uuid())
            .bind(target.uuid())
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn summarize_likes(
        &self,
        kind: TargetKind,
        target_ids: &[Uuid],
        viewer: Option<&UserId>,
    ) -> ClubResult<HashMap<Uuid, EngagementSummary>> {
        if target_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let column = target_column(kind);
        let sql = format!(
            r#"
            SELECT
                {column} AS target_id,
                COUNT(*) AS likes_count,
                COALESCE(BOOL_OR(user_id = $2), FALSE) AS liked_by_viewer
            FROM likes
            WHERE {column} = ANY($1)
            GROUP BY {column}
            "#
        );
        let rows = sqlx::query_as::<_, LikeSummaryRow>(&sql)
            .bind(target_ids)
            .bind(viewer.map(|v| v.into_uuid()))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                (
                    row.target_id,
                    EngagementSummary {
                        likes_count: row.likes_count.max(0) as u64,
                        liked_by_viewer: row.liked_by_viewer,
                    },
                )
            })
            .collect())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct EventRow {
    event_id: Uuid,
    name: String,
    slug: String,
    description: String,
    rules: String,
    team_size: i32,
    venue: String,
    date_of_event: DateTime<Utc>,
    photos: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl EventRow {
    fn into_event(self) -> Event {
        Event {
            event_id: EventId::from_uuid(self.event_id),
            name: self.name,
            slug: Slug::from_db(self.slug),
            description: self.description,
            rules: self.rules,
            team_size: self.team_size,
            venue: self.venue,
            date_of_event: self.date_of_event,
            photos: self.photos,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PhotoRow {
    photo_id: Uuid,
    img_url: String,
    external_id: String,
    author_id: Option<Uuid>,
    content: Option<String>,
    displayed: bool,
    event_id: Option<Uuid>,
    member_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PhotoRow {
    fn into_photo(self) -> ClubResult<Photo> {
        let owner = PhotoOwner::from_columns(self.event_id, self.member_id)
            .map_err(|e| ClubError::Internal(format!("photo {}: {}", self.photo_id, e)))?;

        Ok(Photo {
            photo_id: PhotoId::from_uuid(self.photo_id),
            img_url: self.img_url,
            external_id: self.external_id,
            author: self.author_id.map(UserId::from_uuid),
            content: self.content,
            displayed: self.displayed,
            owner,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct MemberRow {
    member_id: Uuid,
    user_id: Uuid,
    name: String,
    description: String,
    profile_photo: Option<String>,
    photo_ids: Vec<Uuid>,
    displayed: bool,
    member_role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MemberRow {
    fn into_member(self) -> ClubResult<Member> {
        let role = MemberRole::from_code(&self.member_role)
            .ok_or_else(|| ClubError::Internal(format!("Invalid member_role: {}", self.member_role)))?;

        Ok(Member {
            member_id: MemberId::from_uuid(self.member_id),
            user_id: UserId::from_uuid(self.user_id),
            name: self.name,
            description: self.description,
            profile_photo: self.profile_photo,
            photos: self.photo_ids.into_iter().map(PhotoId::from_uuid).collect(),
            displayed: self.displayed,
            role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TestimonialRow {
    testimonial_id: Uuid,
    author_id: Uuid,
    description: String,
    profile_photo: Option<String>,
    displayed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TestimonialRow {
    fn into_testimonial(self) -> Testimonial {
        Testimonial {
            testimonial_id: TestimonialId::from_uuid(self.testimonial_id),
            author: UserId::from_uuid(self.author_id),
            description: self.description,
            profile_photo: self.profile_photo,
            displayed: self.displayed,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct LikeRow {
    like_id: Uuid,
    user_id: Uuid,
    event_id: Option<Uuid>,
    photo_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl LikeRow {
    fn into_like(self) -> ClubResult<Like> {
        let target = LikeTarget::from_columns(self.event_id, self.photo_id)
            .map_err(|e| ClubError::Internal(format!("like {}: {}", self.like_id, e)))?;

        Ok(Like {
            like_id: LikeId::from_uuid(self.like_id),
            user_id: UserId::from_uuid(self.user_id),
            target,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct LikeSummaryRow {
    target_id: Uuid,
    likes_count: i64,
    liked_by_viewer: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("code"), "%code%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_limit_offset() {
        assert_eq!(limit_offset(None), (None, 0));
        let page = PageRequest::new(Some(3), Some(4), 9);
        assert_eq!(limit_offset(Some(page)), (Some(4), 8));
    }

    #[test]
    fn test_limit_offset_never_negative() {
        for (page, limit) in [(Some(2), Some(u64::MAX)), (Some(u64::MAX), Some(u64::MAX)), (Some(u64::MAX), Some(1))] {
            let (limit, offset) = limit_offset(Some(PageRequest::new(page, limit, 9)));
            assert!(limit.is_some_and(|l| l >= 1), "limit {limit:?}");
            assert!(offset >= 0, "offset {offset}");
        }
    }
}
