use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Post, VoteRecord};
use crate::error::StoreError;

/// Document-store contract the score engine runs against.
///
/// Updates are partial writes keyed by post id; an update whose id
/// matches nothing affects zero rows and succeeds.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Find a post by its unique id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, StoreError>;

    /// The post, only if its last trending update falls inside `[start, end)`.
    async fn find_scored_within(
        &self,
        id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Option<Post>, StoreError>;

    /// Insert a newly created post.
    async fn insert(&self, post: Post) -> Result<Post, StoreError>;

    /// Persist the vote bookkeeping fields in one write.
    async fn update_vote_fields(
        &self,
        id: Uuid,
        voted_by: &[VoteRecord],
        upvotes: u32,
        downvotes: u32,
    ) -> Result<(), StoreError>;

    /// Persist the trending fields in one write.
    async fn update_trending_fields(
        &self,
        id: Uuid,
        day_points: u32,
        point_timestamp: DateTime<Utc>,
    ) -> Result<(), StoreError>;
}
