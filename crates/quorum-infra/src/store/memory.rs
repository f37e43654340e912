//! In-memory post store - used as fallback when Postgres is unavailable.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use quorum_core::domain::{Post, VoteRecord};
use quorum_core::error::StoreError;
use quorum_core::ports::PostStore;

/// Post store backed by a HashMap with an async RwLock.
///
/// Note: Data is lost on process restart.
pub struct InMemoryPostStore {
    posts: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryPostStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn find_scored_within(
        &self,
        id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Option<Post>, StoreError> {
        Ok(self
            .posts
            .read()
            .await
            .get(&id)
            .filter(|post| {
                post.point_timestamp
                    .map(|ts| ts >= start && ts < end)
                    .unwrap_or(false)
            })
            .cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, StoreError> {
        let mut posts = self.posts.write().await;
        if posts.contains_key(&post.id) {
            return Err(StoreError::Constraint("post already exists".to_string()));
        }
        posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update_vote_fields(
        &self,
        id: Uuid,
        voted_by: &[VoteRecord],
        upvotes: u32,
        downvotes: u32,
    ) -> Result<(), StoreError> {
        // Matching zero posts is not an error, same as a filtered update.
        if let Some(post) = self.posts.write().await.get_mut(&id) {
            post.voted_by = voted_by.to_vec();
            post.upvotes = upvotes;
            post.downvotes = downvotes;
            post.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn update_trending_fields(
        &self,
        id: Uuid,
        day_points: u32,
        point_timestamp: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        if let Some(post) = self.posts.write().await.get_mut(&id) {
            post.day_points = day_points;
            post.point_timestamp = Some(point_timestamp);
            post.updated_at = Utc::now();
        }
        Ok(())
    }
}
