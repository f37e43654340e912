//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quorum_core::domain::{Post, VoteKind};

/// Request to create a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub author_id: Uuid,
    pub title: String,
    pub body: String,
}

/// Request to cast a vote on a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteRequest {
    pub user_id: Uuid,
    pub kind: VoteKind,
}

/// A post's public score state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostScoreResponse {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub body: String,
    pub upvotes: u32,
    pub downvotes: u32,
    pub voter_count: usize,
    pub day_points: u32,
    pub point_timestamp: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Post> for PostScoreResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            author_id: post.author_id,
            title: post.title,
            body: post.body,
            upvotes: post.upvotes,
            downvotes: post.downvotes,
            voter_count: post.voted_by.len(),
            day_points: post.day_points,
            point_timestamp: post.point_timestamp,
            created_at: post.created_at,
        }
    }
}
