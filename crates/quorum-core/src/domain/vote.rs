use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
    Up,
    Down,
}

/// One voter's current stance on a post. At most one record per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub user_id: Uuid,
    pub kind: VoteKind,
}

/// A vote submission routed to the score engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VoteEvent {
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub kind: VoteKind,
}
