use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::vote::{VoteKind, VoteRecord};

/// Post entity - a discussion post with denormalized vote tallies and
/// trending state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub body: String,
    /// One entry per distinct voter; order is not significant.
    pub voted_by: Vec<VoteRecord>,
    pub upvotes: u32,
    pub downvotes: u32,
    /// Momentum counter for the trailing 24-hour window.
    pub day_points: u32,
    /// When the trending counter was last touched.
    pub point_timestamp: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What `register_vote` did with the incoming vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// First vote from this user on this post.
    FirstVote,
    /// The user flipped an earlier vote to the other kind.
    Switched,
    /// Same user, same kind - nothing changed.
    Repeat,
}

impl Post {
    /// Create a new post with no votes and a cold trending window.
    pub fn new(author_id: Uuid, title: String, body: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            body,
            voted_by: Vec::new(),
            upvotes: 0,
            downvotes: 0,
            day_points: 0,
            point_timestamp: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record a user's vote, keeping `upvotes`/`downvotes` equal to the
    /// per-kind counts in `voted_by`. A user holds at most one record; a
    /// later vote of the other kind replaces it and moves one tally from
    /// the old bucket to the new one.
    pub fn register_vote(&mut self, user_id: Uuid, kind: VoteKind) -> VoteOutcome {
        match self.voted_by.iter_mut().find(|v| v.user_id == user_id) {
            Some(existing) if existing.kind == kind => VoteOutcome::Repeat,
            Some(existing) => {
                let previous = existing.kind;
                existing.kind = kind;
                self.decrement_tally(previous);
                self.increment_tally(kind);
                VoteOutcome::Switched
            }
            None => {
                self.voted_by.push(VoteRecord { user_id, kind });
                self.increment_tally(kind);
                VoteOutcome::FirstVote
            }
        }
    }

    fn increment_tally(&mut self, kind: VoteKind) {
        match kind {
            VoteKind::Up => self.upvotes += 1,
            VoteKind::Down => self.downvotes += 1,
        }
    }

    fn decrement_tally(&mut self, kind: VoteKind) {
        match kind {
            VoteKind::Up => self.upvotes = self.upvotes.saturating_sub(1),
            VoteKind::Down => self.downvotes = self.downvotes.saturating_sub(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> Post {
        Post::new(Uuid::new_v4(), "title".to_string(), "body".to_string())
    }

    #[test]
    fn first_vote_appends_and_counts() {
        let mut post = post();
        let voter = Uuid::new_v4();

        let outcome = post.register_vote(voter, VoteKind::Up);

        assert_eq!(outcome, VoteOutcome::FirstVote);
        assert_eq!(post.upvotes, 1);
        assert_eq!(post.downvotes, 0);
        assert_eq!(post.voted_by.len(), 1);
    }

    #[test]
    fn tallies_follow_vote_switch() {
        let mut post = post();
        let voter = Uuid::new_v4();
        post.register_vote(voter, VoteKind::Up);

        let outcome = post.register_vote(voter, VoteKind::Down);

        assert_eq!(outcome, VoteOutcome::Switched);
        assert_eq!(post.upvotes, 0);
        assert_eq!(post.downvotes, 1);
        assert_eq!(post.voted_by.len(), 1);
        assert_eq!(post.voted_by[0].kind, VoteKind::Down);
    }

    #[test]
    fn repeat_vote_is_noop() {
        let mut post = post();
        let voter = Uuid::new_v4();
        post.register_vote(voter, VoteKind::Down);

        let outcome = post.register_vote(voter, VoteKind::Down);

        assert_eq!(outcome, VoteOutcome::Repeat);
        assert_eq!(post.downvotes, 1);
        assert_eq!(post.voted_by.len(), 1);
    }

    #[test]
    fn tallies_match_voted_by_counts_across_many_voters() {
        let mut post = post();
        let switcher = Uuid::new_v4();
        post.register_vote(switcher, VoteKind::Up);
        for _ in 0..4 {
            post.register_vote(Uuid::new_v4(), VoteKind::Up);
        }
        for _ in 0..3 {
            post.register_vote(Uuid::new_v4(), VoteKind::Down);
        }
        post.register_vote(switcher, VoteKind::Down);

        let ups = post
            .voted_by
            .iter()
            .filter(|v| v.kind == VoteKind::Up)
            .count() as u32;
        let downs = post
            .voted_by
            .iter()
            .filter(|v| v.kind == VoteKind::Down)
            .count() as u32;
        assert_eq!(post.upvotes, ups);
        assert_eq!(post.downvotes, downs);
        assert_eq!(post.voted_by.len(), 8);
    }
}
