use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::{VoteEvent, VoteOutcome};
use crate::error::StoreError;
use crate::ports::PostStore;

/// Width of the trending window in hours.
pub const TRENDING_WINDOW_HOURS: i64 = 24;

/// Applies vote events to a post's tallies and trending counter.
///
/// Scoring is best-effort telemetry: store failures are logged with
/// context and swallowed so the vote-submission flow is never blocked.
pub struct ScoreEngine {
    store: Arc<dyn PostStore>,
}

impl ScoreEngine {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }

    /// Fold one vote into the post's tallies. New voters also advance the
    /// trending counter; vote changes do not.
    pub async fn apply_vote(&self, vote: &VoteEvent) {
        if let Err(e) = self.try_apply_vote(vote).await {
            tracing::warn!(
                post_id = %vote.post_id,
                user_id = %vote.user_id,
                kind = ?vote.kind,
                error = %e,
                "vote scoring failed"
            );
        }
    }

    async fn try_apply_vote(&self, vote: &VoteEvent) -> Result<(), StoreError> {
        let Some(mut post) = self.store.find_by_id(vote.post_id).await? else {
            // Vote arrived for a deleted or never-created post.
            tracing::debug!(post_id = %vote.post_id, "vote for unknown post ignored");
            return Ok(());
        };

        let outcome = post.register_vote(vote.user_id, vote.kind);
        if outcome == VoteOutcome::Repeat {
            tracing::debug!(post_id = %post.id, user_id = %vote.user_id, "repeat vote ignored");
            return Ok(());
        }

        self.store
            .update_vote_fields(post.id, &post.voted_by, post.upvotes, post.downvotes)
            .await?;
        tracing::debug!(
            post_id = %post.id,
            upvotes = post.upvotes,
            downvotes = post.downvotes,
            ?outcome,
            "vote tallies updated"
        );

        if outcome == VoteOutcome::FirstVote {
            self.bump_trending(vote.post_id).await;
        }
        Ok(())
    }

    /// Advance the post's 24-hour momentum counter: accumulate while the
    /// window is warm, restart at 1 once it has gone cold.
    pub async fn bump_trending(&self, post_id: Uuid) {
        if let Err(e) = self.try_bump_trending(post_id).await {
            tracing::warn!(post_id = %post_id, error = %e, "trending update failed");
        }
    }

    async fn try_bump_trending(&self, post_id: Uuid) -> Result<(), StoreError> {
        let now = Utc::now();
        let window_start = now - Duration::hours(TRENDING_WINDOW_HOURS);

        let day_points = match self
            .store
            .find_scored_within(post_id, window_start, now)
            .await?
        {
            Some(post) => post.day_points + 1,
            // Cold window, absent timestamp, or missing post. The write
            // below matches zero rows when the post is gone.
            None => 1,
        };

        self.store
            .update_trending_fields(post_id, day_points, now)
            .await?;
        tracing::debug!(post_id = %post_id, day_points, "trending counter updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Post, VoteKind, VoteRecord};
    use async_trait::async_trait;
    use chrono::DateTime;
    use std::sync::Mutex;

    /// Store double serving a single post and counting writes.
    struct RecordingStore {
        post: Mutex<Option<Post>>,
        writes: Mutex<u32>,
    }

    impl RecordingStore {
        fn with_post(post: Post) -> Self {
            Self {
                post: Mutex::new(Some(post)),
                writes: Mutex::new(0),
            }
        }

        fn post(&self) -> Post {
            self.post.lock().unwrap().clone().unwrap()
        }

        fn writes(&self) -> u32 {
            *self.writes.lock().unwrap()
        }
    }

    #[async_trait]
    impl PostStore for RecordingStore {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
            Ok(self.post.lock().unwrap().clone().filter(|p| p.id == id))
        }

        async fn find_scored_within(
            &self,
            id: Uuid,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> Result<Option<Post>, StoreError> {
            Ok(self.post.lock().unwrap().clone().filter(|p| {
                p.id == id
                    && p.point_timestamp
                        .map(|ts| ts >= start && ts < end)
                        .unwrap_or(false)
            }))
        }

        async fn insert(&self, post: Post) -> Result<Post, StoreError> {
            *self.post.lock().unwrap() = Some(post.clone());
            Ok(post)
        }

        async fn update_vote_fields(
            &self,
            id: Uuid,
            voted_by: &[VoteRecord],
            upvotes: u32,
            downvotes: u32,
        ) -> Result<(), StoreError> {
            *self.writes.lock().unwrap() += 1;
            let mut slot = self.post.lock().unwrap();
            if let Some(post) = slot.as_mut().filter(|p| p.id == id) {
                post.voted_by = voted_by.to_vec();
                post.upvotes = upvotes;
                post.downvotes = downvotes;
            }
            Ok(())
        }

        async fn update_trending_fields(
            &self,
            id: Uuid,
            day_points: u32,
            point_timestamp: DateTime<Utc>,
        ) -> Result<(), StoreError> {
            *self.writes.lock().unwrap() += 1;
            let mut slot = self.post.lock().unwrap();
            if let Some(post) = slot.as_mut().filter(|p| p.id == id) {
                post.day_points = day_points;
                post.point_timestamp = Some(point_timestamp);
            }
            Ok(())
        }
    }

    fn sample_post() -> Post {
        Post::new(Uuid::new_v4(), "title".to_string(), "body".to_string())
    }

    fn engine_with(post: Post) -> (ScoreEngine, Arc<RecordingStore>) {
        let store = Arc::new(RecordingStore::with_post(post));
        (ScoreEngine::new(store.clone()), store)
    }

    fn vote(post_id: Uuid, user_id: Uuid, kind: VoteKind) -> VoteEvent {
        VoteEvent {
            post_id,
            user_id,
            kind,
        }
    }

    #[tokio::test]
    async fn first_vote_updates_tallies_and_trending() {
        let post = sample_post();
        let post_id = post.id;
        let (engine, store) = engine_with(post);

        engine
            .apply_vote(&vote(post_id, Uuid::new_v4(), VoteKind::Up))
            .await;

        let post = store.post();
        assert_eq!(post.upvotes, 1);
        assert_eq!(post.downvotes, 0);
        assert_eq!(post.voted_by.len(), 1);
        assert_eq!(post.day_points, 1);
        assert!(post.point_timestamp.is_some());
    }

    #[tokio::test]
    async fn second_voter_in_window_accumulates_day_points() {
        let post = sample_post();
        let post_id = post.id;
        let (engine, store) = engine_with(post);

        engine
            .apply_vote(&vote(post_id, Uuid::new_v4(), VoteKind::Up))
            .await;
        engine
            .apply_vote(&vote(post_id, Uuid::new_v4(), VoteKind::Down))
            .await;

        let post = store.post();
        assert_eq!(post.upvotes, 1);
        assert_eq!(post.downvotes, 1);
        assert_eq!(post.voted_by.len(), 2);
        assert_eq!(post.day_points, 2);
    }

    #[tokio::test]
    async fn missing_post_is_ignored_without_writes() {
        let (engine, store) = engine_with(sample_post());

        engine
            .apply_vote(&vote(Uuid::new_v4(), Uuid::new_v4(), VoteKind::Up))
            .await;

        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn vote_switch_moves_tally_without_trending() {
        let post = sample_post();
        let post_id = post.id;
        let (engine, store) = engine_with(post);
        let voter = Uuid::new_v4();

        engine.apply_vote(&vote(post_id, voter, VoteKind::Up)).await;
        engine
            .apply_vote(&vote(post_id, voter, VoteKind::Down))
            .await;

        let post = store.post();
        assert_eq!(post.upvotes, 0);
        assert_eq!(post.downvotes, 1);
        assert_eq!(post.voted_by.len(), 1);
        // Trending only advances on new voters.
        assert_eq!(post.day_points, 1);
    }

    #[tokio::test]
    async fn repeat_vote_writes_nothing() {
        let post = sample_post();
        let post_id = post.id;
        let (engine, store) = engine_with(post);
        let voter = Uuid::new_v4();

        engine.apply_vote(&vote(post_id, voter, VoteKind::Up)).await;
        let writes_after_first = store.writes();
        engine.apply_vote(&vote(post_id, voter, VoteKind::Up)).await;

        assert_eq!(store.writes(), writes_after_first);
        assert_eq!(store.post().upvotes, 1);
    }

    #[tokio::test]
    async fn trending_cold_start_sets_one() {
        let post = sample_post();
        let post_id = post.id;
        let (engine, store) = engine_with(post);

        engine.bump_trending(post_id).await;

        assert_eq!(store.post().day_points, 1);
    }

    #[tokio::test]
    async fn trending_warm_window_accumulates() {
        let mut post = sample_post();
        post.day_points = 4;
        post.point_timestamp = Some(Utc::now() - Duration::hours(1));
        let post_id = post.id;
        let (engine, store) = engine_with(post);

        engine.bump_trending(post_id).await;

        assert_eq!(store.post().day_points, 5);
    }

    #[tokio::test]
    async fn trending_stale_window_resets() {
        let mut post = sample_post();
        post.day_points = 100;
        post.point_timestamp = Some(Utc::now() - Duration::hours(25));
        let post_id = post.id;
        let (engine, store) = engine_with(post);

        let before = Utc::now();
        engine.bump_trending(post_id).await;

        let post = store.post();
        assert_eq!(post.day_points, 1);
        assert!(post.point_timestamp.unwrap() >= before);
    }
}
