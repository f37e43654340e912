#[cfg(test)]
mod tests {
    use crate::database::PostgresPostStore;
    use crate::database::entity::post;
    use quorum_core::domain::{VoteKind, VoteRecord};
    use quorum_core::ports::PostStore;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn find_post_by_id_maps_vote_fields() {
        let post_id = uuid::Uuid::new_v4();
        let author_id = uuid::Uuid::new_v4();
        let voter = uuid::Uuid::new_v4();
        let now = chrono::Utc::now();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post::Model {
                id: post_id,
                author_id,
                title: "Test Post".to_owned(),
                body: "Body".to_owned(),
                voted_by: serde_json::json!([{ "user_id": voter, "kind": "up" }]),
                upvotes: 1,
                downvotes: 0,
                day_points: 3,
                point_timestamp: Some(now.into()),
                created_at: now.into(),
                updated_at: now.into(),
            }]])
            .into_connection();

        let store = PostgresPostStore::new(db);

        let result = store.find_by_id(post_id).await.unwrap();

        assert!(result.is_some());
        let found = result.unwrap();
        assert_eq!(found.id, post_id);
        assert_eq!(found.upvotes, 1);
        assert_eq!(found.day_points, 3);
        assert_eq!(
            found.voted_by,
            vec![VoteRecord {
                user_id: voter,
                kind: VoteKind::Up,
            }]
        );
    }

    #[tokio::test]
    async fn window_lookup_maps_empty_result_to_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<post::Model>::new()])
            .into_connection();
        let store = PostgresPostStore::new(db);
        let now = chrono::Utc::now();

        let result = store
            .find_scored_within(uuid::Uuid::new_v4(), now - chrono::Duration::hours(24), now)
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn vote_field_update_succeeds_on_zero_matched_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let store = PostgresPostStore::new(db);

        store
            .update_vote_fields(uuid::Uuid::new_v4(), &[], 0, 0)
            .await
            .unwrap();
    }
}
