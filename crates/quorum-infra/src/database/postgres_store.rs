//! PostgreSQL implementation of the post store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use quorum_core::domain::{Post, VoteRecord};
use quorum_core::error::StoreError;
use quorum_core::ports::PostStore;

use super::entity::post::{self, Entity as PostEntity};

/// PostgreSQL post store.
pub struct PostgresPostStore {
    db: DbConn,
}

impl PostgresPostStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

fn query_err(e: sea_orm::DbErr) -> StoreError {
    StoreError::Query(e.to_string())
}

#[async_trait]
impl PostStore for PostgresPostStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
        let result = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_scored_within(
        &self,
        id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Option<Post>, StoreError> {
        let result = PostEntity::find()
            .filter(post::Column::Id.eq(id))
            .filter(post::Column::PointTimestamp.gte(start))
            .filter(post::Column::PointTimestamp.lt(end))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn insert(&self, new_post: Post) -> Result<Post, StoreError> {
        let active: post::ActiveModel = new_post.into();
        let model = active.insert(&self.db).await.map_err(|e| {
            let err_str = e.to_string();
            if err_str.contains("duplicate") || err_str.contains("unique") {
                StoreError::Constraint("post already exists".to_string())
            } else {
                StoreError::Query(err_str)
            }
        })?;

        Ok(model.into())
    }

    async fn update_vote_fields(
        &self,
        id: Uuid,
        voted_by: &[VoteRecord],
        upvotes: u32,
        downvotes: u32,
    ) -> Result<(), StoreError> {
        let voted_by =
            serde_json::to_value(voted_by).map_err(|e| StoreError::Query(e.to_string()))?;

        // Filtered partial write; a missing post matches zero rows.
        PostEntity::update_many()
            .set(post::ActiveModel {
                voted_by: Set(voted_by),
                upvotes: Set(upvotes as i32),
                downvotes: Set(downvotes as i32),
                updated_at: Set(Utc::now().into()),
                ..Default::default()
            })
            .filter(post::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        Ok(())
    }

    async fn update_trending_fields(
        &self,
        id: Uuid,
        day_points: u32,
        point_timestamp: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        PostEntity::update_many()
            .set(post::ActiveModel {
                day_points: Set(day_points as i32),
                point_timestamp: Set(Some(point_timestamp.into())),
                updated_at: Set(Utc::now().into()),
                ..Default::default()
            })
            .filter(post::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        Ok(())
    }
}
