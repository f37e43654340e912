//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use quorum_core::domain::{Post, VoteRecord};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub voted_by: Json,
    pub upvotes: i32,
    pub downvotes: i32,
    pub day_points: i32,
    pub point_timestamp: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to domain Post.
impl From<Model> for Post {
    fn from(model: Model) -> Self {
        // A malformed voted_by document decodes as empty rather than
        // failing the whole read.
        let voted_by: Vec<VoteRecord> =
            serde_json::from_value(model.voted_by).unwrap_or_default();
        Self {
            id: model.id,
            author_id: model.author_id,
            title: model.title,
            body: model.body,
            voted_by,
            upvotes: model.upvotes.max(0) as u32,
            downvotes: model.downvotes.max(0) as u32,
            day_points: model.day_points.max(0) as u32,
            point_timestamp: model.point_timestamp.map(Into::into),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from domain Post to SeaORM ActiveModel.
impl From<Post> for ActiveModel {
    fn from(post: Post) -> Self {
        Self {
            id: Set(post.id),
            author_id: Set(post.author_id),
            title: Set(post.title),
            body: Set(post.body),
            voted_by: Set(serde_json::json!(post.voted_by)),
            upvotes: Set(post.upvotes as i32),
            downvotes: Set(post.downvotes as i32),
            day_points: Set(post.day_points as i32),
            point_timestamp: Set(post.point_timestamp.map(Into::into)),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
        }
    }
}
