//! Blend log entity
//!
//! Rows are append-only. `recipe` keeps the pair list exactly as submitted,
//! `recipe_key` is the digest of the canonical pair set and carries the
//! unique index.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "blend_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// JSON array of `[slot, amount]` pairs
    #[sea_orm(column_type = "Text")]
    pub recipe: String,
    #[sea_orm(unique)]
    pub recipe_key: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
