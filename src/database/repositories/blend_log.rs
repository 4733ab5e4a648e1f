//! SeaORM-based blend log repository

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::debug;

use super::traits::BlendLogStore;
use crate::entities::{blend_log, prelude::BlendLog};
use crate::errors::{RepositoryError, RepositoryResult};
use crate::models::{BlendEntry, Recipe};

const RECIPE_KEY_CONSTRAINT: &str = "idx_blend_log_recipe_key";

/// SeaORM-based repository for the blend log
#[derive(Clone)]
pub struct BlendLogSeaOrmRepository {
    connection: Arc<DatabaseConnection>,
}

impl BlendLogSeaOrmRepository {
    pub fn new(connection: Arc<DatabaseConnection>) -> Self {
        Self { connection }
    }

    fn model_to_domain(model: blend_log::Model) -> BlendEntry {
        BlendEntry {
            id: model.id,
            recipe: model.recipe,
            recipe_key: model.recipe_key,
            created_at: model.created_at,
        }
    }
}

#[async_trait::async_trait]
impl BlendLogStore for BlendLogSeaOrmRepository {
    async fn list_all(&self) -> RepositoryResult<Vec<BlendEntry>> {
        let models = BlendLog::find()
            .order_by_asc(blend_log::Column::Id)
            .all(&*self.connection)
            .await?;

        Ok(models.into_iter().map(Self::model_to_domain).collect())
    }

    async fn append(&self, recipe: &Recipe) -> RepositoryResult<BlendEntry> {
        let active_model = blend_log::ActiveModel {
            id: NotSet,
            recipe: Set(recipe.encode()?),
            recipe_key: Set(recipe.recipe_key()),
            created_at: Set(chrono::Utc::now()),
        };

        let model = active_model
            .insert(&*self.connection)
            .await
            .map_err(|e| RepositoryError::from_db_err(e, RECIPE_KEY_CONSTRAINT))?;

        debug!(id = model.id, recipe = %model.recipe, "Stored blend");
        Ok(Self::model_to_domain(model))
    }

    async fn find_by_recipe_key(&self, recipe_key: &str) -> RepositoryResult<Option<BlendEntry>> {
        let model = BlendLog::find()
            .filter(blend_log::Column::RecipeKey.eq(recipe_key))
            .one(&*self.connection)
            .await?;

        Ok(model.map(Self::model_to_domain))
    }

    async fn count(&self) -> RepositoryResult<u64> {
        Ok(BlendLog::find().count(&*self.connection).await?)
    }
}
