//! SeaORM-based drink name repository

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;

use crate::entities::{drink_name, prelude::DrinkName as DrinkNames};
use crate::errors::RepositoryResult;
use crate::models::{CreateDrinkNameRequest, DrinkName};

#[derive(Clone)]
pub struct DrinkNameSeaOrmRepository {
    connection: Arc<DatabaseConnection>,
}

impl DrinkNameSeaOrmRepository {
    pub fn new(connection: Arc<DatabaseConnection>) -> Self {
        Self { connection }
    }

    /// Drink names in alphabetic (sortname) order
    pub async fn list_all(&self, common_only: bool) -> RepositoryResult<Vec<DrinkName>> {
        let mut query = DrinkNames::find();
        if common_only {
            query = query.filter(drink_name::Column::IsCommon.eq(true));
        }

        let models = query
            .order_by_asc(drink_name::Column::Sortname)
            .order_by_asc(drink_name::Column::Id)
            .all(&*self.connection)
            .await?;

        Ok(models.into_iter().map(Self::model_to_domain).collect())
    }

    pub async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<DrinkName>> {
        let model = DrinkNames::find_by_id(id).one(&*self.connection).await?;
        Ok(model.map(Self::model_to_domain))
    }

    pub async fn create(&self, request: CreateDrinkNameRequest) -> RepositoryResult<DrinkName> {
        let active_model = drink_name::ActiveModel {
            id: NotSet,
            sortname: Set(request.resolved_sortname()),
            name: Set(request.name.trim().to_string()),
            is_common: Set(request.is_common),
        };

        let model = active_model.insert(&*self.connection).await?;
        Ok(Self::model_to_domain(model))
    }

    fn model_to_domain(model: drink_name::Model) -> DrinkName {
        DrinkName {
            id: model.id,
            name: model.name,
            sortname: model.sortname,
            is_common: model.is_common,
        }
    }
}
