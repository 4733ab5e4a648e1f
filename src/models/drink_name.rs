use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::{AppError, AppResult};

/// Name of a drink, complete with a sortname
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DrinkName {
    pub id: i32,
    pub name: String,
    pub sortname: String,
    pub is_common: bool,
}

impl std::fmt::Display for DrinkName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<DrinkName({},'{}')>", self.id, self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateDrinkNameRequest {
    pub name: String,
    /// Defaults to `name`
    #[serde(default)]
    pub sortname: Option<String>,
    #[serde(default)]
    pub is_common: bool,
}

impl CreateDrinkNameRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Drink name must not be empty"));
        }
        if self.sortname.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(AppError::validation("Drink sortname must not be blank"));
        }
        Ok(())
    }

    pub fn resolved_sortname(&self) -> String {
        self.sortname
            .clone()
            .unwrap_or_else(|| self.name.clone())
            .trim()
            .to_string()
    }
}
