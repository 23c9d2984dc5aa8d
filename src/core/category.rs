//! Category business logic - Groups envelopes within a budget.

use crate::{
    entities::{Category, category},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Creates a new category under an existing budget.
pub async fn create_category(
    db: &DatabaseConnection,
    budget_id: i64,
    name: String,
    note: String,
) -> Result<category::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Category name cannot be empty".to_string(),
        });
    }

    // The budget must exist; a dangling category would never show up in any
    // month view.
    crate::core::budget::get_budget(db, budget_id).await?;

    let model = category::ActiveModel {
        budget_id: Set(budget_id),
        name: Set(name.trim().to_string()),
        note: Set(note),
        archived: Set(false),
        ..Default::default()
    };

    let result = model.insert(db).await?;
    Ok(result)
}

/// Finds a category by its unique ID.
pub async fn get_category(db: &DatabaseConnection, category_id: i64) -> Result<category::Model> {
    Category::find_by_id(category_id)
        .one(db)
        .await?
        .ok_or(Error::CategoryNotFound { id: category_id })
}

/// Retrieves all categories of a budget, ordered alphabetically by name.
pub async fn list_categories_for_budget(
    db: &DatabaseConnection,
    budget_id: i64,
) -> Result<Vec<category::Model>> {
    Category::find()
        .filter(category::Column::BudgetId.eq(budget_id))
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}
