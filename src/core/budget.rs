//! Budget business logic - Handles budget-level operations.

use crate::{
    entities::{Budget, budget},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Creates a new budget with the given name and currency.
pub async fn create_budget(
    db: &DatabaseConnection,
    name: String,
    note: String,
    currency: String,
) -> Result<budget::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Budget name cannot be empty".to_string(),
        });
    }

    let model = budget::ActiveModel {
        name: Set(name.trim().to_string()),
        note: Set(note),
        currency: Set(currency),
        ..Default::default()
    };

    let result = model.insert(db).await?;
    Ok(result)
}

/// Finds a budget by its unique ID.
pub async fn get_budget(db: &DatabaseConnection, budget_id: i64) -> Result<budget::Model> {
    Budget::find_by_id(budget_id)
        .one(db)
        .await?
        .ok_or(Error::BudgetNotFound { id: budget_id })
}

/// Retrieves all budgets, ordered alphabetically by name.
pub async fn list_budgets(db: &DatabaseConnection) -> Result<Vec<budget::Model>> {
    Budget::find()
        .order_by_asc(budget::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_create_and_get_budget() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create_budget(
            &db,
            "Household".to_string(),
            String::new(),
            "EUR".to_string(),
        )
        .await?;
        assert_eq!(created.name, "Household");
        assert_eq!(created.currency, "EUR");

        let fetched = get_budget(&db, created.id).await?;
        assert_eq!(fetched, created);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_budget_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = get_budget(&db, 999).await;
        assert!(matches!(result, Err(Error::BudgetNotFound { id: 999 })));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_budget_rejects_empty_name() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_budget(&db, "   ".to_string(), String::new(), "EUR".to_string()).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_list_budgets_ordered_by_name() -> Result<()> {
        let db = setup_test_db().await?;

        create_budget(&db, "Zeta".to_string(), String::new(), "EUR".to_string()).await?;
        create_budget(&db, "Alpha".to_string(), String::new(), "USD".to_string()).await?;

        let budgets = list_budgets(&db).await?;
        assert_eq!(budgets.len(), 2);
        assert_eq!(budgets[0].name, "Alpha");
        assert_eq!(budgets[1].name, "Zeta");

        Ok(())
    }
}
