//! Initial budget structure loading from seed.toml
//!
//! A seed file describes one budget with its accounts, categories, and
//! envelopes. Seeding is idempotent: pieces are matched by name and only the
//! missing ones are created, so the file can be re-applied on every startup.

use crate::entities::{Account, Category, Envelope, account, budget, category, envelope};
use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use sea_orm::{Set, TransactionTrait, prelude::*};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Configuration structure representing the entire seed.toml file
#[derive(Debug, Deserialize)]
pub struct SeedConfig {
    /// The budget to create or complete
    pub budget: BudgetSeed,
    /// Accounts to create under the budget
    #[serde(default)]
    pub accounts: Vec<AccountSeed>,
    /// Categories (with their envelopes) to create under the budget
    #[serde(default)]
    pub categories: Vec<CategorySeed>,
}

/// Seed description of the budget itself
#[derive(Debug, Deserialize)]
pub struct BudgetSeed {
    /// Budget name, also the idempotence key
    pub name: String,
    /// ISO currency code, defaults to EUR
    #[serde(default = "default_currency")]
    pub currency: String,
}

/// Seed description of one account
#[derive(Debug, Deserialize)]
pub struct AccountSeed {
    /// Account name, unique within the budget
    pub name: String,
    /// Whether the balance counts toward "available to budget"
    #[serde(default)]
    pub on_budget: bool,
    /// Whether this is an external counterparty account
    #[serde(default)]
    pub external: bool,
    /// Starting balance as a decimal string (e.g., "250.00")
    #[serde(default)]
    pub initial_balance: Option<String>,
}

/// Seed description of one category and its envelopes
#[derive(Debug, Deserialize)]
pub struct CategorySeed {
    /// Category name, unique within the budget
    pub name: String,
    /// Envelope names to create within the category
    #[serde(default)]
    pub envelopes: Vec<String>,
}

fn default_currency() -> String {
    "EUR".to_string()
}

/// Loads a seed configuration from a TOML file
pub fn load_seed<P: AsRef<Path>>(path: P) -> Result<SeedConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read seed file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse seed file: {e}"),
    })
}

/// Applies a seed configuration, creating the budget and any missing
/// accounts, categories, and envelopes by name. Existing pieces are left
/// untouched. The whole pass runs in one transaction.
pub async fn seed_initial_budget(db: &DatabaseConnection, config: &SeedConfig) -> Result<i64> {
    let txn = db.begin().await?;

    let existing = crate::entities::Budget::find()
        .filter(budget::Column::Name.eq(&config.budget.name))
        .one(&txn)
        .await?;

    let budget_id = if let Some(found) = existing {
        debug!("Budget '{}' already exists, completing it.", found.name);
        found.id
    } else {
        info!("Seeding new budget '{}'.", config.budget.name);
        let created = budget::ActiveModel {
            name: Set(config.budget.name.clone()),
            note: Set(String::new()),
            currency: Set(config.budget.currency.clone()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        created.id
    };

    for account_seed in &config.accounts {
        let exists = Account::find()
            .filter(account::Column::BudgetId.eq(budget_id))
            .filter(account::Column::Name.eq(&account_seed.name))
            .one(&txn)
            .await?;
        if exists.is_some() {
            debug!("Account '{}' already exists. Skipping.", account_seed.name);
            continue;
        }

        let initial_balance = match &account_seed.initial_balance {
            Some(text) => Decimal::from_str(text).map_err(|e| Error::Config {
                message: format!("Bad initial_balance for account '{}': {e}", account_seed.name),
            })?,
            None => Decimal::ZERO,
        };

        info!("Seeding account '{}'.", account_seed.name);
        account::ActiveModel {
            budget_id: Set(budget_id),
            name: Set(account_seed.name.clone()),
            note: Set(String::new()),
            on_budget: Set(account_seed.on_budget),
            external: Set(account_seed.external),
            archived: Set(false),
            initial_balance: Set(initial_balance),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    for category_seed in &config.categories {
        let category_id = match Category::find()
            .filter(category::Column::BudgetId.eq(budget_id))
            .filter(category::Column::Name.eq(&category_seed.name))
            .one(&txn)
            .await?
        {
            Some(found) => found.id,
            None => {
                info!("Seeding category '{}'.", category_seed.name);
                category::ActiveModel {
                    budget_id: Set(budget_id),
                    name: Set(category_seed.name.clone()),
                    note: Set(String::new()),
                    archived: Set(false),
                    ..Default::default()
                }
                .insert(&txn)
                .await?
                .id
            }
        };

        for envelope_name in &category_seed.envelopes {
            let exists = Envelope::find()
                .filter(envelope::Column::CategoryId.eq(category_id))
                .filter(envelope::Column::Name.eq(envelope_name))
                .one(&txn)
                .await?;
            if exists.is_some() {
                debug!("Envelope '{envelope_name}' already exists. Skipping.");
                continue;
            }

            info!("Seeding envelope '{envelope_name}'.");
            envelope::ActiveModel {
                category_id: Set(category_id),
                name: Set(envelope_name.clone()),
                note: Set(String::new()),
                archived: Set(false),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
    }

    txn.commit().await?;
    Ok(budget_id)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_test_db;
    use sea_orm::PaginatorTrait;

    const SEED: &str = r#"
        [budget]
        name = "Household"
        currency = "EUR"

        [[accounts]]
        name = "Checking"
        on_budget = true
        initial_balance = "250.00"

        [[accounts]]
        name = "Employer"
        external = true

        [[categories]]
        name = "Daily life"
        envelopes = ["Groceries", "Transport"]
    "#;

    #[test]
    fn test_parse_seed_config() {
        let config: SeedConfig = toml::from_str(SEED).unwrap();
        assert_eq!(config.budget.name, "Household");
        assert_eq!(config.budget.currency, "EUR");
        assert_eq!(config.accounts.len(), 2);
        assert!(config.accounts[0].on_budget);
        assert!(!config.accounts[0].external);
        assert_eq!(config.accounts[0].initial_balance.as_deref(), Some("250.00"));
        assert!(config.accounts[1].external);
        assert_eq!(config.categories.len(), 1);
        assert_eq!(config.categories[0].envelopes.len(), 2);
    }

    #[test]
    fn test_parse_seed_config_defaults_currency() {
        let config: SeedConfig = toml::from_str("[budget]\nname = \"Solo\"\n").unwrap();
        assert_eq!(config.budget.currency, "EUR");
        assert!(config.accounts.is_empty());
        assert!(config.categories.is_empty());
    }

    #[tokio::test]
    async fn test_seed_creates_structure() -> Result<()> {
        let db = setup_test_db().await?;
        let config: SeedConfig = toml::from_str(SEED).unwrap();

        let budget_id = seed_initial_budget(&db, &config).await?;

        let accounts = Account::find()
            .filter(account::Column::BudgetId.eq(budget_id))
            .count(&db)
            .await?;
        assert_eq!(accounts, 2);

        let categories = Category::find()
            .filter(category::Column::BudgetId.eq(budget_id))
            .all(&db)
            .await?;
        assert_eq!(categories.len(), 1);

        let envelopes = Envelope::find()
            .filter(envelope::Column::CategoryId.eq(categories[0].id))
            .count(&db)
            .await?;
        assert_eq!(envelopes, 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let config: SeedConfig = toml::from_str(SEED).unwrap();

        let first = seed_initial_budget(&db, &config).await?;
        let second = seed_initial_budget(&db, &config).await?;
        assert_eq!(first, second);

        let accounts = Account::find().count(&db).await?;
        assert_eq!(accounts, 2);
        let envelopes = Envelope::find().count(&db).await?;
        assert_eq!(envelopes, 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_rejects_bad_initial_balance() -> Result<()> {
        let db = setup_test_db().await?;
        let config: SeedConfig = toml::from_str(
            "[budget]\nname = \"Bad\"\n\n[[accounts]]\nname = \"X\"\ninitial_balance = \"abc\"\n",
        )
        .unwrap();

        let result = seed_initial_budget(&db, &config).await;
        assert!(matches!(result, Err(Error::Config { .. })));

        Ok(())
    }
}
