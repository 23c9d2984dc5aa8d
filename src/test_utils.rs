//! Shared test utilities for `budgetbook`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults. The standard fixture is
//! one budget with an on-budget checking account, two external counterparties
//! (a merchant and an employer), and one category holding one envelope.

use crate::{
    core::month::Month,
    core::transaction::NewTransaction,
    entities::{AccountModel, BudgetModel, CategoryModel, EnvelopeModel, TransactionModel},
    errors::Result,
};
use chrono::Datelike;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;

/// Initializes tracing for a test, writing through the test harness.
/// Calling it from several tests is fine; only the first call wins.
#[allow(dead_code)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test budget named "Test Budget" in EUR.
pub async fn create_test_budget(db: &DatabaseConnection) -> Result<BudgetModel> {
    crate::core::budget::create_budget(
        db,
        "Test Budget".to_string(),
        String::new(),
        "EUR".to_string(),
    )
    .await
}

/// Creates a test category with the given name.
pub async fn create_test_category(
    db: &DatabaseConnection,
    budget_id: i64,
    name: &str,
) -> Result<CategoryModel> {
    crate::core::category::create_category(db, budget_id, name.to_string(), String::new()).await
}

/// Creates a test envelope with the given name.
pub async fn create_test_envelope(
    db: &DatabaseConnection,
    category_id: i64,
    name: &str,
) -> Result<EnvelopeModel> {
    crate::core::envelope::create_envelope(db, category_id, name.to_string(), String::new()).await
}

/// The standard test universe: one budget, one on-budget checking account,
/// two external accounts, one category with one envelope.
#[derive(Debug, Clone)]
pub struct Fixture {
    /// The budget everything below belongs to
    pub budget: BudgetModel,
    /// On-budget internal account holding the money
    pub checking: AccountModel,
    /// External counterparty money is spent to
    pub world: AccountModel,
    /// External counterparty income arrives from
    pub employer: AccountModel,
    /// The single category
    pub daily: CategoryModel,
    /// The single envelope, in `daily`
    pub groceries: EnvelopeModel,
}

/// Sets up a complete test environment.
/// Returns (db, fixture) for common test scenarios.
pub async fn setup_fixture() -> Result<(DatabaseConnection, Fixture)> {
    let db = setup_test_db().await?;
    let budget = create_test_budget(&db).await?;

    let checking = crate::core::account::create_account(
        &db,
        budget.id,
        "Checking".to_string(),
        String::new(),
        true,  // on_budget
        false, // external
        Decimal::ZERO,
    )
    .await?;
    let world = crate::core::account::create_account(
        &db,
        budget.id,
        "The World".to_string(),
        String::new(),
        false,
        true, // external
        Decimal::ZERO,
    )
    .await?;
    let employer = crate::core::account::create_account(
        &db,
        budget.id,
        "Employer".to_string(),
        String::new(),
        false,
        true, // external
        Decimal::ZERO,
    )
    .await?;

    let daily = create_test_category(&db, budget.id, "Daily life").await?;
    let groceries = create_test_envelope(&db, daily.id, "Groceries").await?;

    let fixture = Fixture {
        budget,
        checking,
        world,
        employer,
        daily,
        groceries,
    };
    Ok((db, fixture))
}

/// Records a transaction between two fixture accounts, dated mid-month.
pub async fn create_test_transaction(
    db: &DatabaseConnection,
    fixture: &Fixture,
    source_account_id: i64,
    destination_account_id: i64,
    envelope_id: Option<i64>,
    amount: Decimal,
    month: Month,
) -> Result<TransactionModel> {
    let date = month
        .first_day()?
        .with_day(15)
        .expect("every month has a 15th");

    crate::core::transaction::create_transaction(
        db,
        NewTransaction {
            budget_id: fixture.budget.id,
            source_account_id,
            destination_account_id,
            envelope_id,
            amount,
            date,
            note: "Test transaction".to_string(),
        },
    )
    .await
}

/// Records a spend from the groceries envelope: checking → world.
pub async fn spend(
    db: &DatabaseConnection,
    fixture: &Fixture,
    amount: Decimal,
    month: Month,
) -> Result<TransactionModel> {
    create_test_transaction(
        db,
        fixture,
        fixture.checking.id,
        fixture.world.id,
        Some(fixture.groceries.id),
        amount,
        month,
    )
    .await
}

/// Records unassigned income: employer → checking, no envelope.
pub async fn income(
    db: &DatabaseConnection,
    fixture: &Fixture,
    amount: Decimal,
    month: Month,
) -> Result<TransactionModel> {
    create_test_transaction(
        db,
        fixture,
        fixture.employer.id,
        fixture.checking.id,
        None,
        amount,
        month,
    )
    .await
}
