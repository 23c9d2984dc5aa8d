//! Database configuration module.
//!
//! This module handles `SQLite` database connection and table creation using
//! `SeaORM`. Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the database schema always matches
//! the Rust struct definitions without requiring manual SQL.

use crate::entities::{Account, Allocation, Budget, Category, Envelope, Transaction};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Establishes a connection to the database named by `database_url`.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all necessary database tables from the entity definitions.
///
/// Safe to call on a fresh database only; existing tables make the
/// underlying `CREATE TABLE` statements fail.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let budget_table = schema.create_table_from_entity(Budget);
    let account_table = schema.create_table_from_entity(Account);
    let category_table = schema.create_table_from_entity(Category);
    let envelope_table = schema.create_table_from_entity(Envelope);
    let allocation_table = schema.create_table_from_entity(Allocation);
    let transaction_table = schema.create_table_from_entity(Transaction);

    db.execute(builder.build(&budget_table)).await?;
    db.execute(builder.build(&account_table)).await?;
    db.execute(builder.build(&category_table)).await?;
    db.execute(builder.build(&envelope_table)).await?;
    db.execute(builder.build(&allocation_table)).await?;
    db.execute(builder.build(&transaction_table)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        AccountModel, AllocationModel, BudgetModel, CategoryModel, EnvelopeModel, TransactionModel,
    };
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_connection_in_memory() -> Result<()> {
        let db = create_connection("sqlite::memory:").await?;
        create_tables(&db).await?;

        let _: Vec<BudgetModel> = Budget::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = create_connection("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Every table exists and is queryable
        let _: Vec<BudgetModel> = Budget::find().limit(1).all(&db).await?;
        let _: Vec<AccountModel> = Account::find().limit(1).all(&db).await?;
        let _: Vec<CategoryModel> = Category::find().limit(1).all(&db).await?;
        let _: Vec<EnvelopeModel> = Envelope::find().limit(1).all(&db).await?;
        let _: Vec<AllocationModel> = Allocation::find().limit(1).all(&db).await?;
        let _: Vec<TransactionModel> = Transaction::find().limit(1).all(&db).await?;

        Ok(())
    }
}
