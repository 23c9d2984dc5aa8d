//! Account entity - A source or destination of money within a budget.
//!
//! On-budget internal accounts count toward the "available to budget" figure;
//! external accounts model counterparties outside the tracked budget
//! (merchants, employers) and are used to recognize income and expenses.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    /// Unique identifier for the account
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Budget this account belongs to
    pub budget_id: i64,
    /// Human-readable name of the account (e.g., "Checking")
    pub name: String,
    /// Free-form note
    pub note: String,
    /// Whether the account balance counts toward "available to budget"
    pub on_budget: bool,
    /// Whether the account is a counterparty outside the tracked budget
    pub external: bool,
    /// Archived accounts are hidden from pickers but keep their history
    pub archived: bool,
    /// Balance the account started with before any recorded transaction
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub initial_balance: Decimal,
}

/// Defines relationships between Account and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each account belongs to one budget
    #[sea_orm(
        belongs_to = "super::budget::Entity",
        from = "Column::BudgetId",
        to = "super::budget::Column::Id"
    )]
    Budget,
}

impl Related<super::budget::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budget.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
