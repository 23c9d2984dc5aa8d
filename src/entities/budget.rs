//! Budget entity - The root aggregate of the budgeting system.
//!
//! A budget owns accounts and categories (and, through categories, envelopes)
//! and is the scope for transactions and month reports.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Budget database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    /// Unique identifier for the budget
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable name of the budget (e.g., "Household")
    pub name: String,
    /// Free-form note
    pub note: String,
    /// ISO currency code the budget is kept in (e.g., "EUR")
    pub currency: String,
}

/// Defines relationships between Budget and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One budget has many accounts
    #[sea_orm(has_many = "super::account::Entity")]
    Accounts,
    /// One budget has many categories
    #[sea_orm(has_many = "super::category::Entity")]
    Categories,
    /// One budget scopes many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
