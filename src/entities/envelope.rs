//! Envelope entity - A sub-budget bucket within a category.
//!
//! Envelopes accumulate monthly allocations and transaction flows. Their
//! per-month spent/balance/allocation figures are derived on read by
//! [`crate::core::monthly`] and never persisted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Envelope database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "envelopes")]
pub struct Model {
    /// Unique identifier for the envelope
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Category this envelope belongs to
    pub category_id: i64,
    /// Human-readable name of the envelope (e.g., "Groceries")
    pub name: String,
    /// Free-form note
    pub note: String,
    /// Archived envelopes are excluded from month views and carry-forward
    pub archived: bool,
}

/// Defines relationships between Envelope and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each envelope belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    /// One envelope has many allocations (one per month at most)
    #[sea_orm(has_many = "super::allocation::Entity")]
    Allocations,
    /// One envelope has many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::allocation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Allocations.def()
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
