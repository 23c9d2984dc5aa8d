//! Transaction entity - A movement of money between two accounts.
//!
//! The amount is always a positive magnitude; direction is given by the
//! source and destination accounts. A transaction may be tagged with an
//! envelope; untagged transactions from external accounts count as income.
//! Each side carries its own reconciled flag.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Budget this transaction is scoped to
    pub budget_id: i64,
    /// Account the money moves out of
    pub source_account_id: i64,
    /// Account the money moves into
    pub destination_account_id: i64,
    /// Envelope this transaction draws from or fills, if any
    pub envelope_id: Option<i64>,
    /// Positive magnitude of the movement
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub amount: Decimal,
    /// Day the transaction took effect
    pub date: Date,
    /// Free-form note
    pub note: String,
    /// Whether the source side has been confirmed against a statement
    pub reconciled_source: bool,
    /// Whether the destination side has been confirmed against a statement
    pub reconciled_destination: bool,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction is scoped to one budget
    #[sea_orm(
        belongs_to = "super::budget::Entity",
        from = "Column::BudgetId",
        to = "super::budget::Column::Id"
    )]
    Budget,
    /// Source side of the movement
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::SourceAccountId",
        to = "super::account::Column::Id"
    )]
    SourceAccount,
    /// Destination side of the movement
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::DestinationAccountId",
        to = "super::account::Column::Id"
    )]
    DestinationAccount,
    /// Envelope tag, when present
    #[sea_orm(
        belongs_to = "super::envelope::Entity",
        from = "Column::EnvelopeId",
        to = "super::envelope::Column::Id"
    )]
    Envelope,
}

impl Related<super::budget::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budget.def()
    }
}

impl Related<super::envelope::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Envelope.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
