//! Allocation business logic - Budgeted amounts per envelope and month.
//!
//! An allocation is the amount budgeted for one envelope in one calendar
//! month; at most one exists per (envelope, month) key. Besides the store
//! operations this module implements the two bulk operations on a month:
//! carry-forward from the previous month and zeroing out.

use crate::{
    core::month::Month,
    entities::{Allocation, allocation, category, envelope},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{Set, TransactionTrait, prelude::*};
use std::str::FromStr;
use tracing::{debug, info};

/// How carry-forward fills a month's missing allocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationMode {
    /// Repeat the previous month's allocation amount
    LastMonthBudget,
    /// Budget exactly what was spent in the previous month
    LastMonthSpend,
}

impl AllocationMode {
    /// The wire name of this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LastMonthBudget => "ALLOCATE_LAST_MONTH_BUDGET",
            Self::LastMonthSpend => "ALLOCATE_LAST_MONTH_SPEND",
        }
    }
}

impl FromStr for AllocationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ALLOCATE_LAST_MONTH_BUDGET" => Ok(Self::LastMonthBudget),
            "ALLOCATE_LAST_MONTH_SPEND" => Ok(Self::LastMonthSpend),
            other => Err(Error::InvalidAllocationMode {
                mode: other.to_string(),
            }),
        }
    }
}

/// Creates an allocation for an (envelope, month) key that must not be
/// occupied yet; the upsert-free creation path an API POST maps to.
pub async fn create_allocation(
    db: &DatabaseConnection,
    envelope_id: i64,
    month: Month,
    amount: Decimal,
    note: String,
) -> Result<allocation::Model> {
    let first_day = month.first_day()?;
    crate::core::envelope::get_envelope(db, envelope_id).await?;

    if get_allocation(db, envelope_id, month).await?.is_some() {
        return Err(Error::AllocationExists { envelope_id, month });
    }

    let model = allocation::ActiveModel {
        envelope_id: Set(envelope_id),
        month: Set(first_day),
        amount: Set(amount),
        note: Set(note),
        ..Default::default()
    };

    let result = model.insert(db).await?;
    Ok(result)
}

/// Finds the allocation for an (envelope, month) key, if any.
pub async fn get_allocation<C>(
    db: &C,
    envelope_id: i64,
    month: Month,
) -> Result<Option<allocation::Model>>
where
    C: ConnectionTrait,
{
    let first_day = month.first_day()?;
    Allocation::find()
        .filter(allocation::Column::EnvelopeId.eq(envelope_id))
        .filter(allocation::Column::Month.eq(first_day))
        .one(db)
        .await
        .map_err(Into::into)
}

/// The amount allocated to an envelope in a month; zero when no allocation
/// exists (which is not an error).
pub async fn amount_for_month<C>(db: &C, envelope_id: i64, month: Month) -> Result<Decimal>
where
    C: ConnectionTrait,
{
    Ok(get_allocation(db, envelope_id, month)
        .await?
        .map_or(Decimal::ZERO, |a| a.amount))
}

/// Sum of all allocations for an envelope up to and including the month.
/// Together with the cumulative signed spend this yields the running balance.
pub async fn allocated_through<C>(db: &C, envelope_id: i64, month: Month) -> Result<Decimal>
where
    C: ConnectionTrait,
{
    let first_day = month.first_day()?;
    let rows = Allocation::find()
        .filter(allocation::Column::EnvelopeId.eq(envelope_id))
        .filter(allocation::Column::Month.lte(first_day))
        .all(db)
        .await?;

    Ok(rows.iter().map(|a| a.amount).sum())
}

/// Updates an existing allocation's amount and, when given, its note.
pub async fn update_allocation(
    db: &DatabaseConnection,
    allocation_id: i64,
    amount: Decimal,
    note: Option<String>,
) -> Result<allocation::Model> {
    let found = Allocation::find_by_id(allocation_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::Validation {
            message: format!("Allocation {allocation_id} not found"),
        })?;

    let mut active: allocation::ActiveModel = found.into();
    active.amount = Set(amount);
    if let Some(note) = note {
        active.note = Set(note);
    }
    active.update(db).await.map_err(Into::into)
}

/// Deletes a single allocation by ID.
pub async fn delete_allocation(db: &DatabaseConnection, allocation_id: i64) -> Result<()> {
    let found = Allocation::find_by_id(allocation_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::Validation {
            message: format!("Allocation {allocation_id} not found"),
        })?;

    Allocation::delete_by_id(found.id).exec(db).await?;
    Ok(())
}

/// Lists every allocation with a nonzero amount across a budget's envelopes
/// for the given month.
pub async fn list_nonzero_allocations<C>(
    db: &C,
    budget_id: i64,
    month: Month,
) -> Result<Vec<allocation::Model>>
where
    C: ConnectionTrait,
{
    let first_day = month.first_day()?;

    let envelope_ids = envelope_ids_for_budget(db, budget_id).await?;
    if envelope_ids.is_empty() {
        return Ok(Vec::new());
    }

    Allocation::find()
        .filter(allocation::Column::EnvelopeId.is_in(envelope_ids))
        .filter(allocation::Column::Month.eq(first_day))
        .filter(allocation::Column::Amount.ne(Decimal::ZERO))
        .all(db)
        .await
        .map_err(Into::into)
}

/// IDs of every envelope of the budget, archived included, via category
/// ownership.
async fn envelope_ids_for_budget<C>(db: &C, budget_id: i64) -> Result<Vec<i64>>
where
    C: ConnectionTrait,
{
    let category_ids: Vec<i64> = crate::entities::Category::find()
        .filter(category::Column::BudgetId.eq(budget_id))
        .all(db)
        .await?
        .into_iter()
        .map(|c| c.id)
        .collect();
    if category_ids.is_empty() {
        return Ok(Vec::new());
    }

    let ids = crate::entities::Envelope::find()
        .filter(envelope::Column::CategoryId.is_in(category_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|e| e.id)
        .collect();
    Ok(ids)
}

/// Creates or updates the allocation for an (envelope, month) key.
pub async fn upsert_allocation<C>(
    db: &C,
    envelope_id: i64,
    month: Month,
    amount: Decimal,
    note: String,
) -> Result<allocation::Model>
where
    C: ConnectionTrait,
{
    let first_day = month.first_day()?;

    if let Some(existing) = get_allocation(db, envelope_id, month).await? {
        let mut active: allocation::ActiveModel = existing.into();
        active.amount = Set(amount);
        active.note = Set(note);
        return active.update(db).await.map_err(Into::into);
    }

    let model = allocation::ActiveModel {
        envelope_id: Set(envelope_id),
        month: Set(first_day),
        amount: Set(amount),
        note: Set(note),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Pre-fills a month's allocations from the previous month, for every
/// non-archived envelope of the budget that had a nonzero allocation then
/// and has no nonzero allocation yet: gaps are filled, existing amounts are
/// never overwritten, so re-running is a no-op.
///
/// `LastMonthBudget` repeats the previous amount; `LastMonthSpend` budgets
/// the negated signed spend of the previous month. The whole batch runs in
/// one transaction.
pub async fn copy_allocations(
    db: &DatabaseConnection,
    budget_id: i64,
    target: Month,
    mode: AllocationMode,
) -> Result<usize> {
    target.first_day()?;
    crate::core::budget::get_budget(db, budget_id).await?;
    let source = target.add_months(-1);

    let txn = db.begin().await?;

    // Only envelopes that are still active take part; the source allocations
    // of archived ones stay where they are.
    let envelopes = crate::core::envelope::list_active_envelopes_for_budget(&txn, budget_id).await?;
    let source_allocations = list_nonzero_allocations(&txn, budget_id, source).await?;

    let mut filled = 0;
    for env in &envelopes {
        let Some(source_allocation) = source_allocations
            .iter()
            .find(|a| a.envelope_id == env.id)
        else {
            continue;
        };
        if let Some(existing) = get_allocation(&txn, env.id, target).await? {
            if !existing.amount.is_zero() {
                debug!(
                    "Envelope {} already has an allocation for {}. Skipping.",
                    env.id, target
                );
                continue;
            }
        }

        let amount = match mode {
            AllocationMode::LastMonthBudget => source_allocation.amount,
            AllocationMode::LastMonthSpend => {
                -crate::core::transaction::spent_in_month(&txn, env.id, source).await?
            }
        };

        upsert_allocation(&txn, env.id, target, amount, String::new()).await?;
        filled += 1;
    }

    txn.commit().await?;

    info!(
        "Carry-forward {} for budget {} into {}: filled {} envelopes.",
        mode.as_str(),
        budget_id,
        target,
        filled
    );
    Ok(filled)
}

/// Sets every allocation amount of the budget's envelopes for the given
/// month to zero. Rows are kept; only the observable amount changes.
pub async fn zero_out_allocations(
    db: &DatabaseConnection,
    budget_id: i64,
    month: Month,
) -> Result<u64> {
    let first_day = month.first_day()?;
    crate::core::budget::get_budget(db, budget_id).await?;

    let envelope_ids = envelope_ids_for_budget(db, budget_id).await?;
    if envelope_ids.is_empty() {
        return Ok(0);
    }

    let result = Allocation::update_many()
        .col_expr(allocation::Column::Amount, Expr::value(Decimal::ZERO))
        .filter(allocation::Column::EnvelopeId.is_in(envelope_ids))
        .filter(allocation::Column::Month.eq(first_day))
        .exec(db)
        .await?;

    info!(
        "Zeroed {} allocations of budget {} for {}.",
        result.rows_affected, budget_id, month
    );
    Ok(result.rows_affected)
}
