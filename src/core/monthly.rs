//! Monthly aggregation business logic.
//!
//! Computes the derived month views: per-envelope spent/balance/allocation,
//! category sums over their envelopes, and the budget-level report with
//! income and "available to budget". Nothing here is persisted; every figure
//! is derived from the allocation store and the transaction ledger at call
//! time.
//!
//! Balances follow the recurrence
//! `balance(M) = balance(M-1) + allocation(M) + spent(M)` with a zero base
//! case, but are computed as cumulative sums (all allocations up to the
//! month plus all signed flows up to the end of the month) so months with no
//! activity carry the running balance without walking month by month.

use crate::{
    core::month::Month,
    entities::{budget, category, envelope},
    errors::Result,
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, prelude::*};
use serde::Serialize;

/// One envelope's derived figures for one month.
#[derive(Debug, Clone, Serialize)]
pub struct EnvelopeMonth {
    /// The envelope being reported on
    pub envelope: envelope::Model,
    /// The month being reported on
    pub month: Month,
    /// Signed flow within the month (outflows negative)
    pub spent: Decimal,
    /// Running balance at the end of the month
    pub balance: Decimal,
    /// Amount allocated for the month (zero when none)
    pub allocation: Decimal,
}

/// One category's envelopes and their sums for one month.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryMonth {
    /// The category being reported on
    pub category: category::Model,
    /// Signed flow of all envelopes within the month
    pub spent: Decimal,
    /// Sum of the envelopes' running balances
    pub balance: Decimal,
    /// Sum of the envelopes' allocations
    pub allocation: Decimal,
    /// Per-envelope breakdown, ordered by envelope name
    pub envelopes: Vec<EnvelopeMonth>,
}

/// A budget's complete month view.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetMonth {
    /// The budget being reported on
    pub budget: budget::Model,
    /// The month being reported on
    pub month: Month,
    /// Unassigned inflows from external accounts within the month
    pub income: Decimal,
    /// On-budget account balances minus envelope balances
    pub available: Decimal,
    /// Sum of all envelope allocations for the month
    pub allocated: Decimal,
    /// Sum of all envelope running balances
    pub balance: Decimal,
    /// Signed flow of all envelopes within the month
    pub spent: Decimal,
    /// Per-category breakdown, ordered by category name
    pub categories: Vec<CategoryMonth>,
}

/// Computes one envelope's spent/balance/allocation for one month.
pub async fn envelope_month(
    db: &DatabaseConnection,
    envelope_id: i64,
    month: Month,
) -> Result<EnvelopeMonth> {
    month.first_day()?;
    let envelope = crate::core::envelope::get_envelope(db, envelope_id).await?;

    let (spent, balance, allocation) = month_figures(db, envelope.id, month).await?;
    Ok(EnvelopeMonth {
        envelope,
        month,
        spent,
        balance,
        allocation,
    })
}

/// Computes a budget's complete month view: income, per-category and
/// per-envelope breakdowns, and the "available to budget" figure.
///
/// Available is computed over two independent ledger paths on purpose: the
/// on-budget account balances track all money in the budget, the envelope
/// balances track the assigned share; their difference is what is left to
/// assign.
pub async fn budget_month(
    db: &DatabaseConnection,
    budget_id: i64,
    month: Month,
) -> Result<BudgetMonth> {
    month.first_day()?;
    let budget = crate::core::budget::get_budget(db, budget_id).await?;

    let income = crate::core::transaction::income_in_month(db, budget.id, month).await?;

    let categories = crate::entities::Category::find()
        .filter(category::Column::BudgetId.eq(budget.id))
        .filter(category::Column::Archived.eq(false))
        .order_by_asc(category::Column::Name)
        .all(db)
        .await?;

    let mut category_months = Vec::with_capacity(categories.len());
    let mut budget_spent = Decimal::ZERO;
    let mut budget_balance = Decimal::ZERO;
    let mut budget_allocated = Decimal::ZERO;

    for cat in categories {
        let envelopes = crate::entities::Envelope::find()
            .filter(envelope::Column::CategoryId.eq(cat.id))
            .filter(envelope::Column::Archived.eq(false))
            .order_by_asc(envelope::Column::Name)
            .all(db)
            .await?;

        let mut envelope_months = Vec::with_capacity(envelopes.len());
        let mut category_spent = Decimal::ZERO;
        let mut category_balance = Decimal::ZERO;
        let mut category_allocation = Decimal::ZERO;

        for env in envelopes {
            let (spent, balance, allocation) = month_figures(db, env.id, month).await?;
            category_spent += spent;
            category_balance += balance;
            category_allocation += allocation;
            envelope_months.push(EnvelopeMonth {
                envelope: env,
                month,
                spent,
                balance,
                allocation,
            });
        }

        budget_spent += category_spent;
        budget_balance += category_balance;
        budget_allocated += category_allocation;
        category_months.push(CategoryMonth {
            category: cat,
            spent: category_spent,
            balance: category_balance,
            allocation: category_allocation,
            envelopes: envelope_months,
        });
    }

    let mut available = -budget_balance;
    let accounts = crate::core::account::list_accounts_for_budget(db, budget.id).await?;
    for account in accounts.iter().filter(|a| a.on_budget && !a.external) {
        let balances = crate::core::account::balance_as_of_month(db, account.id, month).await?;
        available += balances.balance;
    }

    Ok(BudgetMonth {
        budget,
        month,
        income,
        available,
        allocated: budget_allocated,
        balance: budget_balance,
        spent: budget_spent,
        categories: category_months,
    })
}

/// The (spent, balance, allocation) triple for one envelope and month.
async fn month_figures(
    db: &DatabaseConnection,
    envelope_id: i64,
    month: Month,
) -> Result<(Decimal, Decimal, Decimal)> {
    let allocation = crate::core::allocation::amount_for_month(db, envelope_id, month).await?;
    let spent = crate::core::transaction::spent_in_month(db, envelope_id, month).await?;

    let allocated = crate::core::allocation::allocated_through(db, envelope_id, month).await?;
    let flowed = crate::core::transaction::spent_through(db, envelope_id, month).await?;
    let balance = allocated + flowed;

    Ok((spent, balance, allocation))
}
