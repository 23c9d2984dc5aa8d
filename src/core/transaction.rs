//! Transaction business logic - The ledger and its month sums.
//!
//! Besides creation and lookup, this module answers the signed-flow
//! questions the month views are built from: how much moved through an
//! envelope within a month, cumulatively through the end of a month, and how
//! much income a budget received.
//!
//! Sign convention, applied uniformly: an envelope flow is negative when
//! money leaves the budget (destination account is external) and positive
//! when money arrives from outside (source account is external). Transfers
//! between internal accounts do not change envelope totals.

use crate::{
    core::month::Month,
    entities::{Account, Transaction, account, transaction},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, prelude::*};
use std::collections::HashMap;

/// Arguments for recording a new transaction.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    /// Budget the transaction is scoped to
    pub budget_id: i64,
    /// Account the money moves out of
    pub source_account_id: i64,
    /// Account the money moves into
    pub destination_account_id: i64,
    /// Envelope to draw from or fill, if any
    pub envelope_id: Option<i64>,
    /// Positive magnitude of the movement
    pub amount: Decimal,
    /// Day the transaction takes effect
    pub date: NaiveDate,
    /// Free-form note
    pub note: String,
}

/// Records a new transaction after validating its references.
///
/// The amount must be strictly positive (direction is carried by the account
/// pair, not the sign), both accounts must exist within the budget and
/// differ, and the envelope (when given) must exist. Both reconciled flags
/// start out false.
pub async fn create_transaction(
    db: &DatabaseConnection,
    new: NewTransaction,
) -> Result<transaction::Model> {
    if new.amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount { amount: new.amount });
    }
    if new.source_account_id == new.destination_account_id {
        return Err(Error::Validation {
            message: "Source and destination account must differ".to_string(),
        });
    }

    crate::core::budget::get_budget(db, new.budget_id).await?;
    for account_id in [new.source_account_id, new.destination_account_id] {
        let found = crate::core::account::get_account(db, account_id).await?;
        if found.budget_id != new.budget_id {
            return Err(Error::AccountNotFound { id: account_id });
        }
    }
    if let Some(envelope_id) = new.envelope_id {
        crate::core::envelope::get_envelope(db, envelope_id).await?;
    }

    let model = transaction::ActiveModel {
        budget_id: Set(new.budget_id),
        source_account_id: Set(new.source_account_id),
        destination_account_id: Set(new.destination_account_id),
        envelope_id: Set(new.envelope_id),
        amount: Set(new.amount),
        date: Set(new.date),
        note: Set(new.note),
        reconciled_source: Set(false),
        reconciled_destination: Set(false),
        ..Default::default()
    };

    let result = model.insert(db).await?;
    Ok(result)
}

/// Retrieves all transactions tagged with an envelope, newest first.
pub async fn get_transactions_for_envelope(
    db: &DatabaseConnection,
    envelope_id: i64,
) -> Result<Vec<transaction::Model>> {
    Transaction::find()
        .filter(transaction::Column::EnvelopeId.eq(envelope_id))
        .order_by_desc(transaction::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes a transaction by ID.
pub async fn delete_transaction(db: &DatabaseConnection, transaction_id: i64) -> Result<()> {
    let found = Transaction::find_by_id(transaction_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::Validation {
            message: format!("Transaction {transaction_id} not found"),
        })?;

    Transaction::delete_by_id(found.id).exec(db).await?;
    Ok(())
}

/// Signed sum of all envelope flows dated within the month.
pub async fn spent_in_month<C>(db: &C, envelope_id: i64, month: Month) -> Result<Decimal>
where
    C: ConnectionTrait,
{
    let (start, end) = month.date_range()?;
    let flows = Transaction::find()
        .filter(transaction::Column::EnvelopeId.eq(envelope_id))
        .filter(transaction::Column::Date.gte(start))
        .filter(transaction::Column::Date.lt(end))
        .all(db)
        .await?;

    signed_sum(db, &flows).await
}

/// Signed sum of all envelope flows dated up to and including the month.
/// Together with the cumulative allocation sum this yields the running
/// balance without walking months one by one.
pub async fn spent_through<C>(db: &C, envelope_id: i64, month: Month) -> Result<Decimal>
where
    C: ConnectionTrait,
{
    let (_, end) = month.date_range()?;
    let flows = Transaction::find()
        .filter(transaction::Column::EnvelopeId.eq(envelope_id))
        .filter(transaction::Column::Date.lt(end))
        .all(db)
        .await?;

    signed_sum(db, &flows).await
}

/// Sum of a budget's income in a month: transactions arriving from an
/// external account that are not assigned to any envelope.
pub async fn income_in_month(
    db: &DatabaseConnection,
    budget_id: i64,
    month: Month,
) -> Result<Decimal> {
    let (start, end) = month.date_range()?;
    let unassigned = Transaction::find()
        .filter(transaction::Column::BudgetId.eq(budget_id))
        .filter(transaction::Column::EnvelopeId.is_null())
        .filter(transaction::Column::Date.gte(start))
        .filter(transaction::Column::Date.lt(end))
        .all(db)
        .await?;

    let externals = external_flags(db, &unassigned).await?;
    let income = unassigned
        .iter()
        .filter(|t| {
            externals.get(&t.source_account_id).copied().unwrap_or(false)
                && !externals
                    .get(&t.destination_account_id)
                    .copied()
                    .unwrap_or(false)
        })
        .map(|t| t.amount)
        .sum();

    Ok(income)
}

/// Applies the sign convention to a batch of envelope flows.
async fn signed_sum<C>(db: &C, flows: &[transaction::Model]) -> Result<Decimal>
where
    C: ConnectionTrait,
{
    if flows.is_empty() {
        return Ok(Decimal::ZERO);
    }

    let externals = external_flags(db, flows).await?;
    let mut total = Decimal::ZERO;
    for flow in flows {
        let source_external = externals
            .get(&flow.source_account_id)
            .copied()
            .unwrap_or(false);
        let destination_external = externals
            .get(&flow.destination_account_id)
            .copied()
            .unwrap_or(false);

        if destination_external && !source_external {
            total -= flow.amount;
        } else if source_external && !destination_external {
            total += flow.amount;
        }
        // internal transfer: no envelope effect
    }

    Ok(total)
}

/// Maps every account referenced by the given transactions to its
/// `external` flag, in one query.
async fn external_flags<C>(db: &C, flows: &[transaction::Model]) -> Result<HashMap<i64, bool>>
where
    C: ConnectionTrait,
{
    let mut ids: Vec<i64> = flows
        .iter()
        .flat_map(|t| [t.source_account_id, t.destination_account_id])
        .collect();
    ids.sort_unstable();
    ids.dedup();

    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let map = Account::find()
        .filter(account::Column::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|a| (a.id, a.external))
        .collect();

    Ok(map)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{create_test_transaction, income, setup_fixture, spend};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_create_transaction_rejects_non_positive_amount() -> Result<()> {
        let (db, fixture) = setup_fixture().await?;

        for amount in [Decimal::ZERO, dec!(-5.00)] {
            let result = create_transaction(
                &db,
                NewTransaction {
                    budget_id: fixture.budget.id,
                    source_account_id: fixture.checking.id,
                    destination_account_id: fixture.world.id,
                    envelope_id: Some(fixture.groceries.id),
                    amount,
                    date: Month::new(2024, 1).first_day()?,
                    note: String::new(),
                },
            )
            .await;
            assert!(matches!(result, Err(Error::InvalidAmount { .. })));
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_create_transaction_rejects_same_account_twice() -> Result<()> {
        let (db, fixture) = setup_fixture().await?;

        let result = create_transaction(
            &db,
            NewTransaction {
                budget_id: fixture.budget.id,
                source_account_id: fixture.checking.id,
                destination_account_id: fixture.checking.id,
                envelope_id: None,
                amount: dec!(10.00),
                date: Month::new(2024, 1).first_day()?,
                note: String::new(),
            },
        )
        .await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_transaction_rejects_foreign_account() -> Result<()> {
        let (db, fixture) = setup_fixture().await?;
        let other_budget =
            crate::core::budget::create_budget(&db, "Other".to_string(), String::new(), "EUR".to_string())
                .await?;
        let foreign = crate::core::account::create_account(
            &db,
            other_budget.id,
            "Elsewhere".to_string(),
            String::new(),
            true,
            false,
            Decimal::ZERO,
        )
        .await?;

        let result = create_transaction(
            &db,
            NewTransaction {
                budget_id: fixture.budget.id,
                source_account_id: fixture.checking.id,
                destination_account_id: foreign.id,
                envelope_id: None,
                amount: dec!(10.00),
                date: Month::new(2024, 1).first_day()?,
                note: String::new(),
            },
        )
        .await;
        assert!(matches!(result, Err(Error::AccountNotFound { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_transaction_rejects_missing_envelope() -> Result<()> {
        let (db, fixture) = setup_fixture().await?;

        let result = create_transaction(
            &db,
            NewTransaction {
                budget_id: fixture.budget.id,
                source_account_id: fixture.checking.id,
                destination_account_id: fixture.world.id,
                envelope_id: Some(999),
                amount: dec!(10.00),
                date: Month::new(2024, 1).first_day()?,
                note: String::new(),
            },
        )
        .await;
        assert!(matches!(result, Err(Error::EnvelopeNotFound { id: 999 })));

        Ok(())
    }

    #[tokio::test]
    async fn test_spent_in_month_signs_flows() -> Result<()> {
        let (db, fixture) = setup_fixture().await?;
        let month = Month::new(2024, 3);

        // 30.00 out to the world, 12.50 refunded back into the envelope
        spend(&db, &fixture, dec!(30.00), month).await?;
        create_test_transaction(
            &db,
            &fixture,
            fixture.world.id,
            fixture.checking.id,
            Some(fixture.groceries.id),
            dec!(12.50),
            month,
        )
        .await?;

        let spent = spent_in_month(&db, fixture.groceries.id, month).await?;
        assert_eq!(spent, dec!(-17.50));

        Ok(())
    }

    #[tokio::test]
    async fn test_spent_in_month_ignores_internal_transfers() -> Result<()> {
        let (db, fixture) = setup_fixture().await?;
        let month = Month::new(2024, 3);
        let savings = crate::core::account::create_account(
            &db,
            fixture.budget.id,
            "Savings".to_string(),
            String::new(),
            true,
            false,
            Decimal::ZERO,
        )
        .await?;

        create_test_transaction(
            &db,
            &fixture,
            fixture.checking.id,
            savings.id,
            Some(fixture.groceries.id),
            dec!(100.00),
            month,
        )
        .await?;

        let spent = spent_in_month(&db, fixture.groceries.id, month).await?;
        assert_eq!(spent, Decimal::ZERO);

        Ok(())
    }

    #[tokio::test]
    async fn test_spent_through_accumulates_earlier_months() -> Result<()> {
        let (db, fixture) = setup_fixture().await?;

        spend(&db, &fixture, dec!(10.00), Month::new(2024, 1)).await?;
        spend(&db, &fixture, dec!(5.00), Month::new(2024, 2)).await?;
        spend(&db, &fixture, dec!(15.00), Month::new(2024, 4)).await?;

        // The gap month (March) carries the running sum unchanged
        assert_eq!(
            spent_through(&db, fixture.groceries.id, Month::new(2024, 3)).await?,
            dec!(-15.00)
        );
        assert_eq!(
            spent_through(&db, fixture.groceries.id, Month::new(2024, 4)).await?,
            dec!(-30.00)
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_income_counts_unassigned_external_inflows_only() -> Result<()> {
        let (db, fixture) = setup_fixture().await?;
        let month = Month::new(2024, 6);

        income(&db, &fixture, dec!(1500.00), month).await?;
        // Assigned inflow is envelope activity, not income
        create_test_transaction(
            &db,
            &fixture,
            fixture.employer.id,
            fixture.checking.id,
            Some(fixture.groceries.id),
            dec!(50.00),
            month,
        )
        .await?;
        // Spending is not income either
        spend(&db, &fixture, dec!(200.00), month).await?;

        let total = income_in_month(&db, fixture.budget.id, month).await?;
        assert_eq!(total, dec!(1500.00));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_transaction() -> Result<()> {
        let (db, fixture) = setup_fixture().await?;
        let month = Month::new(2024, 1);
        let spend_model = spend(&db, &fixture, dec!(25.00), month).await?;

        delete_transaction(&db, spend_model.id).await?;
        assert_eq!(
            spent_in_month(&db, fixture.groceries.id, month).await?,
            Decimal::ZERO
        );

        let result = delete_transaction(&db, spend_model.id).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        Ok(())
    }
}
