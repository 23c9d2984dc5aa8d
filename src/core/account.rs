//! Account business logic - Accounts and their ledger-derived balances.

use crate::{
    core::month::Month,
    entities::{Account, Transaction, account, transaction},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, prelude::*};

/// An account's balance as of the end of a month, with its reconciled
/// counterpart (only transaction sides confirmed against a statement).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountBalance {
    /// Initial balance plus all flows dated up to the end of the month
    pub balance: Decimal,
    /// Same, counting only reconciled transaction sides
    pub reconciled_balance: Decimal,
}

/// Creates a new account under an existing budget.
pub async fn create_account(
    db: &DatabaseConnection,
    budget_id: i64,
    name: String,
    note: String,
    on_budget: bool,
    external: bool,
    initial_balance: Decimal,
) -> Result<account::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Account name cannot be empty".to_string(),
        });
    }

    crate::core::budget::get_budget(db, budget_id).await?;

    let model = account::ActiveModel {
        budget_id: Set(budget_id),
        name: Set(name.trim().to_string()),
        note: Set(note),
        on_budget: Set(on_budget),
        external: Set(external),
        archived: Set(false),
        initial_balance: Set(initial_balance),
        ..Default::default()
    };

    let result = model.insert(db).await?;
    Ok(result)
}

/// Finds an account by its unique ID.
pub async fn get_account(db: &DatabaseConnection, account_id: i64) -> Result<account::Model> {
    Account::find_by_id(account_id)
        .one(db)
        .await?
        .ok_or(Error::AccountNotFound { id: account_id })
}

/// Retrieves all accounts of a budget, ordered alphabetically by name.
pub async fn list_accounts_for_budget(
    db: &DatabaseConnection,
    budget_id: i64,
) -> Result<Vec<account::Model>> {
    Account::find()
        .filter(account::Column::BudgetId.eq(budget_id))
        .order_by_asc(account::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Computes an account's balance as of the end of the given month from the
/// transaction ledger: initial balance, plus everything received, minus
/// everything sent, dated before the first day of the following month.
pub async fn balance_as_of_month(
    db: &DatabaseConnection,
    account_id: i64,
    month: Month,
) -> Result<AccountBalance> {
    let account = get_account(db, account_id).await?;
    let (_, end) = month.date_range()?;

    let incoming = Transaction::find()
        .filter(transaction::Column::DestinationAccountId.eq(account.id))
        .filter(transaction::Column::Date.lt(end))
        .all(db)
        .await?;
    let outgoing = Transaction::find()
        .filter(transaction::Column::SourceAccountId.eq(account.id))
        .filter(transaction::Column::Date.lt(end))
        .all(db)
        .await?;

    let received: Decimal = incoming.iter().map(|t| t.amount).sum();
    let sent: Decimal = outgoing.iter().map(|t| t.amount).sum();
    let received_reconciled: Decimal = incoming
        .iter()
        .filter(|t| t.reconciled_destination)
        .map(|t| t.amount)
        .sum();
    let sent_reconciled: Decimal = outgoing
        .iter()
        .filter(|t| t.reconciled_source)
        .map(|t| t.amount)
        .sum();

    Ok(AccountBalance {
        balance: account.initial_balance + received - sent,
        reconciled_balance: account.initial_balance + received_reconciled - sent_reconciled,
    })
}
