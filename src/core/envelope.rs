//! Envelope business logic - Handles all envelope-related operations.
//!
//! Envelopes are the unit everything monthly attaches to: allocations key on
//! them, transactions tag them, and the month views in
//! [`crate::core::monthly`] are computed per envelope first.

use crate::{
    entities::{Envelope, category, envelope},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Creates a new envelope under an existing category.
pub async fn create_envelope(
    db: &DatabaseConnection,
    category_id: i64,
    name: String,
    note: String,
) -> Result<envelope::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Envelope name cannot be empty".to_string(),
        });
    }

    crate::core::category::get_category(db, category_id).await?;

    let model = envelope::ActiveModel {
        category_id: Set(category_id),
        name: Set(name.trim().to_string()),
        note: Set(note),
        archived: Set(false),
        ..Default::default()
    };

    let result = model.insert(db).await?;
    Ok(result)
}

/// Finds an envelope by its unique ID.
pub async fn get_envelope(db: &DatabaseConnection, envelope_id: i64) -> Result<envelope::Model> {
    Envelope::find_by_id(envelope_id)
        .one(db)
        .await?
        .ok_or(Error::EnvelopeNotFound { id: envelope_id })
}

/// Marks an envelope as archived. Archived envelopes keep their history but
/// are excluded from month views and carry-forward.
pub async fn archive_envelope(db: &DatabaseConnection, envelope_id: i64) -> Result<envelope::Model> {
    let model = get_envelope(db, envelope_id).await?;

    let mut active: envelope::ActiveModel = model.into();
    active.archived = Set(true);
    let updated = active.update(db).await?;

    info!("Archived envelope {} ('{}').", updated.id, updated.name);
    Ok(updated)
}

/// Retrieves all envelopes of a category, ordered alphabetically by name.
pub async fn list_envelopes_for_category(
    db: &DatabaseConnection,
    category_id: i64,
) -> Result<Vec<envelope::Model>> {
    Envelope::find()
        .filter(envelope::Column::CategoryId.eq(category_id))
        .order_by_asc(envelope::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all non-archived envelopes belonging to a budget, through
/// category ownership, ordered by name.
pub async fn list_active_envelopes_for_budget<C>(
    db: &C,
    budget_id: i64,
) -> Result<Vec<envelope::Model>>
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

    Envelope::find()
        .filter(envelope::Column::CategoryId.is_in(category_ids))
        .filter(envelope::Column::Archived.eq(false))
        .order_by_asc(envelope::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}
