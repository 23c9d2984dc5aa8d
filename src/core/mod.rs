//! Core business logic - framework-agnostic budgeting operations.
//!
//! Resource modules (`budget`, `account`, `category`, `envelope`,
//! `transaction`) provide the storage-facing operations; `allocation` holds
//! the per-month budgeted amounts and the carry-forward logic; `monthly`
//! assembles the derived month views on top of all of them.

pub mod account;
pub mod allocation;
pub mod budget;
pub mod category;
pub mod envelope;
pub mod month;
pub mod monthly;
pub mod transaction;
