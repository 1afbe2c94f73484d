//! Lead MIS reporting engine.
//!
//! Fetches the CRM's report endpoints as one atomic batch, normalizes
//! the loosely-shaped payloads into row sets, applies the dashboard's
//! filters client-side and renders workbook/document exports.
//!
//! Data flow: `fetch` → `envelope` (decode) → `filter` → `export`,
//! coordinated by `session`, which owns the filter state and the
//! fetch-generation guard.

pub mod bands;
pub mod catalog;
pub mod config;
pub mod date_range;
pub mod envelope;
pub mod error;
pub mod export;
pub mod fetch;
pub mod filter;
pub mod fmt;
pub mod pivot;
pub mod row;
pub mod session;
pub mod summary;
pub mod types;
