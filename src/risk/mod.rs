//! Lead risk assessment.
//!
//! - [`normalizer`] — turns weakly typed export cells into a [`LeadRecord`](crate::models::LeadRecord).
//! - [`classifier`] — ordered High → Low → Medium rule tiers over a normalized record.
//! - [`validator`] — advisory completeness and token checks on raw rows.
//! - [`stats`] — count and percentage per [`RiskCategory`](crate::models::RiskCategory).

pub mod classifier;
pub mod normalizer;
pub mod stats;
pub mod validator;
