//! `lead-triage` — classify sales leads by risk and prepare WhatsApp outreach.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and initialise [`logging`].
//! 2. Load config and resolve API secrets ([`config::load_config`], [`config::resolve_secrets`]).
//! 3. Read the lead export ([`input::load_leads`]).
//! 4. Normalize, classify and validate every row ([`pipeline::process_row`], [`risk`]).
//! 5. Aggregate per-category statistics ([`risk::stats::statistics`]).
//! 6. Generate a message per reachable lead ([`outreach::generator`]).
//! 7. Build `wa.me` links, or dispatch via the Cloud API with `--send` ([`outreach::whatsapp`]).
//! 8. Render the requested report ([`report`]).
//!
//! The risk core ([`risk::normalizer`], [`risk::classifier`]) is pure and
//! synchronous and may be called concurrently across rows.

pub mod cli;
pub mod config;
pub mod input;
pub mod logging;
pub mod models;
pub mod outreach;
pub mod pipeline;
pub mod report;
pub mod risk;
