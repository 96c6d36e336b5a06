//! Lead Dashboard API Library
//!
//! Pulls leads from HubSpot CRM and a Google Sheets lead-capture sheet,
//! normalizes them into one lead model, and computes the dashboard view:
//! contacted totals, owner distribution, source split and a daily trend.
//!
//! # Modules
//!
//! - `api`: HTTP layer namespace.
//! - `domain`: Pipeline namespace (normalize, filter, aggregate, bin).
//! - `integrations`: Source client namespace.
//! - `circuit_breaker`: Per-source circuit breakers.
//! - `config`: Configuration management.
//! - `dashboard`: Reporting facade and view model.
//! - `date_filter`: Inclusive date-range filter.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `hubspot_client` / `hubspot_models`: HubSpot CRM search API.
//! - `models`: Lead, owner and date-range models.
//! - `normalizer`: Raw record to lead conversion.
//! - `sample_data`: Deterministic demo records.
//! - `sheets_client` / `sheets_models`: Google Sheets values API.
//! - `stats`: Statistics aggregation.
//! - `trend`: Daily trend binning.

pub mod api;
pub mod domain;
pub mod integrations;

// Re-export primary modules for shared use in tests and other binaries
pub mod circuit_breaker;
pub mod config;
pub mod dashboard;
pub mod date_filter;
pub mod errors;
pub mod handlers;
pub mod hubspot_client;
pub mod hubspot_models;
pub mod models;
pub mod normalizer;
pub mod sample_data;
pub mod sheets_client;
pub mod sheets_models;
pub mod stats;
pub mod trend;
