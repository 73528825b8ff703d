//! Core library for the `dsir` ("days since it rained") client.
//!
//! This crate defines:
//! - Configuration handling
//! - The HTTP backend for the `/data` and `/historydata` endpoints
//! - The template registry and the containers lookups render into
//! - The rain and airport-history lookups themselves
//!
//! It is used by `dsir-cli`, but any front end that can provide a
//! [`Container`] can drive the lookups.

pub mod backend;
pub mod config;
pub mod container;
pub mod error;
pub mod history;
pub mod model;
pub mod rain;
pub mod templates;

#[cfg(test)]
mod test_support;

pub use backend::{DsirBackend, HttpBackend, backend_from_config};
pub use config::Config;
pub use container::{Container, MemoryContainer};
pub use error::{LookupError, TemplateError};
pub use history::{HistoryLookup, HistoryView, daily_history_url};
pub use model::{
    ErrorPayload, FailureReason, HistoryQuery, HistoryResult, RainQuery, RainResult,
    parse_threshold,
};
pub use rain::{RainLookup, RainView, UNKNOWN_ERROR_HTML};
pub use templates::{TemplateName, TemplateRegistry, Templates};
