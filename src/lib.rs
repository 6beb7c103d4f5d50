//! Dash Engine Library
//!
//! Headless engines behind a BI dashboard client: a sortable, filterable,
//! paginated table engine and the dashboard filter reconciliation engine,
//! plus the dashboard list wiring and the filter API client they share.

pub mod components;
pub mod constants;
pub mod domain;
pub mod error;
pub mod eventing;
pub mod features;
pub mod helpers;
pub mod services;
pub mod settings;
pub mod state;
