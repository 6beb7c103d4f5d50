//! Domain - Pure Data Structures and API Types
//!
//! These types carry no state of their own and mirror the dashboard API.

pub mod dashboard;
pub mod dashboard_filter;
pub mod filter_value;
pub mod layout;
