//! Dashboards - Dashboard list screen

mod controller;

pub use controller::*;
