//! Features - Vertical Feature Slices
//!
//! Each feature wires the engines to one screen's data.

pub mod dashboards;
