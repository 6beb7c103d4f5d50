//! State - Filter Panel State
//!
//! Pending filter values, reconciliation and per-editor option loading.
//! Nothing here renders; owners read the state and react to events.

pub mod filter_panel;
pub mod option_loader;
