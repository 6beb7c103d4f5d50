//! Eventing - Notifications sent to the panel's owner

pub mod filter_event;
