//! Service Layer
//!
//! The service layer wraps the dashboard filter API, caches option previews
//! and bridges async calls onto the Tokio runtime.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 FilterPanel                  │
//! │      (reconciliation, apply, delete)         │
//! └──────────────────────────────────────────────┘
//!          │ delete                │ preview
//!          ▼                       ▼
//! ┌─────────────────┐    ┌─────────────────────┐
//! │  HttpFilterApi  │◄───│    OptionCache      │
//! │    (reqwest)    │    │  (LRU per key)      │
//! └─────────────────┘    └─────────────────────┘
//! ```

mod filter_api;
mod option_cache;
mod runtime;

pub use filter_api::*;
pub use option_cache::*;
pub use runtime::*;
