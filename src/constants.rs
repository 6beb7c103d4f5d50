//! Engine Constants
//!
//! Centralized defaults shared by the table and filter engines.

/// Default number of body rows per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page sizes offered by the footer selector
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [10, 25, 50, 100];

/// Default number of options requested from the preview endpoint
pub const OPTION_FETCH_LIMIT: usize = 100;

/// Number of preview responses kept in the option cache
pub const OPTION_CACHE_CAPACITY: usize = 256;

/// HTTP request timeout
pub const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Default dashboard API root
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

/// Sentinel owner value excluded from derived checkbox options
pub const UNKNOWN_SENTINEL: &str = "unknown";

/// Settings file name inside the config directory
pub const SETTINGS_FILE: &str = "settings.toml";
