use crate::validate::{MAX_API_KEY_LEN, MAX_BACKEND_URL_LEN};

/// Current firmware version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Path prefix of the backend REST API, appended to the base URL
pub const REST_PATH: &str = "/rest/v1/";
/// Longest table name a REST endpoint is built for
pub const TABLE_NAME_MAX: usize = 32;

/// Capacity of a REST endpoint URL
pub const URL_MAX: usize = MAX_BACKEND_URL_LEN + REST_PATH.len() + TABLE_NAME_MAX;
/// Capacity of the `Authorization` header value
pub const AUTH_HEADER_MAX: usize = "Bearer ".len() + MAX_API_KEY_LEN;

/// Size of the buffer holding a serialized calibration settings document
pub const CALIBRATION_JSON_MAX: usize = 128;

/// Delay in seconds between configuration error reports while halted
pub const HALT_REPORT_INTERVAL_SECS: u64 = 30;
