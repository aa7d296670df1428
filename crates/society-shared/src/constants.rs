//! Application-wide constants

pub const SESSION_COOKIE: &str = "session_token";
pub const NOTICE_COOKIE: &str = "notice";
pub const DEFAULT_SESSION_EXPIRY: i64 = 28800;
pub const MIN_SOCIETY_NAME_LENGTH: u64 = 3;
pub const MAX_SOCIETY_NAME_LENGTH: u64 = 200;
pub const MIN_ADDRESS_LENGTH: u64 = 10;
pub const MAX_FLAT_NUMBER_LENGTH: u64 = 50;
pub const MAX_EMAIL_LENGTH: u64 = 254;
pub const MIN_BILL_YEAR: i32 = 2000;
pub const MIN_LEASE_YEAR: i32 = 2000;
pub const RECENT_ITEMS_LIMIT: usize = 3;
