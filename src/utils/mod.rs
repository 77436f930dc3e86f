pub mod codes;
pub mod expiry;
pub mod password;
pub mod sealing;

pub use codes::{AuthCodes, generate_short_id, is_valid_owner_code, is_valid_short_id};
pub use expiry::{ExpirationOption, ViewLimitOption};
