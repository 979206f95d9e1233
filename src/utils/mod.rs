pub mod export;
pub mod extractor;
pub mod grading;
pub mod parameter_error_handler;
pub mod password;
pub mod session;
pub mod sql;
pub mod validate;

pub use extractor::{SafeIDI64, SafeSessionId, SafeSubjectIdI64};
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
pub use sql::{escape_like_pattern, like_contains};
