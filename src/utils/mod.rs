pub mod extractor;
pub mod link_token;
pub mod parameter_error_handler;
pub mod sql;
pub mod validate;

pub use extractor::{SafeFamilyIdI64, SafeLinkIdI64, SafeStudentIdI64};
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
pub use sql::escape_like_pattern;
