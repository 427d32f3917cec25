pub mod require_admin_key;
pub mod require_link_token;

pub use require_admin_key::RequireAdminKey;
pub use require_link_token::{RequireLinkToken, ResolvedLink};
