pub mod families;

pub mod family_links;

pub mod portal;

pub mod system;

pub use families::configure_families_routes;
pub use family_links::configure_family_links_routes;
pub use portal::configure_portal_routes;
pub use system::configure_system_routes;
