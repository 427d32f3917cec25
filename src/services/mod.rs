pub mod families;
pub mod family_links;
pub mod portal;
pub mod system;

pub use families::FamilyService;
pub use family_links::FamilyLinkService;
pub use portal::PortalService;
pub use system::SystemService;
