pub use super::families::Entity as Families;
pub use super::family_links::Entity as FamilyLinks;
pub use super::students::Entity as Students;
