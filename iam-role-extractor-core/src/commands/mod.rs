//! Commands module - service layer for IAM Role Extractor operations

mod render;
pub(crate) mod service;

pub use render::validate_role_name;
pub use service::RoleExtractorService;
