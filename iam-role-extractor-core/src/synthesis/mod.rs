//! Fragment synthesis (deterministic YAML generation)

pub mod logical_id;
pub(crate) mod template;
pub mod transcode;

pub use logical_id::sanitize_identifier;
pub use transcode::{decode_document, indent, to_structured_text, transcode_document};
