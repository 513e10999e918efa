pub mod serde_helpers;
pub mod text;
pub mod validation;
