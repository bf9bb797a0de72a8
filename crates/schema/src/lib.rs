//! API schema documents: derivation placeholder, storage shape, JSON-schema
//! validation, and the additive-only compatibility rule for re-registration
//!.

mod compatibility;
mod document;
mod validate;

pub use compatibility::check_compatible;
pub use document::{ApiSchema, EventSignature, MethodSignature, ParameterSchema};
pub use validate::validate_against;
