//! Closure signature model for the jbridge binding generator.
//!
//! Everything downstream of the declaration reader works from the types in
//! this crate:
//! - [`SourceType`] is an origin-side type, supported or not
//! - [`ClosureSignature`] is the normalized shape of a closure type
//! - [`BindingSite`] says where a closure appears (parameter or property)
//! - [`GenerationStrategy`] is derived from a signature by [`classify`]
//!
//! The model is immutable once extracted. Validation happens here so that
//! unsupported inputs are rejected before any synthesis begins.

mod error;
mod signature;
mod site;
mod strategy;
mod types;

pub use error::{InvalidSignatureError, SignatureResult};
pub use signature::{validate, ClosureSignature, ParameterType};
pub use site::{BindingSite, PropertyAccessors, Retention, SiteKind, StoreShape};
pub use strategy::{classify, GenerationStrategy};
pub use types::SourceType;
