//! Runtime support for generated closure bindings.
//!
//! Generated origin-side code leans on this crate for the parts that are the
//! same for every binding: value marshaling, the lifetime holder table, the
//! target future bridge and the slot/store containers behind closure-valued
//! properties. What to call and how to convert comes from the
//! `jbridge-codegen` descriptors.

mod adapter;
mod bridge;
mod error;
mod future;
mod holder;
mod slot;
mod store;
mod value;

pub use adapter::{AsyncCapability, ClosureAdapter, SyncCapability};
pub use bridge::NativeBridge;
pub use error::{AsyncBridgeFailure, BridgeError, BridgeResult};
pub use future::{FutureCompleter, TargetFuture};
pub use holder::{Holder, HolderTable};
pub use slot::ClosureSlot;
pub use store::ClosureStore;
pub use value::{marshal, unmarshal, ObjectRef, OriginValue, TargetValue};
