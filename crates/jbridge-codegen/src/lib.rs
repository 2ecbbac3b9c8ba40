//! Closure and async interop descriptor synthesis.
//!
//! For each [`BindingSite`](jbridge_model::BindingSite) the generator produces
//! a set of plain descriptor trees:
//! - a [`TargetInterfaceDescriptor`]: the single-method callable interface on
//!   the target runtime side
//! - a [`ThunkPlan`]: either a direct inline call (non-escaping closures) or an
//!   origin-side capability + adapter pair, carrying a [`LifetimePlan`] when
//!   the closure is stored
//! - a [`DowncallContract`]: the names, parameter order and JNI encodings both
//!   sides must agree on
//!
//! Turning descriptors into source text is the templating layer's job.

mod config;
mod downcall;
mod error;
mod generator;
mod lifetime;
mod naming;
mod select;
mod target;
mod thunk;

pub use config::GeneratorConfig;
pub use downcall::{
    mangle_jni_component, mangle_jni_symbol, resolve_contract, CallableRef, DowncallContract,
    EntryRole, NativeEntry,
};
pub use error::{CodegenError, CodegenResult, ConfigError, LifetimePlanConflictError};
pub use generator::{BindingArtifacts, DeclarationFailure, GenerationReport, Generator};
pub use lifetime::{
    check_conflict, plan_lifetime, AcquirePoint, AcquireStep, LifetimePlan, PlanShape,
    ReleaseStep, ReleaseTrigger,
};
pub use naming::{InterfaceName, NameRegistry, SiteNames};
pub use select::{select, select_site, Selection};
pub use target::{
    map_type, synthesize_interface, Conversion, JavaPrimitive, TargetInterfaceDescriptor,
    TargetMethod, TargetParam, TargetType, TypeMapping, FUTURE_CLASS, STRING_CLASS,
};
pub use thunk::{
    synthesize_thunk, AdapterDescriptor, CapabilityDescriptor, InlineCallDescriptor,
    MarshalStep, OriginMethod, OriginParam, OriginThunkDescriptor, ResultStep, ThunkPlan,
};
