//! Origin-side thunks.
//!
//! An escaping closure received from the target runtime is wrapped in a
//! synthetic capability (one method, shaped like the closure) and a concrete
//! adapter that marshals arguments, calls through the bridge, and marshals the
//! result back. Async closures keep their suspension point on the origin side:
//! the capability method suspends instead of returning a future.

use jbridge_model::{ClosureSignature, GenerationStrategy, SourceType};
use serde::Serialize;

use crate::downcall::CallableRef;
use crate::error::CodegenResult;
use crate::lifetime::LifetimePlan;
use crate::naming::SiteNames;
use crate::target::{map_or_err, Conversion, TargetType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OriginParam {
    pub label: String,
    pub ty: SourceType,
}

/// The capability's single method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OriginMethod {
    pub name: String,
    pub params: Vec<OriginParam>,
    pub ret: SourceType,
    /// `async` on the origin side; never a future-typed return.
    pub suspends: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityDescriptor {
    pub name: String,
    pub method: OriginMethod,
}

/// Origin → target conversion of one argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarshalStep {
    pub index: usize,
    pub source: SourceType,
    pub target: TargetType,
    pub conversion: Conversion,
}

/// Target → origin handling of the call result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ResultStep {
    /// Synchronous `void`: nothing comes back.
    Discard,
    /// Synchronous value: convert and return.
    Return {
        target: TargetType,
        source: SourceType,
        conversion: Conversion,
    },
    /// Async: await the target future, then unbox.
    ///
    /// Applies to `void` results too, so completion ordering stays observable.
    /// Exceptional completion becomes an `AsyncBridgeFailure` at this point.
    Await {
        future: TargetType,
        boxed: TargetType,
        source: SourceType,
        conversion: Conversion,
    },
}

impl ResultStep {
    pub fn awaits(&self) -> bool {
        matches!(self, ResultStep::Await { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdapterDescriptor {
    pub name: String,
    /// Capability this adapter implements.
    pub implements: String,
    pub params: Vec<MarshalStep>,
    pub invocation: CallableRef,
    pub result: ResultStep,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OriginThunkDescriptor {
    pub capability: CapabilityDescriptor,
    pub adapter: AdapterDescriptor,
    pub lifetime: Option<LifetimePlan>,
}

impl OriginThunkDescriptor {
    /// Attaches the planner's output. Replaces any earlier plan.
    pub fn with_lifetime(mut self, plan: Option<LifetimePlan>) -> Self {
        self.lifetime = plan;
        self
    }

    pub fn suspends(&self) -> bool {
        self.capability.method.suspends
    }
}

/// A direct call for closures that never outlive the receiving call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineCallDescriptor {
    pub params: Vec<MarshalStep>,
    pub invocation: CallableRef,
    pub result: ResultStep,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ThunkPlan {
    Inline(InlineCallDescriptor),
    Adapter(OriginThunkDescriptor),
}

impl ThunkPlan {
    pub fn adapter(&self) -> Option<&OriginThunkDescriptor> {
        match self {
            ThunkPlan::Adapter(thunk) => Some(thunk),
            ThunkPlan::Inline(_) => None,
        }
    }

    pub fn lifetime(&self) -> Option<&LifetimePlan> {
        self.adapter().and_then(|thunk| thunk.lifetime.as_ref())
    }

    pub fn marshal_steps(&self) -> &[MarshalStep] {
        match self {
            ThunkPlan::Inline(call) => &call.params,
            ThunkPlan::Adapter(thunk) => &thunk.adapter.params,
        }
    }

    pub fn result(&self) -> &ResultStep {
        match self {
            ThunkPlan::Inline(call) => &call.result,
            ThunkPlan::Adapter(thunk) => &thunk.adapter.result,
        }
    }

    pub fn invocation(&self) -> &CallableRef {
        match self {
            ThunkPlan::Inline(call) => &call.invocation,
            ThunkPlan::Adapter(thunk) => &thunk.adapter.invocation,
        }
    }
}

/// Builds the origin-side plan. The lifetime plan is attached later by the planner.
pub fn synthesize_thunk(
    signature: &ClosureSignature,
    strategy: GenerationStrategy,
    names: &SiteNames,
    callable: &CallableRef,
    package: &str,
    site: &str,
) -> CodegenResult<ThunkPlan> {
    let params = signature
        .params
        .iter()
        .enumerate()
        .map(|(index, param)| {
            map_or_err(&param.ty, package, site).map(|mapping| MarshalStep {
                index,
                source: mapping.source,
                target: mapping.target,
                conversion: mapping.conversion,
            })
        })
        .collect::<CodegenResult<Vec<_>>>()?;

    let ret = map_or_err(&signature.ret, package, site)?;
    let result = if strategy.is_async() {
        ResultStep::Await {
            future: TargetType::future_of(&ret.target),
            boxed: ret.target.boxed(),
            source: ret.source,
            conversion: ret.conversion,
        }
    } else if ret.target.is_void() {
        ResultStep::Discard
    } else {
        ResultStep::Return {
            target: ret.target,
            source: ret.source,
            conversion: ret.conversion,
        }
    };

    if strategy == GenerationStrategy::SyncNonEscaping {
        log::trace!("{}: inline call, no adapter", site);
        return Ok(ThunkPlan::Inline(InlineCallDescriptor {
            params,
            invocation: callable.clone(),
            result,
        }));
    }

    let capability = CapabilityDescriptor {
        name: names.capability.clone(),
        method: OriginMethod {
            name: names.method.clone(),
            params: signature
                .params
                .iter()
                .enumerate()
                .map(|(index, param)| OriginParam {
                    label: format!("_{}", index),
                    ty: param.ty.clone(),
                })
                .collect(),
            ret: signature.ret.clone(),
            suspends: strategy.is_async(),
        },
    };
    let adapter = AdapterDescriptor {
        name: names.adapter.clone(),
        implements: capability.name.clone(),
        params,
        invocation: callable.clone(),
        result,
    };
    log::trace!("{}: adapter {} implements {}", site, adapter.name, capability.name);
    Ok(ThunkPlan::Adapter(OriginThunkDescriptor {
        capability,
        adapter,
        lifetime: None,
    }))
}
