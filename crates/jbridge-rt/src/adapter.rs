//! Origin-side adapters: the runtime half of a thunk plan.
//!
//! An adapter wraps one target callable. Calls marshal the arguments, cross
//! the bridge once, and unmarshal the result. For async closures the bridge
//! call happens before the returned future is first polled; the future only
//! owns the target future and the result conversion, so it never extends the
//! adapter's lifetime.

use futures::future::BoxFuture;
use futures::FutureExt;
use jbridge_codegen::{CallableRef, MarshalStep, ResultStep, ThunkPlan};
use std::sync::Arc;

use crate::bridge::NativeBridge;
use crate::error::{BridgeError, BridgeResult};
use crate::holder::{Holder, HolderTable};
use crate::value::{marshal, unmarshal, ObjectRef, OriginValue, TargetValue};

/// A closure callable synchronously from the origin side.
pub trait SyncCapability: Send + Sync {
    fn invoke(&self, args: Vec<OriginValue>) -> BridgeResult<OriginValue>;
}

/// A closure callable from origin-side async code. One suspension point: the
/// await on the bridged target future.
pub trait AsyncCapability: Send + Sync {
    fn invoke_async(&self, args: Vec<OriginValue>) -> BoxFuture<'static, BridgeResult<OriginValue>>;
}

pub struct ClosureAdapter {
    params: Vec<MarshalStep>,
    result: ResultStep,
    invocation: CallableRef,
    target: ObjectRef,
    bridge: Arc<dyn NativeBridge>,
    holder: Option<Holder>,
}

impl std::fmt::Debug for ClosureAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClosureAdapter")
            .field("invocation", &self.invocation)
            .field("target", &self.target)
            .field("holder", &self.holder)
            .finish()
    }
}

impl ClosureAdapter {
    /// Binds `target` to `plan`. A holder is acquired here when the plan
    /// carries a lifetime plan; inline plans never pin their target.
    pub fn bind(
        plan: &ThunkPlan,
        target: ObjectRef,
        bridge: Arc<dyn NativeBridge>,
        holders: &HolderTable,
    ) -> Arc<Self> {
        let holder = plan
            .lifetime()
            .map(|lifetime| holders.acquire(target, &lifetime.owner));
        Arc::new(Self {
            params: plan.marshal_steps().to_vec(),
            result: plan.result().clone(),
            invocation: plan.invocation().clone(),
            target,
            bridge,
            holder,
        })
    }

    pub fn target(&self) -> ObjectRef {
        self.target
    }

    pub fn holder_token(&self) -> Option<usize> {
        self.holder.as_ref().map(Holder::token)
    }

    pub fn is_async(&self) -> bool {
        self.result.awaits()
    }

    fn marshal_args(&self, args: Vec<OriginValue>) -> BridgeResult<Vec<TargetValue>> {
        if args.len() != self.params.len() {
            return Err(BridgeError::ArityMismatch {
                expected: self.params.len(),
                found: args.len(),
            });
        }
        self.params
            .iter()
            .zip(args)
            .map(|(step, arg)| marshal(arg, &step.source))
            .collect()
    }
}

impl SyncCapability for ClosureAdapter {
    fn invoke(&self, args: Vec<OriginValue>) -> BridgeResult<OriginValue> {
        let args = self.marshal_args(args)?;
        log::trace!("Dispatching {} on {}", self.invocation.method, self.target);
        match &self.result {
            ResultStep::Discard => {
                self.bridge.call(&self.invocation, self.target, args)?;
                Ok(OriginValue::Void)
            }
            ResultStep::Return { source, .. } => {
                let value = self.bridge.call(&self.invocation, self.target, args)?;
                unmarshal(value, source)
            }
            ResultStep::Await { .. } => Err(BridgeError::RequiresAwait {
                callable: self.invocation.interface_class.clone(),
            }),
        }
    }
}

impl AsyncCapability for ClosureAdapter {
    fn invoke_async(&self, args: Vec<OriginValue>) -> BoxFuture<'static, BridgeResult<OriginValue>> {
        let source = match &self.result {
            ResultStep::Await { source, .. } => source.clone(),
            _ => return futures::future::ready(self.invoke(args)).boxed(),
        };
        let dispatched = self.marshal_args(args).and_then(|args| {
            log::trace!("Dispatching async {} on {}", self.invocation.method, self.target);
            self.bridge.call_async(&self.invocation, self.target, args)
        });
        async move {
            let value = dispatched?.await?;
            unmarshal(value, &source)
        }
        .boxed()
    }
}
