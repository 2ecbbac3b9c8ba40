//! Single-valued closure storage: the runtime side of a property site.

use futures::future::BoxFuture;
use futures::FutureExt;
use jbridge_codegen::{BindingArtifacts, PlanShape, ThunkPlan};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::adapter::{AsyncCapability, ClosureAdapter, SyncCapability};
use crate::bridge::NativeBridge;
use crate::error::{BridgeError, BridgeResult};
use crate::holder::HolderTable;
use crate::value::{ObjectRef, OriginValue};

/// Holds at most one bound closure.
///
/// - `set` binds and acquires; any previous closure is released once its
///   in-flight invocations have been dispatched
/// - `clear` releases immediately
/// - dropping the slot releases whatever is bound
///
/// Concurrent `set` calls on one slot are the caller's to order.
pub struct ClosureSlot {
    site: String,
    plan: ThunkPlan,
    bridge: Arc<dyn NativeBridge>,
    holders: HolderTable,
    current: Mutex<Option<Arc<ClosureAdapter>>>,
}

impl ClosureSlot {
    pub fn new(
        artifacts: &BindingArtifacts,
        bridge: Arc<dyn NativeBridge>,
        holders: HolderTable,
    ) -> BridgeResult<Self> {
        match artifacts.lifetime() {
            Some(plan) if plan.shape == PlanShape::Slot => Ok(Self {
                site: artifacts.site.to_string(),
                plan: artifacts.thunk.clone(),
                bridge,
                holders,
                current: Mutex::new(None),
            }),
            _ => Err(BridgeError::PlanMismatch {
                site: artifacts.site.to_string(),
                expected: "slot",
            }),
        }
    }

    pub fn set(&self, target: ObjectRef) {
        let adapter = ClosureAdapter::bind(&self.plan, target, self.bridge.clone(), &self.holders);
        let previous = self.current.lock().replace(adapter);
        if let Some(previous) = previous {
            log::debug!("{}: overwriting {}", self.site, previous.target());
        }
    }

    /// Invokes the bound closure. `Ok(None)` when nothing is bound.
    pub fn trigger(&self, args: Vec<OriginValue>) -> BridgeResult<Option<OriginValue>> {
        match self.snapshot() {
            Some(adapter) => adapter.invoke(args).map(Some),
            None => Ok(None),
        }
    }

    pub fn trigger_async(
        &self,
        args: Vec<OriginValue>,
    ) -> BoxFuture<'static, BridgeResult<Option<OriginValue>>> {
        match self.snapshot() {
            Some(adapter) => adapter.invoke_async(args).map(|r| r.map(Some)).boxed(),
            None => futures::future::ready(Ok(None)).boxed(),
        }
    }

    pub fn clear(&self) {
        if let Some(previous) = self.current.lock().take() {
            log::debug!("{}: cleared {}", self.site, previous.target());
        }
    }

    pub fn is_bound(&self) -> bool {
        self.current.lock().is_some()
    }

    /// The adapter an invocation starting now would use. Holding it keeps the
    /// closure alive across a concurrent overwrite or clear.
    pub fn snapshot(&self) -> Option<Arc<ClosureAdapter>> {
        self.current.lock().clone()
    }
}
