//! Collection-backed closure storage: acquire on add, release on remove-all.

use futures::future::join_all;
use jbridge_codegen::{BindingArtifacts, PlanShape, ThunkPlan};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::adapter::{AsyncCapability, ClosureAdapter, SyncCapability};
use crate::bridge::NativeBridge;
use crate::error::{BridgeError, BridgeResult};
use crate::holder::HolderTable;
use crate::value::{ObjectRef, OriginValue};

pub struct ClosureStore {
    site: String,
    plan: ThunkPlan,
    bridge: Arc<dyn NativeBridge>,
    holders: HolderTable,
    entries: Mutex<Vec<Arc<ClosureAdapter>>>,
}

impl ClosureStore {
    pub fn new(
        artifacts: &BindingArtifacts,
        bridge: Arc<dyn NativeBridge>,
        holders: HolderTable,
    ) -> BridgeResult<Self> {
        match artifacts.lifetime() {
            Some(plan) if plan.shape == PlanShape::Collection => Ok(Self {
                site: artifacts.site.to_string(),
                plan: artifacts.thunk.clone(),
                bridge,
                holders,
                entries: Mutex::new(Vec::new()),
            }),
            _ => Err(BridgeError::PlanMismatch {
                site: artifacts.site.to_string(),
                expected: "collection",
            }),
        }
    }

    pub fn add(&self, target: ObjectRef) {
        let adapter = ClosureAdapter::bind(&self.plan, target, self.bridge.clone(), &self.holders);
        let mut entries = self.entries.lock();
        entries.push(adapter);
        log::debug!("{}: added {} ({} stored)", self.site, target, entries.len());
    }

    /// Invokes every stored closure in insertion order. Stops at the first failure.
    pub fn execute_all(&self, args: Vec<OriginValue>) -> BridgeResult<Vec<OriginValue>> {
        self.snapshot()
            .iter()
            .map(|adapter| adapter.invoke(args.clone()))
            .collect()
    }

    /// Dispatches every stored closure in insertion order, then awaits all results.
    pub async fn execute_all_async(&self, args: Vec<OriginValue>) -> BridgeResult<Vec<OriginValue>> {
        let pending: Vec<_> = self
            .snapshot()
            .iter()
            .map(|adapter| adapter.invoke_async(args.clone()))
            .collect();
        join_all(pending).await.into_iter().collect()
    }

    pub fn clear(&self) {
        let removed = std::mem::take(&mut *self.entries.lock());
        log::debug!("{}: removed {} closure(s)", self.site, removed.len());
    }

    pub fn count(&self) -> usize {
        self.entries.lock().len()
    }

    fn snapshot(&self) -> Vec<Arc<ClosureAdapter>> {
        self.entries.lock().clone()
    }
}
