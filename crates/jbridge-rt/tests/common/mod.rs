#![allow(dead_code)]

use fxhash::FxHashMap;
use jbridge_codegen::{BindingArtifacts, CallableRef, GenerationReport, Generator};
use jbridge_rt::{BridgeError, BridgeResult, NativeBridge, ObjectRef, TargetFuture, TargetValue};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub const FIXTURE: &str = include_str!("../../../jbridge-syntax/tests/fixtures/escaping_closures.swift");

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Runs the declaration reader and the generator over `source`.
pub fn generate(source: &str) -> GenerationReport {
    let sites = jbridge_syntax::parse_declarations(source, "SwiftModule").unwrap();
    Generator::default().run(&sites)
}

pub fn artifact<'a>(report: &'a GenerationReport, site: &str) -> &'a BindingArtifacts {
    report
        .artifact(site)
        .unwrap_or_else(|| panic!("no artifacts for {}", site))
}

/// What a fake target object does when its interface method is called.
pub enum TargetReply {
    Value(TargetValue),
    Future(TargetFuture),
    Throw(String),
}

type TargetFn = Arc<dyn Fn(Vec<TargetValue>) -> TargetReply + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub interface: String,
    pub descriptor: String,
    pub target: ObjectRef,
    pub args: Vec<TargetValue>,
}

/// An in-process stand-in for the target runtime: interface instances are
/// plain Rust closures, and every call through the bridge is recorded.
#[derive(Default)]
pub struct LoopbackBridge {
    objects: Mutex<FxHashMap<ObjectRef, TargetFn>>,
    calls: Mutex<Vec<RecordedCall>>,
    next: AtomicU64,
}

impl LoopbackBridge {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn register(
        &self,
        f: impl Fn(Vec<TargetValue>) -> TargetReply + Send + Sync + 'static,
    ) -> ObjectRef {
        let object = ObjectRef(self.next.fetch_add(1, Ordering::SeqCst) + 1);
        self.objects.lock().insert(object, Arc::new(f));
        object
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn dispatch(
        &self,
        callable: &CallableRef,
        target: ObjectRef,
        args: Vec<TargetValue>,
    ) -> BridgeResult<TargetReply> {
        self.calls.lock().push(RecordedCall {
            interface: callable.interface_class.clone(),
            descriptor: callable.descriptor.clone(),
            target,
            args: args.clone(),
        });
        let f = self.objects.lock().get(&target).cloned();
        match f {
            Some(f) => Ok(f(args)),
            None => Err(BridgeError::Call {
                callable: callable.interface_class.clone(),
                message: format!("no target object {}", target),
            }),
        }
    }
}

impl NativeBridge for LoopbackBridge {
    fn call(
        &self,
        callable: &CallableRef,
        target: ObjectRef,
        args: Vec<TargetValue>,
    ) -> BridgeResult<TargetValue> {
        match self.dispatch(callable, target, args)? {
            TargetReply::Value(value) => Ok(value),
            TargetReply::Throw(message) => Err(BridgeError::Call {
                callable: callable.interface_class.clone(),
                message,
            }),
            TargetReply::Future(_) => Err(BridgeError::Call {
                callable: callable.interface_class.clone(),
                message: "unexpected future from a synchronous method".to_string(),
            }),
        }
    }

    fn call_async(
        &self,
        callable: &CallableRef,
        target: ObjectRef,
        args: Vec<TargetValue>,
    ) -> BridgeResult<TargetFuture> {
        Ok(match self.dispatch(callable, target, args)? {
            TargetReply::Future(future) => future,
            TargetReply::Value(value) => TargetFuture::completed(value),
            TargetReply::Throw(message) => TargetFuture::failed(message),
        })
    }
}
