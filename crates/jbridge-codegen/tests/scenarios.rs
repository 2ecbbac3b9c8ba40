mod common;

use common::generate_one;
use jbridge_codegen::{
    AcquirePoint, JavaPrimitive, ReleaseTrigger, ResultStep, TargetType, ThunkPlan,
};
use jbridge_model::{GenerationStrategy, SourceType};

#[test]
fn scenario_a_non_escaping_is_interface_only() {
    let artifacts = generate_one("public func setCallback(callback: () -> Void) {}");

    assert_eq!(artifacts.strategy, GenerationStrategy::SyncNonEscaping);
    assert_eq!(artifacts.interface.method.arity(), 0);
    assert!(artifacts.interface.method.ret.is_void());
    assert_eq!(artifacts.interface.method.jni_descriptor(), "()V");

    assert!(matches!(artifacts.thunk, ThunkPlan::Inline(_)));
    assert!(artifacts.thunk.adapter().is_none());
    assert!(artifacts.lifetime().is_none());
}

#[test]
fn scenario_b_escaping_adds_capability_adapter_and_plan() {
    let a = generate_one("public func setCallback(callback: () -> Void) {}");
    let b = generate_one("public func setCallback(callback: @escaping () -> Void) {}");

    assert_eq!(b.strategy, GenerationStrategy::SyncEscaping);
    assert_eq!(b.interface.method, a.interface.method);
    assert_eq!(b.interface.name, a.interface.name);

    let thunk = b.thunk.adapter().expect("adapter");
    assert_eq!(thunk.capability.name, "_SwiftClosure_SwiftModule_setCallback_callback");
    assert_eq!(thunk.adapter.name, "_SwiftClosureWrapper_SwiftModule_setCallback_callback");
    assert_eq!(thunk.adapter.implements, thunk.capability.name);
    assert!(!thunk.suspends());

    let plan = b.lifetime().expect("lifetime plan");
    assert_eq!(plan.acquire.at, AcquirePoint::CallEntry);
    assert_eq!(plan.acquire.holder, "closureContext_callback$");
    assert_eq!(plan.release.triggers, vec![ReleaseTrigger::OwnerTeardown]);
}

#[test]
fn scenario_c_async_returns_future_of_boxed_long() {
    let artifacts =
        generate_one("public func setAsyncCallback(callback: @escaping (Int64) async -> Int64) {}");
    let method = &artifacts.interface.method;

    assert_eq!(artifacts.strategy, GenerationStrategy::AsyncEscaping);
    assert_eq!(method.arity(), 1);
    assert_eq!(method.params[0].ty, TargetType::Primitive(JavaPrimitive::Long));
    assert_eq!(
        method.ret.to_string(),
        "java.util.concurrent.CompletableFuture<java.lang.Long>"
    );
    assert_eq!(method.jni_descriptor(), "(J)Ljava/util/concurrent/CompletableFuture;");

    let thunk = artifacts.thunk.adapter().expect("adapter");
    assert!(thunk.suspends());
    assert_eq!(thunk.capability.method.ret, SourceType::Int64);
    match &thunk.adapter.result {
        ResultStep::Await { boxed, source, .. } => {
            assert_eq!(boxed, &TargetType::Object("java.lang.Long".into()));
            assert_eq!(source, &SourceType::Int64);
        }
        other => panic!("expected an await step, got {:?}", other),
    }
}

#[test]
fn scenario_d_async_void_still_awaits() {
    let artifacts =
        generate_one("public func setAsyncVoidCallback(callback: @escaping () async -> Void) {}");

    assert_eq!(
        artifacts.interface.method.ret.to_string(),
        "java.util.concurrent.CompletableFuture<java.lang.Void>"
    );
    let result = artifacts.thunk.result();
    assert!(result.awaits());
    assert!(matches!(result, ResultStep::Await { source: SourceType::Void, .. }));
}

#[test]
fn scenario_e_property_with_trigger_and_clear() {
    let artifacts = generate_one(
        r#"
        public class CallbackManager {
            private var callback: (() -> Void)?
            public func setCallback(callback: @escaping () -> Void) { self.callback = callback }
            public func triggerCallback() { callback?() }
            public func clearCallback() { callback = nil }
        }
        "#,
    );

    let plan = artifacts.lifetime().expect("lifetime plan");
    assert_eq!(plan.acquire.at, AcquirePoint::Set);
    assert!(plan.release.releases_on(ReleaseTrigger::Clear));
    assert!(plan.release.releases_on(ReleaseTrigger::Overwrite));
    assert!(plan.release.releases_on(ReleaseTrigger::OwnerTeardown));
    assert_eq!(plan.owner, "CallbackManager.callback");
}

#[test]
fn async_without_escaping_is_normalized() {
    let artifacts = generate_one("public func run(work: (Int32) async -> Bool) {}");

    assert_eq!(artifacts.strategy, GenerationStrategy::AsyncEscaping);
    assert!(artifacts.thunk.adapter().is_some());
    assert!(artifacts.lifetime().is_some());
}
