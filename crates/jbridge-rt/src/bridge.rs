use jbridge_codegen::CallableRef;

use crate::error::BridgeResult;
use crate::future::TargetFuture;
use crate::value::{ObjectRef, TargetValue};

/// The call path into the target runtime.
///
/// Every generated interface has exactly one method, so one entry per
/// call shape is enough: `callable` names the interface method and its JNI
/// descriptor, `target` the interface instance, `args` the already-marshaled
/// arguments in declaration order.
pub trait NativeBridge: Send + Sync {
    /// Calls a method returning a plain value (or `void`).
    fn call(
        &self,
        callable: &CallableRef,
        target: ObjectRef,
        args: Vec<TargetValue>,
    ) -> BridgeResult<TargetValue>;

    /// Calls a method returning a `CompletableFuture`. The call itself returns
    /// as soon as the target has handed back the future.
    fn call_async(
        &self,
        callable: &CallableRef,
        target: ObjectRef,
        args: Vec<TargetValue>,
    ) -> BridgeResult<TargetFuture>;
}
