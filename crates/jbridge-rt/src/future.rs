//! The target runtime's future (`CompletableFuture`), as seen from the origin side.

use futures::channel::oneshot;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::error::AsyncBridgeFailure;
use crate::value::TargetValue;

type Completion = Result<TargetValue, AsyncBridgeFailure>;

/// Completes a [`TargetFuture`] exactly once, from any thread.
#[derive(Debug)]
pub struct FutureCompleter {
    tx: oneshot::Sender<Completion>,
}

impl FutureCompleter {
    /// Normal completion. Returns false if the future was dropped.
    pub fn complete(self, value: TargetValue) -> bool {
        self.tx.send(Ok(value)).is_ok()
    }

    /// Exceptional completion with the target's exception payload.
    pub fn complete_exceptionally(self, payload: impl Into<String>) -> bool {
        self.tx
            .send(Err(AsyncBridgeFailure {
                payload: payload.into(),
            }))
            .is_ok()
    }
}

/// Awaitable result of an async target call. Resolves on whichever thread
/// completes it; the awaiting task is woken there.
#[derive(Debug)]
pub struct TargetFuture {
    rx: oneshot::Receiver<Completion>,
}

impl TargetFuture {
    pub fn pending() -> (FutureCompleter, TargetFuture) {
        let (tx, rx) = oneshot::channel();
        (FutureCompleter { tx }, TargetFuture { rx })
    }

    pub fn completed(value: TargetValue) -> TargetFuture {
        let (completer, future) = Self::pending();
        completer.complete(value);
        future
    }

    pub fn failed(payload: impl Into<String>) -> TargetFuture {
        let (completer, future) = Self::pending();
        completer.complete_exceptionally(payload);
        future
    }
}

impl Future for TargetFuture {
    type Output = Completion;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(completion)) => Poll::Ready(completion),
            // No cancellation on the target side, so a vanished completer is
            // reported like any other exceptional completion.
            Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(Err(AsyncBridgeFailure {
                payload: "future abandoned without completion".to_string(),
            })),
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_completed_and_failed() {
        assert_eq!(
            block_on(TargetFuture::completed(TargetValue::Long(3))),
            Ok(TargetValue::Long(3))
        );
        assert_eq!(
            block_on(TargetFuture::failed("java.lang.IllegalStateException")),
            Err(AsyncBridgeFailure {
                payload: "java.lang.IllegalStateException".into()
            })
        );
    }

    #[test]
    fn test_completion_from_another_thread() {
        let (completer, future) = TargetFuture::pending();
        let worker = std::thread::spawn(move || completer.complete(TargetValue::Int(5)));
        assert_eq!(block_on(future), Ok(TargetValue::Int(5)));
        assert!(worker.join().unwrap());
    }

    #[test]
    fn test_dropped_completer_fails() {
        let (completer, future) = TargetFuture::pending();
        drop(completer);
        assert!(block_on(future).is_err());
    }
}
