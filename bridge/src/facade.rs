//! Async facade: runs adapter calls off the caller's context.
//!
//! Each call goes to the runtime's blocking pool and comes back through a
//! [`Promise`] the caller awaits on its own task. The facade owns a
//! cancellation scope; tearing it down discards every result that has not
//! reached its caller yet.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use mathoku::error::panic_message;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::adapter::BridgeAdapter;
use crate::config::FacadeConfig;
use crate::error::BridgeError;

/// Eventual result of one bridge call.
///
/// Resolves to `Some(Ok(_))` or `Some(Err(_))` exactly once, or to `None` if
/// the owning facade was torn down first. Awaiting a promise after teardown
/// always yields `None`, even if the call had already finished.
#[must_use = "a promise does nothing unless awaited"]
pub struct Promise<T> {
    operation: &'static str,
    receiver: oneshot::Receiver<Result<T, BridgeError>>,
    scope: CancellationToken,
}

impl<T> Promise<T> {
    /// A promise that is already settled with `outcome`.
    pub(crate) fn settled(
        operation: &'static str,
        scope: CancellationToken,
        outcome: Result<T, BridgeError>,
    ) -> Self {
        let (sender, receiver) = oneshot::channel();
        let _ = sender.send(outcome);
        Self {
            operation,
            receiver,
            scope,
        }
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }
}

impl<T> Future for Promise<T> {
    type Output = Option<Result<T, BridgeError>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if this.scope.is_cancelled() {
            return Poll::Ready(None);
        }
        match Pin::new(&mut this.receiver).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(Some(outcome)),
            // The sender is only dropped unsent on teardown or runtime shutdown.
            Poll::Ready(Err(_)) if this.scope.is_cancelled() => Poll::Ready(None),
            Poll::Ready(Err(_)) => Poll::Ready(Some(Err(BridgeError::call_failure(format!(
                "{} was abandoned before it settled",
                this.operation
            ))))),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Dispatches [`BridgeAdapter`] calls onto a background context.
///
/// Dropping the facade tears it down.
pub struct AsyncFacade {
    adapter: BridgeAdapter,
    runtime: Handle,
    scope: CancellationToken,
    config: FacadeConfig,
}

impl AsyncFacade {
    pub fn new(adapter: BridgeAdapter, runtime: Handle, config: FacadeConfig) -> Self {
        Self {
            adapter,
            runtime,
            scope: CancellationToken::new(),
            config,
        }
    }

    pub fn adapter(&self) -> &BridgeAdapter {
        &self.adapter
    }

    pub fn greet(&self, name: impl Into<String>) -> Promise<String> {
        let name = name.into();
        self.dispatch("greet", move |adapter| adapter.greet(&name))
    }

    pub fn get_dummy_user_json(&self) -> Promise<String> {
        self.dispatch("getDummyUserJson", |adapter| adapter.get_dummy_user_json())
    }

    /// Cancel the scope. In-flight native calls run to completion but their
    /// results are dropped. Never blocks and never fails.
    pub fn teardown(&self) {
        if !self.scope.is_cancelled() {
            debug!("tearing down bridge scope");
            self.scope.cancel();
        }
    }

    pub fn is_torn_down(&self) -> bool {
        self.scope.is_cancelled()
    }

    pub(crate) fn scope(&self) -> &CancellationToken {
        &self.scope
    }

    fn dispatch<F>(&self, operation: &'static str, call: F) -> Promise<String>
    where
        F: FnOnce(&BridgeAdapter) -> Result<String, BridgeError> + Send + 'static,
    {
        let (sender, receiver) = oneshot::channel();
        let promise = Promise {
            operation,
            receiver,
            scope: self.scope.clone(),
        };

        if self.scope.is_cancelled() {
            debug!(operation, "bridge scope already torn down; call dropped");
            return promise;
        }

        let adapter = self.adapter.clone();
        let work = self.runtime.spawn_blocking(move || call(&adapter));
        let scope = self.scope.clone();
        let timeout = self.config.call_timeout;

        self.runtime.spawn(async move {
            tokio::select! {
                biased;
                _ = scope.cancelled() => {
                    debug!(operation, "bridge scope cancelled; discarding result");
                }
                outcome = settle(work, operation, timeout) => {
                    if scope.is_cancelled() {
                        debug!(operation, "bridge scope cancelled; discarding result");
                    } else if sender.send(outcome).is_err() {
                        debug!(operation, "caller dropped the promise");
                    }
                }
            }
        });

        promise
    }
}

impl Drop for AsyncFacade {
    fn drop(&mut self) {
        self.teardown();
    }
}

async fn settle(
    work: JoinHandle<Result<String, BridgeError>>,
    operation: &'static str,
    timeout: Option<Duration>,
) -> Result<String, BridgeError> {
    let joined = match timeout {
        Some(limit) => match tokio::time::timeout(limit, work).await {
            Ok(joined) => joined,
            Err(_) => {
                return Err(BridgeError::call_failure(format!(
                    "{operation} timed out after {} ms",
                    limit.as_millis()
                )))
            }
        },
        None => work.await,
    };

    joined.unwrap_or_else(|err| {
        let cause = if err.is_panic() {
            panic_message(&*err.into_panic())
        } else {
            err.to_string()
        };
        Err(BridgeError::call_failure(format!("{operation} failed: {cause}")))
    })
}
