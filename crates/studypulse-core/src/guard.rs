//! Total-function wrapper shared by the public operations.
//!
//! Dashboards must never see a failure: every operation body runs inside
//! [`total`], which turns an error or a panic into the operation's canonical
//! empty value and logs the cause.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;

/// Await `body`; on error or panic log it and return `fallback()` instead.
pub async fn total<T, F, D>(operation: &'static str, body: F, fallback: D) -> T
where
    F: Future<Output = anyhow::Result<T>>,
    D: FnOnce() -> T,
{
    match AssertUnwindSafe(body).catch_unwind().await {
        Ok(Ok(value)) => value,
        Ok(Err(e)) => {
            tracing::error!(operation, "{operation} failed, returning empty result: {e:#}");
            fallback()
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!(operation, "{operation} panicked, returning empty result: {message}");
            fallback()
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
