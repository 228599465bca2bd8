//! Helper over `Future<Output = Result<T, E>>` mirroring the original's
//! `result.py` vocabulary (`capture_async`) without reimplementing Ok/Err —
//! `std::result::Result` already gives us map/map_err/and_then/unwrap_or/`?`
//! for free.

use std::future::Future;

/// Run a fallible async step, naming the "await this and keep its Result"
/// pattern the way the original's `capture_async` does. Used by
/// `providers::base::run_provider_search` to wrap each adapter's
/// back-end call before tagging any error with the provider name.
pub async fn capture_async<T, E, F>(f: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    f.await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn capture_async_propagates_result() {
        let r: Result<i32, &str> = capture_async(async { Ok(5) }).await;
        assert_eq!(r, Ok(5));
    }

    #[tokio::test]
    async fn capture_async_propagates_err() {
        let r: Result<i32, &str> = capture_async(async { Err("boom") }).await;
        assert_eq!(r, Err("boom"));
    }
}
