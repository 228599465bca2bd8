//! `get_cache_stats`/`clear_cache` tool handlers (MODULE L), grounded on
//! `original_source/.../presentation/handlers/cache_handler.py`.

use serde_json::json;

use crate::application::CacheUseCase;
use crate::presentation::error_formatter::{format_error_response, format_success_response};

pub struct CacheHandler<'a> {
    use_case: &'a CacheUseCase,
}

impl<'a> CacheHandler<'a> {
    pub fn new(use_case: &'a CacheUseCase) -> Self {
        Self { use_case }
    }

    pub async fn handle_get_stats(&self) -> String {
        match self.use_case.stats().await {
            Ok(stats) => {
                // The core cache tracks hit_rate as a fraction (spec §4.4,
                // §8); this is the one boundary where it's scaled into the
                // percentage the tool response names (see DESIGN.md).
                let payload = json!({
                    "cache": {
                        "size": stats.size,
                        "max_size": stats.max_size,
                        "hits": stats.hits,
                        "misses": stats.misses,
                        "hit_rate_percent": stats.hit_rate * 100.0,
                    }
                });
                format_success_response(payload).to_string()
            }
            Err(err) => format_error_response(&err).to_string(),
        }
    }

    pub async fn handle_clear(&self) -> String {
        let before = match self.use_case.stats().await {
            Ok(stats) => stats.size,
            Err(err) => return format_error_response(&err).to_string(),
        };

        match self.use_case.clear().await {
            Ok(result) => {
                let payload = json!({
                    "message": "cache cleared",
                    "details": {
                        "entries_cleared": result.entries_removed,
                        "entries_before": before,
                    }
                });
                format_success_response(payload).to_string()
            }
            Err(err) => format_error_response(&err).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::cache::InMemoryCache;
    use serde_json::Value;
    use std::sync::Arc;

    #[tokio::test]
    async fn get_stats_scales_hit_rate_to_percent() {
        let cache = Arc::new(InMemoryCache::new(10, 300));
        cache.set("a", json!(1), None).await;
        let _ = cache.get("a").await;
        let _ = cache.get("missing").await;

        let use_case = CacheUseCase::new(cache);
        let handler = CacheHandler::new(&use_case);
        let raw = handler.handle_get_stats().await;
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["cache"]["hit_rate_percent"], json!(50.0));
    }

    #[tokio::test]
    async fn clear_reports_entries_before_and_cleared() {
        let cache = Arc::new(InMemoryCache::new(10, 300));
        cache.set("a", json!(1), None).await;
        cache.set("b", json!(2), None).await;

        let use_case = CacheUseCase::new(cache);
        let handler = CacheHandler::new(&use_case);
        let raw = handler.handle_clear().await;
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["success"], json!(true));
        assert_eq!(value["details"]["entries_before"], json!(2));
        assert_eq!(value["details"]["entries_cleared"], json!(2));
    }
}
