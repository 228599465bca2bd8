//! Cache management use case (MODULE K), grounded on
//! `original_source/.../application/use_cases/cache_management_use_case.py`.

use std::sync::Arc;

use crate::application::dtos::{CacheClearResultDto, CacheStatsDto};
use crate::error::DomainError;
use crate::infrastructure::cache::InMemoryCache;

pub struct CacheUseCase {
    cache: Arc<InMemoryCache>,
}

impl CacheUseCase {
    pub fn new(cache: Arc<InMemoryCache>) -> Self {
        Self { cache }
    }

    pub async fn stats(&self) -> Result<CacheStatsDto, DomainError> {
        let stats = self.cache.stats().await;
        Ok(CacheStatsDto {
            hits: stats.hits,
            misses: stats.misses,
            size: stats.size,
            max_size: stats.max_size,
            hit_rate: stats.hit_rate(),
        })
    }

    pub async fn clear(&self) -> Result<CacheClearResultDto, DomainError> {
        let entries_removed = self.cache.clear().await;
        Ok(CacheClearResultDto { entries_removed })
    }
}
