//! Provider registry (MODULE J), grounded on
//! `original_source/.../infrastructure/providers/provider_registry.py`.
//! Tracks which back-ends are known, their priority (used to pick the
//! aggregation order/top-N when a caller wants fewer than all of them), and
//! whether they're currently enabled. Registration is idempotent: a second
//! registration of the same name is logged and ignored rather than
//! overwriting the first.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::infrastructure::providers::base::FlightProvider;

#[derive(Debug, Clone)]
pub struct ProviderStatus {
    pub name: String,
    pub priority: u32,
    pub enabled: bool,
}

struct Entry {
    provider: Arc<dyn FlightProvider>,
    priority: u32,
    enabled: bool,
}

pub struct ProviderRegistry {
    entries: RwLock<HashMap<String, Entry>>,
    /// Names in the order `register` was called, independent of `entries`'
    /// HashMap iteration order. Consulted by [`ProviderRegistry::in_registration_order`]
    /// so aggregator construction doesn't depend on priority sorting.
    order: RwLock<Vec<String>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            order: RwLock::new(Vec::new()),
        }
    }

    /// Registers `provider` under its own `provider_name()`. A duplicate
    /// registration is ignored (first registration wins) and logged.
    pub async fn register(&self, provider: Arc<dyn FlightProvider>, priority: u32) {
        let name = provider.provider_name().to_string();
        let mut entries = self.entries.write().await;
        if entries.contains_key(&name) {
            tracing::warn!(provider = name.as_str(), "ignoring duplicate provider registration");
            return;
        }
        entries.insert(
            name.clone(),
            Entry {
                provider,
                priority,
                enabled: true,
            },
        );
        self.order.write().await.push(name);
    }

    pub async fn get(&self, name: &str) -> Option<Arc<dyn FlightProvider>> {
        self.entries.read().await.get(name).map(|e| e.provider.clone())
    }

    pub async fn all(&self) -> Vec<Arc<dyn FlightProvider>> {
        self.entries.read().await.values().map(|e| e.provider.clone()).collect()
    }

    /// Enabled providers only, sorted by descending priority, optionally
    /// truncated to the top `limit`.
    pub async fn enabled_by_priority(&self, limit: Option<usize>) -> Vec<Arc<dyn FlightProvider>> {
        let entries = self.entries.read().await;
        let mut sorted: Vec<&Entry> = entries.values().filter(|e| e.enabled).collect();
        sorted.sort_by(|a, b| b.priority.cmp(&a.priority));
        let iter = sorted.into_iter().map(|e| e.provider.clone());
        match limit {
            Some(n) => iter.take(n).collect(),
            None => iter.collect(),
        }
    }

    /// Enabled providers in the order they were registered — the order the
    /// aggregator fans out in, independent of `priority` (which is only ever
    /// used to pick a truncated top-N via [`ProviderRegistry::enabled_by_priority`]).
    pub async fn in_registration_order(&self) -> Vec<Arc<dyn FlightProvider>> {
        let order = self.order.read().await;
        let entries = self.entries.read().await;
        order
            .iter()
            .filter_map(|name| entries.get(name))
            .filter(|e| e.enabled)
            .map(|e| e.provider.clone())
            .collect()
    }

    pub async fn set_enabled(&self, name: &str, enabled: bool) -> bool {
        let mut entries = self.entries.write().await;
        match entries.get_mut(name) {
            Some(entry) => {
                entry.enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub async fn status(&self) -> Vec<ProviderStatus> {
        self.entries
            .read()
            .await
            .iter()
            .map(|(name, e)| ProviderStatus {
                name: name.clone(),
                priority: e.priority,
                enabled: e.enabled,
            })
            .collect()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SearchCriteria;
    use crate::domain::Flight;
    use crate::error::DomainError;
    use async_trait::async_trait;

    struct Dummy(&'static str);

    #[async_trait]
    impl FlightProvider for Dummy {
        fn provider_name(&self) -> &str {
            self.0
        }

        async fn search(&self, _criteria: &SearchCriteria) -> Result<Vec<Flight>, DomainError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn duplicate_registration_is_ignored() {
        let registry = ProviderRegistry::new();
        registry.register(Arc::new(Dummy("kiwi")), 75).await;
        registry.register(Arc::new(Dummy("kiwi")), 10).await;
        let status = registry.status().await;
        assert_eq!(status.len(), 1);
        assert_eq!(status[0].priority, 75);
    }

    #[tokio::test]
    async fn enabled_by_priority_orders_descending() {
        let registry = ProviderRegistry::new();
        registry.register(Arc::new(Dummy("low")), 10).await;
        registry.register(Arc::new(Dummy("high")), 90).await;
        let ordered = registry.enabled_by_priority(None).await;
        assert_eq!(ordered[0].provider_name(), "high");
        assert_eq!(ordered[1].provider_name(), "low");
    }

    #[tokio::test]
    async fn disabling_excludes_from_enabled_list() {
        let registry = ProviderRegistry::new();
        registry.register(Arc::new(Dummy("kiwi")), 75).await;
        assert!(registry.set_enabled("kiwi", false).await);
        assert!(registry.enabled_by_priority(None).await.is_empty());
    }

    #[tokio::test]
    async fn set_enabled_on_unknown_provider_returns_false() {
        let registry = ProviderRegistry::new();
        assert!(!registry.set_enabled("missing", false).await);
    }

    #[tokio::test]
    async fn in_registration_order_ignores_priority() {
        let registry = ProviderRegistry::new();
        registry.register(Arc::new(Dummy("low")), 10).await;
        registry.register(Arc::new(Dummy("high")), 90).await;
        let ordered = registry.in_registration_order().await;
        assert_eq!(ordered[0].provider_name(), "low");
        assert_eq!(ordered[1].provider_name(), "high");
    }

    #[tokio::test]
    async fn in_registration_order_excludes_disabled() {
        let registry = ProviderRegistry::new();
        registry.register(Arc::new(Dummy("kiwi")), 75).await;
        registry.register(Arc::new(Dummy("skyscanner")), 90).await;
        registry.set_enabled("kiwi", false).await;
        let ordered = registry.in_registration_order().await;
        assert_eq!(ordered.len(), 1);
        assert_eq!(ordered[0].provider_name(), "skyscanner");
    }
}
