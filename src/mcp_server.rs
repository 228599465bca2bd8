// src/mcp_server.rs

use std::sync::Arc;

use rmcp::{
    ServerHandler, ServiceExt,
    model::{ServerCapabilities, ServerInfo},
    schemars, tool,
    transport::stdio,
};
use anyhow::Result;

use flight_finder::application::CacheUseCase;
use flight_finder::infrastructure::providers::{Aggregator, ProviderFactory};
use flight_finder::logging::configure_logging;
use flight_finder::presentation::handlers::{CacheHandler, SearchHandler};
use flight_finder::presentation::schemas::SearchFlightsParams;
use flight_finder::Settings;

/// Flight search MCP server. Holds one aggregator wired to every configured
/// provider and one cache use case sharing the factory's cache instance;
/// both are cheap to clone-and-share since the providers and cache are
/// already behind `Arc`.
#[derive(Clone)]
pub struct FlightFinderServer {
    aggregator: Arc<Aggregator>,
    cache_use_case: Arc<CacheUseCase>,
    max_search_results: usize,
}

impl FlightFinderServer {
    pub async fn new(settings: &Settings) -> Self {
        let factory = ProviderFactory::new(settings);
        factory.build_registry(settings).await;
        let aggregator = factory.create_aggregator().await;
        let cache_use_case = CacheUseCase::new(factory.cache());

        Self {
            aggregator: Arc::new(aggregator),
            cache_use_case: Arc::new(cache_use_case),
            max_search_results: settings.max_search_results,
        }
    }
}

#[tool(tool_box)]
impl FlightFinderServer {
    #[tool(
        description = "Search for flights between two airports on a given date, fanning the \
                        search out across every configured provider and returning deduplicated, \
                        price-sorted results."
    )]
    async fn search_flights(
        &self,
        #[tool(aggr)] params: SearchFlightsParams,
    ) -> String {
        let handler = SearchHandler::new(&self.aggregator, self.max_search_results);
        handler.handle_search(&params).await
    }

    #[tool(description = "Return hit/miss counters and current size for the shared result cache.")]
    async fn get_cache_stats(&self) -> String {
        let handler = CacheHandler::new(&self.cache_use_case);
        handler.handle_get_stats().await
    }

    #[tool(description = "Evict every entry from the shared result cache.")]
    async fn clear_cache(&self) -> String {
        let handler = CacheHandler::new(&self.cache_use_case);
        handler.handle_clear().await
    }
}

#[tool(tool_box)]
impl ServerHandler for FlightFinderServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "A multi-provider flight search server. search_flights fans a single query out \
                 across every configured back-end and returns deduplicated, price-sorted \
                 results; get_cache_stats and clear_cache manage the shared result cache."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::from_env()?;
    configure_logging(&settings.log_level, &settings.log_format);

    if !settings.has_any_provider_key() {
        tracing::warn!("no provider API keys configured; every search will fail");
    }

    let server = FlightFinderServer::new(&settings).await;
    let transport = stdio();

    // SDK handles initialization, tool discovery, and message routing
    let service = server.serve(transport).await?;

    // Wait for shutdown
    service.waiting().await?;

    Ok(())
}
