use anyhow::Result;
use std::sync::Arc;

use crate::config::Config;
use crate::progression::ProgressionAggregator;
use crate::raiderio::RaiderIoClient;

pub mod handlers;
pub mod routes;

pub async fn start(config: Arc<Config>) -> Result<()> {
    let state = State::new(&config);

    tracing::info!("listening at {}", config.web.host);
    warp::serve(routes::router(state)).run(config.web.host).await;
    Ok(())
}

pub struct State {
    pub aggregator: ProgressionAggregator,
}

impl State {
    pub fn new(config: &Config) -> Arc<Self> {
        let raiderio = &config.raiderio;
        let client = Arc::new(RaiderIoClient::with_base_url(raiderio.base_url.as_str()));

        let aggregator = ProgressionAggregator::new(
            client,
            raiderio.progression_settings(),
            raiderio.access_key.clone(),
        );

        if !aggregator.has_access_key() {
            tracing::warn!("Raider.IO access key not configured, boss rankings will be unavailable.");
        }

        Arc::new(Self { aggregator })
    }

    /// 응답 캐시 헤더 값
    pub fn cache_control(&self) -> String {
        let window = self.aggregator.settings().revalidate_seconds;
        if window == 0 {
            "no-store".to_string()
        } else {
            format!("public, max-age={window}, stale-while-revalidate={window}")
        }
    }
}
