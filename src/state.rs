use std::sync::Arc;

use crate::{
    cart::CartStore,
    catalog::Catalog,
    config::AppConfig,
    share::ShareLinkFormatter,
    sink::{OrderSink, open_sink},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub catalog: Arc<Catalog>,
    pub carts: CartStore,
    pub sink: Arc<dyn OrderSink>,
    pub share: ShareLinkFormatter,
}

impl AppState {
    pub fn new(config: AppConfig, catalog: Catalog, sink: Arc<dyn OrderSink>) -> Self {
        let share = ShareLinkFormatter::new(config.app_name.clone(), config.currency.clone());
        Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            carts: CartStore::new(),
            sink,
            share,
        }
    }

    /// State backed by the configured order store and the café menu.
    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let sink = open_sink(&config.backend).await?;
        Ok(Self::new(config, Catalog::bubulizer(), sink))
    }
}
