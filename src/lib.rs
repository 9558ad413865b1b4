use std::sync::Arc;

pub mod api;
pub mod constant;
pub mod error;
pub mod logging;
pub mod model;
pub mod network;
pub mod repository;
pub mod usecase;

mod config;
pub use config::{
    ApiServerCfg, AppBasepathCfg, AppConfig, AppCorsCfg, AppDataStoreCfg, AppDbServerCfg,
    AppDbServerType, AppInMemoryDbCfg, AppLogHandlerCfg, AppLoggerCfg, AppLoggingCfg,
    WebApiListenCfg, WebApiRouteCfg,
};

mod adapter;
pub use adapter::{catalog, datastore};

use catalog::{AbstractProductCatalog, AppFileProductCatalog};

type WebApiPath = String;
type WebApiHdlrLabel = &'static str;
type AppLogAlias = Arc<String>;

pub struct AppDataStoreContext {
    pub in_mem: Option<Arc<Box<dyn datastore::AbstInMemoryDStore>>>,
    pub sql_dbs: Option<Vec<Arc<datastore::AppMariaDbStore>>>,
}

// global state shared by all threads
pub struct AppSharedState {
    _cfg: Arc<AppConfig>,
    _log: Arc<logging::AppLogContext>,
    dstore: Arc<AppDataStoreContext>,
    _catalog: Arc<Box<dyn AbstractProductCatalog>>,
}

impl AppSharedState {
    /// the SQL connection pools spawn their maintenance tasks, this
    /// function has to be called within the context of tokio runtime
    pub fn new(cfg: AppConfig, log: Arc<logging::AppLogContext>) -> Self {
        let (in_mem, sql_dbs) = datastore::build_context(log.clone(), &cfg.api_server.data_store);
        let in_mem = in_mem.map(Arc::new);
        let sql_dbs = sql_dbs.map(|m| m.into_iter().map(Arc::new).collect());
        let ds_ctx = Arc::new(AppDataStoreContext { in_mem, sql_dbs });
        let catalog_path = cfg.basepath.resolve(cfg.api_server.product_catalog.as_str());
        let catalog = AppFileProductCatalog::load(catalog_path, log.clone());
        Self::with_catalog(cfg, log, ds_ctx, Box::new(catalog))
    } // end of fn new

    /// assemble the state from pre-built parts, the product catalog and
    /// data stores can be replaced e.g. for testing purpose
    pub fn with_catalog(
        cfg: AppConfig,
        log: Arc<logging::AppLogContext>,
        dstore: Arc<AppDataStoreContext>,
        catalog: Box<dyn AbstractProductCatalog>,
    ) -> Self {
        Self {
            _cfg: Arc::new(cfg),
            _log: log,
            dstore,
            _catalog: Arc::new(catalog),
        }
    }

    pub fn config(&self) -> &Arc<AppConfig> {
        &self._cfg
    }

    pub fn log_context(&self) -> &Arc<logging::AppLogContext> {
        &self._log
    }

    pub fn datastore(&self) -> Arc<AppDataStoreContext> {
        self.dstore.clone()
    }

    pub fn product_catalog(&self) -> Arc<Box<dyn AbstractProductCatalog>> {
        self._catalog.clone()
    }
} // end of impl AppSharedState

impl Clone for AppSharedState {
    fn clone(&self) -> Self {
        Self {
            _cfg: self._cfg.clone(),
            _log: self._log.clone(),
            dstore: self.dstore.clone(),
            _catalog: self._catalog.clone(),
        }
    }
}
