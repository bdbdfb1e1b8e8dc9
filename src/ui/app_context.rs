use crate::config;
use crate::duplicate::{CorrelationId, DuplicateCoordinator};
use crate::file_drop::DropEnumerator;
use crate::ui::WebviewDropHost;
use std::path::PathBuf;
use std::sync::Arc;

/// Tells the import worker to start an import tagged with a correlation id
#[async_trait::async_trait]
pub trait ImportLauncher: Send + Sync {
    async fn launch(&self, id: CorrelationId, files: Vec<PathBuf>) -> Result<(), String>;
}

#[derive(Clone)]
pub struct AppContext {
    pub config: config::Config,
    pub coordinator: DuplicateCoordinator,
    pub drop_enumerator: DropEnumerator,
    pub drop_host: Arc<WebviewDropHost>,
    /// None when no worker is connected; importing is then unavailable
    pub launcher: Option<Arc<dyn ImportLauncher>>,
    pub runtime_handle: tokio::runtime::Handle,
}
