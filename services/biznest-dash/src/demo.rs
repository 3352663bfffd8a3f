// services/biznest-dash/src/demo.rs
//
// Demo mode: an in-process mock backend on an ephemeral port, seeded with
// the sample directory, and a client context wired to it
//

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

use mock_api::{seed, MockBackend};
use svckit::config::ClientConfig;
use svckit::http::ReqwestTransport;
use svckit::storage::ClientStorage;
use svckit::BizNest;

pub struct DemoBackend {
    pub backend: Arc<MockBackend>,
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl DemoBackend {
    pub async fn start(seeded: bool) -> Result<Self> {
        let backend = Arc::new(MockBackend::new());
        if seeded {
            seed::populate(&backend)?;
        }
        let (addr, handle) = mock_api::spawn_server(backend.clone()).await?;
        info!("Demo backend ready at http://{}", addr);
        Ok(Self {
            backend,
            addr,
            handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Client context pointed at this backend
    pub fn connect(&self, mut config: ClientConfig, storage: Arc<dyn ClientStorage>) -> Result<BizNest> {
        config.api.base_url = self.base_url();
        let transport = ReqwestTransport::new(&config.api.base_url, config.api.timeout())?;
        Ok(BizNest::new(config, Arc::new(transport), storage))
    }
}

impl Drop for DemoBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
