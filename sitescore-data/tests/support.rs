//! Shared harness for HTTP adapter behaviour tests.

use tokio::runtime::Runtime;
use wiremock::{Mock, MockServer, Request};

/// A mock HTTP server driven from synchronous test steps.
///
/// The adapters under test block on their own runtime, so steps run outside
/// any async context and only use this runtime to drive `wiremock`.
pub struct MockService {
    server: MockServer,
    runtime: Runtime,
}

impl MockService {
    /// Start a fresh server.
    pub fn start() -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap_or_else(|err| panic!("failed to build test runtime: {err}"));
        let server = runtime.block_on(MockServer::start());
        Self { server, runtime }
    }

    /// Register a mock. Earlier mounts win over later ones.
    pub fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    /// Base URI of the server, without a trailing slash.
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Every request the server has seen, in arrival order.
    pub fn requests(&self) -> Vec<Request> {
        self.runtime
            .block_on(self.server.received_requests())
            .unwrap_or_default()
    }
}
