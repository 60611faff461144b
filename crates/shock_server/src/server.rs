//! Server startup and binding
//!
//! Provides functionality to start the Axum server with configurable host/port.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::{ConfigError, ServerConfig};
use crate::routes::{self, AppState};

/// Server instance that can be started
pub struct Server {
    /// Server configuration
    config: Arc<ServerConfig>,
    /// The built router
    router: Router,
}

impl Server {
    /// Create a new server with providers built from the configuration
    pub fn new(config: ServerConfig) -> Self {
        let config = Arc::new(config);
        let router = routes::build_router(config.clone());

        Self { config, router }
    }

    /// Create a server around a prepared state
    pub fn with_state(state: AppState) -> Self {
        let config = state.config.clone();
        let router = routes::router_with_state(state);

        Self { config, router }
    }

    /// Get the socket address the server will bind to
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = self.config.socket_addr();
        addr.parse().map_err(|_| ConfigError::InvalidAddress(addr))
    }

    /// Get the configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Run the server
    ///
    /// Binds to the configured host/port and serves requests until the
    /// process receives Ctrl-C.
    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self.socket_addr()?;
        let listener = TcpListener::bind(addr).await?;
        self.run_with_listener(listener).await?;
        Ok(())
    }

    /// Run the server with a specific listener
    ///
    /// Useful for tests that bind to port 0 to get a random available port.
    pub async fn run_with_listener(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(%addr, environment = %self.config.environment, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }

    /// Create a test server and return the bound address
    #[cfg(test)]
    pub async fn spawn_test_server(config: ServerConfig) -> (SocketAddr, tokio::task::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = Self::new(config);
        let handle = tokio::spawn(async move {
            server.run_with_listener(listener).await.ok();
        });

        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        (addr, handle)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_server_socket_addr() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            ..Default::default()
        };

        let server = Server::new(config);
        assert_eq!(server.socket_addr().unwrap().to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn test_invalid_host_is_an_error() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            ..Default::default()
        };

        let server = Server::new(config);
        assert!(matches!(
            server.socket_addr(),
            Err(ConfigError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_server_config_access() {
        let config = ServerConfig {
            port: 9999,
            ..Default::default()
        };

        let server = Server::new(config);
        assert_eq!(server.config().port, 9999);
    }

    #[test]
    fn test_server_with_prepared_state() {
        let config = ServerConfig {
            port: 7001,
            ..Default::default()
        };
        let state = AppState::new(Arc::new(config));

        let server = Server::with_state(state);
        assert_eq!(server.socket_addr().unwrap().port(), 7001);
    }

    #[tokio::test]
    async fn test_server_serves_health() {
        let (addr, handle) = Server::spawn_test_server(ServerConfig::default()).await;

        let response = reqwest::Client::new()
            .get(format!("http://{}/health", addr))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        handle.abort();
    }

    #[tokio::test]
    async fn test_server_serves_simulation() {
        let (addr, handle) = Server::spawn_test_server(ServerConfig::default()).await;

        let response = reqwest::Client::new()
            .post(format!("http://{}/api/simulate-strategies", addr))
            .json(&serde_json::json!({"event": "brexit"}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["summary"]["eventName"], "Brexit Referendum");

        handle.abort();
    }

    #[tokio::test]
    async fn test_server_unknown_route() {
        let (addr, handle) = Server::spawn_test_server(ServerConfig::default()).await;

        let response = reqwest::get(format!("http://{}/nope", addr)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        handle.abort();
    }
}
