//! Server module for running Terraform providers
//!
//! Starts the gRPC server with TLS and performs the go-plugin handshake:
//! Terraform launches the provider binary, reads one line from its stdout and
//! connects to the address announced there. Everything else the process
//! writes must go to stderr.

use crate::context::Context;
use crate::error::{Result, TfplugError};
use crate::grpc::GrpcProviderServer;
use crate::proto::provider_server::ProviderServer;
use crate::provider::Provider;
use base64::Engine;
use rustls::pki_types::pem::PemObject;
use rustls::pki_types::CertificateDer;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tonic::transport::{Certificate, Identity, Server, ServerTlsConfig};
use tracing::{debug, info, warn};

pub const MAGIC_COOKIE_KEY: &str = "TF_PLUGIN_MAGIC_COOKIE";
pub const MAGIC_COOKIE_VALUE: &str =
    "d602bf8f470bc67ca7faa0386276bbdd4330efaf76d1a219cb4d6991ca9872b2";

/// Certificate Terraform uses as client identity under AutoMTLS
const CLIENT_CERT_ENV: &str = "PLUGIN_CLIENT_CERT";

const PROTOCOL_VERSION: u32 = 6;

/// Server configuration for running a Terraform provider
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Path to TLS certificate file (PEM)
    pub cert_path: PathBuf,
    /// Path to TLS key file (PEM)
    pub key_path: PathBuf,
    /// Maximum message size in bytes
    pub max_message_size: usize,
    /// Timeout for graceful shutdown
    pub shutdown_timeout: Duration,
    /// Refuse to start unless launched by Terraform
    pub require_magic_cookie: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let certs = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join("certs")))
            .unwrap_or_else(|| PathBuf::from("certs"));

        Self {
            cert_path: certs.join("localhost.pem"),
            key_path: certs.join("localhost-key.pem"),
            max_message_size: 256 << 20, // 256MB
            shutdown_timeout: Duration::from_secs(30),
            require_magic_cookie: true,
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `TF_PLUGIN_CERT_PATH` and `TF_PLUGIN_KEY_PATH`
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(path) = std::env::var_os("TF_PLUGIN_CERT_PATH") {
            config.cert_path = PathBuf::from(path);
        }
        if let Some(path) = std::env::var_os("TF_PLUGIN_KEY_PATH") {
            config.key_path = PathBuf::from(path);
        }
        config
    }

    pub fn with_cert_path(mut self, path: PathBuf) -> Self {
        self.cert_path = path;
        self
    }

    pub fn with_key_path(mut self, path: PathBuf) -> Self {
        self.key_path = path;
        self
    }

    pub fn with_max_message_size(mut self, size: usize) -> Self {
        self.max_message_size = size;
        self
    }

    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Allow starting outside Terraform, e.g. for debugging
    pub fn without_magic_cookie(mut self) -> Self {
        self.require_magic_cookie = false;
        self
    }
}

/// Verify the process was started by Terraform
pub fn check_magic_cookie() -> Result<()> {
    match std::env::var(MAGIC_COOKIE_KEY) {
        Ok(value) if value == MAGIC_COOKIE_VALUE => Ok(()),
        _ => Err(TfplugError::NotLaunchedByTerraform),
    }
}

/// go-plugin handshake: `core|protocol|network|address|grpc|server cert`
pub fn handshake_line(addr: &SocketAddr, cert_der: &[u8]) -> String {
    let cert = base64::engine::general_purpose::STANDARD_NO_PAD.encode(cert_der);
    format!("1|{}|tcp|{}|grpc|{}", PROTOCOL_VERSION, addr, cert)
}

/// Main entry point for running a provider
///
/// Returns once Terraform calls `StopProvider`, on Ctrl-C, or when the
/// server fails.
pub async fn serve<P: Provider + 'static>(provider: P, config: ServerConfig) -> Result<()> {
    if config.require_magic_cookie {
        check_magic_cookie()?;
    }

    // Fails only when a provider is already installed, which is fine
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let cert = tokio::fs::read(&config.cert_path).await.map_err(|e| {
        TfplugError::TlsError(format!(
            "Failed to read certificate {}: {}",
            config.cert_path.display(),
            e
        ))
    })?;
    let key = tokio::fs::read(&config.key_path).await.map_err(|e| {
        TfplugError::TlsError(format!(
            "Failed to read key {}: {}",
            config.key_path.display(),
            e
        ))
    })?;

    let cert_der = CertificateDer::from_pem_slice(&cert)
        .map_err(|e| TfplugError::TlsError(format!("Invalid certificate: {}", e)))?;

    let mut tls_config = ServerTlsConfig::new().identity(Identity::from_pem(&cert, &key));
    if let Ok(client_cert) = std::env::var(CLIENT_CERT_ENV) {
        debug!("using client certificate from Terraform");
        tls_config = tls_config.client_ca_root(Certificate::from_pem(client_cert));
    }

    let ctx = Context::new();
    let grpc_server = GrpcProviderServer::with_context(provider, ctx.clone());
    let provider_service = ProviderServer::new(grpc_server)
        .max_decoding_message_size(config.max_message_size)
        .max_encoding_message_size(config.max_message_size);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    println!("{}", handshake_line(&addr, cert_der.as_ref()));
    info!(address = %addr, "provider server listening");

    let shutdown_ctx = ctx.clone();
    let server = Server::builder()
        .tls_config(tls_config)?
        .add_service(provider_service)
        .serve_with_incoming_shutdown(
            tokio_stream::wrappers::TcpListenerStream::new(listener),
            async move { shutdown_ctx.cancelled().await },
        );
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => {
            result?;
            info!("provider server stopped");
            return Ok(());
        }
        _ = tokio::signal::ctrl_c() => {
            debug!("interrupted");
            ctx.cancel();
        }
        _ = ctx.cancelled() => debug!("stop requested by Terraform"),
    }

    // In-flight requests get shutdown_timeout to finish
    match tokio::time::timeout(config.shutdown_timeout, server).await {
        Ok(result) => result?,
        Err(_) => warn!(
            timeout = ?config.shutdown_timeout,
            "shutdown timeout exceeded, forcing shutdown"
        ),
    }

    info!("provider server stopped");
    Ok(())
}

/// Convenience function to run a provider with configuration from the environment
pub async fn serve_default<P: Provider + 'static>(provider: P) -> Result<()> {
    serve(provider, ServerConfig::from_env()).await
}
