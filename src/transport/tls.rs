use anyhow::{Context, Result};
use axum_server::tls_rustls::RustlsConfig;
use std::path::Path;

/// Loads the certificate/key pair the orchestrator presents to agents.
pub async fn server_tls_config(cert: &Path, key: &Path) -> Result<RustlsConfig> {
    RustlsConfig::from_pem_file(cert, key)
        .await
        .with_context(|| {
            format!(
                "failed to load TLS material from {} / {}",
                cert.display(),
                key.display()
            )
        })
}

/// Loads the trust root agents validate the orchestrator against.
pub fn load_root_ca(path: &Path) -> Result<reqwest::Certificate> {
    let pem = std::fs::read(path)
        .with_context(|| format!("failed to read trust root {}", path.display()))?;
    reqwest::Certificate::from_pem(&pem)
        .with_context(|| format!("trust root {} is not valid PEM", path.display()))
}

/// Builds an HTTPS client that trusts exactly the provisioned root.
///
/// Built-in roots are disabled: the orchestrator's certificate chain must
/// anchor at the configured root, and the server name is verified against
/// the connection URL as usual.
pub fn https_client(root_ca: reqwest::Certificate) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .use_rustls_tls()
        .tls_built_in_root_certs(false)
        .add_root_certificate(root_ca)
        .build()
        .context("failed to build HTTPS client")
}
