use std::{sync::OnceLock, time::Duration};

use tracing::{debug, warn};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn install_rustls_provider() {
    static PROVIDER_INSTALLED: OnceLock<()> = OnceLock::new();
    PROVIDER_INSTALLED.get_or_init(|| {
        if let Err(e) = rustls::crypto::aws_lc_rs::default_provider().install_default() {
            debug!(existing_provider = ?e, "rustls CryptoProvider already installed");
        }
    });
}

/// Shared outbound HTTP client used for identity provider key retrieval.
pub fn build_http_client() -> reqwest::Client {
    install_rustls_provider();

    let builder = reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("overlang/", env!("CARGO_PKG_VERSION")));

    match builder.build() {
        Ok(client) => client,
        Err(error) => {
            warn!(
                error = %error,
                "Failed to build configured HTTP client; falling back to reqwest defaults"
            );
            reqwest::Client::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_is_idempotent() {
        install_rustls_provider();
        install_rustls_provider();
        let _client = build_http_client();
    }
}
