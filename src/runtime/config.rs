use anyhow::{bail, Context, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_CHAIN: &str = "main";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

pub const ENV_RPC_URL: &str = "TEZRPC_URL";
pub const ENV_CHAIN: &str = "TEZRPC_CHAIN";
pub const ENV_TIMEOUT_SECS: &str = "TEZRPC_TIMEOUT_SECS";

/// Connection settings for [`RpcClient`](crate::rpc::RpcClient).
///
/// All instances must be constructed via [`ClientConfig::builder`],
/// [`ClientConfig::new`] or [`ClientConfig::from_env`] so invariants are
/// validated before any consumer observes the values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    rpc_url: String,
    chain: String,
    request_timeout: Duration,
    user_agent: String,
}

pub struct ClientConfigParams {
    pub rpc_url: String,
    pub chain: String,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl ClientConfig {
    /// Returns a builder to incrementally construct and validate a configuration.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Constructs a configuration directly from the provided values.
    pub fn new(params: ClientConfigParams) -> Result<Self> {
        let ClientConfigParams {
            rpc_url,
            chain,
            request_timeout,
            user_agent,
        } = params;

        let config = Self {
            rpc_url: normalized_url(rpc_url),
            chain: chain.trim().to_owned(),
            request_timeout,
            user_agent: user_agent.trim().to_owned(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reads `TEZRPC_URL` (required), `TEZRPC_CHAIN` and `TEZRPC_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        let mut builder = Self::builder().rpc_url(
            env::var(ENV_RPC_URL).with_context(|| format!("{ENV_RPC_URL} must be set"))?,
        );

        if let Ok(chain) = env::var(ENV_CHAIN) {
            builder = builder.chain(chain);
        }

        if let Ok(raw) = env::var(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds"))?;
            builder = builder.request_timeout(Duration::from_secs(secs));
        }

        builder.build()
    }

    /// Node base URL without a trailing slash.
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Chain segment inserted after `/chains/`.
    pub fn chain(&self) -> &str {
        &self.chain
    }

    /// Per-request timeout applied by the default sender.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Performs validation on an existing configuration instance.
    pub fn validate(&self) -> Result<()> {
        validate_url(&self.rpc_url)?;

        if self.chain.is_empty() {
            bail!("chain cannot be empty");
        }
        crate::rpc::validate::path_segment("chain", &self.chain)?;

        if self.request_timeout.is_zero() {
            bail!("request_timeout must be greater than 0");
        }

        if self.user_agent.is_empty() {
            bail!("user_agent cannot be empty");
        }

        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct ClientConfigBuilder {
    rpc_url: Option<String>,
    chain: Option<String>,
    request_timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ClientConfigBuilder {
    pub fn rpc_url(mut self, url: impl Into<String>) -> Self {
        self.rpc_url = Some(url.into());
        self
    }

    pub fn chain(mut self, chain: impl Into<String>) -> Self {
        self.chain = Some(chain.into());
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> Result<ClientConfig> {
        let params = ClientConfigParams {
            rpc_url: self.rpc_url.context("rpc_url is required")?,
            chain: self.chain.unwrap_or_else(|| DEFAULT_CHAIN.to_owned()),
            request_timeout: self
                .request_timeout
                .unwrap_or_else(|| Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)),
            user_agent: self.user_agent.unwrap_or_else(default_user_agent),
        };

        ClientConfig::new(params)
    }
}

fn default_user_agent() -> String {
    format!("tezrpc/{}", env!("CARGO_PKG_VERSION"))
}

fn normalized_url(value: String) -> String {
    value.trim().trim_end_matches('/').to_owned()
}

fn validate_url(url: &str) -> Result<()> {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        bail!("rpc_url must start with http:// or https://");
    }
    url::Url::parse(url).with_context(|| format!("rpc_url '{url}' is not a valid URL"))?;
    Ok(())
}
