use anyhow::Result;
use once_cell::sync::Lazy;
use tezrpc::{ClientConfig, RpcClient};
use tracing_subscriber::EnvFilter;

use crate::support::mock_rpc::MockRpcServer;

pub const MOCK_BLOCK_HASH: &str = "BLzGD63HA4RP8Fh5xEtvdQSMKa2WzJMZjQPNVUc4Rqy8Lh5BEY1";

static TRACING_SUBSCRIBER: Lazy<()> = Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
});

pub fn init_tracing() {
    Lazy::force(&TRACING_SUBSCRIBER);
}

pub fn client_for(server: &MockRpcServer) -> Result<RpcClient> {
    let config = ClientConfig::builder().rpc_url(server.url()).build()?;
    RpcClient::from_config(&config)
}

/// Asserts that the full context chain of `result`'s error mentions `needle`.
#[track_caller]
pub fn assert_err_contains<T: std::fmt::Debug>(result: Result<T>, needle: &str) {
    match result {
        Ok(value) => panic!("expected an error containing '{needle}', got {value:?}"),
        Err(err) => {
            let rendered = format!("{err:#}");
            assert!(
                rendered.contains(needle),
                "error '{rendered}' should contain '{needle}'"
            );
        }
    }
}
