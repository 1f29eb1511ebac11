pub mod codec;
pub mod endpoints;
pub mod rpc;
pub mod runtime;

pub use codec::NumericString;
pub use rpc::{Cycle, Endpoint, HttpSender, NodeError, QueryOptions, RawBody, RpcClient, RpcError};
pub use runtime::config::{ClientConfig, ClientConfigBuilder, ClientConfigParams};
pub use runtime::telemetry::{init_tracing, init_tracing_with};
