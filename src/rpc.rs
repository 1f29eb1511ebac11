//! RPC access layer: transport and error classification, endpoint
//! descriptors, query options, input validation and cycle resolution.

pub mod client;
pub mod cycle;
pub mod endpoint;
pub mod error;
pub mod options;
pub mod sender;
pub mod validate;

pub use client::RpcClient;
pub use cycle::Cycle;
pub use endpoint::{DecodeResponse, Endpoint, RawBody, Scope};
pub use error::{NodeError, RpcError};
pub use options::{QueryOption, QueryOptions};
pub use sender::{HttpRequest, HttpResponse, HttpSender, HyperSender, Method};
pub use validate::Validate;
