//! Pre-flight input checks. Every endpoint input implements [`Validate`]; the
//! client runs it before building a request, so a rejected input never costs
//! a round trip.

use crate::rpc::error::RpcError;

pub trait Validate {
    fn validate(&self) -> Result<(), RpcError>;
}

/// Fails when a required identifier is empty or whitespace, or cannot stand
/// as a single URL path segment.
pub fn require(field: &str, value: &str) -> Result<(), RpcError> {
    if value.trim().is_empty() {
        return Err(RpcError::validation(format!("{field} is required")));
    }
    path_segment(field, value)
}

/// Fails when `value` would escape its place in the request path: a
/// separator, a query or fragment marker, or a dot segment.
pub fn path_segment(field: &str, value: &str) -> Result<(), RpcError> {
    let escapes = value == "."
        || value == ".."
        || value.chars().any(|c| {
            matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_whitespace() || c.is_control()
        });
    if escapes {
        return Err(RpcError::validation(format!(
            "{field} '{value}' is not a valid path segment"
        )));
    }
    Ok(())
}

/// Fails when a required numeric field holds its zero value.
pub fn require_nonzero<T>(field: &str, value: T) -> Result<(), RpcError>
where
    T: Default + PartialEq,
{
    if value == T::default() {
        return Err(RpcError::validation(format!("{field} is required")));
    }
    Ok(())
}

/// Enforces the block-hash XOR cycle rule used by cycle-aware inputs.
pub fn blockhash_xor_cycle(blockhash: &str, cycle: u64) -> Result<(), RpcError> {
    match (blockhash.trim().is_empty(), cycle == 0) {
        (true, true) => Err(RpcError::validation("missing key cycle or blockhash")),
        (false, false) => Err(RpcError::validation(
            "cannot have both cycle and blockhash",
        )),
        (false, true) => path_segment("blockhash", blockhash),
        (true, false) => Ok(()),
    }
}
