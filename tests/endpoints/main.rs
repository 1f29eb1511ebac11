#[path = "../support/mod.rs"]
mod support;

mod chain;
mod delegate;
