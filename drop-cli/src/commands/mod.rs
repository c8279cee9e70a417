//! CLI command implementations.

pub mod receive;
pub mod send;

#[cfg(test)]
pub(crate) mod testing;
