//! Chain metadata registry.
//!
//! Resolves per-chain symbol, decimals and denom, loaded once at startup.

mod chain_registry;
mod error;

pub use chain_registry::ChainRegistry;
pub use error::RegistryError;
