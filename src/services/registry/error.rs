use thiserror::Error;

use crate::services::blockchain::BlockChainError;

/// Errors raised while loading the registry tables at startup
#[derive(Debug, Error)]
pub enum RegistryError {
	#[error("Failed to fetch registry table: {0}")]
	FetchError(#[from] BlockChainError),

	#[error("Unexpected registry table format: {0}")]
	FormatError(String),
}
