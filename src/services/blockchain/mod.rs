//! Chain client interfaces and implementations.
//!
//! Provides abstractions and concrete implementations for reading balances
//! from different chain families. Includes:
//!
//! - Balance client trait
//! - Chain specific clients and the adapter enum over them
//! - HTTP transport with per-endpoint call tracking
//! - Adapter factory
//! - Error handling for chain operations

mod client;
mod clients;
mod error;
mod factory;
mod transports;

pub use client::BalanceClient;
pub use clients::{
	decode_token_amount, token_metadata, BeraClient, BeraClientTrait, ChainAdapter, CosmosClient,
	CosmosClientTrait, EvmClient, EvmClientTrait, SolanaClient, SolanaClientTrait,
	SubstrateClient, SuiClient, SuiClientTrait, BGT_SYMBOL, SUI_COIN_TYPE,
};
pub use error::BlockChainError;
pub use factory::{create_chain_adapter, AdapterContext};
pub use transports::{
	endpoint_host, BlockchainTransport, CallStatus, CallTracker, HttpTransportClient,
};
