//! Bid queue indexer library
//!
//! Follows a bid queue contract's events over Soroban RPC, keeps an in-memory
//! projection of its bids and serves it over HTTP.

pub mod bids;
pub mod config;
pub mod error;
pub mod handlers;
pub mod indexer;
pub mod middleware;
pub mod routes;
pub mod state;
