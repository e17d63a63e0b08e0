//! pointswap-core: loyalty points exchange.
//!
//! Pure computation lives in `rate_table`, `catalog`, `translator`,
//! `conversion` and `rate_board`. Persistence lives in `store`, and
//! `exchange_service` ties the two together for the runner.

pub mod catalog;
pub mod command;
pub mod config;
pub mod conversion;
pub mod error;
pub mod event;
pub mod exchange_service;
pub mod narrative;
pub mod program;
pub mod rate_board;
pub mod rate_table;
pub mod store;
pub mod translator;
pub mod types;
