//! Financial Modeling Prep (FMP) series loader for foresight.
//!
//! This crate fetches daily prices, quarterly fundamentals and quotes from
//! the [Financial Modeling Prep](https://financialmodelingprep.com/) API and
//! exposes them through the [`SeriesLoader`](foresight_traits::SeriesLoader)
//! trait. Loader calls never fail: network and parse errors are logged and
//! collapse to empty series.
//!
//! # Usage
//!
//! ```rust,ignore
//! use foresight_fmp::FmpClient;
//! use foresight_traits::SeriesLoader;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FmpClient::from_env()?;
//!
//!     let bars = client.fetch_prices("7203", 730).await;
//!     let facts = client.fetch_fundamentals("7203", 730).await;
//!     let name = client.company_name("7203").await;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Environment Variables
//!
//! Set `FMP_API_KEY` in your environment or `.env` file:
//!
//! ```bash
//! FMP_API_KEY=your_api_key_here
//! ```

mod client;
mod error;
mod fundamentals;
mod loader;
mod symbol;
mod types;

pub use client::FmpClient;
pub use error::FmpError;
pub use fundamentals::{facts_from_statements, synthetic_fact};
pub use symbol::{DISPLAY_NAME_LEN, TOKYO_SUFFIX, display_name, normalize_symbol};
pub use types::*;

/// Result type for FMP operations.
pub type Result<T> = std::result::Result<T, FmpError>;
