//! Series loader trait for fetching price and fundamentals history.
//!
//! A `SeriesLoader` is the external collaborator that supplies the engine with
//! a symbol's daily bars and its sparse fundamental facts. The engine never
//! retries or times out loader calls itself; that belongs at this boundary or
//! in the caller.

use crate::{Bar, FundamentalFact};
use async_trait::async_trait;

/// Supplies historical series for one symbol.
///
/// Implementations must not fail past this boundary: network errors, missing
/// symbols and unparseable payloads all collapse to an empty vector (and
/// should be logged by the implementation). Implementations should be
/// thread-safe (`Send + Sync`) so one loader can serve concurrent requests.
///
/// # Example
///
/// ```no_run
/// use async_trait::async_trait;
/// use foresight_traits::{Bar, FundamentalFact, SeriesLoader};
///
/// struct InMemoryLoader {
///     bars: Vec<Bar>,
/// }
///
/// #[async_trait]
/// impl SeriesLoader for InMemoryLoader {
///     async fn fetch_prices(&self, _symbol: &str, _lookback_days: u32) -> Vec<Bar> {
///         self.bars.clone()
///     }
///
///     async fn fetch_fundamentals(&self, _symbol: &str, _lookback_days: u32) -> Vec<FundamentalFact> {
///         Vec::new()
///     }
/// }
/// ```
#[async_trait]
pub trait SeriesLoader: Send + Sync {
    /// Fetches daily bars covering roughly the last `lookback_days` calendar days.
    ///
    /// The result should be ordered by date but the engine normalizes it
    /// anyway. Returns an empty vector when no data is available.
    async fn fetch_prices(&self, symbol: &str, lookback_days: u32) -> Vec<Bar>;

    /// Fetches fundamental facts, one per earnings announcement.
    ///
    /// Returns an empty vector when fundamentals are unavailable; the engine
    /// then trains on technical features alone.
    async fn fetch_fundamentals(&self, symbol: &str, lookback_days: u32) -> Vec<FundamentalFact>;

    /// Returns a short display name for the symbol.
    ///
    /// Defaults to the symbol itself.
    async fn company_name(&self, symbol: &str) -> String {
        symbol.to_string()
    }
}
