//! Technical indicators computed over a full daily series.
//!
//! Every function returns a vector aligned with its input. Positions where the
//! indicator is still warming up hold `None`, so the feature builder can tell
//! "not enough history yet" apart from a genuine value.
//!
//! - Moving averages: simple (SMA) and exponential (EMA)
//! - Momentum: relative strength index (RSI), stochastic oscillator
//! - Trend: moving-average convergence/divergence (MACD)
//! - Volatility: average true range (ATR)

mod atr;
mod macd;
mod moving_average;
mod rsi;
mod stochastic;

pub use atr::{average_true_range, true_range};
pub use macd::{Macd, macd};
pub use moving_average::{ema, simple_returns, sma};
pub use rsi::rsi;
pub use stochastic::{Stochastic, stochastic};
