//! Technical indicators used by the built-in strategies.
//!
//! Indicators here are streaming: they consume one close at a time and only
//! ever see the observations already delivered, never the rest of the series.

pub mod ema;

pub use ema::Ema;
