//! Core domain types and logic.

pub mod observation;
pub mod raw_table;
pub mod price_series;
pub mod account;
pub mod execution;
pub mod indicator;
pub mod strategy;
pub mod guard;
pub mod engine;
pub mod sweep;
pub mod performance;
pub mod config_validation;
pub mod error;
