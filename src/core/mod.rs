//! Core business logic abstractions

pub mod batch;
pub mod config;
pub mod log;
pub mod rates;

// Re-export main types for cleaner imports
pub use batch::BatchCoordinator;
pub use rates::{Batch, BatchEntry, CurrencyRate, DailyRates, DateKey, RateProvider, RateRecord};
