//! Adapters module - platform adapter contract, registry, and mock platform.

mod adapter_model;
mod adapter_registry;
mod adapter_traits;
pub mod mock_adapter;

pub use adapter_model::{DailyHoldings, FailureReason, FetchError, FetchedHolding};
pub use adapter_registry::AdapterRegistry;
pub use adapter_traits::PlatformAdapter;
pub use mock_adapter::{MockAdapter, MockSeries};

#[cfg(test)]
mod adapter_tests;
