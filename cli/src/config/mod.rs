//! CLI configuration

pub mod loader;

pub use loader::{CliConfigLoader, ResolvedCliConfig, StoreBackend};
