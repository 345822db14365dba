//! # Market Container
//!
//! Configuration and dependency injection for the lifecycle subsystems.
//!
//! ```text
//! Level 0: Persistence gateway (in-memory, deadline-bounded)
//! Level 1: Listing lifecycle manager
//! Level 2: Buy-request lifecycle manager (reads listings through level 1)
//! ```

pub mod config;
pub mod subsystems;

pub use config::{
    load_config, ConfigError, ListingLimits, MarketConfig, PaginationConfig, StorageConfig,
};
pub use subsystems::{BuyRequestService, ListingService, MarketContainer, StorageGateway};
