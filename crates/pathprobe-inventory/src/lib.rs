//! NetBrain Inventory Client
//!
//! Typed HTTP client for the NetBrain REST API, implementing the
//! [`pathprobe_core::Inventory`] interface used by the gateway resolver.
//!
//! # Example
//!
//! ```rust,no_run
//! use pathprobe_inventory::{InventoryConfig, NetBrainClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = InventoryConfig::new(
//!         "https://netbrain.example.com",
//!         "netops",
//!         "secret",
//!         "Default",
//!         "Production",
//!     );
//!     let client = NetBrainClient::connect(&config).await?;
//!
//!     for record in client.gateway_list("10.1.1.10").await? {
//!         println!("{}", record.payload);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Testing
//!
//! The `testing` module serves a scripted NetBrain over loopback:
//!
//! ```rust,ignore
//! use pathprobe_inventory::testing::{MockNetBrain, TestServer};
//!
//! let mock = MockNetBrain::new().with_gateways("10.1.1.10", &[r#"{"ip":"10.1.1.1"}"#]);
//! let server = TestServer::mock(&mock).await?;
//! let client = server.connect().await?;
//! ```

mod client;
mod config;
mod error;
pub mod testing;
pub mod types;

pub use client::{parse_ha_state, NetBrainClient};
pub use config::InventoryConfig;
pub use error::{NetBrainError, Result};
