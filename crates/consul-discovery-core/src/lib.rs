//! Core types and errors for the Consul node-discovery provider.
//!
//! This crate provides the foundational types used across the library:
//!
//! - **Types**: provider options, request options, and the raw/normalized
//!   node representations
//! - **Errors**: error handling with [`DiscoveryError`]
//!
//! # Example
//!
//! ```rust
//! use consul_discovery_core::{Node, Result};
//!
//! fn process_node(node: Node) -> Result<()> {
//!     println!("id: {}", node.id);
//!     println!("private ip: {}", node.ip.private);
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/consul-discovery-core/0.1.0")]

mod error;
pub mod types;

pub use error::{DiscoveryError, Result};
pub use types::*;
