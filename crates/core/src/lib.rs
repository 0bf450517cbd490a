//! Domain building blocks shared by every touchgrass crate.
//!
//! Nothing in here touches the network: validation, media staging, storage
//! path naming and the small state machines are all pure and synchronous.

pub mod config;
pub mod error;
pub mod media_path;
pub mod roles;
pub mod staging;
pub mod submission;
pub mod ticket_status;
pub mod types;
pub mod validation;
