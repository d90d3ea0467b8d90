//! # Builders
//!
//! Builder patterns for configuring adapter sessions.
//!
//! ## Modules
//!
//! - [`session_builder`] - Builder for [`AdapterSession`](crate::AdapterSession)

pub mod session_builder;

pub use session_builder::AdapterSessionBuilder;
