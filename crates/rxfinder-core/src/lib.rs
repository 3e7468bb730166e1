//! # rxfinder-core
//!
//! Foundation types shared by the rxfinder crates.
//!
//! - **Errors**: [`errors::TransportError`], [`errors::EngineError`],
//!   [`errors::BridgeError`] via `thiserror`
//! - **Tool vocabulary**: [`tools::ToolSpec`] definitions,
//!   [`tools::ToolSchemaBuilder`], and the [`tools::error_envelope`] shape
//!   every gateway operation returns on failure
//! - **Settings**: [`settings::Settings`] — compiled defaults overlaid by
//!   environment variables
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by all other rxfinder crates.

#![deny(unsafe_code)]

pub mod errors;
pub mod settings;
pub mod tools;
