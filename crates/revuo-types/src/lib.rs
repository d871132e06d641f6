//! Shared types, adapter traits, and core utilities for the Revuo review platform.
//!
//! This crate contains the foundational types that are shared between the
//! server crate and the storage adapter implementations. Extracting these into
//! a separate crate allows adapter crates to compile in parallel with the
//! server's feature modules.

pub mod error;
pub mod extract;
pub mod prelude;
pub mod store_adapter;
pub mod types;
pub mod utils;

// vim: ts=4
