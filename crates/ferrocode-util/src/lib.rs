//! Shared utilities for ferrocode.
//!
//! This crate provides common utilities used across the ferrocode workspace:
//! - ULID-based identifier generation
//! - Logging setup with tracing
//! - Path normalization and containment helpers

pub mod id;
pub mod log;
pub mod path;

pub use id::Identifier;
