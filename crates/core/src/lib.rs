//! Shared primitives for the Kvartal property-management platform.

pub mod error;
pub mod types;
