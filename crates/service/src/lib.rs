//! Kvartal service layer.
//!
//! Orchestrates the repositories in `kvartal-db` into aggregate operations:
//! houses and apartments with their images and association links, the
//! construction-order lifecycle, and token-based auth. Every mutating
//! operation runs inside a single transaction so a parent and its
//! dependents commit or roll back together. HTTP transport and request
//! validation live outside this workspace; callers consume plain structs.

pub mod apartments;
pub mod auth;
pub mod error;
pub mod houses;
pub mod orders;
pub mod storage;
pub mod users;
