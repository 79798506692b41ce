//! # Homeroom Circulation Proxy
//!
//! Proxies a school library circulation API: resolves a homeroom name to
//! its students' district IDs, fetches each student's checkout status
//! upstream, and computes a per-student borrowing allowance. A single
//! OAuth2 client-credentials bearer token is cached in memory and
//! refreshed on expiry.
//!
//! Modules:
//! - `config` — service configuration (YAML) and credential resolution
//! - `directory` — static homeroom -> district-ID table
//! - `token` — cached bearer token and refresh logic
//! - `patron` — upstream patron-status reads with fallback on failure
//! - `allowance` — pure borrowing-allowance computation
//! - `server` — axum routes and response shaping

pub mod allowance;
pub mod config;
pub mod directory;
pub mod patron;
pub mod server;
pub mod tests;
pub mod token;
pub mod utils;
