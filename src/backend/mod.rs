//! Backend query service access.

pub mod client;

pub use client::{BackendClient, BackendQuery};
