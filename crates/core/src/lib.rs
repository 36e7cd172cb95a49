//! Core business logic for the talent portal.
//!
//! This crate contains pure business logic with ZERO web dependencies.
//!
//! # Modules
//!
//! - `upload` - Resume upload filtering and storage
//! - `talent` - Form submissions, email rendering, and dispatch

pub mod talent;
pub mod upload;
