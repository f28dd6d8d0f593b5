//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate subject and lab repositories into screen-level APIs.
//! - Keep callers decoupled from SQL details.

pub mod catalog_service;
