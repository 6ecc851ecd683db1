//! # Utility Modules
//!
//! This module contains configuration loading, secrets and constants used
//! throughout the application.
//!
//! ## Available Utilities
//!
//! - **Config** (`config`) - Startup configuration loaded from the environment
//! - **Constants** (`constant`) - Application-wide configuration constants
//! - **Secret** (`secret`) - Secret lookup with `*_FILE` indirection

pub mod config;
pub mod constant;
pub mod secret;
