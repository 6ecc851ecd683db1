//! # Services
//!
//! This module contains the services handlers depend on: session tokens and
//! the document store. Both are constructed once at startup and shared
//! through [`crate::models::AppState`].
//!
//! ## Available Services
//!
//! - **JWT** (`jwt`) - Session token creation and validation
//! - **Store** (`store`) - Document store trait with PostgreSQL and in-memory implementations

pub mod jwt;
pub mod store;
