//! # HTTP Request Handlers
//!
//! This module contains all HTTP request handlers. Each handler performs at
//! most one store operation and returns its result as JSON.
//!
//! ## Available Handlers
//!
//! - **Authentication** (`auth`) - Session token issuance
//! - **Checkouts** (`checkouts`) - Checkout create, list, status update and delete
//! - **Health Check** (`health_check`) - Application liveness
//! - **Services** (`services`) - Service catalogue reads

mod auth;
mod checkouts;
mod health_check;
mod services;

pub use auth::*;
pub use checkouts::*;
pub use health_check::*;
pub use services::*;
