mod checkout;
mod service;
mod state;

pub use checkout::{
    CheckoutQuery, DeleteResult, Document, InsertOneResult, StatusUpdate, UpdateResult,
};
pub use service::{SERVICE_PROJECTION, project_service};
pub use state::{AppState, CookiePolicy};
