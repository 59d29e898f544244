//! CrediWise client core: session handling, the API gateway, page view
//! models with optimistic mutations, and text rendering for the terminal
//! front end.

pub mod components;
pub mod config;
pub mod pages;
pub mod router;
pub mod services;
pub mod session;

pub use config::ClientConfig;
pub use services::api::{ApiClient, ApiError};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};
