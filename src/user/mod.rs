//! User management module.
//!
//! Identity records, the credential store repository, and the
//! registration/login service.

mod models;
mod repository;
mod service;

pub use models::{RegisterRequest, User, UserInfo};
pub use repository::UserRepository;
pub use service::UserService;
