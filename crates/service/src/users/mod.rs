pub mod repository;
pub mod service;

pub use repository::{FileUserRepository, UserRepository};
pub use service::UserService;
