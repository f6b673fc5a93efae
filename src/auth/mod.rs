pub mod dto;
pub mod password;
mod repo;
pub mod services;

pub use dto::{LoginRequest, OnboardingBody, RegisterRequest};
pub use services::SessionStore;
