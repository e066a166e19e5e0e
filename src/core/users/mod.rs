// Core users module - nickname login, tokens and the writer records.

pub mod token_service;
pub mod user_models;
pub mod user_service;

pub use token_service::{Claims, TokenError, TokenService};
pub use user_models::*;
pub use user_service::*;
