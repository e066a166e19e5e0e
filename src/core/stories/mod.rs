// Core stories module - the story chain itself.

pub mod story_models;
pub mod story_service;

pub use story_models::*;
pub use story_service::*;
