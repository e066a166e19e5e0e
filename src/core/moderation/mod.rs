// Core moderation module - the content gate for titles, segments and nicknames.
// Following the same pattern as the other core modules: models, logic, service.

pub mod lexicon;
pub mod moderation_models;
pub mod moderation_service;
pub mod policy;
pub mod signals;

pub use lexicon::{Lexicon, LexiconVariant};
pub use moderation_models::*;
pub use moderation_service::*;
