// Implementations of the StoryStore port.

pub mod in_memory;
pub mod sqlite_store;

pub use in_memory::InMemoryStoryStore;
pub use sqlite_store::SqliteStoryStore;
