// Implementations of the UserStore port.

pub mod in_memory;
pub mod sqlite_store;

pub use in_memory::InMemoryUserStore;
pub use sqlite_store::SqliteUserStore;
