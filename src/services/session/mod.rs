pub mod store;
pub mod sweeper;

pub use store::{InMemorySessionStore, Session, SessionStore};
pub use sweeper::spawn_sweeper;
