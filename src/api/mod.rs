//! Session-level API consumed by the host UI

pub mod session;

pub use session::{IndoorDisplay, NavigationSession, OutlineDisplay, SessionSnapshot};
