// Shared domain types: used by the form state machines, the engine and the UI.

pub mod form;
pub mod repo;

pub use form::*;
pub use repo::*;
