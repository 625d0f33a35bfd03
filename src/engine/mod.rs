// engine module: the session coordinator behind the form

mod interface;
pub mod session;

pub use interface::{Engine, EngineHandle, Request};
pub use session::SessionEngine;
