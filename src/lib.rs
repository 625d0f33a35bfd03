// Pedantic: suppress noise for internal crate code.
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]

pub mod actions;
pub mod app;
pub mod components;
pub mod config;
pub mod engine;
pub mod form;
pub mod git;
pub mod service;
pub mod types;
pub mod url;
