pub mod error;

pub mod client;
pub mod config;
pub mod credentials;
pub mod resolver;
pub mod session;

pub mod cmd;

#[cfg(test)]
pub(crate) mod dev;

pub use resolver::{resolve_session_by_access_key, resolve_session_by_role_name};
