//! HTTP request handlers.

pub(crate) mod chat;
pub(crate) mod config;
pub(crate) mod index;
pub(crate) mod page;
pub(crate) mod save;
