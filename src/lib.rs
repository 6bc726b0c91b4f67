//! tinyhttpd - Minimal static file and CGI server
//!
//! Core library for request parsing, dispatch and response generation.

pub mod config;
pub mod dispatch;
pub mod http;
pub mod server;
