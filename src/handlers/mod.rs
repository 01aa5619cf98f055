//! HTTP request handlers.

pub mod http;
pub mod member;

pub use http::*;
pub use member::*;
