//! Data models for members and their authorities.

pub mod member;

pub use member::*;
