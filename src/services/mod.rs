//! Business logic: member registration and lookup.

pub mod member;

pub use member::MemberService;
