//! Credential store: the trait the core depends on, plus Postgres and in-memory backends.

mod memory;
mod pool;
mod postgres;
mod store;

pub use memory::MemoryCredentialStore;
pub use pool::{create_pool, DbPool, PoolSettings};
pub use postgres::PgCredentialStore;
pub use store::CredentialStore;
