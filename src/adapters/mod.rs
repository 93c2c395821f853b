//! Adapters - Implementations of port interfaces.
//!
//! - `postgres` - Relational-JSON conversation repository
//! - `redis` - Document-store conversation repository
//! - `memory` - Process-local conversation repository
//! - `auth` - Session validators (OIDC, mock)
//! - `http` - axum REST API

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod redis;

pub use memory::InMemoryConversationRepository;
pub use postgres::PostgresConversationRepository;
pub use self::redis::RedisConversationRepository;
