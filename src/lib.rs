//! Conversation Store - owner-scoped persistence of chat conversations.
//!
//! A single store façade validates input, enforces ownership and serializes
//! writes per conversation, then delegates to exactly one storage adapter
//! (PostgreSQL JSONB, Redis documents, or in-memory) chosen at startup.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
