//! Application layer - services, commands, queries and handlers.
//!
//! Services own the per-message building blocks (similarity, classification,
//! retrieval, composition); handlers orchestrate them against the ports.
//! Following CQRS, command handlers (write) are separate from query handlers (read).

pub mod handlers;
pub mod services;
