//! Bounded TTL cache tests.
//!
//! Test organization:
//! - cache_ttl.rs: expiry on a paused clock
//! - cache_capacity.rs: bulk oldest-first eviction
//! - cache_concurrency.rs: shared handles across tasks

mod cache_capacity;
