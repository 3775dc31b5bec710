//! Fixed-window rate limiter tests.
