//! Property-based tests for the Kruskal backbone builder.
//!
//! Compares the forest against a brute-force oracle that enumerates every
//! spanning forest of small random networks, and checks the structural
//! invariants of the result.

mod oracle;
mod strategies;
mod types;
