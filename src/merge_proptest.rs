//! Property-based tests for project tree merging.
//!
//! Random module sets with random project trees are merged and checked for
//! the laws the descriptor relies on.
