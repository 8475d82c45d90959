//! Batch loading tests
//!
//! Exercise the loader against temporary study folders built from rendered
//! .re1 fixtures.

pub mod folder_loading;
