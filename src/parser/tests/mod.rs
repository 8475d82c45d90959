//! Parser tests built on synthetic .re1 text
//!
//! Fixtures are rendered from known RAO values so both layouts can be
//! checked against the same underlying data.

pub mod fixtures;
pub mod speed_block_tests;
