//! Internal testing utilities: canned session exports and result builders.

pub mod fixtures;
