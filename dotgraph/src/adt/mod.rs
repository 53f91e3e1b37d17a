//! Generic data structures.

pub mod map;
