//! File naming helpers for the story library.

pub mod filename;
