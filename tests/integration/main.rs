//! Integration tests for storyplay


mod filename_test;
mod playback_test;
mod reaction_test;
