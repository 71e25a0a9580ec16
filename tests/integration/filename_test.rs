//! Tests for subject id to story file name mapping

use storyplay::files::filename::{self, story_file_name, FilenameError};

use super::helpers::subject;

// ============================================================================
// Sanitization
// ============================================================================

#[test]
fn sanitize_keeps_handles_readable() {
    assert_eq!(filename::sanitize("alice_92"), "alice_92");
    assert_eq!(filename::sanitize("bob@example"), "bob@example");
    assert_eq!(filename::sanitize("v1.2"), "v1.2");
}

#[test]
fn sanitize_collapses_hyphens_and_whitespace() {
    assert_eq!(filename::sanitize("night -- owl"), "night-owl");
    assert_eq!(filename::sanitize("  padded  "), "padded");
}

#[test]
fn sanitize_trims_leading_dots() {
    assert_eq!(filename::sanitize("...hidden"), "hidden");
    assert_eq!(filename::sanitize("trailing."), "trailing");
}

#[test]
fn sanitize_transliterates_scripts() {
    assert_eq!(filename::sanitize("Ångström"), "Angstrom");
    assert_eq!(filename::sanitize("Straße"), "Strasse");
}

#[test]
fn sanitize_drops_emoji_and_symbols() {
    let out = filename::sanitize("sunny🌞day!");
    assert!(out.starts_with("sunny"));
    assert!(out.ends_with("day"));
    assert!(!out.contains('!'));
}

// ============================================================================
// Story file names
// ============================================================================

#[test]
fn story_file_name_appends_extension() {
    assert_eq!(
        story_file_name(&subject("Mary Jane")).unwrap(),
        format!("Mary-Jane.{}", filename::STORY_FILE_EXTENSION)
    );
}

#[test]
fn traversal_attempts_stay_inside_the_library() {
    let name = story_file_name(&subject("../../secrets")).unwrap();
    assert_eq!(name, "secrets.json");
    assert!(!name.contains('/'));
}

#[test]
fn reserved_device_names_are_escaped() {
    assert_eq!(story_file_name(&subject("nul")).unwrap(), "_nul.json");
    assert_eq!(story_file_name(&subject("AUX")).unwrap(), "_AUX.json");
}

#[test]
fn symbols_only_subject_cannot_name_a_file() {
    assert!(matches!(
        story_file_name(&subject("***")),
        Err(FilenameError::Unusable(_))
    ));
}

#[test]
fn length_limit_counts_the_extension() {
    // 250 + ".json" = 255 fits; one more does not
    assert!(story_file_name(&subject(&"a".repeat(250))).is_ok());
    assert_eq!(
        story_file_name(&subject(&"a".repeat(251))).unwrap_err(),
        FilenameError::TooLong {
            length: 256,
            max: 255
        }
    );
}
