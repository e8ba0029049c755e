// Profile-payload tests (native) for the `chat-arcade` crate.
// These tests avoid wasm-specific functionality and exercise pure Rust logic so
// they can run under `cargo test` on the host.

use chat_arcade::error::EngineError;
use chat_arcade::profile::{ContactRecord, ProfileDirectory, ProfileRecord};

fn contact(
    name: Option<&str>,
    short_name: Option<&str>,
    pushname: Option<&str>,
    phone_number: Option<u64>,
) -> ContactRecord {
    ContactRecord {
        name: name.map(str::to_string),
        short_name: short_name.map(str::to_string),
        pushname: pushname.map(str::to_string),
        phone_number,
    }
}

fn record(name: Option<&str>, contact_record: Option<ContactRecord>) -> ProfileRecord {
    ProfileRecord {
        id: "123@c.us".to_string(),
        name: name.map(str::to_string),
        contact: contact_record,
        avatar_url: Some("https://pp.example/123.jpg".to_string()),
    }
}

#[test]
fn profile_name_outranks_all_contact_fields() {
    let profile = record(
        Some("Group Chat"),
        Some(contact(Some("Ada"), Some("A."), Some("ada92"), Some(4915112345678))),
    );
    assert_eq!(profile.display_name(), "Group Chat");
}

#[test]
fn contact_fields_resolve_in_order() {
    let full = record(None, Some(contact(Some("Ada"), Some("A."), Some("ada92"), None)));
    assert_eq!(full.display_name(), "Ada");

    let short = record(None, Some(contact(None, Some("A."), Some("ada92"), None)));
    assert_eq!(short.display_name(), "A.");

    let push = record(None, Some(contact(None, None, Some("ada92"), None)));
    assert_eq!(push.display_name(), "ada92");

    let phone = record(None, Some(contact(None, None, None, Some(4915112345678))));
    assert_eq!(phone.display_name(), "4915112345678");
}

#[test]
fn nameless_profile_falls_back_to_unknown() {
    assert_eq!(record(None, None).display_name(), "Unknown");
    let empty = record(Some("  "), Some(contact(Some(""), None, None, None)));
    assert_eq!(empty.display_name(), "Unknown");
}

#[test]
fn displayable_needs_an_avatar_and_a_real_name() {
    let ok = record(None, Some(contact(Some("Ada"), None, None, None)));
    assert!(ok.is_displayable());

    let mut no_avatar = ok.clone();
    no_avatar.avatar_url = None;
    assert!(!no_avatar.is_displayable());

    // A bare phone number names the actor but does not qualify it.
    let phone_only = record(None, Some(contact(None, None, None, Some(4915112345678))));
    assert!(!phone_only.is_displayable());
}

#[test]
fn directory_splits_player_from_candidates() {
    let payload = r#"{
        "me": {"id": "me@c.us", "name": "Me", "avatarUrl": "https://pp.example/me.jpg"},
        "profiles": [
            {"id": "a@c.us", "contact": {"name": "Ada"}, "avatarUrl": "https://pp.example/a.jpg"},
            {"id": "b@c.us", "contact": {"pushname": "bob77"}, "avatarUrl": "https://pp.example/b.jpg"},
            {"id": "c@c.us", "contact": {"phoneNumber": 4915112345678}, "avatarUrl": "https://pp.example/c.jpg"},
            {"id": "d@c.us", "name": "No Picture"}
        ]
    }"#;
    let directory = ProfileDirectory::from_json(payload).unwrap();

    let player = directory.player().unwrap();
    assert_eq!(player.display_name, "Me");

    let candidates = directory.enemy_candidates();
    let names: Vec<_> = candidates.iter().map(|c| c.display_name.as_str()).collect();
    // Phone-only and picture-less entries are filtered out, order preserved.
    assert_eq!(names, vec!["Ada", "bob77"]);
}

#[test]
fn directory_without_me_entry_has_no_player() {
    let payload = r#"{"profiles": [{"id": "a@c.us", "contact": {"name": "Ada"}, "avatarUrl": "https://pp.example/a.jpg"}]}"#;
    let directory = ProfileDirectory::from_json(payload).unwrap();
    assert!(directory.player().is_none());
    assert_eq!(directory.enemy_candidates().len(), 1);
}

#[test]
fn missing_fields_default_instead_of_failing() {
    let directory = ProfileDirectory::from_json("{}").unwrap();
    assert!(directory.player().is_none());
    assert!(directory.enemy_candidates().is_empty());
}

#[test]
fn malformed_payload_is_a_typed_error() {
    assert!(matches!(
        ProfileDirectory::from_json("{not json"),
        Err(EngineError::ProfilePayload(_))
    ));
    assert!(matches!(
        ProfileDirectory::from_json(r#"["not", "an", "object"]"#),
        Err(EngineError::ProfilePayload(_))
    ));
}
