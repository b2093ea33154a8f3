use std::fs;

use memberlens::lens::{MemberLens, RosterOverrides};
use memberlens::roster::{load_roster, parse_roster};
use memberlens::types::*;
use tempfile::TempDir;

const COMMUNITY: &str = r#"[
    {"id": "111", "username": "bob", "discriminator": "4521", "nickname": "Builder"},
    {"id": 222, "username": "Alicia"},
    {"id": 333, "username": "Alina", "nickname": null}
]"#;

const CHANNEL: &str = r#"[
    {"id": 111, "username": "Bob", "discriminator": 4521},
    {"id": 222, "username": "Alicia"}
]"#;

/// Creates an initialized project with both rosters written.
fn setup_project() -> TempDir {
    let dir = TempDir::new().expect("failed to create temp dir");
    MemberLens::init(dir.path()).expect("failed to init project");
    fs::write(dir.path().join("community.json"), COMMUNITY).unwrap();
    fs::write(dir.path().join("channel.json"), CHANNEL).unwrap();
    dir
}

#[test]
fn test_parse_roster_normalizes_records() {
    let pool = parse_roster(COMMUNITY, "community").unwrap();
    assert_eq!(pool.len(), 3);
    assert_eq!(
        pool[0],
        Identity::new(111, "bob")
            .with_discriminator(4521)
            .with_nickname("Builder")
    );
    assert_eq!(pool[2].nickname, None);
}

#[test]
fn test_parse_roster_rejects_bad_id() {
    let err = parse_roster(r#"[{"id": "abc", "username": "x"}]"#, "inline").unwrap_err();
    assert!(err.to_string().contains("invalid id"));
}

#[test]
fn test_parse_roster_rejects_malformed_json() {
    let err = parse_roster("[{", "broken.json").unwrap_err();
    assert!(err.to_string().contains("broken.json"));
}

#[test]
fn test_load_missing_roster_fails() {
    let dir = TempDir::new().unwrap();
    assert!(load_roster(&dir.path().join("nope.json")).is_err());
}

#[test]
fn test_open_and_resolve() {
    let dir = setup_project();
    let lens = MemberLens::open(dir.path(), &RosterOverrides::default()).unwrap();

    match lens.resolve("Bob#4521") {
        Resolution::Resolved { identity, score } => {
            assert_eq!(identity.id, 111);
            assert_eq!(score, 0.85);
        }
        other => panic!("expected Resolved, got {:?}", other),
    }

    // Alicia is visible in the channel, Alina only in the community.
    match lens.resolve("ali") {
        Resolution::Resolved { identity, score } => {
            assert_eq!(identity.id, 222);
            assert_eq!(score, 0.35);
        }
        other => panic!("expected Resolved, got {:?}", other),
    }
}

#[test]
fn test_open_without_community_roster_fails() {
    let dir = TempDir::new().unwrap();
    MemberLens::init(dir.path()).unwrap();
    let err = MemberLens::open(dir.path(), &RosterOverrides::default())
        .err()
        .expect("open should fail");
    assert!(err.to_string().contains("community roster not found"));
}

#[test]
fn test_missing_channel_roster_is_empty_channel() {
    let dir = setup_project();
    fs::remove_file(dir.path().join("channel.json")).unwrap();

    let lens = MemberLens::open(dir.path(), &RosterOverrides::default()).unwrap();
    let stats = lens.stats();
    assert_eq!(stats.channel_members, 0);
    assert_eq!(stats.community_members, 3);

    // Without the channel pool only community tiers remain.
    assert_eq!(lens.resolve("Bob#4521").score(), Some(0.70));
}

#[test]
fn test_overrides_take_precedence() {
    let dir = setup_project();
    let other = dir.path().join("other.json");
    fs::write(&other, r#"[{"id": 9, "username": "Zed"}]"#).unwrap();

    let overrides = RosterOverrides {
        channel: None,
        community: Some(other),
    };
    let lens = MemberLens::open(dir.path(), &overrides).unwrap();
    assert_eq!(lens.stats().community_members, 1);
    assert!(lens.resolve("zed").is_resolved());
}

#[test]
fn test_stats_counts() {
    let dir = setup_project();
    let lens = MemberLens::open(dir.path(), &RosterOverrides::default()).unwrap();
    let stats = lens.stats();
    assert_eq!(stats.channel_members, 2);
    assert_eq!(stats.shared_members, 2);
    assert_eq!(stats.tagged_members, 1);
    assert_eq!(stats.nicknamed_members, 1);
}

#[test]
fn test_init_keeps_existing_config() {
    let dir = TempDir::new().unwrap();
    let mut config = MemberLens::init(dir.path()).unwrap();
    config.max_listed_candidates = 2;
    memberlens::config::save_config(dir.path(), &config).unwrap();

    let again = MemberLens::init(dir.path()).unwrap();
    assert_eq!(again.max_listed_candidates, 2);
}

#[test]
fn test_zero_discriminator_matches_zero_tag() {
    let pool = parse_roster(r#"[{"id": 5, "username": "bob", "discriminator": 0}]"#, "inline")
        .unwrap();
    assert_eq!(pool[0].to_string(), "bob#0000");

    let resolution = memberlens::resolution::resolve("bob#0", &[], &pool);
    assert!(resolution.is_resolved());
    assert_eq!(resolution.identities()[0].id, 5);
    assert_eq!(resolution.score(), Some(0.80));
}
