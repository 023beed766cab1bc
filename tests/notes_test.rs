use release_ci::commands::notes::GoModFile;

const GO_MOD: &str = r#"
module github.com/acme-io/gateway

go 1.21

require (
	github.com/acme-io/transport v1.3.2
	github.com/acme-io/identity v0.16.0-0.20240102030405-abcdef123456
	github.com/spf13/cobra v1.8.0
	github.com/acme-io/metrics v0.9.0 // indirect
)

require golang.org/x/sys v0.15.0
"#;

#[test]
fn test_parses_module_and_requires() {
    let parsed = GoModFile::parse(GO_MOD).unwrap();
    assert_eq!(parsed.module, "github.com/acme-io/gateway");
    assert_eq!(parsed.requires.len(), 5);
    assert_eq!(
        parsed.require_version("github.com/acme-io/transport"),
        Some("v1.3.2")
    );
    assert_eq!(
        parsed.require_version("golang.org/x/sys"),
        Some("v0.15.0")
    );
}

#[test]
fn test_pseudo_versions_survive_parsing() {
    let parsed = GoModFile::parse(GO_MOD).unwrap();
    assert_eq!(
        parsed.require_version("github.com/acme-io/identity"),
        Some("v0.16.0-0.20240102030405-abcdef123456")
    );
}

#[test]
fn test_indirect_comment_is_stripped() {
    let parsed = GoModFile::parse(GO_MOD).unwrap();
    assert_eq!(
        parsed.require_version("github.com/acme-io/metrics"),
        Some("v0.9.0")
    );
}

#[test]
fn test_requirement_diffing_for_note_lines() {
    let old = GoModFile::parse(
        "module github.com/acme-io/gateway\nrequire github.com/acme-io/transport v1.3.1\n",
    )
    .unwrap();
    let new = GoModFile::parse(
        "module github.com/acme-io/gateway\nrequire (\n\tgithub.com/acme-io/transport v1.3.2\n\tgithub.com/acme-io/metrics v0.9.0\n)\n",
    )
    .unwrap();

    // changed
    let prev = old.require_version("github.com/acme-io/transport");
    let curr = new.require_version("github.com/acme-io/transport");
    assert_ne!(prev, curr);

    // new
    assert_eq!(old.require_version("github.com/acme-io/metrics"), None);
    assert_eq!(
        new.require_version("github.com/acme-io/metrics"),
        Some("v0.9.0")
    );
}

#[test]
fn test_missing_module_directive_is_error() {
    assert!(GoModFile::parse("go 1.21\nrequire example.com/x v1.0.0\n").is_err());
}
