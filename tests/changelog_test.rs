use release_ci::changelog::{ChangeEntry, ChangeLogExtractor, NoteMode};
use release_ci::git::{CommitDetail, MockRepository};

const RELEASE_BOT: &str = "release-ci";
const DEPENDENCY_BOT: &str = "dependabot[bot]";

fn commit(id: &str, time: i64, author: &str, message: &str, parents: &[&str]) -> CommitDetail {
    CommitDetail {
        id: id.to_string(),
        message: message.to_string(),
        author_name: author.to_string(),
        author_email: format!("{}@example.com", author),
        author_time: time,
        parents: parents.iter().map(|p| p.to_string()).collect(),
    }
}

fn extractor(repo: &MockRepository) -> ChangeLogExtractor<'_, MockRepository> {
    ChangeLogExtractor::new(repo, RELEASE_BOT, DEPENDENCY_BOT)
}

fn issue_numbers(entries: &[ChangeEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|e| match e {
            ChangeEntry::Issue(n) => n.clone(),
            other => panic!("expected issue entry, got {:?}", other),
        })
        .collect()
}

#[test]
fn issues_between_boundaries_newest_first() {
    let mut repo = MockRepository::new();
    repo.add_commit(commit("base", 1, "alice", "initial", &[]));
    repo.add_commit(commit("c1", 2, "alice", "listener loop\n\nfixes #11", &["base"]));
    repo.add_commit(commit("c2", 3, "bob", "closes #7 and resolves #8", &["c1"]));
    repo.add_tag("v1.0.0", "base");
    repo.add_tag("v1.0.1", "c2");

    let entries = extractor(&repo)
        .extract("v1.0.0", "v1.0.1", NoteMode::Issues, false)
        .unwrap();
    assert_eq!(issue_numbers(&entries), vec!["7", "8", "11"]);
}

#[test]
fn all_commits_mode_reports_hash_summary_and_email() {
    let mut repo = MockRepository::new();
    repo.add_commit(commit("base000", 1, "alice", "initial", &[]));
    repo.add_commit(commit(
        "feature1234567",
        2,
        "bob",
        "add retry handling\n\nmore detail",
        &["base000"],
    ));

    let entries = extractor(&repo)
        .extract("base000", "feature1234567", NoteMode::AllCommits, false)
        .unwrap();
    assert_eq!(
        entries,
        vec![ChangeEntry::Commit {
            short_id: "feature".to_string(),
            summary: "add retry handling".to_string(),
            author_email: "bob@example.com".to_string(),
        }]
    );
}

#[test]
fn boundary_commit_and_ancestors_are_not_emitted() {
    let mut repo = MockRepository::new();
    repo.add_commit(commit("base", 1, "alice", "fixes #1", &[]));
    repo.add_commit(commit("old", 2, "alice", "fixes #2", &["base"]));
    repo.add_commit(commit("new", 3, "alice", "fixes #3", &["old"]));

    let entries = extractor(&repo)
        .extract("old", "new", NoteMode::Issues, false)
        .unwrap();
    assert_eq!(issue_numbers(&entries), vec!["3"]);
}

#[test]
fn bot_and_merge_commits_are_filtered() {
    let mut repo = MockRepository::new();
    repo.add_commit(commit("base", 1, "alice", "initial", &[]));
    repo.add_commit(commit("side", 2, "bob", "side work, fixes #40", &["base"]));
    repo.add_commit(commit("feat", 3, "carol", "fixes #41", &["base"]));
    repo.add_commit(commit(
        "merge",
        4,
        "carol",
        "Merge branch side. fixes #999",
        &["feat", "side"],
    ));
    repo.add_commit(commit(
        "release",
        5,
        RELEASE_BOT,
        "release commit fixes #998",
        &["merge"],
    ));
    repo.add_commit(commit(
        "dep",
        6,
        DEPENDENCY_BOT,
        "bump transport, fixes #997",
        &["release"],
    ));

    let entries = extractor(&repo)
        .extract("base", "dep", NoteMode::Issues, false)
        .unwrap();
    let numbers = issue_numbers(&entries);
    assert!(!numbers.contains(&"999".to_string()), "merge commit leaked");
    assert!(!numbers.contains(&"998".to_string()), "release bot leaked");
    assert!(!numbers.contains(&"997".to_string()), "dependency bot leaked");
    assert_eq!(numbers, vec!["41", "40"]);
}

#[test]
fn bot_tag_commit_old_boundary_is_replaced_by_its_parent() {
    // The old tag points at a bot-authored commit off the mainline. Without
    // the correction the traversal would never meet the boundary and would
    // emit all of history.
    let mut repo = MockRepository::new();
    repo.add_commit(commit("root", 1, "alice", "fixes #1", &[]));
    repo.add_commit(commit("real", 2, "alice", "fixes #2", &["root"]));
    repo.add_commit(commit("bottag", 3, RELEASE_BOT, "Release 1.0.0", &["real"]));
    repo.add_commit(commit("next", 4, "bob", "fixes #3", &["real"]));
    repo.add_tag("v1.0.0", "bottag");

    let entries = extractor(&repo)
        .extract("v1.0.0", "next", NoteMode::Issues, false)
        .unwrap();
    assert_eq!(issue_numbers(&entries), vec!["3"]);
}

#[test]
fn primary_project_walks_past_merge_bubbles() {
    // Old boundary is a merge commit off the mainline; the primary-project
    // correction follows the newest parent down to a mainline commit.
    let mut repo = MockRepository::new();
    repo.add_commit(commit("base", 1, "alice", "fixes #1", &[]));
    repo.add_commit(commit("y", 2, "bob", "fixes #2", &["base"]));
    repo.add_commit(commit("x", 3, "alice", "fixes #3", &["base"]));
    repo.add_commit(commit("bubble", 4, "alice", "merge bubble", &["x", "y"]));
    repo.add_commit(commit("new", 5, "carol", "fixes #4", &["x"]));
    repo.add_tag("v1.0.0", "bubble");

    // Non-primary: boundary stays on the unreachable merge, so the walk
    // runs to the root.
    let entries = extractor(&repo)
        .extract("v1.0.0", "new", NoteMode::Issues, false)
        .unwrap();
    assert_eq!(issue_numbers(&entries), vec!["4", "3", "1"]);

    // Primary: boundary becomes x, the newest parent of the bubble.
    let entries = extractor(&repo)
        .extract("v1.0.0", "new", NoteMode::Issues, true)
        .unwrap();
    assert_eq!(issue_numbers(&entries), vec!["4"]);
}

#[test]
fn primary_correction_applies_bot_hop_before_merge_walk() {
    let mut repo = MockRepository::new();
    repo.add_commit(commit("base", 1, "alice", "fixes #1", &[]));
    repo.add_commit(commit("y", 2, "bob", "fixes #2", &["base"]));
    repo.add_commit(commit("x", 3, "alice", "fixes #3", &["base"]));
    repo.add_commit(commit("bubble", 4, "alice", "merge bubble", &["x", "y"]));
    repo.add_commit(commit("bottag", 5, RELEASE_BOT, "Release 1.0.0", &["bubble"]));
    repo.add_commit(commit("new", 6, "carol", "fixes #4", &["x"]));
    repo.add_tag("v1.0.0", "bottag");

    let entries = extractor(&repo)
        .extract("v1.0.0", "new", NoteMode::Issues, true)
        .unwrap();
    assert_eq!(issue_numbers(&entries), vec!["4"]);
}

#[test]
fn pseudo_version_falls_back_to_trailing_hash() {
    let mut repo = MockRepository::new();
    repo.add_commit(commit("abc123def", 1, "alice", "fixes #1", &[]));
    repo.add_commit(commit("new", 2, "bob", "fixes #2", &["abc123def"]));

    let entries = extractor(&repo)
        .extract("v1.2.3-0.20240101-abc123def", "new", NoteMode::Issues, false)
        .unwrap();
    assert_eq!(issue_numbers(&entries), vec!["2"]);
}

#[test]
fn unresolvable_boundary_is_fatal() {
    let mut repo = MockRepository::new();
    repo.add_commit(commit("a", 1, "alice", "fixes #1", &[]));

    let result = extractor(&repo).extract("v9.9.9", "a", NoteMode::Issues, false);
    assert!(result.is_err());

    // A pseudo-version whose trailing hash is also unknown stays fatal
    let result = extractor(&repo).extract("v9.9.9-0-deadbeef", "a", NoteMode::Issues, false);
    assert!(result.is_err());
}

#[test]
fn exhausted_history_without_boundary_is_success() {
    let mut repo = MockRepository::new();
    repo.add_commit(commit("root", 1, "alice", "fixes #1", &[]));
    repo.add_commit(commit("mid", 2, "bob", "fixes #2", &["root"]));
    repo.add_commit(commit("tip", 3, "carol", "fixes #3", &["mid"]));
    // An old boundary on a line the tip cannot reach
    repo.add_commit(commit("island", 4, "dave", "elsewhere", &[]));

    let entries = extractor(&repo)
        .extract("island", "tip", NoteMode::Issues, false)
        .unwrap();
    assert_eq!(issue_numbers(&entries), vec!["3", "2", "1"]);
}

#[test]
fn duplicate_issue_references_across_commits_are_kept() {
    let mut repo = MockRepository::new();
    repo.add_commit(commit("base", 1, "alice", "initial", &[]));
    repo.add_commit(commit("c1", 2, "alice", "fixes #5", &["base"]));
    repo.add_commit(commit("c2", 3, "bob", "also fixes #5", &["c1"]));

    let entries = extractor(&repo)
        .extract("base", "c2", NoteMode::Issues, false)
        .unwrap();
    assert_eq!(issue_numbers(&entries), vec!["5", "5"]);
}
