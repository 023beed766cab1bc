use release_ci::lang::{self, Language};
use release_ci::version::{parse_tag_versions, resolve, SemanticVersion};

fn v(s: &str) -> SemanticVersion {
    SemanticVersion::parse(s).unwrap()
}

#[test]
fn first_release_of_a_new_minor_line() {
    // Repository full of tags from earlier lines; base file rolled forward.
    let tags = parse_tag_versions(&[
        "v0.26.0".to_string(),
        "v0.26.1".to_string(),
        "v0.26.11".to_string(),
        "nightly-2024-01-01".to_string(),
    ]);
    let r = resolve(&v("0.27.0"), &tags);
    assert_eq!(r.current, None);
    assert_eq!(r.next, v("0.27.0"));
}

#[test]
fn patch_releases_accumulate_inside_the_window() {
    let mut tag_names: Vec<String> = (0..=11).map(|p| format!("v0.26.{}", p)).collect();
    tag_names.push("v0.25.9".to_string());
    tag_names.push("v0.27.0".to_string());
    let tags = parse_tag_versions(&tag_names);

    let r = resolve(&v("0.26.0"), &tags);
    assert_eq!(r.current, Some(v("0.26.11")));
    assert_eq!(r.next, v("0.26.12"));
}

#[test]
fn numeric_tag_sorting_is_not_lexicographic() {
    // v0.26.9 must lose to v0.26.10 even though "9" > "10" as strings
    let tags = parse_tag_versions(&[
        "v0.26.10".to_string(),
        "v0.26.9".to_string(),
        "v0.26.2".to_string(),
    ]);
    let r = resolve(&v("0.26.0"), &tags);
    assert_eq!(r.current, Some(v("0.26.10")));
    assert_eq!(r.next, v("0.26.11"));
}

#[test]
fn base_version_bump_overrides_stale_patch_line() {
    // Base asks for at least 1.5.3; only 1.5.0 was ever tagged
    let tags = parse_tag_versions(&["v1.5.0".to_string()]);
    let r = resolve(&v("1.5.3"), &tags);
    assert_eq!(r.current, Some(v("1.5.0")));
    assert_eq!(r.next, v("1.5.3"));
}

#[test]
fn go_tags_carry_the_v_prefix() {
    let next = v("0.27.4");
    assert_eq!(lang::tag_name(Some(Language::Go), &next), "v0.27.4");
    assert_eq!(lang::tag_name(None, &next), "0.27.4");
}

#[test]
fn window_bounds_are_inclusive_exclusive() {
    let tags = parse_tag_versions(&["v1.3.0".to_string()]);

    // min itself qualifies
    let r = resolve(&v("1.3.5"), &tags);
    assert_eq!(r.current, Some(v("1.3.0")));

    // max (the next minor) does not
    let tags = parse_tag_versions(&["v1.4.0".to_string()]);
    let r = resolve(&v("1.3.5"), &tags);
    assert_eq!(r.current, None);
    assert_eq!(r.next, v("1.3.5"));
}
