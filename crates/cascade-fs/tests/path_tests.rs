use cascade_fs::NormalizedPath;
use rstest::rstest;

#[rstest]
#[case("foo/bar/baz", "foo/bar/baz")]
#[case("foo\\bar\\baz", "foo/bar/baz")]
#[case("foo/bar\\baz", "foo/bar/baz")]
#[case("a/./b//c", "a/b/c")]
#[case("a/../b", "b")]
#[case("../templates/a.json", "../templates/a.json")]
#[case("/a/b/../../c", "/c")]
fn test_normalization(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(NormalizedPath::new(input).as_str(), expected);
}

#[test]
fn test_join_paths() {
    let base = NormalizedPath::new("projects/infra");
    assert_eq!(base.join("profile.json").as_str(), "projects/infra/profile.json");
}

#[test]
fn test_join_parent_segment() {
    let base = NormalizedPath::new("projects/infra/alerting");
    assert_eq!(
        base.join("../shared/profile.json").as_str(),
        "projects/infra/shared/profile.json"
    );
}

#[test]
fn test_join_absolute_segment_replaces_base() {
    let base = NormalizedPath::new("projects/infra");
    assert_eq!(base.join("/etc/template.json").as_str(), "/etc/template.json");
}

#[test]
fn test_join_windows_style_segment() {
    let base = NormalizedPath::new("projects");
    assert_eq!(base.join("infra\\profile.json").as_str(), "projects/infra/profile.json");
}

#[test]
fn test_parent() {
    let path = NormalizedPath::new("foo/bar/baz");
    assert_eq!(path.parent().unwrap().as_str(), "foo/bar");
    assert_eq!(NormalizedPath::new("/foo").parent().unwrap().as_str(), "/");
    assert!(NormalizedPath::new("foo").parent().is_none());
}

#[test]
fn test_file_name_and_extension() {
    let path = NormalizedPath::new("foo/bar/baz.yaml");
    assert_eq!(path.file_name(), Some("baz.yaml"));
    assert_eq!(path.extension(), Some("yaml"));
    assert_eq!(NormalizedPath::new("foo/.hidden").extension(), None);
}

#[test]
fn test_to_native_contains_segments() {
    let native = NormalizedPath::new("foo/bar").to_native();
    assert!(native.ends_with("bar"));
    assert_eq!(native.components().count(), 2);
}
