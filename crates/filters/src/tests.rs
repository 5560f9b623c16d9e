use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::{ExcludeRule, ExcludeSet, load_exclude_set, parse_rules, read_rules};

fn set_of(lines: &str) -> ExcludeSet {
    ExcludeSet::from_rules(parse_rules(lines)).expect("patterns compile")
}

#[test]
fn blank_lines_and_comments_are_skipped() {
    let rules = parse_rules("# header\n\n*.tmp\n   \n# trailing\n");
    assert_eq!(rules, vec![ExcludeRule::exclude("*.tmp")]);
}

#[test]
fn unanchored_pattern_matches_at_any_depth() {
    let set = set_of("*.swp\n");
    assert!(set.is_excluded(Path::new("notes.swp"), false));
    assert!(set.is_excluded(Path::new("deep/nested/notes.swp"), false));
    assert!(!set.is_excluded(Path::new("notes.txt"), false));
}

#[test]
fn anchored_pattern_only_matches_from_root() {
    let set = set_of("/build\n");
    assert!(set.is_excluded(Path::new("build"), true));
    assert!(!set.is_excluded(Path::new("src/build"), true));
}

#[test]
fn directory_rule_covers_contents() {
    let set = set_of("cache/\n");
    assert!(set.is_excluded(Path::new("cache"), true));
    assert!(set.is_excluded(Path::new("a/cache"), true));
    assert!(set.is_excluded(Path::new("a/cache/entry.bin"), false));
    // a plain file named like the directory rule is not excluded
    assert!(!set.is_excluded(Path::new("cache"), false));
}

#[test]
fn reinclude_overrides_earlier_exclude() {
    let set = set_of("!important.o\n*.o\n");
    assert!(set.is_excluded(Path::new("main.o"), false));
    assert!(!set.is_excluded(Path::new("important.o"), false));
}

#[test]
fn merged_set_keeps_first_operand_rules_first() {
    let system = set_of("!keep.log\n");
    let user = set_of("*.log\n");
    let merged = system.merged(&user);
    assert_eq!(merged.len(), 2);
    assert!(!merged.is_excluded(Path::new("keep.log"), false));
    assert!(merged.is_excluded(Path::new("other.log"), false));
}

#[test]
fn read_rules_reports_missing_file() {
    let error = read_rules(Path::new("/nonexistent/excludes.lst")).unwrap_err();
    assert!(error.to_string().contains("failed to read exclude list"));
}

#[test]
fn admission_requires_at_least_one_source() {
    let missing = Path::new("/nonexistent/excludes.lst");
    let error = load_exclude_set(Some(missing), None).unwrap_err();
    assert!(error.to_string().contains("cannot load system exclude list"));
    assert_eq!(error.system(), Some(&missing.to_owned()));
    assert!(error.user().is_none());
}

#[test]
fn admission_passes_with_only_user_source() {
    let mut user = NamedTempFile::new().expect("temp file");
    writeln!(user, "*.bak").expect("write patterns");

    let set = load_exclude_set(Some(Path::new("/nonexistent/excludes.lst")), Some(user.path()))
        .expect("user list is usable");
    assert!(set.is_excluded(Path::new("old.bak"), false));
}

#[test]
fn admission_merges_both_sources() {
    let mut system = NamedTempFile::new().expect("temp file");
    writeln!(system, "*.tmp").expect("write patterns");
    let mut user = NamedTempFile::new().expect("temp file");
    writeln!(user, "*.bak").expect("write patterns");

    let set = load_exclude_set(Some(system.path()), Some(user.path())).expect("both load");
    assert!(set.is_excluded(Path::new("a.tmp"), false));
    assert!(set.is_excluded(Path::new("b.bak"), false));
    assert!(!set.is_excluded(Path::new("c.txt"), false));
}

#[test]
fn invalid_glob_is_reported_with_pattern() {
    let error = ExcludeSet::from_rules([ExcludeRule::exclude("[")]).unwrap_err();
    assert_eq!(error.pattern(), "[");
    assert!(error.to_string().contains("failed to compile"));
}
