mod common;

use std::fs;

use common::write_file;
use tempfile::tempdir;
use webdav_publish_core::resolve::resolve;
use webdav_publish_core::ResolutionError;

fn fragments(matches: &[webdav_publish_core::resolve::PathMatch]) -> Vec<&str> {
    matches.iter().map(|m| m.relative_fragment.as_str()).collect()
}

#[test]
fn literal_file_resolves_to_its_base_name() {
    let work = tempdir().unwrap();
    write_file(work.path(), "build/out.jar", "jar");

    let matches = resolve(work.path(), "build/out.jar").expect("resolve should succeed");

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].relative_fragment, "out.jar");
    assert!(matches[0].local_path.is_absolute());
    assert!(matches[0].local_path.ends_with("build/out.jar"));
    assert!(!matches[0].is_dir());
}

#[test]
fn missing_literal_resolves_to_nothing() {
    let work = tempdir().unwrap();

    let matches = resolve(work.path(), "build/missing.jar").expect("no match is not an error");

    assert!(matches.is_empty());
}

#[test]
fn literal_directory_is_a_single_match() {
    let work = tempdir().unwrap();
    write_file(work.path(), "build/site/index.html", "<html/>");

    let matches = resolve(work.path(), "build/site/").unwrap();

    assert_eq!(fragments(&matches), vec!["site"]);
    assert!(matches[0].is_dir());
}

#[test]
fn wildcards_skip_dotfiles_unless_the_dot_is_literal() {
    let work = tempdir().unwrap();
    write_file(work.path(), "dist/.DS_Store", "x");
    write_file(work.path(), "dist/a.zip", "a");
    write_file(work.path(), "dist/.hidden/b.zip", "b");

    let star = resolve(work.path(), "dist/*").unwrap();
    let question = resolve(work.path(), "dist/?DS_Store").unwrap();
    let dotted = resolve(work.path(), "dist/.*").unwrap();

    assert_eq!(fragments(&star), vec!["a.zip"]);
    assert!(question.is_empty());
    assert_eq!(fragments(&dotted), vec![".DS_Store", ".hidden"]);
}

#[test]
fn star_matches_within_one_directory_in_name_order() {
    let work = tempdir().unwrap();
    write_file(work.path(), "dist/b.zip", "b");
    write_file(work.path(), "dist/a.zip", "a");
    write_file(work.path(), "dist/notes.txt", "n");
    write_file(work.path(), "dist/nested/c.zip", "c");

    let matches = resolve(work.path(), "dist/*.zip").unwrap();

    assert_eq!(fragments(&matches), vec!["a.zip", "b.zip"]);
    assert!(matches[0].local_path.ends_with("dist/a.zip"));
}

#[test]
fn double_star_matches_across_directories_keeping_structure() {
    let work = tempdir().unwrap();
    write_file(work.path(), "out/top.zip", "t");
    write_file(work.path(), "out/linux/x64/app.zip", "l");
    write_file(work.path(), "out/windows/app.zip", "w");
    write_file(work.path(), "out/windows/app.exe", "e");

    let matches = resolve(work.path(), "out/**/*.zip").unwrap();

    assert_eq!(
        fragments(&matches),
        vec!["linux/x64/app.zip", "top.zip", "windows/app.zip"]
    );
}

#[test]
fn question_mark_matches_one_character() {
    let work = tempdir().unwrap();
    write_file(work.path(), "logs/run1.log", "1");
    write_file(work.path(), "logs/run2.log", "2");
    write_file(work.path(), "logs/run10.log", "10");

    let matches = resolve(work.path(), "logs/run?.log").unwrap();

    assert_eq!(fragments(&matches), vec!["run1.log", "run2.log"]);
}

#[test]
fn matched_directory_is_not_matched_again_through_its_children() {
    let work = tempdir().unwrap();
    write_file(work.path(), "reports/html/index.html", "i");
    write_file(work.path(), "reports/html/css/site.css", "c");
    write_file(work.path(), "reports/summary.txt", "s");

    let matches = resolve(work.path(), "reports/**").unwrap();

    assert_eq!(fragments(&matches), vec!["html", "summary.txt"]);
    assert!(matches[0].is_dir());
}

#[test]
fn glob_with_missing_prefix_resolves_to_nothing() {
    let work = tempdir().unwrap();

    let matches = resolve(work.path(), "nowhere/*.zip").unwrap();

    assert!(matches.is_empty());
}

#[test]
fn glob_matching_nothing_resolves_to_nothing() {
    let work = tempdir().unwrap();
    write_file(work.path(), "dist/readme.md", "r");

    let matches = resolve(work.path(), "dist/*.zip").unwrap();

    assert!(matches.is_empty());
}

#[test]
fn invalid_pattern_is_a_resolution_error() {
    let work = tempdir().unwrap();
    fs::create_dir_all(work.path().join("dist")).unwrap();

    let err = resolve(work.path(), "dist/[a.zip").unwrap_err();

    assert!(matches!(err, ResolutionError::Pattern { .. }), "got {err:?}");
}

#[test]
fn fragments_never_escape_the_remote_target() {
    let work = tempdir().unwrap();
    write_file(work.path(), "project/dist/a.zip", "a");
    write_file(work.path(), "project/dist/sub/b.zip", "b");
    write_file(work.path(), "other/c.zip", "c");
    let project = work.path().join("project");

    let specs = ["../other/*.zip", "dist/**/*.zip", "../other/c.zip", "./dist/*", "dist/.."];
    for spec in specs {
        for m in resolve(&project, spec).unwrap() {
            assert!(!m.relative_fragment.is_empty(), "{spec}: empty fragment");
            assert!(!m.relative_fragment.starts_with('/'), "{spec}: {m:?}");
            assert!(
                !m.relative_fragment.split('/').any(|segment| segment == ".."),
                "{spec}: {m:?}"
            );
        }
    }
}
