use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn parse_jsonl(stdout: &[u8]) -> Vec<Value> {
    let s = String::from_utf8_lossy(stdout);
    s.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str::<Value>(l).expect("valid jsonl line"))
        .collect()
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn jfind(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("jfind"));
    cmd.current_dir(dir)
        .env_remove("JFIND_DEPTH")
        .env_remove("JFIND_COLOR")
        .env_remove("JFIND_IGNORE_FILE")
        .env_remove("RUST_LOG")
        .arg("--color")
        .arg("never");
    cmd
}

#[test]
fn names_are_listed_files_first_then_subdirectories() {
    let temp = tempdir().unwrap();

    write_file(&temp.path().join("z.txt"), "z");
    write_file(&temp.path().join("a.txt"), "a");
    write_file(&temp.path().join("sub/b.txt"), "b");

    jfind(temp.path())
        .assert()
        .success()
        .stdout("./a.txt\n./z.txt\n./sub\n./sub/b.txt\n");
}

#[test]
fn contents_print_header_and_numbered_lines() {
    let temp = tempdir().unwrap();

    write_file(
        &temp.path().join("notes.txt"),
        "first line\nsecond line\nhello world\n",
    );

    jfind(temp.path())
        .arg("--contents")
        .arg("hello")
        .assert()
        .success()
        .stdout("./notes.txt\n3:hello world\n");
}

#[test]
fn contents_skip_binary_files() {
    let temp = tempdir().unwrap();

    write_file(&temp.path().join("text.txt"), "hello\n");
    fs::write(temp.path().join("blob.bin"), b"hello\0\xff\xfe").unwrap();

    jfind(temp.path())
        .arg("-g")
        .arg("hello")
        .assert()
        .success()
        .stdout(predicate::str::contains("text.txt"))
        .stdout(predicate::str::contains("blob.bin").not());
}

#[test]
fn file_input_is_searched_by_content() {
    let temp = tempdir().unwrap();

    write_file(&temp.path().join("notes.txt"), "alpha\nbeta\ngamma beta\n");

    jfind(temp.path())
        .arg("beta")
        .arg("notes.txt")
        .assert()
        .success()
        .stdout("notes.txt\n2:beta\n3:gamma beta\n");
}

#[test]
fn contents_with_file_input_is_usage_error() {
    let temp = tempdir().unwrap();

    write_file(&temp.path().join("notes.txt"), "hello\n");

    jfind(temp.path())
        .arg("-g")
        .arg("hello")
        .arg("notes.txt")
        .assert()
        .code(2)
        .stdout("")
        .stderr(predicate::str::contains("--contents"));
}

#[test]
fn ignore_rules_exclude_directory_but_honor_negation() {
    let temp = tempdir().unwrap();

    write_file(&temp.path().join(".gitignore"), "build/\n!build/keep.txt\n");
    write_file(&temp.path().join("build/keep.txt"), "keep");
    write_file(&temp.path().join("build/output.o"), "obj");
    write_file(&temp.path().join("main.rs"), "fn main() {}");

    jfind(temp.path())
        .arg("-i")
        .assert()
        .success()
        .stdout(predicate::str::contains("./main.rs"))
        .stdout(predicate::str::contains("./build/keep.txt"))
        .stdout(predicate::str::contains("output.o").not());
}

#[test]
fn ignore_rules_apply_to_full_paths() {
    let temp = tempdir().unwrap();

    write_file(
        &temp.path().join(".gitignore"),
        "build/\n!build/keep.txt\n/top.log\n",
    );
    write_file(&temp.path().join("build/keep.txt"), "keep");
    write_file(&temp.path().join("build/output.o"), "obj");
    write_file(&temp.path().join("top.log"), "log");
    write_file(&temp.path().join("sub/top.log"), "log");
    write_file(&temp.path().join("main.rs"), "fn main() {}");

    let assert = jfind(temp.path()).arg("-f").arg("-i").assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();

    let root = temp.path().canonicalize().unwrap();
    let root = root.to_string_lossy();
    let expected: Vec<String> = ["main.rs", "build/keep.txt", "sub", "sub/top.log"]
        .iter()
        .map(|rel| format!("{}/{}", root, rel))
        .collect();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, expected);
}

#[test]
fn ignore_without_rules_file_fails() {
    let temp = tempdir().unwrap();

    write_file(&temp.path().join("main.rs"), "fn main() {}");

    jfind(temp.path())
        .arg("-i")
        .assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains(".gitignore"));
}

#[test]
fn custom_ignore_file_name() {
    let temp = tempdir().unwrap();

    write_file(&temp.path().join(".jfindignore"), "*.log\n");
    write_file(&temp.path().join("app.log"), "log");
    write_file(&temp.path().join("app.rs"), "rs");

    jfind(temp.path())
        .arg("-i")
        .arg("--ignore-file")
        .arg(".jfindignore")
        .assert()
        .success()
        .stdout("./app.rs\n");
}

#[cfg(unix)]
#[test]
fn dangling_symlink_input_fails() {
    let temp = tempdir().unwrap();
    std::os::unix::fs::symlink(temp.path().join("missing"), temp.path().join("link")).unwrap();

    jfind(temp.path())
        .arg("x")
        .arg("link")
        .assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("symlink target not found"));
}

#[test]
fn missing_input_fails() {
    let temp = tempdir().unwrap();

    jfind(temp.path())
        .arg("x")
        .arg("does-not-exist")
        .assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("input not found"))
        .stderr(predicate::str::contains("symlink").not());
}

#[test]
fn depth_limits_traversal() {
    let temp = tempdir().unwrap();

    write_file(&temp.path().join("top.txt"), "");
    write_file(&temp.path().join("a/mid.txt"), "");
    write_file(&temp.path().join("a/b/deep.txt"), "");

    jfind(temp.path())
        .arg("--depth")
        .arg("1")
        .assert()
        .success()
        .stdout("./top.txt\n./a\n");

    jfind(temp.path())
        .arg("--depth")
        .arg("2")
        .assert()
        .success()
        .stdout("./top.txt\n./a\n./a/mid.txt\n./a/b\n");
}

#[test]
fn depth_from_environment() {
    let temp = tempdir().unwrap();

    write_file(&temp.path().join("a/mid.txt"), "");

    jfind(temp.path())
        .env("JFIND_DEPTH", "1")
        .assert()
        .success()
        .stdout("./a\n");
}

#[test]
fn hidden_entries_need_flag() {
    let temp = tempdir().unwrap();

    write_file(&temp.path().join(".env"), "");
    write_file(&temp.path().join("visible"), "");

    jfind(temp.path())
        .assert()
        .success()
        .stdout("./visible\n");

    jfind(temp.path())
        .arg("-a")
        .assert()
        .success()
        .stdout("./.env\n./visible\n");
}

#[test]
fn case_sensitivity_flag() {
    let temp = tempdir().unwrap();

    write_file(&temp.path().join("README.md"), "");

    jfind(temp.path())
        .arg("readme")
        .assert()
        .success()
        .stdout("./README.md\n");

    jfind(temp.path())
        .arg("-c")
        .arg("readme")
        .assert()
        .success()
        .stdout("");
}

#[test]
fn exact_requires_whole_name() {
    let temp = tempdir().unwrap();

    write_file(&temp.path().join("main.rs"), "");
    write_file(&temp.path().join("main"), "");

    jfind(temp.path())
        .arg("-x")
        .arg("main")
        .assert()
        .success()
        .stdout("./main\n");
}

#[test]
fn glob_query_matches_whole_name() {
    let temp = tempdir().unwrap();

    write_file(&temp.path().join("Cargo.toml"), "");
    write_file(&temp.path().join("notes.toml.bak"), "");

    jfind(temp.path())
        .arg("*.toml")
        .assert()
        .success()
        .stdout("./Cargo.toml\n");
}

#[test]
fn full_path_prints_absolute_paths() {
    let temp = tempdir().unwrap();

    write_file(&temp.path().join("marker.txt"), "");

    let assert = jfind(temp.path())
        .arg("-f")
        .arg("marker")
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    let line = stdout.trim_end();

    assert!(Path::new(line).is_absolute(), "not absolute: {}", line);
    assert!(line.ends_with("/marker.txt"));
}

#[test]
fn jsonl_format_is_parseable() {
    let temp = tempdir().unwrap();

    write_file(&temp.path().join("notes.txt"), "say hello\n");

    let assert = jfind(temp.path())
        .arg("--format")
        .arg("jsonl")
        .arg("-g")
        .arg("hello")
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);

    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["kind"], "content");
    assert_eq!(items[0]["path"], "./notes.txt");
    assert_eq!(items[0]["lines"][0]["number"], 1);
    assert_eq!(items[0]["lines"][0]["text"], "say hello");
    assert_eq!(items[0]["lines"][0]["spans"][0]["start"], 4);
    assert_eq!(items[0]["lines"][0]["spans"][0]["end"], 9);
}

#[test]
fn color_always_highlights_matches() {
    let temp = tempdir().unwrap();

    write_file(&temp.path().join("main.rs"), "");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("jfind"));
    cmd.current_dir(temp.path())
        .env_remove("JFIND_COLOR")
        .arg("--color")
        .arg("always")
        .arg("main")
        .assert()
        .success()
        .stdout(predicate::str::contains("\u{1b}["))
        .stdout(predicate::str::contains("main"));
}

#[test]
fn no_results_prints_nothing() {
    let temp = tempdir().unwrap();

    write_file(&temp.path().join("a.txt"), "");

    jfind(temp.path())
        .arg("nothing-matches-this")
        .assert()
        .success()
        .stdout("");
}
