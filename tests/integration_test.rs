use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

/// root/{a.txt, b/{a.txt, c.txt}}
fn create_tree() -> Result<tempfile::TempDir, Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    std::fs::File::create(dir.path().join("a.txt"))?;
    std::fs::create_dir(dir.path().join("b"))?;
    std::fs::File::create(dir.path().join("b").join("a.txt"))?;
    std::fs::File::create(dir.path().join("b").join("c.txt"))?;
    Ok(dir)
}

fn stdout_lines(output: &std::process::Output) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let stdout = String::from_utf8(output.stdout.clone())?;
    Ok(stdout.lines().map(str::to_string).collect())
}

#[test]
fn test_search_in_empty_dir() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    let mut cmd = Command::cargo_bin("rust-search")?;
    cmd.arg(dir.path())
       .assert()
       .success()
       .stdout(predicate::str::is_empty());

    Ok(())
}

#[test]
fn test_matches_in_discovery_order() -> Result<(), Box<dyn std::error::Error>> {
    let dir = create_tree()?;

    let mut cmd = Command::cargo_bin("rust-search")?;
    let output = cmd.arg(dir.path())
       .arg(r"a\.txt")
       .arg("--sort")
       .assert()
       .success();

    let lines = stdout_lines(output.get_output())?;
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("a.txt") && !lines[0].contains("/b/"));
    assert!(lines[1].ends_with("b/a.txt"));

    Ok(())
}

#[test]
fn test_max_depth_zero() -> Result<(), Box<dyn std::error::Error>> {
    let dir = create_tree()?;

    let mut cmd = Command::cargo_bin("rust-search")?;
    let output = cmd.arg(dir.path())
       .arg(r"a\.txt")
       .arg("--max-depth")
       .arg("0")
       .assert()
       .success();

    let lines = stdout_lines(output.get_output())?;
    assert_eq!(lines.len(), 1);
    assert!(!lines[0].contains("/b/"));

    Ok(())
}

#[test]
fn test_command_string() -> Result<(), Box<dyn std::error::Error>> {
    let dir = create_tree()?;

    let mut cmd = Command::cargo_bin("rust-search")?;
    let output = cmd.arg(dir.path())
       .arg(r"\.txt$")
       .arg("--commands")
       .arg("-minRecursionDepth=1 -maxHorizontal=1 -maxRecursionDepth=abc")
       .assert()
       .success();

    let lines = stdout_lines(output.get_output())?;
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("/b/"));

    Ok(())
}

#[test]
fn test_folders_only_display() -> Result<(), Box<dyn std::error::Error>> {
    let dir = create_tree()?;

    let mut cmd = Command::cargo_bin("rust-search")?;
    let output = cmd.arg(dir.path())
       .arg("--folders")
       .assert()
       .success();

    let lines = stdout_lines(output.get_output())?;
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("b"));

    Ok(())
}

#[test]
fn test_full_match_and_ignore_case() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    std::fs::File::create(dir.path().join("README"))?;
    std::fs::File::create(dir.path().join("README.md"))?;

    let mut cmd = Command::cargo_bin("rust-search")?;
    let output = cmd.arg(dir.path())
       .arg("readme")
       .arg("-i")
       .arg("--full-match")
       .assert()
       .success();

    let lines = stdout_lines(output.get_output())?;
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("README"));

    Ok(())
}

#[test]
fn test_invalid_root() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    let mut cmd = Command::cargo_bin("rust-search")?;
    cmd.arg(dir.path().join("missing"))
       .arg("x")
       .assert()
       .failure()
       .stderr(predicate::str::contains("无效的搜索根目录"));

    Ok(())
}

#[test]
fn test_invalid_pattern() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    let mut cmd = Command::cargo_bin("rust-search")?;
    cmd.arg(dir.path())
       .arg("(unclosed")
       .assert()
       .failure()
       .stderr(predicate::str::contains("正则表达式语法错误"));

    Ok(())
}

#[test]
fn test_compare_case() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    std::fs::File::create(dir.path().join("notes.txt"))?;
    std::fs::File::create(dir.path().join("NOTES.txt"))?;

    let mut cmd = Command::cargo_bin("rust-search")?;
    let output = cmd.arg(dir.path())
       .arg("notes")
       .arg("--compare-case")
       .assert()
       .success()
       .stderr(predicate::str::contains("区分大小写: 1"))
       .stderr(predicate::str::contains("不区分大小写: 2"));

    let lines = stdout_lines(output.get_output())?;
    assert_eq!(lines.len(), 1);

    Ok(())
}

#[test]
fn test_progress_output() -> Result<(), Box<dyn std::error::Error>> {
    let dir = create_tree()?;

    let mut cmd = Command::cargo_bin("rust-search")?;
    cmd.arg(dir.path())
       .arg("--progress")
       .assert()
       .success()
       .stderr(predicate::str::contains("扫描 3 个文件, 1 个目录"));

    Ok(())
}

#[test]
fn test_symlink_loop_is_not_fatal() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(unix)] {
        let dir = tempdir()?;
        std::fs::create_dir(dir.path().join("sub"))?;
        std::os::unix::fs::symlink(dir.path(), dir.path().join("sub").join("loop"))?;
        std::fs::File::create(dir.path().join("file.txt"))?;

        let mut cmd = Command::cargo_bin("rust-search")?;
        let output = cmd.arg(dir.path())
           .arg("file")
           .arg("--follow-links")
           .assert()
           .success();

        let stdout = String::from_utf8(output.get_output().stdout.clone())?;
        assert!(stdout.contains("file.txt"));
    }
    Ok(())
}
