use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::{TempDir, tempdir};

fn write(path: &PathBuf, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn mgv(tmp: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("mgv"));
    cmd.env("XDG_CONFIG_HOME", tmp.path().join("xdg"));
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn embed_escapes_values_and_injects_scripts() {
    let tmp = tempdir().unwrap();
    let page = tmp.path().join("page.html");
    let out = tmp.path().join("dist/page.html");
    write(&page, "<html><body><h1>Hi @name</h1></body></html>");

    mgv(&tmp)
        .args(["embed", page.to_str().unwrap(), "--var", "name=<Ann>"])
        .args(["--redirect", "https://shop.example/buy?plan=@plan", "--var", "plan=pro plus"])
        .args(["--message-prefix", "quiz", "--delay-ms", "250"])
        .args(["--output", out.to_str().unwrap()])
        .assert()
        .success();

    let html = fs::read_to_string(&out).unwrap();
    assert!(html.starts_with("<html><body><h1>Hi &lt;Ann&gt;</h1><script>"));
    assert!(html.contains(r#"type: "quiz:resize""#));
    assert!(html.contains(r#"var url = "https://shop.example/buy?plan=pro+plus";"#));
    assert!(html.contains(r#"type: "quiz:redirect""#));
    assert!(html.contains("setTimeout(go, 250);"));
    assert!(html.ends_with("</script>\n</body></html>"));
}

#[test]
fn embed_rejects_non_http_redirect() {
    let tmp = tempdir().unwrap();
    let page = tmp.path().join("page.html");
    write(&page, "<p>x</p>");

    mgv(&tmp)
        .args(["embed", page.to_str().unwrap(), "--redirect", "javascript:alert(1)"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("FAIL mgv embed"))
        .stdout(predicate::str::contains("unsupported redirect scheme 'javascript'"));
}

#[test]
fn snippet_prints_iframe_and_listener() {
    let tmp = tempdir().unwrap();
    mgv(&tmp)
        .args(["snippet", "https://pages.example.com/m/quiz", "--id", "lead", "--height", "480"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"<iframe id="lead" src="https://pages.example.com/m/quiz""#))
        .stdout(predicate::str::contains(r#"height="480""#))
        .stdout(predicate::str::contains(r#"event.origin !== "https://pages.example.com""#))
        .stdout(predicate::str::contains(r#""magnet:redirect""#));
}

#[test]
fn snippet_rejects_bad_urls() {
    let tmp = tempdir().unwrap();
    mgv(&tmp)
        .args(["snippet", "not a url"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("FAIL mgv snippet"));

    mgv(&tmp)
        .args(["snippet", "ftp://files.example.com/x"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("unsupported url scheme 'ftp'"));
}

#[test]
fn completions_for_bash() {
    let tmp = tempdir().unwrap();
    mgv(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mgv"));
}
