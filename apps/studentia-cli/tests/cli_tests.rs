use std::path::PathBuf;
use std::process::Command;

fn workspace_root() -> PathBuf {
    // apps/studentia-cli -> apps -> repo root
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).ancestors().nth(2).unwrap().to_path_buf()
}

fn studentia() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_studentia"));
    cmd.current_dir(workspace_root())
        .env("RUST_ENV", "test")
        .env("RUST_LOG", "warn")
        .env("APP_USE_FAKE_EMBEDDINGS", "1")
        .env_remove("OPENAI_API_KEY");
    cmd
}

#[test]
fn check_reports_sample_corpus() {
    let out = studentia().arg("check").output().expect("run");
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("4 sections, 4 dimensions"), "{stdout}");
}

#[test]
fn prompt_dry_run_renders_prompt_without_api_key() {
    let out = studentia().args(["prompt", "When does the library open?", "--show-ranking", "2"]).output().expect("run");
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("--- Ranking ---"));
    assert!(stdout.contains("Context:\n"));
    assert!(stdout.contains("\n\n Q: When does the library open?\n A:"), "{stdout}");
}

#[test]
fn small_budget_from_environment_yields_empty_context() {
    let out = studentia()
        .env("APP_PROMPT__TOKEN_BUDGET", "5")
        .args(["prompt", "tuition"])
        .output()
        .expect("run");
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("--- Selected 0 sections (0 tokens) ---"), "{stdout}");
}

#[test]
fn ask_without_api_key_fails() {
    let out = studentia().args(["ask", "Where is Ewha?"]).output().expect("run");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("OPENAI_API_KEY"));
}

#[test]
fn missing_data_files_fail_check() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = studentia().arg("check").arg("--base-dir").arg(tmp.path()).output().expect("run");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("failed to load knowledge base"));
}
