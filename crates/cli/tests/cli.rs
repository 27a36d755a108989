use assert_cmd::Command;

fn saboga(workdir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("saboga").unwrap();
    cmd.current_dir(workdir.path())
        .env_remove("SABOGA_ENV")
        .env_remove("SABOGA_CONFIG_DIR")
        .env_remove("RUST_LOG")
        .arg("--config-dir")
        .arg(workdir.path().join("config"));
    cmd
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn seed_dry_run_prints_sample_documents() {
    let workdir = tempfile::tempdir().unwrap();
    let output = saboga(&workdir)
        .args(["seed", "--dry-run"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");

    let json = stdout_json(&output);
    let games = json["boardgames"].as_array().unwrap();
    assert_eq!(games.len(), 2);
    assert!(games.iter().any(|game| game["name"] == "Catan"));
    assert!(games.iter().any(|game| game["name"] == "Gloomhaven"));
    assert_eq!(json["rankhistory"].as_array().unwrap().len(), 2);
}

#[test]
fn generate_dry_run_honours_size_flags() {
    let workdir = tempfile::tempdir().unwrap();
    let output = saboga(&workdir)
        .args([
            "generate",
            "--games",
            "2",
            "--days",
            "3",
            "--rng-seed",
            "1",
            "--dry-run",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");

    let json = stdout_json(&output);
    assert_eq!(json["boardgames"].as_array().unwrap().len(), 2);
    assert_eq!(json["rankhistory"].as_array().unwrap().len(), 6);
}

#[test]
fn config_file_renames_collections() {
    let workdir = tempfile::tempdir().unwrap();
    let config = workdir.path().join("config");
    std::fs::create_dir(&config).unwrap();
    std::fs::write(
        config.join("base.toml"),
        "[collections]\nboardgames = \"games\"\n",
    )
    .unwrap();

    let output = saboga(&workdir)
        .args(["seed", "--dry-run"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");

    let json = stdout_json(&output);
    assert_eq!(json["games"].as_array().unwrap().len(), 2);
    assert!(json.get("boardgames").is_none());
}

#[test]
fn unknown_subcommand_fails() {
    let workdir = tempfile::tempdir().unwrap();
    saboga(&workdir).arg("reticulate").assert().failure();
}

#[test]
fn unknown_environment_fails() {
    let workdir = tempfile::tempdir().unwrap();
    saboga(&workdir)
        .env("SABOGA_ENV", "qa")
        .args(["seed", "--dry-run"])
        .assert()
        .failure();
}

#[test]
fn generate_rejects_ids_past_the_largest_game_id() {
    let workdir = tempfile::tempdir().unwrap();
    let config = workdir.path().join("config");
    std::fs::create_dir(&config).unwrap();
    std::fs::write(
        config.join("base.toml"),
        "[generate]\nfirst_bgg_id = 2147483647\n",
    )
    .unwrap();

    let output = saboga(&workdir)
        .args(["generate", "--games", "2", "--days", "2", "--dry-run"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("largest game id"));
}
