//! CLI route table end to end, without spawning the binary

use clap::Parser;
use clonekit::cli::{map_error, Cli, RunContext};
use clonekit::clone::derive_address;
use clonekit::config::ClonekitConfig;
use clonekit::types::Address;
use tempfile::TempDir;

const OPERATOR: &str = "0x0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f";
const ADMIN: &str = "0xadadadadadadadadadadadadadadadadadadadad";
const IMPLEMENTATION: &str = "0x1010101010101010101010101010101010101010";

fn workspace() -> (TempDir, RunContext) {
    let dir = TempDir::new().unwrap();
    let mut config = ClonekitConfig::default();
    config.registry.factory_operators = vec![OPERATOR.parse().unwrap()];
    config.registry.allowlist_admins = vec![ADMIN.parse().unwrap()];
    let ctx = RunContext::with_config(dir.path().to_path_buf(), config).unwrap();
    (dir, ctx)
}

fn run(ctx: &RunContext, args: &[&str]) -> Result<String, String> {
    let mut argv = vec!["clonekit"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).map_err(|e| e.to_string())?;
    ctx.execute(&cli.command).map_err(|e| map_error(&e))
}

fn write_list(dir: &TempDir) {
    std::fs::write(
        dir.path().join("list.csv"),
        "\
# airdrop list
0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa,100
0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb,200
0xdddddddddddddddddddddddddddddddddddddddd,300
",
    )
    .unwrap();
}

#[test]
fn test_clone_address_matches_library() {
    let (_dir, ctx) = workspace();
    let salt = format!("0x{}", "00".repeat(31) + "01");
    let out = run(
        &ctx,
        &[
            "clone",
            "address",
            "--implementation",
            IMPLEMENTATION,
            "--deployer",
            OPERATOR,
            "--salt",
            &salt,
        ],
    )
    .unwrap();

    let mut raw_salt = [0u8; 32];
    raw_salt[31] = 1;
    let expected = derive_address(
        &IMPLEMENTATION.parse().unwrap(),
        &OPERATOR.parse().unwrap(),
        &raw_salt,
    );
    assert_eq!(out, expected.to_string());
}

#[test]
fn test_proof_then_verify() {
    let (dir, ctx) = workspace();
    write_list(&dir);

    let root = run(&ctx, &["allowlist", "root", "--input", "list.csv"]).unwrap();
    let leaf = run(
        &ctx,
        &[
            "leaf",
            "hash",
            "--claimant",
            "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb",
            "--amount",
            "200",
        ],
    )
    .unwrap();
    let bundle = run(
        &ctx,
        &[
            "allowlist",
            "proof",
            "--input",
            "list.csv",
            "--claimant",
            "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb",
            "--format",
            "json",
        ],
    )
    .unwrap();
    let bundle: serde_json::Value = serde_json::from_str(&bundle).unwrap();
    assert_eq!(bundle["root"].as_str().unwrap(), root);
    assert_eq!(bundle["leaf"].as_str().unwrap(), leaf);

    let proof: Vec<&str> = bundle["proof"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p.as_str().unwrap())
        .collect();
    assert_eq!(proof.len(), 2);
    let proof = proof.join(",");
    assert_eq!(
        run(
            &ctx,
            &[
                "allowlist",
                "verify",
                "--root",
                &root,
                "--leaf",
                &leaf,
                "--proof",
                &proof,
            ],
        )
        .unwrap(),
        "valid"
    );
    assert_eq!(
        run(
            &ctx,
            &[
                "allowlist",
                "verify",
                "--root",
                &root,
                "--leaf",
                &root,
                "--proof",
                &proof,
            ],
        )
        .unwrap(),
        "invalid"
    );
}

#[test]
fn test_unknown_claimant() {
    let (dir, ctx) = workspace();
    write_list(&dir);
    let err = run(
        &ctx,
        &["allowlist", "proof", "--input", "list.csv", "--claimant", OPERATOR],
    )
    .unwrap_err();
    assert!(err.starts_with("allowlist: "));
}

#[test]
fn test_publish_and_claim() {
    let (dir, ctx) = workspace();
    write_list(&dir);

    let err = run(
        &ctx,
        &[
            "allowlist",
            "claim",
            "--name",
            "drop",
            "--input",
            "list.csv",
            "--claimant",
            "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
        ],
    )
    .unwrap_err();
    assert!(err.contains("No Merkle root has been published"));

    let err = run(
        &ctx,
        &["allowlist", "publish", "--input", "list.csv", "--name", "drop", "--caller", OPERATOR],
    )
    .unwrap_err();
    assert!(err.starts_with("unauthorized: "));

    let out = run(
        &ctx,
        &["allowlist", "publish", "--input", "list.csv", "--name", "drop", "--caller", ADMIN],
    )
    .unwrap();
    assert!(out.contains("version 1"));

    assert_eq!(
        run(
            &ctx,
            &[
                "allowlist",
                "claim",
                "--name",
                "drop",
                "--input",
                "list.csv",
                "--claimant",
                "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
            ],
        )
        .unwrap(),
        "valid"
    );
}

#[test]
fn test_registry_lifecycle_persists_between_runs() {
    let (dir, ctx) = workspace();
    assert_eq!(
        run(&ctx, &["registry", "status", "--implementation", IMPLEMENTATION]).unwrap(),
        format!("{}: never registered", IMPLEMENTATION)
    );
    run(
        &ctx,
        &[
            "registry",
            "register",
            "--implementation",
            IMPLEMENTATION,
            "--caller",
            OPERATOR,
            "--contract-type",
            "DropERC721",
            "--contract-version",
            "1",
        ],
    )
    .unwrap();
    run(
        &ctx,
        &[
            "registry",
            "revoke",
            "--implementation",
            IMPLEMENTATION,
            "--caller",
            OPERATOR,
        ],
    )
    .unwrap();
    drop(ctx);

    let mut config = ClonekitConfig::default();
    config.registry.factory_operators = vec![OPERATOR.parse::<Address>().unwrap()];
    let ctx = RunContext::with_config(dir.path().to_path_buf(), config).unwrap();
    assert_eq!(
        run(&ctx, &["registry", "status", "--implementation", IMPLEMENTATION]).unwrap(),
        format!("{}: revoked", IMPLEMENTATION)
    );
    let err = run(
        &ctx,
        &["registry", "register", "--implementation", IMPLEMENTATION, "--caller", OPERATOR],
    )
    .unwrap_err();
    assert!(err.starts_with("registry: "));

    let listing = run(&ctx, &["registry", "list", "--format", "json"]).unwrap();
    let rows: serde_json::Value = serde_json::from_str(&listing).unwrap();
    assert_eq!(rows[0]["contract_type"], "DropERC721");
    assert_eq!(rows[0]["approved"], false);
}

#[test]
fn test_leaf_hash_needs_a_complete_form() {
    let (_dir, ctx) = workspace();
    let err = run(&ctx, &["leaf", "hash", "--claimant", OPERATOR]).unwrap_err();
    assert!(err.starts_with("input: "));
}

#[test]
fn test_config_show_renders_loaded_grants() {
    let (_dir, ctx) = workspace();
    let rendered = run(&ctx, &["config", "show"]).unwrap();
    assert!(rendered.contains("[registry]"));
    assert!(rendered.contains(OPERATOR));

    let reparsed: ClonekitConfig = toml::from_str(&rendered).unwrap();
    assert_eq!(&reparsed, ctx.config());
}

#[test]
fn test_configured_leaf_sorting_matches_flag() {
    let (dir, ctx) = workspace();
    write_list(&dir);
    let flagged = run(
        &ctx,
        &["allowlist", "root", "--input", "list.csv", "--sort-leaves"],
    )
    .unwrap();

    let mut config = ctx.config().clone();
    config.allowlist.sort_leaves = true;
    let sorted_ctx = RunContext::with_config(dir.path().to_path_buf(), config).unwrap();
    let configured = run(&sorted_ctx, &["allowlist", "root", "--input", "list.csv"]).unwrap();

    assert_eq!(configured, flagged);
}
