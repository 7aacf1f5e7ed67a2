//! Integration tests for the generate workflow driven through the CLI
//! argument parser.

use acg_cli::Cli;
use acg_cli::runner::{execute_command, exit_code_for};
use acg_core::cli::{ExitCode, OutputFormat};
use clap::Parser;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CONFIG: &str = r#"
pypi:
  username: alice
  password: s3cret
acg:
  api: https://api.example.com
  name: shop
  version: 1.2.0
  services:
    orders:
      url: /orders
      endpoints: "list:GET, create:POST"
    orders.items:
      url: /orders/items
      endpoints: "list:GET"
    customers:
      url: /customers
      endpoints: "find:GET"
"#;

fn write_config(dir: &Path, text: &str) -> String {
    let path = dir.join("api.yml");
    fs::write(&path, text).unwrap();
    path.display().to_string()
}

fn generate(config: &str, output: &Path) -> anyhow::Result<ExitCode> {
    let output = output.display().to_string();
    let cli = Cli::parse_from([
        "acg",
        "--format",
        "json",
        "generate",
        "--config",
        config,
        "--output",
        output.as_str(),
    ]);
    execute_command(cli.command, OutputFormat::Json)
}

#[test]
fn test_generate_writes_package_layout() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), CONFIG);
    let out = temp.path().join("out");

    assert_eq!(generate(&config, &out).unwrap(), ExitCode::SUCCESS);

    let root = out.join("shop");
    assert!(root.join("setup.py").is_file());
    assert!(root.join("LICENSE").is_file());
    assert!(root.join("requirements.txt").is_file());
    assert!(root.join("shop/__init__.py").is_file());
    assert!(root.join("shop/shop.py").is_file());

    let setup = fs::read_to_string(root.join("setup.py")).unwrap();
    assert!(setup.contains("shop"));
    assert!(setup.contains("1.2.0"));
}

#[test]
fn test_generated_client_structure() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), CONFIG);
    let out = temp.path().join("out");
    generate(&config, &out).unwrap();

    let client = fs::read_to_string(out.join("shop/shop/shop.py")).unwrap();

    assert!(client.starts_with("# Generated by acg."));
    assert!(client.contains("import requests"));
    assert!(client.contains("class Orders(object):"));
    assert!(client.contains("class Items(object):"));
    assert!(client.contains("class Customers(object):"));
    assert!(client.contains("Orders.items = Items()"));
    assert!(client.contains("Shop_client.orders = Orders()"));
    assert!(client.contains("Shop_client.customers = Customers()"));
    assert!(client.contains("requests.request('POST', 'https://api.example.com/orders', **kwargs)"));
    assert!(client.contains("'https://api.example.com/orders/items'"));
    assert!(client.trim_end().ends_with("shop_client = Shop_client()"));

    // Root links appear once per top-level segment.
    assert_eq!(client.matches("Shop_client.orders = Orders()").count(), 1);
}

#[test]
fn test_generate_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), CONFIG);
    let out = temp.path().join("out");

    generate(&config, &out).unwrap();
    let first = fs::read_to_string(out.join("shop/shop/shop.py")).unwrap();
    generate(&config, &out).unwrap();
    let second = fs::read_to_string(out.join("shop/shop/shop.py")).unwrap();

    assert_eq!(first, second);
    let leftovers: Vec<_> = fs::read_dir(out.join("shop"))
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_generate_duplicate_endpoint_is_input_error() {
    let temp = TempDir::new().unwrap();
    let config = write_config(
        temp.path(),
        r#"
pypi: {username: alice, password: s3cret}
acg:
  api: https://api.example.com
  name: shop
  version: 1.0.0
  services:
    orders:
      url: /orders
      endpoints: "list:GET, list:POST"
"#,
    );
    let out = temp.path().join("out");

    let err = generate(&config, &out).unwrap_err();
    assert_eq!(exit_code_for(&err), ExitCode::INVALID_INPUT);
    assert!(!out.join("shop").exists());
}

#[test]
fn test_generate_missing_config_is_input_error() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("absent.yml").display().to_string();

    let err = generate(&missing, temp.path()).unwrap_err();
    assert_eq!(exit_code_for(&err), ExitCode::INVALID_INPUT);
}

#[test]
fn test_publish_dry_run_needs_no_package() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), CONFIG);
    let output = temp.path().display().to_string();

    let cli = Cli::parse_from([
        "acg",
        "publish",
        "--config",
        config.as_str(),
        "--output",
        output.as_str(),
        "--dry-run",
    ]);
    assert_eq!(
        execute_command(cli.command, OutputFormat::Text).unwrap(),
        ExitCode::SUCCESS
    );
}
