//! End-to-end tests for client generation.

use acg_codegen::plan::Instruction;
use acg_codegen::{ClientGenerator, InstructionKind, TemplateEngine};
use acg_core::{Configuration, Error};

fn config(services: &str) -> Configuration {
    let yaml = format!(
        r#"
pypi:
  username: alice
  password: s3cret
acg:
  api: https://x/
  name: demo
  version: 0.1.0
  services:
{services}"#
    );
    Configuration::from_yaml_str(&yaml, "test").unwrap()
}

const SINGLE_SERVICE: &str = r#"    users:
      url: /users
      endpoints: "list:GET, create:POST"
"#;

const NESTED_SERVICES: &str = r#"    users.profile:
      url: /users/profile
      endpoints: "get:GET"
    users.settings:
      url: /users/settings
      endpoints: "get:GET, update:PUT"
    billing:
      url: /billing
      endpoints: "charge:POST"
"#;

#[test]
fn test_single_service_end_to_end() {
    let generator = ClientGenerator::new().unwrap();
    let package = generator.generate(&config(SINGLE_SERVICE)).unwrap();

    let expected = vec![
        Instruction::DefineClass {
            class: "Users".to_string(),
        },
        Instruction::DefineRequest {
            class: "Users".to_string(),
            method: "list".to_string(),
            verb: "GET".to_string(),
            url: "https://x//users".to_string(),
        },
        Instruction::DefineRequest {
            class: "Users".to_string(),
            method: "create".to_string(),
            verb: "POST".to_string(),
            url: "https://x//users".to_string(),
        },
        Instruction::DefineRootClient {
            class: "Demo_client".to_string(),
        },
        Instruction::LinkRootProperty {
            class: "Demo_client".to_string(),
            property: "users".to_string(),
            target: "Users".to_string(),
        },
        Instruction::AssignSingleton {
            object: "demo_client".to_string(),
            class: "Demo_client".to_string(),
        },
    ];
    assert_eq!(package.plan.instructions(), expected.as_slice());

    let source = package.client_source().unwrap();
    assert!(source.starts_with("# Generated by acg"));
    assert!(source.contains("import requests\n"));
    assert!(source.contains("class Users(object):\n    pass\n"));
    assert!(source.contains("return requests.request('GET', 'https://x//users', **kwargs)"));
    assert!(source.contains("return requests.request('POST', 'https://x//users', **kwargs)"));
    assert!(source.contains("Users.list = _Users_list"));
    assert!(source.contains("Users.create = _Users_create"));
    assert!(source.contains("class Demo_client(object):"));
    assert!(source.contains("Demo_client.users = Users()"));
    assert!(source.ends_with("demo_client = Demo_client()\n"));
}

#[test]
fn test_shared_prefix_defines_class_once() {
    let generator = ClientGenerator::new().unwrap();
    let plan = generator.plan(&config(NESTED_SERVICES)).unwrap();

    let classes: Vec<&str> = plan
        .of_kind(InstructionKind::DefineClass)
        .filter_map(Instruction::defined_class)
        .collect();
    assert_eq!(classes, vec!["Users", "Profile", "Settings", "Billing"]);

    let links_from_users = plan
        .of_kind(InstructionKind::LinkProperty)
        .filter(|i| matches!(i, Instruction::LinkProperty { class, .. } if class == "Users"))
        .count();
    assert_eq!(links_from_users, 2);
}

#[test]
fn test_every_reference_is_defined_first() {
    let generator = ClientGenerator::new().unwrap();
    let plan = generator.plan(&config(NESTED_SERVICES)).unwrap();
    assert!(plan.first_dangling_reference().is_none());

    let source = generator.generate_client(&config(NESTED_SERVICES)).unwrap();
    let class_at = |name: &str| source.find(&format!("class {name}(object):")).unwrap();
    assert!(class_at("Settings") < source.find("Users.settings = Settings()").unwrap());
    assert!(class_at("Billing") < source.find("Billing.charge = _Billing_charge").unwrap());
    assert!(class_at("Demo_client") < source.find("Demo_client.billing = Billing()").unwrap());
}

#[test]
fn test_root_links_one_per_top_level_segment() {
    let generator = ClientGenerator::new().unwrap();
    let plan = generator.plan(&config(NESTED_SERVICES)).unwrap();

    let roots: Vec<&Instruction> = plan.of_kind(InstructionKind::LinkRootProperty).collect();
    assert_eq!(roots.len(), 2);
    assert_eq!(plan.count(InstructionKind::DefineRootClient), 1);
    assert_eq!(plan.count(InstructionKind::AssignSingleton), 1);
}

#[test]
fn test_generation_is_idempotent() {
    let generator = ClientGenerator::new().unwrap();
    let first = generator.generate(&config(NESTED_SERVICES)).unwrap();
    let second = generator.generate(&config(NESTED_SERVICES)).unwrap();
    assert_eq!(first.code, second.code);

    let fresh = ClientGenerator::with_engine(TemplateEngine::new().unwrap());
    let third = fresh.generate(&config(NESTED_SERVICES)).unwrap();
    assert_eq!(first.code, third.code);
}

#[test]
fn test_no_services_still_emits_root_client() {
    let yaml = r#"
pypi: {username: alice, password: s3cret}
acg: {api: "https://x/", name: demo, version: 0.1.0}
"#;
    let config = Configuration::from_yaml_str(yaml, "test").unwrap();
    let generator = ClientGenerator::new().unwrap();
    let package = generator.generate(&config).unwrap();

    assert_eq!(package.plan.len(), 2);
    assert!(
        package
            .client_source()
            .unwrap()
            .ends_with("demo_client = Demo_client()\n")
    );
}

#[test]
fn test_duplicate_method_on_shared_leaf_fails() {
    let services = r#"    a.items:
      url: /a/items
      endpoints: "list:GET"
    b.items:
      url: /b/items
      endpoints: "list:GET"
"#;
    let generator = ClientGenerator::new().unwrap();
    let err = generator.generate(&config(services)).unwrap_err();
    assert!(matches!(
        err,
        Error::DuplicateEndpoint { ref service, ref endpoint } if service == "b.items" && endpoint == "list"
    ));
}

#[test]
fn test_segment_named_like_root_client_fails() {
    let services = r#"    demo_client:
      url: /x
      endpoints: "get:GET"
"#;
    let generator = ClientGenerator::new().unwrap();
    let err = generator.generate(&config(services)).unwrap_err();
    assert!(matches!(err, Error::ClassNameCollision { .. }));
}

#[test]
fn test_quote_in_url_is_escaped_in_client() {
    let services = r#"    search:
      url: "/search?q=o'brien"
      endpoints: "find:GET"
"#;
    let generator = ClientGenerator::new().unwrap();
    let source = generator.generate_client(&config(services)).unwrap();

    assert!(source.contains(r"requests.request('GET', 'https://x//search?q=o\'brien', **kwargs)"));
    assert!(!source.contains("o'brien"));
}

#[test]
fn test_keyword_endpoint_is_rejected() {
    let services = r#"    orders:
      url: /orders
      endpoints: "import:POST, return:POST"
"#;
    let generator = ClientGenerator::new().unwrap();
    let err = generator.generate(&config(services)).unwrap_err();
    assert!(matches!(err, Error::MalformedEndpoint { ref endpoint, .. } if endpoint == "import:POST"));
}

#[test]
fn test_segment_capitalizing_to_keyword_is_rejected() {
    let services = r#"    none:
      url: /none
      endpoints: "get:GET"
"#;
    let generator = ClientGenerator::new().unwrap();
    let err = generator.generate(&config(services)).unwrap_err();
    assert!(matches!(err, Error::MalformedPath { ref path, .. } if path == "none"));
}
