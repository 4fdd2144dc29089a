use tempfile::TempDir;

use fnselect_core::config::{ServiceFormat, ServiceStore};
use fnselect_core::hooks::{HookOutcome, RunOptions, SelectPlugin};
use fnselect_core::registry::UnitRegistry;

const SERVICE: &str = r#"
service = "billing"

[provider]
name = "aws"

[functions.invoice]
handler = "src/invoice.handler"
memorySize = 512
regions = ["us-east-1"]

[functions.audit]
handler = "src/audit.handler"
stages = ["prod"]

[functions.health]
handler = "src/health.handler"
"#;

#[test]
fn discover_missing_service_errors() {
    let temp = TempDir::new().unwrap();
    let err = ServiceStore::discover(temp.path()).unwrap_err();
    assert!(err.to_string().contains("No service file found"));
}

#[test]
fn discover_prefers_toml() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("service.json"), "{}").unwrap();
    std::fs::write(temp.path().join("service.toml"), SERVICE).unwrap();

    let store = ServiceStore::discover(temp.path()).unwrap();

    assert_eq!(store.format(), ServiceFormat::Toml);
    assert_eq!(store.load().unwrap().functions.len(), 3);
}

#[test]
fn load_missing_file_errors() {
    let temp = TempDir::new().unwrap();
    let store = ServiceStore::from_path(temp.path().join("nope.toml"));

    let err = store.load().unwrap_err();
    assert!(err.to_string().contains("Service file not found"));
}

#[test]
fn filtered_service_saves_without_removed_functions() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("service.toml");
    std::fs::write(&source, SERVICE).unwrap();

    let mut config = ServiceStore::from_path(&source).load().unwrap();
    let mut registry = config.to_registry();

    let plugin = SelectPlugin::new(RunOptions {
        region: Some("eu-west-1".into()),
        stage: Some("prod".into()),
        ..RunOptions::default()
    });
    let outcome = plugin.run_hook(plugin.hook_for_run(), &mut registry).unwrap();
    assert!(matches!(outcome, HookOutcome::Applied(ref report) if report.removed.len() == 1));

    config.retain_registry(&registry);
    let output = ServiceStore::from_path(temp.path().join("out").join("service.json"));
    output.save(&config).unwrap();

    let reloaded = output.load().unwrap();
    assert_eq!(
        reloaded.functions.names().collect::<Vec<_>>(),
        vec!["audit", "health"]
    );
    assert_eq!(
        reloaded.to_registry().unit_names(),
        registry.unit_names()
    );
    assert_eq!(
        reloaded.functions.get("audit").unwrap().settings["handler"],
        "src/audit.handler"
    );
}
