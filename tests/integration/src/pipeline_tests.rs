//! Full pipeline: manifest, projects, overrides, ordering and dry-run values.

use std::collections::BTreeMap;

use cascade_core::{DryRun, Manifest, Project, ProjectFilter, ProjectLoader, ResolvedConfiguration};
use cascade_fs::NormalizedPath;
use cascade_graph::{sort_all_environments, sort_projects};
use cascade_test_utils::{ConfigYaml, TestWorkspace};
use pretty_assertions::assert_eq;
use serde_yaml::Value;

fn workspace() -> TestWorkspace {
    let ws = TestWorkspace::new();
    ws.write_manifest(
        &["monitoring", "infra"],
        &[
            ("development", &["dev"][..]),
            ("production", &["prod-eu", "prod-us"][..]),
        ],
    );
    ws.write_project(
        "infra",
        "zones.yaml",
        &[ConfigYaml::new("zone", "management-zone")
            .name("\"Zone\"")
            .parameter("size", "1")
            .group_override("production", &[("size", "10")])
            .environment_override("prod-us", &[("size", "20")])],
    );
    ws.write_project(
        "monitoring",
        "alerts.yaml",
        &[
            ConfigYaml::new("profile", "alerting-profile")
                .parameter("zone", "[\"infra\", \"management-zone\", \"zone\", \"id\"]")
                .parameter("zone_size", "[\"infra\", \"management-zone\", \"zone\", \"size\"]")
                .parameter("owner", "{ type: environment, name: CASCADE_OWNER, default: nobody }"),
            ConfigYaml::new("notify", "notification")
                .reference("profile", "alerting-profile", "profile")
                .parameter("channels", "{ type: list, values: [mail, pager] }"),
        ],
    );
    ws
}

fn load(ws: &TestWorkspace, filter: &ProjectFilter) -> Vec<Project> {
    let manifest = Manifest::load(&NormalizedPath::new(ws.manifest_path())).unwrap();
    ProjectLoader::new(&manifest, ws.root()).load(filter).unwrap()
}

fn plan(projects: &[Project], environment: &str) -> Vec<ResolvedConfiguration> {
    let dependencies = projects
        .iter()
        .map(|p| (p.id.clone(), p.dependencies[environment].clone()))
        .collect();
    let order = sort_projects(environment, &dependencies).into_result().unwrap();

    let lookup = |name: &str| (name == "CASCADE_OWNER").then(|| "ops".to_string());
    let mut dry_run = DryRun::new(environment).with_env_lookup(&lookup);
    let mut resolved = Vec::new();

    for id in order {
        let project = projects.iter().find(|p| p.id == id).unwrap();
        let sorted = sort_all_environments(&project.configs);
        let configs = sorted[environment].clone().into_result().unwrap();
        resolved.extend(dry_run.resolve(configs).unwrap());
    }
    resolved
}

fn by_id(resolved: &[ResolvedConfiguration]) -> BTreeMap<String, &ResolvedConfiguration> {
    resolved
        .iter()
        .map(|r| (r.coordinate.config_id.clone(), r))
        .collect()
}

#[test]
fn test_overrides_flow_into_resolved_values() {
    let ws = workspace();
    let projects = load(&ws, &ProjectFilter::default());

    for (environment, size) in [("dev", 1), ("prod-eu", 10), ("prod-us", 20)] {
        let resolved = plan(&projects, environment);
        let resolved = by_id(&resolved);

        assert_eq!(resolved["zone"].properties["size"], Value::from(size));
        assert_eq!(resolved["profile"].properties["zone_size"], Value::from(size));
        assert_eq!(
            resolved["profile"].properties["zone"],
            Value::from("infra:management-zone:zone")
        );
        assert_eq!(resolved["profile"].properties["owner"], Value::from("ops"));
    }
}

#[test]
fn test_deployment_order_is_deterministic() {
    let ws = workspace();
    let projects = load(&ws, &ProjectFilter::default());

    let coordinates = |resolved: Vec<ResolvedConfiguration>| -> Vec<String> {
        resolved.iter().map(|r| r.coordinate.to_string()).collect()
    };

    let first = coordinates(plan(&projects, "prod-eu"));
    assert_eq!(
        first,
        vec![
            "infra:management-zone:zone",
            "monitoring:alerting-profile:profile",
            "monitoring:notification:notify",
        ]
    );

    for _ in 0..5 {
        assert_eq!(coordinates(plan(&projects, "prod-eu")), first);
    }
}

#[test]
fn test_list_parameter_resolves_to_sequence() {
    let ws = workspace();
    let projects = load(&ws, &ProjectFilter::default());

    let resolved = plan(&projects, "dev");
    let notify = by_id(&resolved)["notify"];
    assert_eq!(
        notify.properties["channels"],
        serde_yaml::from_str::<Value>("[mail, pager]").unwrap()
    );
}

#[test]
fn test_filtered_project_keeps_its_dependencies() {
    let ws = workspace();
    let filter = ProjectFilter {
        environments: vec!["prod-us".into()],
        projects: vec!["monitoring".into()],
    };

    let projects = load(&ws, &filter);
    let ids: Vec<&str> = projects.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["monitoring", "infra"]);

    let resolved = plan(&projects, "prod-us");
    assert_eq!(resolved.len(), 3);
}

#[test]
fn test_skipped_dependency_fails_dry_run() {
    let ws = workspace();
    ws.write_project(
        "infra",
        "zones.yaml",
        &[ConfigYaml::new("zone", "management-zone").skip("true")],
    );
    let projects = load(&ws, &ProjectFilter::default());

    let dependencies = projects
        .iter()
        .map(|p| (p.id.clone(), p.dependencies["dev"].clone()))
        .collect();
    let order = sort_projects("dev", &dependencies).into_result().unwrap();

    let mut dry_run = DryRun::new("dev");
    let mut errors = Vec::new();
    for id in order {
        let project = projects.iter().find(|p| p.id == id).unwrap();
        let sorted = sort_all_environments(&project.configs);
        let configs = sorted["dev"].clone().into_result().unwrap();
        if let Err(mut e) = dry_run.resolve(configs) {
            errors.append(&mut e);
        }
    }

    let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
    assert_eq!(messages.len(), 3, "{messages:#?}");
    // both profile parameters point at the skipped zone
    let skipped = messages
        .iter()
        .filter(|m| m.contains("configuration is skipped"))
        .count();
    assert_eq!(skipped, 2);
    // notify references the profile, which failed and stays unresolved
    assert!(messages
        .iter()
        .any(|m| m.contains("notify") && m.contains("has not been resolved")));
}
