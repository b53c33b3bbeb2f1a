//! End-to-end scenarios: definition files on disk through loading and sorting.

use cascade_core::{Error, LoaderContext, load_configs};
use cascade_graph::{SortError, sort_configurations};
use cascade_meta::{Coordinate, EnvironmentDefinition};
use cascade_test_utils::{ConfigYaml, TestWorkspace};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn context(ws: &TestWorkspace) -> LoaderContext {
    LoaderContext::new("project", ws.project_dir("project"))
        .with_environments([EnvironmentDefinition::new("dev", "development")])
}

fn first_error(ws: &TestWorkspace) -> String {
    let errors = load_configs(&context(ws)).unwrap_err();
    errors[0].to_string()
}

#[test]
fn scenario_a_file_without_definitions() {
    let ws = TestWorkspace::new();
    ws.write("project/empty.yaml", "");

    assert!(first_error(&ws).contains("no configurations found in file"));
}

#[test]
fn scenario_b_unknown_api() {
    let ws = TestWorkspace::new();
    ws.write_project("project", "a.yaml", &[ConfigYaml::new("a", "not-an-api")]);

    let message = first_error(&ws);
    assert!(message.contains("unknown API"), "{message}");
    assert!(message.contains("not-an-api"));
}

#[test]
fn scenario_c_missing_template() {
    let ws = TestWorkspace::new();
    ws.write_project(
        "project",
        "a.yaml",
        &[ConfigYaml::new("a", "dashboard").without_template()],
    );

    assert!(first_error(&ws).contains("missing property `template`"));
}

#[test]
fn scenario_d_mutual_references_form_a_cycle() {
    let ws = TestWorkspace::new();
    ws.write_project(
        "project",
        "a.yaml",
        &[
            ConfigYaml::new("x", "dashboard").reference("y", "dashboard", "y"),
            ConfigYaml::new("y", "dashboard").reference("x", "dashboard", "x"),
            ConfigYaml::new("z", "dashboard"),
        ],
    );

    let configs = load_configs(&context(&ws)).unwrap();
    let sorted = sort_configurations("dev", &configs);

    let order: Vec<String> = sorted.order.iter().map(|c| c.coordinate.to_string()).collect();
    assert_eq!(order, vec!["project:dashboard:z"]);

    let x = Coordinate::new("project", "dashboard", "x");
    let y = Coordinate::new("project", "dashboard", "y");
    assert_eq!(
        sorted.errors,
        vec![
            SortError::CircularConfigDependency {
                environment: "dev".into(),
                location: x.clone(),
                depends_on: vec![y.clone()],
            },
            SortError::CircularConfigDependency {
                environment: "dev".into(),
                location: y,
                depends_on: vec![x],
            },
        ]
    );
}

#[rstest]
#[case("\"TRUE\"", true)]
#[case("\"false\"", false)]
#[case("true", true)]
#[case("False", false)]
fn scenario_e_skip_accepts_booleans(#[case] skip: &str, #[case] expected: bool) {
    let ws = TestWorkspace::new();
    ws.write_project("project", "a.yaml", &[ConfigYaml::new("a", "dashboard").skip(skip)]);

    let configs = load_configs(&context(&ws)).unwrap();
    assert_eq!(configs[0].skip, expected);
}

#[rstest]
#[case("\"maybe\"", "invalid value for `skip`: `maybe`. only `true` and `false` are allowed")]
#[case("42", "invalid value for `skip`: only bool or string types are allowed")]
fn scenario_e_skip_rejects_other_values(#[case] skip: &str, #[case] expected: &str) {
    let ws = TestWorkspace::new();
    ws.write_project("project", "a.yaml", &[ConfigYaml::new("a", "dashboard").skip(skip)]);

    let errors = load_configs(&context(&ws)).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], Error::Definition(_)));
    assert!(errors[0].to_string().contains(expected), "{}", errors[0]);
}
