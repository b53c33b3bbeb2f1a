//! Ordering of configurations and projects

use std::collections::{BTreeMap, BTreeSet};

use cascade_fs::Template;
use cascade_graph::{
    SortError, rollup_project_dependencies, sort_all_environments, sort_configurations,
    sort_projects,
};
use cascade_meta::{Configuration, Coordinate, Parameters};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn coordinate(project: &str, id: &str) -> Coordinate {
    Coordinate::new(project, "api", id)
}

fn config(project: &str, id: &str, references: &[Coordinate]) -> Configuration {
    Configuration {
        template: Template::new(format!("{id}.json"), "{}"),
        coordinate: coordinate(project, id),
        group: "default".into(),
        environment: "dev".into(),
        parameters: Parameters::new(),
        references: references.to_vec(),
        skip: false,
    }
}

fn ids(order: &[&Configuration]) -> Vec<String> {
    order.iter().map(|c| c.coordinate.to_string()).collect()
}

#[test]
fn test_referenced_configuration_comes_first() {
    let configs = vec![
        config("p", "dashboard", &[coordinate("p", "zone")]),
        config("p", "zone", &[]),
    ];

    let order = sort_configurations("dev", &configs).into_result().unwrap();
    assert_eq!(ids(&order), vec!["p:api:zone", "p:api:dashboard"]);
}

#[test]
fn test_reference_outside_set_is_satisfied() {
    let configs = vec![config("p", "dashboard", &[coordinate("elsewhere", "zone")])];

    let sorted = sort_configurations("dev", &configs);
    assert!(sorted.errors.is_empty());
    assert_eq!(ids(&sorted.order), vec!["p:api:dashboard"]);
}

#[test]
fn test_mutual_references_report_each_other() {
    let x = coordinate("p", "x");
    let y = coordinate("p", "y");
    let configs = vec![
        config("p", "x", &[y.clone()]),
        config("p", "y", &[x.clone()]),
        config("p", "z", &[]),
    ];

    let sorted = sort_configurations("dev", &configs);
    assert_eq!(ids(&sorted.order), vec!["p:api:z"]);
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

#[test]
fn test_cycle_error_message() {
    let configs = vec![
        config("p", "a", &[coordinate("p", "b")]),
        config("p", "b", &[coordinate("p", "c")]),
        config("p", "c", &[coordinate("p", "a")]),
    ];

    let errors = sort_configurations("prod", &configs).into_result().unwrap_err();
    assert_eq!(errors.len(), 3);
    insta::assert_snapshot!(errors[0].to_string(), @r"
    prod:p:api:a: is part of circular dependency.
     depends on: p:api:b, p:api:c
    ");
}

#[test]
fn test_duplicate_coordinates_sorted_once() {
    let configs = vec![config("p", "a", &[]), config("p", "a", &[])];
    let sorted = sort_configurations("dev", &configs);
    assert_eq!(sorted.order.len(), 1);
}

#[test]
fn test_sort_all_environments_is_independent() {
    let mut per_environment = BTreeMap::new();
    per_environment.insert(
        "dev".to_string(),
        vec![
            config("p", "a", &[coordinate("p", "b")]),
            config("p", "b", &[coordinate("p", "a")]),
        ],
    );
    per_environment.insert(
        "prod".to_string(),
        vec![config("p", "a", &[coordinate("p", "b")]), config("p", "b", &[])],
    );

    let sorted = sort_all_environments(&per_environment);
    assert_eq!(sorted.len(), 2);
    assert_eq!(sorted["dev"].errors.len(), 2);
    assert!(sorted["prod"].errors.is_empty());
    assert_eq!(ids(&sorted["prod"].order), vec!["p:api:b", "p:api:a"]);
}

#[test]
fn test_rollup_project_dependencies() {
    let configs = vec![
        config("app", "dashboard", &[coordinate("infra", "zone"), coordinate("app", "slo")]),
        config("app", "slo", &[]),
        config("infra", "zone", &[]),
    ];

    let dependencies = rollup_project_dependencies(&configs);
    assert_eq!(dependencies["app"], BTreeSet::from(["infra".to_string()]));
    assert!(dependencies["infra"].is_empty());
}

#[test]
fn test_sort_projects() {
    let dependencies = BTreeMap::from([
        ("app".to_string(), BTreeSet::from(["infra".to_string()])),
        ("infra".to_string(), BTreeSet::new()),
        ("reports".to_string(), BTreeSet::from(["app".to_string(), "external".to_string()])),
    ]);

    let order = sort_projects("dev", &dependencies).into_result().unwrap();
    assert_eq!(order, vec!["infra", "app", "reports"]);
}

#[test]
fn test_project_cycle_error() {
    let dependencies = BTreeMap::from([
        ("a".to_string(), BTreeSet::from(["b".to_string()])),
        ("b".to_string(), BTreeSet::from(["a".to_string()])),
    ]);

    let errors = sort_projects("dev", &dependencies).into_result().unwrap_err();
    assert_eq!(errors.len(), 2);
    insta::assert_snapshot!(errors[1].to_string(), @r"
    dev:b: circular dependency detected.
     check project dependencies: a
    ");
}

fn dag_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1usize..20).prop_flat_map(|n| {
        let edges = proptest::collection::vec((0..n, 0..n), 0..40).prop_map(|pairs| {
            pairs
                .into_iter()
                .filter(|(a, b)| a != b)
                .map(|(a, b)| (a.max(b), a.min(b)))
                .collect::<Vec<_>>()
        });
        (Just(n), edges)
    })
}

fn build_configs(n: usize, edges: &[(usize, usize)]) -> Vec<Configuration> {
    (0..n)
        .map(|i| {
            let refs: Vec<Coordinate> = edges
                .iter()
                .filter(|(from, _)| *from == i)
                .map(|(_, to)| coordinate("p", &format!("c{to:02}")))
                .collect();
            config("p", &format!("c{i:02}"), &refs)
        })
        .collect()
}

proptest! {
    #[test]
    fn test_acyclic_order_respects_every_edge((n, edges) in dag_strategy()) {
        let configs = build_configs(n, &edges);
        let first = sort_configurations("dev", &configs).into_result().unwrap();
        let second = sort_configurations("dev", &configs).into_result().unwrap();

        prop_assert_eq!(first.len(), n);
        let position: BTreeMap<String, usize> = first
            .iter()
            .enumerate()
            .map(|(i, c)| (c.coordinate.config_id.clone(), i))
            .collect();
        prop_assert_eq!(position.len(), n);

        for (from, to) in &edges {
            let from = position[&format!("c{from:02}")];
            let to = position[&format!("c{to:02}")];
            prop_assert!(to < from);
        }

        prop_assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn test_ring_members_report_whole_ring(ring in 2usize..6, extra in 0usize..5) {
        let mut edges: Vec<(usize, usize)> = (0..ring).map(|i| (i, (i + 1) % ring)).collect();
        // acyclic tail hanging off the ring
        for j in 0..extra {
            edges.push((ring + j, j % ring));
        }
        let configs = build_configs(ring + extra, &edges);

        let sorted = sort_configurations("dev", &configs);
        prop_assert_eq!(sorted.order.len(), extra);
        prop_assert_eq!(sorted.errors.len(), ring);

        for error in &sorted.errors {
            match error {
                SortError::CircularConfigDependency { location, depends_on, .. } => {
                    prop_assert_eq!(depends_on.len(), ring - 1);
                    prop_assert!(!depends_on.contains(location));
                }
                other => prop_assert!(false, "unexpected error {other}"),
            }
        }
    }
}
