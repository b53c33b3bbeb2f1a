//! `cascade plan`: load, order and dry-run resolve.

use std::collections::BTreeMap;
use std::path::Path;

use cascade_core::{
    DryRun, Manifest, Project, ProjectFilter, ProjectLoader, ResolvedConfiguration,
};
use cascade_fs::NormalizedPath;
use cascade_graph::{SortedConfigurations, sort_all_environments, sort_projects};
use colored::Colorize;

use crate::error::{CliError, Result};

pub fn run_plan(manifest_path: &Path, environments: &[String], projects: &[String]) -> Result<()> {
    let manifest_path = NormalizedPath::new(manifest_path);
    let manifest = Manifest::load(&manifest_path)?;
    let root = manifest_path
        .parent()
        .unwrap_or_else(|| NormalizedPath::new("."));

    let loader = ProjectLoader::new(&manifest, root);
    let filter = ProjectFilter {
        environments: environments.to_vec(),
        projects: projects.to_vec(),
    };

    let selected = loader
        .environments(&filter.environments)
        .map_err(|errors| failed("loading projects", errors))?;
    let loaded = loader
        .load(&filter)
        .map_err(|errors| failed("loading projects", errors))?;

    tracing::debug!(
        projects = loaded.len(),
        environments = selected.len(),
        "Projects loaded"
    );

    // every project's environments are sorted in parallel
    let sorted: BTreeMap<&str, BTreeMap<String, SortedConfigurations<'_>>> = loaded
        .iter()
        .map(|project| (project.id.as_str(), sort_all_environments(&project.configs)))
        .collect();

    let mut failures = 0;
    for environment in &selected {
        match plan_environment(&environment.name, &loaded, &sorted) {
            Ok(plan) => print_plan(&environment.name, &environment.group, &plan),
            Err(errors) => failures += report(errors),
        }
    }

    if failures > 0 {
        return Err(CliError::Failed {
            stage: "planning deployment",
            count: failures,
        });
    }

    Ok(())
}

fn plan_environment(
    environment: &str,
    projects: &[Project],
    sorted: &BTreeMap<&str, BTreeMap<String, SortedConfigurations<'_>>>,
) -> std::result::Result<Vec<ResolvedConfiguration>, Vec<CliError>> {
    let dependencies = projects
        .iter()
        .map(|p| {
            let deps = p.dependencies.get(environment).cloned().unwrap_or_default();
            (p.id.clone(), deps)
        })
        .collect();

    let project_order = sort_projects(environment, &dependencies)
        .into_result()
        .map_err(|errors| errors.into_iter().map(CliError::from).collect::<Vec<_>>())?;

    let mut dry_run = DryRun::new(environment);
    let mut plan = Vec::new();
    let mut errors = Vec::new();

    for id in &project_order {
        let Some(sorted) = sorted.get(id.as_str()).and_then(|m| m.get(environment)) else {
            continue;
        };

        if !sorted.errors.is_empty() {
            errors.extend(sorted.errors.iter().cloned().map(CliError::from));
            continue;
        }

        match dry_run.resolve(sorted.order.iter().copied()) {
            Ok(mut resolved) => plan.append(&mut resolved),
            Err(failed) => errors.extend(failed.into_iter().map(CliError::from)),
        }
    }

    if errors.is_empty() {
        Ok(plan)
    } else {
        Err(errors)
    }
}

fn print_plan(environment: &str, group: &str, plan: &[ResolvedConfiguration]) {
    println!(
        "{} {} ({})",
        "Environment".bold(),
        environment.green().bold(),
        group
    );

    if plan.is_empty() {
        println!("  nothing to deploy");
    }

    for (position, config) in plan.iter().enumerate() {
        let coordinate = config.coordinate.to_string();
        if config.skip {
            println!(
                "  {:>3}. {} {}",
                position + 1,
                coordinate.dimmed(),
                "(skipped)".yellow()
            );
        } else {
            println!("  {:>3}. {}", position + 1, coordinate.cyan());
        }
    }
    println!();
}

/// Print every error, returning how many there were.
fn report(errors: Vec<impl Into<CliError>>) -> usize {
    let count = errors.len();
    for error in errors {
        eprintln!("{}: {}", "error".red().bold(), error.into());
    }
    count
}

fn failed(stage: &'static str, errors: Vec<cascade_core::Error>) -> CliError {
    CliError::Failed {
        stage,
        count: report(errors),
    }
}
