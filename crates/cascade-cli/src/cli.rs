//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Cascade - Dependency-ordered configuration as code
#[derive(Parser, Debug)]
#[command(name = "cascade")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Load, order and resolve every configuration without deploying
    ///
    /// Examples:
    ///   cascade plan manifest.yaml
    ///   cascade plan manifest.yaml -e prod-eu -p infrastructure
    Plan {
        /// Path to the manifest
        manifest: PathBuf,

        /// Environment to plan for (repeatable, defaults to all)
        #[arg(short, long = "environment")]
        environments: Vec<String>,

        /// Project to plan, together with the projects it depends on
        /// (repeatable, defaults to all)
        #[arg(short, long = "project")]
        projects: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plan_with_filters() {
        let cli = Cli::parse_from([
            "cascade", "plan", "manifest.yaml", "-e", "dev", "-e", "prod", "--project", "infra",
        ]);

        assert!(!cli.verbose);
        assert_eq!(
            cli.command,
            Commands::Plan {
                manifest: PathBuf::from("manifest.yaml"),
                environments: vec!["dev".into(), "prod".into()],
                projects: vec!["infra".into()],
            }
        );
    }

    #[test]
    fn parse_verbose_after_subcommand() {
        let cli = Cli::parse_from(["cascade", "plan", "m.yaml", "--verbose"]);
        assert!(cli.verbose);
    }

    #[test]
    fn plan_requires_manifest() {
        assert!(Cli::try_parse_from(["cascade", "plan"]).is_err());
    }
}
