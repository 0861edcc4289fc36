//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Quay - manifest resolver for binary-framework packages
#[derive(Parser)]
#[command(name = "quay")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to Quay.toml (defaults to searching upward from the current directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub manifest_path: Option<PathBuf>,

    /// Profile to apply to the manifest
    #[arg(long, global = true, env = "QUAY_PROFILE")]
    pub profile: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate the manifest and report warnings
    Check(CheckArgs),

    /// Verify local artifacts and download remote ones
    Fetch(FetchArgs),

    /// Print the target build order
    Plan(PlanArgs),

    /// Display product and target trees
    Tree(TreeArgs),

    /// List the profiles defined in Quay.toml
    Profiles,

    /// Initialize a Quay package in an existing directory
    Init(InitArgs),

    /// Remove the artifact store
    Clean(CleanArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Fail when validation or layout produces warnings
    #[arg(long)]
    pub deny_warnings: bool,
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Number of parallel downloads
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Use only artifacts already in the store
    #[arg(long)]
    pub offline: bool,

    /// Artifact store directory
    #[arg(long, env = "QUAY_STORE_DIR", value_name = "DIR")]
    pub store_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Print the full plan as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Only show this product
    pub product: Option<String>,

    /// Maximum depth to display
    #[arg(long)]
    pub depth: Option<usize>,

    /// Expand targets already shown elsewhere in the tree
    #[arg(long)]
    pub duplicates: bool,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (defaults to current directory)
    pub path: Option<PathBuf>,

    /// Package name (defaults to directory name)
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Artifact store directory
    #[arg(long, env = "QUAY_STORE_DIR", value_name = "DIR")]
    pub store_dir: Option<PathBuf>,

    /// Also remove the project's .quay directory
    #[arg(long)]
    pub project: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["quay", "check", "--profile", "legacy", "-v"]);
        assert!(cli.global.verbose);
        assert_eq!(cli.global.profile.as_deref(), Some("legacy"));
        assert!(matches!(cli.command, Commands::Check(_)));
    }

    #[test]
    fn test_fetch_args() {
        let cli = Cli::parse_from(["quay", "fetch", "-j", "4", "--offline"]);
        match cli.command {
            Commands::Fetch(args) => {
                assert_eq!(args.jobs, Some(4));
                assert!(args.offline);
            }
            _ => panic!("expected fetch"),
        }
    }

    #[test]
    fn test_tree_args_defaults() {
        let cli = Cli::parse_from(["quay", "tree"]);
        match cli.command {
            Commands::Tree(args) => {
                assert!(args.product.is_none());
                assert!(args.depth.is_none());
                assert!(!args.duplicates);
            }
            _ => panic!("expected tree"),
        }
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["quay", "check", "-v", "-q"]).is_err());
    }
}
