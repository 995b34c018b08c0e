//! CLI argument parsing and command dispatch.
//!
//! # Commands
//!
//! - `init`: Create a data directory with a `config.yaml`
//! - `import`: Replace an itinerary with segments from a JSONL file
//! - `itineraries`: List stored itineraries
//! - `list`: Show an itinerary's segments
//! - `check`: Look for dependency cycles and overlapping exclusive segments
//! - `order`: Show segments in dependency order
//! - `dependents`: Show everything that depends on a segment
//! - `infer`: Show dependencies inferred from time adjacency
//! - `shift`: Move a segment and cascade the change
//!
//! # Global Flags
//!
//! - `--json`: Output in JSON format
//! - `--dir <PATH>`: Data directory (default: nearest `.itinera/`)
//! - `-i, --itinerary <ID>`: Itinerary to operate on (default: `trip`)
//!
//! # Example
//!
//! ```bash
//! itinera init --window-minutes 45
//! itinera -i lisbon import lisbon.jsonl
//! itinera -i lisbon check
//! itinera -i lisbon shift flight-out --by +2h --dry-run
//! ```

mod args;
mod execute;
mod types;
mod validators;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::{find_data_dir, DATA_DIR_NAME};
use crate::domain::ItineraryId;
use crate::output::OutputMode;
use crate::planner::Planner;

pub use args::{DependentsArgs, ImportArgs, InitArgs, ListArgs, ShiftArgs};
pub use types::SegmentTypeArg;
pub use validators::{parse_delta, validate_itinerary_id, validate_segment_id};

/// Default itinerary when `--itinerary` is not given
pub const DEFAULT_ITINERARY: &str = "trip";

/// Itinera - plan trips as dependent segments
///
/// Moving one segment moves everything that depends on it, explicitly or
/// because it follows closely in time. Shifts that would leave flights or
/// transfers overlapping are refused.
#[derive(Parser, Debug)]
#[command(name = "itinera")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Data directory (default: nearest `.itinera/` at or above the current directory)
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    /// Itinerary to operate on
    #[arg(
        short,
        long,
        global = true,
        default_value = DEFAULT_ITINERARY,
        value_parser = validate_itinerary_id
    )]
    pub itinerary: ItineraryId,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Initialize a data directory
    ///
    /// Creates `.itinera/` (or `--dir`) with a `config.yaml` and an empty
    /// itineraries directory.
    Init(InitArgs),

    /// Import segments from a JSONL file
    ///
    /// Replaces the selected itinerary. Malformed and duplicate records are
    /// skipped with a warning.
    Import(ImportArgs),

    /// List stored itineraries
    Itineraries,

    /// List segments in stored order
    List(ListArgs),

    /// Check for dependency cycles and conflicts
    ///
    /// Exits with a non-zero status when a problem is found.
    Check,

    /// Show segments in dependency order
    Order,

    /// Show every segment that depends on the given one
    Dependents(DependentsArgs),

    /// Show dependencies inferred from time adjacency
    Infer,

    /// Move a segment and everything that depends on it
    ///
    /// All affected segments move by the same amount. The change is refused,
    /// and nothing is saved, if flights or transfers would end up overlapping.
    Shift(ShiftArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        }
    }

    /// The data directory: `--dir`, else the nearest `.itinera/`, else
    /// `./.itinera` (where `init` creates it).
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.dir {
            return Ok(dir.clone());
        }
        let cwd = std::env::current_dir()?;
        Ok(find_data_dir(&cwd).unwrap_or_else(|| cwd.join(DATA_DIR_NAME)))
    }

    /// Execute the CLI command
    ///
    /// Returns a failure exit code when `check` finds problems.
    pub async fn execute(&self) -> Result<ExitCode> {
        let output_mode = self.output_mode();
        let itinerary = &self.itinerary;

        let Some(command) = &self.command else {
            println!("Itinera itinerary planner");
            println!("Use --help for more information");
            return Ok(ExitCode::SUCCESS);
        };

        let dir = match (command, &self.dir) {
            (Commands::Init(_), None) => std::env::current_dir()?.join(DATA_DIR_NAME),
            _ => self.data_dir()?,
        };
        tracing::debug!(dir = %dir.display(), itinerary = %itinerary, "resolved data directory");

        if let Commands::Init(args) = command {
            execute::execute_init(&dir, args, output_mode).await?;
            return Ok(ExitCode::SUCCESS);
        }

        let planner = Planner::from_directory(&dir).await?;
        match command {
            Commands::Init(_) => {}
            Commands::Import(args) => {
                execute::execute_import(&planner, itinerary, args, output_mode).await?;
            }
            Commands::Itineraries => execute::execute_itineraries(&planner, output_mode).await?,
            Commands::List(args) => {
                execute::execute_list(&planner, itinerary, args, output_mode).await?;
            }
            Commands::Check => {
                if !execute::execute_check(&planner, itinerary, output_mode).await? {
                    return Ok(ExitCode::FAILURE);
                }
            }
            Commands::Order => execute::execute_order(&planner, itinerary, output_mode).await?,
            Commands::Dependents(args) => {
                execute::execute_dependents(&planner, itinerary, args, output_mode).await?;
            }
            Commands::Infer => execute::execute_infer(&planner, itinerary, output_mode).await?,
            Commands::Shift(args) => {
                execute::execute_shift(&planner, itinerary, args, output_mode).await?;
            }
        }
        Ok(ExitCode::SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn parse_no_command() {
        let cli = Cli::try_parse_from(["itinera"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.json);
        assert_eq!(cli.itinerary.as_str(), DEFAULT_ITINERARY);
        assert!(cli.dir.is_none());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "itinera", "check", "--json", "-i", "lisbon", "--dir", "/tmp/x",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.itinerary.as_str(), "lisbon");
        assert_eq!(cli.dir, Some(PathBuf::from("/tmp/x")));
        assert!(matches!(cli.command, Some(Commands::Check)));
    }

    #[test]
    fn invalid_itinerary_is_rejected() {
        assert!(Cli::try_parse_from(["itinera", "-i", "../etc", "list"]).is_err());
    }

    #[test]
    fn parse_init_window() {
        let cli = Cli::try_parse_from(["itinera", "init", "--window-minutes", "45"]).unwrap();
        match cli.command {
            Some(Commands::Init(args)) => {
                assert_eq!(args.window_minutes, Some(45));
                assert!(!args.quiet);
            }
            _ => panic!("Expected Init command"),
        }
    }

    #[test]
    fn negative_window_is_rejected() {
        assert!(Cli::try_parse_from(["itinera", "init", "--window-minutes", "-5"]).is_err());
    }

    #[rstest]
    #[case::positive(&["itinera", "shift", "f1", "--by", "+2h"], 7_200_000)]
    #[case::negative(&["itinera", "shift", "f1", "--by", "-30m"], -1_800_000)]
    #[case::equals(&["itinera", "shift", "f1", "--by=-1h30m"], -5_400_000)]
    fn parse_shift_delta(#[case] argv: &[&str], #[case] expected: i64) {
        let cli = Cli::try_parse_from(argv.iter().copied()).unwrap();
        match cli.command {
            Some(Commands::Shift(args)) => {
                assert_eq!(args.segment.as_str(), "f1");
                assert_eq!(args.delta_ms, expected);
                assert!(!args.dry_run);
            }
            _ => panic!("Expected Shift command"),
        }
    }

    #[test]
    fn parse_shift_dry_run() {
        let cli =
            Cli::try_parse_from(["itinera", "shift", "f1", "--by", "90s", "--dry-run"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Shift(ShiftArgs { dry_run: true, delta_ms: 90_000, .. }))
        ));
    }

    #[test]
    fn shift_requires_delta() {
        assert!(Cli::try_parse_from(["itinera", "shift", "f1"]).is_err());
        assert!(Cli::try_parse_from(["itinera", "shift", "f1", "--by", "2"]).is_err());
    }

    #[test]
    fn parse_list_type_filter() {
        let cli = Cli::try_parse_from(["itinera", "list", "--type", "flight"]).unwrap();
        match cli.command {
            Some(Commands::List(args)) => {
                assert_eq!(args.segment_type, Some(SegmentTypeArg::Flight));
            }
            _ => panic!("Expected List command"),
        }
    }

    #[test]
    fn parse_dependents() {
        let cli = Cli::try_parse_from(["itinera", "dependents", "hotel-1"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Dependents(ref args)) if args.segment.as_str() == "hotel-1"
        ));
    }

    #[test]
    fn explicit_dir_wins() {
        let cli = Cli::try_parse_from(["itinera", "--dir", "/data/trips", "list"]).unwrap();
        assert_eq!(cli.data_dir().unwrap(), PathBuf::from("/data/trips"));
    }
}
