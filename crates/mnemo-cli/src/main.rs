#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{Parser, Subcommand};
use output::OutputMode;
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use mnemo_core::config;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "mnemo: adaptive vocabulary review scheduler",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Override the data directory (default: platform data dir).
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Override the config file path.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags.
    fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Initialize the local store",
        long_about = "Create the data directory and SQLite store, running any pending migrations.",
        after_help = "EXAMPLES:\n    # Initialize in the default data directory\n    mn init\n\n    # Use a custom location\n    mn init --data-dir ~/language/mnemo"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        about = "Load catalog items from a JSON export",
        long_about = "Load words, phrases, and phonemes from a JSON array into the catalog.",
        after_help = "EXAMPLES:\n    # Seed from an export file\n    mn seed vocabulary.json\n\n    # Emit machine-readable output\n    mn seed vocabulary.json --json"
    )]
    Seed(cmd::seed::SeedArgs),

    #[command(
        about = "Build a study queue",
        long_about = "Compose a study queue: due reviews first, then new words and phrases.",
        after_help = "EXAMPLES:\n    # Default session\n    mn study\n\n    # Ten B1 items, reviews only\n    mn study --limit 10 --level b1 --mode review\n\n    # Emit machine-readable output\n    mn study --json"
    )]
    Study(cmd::study::StudyArgs),

    #[command(
        about = "Record one graded review",
        long_about = "Grade an item (again/hard/good/easy), reschedule it, and award XP.",
        after_help = "EXAMPLES:\n    # Grade a review\n    mn grade ambition good\n\n    # Digits work too\n    mn grade ambition 3\n\n    # Emit machine-readable output\n    mn grade ambition easy --json"
    )]
    Grade(cmd::grade::GradeArgs),

    #[command(
        about = "Show learner statistics",
        long_about = "Show catalog coverage, due counts, XP, level, and streak.",
        after_help = "EXAMPLES:\n    # Human-readable dashboard\n    mn stats\n\n    # Emit machine-readable output\n    mn stats --json"
    )]
    Stats(cmd::stats::StatsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("MNEMO_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "mnemo=debug,info"
        } else {
            "mnemo=info,warn"
        })
    });

    let format = env::var("MNEMO_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry.with(fmt::layer().json().with_ansi(false)).init();
        }
        _ => {
            registry.with(fmt::layer().compact()).init();
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<mnemo_core::StudyConfig> {
    match &cli.config {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    }
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = cli.output_mode();
    if let Err(err) = run(&cli, output) {
        // Anything not already rendered falls back to the catch-all code,
        // keeping stderr structured in both output modes.
        if err.downcast_ref::<output::Reported>().is_none() {
            let cli_err = output::CliError::with_message(
                mnemo_core::ErrorCode::InternalUnexpected,
                format!("{err:#}"),
            );
            let _ = output::render_error(output, &cli_err);
        }
        std::process::exit(1);
    }
}

fn run(cli: &Cli, output: OutputMode) -> anyhow::Result<()> {
    let data_dir = cmd::resolve_data_dir(cli.data_dir.as_deref())?;
    let study_config = load_config(cli).map_err(|err| {
        output::report(
            output,
            &output::CliError::with_message(
                mnemo_core::ErrorCode::ConfigParseError,
                format!("{err:#}"),
            ),
        )
    })?;

    match cli.command {
        Commands::Init(ref args) => cmd::init::run_init(args, output, &data_dir),
        Commands::Seed(ref args) => cmd::seed::run_seed(args, output, &data_dir),
        Commands::Study(ref args) => cmd::study::run_study(args, &study_config, output, &data_dir),
        Commands::Grade(ref args) => cmd::grade::run_grade(args, output, &data_dir),
        Commands::Stats(ref args) => cmd::stats::run_stats(args, &study_config, output, &data_dir),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnemo_core::model::{Grade, Level};
    use mnemo_core::session::SessionMode;

    #[test]
    fn json_flag_sets_output_mode() {
        let cli = Cli::parse_from(["mn", "--json", "stats"]);
        assert!(cli.json);
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn json_flag_after_subcommand() {
        let cli = Cli::parse_from(["mn", "stats", "--json"]);
        assert!(cli.json);
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn default_output_is_human() {
        let cli = Cli::parse_from(["mn", "stats"]);
        assert!(!cli.json);
        assert!(!cli.output_mode().is_json());
    }

    #[test]
    fn data_dir_flag_parses_before_subcommand() {
        let cli = Cli::parse_from(["mn", "--data-dir", "/tmp/d", "init"]);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/d")));
    }

    #[test]
    fn data_dir_flag_parses_after_subcommand() {
        let cli = Cli::parse_from(["mn", "init", "--data-dir", "/tmp/d"]);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/d")));
    }

    #[test]
    fn study_flags_parse() {
        let cli = Cli::parse_from(["mn", "study", "--limit", "5", "--level", "b1", "--mode", "review"]);
        match cli.command {
            Commands::Study(args) => {
                assert_eq!(args.limit, Some(5));
                assert_eq!(args.level, Some(Level::B1));
                assert_eq!(args.mode, SessionMode::Review);
            }
            other => panic!("expected study, got {other:?}"),
        }
    }

    #[test]
    fn study_mode_defaults_to_mixed() {
        let cli = Cli::parse_from(["mn", "study"]);
        match cli.command {
            Commands::Study(args) => {
                assert_eq!(args.mode, SessionMode::Mixed);
                assert_eq!(args.seed, None);
            }
            other => panic!("expected study, got {other:?}"),
        }
    }

    #[test]
    fn study_seed_parses() {
        let cli = Cli::parse_from(["mn", "study", "--seed", "42"]);
        match cli.command {
            Commands::Study(args) => assert_eq!(args.seed, Some(42)),
            other => panic!("expected study, got {other:?}"),
        }
    }

    #[test]
    fn grade_accepts_names_and_digits() {
        let cli = Cli::parse_from(["mn", "grade", "ambition", "good"]);
        match cli.command {
            Commands::Grade(args) => assert_eq!(args.grade, Grade::Good),
            other => panic!("expected grade, got {other:?}"),
        }

        let cli = Cli::parse_from(["mn", "grade", "ambition", "4"]);
        match cli.command {
            Commands::Grade(args) => assert_eq!(args.grade, Grade::Easy),
            other => panic!("expected grade, got {other:?}"),
        }
    }

    #[test]
    fn grade_rejects_unknown_value() {
        assert!(Cli::try_parse_from(["mn", "grade", "ambition", "perfect"]).is_err());
    }

    #[test]
    fn all_subcommands_parse() {
        let subcommands = [
            vec!["mn", "init"],
            vec!["mn", "seed", "items.json"],
            vec!["mn", "study"],
            vec!["mn", "grade", "x", "good"],
            vec!["mn", "stats"],
        ];
        for args in &subcommands {
            let result = Cli::try_parse_from(args.iter());
            assert!(
                result.is_ok(),
                "Failed to parse: {:?} — error: {:?}",
                args,
                result.err()
            );
        }
    }

    #[test]
    fn quiet_flag_parsed() {
        let cli = Cli::parse_from(["mn", "-q", "stats"]);
        assert!(cli.quiet);
    }
}
