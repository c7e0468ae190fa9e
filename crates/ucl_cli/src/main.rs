//! UCL CLI
//!
//! Draw a league phase, run a whole season, or inspect the rules document.

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use ucl_core::api::DrawMode;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "ucl_cli")]
#[command(about = "Swiss-phase draw, season simulation and playoff bracket", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct RunArgs {
    /// Roster file (.csv or .json); the built-in 36-club roster when omitted
    #[arg(long)]
    roster: Option<PathBuf>,

    /// Rules file (.yaml, .yml or .json); defaults when omitted
    #[arg(long)]
    rules: Option<PathBuf>,

    /// RNG seed for the ceremony draw and simulations
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Team-by-team ceremony draw instead of the matchday-by-matchday draw
    #[arg(long, default_value = "false")]
    sequential: bool,

    /// Output JSON file; stdout when omitted
    #[arg(long)]
    out: Option<PathBuf>,
}

#[cfg(feature = "cli")]
impl RunArgs {
    fn mode(&self) -> DrawMode {
        if self.sequential {
            DrawMode::Sequential
        } else {
            DrawMode::Swiss
        }
    }
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Draw the league-phase fixture list
    Draw(RunArgs),

    /// Draw, simulate the league phase and play out the playoff bracket
    Season(RunArgs),

    /// Print the effective rules, or their JSON schema
    Rules {
        /// Rules file to validate and print
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Print the JSON schema instead
        #[arg(long, default_value = "false")]
        schema: bool,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Draw(args) => {
            let teams = ucl_cli::load_roster(args.roster.as_deref())?;
            let rules = ucl_cli::load_rules(args.rules.as_deref())?;
            let report = ucl_cli::run_draw(&teams, &rules, args.mode(), args.seed)?;
            eprintln!(
                "Drew {} fixtures for {} teams ({} issues)",
                report.fixtures.len(),
                teams.len(),
                report.issues.len()
            );
            ucl_cli::write_json(&report, args.out.as_deref())?;
        }

        Commands::Season(args) => {
            let teams = ucl_cli::load_roster(args.roster.as_deref())?;
            let rules = ucl_cli::load_rules(args.rules.as_deref())?;
            let report = ucl_cli::run_season(&teams, &rules, args.mode(), args.seed)?;
            match &report.champion {
                Some(team) => eprintln!("Champion: {} ({})", team.name, team.country),
                None => eprintln!("No champion: fewer than 16 clubs reached the playoffs"),
            }
            ucl_cli::write_json(&report, args.out.as_deref())?;
        }

        Commands::Rules { rules, schema } => {
            if schema {
                println!("{}", ucl_core::models::rules_schema_json()?);
            } else {
                let rules = ucl_cli::load_rules(rules.as_deref())?;
                ucl_cli::write_json(&rules, None)?;
            }
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("ucl_cli is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
