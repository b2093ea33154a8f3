use clap::{Parser, Subcommand};
use dialoguer::Select;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use memberlens::errors::{MemberLensError, Result};
use memberlens::lens::{MemberLens, RosterOverrides};
use memberlens::report::{
    format_identity, format_matches_as_text, format_resolution_as_json,
    format_resolution_as_text, format_summary_as_text,
};
use memberlens::rpc::LensServer;
use memberlens::types::*;

/// Resolve member references against chat community rosters.
#[derive(Parser)]
#[command(
    name = "memberlens",
    version,
    about = "Resolve member references against chat community rosters"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Roster selection shared by commands that resolve tokens.
#[derive(clap::Args)]
struct RosterArgs {
    /// Project path (default: current directory)
    #[arg(short, long)]
    path: Option<String>,
    /// Channel roster file, overriding the configured one
    #[arg(long)]
    channel: Option<PathBuf>,
    /// Community roster file, overriding the configured one
    #[arg(long)]
    community: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration
    Init {
        /// Project path (default: current directory)
        path: Option<String>,
    },
    /// Resolve a single token to a member
    Resolve {
        /// Token typed by the user
        #[arg(value_parser = clap::builder::NonEmptyStringValueParser::new())]
        token: String,
        #[command(flatten)]
        rosters: RosterArgs,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
        /// Prompt to pick one member when the result is ambiguous
        #[arg(short, long)]
        interactive: bool,
    },
    /// Show every candidate a token matched, best first
    Explain {
        /// Token typed by the user
        #[arg(value_parser = clap::builder::NonEmptyStringValueParser::new())]
        token: String,
        #[command(flatten)]
        rosters: RosterArgs,
        /// Maximum candidates to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
    /// Resolve several tokens and summarize the outcomes
    Batch {
        /// Tokens typed by the user
        #[arg(required = true, value_parser = clap::builder::NonEmptyStringValueParser::new())]
        tokens: Vec<String>,
        #[command(flatten)]
        rosters: RosterArgs,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Show roster statistics
    Status {
        #[command(flatten)]
        rosters: RosterArgs,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Serve resolution tools as JSON-RPC over stdio
    Serve {
        #[command(flatten)]
        rosters: RosterArgs,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(match e {
            MemberLensError::NotFound { .. } => 2,
            _ => 1,
        });
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { path } => {
            let project_path = resolve_path(path);
            let config = MemberLens::init(&project_path)?;
            println!("Initialized memberlens at {}", project_path.display());
            println!(
                "  Rosters: channel={} community={}",
                config.channel_roster.as_deref().unwrap_or("(none)"),
                config.community_roster
            );
        }
        Commands::Resolve {
            token,
            rosters,
            json,
            interactive,
        } => {
            let lens = open_lens(rosters)?;
            let resolution = lens.resolve(&token);
            let resolution = if interactive || lens.config().interactive {
                disambiguate(&token, resolution)?
            } else {
                resolution
            };

            if json {
                println!("{}", format_resolution_as_json(&token, &resolution));
            } else {
                print!(
                    "{}",
                    format_resolution_as_text(
                        &token,
                        &resolution,
                        lens.config().max_listed_candidates
                    )
                );
            }
            if resolution.is_not_found() {
                return Err(MemberLensError::NotFound { token });
            }
        }
        Commands::Explain {
            token,
            rosters,
            limit,
        } => {
            let lens = open_lens(rosters)?;
            let mut matches = lens.explain(&token);
            matches.truncate(limit);
            print!("{}", format_matches_as_text(&token, &matches));
        }
        Commands::Batch {
            tokens,
            rosters,
            json,
        } => {
            let lens = open_lens(rosters)?;
            let summary = lens.resolve_all(&tokens);
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&summary).unwrap_or_default()
                );
            } else {
                print!(
                    "{}",
                    format_summary_as_text(&summary, lens.config().max_listed_candidates)
                );
            }
        }
        Commands::Status { rosters, json } => {
            let lens = open_lens(rosters)?;
            let stats = lens.stats();
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&stats).unwrap_or_default()
                );
            } else {
                println!("memberlens Status");
                println!("  Channel members:   {}", stats.channel_members);
                println!("  Community members: {}", stats.community_members);
                println!("  Shared:            {}", stats.shared_members);
                println!("  Tagged:            {}", stats.tagged_members);
                println!("  Nicknamed:         {}", stats.nicknamed_members);
            }
        }
        Commands::Serve { rosters } => {
            let lens = open_lens(rosters)?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(LensServer::new(lens).run())?;
        }
    }
    Ok(())
}

/// Asks the user to pick one member out of an ambiguous bracket.
///
/// Resolved and not-found outcomes pass through unchanged.
fn disambiguate(token: &str, resolution: Resolution) -> Result<Resolution> {
    let (identities, score) = match resolution {
        Resolution::Ambiguous { identities, score } => (identities, score),
        other => return Ok(other),
    };

    let items: Vec<String> = identities.iter().map(format_identity).collect();
    let choice = Select::new()
        .with_prompt(format!("Several members match '{}'", token))
        .items(&items)
        .default(0)
        .interact_opt()
        .map_err(|e| MemberLensError::Prompt {
            message: e.to_string(),
        })?;

    Ok(match choice.and_then(|i| identities.get(i).cloned()) {
        Some(identity) => Resolution::Resolved { identity, score },
        None => Resolution::Ambiguous { identities, score },
    })
}

fn open_lens(rosters: RosterArgs) -> Result<MemberLens> {
    let project_path = resolve_path(rosters.path);
    let overrides = RosterOverrides {
        channel: rosters.channel,
        community: rosters.community,
    };
    MemberLens::open(&project_path, &overrides)
}

/// Resolves an optional path argument to a `PathBuf`.
///
/// Defaults to the current working directory if no path is provided.
fn resolve_path(path: Option<String>) -> PathBuf {
    match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
