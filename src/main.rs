//! prepmap CLI - Visualize and track an interview-preparation roadmap.

use chrono::Utc;
use clap::Parser;
use prepmap::cli::{Cli, Commands, ConfigCommands};
use prepmap::commands::{self, Output};
use prepmap::config::{ConfigOverrides, OutputFormat, ResolvedConfig, resolve_config};
use prepmap::storage::Storage;
use std::process;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable controlling log verbosity (tracing filter syntax).
const LOG_ENV: &str = "PREPMAP_LOG";

fn main() {
    init_tracing();

    let cli = Cli::parse();

    let mut overrides = ConfigOverrides::new();
    if cli.human_readable {
        overrides = overrides.with_output_format(OutputFormat::Human);
    }
    if let Some(ref path) = cli.roadmap {
        overrides = overrides.with_roadmap(path);
    }
    if let Commands::Export { out: Some(ref dir), .. } = cli.command {
        overrides = overrides.with_export_dir(dir);
    }

    // Config errors are reported before the configured output format is known
    let config = match resolve_config(&overrides) {
        Ok(config) => config,
        Err(e) => {
            report_error(&e, cli.human_readable);
            process::exit(1);
        }
    };

    let human = config.output_format() == OutputFormat::Human;
    if let Err(e) = run_command(cli.command, &config, human) {
        report_error(&e, human);
        process::exit(1);
    }
}

/// Install the stderr log subscriber. `PREPMAP_LOG` wins; the default is `warn`.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn report_error(e: &prepmap::Error, human: bool) {
    if human {
        eprintln!("Error: {}", e);
    } else {
        eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
    }
}

fn run_command(command: Commands, config: &ResolvedConfig, human: bool) -> prepmap::Result<()> {
    match command {
        Commands::Show { filter, zoom } => {
            let roadmap = commands::load_roadmap(config)?;
            let store = Storage::open()?;
            output(&commands::show(roadmap, &store, config, filter, zoom), human);
        }
        Commands::Toggle { node_id } => {
            let roadmap = commands::load_roadmap(config)?;
            let mut store = Storage::open()?;
            output(&commands::toggle(roadmap, &mut store, &node_id)?, human);
        }
        Commands::Progress => {
            let roadmap = commands::load_roadmap(config)?;
            let store = Storage::open()?;
            output(&commands::show_progress(&roadmap, &store, config), human);
        }
        Commands::Export { format, .. } => {
            let roadmap = commands::load_roadmap(config)?;
            let store = Storage::open()?;
            let result =
                commands::export_roadmap(&roadmap, &store, format, &config.export_dir(), Utc::now())?;
            output(&result, human);
        }
        Commands::Render {
            filter,
            width,
            height,
        } => {
            let roadmap = commands::load_roadmap(config)?;
            let store = Storage::open()?;
            output(
                &commands::render(roadmap, &store, config, filter, width, height)?,
                human,
            );
        }
        Commands::Validate => {
            let roadmap = commands::load_roadmap(config)?;
            output(&commands::validate(&roadmap), human);
        }
        Commands::Reset => {
            let mut store = Storage::open()?;
            output(&commands::reset(&mut store)?, human);
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => output(&commands::config_show(config), human),
        },
    }

    Ok(())
}

/// Print output in JSON or human-readable format.
fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
