use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bioprov::config::Config;
use bioprov::models::Project;

#[derive(Parser)]
#[command(name = "bioprov")]
#[command(about = "Provenance tracking for bioinformatics workflows")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a summary of a project document
    Show {
        /// Path to a project JSON document, or a bare project tag resolved
        /// in the data directory
        project: String,
    },
    /// Re-invoke a recorded program and persist the new run
    Run {
        /// Path to a project JSON document, or a bare project tag
        project: String,

        /// Sample owning the program
        #[arg(short, long)]
        sample: String,

        /// Program name within the sample
        #[arg(short, long)]
        program: String,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "bioprov=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// A `.json` argument is used as-is; anything else is treated as a project
/// tag under the data directory.
fn resolve_path(project: &str) -> anyhow::Result<PathBuf> {
    let path = PathBuf::from(project);
    if path.extension().is_some_and(|ext| ext == "json") {
        return Ok(path);
    }
    let config = Config::default_dirs().context("could not determine data directory")?;
    Ok(config.project_path(project))
}

fn show(project: &Project) {
    println!("Project '{}' ({} samples)", project.tag, project.len());
    for file in project.files.values() {
        println!("  [file] {}: {}", file.tag, file.path.display());
    }
    for sample in project.iter() {
        println!("  Sample '{}'", sample.name);
        for (key, value) in &sample.attributes {
            println!("    {key} = {value:?}");
        }
        for file in sample.files.values() {
            println!("    [file] {}: {}", file.tag, file.path.display());
        }
        for program in sample.programs.values() {
            let last = program
                .last_run()
                .map(|run| format!("last run {} ({})", run.id, run.status.as_str()))
                .unwrap_or_else(|| "never run".to_string());
            println!("    [program] {} — {}", program.cmd(), last);
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Commands::Show { project } => {
            let path = resolve_path(&project)?;
            let project = bioprov::from_json(&path)?;
            show(&project);
        }
        Commands::Run {
            project,
            sample,
            program,
        } => {
            let path = resolve_path(&project)?;
            let mut proj = bioprov::from_json(&path)?;

            let prog = proj.sample_mut(&sample)?.program_mut(&program)?;
            let run = prog.run()?;
            println!(
                "run {} of '{}' finished: {}",
                run.id,
                program,
                run.status.as_str()
            );
            if !run.stdout.is_empty() {
                print!("{}", run.stdout);
            }
            if !run.stderr.is_empty() {
                eprint!("{}", run.stderr);
            }

            proj.to_json(&path)?;
            tracing::info!(path = %path.display(), "project saved");
        }
    }

    Ok(())
}
