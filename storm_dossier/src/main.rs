//! # storm-dossier
//!
//! Loads an event cache, builds a story package and prints it.
//!
//! ## Usage
//!
//! ```text
//! storm-dossier --cache-dir ./backend/cache --year 2024
//! storm-dossier --config dossier.toml --root 2024-05-10T15:00:00-GST-001 --persona mariner
//! storm-dossier --cache-dir ./backend/cache --year 2024 --summary
//! storm-dossier --cache-dir ./backend/cache --causes 100
//! storm-dossier --cache-dir ./backend/cache --years
//! ```
//!
//! Without `--persona` or `--summary` the whole package is printed as JSON.
//! Log filtering follows `STORM_DOSSIER_LOG` (default `info`).

use std::path::PathBuf;

use anyhow::{bail, Context};
use space_weather::EventId;
use storm_dossier::{render_summary, DossierConfig, NarrativeOutcome, Persona, StormArchive};
use tracing_subscriber::EnvFilter;

enum Target {
    Year(i32),
    Root(EventId),
    Causes(usize),
    YearCounts,
}

enum Output {
    Json,
    Summary,
    Persona(Persona),
}

struct Args {
    config: Option<PathBuf>,
    cache_dir: Option<PathBuf>,
    target: Target,
    output: Output,
}

fn main() -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_env("STORM_DOSSIER_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1))?;

    let mut config = match &args.config {
        Some(path) => DossierConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DossierConfig::default(),
    };
    if let Some(cache_dir) = args.cache_dir {
        config.store.cache_dir = cache_dir;
    }

    let archive = StormArchive::new(config);
    archive.load().context("loading event cache")?;

    let package = match &args.target {
        Target::Year(year) => archive.generate_package(*year)?,
        Target::Root(root) => archive.package_for(root)?,
        Target::Causes(top_n) => {
            let frequencies = archive.cause_frequencies(*top_n)?;
            println!("Causes linked to the {} strongest storms:", frequencies.storms_analyzed);
            for (event_type, count) in frequencies.most_common() {
                println!("- {}: {}", event_type.code(), count);
            }
            return Ok(());
        }
        Target::YearCounts => {
            for (year, count) in archive.storm_counts_by_year()? {
                println!("{}: {}", year, count);
            }
            return Ok(());
        }
    };

    match args.output {
        Output::Json => println!("{}", serde_json::to_string_pretty(&package)?),
        Output::Summary => print!("{}", render_summary(&package.dossier)),
        Output::Persona(persona) => match package.storyline(persona) {
            Some(NarrativeOutcome::Rendered(storyline)) => println!("{}", storyline.to_text()),
            Some(NarrativeOutcome::InsufficientData { missing, .. }) => {
                let codes: Vec<_> = missing.iter().map(|t| t.code()).collect();
                println!(
                    "Not enough data for the {} story: missing {}.",
                    persona,
                    codes.join(" or ")
                );
            }
            None => bail!("no storyline rendered for {}", persona),
        },
    }

    Ok(())
}

fn parse_args(mut raw: impl Iterator<Item = String>) -> anyhow::Result<Args> {
    let mut config = None;
    let mut cache_dir = None;
    let mut year = None;
    let mut root = None;
    let mut survey = None;
    let mut output = Output::Json;

    while let Some(flag) = raw.next() {
        let mut value = || {
            raw.next()
                .with_context(|| format!("{} expects a value", flag))
        };
        match flag.as_str() {
            "--config" => config = Some(PathBuf::from(value()?)),
            "--cache-dir" => cache_dir = Some(PathBuf::from(value()?)),
            "--year" => {
                let text = value()?;
                year = Some(
                    text.parse::<i32>()
                        .with_context(|| format!("invalid year {:?}", text))?,
                );
            }
            "--root" => root = Some(EventId::new(value()?)),
            "--causes" => {
                let text = value()?;
                let top_n = text
                    .parse::<usize>()
                    .with_context(|| format!("invalid storm count {:?}", text))?;
                survey = Some(Target::Causes(top_n));
            }
            "--years" => survey = Some(Target::YearCounts),
            "--persona" => {
                let name = value()?;
                let persona = Persona::from_name(&name).with_context(|| {
                    format!(
                        "unknown persona {:?}; expected routine-worker, mariner or sky-observer",
                        name
                    )
                })?;
                output = Output::Persona(persona);
            }
            "--summary" => output = Output::Summary,
            other => bail!("unrecognized argument {:?}", other),
        }
    }

    let target = match (survey, year, root) {
        (Some(survey), _, _) => survey,
        (None, _, Some(root)) => Target::Root(root),
        (None, Some(year), None) => Target::Year(year),
        (None, None, None) => {
            bail!("pass --year <YYYY>, --root <event id>, --causes <N> or --years")
        }
    };

    Ok(Args {
        config,
        cache_dir,
        target,
        output,
    })
}
