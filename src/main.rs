//! csuite-onboard - Executive persona assignment
//!
//! Entry point for the `csuite-onboard` binary. Parses the command line,
//! sets up configuration and logging, and hands off to the engine in the
//! library crate.

use std::path::Path;

use chrono::NaiveDate;
use clap::Parser;
use tracing::{debug, error, info};

use csuite_onboard::cli::{Cli, Commands, ConfigSubcommand};
use csuite_onboard::config::{self, AppConfig};
use csuite_onboard::error::{Error, Result};
use csuite_onboard::logging::{self, LogGuards};
use csuite_onboard::lunar::{chinese_new_year_date, chinese_zodiac, BoundaryAnswer, WesternZodiac};
use csuite_onboard::persona::{PersonaLibrary, Role, TraitCatalog};
use csuite_onboard::profile::draw_hand;
use csuite_onboard::selection::build_rng;
use csuite_onboard::session::{RunSettings, Session, SessionOutcome};
use csuite_onboard::version::build_info;

fn main() {
    // Parse CLI arguments first (before logging, so we know verbosity)
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("{}", e.format_for_log());
        eprint!("{}", e.format_for_terminal());
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    // Commands that never read the config file get minimal logging
    match &cli.command {
        Commands::Version { json } => {
            let info = build_info();
            if *json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                print!("{}", info);
            }
            return Ok(());
        }
        Commands::Config { subcommand } => {
            logging::init_simple(tracing::Level::WARN)?;
            return handle_config_command(subcommand.clone(), cli.config.as_deref());
        }
        Commands::Zodiac { date, boundary } => {
            logging::init_simple(simple_level(cli.verbose, cli.quiet))?;
            return handle_zodiac(date, *boundary);
        }
        Commands::NewYear { year } => {
            logging::init_simple(simple_level(cli.verbose, cli.quiet))?;
            return handle_new_year(*year);
        }
        Commands::Cards { seed } => {
            logging::init_simple(simple_level(cli.verbose, cli.quiet))?;
            return handle_cards(seed.as_deref());
        }
        _ => {}
    }

    let config = AppConfig::load(cli.config.as_deref())?;

    // Keep guards alive until exit so the file writer flushes
    let _log_guards: LogGuards = logging::init_logging(&config.logging, cli.verbose, cli.quiet)?;

    info!(version = %build_info().full_version(), "csuite-onboard starting");

    match cli.command {
        Commands::Select {
            input,
            seed,
            randomness,
            originality,
            json,
        } => {
            let overrides = RunSettings {
                seed,
                randomness,
                originality,
                beam_width: None,
            };
            handle_select(&config, Path::new(&input), overrides, json)
        }
        Commands::Library { role, export } => match export {
            Some(path) => {
                PersonaLibrary::export_bundled(Path::new(&path))?;
                println!("Persona catalog written to {}", path);
                Ok(())
            }
            None => handle_library(&config, role),
        },
        // Handled above
        Commands::Version { .. }
        | Commands::Config { .. }
        | Commands::Zodiac { .. }
        | Commands::NewYear { .. }
        | Commands::Cards { .. } => Ok(()),
    }
}

fn simple_level(verbose: u8, quiet: bool) -> tracing::Level {
    match (quiet, verbose) {
        (true, _) => tracing::Level::ERROR,
        (false, 0) => tracing::Level::WARN,
        (false, 1) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    }
}

fn load_library(config: &AppConfig, catalog: &TraitCatalog) -> Result<PersonaLibrary> {
    match config.library_path() {
        Some(path) => PersonaLibrary::load(&path, catalog),
        None => PersonaLibrary::standard(catalog),
    }
}

// ─────────────────────────────────────────────────────────────────
// select
// ─────────────────────────────────────────────────────────────────

fn handle_select(config: &AppConfig, input: &Path, overrides: RunSettings, json: bool) -> Result<()> {
    let catalog = TraitCatalog::standard();
    let library = load_library(config, &catalog)?;
    let session = Session::load(input)?;

    let defaults = RunSettings {
        seed: config.selection.seed.clone(),
        randomness: Some(config.randomness_level()?),
        originality: Some(config.originality()?),
        beam_width: Some(config.selection.beam_width),
    };

    let outcome = session.run(&library, &catalog, &overrides, &defaults)?;

    if json || config.wants_json() {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_report(&outcome, config.output.show_breakdown)?;
    }
    Ok(())
}

fn print_report(outcome: &SessionOutcome, show_breakdown: bool) -> Result<()> {
    let human = &outcome.human;
    println!("Human profile");
    println!("  Position:   {}", outcome.position);
    println!("  MBTI:       {}", human.mbti_summary());
    println!("  Enneagram:  {}", human.enneagram_summary());
    println!("  Zodiac:     {} / {}", human.western_zodiac, human.chinese_zodiac);
    println!("  Vibe tags:  {}", outcome.vibe.tags.join(", "));
    println!("  Culture:    {}", outcome.culture.summary());
    println!();

    println!(
        "{:<10} {:<22} {:<6} {:<6} {:<12} {:>7}",
        "ROLE", "PERSONA", "TYPE", "MBTI", "ZODIAC", "FIT"
    );
    let assignment = &outcome.assignment;
    for (role, persona) in assignment.members() {
        let fit = assignment
            .breakdown()
            .role(*role)
            .map(|terms| terms.sum())
            .unwrap_or_default();
        println!(
            "{:<10} {:<22} {:<6} {:<6} {:<12} {:>7.3}",
            role.as_str(),
            persona.persona_id,
            persona.wing,
            persona.mbti.to_string(),
            persona.western_zodiac.as_str(),
            fit
        );
    }
    println!();
    println!("Team score: {:.4}", assignment.score());
    println!();

    println!("Notes");
    for role in assignment.roles() {
        if let Some(note) = assignment.note(role) {
            println!("  {:<10} {}", role.as_str(), note);
        }
    }

    if show_breakdown {
        println!();
        println!("Breakdown");
        println!("{}", serde_json::to_string_pretty(assignment.breakdown())?);
    }

    println!();
    println!(
        "Seed: {} (randomness {}, originality {})",
        outcome.seed_label, outcome.randomness, outcome.originality
    );
    println!("Build: {}", build_info().stamp());
    Ok(())
}

// ─────────────────────────────────────────────────────────────────
// library
// ─────────────────────────────────────────────────────────────────

fn handle_library(config: &AppConfig, role: Option<Role>) -> Result<()> {
    let catalog = TraitCatalog::standard();
    let library = load_library(config, &catalog)?;
    debug!(personas = library.len(), "Persona catalog loaded");

    let roles: Vec<Role> = match role {
        Some(role) => vec![role],
        None => library.roles().collect(),
    };

    println!(
        "{:<22} {:<9} {:<6} {:<6} {:<12} {:>5}  TAGS",
        "PERSONA", "ROLE", "TYPE", "MBTI", "ZODIAC", "FIT"
    );
    for role in roles {
        for persona in library.candidates(role) {
            println!(
                "{:<22} {:<9} {:<6} {:<6} {:<12} {:>5.2}  {}",
                persona.persona_id,
                persona.role.as_str(),
                persona.wing,
                persona.mbti.to_string(),
                persona.western_zodiac.as_str(),
                persona.role_fit_weight,
                persona.trait_tags.join(", ")
            );
        }
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────
// zodiac / new-year / cards
// ─────────────────────────────────────────────────────────────────

fn handle_zodiac(date: &str, boundary: Option<BoundaryAnswer>) -> Result<()> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|e| {
        Error::invalid_profile("birth date", format!("'{}' is not YYYY-MM-DD: {}", date, e))
    })?;
    let chinese = chinese_zodiac(date, boundary)?;

    println!("Date:     {}", date);
    println!("Western:  {}", WesternZodiac::for_date(date));
    println!("Chinese:  {}", chinese);
    if !chinese.is_known() {
        println!("Hint: outside 1900-2100 pass --boundary yes|no (born before Chinese New Year?)");
    }
    Ok(())
}

fn handle_new_year(year: i32) -> Result<()> {
    match chinese_new_year_date(year)? {
        Some(date) => println!("{}", date),
        None => println!("unknown"),
    }
    Ok(())
}

fn handle_cards(seed: Option<&str>) -> Result<()> {
    let (mut rng, label) = build_rng(seed);
    for card in draw_hand(&mut rng) {
        println!("{:<18} {:<22} {}", card.name, card.profile.culture_mode.as_str(), card.description);
    }
    println!();
    println!("Seed: {}", label);
    Ok(())
}

// ─────────────────────────────────────────────────────────────────
// config
// ─────────────────────────────────────────────────────────────────

fn handle_config_command(subcommand: ConfigSubcommand, config_path: Option<&str>) -> Result<()> {
    match subcommand {
        ConfigSubcommand::Show => {
            let cfg = AppConfig::load(config_path)?;
            println!("{}", toml::to_string_pretty(&cfg)?);
        }
        ConfigSubcommand::Init { path, force } => {
            let written = config::init_config(path.as_deref(), force)?;
            println!("Configuration written to {}", written.display());
        }
        ConfigSubcommand::Validate => match AppConfig::load(config_path) {
            Ok(_) => {
                println!("Configuration is valid.");
            }
            Err(e) => {
                eprint!("{}", e.format_for_terminal());
                std::process::exit(e.exit_code());
            }
        },
    }

    Ok(())
}
