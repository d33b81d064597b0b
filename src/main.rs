//! jobfit: score a candidate profile against a job posting

use clap::Parser;
use jobfit::cli::{self, Cli, Commands, ConfigAction, ProfileAction};
use jobfit::config::Config;
use jobfit::error::{JobFitError, Result};
use jobfit::feedback::FeedbackSynthesizer;
use jobfit::input;
use jobfit::llm::{LanguageModel, OpenAiClient};
use jobfit::output::{render_report, MatchReport, OutputFormat};
use jobfit::profile::{CandidateProfile, ProfileStore};
use jobfit::scoring::MatchEngine;
use log::{error, info};
use std::path::PathBuf;
use std::process;

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config) {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn run_command(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Match {
            profile,
            job,
            title,
            api_key,
            output,
            save,
            no_llm,
            no_color,
        } => run_match(
            &config, profile, &job, &title, api_key, output, save, no_llm, no_color,
        ),
        Commands::Profile { action } => run_profile(&config, action),
        Commands::Config { action } => run_config(config, action),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_match(
    config: &Config,
    profile_name: Option<String>,
    job: &PathBuf,
    title: &str,
    api_key: Option<String>,
    output: OutputFormat,
    save: Option<PathBuf>,
    no_llm: bool,
    no_color: bool,
) -> Result<()> {
    cli::validate_file_extension(job, &["txt", "text", "md", "markdown"])
        .map_err(|e| JobFitError::InvalidInput(format!("job posting file: {}", e)))?;

    let job_text = input::load_job_text(job)?;

    let profile = match &profile_name {
        Some(name) => {
            let store = ProfileStore::new(config.profiles_dir().clone());
            store
                .load(name)?
                .ok_or_else(|| JobFitError::ProfileNotFound(name.clone()))?
        }
        None => {
            info!("no profile specified, using the built-in default");
            CandidateProfile::default_profile()
        }
    };

    let llm = build_language_model(config, api_key, no_llm)?;
    let engine = MatchEngine::new(config, llm);

    info!(
        "scoring {} against {} (ai: {}, embeddings: {})",
        profile.name,
        job.display(),
        engine.has_llm(),
        engine.has_embedding_model()
    );

    let result = engine.score(&profile, &job_text);
    let technologies = engine.technologies_in_posting(&job_text);

    let synthesizer = FeedbackSynthesizer::new(engine.language_model());
    let feedback = synthesizer.synthesize(&profile, &job_text, title, &result, &technologies);

    let report = MatchReport::new(title, profile.name.clone(), result, feedback);

    let use_colors = !no_color && output == OutputFormat::Console;
    let rendered = render_report(&report, output, use_colors)?;
    println!("{}", rendered);

    if let Some(path) = save {
        std::fs::write(&path, strip_ansi(&rendered))?;
        info!("report saved to {}", path.display());
    }

    Ok(())
}

fn build_language_model(
    config: &Config,
    api_key: Option<String>,
    no_llm: bool,
) -> Result<Option<Box<dyn LanguageModel>>> {
    if no_llm {
        info!("language-model calls disabled, using deterministic paths");
        return Ok(None);
    }

    let key = api_key.or_else(|| std::env::var("OPENAI_API_KEY").ok());
    match key {
        Some(key) if !key.trim().is_empty() => {
            let client = OpenAiClient::new(key, &config.llm)?;
            Ok(Some(Box::new(client)))
        }
        _ => {
            info!("no API key configured, using deterministic paths");
            Ok(None)
        }
    }
}

fn run_profile(config: &Config, action: ProfileAction) -> Result<()> {
    let store = ProfileStore::new(config.profiles_dir().clone());

    match action {
        ProfileAction::Import { file, name } => {
            let raw = std::fs::read_to_string(&file)?;
            let value: serde_json::Value = serde_json::from_str(&raw)
                .map_err(|e| JobFitError::Profile(format!("invalid profile JSON: {}", e)))?;
            let profile = CandidateProfile::from_stored(value)?;

            let filename = name.as_deref();
            let key = store.save(&profile, filename)?;
            println!("Imported profile '{}' as {}", profile.name, key);
        }
        ProfileAction::List => {
            let keys = store.list()?;
            if keys.is_empty() {
                println!("No stored profiles in {}", store.dir().display());
            } else {
                for key in keys {
                    println!("{}", key);
                }
            }
        }
        ProfileAction::Show { name } => {
            let profile = store
                .load(&name)?
                .ok_or_else(|| JobFitError::ProfileNotFound(name.clone()))?;
            println!("{}", serde_json::to_string_pretty(&profile.to_stored()?)?);
        }
        ProfileAction::Delete { name } => {
            store.delete(&name)?;
            println!("Deleted profile '{}'", name);
        }
    }

    Ok(())
}

fn run_config(config: Config, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let rendered = toml::to_string_pretty(&config)
                .map_err(|e| JobFitError::Configuration(e.to_string()))?;
            println!("{}", rendered);
        }
        ConfigAction::Reset => {
            let defaults = Config::default();
            defaults.save()?;
            println!("Configuration reset to defaults");
        }
    }

    Ok(())
}

/// Saved reports should not carry terminal escape codes.
fn strip_ansi(text: &str) -> String {
    let pattern = regex::Regex::new(r"\x1b\[[0-9;]*m").expect("ansi pattern is valid");
    pattern.replace_all(text, "").into_owned()
}
