//! Resume screener: resume vs job description match scoring

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use resume_screener::cli::{self, Cli, Commands, ConfigAction, ModelAction, DOCUMENT_EXTENSIONS};
use resume_screener::config::{Config, OutputFormat};
use resume_screener::error::{Result, ScreenerError};
use resume_screener::input::InputManager;
use resume_screener::output::formatter::save_report_to_file;
use resume_screener::output::{DownloadReport, ReportGenerator};
use resume_screener::processing::analyzer::ScreeningPipeline;
use resume_screener::processing::embedding_manager::EmbeddingModelManager;
use resume_screener::processing::embeddings::SemanticScorer;
use resume_screener::processing::normalizer::DocumentText;
use resume_screener::processing::taxonomy::SkillTaxonomy;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Duration;

const PREVIEW_CHARS: usize = 3000;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_file: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Analyze {
            resume,
            job,
            job_text,
            skills,
            output,
            save,
            report,
            detailed,
        } => {
            let output_format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(ScreenerError::InvalidInput)?,
                None => config.output.format,
            };

            cli::validate_file_extension(&resume, &DOCUMENT_EXTENSIONS)
                .map_err(|e| ScreenerError::InvalidInput(format!("Resume file: {}", e)))?;
            if let Some(job) = &job {
                cli::validate_file_extension(job, &DOCUMENT_EXTENSIONS)
                    .map_err(|e| ScreenerError::InvalidInput(format!("Job description file: {}", e)))?;
            }

            // Taxonomy problems are fatal before any document is touched
            let taxonomy_path = skills.or_else(|| config.skills.taxonomy_path.clone());
            let taxonomy = Arc::new(SkillTaxonomy::load(taxonomy_path.as_deref())?);
            info!(
                "Loaded {} skills in {} categories",
                taxonomy.skill_count(),
                taxonomy.categories().len()
            );

            let is_console = output_format == OutputFormat::Console;
            if is_console {
                println!("🚀 Resume screening");
                println!("📄 Resume: {}", resume.display());
            }

            let mut input_manager = InputManager::new();
            let resume_text = input_manager.extract_text(&resume).await?;

            let jd_text = match (job, job_text) {
                (Some(job), _) => {
                    if is_console {
                        println!("💼 Job Description: {}", job.display());
                    }
                    input_manager.extract_text(&job).await?
                }
                (None, Some(text)) => {
                    let text = DocumentText::new(&text);
                    if text.is_empty() {
                        return Err(ScreenerError::InvalidInput(
                            "Job description text is empty".to_string(),
                        ));
                    }
                    text
                }
                (None, None) => {
                    return Err(ScreenerError::InvalidInput(
                        "Provide a job description with --job or --job-text".to_string(),
                    ))
                }
            };

            if detailed && is_console {
                println!("\n📄 Resume Preview:");
                println!("{}", resume_text.preview_with_ellipsis(PREVIEW_CHARS));
                println!("\n💼 Job Description:");
                println!("{}", jd_text);
            }

            let mut model_manager = EmbeddingModelManager::new(config.models_dir().clone()).await?;
            let model_path = model_manager
                .ensure_model_available(&config.models.embedding_model)
                .await?;
            let scorer = SemanticScorer::lazy(model_path, config.models.embedding_model.clone());
            let pipeline = ScreeningPipeline::from_config(&config, taxonomy, scorer)?;

            let spinner = analysis_spinner(is_console);
            let analysis = pipeline.analyze(&resume_text, &jd_text).await;
            spinner.finish_and_clear();
            let analysis = analysis?;

            let generator = ReportGenerator::from_config(&config.output);
            println!("{}", generator.generate_report(&analysis, output_format)?);

            if let Some(save_path) = save {
                let mut plain = config.output.clone();
                plain.color_output = false;
                let content = ReportGenerator::from_config(&plain).generate_report(&analysis, output_format)?;
                save_report_to_file(&content, &save_path)?;
                info!("Output saved to {}", save_path.display());
            }

            if let Some(report_path) = report {
                DownloadReport::now(&analysis, &jd_text, &config.report).save(&report_path)?;
                if is_console {
                    println!("💾 Report saved to {}", report_path.display());
                }
            }
        }

        Commands::Skills { skills } => {
            let taxonomy_path = skills.or_else(|| config.skills.taxonomy_path.clone());
            let taxonomy = SkillTaxonomy::load(taxonomy_path.as_deref())?;

            println!(
                "🗂️  Skill taxonomy: {} skills in {} categories\n",
                taxonomy.skill_count(),
                taxonomy.categories().len()
            );
            for category in taxonomy.categories() {
                println!("{} ({})", category.name, category.skills.len());
                println!("    {}", category.skills.join(", "));
            }
        }

        Commands::Models { action } => {
            let mut model_manager = EmbeddingModelManager::new(config.models_dir().clone()).await?;

            match action {
                ModelAction::List => {
                    println!("🧠 Embedding Models\n");
                    for (id, info) in model_manager.list_available_models() {
                        let status = if model_manager.is_model_downloaded(id) {
                            "✅ Downloaded"
                        } else {
                            "⬇️  Available"
                        };
                        let default_marker = if id == config.models.embedding_model {
                            " (configured)"
                        } else {
                            ""
                        };
                        println!(
                            "  • {}{} - {} ({} MB, {} dims) [{}]",
                            id, default_marker, info.repo_id, info.size_mb, info.dimensions, status
                        );
                        println!("    {}", info.description);
                    }

                    if model_manager.list_downloaded_models().is_empty() {
                        println!("\n💡 No models downloaded yet. The configured model is fetched on first analysis, or run:");
                        println!("   resume-screener models download {}", config.models.embedding_model);
                    }
                }

                ModelAction::Download { model, force } => {
                    let model_id = model_manager.resolve_model_id(&model).ok_or_else(|| {
                        ScreenerError::ModelNotFound(format!("Unknown embedding model: {}", model))
                    })?;

                    if model_manager.is_model_downloaded(&model_id) && !force {
                        println!("✅ Model {} is already downloaded (use --force to re-download)", model_id);
                        return Ok(());
                    }

                    println!("⬇️  Downloading model: {}", model_id);
                    let path = model_manager.download_model(&model_id, force).await?;
                    println!("✅ Model saved to {}", path.display());
                }

                ModelAction::Info { model } => {
                    let model_id = model_manager.resolve_model_id(&model).ok_or_else(|| {
                        ScreenerError::ModelNotFound(format!("Unknown embedding model: {}", model))
                    })?;

                    if let Some(info) = model_manager.get_model_info(&model_id) {
                        println!("🧠 {}", info.name);
                        println!("  Id: {}", model_id);
                        println!("  Repository: {}", info.repo_id);
                        println!("  Size: {} MB", info.size_mb);
                        println!("  Dimensions: {}", info.dimensions);
                        println!("  Description: {}", info.description);
                        match model_manager.get_model_path(&model_id) {
                            Some(path) => println!("  Location: {}", path.display()),
                            None => println!("  Status: not downloaded"),
                        }
                    }
                }
            }
        }

        Commands::Config { action } => {
            let config_path = config_file.unwrap_or_else(Config::config_path);

            match action {
                Some(ConfigAction::Show) | None => {
                    println!("⚙️  Configuration ({})\n", config_path.display());
                    let rendered = toml::to_string_pretty(&config).map_err(|e| {
                        ScreenerError::Configuration(format!("Failed to serialize config: {}", e))
                    })?;
                    println!("{}", rendered);
                }

                Some(ConfigAction::Init) => {
                    init_config(&config_path)?;
                }

                Some(ConfigAction::Path) => {
                    println!("{}", config_path.display());
                }
            }
        }
    }

    Ok(())
}

fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("⚠️  Configuration already exists at {}", path.display());
        return Ok(());
    }

    Config::default().save(path)?;
    println!("✅ Default configuration written to {}", path.display());
    Ok(())
}

fn analysis_spinner(visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("Scoring resume against job description...");
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}
