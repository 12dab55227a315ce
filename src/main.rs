//! Candidate ranker: personality-aware candidate scoring tool

use candidate_ranker::cli::{self, Cli, Commands, ConfigAction, ModelAction};
use candidate_ranker::config::Config;
use candidate_ranker::error::{RankerError, Result};
use candidate_ranker::input::InputManager;
use candidate_ranker::matching::{JobProfile, JobProfileMatcher, RankingEngine, SkippedCandidate};
use candidate_ranker::output::formatter::save_report_to_file;
use candidate_ranker::output::{render_traits, RankingReport, ReportGenerator};
use candidate_ranker::personality::{
    merge_traits, parse_responses, CvTraitExtractor, MergeWeights, PersonalityTestScorer,
    QuestionMap, TraitLexicon, TraitVector,
};
use candidate_ranker::processing::CvParser;
use candidate_ranker::sentiment::{RuleBasedAnalyzer, SentimentClassifier, SentimentFusion};
use candidate_ranker::store::CandidateStore;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Instant;

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

async fn run_command(command: Commands, config: Config, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Extract { cv, json, no_neural } => {
            let text = InputManager::new().extract_text(&cv).await?;
            let extractor = build_extractor(&config, no_neural)?;
            let analysis = extractor.extract(&text).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                println!("🧠 Traits for {}", cv.display());
                print!("{}", render_traits(&analysis.traits, config.output.color_output));
                println!(
                    "Sentiment polarity: {:.3}{}",
                    analysis.polarity(),
                    if analysis.sentiment.degraded { " (single signal)" } else { "" }
                );
                println!("Tokens scanned: {}", analysis.keyword.token_count);
            }
        }

        Commands::Test { answers, json } => {
            let responses = parse_responses(&answers)?;
            let scorer = PersonalityTestScorer::new(config.likert_scale()?, QuestionMap::default());
            let traits = scorer.score(&responses)?;
            print_traits("📝 Personality test traits", &traits, json, &config)?;
        }

        Commands::Merge { cv, test, test_weight, json } => {
            let cv = cv.as_deref().map(TraitVector::parse_csv).transpose()?;
            let test = test.as_deref().map(TraitVector::parse_csv).transpose()?;
            let weights = match test_weight {
                Some(w) => MergeWeights::new(w, 1.0 - w)?,
                None => config.merge_weights(),
            };
            let merged = merge_traits(cv.as_ref(), test.as_ref(), Some(weights));
            print_traits("🔀 Merged traits", &merged, json, &config)?;
        }

        Commands::Submit { cvs, store, no_neural } => {
            submit(&config, &cvs, &store, no_neural).await?;
        }

        Commands::Answer { candidate, answers, store } => {
            let responses = parse_responses(&answers)?;
            let scorer = PersonalityTestScorer::new(config.likert_scale()?, QuestionMap::default());
            let traits = scorer.score(&responses)?;

            let mut store = CandidateStore::open(&store)?;
            let profile = store.get_mut(&candidate).ok_or_else(|| {
                RankerError::InvalidInput(format!("Unknown candidate: {}", candidate))
            })?;
            profile.set_test_traits(traits, config.merge_weights());
            let merged = profile.personality();
            store.save()?;

            println!("✅ Recorded test answers for {}", candidate);
            print!("{}", render_traits(&merged, config.output.color_output));
        }

        Commands::Rank { job, store, detailed, output, save, top } => {
            cli::validate_file_extension(&job, &["toml"])
                .map_err(|e| RankerError::InvalidInput(format!("Job profile file: {}", e)))?;
            let output_format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(RankerError::InvalidInput)?,
                None => config.output.format,
            };

            let start = Instant::now();
            let job = JobProfile::load(&job, config.matching.weights)?;
            let store = CandidateStore::open(&store)?;
            let engine = RankingEngine::new(JobProfileMatcher::new(config.matching_settings()));

            let mut outcome = engine.rank(&job, store.candidates());
            outcome
                .skipped
                .extend(store.rejected().iter().map(|r| SkippedCandidate {
                    candidate_id: r
                        .candidate_id
                        .clone()
                        .unwrap_or_else(|| format!("record #{}", r.index)),
                    reason: r.reason.clone(),
                }));

            let mut report = RankingReport::new(
                &job,
                outcome,
                store.candidates(),
                start.elapsed().as_millis() as u64,
            );
            if let Some(n) = top {
                report.truncate(n);
            }

            let generator = ReportGenerator::with_options(
                config.output.color_output && save.is_none(),
                detailed || config.output.detailed,
                true,
                true,
            );
            let content = generator.generate_report(&report, &output_format)?;

            match save {
                Some(path) => {
                    save_report_to_file(&content, &path)?;
                    println!("💾 Report saved to {}", path.display());
                }
                None => println!("{}", content),
            }
        }

        Commands::Models { action } => match action {
            ModelAction::Download => {
                let manager = config.model_manager();
                let path = manager.download().await?;
                println!("✅ Model files in {}", path.display());
            }
            ModelAction::Status => {
                let manager = config.model_manager();
                let status = manager.status();
                println!("📦 Sentiment model: {}", status.repo_id);
                println!("  • Directory: {}", status.model_dir.display());
                if status.is_ready() {
                    println!("  • Model files: complete");
                    match manager.load_classifier(config.sentiment.chunk_size) {
                        Ok(classifier) => println!("  • Loadable: yes ({})", classifier.name()),
                        Err(e) => println!("  • Loadable: no ({})", e),
                    }
                } else {
                    println!("  • Missing files: {}", status.missing_files.join(", "));
                    println!("  • Running with rule-based sentiment only");
                }
            }
        },

        Commands::Config { action } => {
            let path = config_path.unwrap_or_else(Config::config_path);
            match action.unwrap_or(ConfigAction::Show) {
                ConfigAction::Show => {
                    let content = toml::to_string_pretty(&config).map_err(|e| {
                        RankerError::Configuration(format!("Failed to serialize config: {}", e))
                    })?;
                    println!("{}", content);
                }
                ConfigAction::Reset => {
                    Config::default().save_to(&path)?;
                    println!("✅ Configuration reset at {}", path.display());
                }
                ConfigAction::Path => println!("{}", path.display()),
            }
        }
    }

    Ok(())
}

/// Build the trait extractor, degrading to rule-based sentiment when the
/// neural classifier cannot be loaded.
fn build_extractor(config: &Config, no_neural: bool) -> Result<CvTraitExtractor> {
    let neural: Option<Arc<dyn SentimentClassifier>> = if config.sentiment.use_neural && !no_neural {
        match config.model_manager().load_classifier(config.sentiment.chunk_size) {
            Ok(classifier) => Some(Arc::new(classifier)),
            Err(e) => {
                warn!("Neural sentiment classifier unavailable, using rule-based only: {}", e);
                None
            }
        }
    } else {
        None
    };

    let fusion = SentimentFusion::new(neural, Arc::new(RuleBasedAnalyzer::new()), config.sentiment_timeout());
    CvTraitExtractor::new(&TraitLexicon::default(), fusion, config.trait_settings())
}

async fn submit(config: &Config, cvs: &[PathBuf], store_path: &Path, no_neural: bool) -> Result<()> {
    let parser = CvParser::new()?;
    let mut input = InputManager::new();
    let mut store = CandidateStore::open(store_path)?;
    let weights = config.merge_weights();

    let mut texts = Vec::with_capacity(cvs.len());
    let mut pending = Vec::with_capacity(cvs.len());
    let mut cached = Vec::new();
    for path in cvs {
        let Some(id) = cli::candidate_id_for(path) else {
            warn!("Skipping {}: cannot derive a candidate id", path.display());
            continue;
        };
        match input.extract_text(path).await {
            Ok(text) => {
                let mut profile = parser.parse(&text).into_profile(id);
                let previous = store.get(&profile.id);
                if let Some(test) = previous.and_then(|c| c.test_traits().copied()) {
                    profile.set_test_traits(test, weights);
                }
                match previous.and_then(|c| c.cached_polarity(&text)) {
                    Some(polarity) => cached.push((profile, text, polarity)),
                    None => {
                        pending.push(profile);
                        texts.push(text);
                    }
                }
            }
            Err(e) => warn!("Skipping {}: {}", path.display(), e),
        }
    }

    if pending.is_empty() && cached.is_empty() {
        return Err(RankerError::InvalidInput("No readable CV files".to_string()));
    }

    // Unchanged CVs reuse their stored polarity, so the classifier is only
    // needed for new text.
    let extractor = Arc::new(build_extractor(config, no_neural || texts.is_empty())?);
    let mut analysed = Vec::with_capacity(pending.len() + cached.len());

    for (mut profile, text, polarity) in cached {
        debug!("Reusing cached sentiment for '{}'", profile.id);
        let traits = extractor.extract_with_polarity(&text, polarity);
        profile.set_cv_analysis(traits, polarity, weights);
        profile.record_cv_source(&text);
        analysed.push(profile);
    }

    if !texts.is_empty() {
        let progress = ProgressBar::new(texts.len() as u64);
        progress.set_style(
            ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} CVs analyzed")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        let analyses = extractor
            .extract_batch(texts.clone(), |done, _| progress.set_position(done as u64))
            .await;
        progress.finish_and_clear();

        for ((mut profile, analysis), text) in pending.into_iter().zip(analyses).zip(&texts) {
            profile.set_cv_analysis(analysis.traits, analysis.polarity(), weights);
            profile.record_cv_source(text);
            analysed.push(profile);
        }
    }

    for profile in analysed {
        info!(
            "Candidate '{}': {} skills, {:.1} years, {}",
            profile.id,
            profile.skills.len(),
            profile.years_experience,
            profile.education
        );
        store.upsert(profile);
    }
    store.save()?;

    println!("✅ {} candidates in {}", store.len(), store.path().display());
    Ok(())
}

fn print_traits(title: &str, traits: &TraitVector, json: bool, config: &Config) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(traits)?);
    } else {
        println!("{}", title);
        print!("{}", render_traits(traits, config.output.color_output));
    }
    Ok(())
}
