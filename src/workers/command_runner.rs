use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use crate::config::config_manager::ConfigManager;
use crate::enums::commands::Commands;
use crate::enums::severity::Severity;
use crate::errors::{RevlyzerError, RevlyzerResult};
use crate::services::backends::deepwiki::DeepWikiBackend;
use crate::services::convergence_collector::ConvergenceCollector;
use crate::services::result_cache::FileCache;
use crate::services::revision_matcher::RevisionMatcher;
use crate::services::snippet_locator::SnippetLocator;
use crate::structs::analysis_result::AnalysisResult;
use crate::structs::comparison_result::ComparisonResult;
use crate::structs::config::config::Config;
use crate::traits::analysis_cache::AnalysisCache;

pub struct CommandRunner {
    start_time: Option<Instant>,
}

impl CommandRunner {
    pub fn new() -> Self {
        Self { start_time: None }
    }

    pub async fn run_command(&mut self, command: Commands) -> RevlyzerResult<()> {
        self.start_time = Some(Instant::now());

        let result = match command {
            Commands::Init => self.init_command().await,
            Commands::Analyze { repo, revision } => self.analyze_command(repo, revision).await,
            Commands::Compare { repo, baseline, candidate } => {
                self.compare_command(repo, baseline, candidate).await
            }
            Commands::Validate => self.validate_command().await,
        };

        if let Some(start) = self.start_time {
            let duration = start.elapsed();
            log::info!("⏱️  Command completed in {:.2}s", duration.as_secs_f64());
        }

        result
    }

    async fn init_command(&self) -> RevlyzerResult<()> {
        log::info!("🚀 Initializing revlyzer configuration...");

        match ConfigManager::create_sample_config() {
            Ok(path) => {
                log::info!("✅ Configuration file created at: {}", path.display());
                log::info!("📝 Edit the configuration file to point at your analysis backend.");
                log::info!("🔧 Run 'revlyzer validate' to check your configuration.");
            }
            Err(e) => {
                log::error!("❌ Failed to create configuration: {}", e);
                return Err(e);
            }
        }

        Ok(())
    }

    async fn analyze_command(&self, repo: String, revision: String) -> RevlyzerResult<()> {
        log::info!("🔍 Starting analysis of {}@{}", repo, revision);

        let config = self.load_validated_config()?;
        let collector = self.build_collector(&config);

        let result = collector.collect(&repo, &revision).await;
        Self::print_analysis_report(&result);

        Ok(())
    }

    async fn compare_command(
        &self,
        repo: String,
        baseline: String,
        candidate: String,
    ) -> RevlyzerResult<()> {
        log::info!("⚖️  Comparing {}: {} → {}", repo, baseline, candidate);

        let config = self.load_validated_config()?;

        // Two independent collectors, run concurrently; each owns its own
        // cumulative state so they share nothing mutable.
        let baseline_collector = Arc::new(self.build_collector(&config));
        let candidate_collector = Arc::new(self.build_collector(&config));

        let baseline_task = {
            let collector = Arc::clone(&baseline_collector);
            let repo = repo.clone();
            let revision = baseline.clone();
            tokio::spawn(async move { collector.collect(&repo, &revision).await })
        };
        let candidate_task = {
            let collector = Arc::clone(&candidate_collector);
            let repo = repo.clone();
            let revision = candidate.clone();
            tokio::spawn(async move { collector.collect(&repo, &revision).await })
        };

        let baseline_result = baseline_task.await.map_err(|e| {
            RevlyzerError::analysis_error(&repo, &baseline, &format!("analysis task failed: {}", e))
        })?;
        let candidate_result = candidate_task.await.map_err(|e| {
            RevlyzerError::analysis_error(&repo, &candidate, &format!("analysis task failed: {}", e))
        })?;

        log::info!(
            "✅ Collected {} baseline and {} candidate issues",
            baseline_result.issues.len(),
            candidate_result.issues.len()
        );

        let comparison = RevisionMatcher::compare(&baseline_result.issues, &candidate_result.issues);
        Self::print_comparison_report(&baseline, &candidate, &comparison);

        Ok(())
    }

    async fn validate_command(&self) -> RevlyzerResult<()> {
        log::info!("🔍 Validating revlyzer configuration...");

        let config = match ConfigManager::load() {
            Ok(config) => {
                log::info!("✅ Configuration file loaded successfully");
                config
            }
            Err(e) => {
                log::error!("❌ Failed to load configuration: {}", e);
                log::error!("💡 Run 'revlyzer init' to create a configuration file.");
                return Err(e);
            }
        };

        ConfigManager::validate_config(&config)?;
        log::info!("✅ Configuration is valid");
        log::info!("📡 Backend: {}", config.backend.base_url);
        log::info!(
            "🔁 Collector: threshold {:.2}, max {} rounds, plateau window {}",
            config.collector.completeness_threshold,
            config.collector.max_iterations,
            config.collector.plateau_window
        );

        Ok(())
    }

    fn load_validated_config(&self) -> RevlyzerResult<Config> {
        let config = match ConfigManager::load() {
            Ok(config) => config,
            Err(e) => {
                log::error!("❌ Failed to load configuration: {}", e);
                log::error!("💡 Run 'revlyzer init' to create a configuration file.");
                return Err(e);
            }
        };
        ConfigManager::validate_config(&config)?;
        Ok(config)
    }

    fn build_collector(&self, config: &Config) -> ConvergenceCollector {
        let backend = Arc::new(DeepWikiBackend::new(
            config.backend.base_url.clone(),
            config.backend.deep_research,
        ));

        let mut collector = ConvergenceCollector::new(backend, config.collector.clone());

        if config.collector.cache_results {
            if let Some(cache) = FileCache::in_home_dir() {
                let cache: Arc<dyn AnalysisCache> = Arc::new(cache);
                collector = collector.with_cache(cache);
            } else {
                log::warn!("⚠️ Could not determine cache directory, caching disabled");
            }
        }

        // A local checkout lets findings without line numbers be pinned down.
        let checkout = PathBuf::from(".");
        collector.with_resolver(Arc::new(SnippetLocator::new(checkout)))
    }

    fn print_analysis_report(result: &AnalysisResult) {
        log::info!("\n{}", "=".repeat(60));
        log::info!("📊 Analysis report: {}@{}", result.repository, result.revision);
        log::info!("{}", "=".repeat(60));
        log::info!(
            "🏁 Stopped after {} rounds ({})",
            result.total_rounds(),
            result.termination.name()
        );

        for severity in [Severity::Critical, Severity::High, Severity::Medium, Severity::Low] {
            let count = result.count_by_severity(severity);
            if count > 0 {
                log::info!("   {} {}: {}", severity.emoji(), severity.name(), count);
            }
        }

        if result.issues.is_empty() {
            log::info!("✅ No issues found");
            return;
        }

        for (i, issue) in result.issues.iter().enumerate() {
            log::info!(
                "{}. {} [{}] {}",
                i + 1,
                issue.severity.emoji(),
                issue.category.name(),
                issue.title
            );
            log::info!(
                "   📁 {}{}  (confidence {:.2}, seen in {} rounds)",
                issue.location.file,
                issue.location.line.map(|l| format!(":{}", l)).unwrap_or_default(),
                issue.confidence,
                issue.support_count
            );
        }
    }

    fn print_comparison_report(baseline: &str, candidate: &str, comparison: &ComparisonResult) {
        log::info!("\n{}", "=".repeat(60));
        log::info!("⚖️  Comparison: {} → {}", baseline, candidate);
        log::info!("{}", "=".repeat(60));
        log::info!("🆕 New issues: {}", comparison.new_issues.len());
        for matched in &comparison.new_issues {
            log::info!("   {} {}", matched.issue.severity.emoji(), matched.issue.short_label());
        }
        log::info!("✅ Fixed issues: {}", comparison.fixed_issues.len());
        for matched in &comparison.fixed_issues {
            log::info!("   {} {}", matched.issue.severity.emoji(), matched.issue.short_label());
        }
        log::info!("♻️  Unchanged issues: {}", comparison.unchanged_issues.len());
        log::info!("📈 Net impact: {:+}", comparison.summary.net_impact);
        log::info!("🎯 Quality score: {:.1}/100", comparison.summary.quality_score);
    }
}
