use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Create a sample configuration file
    Init,
    /// Run convergent analysis for a single revision
    Analyze {
        /// Repository identifier (URL or name the backend understands)
        repo: String,
        /// Revision label to analyze
        #[clap(short = 'r', long, default_value = "HEAD")]
        revision: String,
    },
    /// Analyze two revisions and classify issues as new / fixed / unchanged
    Compare {
        /// Repository identifier (URL or name the backend understands)
        repo: String,
        /// Baseline revision label
        baseline: String,
        /// Candidate revision label
        candidate: String,
    },
    /// Check the configuration file for problems
    Validate,
}
