use crate::enums::commands::Commands;
use clap::Parser;

#[derive(Parser)]
#[clap(name = "revlyzer")]
#[clap(about = "Convergent AI code analysis with cross-revision comparison", long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}
