use clap::Parser;
use refa_bin::{dfa_to_regex, run_stage, StageArgs};

/// Derives a regex for the DFA in INPUT by state elimination.
#[derive(Parser)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    stage: StageArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_stage(&cli.stage, dfa_to_regex)
}
