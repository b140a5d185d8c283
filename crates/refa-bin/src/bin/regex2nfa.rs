use clap::Parser;
use refa_bin::{regex_to_nfa, run_stage, StageArgs};

/// Builds an NFA from the regex in INPUT using Thompson's construction.
#[derive(Parser)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    stage: StageArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_stage(&cli.stage, regex_to_nfa)
}
