use clap::Parser;
use refa_bin::{minimize_dfa, run_stage, StageArgs};

/// Minimizes the DFA in INPUT by table filling.
#[derive(Parser)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    stage: StageArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_stage(&cli.stage, minimize_dfa)
}
