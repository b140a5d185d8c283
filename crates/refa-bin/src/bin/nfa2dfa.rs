use clap::Parser;
use refa::schema::AutomatonDef;
use refa::SubsetStrategy;
use refa_bin::{nfa_to_dfa, run_stage, StageArgs};

/// Converts the NFA in INPUT to a DFA by subset construction.
#[derive(Parser)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    stage: StageArgs,
    /// Only build subsets reachable from the start state instead of the full power set
    #[arg(long)]
    reachable_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let strategy = if cli.reachable_only {
        SubsetStrategy::Reachable
    } else {
        SubsetStrategy::PowerSet
    };

    run_stage(&cli.stage, |def: AutomatonDef, verbose| nfa_to_dfa(def, strategy, verbose))
}
