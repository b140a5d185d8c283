//! File handling shared by the stage programs. Each program reads one JSON
//! document, runs one stage in memory, and only then writes its output, so a
//! failing stage never leaves a partial file behind.

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use refa::schema::{AutomatonDef, RegexDef};
use refa::{Dfa, Nfa, SubsetStrategy};
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct StageArgs {
    /// JSON file to read
    pub input: PathBuf,
    /// JSON file to write
    pub output: PathBuf,
    /// Print every intermediate stage to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("unable to read {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("{} is not correctly formatted", path.display()))
}

// pretty printed with a 4-space indent
fn to_json<T: Serialize>(value: &T) -> anyhow::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<usize> {
    let buf = to_json(value)?;
    fs::write(path, &buf).with_context(|| format!("unable to write {}", path.display()))?;
    Ok(buf.len())
}

/// Reads the input, applies `stage` and writes the result.
pub fn run_stage<I, O>(
    args: &StageArgs,
    stage: impl FnOnce(I, bool) -> anyhow::Result<O>,
) -> anyhow::Result<()>
where
    I: DeserializeOwned + Debug,
    O: Serialize,
{
    let input: I = read_json(&args.input)?;
    if args.verbose {
        eprintln!("input = {:?}", input);
    }

    let output = stage(input, args.verbose)?;
    let written = write_json(&args.output, &output)?;
    println!("Wrote {}, {} bytes", args.output.display(), written);
    Ok(())
}

pub fn regex_to_nfa(def: RegexDef, verbose: bool) -> anyhow::Result<AutomatonDef> {
    let postfix = refa::regex::parse(&def.regex)?;
    if verbose {
        eprintln!("postfix = {}", postfix);
    }

    let nfa = refa::ThompsonBuilder::build(&postfix)?;
    if verbose {
        eprintln!("nfa = {:?}", nfa);
    }

    Ok(AutomatonDef::from(&nfa))
}

pub fn nfa_to_dfa(
    def: AutomatonDef,
    strategy: SubsetStrategy,
    verbose: bool,
) -> anyhow::Result<AutomatonDef> {
    let nfa = Nfa::try_from(&def)?;
    let dfa = Dfa::from_nfa(&nfa, strategy)?;
    if verbose {
        eprintln!("dfa = {:?}", dfa);
    }

    Ok(AutomatonDef::from(&dfa))
}

pub fn dfa_to_regex(def: AutomatonDef, verbose: bool) -> anyhow::Result<RegexDef> {
    let dfa = Dfa::try_from(&def)?;
    let regex = dfa.to_regex()?;
    if verbose {
        eprintln!("regex = {}", regex);
    }

    Ok(RegexDef { regex })
}

pub fn minimize_dfa(def: AutomatonDef, verbose: bool) -> anyhow::Result<AutomatonDef> {
    let dfa = Dfa::try_from(&def)?;
    let minimized = dfa.minimize();
    if verbose {
        eprintln!(
            "{} states -> {} states",
            dfa.num_states(),
            minimized.num_states()
        );
        eprintln!("minimized = {:?}", minimized);
    }

    Ok(AutomatonDef::from(&minimized))
}
