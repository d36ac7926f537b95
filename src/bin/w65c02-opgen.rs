use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use w65c02_opgen::config::{parse_mode, parse_num};
use w65c02_opgen::{generate, table, AddrMode, GenConfig, InstructionSet};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Generate W65C02 opcode tables and the get_opcode dispatch routine (64tass)"
)]
struct Opts {
    /// JSON config file (see GenConfig); flags below override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// JSON instruction list to use instead of the built-in W65C02 set
    #[arg(long, value_name = "FILE")]
    instructions: Option<PathBuf>,
    /// Load address (hex with 0x or $, or decimal)
    #[arg(long, value_parser = parse_num::<u16>)]
    origin: Option<u16>,
    /// Omit the test harness routine
    #[arg(long)]
    no_harness: bool,
    /// Mnemonic placed in the harness input buffer
    #[arg(long)]
    harness_mnemonic: Option<String>,
    /// Addressing mode for the harness (name or ordinal)
    #[arg(long, value_parser = parse_mode)]
    harness_mode: Option<AddrMode>,
    /// Fail unless every opcode byte is assigned
    #[arg(long)]
    require_total: bool,
    /// Output file (stdout when absent)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let opts = Opts::parse();

    let mut cfg = match &opts.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            GenConfig::from_json(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => GenConfig::default(),
    };
    if let Some(origin) = opts.origin {
        cfg.origin = origin;
    }
    if opts.no_harness {
        cfg.harness = false;
    }
    if let Some(m) = opts.harness_mnemonic {
        cfg.harness_mnemonic = m;
    }
    if let Some(mode) = opts.harness_mode {
        cfg.harness_mode = mode;
    }

    let set = match &opts.instructions {
        Some(path) => InstructionSet::from_json(&std::fs::read_to_string(path)?)?,
        None => InstructionSet::canonical(),
    };
    match table::check_coverage(set.records()) {
        Ok(()) => {}
        Err(e) if opts.require_total => return Err(e.into()),
        Err(e) => warn!("{e}"),
    }

    let art = generate(&set, cfg.origin)?;
    let text = w65c02_opgen::emit::render(&art, &cfg)?;
    match &opts.output {
        Some(path) => {
            std::fs::write(path, &text)?;
            info!(path = %path.display(), bytes = text.len(), "written");
        }
        None => print!("{text}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_parse_numbers_and_modes() {
        let opts = Opts::try_parse_from(["w65c02-opgen", "--origin", "$0801", "--harness-mode", "Imm"]).unwrap();
        assert_eq!(opts.origin, Some(0x0801));
        assert_eq!(opts.harness_mode, Some(AddrMode::Imm));
        assert!(Opts::try_parse_from(["w65c02-opgen", "--origin", "zero"]).is_err());
    }
}
