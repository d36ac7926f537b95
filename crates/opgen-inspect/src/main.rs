use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use opgen_inspect::{load, load_set, lookup_report, mode_groups, table_rows};
use w65c02_opgen::config::{parse_mode, parse_num};
use w65c02_opgen::dispatch::Step;
use w65c02_opgen::AddrMode;

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect generated W65C02 opcode tables", long_about=None)]
struct Cli {
    /// JSON instruction list (default: built-in W65C02 set)
    #[arg(long, value_name = "FILE")]
    instructions: Option<PathBuf>,
    /// Table origin (hex or dec)
    #[arg(long, default_value = "0x2000", value_parser = parse_num::<u16>)]
    origin: u16,
    /// Output format: text or json
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,
    /// Subcommand
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List per-mnemonic tables with their addresses
    Tables,
    /// Print the mnemonic trie
    Trie,
    /// Group instructions by addressing mode
    Modes,
    /// Print the compiled dispatch steps
    Procedure,
    /// Resolve one mnemonic through the dispatch procedure
    Lookup {
        mnemonic: String,
        /// Addressing mode (name or ordinal)
        #[arg(long, value_parser = parse_mode)]
        mode: Option<AddrMode>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat { Text, Json }

fn step_text(step: &Step) -> String {
    match step {
        Step::Compare { depth, ch, on_mismatch, .. } => format!("cmp  [{depth}] == '{}' else {on_mismatch}", *ch as char),
        Step::ExpectEnd { depth, on_mismatch, .. } => format!("end  [{depth}] else {on_mismatch}"),
        Step::Resolve { entry } => format!("ret  entry {}", entry.0),
        Step::NotFound => "ret  0".to_string(),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let origin = cli.origin;
    let json = matches!(cli.format, OutputFormat::Json);

    match cli.cmd {
        Command::Tables => {
            let art = load(cli.instructions.as_deref(), origin)?;
            let rows = table_rows(&art);
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                println!("{:<6} {:<7} {:<7} modes", "name", "addr", "kind");
                for r in &rows {
                    let modes: Vec<String> = r.modes.iter().map(|m| format!("{}={:#04x}", m.mode, m.opcode)).collect();
                    println!("{:<6} ${:04x}   {:<7} {}", r.mnemonic, r.address, r.kind, modes.join(" "));
                }
            }
        }
        Command::Trie => {
            let art = load(cli.instructions.as_deref(), origin)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&art.trie)?);
            } else {
                print!("{}", art.trie);
            }
        }
        Command::Modes => {
            let set = load_set(cli.instructions.as_deref())?;
            let groups = mode_groups(&set);
            if json {
                println!("{}", serde_json::to_string_pretty(&groups)?);
            } else {
                for g in &groups {
                    let names: Vec<String> = g.instructions.iter().map(|i| format!("{}:{:02x}", i.mnemonic, i.opcode)).collect();
                    println!("{:>2} {:<5} {}", g.ordinal, g.mode, names.join(" "));
                }
            }
        }
        Command::Procedure => {
            let art = load(cli.instructions.as_deref(), origin)?;
            if json {
                println!("{}", serde_json::to_string_pretty(art.procedure.steps())?);
            } else {
                for (i, step) in art.procedure.steps().iter().enumerate() {
                    println!("{i:>4}: {}", step_text(step));
                }
            }
        }
        Command::Lookup { mnemonic, mode } => {
            let art = load(cli.instructions.as_deref(), origin)?;
            let out = lookup_report(&art, &mnemonic, mode);
            if json {
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                print!("{} -> ${:04x}", out.mnemonic, out.address);
                if let (Some(mode), Some(op)) = (out.mode, out.opcode) {
                    print!("  {mode} = {op:#04x}");
                } else if let Some(mode) = out.mode {
                    print!("  {mode} = none");
                }
                println!("  ({} steps, {} tests)", out.steps, out.comparisons);
            }
        }
    }

    Ok(())
}
