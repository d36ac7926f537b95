//! 64tass source for the generated tables and the `get_opcode` routine.
//!
//! The routine expects the first three mnemonic characters in A, X and Y and
//! reads deeper characters from the NUL-terminated input buffer. It returns
//! the address of the matching table entry in A (low) / Y (high), or $0000.

use std::collections::HashMap;
use std::fmt::{self, Write};

use crate::config::GenConfig;
use crate::dispatch::Step;
use crate::mode::AddrMode;
use crate::table::ModeTable;
use crate::Artifacts;

const NOT_FOUND: &str = "_not_found";

/// Characters at these depths are preloaded into A, X and Y.
const REGISTERS: [char; 3] = ['a', 'x', 'y'];

const SHORT_BRANCH: usize = 2;
const LONG_BRANCH: usize = 5; // beq + / jmp target

pub fn render(art: &Artifacts, cfg: &GenConfig) -> Result<String, fmt::Error> {
    let mut out = String::new();
    header(&mut out, cfg)?;
    tables(&mut out, art, cfg)?;
    procedure(&mut out, art, cfg)?;
    if cfg.harness {
        harness(&mut out, cfg)?;
    }
    Ok(out)
}

fn header(out: &mut String, cfg: &GenConfig) -> fmt::Result {
    writeln!(out, "    .cpu \"{}\"", cfg.cpu)?;
    if cfg.harness {
        writeln!(out, "cx16    .block")?;
        writeln!(out, "    r0 = $02")?;
        writeln!(out, "    .bend")?;
    }
    writeln!(out, "; addressing modes:")?;
    for mode in AddrMode::ALL {
        writeln!(out, "; {} = {}", mode.ordinal(), mode)?;
    }
    writeln!(out)?;
    writeln!(out, "    * = ${:04x}", cfg.origin)?;
    writeln!(out)?;
    writeln!(out, "    .enc \"petscii\"")?;
    writeln!(out, "    .cdef \" @\", 32")?;
    writeln!(out, "    .cdef \"AZ\", $c1")?;
    writeln!(out, "    .cdef \"az\", $41")?;
    writeln!(out, "    .cdef \"[[\", $5b")?;
    writeln!(out, "    .cdef \"]]\", $5d")?;
    writeln!(out, "    .edef \"<nothing>\", []")?;
    writeln!(out)
}

fn tables(out: &mut String, art: &Artifacts, cfg: &GenConfig) -> fmt::Result {
    for (mnemonic, table) in art.tables.iter() {
        writeln!(out, "{}:", cfg.table_label(mnemonic))?;
        let mut bytes = Vec::with_capacity(table.encoded_len());
        table.encode(&mut bytes);
        let body: Vec<String> = bytes.iter().map(|b| format!("${b:02x}")).collect();
        match table {
            ModeTable::Single { mode, .. } => writeln!(out, "    .byte  {}    ; {}", body.join(", "), mode)?,
            ModeTable::Dense { .. } => writeln!(out, "    .byte  {}", body.join(", "))?,
        }
    }
    writeln!(out)
}

/// Where a failed test goes: another step, or the shared not-found exit.
#[derive(Clone, Copy)]
enum Target {
    Step(usize),
    NotFound,
}

fn target(steps: &[Step], at: usize) -> Target {
    match steps.get(at) {
        Some(Step::NotFound) | None => Target::NotFound,
        Some(_) => Target::Step(at),
    }
}

fn mismatch(step: &Step) -> Option<usize> {
    match step {
        Step::Compare { on_mismatch, .. } | Step::ExpectEnd { on_mismatch, .. } => Some(*on_mismatch),
        _ => None,
    }
}

/// Bytes emitted for a step before its branch instruction.
fn test_len(step: &Step) -> usize {
    match step {
        Step::Compare { depth, .. } if *depth < REGISTERS.len() => 2,
        Step::Compare { .. } => 3 + 2,
        Step::ExpectEnd { depth, .. } if *depth < REGISTERS.len() => 2,
        Step::ExpectEnd { .. } => 3,
        _ => 0,
    }
}

/// Picks short or long branches so every `bne` stays within range.
/// NotFound steps other than the last are never reached by fall-through and
/// are folded into the shared exit.
fn layout(steps: &[Step]) -> Vec<bool> {
    let mut long = vec![false; steps.len()];
    loop {
        let mut offsets = Vec::with_capacity(steps.len() + 1);
        let mut pc = 0usize;
        for (i, step) in steps.iter().enumerate() {
            offsets.push(pc);
            pc += match step {
                Step::Compare { .. } | Step::ExpectEnd { .. } => {
                    test_len(step) + if long[i] { LONG_BRANCH } else { SHORT_BRANCH }
                }
                Step::Resolve { .. } => 5,
                Step::NotFound => 0,
            };
        }
        let exit = pc;

        let mut changed = false;
        for (i, step) in steps.iter().enumerate() {
            let Some(to) = mismatch(step) else { continue };
            if long[i] {
                continue;
            }
            let dest = match target(steps, to) {
                Target::Step(j) => offsets[j],
                Target::NotFound => exit,
            };
            let from = offsets[i] + test_len(step) + SHORT_BRANCH;
            if dest < from || dest - from > 127 {
                long[i] = true;
                changed = true;
            }
        }
        if !changed {
            return long;
        }
    }
}

fn procedure(out: &mut String, art: &Artifacts, cfg: &GenConfig) -> fmt::Result {
    let steps = art.procedure.steps();
    let long = layout(steps);

    let mut labels: HashMap<usize, String> = HashMap::new();
    for step in steps {
        let Some(to) = mismatch(step) else { continue };
        let Target::Step(j) = target(steps, to) else { continue };
        let name = match step {
            Step::Compare { path, .. } => format!("_not_{path}"),
            Step::ExpectEnd { path, .. } => format!("_more_{path}"),
            _ => continue,
        };
        labels.insert(j, name);
    }
    let label_of = |at: usize| match target(steps, at) {
        Target::Step(j) => labels.get(&j).cloned().unwrap_or_else(|| NOT_FOUND.to_string()),
        Target::NotFound => NOT_FOUND.to_string(),
    };

    writeln!(out, "{}:", cfg.entry_label)?;
    for (i, step) in steps.iter().enumerate() {
        if let Some(name) = labels.get(&i) {
            writeln!(out, "{name}:")?;
        }
        match step {
            Step::Compare { depth, ch, .. } => {
                match REGISTERS.get(*depth) {
                    Some('a') => writeln!(out, "    cmp  #'{}'", *ch as char)?,
                    Some(r) => writeln!(out, "    cp{r}  #'{}'", *ch as char)?,
                    None => {
                        writeln!(out, "    lda  {}+{}", cfg.input_label, depth)?;
                        writeln!(out, "    cmp  #'{}'", *ch as char)?;
                    }
                }
            }
            Step::ExpectEnd { depth, .. } => match REGISTERS.get(*depth) {
                Some('a') => writeln!(out, "    cmp  #0")?,
                Some(r) => writeln!(out, "    cp{r}  #0")?,
                None => writeln!(out, "    lda  {}+{}", cfg.input_label, depth)?,
            },
            Step::Resolve { entry } => {
                let (mnemonic, _) = art.tables.entry(*entry);
                let label = cfg.table_label(mnemonic);
                writeln!(out, "    lda  #<{label}")?;
                writeln!(out, "    ldy  #>{label}")?;
                writeln!(out, "    rts")?;
            }
            Step::NotFound => {}
        }
        if let Some(to) = mismatch(step) {
            let dest = label_of(to);
            if long[i] {
                writeln!(out, "    beq  +")?;
                writeln!(out, "    jmp  {dest}")?;
                writeln!(out, "+")?;
            } else {
                writeln!(out, "    bne  {dest}")?;
            }
        }
    }
    writeln!(out, "{NOT_FOUND}:")?;
    writeln!(out, "    lda  #0")?;
    writeln!(out, "    ldy  #0")?;
    writeln!(out, "    rts")?;
    writeln!(out)
}

fn harness(out: &mut String, cfg: &GenConfig) -> fmt::Result {
    writeln!(out, "test_{}:", cfg.entry_label)?;
    writeln!(out, "    phx")?;
    writeln!(out, "    lda  {}", cfg.mode_label)?;
    writeln!(out, "    sta  cx16.r0")?;
    writeln!(out, "    lda  {}", cfg.input_label)?;
    writeln!(out, "    ldx  {}+1", cfg.input_label)?;
    writeln!(out, "    ldy  {}+2", cfg.input_label)?;
    writeln!(out, "    jsr  {}", cfg.entry_label)?;
    writeln!(out, "    ; result is pointer to {}xxx in AY  (or $0000 if not found)", cfg.table_prefix)?;
    writeln!(out, "    sta  $4000")?;
    writeln!(out, "    sty  $4001")?;
    writeln!(out, "    plx")?;
    writeln!(out, "    rts")?;
    writeln!(out)?;
    writeln!(out, "{}:", cfg.input_label)?;
    writeln!(out, "    .text  \"{}\",0", cfg.harness_mnemonic)?;
    writeln!(out, "{}:", cfg.mode_label)?;
    writeln!(out, "    .byte  {}", cfg.harness_mode.ordinal())
}
