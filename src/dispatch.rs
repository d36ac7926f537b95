use serde::Serialize;
use tracing::debug;

use crate::error::{BuildError, Result};
use crate::mode::AddrMode;
use crate::table::{EntryId, OpcodeTables, TableImage};
use crate::trie::{MnemonicTrie, NodeId, TrieNode};

/// One instruction of the compiled dispatch procedure. Steps run in order;
/// a failed test jumps forward to `on_mismatch`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Compare { depth: usize, ch: u8, path: String, on_mismatch: usize },
    ExpectEnd { depth: usize, path: String, on_mismatch: usize },
    Resolve { entry: EntryId },
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchProcedure {
    steps: Vec<Step>,
}

struct Compiler<'a> {
    trie: &'a MnemonicTrie,
    tables: &'a OpcodeTables,
    steps: Vec<Step>,
}

impl Compiler<'_> {
    fn entry(&self, mnemonic: &str) -> Result<EntryId> {
        self.tables
            .index_of(mnemonic)
            .ok_or_else(|| BuildError::MissingTable { mnemonic: mnemonic.to_string() })
    }

    fn test(&mut self, step: Step) -> usize {
        self.steps.push(step);
        self.steps.len() - 1
    }

    fn patch(&mut self, at: usize) {
        let target = self.steps.len();
        if let Step::Compare { on_mismatch, .. } | Step::ExpectEnd { on_mismatch, .. } = &mut self.steps[at] {
            *on_mismatch = target;
        }
    }

    fn node(&mut self, id: NodeId, path: &str) -> Result<()> {
        let trie = self.trie;
        match trie.node(id) {
            TrieNode::Leaf { mnemonic } => {
                let entry = self.entry(mnemonic)?;
                let at = self.test(Step::ExpectEnd { depth: mnemonic.len(), path: path.to_string(), on_mismatch: 0 });
                self.steps.push(Step::Resolve { entry });
                self.patch(at);
                self.steps.push(Step::NotFound);
            }
            TrieNode::Branch { depth, terminal, children } => {
                let depth = *depth;
                if let Some(m) = terminal {
                    let entry = self.entry(m)?;
                    let at = self.test(Step::ExpectEnd { depth, path: path.to_string(), on_mismatch: 0 });
                    self.steps.push(Step::Resolve { entry });
                    self.patch(at);
                }
                for &(ch, child) in children {
                    let child_path = format!("{path}{}", ch as char);
                    let at = self.test(Step::Compare { depth, ch, path: child_path.clone(), on_mismatch: 0 });
                    self.node(child, &child_path)?;
                    self.patch(at);
                }
                self.steps.push(Step::NotFound);
            }
        }
        Ok(())
    }
}

pub fn compile(trie: &MnemonicTrie, tables: &OpcodeTables) -> Result<DispatchProcedure> {
    let mut c = Compiler { trie, tables, steps: Vec::new() };
    c.node(trie.root(), "")?;
    debug!(steps = c.steps.len(), "dispatch procedure compiled");
    Ok(DispatchProcedure { steps: c.steps })
}

impl DispatchProcedure {
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Runs the procedure, returning the matched entry and the indices of
    /// the steps executed. `input` must match a mnemonic exactly; a NUL byte
    /// is an ordinary character here, not an end marker.
    pub fn trace(&self, input: &str) -> (Option<EntryId>, Vec<usize>) {
        let input = input.as_bytes();
        let mut visited = Vec::new();
        let mut pc = 0;
        while let Some(step) = self.steps.get(pc) {
            visited.push(pc);
            pc = match step {
                Step::Compare { depth, ch, on_mismatch, .. } => {
                    if input.get(*depth) == Some(ch) { pc + 1 } else { *on_mismatch }
                }
                Step::ExpectEnd { depth, on_mismatch, .. } => {
                    if input.len() == *depth { pc + 1 } else { *on_mismatch }
                }
                Step::Resolve { entry } => return (Some(*entry), visited),
                Step::NotFound => break,
            };
        }
        (None, visited)
    }

    pub fn run(&self, input: &str) -> Option<EntryId> {
        self.trace(input).0
    }

    pub fn address(&self, input: &str, image: &TableImage) -> u16 {
        self.run(input).map_or(0, |id| image.address(id))
    }

    pub fn lookup(&self, input: &str, mode: AddrMode, tables: &OpcodeTables) -> Option<u8> {
        let (_, table) = tables.entry(self.run(input)?);
        table.opcode(mode)
    }
}
