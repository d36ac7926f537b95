pub mod config;
pub mod dispatch;
pub mod emit;
pub mod error;
pub mod isa;
pub mod mode;
pub mod table;
pub mod trie;

pub use config::GenConfig;
pub use dispatch::{DispatchProcedure, Step};
pub use error::{BuildError, Result};
pub use isa::{InstructionRecord, InstructionSet};
pub use mode::{AddrMode, ModeSet};
pub use table::{EntryId, ModeTable, OpcodeTables, TableImage};
pub use trie::{MnemonicTrie, TrieNode};

use tracing::info;

/// Everything derived from one instruction set.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub tables: OpcodeTables,
    pub trie: MnemonicTrie,
    pub procedure: DispatchProcedure,
    pub image: TableImage,
}

/// Builds tables, trie and dispatch procedure, with tables placed at `origin`.
pub fn generate(set: &InstructionSet, origin: u16) -> Result<Artifacts> {
    let tables = table::build(set.records())?;
    let trie = MnemonicTrie::build(tables.mnemonics())?;
    let procedure = dispatch::compile(&trie, &tables)?;
    let image = tables.layout(origin)?;
    info!(
        mnemonics = tables.len(),
        trie_nodes = trie.nodes().len(),
        steps = procedure.steps().len(),
        table_bytes = image.bytes.len(),
        "generated"
    );
    Ok(Artifacts { tables, trie, procedure, image })
}

impl Artifacts {
    /// Opcode for `mnemonic` in `mode`, resolved through the dispatch procedure.
    pub fn lookup(&self, mnemonic: &str, mode: AddrMode) -> Option<u8> {
        self.procedure.lookup(mnemonic, mode, &self.tables)
    }

    /// Table address for `mnemonic`, 0 when unknown.
    pub fn address(&self, mnemonic: &str) -> u16 {
        self.procedure.address(mnemonic, &self.image)
    }
}
