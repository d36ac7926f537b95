use crate::mode::AddrMode;

#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    #[error("opcode {opcode:#04x} assigned to both {} {} and {} {}", first.0, first.1, second.0, second.1)]
    DuplicateOpcode {
        opcode: u8,
        first: (String, AddrMode),
        second: (String, AddrMode),
    },
    #[error("mnemonic {mnemonic} defines mode {mode} more than once")]
    DuplicateMode { mnemonic: String, mode: AddrMode },
    #[error("mnemonics {first} and {second} cannot be told apart within 4 characters")]
    AmbiguousMnemonic { first: String, second: String },
    #[error("invalid mnemonic {mnemonic:?}")]
    InvalidMnemonic { mnemonic: String },
    #[error("opcode 0x00 for {mnemonic} {mode} collides with the absent-slot sentinel")]
    SentinelOpcode { mnemonic: String, mode: AddrMode },
    #[error("no table for mnemonic {mnemonic}")]
    MissingTable { mnemonic: String },
    #[error("opcode space incomplete, {} opcodes unassigned (first {:#04x})", missing.len(), missing[0])]
    IncompleteOpcodeSpace { missing: Vec<u8> },
    #[error("tables do not fit below $ffff when placed at {origin:#06x}")]
    TableOverflow { origin: u16 },
    #[error("tables placed at $0000 collide with the not-found sentinel")]
    SentinelAddress,
    #[error("bad instruction set: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BuildError>;
