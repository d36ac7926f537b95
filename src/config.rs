use num_traits::Num;
use serde::{Deserialize, Serialize};

use crate::mode::AddrMode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    pub cpu: String,      // 64tass .cpu directive
    pub origin: u16,      // load address of the emitted code
    pub entry_label: String,
    pub table_prefix: String, // entry labels are <prefix><mnemonic>
    pub input_label: String,  // NUL-terminated mnemonic buffer
    pub mode_label: String,
    pub harness: bool,
    pub harness_mnemonic: String,
    pub harness_mode: AddrMode,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            cpu: "65c02".into(),
            origin: 0x2000,
            entry_label: "get_opcode".into(),
            table_prefix: "i_".into(),
            input_label: "opcode".into(),
            mode_label: "addrmode".into(),
            harness: true,
            harness_mnemonic: "sta".into(),
            harness_mode: AddrMode::AbsX,
        }
    }
}

impl GenConfig {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn table_label(&self, mnemonic: &str) -> String {
        format!("{}{}", self.table_prefix, mnemonic)
    }
}

/// Hex with `0x`/`$` prefix, or decimal. Used as a clap value parser.
pub fn parse_num<T: Num>(s: &str) -> Result<T, String> {
    let t = s.trim();
    let (digits, radix) = match t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")).or_else(|| t.strip_prefix('$')) {
        Some(hex) => (hex, 16),
        None => (t, 10),
    };
    T::from_str_radix(digits, radix).map_err(|_| format!("not a number: {s}"))
}

pub fn parse_mode(s: &str) -> Result<AddrMode, String> {
    AddrMode::parse(s).ok_or_else(|| format!("unknown addressing mode: {s}"))
}
