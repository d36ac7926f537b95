use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BuildError, Result};
use crate::mode::AddrMode;

pub mod w65c02;

pub use w65c02::{InstrDesc, TABLE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionRecord {
    pub opcode: u8,
    pub mnemonic: String,
    pub mode: AddrMode,
    #[serde(default)]
    pub reserved: bool,
}

impl From<&InstrDesc> for InstructionRecord {
    fn from(d: &InstrDesc) -> Self {
        Self {
            opcode: d.opcode,
            mnemonic: d.mnemonic.to_string(),
            mode: d.mode,
            reserved: d.reserved,
        }
    }
}

/// Validated, immutable list of instruction records.
#[derive(Debug, Clone)]
pub struct InstructionSet {
    records: Vec<InstructionRecord>,
}

/// 3 or 4 characters, lowercase letters and digits, starting with a letter.
pub fn is_valid_mnemonic(m: &str) -> bool {
    let b = m.as_bytes();
    (3..=4).contains(&b.len())
        && b[0].is_ascii_lowercase()
        && b.iter().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
}

impl InstructionSet {
    /// The compiled-in W65C02 set.
    pub fn canonical() -> Self {
        Self { records: TABLE.iter().map(InstructionRecord::from).collect() }
    }

    pub fn from_records(records: Vec<InstructionRecord>) -> Result<Self> {
        if let Some(bad) = records.iter().find(|r| !is_valid_mnemonic(&r.mnemonic)) {
            return Err(BuildError::InvalidMnemonic { mnemonic: bad.mnemonic.clone() });
        }
        debug!(records = records.len(), "instruction set loaded");
        Ok(Self { records })
    }

    /// Parses a JSON array of `{ "opcode", "mnemonic", "mode", "reserved"? }`.
    pub fn from_json(text: &str) -> Result<Self> {
        let records: Vec<InstructionRecord> = serde_json::from_str(text)?;
        Self::from_records(records)
    }

    pub fn records(&self) -> &[InstructionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct mnemonics in ascending order, reserved encodings excluded.
    pub fn mnemonics(&self) -> BTreeSet<&str> {
        self.records.iter().filter(|r| !r.reserved).map(|r| r.mnemonic.as_str()).collect()
    }

    /// mnemonic -> [(mode, opcode)] in record order, reserved encodings excluded.
    pub fn by_mnemonic(&self) -> BTreeMap<&str, Vec<(AddrMode, u8)>> {
        let mut out: BTreeMap<&str, Vec<(AddrMode, u8)>> = BTreeMap::new();
        for r in self.records.iter().filter(|r| !r.reserved) {
            out.entry(r.mnemonic.as_str()).or_default().push((r.mode, r.opcode));
        }
        out
    }

    /// mode -> [(mnemonic, opcode)] in record order, reserved encodings included.
    pub fn by_mode(&self) -> BTreeMap<AddrMode, Vec<(&str, u8)>> {
        let mut out: BTreeMap<AddrMode, Vec<(&str, u8)>> = BTreeMap::new();
        for r in &self.records {
            out.entry(r.mode).or_default().push((r.mnemonic.as_str(), r.opcode));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::mode::AddrMode::*;

    #[test]
    fn canonical_mnemonics_are_well_formed() {
        for d in TABLE {
            assert!(is_valid_mnemonic(d.mnemonic), "{}", d.mnemonic);
        }
    }

    #[test]
    fn nop_keeps_one_encoding_per_mode() {
        let set = InstructionSet::canonical();
        let by_name = set.by_mnemonic();
        assert_eq!(
            by_name["nop"],
            vec![(Imm, 0x02), (Zp, 0x44), (ZpX, 0x54), (Abs, 0x5c), (Imp, 0xea), (AbsX, 0xfc)]
        );
        assert_eq!(set.records().iter().filter(|r| r.reserved).count(), 39);
    }

    #[test]
    fn by_mode_groups_every_record() {
        let set = InstructionSet::canonical();
        let total: usize = set.by_mode().values().map(Vec::len).sum();
        assert_eq!(total, 256);
        assert_eq!(set.by_mode()[&IaX], vec![("jmp", 0x7c)]);
    }

    #[test]
    fn rejects_uppercase_or_short_mnemonics() {
        let rec = |m: &str| InstructionRecord { opcode: 1, mnemonic: m.into(), mode: Imp, reserved: false };
        assert!(matches!(
            InstructionSet::from_records(vec![rec("LDA")]),
            Err(BuildError::InvalidMnemonic { .. })
        ));
        assert!(InstructionSet::from_records(vec![rec("ld")]).is_err());
        assert!(InstructionSet::from_records(vec![rec("bbr0")]).is_ok());
    }

    #[test]
    fn loads_records_from_json() {
        let set = InstructionSet::from_json(
            r#"[{"opcode":169,"mnemonic":"lda","mode":"Imm"},{"opcode":234,"mnemonic":"nop","mode":"Imp"}]"#,
        )
        .unwrap();
        assert_eq!(set.len(), 2);
        assert!(!set.records()[0].reserved);
        assert_eq!(set.mnemonics().into_iter().collect::<Vec<_>>(), vec!["lda", "nop"]);
    }
}
