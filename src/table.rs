use std::collections::BTreeMap;

use bitvec::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::error::{BuildError, Result};
use crate::isa::InstructionRecord;
use crate::mode::{AddrMode, ModeSet};

pub const TAG_DENSE: u8 = 0;
pub const TAG_SINGLE: u8 = 1;

pub const SINGLE_LEN: usize = 3;
pub const DENSE_LEN: usize = 2 + AddrMode::COUNT;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ModeTable {
    Single { mode: AddrMode, opcode: u8 },
    /// Slot `i` holds the opcode for the mode with ordinal `i + 1`; 0 = absent.
    Dense { slots: [u8; AddrMode::COUNT] },
}

impl ModeTable {
    pub fn opcode(&self, mode: AddrMode) -> Option<u8> {
        match *self {
            ModeTable::Single { mode: m, opcode } => (m == mode).then_some(opcode),
            ModeTable::Dense { ref slots } => match slots[mode.slot()] {
                0 => None,
                op => Some(op),
            },
        }
    }

    pub fn modes(&self) -> ModeSet {
        match self {
            ModeTable::Single { mode, .. } => ModeSet::of(*mode),
            ModeTable::Dense { slots } => AddrMode::ALL
                .into_iter()
                .filter(|m| slots[m.slot()] != 0)
                .fold(ModeSet::empty(), |acc, m| acc | ModeSet::of(m)),
        }
    }

    pub fn encoded_len(&self) -> usize {
        match self {
            ModeTable::Single { .. } => SINGLE_LEN,
            ModeTable::Dense { .. } => DENSE_LEN,
        }
    }

    /// Single: `[1, ordinal, opcode]`. Dense: `[0, 0, slots..]`, so the opcode
    /// for a mode sits at byte `1 + ordinal`.
    pub fn encode(&self, out: &mut Vec<u8>) {
        match self {
            ModeTable::Single { mode, opcode } => out.extend_from_slice(&[TAG_SINGLE, mode.ordinal(), *opcode]),
            ModeTable::Dense { slots } => {
                out.extend_from_slice(&[TAG_DENSE, 0]);
                out.extend_from_slice(slots);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntryId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpcodeTables {
    entries: Vec<(String, ModeTable)>,
}

impl OpcodeTables {
    pub fn get(&self, mnemonic: &str) -> Option<&ModeTable> {
        self.index_of(mnemonic).map(|id| &self.entries[id.0].1)
    }

    pub fn index_of(&self, mnemonic: &str) -> Option<EntryId> {
        self.entries
            .binary_search_by(|(m, _)| m.as_str().cmp(mnemonic))
            .ok()
            .map(EntryId)
    }

    pub fn entry(&self, id: EntryId) -> (&str, &ModeTable) {
        let (m, t) = &self.entries[id.0];
        (m.as_str(), t)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModeTable)> {
        self.entries.iter().map(|(m, t)| (m.as_str(), t))
    }

    pub fn mnemonics(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(m, _)| m.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn layout(&self, origin: u16) -> Result<TableImage> {
        if origin == 0 {
            return Err(BuildError::SentinelAddress);
        }
        let mut bytes = Vec::new();
        let mut addresses = Vec::with_capacity(self.entries.len());
        for (_, table) in &self.entries {
            let addr = origin as usize + bytes.len();
            if addr + table.encoded_len() > 0x1_0000 {
                return Err(BuildError::TableOverflow { origin });
            }
            addresses.push(addr as u16);
            table.encode(&mut bytes);
        }
        Ok(TableImage { origin, bytes, addresses })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableImage {
    pub origin: u16,
    pub bytes: Vec<u8>,
    pub addresses: Vec<u16>,
}

impl TableImage {
    pub fn address(&self, id: EntryId) -> u16 {
        self.addresses[id.0]
    }

    pub fn read_opcode(&self, addr: u16, mode: AddrMode) -> Option<u8> {
        let off = addr.checked_sub(self.origin)? as usize;
        let entry = self.bytes.get(off..)?;
        match *entry.first()? {
            TAG_SINGLE => {
                let (&ordinal, &opcode) = (entry.get(1)?, entry.get(2)?);
                (ordinal == mode.ordinal()).then_some(opcode)
            }
            _ => match *entry.get(1 + mode.ordinal() as usize)? {
                0 => None,
                op => Some(op),
            },
        }
    }
}

/// Reserved records take part in the opcode uniqueness check only.
pub fn build(records: &[InstructionRecord]) -> Result<OpcodeTables> {
    let mut owners: [Option<&InstructionRecord>; 256] = [None; 256];
    let mut grouped: BTreeMap<&str, BTreeMap<AddrMode, u8>> = BTreeMap::new();

    for rec in records {
        if !rec.reserved
            && grouped.get(rec.mnemonic.as_str()).is_some_and(|modes| modes.contains_key(&rec.mode))
        {
            return Err(BuildError::DuplicateMode { mnemonic: rec.mnemonic.clone(), mode: rec.mode });
        }
        if let Some(prev) = owners[rec.opcode as usize] {
            return Err(BuildError::DuplicateOpcode {
                opcode: rec.opcode,
                first: (prev.mnemonic.clone(), prev.mode),
                second: (rec.mnemonic.clone(), rec.mode),
            });
        }
        owners[rec.opcode as usize] = Some(rec);
        if !rec.reserved {
            grouped.entry(rec.mnemonic.as_str()).or_default().insert(rec.mode, rec.opcode);
        }
    }

    let mut entries = Vec::with_capacity(grouped.len());
    for (mnemonic, modes) in grouped {
        let table = if let (1, Some((&mode, &opcode))) = (modes.len(), modes.first_key_value()) {
            ModeTable::Single { mode, opcode }
        } else {
            let mut slots = [0u8; AddrMode::COUNT];
            for (&mode, &opcode) in &modes {
                if opcode == 0 {
                    return Err(BuildError::SentinelOpcode { mnemonic: mnemonic.to_string(), mode });
                }
                slots[mode.slot()] = opcode;
            }
            ModeTable::Dense { slots }
        };
        entries.push((mnemonic.to_string(), table));
    }

    debug!(records = records.len(), mnemonics = entries.len(), "mode tables built");
    Ok(OpcodeTables { entries })
}

pub fn check_coverage(records: &[InstructionRecord]) -> Result<()> {
    let mut seen = bitarr![u8, Lsb0; 0; 256];
    for rec in records {
        seen.set(rec.opcode as usize, true);
    }
    let missing: Vec<u8> = seen.iter_zeros().map(|i| i as u8).collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(BuildError::IncompleteOpcodeSpace { missing })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(opcode: u8, mnemonic: &str, mode: AddrMode) -> InstructionRecord {
        InstructionRecord { opcode, mnemonic: mnemonic.into(), mode, reserved: false }
    }

    #[test]
    fn single_and_dense_representation() {
        let t = build(&[
            rec(0xa9, "lda", AddrMode::Imm),
            rec(0xad, "lda", AddrMode::Abs),
            rec(0x20, "jsr", AddrMode::Abs),
        ])
        .unwrap();
        assert_eq!(t.get("jsr"), Some(&ModeTable::Single { mode: AddrMode::Abs, opcode: 0x20 }));
        let lda = t.get("lda").unwrap();
        assert_eq!(lda.opcode(AddrMode::Imm), Some(0xa9));
        assert_eq!(lda.opcode(AddrMode::Abs), Some(0xad));
        assert_eq!(lda.opcode(AddrMode::Zp), None);
        assert_eq!(lda.modes(), ModeSet::IMM | ModeSet::ABS);
    }

    #[test]
    fn duplicate_mode_is_rejected_even_with_same_opcode() {
        let err = build(&[rec(0xa9, "lda", AddrMode::Imm), rec(0xa9, "lda", AddrMode::Imm)]).unwrap_err();
        assert!(matches!(err, BuildError::DuplicateMode { mode: AddrMode::Imm, .. }));

        let err = build(&[rec(0xa9, "lda", AddrMode::Imm), rec(0xa8, "lda", AddrMode::Imm)]).unwrap_err();
        assert!(matches!(err, BuildError::DuplicateMode { ref mnemonic, mode: AddrMode::Imm } if mnemonic == "lda"));
    }

    #[test]
    fn duplicate_opcode_is_rejected() {
        let err = build(&[rec(0x10, "bpl", AddrMode::Rel), rec(0x10, "bmi", AddrMode::Rel)]).unwrap_err();
        match err {
            BuildError::DuplicateOpcode { opcode, first, second } => {
                assert_eq!(opcode, 0x10);
                assert_eq!(first, ("bpl".to_string(), AddrMode::Rel));
                assert_eq!(second, ("bmi".to_string(), AddrMode::Rel));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn zero_opcode_only_allowed_in_single_entries() {
        assert!(build(&[rec(0x00, "brk", AddrMode::Imp)]).is_ok());
        let err = build(&[rec(0x00, "brk", AddrMode::Imp), rec(0x01, "brk", AddrMode::Imm)]).unwrap_err();
        assert!(matches!(err, BuildError::SentinelOpcode { .. }));
    }

    #[test]
    fn layout_encodes_entries_back_to_back() {
        let t = build(&[
            rec(0x20, "jsr", AddrMode::Abs),
            rec(0xa9, "lda", AddrMode::Imm),
            rec(0xbd, "lda", AddrMode::AbsX),
        ])
        .unwrap();
        let img = t.layout(0x2000).unwrap();
        // "jsr" sorts before "lda"
        assert_eq!(img.addresses, vec![0x2000, 0x2000 + SINGLE_LEN as u16]);
        assert_eq!(&img.bytes[..SINGLE_LEN], &[TAG_SINGLE, AddrMode::Abs.ordinal(), 0x20]);
        assert_eq!(img.bytes[SINGLE_LEN], TAG_DENSE);
        assert_eq!(img.bytes[SINGLE_LEN + 1 + AddrMode::AbsX.ordinal() as usize], 0xbd);
        assert_eq!(img.bytes.len(), SINGLE_LEN + DENSE_LEN);
        assert_eq!(img.read_opcode(0x2000, AddrMode::Abs), Some(0x20));
        assert_eq!(img.read_opcode(0x2000, AddrMode::Imm), None);
        assert_eq!(img.read_opcode(img.addresses[1], AddrMode::Imm), Some(0xa9));
        assert_eq!(img.read_opcode(img.addresses[1], AddrMode::Zp), None);
    }

    #[test]
    fn layout_refuses_sentinel_origin_and_overflow() {
        let t = build(&[rec(0xa9, "lda", AddrMode::Imm), rec(0xad, "lda", AddrMode::Abs)]).unwrap();
        assert!(matches!(t.layout(0), Err(BuildError::SentinelAddress)));
        assert!(matches!(t.layout(0xfff0), Err(BuildError::TableOverflow { origin: 0xfff0 })));
    }

    #[test]
    fn coverage_reports_missing_opcodes() {
        let err = check_coverage(&[rec(0x00, "brk", AddrMode::Imp)]).unwrap_err();
        match err {
            BuildError::IncompleteOpcodeSpace { missing } => {
                assert_eq!(missing.len(), 255);
                assert_eq!(missing[0], 0x01);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
