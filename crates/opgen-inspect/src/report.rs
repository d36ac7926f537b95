use serde::Serialize;

use w65c02_opgen::dispatch::Step;
use w65c02_opgen::{AddrMode, Artifacts, InstructionSet, ModeTable};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeOpcode {
    pub mode: AddrMode,
    pub ordinal: u8,
    pub opcode: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub mnemonic: String,
    pub address: u16,
    pub kind: &'static str,
    pub modes: Vec<ModeOpcode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeMember {
    pub mnemonic: String,
    pub opcode: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeGroup {
    pub mode: AddrMode,
    pub ordinal: u8,
    pub instructions: Vec<ModeMember>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupOut {
    pub mnemonic: String,
    pub address: u16,
    pub mode: Option<AddrMode>,
    pub opcode: Option<u8>,
    pub steps: usize,
    pub comparisons: usize,
}

pub fn table_rows(art: &Artifacts) -> Vec<TableRow> {
    art.tables
        .iter()
        .enumerate()
        .map(|(i, (mnemonic, table))| TableRow {
            mnemonic: mnemonic.to_string(),
            address: art.image.addresses[i],
            kind: match table {
                ModeTable::Single { .. } => "single",
                ModeTable::Dense { .. } => "dense",
            },
            modes: table
                .modes()
                .modes()
                .filter_map(|mode| {
                    let opcode = table.opcode(mode)?;
                    Some(ModeOpcode { mode, ordinal: mode.ordinal(), opcode })
                })
                .collect(),
        })
        .collect()
}

pub fn mode_groups(set: &InstructionSet) -> Vec<ModeGroup> {
    set.by_mode()
        .into_iter()
        .map(|(mode, members)| ModeGroup {
            mode,
            ordinal: mode.ordinal(),
            instructions: members
                .into_iter()
                .map(|(m, opcode)| ModeMember { mnemonic: m.to_string(), opcode })
                .collect(),
        })
        .collect()
}

pub fn lookup_report(art: &Artifacts, mnemonic: &str, mode: Option<AddrMode>) -> LookupOut {
    let steps = art.procedure.steps();
    let (entry, visited) = art.procedure.trace(mnemonic);
    let comparisons = visited
        .iter()
        .filter(|&&i| matches!(steps[i], Step::Compare { .. } | Step::ExpectEnd { .. }))
        .count();
    let opcode = match (entry, mode) {
        (Some(id), Some(mode)) => art.tables.entry(id).1.opcode(mode),
        _ => None,
    };
    LookupOut {
        mnemonic: mnemonic.to_string(),
        address: entry.map_or(0, |id| art.image.address(id)),
        mode,
        opcode,
        steps: visited.len(),
        comparisons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use w65c02_opgen::generate;

    #[test]
    fn sta_abs_x_lookup() {
        let art = generate(&InstructionSet::canonical(), 0x2000).unwrap();
        let out = lookup_report(&art, "sta", Some(AddrMode::AbsX));
        assert_eq!(out.opcode, Some(0x9d));
        assert_ne!(out.address, 0);
        assert!(out.comparisons <= out.steps);

        let miss = lookup_report(&art, "zzz", None);
        assert_eq!(miss.address, 0);
        assert_eq!(miss.opcode, None);
    }

    #[test]
    fn rows_list_modes_in_ordinal_order() {
        let art = generate(&InstructionSet::canonical(), 0x2000).unwrap();
        let rows = table_rows(&art);
        let jmp = rows.iter().find(|r| r.mnemonic == "jmp").unwrap();
        assert_eq!(jmp.kind, "dense");
        assert_eq!(
            jmp.modes,
            vec![
                ModeOpcode { mode: AddrMode::Abs, ordinal: 8, opcode: 0x4c },
                ModeOpcode { mode: AddrMode::Ind, ordinal: 11, opcode: 0x6c },
                ModeOpcode { mode: AddrMode::IaX, ordinal: 16, opcode: 0x7c },
            ]
        );
        assert_eq!(rows[0].address, 0x2000);
    }

    #[test]
    fn groups_cover_every_mode_used() {
        let set = InstructionSet::canonical();
        let groups = mode_groups(&set);
        assert_eq!(groups.len(), AddrMode::COUNT);
        let zpr = groups.iter().find(|g| g.mode == AddrMode::Zpr).unwrap();
        assert_eq!(zpr.instructions.len(), 16);
    }
}
