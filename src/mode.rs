use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// W65C02 addressing modes.
///
/// The discriminant is the mode ordinal used by every generated table: dense
/// entries store the opcode for a mode at byte `1 + ordinal`, single-mode
/// entries store the ordinal itself. Reordering these variants breaks every
/// consumer of previously generated tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum AddrMode {
    Imp = 1,
    Acc = 2,
    Imm = 3,
    Zp = 4,
    ZpX = 5,
    ZpY = 6,
    Rel = 7,
    Abs = 8,
    AbsX = 9,
    AbsY = 10,
    Ind = 11,
    IzX = 12,
    IzY = 13,
    Zpr = 14,
    Izp = 15,
    IaX = 16,
}

impl AddrMode {
    pub const COUNT: usize = 16;

    pub const ALL: [AddrMode; AddrMode::COUNT] = [
        AddrMode::Imp,
        AddrMode::Acc,
        AddrMode::Imm,
        AddrMode::Zp,
        AddrMode::ZpX,
        AddrMode::ZpY,
        AddrMode::Rel,
        AddrMode::Abs,
        AddrMode::AbsX,
        AddrMode::AbsY,
        AddrMode::Ind,
        AddrMode::IzX,
        AddrMode::IzY,
        AddrMode::Zpr,
        AddrMode::Izp,
        AddrMode::IaX,
    ];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn slot(self) -> usize {
        self as usize - 1
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            1..=16 => Some(Self::ALL[ordinal as usize - 1]),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AddrMode::Imp => "Imp",
            AddrMode::Acc => "Acc",
            AddrMode::Imm => "Imm",
            AddrMode::Zp => "Zp",
            AddrMode::ZpX => "ZpX",
            AddrMode::ZpY => "ZpY",
            AddrMode::Rel => "Rel",
            AddrMode::Abs => "Abs",
            AddrMode::AbsX => "AbsX",
            AddrMode::AbsY => "AbsY",
            AddrMode::Ind => "Ind",
            AddrMode::IzX => "IzX",
            AddrMode::IzY => "IzY",
            AddrMode::Zpr => "Zpr",
            AddrMode::Izp => "Izp",
            AddrMode::IaX => "IaX",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(n) = s.parse::<u8>() {
            return Self::from_ordinal(n);
        }
        Self::ALL.into_iter().find(|m| m.name().eq_ignore_ascii_case(s))
    }
}

impl std::fmt::Display for AddrMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModeSet: u16 {
const IMP = 1 << 0;
const ACC = 1 << 1;
const IMM = 1 << 2;
const ZP = 1 << 3;
const ZPX = 1 << 4;
const ZPY = 1 << 5;
const REL = 1 << 6;
const ABS = 1 << 7;
const ABSX = 1 << 8;
const ABSY = 1 << 9;
const IND = 1 << 10;
const IZX = 1 << 11;
const IZY = 1 << 12;
const ZPR = 1 << 13;
const IZP = 1 << 14;
const IAX = 1 << 15;
}
}

impl ModeSet {
    pub fn of(mode: AddrMode) -> Self {
        Self::from_bits_retain(1 << mode.slot())
    }

    pub fn has(self, mode: AddrMode) -> bool {
        self.contains(Self::of(mode))
    }

    pub fn modes(self) -> impl Iterator<Item = AddrMode> {
        AddrMode::ALL.into_iter().filter(move |m| self.has(*m))
    }
}

impl From<AddrMode> for ModeSet {
    fn from(mode: AddrMode) -> Self {
        Self::of(mode)
    }
}
