use crate::mode::AddrMode;
use crate::mode::AddrMode::*;

/// One row of the compiled-in opcode map.
#[derive(Debug, Clone, Copy)]
pub struct InstrDesc {
    pub opcode: u8,
    pub mnemonic: &'static str,
    pub mode: AddrMode,
    /// Repeats a (mnemonic, mode) pair already taken by another row. Occupies
    /// its opcode but is never selected when assembling `mnemonic`.
    pub reserved: bool,
}

const fn desc(opcode: u8, mnemonic: &'static str, mode: AddrMode) -> InstrDesc {
    InstrDesc { opcode, mnemonic, mode, reserved: false }
}

const fn reserved(opcode: u8, mnemonic: &'static str, mode: AddrMode) -> InstrDesc {
    InstrDesc { opcode, mnemonic, mode, reserved: true }
}

/// W65C02 opcode map, one row per opcode byte in ascending order.
pub const TABLE: &[InstrDesc; 256] = &[
    desc(0x00, "brk", Imp),
    desc(0x01, "ora", IzX),
    desc(0x02, "nop", Imm),
    reserved(0x03, "nop", Imp),
    desc(0x04, "tsb", Zp),
    desc(0x05, "ora", Zp),
    desc(0x06, "asl", Zp),
    desc(0x07, "rmb0", Zp),
    desc(0x08, "php", Imp),
    desc(0x09, "ora", Imm),
    desc(0x0a, "asl", Acc),
    reserved(0x0b, "nop", Imp),
    desc(0x0c, "tsb", Abs),
    desc(0x0d, "ora", Abs),
    desc(0x0e, "asl", Abs),
    desc(0x0f, "bbr0", Zpr),
    desc(0x10, "bpl", Rel),
    desc(0x11, "ora", IzY),
    desc(0x12, "ora", Izp),
    reserved(0x13, "nop", Imp),
    desc(0x14, "trb", Zp),
    desc(0x15, "ora", ZpX),
    desc(0x16, "asl", ZpX),
    desc(0x17, "rmb1", Zp),
    desc(0x18, "clc", Imp),
    desc(0x19, "ora", AbsY),
    desc(0x1a, "inc", Acc),
    reserved(0x1b, "nop", Imp),
    desc(0x1c, "trb", Abs),
    desc(0x1d, "ora", AbsX),
    desc(0x1e, "asl", AbsX),
    desc(0x1f, "bbr1", Zpr),
    desc(0x20, "jsr", Abs),
    desc(0x21, "and", IzX),
    reserved(0x22, "nop", Imm),
    reserved(0x23, "nop", Imp),
    desc(0x24, "bit", Zp),
    desc(0x25, "and", Zp),
    desc(0x26, "rol", Zp),
    desc(0x27, "rmb2", Zp),
    desc(0x28, "plp", Imp),
    desc(0x29, "and", Imm),
    desc(0x2a, "rol", Acc),
    reserved(0x2b, "nop", Imp),
    desc(0x2c, "bit", Abs),
    desc(0x2d, "and", Abs),
    desc(0x2e, "rol", Abs),
    desc(0x2f, "bbr2", Zpr),
    desc(0x30, "bmi", Rel),
    desc(0x31, "and", IzY),
    desc(0x32, "and", Izp),
    reserved(0x33, "nop", Imp),
    desc(0x34, "bit", ZpX),
    desc(0x35, "and", ZpX),
    desc(0x36, "rol", ZpX),
    desc(0x37, "rmb3", Zp),
    desc(0x38, "sec", Imp),
    desc(0x39, "and", AbsY),
    desc(0x3a, "dec", Acc),
    reserved(0x3b, "nop", Imp),
    desc(0x3c, "bit", AbsX),
    desc(0x3d, "and", AbsX),
    desc(0x3e, "rol", AbsX),
    desc(0x3f, "bbr3", Zpr),
    desc(0x40, "rti", Imp),
    desc(0x41, "eor", IzX),
    reserved(0x42, "nop", Imm),
    reserved(0x43, "nop", Imp),
    desc(0x44, "nop", Zp),
    desc(0x45, "eor", Zp),
    desc(0x46, "lsr", Zp),
    desc(0x47, "rmb4", Zp),
    desc(0x48, "pha", Imp),
    desc(0x49, "eor", Imm),
    desc(0x4a, "lsr", Acc),
    reserved(0x4b, "nop", Imp),
    desc(0x4c, "jmp", Abs),
    desc(0x4d, "eor", Abs),
    desc(0x4e, "lsr", Abs),
    desc(0x4f, "bbr4", Zpr),
    desc(0x50, "bvc", Rel),
    desc(0x51, "eor", IzY),
    desc(0x52, "eor", Izp),
    reserved(0x53, "nop", Imp),
    desc(0x54, "nop", ZpX),
    desc(0x55, "eor", ZpX),
    desc(0x56, "lsr", ZpX),
    desc(0x57, "rmb5", Zp),
    desc(0x58, "cli", Imp),
    desc(0x59, "eor", AbsY),
    desc(0x5a, "phy", Imp),
    reserved(0x5b, "nop", Imp),
    desc(0x5c, "nop", Abs),
    desc(0x5d, "eor", AbsX),
    desc(0x5e, "lsr", AbsX),
    desc(0x5f, "bbr5", Zpr),
    desc(0x60, "rts", Imp),
    desc(0x61, "adc", IzX),
    reserved(0x62, "nop", Imm),
    reserved(0x63, "nop", Imp),
    desc(0x64, "stz", Zp),
    desc(0x65, "adc", Zp),
    desc(0x66, "ror", Zp),
    desc(0x67, "rmb6", Zp),
    desc(0x68, "pla", Imp),
    desc(0x69, "adc", Imm),
    desc(0x6a, "ror", Acc),
    reserved(0x6b, "nop", Imp),
    desc(0x6c, "jmp", Ind),
    desc(0x6d, "adc", Abs),
    desc(0x6e, "ror", Abs),
    desc(0x6f, "bbr6", Zpr),
    desc(0x70, "bvs", Rel),
    desc(0x71, "adc", IzY),
    desc(0x72, "adc", Izp),
    reserved(0x73, "nop", Imp),
    desc(0x74, "stz", ZpX),
    desc(0x75, "adc", ZpX),
    desc(0x76, "ror", ZpX),
    desc(0x77, "rmb7", Zp),
    desc(0x78, "sei", Imp),
    desc(0x79, "adc", AbsY),
    desc(0x7a, "ply", Imp),
    reserved(0x7b, "nop", Imp),
    desc(0x7c, "jmp", IaX),
    desc(0x7d, "adc", AbsX),
    desc(0x7e, "ror", AbsX),
    desc(0x7f, "bbr7", Zpr),
    desc(0x80, "bra", Rel),
    desc(0x81, "sta", IzX),
    reserved(0x82, "nop", Imm),
    reserved(0x83, "nop", Imp),
    desc(0x84, "sty", Zp),
    desc(0x85, "sta", Zp),
    desc(0x86, "stx", Zp),
    desc(0x87, "smb0", Zp),
    desc(0x88, "dey", Imp),
    desc(0x89, "bit", Imm),
    desc(0x8a, "txa", Imp),
    reserved(0x8b, "nop", Imp),
    desc(0x8c, "sty", Abs),
    desc(0x8d, "sta", Abs),
    desc(0x8e, "stx", Abs),
    desc(0x8f, "bbs0", Zpr),
    desc(0x90, "bcc", Rel),
    desc(0x91, "sta", IzY),
    desc(0x92, "sta", Izp),
    reserved(0x93, "nop", Imp),
    desc(0x94, "sty", ZpX),
    desc(0x95, "sta", ZpX),
    desc(0x96, "stx", ZpY),
    desc(0x97, "smb1", Zp),
    desc(0x98, "tya", Imp),
    desc(0x99, "sta", AbsY),
    desc(0x9a, "txs", Imp),
    reserved(0x9b, "nop", Imp),
    desc(0x9c, "stz", Abs),
    desc(0x9d, "sta", AbsX),
    desc(0x9e, "stz", AbsX),
    desc(0x9f, "bbs1", Zpr),
    desc(0xa0, "ldy", Imm),
    desc(0xa1, "lda", IzX),
    desc(0xa2, "ldx", Imm),
    reserved(0xa3, "nop", Imp),
    desc(0xa4, "ldy", Zp),
    desc(0xa5, "lda", Zp),
    desc(0xa6, "ldx", Zp),
    desc(0xa7, "smb2", Zp),
    desc(0xa8, "tay", Imp),
    desc(0xa9, "lda", Imm),
    desc(0xaa, "tax", Imp),
    reserved(0xab, "nop", Imp),
    desc(0xac, "ldy", Abs),
    desc(0xad, "lda", Abs),
    desc(0xae, "ldx", Abs),
    desc(0xaf, "bbs2", Zpr),
    desc(0xb0, "bcs", Rel),
    desc(0xb1, "lda", IzY),
    desc(0xb2, "lda", Izp),
    reserved(0xb3, "nop", Imp),
    desc(0xb4, "ldy", ZpX),
    desc(0xb5, "lda", ZpX),
    desc(0xb6, "ldx", ZpY),
    desc(0xb7, "smb3", Zp),
    desc(0xb8, "clv", Imp),
    desc(0xb9, "lda", AbsY),
    desc(0xba, "tsx", Imp),
    reserved(0xbb, "nop", Imp),
    desc(0xbc, "ldy", AbsX),
    desc(0xbd, "lda", AbsX),
    desc(0xbe, "ldx", AbsY),
    desc(0xbf, "bbs3", Zpr),
    desc(0xc0, "cpy", Imm),
    desc(0xc1, "cmp", IzX),
    reserved(0xc2, "nop", Imm),
    reserved(0xc3, "nop", Imp),
    desc(0xc4, "cpy", Zp),
    desc(0xc5, "cmp", Zp),
    desc(0xc6, "dec", Zp),
    desc(0xc7, "smb4", Zp),
    desc(0xc8, "iny", Imp),
    desc(0xc9, "cmp", Imm),
    desc(0xca, "dex", Imp),
    desc(0xcb, "wai", Imp),
    desc(0xcc, "cpy", Abs),
    desc(0xcd, "cmp", Abs),
    desc(0xce, "dec", Abs),
    desc(0xcf, "bbs4", Zpr),
    desc(0xd0, "bne", Rel),
    desc(0xd1, "cmp", IzY),
    desc(0xd2, "cmp", Izp),
    reserved(0xd3, "nop", Imp),
    reserved(0xd4, "nop", ZpX),
    desc(0xd5, "cmp", ZpX),
    desc(0xd6, "dec", ZpX),
    desc(0xd7, "smb5", Zp),
    desc(0xd8, "cld", Imp),
    desc(0xd9, "cmp", AbsY),
    desc(0xda, "phx", Imp),
    desc(0xdb, "stp", Imp),
    reserved(0xdc, "nop", Abs),
    desc(0xdd, "cmp", AbsX),
    desc(0xde, "dec", AbsX),
    desc(0xdf, "bbs5", Zpr),
    desc(0xe0, "cpx", Imm),
    desc(0xe1, "sbc", IzX),
    reserved(0xe2, "nop", Imm),
    reserved(0xe3, "nop", Imp),
    desc(0xe4, "cpx", Zp),
    desc(0xe5, "sbc", Zp),
    desc(0xe6, "inc", Zp),
    desc(0xe7, "smb6", Zp),
    desc(0xe8, "inx", Imp),
    desc(0xe9, "sbc", Imm),
    desc(0xea, "nop", Imp),
    reserved(0xeb, "nop", Imp),
    desc(0xec, "cpx", Abs),
    desc(0xed, "sbc", Abs),
    desc(0xee, "inc", Abs),
    desc(0xef, "bbs6", Zpr),
    desc(0xf0, "beq", Rel),
    desc(0xf1, "sbc", IzY),
    desc(0xf2, "sbc", Izp),
    reserved(0xf3, "nop", Imp),
    reserved(0xf4, "nop", ZpX),
    desc(0xf5, "sbc", ZpX),
    desc(0xf6, "inc", ZpX),
    desc(0xf7, "smb7", Zp),
    desc(0xf8, "sed", Imp),
    desc(0xf9, "sbc", AbsY),
    desc(0xfa, "plx", Imp),
    reserved(0xfb, "nop", Imp),
    desc(0xfc, "nop", AbsX),
    desc(0xfd, "sbc", AbsX),
    desc(0xfe, "inc", AbsX),
    desc(0xff, "bbs7", Zpr),
];
