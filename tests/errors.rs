use w65c02_opgen::{generate, AddrMode, BuildError, InstructionRecord, InstructionSet, MnemonicTrie};

fn rec(opcode: u8, mnemonic: &str, mode: AddrMode) -> InstructionRecord {
    InstructionRecord { opcode, mnemonic: mnemonic.into(), mode, reserved: false }
}

fn set(records: Vec<InstructionRecord>) -> InstructionSet {
    InstructionSet::from_records(records).unwrap()
}

#[test]
fn duplicate_opcode_is_fatal() {
    let s = set(vec![rec(0xa9, "lda", AddrMode::Imm), rec(0xa9, "ldx", AddrMode::Imm)]);
    let err = generate(&s, 0x2000).unwrap_err();
    assert!(matches!(err, BuildError::DuplicateOpcode { opcode: 0xa9, .. }));
    assert!(err.to_string().contains("0xa9"));
}

#[test]
fn duplicate_mode_is_fatal() {
    let s = set(vec![rec(0xa9, "lda", AddrMode::Imm), rec(0xaa, "lda", AddrMode::Imm)]);
    assert!(matches!(generate(&s, 0x2000), Err(BuildError::DuplicateMode { .. })));
}

#[test]
fn reserved_alias_may_repeat_a_mode() {
    let mut alias = rec(0x03, "nop", AddrMode::Imp);
    alias.reserved = true;
    let s = set(vec![rec(0xea, "nop", AddrMode::Imp), alias]);
    let art = generate(&s, 0x2000).unwrap();
    assert_eq!(art.lookup("nop", AddrMode::Imp), Some(0xea));
}

#[test]
fn reserved_alias_still_claims_its_opcode() {
    let mut alias = rec(0xea, "nop", AddrMode::Imm);
    alias.reserved = true;
    let s = set(vec![rec(0xea, "nop", AddrMode::Imp), alias]);
    assert!(matches!(generate(&s, 0x2000), Err(BuildError::DuplicateOpcode { .. })));
}

#[test]
fn ambiguous_mnemonics_fail_before_dispatch() {
    let err = MnemonicTrie::build(["stack", "stacy"]).unwrap_err();
    assert!(matches!(err, BuildError::AmbiguousMnemonic { .. }));
}

#[test]
fn malformed_json_is_reported() {
    assert!(matches!(InstructionSet::from_json("[{]"), Err(BuildError::Json(_))));
    assert!(matches!(
        InstructionSet::from_json(r#"[{"opcode":1,"mnemonic":"lda","mode":"Bogus"}]"#),
        Err(BuildError::Json(_))
    ));
}
