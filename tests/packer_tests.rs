//! tests/packer_tests.rs
//! Wire format: component order, legacy records, structural rejection

use adaptcrypt_rs::consts::LEGACY_PBKDF2_ROUNDS;
use adaptcrypt_rs::{pack, unpack, AdapterError, EncryptedRecord};

fn record(rounds: u32) -> EncryptedRecord {
    EncryptedRecord {
        content: "q83vASNF".into(),
        iv: "0123456789abcdef0123456789abcdef".into(),
        salt: "fedcba9876543210fedcba9876543210".into(),
        auth_tag: "00ff".into(),
        rounds,
    }
}

#[test]
fn pack_then_unpack_preserves_every_field() {
    let original = record(5560);
    let wire = pack(&original);
    assert_eq!(wire.split('$').count(), 5);
    assert!(wire.ends_with("$5560"));
    assert_eq!(unpack(&wire).unwrap(), original);
}

#[test]
fn legacy_four_component_record_gets_default_rounds() {
    let parsed = unpack("content$iv$salt$hmac").unwrap();
    assert_eq!(parsed.rounds, LEGACY_PBKDF2_ROUNDS);
    assert_eq!(parsed.content, "content");
    assert_eq!(parsed.iv, "iv");
    assert_eq!(parsed.salt, "salt");
    assert_eq!(parsed.auth_tag, "hmac");
}

#[test]
fn five_component_record_parses_rounds() {
    assert_eq!(unpack("c$i$s$h$1000").unwrap().rounds, 1000);
    assert_eq!(unpack("c$i$s$h$250000").unwrap().rounds, 250_000);
}

#[test]
fn wrong_component_counts_are_format_errors() {
    let cases = [
        "",
        "onlyone",
        "a$b",
        "a$b$c",
        "a$b$c$d$1000$extra",
        "a$b$c$d$e$f$g",
    ];
    for wire in cases {
        let err = unpack(wire).unwrap_err();
        assert!(
            matches!(err, AdapterError::Format(_)),
            "{wire:?}: expected Format error, got {err:?}"
        );
    }
}

#[test]
fn non_numeric_rounds_is_a_format_error() {
    let err = unpack("a$b$c$d$lots").unwrap_err();
    assert!(matches!(err, AdapterError::Format(_)));
    assert!(err.to_string().contains("base-10"));
}

#[test]
fn empty_components_are_structurally_fine() {
    // The packer does not validate component contents.
    let parsed = unpack("$$$").unwrap();
    assert_eq!(parsed.content, "");
    assert_eq!(parsed.rounds, LEGACY_PBKDF2_ROUNDS);
}
