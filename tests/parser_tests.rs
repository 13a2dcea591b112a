mod support;

use dmr_trunkctl::csbk::event::{BroadcastSubtype, CsbkEvent, ProtectKind};
use dmr_trunkctl::{parse_csbk, Bits, DmrError};
use support::set_field;

#[test]
fn c_ahoy_decodes_service_kind_and_group_flag() {
    let mut raw = vec![0u8; 96];
    set_field(&mut raw, 25, 1, 1); // gi
    set_field(&mut raw, 28, 4, 5); // svc_kind
    set_field(&mut raw, 32, 24, 3101);
    set_field(&mut raw, 56, 24, 1234567);
    let b = Bits::new(&raw);
    match parse_csbk(&b, 0, 28, 0).unwrap() {
        CsbkEvent::Ahoy { service_kind, target, source, group_flag } => {
            assert_eq!(service_kind, 5);
            assert_eq!(target, 3101);
            assert_eq!(source, 1234567);
            assert!(group_flag);
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn c_bcast_decodes_every_named_subtype() {
    let cases = [
        (0, BroadcastSubtype::AnnounceWithdrawTscc),
        (1, BroadcastSubtype::CallTimer),
        (2, BroadcastSubtype::VoteNow),
        (3, BroadcastSubtype::LocalTime),
        (4, BroadcastSubtype::MassReg),
        (5, BroadcastSubtype::ChanFreq),
        (6, BroadcastSubtype::AdjacentSite),
        (7, BroadcastSubtype::GenSiteParams),
        (0x1E, BroadcastSubtype::ManufacturerSpecific(0x1E)),
        (0x1F, BroadcastSubtype::ManufacturerSpecific(0x1F)),
        (9, BroadcastSubtype::Reserved(9)),
    ];
    for (bits, expected) in cases {
        let mut raw = vec![0u8; 96];
        set_field(&mut raw, 16, 5, bits);
        let b = Bits::new(&raw);
        match parse_csbk(&b, 0, 40, 0).unwrap() {
            CsbkEvent::Broadcast { subtype } => assert_eq!(subtype, expected),
            other => panic!("unexpected: {other:?}"),
        }
    }
}

#[test]
fn p_protect_decodes_kind_and_group_flag() {
    let mut raw = vec![0u8; 96];
    set_field(&mut raw, 28, 3, 1); // EnPtt
    set_field(&mut raw, 31, 1, 1); // gi
    set_field(&mut raw, 32, 24, 42);
    set_field(&mut raw, 56, 24, 99);
    let b = Bits::new(&raw);
    match parse_csbk(&b, 0, 47, 0).unwrap() {
        CsbkEvent::Protect { kind, group_flag, target, source } => {
            assert_eq!(kind, ProtectKind::EnPtt);
            assert!(group_flag);
            assert_eq!(target, 42);
            assert_eq!(source, 99);
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn preamble_uses_24_bit_fields_outside_xpt_dialect() {
    let mut raw = vec![0u8; 96];
    set_field(&mut raw, 16, 1, 1); // content_is_data
    set_field(&mut raw, 17, 1, 0); // gi (private)
    set_field(&mut raw, 24, 8, 3); // blocks
    set_field(&mut raw, 32, 24, 42);
    set_field(&mut raw, 56, 24, 99);
    let b = Bits::new(&raw);
    match parse_csbk(&b, 0, 61, 0).unwrap() {
        CsbkEvent::Preamble { content_is_data, group_flag, target, source, blocks, target_hash } => {
            assert!(content_is_data);
            assert!(!group_flag);
            assert_eq!(target, 42);
            assert_eq!(source, 99);
            assert_eq!(blocks, 3);
            assert_eq!(target_hash, None);
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn preamble_under_xpt_dialect_uses_16_bit_fields_and_hashes_private_target() {
    let mut raw = vec![0u8; 96];
    set_field(&mut raw, 17, 1, 0); // private (gi=0)
    set_field(&mut raw, 40, 16, 0xABCD);
    set_field(&mut raw, 64, 16, 0x1234);
    let b = Bits::new(&raw);
    match parse_csbk(&b, 0, 61, 0x68).unwrap() {
        CsbkEvent::Preamble { target, source, target_hash, .. } => {
            assert_eq!(target, 0xABCD);
            assert_eq!(source, 0x1234);
            assert!(target_hash.is_some());
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn preamble_under_xpt_dialect_group_call_carries_no_hash() {
    let mut raw = vec![0u8; 96];
    set_field(&mut raw, 17, 1, 1); // group call
    set_field(&mut raw, 40, 16, 0xABCD);
    let b = Bits::new(&raw);
    match parse_csbk(&b, 0, 61, 0x68).unwrap() {
        CsbkEvent::Preamble { target_hash, .. } => assert_eq!(target_hash, None),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn unknown_fid_is_reported_before_any_opcode_dispatch() {
    let raw = vec![0u8; 96];
    let b = Bits::new(&raw);
    assert_eq!(parse_csbk(&b, 0x42, 49, 0), Err(DmrError::UnknownFid(0x42)));
}

#[test]
fn connect_plus_grant_decodes_src_grp_lcn_slot() {
    let mut raw = vec![0u8; 96];
    set_field(&mut raw, 16, 24, 555666);
    set_field(&mut raw, 40, 24, 3101);
    set_field(&mut raw, 64, 4, 9);
    set_field(&mut raw, 68, 1, 1);
    let b = Bits::new(&raw);
    match parse_csbk(&b, 0x06, 0x03, 0).unwrap() {
        CsbkEvent::ConnectPlusGrant { src, grp, lcn, slot } => {
            assert_eq!(src, 555666);
            assert_eq!(grp, 3101);
            assert_eq!(lcn, 9);
            assert_eq!(slot, 1);
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn cap_plus_unknown_opcode_preserves_raw_payload_verbatim() {
    let raw = vec![0xAAu8; 96];
    let b = Bits::new(&raw);
    match parse_csbk(&b, 0x10, 0x3A, 0).unwrap() {
        CsbkEvent::CapPlusUnknown { raw: preserved } => assert_eq!(preserved, raw),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn xpt_adjacent_reads_four_16_bit_records() {
    let mut raw = vec![0u8; 96];
    for i in 0..4u64 {
        let offset = 16 + (i as usize) * 16;
        set_field(&mut raw, offset, 5, i + 1);
        set_field(&mut raw, offset + 8, 4, i + 2);
    }
    let b = Bits::new(&raw);
    match parse_csbk(&b, 0x68, 0x0B, 0).unwrap() {
        CsbkEvent::XptAdjacent { entries } => {
            assert_eq!(entries[0], (1, 2));
            assert_eq!(entries[3], (4, 5));
        }
        other => panic!("unexpected: {other:?}"),
    }
}
