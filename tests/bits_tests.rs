use dmr_trunkctl::{Bits, DmrError};

fn bits_from_hex(hex: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(hex.len() * 4);
    for c in hex.chars() {
        let nibble = c.to_digit(16).unwrap();
        for shift in (0..4).rev() {
            out.push(((nibble >> shift) & 1) as u8);
        }
    }
    out
}

#[test]
fn reads_a_full_96_bit_csbk_header() {
    // lb=0 pf=0 opcode=49 (TV_GRANT) fid=0x00
    let raw = bits_from_hex("31" .to_owned() + "00" + &"00".repeat(10));
    let b = Bits::new(&raw);
    assert_eq!(b.read(2, 6, "opcode").unwrap(), 49);
    assert_eq!(b.read(8, 8, "fid").unwrap(), 0);
}

#[test]
fn oversized_width_is_malformed_not_a_panic() {
    let raw = vec![0u8; 10];
    let b = Bits::new(&raw);
    assert_eq!(b.read(0, 65, "field"), Err(DmrError::Malformed { field: "field" }));
}

#[test]
fn out_of_bounds_offset_is_malformed_not_a_panic() {
    let raw = vec![0u8; 96];
    let b = Bits::new(&raw);
    assert_eq!(b.read(90, 10, "field"), Err(DmrError::Malformed { field: "field" }));
}

#[test]
fn reading_past_a_176_bit_mbc_extended_pdu_fails_cleanly() {
    let raw = vec![0u8; 176];
    let b = Bits::new(&raw);
    assert!(b.read(170, 13, "rx_step").is_err());
    assert!(b.read(163, 13, "rx_step").is_ok());
}
