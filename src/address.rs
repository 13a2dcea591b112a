//! # Address Decoder
//!
//! Maps the small set of DMR-reserved 24-bit gateway identifiers to their
//! well-known names. Everything outside the reserved ranges is an ordinary
//! radio ID or talkgroup and is left to the caller to label.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// DMR-reserved gateway identifiers and all-call broadcast ids, keyed by
/// their 24-bit value. Built lazily once per process, the way the teacher's
/// `vendors::manufacturer::KNOWN_MANUFACTURERS` table is.
static RESERVED_IDS: Lazy<HashMap<u32, &'static str>> = Lazy::new(|| {
    let mut map = HashMap::new();
    // DMR-reserved gateway identifiers, 0xFFFEC0..=0xFFFED7 in order.
    for (id, label) in [
        (0xFFFEC0, "PSTNI"),
        (0xFFFEC1, "PABXI"),
        (0xFFFEC2, "LINEI"),
        (0xFFFEC3, "IPI"),
        (0xFFFEC4, "SUPLI"),
        (0xFFFEC5, "SDMI"),
        (0xFFFEC6, "REGI"),
        (0xFFFEC7, "MSI"),
        (0xFFFEC8, "RESERVED"),
        (0xFFFEC9, "DIVERTI"),
        (0xFFFECA, "TSI"),
        (0xFFFECB, "DISPATI"),
        (0xFFFECC, "STUNI"),
        (0xFFFECD, "AUTHI"),
        (0xFFFECE, "GPI"),
        (0xFFFECF, "KILLI"),
        (0xFFFED0, "PSTNDI"),
        (0xFFFED1, "PABXDI"),
        (0xFFFED2, "LINEDI"),
        (0xFFFED3, "DISPATDI"),
        (0xFFFED4, "ALLMSI"),
        (0xFFFED5, "IPDI"),
        (0xFFFED6, "DGNAI"),
        (0xFFFED7, "TATTSI"),
        // The three all-call broadcast identifiers at the top of the 24-bit space.
        (0xFFFFFD, "ALLMSIDL"),
        (0xFFFFFE, "ALLMSIZ"),
        (0xFFFFFF, "ALLMSID"),
    ] {
        map.insert(id, label);
    }
    map
});

/// Classifies a 24-bit DMR ID as a well-known gateway identifier, if it is one.
pub fn classify(id: u32) -> Option<&'static str> {
    RESERVED_IDS.get(&id).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_every_reserved_id() {
        for (id, label) in RESERVED_IDS.iter() {
            assert_eq!(classify(*id), Some(*label));
        }
    }

    #[test]
    fn boundary_values() {
        assert_eq!(classify(0xFFFEC0), Some("PSTNI"));
        assert_eq!(classify(0xFFFED7), Some("TATTSI"));
        assert_eq!(classify(0xFFFFFD), Some("ALLMSIDL"));
        assert_eq!(classify(0xFFFFFF), Some("ALLMSID"));
    }

    #[test]
    fn ordinary_ids_are_unclassified() {
        assert_eq!(classify(0), None);
        assert_eq!(classify(1234567), None);
        assert_eq!(classify(0xFFFEBF), None); // one below the reserved block
        assert_eq!(classify(0xFFFED8), None); // one above the reserved block
        assert_eq!(classify(0xFFFFFC), None); // one below the all-call block
    }
}
