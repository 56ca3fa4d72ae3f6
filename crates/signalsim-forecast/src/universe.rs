//! Candidate universe for auto-selection.

/// EGX-listed instruments considered by the auto-selector.
///
/// Liquid names across banking, real estate, industrials, consumer, and
/// healthcare. Order is not significant; ranking is score-driven.
pub const CANDIDATE_UNIVERSE: &[&str] = &[
    "COMI.CA", // Commercial International Bank
    "HRHO.CA", // EFG Holding
    "ADIB.CA", // Abu Dhabi Islamic Bank Egypt
    "CIEB.CA", // Credit Agricole Egypt
    "FWRY.CA", // Fawry
    "EFIH.CA", // e-finance
    "BTFH.CA", // Beltone Holding
    "ETEL.CA", // Telecom Egypt
    "TMGH.CA", // Talaat Moustafa Group
    "PHDC.CA", // Palm Hills Developments
    "OCDI.CA", // SODIC
    "EMFD.CA", // Emaar Misr
    "MNHD.CA", // Madinet Masr
    "HELI.CA", // Heliopolis Housing
    "ORHD.CA", // Orascom Development Egypt
    "TALM.CA", // Taaleem Management Services
    "SWDY.CA", // Elsewedy Electric
    "ORAS.CA", // Orascom Construction
    "ESRS.CA", // Ezz Steel
    "EGAL.CA", // Egypt Aluminum
    "ABUK.CA", // Abu Qir Fertilizers
    "MFPC.CA", // Misr Fertilizers (MOPCO)
    "SKPC.CA", // Sidi Kerir Petrochemicals
    "AMOC.CA", // Alexandria Mineral Oils
    "EAST.CA", // Eastern Company
    "JUFO.CA", // Juhayna Food Industries
    "DOMT.CA", // Domty
    "EFID.CA", // Edita Food Industries
    "ORWE.CA", // Oriental Weavers
    "CLHO.CA", // Cleopatra Hospitals
    "ISPH.CA", // Ibnsina Pharma
    "RMDA.CA", // Rameda Pharmaceuticals
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_universe_has_no_duplicates() {
        let unique: HashSet<_> = CANDIDATE_UNIVERSE.iter().collect();
        assert_eq!(unique.len(), CANDIDATE_UNIVERSE.len());
        assert!(CANDIDATE_UNIVERSE.len() >= 30);
    }

    #[test]
    fn test_universe_symbols_carry_exchange_suffix() {
        assert!(CANDIDATE_UNIVERSE.iter().all(|s| s.ends_with(".CA")));
    }
}
