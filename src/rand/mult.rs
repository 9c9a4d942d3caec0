//! Odd 64-bit multipliers for the state transition.
//!
//! The first five are the xxHash64 primes; the rest are well-known odd
//! mixing constants. Every entry is odd, so multiplication stays a bijection.

pub const MULTIPLIERS: [u64; 10] = [
    0x9E37_79B1_85EB_CA87,
    0xC2B2_AE3D_27D4_EB4F,
    0x1656_67B1_9E37_79F9,
    0x85EB_CA77_C2B2_AE63,
    0x27D4_EB2F_1656_67C5,
    0x9E37_79B9_7F4A_7C15,
    0xBF58_476D_1CE4_E5B9,
    0x94D0_49BB_1331_11EB,
    0xFF51_AFD7_ED55_8CCD,
    0xC4CE_B9FE_1A85_EC53,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_multipliers_odd() {
        assert!(MULTIPLIERS.iter().all(|m| m & 1 == 1));
    }
}
