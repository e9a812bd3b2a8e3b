//! Field element helpers: modulus comparison and text encodings

use halo2_base::utils::ScalarField;

fn normalize_modulus(hex: &str) -> String {
    let digits = hex.trim_start_matches("0x").trim_start_matches("0X");
    digits.trim_start_matches('0').to_ascii_lowercase()
}

/// Whether `F` is the field whose modulus is `modulus_hex`
pub fn is_native<F: ScalarField>(modulus_hex: &str) -> bool {
    normalize_modulus(F::MODULUS) == normalize_modulus(modulus_hex)
}

/// Bytes needed to store one element of `F`
pub fn element_bytes<F: ScalarField>() -> usize {
    (F::NUM_BITS as usize + 7) / 8
}

/// Little-endian hex encoding
pub fn fe_to_hex<F: ScalarField>(fe: &F) -> String {
    hex::encode(fe.to_bytes_le())
}

/// Inverse of [`fe_to_hex`]; `None` for malformed or non-canonical input
pub fn fe_from_hex<F: ScalarField>(text: &str) -> Option<F> {
    let bytes = hex::decode(text).ok()?;
    let mut repr = F::Repr::default();
    if repr.as_ref().len() != bytes.len() {
        return None;
    }
    repr.as_mut().copy_from_slice(&bytes);
    let fe: F = Option::from(F::from_repr(repr))?;
    // reject encodings whose representation is not little-endian
    (fe.to_bytes_le() == bytes).then_some(fe)
}

/// Integer value of `fe` if it is below 2^64
pub fn fe_to_u64<F: ScalarField>(fe: &F) -> Option<u64> {
    let low = fe.get_lower_64();
    (F::from(low) == *fe).then_some(low)
}

/// Parse a decimal string, reducing by the modulus
pub fn fe_from_decimal<F: ScalarField>(text: &str) -> Option<F> {
    F::from_str_vartime(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo2_base::halo2_proofs::halo2curves::bn256::{Fq, Fr};

    const BN254_BASE: &str = "0x30644e72e131a029b85045b68181585d97816a916871ca8d3c208c16d87cfd47";

    #[test]
    fn test_is_native() {
        assert!(is_native::<Fq>(BN254_BASE));
        assert!(is_native::<Fq>(&BN254_BASE.to_uppercase().replace("0X", "0x")));
        assert!(!is_native::<Fr>(BN254_BASE));
    }

    #[test]
    fn test_decimal_and_integer_conversions() {
        let fe: Fr = fe_from_decimal("1234567890123").unwrap();
        assert_eq!(fe, Fr::from(1234567890123u64));
        assert_eq!(fe_to_u64(&fe), Some(1234567890123));
        assert_eq!(fe_to_u64(&Fr::from(u64::MAX)), Some(u64::MAX));
        assert_eq!(fe_to_u64(&(Fr::from(u64::MAX) + Fr::from(1u64))), None);
        assert_eq!(fe_to_u64(&-Fr::from(1u64)), None);
        assert!(fe_from_decimal::<Fr>("12a").is_none());
        assert!(fe_from_decimal::<Fr>("").is_none());
    }

    #[test]
    fn test_hex_encoding() {
        let fe = -Fr::from(42u64);
        let text = fe_to_hex(&fe);
        assert_eq!(fe_from_hex::<Fr>(&text), Some(fe));
        assert_eq!(fe_to_hex(&Fr::from(1u64)), format!("01{}", "00".repeat(31)));
        assert!(fe_from_hex::<Fr>("00").is_none());
        assert!(fe_from_hex::<Fr>(&"ff".repeat(32)).is_none());
        assert_eq!(element_bytes::<Fr>(), 32);
    }
}
