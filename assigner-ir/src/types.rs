//! Declared operand types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prime fields an IR value can be declared over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    PallasBase,
    VestaBase,
    Bn254Base,
    Bn254Scalar,
    Secp256k1Base,
    Bls12381Base,
    Curve25519Base,
}

impl FieldKind {
    /// Field modulus as a big-endian hex string with `0x` prefix
    pub fn modulus_hex(self) -> &'static str {
        match self {
            FieldKind::PallasBase => {
                "0x40000000000000000000000000000000224698fc094cf91b992d30ed00000001"
            }
            FieldKind::VestaBase => {
                "0x40000000000000000000000000000000224698fc0994a8dd8c46eb2100000001"
            }
            FieldKind::Bn254Base => {
                "0x30644e72e131a029b85045b68181585d97816a916871ca8d3c208c16d87cfd47"
            }
            FieldKind::Bn254Scalar => {
                "0x30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000001"
            }
            FieldKind::Secp256k1Base => {
                "0xfffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f"
            }
            FieldKind::Bls12381Base => {
                "0x1a0111ea397fe69a4b1ba7b6434bacd764774b84f38512bf6730d2a0f6b0f6241eabfffeb153ffffb9feffffffffaaab"
            }
            FieldKind::Curve25519Base => {
                "0x7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffed"
            }
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::PallasBase => "pallas base field",
            FieldKind::VestaBase => "vesta base field",
            FieldKind::Bn254Base => "bn254 base field",
            FieldKind::Bn254Scalar => "bn254 scalar field",
            FieldKind::Secp256k1Base => "secp256k1 base field",
            FieldKind::Bls12381Base => "bls12-381 base field",
            FieldKind::Curve25519Base => "curve25519 base field",
        };
        f.write_str(name)
    }
}

/// Elliptic curve families an IR value can be declared over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    Pallas,
    Vesta,
    Bn254,
    Secp256k1,
    Bls12381,
    Curve25519,
}

impl CurveKind {
    /// All curve kinds reachable from the type system
    pub const ALL: [CurveKind; 6] = [
        CurveKind::Pallas,
        CurveKind::Vesta,
        CurveKind::Bn254,
        CurveKind::Secp256k1,
        CurveKind::Bls12381,
        CurveKind::Curve25519,
    ];

    /// Field the curve's point coordinates live in
    pub fn base_field(self) -> FieldKind {
        match self {
            CurveKind::Pallas => FieldKind::PallasBase,
            CurveKind::Vesta => FieldKind::VestaBase,
            CurveKind::Bn254 => FieldKind::Bn254Base,
            CurveKind::Secp256k1 => FieldKind::Secp256k1Base,
            CurveKind::Bls12381 => FieldKind::Bls12381Base,
            CurveKind::Curve25519 => FieldKind::Curve25519Base,
        }
    }
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CurveKind::Pallas => "pallas",
            CurveKind::Vesta => "vesta",
            CurveKind::Bn254 => "bn254",
            CurveKind::Secp256k1 => "secp256k1",
            CurveKind::Bls12381 => "bls12381",
            CurveKind::Curve25519 => "curve25519",
        };
        f.write_str(name)
    }
}

/// Declared type of an operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Type {
    /// Single element of a prime field
    Field(FieldKind),
    /// Affine curve point, materialized as a vector `[x, y]`
    Curve(CurveKind),
    /// Integer of the given bit width
    Int { bits: u32 },
    /// Address into program memory
    Pointer,
    /// Fixed-length vector of native field elements
    Vector { len: usize },
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Field(kind) => write!(f, "field<{kind}>"),
            Type::Curve(kind) => write!(f, "curve<{kind}>"),
            Type::Int { bits } => write!(f, "i{bits}"),
            Type::Pointer => f.write_str("ptr"),
            Type::Vector { len } => write!(f, "vector<{len}>"),
        }
    }
}
