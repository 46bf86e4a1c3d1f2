//! The Intel EPID 2.0 parameter set: the Barreto–Naehrig curve pair,
//! the field tower above it, and the pairing between them. Everything
//! a member or verifier context needs is derived from these constants
//! once, at context creation.

use crate::error::EpidError;
use epid_math::{BigNum, EcGroup, FieldElement, FiniteField, Pairing};

const Q_STR: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xfc, 0xf0, 0xcd,
    0x46, 0xe5, 0xf2, 0x5e, 0xee, 0x71, 0xa4, 0x9f,
    0x0c, 0xdc, 0x65, 0xfb, 0x12, 0x98, 0x0a, 0x82,
    0xd3, 0x29, 0x2d, 0xdb, 0xae, 0xd3, 0x30, 0x13,
];
const P_STR: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xfc, 0xf0, 0xcd,
    0x46, 0xe5, 0xf2, 0x5e, 0xee, 0x71, 0xa4, 0x9e,
    0x0c, 0xdc, 0x65, 0xfb, 0x12, 0x99, 0x92, 0x1a,
    0xf6, 0x2d, 0x53, 0x6c, 0xd1, 0x0b, 0x50, 0x0d,
];
const G2_X0: [u8; 32] = [
    0xe2, 0x01, 0x71, 0xc5, 0x4a, 0xa3, 0xda, 0x05,
    0x21, 0x67, 0x04, 0x13, 0x74, 0x3c, 0xcf, 0x22,
    0xd2, 0x5d, 0x52, 0x68, 0x3d, 0x32, 0x47, 0x0e,
    0xf6, 0x02, 0x13, 0x43, 0xbf, 0x28, 0x23, 0x94,
];
const G2_X1: [u8; 32] = [
    0x59, 0x2d, 0x1e, 0xf6, 0x53, 0xa8, 0x5a, 0x80,
    0x46, 0xcc, 0xdc, 0x25, 0x4f, 0xbb, 0x56, 0x56,
    0x43, 0x43, 0x3b, 0xf6, 0x28, 0x96, 0x53, 0xe2,
    0x7d, 0xf7, 0xb2, 0x12, 0xba, 0xa1, 0x89, 0xbe,
];
const G2_Y0: [u8; 32] = [
    0xae, 0x60, 0xa4, 0xe7, 0x51, 0xff, 0xd3, 0x50,
    0xc6, 0x21, 0xe7, 0x03, 0x31, 0x28, 0x26, 0xbd,
    0x55, 0xe8, 0xb5, 0x9a, 0x4d, 0x91, 0x68, 0x38,
    0x41, 0x4d, 0xb8, 0x22, 0xdd, 0x23, 0x35, 0xae,
];
const G2_Y1: [u8; 32] = [
    0x1a, 0xb4, 0x42, 0xf9, 0x89, 0xaf, 0xe5, 0xad,
    0xf8, 0x02, 0x74, 0xf8, 0x76, 0x45, 0xe2, 0x53,
    0x2c, 0xdc, 0x61, 0x81, 0x90, 0x93, 0xd6, 0x13,
    0x2c, 0x90, 0xfe, 0x89, 0x51, 0xb9, 0x24, 0x21,
];
/// BN family parameter t; the ate loop scalar is 6t - 2.
const T_STR: [u8; 8] = [0x68, 0x82, 0xf5, 0xc0, 0x30, 0xb0, 0xa8, 0x01];

/// The curve pair and field tower of the EPID 2.0 group operations.
#[derive(Debug)]
pub struct Epid2Params {
    /// Scalar field of both curve groups (modulus p, the group order).
    pub fp: FiniteField,
    /// Base field (modulus q).
    pub fq: FiniteField,
    pub fq2: FiniteField,
    pub fq12: FiniteField,
    pub g1: EcGroup,
    pub g2: EcGroup,
    pub pairing: Pairing,
}

impl Epid2Params {
    pub fn new() -> Result<Self, EpidError> {
        let q = BigNum::from_bytes(&Q_STR)?;
        let p = BigNum::from_bytes(&P_STR)?;
        let fq = FiniteField::new_prime(q.clone())?;
        let fp = FiniteField::new_prime(p.clone())?;

        // Fq2 = Fq[u]/(u^2 + 1), Fq6 = Fq2[v]/(v^3 - xi) with
        // xi = 2 + u, Fq12 = Fq6[w]/(w^2 - v)
        let beta = fq.one().neg()?;
        let fq2 = FiniteField::new_binomial_extension(&fq, &beta, 2)?;
        let two = fq.one().add(&fq.one())?;
        let xi = fq2.from_coeffs(vec![two.clone(), fq.one()])?;
        let fq6 = FiniteField::new_binomial_extension(&fq2, &xi, 3)?;
        let v = fq6.from_coeffs(vec![fq2.zero(), fq2.one(), fq2.zero()])?;
        let fq12 = FiniteField::new_binomial_extension(&fq6, &v, 2)?;

        // G1: y^2 = x^3 + 3 with generator (1, 2), cofactor 1
        let three = two.add(&fq.one())?;
        let g1 = EcGroup::new(
            &fq,
            fq.zero(),
            three.clone(),
            fq.one(),
            two.clone(),
            p.clone(),
            BigNum::from_u64(1, 32)?,
        )?;

        // G2: the sextic twist y^2 = x^3 + xi^-1 * 3, cofactor 2q - p
        let bprime = xi.inverse()?.mul_ground(&three)?;
        let gx = read_fq2(&fq2, &G2_X0, &G2_X1)?;
        let gy = read_fq2(&fq2, &G2_Y0, &G2_Y1)?;
        let cofactor = q.add(&q, 33)?.sub(&p, 33)?;
        let g2 = EcGroup::new(&fq2, fq2.zero(), bprime, gx, gy, p, cofactor)?;

        let t = BigNum::from_bytes(&T_STR)?;
        let pairing = Pairing::new(&g1, &g2, &fq12, t, true)?;
        Ok(Self {
            fp,
            fq,
            fq2,
            fq12,
            g1,
            g2,
            pairing,
        })
    }

    /// The group order in its 32-byte wire form.
    pub fn p_bytes(&self) -> [u8; 32] {
        P_STR
    }
}

fn read_fq2(
    fq2: &FiniteField,
    c0: &[u8; 32],
    c1: &[u8; 32],
) -> Result<FieldElement, EpidError> {
    let mut bytes = [0u8; 64];
    bytes[..32].copy_from_slice(c0);
    bytes[32..].copy_from_slice(c1);
    Ok(fq2.read_element(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameters_build() {
        let params = Epid2Params::new().unwrap();
        assert_eq!(params.fq.elem_byte_len(), 32);
        assert_eq!(params.fq2.elem_byte_len(), 64);
        assert_eq!(params.fq12.elem_byte_len(), 384);
        assert_eq!(params.g1.point_byte_len(), 64);
        assert_eq!(params.g2.point_byte_len(), 128);
        assert!(params
            .g1
            .in_group(&params.g1.generator().to_bytes())
            .unwrap());
        assert!(params
            .g2
            .in_group(&params.g2.generator().to_bytes())
            .unwrap());
    }
}
