//! Finite fields constructed at run time: prime fields from a modulus,
//! extension fields stacked on a ground field by a binomial
//! `x^d - beta` or an explicit irreducible polynomial.
//!
//! A [`FiniteField`] is a cheaply clonable shared handle. Every element
//! remembers the field it belongs to; binary operations insist both
//! operands come from the *same* field object (identity, not just
//! width), which is the boundary that keeps G1/G2/GT values from being
//! mixed up by a confused caller.

use crate::{bignum::BigNum, error::MathError};
use core::cmp::Ordering;
use digest::Digest;
use rand_core::RngCore;
use sha2::{Sha256, Sha384, Sha512};
use zeroize::Zeroize;

/// Retry budget for rejection sampling in [`FiniteField::random`].
const RNG_WATCHDOG: usize = 10;

#[derive(Clone, Debug)]
pub struct FiniteField(alloc_arc::Arc<FieldRepr>);

// Arc via std; kept behind a tiny alias so the no_std story stays in
// one place if it is ever needed.
mod alloc_arc {
    pub use std::sync::Arc;
}

#[derive(Debug)]
struct FieldRepr {
    kind: FieldKind,
    elem_bytes: usize,
}

#[derive(Debug)]
enum FieldKind {
    Prime {
        modulus: BigNum,
    },
    Extension {
        ground: FiniteField,
        degree: usize,
        poly: ExtPoly,
    },
}

#[derive(Debug)]
enum ExtPoly {
    /// x^degree = beta, beta in the ground field.
    Binomial { beta: FieldElement },
    /// x^degree + coeffs[degree-1]*x^(degree-1) + ... + coeffs[0] = 0,
    /// coefficients in the ground field.
    Polynomial { coeffs: Vec<FieldElement> },
}

/// Supported digest algorithms for hashing into a field or onto a curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HashAlg {
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlg {
    pub fn digest(&self, msg: &[u8]) -> Vec<u8> {
        match self {
            HashAlg::Sha256 => Sha256::digest(msg).to_vec(),
            HashAlg::Sha384 => Sha384::digest(msg).to_vec(),
            HashAlg::Sha512 => Sha512::digest(msg).to_vec(),
        }
    }
}

impl FiniteField {
    /// Prime field from a big-endian modulus. The modulus must be odd
    /// and at least 3; primality is the caller's contract.
    pub fn new_prime(modulus: BigNum) -> Result<Self, MathError> {
        if modulus.is_zero() || modulus.is_even() || modulus.bit_len() < 2 {
            return Err(MathError::BadArg);
        }
        let elem_bytes = modulus.byte_len();
        Ok(Self(alloc_arc::Arc::new(FieldRepr {
            kind: FieldKind::Prime { modulus },
            elem_bytes,
        })))
    }

    /// Extension by `x^degree - beta` over `beta`'s field.
    pub fn new_binomial_extension(
        ground: &FiniteField,
        beta: &FieldElement,
        degree: usize,
    ) -> Result<Self, MathError> {
        if degree < 2 {
            return Err(MathError::BadArg);
        }
        if !ground.is_same(&beta.field) {
            return Err(MathError::MismatchedStructure);
        }
        Ok(Self(alloc_arc::Arc::new(FieldRepr {
            kind: FieldKind::Extension {
                ground: ground.clone(),
                degree,
                poly: ExtPoly::Binomial { beta: beta.clone() },
            },
            elem_bytes: ground.elem_byte_len() * degree,
        })))
    }

    /// Extension by the monic polynomial x^degree + sum coeffs[i]*x^i.
    pub fn new_polynomial_extension(
        ground: &FiniteField,
        coeffs: &[FieldElement],
        degree: usize,
    ) -> Result<Self, MathError> {
        if degree < 2 || coeffs.len() != degree {
            return Err(MathError::BadArg);
        }
        if coeffs.iter().any(|c| !ground.is_same(&c.field)) {
            return Err(MathError::MismatchedStructure);
        }
        Ok(Self(alloc_arc::Arc::new(FieldRepr {
            kind: FieldKind::Extension {
                ground: ground.clone(),
                degree,
                poly: ExtPoly::Polynomial {
                    coeffs: coeffs.to_vec(),
                },
            },
            elem_bytes: ground.elem_byte_len() * degree,
        })))
    }

    pub fn is_same(&self, other: &FiniteField) -> bool {
        alloc_arc::Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn elem_byte_len(&self) -> usize {
        self.0.elem_bytes
    }

    pub fn degree(&self) -> usize {
        match &self.0.kind {
            FieldKind::Prime { .. } => 1,
            FieldKind::Extension { degree, .. } => *degree,
        }
    }

    pub fn ground_field(&self) -> Option<&FiniteField> {
        match &self.0.kind {
            FieldKind::Prime { .. } => None,
            FieldKind::Extension { ground, .. } => Some(ground),
        }
    }

    /// The defining constant of a binomial extension `x^d - beta`.
    pub fn binomial_coeff(&self) -> Option<&FieldElement> {
        match &self.0.kind {
            FieldKind::Extension {
                poly: ExtPoly::Binomial { beta },
                ..
            } => Some(beta),
            _ => None,
        }
    }

    /// The prime modulus, for prime fields only.
    pub fn modulus(&self) -> Option<&BigNum> {
        match &self.0.kind {
            FieldKind::Prime { modulus } => Some(modulus),
            FieldKind::Extension { .. } => None,
        }
    }

    pub fn zero(&self) -> FieldElement {
        let repr = match &self.0.kind {
            FieldKind::Prime { modulus } => ElemRepr::Prime(BigNum::zeroed(modulus.byte_len())),
            FieldKind::Extension { ground, degree, .. } => {
                ElemRepr::Ext(vec![ground.zero(); *degree])
            }
        };
        FieldElement {
            field: self.clone(),
            repr,
        }
    }

    pub fn one(&self) -> FieldElement {
        let repr = match &self.0.kind {
            FieldKind::Prime { modulus } => ElemRepr::Prime(BigNum::one_of(modulus.byte_len())),
            FieldKind::Extension { ground, degree, .. } => {
                let mut cs = vec![ground.zero(); *degree];
                cs[0] = ground.one();
                ElemRepr::Ext(cs)
            }
        };
        FieldElement {
            field: self.clone(),
            repr,
        }
    }

    /// Decodes the field's canonical big-endian encoding. Extension
    /// elements are the concatenation of their ground-field
    /// sub-elements, coefficient 0 first.
    pub fn read_element(&self, bytes: &[u8]) -> Result<FieldElement, MathError> {
        if bytes.len() != self.0.elem_bytes {
            return Err(MathError::BadArg);
        }
        match &self.0.kind {
            FieldKind::Prime { modulus } => {
                let n = BigNum::from_bytes(bytes)?;
                if n.compare(modulus) != Ordering::Less {
                    return Err(MathError::BadArg);
                }
                Ok(FieldElement {
                    field: self.clone(),
                    repr: ElemRepr::Prime(n),
                })
            }
            FieldKind::Extension { ground, degree, .. } => {
                let w = ground.elem_byte_len();
                let coeffs = (0..*degree)
                    .map(|i| ground.read_element(&bytes[i * w..(i + 1) * w]))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(FieldElement {
                    field: self.clone(),
                    repr: ElemRepr::Ext(coeffs),
                })
            }
        }
    }

    /// Builds an extension element from ground-field coefficients.
    pub fn from_coeffs(&self, coeffs: Vec<FieldElement>) -> Result<FieldElement, MathError> {
        match &self.0.kind {
            FieldKind::Prime { .. } => Err(MathError::BadArg),
            FieldKind::Extension { ground, degree, .. } => {
                if coeffs.len() != *degree || coeffs.iter().any(|c| !ground.is_same(&c.field)) {
                    return Err(MathError::MismatchedStructure);
                }
                Ok(FieldElement {
                    field: self.clone(),
                    repr: ElemRepr::Ext(coeffs),
                })
            }
        }
    }

    /// Hashes a message into a prime field: OS2IP(digest) mod modulus.
    pub fn hash(&self, msg: &[u8], alg: HashAlg) -> Result<FieldElement, MathError> {
        if msg.is_empty() {
            return Err(MathError::BadArg);
        }
        let modulus = self.modulus().ok_or(MathError::BadArg)?;
        let digest = alg.digest(msg);
        let wide = BigNum::from_bytes(&digest)?;
        Ok(FieldElement {
            field: self.clone(),
            repr: ElemRepr::Prime(wide.mod_reduce(modulus)),
        })
    }

    /// Uniform element of a prime field that is >= `low_bound`, by
    /// rejection sampling with a bounded retry budget.
    pub fn random<R: RngCore>(
        &self,
        low_bound: &BigNum,
        rng: &mut R,
    ) -> Result<FieldElement, MathError> {
        let modulus = self.modulus().ok_or(MathError::BadArg)?;
        for _ in 0..RNG_WATCHDOG {
            let mut buf = vec![0u8; modulus.byte_len() + 8];
            rng.fill_bytes(&mut buf);
            let candidate = BigNum::from_bytes(&buf)?.mod_reduce(modulus);
            if candidate.compare(low_bound) != Ordering::Less {
                buf.zeroize();
                return Ok(FieldElement {
                    field: self.clone(),
                    repr: ElemRepr::Prime(candidate),
                });
            }
        }
        Err(MathError::RandMaxIter)
    }
}

#[derive(Clone, Debug)]
pub struct FieldElement {
    field: FiniteField,
    repr: ElemRepr,
}

#[derive(Clone, Debug)]
enum ElemRepr {
    Prime(BigNum),
    Ext(Vec<FieldElement>),
}

impl FieldElement {
    pub fn field(&self) -> &FiniteField {
        &self.field
    }

    pub fn is_zero(&self) -> bool {
        match &self.repr {
            ElemRepr::Prime(n) => n.is_zero(),
            ElemRepr::Ext(cs) => cs.iter().all(|c| c.is_zero()),
        }
    }

    /// The residue of a prime-field element.
    pub fn residue(&self) -> Option<&BigNum> {
        match &self.repr {
            ElemRepr::Prime(n) => Some(n),
            ElemRepr::Ext(_) => None,
        }
    }

    /// Ground-field coefficients of an extension element.
    pub fn coeffs(&self) -> Option<&[FieldElement]> {
        match &self.repr {
            ElemRepr::Prime(_) => None,
            ElemRepr::Ext(cs) => Some(cs),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match &self.repr {
            ElemRepr::Prime(n) => n.to_bytes(),
            ElemRepr::Ext(cs) => cs.iter().flat_map(|c| c.to_bytes()).collect(),
        }
    }

    fn check_same(&self, other: &FieldElement) -> Result<(), MathError> {
        if self.field.is_same(&other.field) {
            Ok(())
        } else {
            Err(MathError::MismatchedStructure)
        }
    }

    pub fn add(&self, other: &FieldElement) -> Result<FieldElement, MathError> {
        self.check_same(other)?;
        let repr = match (&self.repr, &other.repr) {
            (ElemRepr::Prime(a), ElemRepr::Prime(b)) => {
                let m = self.field.modulus().ok_or(MathError::BadArg)?;
                ElemRepr::Prime(a.mod_add(b, m))
            }
            (ElemRepr::Ext(a), ElemRepr::Ext(b)) => ElemRepr::Ext(
                a.iter()
                    .zip(b)
                    .map(|(x, y)| x.add(y))
                    .collect::<Result<_, _>>()?,
            ),
            _ => return Err(MathError::MismatchedStructure),
        };
        Ok(FieldElement {
            field: self.field.clone(),
            repr,
        })
    }

    pub fn sub(&self, other: &FieldElement) -> Result<FieldElement, MathError> {
        self.check_same(other)?;
        let repr = match (&self.repr, &other.repr) {
            (ElemRepr::Prime(a), ElemRepr::Prime(b)) => {
                let m = self.field.modulus().ok_or(MathError::BadArg)?;
                ElemRepr::Prime(a.mod_sub(b, m))
            }
            (ElemRepr::Ext(a), ElemRepr::Ext(b)) => ElemRepr::Ext(
                a.iter()
                    .zip(b)
                    .map(|(x, y)| x.sub(y))
                    .collect::<Result<_, _>>()?,
            ),
            _ => return Err(MathError::MismatchedStructure),
        };
        Ok(FieldElement {
            field: self.field.clone(),
            repr,
        })
    }

    pub fn neg(&self) -> Result<FieldElement, MathError> {
        let repr = match &self.repr {
            ElemRepr::Prime(a) => {
                let m = self.field.modulus().ok_or(MathError::BadArg)?;
                ElemRepr::Prime(a.mod_neg(m))
            }
            ElemRepr::Ext(cs) => {
                ElemRepr::Ext(cs.iter().map(|c| c.neg()).collect::<Result<_, _>>()?)
            }
        };
        Ok(FieldElement {
            field: self.field.clone(),
            repr,
        })
    }

    pub fn mul(&self, other: &FieldElement) -> Result<FieldElement, MathError> {
        self.check_same(other)?;
        match (&self.repr, &other.repr) {
            (ElemRepr::Prime(a), ElemRepr::Prime(b)) => {
                let m = self.field.modulus().ok_or(MathError::BadArg)?;
                Ok(FieldElement {
                    field: self.field.clone(),
                    repr: ElemRepr::Prime(a.mod_mul(b, m)),
                })
            }
            (ElemRepr::Ext(a), ElemRepr::Ext(b)) => self.field.ext_mul(a, b),
            _ => Err(MathError::MismatchedStructure),
        }
    }

    pub fn square(&self) -> Result<FieldElement, MathError> {
        self.mul(self)
    }

    /// Multiplies an extension element by a ground-field scalar.
    pub fn mul_ground(&self, scalar: &FieldElement) -> Result<FieldElement, MathError> {
        let ground = self.field.ground_field().ok_or(MathError::BadArg)?;
        if !ground.is_same(&scalar.field) {
            return Err(MathError::MismatchedStructure);
        }
        let cs = self.coeffs().ok_or(MathError::BadArg)?;
        let scaled = cs
            .iter()
            .map(|c| c.mul(scalar))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FieldElement {
            field: self.field.clone(),
            repr: ElemRepr::Ext(scaled),
        })
    }

    /// Conjugation of a degree-2 extension element: negates the odd
    /// coefficient. For Fq2 over Fq this is the Frobenius map.
    pub fn conjugate(&self) -> Result<FieldElement, MathError> {
        if self.field.degree() != 2 {
            return Err(MathError::BadArg);
        }
        let cs = self.coeffs().ok_or(MathError::BadArg)?;
        Ok(FieldElement {
            field: self.field.clone(),
            repr: ElemRepr::Ext(vec![cs[0].clone(), cs[1].neg()?]),
        })
    }

    pub fn inverse(&self) -> Result<FieldElement, MathError> {
        if self.is_zero() {
            return Err(MathError::NotInvertible);
        }
        match &self.repr {
            ElemRepr::Prime(a) => {
                // Fermat; the modulus is prime by the field's contract.
                let m = self.field.modulus().ok_or(MathError::BadArg)?;
                let two = BigNum::from_u64(2, m.byte_len())?;
                let e = m.sub(&two, m.byte_len())?;
                Ok(FieldElement {
                    field: self.field.clone(),
                    repr: ElemRepr::Prime(a.mod_exp(&e, m)),
                })
            }
            ElemRepr::Ext(cs) => self.field.ext_inverse(cs),
        }
    }

    /// Square-and-multiply exponentiation by a nonnegative scalar.
    pub fn exp(&self, scalar: &BigNum) -> Result<FieldElement, MathError> {
        let mut r = self.field.one();
        let mut base = self.clone();
        for i in 0..scalar.bit_len() {
            if scalar.bit(i) {
                r = r.mul(&base)?;
            }
            base = base.square()?;
        }
        Ok(r)
    }

    /// Square root in a prime field; `None` for quadratic non-residues.
    pub fn sqrt(&self) -> Result<Option<FieldElement>, MathError> {
        let m = self.field.modulus().ok_or(MathError::BadArg)?;
        let a = match &self.repr {
            ElemRepr::Prime(a) => a,
            ElemRepr::Ext(_) => return Err(MathError::BadArg),
        };
        if a.is_zero() {
            return Ok(Some(self.field.zero()));
        }
        let one = BigNum::from_u64(1, m.byte_len())?;
        let m_minus_1 = m.sub(&one, m.byte_len())?;
        let two = BigNum::from_u64(2, m.byte_len())?;
        let (half, _) = m_minus_1.div(&two)?;
        // Euler's criterion
        if a.mod_exp(&half, m) != one {
            return Ok(None);
        }
        let root = if m.bit(1) {
            // m = 3 (mod 4): a^((m+1)/4)
            let (e, _) = m
                .add(&one, m.byte_len() + 1)?
                .div(&BigNum::from_u64(4, m.byte_len())?)?;
            a.mod_exp(&e, m)
        } else {
            self.tonelli_shanks(a, m, &one, &half)?
        };
        Ok(Some(FieldElement {
            field: self.field.clone(),
            repr: ElemRepr::Prime(root),
        }))
    }

    fn tonelli_shanks(
        &self,
        a: &BigNum,
        m: &BigNum,
        one: &BigNum,
        half: &BigNum,
    ) -> Result<BigNum, MathError> {
        // m - 1 = q * 2^s with q odd
        let cap = m.byte_len();
        let m_minus_1 = m.sub(one, cap)?;
        let mut s = 0u32;
        let mut q = m_minus_1.clone();
        let two = BigNum::from_u64(2, cap)?;
        while q.is_even() {
            q = q.div(&two)?.0;
            s += 1;
        }
        // find a non-residue z
        let mut z = two.clone();
        loop {
            if z.mod_exp(half, m) != *one {
                break;
            }
            z = z.add(one, cap)?;
        }
        let mut c = z.mod_exp(&q, m);
        let mut t = a.mod_exp(&q, m);
        let q_plus_1 = q.add(one, cap + 1)?;
        let (e, _) = q_plus_1.div(&two)?;
        let mut r = a.mod_exp(&e, m);
        let mut mm = s;
        while t != *one {
            let mut i = 0u32;
            let mut tt = t.clone();
            while tt != *one {
                tt = tt.mod_mul(&tt, m);
                i += 1;
                if i == mm {
                    return Err(MathError::BadArg);
                }
            }
            let mut b = c.clone();
            for _ in 0..(mm - i - 1) {
                b = b.mod_mul(&b, m);
            }
            mm = i;
            c = b.mod_mul(&b, m);
            t = t.mod_mul(&c, m);
            r = r.mod_mul(&b, m);
        }
        Ok(r)
    }
}

impl Zeroize for FieldElement {
    fn zeroize(&mut self) {
        match &mut self.repr {
            ElemRepr::Prime(n) => n.zeroize(),
            ElemRepr::Ext(cs) => cs.iter_mut().for_each(Zeroize::zeroize),
        }
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        if !self.field.is_same(&other.field) {
            return false;
        }
        match (&self.repr, &other.repr) {
            (ElemRepr::Prime(a), ElemRepr::Prime(b)) => a == b,
            (ElemRepr::Ext(a), ElemRepr::Ext(b)) => a == b,
            _ => false,
        }
    }
}
impl Eq for FieldElement {}

impl FiniteField {
    fn ext_mul(&self, a: &[FieldElement], b: &[FieldElement]) -> Result<FieldElement, MathError> {
        let (ground, degree, poly) = match &self.0.kind {
            FieldKind::Extension {
                ground,
                degree,
                poly,
            } => (ground, *degree, poly),
            FieldKind::Prime { .. } => return Err(MathError::BadArg),
        };
        // schoolbook product, then reduce by the defining polynomial
        let mut prod = vec![ground.zero(); 2 * degree - 1];
        for (i, x) in a.iter().enumerate() {
            for (j, y) in b.iter().enumerate() {
                prod[i + j] = prod[i + j].add(&x.mul(y)?)?;
            }
        }
        for k in (degree..2 * degree - 1).rev() {
            let hi = prod[k].clone();
            if hi.is_zero() {
                continue;
            }
            match poly {
                ExtPoly::Binomial { beta } => {
                    prod[k - degree] = prod[k - degree].add(&hi.mul(beta)?)?;
                }
                ExtPoly::Polynomial { coeffs } => {
                    for (i, c) in coeffs.iter().enumerate() {
                        prod[k - degree + i] = prod[k - degree + i].sub(&hi.mul(c)?)?;
                    }
                }
            }
            prod[k] = ground.zero();
        }
        prod.truncate(degree);
        Ok(FieldElement {
            field: self.clone(),
            repr: ElemRepr::Ext(prod),
        })
    }

    fn ext_inverse(&self, cs: &[FieldElement]) -> Result<FieldElement, MathError> {
        let (degree, poly) = match &self.0.kind {
            FieldKind::Extension { degree, poly, .. } => (*degree, poly),
            FieldKind::Prime { .. } => return Err(MathError::BadArg),
        };
        match (degree, poly) {
            (2, ExtPoly::Binomial { beta }) => {
                // (a0 + a1 x)^-1 = (a0 - a1 x) / (a0^2 - beta a1^2)
                let norm = cs[0].square()?.sub(&beta.mul(&cs[1].square()?)?)?;
                let ni = norm.inverse()?;
                Ok(FieldElement {
                    field: self.clone(),
                    repr: ElemRepr::Ext(vec![cs[0].mul(&ni)?, cs[1].neg()?.mul(&ni)?]),
                })
            }
            (3, ExtPoly::Binomial { beta }) => {
                let (a0, a1, a2) = (&cs[0], &cs[1], &cs[2]);
                let c0 = a0.square()?.sub(&beta.mul(&a1.mul(a2)?)?)?;
                let c1 = beta.mul(&a2.square()?)?.sub(&a0.mul(a1)?)?;
                let c2 = a1.square()?.sub(&a0.mul(a2)?)?;
                let norm = a0
                    .mul(&c0)?
                    .add(&beta.mul(&a2.mul(&c1)?.add(&a1.mul(&c2)?)?)?)?;
                let ni = norm.inverse()?;
                Ok(FieldElement {
                    field: self.clone(),
                    repr: ElemRepr::Ext(vec![c0.mul(&ni)?, c1.mul(&ni)?, c2.mul(&ni)?]),
                })
            }
            _ => self.ext_inverse_fermat(cs),
        }
    }

    /// Inversion by exponentiation with |F| - 2; the slow generic path
    /// for polynomial extensions and degrees without a norm shortcut.
    fn ext_inverse_fermat(&self, cs: &[FieldElement]) -> Result<FieldElement, MathError> {
        let mut base = self.ground_field().ok_or(MathError::BadArg)?;
        while let Some(g) = base.ground_field() {
            base = g;
        }
        let p = base.modulus().ok_or(MathError::BadArg)?;
        let total_degree = self.elem_byte_len() / base.elem_byte_len();
        let cap = p.byte_len() * total_degree + 1;
        let mut order = BigNum::from_u64(1, cap)?;
        for _ in 0..total_degree {
            let wide = p.mul(&order, cap)?;
            order = wide;
        }
        let two = BigNum::from_u64(2, cap)?;
        let e = order.sub(&two, cap)?;
        let elem = FieldElement {
            field: self.clone(),
            repr: ElemRepr::Ext(cs.to_vec()),
        };
        elem.exp(&e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    const Q_HEX: &str = "fffffffffffcf0cd46e5f25eee71a49f0cdc65fb12980a82d3292ddbaed33013";

    fn fq() -> FiniteField {
        let q = BigNum::from_bytes(&hex::decode(Q_HEX).unwrap()).unwrap();
        FiniteField::new_prime(q).unwrap()
    }

    fn fq2(fq: &FiniteField) -> FiniteField {
        let beta = fq.one().neg().unwrap();
        FiniteField::new_binomial_extension(fq, &beta, 2).unwrap()
    }

    #[test]
    fn prime_field_basics() {
        let f = fq();
        let a = f
            .read_element(
                &hex::decode("12a65bd6918d50a766eb7d52e34017607fdf6ca12c1a37e092c0f7b976abb18a")
                    .unwrap(),
            )
            .unwrap();
        let ai = a.inverse().unwrap();
        assert_eq!(a.mul(&ai).unwrap(), f.one());
        assert_eq!(a.sub(&a).unwrap(), f.zero());
        assert_eq!(a.add(&a.neg().unwrap()).unwrap(), f.zero());
        assert_eq!(f.zero().inverse(), Err(MathError::NotInvertible));
    }

    #[test]
    fn element_round_trip() {
        let f = fq();
        let bytes =
            hex::decode("0fa2f21bdfea96648ba2327cdfd88910fdbb38cd0000000000000000000000ff")
                .unwrap();
        let e = f.read_element(&bytes).unwrap();
        assert_eq!(e.to_bytes(), bytes);
    }

    #[test]
    fn read_rejects_out_of_range() {
        let f = fq();
        // the modulus itself is not a valid residue
        let bytes = hex::decode(Q_HEX).unwrap();
        assert!(f.read_element(&bytes).is_err());
    }

    #[test]
    fn quadratic_extension_arithmetic() {
        let f = fq();
        let f2 = fq2(&f);
        assert_eq!(f2.elem_byte_len(), 64);
        let mut rng = StdRng::seed_from_u64(11);
        let zero_bound = BigNum::new(32).unwrap();
        let a = f2
            .from_coeffs(vec![
                f.random(&zero_bound, &mut rng).unwrap(),
                f.random(&zero_bound, &mut rng).unwrap(),
            ])
            .unwrap();
        let b = f2
            .from_coeffs(vec![
                f.random(&zero_bound, &mut rng).unwrap(),
                f.random(&zero_bound, &mut rng).unwrap(),
            ])
            .unwrap();
        // commutativity and distributivity spot checks
        assert_eq!(a.mul(&b).unwrap(), b.mul(&a).unwrap());
        let lhs = a.add(&b).unwrap().square().unwrap();
        let rhs = a
            .square()
            .unwrap()
            .add(&a.mul(&b).unwrap())
            .unwrap()
            .add(&a.mul(&b).unwrap())
            .unwrap()
            .add(&b.square().unwrap())
            .unwrap();
        assert_eq!(lhs, rhs);
        // inversion
        let ai = a.inverse().unwrap();
        assert_eq!(a.mul(&ai).unwrap(), f2.one());
        // conjugation multiplies to the norm, which has no u component
        let n = a.mul(&a.conjugate().unwrap()).unwrap();
        assert!(n.coeffs().unwrap()[1].is_zero());
    }

    #[test]
    fn field_identity_is_checked() {
        let f = fq();
        let g = fq(); // same modulus, different object
        let a = f.one();
        let b = g.one();
        assert_eq!(a.add(&b), Err(MathError::MismatchedStructure));
        assert_ne!(a, b);
    }

    #[test]
    fn extension_degree_bounds() {
        let f = fq();
        let beta = f.one().neg().unwrap();
        assert!(FiniteField::new_binomial_extension(&f, &beta, 0).is_err());
        assert!(FiniteField::new_binomial_extension(&f, &beta, 1).is_err());
        assert!(FiniteField::new_binomial_extension(&f, &beta, 2).is_ok());
    }

    #[test]
    fn sqrt_on_residues() {
        let f = fq();
        let mut rng = StdRng::seed_from_u64(3);
        let zero_bound = BigNum::new(32).unwrap();
        for _ in 0..4 {
            let a = f.random(&zero_bound, &mut rng).unwrap();
            let sq = a.square().unwrap();
            let r = sq.sqrt().unwrap().unwrap();
            assert!(r == a || r == a.neg().unwrap());
        }
    }

    #[test]
    fn hash_into_field_is_deterministic() {
        let f = fq();
        let a = f.hash(b"abc", HashAlg::Sha256).unwrap();
        let b = f.hash(b"abc", HashAlg::Sha256).unwrap();
        let c = f.hash(b"abd", HashAlg::Sha256).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(f.hash(b"", HashAlg::Sha256).is_err());
    }

    #[test]
    fn random_respects_low_bound() {
        let f = fq();
        let mut rng = StdRng::seed_from_u64(5);
        let one = BigNum::from_u64(1, 32).unwrap();
        for _ in 0..8 {
            let e = f.random(&one, &mut rng).unwrap();
            assert!(!e.is_zero());
        }
    }
}
