//! Elliptic-curve groups in short Weierstrass form y^2 = x^3 + ax + b
//! over a [`FiniteField`], with the coefficient field chosen at
//! construction time. The same type serves the base-field group and
//! its quadratic-twist sibling over Fq2.
//!
//! Group operations live on [`EcGroup`] and take points as arguments,
//! so a point can never be combined with a point from another group:
//! every entry point checks group identity first.

use crate::{
    bignum::BigNum,
    error::MathError,
    ff::{FieldElement, FiniteField, HashAlg},
};
use core::cmp::Ordering;
use rand_core::RngCore;
use std::sync::Arc;

/// Attempt budget for hashing to a curve point.
const HASH_WATCHDOG: u32 = 50;

#[derive(Clone, Debug)]
pub struct EcGroup(Arc<GroupRepr>);

#[derive(Debug)]
struct GroupRepr {
    field: FiniteField,
    a: FieldElement,
    b: FieldElement,
    generator: (FieldElement, FieldElement),
    order: BigNum,
    cofactor: BigNum,
}

/// A point of a specific [`EcGroup`]; `None` coordinates encode the
/// point at infinity.
#[derive(Clone, Debug)]
pub struct EcPoint {
    group: EcGroup,
    affine: Option<(FieldElement, FieldElement)>,
}

impl EcGroup {
    pub fn new(
        field: &FiniteField,
        a: FieldElement,
        b: FieldElement,
        gx: FieldElement,
        gy: FieldElement,
        order: BigNum,
        cofactor: BigNum,
    ) -> Result<Self, MathError> {
        for c in [&a, &b, &gx, &gy] {
            if !field.is_same(c.field()) {
                return Err(MathError::MismatchedStructure);
            }
        }
        if order.is_zero() || cofactor.is_zero() {
            return Err(MathError::BadArg);
        }
        let lhs = gy.square()?;
        let rhs = gx.square()?.mul(&gx)?.add(&a.mul(&gx)?)?.add(&b)?;
        if lhs != rhs {
            return Err(MathError::NotOnCurve);
        }
        Ok(Self(Arc::new(GroupRepr {
            field: field.clone(),
            a,
            b,
            generator: (gx, gy),
            order,
            cofactor,
        })))
    }

    pub fn is_same(&self, other: &EcGroup) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn field(&self) -> &FiniteField {
        &self.0.field
    }

    pub fn order(&self) -> &BigNum {
        &self.0.order
    }

    pub fn cofactor(&self) -> &BigNum {
        &self.0.cofactor
    }

    /// Serialized point width: two coordinates.
    pub fn point_byte_len(&self) -> usize {
        2 * self.0.field.elem_byte_len()
    }

    pub fn identity(&self) -> EcPoint {
        EcPoint {
            group: self.clone(),
            affine: None,
        }
    }

    pub fn generator(&self) -> EcPoint {
        EcPoint {
            group: self.clone(),
            affine: Some(self.0.generator.clone()),
        }
    }

    /// Decodes `x ‖ y`; the all-zero string is the identity. Any other
    /// string must satisfy the curve equation.
    pub fn read_point(&self, bytes: &[u8]) -> Result<EcPoint, MathError> {
        if bytes.len() != self.point_byte_len() {
            return Err(MathError::BadArg);
        }
        if bytes.iter().all(|&b| b == 0) {
            return Ok(self.identity());
        }
        let w = self.0.field.elem_byte_len();
        let x = self.0.field.read_element(&bytes[..w])?;
        let y = self.0.field.read_element(&bytes[w..])?;
        if !self.on_curve(&x, &y)? {
            return Err(MathError::NotOnCurve);
        }
        Ok(EcPoint {
            group: self.clone(),
            affine: Some((x, y)),
        })
    }

    /// Whether `bytes` encodes an element of this group (on the curve
    /// and in the order-n subgroup). A well-formed but foreign string
    /// answers `false`; only a wrong-size string is an error.
    pub fn in_group(&self, bytes: &[u8]) -> Result<bool, MathError> {
        if bytes.len() != self.point_byte_len() {
            return Err(MathError::BadArg);
        }
        if bytes.iter().all(|&b| b == 0) {
            return Ok(true);
        }
        let w = self.0.field.elem_byte_len();
        let x = match self.0.field.read_element(&bytes[..w]) {
            Ok(x) => x,
            Err(_) => return Ok(false),
        };
        let y = match self.0.field.read_element(&bytes[w..]) {
            Ok(y) => y,
            Err(_) => return Ok(false),
        };
        if !self.on_curve(&x, &y)? {
            return Ok(false);
        }
        let p = EcPoint {
            group: self.clone(),
            affine: Some((x, y)),
        };
        Ok(self.exp_unchecked(&p, &self.0.order)?.is_identity())
    }

    fn on_curve(&self, x: &FieldElement, y: &FieldElement) -> Result<bool, MathError> {
        let lhs = y.square()?;
        let rhs = x
            .square()?
            .mul(x)?
            .add(&self.0.a.mul(x)?)?
            .add(&self.0.b)?;
        Ok(lhs == rhs)
    }

    fn check_member(&self, p: &EcPoint) -> Result<(), MathError> {
        if self.is_same(&p.group) {
            Ok(())
        } else {
            Err(MathError::MismatchedStructure)
        }
    }

    /// The group operation (point addition).
    pub fn mul(&self, a: &EcPoint, b: &EcPoint) -> Result<EcPoint, MathError> {
        self.check_member(a)?;
        self.check_member(b)?;
        self.pt_add(a, b)
    }

    fn pt_add(&self, a: &EcPoint, b: &EcPoint) -> Result<EcPoint, MathError> {
        let (x1, y1) = match &a.affine {
            Some(c) => c,
            None => return Ok(b.clone()),
        };
        let (x2, y2) = match &b.affine {
            Some(c) => c,
            None => return Ok(a.clone()),
        };
        if x1 == x2 {
            return if y1 == y2 && !y1.is_zero() {
                self.pt_double(x1, y1)
            } else {
                Ok(self.identity())
            };
        }
        let lambda = y2.sub(y1)?.mul(&x2.sub(x1)?.inverse()?)?;
        let x3 = lambda.square()?.sub(x1)?.sub(x2)?;
        let y3 = lambda.mul(&x1.sub(&x3)?)?.sub(y1)?;
        Ok(EcPoint {
            group: self.clone(),
            affine: Some((x3, y3)),
        })
    }

    fn pt_double(&self, x: &FieldElement, y: &FieldElement) -> Result<EcPoint, MathError> {
        let three = self.0.field.one().add(&self.0.field.one())?.add(&self.0.field.one())?;
        let num = three.mul(&x.square()?)?.add(&self.0.a)?;
        let lambda = num.mul(&y.add(y)?.inverse()?)?;
        let x3 = lambda.square()?.sub(x)?.sub(x)?;
        let y3 = lambda.mul(&x.sub(&x3)?)?.sub(y)?;
        Ok(EcPoint {
            group: self.clone(),
            affine: Some((x3, y3)),
        })
    }

    /// Scalar multiplication. The scalar must be below the group order.
    pub fn exp(&self, p: &EcPoint, scalar: &BigNum) -> Result<EcPoint, MathError> {
        self.check_member(p)?;
        if scalar.compare(&self.0.order) != Ordering::Less {
            return Err(MathError::BadArg);
        }
        self.exp_unchecked(p, scalar)
    }

    fn exp_unchecked(&self, p: &EcPoint, scalar: &BigNum) -> Result<EcPoint, MathError> {
        let mut r = self.identity();
        let mut base = p.clone();
        for i in 0..scalar.bit_len() {
            if scalar.bit(i) {
                r = self.pt_add(&r, &base)?;
            }
            base = self.pt_add(&base, &base)?;
        }
        Ok(r)
    }

    /// Scalar multiplication as a Montgomery ladder: a fixed
    /// iteration count (the order's bit length) with one add and one
    /// double per bit, whichever way the bit falls. Same result as
    /// [`EcGroup::exp`]. The ladder shape is uniform but the affine
    /// group law underneath still branches on identity and on equal x
    /// coordinates, so this is hardening, not a full constant-time
    /// guarantee.
    pub fn sscm_exp(&self, p: &EcPoint, scalar: &BigNum) -> Result<EcPoint, MathError> {
        self.check_member(p)?;
        if scalar.compare(&self.0.order) != Ordering::Less {
            return Err(MathError::BadArg);
        }
        let nbits = self.0.order.bit_len();
        let mut r0 = self.identity();
        let mut r1 = p.clone();
        for i in (0..nbits).rev() {
            if scalar.bit(i) {
                r0 = self.pt_add(&r0, &r1)?;
                r1 = self.pt_add(&r1, &r1)?;
            } else {
                r1 = self.pt_add(&r0, &r1)?;
                r0 = self.pt_add(&r0, &r0)?;
            }
        }
        Ok(r0)
    }

    /// Product of `points[i]^scalars[i]`; each scalar below the order.
    pub fn multi_exp(
        &self,
        points: &[&EcPoint],
        scalars: &[&BigNum],
    ) -> Result<EcPoint, MathError> {
        if points.is_empty() || points.len() != scalars.len() {
            return Err(MathError::BadArg);
        }
        let mut r = self.identity();
        for (p, s) in points.iter().zip(scalars) {
            r = self.pt_add(&r, &self.exp(p, s)?)?;
        }
        Ok(r)
    }

    /// [`EcGroup::multi_exp`] without the order bound on the scalars.
    pub fn multi_exp_bn(
        &self,
        points: &[&EcPoint],
        scalars: &[&BigNum],
    ) -> Result<EcPoint, MathError> {
        if points.is_empty() || points.len() != scalars.len() {
            return Err(MathError::BadArg);
        }
        let mut r = self.identity();
        for (p, s) in points.iter().zip(scalars) {
            self.check_member(p)?;
            r = self.pt_add(&r, &self.exp_unchecked(p, s)?)?;
        }
        Ok(r)
    }

    /// [`EcGroup::multi_exp`] using the uniform ladder per term.
    pub fn sscm_multi_exp(
        &self,
        points: &[&EcPoint],
        scalars: &[&BigNum],
    ) -> Result<EcPoint, MathError> {
        if points.is_empty() || points.len() != scalars.len() {
            return Err(MathError::BadArg);
        }
        let mut r = self.identity();
        for (p, s) in points.iter().zip(scalars) {
            r = self.pt_add(&r, &self.sscm_exp(p, s)?)?;
        }
        Ok(r)
    }

    pub fn inverse(&self, p: &EcPoint) -> Result<EcPoint, MathError> {
        self.check_member(p)?;
        let affine = match &p.affine {
            None => None,
            Some((x, y)) => Some((x.clone(), y.neg()?)),
        };
        Ok(EcPoint {
            group: self.clone(),
            affine,
        })
    }

    pub fn is_equal(&self, a: &EcPoint, b: &EcPoint) -> Result<bool, MathError> {
        self.check_member(a)?;
        self.check_member(b)?;
        Ok(a.affine == b.affine)
    }

    /// A uniformly random multiple of the generator.
    pub fn get_random<R: RngCore>(&self, rng: &mut R) -> Result<EcPoint, MathError> {
        let cap = self.0.order.byte_len();
        let mut buf = vec![0u8; cap + 8];
        rng.fill_bytes(&mut buf);
        let scalar = BigNum::from_bytes(&buf)?.mod_reduce(&self.0.order);
        self.exp_unchecked(&self.generator(), &scalar)
    }

    /// Hashes a message to a curve point over a prime field. Attempt
    /// counters are tried in order: x = H(be32(i) ‖ msg) mod q, and of
    /// the two roots of x^3 + ax + b the odd one is taken.
    pub fn hash(&self, msg: &[u8], alg: HashAlg) -> Result<EcPoint, MathError> {
        if msg.is_empty() {
            return Err(MathError::BadArg);
        }
        let q = self.0.field.modulus().ok_or(MathError::BadArg)?;
        for i in 0..HASH_WATCHDOG {
            let mut buf = Vec::with_capacity(4 + msg.len());
            buf.extend_from_slice(&i.to_be_bytes());
            buf.extend_from_slice(msg);
            let digest = alg.digest(&buf);
            let xn = BigNum::from_bytes(&digest)?.mod_reduce(q);
            let x = self.0.field.read_element(&xn.to_bytes())?;
            let t = x
                .square()?
                .mul(&x)?
                .add(&self.0.a.mul(&x)?)?
                .add(&self.0.b)?;
            if let Some(y) = t.sqrt()? {
                let y = self.odd_root(y)?;
                return Ok(EcPoint {
                    group: self.clone(),
                    affine: Some((x, y)),
                });
            }
        }
        Err(MathError::RandMaxIter)
    }

    fn odd_root(&self, y: FieldElement) -> Result<FieldElement, MathError> {
        let odd = y.residue().ok_or(MathError::BadArg)?.bit(0);
        if odd {
            Ok(y)
        } else {
            y.neg()
        }
    }

    /// Lifts an x coordinate to a point, taking the even root as y.
    /// Fails for x with no corresponding curve point, and for groups
    /// over extension fields.
    pub fn make_point(&self, x_bytes: &[u8]) -> Result<EcPoint, MathError> {
        if self.0.field.modulus().is_none() {
            return Err(MathError::BadArg);
        }
        let x = self.0.field.read_element(x_bytes)?;
        let t = x
            .square()?
            .mul(&x)?
            .add(&self.0.a.mul(&x)?)?
            .add(&self.0.b)?;
        let y = t.sqrt()?.ok_or(MathError::NotOnCurve)?;
        let y = match y.residue() {
            Some(r) if r.bit(0) => y.neg()?,
            _ => y,
        };
        Ok(EcPoint {
            group: self.clone(),
            affine: Some((x, y)),
        })
    }
}

impl EcPoint {
    pub fn group(&self) -> &EcGroup {
        &self.group
    }

    pub fn is_identity(&self) -> bool {
        self.affine.is_none()
    }

    /// Affine coordinates; `None` for the identity.
    pub fn coords(&self) -> Option<(&FieldElement, &FieldElement)> {
        self.affine.as_ref().map(|(x, y)| (x, y))
    }

    /// `x ‖ y` in the field's canonical encoding; all zeros for the
    /// identity.
    pub fn to_bytes(&self) -> Vec<u8> {
        match &self.affine {
            None => vec![0u8; self.group.point_byte_len()],
            Some((x, y)) => {
                let mut out = x.to_bytes();
                out.extend_from_slice(&y.to_bytes());
                out
            }
        }
    }
}

impl PartialEq for EcPoint {
    fn eq(&self, other: &Self) -> bool {
        self.group.is_same(&other.group) && self.affine == other.affine
    }
}
impl Eq for EcPoint {}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    const Q_HEX: &str = "fffffffffffcf0cd46e5f25eee71a49f0cdc65fb12980a82d3292ddbaed33013";
    const P_HEX: &str = "fffffffffffcf0cd46e5f25eee71a49e0cdc65fb1299921af62d536cd10b500d";
    const A_HEX: &str = "12a65bd6918d50a766eb7d52e34017607fdf6ca12c1a37e092c0f7b976abb18a\
                         786528cbaf075250557a5f300ac0b46bea6fe2f66d96f7cdc8d3127f1f3a8b42";
    const B_HEX: &str = "e665239bd40716833823b26757eb0f233af48eda715ed99863982bbc78d194f2\
                         63b0adb82ce814fda2390e66b7d06aabeefa2e249bb51435feb6b0fffd5f7319";
    const X_HEX: &str = "fffb3e5dff9aff0200fffffff2e18581ffffffffffffff81fffdffebff29a7ff";
    const Y_HEX: &str = "11ffffff4f59b1d36b08ffff0bf3af27ffb8ffff98ffebfff26affffea31ffff";
    const MUL_AB_HEX: &str =
        "30f833b71c85946d6f3c977781a5c298935c8cc1ff359e68f64d18dd65a9c060\
         89e5082dd1d8c7bfde1624a72ff1480026af89eac99478ff2ab020ed330c4e88";
    const EXP_AX_HEX: &str =
        "4445fa162366269d44b943ab87e356ca9c89448ee819294d4d597dbe463f550d\
         9809cf434675b871ff37baa063e2ac09381070ac155228f47768327b6efbc143";
    const MULTIEXP_ABXY_HEX: &str =
        "634ad4c16b9067a20be2b3e9953f827e21bf9fcda016566b316668bb25f8bdf3\
         bd5ff848d4bf352ddcd17874ffb147d56b21e51501a8dc8b3c9d96c7c6b00520";
    const INV_A_HEX: &str =
        "12a65bd6918d50a766eb7d52e34017607fdf6ca12c1a37e092c0f7b976abb18a\
         879ad73450f59e7cf16b932ee3b0f033226c8304a50112b50a561b5c8f98a4d1";
    const HASH_SHA256_HEX: &str =
        "2ebb504d88ff2562f3716581adbe836e54f5a62a70e6186bd54a103c8008953d\
         8a43a104b13f3cb4bd6738b107f07a327ecdf02e623e2c1f48aa0d6cdc48f9f7";
    const HASH_SHA384_HEX: &str =
        "e1c828b19adf5d4bc42590fb3820d48b308f9576c37f9dad94c43180d7dfd5fe\
         0e861190afefeb794b3e8092943b2f5e7221eff8bce348a9d03119acd1d74987";
    const HASH_SHA512_HEX: &str =
        "8c62a02d55555586bc82a6a221979b9bb4033d83f3bada9c42f7b394992a96e4\
         4c0ea76217b9fbe5217d5424e02b87f769540cc6adf2f27be691d8f3406c8f03";

    fn g1() -> EcGroup {
        let q = BigNum::from_bytes(&hex::decode(Q_HEX).unwrap()).unwrap();
        let fq = FiniteField::new_prime(q).unwrap();
        let a = fq.zero();
        let b = fq
            .read_element(
                &hex::decode("0000000000000000000000000000000000000000000000000000000000000003")
                    .unwrap(),
            )
            .unwrap();
        let gx = fq
            .read_element(
                &hex::decode("0000000000000000000000000000000000000000000000000000000000000001")
                    .unwrap(),
            )
            .unwrap();
        let gy = fq
            .read_element(
                &hex::decode("0000000000000000000000000000000000000000000000000000000000000002")
                    .unwrap(),
            )
            .unwrap();
        let order = BigNum::from_bytes(&hex::decode(P_HEX).unwrap()).unwrap();
        let one = BigNum::from_u64(1, 32).unwrap();
        EcGroup::new(&fq, a, b, gx, gy, order, one).unwrap()
    }

    fn pt(g: &EcGroup, hex_str: &str) -> EcPoint {
        g.read_point(&hex::decode(hex_str).unwrap()).unwrap()
    }

    #[test]
    fn group_op_matches_fixed_vectors() {
        let g = g1();
        let a = pt(&g, A_HEX);
        let b = pt(&g, B_HEX);
        let ab = g.mul(&a, &b).unwrap();
        assert_eq!(ab.to_bytes(), hex::decode(MUL_AB_HEX).unwrap());
    }

    #[test]
    fn exp_matches_fixed_vector() {
        let g = g1();
        let a = pt(&g, A_HEX);
        let x = BigNum::from_bytes(&hex::decode(X_HEX).unwrap()).unwrap();
        let ax = g.exp(&a, &x).unwrap();
        assert_eq!(ax.to_bytes(), hex::decode(EXP_AX_HEX).unwrap());
        // the uniform ladder agrees
        let ax2 = g.sscm_exp(&a, &x).unwrap();
        assert_eq!(ax, ax2);
    }

    #[test]
    fn multi_exp_matches_fixed_vector() {
        let g = g1();
        let a = pt(&g, A_HEX);
        let b = pt(&g, B_HEX);
        let x = BigNum::from_bytes(&hex::decode(X_HEX).unwrap()).unwrap();
        let y = BigNum::from_bytes(&hex::decode(Y_HEX).unwrap()).unwrap();
        let r = g.multi_exp(&[&a, &b], &[&x, &y]).unwrap();
        assert_eq!(r.to_bytes(), hex::decode(MULTIEXP_ABXY_HEX).unwrap());
        let r2 = g.sscm_multi_exp(&[&a, &b], &[&x, &y]).unwrap();
        assert_eq!(r, r2);
        let r3 = g.multi_exp_bn(&[&a, &b], &[&x, &y]).unwrap();
        assert_eq!(r, r3);
    }

    #[test]
    fn inverse_matches_fixed_vector() {
        let g = g1();
        let a = pt(&g, A_HEX);
        let inv = g.inverse(&a).unwrap();
        assert_eq!(inv.to_bytes(), hex::decode(INV_A_HEX).unwrap());
        assert!(g.mul(&a, &inv).unwrap().is_identity());
    }

    #[test]
    fn identity_round_trip() {
        let g = g1();
        let id = g.read_point(&[0u8; 64]).unwrap();
        assert!(id.is_identity());
        assert_eq!(id.to_bytes(), vec![0u8; 64]);
        let a = pt(&g, A_HEX);
        assert_eq!(g.mul(&a, &id).unwrap(), a);
    }

    #[test]
    fn zero_scalar_gives_identity() {
        let g = g1();
        let a = pt(&g, A_HEX);
        let zero = BigNum::from_u64(0, 32).unwrap();
        assert!(g.exp(&a, &zero).unwrap().is_identity());
        assert!(g.sscm_exp(&a, &zero).unwrap().is_identity());
        assert!(g.multi_exp(&[&a], &[&zero]).unwrap().is_identity());
        assert!(g.sscm_multi_exp(&[&a], &[&zero]).unwrap().is_identity());
    }

    #[test]
    fn exp_rejects_scalar_at_or_above_order() {
        let g = g1();
        let a = pt(&g, A_HEX);
        let p = BigNum::from_bytes(&hex::decode(P_HEX).unwrap()).unwrap();
        assert_eq!(g.exp(&a, &p), Err(MathError::BadArg));
        assert_eq!(g.sscm_exp(&a, &p), Err(MathError::BadArg));
    }

    #[test]
    fn read_rejects_off_curve() {
        let g = g1();
        let mut bytes = hex::decode(A_HEX).unwrap();
        bytes[63] ^= 1;
        assert_eq!(g.read_point(&bytes), Err(MathError::NotOnCurve));
        // in_group answers false rather than an error
        assert_eq!(g.in_group(&bytes), Ok(false));
        assert_eq!(g.in_group(&[0u8; 63]), Err(MathError::BadArg));
    }

    #[test]
    fn generator_is_in_group() {
        let g = g1();
        assert!(g.in_group(&g.generator().to_bytes()).unwrap());
    }

    #[test]
    fn hash_matches_fixed_vectors() {
        let g = g1();
        for (alg, expect) in [
            (HashAlg::Sha256, HASH_SHA256_HEX),
            (HashAlg::Sha384, HASH_SHA384_HEX),
            (HashAlg::Sha512, HASH_SHA512_HEX),
        ] {
            let p = g.hash(b"abc", alg).unwrap();
            assert_eq!(p.to_bytes(), hex::decode(expect).unwrap());
        }
        assert!(g.hash(b"", HashAlg::Sha256).is_err());
    }

    #[test]
    fn make_point_takes_even_root() {
        let g = g1();
        let hashed = pt(&g, HASH_SHA256_HEX);
        let (hx, hy) = hashed.coords().unwrap();
        let lifted = g.make_point(&hx.to_bytes()).unwrap();
        let (lx, ly) = lifted.coords().unwrap();
        assert_eq!(lx, hx);
        // the stored vector carries the odd root, so the lift negates
        assert_eq!(ly.clone(), hy.neg().unwrap());
    }

    #[test]
    fn random_points_are_on_curve() {
        let g = g1();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..4 {
            let p = g.get_random(&mut rng).unwrap();
            assert!(g.in_group(&p.to_bytes()).unwrap());
        }
    }

    #[test]
    fn points_from_different_groups_do_not_mix() {
        let g = g1();
        let h = g1();
        let a = pt(&g, A_HEX);
        let b = pt(&h, B_HEX);
        assert_eq!(g.mul(&a, &b), Err(MathError::MismatchedStructure));
    }

    // Quadratic-twist group over Fq2, exercised with its own vectors.
    mod twist {
        use super::*;

        const G2_X0: &str = "e20171c54aa3da0521670413743ccf22d25d52683d32470ef6021343bf282394";
        const G2_X1: &str = "592d1ef653a85a8046ccdc254fbb565643433bf6289653e27df7b212baa189be";
        const G2_Y0: &str = "ae60a4e751ffd350c621e703312826bd55e8b59a4d916838414db822dd2335ae";
        const G2_Y1: &str = "1ab442f989afe5adf80274f87645e2532cdc61819093d6132c90fe8951b92421";
        const A2_HEX: &str =
            "2f8cc7d7d41e4acb8292c79c0fa2f21bdfea96648ba2327cdfd88910fdbb38cd\
             b12346134d9b8e8a9564dd3729441f76b53a47d3e0181e60e99413a447cdbe03\
             d367a5ccef7bd18d4a7ff18f66cb5e86accb365f29902855f0dc6e8b87b5d832\
             6c0ac558b14eca85443ede719bc7901906d2a04ec733f45ce816e267dbbf6484";
        const B2_HEX: &str =
            "16f16176063ee9c0b9b13a75fcdb90cd01f49fccaa246983be20448758900f4f\
             c75037c1b92de1e379207b6290f8c7f0d75ae7ad65e1c75059a1fc49bc2ae5d7\
             12733ba4dd0fbb35384ae03d796366739c07e1ec71165075a1bae537451a0c59\
             c949b9db7e76c5c50a87b756880921c6f66ccc5e80fd05d05fc62e06a1be5ba0";
        const MUL2_AB_HEX: &str =
            "25cc11808f081d66f8dbbc98262426cf0402b6991b52a8e34e9a85b05cceddc5\
             fc3cc22c4b63725fa9f98c62f4e730716f78f5fef6dff7b521697c50ac56d9b5\
             a5d6ab2ded8efe43cbc9ef09c82de8d03bc05c7fe53a1d72f2f503bde5eb08a0\
             e6f359e4d252fd4fecce499f86502d4a592ca24ee3fef2fcb9f42288bc7921d0";
        const EXP2_AX_HEX: &str =
            "c05a37ad08ab22cff7f9ccd45a473882e1c206354d5b95a1a3c1836c0f3124d2\
             c786e15963ce212a5777e548f7602100402f09185c323275d7b9e7b195d5df02\
             e5dec63e05fc6f7ae32d7d905f43e2b09ecdec7b374c0a3e874ee6dad190c0d1\
             7090547f7893fac4f73a4dbc035e83dfeff752f9647f17c169d6d796186246d1";
        // 2q - p, and p * (2q - p)
        const COFACTOR2_HEX: &str =
            "fffffffffffcf0cd46e5f25eee71a4a00cdc65fb129682eab025084a8c9b1019";
        const ORDER2_HEX: &str =
            "fffffffffff9e19a8dcbe4c738fa9b984d1c129f6497e854a30a81ac42f93916\
             a77021dcfbb6e77e1f5b55cc4e84cd194f492094b5d812a02e7f4013b2faa145";

        fn g2() -> EcGroup {
            let q = BigNum::from_bytes(&hex::decode(Q_HEX).unwrap()).unwrap();
            let fq = FiniteField::new_prime(q).unwrap();
            let beta = fq.one().neg().unwrap();
            let fq2 = FiniteField::new_binomial_extension(&fq, &beta, 2).unwrap();
            // xi = 2 + u, b' = xi^-1 * 3
            let two = fq.one().add(&fq.one()).unwrap();
            let xi = fq2.from_coeffs(vec![two, fq.one()]).unwrap();
            let three = fq.one().add(&fq.one()).unwrap().add(&fq.one()).unwrap();
            let b = xi.inverse().unwrap().mul_ground(&three).unwrap();
            let gx = fq2
                .read_element(&hex::decode(format!("{}{}", G2_X0, G2_X1)).unwrap())
                .unwrap();
            let gy = fq2
                .read_element(&hex::decode(format!("{}{}", G2_Y0, G2_Y1)).unwrap())
                .unwrap();
            let order = BigNum::from_bytes(&hex::decode(ORDER2_HEX).unwrap()).unwrap();
            let cofactor = BigNum::from_bytes(&hex::decode(COFACTOR2_HEX).unwrap()).unwrap();
            EcGroup::new(&fq2, fq2.zero(), b, gx, gy, order, cofactor).unwrap()
        }

        #[test]
        fn twist_group_op_matches_fixed_vectors() {
            let g = g2();
            let a = pt(&g, A2_HEX);
            let b = pt(&g, B2_HEX);
            let ab = g.mul(&a, &b).unwrap();
            assert_eq!(ab.to_bytes(), hex::decode(MUL2_AB_HEX).unwrap());
        }

        #[test]
        fn twist_exp_matches_fixed_vector() {
            let g = g2();
            let a = pt(&g, A2_HEX);
            let x = BigNum::from_bytes(&hex::decode(X_HEX).unwrap()).unwrap();
            let ax = g.exp(&a, &x).unwrap();
            assert_eq!(ax.to_bytes(), hex::decode(EXP2_AX_HEX).unwrap());
        }

        #[test]
        fn twist_has_no_make_point() {
            let g = g2();
            assert!(g.make_point(&[0u8; 64]).is_err());
        }
    }
}
