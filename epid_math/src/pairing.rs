//! Optimal-ate pairing over a Barreto–Naehrig curve pair: the base
//! group over Fq, the twist group over Fq2, and the target group
//! inside Fq12 built as the tower Fq2 -> Fq6 -> Fq12.
//!
//! The Miller loop works on the twist point in modified Jacobian
//! coordinates (X, Y, Z, Z^2) and accumulates the sparse line
//! evaluations directly into Fq12. The loop scalar 6t +/- 2 is walked
//! in signed-ternary form. The final exponentiation separates the easy
//! part (two Frobenius/inverse folds) from the 38-step hard part.

use crate::{
    bignum::BigNum,
    ec::{EcGroup, EcPoint},
    error::MathError,
    ff::{FieldElement, FiniteField},
};

/// A pairing between two curve groups into an Fq12 target field. All
/// Frobenius constants are derived once at construction.
#[derive(Debug)]
pub struct Pairing {
    ga: EcGroup,
    gb: EcGroup,
    ff: FiniteField,
    fq6: FiniteField,
    fq2: FiniteField,
    t: BigNum,
    neg: bool,
    /// frob[k][i] = gamma_{k+1,i+1}: the twist constants for the
    /// first, second and third Frobenius power.
    frob: Vec<Vec<FieldElement>>,
}

/// Twist point in (X, Y, Z, Z^2) coordinates over Fq2.
struct Proj {
    x: FieldElement,
    y: FieldElement,
    z: FieldElement,
    z2: FieldElement,
}

impl Pairing {
    /// `ga` is the base group over a prime field, `gb` the twist group
    /// over the quadratic extension, `ff` the degree-12 tower target.
    /// `t` is the curve family parameter; `neg` selects the loop
    /// scalar 6t - 2 over 6t + 2.
    pub fn new(
        ga: &EcGroup,
        gb: &EcGroup,
        ff: &FiniteField,
        t: BigNum,
        neg: bool,
    ) -> Result<Self, MathError> {
        let fq6 = ff.ground_field().ok_or(MathError::BadArg)?.clone();
        let fq2 = fq6.ground_field().ok_or(MathError::BadArg)?.clone();
        let fq = fq2.ground_field().ok_or(MathError::BadArg)?.clone();
        if ff.degree() != 2 || fq6.degree() != 3 || fq2.degree() != 2 {
            return Err(MathError::BadArg);
        }
        if !ga.field().is_same(&fq) || !gb.field().is_same(&fq2) {
            return Err(MathError::MismatchedStructure);
        }
        let q = fq.modulus().ok_or(MathError::BadArg)?;
        let xi = fq6.binomial_coeff().ok_or(MathError::BadArg)?;

        // gamma_{1,i} = xi^(i(q-1)/6); the other rows fold in the
        // conjugate so they stay norms over Fq.
        let one = BigNum::from_u64(1, q.byte_len())?;
        let six = BigNum::from_u64(6, q.byte_len())?;
        let (e, _) = q.sub(&one, q.byte_len())?.div(&six)?;
        let mut row1 = Vec::with_capacity(5);
        row1.push(xi.exp(&e)?);
        for i in 1..5 {
            let prev: &FieldElement = &row1[i - 1];
            row1.push(prev.mul(&row1[0])?);
        }
        let mut row2 = Vec::with_capacity(5);
        let mut row3 = Vec::with_capacity(5);
        for gi in &row1 {
            let n = gi.mul(&gi.conjugate()?)?;
            row3.push(gi.mul(&n)?);
            row2.push(n);
        }
        Ok(Self {
            ga: ga.clone(),
            gb: gb.clone(),
            ff: ff.clone(),
            fq6,
            fq2,
            t,
            neg,
            frob: vec![row1, row2, row3],
        })
    }

    pub fn target_field(&self) -> &FiniteField {
        &self.ff
    }

    /// e(a, b). An identity on either side maps to the unit of the
    /// target field.
    pub fn compute(&self, a: &EcPoint, b: &EcPoint) -> Result<FieldElement, MathError> {
        if !self.ga.is_same(a.group()) || !self.gb.is_same(b.group()) {
            return Err(MathError::MismatchedStructure);
        }
        let (ax, ay) = match a.coords() {
            Some(c) => c,
            None => return Ok(self.ff.one()),
        };
        let (bx, by) = match b.coords() {
            Some(c) => c,
            None => return Ok(self.ff.one()),
        };

        let cap = self.t.byte_len() + 1;
        let six = BigNum::from_u64(6, cap)?;
        let two = BigNum::from_u64(2, cap)?;
        let s6 = self.t.mul(&six, cap)?;
        let s = if self.neg {
            s6.sub(&two, cap)?
        } else {
            s6.add(&two, cap)?
        };
        let (digits, n) = ternary(&s);

        let mut acc = Proj {
            x: bx.clone(),
            y: by.clone(),
            z: self.fq2.one(),
            z2: self.fq2.one(),
        };
        let mut d = self.ff.one();
        for i in (0..n).rev() {
            let f = self.tangent(ax, ay, &mut acc)?;
            d = d.square()?;
            d = d.mul(&f)?;
            match digits[i] {
                -1 => {
                    let f = self.line(ax, ay, &mut acc, bx, &by.neg()?)?;
                    d = d.mul(&f)?;
                }
                1 => {
                    let f = self.line(ax, ay, &mut acc, bx, by)?;
                    d = d.mul(&f)?;
                }
                _ => {}
            }
        }
        if self.neg {
            acc.y = acc.y.neg()?;
            d = d.conjugate()?;
        }
        let (px, py) = self.pi_op(bx, by, 1)?;
        let f = self.line(ax, ay, &mut acc, &px, &py)?;
        d = d.mul(&f)?;
        let (px, py) = self.pi_op(bx, by, 2)?;
        let f = self.line(ax, ay, &mut acc, &px, &py.neg()?)?;
        d = d.mul(&f)?;
        self.final_exp(&d)
    }

    /// Sparse Fq12 value ((c00, 0, 0), (c10, c11, 0)).
    fn sparse(
        &self,
        c00: FieldElement,
        c10: FieldElement,
        c11: FieldElement,
    ) -> Result<FieldElement, MathError> {
        let z = self.fq2.zero();
        let lo = self.fq6.from_coeffs(vec![c00, z.clone(), z.clone()])?;
        let hi = self.fq6.from_coeffs(vec![c10, c11, z])?;
        self.ff.from_coeffs(vec![lo, hi])
    }

    /// Doubling step: doubles the accumulator and evaluates the
    /// tangent line at (px, py).
    fn tangent(
        &self,
        px: &FieldElement,
        py: &FieldElement,
        acc: &mut Proj,
    ) -> Result<FieldElement, MathError> {
        let t0 = acc.x.square()?;
        let t1 = acc.y.square()?;
        let t2 = t1.square()?;
        let mut t3 = t1.add(&acc.x)?.square()?.sub(&t0)?.sub(&t2)?;
        t3 = t3.add(&t3)?;
        let t4 = t0.add(&t0)?.add(&t0)?;
        let mut t6 = acc.x.add(&t4)?;
        let t5 = t4.square()?;
        let xo = t5.sub(&t3)?.sub(&t3)?;
        let zo = acc.y.add(&acc.z)?.square()?.sub(&t1)?.sub(&acc.z2)?;
        let mut yo = t3.sub(&xo)?.mul(&t4)?;
        for _ in 0..8 {
            yo = yo.sub(&t2)?;
        }
        let mut t3 = t4.mul(&acc.z2)?;
        t3 = t3.add(&t3)?;
        t3 = t3.neg()?;
        let t3 = t3.mul_ground(px)?;
        t6 = t6.square()?.sub(&t0)?.sub(&t5)?;
        for _ in 0..4 {
            t6 = t6.sub(&t1)?;
        }
        let mut t0n = zo.mul(&acc.z2)?;
        t0n = t0n.add(&t0n)?;
        let t0n = t0n.mul_ground(py)?;
        let f = self.sparse(t0n, t3, t6)?;
        acc.z2 = zo.square()?;
        acc.x = xo;
        acc.y = yo;
        acc.z = zo;
        Ok(f)
    }

    /// Addition step: adds (qx, qy) to the accumulator and evaluates
    /// the chord at (px, py).
    fn line(
        &self,
        px: &FieldElement,
        py: &FieldElement,
        acc: &mut Proj,
        qx: &FieldElement,
        qy: &FieldElement,
    ) -> Result<FieldElement, MathError> {
        let t0 = qx.mul(&acc.z2)?;
        let t = qy.square()?;
        let mut t1 = qy.add(&acc.z)?.square()?.sub(&t)?.sub(&acc.z2)?;
        t1 = t1.mul(&acc.z2)?;
        let t2 = t0.sub(&acc.x)?;
        let t3 = t2.square()?;
        let mut t4 = t3.add(&t3)?;
        t4 = t4.add(&t4)?;
        let t5 = t4.mul(&t2)?;
        let mut t6 = t1.sub(&acc.y)?.sub(&acc.y)?;
        let mut t9 = t6.mul(qx)?;
        let t7 = acc.x.mul(&t4)?;
        let xo = t6.square()?.sub(&t5)?.sub(&t7)?.sub(&t7)?;
        let zo = acc.z.add(&t2)?.square()?.sub(&acc.z2)?.sub(&t3)?;
        let mut t10 = qy.add(&zo)?;
        let t8 = t7.sub(&xo)?.mul(&t6)?;
        let mut t0n = acc.y.mul(&t5)?;
        t0n = t0n.add(&t0n)?;
        let yo = t8.sub(&t0n)?;
        let z2o = zo.square()?;
        t10 = t10.square()?.sub(&t)?.sub(&z2o)?;
        t9 = t9.add(&t9)?.sub(&t10)?;
        let mut t10 = zo.mul_ground(py)?;
        t10 = t10.add(&t10)?;
        t6 = t6.neg()?;
        let mut t1 = t6.mul_ground(px)?;
        t1 = t1.add(&t1)?;
        let f = self.sparse(t10, t1, t9)?;
        acc.x = xo;
        acc.y = yo;
        acc.z = zo;
        acc.z2 = z2o;
        Ok(f)
    }

    /// pi_e on a twist point: coordinate Frobenius followed by the
    /// untwisting constants.
    fn pi_op(
        &self,
        x: &FieldElement,
        y: &FieldElement,
        e: usize,
    ) -> Result<(FieldElement, FieldElement), MathError> {
        let (x, y) = if e == 1 {
            (x.conjugate()?, y.conjugate()?)
        } else {
            (x.clone(), y.clone())
        };
        Ok((x.mul(&self.frob[e - 1][1])?, y.mul(&self.frob[e - 1][2])?))
    }

    /// The e-th power Frobenius on Fq12, coefficient-wise.
    fn frobenius(&self, a: &FieldElement, e: usize) -> Result<FieldElement, MathError> {
        let c = a.coeffs().ok_or(MathError::BadArg)?;
        let lo = c[0].coeffs().ok_or(MathError::BadArg)?;
        let hi = c[1].coeffs().ok_or(MathError::BadArg)?;
        let mut d = vec![
            lo[0].clone(),
            hi[0].clone(),
            lo[1].clone(),
            hi[1].clone(),
            lo[2].clone(),
            hi[2].clone(),
        ];
        if e == 1 || e == 3 {
            for x in d.iter_mut() {
                *x = x.conjugate()?;
            }
        }
        for (i, x) in d.iter_mut().enumerate().skip(1) {
            *x = x.mul(&self.frob[e - 1][i - 1])?;
        }
        let lo = self
            .fq6
            .from_coeffs(vec![d[0].clone(), d[2].clone(), d[4].clone()])?;
        let hi = self
            .fq6
            .from_coeffs(vec![d[1].clone(), d[3].clone(), d[5].clone()])?;
        self.ff.from_coeffs(vec![lo, hi])
    }

    fn exp_by_t(&self, a: &FieldElement) -> Result<FieldElement, MathError> {
        let r = a.exp(&self.t)?;
        if self.neg {
            r.conjugate()
        } else {
            Ok(r)
        }
    }

    fn final_exp(&self, h: &FieldElement) -> Result<FieldElement, MathError> {
        // easy part: h^(q^6 - 1) * (that)^(q^2 + 1)
        let f = h.conjugate()?.mul(&h.inverse()?)?;
        let f = self.frobenius(&f, 2)?.mul(&f)?;
        // hard part
        let ft1 = self.exp_by_t(&f)?;
        let ft2 = self.exp_by_t(&ft1)?;
        let ft3 = self.exp_by_t(&ft2)?;
        let fp1 = self.frobenius(&f, 1)?;
        let fp2 = self.frobenius(&f, 2)?;
        let fp3 = self.frobenius(&f, 3)?;
        let y0 = fp1.mul(&fp2)?.mul(&fp3)?;
        let y1 = f.conjugate()?;
        let y2 = self.frobenius(&ft2, 2)?;
        let y3 = self.frobenius(&ft1, 1)?.conjugate()?;
        let y4 = self.frobenius(&ft2, 1)?.mul(&ft1)?.conjugate()?;
        let y5 = ft2.conjugate()?;
        let y6 = self.frobenius(&ft3, 1)?.mul(&ft3)?.conjugate()?;
        let mut t0 = y6.square()?;
        t0 = t0.mul(&y4)?.mul(&y5)?;
        let mut t1 = y3.mul(&y5)?.mul(&t0)?;
        t0 = t0.mul(&y2)?;
        t1 = t1.square()?;
        t1 = t1.mul(&t0)?;
        t1 = t1.square()?;
        let t0 = t1.mul(&y1)?;
        let t1 = t1.mul(&y0)?;
        let t0 = t0.square()?;
        t1.mul(&t0)
    }
}

/// Signed-ternary recoding of the loop scalar. Returns the digit
/// string and the index of its most significant digit.
fn ternary(s: &BigNum) -> (Vec<i8>, usize) {
    let nb = s.bit_len();
    let mut digits = vec![0i8; nb + 1];
    let mut carry = false;
    let mut n = nb.saturating_sub(1);
    for i in 0..nb {
        if s.bit(i) {
            if carry {
                digits[i] = 0;
            } else if i + 2 < nb && s.bit(i + 1) {
                digits[i] = -1;
                carry = true;
            } else {
                digits[i] = 1;
            }
        } else if carry {
            digits[i] = 1;
            carry = false;
        }
    }
    if carry {
        n += 1;
        digits[n] = 1;
    }
    (digits, n)
}
