//! Fixed-capacity big-endian unsigned integers with checked arithmetic.
//!
//! A [`BigNum`] carries the byte width it was declared with; every
//! operation states the width of its destination and fails rather than
//! silently truncating. Values are exchanged with callers as big-endian
//! byte strings, the only representation the wire formats use.

use crate::error::MathError;
use core::cmp::Ordering;
use zeroize::Zeroize;

/// Largest supported byte width. Anything this size or above is a
/// caller bug, not a legitimate operand.
pub const MAX_BYTE_LEN: usize = 1 << 16;

#[derive(Clone, Debug, Zeroize)]
pub struct BigNum {
    /// Declared width in bytes; fixed for the lifetime of the value.
    cap: usize,
    /// Little-endian 64-bit limbs, `ceil(cap / 8)` of them. The value
    /// always fits in `cap` bytes.
    limbs: Vec<u64>,
}

impl BigNum {
    /// Zero of the given byte width.
    pub fn new(byte_len: usize) -> Result<Self, MathError> {
        if byte_len == 0 || byte_len >= MAX_BYTE_LEN {
            return Err(MathError::BadArg);
        }
        Ok(Self {
            cap: byte_len,
            limbs: vec![0; byte_len.div_ceil(8)],
        })
    }

    /// Zero of a byte width that has already been validated by an
    /// earlier construction.
    pub(crate) fn zeroed(byte_len: usize) -> Self {
        Self {
            cap: byte_len,
            limbs: vec![0; byte_len.div_ceil(8)],
        }
    }

    /// One of a byte width that has already been validated.
    pub(crate) fn one_of(byte_len: usize) -> Self {
        let mut n = Self::zeroed(byte_len);
        n.limbs[0] = 1;
        n
    }

    /// Value of `bytes` with width `bytes.len()`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MathError> {
        let mut n = Self::new(bytes.len())?;
        n.read(bytes)?;
        Ok(n)
    }

    pub fn from_u64(v: u64, byte_len: usize) -> Result<Self, MathError> {
        let mut n = Self::new(byte_len)?;
        if byte_len < 8 && byte_len < (8 - v.leading_zeros() as usize / 8) {
            return Err(MathError::Overflow);
        }
        n.limbs[0] = v;
        if !n.fits() {
            return Err(MathError::Overflow);
        }
        Ok(n)
    }

    /// 2^n, failing if it does not fit the width.
    pub fn pow2(n: u32, byte_len: usize) -> Result<Self, MathError> {
        if n as usize >= byte_len * 8 {
            return Err(MathError::Overflow);
        }
        let mut r = Self::new(byte_len)?;
        r.limbs[(n / 64) as usize] = 1u64 << (n % 64);
        Ok(r)
    }

    pub fn byte_len(&self) -> usize {
        self.cap
    }

    /// Replaces the value, keeping the declared width. The source may be
    /// shorter than the width (left-padded) but never longer or empty.
    pub fn read(&mut self, bytes: &[u8]) -> Result<(), MathError> {
        if bytes.is_empty() || bytes.len() > self.cap {
            return Err(MathError::BadArg);
        }
        for l in self.limbs.iter_mut() {
            *l = 0;
        }
        for (i, &b) in bytes.iter().rev().enumerate() {
            self.limbs[i / 8] |= (b as u64) << (8 * (i % 8));
        }
        Ok(())
    }

    /// Big-endian encoding, exactly the declared width.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.cap];
        self.write_into(&mut out)
            .unwrap_or_else(|_| unreachable!("value always fits its own width"));
        out
    }

    /// Left-padded big-endian encoding into `out`; fails if the value
    /// needs more bytes than `out` offers.
    pub fn write_into(&self, out: &mut [u8]) -> Result<(), MathError> {
        if out.is_empty() {
            return Err(MathError::BadArg);
        }
        let need = self.min_byte_len();
        if need > out.len() {
            return Err(MathError::Overflow);
        }
        for b in out.iter_mut() {
            *b = 0;
        }
        let n = out.len();
        for i in 0..need {
            out[n - 1 - i] = (self.limbs[i / 8] >> (8 * (i % 8))) as u8;
        }
        Ok(())
    }

    pub fn is_zero(&self) -> bool {
        self.limbs.iter().all(|&l| l == 0)
    }

    pub fn is_even(&self) -> bool {
        self.limbs[0] & 1 == 0
    }

    pub fn bit(&self, i: usize) -> bool {
        let limb = i / 64;
        limb < self.limbs.len() && (self.limbs[limb] >> (i % 64)) & 1 == 1
    }

    pub fn bit_len(&self) -> usize {
        for (i, &l) in self.limbs.iter().enumerate().rev() {
            if l != 0 {
                return i * 64 + (64 - l.leading_zeros() as usize);
            }
        }
        0
    }

    fn min_byte_len(&self) -> usize {
        self.bit_len().div_ceil(8).max(1)
    }

    fn fits(&self) -> bool {
        self.min_byte_len() <= self.cap || self.is_zero()
    }

    pub fn compare(&self, other: &BigNum) -> Ordering {
        cmp_limbs(&self.limbs, &other.limbs)
    }

    /// `self + other`, destination width `cap`.
    pub fn add(&self, other: &BigNum, cap: usize) -> Result<BigNum, MathError> {
        let sum = add_limbs(&self.limbs, &other.limbs);
        if bit_len_limbs(&sum) > cap * 8 {
            return Err(MathError::Overflow);
        }
        let mut r = BigNum::new(cap)?;
        r.limbs.copy_from_slice(&pad(&sum, cap.div_ceil(8)));
        Ok(r)
    }

    /// `self - other`, destination width `cap`; underflow is an error.
    pub fn sub(&self, other: &BigNum, cap: usize) -> Result<BigNum, MathError> {
        if cmp_limbs(&self.limbs, &other.limbs) == Ordering::Less {
            return Err(MathError::Underflow);
        }
        let diff = sub_limbs(&self.limbs, &other.limbs);
        if bit_len_limbs(&diff) > cap * 8 {
            return Err(MathError::Overflow);
        }
        let mut r = BigNum::new(cap)?;
        r.limbs.copy_from_slice(&pad(&diff, cap.div_ceil(8)));
        Ok(r)
    }

    /// `self * other`, destination width `cap`.
    pub fn mul(&self, other: &BigNum, cap: usize) -> Result<BigNum, MathError> {
        let prod = mul_limbs(&self.limbs, &other.limbs);
        if bit_len_limbs(&prod) > cap * 8 {
            return Err(MathError::Overflow);
        }
        let mut r = BigNum::new(cap)?;
        r.limbs.copy_from_slice(&pad(&prod, cap.div_ceil(8)));
        Ok(r)
    }

    /// Euclidean division: `(self / other, self % other)`. The quotient
    /// keeps this value's width, the remainder the divisor's.
    pub fn div(&self, other: &BigNum) -> Result<(BigNum, BigNum), MathError> {
        if other.is_zero() {
            return Err(MathError::DivideByZero);
        }
        let (q, rem) = div_rem_limbs(&self.limbs, &other.limbs);
        let mut quo = BigNum::new(self.cap)?;
        quo.limbs.copy_from_slice(&pad(&q, self.cap.div_ceil(8)));
        let mut r = BigNum::new(other.cap)?;
        r.limbs.copy_from_slice(&pad(&rem, other.cap.div_ceil(8)));
        Ok((quo, r))
    }

    // Modular helpers used by the field layer. All results take the
    // modulus' width; operands are assumed already reduced.

    pub(crate) fn mod_add(&self, other: &BigNum, m: &BigNum) -> BigNum {
        let mut s = add_limbs(&self.limbs, &other.limbs);
        if cmp_limbs(&s, &m.limbs) != Ordering::Less {
            s = sub_limbs(&s, &m.limbs);
        }
        BigNum {
            cap: m.cap,
            limbs: pad(&s, m.cap.div_ceil(8)),
        }
    }

    pub(crate) fn mod_sub(&self, other: &BigNum, m: &BigNum) -> BigNum {
        let d = if cmp_limbs(&self.limbs, &other.limbs) == Ordering::Less {
            sub_limbs(&add_limbs(&self.limbs, &m.limbs), &other.limbs)
        } else {
            sub_limbs(&self.limbs, &other.limbs)
        };
        BigNum {
            cap: m.cap,
            limbs: pad(&d, m.cap.div_ceil(8)),
        }
    }

    pub(crate) fn mod_neg(&self, m: &BigNum) -> BigNum {
        if self.is_zero() {
            BigNum {
                cap: m.cap,
                limbs: vec![0; m.cap.div_ceil(8)],
            }
        } else {
            m.mod_sub(self, m)
        }
    }

    pub(crate) fn mod_mul(&self, other: &BigNum, m: &BigNum) -> BigNum {
        let prod = mul_limbs(&self.limbs, &other.limbs);
        let (_, rem) = div_rem_limbs(&prod, &m.limbs);
        BigNum {
            cap: m.cap,
            limbs: pad(&rem, m.cap.div_ceil(8)),
        }
    }

    pub(crate) fn mod_reduce(&self, m: &BigNum) -> BigNum {
        let (_, rem) = div_rem_limbs(&self.limbs, &m.limbs);
        BigNum {
            cap: m.cap,
            limbs: pad(&rem, m.cap.div_ceil(8)),
        }
    }

    pub(crate) fn mod_exp(&self, e: &BigNum, m: &BigNum) -> BigNum {
        let mut r = BigNum::from_u64(1, m.cap).unwrap_or_else(|_| unreachable!());
        let mut base = self.mod_reduce(m);
        for i in 0..e.bit_len() {
            if e.bit(i) {
                r = r.mod_mul(&base, m);
            }
            base = base.mod_mul(&base, m);
        }
        r
    }
}

impl PartialEq for BigNum {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}
impl Eq for BigNum {}

fn pad(limbs: &[u64], len: usize) -> Vec<u64> {
    let mut v = limbs.to_vec();
    v.resize(len.max(limbs.len()), 0);
    v.truncate(len);
    debug_assert!(limbs[len.min(limbs.len())..].iter().all(|&l| l == 0));
    v
}

fn bit_len_limbs(limbs: &[u64]) -> usize {
    for (i, &l) in limbs.iter().enumerate().rev() {
        if l != 0 {
            return i * 64 + (64 - l.leading_zeros() as usize);
        }
    }
    0
}

fn cmp_limbs(a: &[u64], b: &[u64]) -> Ordering {
    let n = a.len().max(b.len());
    for i in (0..n).rev() {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        match x.cmp(&y) {
            Ordering::Equal => continue,
            ord => return ord,
        }
    }
    Ordering::Equal
}

fn add_limbs(a: &[u64], b: &[u64]) -> Vec<u64> {
    let n = a.len().max(b.len());
    let mut out = Vec::with_capacity(n + 1);
    let mut carry = 0u64;
    for i in 0..n {
        let x = a.get(i).copied().unwrap_or(0) as u128;
        let y = b.get(i).copied().unwrap_or(0) as u128;
        let s = x + y + carry as u128;
        out.push(s as u64);
        carry = (s >> 64) as u64;
    }
    out.push(carry);
    out
}

/// Requires a >= b.
fn sub_limbs(a: &[u64], b: &[u64]) -> Vec<u64> {
    let mut out = Vec::with_capacity(a.len());
    let mut borrow = 0u64;
    for i in 0..a.len() {
        let x = a[i] as u128;
        let y = b.get(i).copied().unwrap_or(0) as u128 + borrow as u128;
        if x >= y {
            out.push((x - y) as u64);
            borrow = 0;
        } else {
            out.push(((1u128 << 64) + x - y) as u64);
            borrow = 1;
        }
    }
    out
}

fn mul_limbs(a: &[u64], b: &[u64]) -> Vec<u64> {
    let mut out = vec![0u64; a.len() + b.len()];
    for (i, &x) in a.iter().enumerate() {
        let mut carry = 0u128;
        for (j, &y) in b.iter().enumerate() {
            let t = out[i + j] as u128 + x as u128 * y as u128 + carry;
            out[i + j] = t as u64;
            carry = t >> 64;
        }
        out[i + b.len()] = carry as u64;
    }
    out
}

/// Binary long division. Divisor must be nonzero.
fn div_rem_limbs(a: &[u64], b: &[u64]) -> (Vec<u64>, Vec<u64>) {
    debug_assert!(b.iter().any(|&l| l != 0));
    let mut quo = vec![0u64; a.len()];
    let mut rem: Vec<u64> = vec![0u64; b.len() + 1];
    for i in (0..bit_len_limbs(a)).rev() {
        // rem = rem << 1 | bit(a, i)
        let mut carry = (a[i / 64] >> (i % 64)) & 1;
        for l in rem.iter_mut() {
            let next = *l >> 63;
            *l = (*l << 1) | carry;
            carry = next;
        }
        if cmp_limbs(&rem, b) != Ordering::Less {
            rem = sub_limbs(&rem, b);
            rem.resize(b.len() + 1, 0);
            quo[i / 64] |= 1u64 << (i % 64);
        }
    }
    (quo, rem)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bn(hex_str: &str, len: usize) -> BigNum {
        let bytes = hex::decode(hex_str).unwrap();
        let mut n = BigNum::new(len).unwrap();
        n.read(&bytes).unwrap();
        n
    }

    #[test]
    fn identities() {
        let a = bn("0fa2f21bdfea96648ba2327c", 12);
        let zero = BigNum::new(12).unwrap();
        let one = BigNum::from_u64(1, 12).unwrap();
        assert_eq!(a.add(&zero, 12).unwrap(), a);
        assert_eq!(a.sub(&zero, 12).unwrap(), a);
        assert_eq!(a.mul(&one, 12).unwrap(), a);
        let (q, r) = a.div(&a).unwrap();
        assert_eq!(q, BigNum::from_u64(1, 12).unwrap());
        assert!(r.is_zero());
    }

    #[test]
    fn one_div_two() {
        let one = BigNum::from_u64(1, 4).unwrap();
        let two = BigNum::from_u64(2, 4).unwrap();
        let (q, r) = one.div(&two).unwrap();
        assert!(q.is_zero());
        assert_eq!(r, BigNum::from_u64(1, 4).unwrap());
    }

    #[test]
    fn sub_underflow() {
        let a = BigNum::from_u64(5, 4).unwrap();
        let b = BigNum::from_u64(6, 4).unwrap();
        assert_eq!(a.sub(&b, 4), Err(MathError::Underflow));
    }

    #[test]
    fn add_overflow_checked_against_destination() {
        let a = bn("ffffffff", 4);
        let one = BigNum::from_u64(1, 4).unwrap();
        assert_eq!(a.add(&one, 4), Err(MathError::Overflow));
        // the same sum fits a wider destination
        let five = a.add(&one, 5).unwrap();
        assert_eq!(five.to_bytes(), hex::decode("0100000000").unwrap());
    }

    #[test]
    fn mul_overflow() {
        let a = bn("ffffffff", 4);
        assert_eq!(a.mul(&a, 4), Err(MathError::Overflow));
        let wide = a.mul(&a, 8).unwrap();
        assert_eq!(wide.to_bytes(), hex::decode("fffffffe00000001").unwrap());
    }

    #[test]
    fn div_by_zero() {
        let a = BigNum::from_u64(5, 4).unwrap();
        let zero = BigNum::new(4).unwrap();
        assert_eq!(a.div(&zero), Err(MathError::DivideByZero));
    }

    #[test]
    fn read_write_round_trip() {
        let bytes = hex::decode("00ffb8ffff98ffebfff26affffea31ffff").unwrap();
        let n = BigNum::from_bytes(&bytes).unwrap();
        assert_eq!(n.to_bytes(), bytes);
        // shorter source is left-padded
        let mut m = BigNum::new(32).unwrap();
        m.read(&bytes).unwrap();
        let out = m.to_bytes();
        assert_eq!(&out[32 - bytes.len()..], &bytes[..]);
        assert!(out[..32 - bytes.len()].iter().all(|&b| b == 0));
    }

    #[test]
    fn read_rejects_bad_lengths() {
        let mut n = BigNum::new(4).unwrap();
        assert_eq!(n.read(&[]), Err(MathError::BadArg));
        assert_eq!(n.read(&[0u8; 5]), Err(MathError::BadArg));
    }

    #[test]
    fn pow2_bounds() {
        let p = BigNum::pow2(17, 4).unwrap();
        assert_eq!(p.to_bytes(), hex::decode("00020000").unwrap());
        assert_eq!(BigNum::pow2(32, 4), Err(MathError::Overflow));
    }

    #[test]
    fn parity_and_zero() {
        assert!(BigNum::new(4).unwrap().is_zero());
        assert!(BigNum::from_u64(4, 4).unwrap().is_even());
        assert!(!BigNum::from_u64(7, 4).unwrap().is_even());
    }

    #[test]
    fn modular_ops() {
        let m = bn("fffffffb", 4);
        let a = bn("fffffff0", 4);
        let b = bn("0000001d", 4);
        let s = a.mod_add(&b, &m);
        // (m - 11 + 0x1d) mod m = 0x12
        assert_eq!(s, BigNum::from_u64(0x12, 4).unwrap());
        let d = b.mod_sub(&a, &m);
        let back = d.mod_add(&a, &m);
        assert_eq!(back, b);
        let p = a.mod_mul(&b, &m);
        let expect = a.mul(&b, 8).unwrap().mod_reduce(&m);
        assert_eq!(p, expect);
    }

    #[test]
    fn mod_exp_small() {
        let m = bn("fffffffb", 4); // prime
        let a = BigNum::from_u64(3, 4).unwrap();
        let e = BigNum::from_u64(20, 4).unwrap();
        let r = a.mod_exp(&e, &m);
        assert_eq!(r, BigNum::from_u64(3u64.pow(20) % 0xfffffffb, 4).unwrap());
    }
}
