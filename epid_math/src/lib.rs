//! # Group-signature math primitives
//!
//! Runtime-parameterized arithmetic for pairing-based anonymous
//! attestation over Barreto–Naehrig curves:
//!
//! 1. Fixed-width big integers with checked arithmetic and a
//!    big-endian wire form, in [`bignum`]
//! 2. Prime fields and extension towers built at run time, in [`ff`]
//! 3. Short-Weierstrass curve groups with hashing to the curve, in
//!    [`ec`]
//! 4. The optimal-ate pairing into the degree-12 tower, in [`pairing`]
//!
//! No curve is baked in; the caller supplies moduli, coefficients and
//! generators and gets structurally-checked objects back. Mixing
//! values across parameter sets is an error, not undefined behavior.

pub mod bignum;
pub mod ec;
pub mod error;
pub mod ff;
pub mod pairing;

pub use bignum::BigNum;
pub use ec::{EcGroup, EcPoint};
pub use error::MathError;
pub use ff::{FieldElement, FiniteField, HashAlg};
pub use pairing::Pairing;
