//! Commit-hash transcripts shared by signing and verification. The
//! ordering and the fixed wire encoding of every component are what
//! make a signature verifiable; both sides assemble the same octet
//! string and reduce it into Fp twice (once over the protocol values,
//! once over the message).

use crate::{error::EpidError, params::Epid2Params, types::GroupPubKey};
use epid_math::{FieldElement, HashAlg};

/// c = Fp.hash(Fp.hash(p ‖ g1 ‖ g2 ‖ h1 ‖ h2 ‖ w ‖ B ‖ K ‖ T ‖ R1 ‖ R2) ‖ msg)
#[allow(clippy::too_many_arguments)]
pub(crate) fn basic_commit(
    params: &Epid2Params,
    pub_key: &GroupPubKey,
    b: &[u8],
    k: &[u8],
    t: &[u8],
    r1: &[u8],
    r2: &[u8],
    msg: &[u8],
    alg: HashAlg,
) -> Result<FieldElement, EpidError> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&params.p_bytes());
    buf.extend_from_slice(&params.g1.generator().to_bytes());
    buf.extend_from_slice(&params.g2.generator().to_bytes());
    buf.extend_from_slice(&pub_key.h1);
    buf.extend_from_slice(&pub_key.h2);
    buf.extend_from_slice(&pub_key.w);
    buf.extend_from_slice(b);
    buf.extend_from_slice(k);
    buf.extend_from_slice(t);
    buf.extend_from_slice(r1);
    buf.extend_from_slice(r2);
    finish(params, buf, msg, alg)
}

/// c = Fp.hash(Fp.hash(p ‖ g1 ‖ B ‖ K ‖ B′ ‖ K′ ‖ T ‖ R1 ‖ R2) ‖ msg)
#[allow(clippy::too_many_arguments)]
pub(crate) fn nr_commit(
    params: &Epid2Params,
    b: &[u8],
    k: &[u8],
    bp: &[u8],
    kp: &[u8],
    t: &[u8],
    r1: &[u8],
    r2: &[u8],
    msg: &[u8],
    alg: HashAlg,
) -> Result<FieldElement, EpidError> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&params.p_bytes());
    buf.extend_from_slice(&params.g1.generator().to_bytes());
    buf.extend_from_slice(b);
    buf.extend_from_slice(k);
    buf.extend_from_slice(bp);
    buf.extend_from_slice(kp);
    buf.extend_from_slice(t);
    buf.extend_from_slice(r1);
    buf.extend_from_slice(r2);
    finish(params, buf, msg, alg)
}

fn finish(
    params: &Epid2Params,
    buf: Vec<u8>,
    msg: &[u8],
    alg: HashAlg,
) -> Result<FieldElement, EpidError> {
    let inner = params.fp.hash(&buf, alg)?;
    let mut outer = inner.to_bytes();
    outer.extend_from_slice(msg);
    Ok(params.fp.hash(&outer, alg)?)
}
