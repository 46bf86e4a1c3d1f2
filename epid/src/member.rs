//! Member (signer) context. A member proves group membership per
//! message with a Schnorr-style proof over its credential (A, x, f),
//! optionally bound to a basename for linkable signing, and attaches
//! one non-revocation proof per entry of the verifier's signature
//! revocation list.
//!
//! The pairing-heavy half of a signature does not depend on the
//! message or basename, so it can be computed ahead of time and pooled
//! ([`Member::add_pre_sigs`]); `sign` drains the pool before falling
//! back to fresh computation.

use crate::{
    commit::{basic_commit, nr_commit},
    error::{EpidError, SigStatus},
    params::Epid2Params,
    types::{
        BasicSignature, EpidSignature, Gid, GroupPubKey, MemberPrecomp, NrProof, PrivKey, SigRl,
        FP_LEN, G1_LEN, GT_LEN,
    },
};
use epid_math::{BigNum, EcPoint, FieldElement, HashAlg};
use rand_core::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// One precomputed signature: the message-independent randomness and
/// the pairing commitment R2. B, K and R1 depend on the basename and
/// are computed at sign time. Consumed at most once; wiped on drop.
#[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
pub struct PreComputedSignature {
    pub(crate) a: FieldElement,
    pub(crate) b: FieldElement,
    pub(crate) rx: FieldElement,
    pub(crate) rf: FieldElement,
    pub(crate) ra: FieldElement,
    pub(crate) rb: FieldElement,
    #[zeroize(skip)]
    pub(crate) t: EcPoint,
    #[zeroize(skip)]
    pub(crate) r2: FieldElement,
}

pub struct Member {
    params: Epid2Params,
    pub_key: GroupPubKey,
    gid: Gid,
    h2: EcPoint,
    a_pt: EcPoint,
    x: FieldElement,
    f: FieldElement,
    // pairing precomputation: e(h1,g2), e(h2,g2), e(h2,w), e(A,g2)
    e12: FieldElement,
    e22: FieldElement,
    e2w: FieldElement,
    ea2: FieldElement,
    hash_alg: HashAlg,
    basenames: Vec<Vec<u8>>,
    presigs: Vec<PreComputedSignature>,
}

impl Drop for Member {
    fn drop(&mut self) {
        self.x.zeroize();
        self.f.zeroize();
    }
}

impl Member {
    /// Builds a member context, verifying that the credential actually
    /// belongs to this group: A must satisfy
    /// e(A, g2^x · w) = e(g1 · h1^f, g2).
    pub fn create(
        pub_key: &GroupPubKey,
        priv_key: &PrivKey,
        precomp: Option<&MemberPrecomp>,
    ) -> Result<Self, EpidError> {
        if pub_key.gid != priv_key.gid {
            return Err(EpidError::BadArg);
        }
        let params = Epid2Params::new()?;
        if !params.g1.in_group(&pub_key.h1)?
            || !params.g1.in_group(&pub_key.h2)?
            || !params.g2.in_group(&pub_key.w)?
        {
            return Err(EpidError::BadArg);
        }
        let h1 = params.g1.read_point(&pub_key.h1)?;
        let h2 = params.g1.read_point(&pub_key.h2)?;
        let w = params.g2.read_point(&pub_key.w)?;
        let a_pt = params.g1.read_point(&priv_key.a)?;
        let x = params.fp.read_element(&priv_key.x)?;
        let f = params.fp.read_element(&priv_key.f)?;

        // credential check: e(A, g2^x * w) = e(g1 * h1^f, g2)
        let g2_gen = params.g2.generator();
        let x_res = x.residue().ok_or(EpidError::BadArg)?;
        let f_res = f.residue().ok_or(EpidError::BadArg)?;
        let t2 = params.g2.mul(&params.g2.exp(&g2_gen, x_res)?, &w)?;
        let lhs = params.pairing.compute(&a_pt, &t2)?;
        let t1 = params
            .g1
            .mul(&params.g1.generator(), &params.g1.sscm_exp(&h1, f_res)?)?;
        let rhs = params.pairing.compute(&t1, &g2_gen)?;
        if lhs != rhs {
            return Err(EpidError::KeyNotInGroup);
        }

        let (e12, e22, e2w, ea2) = match precomp {
            Some(mp) => (
                params.fq12.read_element(&mp.e12)?,
                params.fq12.read_element(&mp.e22)?,
                params.fq12.read_element(&mp.e2w)?,
                params.fq12.read_element(&mp.ea2)?,
            ),
            None => (
                params.pairing.compute(&h1, &g2_gen)?,
                params.pairing.compute(&h2, &g2_gen)?,
                params.pairing.compute(&h2, &w)?,
                params.pairing.compute(&a_pt, &g2_gen)?,
            ),
        };

        Ok(Self {
            gid: pub_key.gid,
            pub_key: pub_key.clone(),
            h2,
            a_pt,
            x,
            f,
            e12,
            e22,
            e2w,
            ea2,
            hash_alg: HashAlg::Sha512,
            basenames: Vec::new(),
            presigs: Vec::new(),
            params,
        })
    }

    pub fn set_hash_alg(&mut self, alg: HashAlg) {
        self.hash_alg = alg;
    }

    /// The member's pairing precomputation in its serialized form.
    pub fn precomp(&self) -> MemberPrecomp {
        MemberPrecomp {
            e12: gt_bytes(&self.e12),
            e22: gt_bytes(&self.e22),
            e2w: gt_bytes(&self.e2w),
            ea2: gt_bytes(&self.ea2),
        }
    }

    /// Registers a basename for later linkable signing. Registering
    /// the same basename twice is its own error kind.
    pub fn register_base_name(&mut self, bsn: &[u8]) -> Result<(), EpidError> {
        if bsn.is_empty() {
            return Err(EpidError::BadArg);
        }
        if self.basenames.iter().any(|b| b == bsn) {
            return Err(EpidError::Duplicate);
        }
        self.basenames.push(bsn.to_vec());
        Ok(())
    }

    fn rand_fp<R: RngCore>(&self, rng: &mut R) -> Result<FieldElement, EpidError> {
        let one = BigNum::from_u64(1, FP_LEN)?;
        Ok(self.params.fp.random(&one, rng)?)
    }

    /// The message-independent half of a signature: fresh randomness,
    /// T = A · h2^a and the pairing commitment
    /// R2 = e(h1,g2)^rf · e(h2,g2)^rb · e(h2,w)^ra · (e(A,g2)·e(h2,g2)^a)^(−rx).
    pub fn compute_pre_sig<R: RngCore>(
        &self,
        rng: &mut R,
    ) -> Result<PreComputedSignature, EpidError> {
        let a = self.rand_fp(rng)?;
        let rx = self.rand_fp(rng)?;
        let rf = self.rand_fp(rng)?;
        let ra = self.rand_fp(rng)?;
        let rb = self.rand_fp(rng)?;
        let b = a.mul(&self.x)?;

        let a_res = a.residue().ok_or(EpidError::BadArg)?;
        let t = self
            .params
            .g1
            .mul(&self.a_pt, &self.params.g1.sscm_exp(&self.h2, a_res)?)?;

        let neg_rx = rx.neg()?;
        let tmp = self.ea2.mul(&self.e22.exp(a_res)?)?;
        let r2 = self
            .e12
            .exp(rf.residue().ok_or(EpidError::BadArg)?)?
            .mul(&self.e22.exp(rb.residue().ok_or(EpidError::BadArg)?)?)?
            .mul(&self.e2w.exp(ra.residue().ok_or(EpidError::BadArg)?)?)?
            .mul(&tmp.exp(neg_rx.residue().ok_or(EpidError::BadArg)?)?)?;

        Ok(PreComputedSignature {
            a,
            b,
            rx,
            rf,
            ra,
            rb,
            t,
            r2,
        })
    }

    /// Appends pre-signatures to the pool: the supplied ones (consumed
    /// by value, `count` must match), or `count` freshly computed ones.
    pub fn add_pre_sigs<R: RngCore>(
        &mut self,
        count: usize,
        presigs: Option<Vec<PreComputedSignature>>,
        rng: &mut R,
    ) -> Result<(), EpidError> {
        if count > usize::MAX / 2 {
            return Err(EpidError::BadArg);
        }
        match presigs {
            Some(sigs) => {
                if sigs.len() != count {
                    return Err(EpidError::BadArg);
                }
                self.presigs.extend(sigs);
            }
            None => {
                for _ in 0..count {
                    let ps = self.compute_pre_sig(rng)?;
                    self.presigs.push(ps);
                }
            }
        }
        Ok(())
    }

    pub fn get_num_pre_sigs(&self) -> usize {
        self.presigs.len()
    }

    /// Hands back `count` pooled pre-signatures, removing them from
    /// the pool. Asking for more than the pool holds is an error.
    pub fn write_pre_sigs(&mut self, count: usize) -> Result<Vec<PreComputedSignature>, EpidError> {
        if count > self.presigs.len() {
            return Err(EpidError::BadArg);
        }
        let at = self.presigs.len() - count;
        Ok(self.presigs.split_off(at))
    }

    /// Produces a basic (revocation-list-free) signature. With a
    /// basename the base point is deterministic and the basename must
    /// have been registered; without one the base point is random.
    pub fn sign_basic<R: RngCore>(
        &mut self,
        msg: &[u8],
        bsn: Option<&[u8]>,
        rng: &mut R,
    ) -> Result<BasicSignature, EpidError> {
        let b_pt = match bsn {
            Some(bsn) => {
                if !self.basenames.iter().any(|b| b == bsn) {
                    return Err(EpidError::BadArg);
                }
                self.params.g1.hash(bsn, self.hash_alg)?
            }
            None => self.params.g1.get_random(rng)?,
        };
        let f_res = self.f.residue().ok_or(EpidError::BadArg)?;
        let k_pt = self.params.g1.sscm_exp(&b_pt, f_res)?;

        let presig = match self.presigs.pop() {
            Some(ps) => ps,
            None => self.compute_pre_sig(rng)?,
        };
        let r1 = self
            .params
            .g1
            .sscm_exp(&b_pt, presig.rf.residue().ok_or(EpidError::BadArg)?)?;

        let b_str = pt_bytes(&b_pt);
        let k_str = pt_bytes(&k_pt);
        let t_str = pt_bytes(&presig.t);
        let c = basic_commit(
            &self.params,
            &self.pub_key,
            &b_str,
            &k_str,
            &t_str,
            &pt_bytes(&r1),
            &presig.r2.to_bytes(),
            msg,
            self.hash_alg,
        )?;

        let sx = presig.rx.add(&c.mul(&self.x)?)?;
        let sf = presig.rf.add(&c.mul(&self.f)?)?;
        let sa = presig.ra.add(&c.mul(&presig.a)?)?;
        let sb = presig.rb.add(&c.mul(&presig.b)?)?;

        Ok(BasicSignature {
            b: b_str,
            k: k_str,
            t: t_str,
            c: fp_bytes(&c),
            sx: fp_bytes(&sx),
            sf: fp_bytes(&sf),
            sa: fp_bytes(&sa),
            sb: fp_bytes(&sb),
        })
    }

    /// Full signing: a basic signature plus one non-revocation proof
    /// per SigRl entry. A member whose own pseudonym is revoked by the
    /// list still gets a complete signature back, with the status
    /// telling the caller so.
    pub fn sign<R: RngCore>(
        &mut self,
        msg: &[u8],
        bsn: Option<&[u8]>,
        sig_rl: Option<&SigRl>,
        rng: &mut R,
    ) -> Result<(EpidSignature, SigStatus), EpidError> {
        if let Some(rl) = sig_rl {
            if rl.gid != self.gid {
                return Err(EpidError::BadArg);
            }
        }
        let sigma0 = self.sign_basic(msg, bsn, rng)?;
        let mut status = SigStatus::Valid;
        let mut proofs = Vec::new();
        let mut rl_ver = 0;
        if let Some(rl) = sig_rl {
            rl_ver = rl.version;
            let f_res = self.f.residue().ok_or(EpidError::BadArg)?;
            for entry in &rl.bk {
                let bp = self.params.g1.read_point(&entry.0)?;
                let kp = self.params.g1.read_point(&entry.1)?;
                if self.params.g1.sscm_exp(&bp, f_res)? == kp {
                    status = SigStatus::RevokedInSigRl;
                }
                proofs.push(self.nr_prove(msg, &sigma0, entry, rng)?);
            }
        }
        Ok((
            EpidSignature {
                sigma0,
                rl_ver,
                proofs,
            },
            status,
        ))
    }

    /// Proves in zero knowledge that this signature's pseudonym (B, K)
    /// does not reuse the private key behind the revoked pair
    /// (B′, K′).
    pub fn nr_prove<R: RngCore>(
        &self,
        msg: &[u8],
        basic_sig: &BasicSignature,
        entry: &([u8; G1_LEN], [u8; G1_LEN]),
        rng: &mut R,
    ) -> Result<NrProof, EpidError> {
        let g1 = &self.params.g1;
        let b_pt = g1.read_point(&basic_sig.b)?;
        let k_pt = g1.read_point(&basic_sig.k)?;
        let bp_pt = g1.read_point(&entry.0)?;
        let kp_pt = g1.read_point(&entry.1)?;

        let mu = self.rand_fp(rng)?;
        let nu = self.f.mul(&mu)?;
        let rmu = self.rand_fp(rng)?;
        let rnu = self.rand_fp(rng)?;

        let neg_mu = mu.neg()?;
        let neg_rmu = rmu.neg()?;
        let nu_res = nu.residue().ok_or(EpidError::BadArg)?;
        let rnu_res = rnu.residue().ok_or(EpidError::BadArg)?;
        let neg_mu_res = neg_mu.residue().ok_or(EpidError::BadArg)?;
        let neg_rmu_res = neg_rmu.residue().ok_or(EpidError::BadArg)?;

        let t = g1.mul(
            &g1.sscm_exp(&bp_pt, nu_res)?,
            &g1.sscm_exp(&kp_pt, neg_mu_res)?,
        )?;
        let r1 = g1.mul(
            &g1.sscm_exp(&b_pt, rnu_res)?,
            &g1.sscm_exp(&k_pt, neg_rmu_res)?,
        )?;
        let r2 = g1.mul(
            &g1.sscm_exp(&bp_pt, rnu_res)?,
            &g1.sscm_exp(&kp_pt, neg_rmu_res)?,
        )?;

        let t_str = pt_bytes(&t);
        let c = nr_commit(
            &self.params,
            &basic_sig.b,
            &basic_sig.k,
            &entry.0,
            &entry.1,
            &t_str,
            &pt_bytes(&r1),
            &pt_bytes(&r2),
            msg,
            self.hash_alg,
        )?;
        let smu = rmu.add(&c.mul(&mu)?)?;
        let snu = rnu.add(&c.mul(&nu)?)?;
        Ok(NrProof {
            t: t_str,
            c: fp_bytes(&c),
            smu: fp_bytes(&smu),
            snu: fp_bytes(&snu),
        })
    }
}

fn fp_bytes(e: &FieldElement) -> [u8; FP_LEN] {
    let mut out = [0u8; FP_LEN];
    out.copy_from_slice(&e.to_bytes());
    out
}

fn pt_bytes(p: &EcPoint) -> [u8; G1_LEN] {
    let mut out = [0u8; G1_LEN];
    out.copy_from_slice(&p.to_bytes());
    out
}

pub(crate) fn gt_bytes(e: &FieldElement) -> [u8; GT_LEN] {
    let mut out = [0u8; GT_LEN];
    out.copy_from_slice(&e.to_bytes());
    out
}
