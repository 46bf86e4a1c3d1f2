//! Verifier context. Checks group signatures against the group public
//! key and up to four revocation lists: private-key revocations
//! (PrivRl), signature-based revocations (SigRl, enforced through the
//! member's non-revocation proofs), revoked groups (GroupRl), and the
//! verifier's own basename-scoped blacklist (VerifierRl).

use crate::{
    commit::{basic_commit, nr_commit},
    error::{EpidError, SigStatus},
    member::gt_bytes,
    params::Epid2Params,
    types::{
        BasicSignature, EpidSignature, Gid, GroupPubKey, GroupRl, NrProof, PrivRl, SigRl,
        VerifierPrecomp, VerifierRl, FP_LEN, G1_LEN,
    },
};
use epid_math::{EcPoint, FieldElement, HashAlg};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub struct Verifier {
    params: Epid2Params,
    pub_key: GroupPubKey,
    gid: Gid,
    w: EcPoint,
    // pairing precomputation: e(h1,g2), e(h2,g2), e(h2,w), e(g1,g2)
    e12: FieldElement,
    e22: FieldElement,
    e2w: FieldElement,
    eg12: FieldElement,
    hash_alg: HashAlg,
    basename: Option<Vec<u8>>,
    basename_pt: Option<EcPoint>,
    priv_rl: Option<PrivRl>,
    sig_rl: Option<SigRl>,
    group_rl: Option<GroupRl>,
    verifier_rl: Option<VerifierRl>,
    // entries appended since the last export; the version bumps once
    // per export, not once per append
    verifier_rl_updated: bool,
}

impl Verifier {
    pub fn create(
        pub_key: &GroupPubKey,
        precomp: Option<&VerifierPrecomp>,
    ) -> Result<Self, EpidError> {
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
        let g2_gen = params.g2.generator();

        let (e12, e22, e2w, eg12) = match precomp {
            Some(vp) => (
                params.fq12.read_element(&vp.e12)?,
                params.fq12.read_element(&vp.e22)?,
                params.fq12.read_element(&vp.e2w)?,
                params.fq12.read_element(&vp.eg12)?,
            ),
            None => (
                params.pairing.compute(&h1, &g2_gen)?,
                params.pairing.compute(&h2, &g2_gen)?,
                params.pairing.compute(&h2, &w)?,
                params.pairing.compute(&params.g1.generator(), &g2_gen)?,
            ),
        };

        Ok(Self {
            gid: pub_key.gid,
            pub_key: pub_key.clone(),
            w,
            e12,
            e22,
            e2w,
            eg12,
            hash_alg: HashAlg::Sha512,
            basename: None,
            basename_pt: None,
            priv_rl: None,
            sig_rl: None,
            group_rl: None,
            verifier_rl: None,
            verifier_rl_updated: false,
            params,
        })
    }

    /// Switches the commit-hash algorithm. The basename base point
    /// depends on the algorithm, so a registered basename is re-hashed
    /// under the new one, which also invalidates any installed
    /// VerifierRl.
    pub fn set_hash_alg(&mut self, alg: HashAlg) -> Result<(), EpidError> {
        self.hash_alg = alg;
        let bsn = self.basename.take();
        self.set_basename(bsn.as_deref())
    }

    /// The verifier's pairing precomputation in its serialized form.
    pub fn precomp(&self) -> VerifierPrecomp {
        VerifierPrecomp {
            e12: gt_bytes(&self.e12),
            e22: gt_bytes(&self.e22),
            e2w: gt_bytes(&self.e2w),
            eg12: gt_bytes(&self.eg12),
        }
    }

    /// Sets (or clears) the basename this verifier accepts. Signatures
    /// must then use the matching deterministic base point. Changing
    /// the basename invalidates any installed VerifierRl.
    pub fn set_basename(&mut self, bsn: Option<&[u8]>) -> Result<(), EpidError> {
        match bsn {
            Some(bsn) => {
                if bsn.is_empty() {
                    return Err(EpidError::BadArg);
                }
                self.basename_pt = Some(self.params.g1.hash(bsn, self.hash_alg)?);
                self.basename = Some(bsn.to_vec());
            }
            None => {
                self.basename = None;
                self.basename_pt = None;
            }
        }
        self.verifier_rl = None;
        self.verifier_rl_updated = false;
        Ok(())
    }

    pub fn set_priv_rl(&mut self, rl: PrivRl) -> Result<(), EpidError> {
        if rl.gid != self.gid {
            return Err(EpidError::BadArg);
        }
        if let Some(cur) = &self.priv_rl {
            if rl.version <= cur.version {
                return Err(EpidError::BadArg);
            }
        }
        for f in &rl.f {
            self.params
                .fp
                .read_element(f)
                .map_err(|_| EpidError::BadArg)?;
        }
        self.priv_rl = Some(rl);
        Ok(())
    }

    pub fn set_sig_rl(&mut self, rl: SigRl) -> Result<(), EpidError> {
        if rl.gid != self.gid {
            return Err(EpidError::BadArg);
        }
        if let Some(cur) = &self.sig_rl {
            if rl.version <= cur.version {
                return Err(EpidError::BadArg);
            }
        }
        for (b, k) in &rl.bk {
            if !self.params.g1.in_group(b)? || !self.params.g1.in_group(k)? {
                return Err(EpidError::BadArg);
            }
        }
        self.sig_rl = Some(rl);
        Ok(())
    }

    pub fn set_group_rl(&mut self, rl: GroupRl) -> Result<(), EpidError> {
        if let Some(cur) = &self.group_rl {
            if rl.version <= cur.version {
                return Err(EpidError::BadArg);
            }
        }
        self.group_rl = Some(rl);
        Ok(())
    }

    /// Installs a verifier blacklist. It must have been built for this
    /// verifier's current basename.
    pub fn set_verifier_rl(&mut self, rl: VerifierRl) -> Result<(), EpidError> {
        if rl.gid != self.gid {
            return Err(EpidError::BadArg);
        }
        let b_pt = self
            .basename_pt
            .as_ref()
            .ok_or(EpidError::InconsistentBasenameSet)?;
        if b_pt.to_bytes() != rl.b {
            return Err(EpidError::InconsistentBasenameSet);
        }
        if let Some(cur) = &self.verifier_rl {
            if rl.version <= cur.version {
                return Err(EpidError::BadArg);
            }
        }
        self.verifier_rl = Some(rl);
        self.verifier_rl_updated = false;
        Ok(())
    }

    /// Full verification: structural checks against the installed
    /// SigRl, then the basic proof itself, then the four revocation
    /// checks in a fixed order (group, private key, per-entry
    /// non-revocation proofs, verifier blacklist). The first failure
    /// wins; a malformed signature is `Invalid` even if its group is
    /// also revoked.
    pub fn verify(&self, sig: &EpidSignature, msg: &[u8]) -> Result<SigStatus, EpidError> {
        match &self.sig_rl {
            Some(rl) => {
                if sig.rl_ver != rl.version || sig.proofs.len() != rl.bk.len() {
                    return Err(EpidError::BadArg);
                }
            }
            None => {
                if !sig.proofs.is_empty() {
                    return Err(EpidError::BadArg);
                }
            }
        }

        if self.verify_basic_sig(&sig.sigma0, msg)? != SigStatus::Valid {
            return Ok(SigStatus::Invalid);
        }

        if let Some(rl) = &self.group_rl {
            if rl.gids.iter().any(|g| *g == self.gid) {
                return Ok(SigStatus::RevokedInGroupRl);
            }
        }

        if let Some(rl) = &self.priv_rl {
            for f in &rl.f {
                if self.check_priv_rl_entry(&sig.sigma0, f)? {
                    return Ok(SigStatus::RevokedInPrivRl);
                }
            }
        }

        if let Some(rl) = &self.sig_rl {
            #[cfg(feature = "parallel")]
            let checks = rl
                .bk
                .par_iter()
                .zip(sig.proofs.par_iter())
                .map(|(entry, proof)| self.nr_verify(msg, &sig.sigma0, entry, proof))
                .collect::<Result<Vec<_>, _>>()?;
            #[cfg(not(feature = "parallel"))]
            let checks = rl
                .bk
                .iter()
                .zip(sig.proofs.iter())
                .map(|(entry, proof)| self.nr_verify(msg, &sig.sigma0, entry, proof))
                .collect::<Result<Vec<_>, _>>()?;
            if checks.iter().any(|ok| !ok) {
                return Ok(SigStatus::RevokedInSigRl);
            }
        }

        if let Some(rl) = &self.verifier_rl {
            if rl.k.iter().any(|k| *k == sig.sigma0.k) {
                return Ok(SigStatus::RevokedInVerifierRl);
            }
        }

        Ok(SigStatus::Valid)
    }

    /// Checks the basic membership proof alone. Malformed components
    /// and commitment mismatches both come back as `Invalid` rather
    /// than errors, so a hostile signature cannot distinguish which
    /// check tripped.
    pub fn verify_basic_sig(
        &self,
        sig: &BasicSignature,
        msg: &[u8],
    ) -> Result<SigStatus, EpidError> {
        let g1 = &self.params.g1;
        let g2 = &self.params.g2;
        let fp = &self.params.fp;

        let b_pt = match g1.read_point(&sig.b) {
            Ok(p) => p,
            Err(_) => return Ok(SigStatus::Invalid),
        };
        let k_pt = match g1.read_point(&sig.k) {
            Ok(p) => p,
            Err(_) => return Ok(SigStatus::Invalid),
        };
        let t_pt = match g1.read_point(&sig.t) {
            Ok(p) => p,
            Err(_) => return Ok(SigStatus::Invalid),
        };
        if let Some(base) = &self.basename_pt {
            if !g1.is_equal(base, &b_pt)? {
                return Ok(SigStatus::Invalid);
            }
        }
        let parsed: Result<Vec<FieldElement>, _> = [sig.c, sig.sx, sig.sf, sig.sa, sig.sb]
            .iter()
            .map(|s| fp.read_element(s))
            .collect();
        let [c, sx, sf, sa, sb] = match parsed {
            Ok(v) => match <[FieldElement; 5]>::try_from(v) {
                Ok(arr) => arr,
                Err(_) => return Ok(SigStatus::Invalid),
            },
            Err(_) => return Ok(SigStatus::Invalid),
        };

        let neg_c = c.neg()?;
        let neg_sx = sx.neg()?;
        let c_res = c.residue().ok_or(EpidError::BadArg)?;
        let neg_c_res = neg_c.residue().ok_or(EpidError::BadArg)?;

        // R1 = B^sf * K^(-c)
        let r1 = g1.mul(
            &g1.exp(&b_pt, sf.residue().ok_or(EpidError::BadArg)?)?,
            &g1.exp(&k_pt, neg_c_res)?,
        )?;

        // R2 = e(h1,g2)^sf * e(h2,g2)^sb * e(h2,w)^sa
        //      * e(T, g2^(-sx) * w^(-c)) * e(g1,g2)^c
        let t1 = g2.mul(
            &g2.exp(&g2.generator(), neg_sx.residue().ok_or(EpidError::BadArg)?)?,
            &g2.exp(&self.w, neg_c_res)?,
        )?;
        let r2 = self
            .e12
            .exp(sf.residue().ok_or(EpidError::BadArg)?)?
            .mul(&self.e22.exp(sb.residue().ok_or(EpidError::BadArg)?)?)?
            .mul(&self.e2w.exp(sa.residue().ok_or(EpidError::BadArg)?)?)?
            .mul(&self.params.pairing.compute(&t_pt, &t1)?)?
            .mul(&self.eg12.exp(c_res)?)?;

        let expect = basic_commit(
            &self.params,
            &self.pub_key,
            &sig.b,
            &sig.k,
            &sig.t,
            &r1.to_bytes(),
            &r2.to_bytes(),
            msg,
            self.hash_alg,
        )?;
        if expect.to_bytes() != sig.c {
            return Ok(SigStatus::Invalid);
        }
        Ok(SigStatus::Valid)
    }

    /// Checks one non-revocation proof against one SigRl entry. An
    /// unparseable or failing proof means the signer could not
    /// disprove that entry.
    pub fn nr_verify(
        &self,
        msg: &[u8],
        sigma0: &BasicSignature,
        entry: &([u8; G1_LEN], [u8; G1_LEN]),
        proof: &NrProof,
    ) -> Result<bool, EpidError> {
        let g1 = &self.params.g1;
        let fp = &self.params.fp;

        let t_pt = match g1.read_point(&proof.t) {
            Ok(p) => p,
            Err(_) => return Ok(false),
        };
        // T = identity would make the proof vacuous
        if g1.is_equal(&t_pt, &g1.identity())? {
            return Ok(false);
        }
        let (b_pt, k_pt, bp_pt, kp_pt) = match (
            g1.read_point(&sigma0.b),
            g1.read_point(&sigma0.k),
            g1.read_point(&entry.0),
            g1.read_point(&entry.1),
        ) {
            (Ok(b), Ok(k), Ok(bp), Ok(kp)) => (b, k, bp, kp),
            _ => return Ok(false),
        };
        let (c, smu, snu) = match (
            fp.read_element(&proof.c),
            fp.read_element(&proof.smu),
            fp.read_element(&proof.snu),
        ) {
            (Ok(c), Ok(smu), Ok(snu)) => (c, smu, snu),
            _ => return Ok(false),
        };

        let neg_c = c.neg()?;
        let neg_smu = smu.neg()?;
        let snu_res = snu.residue().ok_or(EpidError::BadArg)?;
        let neg_smu_res = neg_smu.residue().ok_or(EpidError::BadArg)?;

        // R1 = B^snu * K^(-smu)
        let r1 = g1.mul(&g1.exp(&b_pt, snu_res)?, &g1.exp(&k_pt, neg_smu_res)?)?;
        // R2 = B'^snu * K'^(-smu) * T^(-c)
        let r2 = g1.mul(
            &g1.mul(&g1.exp(&bp_pt, snu_res)?, &g1.exp(&kp_pt, neg_smu_res)?)?,
            &g1.exp(&t_pt, neg_c.residue().ok_or(EpidError::BadArg)?)?,
        )?;

        let expect = nr_commit(
            &self.params,
            &sigma0.b,
            &sigma0.k,
            &entry.0,
            &entry.1,
            &proof.t,
            &r1.to_bytes(),
            &r2.to_bytes(),
            msg,
            self.hash_alg,
        )?;
        Ok(expect.to_bytes() == proof.c)
    }

    /// True when the revealed private key f would have produced this
    /// signature's pseudonym, i.e. B^f = K.
    pub fn check_priv_rl_entry(
        &self,
        sig: &BasicSignature,
        f: &[u8; FP_LEN],
    ) -> Result<bool, EpidError> {
        let g1 = &self.params.g1;
        let b_pt = g1.read_point(&sig.b)?;
        let k_pt = g1.read_point(&sig.k)?;
        let f_el = self.params.fp.read_element(f)?;
        let expect = g1.exp(&b_pt, f_el.residue().ok_or(EpidError::BadArg)?)?;
        g1.is_equal(&expect, &k_pt).map_err(EpidError::from)
    }

    /// Adds the signer behind a basename-bound signature to this
    /// verifier's blacklist. The signature is verified first; anything
    /// other than `Valid` comes back unchanged and leaves the list
    /// untouched. The list version bumps at the next export, not per
    /// append.
    pub fn blacklist_sig(
        &mut self,
        sig: &EpidSignature,
        msg: &[u8],
    ) -> Result<SigStatus, EpidError> {
        if self.basename_pt.is_none() {
            return Err(EpidError::InconsistentBasenameSet);
        }
        let status = self.verify(sig, msg)?;
        if status != SigStatus::Valid {
            return Ok(status);
        }
        let rl = self.empty_rl_template()?;
        let rl = self.verifier_rl.get_or_insert(rl);
        if rl.k.iter().any(|k| *k == sig.sigma0.k) {
            return Err(EpidError::Duplicate);
        }
        rl.k.push(sig.sigma0.k);
        self.verifier_rl_updated = true;
        Ok(SigStatus::Valid)
    }

    /// An installed list with no entries yet, bound to the current
    /// basename.
    fn empty_rl_template(&self) -> Result<VerifierRl, EpidError> {
        let b_pt = self
            .basename_pt
            .as_ref()
            .ok_or(EpidError::InconsistentBasenameSet)?;
        let mut b = [0u8; G1_LEN];
        b.copy_from_slice(&b_pt.to_bytes());
        Ok(VerifierRl {
            gid: self.gid,
            b,
            version: 0,
            k: Vec::new(),
        })
    }

    pub fn get_verifier_rl_size(&self) -> Result<usize, EpidError> {
        match &self.verifier_rl {
            Some(rl) => Ok(rl.byte_len()),
            None => Ok(self.empty_rl_template()?.byte_len()),
        }
    }

    /// Serializes the blacklist, bumping its version once if entries
    /// were appended since the last export. With a basename set but
    /// nothing blacklisted this is the empty list at version 0.
    pub fn write_verifier_rl(&mut self) -> Result<Vec<u8>, EpidError> {
        let rl = self.empty_rl_template()?;
        let rl = self.verifier_rl.get_or_insert(rl);
        if self.verifier_rl_updated {
            rl.version += 1;
            self.verifier_rl_updated = false;
        }
        Ok(rl.to_bytes())
    }
}

/// Two basename-bound signatures are linked when they share a base
/// point, which only happens when the same basename was used.
pub fn are_sigs_linked(sig1: Option<&BasicSignature>, sig2: Option<&BasicSignature>) -> bool {
    match (sig1, sig2) {
        (Some(a), Some(b)) => a.b == b.b,
        _ => false,
    }
}
