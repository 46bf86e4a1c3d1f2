//! # EPID 2.0 anonymous attestation
//!
//! Intel Enhanced Privacy ID lets a device prove membership in a
//! group without identifying itself. A member holds a credential
//! (A, x, f) issued against the group public key (h1, h2, w) and signs
//! messages with a Schnorr-style proof of knowledge over the pairing
//! relation; a verifier checks signatures against the group key and up
//! to four revocation lists. Signatures made against the same basename
//! share a pseudonym and are linkable, signatures without a basename
//! are not.
//!
//! - [`Member`] signs, pools pre-signatures, and produces
//!   non-revocation proofs
//! - [`Verifier`] verifies, manages revocation lists, and blacklists
//!   signers by pseudonym
//! - [`types`] carries the fixed big-endian wire formats shared with
//!   other EPID 2.0 implementations
//!
//! The underlying curve and pairing arithmetic lives in `epid_math`.

mod commit;
pub mod error;
pub mod member;
pub mod params;
pub mod types;
pub mod verifier;

pub use error::{EpidError, SigStatus};
pub use member::{Member, PreComputedSignature};
pub use params::Epid2Params;
pub use types::{
    BasicSignature, EpidSignature, Gid, GroupPubKey, GroupRl, MemberPrecomp, NrProof, PrivKey,
    PrivRl, SigRl, VerifierPrecomp, VerifierRl,
};
pub use verifier::{are_sigs_linked, Verifier};

pub use epid_math::HashAlg;
