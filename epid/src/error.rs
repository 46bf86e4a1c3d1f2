// TODO: At some point this should be replaced with crates anyhow and thiserror but thiserror is no_std compatible at the moment.

use core::fmt::Debug;
use epid_math::MathError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpidError {
    /// A malformed argument: wrong size, wrong group id, count
    /// mismatch, stale revocation-list version
    BadArg,
    /// The basename was already registered
    Duplicate,
    /// The operation needs a registered basename, or the supplied
    /// basename does not match the registered one
    InconsistentBasenameSet,
    /// The private key does not satisfy the group's pairing relation
    KeyNotInGroup,
    Math(MathError),
}

impl From<MathError> for EpidError {
    fn from(e: MathError) -> Self {
        Self::Math(e)
    }
}

/// Outcome of verifying a signature, or of producing one against a
/// signature revocation list. A revoked signature is a well-formed
/// result, not an error; callers must branch on the exact variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigStatus {
    Valid,
    Invalid,
    RevokedInGroupRl,
    RevokedInPrivRl,
    RevokedInSigRl,
    RevokedInVerifierRl,
}

impl SigStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, SigStatus::Valid)
    }
}
