//! Signature encoding checks and ECDSA verification
//!
//! DER and pubkey encoding rules follow BIP66 plus the Radiant requirement
//! that every transaction signature carries the FORKID sighash bit.

use crate::constants::{
    LOCKTIME_THRESHOLD, MAX_SIG_LENGTH, MIN_SIG_LENGTH, SEQUENCE_FINAL,
    SEQUENCE_LOCKTIME_DISABLE_FLAG, SEQUENCE_LOCKTIME_MASK, SEQUENCE_LOCKTIME_TYPE_FLAG,
};
use crate::crypto::sha256;
use crate::script::Script;
use crate::sighash::{signature_hash, SighashType};
use crate::types::Transaction;
use secp256k1::{ecdsa, Message, PublicKey, Secp256k1, VerifyOnly};
use std::sync::OnceLock;

/// Process-wide verification-only secp256k1 context, created on first use.
fn secp() -> &'static Secp256k1<VerifyOnly> {
    static CTX: OnceLock<Secp256k1<VerifyOnly>> = OnceLock::new();
    CTX.get_or_init(Secp256k1::verification_only)
}

/// Strict DER check for a signature that may carry a trailing sighash byte.
///
/// Accepts `SEQUENCE { INTEGER R, INTEGER S }` with 1-33 byte integers, no
/// superfluous leading zeros, both non-negative, and a consistent outer
/// length. Total length must be 9-73 bytes.
pub fn is_valid_signature_encoding(sig: &[u8]) -> bool {
    if sig.len() < MIN_SIG_LENGTH || sig.len() > MAX_SIG_LENGTH {
        return false;
    }

    if sig[0] != 0x30 {
        return false;
    }

    // Outer length must match with or without the sighash byte.
    let expected = sig[1] as usize;
    if expected != sig.len() - 2 && expected != sig.len() - 3 {
        return false;
    }

    if sig[2] != 0x02 {
        return false;
    }
    let len_r = sig[3] as usize;
    if len_r == 0 || len_r > 33 {
        return false;
    }
    if 5 + len_r >= sig.len() {
        return false;
    }

    if sig[4 + len_r] != 0x02 {
        return false;
    }
    let len_s = sig[5 + len_r] as usize;
    if len_s == 0 || len_s > 33 {
        return false;
    }
    let der_len = 6 + len_r + len_s;
    if der_len != sig.len() && der_len != sig.len() - 1 {
        return false;
    }

    // Negative R or S
    if sig[4] & 0x80 != 0 {
        return false;
    }
    if sig[6 + len_r] & 0x80 != 0 {
        return false;
    }

    // Superfluous leading zeros
    if len_r > 1 && sig[4] == 0 && sig[5] & 0x80 == 0 {
        return false;
    }
    if len_s > 1 && sig[6 + len_r] == 0 && sig[7 + len_r] & 0x80 == 0 {
        return false;
    }

    true
}

/// A public key is valid iff it is 33 bytes with an 0x02/0x03 prefix or
/// 65 bytes with an 0x04 prefix.
pub fn is_valid_pubkey(pubkey: &[u8]) -> bool {
    match pubkey.len() {
        33 => pubkey[0] == 0x02 || pubkey[0] == 0x03,
        65 => pubkey[0] == 0x04,
        _ => false,
    }
}

/// Sighash byte: the final byte of a transaction signature.
pub fn sighash_byte(sig: &[u8]) -> u8 {
    sig.last().copied().unwrap_or(0)
}

/// Signature with the trailing sighash byte removed.
pub fn strip_sighash_byte(sig: &[u8]) -> &[u8] {
    if sig.is_empty() {
        sig
    } else {
        &sig[..sig.len() - 1]
    }
}

/// Verify a DER-encoded ECDSA signature over a 32-byte hash.
///
/// The signature may carry a trailing sighash byte; it is stripped before
/// DER parsing. High-S signatures are normalized before verification, the
/// way the original node's verify path does.
pub fn verify_ecdsa(pubkey: &[u8], sig: &[u8], hash: &[u8; 32]) -> bool {
    if !is_valid_pubkey(pubkey) {
        return false;
    }

    let der = if is_valid_signature_encoding(sig) && ecdsa::Signature::from_der(sig).is_ok() {
        sig
    } else {
        strip_sighash_byte(sig)
    };

    let Ok(pk) = PublicKey::from_slice(pubkey) else {
        return false;
    };
    let Ok(mut signature) = ecdsa::Signature::from_der(der) else {
        return false;
    };
    signature.normalize_s();

    let msg = Message::from_digest(*hash);
    secp().verify_ecdsa(&msg, &signature, &pk).is_ok()
}

/// Signature checker driving CHECKSIG-family and locktime opcodes.
///
/// `Real` verifies against the spending transaction; `Dummy` is the
/// debugging checker used when no transaction context is available, and
/// accepts any non-empty signature/pubkey pair.
#[derive(Debug, Clone)]
pub enum SignatureChecker {
    Real {
        tx: Transaction,
        input_index: usize,
        amount: i64,
    },
    Dummy,
}

impl SignatureChecker {
    pub fn real(tx: Transaction, input_index: usize, amount: i64) -> Self {
        SignatureChecker::Real {
            tx,
            input_index,
            amount,
        }
    }

    pub fn is_dummy(&self) -> bool {
        matches!(self, SignatureChecker::Dummy)
    }

    /// Check a transaction signature against a public key, with
    /// `script_code` as the covered script.
    pub fn check_sig(&self, sig: &[u8], pubkey: &[u8], script_code: &Script) -> bool {
        match self {
            SignatureChecker::Dummy => !sig.is_empty() && !pubkey.is_empty(),
            SignatureChecker::Real {
                tx,
                input_index,
                amount,
            } => {
                if sig.is_empty() {
                    return false;
                }

                let hash_type = SighashType::from_byte(sighash_byte(sig));
                // FORKID is mandatory on this network.
                if !hash_type.has_fork_id() {
                    return false;
                }

                let Ok(hash) =
                    signature_hash(tx, *input_index, script_code, *amount, hash_type, None)
                else {
                    return false;
                };
                verify_ecdsa(pubkey, sig, &hash)
            }
        }
    }

    /// Check a data signature (OP_CHECKDATASIG): ECDSA over SHA256 of the
    /// message, no sighash byte.
    pub fn check_data_sig(&self, sig: &[u8], pubkey: &[u8], message: &[u8]) -> bool {
        match self {
            SignatureChecker::Dummy => !sig.is_empty() && !pubkey.is_empty(),
            SignatureChecker::Real { .. } => {
                if sig.is_empty() {
                    return false;
                }
                let hash = sha256(message);
                verify_ecdsa(pubkey, sig, &hash)
            }
        }
    }

    /// BIP65 absolute locktime check.
    pub fn check_lock_time(&self, lock_time: i64) -> bool {
        match self {
            SignatureChecker::Dummy => true,
            SignatureChecker::Real {
                tx, input_index, ..
            } => {
                let tx_lock_time = tx.lock_time as i64;
                let threshold = LOCKTIME_THRESHOLD as i64;

                // Both must be the same kind: block height or timestamp.
                if (tx_lock_time < threshold && lock_time >= threshold)
                    || (tx_lock_time >= threshold && lock_time < threshold)
                {
                    return false;
                }

                if tx_lock_time < lock_time {
                    return false;
                }

                // A final input opts out of locktime entirely.
                match tx.inputs.get(*input_index) {
                    Some(input) => input.sequence != SEQUENCE_FINAL,
                    None => false,
                }
            }
        }
    }

    /// BIP68 relative locktime check.
    pub fn check_sequence(&self, sequence: i64) -> bool {
        match self {
            SignatureChecker::Dummy => true,
            SignatureChecker::Real {
                tx, input_index, ..
            } => {
                let Some(input) = tx.inputs.get(*input_index) else {
                    return false;
                };

                if tx.version < 2 {
                    return false;
                }

                let tx_sequence = input.sequence;
                if tx_sequence & SEQUENCE_LOCKTIME_DISABLE_FLAG != 0 {
                    return false;
                }

                let required = sequence as u32;
                let type_tx = tx_sequence & SEQUENCE_LOCKTIME_TYPE_FLAG != 0;
                let type_req = required & SEQUENCE_LOCKTIME_TYPE_FLAG != 0;
                if type_tx != type_req {
                    return false;
                }

                (tx_sequence & SEQUENCE_LOCKTIME_MASK) >= (required & SEQUENCE_LOCKTIME_MASK)
            }
        }
    }
}
