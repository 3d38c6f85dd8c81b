//! Script error classification
//!
//! One closed enumeration covers every interpreter and verifier failure.
//! Message text follows Radiant-Core's `ScriptErrorString` table so the
//! debugger prints the same diagnostics a node would.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ScriptError>;

/// Script execution and verification error kinds.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptError {
    #[error("No error")]
    Ok,

    #[error("Unknown error")]
    Unknown,

    #[error("Script evaluated without error but finished with a false/empty top stack element")]
    EvalFalse,

    #[error("OP_RETURN was encountered")]
    OpReturn,

    // Limits
    #[error("Script is too big")]
    ScriptSize,

    #[error("Push value size limit exceeded")]
    PushSize,

    #[error("Operation limit exceeded")]
    OpCount,

    #[error("Stack size limit exceeded")]
    StackSize,

    #[error("Signature count negative or greater than pubkey count")]
    SigCount,

    #[error("Pubkey count negative or limit exceeded")]
    PubkeyCount,

    // Verify operations
    #[error("Script failed an OP_VERIFY operation")]
    Verify,

    #[error("Script failed an OP_EQUALVERIFY operation")]
    EqualVerify,

    #[error("Script failed an OP_CHECKMULTISIGVERIFY operation")]
    CheckMultiSigVerify,

    #[error("Script failed an OP_CHECKSIGVERIFY operation")]
    CheckSigVerify,

    #[error("Script failed an OP_NUMEQUALVERIFY operation")]
    NumEqualVerify,

    // Logic/format/canonical errors
    #[error("Opcode missing or not understood")]
    BadOpcode,

    #[error("Attempted to use a disabled opcode")]
    DisabledOpcode,

    #[error("Operation not valid with the current stack size")]
    InvalidStackOperation,

    #[error("Operation not valid with the current altstack size")]
    InvalidAltstackOperation,

    #[error("Invalid OP_IF construction")]
    UnbalancedConditional,

    // Signature errors
    #[error("Signature hash type missing or not understood")]
    SigHashType,

    #[error("Non-canonical DER signature")]
    SigDer,

    #[error("Data push larger than necessary")]
    MinimalData,

    #[error("Only push operators allowed in signatures")]
    SigPushOnly,

    #[error("Non-canonical signature: S value is unnecessarily high")]
    SigHighS,

    #[error("Dummy CHECKMULTISIG argument must be zero")]
    SigNullDummy,

    #[error("Public key is neither compressed or uncompressed")]
    PubkeyType,

    #[error("Stack size must be exactly one after execution")]
    CleanStack,

    #[error("OP_IF/NOTIF argument must be minimal")]
    MinimalIf,

    #[error("Signature must be zero for failed CHECK(MULTI)SIG operation")]
    SigNullFail,

    // Locktime
    #[error("Negative locktime")]
    NegativeLocktime,

    #[error("Locktime requirement not satisfied")]
    UnsatisfiedLocktime,

    // Arithmetic
    #[error("Division by zero")]
    DivByZero,

    #[error("Modulo by zero")]
    ModByZero,

    #[error("Number out of range")]
    InvalidNumberRange,

    #[error("The requested encoding is impossible to satisfy")]
    ImpossibleEncoding,

    // Introspection
    #[error("Execution context not present for introspection")]
    ContextNotPresent,

    #[error("Invalid transaction input index for introspection")]
    InvalidTxInputIndex,

    #[error("Invalid transaction output index for introspection")]
    InvalidTxOutputIndex,

    // State separator
    #[error("State separator in invalid location")]
    InvalidStateSeparatorLocation,

    // FORKID
    #[error("Signature must use SIGHASH_FORKID")]
    MustUseForkId,

    // References
    #[error("Invalid reference format")]
    InvalidReference,

    #[error("Required reference not found")]
    ReferenceNotFound,

    #[error("Singleton reference mismatch")]
    SingletonMismatch,

    #[error("Introspection context not available")]
    IntrospectionContextUnavailable,

    #[error("Signature is the wrong length")]
    SigBadLength,
}

impl ScriptError {
    /// True for the success sentinel.
    pub fn is_ok(self) -> bool {
        self == ScriptError::Ok
    }
}
