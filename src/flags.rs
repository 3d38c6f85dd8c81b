//! Script verification flags
//!
//! A bitset selecting which consensus/policy behaviors the interpreter and
//! verifier enforce. Bit positions follow Radiant-Core `script_flags.h`.

pub const SCRIPT_VERIFY_NONE: u32 = 0;

/// Evaluate P2SH locking scripts (BIP16)
pub const SCRIPT_VERIFY_P2SH: u32 = 1 << 0;

/// Enforce strict signature and pubkey encodings
pub const SCRIPT_VERIFY_STRICTENC: u32 = 1 << 1;

/// Enforce strict DER signature encoding (BIP66)
pub const SCRIPT_VERIFY_DERSIG: u32 = 1 << 2;

/// Reject high-S signatures
pub const SCRIPT_VERIFY_LOW_S: u32 = 1 << 3;

/// The CHECKMULTISIG dummy element must be empty (BIP147)
pub const SCRIPT_VERIFY_NULLDUMMY: u32 = 1 << 4;

/// Unlocking scripts must be push-only
pub const SCRIPT_VERIFY_SIGPUSHONLY: u32 = 1 << 5;

/// Pushes must use the most compact possible encoding (BIP62 rule 3-5)
pub const SCRIPT_VERIFY_MINIMALDATA: u32 = 1 << 6;

/// Executing an upgradable NOP is an error
pub const SCRIPT_VERIFY_DISCOURAGE_UPGRADABLE_NOPS: u32 = 1 << 7;

/// The stack must hold exactly one element after verification
pub const SCRIPT_VERIFY_CLEANSTACK: u32 = 1 << 8;

/// Enable OP_CHECKLOCKTIMEVERIFY (BIP65)
pub const SCRIPT_VERIFY_CHECKLOCKTIMEVERIFY: u32 = 1 << 9;

/// Enable OP_CHECKSEQUENCEVERIFY (BIP112)
pub const SCRIPT_VERIFY_CHECKSEQUENCEVERIFY: u32 = 1 << 10;

/// IF/NOTIF conditions must be exactly empty or [0x01]
pub const SCRIPT_VERIFY_MINIMALIF: u32 = 1 << 13;

/// Failed signature checks require all signatures to be empty
pub const SCRIPT_VERIFY_NULLFAIL: u32 = 1 << 14;

/// Signatures must carry the FORKID sighash bit. Mandatory on this network.
pub const SCRIPT_ENABLE_SIGHASH_FORKID: u32 = 1 << 16;

/// Enable OP_MUL
pub const SCRIPT_ENABLE_MUL: u32 = 1 << 21;

/// Enable OP_REVERSEBYTES
pub const SCRIPT_ENABLE_OP_REVERSEBYTES: u32 = 1 << 22;

/// Script numbers may be up to 8 bytes wide
pub const SCRIPT_64_BIT_INTEGERS: u32 = 1 << 24;

/// Enable the native introspection opcodes
pub const SCRIPT_NATIVE_INTROSPECTION: u32 = 1 << 25;

/// Enable the reference-tracking opcodes
pub const SCRIPT_ENHANCED_REFERENCES: u32 = 1 << 26;

/// Enable OP_PUSH_TX_STATE
pub const SCRIPT_PUSH_TX_STATE: u32 = 1 << 27;

/// Standard flag set for Radiant mainnet validation.
pub const STANDARD_SCRIPT_VERIFY_FLAGS: u32 = SCRIPT_VERIFY_P2SH
    | SCRIPT_VERIFY_STRICTENC
    | SCRIPT_VERIFY_DERSIG
    | SCRIPT_VERIFY_LOW_S
    | SCRIPT_VERIFY_NULLDUMMY
    | SCRIPT_VERIFY_SIGPUSHONLY
    | SCRIPT_VERIFY_MINIMALDATA
    | SCRIPT_VERIFY_DISCOURAGE_UPGRADABLE_NOPS
    | SCRIPT_VERIFY_CLEANSTACK
    | SCRIPT_VERIFY_CHECKLOCKTIMEVERIFY
    | SCRIPT_VERIFY_CHECKSEQUENCEVERIFY
    | SCRIPT_VERIFY_MINIMALIF
    | SCRIPT_VERIFY_NULLFAIL
    | SCRIPT_ENABLE_SIGHASH_FORKID
    | SCRIPT_ENABLE_MUL
    | SCRIPT_ENABLE_OP_REVERSEBYTES
    | SCRIPT_64_BIT_INTEGERS
    | SCRIPT_NATIVE_INTROSPECTION
    | SCRIPT_ENHANCED_REFERENCES;

/// Flags every validation must include (consensus-mandatory).
pub const MANDATORY_SCRIPT_VERIFY_FLAGS: u32 =
    SCRIPT_VERIFY_P2SH | SCRIPT_ENABLE_SIGHASH_FORKID;
