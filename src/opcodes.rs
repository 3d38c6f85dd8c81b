//! Radiant Script Opcode Constants
//!
//! Complete set of opcode constants for Radiant script execution: the
//! Bitcoin-compatible base set, the re-enabled splice/arithmetic opcodes,
//! and the Radiant-specific extensions (state separator, native
//! introspection, references, extra hash functions).
//!
//! Reference: Radiant-Core `src/script/script.h`

// ============================================================================
// PUSH DATA OPCODES (0x00 - 0x4e)
// ============================================================================

/// OP_0 / OP_FALSE - Push empty array
pub const OP_0: u8 = 0x00;
pub const OP_FALSE: u8 = 0x00;

/// OP_PUSHDATA1 - Push next byte as data length
pub const OP_PUSHDATA1: u8 = 0x4c;

/// OP_PUSHDATA2 - Push next 2 bytes (little-endian) as data length
pub const OP_PUSHDATA2: u8 = 0x4d;

/// OP_PUSHDATA4 - Push next 4 bytes (little-endian) as data length
pub const OP_PUSHDATA4: u8 = 0x4e;

// ============================================================================
// PUSH VALUE OPCODES (0x4f - 0x60)
// ============================================================================

/// OP_1NEGATE - Push -1 onto stack
pub const OP_1NEGATE: u8 = 0x4f;

/// OP_RESERVED - Reserved opcode, script invalid if executed
pub const OP_RESERVED: u8 = 0x50;

/// OP_1 / OP_TRUE - Push 1 onto stack
pub const OP_1: u8 = 0x51;
pub const OP_TRUE: u8 = 0x51;

/// OP_2 - Push 2 onto stack
pub const OP_2: u8 = 0x52;

/// OP_3 - Push 3 onto stack
pub const OP_3: u8 = 0x53;

/// OP_4 - Push 4 onto stack
pub const OP_4: u8 = 0x54;

/// OP_5 - Push 5 onto stack
pub const OP_5: u8 = 0x55;

/// OP_6 - Push 6 onto stack
pub const OP_6: u8 = 0x56;

/// OP_7 - Push 7 onto stack
pub const OP_7: u8 = 0x57;

/// OP_8 - Push 8 onto stack
pub const OP_8: u8 = 0x58;

/// OP_9 - Push 9 onto stack
pub const OP_9: u8 = 0x59;

/// OP_10 - Push 10 onto stack
pub const OP_10: u8 = 0x5a;

/// OP_11 - Push 11 onto stack
pub const OP_11: u8 = 0x5b;

/// OP_12 - Push 12 onto stack
pub const OP_12: u8 = 0x5c;

/// OP_13 - Push 13 onto stack
pub const OP_13: u8 = 0x5d;

/// OP_14 - Push 14 onto stack
pub const OP_14: u8 = 0x5e;

/// OP_15 - Push 15 onto stack
pub const OP_15: u8 = 0x5f;

/// OP_16 - Push 16 onto stack
pub const OP_16: u8 = 0x60;

// ============================================================================
// CONTROL FLOW (0x61 - 0x6a)
// ============================================================================

/// OP_NOP - No operation
pub const OP_NOP: u8 = 0x61;

/// OP_VER - Reserved opcode, script invalid if executed
pub const OP_VER: u8 = 0x62;

/// OP_IF - Execute following statements if top stack value is true
pub const OP_IF: u8 = 0x63;

/// OP_NOTIF - Execute following statements if top stack value is false
pub const OP_NOTIF: u8 = 0x64;

/// OP_VERIF - Reserved, invalid even in unexecuted branches
pub const OP_VERIF: u8 = 0x65;

/// OP_VERNOTIF - Reserved, invalid even in unexecuted branches
pub const OP_VERNOTIF: u8 = 0x66;

/// OP_ELSE - Toggle the innermost IF/NOTIF branch
pub const OP_ELSE: u8 = 0x67;

/// OP_ENDIF - Close an IF/NOTIF/ELSE block
pub const OP_ENDIF: u8 = 0x68;

/// OP_VERIFY - Fail unless top stack value is true; consumes it
pub const OP_VERIFY: u8 = 0x69;

/// OP_RETURN - Fail immediately
pub const OP_RETURN: u8 = 0x6a;

// ============================================================================
// STACK OPERATIONS (0x6b - 0x7d)
// ============================================================================

/// OP_TOALTSTACK - Move top of main stack to alt stack
pub const OP_TOALTSTACK: u8 = 0x6b;

/// OP_FROMALTSTACK - Move top of alt stack to main stack
pub const OP_FROMALTSTACK: u8 = 0x6c;

/// OP_2DROP - Remove the top two stack items
pub const OP_2DROP: u8 = 0x6d;

/// OP_2DUP - Duplicate the top two stack items
pub const OP_2DUP: u8 = 0x6e;

/// OP_3DUP - Duplicate the top three stack items
pub const OP_3DUP: u8 = 0x6f;

/// OP_2OVER - Copy the pair two pairs down to the top
pub const OP_2OVER: u8 = 0x70;

/// OP_2ROT - Move the fifth and sixth items to the top
pub const OP_2ROT: u8 = 0x71;

/// OP_2SWAP - Swap the top two pairs
pub const OP_2SWAP: u8 = 0x72;

/// OP_IFDUP - Duplicate the top item if it is truthy
pub const OP_IFDUP: u8 = 0x73;

/// OP_DEPTH - Push the current stack depth
pub const OP_DEPTH: u8 = 0x74;

/// OP_DROP - Remove the top stack item
pub const OP_DROP: u8 = 0x75;

/// OP_DUP - Duplicate the top stack item
pub const OP_DUP: u8 = 0x76;

/// OP_NIP - Remove the second-from-top stack item
pub const OP_NIP: u8 = 0x77;

/// OP_OVER - Copy the second-from-top item to the top
pub const OP_OVER: u8 = 0x78;

/// OP_PICK - Copy the item n back to the top
pub const OP_PICK: u8 = 0x79;

/// OP_ROLL - Move the item n back to the top
pub const OP_ROLL: u8 = 0x7a;

/// OP_ROT - Rotate the top three items to the left
pub const OP_ROT: u8 = 0x7b;

/// OP_SWAP - Swap the top two items
pub const OP_SWAP: u8 = 0x7c;

/// OP_TUCK - Copy the top item below the second item
pub const OP_TUCK: u8 = 0x7d;

// ============================================================================
// SPLICE OPERATIONS (0x7e - 0x82, re-enabled in Radiant)
// ============================================================================

/// OP_CAT - Concatenate two byte strings
pub const OP_CAT: u8 = 0x7e;

/// OP_SPLIT - Split a byte string at an index
pub const OP_SPLIT: u8 = 0x7f;

/// OP_NUM2BIN - Re-encode a number into a byte string of given width
pub const OP_NUM2BIN: u8 = 0x80;

/// OP_BIN2NUM - Minimally re-encode a byte string as a number
pub const OP_BIN2NUM: u8 = 0x81;

/// OP_SIZE - Push the length of the top element (without popping it)
pub const OP_SIZE: u8 = 0x82;

// ============================================================================
// BITWISE LOGIC (0x83 - 0x8a)
// ============================================================================

/// OP_INVERT - Flip every bit of the input
pub const OP_INVERT: u8 = 0x83;

/// OP_AND - Bitwise AND of two equal-length strings
pub const OP_AND: u8 = 0x84;

/// OP_OR - Bitwise OR of two equal-length strings
pub const OP_OR: u8 = 0x85;

/// OP_XOR - Bitwise XOR of two equal-length strings
pub const OP_XOR: u8 = 0x86;

/// OP_EQUAL - Push 1 if the inputs are byte-equal, 0 otherwise
pub const OP_EQUAL: u8 = 0x87;

/// OP_EQUALVERIFY - OP_EQUAL followed by OP_VERIFY
pub const OP_EQUALVERIFY: u8 = 0x88;

/// OP_RESERVED1 - Reserved opcode
pub const OP_RESERVED1: u8 = 0x89;

/// OP_RESERVED2 - Reserved opcode
pub const OP_RESERVED2: u8 = 0x8a;

// ============================================================================
// NUMERIC OPERATIONS (0x8b - 0xa5)
// ============================================================================

/// OP_1ADD - Add 1 to the input
pub const OP_1ADD: u8 = 0x8b;

/// OP_1SUB - Subtract 1 from the input
pub const OP_1SUB: u8 = 0x8c;

/// OP_2MUL - Multiply the input by 2 (enabled in Radiant)
pub const OP_2MUL: u8 = 0x8d;

/// OP_2DIV - Divide the input by 2 (enabled in Radiant)
pub const OP_2DIV: u8 = 0x8e;

/// OP_NEGATE - Flip the sign of the input
pub const OP_NEGATE: u8 = 0x8f;

/// OP_ABS - Absolute value of the input
pub const OP_ABS: u8 = 0x90;

/// OP_NOT - 1 if the input is 0, else 0
pub const OP_NOT: u8 = 0x91;

/// OP_0NOTEQUAL - 0 if the input is 0, else 1
pub const OP_0NOTEQUAL: u8 = 0x92;

/// OP_ADD - a + b
pub const OP_ADD: u8 = 0x93;

/// OP_SUB - a - b
pub const OP_SUB: u8 = 0x94;

/// OP_MUL - a * b (re-enabled in Radiant)
pub const OP_MUL: u8 = 0x95;

/// OP_DIV - a / b, truncated toward zero (re-enabled in Radiant)
pub const OP_DIV: u8 = 0x96;

/// OP_MOD - remainder of a / b (re-enabled in Radiant)
pub const OP_MOD: u8 = 0x97;

/// OP_LSHIFT - Shift a byte string left by b bits, length-preserving
pub const OP_LSHIFT: u8 = 0x98;

/// OP_RSHIFT - Shift a byte string right by b bits, length-preserving
pub const OP_RSHIFT: u8 = 0x99;

/// OP_BOOLAND - 1 if both inputs are truthy
pub const OP_BOOLAND: u8 = 0x9a;

/// OP_BOOLOR - 1 if either input is truthy
pub const OP_BOOLOR: u8 = 0x9b;

/// OP_NUMEQUAL - 1 if the numbers are equal
pub const OP_NUMEQUAL: u8 = 0x9c;

/// OP_NUMEQUALVERIFY - OP_NUMEQUAL followed by OP_VERIFY
pub const OP_NUMEQUALVERIFY: u8 = 0x9d;

/// OP_NUMNOTEQUAL - 1 if the numbers differ
pub const OP_NUMNOTEQUAL: u8 = 0x9e;

/// OP_LESSTHAN - 1 if a < b
pub const OP_LESSTHAN: u8 = 0x9f;

/// OP_GREATERTHAN - 1 if a > b
pub const OP_GREATERTHAN: u8 = 0xa0;

/// OP_LESSTHANOREQUAL - 1 if a <= b
pub const OP_LESSTHANOREQUAL: u8 = 0xa1;

/// OP_GREATERTHANOREQUAL - 1 if a >= b
pub const OP_GREATERTHANOREQUAL: u8 = 0xa2;

/// OP_MIN - Smaller of a and b
pub const OP_MIN: u8 = 0xa3;

/// OP_MAX - Larger of a and b
pub const OP_MAX: u8 = 0xa4;

/// OP_WITHIN - 1 if min <= x < max
pub const OP_WITHIN: u8 = 0xa5;

// ============================================================================
// CRYPTOGRAPHIC OPERATIONS (0xa6 - 0xaf)
// ============================================================================

/// OP_RIPEMD160 - RIPEMD-160 of the input
pub const OP_RIPEMD160: u8 = 0xa6;

/// OP_SHA1 - SHA-1 of the input
pub const OP_SHA1: u8 = 0xa7;

/// OP_SHA256 - SHA-256 of the input
pub const OP_SHA256: u8 = 0xa8;

/// OP_HASH160 - RIPEMD-160 of SHA-256 of the input
pub const OP_HASH160: u8 = 0xa9;

/// OP_HASH256 - Double SHA-256 of the input
pub const OP_HASH256: u8 = 0xaa;

/// OP_CODESEPARATOR - Signature checks cover the script from the most
/// recently executed OP_CODESEPARATOR to the end
pub const OP_CODESEPARATOR: u8 = 0xab;

/// OP_CHECKSIG - Verify an ECDSA transaction signature
pub const OP_CHECKSIG: u8 = 0xac;

/// OP_CHECKSIGVERIFY - OP_CHECKSIG followed by OP_VERIFY
pub const OP_CHECKSIGVERIFY: u8 = 0xad;

/// OP_CHECKMULTISIG - Verify m-of-n ECDSA transaction signatures
pub const OP_CHECKMULTISIG: u8 = 0xae;

/// OP_CHECKMULTISIGVERIFY - OP_CHECKMULTISIG followed by OP_VERIFY
pub const OP_CHECKMULTISIGVERIFY: u8 = 0xaf;

// ============================================================================
// EXPANSION (0xb0 - 0xb9)
// ============================================================================

/// OP_NOP1 - Reserved for future use
pub const OP_NOP1: u8 = 0xb0;

/// OP_CHECKLOCKTIMEVERIFY (BIP65) - Fail if the transaction locktime does
/// not satisfy the top stack value
pub const OP_CHECKLOCKTIMEVERIFY: u8 = 0xb1;
pub const OP_NOP2: u8 = OP_CHECKLOCKTIMEVERIFY;

/// OP_CHECKSEQUENCEVERIFY (BIP112) - Fail if the input's relative locktime
/// does not satisfy the top stack value
pub const OP_CHECKSEQUENCEVERIFY: u8 = 0xb2;
pub const OP_NOP3: u8 = OP_CHECKSEQUENCEVERIFY;

/// OP_NOP4 - Reserved for future use
pub const OP_NOP4: u8 = 0xb3;

/// OP_NOP5 - Reserved for future use
pub const OP_NOP5: u8 = 0xb4;

/// OP_NOP6 - Reserved for future use
pub const OP_NOP6: u8 = 0xb5;

/// OP_NOP7 - Reserved for future use
pub const OP_NOP7: u8 = 0xb6;

/// OP_NOP8 - Reserved for future use
pub const OP_NOP8: u8 = 0xb7;

/// OP_NOP9 - Reserved for future use
pub const OP_NOP9: u8 = 0xb8;

/// OP_NOP10 - Reserved for future use
pub const OP_NOP10: u8 = 0xb9;

// ============================================================================
// BCH-DERIVED CRYPTO AND BYTE OPS (0xba - 0xbc)
// ============================================================================

/// OP_CHECKDATASIG - Verify an ECDSA signature over SHA-256 of an arbitrary
/// message from the stack
pub const OP_CHECKDATASIG: u8 = 0xba;

/// OP_CHECKDATASIGVERIFY - OP_CHECKDATASIG followed by OP_VERIFY
pub const OP_CHECKDATASIGVERIFY: u8 = 0xbb;

/// OP_REVERSEBYTES - Reverse the bytes of the top element
pub const OP_REVERSEBYTES: u8 = 0xbc;

// ============================================================================
// RADIANT: STATE SEPARATOR (0xbd - 0xbf)
// ============================================================================

/// OP_STATESEPARATOR - Structural marker splitting a script into a state
/// script (before) and a code script (after); no-op during execution
pub const OP_STATESEPARATOR: u8 = 0xbd;

/// OP_STATESEPARATORINDEX_UTXO - Push the state-separator byte index of an
/// input's UTXO locking script
pub const OP_STATESEPARATORINDEX_UTXO: u8 = 0xbe;

/// OP_STATESEPARATORINDEX_OUTPUT - Push the state-separator byte index of
/// an output's locking script
pub const OP_STATESEPARATORINDEX_OUTPUT: u8 = 0xbf;

// ============================================================================
// RADIANT: NATIVE INTROSPECTION (0xc0 - 0xcd)
// ============================================================================

/// OP_INPUTINDEX - Push the index of the input being validated
pub const OP_INPUTINDEX: u8 = 0xc0;

/// OP_ACTIVEBYTECODE - Push the currently executing script
pub const OP_ACTIVEBYTECODE: u8 = 0xc1;

/// OP_TXVERSION - Push the transaction version
pub const OP_TXVERSION: u8 = 0xc2;

/// OP_TXINPUTCOUNT - Push the number of transaction inputs
pub const OP_TXINPUTCOUNT: u8 = 0xc3;

/// OP_TXOUTPUTCOUNT - Push the number of transaction outputs
pub const OP_TXOUTPUTCOUNT: u8 = 0xc4;

/// OP_TXLOCKTIME - Push the transaction locktime
pub const OP_TXLOCKTIME: u8 = 0xc5;

/// OP_UTXOVALUE - Push the value of the UTXO spent by input at index
pub const OP_UTXOVALUE: u8 = 0xc6;

/// OP_UTXOBYTECODE - Push the locking script of the UTXO spent by input at index
pub const OP_UTXOBYTECODE: u8 = 0xc7;

/// OP_OUTPOINTTXHASH - Push the 32-byte prevout txid of input at index
pub const OP_OUTPOINTTXHASH: u8 = 0xc8;

/// OP_OUTPOINTINDEX - Push the prevout output index of input at index
pub const OP_OUTPOINTINDEX: u8 = 0xc9;

/// OP_INPUTBYTECODE - Push the unlocking script of input at index
pub const OP_INPUTBYTECODE: u8 = 0xca;

/// OP_INPUTSEQUENCENUMBER - Push the sequence number of input at index
pub const OP_INPUTSEQUENCENUMBER: u8 = 0xcb;

/// OP_OUTPUTVALUE - Push the value of output at index
pub const OP_OUTPUTVALUE: u8 = 0xcc;

/// OP_OUTPUTBYTECODE - Push the locking script of output at index
pub const OP_OUTPUTBYTECODE: u8 = 0xcd;

// ============================================================================
// RADIANT: SHA512/256 (0xce - 0xcf)
// ============================================================================

/// OP_SHA512_256 - SHA-512/256 of the input
pub const OP_SHA512_256: u8 = 0xce;

/// OP_HASH512_256 - Double SHA-512/256 of the input
pub const OP_HASH512_256: u8 = 0xcf;

// ============================================================================
// RADIANT: REFERENCE OPCODES (0xd0 - 0xed)
// ============================================================================

/// OP_PUSHINPUTREF - Declare a 36-byte reference carried by this output
pub const OP_PUSHINPUTREF: u8 = 0xd0;

/// OP_REQUIREINPUTREF - Require a 36-byte reference to be present in the
/// transaction's inputs; pushes nothing
pub const OP_REQUIREINPUTREF: u8 = 0xd1;

/// OP_DISALLOWPUSHINPUTREF - Forbid the reference from appearing anywhere
/// else in the transaction
pub const OP_DISALLOWPUSHINPUTREF: u8 = 0xd2;

/// OP_DISALLOWPUSHINPUTREFSIBLING - Forbid sibling outputs from carrying
/// the reference
pub const OP_DISALLOWPUSHINPUTREFSIBLING: u8 = 0xd3;

/// OP_REFHASHDATASUMMARY_UTXO - Push the hash-data summary of a UTXO
pub const OP_REFHASHDATASUMMARY_UTXO: u8 = 0xd4;

/// OP_REFHASHVALUESUM_UTXOS - Push the value sum over UTXOs matching a
/// reference hash
pub const OP_REFHASHVALUESUM_UTXOS: u8 = 0xd5;

/// OP_REFHASHDATASUMMARY_OUTPUT - Push the hash-data summary of an output
pub const OP_REFHASHDATASUMMARY_OUTPUT: u8 = 0xd6;

/// OP_REFHASHVALUESUM_OUTPUTS - Push the value sum over outputs matching a
/// reference hash
pub const OP_REFHASHVALUESUM_OUTPUTS: u8 = 0xd7;

/// OP_PUSHINPUTREFSINGLETON - Declare a reference that must appear in
/// exactly one input and exactly one output
pub const OP_PUSHINPUTREFSINGLETON: u8 = 0xd8;

/// OP_REFTYPE_UTXO - Push the reference kind of a UTXO reference
pub const OP_REFTYPE_UTXO: u8 = 0xd9;

/// OP_REFTYPE_OUTPUT - Push the reference kind of an output reference
pub const OP_REFTYPE_OUTPUT: u8 = 0xda;

/// OP_REFVALUESUM_UTXOS - Push the value sum of UTXOs carrying a reference
pub const OP_REFVALUESUM_UTXOS: u8 = 0xdb;

/// OP_REFVALUESUM_OUTPUTS - Push the value sum of outputs carrying a reference
pub const OP_REFVALUESUM_OUTPUTS: u8 = 0xdc;

/// OP_REFOUTPUTCOUNT_UTXOS - Push the count of UTXOs carrying a reference
pub const OP_REFOUTPUTCOUNT_UTXOS: u8 = 0xdd;

/// OP_REFOUTPUTCOUNT_OUTPUTS - Push the count of outputs carrying a reference
pub const OP_REFOUTPUTCOUNT_OUTPUTS: u8 = 0xde;

/// OP_REFOUTPUTCOUNTZEROVALUED_UTXOS - Count only zero-valued carriers
pub const OP_REFOUTPUTCOUNTZEROVALUED_UTXOS: u8 = 0xdf;

/// OP_REFOUTPUTCOUNTZEROVALUED_OUTPUTS - Count only zero-valued carriers
pub const OP_REFOUTPUTCOUNTZEROVALUED_OUTPUTS: u8 = 0xe0;

/// OP_REFDATASUMMARY_UTXO - Push the data summary of a UTXO reference
pub const OP_REFDATASUMMARY_UTXO: u8 = 0xe1;

/// OP_REFDATASUMMARY_OUTPUT - Push the data summary of an output reference
pub const OP_REFDATASUMMARY_OUTPUT: u8 = 0xe2;

/// OP_CODESCRIPTHASHVALUESUM_UTXOS - Value sum of UTXOs whose code-script
/// hash matches
pub const OP_CODESCRIPTHASHVALUESUM_UTXOS: u8 = 0xe3;

/// OP_CODESCRIPTHASHVALUESUM_OUTPUTS - Value sum of outputs whose
/// code-script hash matches
pub const OP_CODESCRIPTHASHVALUESUM_OUTPUTS: u8 = 0xe4;

/// OP_CODESCRIPTHASHOUTPUTCOUNT_UTXOS - Count of UTXOs whose code-script
/// hash matches
pub const OP_CODESCRIPTHASHOUTPUTCOUNT_UTXOS: u8 = 0xe5;

/// OP_CODESCRIPTHASHOUTPUTCOUNT_OUTPUTS - Count of outputs whose
/// code-script hash matches
pub const OP_CODESCRIPTHASHOUTPUTCOUNT_OUTPUTS: u8 = 0xe6;

/// OP_CODESCRIPTHASHZEROVALUEDOUTPUTCOUNT_UTXOS - Zero-valued matching count
pub const OP_CODESCRIPTHASHZEROVALUEDOUTPUTCOUNT_UTXOS: u8 = 0xe7;

/// OP_CODESCRIPTHASHZEROVALUEDOUTPUTCOUNT_OUTPUTS - Zero-valued matching count
pub const OP_CODESCRIPTHASHZEROVALUEDOUTPUTCOUNT_OUTPUTS: u8 = 0xe8;

/// OP_CODESCRIPTBYTECODE_UTXO - Push the code script of a UTXO
pub const OP_CODESCRIPTBYTECODE_UTXO: u8 = 0xe9;

/// OP_CODESCRIPTBYTECODE_OUTPUT - Push the code script of an output
pub const OP_CODESCRIPTBYTECODE_OUTPUT: u8 = 0xea;

/// OP_STATESCRIPTBYTECODE_UTXO - Push the state script of a UTXO
pub const OP_STATESCRIPTBYTECODE_UTXO: u8 = 0xeb;

/// OP_STATESCRIPTBYTECODE_OUTPUT - Push the state script of an output
pub const OP_STATESCRIPTBYTECODE_OUTPUT: u8 = 0xec;

/// OP_PUSH_TX_STATE - Push requested transaction state data
pub const OP_PUSH_TX_STATE: u8 = 0xed;

// ============================================================================
// RADIANT: V2 HASH OPCODES (0xee - 0xef)
// ============================================================================

/// OP_BLAKE3 - BLAKE3 (single-chunk) of the input
pub const OP_BLAKE3: u8 = 0xee;

/// OP_K12 - KangarooTwelve (single-block) of the input
pub const OP_K12: u8 = 0xef;

/// Not a real opcode; sentinel for invalid bytes
pub const OP_INVALIDOPCODE: u8 = 0xff;

// ============================================================================
// CLASSIFICATION HELPERS
// ============================================================================

/// True for OP_0, direct pushes, OP_PUSHDATA1/2/4, OP_1NEGATE and OP_1..OP_16.
pub fn is_push_opcode(opcode: u8) -> bool {
    opcode <= OP_16 && opcode != OP_RESERVED
}

/// True for opcodes that carry inline data (OP_0..OP_PUSHDATA4).
pub fn is_push_data_opcode(opcode: u8) -> bool {
    opcode <= OP_PUSHDATA4
}

/// True for the Radiant-specific extension range (state separator,
/// introspection, SHA512/256, references, BLAKE3/K12).
pub fn is_radiant_opcode(opcode: u8) -> bool {
    (OP_STATESEPARATOR..=OP_K12).contains(&opcode)
}

/// True for the native introspection opcodes.
pub fn is_introspection_opcode(opcode: u8) -> bool {
    (OP_INPUTINDEX..=OP_OUTPUTBYTECODE).contains(&opcode)
}

/// True for the reference-tracking opcodes.
pub fn is_reference_opcode(opcode: u8) -> bool {
    (OP_PUSHINPUTREF..=OP_PUSH_TX_STATE).contains(&opcode)
}

/// True for the reference opcodes that consume a 36-byte inline payload.
pub fn takes_reference_payload(opcode: u8) -> bool {
    matches!(
        opcode,
        OP_PUSHINPUTREF
            | OP_REQUIREINPUTREF
            | OP_DISALLOWPUSHINPUTREF
            | OP_DISALLOWPUSHINPUTREFSIBLING
            | OP_PUSHINPUTREFSINGLETON
    )
}

/// True for the state-separator opcode family.
pub fn is_state_separator_opcode(opcode: u8) -> bool {
    (OP_STATESEPARATOR..=OP_STATESEPARATORINDEX_OUTPUT).contains(&opcode)
}

/// True for opcodes disabled in Bitcoin but enabled in Radiant.
pub fn is_reenabled_opcode(opcode: u8) -> bool {
    matches!(
        opcode,
        OP_CAT
            | OP_SPLIT
            | OP_NUM2BIN
            | OP_BIN2NUM
            | OP_INVERT
            | OP_AND
            | OP_OR
            | OP_XOR
            | OP_2MUL
            | OP_2DIV
            | OP_MUL
            | OP_DIV
            | OP_MOD
            | OP_LSHIFT
            | OP_RSHIFT
    )
}

/// Human-readable opcode name.
///
/// Direct pushes (0x01-0x4b) render as `PUSH(n)`-style names are not kept
/// in the static table; they return "OP_PUSHBYTES".
pub fn name(opcode: u8) -> &'static str {
    match opcode {
        OP_0 => "OP_0",
        0x01..=0x4b => "OP_PUSHBYTES",
        OP_PUSHDATA1 => "OP_PUSHDATA1",
        OP_PUSHDATA2 => "OP_PUSHDATA2",
        OP_PUSHDATA4 => "OP_PUSHDATA4",
        OP_1NEGATE => "OP_1NEGATE",
        OP_RESERVED => "OP_RESERVED",
        OP_1 => "OP_1",
        OP_2 => "OP_2",
        OP_3 => "OP_3",
        OP_4 => "OP_4",
        OP_5 => "OP_5",
        OP_6 => "OP_6",
        OP_7 => "OP_7",
        OP_8 => "OP_8",
        OP_9 => "OP_9",
        OP_10 => "OP_10",
        OP_11 => "OP_11",
        OP_12 => "OP_12",
        OP_13 => "OP_13",
        OP_14 => "OP_14",
        OP_15 => "OP_15",
        OP_16 => "OP_16",
        OP_NOP => "OP_NOP",
        OP_VER => "OP_VER",
        OP_IF => "OP_IF",
        OP_NOTIF => "OP_NOTIF",
        OP_VERIF => "OP_VERIF",
        OP_VERNOTIF => "OP_VERNOTIF",
        OP_ELSE => "OP_ELSE",
        OP_ENDIF => "OP_ENDIF",
        OP_VERIFY => "OP_VERIFY",
        OP_RETURN => "OP_RETURN",
        OP_TOALTSTACK => "OP_TOALTSTACK",
        OP_FROMALTSTACK => "OP_FROMALTSTACK",
        OP_2DROP => "OP_2DROP",
        OP_2DUP => "OP_2DUP",
        OP_3DUP => "OP_3DUP",
        OP_2OVER => "OP_2OVER",
        OP_2ROT => "OP_2ROT",
        OP_2SWAP => "OP_2SWAP",
        OP_IFDUP => "OP_IFDUP",
        OP_DEPTH => "OP_DEPTH",
        OP_DROP => "OP_DROP",
        OP_DUP => "OP_DUP",
        OP_NIP => "OP_NIP",
        OP_OVER => "OP_OVER",
        OP_PICK => "OP_PICK",
        OP_ROLL => "OP_ROLL",
        OP_ROT => "OP_ROT",
        OP_SWAP => "OP_SWAP",
        OP_TUCK => "OP_TUCK",
        OP_CAT => "OP_CAT",
        OP_SPLIT => "OP_SPLIT",
        OP_NUM2BIN => "OP_NUM2BIN",
        OP_BIN2NUM => "OP_BIN2NUM",
        OP_SIZE => "OP_SIZE",
        OP_INVERT => "OP_INVERT",
        OP_AND => "OP_AND",
        OP_OR => "OP_OR",
        OP_XOR => "OP_XOR",
        OP_EQUAL => "OP_EQUAL",
        OP_EQUALVERIFY => "OP_EQUALVERIFY",
        OP_RESERVED1 => "OP_RESERVED1",
        OP_RESERVED2 => "OP_RESERVED2",
        OP_1ADD => "OP_1ADD",
        OP_1SUB => "OP_1SUB",
        OP_2MUL => "OP_2MUL",
        OP_2DIV => "OP_2DIV",
        OP_NEGATE => "OP_NEGATE",
        OP_ABS => "OP_ABS",
        OP_NOT => "OP_NOT",
        OP_0NOTEQUAL => "OP_0NOTEQUAL",
        OP_ADD => "OP_ADD",
        OP_SUB => "OP_SUB",
        OP_MUL => "OP_MUL",
        OP_DIV => "OP_DIV",
        OP_MOD => "OP_MOD",
        OP_LSHIFT => "OP_LSHIFT",
        OP_RSHIFT => "OP_RSHIFT",
        OP_BOOLAND => "OP_BOOLAND",
        OP_BOOLOR => "OP_BOOLOR",
        OP_NUMEQUAL => "OP_NUMEQUAL",
        OP_NUMEQUALVERIFY => "OP_NUMEQUALVERIFY",
        OP_NUMNOTEQUAL => "OP_NUMNOTEQUAL",
        OP_LESSTHAN => "OP_LESSTHAN",
        OP_GREATERTHAN => "OP_GREATERTHAN",
        OP_LESSTHANOREQUAL => "OP_LESSTHANOREQUAL",
        OP_GREATERTHANOREQUAL => "OP_GREATERTHANOREQUAL",
        OP_MIN => "OP_MIN",
        OP_MAX => "OP_MAX",
        OP_WITHIN => "OP_WITHIN",
        OP_RIPEMD160 => "OP_RIPEMD160",
        OP_SHA1 => "OP_SHA1",
        OP_SHA256 => "OP_SHA256",
        OP_HASH160 => "OP_HASH160",
        OP_HASH256 => "OP_HASH256",
        OP_CODESEPARATOR => "OP_CODESEPARATOR",
        OP_CHECKSIG => "OP_CHECKSIG",
        OP_CHECKSIGVERIFY => "OP_CHECKSIGVERIFY",
        OP_CHECKMULTISIG => "OP_CHECKMULTISIG",
        OP_CHECKMULTISIGVERIFY => "OP_CHECKMULTISIGVERIFY",
        OP_NOP1 => "OP_NOP1",
        OP_CHECKLOCKTIMEVERIFY => "OP_CHECKLOCKTIMEVERIFY",
        OP_CHECKSEQUENCEVERIFY => "OP_CHECKSEQUENCEVERIFY",
        OP_NOP4 => "OP_NOP4",
        OP_NOP5 => "OP_NOP5",
        OP_NOP6 => "OP_NOP6",
        OP_NOP7 => "OP_NOP7",
        OP_NOP8 => "OP_NOP8",
        OP_NOP9 => "OP_NOP9",
        OP_NOP10 => "OP_NOP10",
        OP_CHECKDATASIG => "OP_CHECKDATASIG",
        OP_CHECKDATASIGVERIFY => "OP_CHECKDATASIGVERIFY",
        OP_REVERSEBYTES => "OP_REVERSEBYTES",
        OP_STATESEPARATOR => "OP_STATESEPARATOR",
        OP_STATESEPARATORINDEX_UTXO => "OP_STATESEPARATORINDEX_UTXO",
        OP_STATESEPARATORINDEX_OUTPUT => "OP_STATESEPARATORINDEX_OUTPUT",
        OP_INPUTINDEX => "OP_INPUTINDEX",
        OP_ACTIVEBYTECODE => "OP_ACTIVEBYTECODE",
        OP_TXVERSION => "OP_TXVERSION",
        OP_TXINPUTCOUNT => "OP_TXINPUTCOUNT",
        OP_TXOUTPUTCOUNT => "OP_TXOUTPUTCOUNT",
        OP_TXLOCKTIME => "OP_TXLOCKTIME",
        OP_UTXOVALUE => "OP_UTXOVALUE",
        OP_UTXOBYTECODE => "OP_UTXOBYTECODE",
        OP_OUTPOINTTXHASH => "OP_OUTPOINTTXHASH",
        OP_OUTPOINTINDEX => "OP_OUTPOINTINDEX",
        OP_INPUTBYTECODE => "OP_INPUTBYTECODE",
        OP_INPUTSEQUENCENUMBER => "OP_INPUTSEQUENCENUMBER",
        OP_OUTPUTVALUE => "OP_OUTPUTVALUE",
        OP_OUTPUTBYTECODE => "OP_OUTPUTBYTECODE",
        OP_SHA512_256 => "OP_SHA512_256",
        OP_HASH512_256 => "OP_HASH512_256",
        OP_PUSHINPUTREF => "OP_PUSHINPUTREF",
        OP_REQUIREINPUTREF => "OP_REQUIREINPUTREF",
        OP_DISALLOWPUSHINPUTREF => "OP_DISALLOWPUSHINPUTREF",
        OP_DISALLOWPUSHINPUTREFSIBLING => "OP_DISALLOWPUSHINPUTREFSIBLING",
        OP_REFHASHDATASUMMARY_UTXO => "OP_REFHASHDATASUMMARY_UTXO",
        OP_REFHASHVALUESUM_UTXOS => "OP_REFHASHVALUESUM_UTXOS",
        OP_REFHASHDATASUMMARY_OUTPUT => "OP_REFHASHDATASUMMARY_OUTPUT",
        OP_REFHASHVALUESUM_OUTPUTS => "OP_REFHASHVALUESUM_OUTPUTS",
        OP_PUSHINPUTREFSINGLETON => "OP_PUSHINPUTREFSINGLETON",
        OP_REFTYPE_UTXO => "OP_REFTYPE_UTXO",
        OP_REFTYPE_OUTPUT => "OP_REFTYPE_OUTPUT",
        OP_REFVALUESUM_UTXOS => "OP_REFVALUESUM_UTXOS",
        OP_REFVALUESUM_OUTPUTS => "OP_REFVALUESUM_OUTPUTS",
        OP_REFOUTPUTCOUNT_UTXOS => "OP_REFOUTPUTCOUNT_UTXOS",
        OP_REFOUTPUTCOUNT_OUTPUTS => "OP_REFOUTPUTCOUNT_OUTPUTS",
        OP_REFOUTPUTCOUNTZEROVALUED_UTXOS => "OP_REFOUTPUTCOUNTZEROVALUED_UTXOS",
        OP_REFOUTPUTCOUNTZEROVALUED_OUTPUTS => "OP_REFOUTPUTCOUNTZEROVALUED_OUTPUTS",
        OP_REFDATASUMMARY_UTXO => "OP_REFDATASUMMARY_UTXO",
        OP_REFDATASUMMARY_OUTPUT => "OP_REFDATASUMMARY_OUTPUT",
        OP_CODESCRIPTHASHVALUESUM_UTXOS => "OP_CODESCRIPTHASHVALUESUM_UTXOS",
        OP_CODESCRIPTHASHVALUESUM_OUTPUTS => "OP_CODESCRIPTHASHVALUESUM_OUTPUTS",
        OP_CODESCRIPTHASHOUTPUTCOUNT_UTXOS => "OP_CODESCRIPTHASHOUTPUTCOUNT_UTXOS",
        OP_CODESCRIPTHASHOUTPUTCOUNT_OUTPUTS => "OP_CODESCRIPTHASHOUTPUTCOUNT_OUTPUTS",
        OP_CODESCRIPTHASHZEROVALUEDOUTPUTCOUNT_UTXOS => {
            "OP_CODESCRIPTHASHZEROVALUEDOUTPUTCOUNT_UTXOS"
        }
        OP_CODESCRIPTHASHZEROVALUEDOUTPUTCOUNT_OUTPUTS => {
            "OP_CODESCRIPTHASHZEROVALUEDOUTPUTCOUNT_OUTPUTS"
        }
        OP_CODESCRIPTBYTECODE_UTXO => "OP_CODESCRIPTBYTECODE_UTXO",
        OP_CODESCRIPTBYTECODE_OUTPUT => "OP_CODESCRIPTBYTECODE_OUTPUT",
        OP_STATESCRIPTBYTECODE_UTXO => "OP_STATESCRIPTBYTECODE_UTXO",
        OP_STATESCRIPTBYTECODE_OUTPUT => "OP_STATESCRIPTBYTECODE_OUTPUT",
        OP_PUSH_TX_STATE => "OP_PUSH_TX_STATE",
        OP_BLAKE3 => "OP_BLAKE3",
        OP_K12 => "OP_K12",
        _ => "OP_UNKNOWN",
    }
}

/// Parse an opcode from its canonical name (e.g. "OP_CHECKSIG" -> 0xac).
///
/// Matching is case-insensitive. Push-data names are not parseable.
pub fn parse(s: &str) -> Option<u8> {
    let upper = s.to_ascii_uppercase();
    // 0x00 is a valid opcode, so scan the full byte range and compare names.
    for op in 0x00..=0xffu8 {
        let n = name(op);
        if n != "OP_UNKNOWN" && n != "OP_PUSHBYTES" && n == upper {
            return Some(op);
        }
    }
    None
}
