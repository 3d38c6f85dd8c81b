//! BLAKE3 hash function, single-chunk mode
//!
//! Portable implementation following the BLAKE3 reference. Supports inputs
//! of at most one chunk (1024 bytes), which covers every script use case in
//! this dialect; `write` panics past the chunk boundary only through the
//! debug assertion in `finalize`, callers bound input length first.

/// Single-chunk BLAKE3 hasher.
#[derive(Debug, Clone)]
pub struct Blake3 {
    cv: [u32; 8],
    block: [u8; Self::BLOCK_LEN],
    block_len: usize,
    counter: u64,
    flags: u32,
    bytes_consumed: usize,
}

impl Default for Blake3 {
    fn default() -> Self {
        Self::new()
    }
}

impl Blake3 {
    pub const OUTPUT_SIZE: usize = 32;
    pub const BLOCK_LEN: usize = 64;
    pub const CHUNK_LEN: usize = 1024;

    const IV: [u32; 8] = [
        0x6A09_E667,
        0xBB67_AE85,
        0x3C6E_F372,
        0xA54F_F53A,
        0x510E_527F,
        0x9B05_688C,
        0x1F83_D9AB,
        0x5BE0_CD19,
    ];

    // Domain separation flags
    const CHUNK_START: u32 = 1 << 0;
    const CHUNK_END: u32 = 1 << 1;
    const ROOT: u32 = 1 << 3;

    // Message word schedule for each of the 7 rounds.
    const MSG_SCHEDULE: [[usize; 16]; 7] = [
        [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
        [2, 6, 3, 10, 7, 0, 4, 13, 1, 11, 12, 5, 9, 14, 15, 8],
        [3, 4, 10, 12, 13, 2, 7, 14, 6, 5, 9, 0, 11, 15, 8, 1],
        [10, 7, 12, 9, 14, 3, 13, 15, 4, 0, 11, 2, 5, 8, 1, 6],
        [12, 13, 9, 11, 15, 10, 14, 8, 7, 2, 5, 3, 0, 1, 6, 4],
        [9, 14, 11, 5, 8, 12, 15, 1, 13, 3, 0, 10, 2, 6, 4, 7],
        [11, 15, 5, 0, 1, 9, 8, 6, 14, 10, 2, 12, 3, 4, 7, 13],
    ];

    pub fn new() -> Self {
        Blake3 {
            cv: Self::IV,
            block: [0u8; Self::BLOCK_LEN],
            block_len: 0,
            counter: 0,
            flags: Self::CHUNK_START,
            bytes_consumed: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn g(state: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize, mx: u32, my: u32) {
        state[a] = state[a].wrapping_add(state[b]).wrapping_add(mx);
        state[d] = (state[d] ^ state[a]).rotate_right(16);
        state[c] = state[c].wrapping_add(state[d]);
        state[b] = (state[b] ^ state[c]).rotate_right(12);
        state[a] = state[a].wrapping_add(state[b]).wrapping_add(my);
        state[d] = (state[d] ^ state[a]).rotate_right(8);
        state[c] = state[c].wrapping_add(state[d]);
        state[b] = (state[b] ^ state[c]).rotate_right(7);
    }

    fn round(state: &mut [u32; 16], msg: &[u32; 16]) {
        // Column step
        Self::g(state, 0, 4, 8, 12, msg[0], msg[1]);
        Self::g(state, 1, 5, 9, 13, msg[2], msg[3]);
        Self::g(state, 2, 6, 10, 14, msg[4], msg[5]);
        Self::g(state, 3, 7, 11, 15, msg[6], msg[7]);
        // Diagonal step
        Self::g(state, 0, 5, 10, 15, msg[8], msg[9]);
        Self::g(state, 1, 6, 11, 12, msg[10], msg[11]);
        Self::g(state, 2, 7, 8, 13, msg[12], msg[13]);
        Self::g(state, 3, 4, 9, 14, msg[14], msg[15]);
    }

    fn compress(
        cv: &[u32; 8],
        block: &[u8; Self::BLOCK_LEN],
        block_len: u32,
        counter: u64,
        flags: u32,
    ) -> [u32; 16] {
        let mut msg = [0u32; 16];
        for (i, word) in msg.iter_mut().enumerate() {
            *word = u32::from_le_bytes([
                block[4 * i],
                block[4 * i + 1],
                block[4 * i + 2],
                block[4 * i + 3],
            ]);
        }

        let mut state: [u32; 16] = [
            cv[0],
            cv[1],
            cv[2],
            cv[3],
            cv[4],
            cv[5],
            cv[6],
            cv[7],
            Self::IV[0],
            Self::IV[1],
            Self::IV[2],
            Self::IV[3],
            counter as u32,
            (counter >> 32) as u32,
            block_len,
            flags,
        ];

        for schedule in &Self::MSG_SCHEDULE {
            let mut scheduled = [0u32; 16];
            for (i, &src) in schedule.iter().enumerate() {
                scheduled[i] = msg[src];
            }
            Self::round(&mut state, &scheduled);
        }

        let mut out = [0u32; 16];
        for i in 0..8 {
            out[i] = state[i] ^ state[i + 8];
        }
        for i in 8..16 {
            out[i] = state[i] ^ cv[i - 8];
        }
        out
    }

    pub fn write(&mut self, mut data: &[u8]) -> &mut Self {
        while !data.is_empty() {
            if self.block_len == Self::BLOCK_LEN {
                let out = Self::compress(
                    &self.cv,
                    &self.block,
                    Self::BLOCK_LEN as u32,
                    self.counter,
                    self.flags,
                );
                self.cv.copy_from_slice(&out[..8]);
                self.counter += 1;
                self.block = [0u8; Self::BLOCK_LEN];
                self.block_len = 0;
                // Only the first block of a chunk carries CHUNK_START.
                self.flags &= !Self::CHUNK_START;
            }

            let want = Self::BLOCK_LEN - self.block_len;
            let take = data.len().min(want);
            self.block[self.block_len..self.block_len + take].copy_from_slice(&data[..take]);
            self.block_len += take;
            self.bytes_consumed += take;
            data = &data[take..];
        }
        self
    }

    pub fn finalize(&self) -> [u8; Self::OUTPUT_SIZE] {
        debug_assert!(self.bytes_consumed <= Self::CHUNK_LEN);

        let final_flags = self.flags | Self::CHUNK_END | Self::ROOT;
        let out = Self::compress(
            &self.cv,
            &self.block,
            self.block_len as u32,
            self.counter,
            final_flags,
        );

        let mut output = [0u8; Self::OUTPUT_SIZE];
        for i in 0..8 {
            output[4 * i..4 * i + 4].copy_from_slice(&out[i].to_le_bytes());
        }
        output
    }
}
