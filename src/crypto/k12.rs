//! KangarooTwelve hash function, single-block mode
//!
//! Keccak-p[1600,12]: the Keccak permutation with only the last 12 of the
//! 24 Keccak-f[1600] rounds. Absorbs at a rate of 168 bytes and finalizes
//! with the empty-customization framing byte 0x00, the 0x07 domain
//! separator and the 0x80 rate-final bit. Supports inputs of at most one
//! sponge block sequence below the leaf threshold (8192 bytes).

/// Single-block KangarooTwelve hasher.
#[derive(Debug, Clone)]
pub struct K12 {
    state: [u64; 25],
    buffer: [u8; Self::RATE],
    buf_pos: usize,
}

impl Default for K12 {
    fn default() -> Self {
        Self::new()
    }
}

impl K12 {
    pub const OUTPUT_SIZE: usize = 32;
    pub const RATE: usize = 168;
    pub const MAX_INPUT: usize = 8192;

    // Round constants for Keccak-f[1600]; K12 uses rounds 12-23 (the last 12).
    const RNDC: [u64; 12] = [
        0x0000_0000_8000_808b,
        0x8000_0000_0000_008b,
        0x8000_0000_0000_8089,
        0x8000_0000_0000_8003,
        0x8000_0000_0000_8002,
        0x8000_0000_0000_0080,
        0x0000_0000_0000_800a,
        0x8000_0000_8000_000a,
        0x8000_0000_8000_8081,
        0x8000_0000_0000_8080,
        0x0000_0000_8000_0001,
        0x8000_0000_8000_8008,
    ];

    // Rotation offsets in the rho-pi trail order used below.
    const ROTC: [u32; 24] = [
        1, 3, 6, 10, 15, 21, 28, 36, 45, 55, 2, 14, 27, 41, 56, 8, 25, 43, 62, 18, 39, 61, 20, 44,
    ];

    // Lane trail for the combined rho-pi step.
    const PILN: [usize; 24] = [
        10, 7, 11, 17, 18, 3, 5, 16, 8, 21, 24, 4, 15, 23, 19, 13, 12, 2, 20, 14, 22, 9, 6, 1,
    ];

    pub fn new() -> Self {
        K12 {
            state: [0u64; 25],
            buffer: [0u8; Self::RATE],
            buf_pos: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn keccak_p12(st: &mut [u64; 25]) {
        for &rc in &Self::RNDC {
            // Theta
            let mut bc = [0u64; 5];
            for (i, b) in bc.iter_mut().enumerate() {
                *b = st[i] ^ st[i + 5] ^ st[i + 10] ^ st[i + 15] ^ st[i + 20];
            }
            for i in 0..5 {
                let t = bc[(i + 4) % 5] ^ bc[(i + 1) % 5].rotate_left(1);
                for j in (0..25).step_by(5) {
                    st[j + i] ^= t;
                }
            }

            // Rho Pi
            let mut t = st[1];
            for i in 0..24 {
                let j = Self::PILN[i];
                let tmp = st[j];
                st[j] = t.rotate_left(Self::ROTC[i]);
                t = tmp;
            }

            // Chi
            for j in (0..25).step_by(5) {
                let mut row = [0u64; 5];
                row.copy_from_slice(&st[j..j + 5]);
                for i in 0..5 {
                    st[j + i] = row[i] ^ (!row[(i + 1) % 5] & row[(i + 2) % 5]);
                }
            }

            // Iota
            st[0] ^= rc;
        }
    }

    fn absorb_buffer(&mut self) {
        for i in 0..Self::RATE / 8 {
            let lane = u64::from_le_bytes([
                self.buffer[8 * i],
                self.buffer[8 * i + 1],
                self.buffer[8 * i + 2],
                self.buffer[8 * i + 3],
                self.buffer[8 * i + 4],
                self.buffer[8 * i + 5],
                self.buffer[8 * i + 6],
                self.buffer[8 * i + 7],
            ]);
            self.state[i] ^= lane;
        }
        Self::keccak_p12(&mut self.state);
        self.buf_pos = 0;
        self.buffer = [0u8; Self::RATE];
    }

    pub fn write(&mut self, mut data: &[u8]) -> &mut Self {
        while !data.is_empty() {
            let space = Self::RATE - self.buf_pos;
            let take = data.len().min(space);
            self.buffer[self.buf_pos..self.buf_pos + take].copy_from_slice(&data[..take]);
            self.buf_pos += take;
            data = &data[take..];

            if self.buf_pos == Self::RATE {
                self.absorb_buffer();
            }
        }
        self
    }

    pub fn finalize(&self) -> [u8; Self::OUTPUT_SIZE] {
        let mut this = self.clone();

        // Empty customization string: append length_encode(0) = 0x00.
        // (K12's encoding, not NIST SP 800-185 right_encode.)
        this.write(&[0x00]);

        // Domain separator, then the final bit of the rate.
        this.buffer[this.buf_pos] = 0x07;
        this.buffer[Self::RATE - 1] |= 0x80;

        for i in 0..Self::RATE / 8 {
            let lane = u64::from_le_bytes([
                this.buffer[8 * i],
                this.buffer[8 * i + 1],
                this.buffer[8 * i + 2],
                this.buffer[8 * i + 3],
                this.buffer[8 * i + 4],
                this.buffer[8 * i + 5],
                this.buffer[8 * i + 6],
                this.buffer[8 * i + 7],
            ]);
            this.state[i] ^= lane;
        }
        Self::keccak_p12(&mut this.state);

        let mut output = [0u8; Self::OUTPUT_SIZE];
        for i in 0..Self::OUTPUT_SIZE / 8 {
            output[8 * i..8 * i + 8].copy_from_slice(&this.state[i].to_le_bytes());
        }
        output
    }
}
