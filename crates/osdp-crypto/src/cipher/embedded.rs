//! Self-contained AES-128 (FIPS-197) for targets without a crypto library.
//!
//! Table-driven S-box lookups are not constant time. This backend exists for
//! constrained devices; hosts should use [`super::PlatformCipher`].

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::{BLOCK_SIZE, BlockCipher, CipherKey, Direction, Iv, check_buffer};

const ROUNDS: usize = 10;

/// AES S-box substitution table (FIPS-197, Section 5.1.1).
#[rustfmt::skip]
const SBOX: [u8; 256] = [
    0x63, 0x7c, 0x77, 0x7b, 0xf2, 0x6b, 0x6f, 0xc5, 0x30, 0x01, 0x67, 0x2b, 0xfe, 0xd7, 0xab, 0x76,
    0xca, 0x82, 0xc9, 0x7d, 0xfa, 0x59, 0x47, 0xf0, 0xad, 0xd4, 0xa2, 0xaf, 0x9c, 0xa4, 0x72, 0xc0,
    0xb7, 0xfd, 0x93, 0x26, 0x36, 0x3f, 0xf7, 0xcc, 0x34, 0xa5, 0xe5, 0xf1, 0x71, 0xd8, 0x31, 0x15,
    0x04, 0xc7, 0x23, 0xc3, 0x18, 0x96, 0x05, 0x9a, 0x07, 0x12, 0x80, 0xe2, 0xeb, 0x27, 0xb2, 0x75,
    0x09, 0x83, 0x2c, 0x1a, 0x1b, 0x6e, 0x5a, 0xa0, 0x52, 0x3b, 0xd6, 0xb3, 0x29, 0xe3, 0x2f, 0x84,
    0x53, 0xd1, 0x00, 0xed, 0x20, 0xfc, 0xb1, 0x5b, 0x6a, 0xcb, 0xbe, 0x39, 0x4a, 0x4c, 0x58, 0xcf,
    0xd0, 0xef, 0xaa, 0xfb, 0x43, 0x4d, 0x33, 0x85, 0x45, 0xf9, 0x02, 0x7f, 0x50, 0x3c, 0x9f, 0xa8,
    0x51, 0xa3, 0x40, 0x8f, 0x92, 0x9d, 0x38, 0xf5, 0xbc, 0xb6, 0xda, 0x21, 0x10, 0xff, 0xf3, 0xd2,
    0xcd, 0x0c, 0x13, 0xec, 0x5f, 0x97, 0x44, 0x17, 0xc4, 0xa7, 0x7e, 0x3d, 0x64, 0x5d, 0x19, 0x73,
    0x60, 0x81, 0x4f, 0xdc, 0x22, 0x2a, 0x90, 0x88, 0x46, 0xee, 0xb8, 0x14, 0xde, 0x5e, 0x0b, 0xdb,
    0xe0, 0x32, 0x3a, 0x0a, 0x49, 0x06, 0x24, 0x5c, 0xc2, 0xd3, 0xac, 0x62, 0x91, 0x95, 0xe4, 0x79,
    0xe7, 0xc8, 0x37, 0x6d, 0x8d, 0xd5, 0x4e, 0xa9, 0x6c, 0x56, 0xf4, 0xea, 0x65, 0x7a, 0xae, 0x08,
    0xba, 0x78, 0x25, 0x2e, 0x1c, 0xa6, 0xb4, 0xc6, 0xe8, 0xdd, 0x74, 0x1f, 0x4b, 0xbd, 0x8b, 0x8a,
    0x70, 0x3e, 0xb5, 0x66, 0x48, 0x03, 0xf6, 0x0e, 0x61, 0x35, 0x57, 0xb9, 0x86, 0xc1, 0x1d, 0x9e,
    0xe1, 0xf8, 0x98, 0x11, 0x69, 0xd9, 0x8e, 0x94, 0x9b, 0x1e, 0x87, 0xe9, 0xce, 0x55, 0x28, 0xdf,
    0x8c, 0xa1, 0x89, 0x0d, 0xbf, 0xe6, 0x42, 0x68, 0x41, 0x99, 0x2d, 0x0f, 0xb0, 0x54, 0xbb, 0x16,
];

const INV_SBOX: [u8; 256] = invert(&SBOX);

/// AES round constants (FIPS-197, Section 5.2).
const RCON: [u8; ROUNDS] = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1b, 0x36];

#[allow(clippy::cast_possible_truncation)]
const fn invert(table: &[u8; 256]) -> [u8; 256] {
    let mut inverse = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        inverse[table[i] as usize] = i as u8;
        i += 1;
    }
    inverse
}

/// Multiply by 2 in GF(2^8) modulo the AES polynomial.
#[inline]
const fn xtime(a: u8) -> u8 {
    (a << 1) ^ if a & 0x80 != 0 { 0x1b } else { 0 }
}

/// Multiply two elements of GF(2^8).
#[inline]
const fn gmul(mut a: u8, mut b: u8) -> u8 {
    let mut product = 0;
    while b != 0 {
        if b & 1 != 0 {
            product ^= a;
        }
        a = xtime(a);
        b >>= 1;
    }
    product
}

type State = [u8; BLOCK_SIZE];

/// The 11 round keys of an expanded AES-128 key.
#[derive(Zeroize, ZeroizeOnDrop)]
struct RoundKeys([[u8; BLOCK_SIZE]; ROUNDS + 1]);

impl RoundKeys {
    fn expand(key: &CipherKey) -> Self {
        let mut words = [[0u8; 4]; 4 * (ROUNDS + 1)];
        for (word, chunk) in words.iter_mut().zip(key.as_bytes().chunks_exact(4)) {
            word.copy_from_slice(chunk);
        }
        for i in 4..words.len() {
            let mut temp = words[i - 1];
            if i % 4 == 0 {
                temp.rotate_left(1);
                for b in &mut temp {
                    *b = SBOX[usize::from(*b)];
                }
                temp[0] ^= RCON[i / 4 - 1];
            }
            for j in 0..4 {
                words[i][j] = words[i - 4][j] ^ temp[j];
            }
        }

        let mut keys = [[0u8; BLOCK_SIZE]; ROUNDS + 1];
        for (round_key, round_words) in keys.iter_mut().zip(words.chunks_exact(4)) {
            for (dst, word) in round_key.chunks_exact_mut(4).zip(round_words) {
                dst.copy_from_slice(word);
            }
        }
        words.zeroize();
        Self(keys)
    }

    fn encrypt(&self, state: &mut State) {
        add_round_key(state, &self.0[0]);
        for round_key in &self.0[1..ROUNDS] {
            sub_bytes(state, &SBOX);
            shift_rows(state);
            mix_columns(state);
            add_round_key(state, round_key);
        }
        sub_bytes(state, &SBOX);
        shift_rows(state);
        add_round_key(state, &self.0[ROUNDS]);
    }

    fn decrypt(&self, state: &mut State) {
        add_round_key(state, &self.0[ROUNDS]);
        for round_key in self.0[1..ROUNDS].iter().rev() {
            inv_shift_rows(state);
            sub_bytes(state, &INV_SBOX);
            add_round_key(state, round_key);
            inv_mix_columns(state);
        }
        inv_shift_rows(state);
        sub_bytes(state, &INV_SBOX);
        add_round_key(state, &self.0[0]);
    }
}

fn add_round_key(state: &mut State, round_key: &[u8; BLOCK_SIZE]) {
    for (s, k) in state.iter_mut().zip(round_key) {
        *s ^= k;
    }
}

fn sub_bytes(state: &mut State, table: &[u8; 256]) {
    for b in state.iter_mut() {
        *b = table[usize::from(*b)];
    }
}

// The state is column-major: byte `row + 4 * col`. Row `r` rotates left by `r`.
fn shift_rows(state: &mut State) {
    let mut old = *state;
    for col in 0..4 {
        for row in 1..4 {
            state[row + 4 * col] = old[row + 4 * ((col + row) % 4)];
        }
    }
    old.zeroize();
}

fn inv_shift_rows(state: &mut State) {
    let mut old = *state;
    for col in 0..4 {
        for row in 1..4 {
            state[row + 4 * ((col + row) % 4)] = old[row + 4 * col];
        }
    }
    old.zeroize();
}

fn mix_columns(state: &mut State) {
    for column in state.chunks_exact_mut(4) {
        let [a, b, c, d] = [column[0], column[1], column[2], column[3]];
        column[0] = gmul(a, 2) ^ gmul(b, 3) ^ c ^ d;
        column[1] = a ^ gmul(b, 2) ^ gmul(c, 3) ^ d;
        column[2] = a ^ b ^ gmul(c, 2) ^ gmul(d, 3);
        column[3] = gmul(a, 3) ^ b ^ c ^ gmul(d, 2);
    }
}

fn inv_mix_columns(state: &mut State) {
    for column in state.chunks_exact_mut(4) {
        let [a, b, c, d] = [column[0], column[1], column[2], column[3]];
        column[0] = gmul(a, 14) ^ gmul(b, 11) ^ gmul(c, 13) ^ gmul(d, 9);
        column[1] = gmul(a, 9) ^ gmul(b, 14) ^ gmul(c, 11) ^ gmul(d, 13);
        column[2] = gmul(a, 13) ^ gmul(b, 9) ^ gmul(c, 14) ^ gmul(d, 11);
        column[3] = gmul(a, 11) ^ gmul(b, 13) ^ gmul(c, 9) ^ gmul(d, 14);
    }
}

/// Software AES-128 with no dependency on an external crypto crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedCipher;

impl BlockCipher for EmbeddedCipher {
    fn name(&self) -> &'static str {
        "embedded"
    }

    fn transform(&self, key: &CipherKey, iv: Option<&Iv>, buffer: &mut [u8], direction: Direction) {
        check_buffer(iv, buffer.len());
        let round_keys = RoundKeys::expand(key);
        let mut scratch = Scratch::default();
        run_blocks(&round_keys, iv, buffer, direction, &mut scratch);
    }
}

/// Per-call copies of data blocks. Wiped before the transform returns.
#[derive(Default, Zeroize, ZeroizeOnDrop)]
struct Scratch {
    state: State,
    chain: State,
    ciphertext: State,
}

fn run_blocks(
    round_keys: &RoundKeys,
    iv: Option<&Iv>,
    buffer: &mut [u8],
    direction: Direction,
    scratch: &mut Scratch,
) {
    let chained = iv.is_some();
    if let Some(iv) = iv {
        scratch.chain = *iv.as_bytes();
    }

    for block in buffer.chunks_exact_mut(BLOCK_SIZE) {
        scratch.state.copy_from_slice(block);

        match direction {
            Direction::Encrypt => {
                if chained {
                    add_round_key(&mut scratch.state, &scratch.chain);
                }
                round_keys.encrypt(&mut scratch.state);
                scratch.chain = scratch.state;
            }
            Direction::Decrypt => {
                scratch.ciphertext = scratch.state;
                round_keys.decrypt(&mut scratch.state);
                if chained {
                    add_round_key(&mut scratch.state, &scratch.chain);
                }
                scratch.chain = scratch.ciphertext;
            }
        }
        block.copy_from_slice(&scratch.state);
    }
    scratch.zeroize();
}
