//! AES-128 backed by the RustCrypto `aes` and `cbc` crates.

use aes::Aes128;
use aes::cipher::block_padding::NoPadding;
use aes::cipher::{
    BlockDecrypt, BlockDecryptMut, BlockEncrypt, BlockEncryptMut, Key, KeyInit, KeyIvInit,
};

use super::{BlockCipher, CipherKey, Direction, Iv, check_buffer};
use crate::fatal;

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;

/// Library-backed AES-128 (hardware accelerated where the CPU allows).
///
/// A failure inside the library aborts the process.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlatformCipher;

impl BlockCipher for PlatformCipher {
    fn name(&self) -> &'static str {
        "platform"
    }

    fn transform(&self, key: &CipherKey, iv: Option<&Iv>, buffer: &mut [u8], direction: Direction) {
        check_buffer(iv, buffer.len());
        let key: &Key<Aes128> = key.as_bytes().into();

        match (iv, direction) {
            (Some(_), _) if buffer.is_empty() => {}
            (Some(iv), Direction::Encrypt) => {
                let len = buffer.len();
                if let Err(e) = Aes128CbcEnc::new(key, iv.as_bytes().into())
                    .encrypt_padded_mut::<NoPadding>(buffer, len)
                {
                    fatal::abort("AES-128-CBC encrypt", &e);
                }
            }
            (Some(iv), Direction::Decrypt) => {
                if let Err(e) = Aes128CbcDec::new(key, iv.as_bytes().into())
                    .decrypt_padded_mut::<NoPadding>(buffer)
                {
                    fatal::abort("AES-128-CBC decrypt", &e);
                }
            }
            (None, Direction::Encrypt) => Aes128::new(key).encrypt_block(buffer.into()),
            (None, Direction::Decrypt) => Aes128::new(key).decrypt_block(buffer.into()),
        }
    }
}
