//! Hex text to binary conversion.
//!
//! Keys and diagnostic dumps travel as hex text. Odd-length input is read as
//! if it had a leading `0` nibble, so `"abc"` decodes to `[0x0a, 0xbc]`.

use thiserror::Error;

/// Errors from hex decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexError {
    #[error("invalid hex digit {character:?} at index {index}")]
    InvalidDigit { character: char, index: usize },

    #[error("output buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },
}

/// Convert one hex digit to its 4-bit value.
pub fn char_to_nibble(c: char) -> Result<u8, HexError> {
    let nibble = match c {
        '0'..='9' => c as u8 - b'0',
        'a'..='f' => c as u8 - b'a' + 10,
        'A'..='F' => c as u8 - b'A' + 10,
        _ => {
            return Err(HexError::InvalidDigit {
                character: c,
                index: 0,
            });
        }
    };
    Ok(nibble)
}

/// Number of bytes `hex_len` hex digits decode to.
pub const fn decoded_len(hex_len: usize) -> usize {
    hex_len / 2 + hex_len % 2
}

/// Decode `hex` into the front of `out`, returning the number of bytes written.
///
/// The size check happens before anything is written. An invalid digit may
/// leave `out` partially written.
pub fn hex_to_bin(hex: &str, out: &mut [u8]) -> Result<usize, HexError> {
    let digits = hex.as_bytes();
    let needed = decoded_len(digits.len());
    if out.len() < needed {
        return Err(HexError::BufferTooSmall {
            needed,
            available: out.len(),
        });
    }

    let odd = digits.len() % 2;
    if odd == 1 {
        out[0] = char_to_nibble(char::from(digits[0])).map_err(|_| invalid_digit(hex, 0))?;
    }

    ::hex::decode_to_slice(&digits[odd..], &mut out[odd..needed]).map_err(|e| match e {
        ::hex::FromHexError::InvalidHexCharacter { index, .. } => invalid_digit(hex, index + odd),
        // Length is even and sized above; anything else means the slice was short.
        _ => HexError::BufferTooSmall {
            needed,
            available: out.len(),
        },
    })?;

    Ok(needed)
}

/// The character covering byte `index` of `hex`, reported at its first byte.
fn invalid_digit(hex: &str, index: usize) -> HexError {
    let (start, character) = hex
        .char_indices()
        .take_while(|&(i, _)| i <= index)
        .last()
        .unwrap_or((index, char::REPLACEMENT_CHARACTER));
    HexError::InvalidDigit {
        character,
        index: start,
    }
}

/// Decode `hex` into a freshly allocated buffer.
pub fn hex_to_vec(hex: &str) -> Result<Vec<u8>, HexError> {
    let mut out = vec![0u8; decoded_len(hex.len())];
    hex_to_bin(hex, &mut out)?;
    Ok(out)
}

/// Lowercase hex encoding of `bytes`.
pub fn bin_to_hex(bytes: &[u8]) -> String {
    ::hex::encode(bytes)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn nibbles() {
        assert_eq!(char_to_nibble('0').unwrap(), 0);
        assert_eq!(char_to_nibble('9').unwrap(), 9);
        assert_eq!(char_to_nibble('a').unwrap(), 10);
        assert_eq!(char_to_nibble('F').unwrap(), 15);
        for bad in ['g', 'G', ' ', 'x', '-', 'é', '٣'] {
            assert!(char_to_nibble(bad).is_err(), "{bad:?} accepted");
        }
    }

    #[test]
    fn non_ascii_digit_is_reported_whole() {
        let mut out = [0u8; 2];
        assert_eq!(
            hex_to_bin("é1", &mut out),
            Err(HexError::InvalidDigit {
                character: 'é',
                index: 0
            })
        );
        assert_eq!(
            hex_to_vec("0a٣"),
            Err(HexError::InvalidDigit {
                character: '٣',
                index: 2
            })
        );
        assert_eq!(
            hex_to_vec("ab€"),
            Err(HexError::InvalidDigit {
                character: '€',
                index: 2
            })
        );
    }

    #[test]
    fn even_length() {
        let mut out = [0u8; 4];
        assert_eq!(hex_to_bin("DEADbeef", &mut out).unwrap(), 4);
        assert_eq!(out, [0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn odd_length_gets_leading_zero_nibble() {
        let mut out = [0u8; 2];
        assert_eq!(hex_to_bin("abc", &mut out).unwrap(), 2);
        assert_eq!(out, [0x0a, 0xbc]);

        assert_eq!(hex_to_vec("f").unwrap(), vec![0x0f]);
    }

    #[test]
    fn empty_input() {
        let mut out = [0xAAu8; 2];
        assert_eq!(hex_to_bin("", &mut out).unwrap(), 0);
        assert_eq!(out, [0xAA, 0xAA]);
    }

    #[test]
    fn larger_buffer_only_front_is_written() {
        let mut out = [0xFFu8; 4];
        assert_eq!(hex_to_bin("0102", &mut out).unwrap(), 2);
        assert_eq!(out, [0x01, 0x02, 0xFF, 0xFF]);
    }

    #[test]
    fn buffer_too_small() {
        let mut out = [0u8; 1];
        assert_eq!(
            hex_to_bin("abc", &mut out),
            Err(HexError::BufferTooSmall {
                needed: 2,
                available: 1
            })
        );
        // nothing written on a size failure
        assert_eq!(out, [0]);
    }

    #[test]
    fn invalid_digit_reports_position() {
        let mut out = [0u8; 4];
        assert_eq!(
            hex_to_bin("01zz", &mut out),
            Err(HexError::InvalidDigit {
                character: 'z',
                index: 2
            })
        );
        assert_eq!(
            hex_to_bin("x12", &mut out),
            Err(HexError::InvalidDigit {
                character: 'x',
                index: 0
            })
        );
        assert_eq!(
            hex_to_bin("12g", &mut out),
            Err(HexError::InvalidDigit {
                character: 'g',
                index: 2
            })
        );
    }

    #[test]
    fn round_trip() {
        let samples: [&[u8]; 4] = [b"", b"\x00", b"\x01\x02\x03\x04\x05", &[0xFF; 33]];
        for bytes in samples {
            let text = bin_to_hex(bytes);
            assert_eq!(text.len(), bytes.len() * 2);
            assert_eq!(hex_to_vec(&text).unwrap(), bytes);
        }
        let all: Vec<u8> = (0..=255).collect();
        assert_eq!(hex_to_vec(&bin_to_hex(&all)).unwrap(), all);
    }
}
