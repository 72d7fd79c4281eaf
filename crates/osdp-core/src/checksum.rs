//! CRC-16 frame integrity check.
//!
//! OSDP frames carry a CRC-16/ITU-T (polynomial `0x1021`, non-reflected)
//! trailer computed with a fixed initial value. Peers validate each other's
//! output, so the byte-swap formulation below must stay bit-exact.

/// Initial value mandated by the protocol for every frame checksum.
pub const CRC16_SEED: u16 = 0x1D0F;

/// Length of the checksum trailer on the wire.
pub const CRC16_LEN: usize = 2;

/// Run the CRC-16/ITU-T update over `bytes` starting from `seed`.
///
/// An empty input returns `seed` unchanged.
pub fn crc16_itu_t(seed: u16, bytes: &[u8]) -> u16 {
    bytes.iter().fold(seed, |crc, &byte| {
        let mut crc = crc.swap_bytes() ^ u16::from(byte);
        crc ^= (crc & 0x00ff) >> 4;
        crc ^= crc << 12;
        crc ^= (crc & 0x00ff) << 5;
        crc
    })
}

/// Checksum of `bytes` with the protocol seed.
pub fn compute_crc16(bytes: &[u8]) -> u16 {
    crc16_itu_t(CRC16_SEED, bytes)
}

/// Append the checksum of `frame` to it, little-endian.
pub fn append_crc16(frame: &mut Vec<u8>) {
    let crc = compute_crc16(frame);
    frame.extend_from_slice(&crc.to_le_bytes());
}

/// Check a frame whose last two bytes are its little-endian checksum.
pub fn verify_crc16(frame: &[u8]) -> bool {
    let Some(body_len) = frame.len().checked_sub(CRC16_LEN) else {
        return false;
    };
    let (body, trailer) = frame.split_at(body_len);
    compute_crc16(body).to_le_bytes() == trailer
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_returns_seed() {
        assert_eq!(compute_crc16(b""), CRC16_SEED);
        assert_eq!(crc16_itu_t(0xBEEF, &[]), 0xBEEF);
    }

    #[test]
    fn check_string_matches_reference() {
        // CRC-16/AUG-CCITT check value
        assert_eq!(compute_crc16(b"123456789"), 0xE5CC);
        // Same polynomial from 0xFFFF gives CRC-16/CCITT-FALSE
        assert_eq!(crc16_itu_t(0xFFFF, b"123456789"), 0x29B1);
    }

    #[test]
    fn poll_frame_vector() {
        // SOM, addr, len lsb, len msb, ctrl, osdp_POLL
        let frame = [0x53, 0x65, 0x08, 0x00, 0x04, 0x60];
        assert_eq!(compute_crc16(&frame), 0x9060);
    }

    #[test]
    fn deterministic() {
        let data: Vec<u8> = (0..=255).collect();
        assert_eq!(compute_crc16(&data), compute_crc16(&data));
    }

    #[test]
    fn incremental_matches_one_shot() {
        let data = b"split across two reads";
        let (head, tail) = data.split_at(7);
        let partial = crc16_itu_t(CRC16_SEED, head);
        assert_eq!(crc16_itu_t(partial, tail), compute_crc16(data));
    }

    #[test]
    fn detects_every_single_bit_flip() {
        let data = *b"\x53\x65\x08\x00\x04\x60";
        let good = compute_crc16(&data);
        for i in 0..data.len() {
            for bit in 0..8 {
                let mut corrupted = data;
                corrupted[i] ^= 1 << bit;
                assert_ne!(compute_crc16(&corrupted), good, "byte {i} bit {bit}");
            }
        }
    }

    #[test]
    fn detects_short_bursts() {
        let data = [0xA5u8; 12];
        let good = compute_crc16(&data);
        for start in 0..data.len() - 1 {
            let mut corrupted = data;
            corrupted[start] ^= 0xFF;
            corrupted[start + 1] ^= 0x0F;
            assert_ne!(compute_crc16(&corrupted), good);
        }
    }

    #[test]
    fn append_then_verify() {
        let mut frame = vec![0x53, 0x65, 0x08, 0x00, 0x04, 0x60];
        append_crc16(&mut frame);
        assert_eq!(&frame[6..], &[0x60, 0x90]);
        assert!(verify_crc16(&frame));

        frame[2] ^= 0x01;
        assert!(!verify_crc16(&frame));
    }

    #[test]
    fn verify_rejects_short_frames() {
        assert!(!verify_crc16(&[]));
        assert!(!verify_crc16(&[0x0F]));
        // Two bytes is an empty body followed by the seed
        assert!(verify_crc16(&CRC16_SEED.to_le_bytes()));
    }
}
