//! CRC-16/CCITT-FALSE as used by the EMVCo QR checksum field (tag `63`).
//!
//! Polynomial `0x1021`, initial register `0xFFFF`, no input or output
//! reflection and no final XOR.

const POLY: u16 = 0x1021;
const INIT: u16 = 0xFFFF;

const TABLE: [u16; 256] = build_table();

const fn build_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = (i as u16) << 8;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ POLY
            } else {
                crc << 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Computes the checksum of `data`.
pub fn checksum(data: &[u8]) -> u16 {
    data.iter().fold(INIT, |crc, &byte| {
        let index = ((crc >> 8) as u8 ^ byte) as usize;
        (crc << 8) ^ TABLE[index]
    })
}

/// Renders a checksum the way the payload trailer carries it: four uppercase hex digits.
pub fn to_hex(crc: u16) -> String {
    format!("{:04X}", crc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checksum_bitwise(data: &[u8]) -> u16 {
        let mut crc = INIT;
        for &byte in data {
            crc ^= (byte as u16) << 8;
            for _ in 0..8 {
                crc = if crc & 0x8000 != 0 {
                    (crc << 1) ^ POLY
                } else {
                    crc << 1
                };
            }
        }
        crc
    }

    #[test]
    fn test_check_value() {
        assert_eq!(checksum(b"123456789"), 0x29B1);
    }

    #[test]
    fn test_empty_input_is_initial_register() {
        assert_eq!(checksum(b""), 0xFFFF);
    }

    #[test]
    fn test_table_matches_bitwise() {
        let inputs: [&[u8]; 4] = [
            b"A",
            b"0002010102113037",
            b"00020101021130370016A000000677010111011300669177974775303764540559.505802TH6304",
            &[0x00, 0xFF, 0x80, 0x7F],
        ];
        for input in inputs {
            assert_eq!(checksum(input), checksum_bitwise(input));
        }
    }

    #[test]
    fn test_hex_is_uppercase_and_padded() {
        assert_eq!(to_hex(0x29B1), "29B1");
        assert_eq!(to_hex(0x00af), "00AF");
        assert_eq!(to_hex(0), "0000");
    }
}
