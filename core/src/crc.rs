/// CRC-16 generator polynomial (x^16 + x^15 + x^2 + 1)
pub const CRC16_POLYNOMIAL: u16 = 0x8005;

/// Fold one byte into a CRC-16 accumulator
///
/// MSB first, no reflection, no final xor. Starting from 0 and folding a
/// byte sequence followed by its own checksum (high byte first) always
/// ends at 0.
pub fn crc16_update(crc: u16, byte: u8) -> u16 {
    let mut crc = crc ^ ((byte as u16) << 8);
    for _ in 0..8 {
        if crc & 0x8000 != 0 {
            crc = (crc << 1) ^ CRC16_POLYNOMIAL;
        } else {
            crc <<= 1;
        }
    }
    crc
}

/// CRC-16 of a whole byte sequence, starting from 0
pub fn crc16(data: &[u8]) -> u16 {
    data.iter().fold(0, |crc, &byte| crc16_update(crc, byte))
}

/// The two trailing bytes that bring the residual of `data` back to zero
pub fn checksum_bytes(data: &[u8]) -> [u8; 2] {
    crc16(data).to_be_bytes()
}
