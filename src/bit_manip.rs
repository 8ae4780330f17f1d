/// Converts a slice of bytes into its constituent bits (most significant bit first).
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<bool> {
    let mut ret = Vec::with_capacity(bytes.len() * 8);
    for byte in bytes {
        for bit_idx in 0..8 {
            ret.push(
                byte & (1 << (7 - bit_idx)) != 0
            );
        }
    }
    ret
}

/// Converts a slice of bytes into a string of '1' and '0' characters representing the bit values
/// (most significant bit first).
pub fn bytes_to_binary(bytes: &[u8]) -> String {
    bytes_to_bits(bytes).iter()
        .map(|bit| if *bit { '1' } else { '0' })
        .collect()
}

/// Returns a value of `bit_count` bits whose top `prefix` bits are ones and whose remaining bits
/// are zeroes. `prefix` is clamped to `bit_count`, which may not exceed 128.
pub fn prefix_mask_bits(prefix: u8, bit_count: u8) -> u128 {
    let prefix = prefix.min(bit_count);
    if prefix == 0 {
        // shifting by the full width is not allowed
        return 0;
    }
    (u128::MAX << (128 - u32::from(prefix))) >> (128 - u32::from(bit_count))
}
