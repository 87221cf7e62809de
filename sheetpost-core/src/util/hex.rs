use crate::error::{Result, SheetError};

pub fn parse_hex_array<const N: usize>(hex_str: &str) -> Result<[u8; N]> {
    let mut out = [0u8; N];
    let bytes = hex::decode(hex_str.trim())
        .map_err(|e| SheetError::InvalidLayout(format!("invalid hex: {e}")))?;
    if bytes.len() != N {
        return Err(SheetError::InvalidLayout(format!(
            "expected {N} bytes ({} hex chars), got {}",
            N * 2,
            bytes.len()
        )));
    }
    out.copy_from_slice(&bytes);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_digest() {
        let hex = "ab".repeat(32);
        assert_eq!(parse_hex_array::<32>(&hex).unwrap(), [0xab; 32]);
        assert_eq!(parse_hex_array::<2>(" 0a0B\n").unwrap(), [0x0a, 0x0b]);
    }

    #[test]
    fn rejects_wrong_length_and_bad_chars() {
        assert!(parse_hex_array::<32>("abcd").is_err());
        assert!(parse_hex_array::<2>("zzzz").is_err());
    }
}
