use crate::error::ColorError;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Parses `#rrggbb`.
pub fn parse_hex(hex: &str) -> Result<Rgb, ColorError> {
    let digits = hex
        .strip_prefix('#')
        .ok_or_else(|| ColorError::MissingHash(hex.to_string()))?;

    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex(hex.to_string()));
    }

    let num = u32::from_str_radix(digits, 16).map_err(|_| ColorError::InvalidHex(hex.to_string()))?;
    Ok(Rgb { r: (num >> 16) as u8, g: (num >> 8) as u8, b: num as u8 })
}

/// Subtracts `percent` of full intensity from every channel, clamping at 0.
pub fn darken(color: Rgb, percent: u8) -> Rgb {
    let amount = (255 * percent as u32 / 100) as u8;
    Rgb {
        r: color.r.saturating_sub(amount),
        g: color.g.saturating_sub(amount),
        b: color.b.saturating_sub(amount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex() {
        assert_eq!(parse_hex("#4caf50"), Ok(Rgb { r: 0x4c, g: 0xaf, b: 0x50 }));
        assert_eq!(parse_hex("#FFFFFF"), Ok(Rgb { r: 255, g: 255, b: 255 }));
        assert_eq!(parse_hex("4caf50"), Err(ColorError::MissingHash("4caf50".into())));
        assert_eq!(parse_hex("#4caf5"), Err(ColorError::InvalidHex("#4caf5".into())));
        assert_eq!(parse_hex("#+caf50"), Err(ColorError::InvalidHex("#+caf50".into())));
    }

    #[test]
    fn darkens_by_a_fifth_and_clamps() {
        let head = darken(Rgb { r: 0x4c, g: 0xaf, b: 0x50 }, 20);
        // floor(255 * 0.2) = 51
        assert_eq!(head, Rgb { r: 25, g: 124, b: 29 });

        let black = darken(Rgb { r: 10, g: 0, b: 50 }, 20);
        assert_eq!(black, Rgb { r: 0, g: 0, b: 0 });
    }
}
