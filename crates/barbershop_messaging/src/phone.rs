// --- File: crates/barbershop_messaging/src/phone.rs ---

use crate::error::MessagingError;

/// Minimum number of national digits accepted.
pub const MIN_PHONE_DIGITS: usize = 7;

/// Normalize a phone number to the international digit string `wa.me` expects.
///
/// - `+<digits>` is already international.
/// - `00<digits>` is an international call prefix and is dropped.
/// - A single leading `0` is a trunk prefix and is replaced by `default_country_code`.
/// - Bare digits get the country code prepended unless they already start with it.
///
/// Spaces, dashes, dots and brackets are ignored. The result has no `+`.
pub fn normalize_phone(raw: &str, default_country_code: &str) -> Result<String, MessagingError> {
    let trimmed = raw.trim();
    let international = trimmed.starts_with('+');
    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();
    let country: String = default_country_code
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    let has_country = international || digits.starts_with("00");

    let normalized = if international {
        digits
    } else if let Some(rest) = digits.strip_prefix("00") {
        rest.to_string()
    } else if let Some(rest) = digits.strip_prefix('0') {
        format!("{}{}", country, rest)
    } else if !country.is_empty()
        && digits.starts_with(&country)
        && digits.len() >= MIN_PHONE_DIGITS + country.len()
    {
        digits
    } else {
        format!("{}{}", country, digits)
    };

    let national_len = if has_country {
        normalized.len()
    } else {
        normalized.len().saturating_sub(country.len())
    };
    if national_len < MIN_PHONE_DIGITS {
        return Err(MessagingError::InvalidPhone(format!(
            "'{}' has fewer than {} digits",
            raw, MIN_PHONE_DIGITS
        )));
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_international_forms() {
        assert_eq!(normalize_phone("+351 912 345 678", "1").unwrap(), "351912345678");
        assert_eq!(normalize_phone("00351 912-345-678", "1").unwrap(), "351912345678");
    }

    #[test]
    fn test_trunk_prefix_uses_default_country() {
        assert_eq!(normalize_phone("0912 345 678", "351").unwrap(), "351912345678");
        assert_eq!(normalize_phone("(030) 1234567", "49").unwrap(), "49301234567");
    }

    #[test]
    fn test_bare_digits() {
        assert_eq!(normalize_phone("912345678", "351").unwrap(), "351912345678");
        assert_eq!(normalize_phone("351912345678", "351").unwrap(), "351912345678");
        assert_eq!(normalize_phone("212.555.1234", "1").unwrap(), "12125551234");
    }

    #[test]
    fn test_too_short() {
        assert!(normalize_phone("12345", "351").is_err());
        assert!(normalize_phone("+12345", "351").is_err());
        assert!(normalize_phone("0012345", "351").is_err());
        assert!(normalize_phone("", "351").is_err());
        assert!(normalize_phone("call me", "351").is_err());
    }
}
