use rand::Rng;

const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub const RESERVATION_CODE_LEN: usize = 8;
pub const BARCODE_LEN: usize = 12;

/// Random uppercase alphanumeric string of the given length.
fn random_code(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| {
            let idx = rng.gen_range(0..CODE_CHARSET.len());
            CODE_CHARSET[idx] as char
        })
        .collect()
}

/// Human-facing reservation code, distinct from the reservation's internal id.
pub fn reservation_code() -> String {
    random_code(RESERVATION_CODE_LEN)
}

/// Ticket barcode for physical/external lookup.
pub fn barcode() -> String {
    random_code(BARCODE_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reservation_code_shape() {
        let code = reservation_code();
        assert_eq!(code.len(), RESERVATION_CODE_LEN);
        assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_barcode_shape() {
        let code = barcode();
        assert_eq!(code.len(), BARCODE_LEN);
        assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_codes_vary() {
        // Collision over a handful of draws would indicate a broken generator
        let codes: std::collections::HashSet<String> =
            (0..100).map(|_| barcode()).collect();
        assert_eq!(codes.len(), 100);
    }
}
