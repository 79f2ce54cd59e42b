//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

/// Calculate pagination offset; pages are 1-based
pub fn calculate_offset(page: u32, page_size: u32) -> i64 {
    (page.max(1) as i64 - 1) * page_size as i64
}

/// Resolve the effective page limit within configured bounds
pub fn clamp_page_limit(requested: Option<u32>, default_limit: u32, max_limit: u32) -> u32 {
    requested.unwrap_or(default_limit).clamp(1, max_limit)
}

/// Generate a random alphanumeric string
pub fn generate_random_string(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                            abcdefghijklmnopqrstuvwxyz\
                            0123456789";
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_offset() {
        assert_eq!(calculate_offset(1, 10), 0);
        assert_eq!(calculate_offset(2, 10), 10);
        assert_eq!(calculate_offset(5, 25), 100);
        // page 0 is treated as the first page
        assert_eq!(calculate_offset(0, 10), 0);
    }

    #[test]
    fn test_clamp_page_limit() {
        assert_eq!(clamp_page_limit(None, 10, 100), 10);
        assert_eq!(clamp_page_limit(Some(25), 10, 100), 25);
        assert_eq!(clamp_page_limit(Some(500), 10, 100), 100);
        assert_eq!(clamp_page_limit(Some(0), 10, 100), 1);
    }

    #[test]
    fn test_generate_random_string() {
        let s = generate_random_string(16);
        assert_eq!(s.len(), 16);
        assert!(s.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
