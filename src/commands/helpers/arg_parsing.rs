//! Argument parsing utilities for CLI commands.

use readshare::constants::MAX_KMER_SIZE;

/// Parse a k-mer size, validating range 1..=MAX_KMER_SIZE.
pub fn parse_kmer_size(s: &str) -> Result<usize, String> {
    let k: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid positive integer", s))?;
    if k == 0 || k > MAX_KMER_SIZE {
        return Err(format!("k-mer size must be in 1..={}, got {}", MAX_KMER_SIZE, k));
    }
    Ok(k)
}

/// Parse the shared k-mer threshold, which must be at least 1.
pub fn parse_min_hits(s: &str) -> Result<u32, String> {
    let t: u32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid positive integer", s))?;
    if t == 0 {
        return Err("minimum shared k-mers must be greater than 0".to_string());
    }
    Ok(t)
}

/// Parse a percentage, validating range [0, 100].
pub fn parse_percentage(s: &str) -> Result<f64, String> {
    let pct: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if !(0.0..=100.0).contains(&pct) {
        return Err(format!("percentage must be in [0, 100], got {}", pct));
    }
    Ok(pct)
}

/// Parse a minimum Shannon entropy, which must be a non-negative number.
pub fn parse_entropy(s: &str) -> Result<f64, String> {
    let e: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if !e.is_finite() || e < 0.0 {
        return Err(format!("entropy must be a non-negative number, got {}", e));
    }
    Ok(e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kmer_size_valid() {
        assert_eq!(parse_kmer_size("1").unwrap(), 1);
        assert_eq!(parse_kmer_size("33").unwrap(), 33);
        assert_eq!(parse_kmer_size("40").unwrap(), 40);
    }

    #[test]
    fn test_parse_kmer_size_out_of_range() {
        assert!(parse_kmer_size("0").unwrap_err().contains("must be in"));
        assert!(parse_kmer_size("41").unwrap_err().contains("must be in"));
        assert!(parse_kmer_size("abc")
            .unwrap_err()
            .contains("not a valid positive integer"));
    }

    #[test]
    fn test_parse_min_hits() {
        assert_eq!(parse_min_hits("2").unwrap(), 2);
        assert!(parse_min_hits("0").unwrap_err().contains("greater than 0"));
        assert!(parse_min_hits("-1").is_err());
    }

    #[test]
    fn test_parse_percentage() {
        assert_eq!(parse_percentage("0").unwrap(), 0.0);
        assert_eq!(parse_percentage("100").unwrap(), 100.0);
        assert_eq!(parse_percentage("37.5").unwrap(), 37.5);
        assert!(parse_percentage("100.1").is_err());
        assert!(parse_percentage("-3").is_err());
        assert!(parse_percentage("half").is_err());
    }

    #[test]
    fn test_parse_entropy() {
        assert_eq!(parse_entropy("1.5").unwrap(), 1.5);
        assert!(parse_entropy("-0.5").is_err());
        assert!(parse_entropy("NaN").is_err());
    }
}
