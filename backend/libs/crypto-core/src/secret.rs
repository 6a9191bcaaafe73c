//! Signing secret strength classification
//!
//! HS256 is only as strong as the shared secret. Secrets are classified at
//! startup so a short or patterned value never reaches production silently.

const MIN_SECRET_LENGTH: usize = 32; // 256 bits
const RECOMMENDED_SECRET_LENGTH: usize = 64; // 512 bits
const MIN_ENTROPY_BITS: f64 = 4.0;
const STRONG_ENTROPY_BITS: f64 = 5.0;

/// Secret strength classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretStrength {
    /// Reject
    Weak,
    /// Usable, warn
    Acceptable,
    Strong,
}

/// Classify an HMAC secret.
///
/// **Criteria**:
/// - at least 32 bytes, 64 recommended
/// - Shannon entropy of at least 4 bits/byte
/// - no run of 4 identical or 4 ascending bytes ("aaaa", "1234")
pub fn validate_secret_strength(secret: &str) -> SecretStrength {
    let bytes = secret.as_bytes();

    if bytes.len() < MIN_SECRET_LENGTH {
        return SecretStrength::Weak;
    }

    let entropy = shannon_entropy(bytes);
    if entropy < MIN_ENTROPY_BITS || has_obvious_patterns(bytes) {
        return SecretStrength::Weak;
    }

    if bytes.len() >= RECOMMENDED_SECRET_LENGTH && entropy >= STRONG_ENTROPY_BITS {
        SecretStrength::Strong
    } else {
        SecretStrength::Acceptable
    }
}

/// Bits per byte, 0-8 scale.
fn shannon_entropy(data: &[u8]) -> f64 {
    let mut freq = [0u32; 256];
    for &byte in data {
        freq[byte as usize] += 1;
    }

    let len = data.len() as f64;
    freq.iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = f64::from(count) / len;
            -p * p.log2()
        })
        .sum()
}

fn has_obvious_patterns(data: &[u8]) -> bool {
    longest_run(data, |a, b| a == b) >= 4 || longest_run(data, |a, b| b == a.wrapping_add(1)) >= 4
}

fn longest_run(data: &[u8], linked: impl Fn(u8, u8) -> bool) -> usize {
    let mut longest = usize::from(!data.is_empty());
    let mut current = longest;
    for window in data.windows(2) {
        if linked(window[0], window[1]) {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 1;
        }
    }
    longest
}
