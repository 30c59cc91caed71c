//! Random subdomains for auto-provisioned deployment endpoints
//!
//! Names look like `swift-eagle-x7k9`. Nothing here checks for collisions
//! (20 x 20 x 36^4 combinations); the platform rejects duplicates.

use rand::Rng;

const ADJECTIVES: [&str; 20] = [
    "swift", "bold", "calm", "dark", "eager", "fair", "glad", "happy", "keen", "lush", "mild",
    "nice", "pure", "quick", "rare", "safe", "warm", "wise", "zen", "cool",
];

const NOUNS: [&str; 20] = [
    "eagle", "bear", "deer", "fox", "hawk", "lion", "owl", "wolf", "tiger", "falcon", "panda",
    "seal", "crane", "dove", "finch", "heron", "ibis", "jay", "kite", "lark",
];

const SUFFIX_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const SUFFIX_LEN: usize = 4;

/// Generates subdomains and full HTTPS URLs under a platform domain
#[derive(Debug, Clone)]
pub struct DomainGenerator {
    domain_suffix: String,
}

impl DomainGenerator {
    /// `domain_suffix` is the platform apex, e.g. `luncurkan.app`
    pub fn new(domain_suffix: impl Into<String>) -> Self {
        Self {
            domain_suffix: domain_suffix.into(),
        }
    }

    pub fn domain_suffix(&self) -> &str {
        &self.domain_suffix
    }

    /// `{adjective}-{noun}-{suffix}`
    pub fn new_subdomain(&self) -> String {
        let mut rng = rand::rng();
        let adjective = ADJECTIVES[rng.random_range(0..ADJECTIVES.len())];
        let noun = NOUNS[rng.random_range(0..NOUNS.len())];
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| SUFFIX_CHARSET[rng.random_range(0..SUFFIX_CHARSET.len())] as char)
            .collect();
        format!("{}-{}-{}", adjective, noun, suffix)
    }

    /// `https://{subdomain}.{domain_suffix}`
    pub fn new_domain(&self) -> String {
        format!("https://{}.{}", self.new_subdomain(), self.domain_suffix)
    }
}
