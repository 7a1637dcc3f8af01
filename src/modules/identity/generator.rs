use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use std::ops::RangeInclusive;

/// Characters usernames and email labels are drawn from
pub const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Top level domains for generated email addresses
pub const TLDS: [&str; 7] = ["com", "net", "gov", "org", "edu", "biz", "info"];

pub const EMAIL_LOCAL_LENGTH: RangeInclusive<usize> = 5..=10;
pub const EMAIL_DOMAIN_LENGTH: RangeInclusive<usize> = 7..=17;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityError {
    ZeroLength,
}

impl fmt::Display for IdentityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityError::ZeroLength => write!(f, "username length must be at least 1"),
        }
    }
}

impl std::error::Error for IdentityError {}

fn random_chars<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())]))
        .collect()
}

/// Draw `length` characters uniformly from `ALPHABET`, with replacement.
///
/// No uniqueness is implied; collisions are caught by the provisioner.
pub fn generate_username<R: Rng + ?Sized>(rng: &mut R, length: usize) -> Result<String, IdentityError> {
    if length == 0 {
        return Err(IdentityError::ZeroLength);
    }
    Ok(random_chars(rng, length))
}

/// Build `{local}@{domain}.{tld}` from random alphabet characters.
///
/// The address only has to look valid; it is never delivered to.
pub fn generate_email<R: Rng + ?Sized>(rng: &mut R) -> String {
    let local_length = rng.gen_range(EMAIL_LOCAL_LENGTH);
    let domain_length = rng.gen_range(EMAIL_DOMAIN_LENGTH);

    let local = random_chars(rng, local_length);
    let domain = random_chars(rng, domain_length);
    let tld = TLDS.choose(rng).copied().unwrap_or(TLDS[0]);

    format!("{}@{}.{}", local, domain, tld)
}
