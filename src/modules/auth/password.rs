use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;

pub const MIN_PASSWORD_LENGTH: usize = 8;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
/// Subset of the special characters `validate_password` accepts
const SPECIALS: &[u8] = b"!@#$%^&*()-_=+";

/// Password policy violations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordError {
    TooShort,
    NoUppercase,
    NoLowercase,
    NoNumber,
    NoSpecialChar,
}

impl fmt::Display for PasswordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            PasswordError::TooShort => "password must be at least 8 characters",
            PasswordError::NoUppercase => "password needs an uppercase letter",
            PasswordError::NoLowercase => "password needs a lowercase letter",
            PasswordError::NoNumber => "password needs a number",
            PasswordError::NoSpecialChar => "password needs a special character",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for PasswordError {}

/// Function to validate password strength
pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooShort);
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        return Err(PasswordError::NoUppercase);
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        return Err(PasswordError::NoLowercase);
    }
    if !password.chars().any(|c| c.is_numeric()) {
        return Err(PasswordError::NoNumber);
    }
    if !password
        .chars()
        .any(|c| "!@#$%^&*()_+-=[]{}|;:,.<>?".contains(c))
    {
        return Err(PasswordError::NoSpecialChar);
    }
    Ok(())
}

/// Random password that always passes `validate_password`.
///
/// One character from each class is placed first, the rest are drawn from
/// the union, then the whole buffer is shuffled.
pub fn generate_strong_password<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    let length = length.max(MIN_PASSWORD_LENGTH);
    let classes = [LOWERCASE, UPPERCASE, DIGITS, SPECIALS];
    let pool = classes.concat();

    let mut chars: Vec<u8> = classes
        .iter()
        .map(|class| class[rng.gen_range(0..class.len())])
        .collect();
    while chars.len() < length {
        chars.push(pool[rng.gen_range(0..pool.len())]);
    }
    chars.shuffle(rng);

    chars.into_iter().map(char::from).collect()
}
