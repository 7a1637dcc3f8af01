/// Basic shape check for email addresses accepted by the account store
pub fn is_valid_email(email: &str) -> bool {
    email.contains('@')
        && email.contains('.')
        && !email.contains(' ')
        && email.chars().filter(|&c| c == '@').count() == 1
        && email.len() >= 5
}
