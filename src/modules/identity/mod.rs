mod generator;
mod model;

pub use generator::{
    generate_email, generate_username, IdentityError, ALPHABET, EMAIL_DOMAIN_LENGTH,
    EMAIL_LOCAL_LENGTH, TLDS,
};
pub use model::Identity;
