//! Security adapters implementing the password-hashing port.

mod argon2_hasher;

pub use argon2_hasher::Argon2PasswordHasher;
