pub mod alphabet;
pub mod generator;
pub mod kdf;
pub mod strength;

pub use generator::{derive, DerivationRequest, DeriveError, MAX_LENGTH, MIN_LENGTH};
pub use kdf::{build_salt, derive_key_material};
pub use strength::{score, Category, StrengthReport};
