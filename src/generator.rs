use crate::{alphabet, kdf};
use thiserror::Error;
use zeroize::Zeroizing;

pub const MIN_LENGTH: usize = 8;
pub const MAX_LENGTH: usize = 32;

// One byte of key material yields at most one character, so the key material
// must cover the longest permitted password.
const _: () = assert!(kdf::OUTPUT_LEN >= MAX_LENGTH);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeriveError {
    #[error("service identifier cannot be empty")]
    InvalidServiceIdentifier,
    #[error("master secret cannot be empty")]
    InvalidMasterSecret,
    #[error("requested length {0} is outside the supported range 8..=32")]
    InvalidLength(usize),
}

#[derive(Debug, Clone)]
pub struct DerivationRequest {
    pub service_identifier: String,
    pub master_secret: Zeroizing<String>,
    pub length: usize,
    pub use_digits: bool,
    pub use_symbols: bool,
    pub exclude_ambiguous: bool,
}

/// Derives the per-service password for one request.
///
/// Pure and deterministic: equal requests yield bit-identical passwords on
/// every invocation, on any platform. Validation happens before any KDF
/// work; out-of-range lengths are rejected rather than clamped.
pub fn derive(request: &DerivationRequest) -> Result<Zeroizing<String>, DeriveError> {
    if request.service_identifier.is_empty() {
        return Err(DeriveError::InvalidServiceIdentifier);
    }

    if request.master_secret.is_empty() {
        return Err(DeriveError::InvalidMasterSecret);
    }

    if !(MIN_LENGTH..=MAX_LENGTH).contains(&request.length) {
        return Err(DeriveError::InvalidLength(request.length));
    }

    let pool = alphabet::build(
        request.use_digits,
        request.use_symbols,
        request.exclude_ambiguous,
    );

    let salt = kdf::build_salt(&request.service_identifier, &request.master_secret);
    let key = kdf::derive_key_material(&request.master_secret, &salt);

    let mut password = Zeroizing::new(String::with_capacity(request.length));

    for &byte in key.iter() {
        if password.len() >= request.length {
            break;
        }

        let index = byte as usize % pool.len();
        password.push(pool[index] as char);
    }

    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(
        service: &str,
        master: &str,
        length: usize,
        use_digits: bool,
        use_symbols: bool,
        exclude_ambiguous: bool,
    ) -> DerivationRequest {
        DerivationRequest {
            service_identifier: service.to_string(),
            master_secret: Zeroizing::new(master.to_string()),
            length,
            use_digits,
            use_symbols,
            exclude_ambiguous,
        }
    }

    #[test]
    fn test_empty_service_identifier() {
        let result = derive(&request("", "secret", 16, true, true, false));
        assert_eq!(result.unwrap_err(), DeriveError::InvalidServiceIdentifier);
    }

    #[test]
    fn test_empty_master_secret() {
        let result = derive(&request("example.com", "", 16, true, true, false));
        assert_eq!(result.unwrap_err(), DeriveError::InvalidMasterSecret);
    }

    #[test]
    fn test_length_out_of_range() {
        let result = derive(&request("example.com", "secret", 7, true, true, false));
        assert_eq!(result.unwrap_err(), DeriveError::InvalidLength(7));

        let result = derive(&request("example.com", "secret", 33, true, true, false));
        assert_eq!(result.unwrap_err(), DeriveError::InvalidLength(33));
    }

    #[test]
    fn test_deterministic() {
        let req = request("example.com", "Correct-Horse-1", 16, true, true, false);
        let password1 = derive(&req).unwrap();
        let password2 = derive(&req).unwrap();
        assert_eq!(*password1, *password2);
        assert_eq!(password1.len(), 16);
    }

    #[test]
    fn test_distinct_services_distinct_passwords() {
        let services = ["example.com", "google.com", "github.com"];
        let mut passwords = Vec::new();

        for service in services {
            let req = request(service, "Correct-Horse-1", 16, true, true, false);
            passwords.push(derive(&req).unwrap());
        }

        assert_ne!(*passwords[0], *passwords[1]);
        assert_ne!(*passwords[0], *passwords[2]);
        assert_ne!(*passwords[1], *passwords[2]);
    }

    #[test]
    fn test_length_exactness() {
        for length in MIN_LENGTH..=MAX_LENGTH {
            let req = request("example.com", "Correct-Horse-1", length, true, true, false);
            let password = derive(&req).unwrap();
            assert_eq!(password.len(), length);
        }
    }

    #[test]
    fn test_output_within_pool() {
        let req = request("example.com", "Correct-Horse-1", 32, true, true, false);
        let password = derive(&req).unwrap();
        let pool = alphabet::build(true, true, false);

        for byte in password.bytes() {
            assert!(
                pool.contains(&byte),
                "password contains character outside the pool: {}",
                byte as char
            );
        }
    }

    #[test]
    fn test_exclude_ambiguous_never_emits_ambiguous() {
        let req = request("example.com", "Correct-Horse-1", 32, true, true, true);
        let password = derive(&req).unwrap();

        for byte in password.bytes() {
            assert!(
                !b"l1I0O".contains(&byte),
                "ambiguous character {} in output",
                byte as char
            );
        }
    }

    #[test]
    fn test_letters_only_when_flags_disabled() {
        let req = request("example.com", "Correct-Horse-1", 24, false, false, false);
        let password = derive(&req).unwrap();
        assert!(password.bytes().all(|b| b.is_ascii_alphabetic()));
    }

    #[test]
    fn test_regression_full_pool() {
        let req = request("example.com", "Correct-Horse-1", 16, true, true, false);
        let password = derive(&req).unwrap();
        assert_eq!(*password, "XCQN!JT}sxJF-K?N");
    }

    #[test]
    fn test_regression_exclude_ambiguous() {
        let req = request("example.com", "Correct-Horse-1", 32, true, true, true);
        let password = derive(&req).unwrap();
        assert_eq!(*password, "#P5V:R8iDyWG<X}2nVV8Cc2)3;=dRg]J");
    }

    #[test]
    fn test_regression_letters_only() {
        let req = request("github.com", "hunter2", 20, false, false, false);
        let password = derive(&req).unwrap();
        assert_eq!(*password, "TkOdHuGfFuUjBAyPpVxX");
    }

    #[test]
    fn test_regression_letters_and_digits() {
        let req = request("news.ycombinator.com", "tr0ub4dor&3", 12, true, false, false);
        let password = derive(&req).unwrap();
        assert_eq!(*password, "jE57mmRqnluq");
    }

    #[test]
    fn test_regression_second_service() {
        let req = request("google.com", "Correct-Horse-1", 16, true, true, false);
        let password = derive(&req).unwrap();
        assert_eq!(*password, "u}EpeY/Sv%Cb&1fF");
    }
}
