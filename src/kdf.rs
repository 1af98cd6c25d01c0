use pbkdf2::pbkdf2_hmac;
use sha2::Sha384;
use zeroize::Zeroizing;

pub const ITERATIONS: u32 = 150_000;
pub const OUTPUT_LEN: usize = 512;

const SALT_FRAGMENT_CHARS: usize = 8;

/// Builds the per-service salt: the raw bytes of the service identifier
/// followed by the first 8 characters of the master secret, lower-cased.
///
/// The salt deliberately mixes in a fragment of the secret so that distinct
/// master secrets perturb the salt as well as the KDF password input. This
/// is unusual for a salt, but it is the fixed derivation contract: changing
/// it would change every password ever derived.
pub fn build_salt(service_identifier: &str, master_secret: &str) -> Zeroizing<Vec<u8>> {
    let fragment: Zeroizing<String> = Zeroizing::new(
        master_secret
            .chars()
            .take(SALT_FRAGMENT_CHARS)
            .flat_map(char::to_lowercase)
            .collect(),
    );

    let mut salt = Zeroizing::new(Vec::with_capacity(
        service_identifier.len() + fragment.len(),
    ));
    salt.extend_from_slice(service_identifier.as_bytes());
    salt.extend_from_slice(fragment.as_bytes());
    salt
}

/// Stretches the master secret into 512 bytes of key material with
/// PBKDF2-HMAC-SHA384 at a fixed iteration count.
pub fn derive_key_material(master_secret: &str, salt: &[u8]) -> Zeroizing<[u8; OUTPUT_LEN]> {
    let mut output = Zeroizing::new([0u8; OUTPUT_LEN]);
    pbkdf2_hmac::<Sha384>(master_secret.as_bytes(), salt, ITERATIONS, &mut output[..]);
    output
}
