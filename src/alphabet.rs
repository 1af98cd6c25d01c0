const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";
const AMBIGUOUS: &[u8] = b"l1I0O";

/// Builds the ordered character pool for one derivation.
///
/// Letters are always included, so the pool is never empty. Order matters:
/// the generator indexes into the pool by byte value, so reordering the pool
/// would change every derived password.
pub fn build(use_digits: bool, use_symbols: bool, exclude_ambiguous: bool) -> Vec<u8> {
    let mut chars = Vec::with_capacity(LETTERS.len() + DIGITS.len() + SYMBOLS.len());
    chars.extend_from_slice(LETTERS);

    if use_digits {
        chars.extend_from_slice(DIGITS);
    }

    if use_symbols {
        chars.extend_from_slice(SYMBOLS);
    }

    if exclude_ambiguous {
        chars.retain(|c| !AMBIGUOUS.contains(c));
    }

    chars
}
