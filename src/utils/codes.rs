//! Short id and authorization code generation.
//!
//! Short ids go into share URLs, so the alphabet drops the ambiguous
//! characters (0/O, 1/l/I). Authorization codes carry a distinguishable
//! prefix per capability and are independently random; none is derivable
//! from another. Collisions are not pre-checked anywhere - the store's
//! primary key constraint is the source of truth.

use std::iter;

/// 不含易混淆字符（0/O、1/l/I）
const SHORT_ID_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz23456789";

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub const OWNER_CODE_PREFIX: &str = "OWN-";
pub const EDIT_CODE_PREFIX: &str = "EDIT-";
pub const DELETE_CODE_PREFIX: &str = "DEL-";

pub const OWNER_CODE_SUFFIX_LEN: usize = 9;
pub const EDIT_CODE_SUFFIX_LEN: usize = 6;
pub const DELETE_CODE_SUFFIX_LEN: usize = 6;

pub fn generate_short_id(length: usize) -> String {
    iter::repeat_with(|| SHORT_ID_ALPHABET[rand::random_range(0..SHORT_ID_ALPHABET.len())] as char)
        .take(length)
        .collect()
}

fn random_code_suffix(length: usize) -> String {
    iter::repeat_with(|| CODE_ALPHABET[rand::random_range(0..CODE_ALPHABET.len())] as char)
        .take(length)
        .collect()
}

/// The three authorization secrets issued once at snippet creation.
#[derive(Debug, Clone)]
pub struct AuthCodes {
    pub owner: String,
    pub edit: String,
    pub delete: String,
}

impl AuthCodes {
    pub fn generate() -> Self {
        Self {
            owner: format!("{}{}", OWNER_CODE_PREFIX, random_code_suffix(OWNER_CODE_SUFFIX_LEN)),
            edit: format!("{}{}", EDIT_CODE_PREFIX, random_code_suffix(EDIT_CODE_SUFFIX_LEN)),
            delete: format!(
                "{}{}",
                DELETE_CODE_PREFIX,
                random_code_suffix(DELETE_CODE_SUFFIX_LEN)
            ),
        }
    }
}

fn has_code_shape(candidate: &str, prefix: &str, suffix_len: usize) -> bool {
    match candidate.strip_prefix(prefix) {
        Some(suffix) => {
            suffix.len() == suffix_len
                && suffix.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        }
        None => false,
    }
}

/// Cheap format check, applied before any store lookup.
pub fn is_valid_owner_code(candidate: &str) -> bool {
    has_code_shape(candidate, OWNER_CODE_PREFIX, OWNER_CODE_SUFFIX_LEN)
}

pub fn is_valid_edit_code(candidate: &str) -> bool {
    has_code_shape(candidate, EDIT_CODE_PREFIX, EDIT_CODE_SUFFIX_LEN)
}

pub fn is_valid_delete_code(candidate: &str) -> bool {
    has_code_shape(candidate, DELETE_CODE_PREFIX, DELETE_CODE_SUFFIX_LEN)
}

pub fn is_valid_short_id(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate.len() <= 64
        && candidate.bytes().all(|b| SHORT_ID_ALPHABET.contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id_length_and_alphabet() {
        let id = generate_short_id(8);
        assert_eq!(id.len(), 8);
        assert!(is_valid_short_id(&id));
        assert!(!id.contains('0'));
        assert!(!id.contains('O'));
        assert!(!id.contains('l'));
    }

    #[test]
    fn test_auth_code_formats() {
        let codes = AuthCodes::generate();
        assert!(is_valid_owner_code(&codes.owner));
        assert!(is_valid_edit_code(&codes.edit));
        assert!(is_valid_delete_code(&codes.delete));

        assert_eq!(codes.owner.len(), OWNER_CODE_PREFIX.len() + 9);
        assert_eq!(codes.edit.len(), EDIT_CODE_PREFIX.len() + 6);
        assert_eq!(codes.delete.len(), DELETE_CODE_PREFIX.len() + 6);
    }

    #[test]
    fn test_codes_are_independent() {
        let codes = AuthCodes::generate();
        assert_ne!(codes.owner, codes.edit);
        assert!(!codes.edit.contains(&codes.owner[4..]));
    }

    #[test]
    fn test_malformed_codes_rejected() {
        assert!(!is_valid_owner_code("OWN-abc123def")); // lowercase
        assert!(!is_valid_owner_code("OWN-ABC12")); // too short
        assert!(!is_valid_owner_code("EDIT-ABC123")); // wrong prefix
        assert!(!is_valid_owner_code(""));
        assert!(!is_valid_edit_code("EDIT-ABC1234")); // too long
        assert!(!is_valid_delete_code("DEL-AB 123")); // space
    }

    #[test]
    fn test_short_id_validation() {
        assert!(!is_valid_short_id(""));
        assert!(!is_valid_short_id("has/slash"));
        assert!(!is_valid_short_id("O0l1"));
        assert!(is_valid_short_id("abcDEF23"));
    }
}
