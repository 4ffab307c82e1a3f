//! Registry of well-known namespace identifiers used as salts of name-based UUIDs.
//!
//! The registry holds the four namespaces defined by RFC 4122 plus two library-private ones
//! derived by MD5-hashing fixed literals. It is built on first access and never changes.
//!
//! ```rust
//! use uniqid::{namespace, HashKind, Uuid};
//!
//! let ns = namespace::lookup("URL").unwrap();
//! assert_eq!(ns, namespace::NAMESPACE_URL);
//! let id = Uuid::from_name(&ns, b"https://example.com/", HashKind::Sha1);
//! assert_eq!(id.version(), Some(5));
//! assert_eq!(namespace::lookup("url"), None);
//! ```

use std::sync::OnceLock;

use crate::{HashKind, Uuid};

/// Namespace for fully-qualified domain names (6ba7b810-9dad-11d1-80b4-00c04fd430c8)
pub const NAMESPACE_DNS: Uuid = Uuid::from_u64_pair(0x6ba7_b810_9dad_11d1, 0x80b4_00c0_4fd4_30c8);

/// Namespace for URLs (6ba7b811-9dad-11d1-80b4-00c04fd430c8)
pub const NAMESPACE_URL: Uuid = Uuid::from_u64_pair(0x6ba7_b811_9dad_11d1, 0x80b4_00c0_4fd4_30c8);

/// Namespace for ISO object identifiers (6ba7b812-9dad-11d1-80b4-00c04fd430c8)
pub const NAMESPACE_OID: Uuid = Uuid::from_u64_pair(0x6ba7_b812_9dad_11d1, 0x80b4_00c0_4fd4_30c8);

/// Namespace for X.500 distinguished names (6ba7b814-9dad-11d1-80b4-00c04fd430c8)
pub const NAMESPACE_X500: Uuid = Uuid::from_u64_pair(0x6ba7_b814_9dad_11d1, 0x80b4_00c0_4fd4_30c8);

/// Library-private namespace, the MD5 name-based UUID of [`FOUNDATION_LITERAL`]
/// (38bd01e5-e83e-3871-a45c-68ea4ca0dae8)
pub const FOUNDATION: Uuid = Uuid::from_u64_pair(0x38bd_01e5_e83e_3871, 0xa45c_68ea_4ca0_dae8);

/// Library-private namespace for name hashing, the MD5 name-based UUID of [`NAME_HASH_LITERAL`]
/// (13820fcb-2ffa-3f4b-be14-3aa2e2ef2098)
pub const NAME_HASH: Uuid = Uuid::from_u64_pair(0x1382_0fcb_2ffa_3f4b, 0xbe14_3aa2_e2ef_2098);

/// Literal hashed into the [`FOUNDATION`] namespace.
pub const FOUNDATION_LITERAL: &str = "Foundation";

/// Literal hashed into the [`NAME_HASH`] namespace.
pub const NAME_HASH_LITERAL: &str = "Foundation.NameHash";

type Entries = [(&'static str, Uuid); 6];

fn registry() -> &'static Entries {
    static REGISTRY: OnceLock<Entries> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        [
            ("DNS", NAMESPACE_DNS),
            ("URL", NAMESPACE_URL),
            ("ISO_OID", NAMESPACE_OID),
            ("X500", NAMESPACE_X500),
            (
                "FOUNDATION",
                Uuid::from_hash(FOUNDATION_LITERAL.as_bytes(), HashKind::Md5),
            ),
            (
                "NAME_HASH",
                Uuid::from_hash(NAME_HASH_LITERAL.as_bytes(), HashKind::Md5),
            ),
        ]
    })
}

/// Returns the namespace registered under `name` (case-sensitive), or `None` if there is none.
pub fn lookup(name: &str) -> Option<Uuid> {
    registry()
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| *value)
}

/// Returns all registered namespaces in a fixed order.
pub fn entries() -> impl Iterator<Item = (&'static str, Uuid)> {
    registry().iter().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Holds the RFC 4122 namespaces
    #[test]
    fn holds_the_rfc_4122_namespaces() {
        let cases = [
            ("DNS", "6ba7b810-9dad-11d1-80b4-00c04fd430c8"),
            ("URL", "6ba7b811-9dad-11d1-80b4-00c04fd430c8"),
            ("ISO_OID", "6ba7b812-9dad-11d1-80b4-00c04fd430c8"),
            ("X500", "6ba7b814-9dad-11d1-80b4-00c04fd430c8"),
        ];

        for (name, text) in cases {
            let e = lookup(name).unwrap();
            assert_eq!(&e.to_string(), text);
            assert_eq!(e.version(), Some(1));
        }
    }

    /// Derives private namespaces from fixed literals
    #[test]
    fn derives_private_namespaces_from_fixed_literals() {
        assert_eq!(
            Uuid::from_hash(FOUNDATION_LITERAL.as_bytes(), HashKind::Md5),
            FOUNDATION
        );
        assert_eq!(
            Uuid::from_hash(NAME_HASH_LITERAL.as_bytes(), HashKind::Md5),
            NAME_HASH
        );
        assert_eq!(&FOUNDATION.to_string(), "38bd01e5-e83e-3871-a45c-68ea4ca0dae8");
        assert_eq!(&NAME_HASH.to_string(), "13820fcb-2ffa-3f4b-be14-3aa2e2ef2098");
        assert_eq!(lookup("FOUNDATION"), Some(FOUNDATION));
        assert_eq!(lookup("NAME_HASH"), Some(NAME_HASH));
    }

    /// Returns none for unknown names
    #[test]
    fn returns_none_for_unknown_names() {
        for e in ["", "dns", "OID", "X.500", "FOUNDATION "] {
            assert_eq!(lookup(e), None);
        }
    }

    /// Lists unique entries
    #[test]
    fn lists_unique_entries() {
        let all: Vec<_> = entries().collect();
        assert_eq!(all.len(), 6);
        let values: std::collections::HashSet<_> = all.iter().map(|(_, e)| *e).collect();
        assert_eq!(values.len(), 6);
    }
}
