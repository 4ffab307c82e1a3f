//! Name-based UUIDs (versions 3 and 5).

use md5::{Digest, Md5};
use sha1::Sha1;

use crate::{Error, Uuid};

/// Hash function of a name-based UUID.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum HashKind {
    /// MD5, producing UUIDv3.
    Md5,
    /// SHA-1 truncated to 128 bits, producing UUIDv5.
    Sha1,
}

impl HashKind {
    /// Returns the UUID version number produced by this hash kind.
    pub const fn version(self) -> u8 {
        match self {
            Self::Md5 => 3,
            Self::Sha1 => 5,
        }
    }

    /// Returns the hash kind producing the UUID version number `version`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedHashKind`] unless `version` is 3 or 5.
    pub const fn from_version(version: u8) -> Result<Self, Error> {
        match version {
            3 => Ok(Self::Md5),
            5 => Ok(Self::Sha1),
            other => Err(Error::UnsupportedHashKind(other)),
        }
    }

    fn digest(self, parts: &[&[u8]]) -> [u8; 16] {
        let mut dst = [0u8; 16];
        match self {
            Self::Md5 => {
                let hasher = parts.iter().fold(Md5::new(), |h, e| h.chain_update(e));
                dst.copy_from_slice(&hasher.finalize());
            }
            Self::Sha1 => {
                let hasher = parts.iter().fold(Sha1::new(), |h, e| h.chain_update(e));
                dst.copy_from_slice(&hasher.finalize()[..16]);
            }
        }
        dst
    }
}

impl TryFrom<u8> for HashKind {
    type Error = Error;

    fn try_from(src: u8) -> Result<Self, Self::Error> {
        Self::from_version(src)
    }
}

impl Uuid {
    /// Creates a name-based UUID by hashing `bytes` as they are.
    ///
    /// The first 16 bytes of the digest are used, with the version and variant fields overwritten.
    /// Callers conventionally prepend a namespace identifier to the name; see
    /// [`from_name()`](Self::from_name).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uniqid::{HashKind, Uuid};
    ///
    /// let x = Uuid::from_hash(b"hello", HashKind::Sha1);
    /// assert_eq!(x.to_string(), "aaf4c61d-dcc5-58a2-9abe-de0f3b482cd9");
    /// assert_eq!(x, Uuid::from_hash(b"hello", HashKind::Sha1));
    /// ```
    pub fn from_hash(bytes: &[u8], kind: HashKind) -> Self {
        Self::from_digest(kind.digest(&[bytes]), kind)
    }

    /// Creates a name-based UUID from a namespace identifier and a name, as specified by RFC 4122.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uniqid::{namespace, HashKind, Uuid};
    ///
    /// let x = Uuid::from_name(&namespace::NAMESPACE_DNS, b"python.org", HashKind::Md5);
    /// assert_eq!(x.to_string(), "6fa459ea-ee8a-3ca4-894e-db77e160355e");
    /// ```
    pub fn from_name(namespace: &Uuid, name: &[u8], kind: HashKind) -> Self {
        Self::from_digest(kind.digest(&[namespace.as_bytes(), name]), kind)
    }

    const fn from_digest(mut bytes: [u8; 16], kind: HashKind) -> Self {
        bytes[6] = (kind.version() << 4) | (bytes[6] & 0x0f);
        bytes[8] = 0x80 | (bytes[8] & 0x3f);
        Self::from_bytes(bytes)
    }
}
