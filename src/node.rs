//! Node identity: the 48-bit value identifying the generating host in time-based identifiers.
//!
//! The process-wide node id is resolved once, on first use, from the first usable hardware
//! network address, falling back to random bits when no address is available or when
//! [`Config::pseudo_node`] is set. Either way the multicast bit is set so that the value never
//! claims to be a globally administered IEEE 802 address.

use std::{fmt, str, sync::OnceLock};

use fstr::FStr;
use rand::{rngs::OsRng, RngCore};

use crate::{Config, Error};

/// A 48-bit node id.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct NodeId(u64);

impl NodeId {
    /// The multicast bit of the first address octet; set on every resolved node id.
    pub const MULTICAST_BIT: u64 = 1 << 40;

    const MASK: u64 = (1 << 48) - 1;

    /// Creates a node id from the lower 48 bits of `value`.
    pub const fn new(value: u64) -> Self {
        Self(value & Self::MASK)
    }

    /// Creates a node id from a six-byte hardware address.
    pub const fn from_bytes(bytes: [u8; 6]) -> Self {
        let mut value = 0u64;
        let mut i = 0;
        while i < 6 {
            value = (value << 8) | bytes[i] as u64;
            i += 1;
        }
        Self(value)
    }

    /// Returns the node id as an integer.
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Returns the node id as a six-byte big-endian array.
    pub const fn to_bytes(&self) -> [u8; 6] {
        let b = self.0.to_be_bytes();
        [b[2], b[3], b[4], b[5], b[6], b[7]]
    }

    /// Returns `true` if the multicast bit is set.
    pub const fn is_multicast(&self) -> bool {
        self.0 & Self::MULTICAST_BIT != 0
    }

    const fn with_multicast_bit(self) -> Self {
        Self(self.0 | Self::MULTICAST_BIT)
    }

    /// Returns the MAC address form: six hyphen-separated upper-case hex byte pairs.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uniqid::NodeId;
    ///
    /// let node = "01-23-45-67-89-AB".parse::<NodeId>()?;
    /// assert_eq!(node.as_u64(), 0x0123_4567_89ab);
    /// assert_eq!(node.to_mac().as_str(), "01-23-45-67-89-AB");
    /// # Ok::<(), uniqid::Error>(())
    /// ```
    pub fn to_mac(&self) -> FStr<17> {
        const DIGITS: &[u8; 16] = b"0123456789ABCDEF";

        let mut buffer = [b'-'; 17];
        for (i, e) in self.to_bytes().iter().enumerate() {
            buffer[i * 3] = DIGITS[(e >> 4) as usize];
            buffer[i * 3 + 1] = DIGITS[(e & 15) as usize];
        }
        debug_assert!(buffer.is_ascii());
        // SAFETY: the buffer is filled with ASCII hex digits and hyphens
        unsafe { FStr::from_inner_unchecked(buffer) }
    }
}

impl fmt::Display for NodeId {
    /// Returns the MAC address form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_mac())
    }
}

impl str::FromStr for NodeId {
    type Err = Error;

    /// Creates an object from the MAC address form, ignoring letter case. Exactly six byte pairs
    /// are accepted.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        const ERR: Error = Error::invalid("MAC address");
        let mut bytes = [0u8; 6];
        let mut parts = src.split('-');
        for e in bytes.iter_mut() {
            let part = parts.next().ok_or(ERR)?;
            if part.len() != 2 || !part.bytes().all(|c| c.is_ascii_hexdigit()) {
                return Err(ERR);
            }
            *e = u8::from_str_radix(part, 16).map_err(|_| ERR)?;
        }
        if parts.next().is_none() {
            Ok(Self::from_bytes(bytes))
        } else {
            Err(ERR)
        }
    }
}

impl From<NodeId> for u64 {
    fn from(src: NodeId) -> Self {
        src.0
    }
}

/// Resolves node ids according to a [`Config`].
///
/// Each call to [`resolve()`](Self::resolve) queries the hardware again; use [`node_id()`] for the
/// cached process-wide value.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct NodeResolver {
    config: Config,
}

impl NodeResolver {
    /// Creates a resolver.
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Returns a node id derived from a hardware address, or random bits if none is usable or
    /// the configuration requests pseudo-random ids.
    pub fn resolve(&self) -> NodeId {
        if !self.config.pseudo_node {
            if let Some(node) = hardware_node_id() {
                tracing::debug!(node = %node, "resolved node id from hardware address");
                return node;
            }
        }

        let node = pseudo_node_id();
        tracing::debug!(
            node = %node,
            forced = self.config.pseudo_node,
            "resolved pseudo-random node id"
        );
        node
    }
}

/// Returns the process-wide node id, resolving it on first call.
///
/// Resolution runs exactly once even when the first calls race; the configuration is read from
/// the environment at that moment (see [`Config::from_env`]).
pub fn node_id() -> NodeId {
    static NODE: OnceLock<NodeId> = OnceLock::new();
    *NODE.get_or_init(|| NodeResolver::new(Config::from_env()).resolve())
}

/// Returns a fresh pseudo-random node id. Never cached.
pub fn pseudo_node_id() -> NodeId {
    NodeId::new(OsRng.next_u64()).with_multicast_bit()
}

/// Returns the process-wide random node id used for anonymized time-based identifiers, creating
/// it on first call.
pub fn dummy_node_id() -> NodeId {
    static DUMMY: OnceLock<NodeId> = OnceLock::new();
    *DUMMY.get_or_init(pseudo_node_id)
}

#[cfg(feature = "hardware_node")]
fn hardware_node_id() -> Option<NodeId> {
    match mac_address::MacAddressIterator::new() {
        Ok(addresses) => select_hardware_address(addresses.map(|e| e.bytes()))
            .map(|e| NodeId::from_bytes(e).with_multicast_bit()),
        Err(err) => {
            tracing::debug!(error = %err, "could not enumerate network adapters");
            None
        }
    }
}

#[cfg(not(feature = "hardware_node"))]
fn hardware_node_id() -> Option<NodeId> {
    None
}

/// Picks the first non-empty address, skipping locally administered (typically virtual) ones
/// while a universally administered one remains. Loopback adapters report an all-zero address.
#[cfg_attr(not(feature = "hardware_node"), allow(dead_code))]
fn select_hardware_address(addresses: impl IntoIterator<Item = [u8; 6]>) -> Option<[u8; 6]> {
    let mut fallback = None;
    for e in addresses {
        if e == [0; 6] {
            continue;
        }
        if e[0] & 0x02 == 0 {
            return Some(e);
        }
        fallback.get_or_insert(e);
    }
    fallback
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::NodeId;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for NodeId {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.to_mac())
            } else {
                serializer.serialize_u64(self.0)
            }
        }
    }

    impl<'de> Deserialize<'de> for NodeId {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                let text = String::deserialize(deserializer)?;
                text.parse().map_err(de::Error::custom)
            } else {
                let value = u64::deserialize(deserializer)?;
                if value >> 48 == 0 {
                    Ok(Self(value))
                } else {
                    Err(de::Error::custom("node id exceeds 48 bits"))
                }
            }
        }
    }
}
