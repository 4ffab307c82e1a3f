//! Unique identifier generation: RFC 4122 UUIDs (versions 1, 3, 4, 5, and 7) and compact 64-bit
//! time-ordered identifiers
//!
//! ```rust
//! use uniqid::{uuid1, uuid4, uuid7};
//!
//! let uuid = uuid7();
//! println!("{}", uuid); // e.g. "01809424-3e59-7c05-9219-566f82fff672"
//! println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
//!
//! println!("{}", uuid4()); // e.g. "2ca4b2ce-6c13-40d4-bccf-37d222820f6f"
//! println!("{}", uuid1()); // e.g. "c232ab00-9414-11ec-b3c8-9f6bdeced846"
//! ```
//!
//! # Field and bit layout
//!
//! UUIDv7 values produced by [`uuid7()`] have the following bit layout:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                          unix_ts_ms                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |          unix_ts_ms           |  ver  |        counter        |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |var|                          rand                             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                             rand                              |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - The 48-bit `unix_ts_ms` field is dedicated to the Unix timestamp in milliseconds.
//! - The 4-bit `ver` field is set at `0111`.
//! - The 12-bit `counter` field is incremented for every identifier the process generates. When
//!   it wraps around to zero, the generator sleeps for about a millisecond so that the timestamp
//!   moves on before any counter value repeats.
//! - The 2-bit `var` field is set at `10`.
//! - The remaining 62 `rand` bits are filled with a cryptographically strong random number.
//!
//! UUIDv1 values produced by [`uuid1()`] carry a 60-bit count of 100-nanosecond intervals since
//! 1582-10-15, a 14-bit [`ClockSequence`] shared by the whole process, and a 48-bit [`NodeId`]
//! taken from a network adapter or, failing that, chosen at random with the multicast bit set.
//!
//! # Other features
//!
//! Name-based UUIDs hash a namespace and a name with MD5 (version 3) or SHA-1 (version 5):
//!
//! ```rust
//! use uniqid::{namespace, HashKind, Uuid};
//!
//! let uuid = Uuid::from_name(&namespace::NAMESPACE_DNS, b"python.org", HashKind::Sha1);
//! assert_eq!(&uuid.to_string(), "886313e1-3b8a-5372-9b90-0c9aee199e5d");
//! ```
//!
//! Every UUID has an XML-safe text form that starts with a letter and contains no characters
//! outside of `[A-Z-]`:
//!
//! ```rust
//! use uniqid::Uuid;
//!
//! let uuid = uniqid::uuid4();
//! let text = uuid.encode_xml_safe();
//! assert_eq!(Uuid::parse_xml_safe(&text)?, uuid);
//! # Ok::<(), uniqid::Error>(())
//! ```
//!
//! [`compact_id()`] issues 64-bit identifiers for a node id in `[0, 1024)`; see [`compact`] for
//! the layout and text form.
//!
//! # Crate features
//!
//! Default features:
//!
//! - `hardware_node` enables reading network adapter addresses as UUIDv1 node ids.
//!
//! Optional features:
//!
//! - `serde` enables the serialization and deserialization of [`Uuid`], [`NodeId`], and
//!   [`CompactId`].
//! - `uuid` enables the conversion between [`Uuid`] and the [uuid](https://crates.io/crates/uuid)
//!   crate's type.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
pub use error::Error;

mod id;
pub use id::{Uuid, Variant};

pub mod clock;

mod config;
pub use config::{Config, PSEUDO_NODE_ENV};

pub mod node;
#[doc(inline)]
pub use node::{dummy_node_id, node_id, pseudo_node_id, NodeId, NodeResolver};

mod clock_seq;
pub use clock_seq::ClockSequence;

mod hash;
pub use hash::HashKind;

pub mod namespace;

pub mod rng;

mod generator;
pub use generator::V7Generator;

mod global_gen;
pub use global_gen::{uuid1, uuid1_anonymous, uuid1_with_node, uuid4, uuid7};

pub mod compact;
#[doc(inline)]
pub use compact::{compact_id, CompactGenerator, CompactId};
