use std::{fmt, str};

use fstr::FStr;

use crate::Error;

/// Represents a Universally Unique IDentifier.
///
/// The value is stored as a 16-byte big-endian array. The first eight bytes are referred to as
/// the high half and the last eight bytes as the low half.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Uuid([u8; 16]);

/// The variant field of a UUID, determining the layout of the remaining bits.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Variant {
    /// `0xxx`: reserved for NCS backward compatibility; also the Nil UUID.
    Var0,
    /// `10xx`: the RFC 4122 layout.
    Var10,
    /// `110x`: reserved for Microsoft backward compatibility.
    Var110,
    /// `111x`: reserved for future definition; also the Max UUID.
    VarReserved,
}

/// Radix-22 digits of the XML-safe form. The letters `I`, `O`, `Q`, and `X` are left out.
const XML_SAFE_DIGITS: &[u8; 22] = b"ABCDEFGHJKLMNPRSTUVWYZ";

/// Marks a negative half in the XML-safe form.
const XML_SAFE_SIGN: u8 = b'X';

impl Uuid {
    /// Nil UUID (00000000-0000-0000-0000-000000000000)
    pub const NIL: Self = Self([0x00; 16]);

    /// Max UUID (ffffffff-ffff-ffff-ffff-ffffffffffff)
    pub const MAX: Self = Self([0xff; 16]);

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Creates a UUID from a 16-byte big-endian array.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Creates a UUID from its high and low 64-bit halves.
    pub const fn from_u64_pair(high: u64, low: u64) -> Self {
        Self((((high as u128) << 64) | low as u128).to_be_bytes())
    }

    /// Returns the high and low 64-bit halves.
    pub const fn as_u64_pair(&self) -> (u64, u64) {
        let value = u128::from_be_bytes(self.0);
        ((value >> 64) as u64, value as u64)
    }

    /// Creates a UUID byte array from UUIDv7 field values.
    pub const fn from_fields_v7(unix_ts_ms: u64, rand_a: u16, rand_b: u64) -> Self {
        if unix_ts_ms >= 1 << 48 || rand_a >= 1 << 12 || rand_b >= 1 << 62 {
            panic!("invalid field value");
        }

        Self::from_u64_pair(
            (unix_ts_ms << 16) | 0x7000 | rand_a as u64,
            0x8000_0000_0000_0000 | rand_b,
        )
    }

    /// Creates a UUIDv1 from a 60-bit count of 100-nanosecond intervals since 1582-10-15, a
    /// 14-bit clock sequence, and a 48-bit node id.
    pub const fn from_fields_v1(ticks: u64, clock_seq: u16, node: u64) -> Self {
        if ticks >= 1 << 60 || clock_seq >= 1 << 14 || node >= 1 << 48 {
            panic!("invalid field value");
        }

        let time_low = ticks & 0xffff_ffff;
        let time_mid = (ticks >> 32) & 0xffff;
        let time_hi = (ticks >> 48) & 0x0fff;
        Self::from_u64_pair(
            (time_low << 32) | (time_mid << 16) | 0x1000 | time_hi,
            0x8000_0000_0000_0000 | ((clock_seq as u64) << 48) | node,
        )
    }

    /// Returns the timestamp ticks, clock sequence, and node id of a UUIDv1, or `None` if this
    /// is not a UUIDv1.
    pub const fn v1_fields(&self) -> Option<(u64, u16, u64)> {
        if !matches!(self.version(), Some(1)) {
            return None;
        }
        let (high, low) = self.as_u64_pair();
        let ticks = ((high & 0x0fff) << 48) | (((high >> 16) & 0xffff) << 32) | (high >> 32);
        Some((
            ticks,
            ((low >> 48) & 0x3fff) as u16,
            low & 0xffff_ffff_ffff,
        ))
    }

    /// Creates a non-standard "version 0" UUID by repacking two caller-supplied integers.
    ///
    /// Bits 0-11 of `most_significant` stay in place, bits 12-59 move up by four to make room for
    /// the zeroed version nibble, and bits 60-63 are discarded. `least_significant` forms the low
    /// half verbatim, so the variant field is whatever the caller supplied. The function is pure
    /// and [`sequence_fields()`](Self::sequence_fields) recovers its inputs (the high input
    /// modulo 2^60).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uniqid::Uuid;
    ///
    /// let x = Uuid::sequence(0x0123_4567_89ab_cdef, 42);
    /// assert_eq!(x.to_string(), "12345678-9abc-0def-0000-00000000002a");
    /// assert_eq!(x.sequence_fields(), (0x0123_4567_89ab_cdef, 42));
    /// ```
    pub const fn sequence(most_significant: u64, least_significant: u64) -> Self {
        let high = ((most_significant << 4) & !0xffff) | (most_significant & 0x0fff);
        Self::from_u64_pair(high, least_significant)
    }

    /// Returns the two integers packed by [`sequence()`](Self::sequence).
    pub const fn sequence_fields(&self) -> (u64, u64) {
        let (high, low) = self.as_u64_pair();
        (((high >> 4) & !0x0fff) | (high & 0x0fff), low)
    }

    /// Returns the variant field.
    pub const fn variant(&self) -> Variant {
        match self.0[8] >> 4 {
            0b0000..=0b0111 => Variant::Var0,
            0b1000..=0b1011 => Variant::Var10,
            0b1100..=0b1101 => Variant::Var110,
            _ => Variant::VarReserved,
        }
    }

    /// Returns the version field if the variant field is `10`, or `None` otherwise.
    pub const fn version(&self) -> Option<u8> {
        match self.variant() {
            Variant::Var10 => Some(self.0[6] >> 4),
            _ => None,
        }
    }

    /// Returns the 8-4-4-4-12 hexadecimal string representation stored in a stack-allocated
    /// string type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uniqid::Uuid;
    ///
    /// let x = "01809424-3e59-7c05-9219-566f82fff672".parse::<Uuid>()?;
    /// let y = x.encode();
    /// assert_eq!(y.as_str(), "01809424-3e59-7c05-9219-566f82fff672");
    /// assert_eq!(format!("{}", y), "01809424-3e59-7c05-9219-566f82fff672");
    /// # Ok::<(), uniqid::Error>(())
    /// ```
    pub fn encode(&self) -> FStr<36> {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";

        let mut buffer = [0u8; 36];
        let mut pos = 0;
        for (i, e) in self.0.iter().enumerate() {
            buffer[pos] = DIGITS[(e >> 4) as usize];
            buffer[pos + 1] = DIGITS[(e & 15) as usize];
            pos += 2;
            if i == 3 || i == 5 || i == 7 || i == 9 {
                buffer[pos] = b'-';
                pos += 1;
            }
        }
        debug_assert!(buffer.is_ascii());
        // SAFETY: the buffer is filled with ASCII hex digits and hyphens
        unsafe { FStr::from_inner_unchecked(buffer) }
    }

    /// Returns the XML-safe string representation.
    ///
    /// Each half is read as a signed 64-bit integer and written in radix 22 using the letters of
    /// an alphabet that avoids easily confused characters. A leading `X` marks a negative half and
    /// the two halves are joined by a hyphen. The result always starts with a letter, so it is
    /// usable as an XML name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uniqid::Uuid;
    ///
    /// assert_eq!(Uuid::NIL.encode_xml_safe(), "A-A");
    /// assert_eq!(Uuid::MAX.encode_xml_safe(), "XB-XB");
    /// assert_eq!(Uuid::parse_xml_safe("xb-xb"), Ok(Uuid::MAX));
    /// ```
    pub fn encode_xml_safe(&self) -> String {
        let (high, low) = self.as_u64_pair();
        let mut dst = String::with_capacity(34);
        push_xml_safe_half(&mut dst, high as i64);
        dst.push('-');
        push_xml_safe_half(&mut dst, low as i64);
        dst
    }

    /// Creates an object from the XML-safe string representation, ignoring letter case.
    pub fn parse_xml_safe(src: &str) -> Result<Self, Error> {
        let mut parts = src.split('-');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(high), Some(low), None) => Ok(Self::from_u64_pair(
                parse_xml_safe_half(high)? as u64,
                parse_xml_safe_half(low)? as u64,
            )),
            _ => Err(Error::invalid("XML-safe")),
        }
    }
}

fn push_xml_safe_half(dst: &mut String, value: i64) {
    let mut digits = [0u8; 16];
    let mut start = digits.len();
    let mut rest = value.unsigned_abs();
    loop {
        start -= 1;
        digits[start] = XML_SAFE_DIGITS[(rest % 22) as usize];
        rest /= 22;
        if rest == 0 {
            break;
        }
    }

    if value < 0 {
        dst.push(XML_SAFE_SIGN as char);
    }
    dst.extend(digits[start..].iter().map(|&c| c as char));
}

fn parse_xml_safe_half(src: &str) -> Result<i64, Error> {
    const ERR: Error = Error::invalid("XML-safe");
    let (negative, digits) = match src.as_bytes() {
        [sign, rest @ ..] if sign.eq_ignore_ascii_case(&XML_SAFE_SIGN) => (true, rest),
        all => (false, all),
    };
    if digits.is_empty() {
        return Err(ERR);
    }

    let mut magnitude = 0u64;
    for c in digits {
        let digit = XML_SAFE_DIGITS
            .iter()
            .position(|e| e.eq_ignore_ascii_case(c))
            .ok_or(ERR)?;
        magnitude = magnitude
            .checked_mul(22)
            .and_then(|m| m.checked_add(digit as u64))
            .ok_or(ERR)?;
    }

    match (negative, magnitude) {
        (true, m) if m <= 1 << 63 => Ok((m as i64).wrapping_neg()),
        (false, m) if m <= i64::MAX as u64 => Ok(m as i64),
        _ => Err(ERR),
    }
}

impl fmt::Display for Uuid {
    /// Returns the 8-4-4-4-12 canonical hexadecimal string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl str::FromStr for Uuid {
    type Err = Error;

    /// Creates an object from the 8-4-4-4-12 hexadecimal string representation.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        const ERR: Error = Error::invalid("UUID");
        let mut dst = [0u8; 16];
        let mut iter = src.chars();
        for (i, e) in dst.iter_mut().enumerate() {
            let hi = iter.next().ok_or(ERR)?.to_digit(16).ok_or(ERR)? as u8;
            let lo = iter.next().ok_or(ERR)?.to_digit(16).ok_or(ERR)? as u8;
            *e = (hi << 4) | lo;
            if (i == 3 || i == 5 || i == 7 || i == 9) && iter.next().ok_or(ERR)? != '-' {
                return Err(ERR);
            }
        }
        if iter.next().is_none() {
            Ok(Self(dst))
        } else {
            Err(ERR)
        }
    }
}

impl From<Uuid> for [u8; 16] {
    fn from(src: Uuid) -> Self {
        src.0
    }
}

impl From<[u8; 16]> for Uuid {
    fn from(src: [u8; 16]) -> Self {
        Self(src)
    }
}

impl AsRef<[u8]> for Uuid {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Uuid> for u128 {
    fn from(src: Uuid) -> Self {
        Self::from_be_bytes(src.0)
    }
}

impl From<u128> for Uuid {
    fn from(src: u128) -> Self {
        Self(src.to_be_bytes())
    }
}

impl From<Uuid> for String {
    fn from(src: Uuid) -> Self {
        src.to_string()
    }
}

impl TryFrom<String> for Uuid {
    type Error = Error;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        src.parse()
    }
}

#[cfg(feature = "uuid")]
#[cfg_attr(docsrs, doc(cfg(feature = "uuid")))]
mod uuid_support {
    use super::Uuid;

    impl From<Uuid> for uuid::Uuid {
        fn from(src: Uuid) -> Self {
            uuid::Uuid::from_bytes(src.0)
        }
    }

    impl From<uuid::Uuid> for Uuid {
        fn from(src: uuid::Uuid) -> Self {
            Self(src.into_bytes())
        }
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, Uuid};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for Uuid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(self.as_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Uuid {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = Uuid;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a UUID representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            value.parse::<Self::Value>().map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            <[u8; 16]>::try_from(value)
                .map(Self::Value::from)
                .map_err(de::Error::custom)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::Uuid;
        use serde_test::{assert_tokens, Configure, Token};

        /// Serializes and deserializes prepared cases correctly
        #[test]
        fn serializes_and_deserializes_prepared_cases_correctly() {
            let cases = [
                ("00000000-0000-0000-0000-000000000000", &[0u8; 16]),
                (
                    "0180ae59-078c-7b80-b113-2fe14a615fb3",
                    &[
                        1, 128, 174, 89, 7, 140, 123, 128, 177, 19, 47, 225, 74, 97, 95, 179,
                    ],
                ),
                (
                    "6ba7b810-9dad-11d1-80b4-00c04fd430c8",
                    &[
                        107, 167, 184, 16, 157, 173, 17, 209, 128, 180, 0, 192, 79, 212, 48, 200,
                    ],
                ),
            ];

            for (text, bytes) in cases {
                let e = text.parse::<Uuid>().unwrap();
                assert_tokens(&e.readable(), &[Token::String(text)]);
                assert_tokens(&e.compact(), &[Token::Bytes(bytes)]);
            }
        }
    }
}
