// Rust Penumbra Address Library
// Written by
//   The rust-penumbra-address developers
//
// To the extent possible under law, the author(s) have dedicated all
// copyright and related and neighboring rights to this software to
// the public domain worldwide. This software is distributed without
// any warranty.
//
// You should have received a copy of the CC0 Public Domain Dedication
// along with this software.
// If not, see <http://creativecommons.org/publicdomain/zero/1.0/>.
//

//! # Addresses
//!

use std::error;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use crate::serde;

use crate::bech32m::{self, DecodeError, Variant};

/// The human-readable prefix of every Penumbra address.
pub const PENUMBRA_HRP: &str = "penumbra";

/// Address error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddressError {
    /// Bech32m decoding error.
    Bech32m(DecodeError),
    /// The human-readable prefix is not "penumbra".
    UnknownHrp(String),
    /// The string is checksummed with the predecessor constant rather than
    /// the m-variant.
    InvalidVariant,
    /// The address carries no payload bytes.
    Empty,
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            AddressError::Bech32m(ref e) => write!(f, "bech32m error: {}", e),
            AddressError::UnknownHrp(ref hrp) => {
                write!(f, "unknown address prefix: {}", hrp)
            }
            AddressError::InvalidVariant => {
                write!(f, "address must use the bech32m checksum, not bech32")
            }
            AddressError::Empty => write!(f, "address payload is empty"),
        }
    }
}

impl error::Error for AddressError {
    fn cause(&self) -> Option<&dyn error::Error> {
        match *self {
            AddressError::Bech32m(ref e) => Some(e),
            _ => None,
        }
    }
}

#[doc(hidden)]
impl From<DecodeError> for AddressError {
    fn from(e: DecodeError) -> AddressError {
        AddressError::Bech32m(e)
    }
}

/// A Penumbra address: the raw payload bytes handed back by a wallet
/// device, carried in their checksummed text form.
///
/// The payload is treated as opaque; its internal structure (diversifier,
/// transmission key and so on) is the wallet's concern, not the codec's.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address {
    payload: Vec<u8>,
}

impl Address {
    /// Wraps raw payload bytes as an address.
    pub fn from_bytes(payload: Vec<u8>) -> Result<Address, AddressError> {
        if payload.is_empty() {
            return Err(AddressError::Empty);
        }
        Ok(Address { payload })
    }

    /// The raw payload bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.payload
    }
}

impl fmt::Display for Address {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let data = bech32m::to_words(&self.payload);
        bech32m::encode_to_fmt(fmt, PENUMBRA_HRP, &data, Variant::Bech32m)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, fmt)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Address, AddressError> {
        let (hrp, payload, variant) = bech32m::decode(s)?;
        if !hrp.eq_ignore_ascii_case(PENUMBRA_HRP) {
            return Err(AddressError::UnknownHrp(hrp.to_owned()));
        }
        if variant != Variant::Bech32m {
            return Err(AddressError::InvalidVariant);
        }
        Address::from_bytes(payload)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Address {
    #[inline]
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use std::fmt::Formatter;

        struct Visitor;
        impl<'de> serde::de::Visitor<'de> for Visitor {
            type Value = Address;

            fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
                formatter.write_str("a Penumbra address")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Address::from_str(v).map_err(E::custom)
            }

            fn visit_borrowed_str<E>(self, v: &'de str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                self.visit_str(v)
            }

            fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                self.visit_str(&v)
            }
        }

        deserializer.deserialize_str(Visitor)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bech32m::encode;
    #[cfg(feature = "serde")]
    use serde_json;

    fn roundtrips(addr: &Address) {
        assert_eq!(
            Address::from_str(&addr.to_string()).ok().as_ref(),
            Some(addr),
            "string round-trip failed for {}",
            addr,
        );
        #[cfg(feature = "serde")]
        assert_eq!(
            serde_json::from_value::<Address>(serde_json::to_value(addr).unwrap())
                .ok()
                .as_ref(),
            Some(addr)
        );
    }

    #[test]
    fn exhaustive() {
        let vectors = [
            // A device hands back an 80-byte payload in practice.
            /* #00 */ Address::from_bytes(vec![0x5a; 80]).unwrap(),
            /* #01 */ Address::from_bytes((0u8..80).collect()).unwrap(),
            /* #02 */ Address::from_bytes(vec![0x00; 32]).unwrap(),
            /* #03 */ Address::from_bytes(vec![0xff]).unwrap(),
        ];
        for addr in &vectors {
            roundtrips(addr);
        }
    }

    #[test]
    fn display_uses_penumbra_hrp() {
        let addr = Address::from_bytes(vec![1, 2, 3]).unwrap();
        let s = addr.to_string();
        assert!(s.starts_with("penumbra1"));
        let (hrp, bytes, variant) = bech32m::decode(&s).unwrap();
        assert_eq!(hrp, PENUMBRA_HRP);
        assert_eq!(bytes, [1, 2, 3]);
        assert_eq!(variant, Variant::Bech32m);
    }

    #[test]
    fn rejects_foreign_hrp() {
        let s = encode("lq", &[1, 2, 3], Variant::Bech32m).unwrap();
        assert_eq!(
            Address::from_str(&s),
            Err(AddressError::UnknownHrp("lq".to_owned()))
        );
    }

    #[test]
    fn rejects_legacy_variant() {
        let s = encode(PENUMBRA_HRP, &[1, 2, 3], Variant::Bech32).unwrap();
        assert_eq!(Address::from_str(&s), Err(AddressError::InvalidVariant));
    }

    #[test]
    fn rejects_empty_payload() {
        assert_eq!(Address::from_bytes(vec![]), Err(AddressError::Empty));
        let s = encode(PENUMBRA_HRP, &[], Variant::Bech32m).unwrap();
        assert_eq!(Address::from_str(&s), Err(AddressError::Empty));
    }

    #[test]
    fn mistranscription_is_a_decode_error() {
        let addr = Address::from_bytes(vec![9; 16]).unwrap();
        let mut chars: Vec<char> = addr.to_string().chars().collect();
        // Mistype the final checksum character.
        let last = *chars.last().unwrap();
        *chars.last_mut().unwrap() = if last == 'q' { 'p' } else { 'q' };
        let s: String = chars.into_iter().collect();
        match Address::from_str(&s) {
            Err(AddressError::Bech32m(DecodeError::InvalidChecksum)) => {}
            other => panic!("expected checksum mismatch, got {:?}", other),
        }
    }

    #[test]
    fn accepts_uppercase() {
        let addr = Address::from_bytes(vec![4; 8]).unwrap();
        let upper = addr.to_string().to_ascii_uppercase();
        assert_eq!(Address::from_str(&upper).unwrap(), addr);
    }
}
