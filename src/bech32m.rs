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

//! # Bech32m
//!
//! Checksummed base32 encoding of binary payloads under a human-readable
//! prefix, using the BIP-350 constants. The checksum is a BCH-style code
//! over GF(32) that detects transcription errors in hand-copied strings;
//! a mismatch is an expected decode outcome, not an internal failure.
//!

use std::error;
use std::fmt;

use crate::bits;

/// Human-readable part and data part separator.
pub const SEP: char = '1';

/// Length of the checksum appended to the data part, in words.
const CHECKSUM_LENGTH: usize = 6;

/// Maximum length of the human-readable part, in bytes.
const MAX_HRP_LENGTH: usize = 83;

/// Encoding character set. Maps data value -> char.
const CHARSET: [char; 32] = [
    'q', 'p', 'z', 'r', 'y', '9', 'x', '8', 'g', 'f', '2', 't', 'v', 'd', 'w', '0', 's', '3', 'j',
    'n', '5', '4', 'k', 'h', 'c', 'e', '6', 'm', 'u', 'a', '7', 'l',
];

// Reverse character set. Maps ASCII byte -> CHARSET index on [0,31]
const CHARSET_REV: [i8; 128] = [
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    15, -1, 10, 17, 21, 20, 26, 30, 7, 5, -1, -1, -1, -1, -1, -1, -1, 29, -1, 24, 13, 25, 9, 8, 23,
    -1, 18, 22, 31, 27, 19, -1, 1, 0, 3, 16, 11, 28, 12, 14, 6, 4, 2, -1, -1, -1, -1, -1, -1, 29,
    -1, 24, 13, 25, 9, 8, 23, -1, 18, 22, 31, 27, 19, -1, 1, 0, 3, 16, 11, 28, 12, 14, 6, 4, 2, -1,
    -1, -1, -1, -1,
];

/// Generator coefficients
const GEN: [u32; 5] = [
    0x3b6a_57b2,
    0x2650_8e6d,
    0x1ea1_19fa,
    0x3d42_33dd,
    0x2a14_62b3,
];

/// Integer in the range `0..32`, the native symbol unit of the encoding.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct u5(u8);

impl u5 {
    /// Convert a `u8` to a `u5` if the value is in range.
    pub fn try_from_u8(value: u8) -> Result<u5, DecodeError> {
        if value > 31 {
            Err(DecodeError::InvalidData(value))
        } else {
            Ok(u5(value))
        }
    }

    /// Returns a copy of the underlying `u8` value.
    pub fn to_u8(self) -> u8 {
        self.0
    }
}

impl AsRef<u8> for u5 {
    fn as_ref(&self) -> &u8 {
        &self.0
    }
}

/// The checksum flavor of the encoding.
///
/// Penumbra addresses always use [`Variant::Bech32m`]; the predecessor
/// constant is kept so a decoded string can be told apart from a legacy
/// encoding instead of being reported as a transcription error.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Variant {
    /// The original scheme, with checksum constant 1.
    Bech32,
    /// The m-variant of BIP-350, with checksum constant 0x2bc830a3.
    Bech32m,
}

impl Variant {
    fn constant(self) -> u32 {
        match self {
            Variant::Bech32 => 1,
            Variant::Bech32m => 0x2bc8_30a3,
        }
    }
}

/// Encoding error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EncodeError {
    /// The human-readable part is empty.
    EmptyHrp,
    /// The human-readable part contains a character outside the printable
    /// US-ASCII range.
    InvalidHrpChar(char),
    /// The human-readable part is longer than 83 characters.
    HrpTooLong(usize),
    /// The payload could not be regrouped into 5-bit words.
    Bits(bits::Error),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            EncodeError::EmptyHrp => write!(f, "human-readable part is empty"),
            EncodeError::InvalidHrpChar(ref c) => {
                write!(f, "invalid character in human-readable part: {:?}", c)
            }
            EncodeError::HrpTooLong(ref len) => {
                write!(f, "human-readable part too long: {} characters", len)
            }
            EncodeError::Bits(ref e) => write!(f, "payload regrouping failed: {}", e),
        }
    }
}

impl error::Error for EncodeError {
    fn cause(&self) -> Option<&dyn error::Error> {
        match *self {
            EncodeError::Bits(ref e) => Some(e),
            _ => None,
        }
    }
}

#[doc(hidden)]
impl From<bits::Error> for EncodeError {
    fn from(e: bits::Error) -> EncodeError {
        EncodeError::Bits(e)
    }
}

/// Decoding error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// The separator character `1` does not appear in the string.
    MissingSeparator,
    /// The data part is shorter than the 6-character checksum.
    TooShort(usize),
    /// The human-readable part is empty.
    EmptyHrp,
    /// The human-readable part contains a character outside the printable
    /// US-ASCII range.
    InvalidHrpChar(char),
    /// The human-readable part is longer than 83 characters.
    HrpTooLong(usize),
    /// A data character is not part of the character set.
    InvalidChar(char),
    /// The string mixes upper and lower case.
    MixedCase,
    /// The checksum does not match the data.
    InvalidChecksum,
    /// A word value does not fit in 5 bits.
    InvalidData(u8),
    /// The data part does not regroup into whole bytes.
    Padding(bits::Error),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            DecodeError::MissingSeparator => write!(f, "missing separator {:?}", SEP),
            DecodeError::TooShort(ref len) => {
                write!(f, "data part too short: {} characters", len)
            }
            DecodeError::EmptyHrp => write!(f, "human-readable part is empty"),
            DecodeError::InvalidHrpChar(ref c) => {
                write!(f, "invalid character in human-readable part: {:?}", c)
            }
            DecodeError::HrpTooLong(ref len) => {
                write!(f, "human-readable part too long: {} characters", len)
            }
            DecodeError::InvalidChar(ref c) => write!(f, "invalid character: {:?}", c),
            DecodeError::MixedCase => write!(f, "mixed-case string"),
            DecodeError::InvalidChecksum => write!(f, "checksum mismatch"),
            DecodeError::InvalidData(ref v) => write!(f, "word value out of range: {}", v),
            DecodeError::Padding(ref e) => write!(f, "invalid padding: {}", e),
        }
    }
}

impl error::Error for DecodeError {
    fn cause(&self) -> Option<&dyn error::Error> {
        match *self {
            DecodeError::Padding(ref e) => Some(e),
            _ => None,
        }
    }
}

#[doc(hidden)]
impl From<bits::Error> for DecodeError {
    fn from(e: bits::Error) -> DecodeError {
        DecodeError::Padding(e)
    }
}

/// Regroup payload bytes into zero-padded 5-bit words.
pub fn to_words(bytes: &[u8]) -> Vec<u5> {
    bits::convert_bits(bytes, 8, 5, true)
        .expect("8-bit input always regroups")
        .into_iter()
        .map(u5)
        .collect()
}

/// Regroup 5-bit words back into payload bytes, rejecting non-zero padding.
pub fn from_words(words: &[u5]) -> Result<Vec<u8>, DecodeError> {
    let data: Vec<u8> = words.iter().map(|w| w.0).collect();
    Ok(bits::convert_bits(&data, 5, 8, false)?)
}

/// Encode payload bytes as a checksummed string under the given prefix.
///
/// The human-readable part is folded to lower case; the output is always
/// an all-lowercase string.
pub fn encode(hrp: &str, data: &[u8], variant: Variant) -> Result<String, EncodeError> {
    check_hrp(hrp)?;
    let hrp = hrp.to_ascii_lowercase();
    let words: Vec<u5> = bits::convert_bits(data, 8, 5, true)?
        .into_iter()
        .map(u5)
        .collect();
    let checksum = create_checksum(hrp.as_bytes(), &words, variant);

    let mut ret = String::with_capacity(hrp.len() + 1 + words.len() + CHECKSUM_LENGTH);
    ret.push_str(&hrp);
    ret.push(SEP);
    for p in words.iter().chain(checksum.iter()) {
        ret.push(CHARSET[usize::from(p.0)]);
    }
    Ok(ret)
}

/// Encode a word sequence to an [`fmt::Formatter`], appending the checksum.
///
/// The human-readable part must already be valid (non-empty, printable
/// US-ASCII, at most 83 characters); [`encode`] is the checked entry point.
pub fn encode_to_fmt<T: AsRef<[u5]>>(
    fmt: &mut fmt::Formatter,
    hrp: &str,
    data: T,
    variant: Variant,
) -> fmt::Result {
    let hrp_bytes: &[u8] = hrp.as_bytes();
    let checksum = create_checksum(hrp_bytes, data.as_ref(), variant);
    let data_part = data.as_ref().iter().chain(checksum.iter());

    write!(
        fmt,
        "{}{}{}",
        hrp,
        SEP,
        data_part
            .map(|p| CHARSET[usize::from(p.0)])
            .collect::<String>()
    )
}

/// Decode a checksummed string into the raw HRP and the payload bytes.
///
/// The HRP is returned as it was found in the original string, so it can
/// be either lower or upper case.
pub fn decode(s: &str) -> Result<(&str, Vec<u8>, Variant), DecodeError> {
    let (hrp, words, variant) = decode_words(s)?;
    let bytes = from_words(&words)?;
    Ok((hrp, bytes, variant))
}

/// Decode a checksummed string into the raw HRP and the data words, with
/// the checksum verified and stripped but the words not yet regrouped
/// into bytes.
pub fn decode_words(s: &str) -> Result<(&str, Vec<u5>, Variant), DecodeError> {
    // Split at separator and check for two pieces
    let (raw_hrp, raw_data) = match s.rfind(SEP) {
        None => return Err(DecodeError::MissingSeparator),
        Some(sep) => {
            let (hrp, data) = s.split_at(sep);
            (hrp, &data[1..])
        }
    };
    if raw_data.len() < CHECKSUM_LENGTH {
        return Err(DecodeError::TooShort(raw_data.len()));
    }
    if raw_hrp.is_empty() {
        return Err(DecodeError::EmptyHrp);
    }
    if raw_hrp.len() > MAX_HRP_LENGTH {
        return Err(DecodeError::HrpTooLong(raw_hrp.len()));
    }

    let mut has_lower: bool = false;
    let mut has_upper: bool = false;
    let mut hrp_bytes: Vec<u8> = Vec::with_capacity(raw_hrp.len());
    for b in raw_hrp.bytes() {
        // Valid subset of ASCII
        if b < 33 || b > 126 {
            return Err(DecodeError::InvalidHrpChar(b as char));
        }
        let mut c = b;
        // Lowercase
        if b >= b'a' && b <= b'z' {
            has_lower = true;
        }
        // Uppercase
        if b >= b'A' && b <= b'Z' {
            has_upper = true;
            // Convert to lowercase
            c = b + (b'a' - b'A');
        }
        hrp_bytes.push(c);
    }

    // Check data payload
    let mut data = raw_data
        .chars()
        .map(|c| {
            // Only check if c is in the ASCII range, all invalid ASCII
            // characters have the value -1 in CHARSET_REV (which covers the
            // whole ASCII range) and will be filtered out later.
            if !c.is_ascii() {
                return Err(DecodeError::InvalidChar(c));
            }

            if c.is_lowercase() {
                has_lower = true;
            } else if c.is_uppercase() {
                has_upper = true;
            }

            // c is <128 since it is in the ASCII range, CHARSET_REV.len() == 128
            let num_value = CHARSET_REV[c as usize];

            if num_value < 0 || num_value > 31 {
                return Err(DecodeError::InvalidChar(c));
            }

            // In range per the check above.
            Ok(u5(num_value as u8))
        })
        .collect::<Result<Vec<u5>, DecodeError>>()?;

    // Ensure no mixed case
    if has_lower && has_upper {
        return Err(DecodeError::MixedCase);
    }

    // Ensure checksum
    let variant = match verify_checksum(&hrp_bytes, &data) {
        Some(v) => v,
        None => return Err(DecodeError::InvalidChecksum),
    };

    // Remove checksum from data payload
    let dbl: usize = data.len();
    data.truncate(dbl - CHECKSUM_LENGTH);

    Ok((raw_hrp, data, variant))
}

fn check_hrp(hrp: &str) -> Result<(), EncodeError> {
    if hrp.is_empty() {
        return Err(EncodeError::EmptyHrp);
    }
    if hrp.len() > MAX_HRP_LENGTH {
        return Err(EncodeError::HrpTooLong(hrp.len()));
    }
    for b in hrp.bytes() {
        // Valid subset of ASCII
        if b < 33 || b > 126 {
            return Err(EncodeError::InvalidHrpChar(b as char));
        }
    }
    Ok(())
}

fn create_checksum(hrp: &[u8], data: &[u5], variant: Variant) -> Vec<u5> {
    let mut values: Vec<u5> = hrp_expand(hrp);
    values.extend_from_slice(data);
    // Pad with 6 zeros
    values.extend_from_slice(&[u5(0); CHECKSUM_LENGTH]);
    let plm: u32 = polymod(&values) ^ variant.constant();
    let mut checksum: Vec<u5> = Vec::with_capacity(CHECKSUM_LENGTH);
    for p in 0..CHECKSUM_LENGTH {
        // Each 5-bit group of the residue, most significant first.
        checksum.push(u5(((plm >> (5 * (5 - p))) & 0x1f) as u8));
    }
    checksum
}

fn verify_checksum(hrp: &[u8], data: &[u5]) -> Option<Variant> {
    let mut exp = hrp_expand(hrp);
    exp.extend_from_slice(data);
    match polymod(&exp) {
        c if c == Variant::Bech32.constant() => Some(Variant::Bech32),
        c if c == Variant::Bech32m.constant() => Some(Variant::Bech32m),
        _ => None,
    }
}

fn hrp_expand(hrp: &[u8]) -> Vec<u5> {
    let mut v: Vec<u5> = Vec::with_capacity(hrp.len() * 2 + 1);
    for b in hrp {
        v.push(u5(*b >> 5));
    }
    v.push(u5(0));
    for b in hrp {
        v.push(u5(*b & 0x1f));
    }
    v
}

fn polymod(values: &[u5]) -> u32 {
    let mut chk: u32 = 1;
    let mut b: u8;
    for v in values {
        // Top 5 bits of the 30-bit accumulator.
        b = (chk >> 25) as u8;
        chk = (chk & 0x01ff_ffff) << 5 ^ u32::from(v.0);
        for i in 0..5 {
            if (b >> i) & 1 == 1 {
                chk ^= GEN[i];
            }
        }
    }
    chk
}
