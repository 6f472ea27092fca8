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

//! # Bit Regrouping
//!
//! Lossless repacking of a bitstream between two fixed symbol widths,
//! reading and writing most-significant-bit first. Used to move between
//! the 8-bit bytes of an address payload and the 5-bit words of its
//! checksummed text form.
//!

use std::error;
use std::fmt;

/// Regrouping error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A bit width outside the supported range of 1 to 8 was requested.
    InvalidBitWidth(u32),
    /// An input value does not fit in the source bit width.
    InvalidData(u8),
    /// Leftover bits at the end of the input were non-zero, or there were
    /// enough of them to form a whole extra source symbol.
    InvalidPadding,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::InvalidBitWidth(ref w) => write!(f, "unsupported bit width: {}", w),
            Error::InvalidData(ref v) => write!(f, "input value out of range: {}", v),
            Error::InvalidPadding => write!(f, "non-zero or oversized padding"),
        }
    }
}

impl error::Error for Error {}

/// Regroup a `from`-bit symbol stream into `to`-bit symbols, treating the
/// input as one continuous bitstream read most-significant-bit first.
///
/// With `pad` set, leftover bits are zero-padded on the low end into one
/// final symbol (the encode direction, 8 to 5). Without it, leftover bits
/// must be zero and shorter than one source symbol, otherwise the input is
/// malformed (the decode direction, 5 to 8); discarding non-zero bits is
/// an error, never silent truncation.
pub fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Result<Vec<u8>, Error> {
    if from == 0 || from > 8 {
        return Err(Error::InvalidBitWidth(from));
    }
    if to == 0 || to > 8 {
        return Err(Error::InvalidBitWidth(to));
    }
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let maxv: u32 = (1 << to) - 1;
    let mut ret: Vec<u8> = Vec::with_capacity(
        (data.len() * from as usize + (to as usize - 1)) / to as usize,
    );
    for value in data {
        if u32::from(*value) >> from != 0 {
            return Err(Error::InvalidData(*value));
        }
        acc = (acc << from) | u32::from(*value);
        bits += from;
        while bits >= to {
            bits -= to;
            // Masked to `to` bits, so the cast is lossless.
            ret.push(((acc >> bits) & maxv) as u8);
        }
    }
    if pad {
        if bits > 0 {
            // Left-align the leftover bits in one final symbol.
            ret.push(((acc << (to - bits)) & maxv) as u8);
        }
    } else if bits >= from || ((acc << (to - bits)) & maxv) != 0 {
        return Err(Error::InvalidPadding);
    }
    Ok(ret)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn expand_with_padding() {
        // 0xff00 is 1111111100000000; 5-bit groups MSB-first are
        // 11111 11100 00000 with one leftover 0 bit padded out.
        assert_eq!(convert_bits(&[0xff, 0x00], 8, 5, true), Ok(vec![31, 28, 0, 0]));
        assert_eq!(convert_bits(&[0xff], 8, 5, true), Ok(vec![31, 28]));
        assert_eq!(convert_bits(&[], 8, 5, true), Ok(vec![]));
        assert_eq!(convert_bits(&[0x01], 8, 5, true), Ok(vec![0, 4]));
    }

    #[test]
    fn contract_without_padding() {
        assert_eq!(convert_bits(&[31, 28, 0, 0], 5, 8, false), Ok(vec![0xff, 0x00]));
        assert_eq!(convert_bits(&[31, 28], 5, 8, false), Ok(vec![0xff]));
        assert_eq!(convert_bits(&[], 5, 8, false), Ok(vec![]));
        // Five full bytes, no leftover bits at all.
        assert_eq!(
            convert_bits(&[1; 8], 5, 8, false),
            Ok(vec![0x08, 0x42, 0x10, 0x84, 0x21])
        );
    }

    #[test]
    fn output_length() {
        for len in 0..=256 {
            let data = vec![0xa5u8; len];
            let words = convert_bits(&data, 8, 5, true).unwrap();
            assert_eq!(words.len(), (len * 8 + 4) / 5);
            let bytes = convert_bits(&words, 5, 8, false).unwrap();
            assert_eq!(bytes, data);
        }
    }

    #[test]
    fn rejects_nonzero_padding() {
        // 31, 31 is 1111111111; one byte plus two leftover 1 bits.
        assert_eq!(convert_bits(&[31, 31], 5, 8, false), Err(Error::InvalidPadding));
        // 0xff regrouped with padding is [31, 28]; corrupt the padding bits.
        assert_eq!(convert_bits(&[31, 29], 5, 8, false), Err(Error::InvalidPadding));
    }

    #[test]
    fn rejects_oversized_padding() {
        // A single word leaves five leftover bits, a whole extra symbol,
        // even when they are all zero.
        assert_eq!(convert_bits(&[0], 5, 8, false), Err(Error::InvalidPadding));
        assert_eq!(convert_bits(&[0, 0], 5, 8, false), Err(Error::InvalidPadding));
    }

    #[test]
    fn rejects_out_of_range_input() {
        assert_eq!(convert_bits(&[32], 5, 8, false), Err(Error::InvalidData(32)));
        assert_eq!(convert_bits(&[3, 32, 3], 5, 5, false), Err(Error::InvalidData(32)));
    }

    #[test]
    fn rejects_bad_widths() {
        assert_eq!(convert_bits(&[1], 0, 5, true), Err(Error::InvalidBitWidth(0)));
        assert_eq!(convert_bits(&[1], 8, 9, true), Err(Error::InvalidBitWidth(9)));
        assert_eq!(convert_bits(&[1], 9, 5, true), Err(Error::InvalidBitWidth(9)));
    }

    #[test]
    fn identity_widths() {
        assert_eq!(convert_bits(&[1, 2, 3], 5, 5, false), Ok(vec![1, 2, 3]));
        assert_eq!(convert_bits(&[0xde, 0xad], 8, 8, false), Ok(vec![0xde, 0xad]));
    }
}
