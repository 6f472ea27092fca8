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

//! # Rust Penumbra Address Library
//!
//! Bech32m encoding and decoding of Penumbra addresses: a checksummed,
//! human-readable text form for raw payload bytes produced by a wallet
//! device or other key source. The codec is pure and stateless; device
//! communication, key derivation and transaction handling live elsewhere.
//!

// Coding conventions
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![deny(missing_docs)]

#[cfg(feature = "serde")]
extern crate actual_serde as serde;

#[cfg(test)]
extern crate rand;

pub mod address;
pub mod bech32m;
pub mod bits;

// export everything at the top level so it can be used as
// `penumbra_address::Address` etc.
pub use crate::address::{Address, AddressError, PENUMBRA_HRP};
pub use crate::bech32m::{decode, encode, u5, DecodeError, EncodeError, Variant};
pub use crate::bits::convert_bits;
