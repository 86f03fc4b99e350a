/*! `nvpair` encodes and decodes nvlists: the name/value container format
 * used on the wire and in on-disk structures across ZFS and the broader
 * Solaris/illumos libnvpair ecosystem.
 *
 * Two wire encodings are supported:
 * - [`kind::Encoding::Xdr`]: big endian, 4 byte aligned. Used on-disk and for
 *   most ioctl payloads.
 * - [`kind::Encoding::Native`]: host endian, naturally aligned. Used for some
 *   in-kernel ioctl payloads.
 *
 * [`nv::decode`] and [`nv::encode`] convert between a byte stream and an owned
 * [`value::NvList`] tree. The `derive` feature additionally provides
 * [`marshal`], a reflective binding between [`value::NvList`] and user
 * structs via `#[derive(NvValue)]`.
 */
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

#[macro_use]
extern crate num_derive;

pub mod endian;
pub mod kind;
pub mod limits;
pub mod marshal;
pub mod native;
pub mod nv;
pub mod value;
pub mod xdr;

#[cfg(feature = "ioctl")]
pub mod ioctl;

#[cfg(feature = "derive")]
pub use nvpair_derive::NvValue;

/// `String`, re-exported at a path stable across `std`/`no_std` builds so
/// `#[derive(NvValue)]`-generated code doesn't have to pick between
/// `std::string::String` and `alloc::string::String` at macro-expansion
/// time.
#[cfg(feature = "std")]
#[doc(hidden)]
pub use std::string::String as __String;
#[cfg(not(feature = "std"))]
#[doc(hidden)]
pub use alloc::string::String as __String;
