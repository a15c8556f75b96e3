//! Stock consumers.
//!
//! These are building blocks: sinks ([`Discard`], [`DebugEvents`]) and
//! adapters that wrap another consumer ([`Tee`], [`ValidateEventOrder`],
//! [`PreferSigned`], [`BinaryToHex`]).

mod binary_to_hex;
mod debug;
mod discard;
mod prefer_signed;
mod tee;
mod validate;

pub use binary_to_hex::BinaryToHex;
pub use debug::DebugEvents;
pub use discard::Discard;
pub use prefer_signed::PreferSigned;
pub use tee::Tee;
pub use validate::ValidateEventOrder;
