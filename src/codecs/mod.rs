//! Cache Codec Implementations
//!
//! This module provides built-in implementations of the [`CacheCodec`](crate::traits::CacheCodec) trait
//! used by the byte-oriented backends.

mod json;
pub use json::JsonCodec;

#[cfg(feature = "msgpack")]
mod msgpack;
#[cfg(feature = "msgpack")]
#[cfg_attr(docsrs, doc(cfg(feature = "msgpack")))]
pub use msgpack::MsgPackCodec;
