//! MessagePack Codec using `rmp-serde`

use crate::traits::CacheCodec;
use anyhow::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// MessagePack Codec using `rmp-serde`
///
/// Compact binary encoding. Unlike non-self-describing formats it can decode
/// arbitrary `serde_json::Value` trees, which is what backends store.
#[cfg_attr(docsrs, doc(cfg(feature = "msgpack")))]
#[derive(Debug, Default, Clone, Copy)]
pub struct MsgPackCodec;

impl CacheCodec for MsgPackCodec {
    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        // Named fields keep maps as maps instead of positional arrays
        Ok(rmp_serde::to_vec_named(value)?)
    }

    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        Ok(rmp_serde::from_slice(bytes)?)
    }

    fn name(&self) -> &'static str {
        "msgpack"
    }
}
