//! Stored payloads and the fixed-width integer encoding.

/// A cached payload: either a caller-typed value or an opaque byte blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value<T> {
    Ref(T),
    Bytes(Vec<u8>),
}

impl<T> Value<T> {
    /// Returns the typed value, if this payload holds one.
    #[inline]
    pub fn as_ref_value(&self) -> Option<&T> {
        match self {
            Value::Ref(v) => Some(v),
            Value::Bytes(_) => None,
        }
    }

    /// Returns the byte blob, if this payload holds one.
    #[inline]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Ref(_) => None,
            Value::Bytes(b) => Some(b),
        }
    }

    /// Decodes the payload as a little-endian `i64`.
    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_bytes().and_then(decode_i64)
    }
}

/// Encodes `n` as 8 little-endian bytes.
#[inline]
pub fn encode_i64(n: i64) -> Vec<u8> {
    n.to_le_bytes().to_vec()
}

/// Decodes the first 8 bytes of `bytes` as a little-endian `i64`.
///
/// Returns `None` when fewer than 8 bytes are available.
///
/// ```
/// use shardcache::value::{decode_i64, encode_i64};
///
/// assert_eq!(decode_i64(&encode_i64(-7)), Some(-7));
/// assert_eq!(decode_i64(&[1, 2, 3]), None);
/// ```
#[inline]
pub fn decode_i64(bytes: &[u8]) -> Option<i64> {
    let head: [u8; 8] = bytes.get(..8)?.try_into().ok()?;
    Some(i64::from_le_bytes(head))
}
