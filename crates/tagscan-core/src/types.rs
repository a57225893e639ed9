use crate::{
    Result,
    constants::{MAX_UID_BYTES, TAG_ID_CAPACITY, TAG_ID_SEPARATOR},
    error::Error,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use subtle::ConstantTimeEq;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Formatted tag identifier held in a fixed-capacity buffer.
///
/// The UID bytes are rendered as upper-case hex groups separated by dashes
/// (`[0x04, 0xA1, 0x2B]` becomes `"04-A1-2B"`). The buffer never grows and
/// the type is `Copy`, so storing the last seen tag costs no allocation.
///
/// # Security
/// Equality is constant-time so comparing a presented tag against a stored
/// one does not leak where they differ.
///
/// # Examples
///
/// ```
/// use tagscan_core::TagId;
///
/// let tag = TagId::from_uid(&[0x04, 0xA1, 0x2B]).unwrap();
/// assert_eq!(tag.as_str(), "04-A1-2B");
/// assert_eq!(tag.uid_len(), 3);
///
/// let parsed: TagId = "04-a1-2b".parse().unwrap();
/// assert_eq!(parsed, tag);
/// ```
#[derive(Clone, Copy)]
pub struct TagId {
    buf: [u8; TAG_ID_CAPACITY],
    len: usize,
}

impl TagId {
    /// Format raw UID bytes into a tag identifier.
    ///
    /// # Errors
    /// Returns `Error::EmptyUid` for an empty slice and `Error::UidTooLong`
    /// when the UID exceeds [`MAX_UID_BYTES`]. Nothing is written in either
    /// case.
    pub fn from_uid(uid: &[u8]) -> Result<Self> {
        if uid.is_empty() {
            return Err(Error::EmptyUid);
        }
        if uid.len() > MAX_UID_BYTES {
            return Err(Error::UidTooLong {
                len: uid.len(),
                max: MAX_UID_BYTES,
            });
        }

        let mut buf = [0u8; TAG_ID_CAPACITY];
        let mut len = 0;
        for (i, byte) in uid.iter().enumerate() {
            if i > 0 {
                buf[len] = TAG_ID_SEPARATOR as u8;
                len += 1;
            }
            buf[len] = HEX_DIGITS[usize::from(byte >> 4)];
            buf[len + 1] = HEX_DIGITS[usize::from(byte & 0x0F)];
            len += 2;
        }

        Ok(Self { buf, len })
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Only ASCII hex digits and dashes are ever written.
        std::str::from_utf8(&self.buf[..self.len]).unwrap_or_default()
    }

    /// Number of UID bytes this identifier was formatted from.
    #[must_use]
    pub fn uid_len(&self) -> usize {
        (self.len + 1) / 3
    }

    /// Decode the identifier back into its UID bytes.
    #[must_use]
    pub fn uid_bytes(&self) -> Vec<u8> {
        self.as_str()
            .split(TAG_ID_SEPARATOR)
            .filter_map(|group| u8::from_str_radix(group, 16).ok())
            .collect()
    }
}

impl fmt::Debug for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TagId").field(&self.as_str()).finish()
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for TagId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::str::FromStr for TagId {
    type Err = Error;

    /// Parse dash-separated hex text such as `"04-A1-2B"` (any case).
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::EmptyUid);
        }

        let mut uid = [0u8; MAX_UID_BYTES];
        let mut count = 0;
        for group in s.split(TAG_ID_SEPARATOR) {
            if group.len() != 2 || !group.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(Error::InvalidTagId(format!(
                    "Expected two hex digits per group, got {group:?} in {s:?}"
                )));
            }
            if count == MAX_UID_BYTES {
                return Err(Error::UidTooLong {
                    len: s.split(TAG_ID_SEPARATOR).count(),
                    max: MAX_UID_BYTES,
                });
            }
            uid[count] = u8::from_str_radix(group, 16)
                .map_err(|e| Error::InvalidTagId(format!("{group:?}: {e}")))?;
            count += 1;
        }

        TagId::from_uid(&uid[..count])
    }
}

/// Constant-time comparison implementation for TagId
impl PartialEq for TagId {
    fn eq(&self, other: &Self) -> bool {
        self.as_str().as_bytes().ct_eq(other.as_str().as_bytes()).into()
    }
}

impl Eq for TagId {}

impl std::hash::Hash for TagId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl Serialize for TagId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TagId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Result code returned by a swipe handler.
///
/// Communicates the downstream decision for a swipe to the owning system.
/// The scanner records it but never changes its own state because of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeResult {
    /// The swipe was accepted (access granted or claimed by the handler).
    Accepted,
    /// The swipe was declined.
    Denied,
    /// The handler could not reach a decision.
    Failed,
}

impl SwipeResult {
    /// Returns `true` if the handler accepted the swipe.
    #[inline]
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, SwipeResult::Accepted)
    }
}

impl fmt::Display for SwipeResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SwipeResult::Accepted => write!(f, "Accepted"),
            SwipeResult::Denied => write!(f, "Denied"),
            SwipeResult::Failed => write!(f, "Failed"),
        }
    }
}
