//! RLP Type Definitions

/// Offset for short byte strings (length 0..=55)
pub const STRING_SHORT_OFFSET: u8 = 0x80;

/// Offset for long byte strings (length-of-length follows)
pub const STRING_LONG_OFFSET: u8 = 0xb7;

/// Offset for short lists (payload length 0..=55)
pub const LIST_SHORT_OFFSET: u8 = 0xc0;

/// Offset for long lists (length-of-length follows)
pub const LIST_LONG_OFFSET: u8 = 0xf7;

/// Largest payload that fits the short form
pub const MAX_SHORT_LENGTH: usize = 55;

/// Maximum list nesting accepted by the decoder
pub const MAX_DEPTH: usize = 64;

/// A node in an RLP structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RlpItem {
    /// A byte string
    Bytes(Vec<u8>),

    /// An ordered list of nodes
    List(Vec<RlpItem>),
}

impl RlpItem {
    /// The empty byte string (encodes as `0x80`)
    pub fn empty() -> Self {
        RlpItem::Bytes(Vec::new())
    }

    /// Wrap a byte slice
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        RlpItem::Bytes(data.into())
    }

    /// Wrap a list of nodes
    pub fn list(items: impl Into<Vec<RlpItem>>) -> Self {
        RlpItem::List(items.into())
    }

    pub fn is_list(&self) -> bool {
        matches!(self, RlpItem::List(_))
    }

    /// Borrow the byte string, if this node is one
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            RlpItem::Bytes(b) => Some(b),
            RlpItem::List(_) => None,
        }
    }

    /// Borrow the children, if this node is a list
    pub fn as_list(&self) -> Option<&[RlpItem]> {
        match self {
            RlpItem::List(items) => Some(items),
            RlpItem::Bytes(_) => None,
        }
    }
}

impl From<Vec<u8>> for RlpItem {
    fn from(data: Vec<u8>) -> Self {
        RlpItem::Bytes(data)
    }
}

impl From<&[u8]> for RlpItem {
    fn from(data: &[u8]) -> Self {
        RlpItem::Bytes(data.to_vec())
    }
}

impl From<Vec<RlpItem>> for RlpItem {
    fn from(items: Vec<RlpItem>) -> Self {
        RlpItem::List(items)
    }
}
