// Kinds of parameters a call can carry. The discriminants are part of the
// call buffer layout.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgType {
    Invalid = 0,
    // UTF-16 string, its byte size must be a multiple of 2
    WChar = 1,
    // 32-bit unsigned integer
    ULong = 2,
    // Opaque pointer-sized value, never dereferenced by the broker
    VoidPtr = 3,
    // Buffer of a fixed size shared by the caller and the handler
    InOutPtr = 4,
    Last = 5,
}

impl ArgType {
    // Returns the type for a raw value read from a call buffer, or None if it is not
    // strictly between Invalid and Last.
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            1 => Some(Self::WChar),
            2 => Some(Self::ULong),
            3 => Some(Self::VoidPtr),
            4 => Some(Self::InOutPtr),
            _ => None,
        }
    }

    pub fn as_raw(self) -> u32 {
        self as u32
    }
}

impl Default for ArgType {
    fn default() -> Self {
        Self::Invalid
    }
}
