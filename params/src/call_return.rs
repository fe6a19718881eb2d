// Number of auxiliary values a handler can return along with its outcome
pub const EXTENDED_RETURN_COUNT: usize = 8;

// Outcome of a call as observed by the caller. This layer only defines the first
// few codes, anything else is a handler-specific failure it transports as-is.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResultCode(pub u32);

impl ResultCode {
    pub const ALL_OK: Self = Self(0);
    // The call buffer failed validation. No detail about why is sent back.
    pub const MALFORMED_CALL: Self = Self(1);
    // The call is well formed but no handler is registered for its signature
    pub const UNRECOGNIZED_CALL: Self = Self(2);

    pub fn is_ok(self) -> bool {
        self == Self::ALL_OK
    }
}

// Fixed-layout structure sent back to the caller once its call completes
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallReturn {
    pub tag: u32,
    pub call_outcome: ResultCode,
    pub extended_count: u32,
    pub extended: [u64; EXTENDED_RETURN_COUNT],
}

impl CallReturn {
    pub const SIZE: usize = 4 + 4 + 4 + 4 + 8 * EXTENDED_RETURN_COUNT;

    pub fn new(tag: u32) -> Self {
        Self {
            tag,
            call_outcome: ResultCode::ALL_OK,
            extended_count: 0,
            extended: [0; EXTENDED_RETURN_COUNT],
        }
    }

    // Auxiliary values the handler declared, never more than the array holds even
    // if extended_count was set to something bigger.
    pub fn extended_values(&self) -> &[u64] {
        let count = usize::min(self.extended_count as usize, EXTENDED_RETURN_COUNT);
        &self.extended[..count]
    }

    // Byte image of the structure, as laid out for the transport (native-endian,
    // 4 bytes of padding before the 8-byte aligned extended values).
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.tag.to_ne_bytes());
        bytes[4..8].copy_from_slice(&self.call_outcome.0.to_ne_bytes());
        bytes[8..12].copy_from_slice(&self.extended_count.to_ne_bytes());
        for (i, value) in self.extended.iter().enumerate() {
            let start = 16 + i * 8;
            bytes[start..start + 8].copy_from_slice(&value.to_ne_bytes());
        }
        bytes
    }
}
