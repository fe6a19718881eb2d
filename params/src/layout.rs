use crate::MAX_PARAMS;
use core::convert::TryInto;

// Layout of a call buffer. All fields are native-endian u32, both ends of the
// channel live on the same host.
//
//   0  tag
//   4  is_in_out
//   8  param_count
//  12  reserved
//  16  param_info[param_count + 1] { type, offset, size }
//      payload
//
// The extra param_info slot at index param_count is never a parameter: its offset
// field holds the total size of the call as declared by its producer. Offsets are
// relative to the start of the call, not to the payload.

pub const TAG_OFFSET: usize = 0;
pub const IS_IN_OUT_OFFSET: usize = 4;
pub const PARAM_COUNT_OFFSET: usize = 8;
pub const CALL_HEADER_SIZE: usize = 16;
pub const PARAM_INFO_SIZE: usize = 12;

// Smallest buffer that can hold a call: the header and the size slot
pub const MIN_CALL_SIZE: usize = CALL_HEADER_SIZE + PARAM_INFO_SIZE;

const PARAM_INFO_TYPE_FIELD: usize = 0;
const PARAM_INFO_OFFSET_FIELD: usize = 4;
const PARAM_INFO_SIZE_FIELD: usize = 8;

// Size of the header and parameter descriptions for a call with that many parameters,
// i.e. offset of the first payload byte. None on overflow.
pub fn min_call_size(param_count: usize) -> Option<usize> {
    param_count
        .checked_mul(PARAM_INFO_SIZE)
        .and_then(|n| n.checked_add(MIN_CALL_SIZE))
}

pub fn param_info_offset(index: usize) -> Option<usize> {
    index
        .checked_mul(PARAM_INFO_SIZE)
        .and_then(|n| n.checked_add(CALL_HEADER_SIZE))
}

// Offset of the declared total size field, which depends on how many param_info slots
// precede it. None for parameter counts no call can have.
pub fn declared_size_offset(param_count: usize) -> Option<usize> {
    if param_count == 0 || param_count > MAX_PARAMS {
        return None;
    }
    param_info_offset(param_count).map(|off| off + PARAM_INFO_OFFSET_FIELD)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParamInfo {
    // Kept raw: it comes from the producer and is only checked by the broker
    pub arg_type: u32,
    pub offset: u32,
    pub size: u32,
}

impl ParamInfo {
    // Reads the description of the index-th parameter from a buffer. None if the buffer
    // is too short to contain it.
    pub fn read_from(buffer: &[u8], index: usize) -> Option<Self> {
        let start = param_info_offset(index)?;
        let entry = buffer.get(start..start.checked_add(PARAM_INFO_SIZE)?)?;
        Some(Self {
            arg_type: read_u32(entry, PARAM_INFO_TYPE_FIELD)?,
            offset: read_u32(entry, PARAM_INFO_OFFSET_FIELD)?,
            size: read_u32(entry, PARAM_INFO_SIZE_FIELD)?,
        })
    }

    pub fn write_to(&self, buffer: &mut [u8], index: usize) -> Option<()> {
        let start = param_info_offset(index)?;
        let entry = buffer.get_mut(start..start.checked_add(PARAM_INFO_SIZE)?)?;
        write_u32(entry, PARAM_INFO_TYPE_FIELD, self.arg_type)?;
        write_u32(entry, PARAM_INFO_OFFSET_FIELD, self.offset)?;
        write_u32(entry, PARAM_INFO_SIZE_FIELD, self.size)?;
        Some(())
    }
}

pub fn read_u32(buffer: &[u8], offset: usize) -> Option<u32> {
    let bytes = buffer.get(offset..offset.checked_add(4)?)?;
    Some(u32::from_ne_bytes(bytes.try_into().ok()?))
}

pub fn write_u32(buffer: &mut [u8], offset: usize, value: u32) -> Option<()> {
    buffer
        .get_mut(offset..offset.checked_add(4)?)?
        .copy_from_slice(&value.to_ne_bytes());
    Some(())
}
