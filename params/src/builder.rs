use crate::layout::{min_call_size, write_u32, ParamInfo};
use crate::{
    ArgType, ParamsError, IPC_CHANNEL_SIZE, IS_IN_OUT_OFFSET, MAX_PARAMS, PARAM_COUNT_OFFSET,
    TAG_OFFSET,
};
use core::convert::TryInto;

// Parameters are laid out on pointer-sized boundaries in the payload
const PAYLOAD_ALIGNMENT: usize = 8;

// Client-side marshaling of a call into the layout the broker validates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallBuilder {
    tag: u32,
    params: Vec<(ArgType, Vec<u8>)>,
}

impl CallBuilder {
    pub fn new(tag: u32) -> Self {
        Self {
            tag,
            params: vec![],
        }
    }

    pub fn push_u32(mut self, value: u32) -> Self {
        self.params.push((ArgType::ULong, value.to_ne_bytes().to_vec()));
        self
    }

    pub fn push_pointer(mut self, value: usize) -> Self {
        self.params
            .push((ArgType::VoidPtr, value.to_ne_bytes().to_vec()));
        self
    }

    pub fn push_wide_string(mut self, value: &str) -> Self {
        let bytes = value
            .encode_utf16()
            .flat_map(|unit| unit.to_ne_bytes())
            .collect();
        self.params.push((ArgType::WChar, bytes));
        self
    }

    // The handler reads and writes these bytes in place, they are copied back to
    // the caller if the call succeeds.
    pub fn push_inout_buffer(mut self, initial_contents: &[u8]) -> Self {
        self.params
            .push((ArgType::InOutPtr, initial_contents.to_vec()));
        self
    }

    pub fn build(&self) -> Result<Vec<u8>, ParamsError> {
        self.build_with_capacity(IPC_CHANNEL_SIZE)
    }

    pub fn build_with_capacity(&self, max_size: usize) -> Result<Vec<u8>, ParamsError> {
        let param_count = self.params.len();
        if param_count == 0 {
            return Err(ParamsError::NoParameters);
        }
        if param_count > MAX_PARAMS {
            return Err(ParamsError::TooManyParameters { max: MAX_PARAMS });
        }
        // Cannot overflow with at most MAX_PARAMS slots
        let payload_start = min_call_size(param_count).unwrap_or(usize::MAX);
        let mut infos = Vec::with_capacity(param_count + 1);
        let mut cursor = payload_start;
        for (arg_type, bytes) in &self.params {
            let offset = align_up(cursor);
            let end = offset.saturating_add(bytes.len());
            infos.push((*arg_type, offset, bytes.len()));
            cursor = end;
        }
        let too_large = ParamsError::CallTooLarge {
            size: cursor,
            max: max_size,
        };
        if cursor > max_size {
            return Err(too_large);
        }
        let declared_size: u32 = cursor.try_into().map_err(|_| too_large.clone())?;

        let mut buffer = vec![0u8; cursor];
        let is_in_out = self.params.iter().any(|(t, _)| *t == ArgType::InOutPtr);
        write_u32(&mut buffer, TAG_OFFSET, self.tag).ok_or(too_large.clone())?;
        write_u32(&mut buffer, IS_IN_OUT_OFFSET, is_in_out as u32).ok_or(too_large.clone())?;
        write_u32(&mut buffer, PARAM_COUNT_OFFSET, param_count as u32)
            .ok_or(too_large.clone())?;
        for (index, ((arg_type, offset, size), (_, bytes))) in
            infos.iter().zip(&self.params).enumerate()
        {
            // offset + size <= declared_size which fits in an u32
            let info = ParamInfo {
                arg_type: arg_type.as_raw(),
                offset: *offset as u32,
                size: *size as u32,
            };
            info.write_to(&mut buffer, index).ok_or(too_large.clone())?;
            buffer[*offset..*offset + *size].copy_from_slice(bytes);
        }
        let size_slot = ParamInfo {
            arg_type: ArgType::Invalid.as_raw(),
            offset: declared_size,
            size: 0,
        };
        size_slot
            .write_to(&mut buffer, param_count)
            .ok_or(too_large)?;
        Ok(buffer)
    }
}

fn align_up(offset: usize) -> usize {
    match offset % PAYLOAD_ALIGNMENT {
        0 => offset,
        rem => offset.saturating_add(PAYLOAD_ALIGNMENT - rem),
    }
}
