use crate::error::CallRejection;
use crate::untrusted::UntrustedBuffer;
use crate::ChannelConfig;
use crosscall_params::{
    declared_size_offset, min_call_size, read_u32, ArgType, CallSignature, ParamInfo,
    IS_IN_OUT_OFFSET, MAX_PARAMS, MIN_CALL_SIZE, PARAM_COUNT_OFFSET, TAG_OFFSET,
};
use core::ops::Range;
use log::debug;

// This is where untrusted call buffers get parsed. Potential security flaws in the
// channel are likelier to be found here than anywhere else.

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParamEntry {
    pub(crate) arg_type: ArgType,
    pub(crate) range: Range<usize>,
}

// Broker-owned copy of a call buffer, only obtainable through validation. Every
// parameter it describes is guaranteed to lie within the payload of the copy.
#[derive(Debug, PartialEq, Eq)]
pub struct ValidatedCall {
    pub(crate) mem: Box<[u8]>,
    pub(crate) tag: u32,
    pub(crate) is_in_out: bool,
    pub(crate) params: Vec<ParamEntry>,
}

// Parameter as stored in a validated call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawParameter<'a> {
    // Relative to the start of the call
    pub offset: usize,
    pub bytes: &'a [u8],
    pub arg_type: ArgType,
}

// Validates a call received on a channel with the default capacity
pub fn validate<S: UntrustedBuffer + ?Sized>(
    buffer: &S,
    raw_size: usize,
) -> Result<ValidatedCall, CallRejection> {
    ChannelConfig::new().validate(buffer, raw_size)
}

impl ChannelConfig {
    pub fn validate<S: UntrustedBuffer + ?Sized>(
        &self,
        buffer: &S,
        raw_size: usize,
    ) -> Result<ValidatedCall, CallRejection> {
        let res = ValidatedCall::from_untrusted(buffer, raw_size, self.max_buffer_size);
        if let Err(e) = &res {
            debug!("Rejected call buffer of {} bytes: {:?}", raw_size, e);
        }
        res
    }
}

impl ValidatedCall {
    fn from_untrusted<S: UntrustedBuffer + ?Sized>(
        buffer: &S,
        raw_size: usize,
        max_buffer_size: usize,
    ) -> Result<Self, CallRejection> {
        // IMPORTANT: everything read from `buffer`, including param_count and the
        // declared size, is untrusted and can change between two reads.
        if buffer.is_null() {
            return Err(CallRejection::NullBuffer);
        }
        if raw_size < MIN_CALL_SIZE {
            return Err(CallRejection::BufferTooSmall {
                raw_size,
                min: MIN_CALL_SIZE,
            });
        }
        if raw_size > max_buffer_size {
            return Err(CallRejection::BufferTooLarge {
                raw_size,
                max: max_buffer_size,
            });
        }

        let raw_param_count = buffer.read_u32(PARAM_COUNT_OFFSET)?;
        let param_count = raw_param_count as usize;
        // Checked arithmetic: an overflow cannot wrap around into a small size
        let min_size = min_call_size(param_count).unwrap_or(usize::MAX);
        if min_size > raw_size {
            return Err(CallRejection::ParamInfoTruncated { raw_size, min_size });
        }

        let size_offset = declared_size_offset(param_count).ok_or(
            CallRejection::InvalidParamCount {
                param_count: raw_param_count,
            },
        )?;
        let declared_size = buffer.read_u32(size_offset)? as usize;
        if declared_size > raw_size || declared_size < min_size {
            return Err(CallRejection::InvalidDeclaredSize {
                declared_size,
                raw_size,
                min_size,
            });
        }

        // Single read of the contents: from now on, only the copy is looked at
        let mut mem = vec![0u8; declared_size].into_boxed_slice();
        buffer.copy_to(0, &mut mem)?;

        // The producer could have changed param_count right before the copy
        let copied_param_count = read_u32(&mem, PARAM_COUNT_OFFSET).unwrap_or(0);
        if copied_param_count != raw_param_count {
            return Err(CallRejection::ParamCountChanged {
                before: raw_param_count,
                after: copied_param_count,
            });
        }

        let first_byte = min_size;
        let last_byte = declared_size;
        let mut params = Vec::with_capacity(param_count);
        for index in 0..param_count {
            let entry = ParamInfo::read_from(&mem, index)
                .ok_or("parameter description out of bounds")
                .and_then(|info| check_parameter(&info, first_byte, last_byte))
                .map_err(|description| CallRejection::MalformedParameter { index, description })?;
            params.push(entry);
        }

        Ok(Self {
            tag: read_u32(&mem, TAG_OFFSET).unwrap_or(0),
            is_in_out: read_u32(&mem, IS_IN_OUT_OFFSET).unwrap_or(0) != 0,
            mem,
            params,
        })
    }

    pub fn tag(&self) -> u32 {
        self.tag
    }

    pub fn is_in_out(&self) -> bool {
        self.is_in_out
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    // Size of the copy, i.e. the size declared by the producer
    pub fn size(&self) -> usize {
        self.mem.len()
    }

    // Shape of this call, to look up its handler
    pub fn signature(&self) -> CallSignature {
        let mut args = [ArgType::Invalid; MAX_PARAMS];
        for (slot, param) in args.iter_mut().zip(&self.params) {
            *slot = param.arg_type;
        }
        CallSignature {
            tag: self.tag,
            args,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.mem
    }

    pub fn into_bytes(self) -> Box<[u8]> {
        self.mem
    }
}

// Offsets are unsigned and relative to the copy, so a parameter can neither be null
// nor start before the copy: checking it against the payload bounds is enough.
fn check_parameter(
    info: &ParamInfo,
    first_byte: usize,
    last_byte: usize,
) -> Result<ParamEntry, &'static str> {
    let arg_type = ArgType::from_raw(info.arg_type).ok_or("unknown parameter type")?;
    let start = info.offset as usize;
    if start < first_byte {
        return Err("parameter starts before the payload");
    }
    if start > last_byte {
        return Err("parameter starts past the end of the call");
    }
    let end = start
        .checked_add(info.size as usize)
        .ok_or("parameter size overflows")?;
    if end > last_byte {
        return Err("parameter ends past the end of the call");
    }
    Ok(ParamEntry {
        arg_type,
        range: start..end,
    })
}
