use crate::error::ParameterError;
use crate::validated_call::{ParamEntry, RawParameter, ValidatedCall};
use core::convert::TryInto;
use crosscall_params::ArgType;

// Bounds were checked once and for all during validation: accessors only check that
// the parameter has the type and size the handler expects.
impl ValidatedCall {
    pub fn get_raw(&self, index: usize) -> Option<RawParameter<'_>> {
        let ParamEntry { arg_type, range } = self.params.get(index)?;
        Some(RawParameter {
            offset: range.start,
            bytes: self.mem.get(range.clone())?,
            arg_type: *arg_type,
        })
    }

    fn get_typed(
        &self,
        index: usize,
        expected: ArgType,
    ) -> Result<RawParameter<'_>, ParameterError> {
        let param = self.get_raw(index).ok_or(ParameterError::NotPresent {
            index,
            param_count: self.param_count(),
        })?;
        if param.arg_type != expected {
            return Err(ParameterError::TypeMismatch {
                index,
                expected,
                found: param.arg_type,
            });
        }
        Ok(param)
    }

    fn get_sized<const N: usize>(
        &self,
        index: usize,
        expected: ArgType,
    ) -> Result<[u8; N], ParameterError> {
        let param = self.get_typed(index, expected)?;
        param
            .bytes
            .try_into()
            .map_err(|_| ParameterError::SizeMismatch {
                index,
                expected: N,
                found: param.bytes.len(),
            })
    }

    pub fn get_u32(&self, index: usize) -> Result<u32, ParameterError> {
        self.get_sized::<4>(index, ArgType::ULong)
            .map(u32::from_ne_bytes)
    }

    // Opaque value from the caller's address space, do not dereference it
    pub fn get_pointer(&self, index: usize) -> Result<usize, ParameterError> {
        self.get_sized::<{ core::mem::size_of::<usize>() }>(index, ArgType::VoidPtr)
            .map(usize::from_ne_bytes)
    }

    // Raw copy of the UTF-16 code units, which are not scanned for anything (nulls,
    // unpaired surrogates, etc.)
    pub fn get_wide_string(&self, index: usize) -> Result<Vec<u16>, ParameterError> {
        let param = self.get_typed(index, ArgType::WChar)?;
        if param.bytes.len() % 2 != 0 {
            return Err(ParameterError::InvalidWideStringSize {
                index,
                size: param.bytes.len(),
            });
        }
        Ok(param
            .bytes
            .chunks_exact(2)
            .map(|unit| u16::from_ne_bytes([unit[0], unit[1]]))
            .collect())
    }

    // The only accessor handing out a live view of the call, restricted to parameters
    // of exactly the size the handler expects. Writes only ever land in the payload,
    // the header and parameter descriptions cannot be reached from here.
    pub fn get_inout_buffer(
        &mut self,
        index: usize,
        expected_size: usize,
    ) -> Result<&mut [u8], ParameterError> {
        let range = {
            let param = self.get_typed(index, ArgType::InOutPtr)?;
            if param.bytes.len() != expected_size {
                return Err(ParameterError::SizeMismatch {
                    index,
                    expected: expected_size,
                    found: param.bytes.len(),
                });
            }
            param.offset..param.offset + param.bytes.len()
        };
        let param_count = self.param_count();
        self.mem
            .get_mut(range)
            .ok_or(ParameterError::NotPresent { index, param_count })
    }
}
