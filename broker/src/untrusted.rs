use crate::error::AccessViolation;
use crate::os::guarded_copy;
use core::marker::PhantomData;
use log::debug;

// Memory written by the untrusted side of the channel. The broker only ever reads it
// through this trait, so that every read is bounded and faults can be reported as
// errors instead of crashing the broker.
pub trait UntrustedBuffer {
    fn is_null(&self) -> bool {
        false
    }

    // Copies dst.len() bytes starting at offset into dst
    fn copy_to(&self, offset: usize, dst: &mut [u8]) -> Result<(), AccessViolation>;

    fn read_u32(&self, offset: usize) -> Result<u32, AccessViolation> {
        let mut bytes = [0u8; 4];
        self.copy_to(offset, &mut bytes)?;
        Ok(u32::from_ne_bytes(bytes))
    }
}

impl UntrustedBuffer for [u8] {
    fn copy_to(&self, offset: usize, dst: &mut [u8]) -> Result<(), AccessViolation> {
        let violation = AccessViolation {
            offset,
            len: dst.len(),
        };
        let end = offset.checked_add(dst.len()).ok_or(violation)?;
        let src = self.get(offset..end).ok_or(violation)?;
        dst.copy_from_slice(src);
        Ok(())
    }
}

// View over a memory region shared with another process, which may write to it
// (or unmap it) at any time.
#[derive(Debug)]
pub struct SharedMemoryView<'a> {
    base: *const u8,
    mapped_len: usize,
    _mapping: PhantomData<&'a [u8]>,
}

impl<'a> SharedMemoryView<'a> {
    // base can be null, in which case every call using this view is rejected.
    // Safety: base must be the start of a mapping of (as far as the broker can tell)
    // mapped_len bytes, which stays reserved for lifetime 'a. On Linux, reads of pages
    // which turn out to be unmapped or inaccessible fail cleanly. Elsewhere they are
    // not caught.
    pub unsafe fn from_raw_parts(base: *const u8, mapped_len: usize) -> Self {
        Self {
            base,
            mapped_len,
            _mapping: PhantomData,
        }
    }

    pub fn mapped_len(&self) -> usize {
        self.mapped_len
    }
}

impl UntrustedBuffer for SharedMemoryView<'_> {
    fn is_null(&self) -> bool {
        self.base.is_null()
    }

    fn copy_to(&self, offset: usize, dst: &mut [u8]) -> Result<(), AccessViolation> {
        let violation = AccessViolation {
            offset,
            len: dst.len(),
        };
        if self.base.is_null() {
            return Err(violation);
        }
        match offset.checked_add(dst.len()) {
            Some(end) if end <= self.mapped_len => (),
            _ => return Err(violation),
        }
        // Safe since offset + dst.len() stays within the mapping this view was
        // created with, and faults are reported instead of dereferenced blindly
        let res = unsafe { guarded_copy(self.base.add(offset), dst) };
        res.map_err(|os_code| {
            debug!(
                "Fault while reading {} bytes at offset {} of shared memory (error {})",
                dst.len(),
                offset,
                os_code
            );
            violation
        })
    }
}
