pub fn fault_guard_available() -> bool {
    false
}

// No way to catch faults on untrusted memory here: the copy trusts the extent of
// the mapping as declared by the caller.
pub(crate) unsafe fn guarded_copy(src: *const u8, dst: &mut [u8]) -> Result<(), i32> {
    core::ptr::copy_nonoverlapping(src, dst.as_mut_ptr(), dst.len());
    Ok(())
}
