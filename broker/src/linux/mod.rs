use libc::c_void;
use log::warn;
use std::sync::atomic::{AtomicBool, Ordering};

static GUARD_UNAVAILABLE_REPORTED: AtomicBool = AtomicBool::new(false);

pub(crate) fn errno() -> libc::c_int {
    unsafe { *(libc::__errno_location()) }
}

// Whether guarded_copy() actually catches faults, or falls back to a plain copy
pub fn fault_guard_available() -> bool {
    let src = [0u8; 1];
    let mut dst = [0u8; 1];
    let local = libc::iovec {
        iov_base: dst.as_mut_ptr() as *mut c_void,
        iov_len: dst.len(),
    };
    let remote = libc::iovec {
        iov_base: src.as_ptr() as *mut c_void,
        iov_len: src.len(),
    };
    let res = unsafe { libc::process_vm_readv(libc::getpid(), &local, 1, &remote, 1, 0) };
    res == 1
}

// Copies dst.len() bytes from src. The kernel does the copy on our behalf
// (process_vm_readv() on ourselves), so an unmapped or inaccessible source page makes
// it fail with EFAULT or stop short instead of raising SIGSEGV in the broker.
pub(crate) unsafe fn guarded_copy(src: *const u8, dst: &mut [u8]) -> Result<(), libc::c_int> {
    if dst.is_empty() {
        return Ok(());
    }
    let local = libc::iovec {
        iov_base: dst.as_mut_ptr() as *mut c_void,
        iov_len: dst.len(),
    };
    let remote = libc::iovec {
        iov_base: src as *mut c_void, // mut is not used here, just required by API
        iov_len: dst.len(),
    };
    let res = libc::process_vm_readv(libc::getpid(), &local, 1, &remote, 1, 0);
    if res < 0 {
        let err = errno();
        if err != libc::ENOSYS && err != libc::EPERM {
            return Err(err);
        }
        // Some seccomp profiles deny process_vm_readv(). Fall back to a plain
        // copy, bounded by the extent the caller vouched for.
        if !GUARD_UNAVAILABLE_REPORTED.swap(true, Ordering::Relaxed) {
            warn!(
                "process_vm_readv() unavailable (error {}), untrusted reads are not protected \
                 against faults",
                err
            );
        }
        core::ptr::copy_nonoverlapping(src, dst.as_mut_ptr(), dst.len());
        return Ok(());
    }
    if res as usize != dst.len() {
        // Partial read: the mapping ends before what we were told
        return Err(libc::EFAULT);
    }
    Ok(())
}
