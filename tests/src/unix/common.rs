use core::ptr::null_mut;
use libc::c_void;

// Anonymous mapping followed by an inaccessible guard page, to place untrusted
// buffers right before memory that faults when touched.
pub struct GuardedMapping {
    base: *mut u8,
    page_size: usize,
}

impl GuardedMapping {
    pub fn new() -> Self {
        let page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) } as usize;
        let base = unsafe {
            libc::mmap(
                null_mut(),
                2 * page_size,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                -1,
                0,
            )
        };
        assert_ne!(base, libc::MAP_FAILED, "mmap() failed");
        let res = unsafe {
            libc::mprotect(
                (base as *mut u8).add(page_size) as *mut c_void,
                page_size,
                libc::PROT_NONE,
            )
        };
        assert_eq!(res, 0, "mprotect(PROT_NONE) failed on guard page");
        Self {
            base: base as *mut u8,
            page_size,
        }
    }

    // Copies bytes so that they end `readable_bytes` after their start, i.e. only
    // their first `readable_bytes` are mapped, the rest falls into the guard page.
    // Returns the address they were copied at.
    pub fn place_before_guard(&mut self, bytes: &[u8], readable_bytes: usize) -> *const u8 {
        assert!(readable_bytes <= bytes.len() && readable_bytes <= self.page_size);
        unsafe {
            let start = self.base.add(self.page_size - readable_bytes);
            core::ptr::copy_nonoverlapping(bytes.as_ptr(), start, readable_bytes);
            start
        }
    }
}

impl Drop for GuardedMapping {
    fn drop(&mut self) {
        unsafe {
            libc::munmap(self.base as *mut c_void, 2 * self.page_size);
        }
    }
}

// Whether the kernel lets us read our own memory through process_vm_readv(), which
// some seccomp profiles forbid.
pub fn guarded_reads_supported() -> bool {
    let src = [0u8; 4];
    let mut dst = [0u8; 4];
    let local = libc::iovec {
        iov_base: dst.as_mut_ptr() as *mut c_void,
        iov_len: dst.len(),
    };
    let remote = libc::iovec {
        iov_base: src.as_ptr() as *mut c_void,
        iov_len: src.len(),
    };
    let res = unsafe { libc::process_vm_readv(libc::getpid(), &local, 1, &remote, 1, 0) };
    res == 4
}
