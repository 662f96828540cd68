//! Thread pinning so a measurement is not split across cores.
//!
//! Linux uses `sched_setaffinity` through `libc`; other platforms have no
//! reliable userspace affinity API and fall back to a no-op.

#[cfg(target_os = "linux")]
mod platform {
    use std::cell::Cell;

    thread_local! {
        static SAVED_MASK: Cell<Option<libc::cpu_set_t>> = const { Cell::new(None) };
    }

    const MASK_SIZE: usize = std::mem::size_of::<libc::cpu_set_t>();

    pub fn core_count() -> Option<usize> {
        // SAFETY: sysconf has no preconditions.
        let n = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_ONLN) };
        (n > 0).then_some(n as usize)
    }

    pub fn current_cpu() -> Option<usize> {
        // SAFETY: sched_getcpu has no preconditions.
        let cpu = unsafe { libc::sched_getcpu() };
        (cpu >= 0).then_some(cpu as usize)
    }

    pub fn pin(core_id: usize) -> bool {
        // SAFETY: both masks are plain-old-data owned by this frame and the
        // size passed matches their type.
        unsafe {
            let mut saved: libc::cpu_set_t = std::mem::zeroed();
            if libc::sched_getaffinity(0, MASK_SIZE, &mut saved) != 0 {
                return false;
            }

            let mut target: libc::cpu_set_t = std::mem::zeroed();
            libc::CPU_ZERO(&mut target);
            libc::CPU_SET(core_id, &mut target);
            if libc::sched_setaffinity(0, MASK_SIZE, &target) != 0 {
                return false;
            }

            SAVED_MASK.with(|cell| cell.set(Some(saved)));
            true
        }
    }

    pub fn unpin() -> bool {
        match SAVED_MASK.with(|cell| cell.take()) {
            // SAFETY: `mask` was filled by sched_getaffinity in `pin`.
            Some(mask) => unsafe { libc::sched_setaffinity(0, MASK_SIZE, &mask) == 0 },
            None => false,
        }
    }
}

#[cfg(not(target_os = "linux"))]
mod platform {
    pub fn core_count() -> Option<usize> {
        std::thread::available_parallelism().ok().map(|n| n.get())
    }
    pub fn current_cpu() -> Option<usize> {
        None
    }
    pub fn pin(_core_id: usize) -> bool {
        false
    }
    pub fn unpin() -> bool {
        true
    }
}

/// Number of online CPU cores
pub fn core_count() -> Option<usize> {
    platform::core_count()
}

/// Pin the current thread to the core it is running on, falling back to
/// core 0. Returns the pinned core.
pub fn pin_to_current_core() -> Option<usize> {
    let core = platform::current_cpu().unwrap_or(0);
    platform::pin(core).then_some(core)
}

/// Restore the affinity saved by the last successful pin on this thread.
pub fn unpin() -> bool {
    platform::unpin()
}

/// RAII guard for CPU pinning - pins on creation, unpins on drop.
///
/// # Example
/// ```ignore
/// {
///     let _pin = CpuPinGuard::new(); // Thread pinned
///     // ... do timing measurements ...
/// } // Thread automatically unpinned here
/// ```
pub struct CpuPinGuard {
    pinned_core: Option<usize>,
}

impl CpuPinGuard {
    /// Pin to the current CPU core.
    pub fn new() -> Self {
        Self {
            pinned_core: pin_to_current_core(),
        }
    }

    /// Core this thread is pinned to, if pinning succeeded.
    pub fn core_id(&self) -> Option<usize> {
        self.pinned_core
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned_core.is_some()
    }
}

impl Drop for CpuPinGuard {
    fn drop(&mut self) {
        if self.pinned_core.is_some() {
            unpin();
        }
    }
}

impl Default for CpuPinGuard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_count() {
        assert!(core_count().is_some_and(|n| n >= 1));
    }

    #[test]
    fn test_pin_guard_unpins_on_drop() {
        let guard = CpuPinGuard::new();
        if guard.is_pinned() {
            assert!(guard.core_id().is_some());
        }
        drop(guard);
        // Nothing left to restore once the guard is gone.
        assert!(!cfg!(target_os = "linux") || !unpin());
    }
}
