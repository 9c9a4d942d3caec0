//! Hardware cycle-counter entropy.

#[cfg(target_arch = "x86_64")]
pub const SOURCE: &str = "rdtsc";

#[cfg(target_arch = "aarch64")]
pub const SOURCE: &str = "cntvct";

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
pub const SOURCE: &str = "system clock";

#[cfg(target_arch = "x86_64")]
#[inline(always)]
pub fn cycles() -> u64 {
    unsafe { core::arch::x86_64::_rdtsc() }
}

#[cfg(target_arch = "aarch64")]
#[inline(always)]
pub fn cycles() -> u64 {
    let cnt: u64;
    unsafe { core::arch::asm!("mrs {}, cntvct_el0", out(reg) cnt) }
    cnt
}

// No user-readable counter here; nanosecond wall clock is the closest substitute.
#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
#[inline(always)]
pub fn cycles() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
