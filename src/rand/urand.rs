//! Urandom pool - optional /dev/urandom entropy source.
//!
//! A small page-sized buffer is locked into memory when possible, handed out
//! eight bytes at a time, and refilled once exhausted. Consumed bytes are
//! wiped immediately; the whole buffer is wiped on shutdown.

use std::fs::File;
use std::io::Read;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use zeroize::Zeroize;

use crate::cli::prompts;

const POOL_SIZE: usize = 4096;
const DEVICE: &str = "/dev/urandom";

static ENABLED: AtomicBool = AtomicBool::new(false);
static POOL: Mutex<Option<Pool>> = Mutex::new(None);

struct Pool {
    file: File,
    bytes: Box<[u8; POOL_SIZE]>,
    pos: usize,
    locked: bool,
}

impl Pool {
    fn open() -> std::io::Result<Self> {
        let mut file = File::open(DEVICE)?;
        let mut bytes = Box::new([0u8; POOL_SIZE]);

        let locked =
            unsafe { libc::mlock(bytes.as_ptr() as *const libc::c_void, POOL_SIZE) == 0 };
        if !locked {
            prompts::mlock_failed();
        }

        file.read_exact(&mut bytes[..])?;
        Ok(Self {
            file,
            bytes,
            pos: 0,
            locked,
        })
    }

    fn next(&mut self) -> std::io::Result<u64> {
        if self.pos + 8 > POOL_SIZE {
            self.file.read_exact(&mut self.bytes[..])?;
            self.pos = 0;
        }
        let mut word = [0u8; 8];
        word.copy_from_slice(&self.bytes[self.pos..self.pos + 8]);
        self.bytes[self.pos..self.pos + 8].zeroize();
        self.pos += 8;
        Ok(u64::from_le_bytes(word))
    }
}

impl Drop for Pool {
    fn drop(&mut self) {
        self.bytes[..].zeroize();
        if self.locked {
            unsafe { libc::munlock(self.bytes.as_ptr() as *const libc::c_void, POOL_SIZE) };
        }
    }
}

pub fn is_available() -> bool {
    std::path::Path::new(DEVICE).exists()
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// Switch entropy to the urandom pool. Returns false if the device could not be read.
pub fn enable() -> bool {
    if !is_available() {
        return false;
    }
    let pool = match Pool::open() {
        Ok(p) => p,
        Err(e) => {
            prompts::warn(&format!("Failed to open {DEVICE}: {e}"));
            return false;
        }
    };
    match POOL.lock() {
        Ok(mut guard) => {
            *guard = Some(pool);
            ENABLED.store(true, Ordering::SeqCst);
            true
        }
        Err(_) => false,
    }
}

/// Drop the pool (wiping it) and fall back to hardware entropy.
pub fn disable() {
    ENABLED.store(false, Ordering::SeqCst);
    if let Ok(mut guard) = POOL.lock() {
        guard.take();
    }
}

/// Next word from the pool, or `None` when disabled or the device read failed.
pub fn rand() -> Option<u64> {
    let mut guard = POOL.lock().ok()?;
    guard.as_mut()?.next().ok()
}

/// Best-effort wipe from a signal handler: never blocks on the lock.
pub fn emergency_zero() {
    if let Ok(mut guard) = POOL.try_lock()
        && let Some(pool) = guard.as_mut()
    {
        pool.bytes[..].zeroize();
    }
}
