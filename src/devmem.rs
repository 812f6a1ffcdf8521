//! Mapping physical memory through the memory device.
//!
//! The device is normally `/dev/mem`, which needs root (or `CAP_SYS_RAWIO`).
//! Any other mappable file works the same way, which is what the tests use.

use std::{
    fs::OpenOptions,
    io,
    os::unix::{fs::OpenOptionsExt, io::AsRawFd},
    path::Path,
    ptr::{self, NonNull},
};

use log::{debug, trace};

use crate::{
    error::{Error, Result},
    io::{Io, Mmio},
    register::{check_bounds, RegisterBus, RegisterSize},
};

pub const DEFAULT_DEVICE: &str = "/dev/mem";

pub fn page_size() -> usize {
    // sysconf() cannot fail for _SC_PAGESIZE on Linux
    match unsafe { libc::sysconf(libc::_SC_PAGESIZE) } {
        size if size > 0 => size as usize,
        _ => 4096,
    }
}

/// Page-aligned region that has to be mapped to reach `len` bytes at an address.
#[derive(Debug, PartialEq, Eq)]
struct Window {
    /// Physical address of the first mapped page.
    aligned: u64,
    /// Distance from `aligned` to the requested address.
    page_offset: usize,
    /// Whole pages covering the requested bytes.
    map_len: usize,
}

impl Window {
    /// `None` if the mapping length does not fit in `usize`.
    fn new(address: u64, len: usize, page_size: usize) -> Option<Window> {
        let page_mask = page_size - 1;
        let aligned = address & !(page_mask as u64);
        let page_offset = (address - aligned) as usize;
        let map_len = page_offset
            .checked_add(len.max(1))?
            .checked_add(page_mask)?
            & !page_mask;
        Some(Window {
            aligned,
            page_offset,
            map_len,
        })
    }
}

// The 64-bit offset variant keeps addresses >= 2 GiB reachable where off_t is 32 bits
#[cfg(any(all(target_os = "linux", target_env = "gnu"), target_os = "android"))]
type FileOffset = libc::off64_t;
#[cfg(not(any(all(target_os = "linux", target_env = "gnu"), target_os = "android")))]
type FileOffset = libc::off_t;

unsafe fn mmap_shared(fd: libc::c_int, len: usize, offset: u64) -> io::Result<*mut libc::c_void> {
    let offset = FileOffset::try_from(offset)
        .map_err(|_| io::Error::from(io::ErrorKind::InvalidInput))?;

    #[cfg(any(all(target_os = "linux", target_env = "gnu"), target_os = "android"))]
    let map = libc::mmap64(
        ptr::null_mut(),
        len,
        libc::PROT_READ | libc::PROT_WRITE,
        libc::MAP_SHARED,
        fd,
        offset,
    );
    #[cfg(not(any(all(target_os = "linux", target_env = "gnu"), target_os = "android")))]
    let map = libc::mmap(
        ptr::null_mut(),
        len,
        libc::PROT_READ | libc::PROT_WRITE,
        libc::MAP_SHARED,
        fd,
        offset,
    );

    if map == libc::MAP_FAILED {
        return Err(io::Error::last_os_error());
    }
    Ok(map)
}

/// A window of physical memory starting at `address`, mapped into our address space.
///
/// The mapping itself covers whole pages; only the first `len` bytes from
/// `address` are reachable through [`RegisterBus`]. It is unmapped on drop.
pub struct PhysMapping {
    /// Start of the page-aligned mapping returned by mmap().
    map_base: NonNull<u8>,
    map_len: usize,
    /// Distance from `map_base` to `address`.
    page_offset: usize,
    address: u64,
    len: usize,
}

impl PhysMapping {
    /// Map `len` bytes of `device` starting at physical `address`.
    pub fn open(device: &Path, address: u64, len: usize) -> Result<PhysMapping> {
        // O_SYNC makes /dev/mem mappings uncached, which registers need
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_SYNC)
            .open(device)
            .map_err(|source| Error::DeviceOpen {
                path: device.to_path_buf(),
                source,
            })?;

        let window = Window::new(address, len, page_size()).ok_or_else(|| Error::Mapping {
            address,
            len,
            source: io::Error::from(io::ErrorKind::InvalidInput),
        })?;
        let map_len = window.map_len;
        let page_offset = window.page_offset;

        let mapping_error = |source| Error::Mapping {
            address,
            len: map_len,
            source,
        };
        let map = unsafe { mmap_shared(file.as_raw_fd(), map_len, window.aligned) }
            .map_err(mapping_error)?;
        let map_base = NonNull::new(map.cast::<u8>())
            .ok_or_else(|| mapping_error(io::Error::from(io::ErrorKind::InvalidData)))?;

        debug!(
            "mapped {:#x} bytes of {} at {:#x} to {:p}",
            map_len,
            device.display(),
            window.aligned,
            map_base
        );

        // The mapping stays valid after the descriptor is closed
        drop(file);

        Ok(PhysMapping {
            map_base,
            map_len,
            page_offset,
            address,
            len,
        })
    }

    /// Physical address of the first byte of the window.
    pub fn address(&self) -> u64 {
        self.address
    }

    /// Virtual address of the first byte of the window.
    pub fn as_ptr(&self) -> *mut u8 {
        unsafe { self.map_base.as_ptr().add(self.page_offset) }
    }

    /// Pointer to the register at `offset`, after bounds and alignment checks.
    fn register_ptr(&self, offset: usize, size: RegisterSize) -> Result<*mut u8> {
        check_bounds(self.len, offset, size)?;
        let ptr = unsafe { self.as_ptr().add(offset) };
        if ptr.align_offset(size.bytes()) != 0 {
            return Err(Error::Misaligned {
                address: self.address + offset as u64,
                size,
            });
        }
        Ok(ptr)
    }
}

impl RegisterBus for PhysMapping {
    fn len(&self) -> usize {
        self.len
    }

    fn read(&self, offset: usize, size: RegisterSize) -> Result<u32> {
        let ptr = self.register_ptr(offset, size)?;
        trace!("volatile {} read at {:p}", size, ptr);
        let value = unsafe {
            match size {
                RegisterSize::Bits8 => Mmio::<u8>::from_ptr(ptr).read() as u32,
                RegisterSize::Bits16 => Mmio::<u16>::from_ptr(ptr).read() as u32,
                RegisterSize::Bits32 => Mmio::<u32>::from_ptr(ptr).read(),
            }
        };
        Ok(value)
    }

    fn write(&mut self, offset: usize, size: RegisterSize, value: u32) -> Result<()> {
        let ptr = self.register_ptr(offset, size)?;
        trace!("volatile {} write at {:p}", size, ptr);
        unsafe {
            match size {
                RegisterSize::Bits8 => Mmio::<u8>::from_ptr(ptr).write(value as u8),
                RegisterSize::Bits16 => Mmio::<u16>::from_ptr(ptr).write(value as u16),
                RegisterSize::Bits32 => Mmio::<u32>::from_ptr(ptr).write(value),
            }
        }
        Ok(())
    }
}

impl Drop for PhysMapping {
    fn drop(&mut self) {
        let ret = unsafe { libc::munmap(self.map_base.as_ptr().cast(), self.map_len) };
        if ret != 0 {
            debug!("munmap failed: {}", io::Error::last_os_error());
        }
    }
}
