/// This implementation is a shortened version of the RedoxOS implementation found here:
///
/// https://gitlab.redox-os.org/redox-os/syscall/-/blob/master/src/io/mmio.rs
use core::{
    mem::MaybeUninit,
    ptr::{addr_of, addr_of_mut, read_volatile, write_volatile},
};

use crate::io::Io;

/// A memory-mapped register. Only ever used behind a pointer into a mapping.
#[repr(transparent)]
pub struct Mmio<T> {
    value: MaybeUninit<T>,
}

impl<T> Mmio<T> {
    /// Reinterpret `ptr` as a register.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for volatile reads and writes of `T`, aligned for `T`,
    /// and stay so for `'a`.
    pub unsafe fn from_ptr<'a>(ptr: *mut u8) -> &'a mut Mmio<T> {
        &mut *ptr.cast::<Mmio<T>>()
    }
}

impl<T> Io for Mmio<T>
where
    T: Copy + PartialEq,
{
    type Value = T;

    fn read(&self) -> T {
        unsafe { read_volatile(addr_of!(self.value).cast::<T>()) }
    }

    fn write(&mut self, value: T) {
        unsafe { write_volatile(addr_of_mut!(self.value).cast::<T>(), value) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_and_writes_through_pointer() {
        let mut backing: [u32; 2] = [0x1122_3344, 0];
        let base = backing.as_mut_ptr().cast::<u8>();

        let reg = unsafe { Mmio::<u32>::from_ptr(base) };
        assert_eq!(reg.read(), 0x1122_3344);

        let reg = unsafe { Mmio::<u16>::from_ptr(base.add(4)) };
        reg.write(0xbeef);
        assert_eq!(reg.read(), 0xbeef);
        assert_eq!(backing[1].to_ne_bytes()[..2], 0xbeef_u16.to_ne_bytes());
    }
}
