//! Typed register access and the read / write / verify sequence.

use core::fmt;
use std::io::Write;

use log::{debug, trace};

use crate::{
    args::{Arguments, Mode},
    error::{Error, Result},
    output::Formatter,
};

/// Width of a single register access.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RegisterSize {
    Bits8,
    Bits16,
    #[default]
    Bits32,
}

impl RegisterSize {
    pub const fn bits(self) -> u32 {
        match self {
            RegisterSize::Bits8 => 8,
            RegisterSize::Bits16 => 16,
            RegisterSize::Bits32 => 32,
        }
    }

    pub const fn bytes(self) -> usize {
        self.bits() as usize / 8
    }

    /// Number of hex digits needed to print a full register.
    pub const fn hex_digits(self) -> usize {
        self.bytes() * 2
    }

    /// Keep only the low bits that fit in a register of this width.
    pub const fn truncate(self, value: u32) -> u32 {
        match self {
            RegisterSize::Bits8 => value as u8 as u32,
            RegisterSize::Bits16 => value as u16 as u32,
            RegisterSize::Bits32 => value,
        }
    }
}

impl TryFrom<u32> for RegisterSize {
    type Error = Error;

    fn try_from(bits: u32) -> Result<Self> {
        match bits {
            8 => Ok(RegisterSize::Bits8),
            16 => Ok(RegisterSize::Bits16),
            32 => Ok(RegisterSize::Bits32),
            _ => Err(Error::RegisterSize(bits)),
        }
    }
}

impl fmt::Display for RegisterSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

/// Something registers can be read from and written to, addressed by byte offset.
///
/// [`crate::devmem::PhysMapping`] is the real implementation. Values are always
/// passed widened to `u32`; only the low `size.bits()` bits are meaningful.
pub trait RegisterBus {
    /// Number of addressable bytes.
    fn len(&self) -> usize;

    fn read(&self, offset: usize, size: RegisterSize) -> Result<u32>;

    fn write(&mut self, offset: usize, size: RegisterSize, value: u32) -> Result<()>;
}

/// Reject registers whose physical address is not a multiple of the access width.
pub fn check_alignment(args: &Arguments) -> Result<()> {
    let address = args.address as u64 + args.offset as u64;
    let size = args.register_size;
    if address % size.bytes() as u64 != 0 {
        return Err(Error::Misaligned { address, size });
    }
    Ok(())
}

/// Ensure `size` bytes starting at `offset` lie within `len` bytes.
pub fn check_bounds(len: usize, offset: usize, size: RegisterSize) -> Result<()> {
    match offset.checked_add(size.bytes()) {
        Some(end) if end <= len => Ok(()),
        _ => Err(Error::OutOfBounds { offset, size, len }),
    }
}

pub fn read_register<B: RegisterBus + ?Sized>(bus: &B, args: &Arguments) -> Result<u32> {
    check_alignment(args)?;
    let value = bus.read(args.offset as usize, args.register_size)?;
    trace!(
        "read {} at {:#010x}+{:#x}: {:#x}",
        args.register_size,
        args.address,
        args.offset,
        value
    );
    Ok(value)
}

/// Store the low bits of `args.data` into the register.
pub fn write_register<B: RegisterBus + ?Sized>(bus: &mut B, args: &Arguments) -> Result<()> {
    check_alignment(args)?;
    let value = args.register_size.truncate(args.data);
    if value != args.data {
        debug!(
            "{:#x} truncated to {:#x} for a {} register",
            args.data, value, args.register_size
        );
    }
    trace!(
        "write {} at {:#010x}+{:#x}: {:#x}",
        args.register_size,
        args.address,
        args.offset,
        value
    );
    bus.write(args.offset as usize, args.register_size, value)
}

/// Read the register, and in write mode write it and read it back.
///
/// Returns the last value read, which after a write is whatever the register
/// holds now rather than the value that was requested.
pub fn run<B, W>(bus: &mut B, args: &Arguments, out: &mut Formatter<W>) -> Result<u32>
where
    B: RegisterBus + ?Sized,
    W: Write,
{
    let value = read_register(bus, args)?;

    if args.mode == Mode::Read {
        out.access(args, value)?;
        return Ok(value);
    }

    // Simple output shows the confirmed value only
    if !out.is_simple() {
        out.access(args, value)?;
    }
    out.write_notice()?;
    write_register(bus, args)?;

    let confirmed = read_register(bus, args)?;
    if confirmed != args.register_size.truncate(args.data) {
        debug!(
            "register reads back {:#x} after writing {:#x}",
            confirmed, args.data
        );
    }
    out.access(args, confirmed)?;
    Ok(confirmed)
}
