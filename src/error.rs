use std::{io, path::PathBuf};

use thiserror::Error;

use crate::register::RegisterSize;

/// An error returned from parsing the command line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgumentError {
    /// No nonzero address was given.
    #[error("no address specified")]
    NoAddress,
    /// A numeric token has trailing garbage or does not fit in 32 bits.
    #[error("invalid argument: {0}")]
    InvalidNumber(String),
    /// An option like `w=` has nothing after the equal sign.
    #[error("no argument found after {0}")]
    MissingValue(String),
    /// `r=` was given something other than 8, 16 or 32.
    #[error("register-size limited to 8, 16 and 32 bit (default = 32 bit): {0}")]
    UnsupportedRegisterSize(String),
    /// An option letter other than `w` or `r`.
    #[error("unknown option: {0}")]
    UnknownOption(String),
    /// A third positional token.
    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    /// The physical-memory device could not be opened.
    #[error("cannot open \"{path}\": {source}", path = .path.display())]
    DeviceOpen { path: PathBuf, source: io::Error },

    /// mmap() reported failure.
    #[error("memory map of {len:#x} bytes at {address:#010x} failed: {source}")]
    Mapping {
        address: u64,
        len: usize,
        source: io::Error,
    },

    /// The register address is not a multiple of the access width.
    #[error("register address {address:#010x} is not aligned for a {size} access")]
    Misaligned { address: u64, size: RegisterSize },

    /// The access would leave the mapped window.
    #[error("{size} access at offset {offset:#x} is outside the {len:#x} byte mapping")]
    OutOfBounds {
        offset: usize,
        size: RegisterSize,
        len: usize,
    },

    #[error("wrong register size: {0}")]
    RegisterSize(u32),

    #[error("cannot write output: {0}")]
    Output(#[from] io::Error),
}

pub type Result<T> = core::result::Result<T, Error>;
