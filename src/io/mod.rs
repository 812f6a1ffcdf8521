/// Volatile register access, modeled after:
///
/// * IO trait from RedoxOS https://gitlab.redox-os.org/redox-os/syscall/-/blob/master/src/io
/// * volatile_register crate https://docs.rs/volatile-register/latest/volatile_register/
pub mod io;
pub mod mmio;

pub use self::{io::Io, mmio::Mmio};
