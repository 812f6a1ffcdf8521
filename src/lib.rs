//! memctl reads and writes single hardware registers through `/dev/mem`.
//!
//! The stages are kept apart so everything except [`devmem`] can be driven
//! without real hardware:
//!
//! * [`args`] turns the command line into [`args::Arguments`]
//! * [`devmem`] maps the physical window holding the register
//! * [`register`] performs the read / write / verify sequence on any [`register::RegisterBus`]
//! * [`output`] prints the results
//! * [`cli`] ties them together and decides the exit status

pub mod args;
pub mod cli;
pub mod config;
pub mod devmem;
pub mod error;
pub mod io;
pub mod logger;
pub mod output;
pub mod register;

pub use error::{ArgumentError, Error, Result};
