//! Everything memctl prints on stdout.

use std::io::{self, Write};

use crate::{
    args::{Arguments, Mode},
    register::RegisterSize,
};

const USAGE: &str = "
 memctl is a commandline tool which allows you to read or write directly
 to hardware registers. It uses the mmap system call to map the
 register you want to use.

 USAGE: memctl {ADDRESS} [OFFSET] [OPTIONS]
      arguments in curly brackets are necessary, but those in square
      brackets are optional. ADDRESS and OFFSET are hexadecimal.

 OPTIONS:
      w=[HEX_DATA]  ... hexadecimal data to write
      r=[REG_SIZE]  ... size of the register in bit (8, 16 or 32)
      -v, --verbose ... print the parsed arguments and the mapping
      -s, --simple  ... print only the register content
      -h, --help    ... print this help

 ENVIRONMENT:
      MEMCTL_DEVICE ... memory device to map (default /dev/mem)
      MEMCTL_LOG    ... log level on stderr (off, error, warn, info, debug, trace)

";

const TABLE_HEADER: &str = " |---address--|--offset--|--content---|";

pub fn print_help<W: Write>(out: &mut W) -> io::Result<()> {
    out.write_all(USAGE.as_bytes())
}

/// Renders register accesses either as table rows or as bare hex tokens.
pub struct Formatter<W> {
    out: W,
    simple: bool,
    header_printed: bool,
}

impl<W: Write> Formatter<W> {
    pub fn new(out: W, simple: bool) -> Formatter<W> {
        Formatter {
            out,
            simple,
            header_printed: false,
        }
    }

    pub fn is_simple(&self) -> bool {
        self.simple
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Print one register value.
    pub fn access(&mut self, args: &Arguments, value: u32) -> io::Result<()> {
        let digits = args.register_size.hex_digits();
        if self.simple {
            return writeln!(self.out, "{:0digits$X}", value, digits = digits);
        }

        if !self.header_printed {
            writeln!(self.out, "{}", TABLE_HEADER)?;
            self.header_printed = true;
        }
        // Content column is 12 wide, the hex number is centered in it.
        let pad = match args.register_size {
            RegisterSize::Bits32 => 1,
            RegisterSize::Bits16 => 3,
            RegisterSize::Bits8 => 4,
        };
        writeln!(
            self.out,
            " | 0x{:08X} |  0x{:04X}  |{:pad$}0x{:0digits$X}{:pad$}|",
            args.address,
            args.offset,
            "",
            value,
            "",
            pad = pad,
            digits = digits,
        )
    }

    pub fn write_notice(&mut self) -> io::Result<()> {
        if self.simple {
            return Ok(());
        }
        writeln!(self.out, "  write data to register ...")
    }

    pub fn arguments(&mut self, args: &Arguments) -> io::Result<()> {
        let mode = match args.mode {
            Mode::Read => "read",
            Mode::Write => "write",
        };
        writeln!(self.out, " -------arguments-------")?;
        writeln!(self.out, "  address = 0x{:08X}", args.address)?;
        writeln!(self.out, "  offset  = 0x{:08X}", args.offset)?;
        writeln!(self.out, "  data    = 0x{:08X}", args.data)?;
        writeln!(self.out, "  mode    = {}", mode)?;
        writeln!(self.out, "  regsize = {}", args.register_size.bits())
    }

    /// `virt` is where `args.address` ended up in our address space.
    pub fn mapping(&mut self, virt: usize) -> io::Result<()> {
        writeln!(self.out, " --------mapping--------")?;
        writeln!(self.out, " address mapped to 0x{:08X}", virt)
    }
}
