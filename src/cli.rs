//! One invocation of the tool, from argument list to exit status.

use std::io::Write;

use log::debug;

use crate::{
    args::{self, Arguments, Command},
    config::Settings,
    devmem::PhysMapping,
    error::Result,
    output::{self, Formatter},
    register,
};

pub const EXIT_SUCCESS: u8 = 0;
/// exit(-1), as the shell sees it.
pub const EXIT_FAILURE: u8 = -1i8 as u8;

/// Bytes past `args.address` that have to be mapped to reach the register.
pub fn window_len(args: &Arguments) -> usize {
    (args.offset as usize).saturating_add(args.register_size.bytes())
}

fn access<W: Write>(args: &Arguments, settings: &Settings, out: &mut W) -> Result<()> {
    let mut out = Formatter::new(out, args.simple);

    if args.verbose {
        out.arguments(args)?;
    }
    register::check_alignment(args)?;

    let mut mapping = PhysMapping::open(&settings.device, args.address as u64, window_len(args))?;
    if args.verbose {
        out.mapping(mapping.as_ptr() as usize)?;
    }

    let value = register::run(&mut mapping, args, &mut out)?;
    debug!(
        "{:#010x}+{:#x} = {:#x}",
        mapping.address(),
        args.offset,
        value
    );
    Ok(())
}

fn fail<W: Write>(err: &crate::Error, out: &mut W) -> u8 {
    debug!("{:?}", err);
    let _ = writeln!(out, " memctl_ERROR: {}", err);
    let _ = writeln!(out, " memctl_ERROR: [-1] exit program ...");
    EXIT_FAILURE
}

/// Run the tool on `tokens` (without the program name) and return the exit status.
///
/// `settings` is called once with the verbose flag, before anything is mapped.
pub fn execute<I, S, F, W>(tokens: I, settings: F, out: &mut W) -> u8
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    F: FnOnce(bool) -> Settings,
    W: Write,
{
    let args = match args::parse(tokens) {
        Ok(Command::Run(args)) => args,
        Ok(Command::Help { too_few_arguments }) => {
            if too_few_arguments {
                let _ = writeln!(out, " memctl_ERROR: too few arguments given");
            }
            let _ = output::print_help(out);
            return EXIT_SUCCESS;
        }
        Err(err) => {
            settings(false);
            return fail(&err, out);
        }
    };

    let settings = settings(args.verbose);
    debug!("{:?}, {:?}", args, settings);

    match access(&args, &settings, out) {
        Ok(()) => EXIT_SUCCESS,
        Err(err) => fail(&err, out),
    }
}
