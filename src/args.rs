//! Command line parsing.
//!
//! ```text
//! memctl {ADDRESS} [OFFSET] [OPTIONS]
//! ```
//!
//! ADDRESS and OFFSET are hexadecimal. Options are either flags (`-v`, `-s`) or
//! `<letter>=<value>` pairs (`w=1f`, `r=16`).

use crate::{
    error::{ArgumentError, Result},
    register::RegisterSize,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Read,
    /// Write `data`, then read the register back.
    Write,
}

/// Everything a single invocation needs to know.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Arguments {
    /// Physical base address.
    pub address: u32,
    /// Byte offset of the register from `address`.
    pub offset: u32,
    /// Value to write in [`Mode::Write`].
    pub data: u32,
    pub mode: Mode,
    pub register_size: RegisterSize,
    pub verbose: bool,
    pub simple: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    /// Print the usage and exit successfully.
    Help { too_few_arguments: bool },
    Run(Arguments),
}

/// Parse the argument list, without the program name.
pub fn parse<I, S>(tokens: I) -> Result<Command>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let tokens: Vec<S> = tokens.into_iter().collect();
    if tokens.is_empty() {
        return Ok(Command::Help {
            too_few_arguments: true,
        });
    }
    if tokens
        .iter()
        .any(|token| matches!(token.as_ref(), "-h" | "--help"))
    {
        return Ok(Command::Help {
            too_few_arguments: false,
        });
    }

    let mut args = Arguments::default();
    let mut positionals = 0;
    for token in tokens.iter().map(AsRef::as_ref) {
        match token {
            "-v" | "--verbose" | "-d" | "--debug" => args.verbose = true,
            "-s" | "--simple" => args.simple = true,
            _ if token.as_bytes().get(1) == Some(&b'=') => parse_option(token, &mut args)?,
            _ => {
                let value = parse_hex(token)?;
                match positionals {
                    0 => args.address = value,
                    1 => args.offset = value,
                    _ => return Err(ArgumentError::UnexpectedArgument(token.into()).into()),
                }
                positionals += 1;
            }
        }
    }

    // Zero doubles as "not given", so an explicit 0 is rejected too.
    if args.address == 0 {
        return Err(ArgumentError::NoAddress.into());
    }

    Ok(Command::Run(args))
}

fn parse_option(token: &str, args: &mut Arguments) -> Result<()> {
    let value = &token[2..];
    if value.is_empty() {
        return Err(ArgumentError::MissingValue(token.into()).into());
    }

    match token.as_bytes()[0].to_ascii_lowercase() {
        b'w' => {
            args.mode = Mode::Write;
            args.data =
                parse_hex(value).map_err(|_| ArgumentError::InvalidNumber(token.into()))?;
        }
        b'r' => {
            let bits: u32 = value
                .parse()
                .map_err(|_| ArgumentError::InvalidNumber(token.into()))?;
            args.register_size = RegisterSize::try_from(bits)
                .map_err(|_| ArgumentError::UnsupportedRegisterSize(token.into()))?;
        }
        _ => return Err(ArgumentError::UnknownOption(token.into()).into()),
    }
    Ok(())
}

/// Parse a 32-bit hexadecimal number, with or without a `0x` prefix.
pub fn parse_hex(token: &str) -> core::result::Result<u32, ArgumentError> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ArgumentError::InvalidNumber(token.into()));
    }
    u32::from_str_radix(digits, 16).map_err(|_| ArgumentError::InvalidNumber(token.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn run(tokens: &[&str]) -> Arguments {
        match parse(tokens.iter().copied()) {
            Ok(Command::Run(args)) => args,
            other => panic!("unexpected parse result: {:?}", other),
        }
    }

    fn argument_error(tokens: &[&str]) -> ArgumentError {
        match parse(tokens.iter().copied()) {
            Err(Error::Argument(err)) => err,
            other => panic!("expected an argument error, got {:?}", other),
        }
    }

    #[test]
    fn address_and_offset_default_to_a_32_bit_read() {
        let args = run(&["44E07000", "13c"]);
        assert_eq!(
            args,
            Arguments {
                address: 0x44e0_7000,
                offset: 0x13c,
                mode: Mode::Read,
                register_size: RegisterSize::Bits32,
                ..Default::default()
            }
        );

        let args = run(&["0x481ac000"]);
        assert_eq!(args.address, 0x481a_c000);
        assert_eq!(args.offset, 0);
    }

    #[test]
    fn help_wins_over_everything_else() {
        for tokens in [
            &["-h"][..],
            &["--help"][..],
            &["44e07000", "-h"][..],
            &["r=7", "--help", "zz"][..],
        ] {
            assert_eq!(
                parse(tokens.iter().copied()).unwrap(),
                Command::Help {
                    too_few_arguments: false
                }
            );
        }
    }

    #[test]
    fn no_arguments_prints_usage() {
        let empty: [&str; 0] = [];
        assert_eq!(
            parse(empty).unwrap(),
            Command::Help {
                too_few_arguments: true
            }
        );
    }

    #[test]
    fn flags_are_order_independent() {
        let a = run(&["-v", "44e07000", "-s", "4"]);
        let b = run(&["44e07000", "4", "--simple", "--verbose"]);
        assert_eq!(a, b);
        assert!(a.verbose && a.simple);
        assert!(run(&["44e07000", "--debug"]).verbose);
    }

    #[test]
    fn write_option_selects_write_mode() {
        let args = run(&["44e07000", "w=ABCD"]);
        assert_eq!(args.mode, Mode::Write);
        assert_eq!(args.data, 0xabcd);

        let args = run(&["W=0x1", "44e07000", "R=8"]);
        assert_eq!(args.mode, Mode::Write);
        assert_eq!(args.data, 1);
        assert_eq!(args.register_size, RegisterSize::Bits8);
    }

    #[test]
    fn register_size_option() {
        assert_eq!(run(&["44e07000", "r=16"]).register_size, RegisterSize::Bits16);
        assert_eq!(run(&["44e07000", "r=8"]).register_size, RegisterSize::Bits8);
        assert_eq!(run(&["44e07000", "r=32"]).register_size, RegisterSize::Bits32);
        assert_eq!(run(&["44e07000", "r=16"]).mode, Mode::Read);

        assert_eq!(
            argument_error(&["44e07000", "r=7"]),
            ArgumentError::UnsupportedRegisterSize("r=7".into())
        );
        assert_eq!(
            argument_error(&["44e07000", "r=1x"]),
            ArgumentError::InvalidNumber("r=1x".into())
        );
    }

    #[test]
    fn zero_address_is_treated_as_missing() {
        assert_eq!(argument_error(&["0", "10"]), ArgumentError::NoAddress);
        assert_eq!(argument_error(&["-v"]), ArgumentError::NoAddress);
        assert_eq!(argument_error(&["r=16", "w=1"]), ArgumentError::NoAddress);
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        assert_eq!(
            argument_error(&["44e07zzz"]),
            ArgumentError::InvalidNumber("44e07zzz".into())
        );
        assert_eq!(
            argument_error(&["44e07000", "w=12g"]),
            ArgumentError::InvalidNumber("w=12g".into())
        );
        assert_eq!(
            argument_error(&["44e07000", "w="]),
            ArgumentError::MissingValue("w=".into())
        );
        assert_eq!(
            argument_error(&["44e07000", "x=1"]),
            ArgumentError::UnknownOption("x=1".into())
        );
        assert_eq!(
            argument_error(&["44e07000", "4", "8"]),
            ArgumentError::UnexpectedArgument("8".into())
        );
        assert_eq!(
            argument_error(&["100000000"]),
            ArgumentError::InvalidNumber("100000000".into())
        );
        assert_eq!(
            argument_error(&["0x"]),
            ArgumentError::InvalidNumber("0x".into())
        );
    }

    #[test]
    fn parse_hex_accepts_both_prefix_cases() {
        assert_eq!(parse_hex("ff").unwrap(), 0xff);
        assert_eq!(parse_hex("0xFF").unwrap(), 0xff);
        assert_eq!(parse_hex("0XfF").unwrap(), 0xff);
        assert!(parse_hex("+ff").is_err());
    }
}
