//! Simple command that prints one or '-n count' identifiers of the kind chosen by '-k'
//!
//! Kinds: `v7` (default), `v4`, `v1`, and `compact`. Compact identifiers use node id 0.

use std::{env, io, io::Write, process::ExitCode};

#[derive(Copy, Clone, Debug)]
enum Kind {
    V1,
    V4,
    V7,
    Compact,
}

#[derive(Debug)]
struct Options {
    count: usize,
    kind: Kind,
}

fn main() -> io::Result<ExitCode> {
    let opts = {
        let mut args = env::args();
        let program = args.next();
        match parse_args(args) {
            Ok(opts) => opts,
            Err(message) => {
                eprintln!("Error: {}", message);
                eprintln!(
                    "Usage: {} [-n count] [-k v1|v4|v7|compact]",
                    program.as_deref().unwrap_or("uniqid")
                );
                return Ok(ExitCode::FAILURE);
            }
        }
    };

    let mut buf = io::BufWriter::new(io::stdout());
    for _ in 0..opts.count {
        match opts.kind {
            Kind::V1 => writeln!(buf, "{}", uniqid::uuid1())?,
            Kind::V4 => writeln!(buf, "{}", uniqid::uuid4())?,
            Kind::V7 => writeln!(buf, "{}", uniqid::uuid7())?,
            Kind::Compact => match uniqid::compact_id(0) {
                Ok(id) => writeln!(buf, "{}", id)?,
                Err(err) => {
                    eprintln!("Error: {}", err);
                    return Ok(ExitCode::FAILURE);
                }
            },
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut count = None;
    let mut kind = None;
    while let Some(arg) = args.next() {
        let (name, slot_is_set) = match arg.as_str() {
            "-n" => ('n', count.is_some()),
            "-k" => ('k', kind.is_some()),
            _ => return Err(format!("unrecognized argument '{}'", arg)),
        };
        if slot_is_set {
            return Err(format!("option '{}' given more than once", name));
        }
        let Some(value) = args.next() else {
            return Err(format!("argument to option '{}' missing", name));
        };
        if name == 'n' {
            let Ok(c) = value.parse() else {
                return Err(format!("invalid argument to option 'n': '{}'", value));
            };
            count.replace(c);
        } else {
            kind.replace(match value.as_str() {
                "v1" => Kind::V1,
                "v4" => Kind::V4,
                "v7" => Kind::V7,
                "compact" => Kind::Compact,
                _ => return Err(format!("invalid argument to option 'k': '{}'", value)),
            });
        }
    }
    Ok(Options {
        count: count.unwrap_or(1),
        kind: kind.unwrap_or(Kind::V7),
    })
}
