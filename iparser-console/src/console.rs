//! Line-mode driver feeding typed input to a machine one byte at a time.

use std::io::{BufRead, Write};

use anyhow::Context;
use iparser::Machine;

use crate::escape::{describe, unescape};

pub const PROMPT: &str = "Press <Enter> to exit...";

/// Read lines from `input` until an empty one, feeding every byte to
/// `machine` and reporting its state to `output` after each of them.
///
/// A malformed escape or a failed callback ends the session after the
/// reason was written; contract violations of the machine are returned.
pub fn run<R, W>(machine: &mut Machine, input: R, mut output: W) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "{PROMPT}")?;

    for line in input.lines() {
        let line = line.context("failed to read input")?;
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            break;
        }

        let bytes = match unescape(line) {
            Ok(bytes) => bytes,
            Err(err) => {
                writeln!(output, "error: {err}")?;
                break;
            },
        };

        if !feed(machine, &bytes, &mut output)? {
            break;
        }
    }

    output.flush()?;
    Ok(())
}

fn feed<W: Write>(
    machine: &mut Machine,
    bytes: &[u8],
    output: &mut W,
) -> anyhow::Result<bool> {
    for &byte in bytes {
        let ok = machine.parse(char::from(byte))?;
        report(machine, byte, output)?;

        if !ok {
            if let Some(failure) = machine.failure() {
                writeln!(output, "error: {failure}")?;
            }
            return Ok(false);
        }
    }
    Ok(true)
}

fn report<W: Write>(machine: &Machine, byte: u8, output: &mut W) -> anyhow::Result<()> {
    writeln!(output, "parser: {}", machine.status())?;
    writeln!(output, "symbol: {}", describe(byte))?;
    writeln!(output, "buffer: {:?}", machine.buffer())?;
    writeln!(output, "state:  {}", machine.current_state_name().unwrap_or("-"))?;
    writeln!(output)?;
    Ok(())
}
