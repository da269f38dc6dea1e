//! Interactive confirmation before a destructive unlock.

use std::io::{BufRead, Write};

/// The only answer accepted as consent.
pub const AFFIRMATIVE_ANSWER: &str = "yes";

const QUESTION: &str = "Do you really want to force-unlock?";

/// Outcome of the confirmation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    /// `--force` was given; the operator was not asked.
    ForcedSkip,
    /// The operator typed exactly `yes`.
    Granted,
    /// The unlock must not happen.
    Denied(Denial),
}

/// Why the confirmation was denied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// The operator answered, but not with `yes`.
    Declined { answer: String },
    /// No answer could be obtained: closed stream or I/O error.
    InputFailed { message: String },
}

/// Ask the operator to confirm the unlock.
///
/// With `force` set this returns [`Confirmation::ForcedSkip`] without touching
/// `input` or `output`. Otherwise it writes the prompt and blocks until one
/// line is read. Only the line terminator is stripped from the answer, so the
/// comparison against `yes` is exact and case-sensitive.
pub fn confirm<R, W>(force: bool, description: &str, input: &mut R, output: &mut W) -> Confirmation
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    if force {
        return Confirmation::ForcedSkip;
    }

    if let Err(e) = write_prompt(description, output) {
        return Confirmation::Denied(Denial::InputFailed {
            message: format!("failed to write prompt: {}", e),
        });
    }

    // Bytes, not a String: an answer that is not UTF-8 is still an answer
    let mut line = Vec::new();
    match input.read_until(b'\n', &mut line) {
        Ok(0) => Confirmation::Denied(Denial::InputFailed {
            message: "input stream closed before an answer was given".to_string(),
        }),
        Ok(_) => {
            let answer = strip_line_terminator(&line);
            if answer == AFFIRMATIVE_ANSWER.as_bytes() {
                Confirmation::Granted
            } else {
                Confirmation::Denied(Denial::Declined {
                    answer: String::from_utf8_lossy(answer).into_owned(),
                })
            }
        }
        Err(e) => Confirmation::Denied(Denial::InputFailed {
            message: e.to_string(),
        }),
    }
}

fn write_prompt<W: Write + ?Sized>(description: &str, output: &mut W) -> std::io::Result<()> {
    writeln!(output, "{}", QUESTION)?;
    for line in description.lines() {
        if line.is_empty() {
            writeln!(output)?;
        } else {
            writeln!(output, "  {}", line)?;
        }
    }
    writeln!(
        output,
        "  Only '{}' will be accepted to confirm.",
        AFFIRMATIVE_ANSWER
    )?;
    writeln!(output)?;
    write!(output, "  Enter a value: ")?;
    output.flush()
}

fn strip_line_terminator(line: &[u8]) -> &[u8] {
    match line.strip_suffix(b"\n") {
        Some(rest) => rest.strip_suffix(b"\r").unwrap_or(rest),
        None => line,
    }
}
