//! Interactive day-count prompt

use super::ui;
use crate::core::batch::MAX_DAYS;
use anyhow::{Context, Result, bail};
use std::io::{BufRead, Write};

pub const PROMPT: &str = "Set number of days you would like to get currency rates for (up to 10), or type 'exit' to quit: ";
pub const OUT_OF_RANGE: &str = "Please enter a number between 1 and 10.";
pub const INVALID_INPUT: &str =
    "Invalid input. Please enter a number between 1 and 10 or type 'exit' to quit.";
pub const EXITING: &str = "Exiting program.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaysChoice {
    Days(u32),
    Exit,
}

/// Interprets one line of user input.
pub fn parse_days_input(input: &str) -> Result<DaysChoice> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("exit") {
        return Ok(DaysChoice::Exit);
    }

    let days: i64 = input.parse().map_err(|_| anyhow::anyhow!(INVALID_INPUT))?;
    if !(1..=i64::from(MAX_DAYS)).contains(&days) {
        bail!(OUT_OF_RANGE);
    }
    Ok(DaysChoice::Days(days as u32))
}

/// Prompts until a valid day count or `exit` is entered. End of input counts
/// as `exit`.
pub fn prompt_for_days<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<DaysChoice> {
    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .context("Failed to read from standard input")?;
        if read == 0 {
            writeln!(output)?;
            writeln!(output, "{}", ui::style_text(EXITING, ui::StyleType::Subtle))?;
            return Ok(DaysChoice::Exit);
        }

        match parse_days_input(&line) {
            Ok(DaysChoice::Exit) => {
                writeln!(output, "{}", ui::style_text(EXITING, ui::StyleType::Subtle))?;
                return Ok(DaysChoice::Exit);
            }
            Ok(choice) => return Ok(choice),
            Err(e) => writeln!(
                output,
                "{}",
                ui::style_text(&e.to_string(), ui::StyleType::Error)
            )?,
        }
    }
}
