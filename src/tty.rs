//! Terminal I/O utilities for CLI.
//!
//! Provides TTY detection, the banner and line-based prompts. Every prompt
//! returns `None` when the user cancels (EOF on stdin).

use std::io::{self, BufRead, IsTerminal, Write};

pub fn is_stdin_tty() -> bool {
    io::stdin().is_terminal()
}

pub fn is_stderr_tty() -> bool {
    io::stderr().is_terminal()
}

pub fn can_prompt() -> bool {
    is_stdin_tty() && is_stderr_tty()
}

fn read_line() -> orbit::Result<Option<String>> {
    let mut line = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| orbit::Error::internal_io(e.to_string(), Some("read input".to_string())))?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Ask for free text. An empty answer yields `default` when one is given.
pub fn prompt(message: &str, default: Option<&str>) -> orbit::Result<Option<String>> {
    match default {
        Some(d) => eprint!("{} ({}): ", message, d),
        None => eprint!("{}: ", message),
    }
    io::stderr().flush().ok();

    Ok(read_line()?.map(|answer| match (answer.is_empty(), default) {
        (true, Some(d)) => d.to_string(),
        _ => answer,
    }))
}

/// Pick one of `choices` (value, label) by number. Empty input picks the first.
/// Re-asks on out-of-range input.
pub fn select<'a>(message: &str, choices: &[(&'a str, String)]) -> orbit::Result<Option<&'a str>> {
    eprintln!("{}", message);
    for (i, (_, label)) in choices.iter().enumerate() {
        eprintln!("  {}) {}", i + 1, label);
    }

    loop {
        eprint!("Choose [1-{}] (1): ", choices.len());
        io::stderr().flush().ok();

        let Some(answer) = read_line()? else {
            return Ok(None);
        };
        if answer.is_empty() {
            return Ok(choices.first().map(|(value, _)| *value));
        }
        match answer.parse::<usize>() {
            Ok(n) if (1..=choices.len()).contains(&n) => return Ok(Some(choices[n - 1].0)),
            _ => {
                if let Some((value, _)) = choices.iter().find(|(value, _)| *value == answer) {
                    return Ok(Some(*value));
                }
                eprintln!("  Please enter a number between 1 and {}.", choices.len());
            }
        }
    }
}

/// Print status message to stderr if running in a terminal.
pub fn status(message: &str) {
    if is_stderr_tty() {
        eprintln!("{}", message);
    }
}

pub fn banner(version: &str) {
    status(&format!(
        "\n  ORBIT v{}\n  Scaffold web projects without the guesswork\n",
        version
    ));
}

// log_status! macro is defined in lib.rs (#[macro_export]) and available crate-wide.
