use std::io::{self, BufRead, Write};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use rdpgate_common::console::{Console, ConsoleError};

use crate::terminal::print;

/// The interactive terminal: line prompts on stdin, single keys through crossterm.
pub struct TerminalConsole;

impl Console for TerminalConsole {
    fn print(&mut self, line: &str) {
        print::print(line);
    }

    fn read_line(&mut self, prompt: &str) -> Result<String, ConsoleError> {
        show_prompt(prompt)?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(ConsoleError::Closed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn read_key(&mut self, prompt: &str) -> Result<char, ConsoleError> {
        show_prompt(prompt)?;

        let key = {
            let _raw = RawModeGuard::enable()?;
            wait_for_key()?
        };

        if !key.is_control() {
            show_prompt(&key.to_string())?;
        }
        Ok(key)
    }
}

fn show_prompt(prompt: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "{prompt}")?;
    stdout.flush()
}

/// Ctrl+C is read as a key in raw mode, so it answers like escape.
fn wait_for_key() -> io::Result<char> {
    loop {
        if let Event::Key(key_event) = event::read()? {
            if key_event.kind != KeyEventKind::Press {
                continue;
            }
            let is_ctrl_c = key_event.code == KeyCode::Char('c')
                && key_event.modifiers.contains(KeyModifiers::CONTROL);
            return Ok(match key_event.code {
                _ if is_ctrl_c => '\u{1b}',
                KeyCode::Char(c) => c,
                KeyCode::Enter => '\n',
                _ => '\u{1b}',
            });
        }
    }
}

struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}
