//! Maintenance menu shown on interactive runs

use std::io::{self, BufRead, Write};

/// Choice from the maintenance menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Refresh,
    ChangePassword,
    ClearCache,
    /// Still renders a preview from whatever data is available
    Cancel,
}

/// Present the menu and read one choice; EOF or anything unknown cancels
pub fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<MenuAction> {
    writeln!(output, "Pi-hole Widget")?;
    writeln!(output, "  1) Refresh (query API)")?;
    writeln!(output, "  2) Change password")?;
    writeln!(output, "  3) Clear cache")?;
    writeln!(output, "  0) Cancel")?;
    write!(output, "> ")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(MenuAction::Cancel);
    }

    Ok(match line.trim() {
        "1" => MenuAction::Refresh,
        "2" => MenuAction::ChangePassword,
        "3" => MenuAction::ClearCache,
        _ => MenuAction::Cancel,
    })
}

/// Read a password from the first input line
///
/// Only the line terminator is stripped; blank input is rejected later by
/// the vault.
pub fn read_password<R: BufRead>(input: &mut R) -> io::Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    let trimmed = line.strip_suffix('\n').unwrap_or(&line);
    let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
    Ok(trimmed.to_string())
}
