//! Table command - Print the transition table

use serde::Serialize;

use crate::domain::{is_terminal_state, TransitionTable};
use crate::errors::{DealgateError, Result};
use crate::schemas::NegotiationState;

#[derive(Debug, Serialize)]
struct TableRow {
    from: NegotiationState,
    terminal: bool,
    to: Vec<NegotiationState>,
}

fn rows(table: &TransitionTable) -> Vec<TableRow> {
    table
        .rows()
        .map(|(from, to)| TableRow {
            from,
            terminal: is_terminal_state(from),
            to,
        })
        .collect()
}

/// Render the table as aligned text lines
pub fn render(table: &TransitionTable) -> Vec<String> {
    rows(table)
        .into_iter()
        .map(|row| {
            let targets = if row.terminal {
                "(terminal)".to_string()
            } else {
                row.to
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            format!("{:<22} -> {}", row.from.as_str(), targets)
        })
        .collect()
}

/// Print the canonical transition table
pub fn run(json: bool) -> Result<()> {
    let table = TransitionTable::standard();
    if json {
        let out = serde_json::to_string_pretty(&rows(&table))
            .map_err(|e| DealgateError::InvalidJson(e.to_string()))?;
        println!("{}", out);
    } else {
        for line in render(&table) {
            println!("{}", line);
        }
    }
    Ok(())
}
