//! Line-oriented edit scripts driving a `Calibrator`, as a form front end would.

use std::io::{BufRead, Write};

use injector_core::{Calibrator, DisplayPrecision, EngineError, Field, RowId};

use crate::render;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Append,
    Set { id: RowId, field: Field, raw: String },
    Include { id: RowId, included: bool },
    Remove { id: RowId },
    Show,
}

fn parse_id(tok: Option<&str>) -> eyre::Result<RowId> {
    let tok = tok.ok_or_else(|| eyre::eyre!("missing row id"))?;
    tok.parse::<RowId>()
        .map_err(|_| eyre::eyre!("row id must be a non-negative integer, got {tok:?}"))
}

fn parse_flag(tok: Option<&str>) -> eyre::Result<bool> {
    match tok.map(str::to_ascii_lowercase).as_deref() {
        Some("on" | "true" | "yes" | "1") => Ok(true),
        Some("off" | "false" | "no" | "0") => Ok(false),
        Some(other) => eyre::bail!("include flag must be on|off, got {other:?}"),
        None => eyre::bail!("missing include flag"),
    }
}

/// Parse one script line; `Ok(None)` for blanks and comments.
pub fn parse_line(line: &str) -> eyre::Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(None);
    };
    let cmd = match verb.to_ascii_lowercase().as_str() {
        "append" => Command::Append,
        "show" => Command::Show,
        "set" => {
            let id = parse_id(parts.next())?;
            let field: Field = parts
                .next()
                .ok_or_else(|| eyre::eyre!("missing field name"))?
                .parse()?;
            // Remaining text is the raw value; absent means "clear"
            let raw = parts.collect::<Vec<_>>().join(" ");
            Command::Set { id, field, raw }
        }
        "include" => Command::Include {
            id: parse_id(parts.next())?,
            included: parse_flag(parts.next())?,
        },
        "remove" => Command::Remove {
            id: parse_id(parts.next())?,
        },
        other => eyre::bail!("unknown command {other:?}"),
    };
    Ok(Some(cmd))
}

/// Apply one command. Returns text to print on stdout, if any.
pub fn apply(
    cal: &mut Calibrator,
    cmd: &Command,
    precision: DisplayPrecision,
) -> Result<Option<String>, EngineError> {
    match cmd {
        Command::Append => {
            let id = cal.append();
            Ok(Some(format!("appended row {id}\n")))
        }
        Command::Set { id, field, raw } => {
            cal.update(*id, *field, raw)?;
            Ok(None)
        }
        Command::Include { id, included } => {
            cal.set_include(*id, *included)?;
            Ok(None)
        }
        Command::Remove { id } => {
            if cal.remove(*id)? {
                Ok(None)
            } else {
                Ok(Some(format!("row {id} kept: it is the only row\n")))
            }
        }
        Command::Show => Ok(Some(render::table(&cal.report(), precision))),
    }
}

/// Run a whole script. Bad lines are reported on stderr and skipped.
///
/// With `json`, every `show` and the final report are one JSON document per line.
pub fn run<R: BufRead>(
    input: R,
    cal: &mut Calibrator,
    precision: DisplayPrecision,
    json: bool,
    out: &mut dyn Write,
) -> eyre::Result<usize> {
    let mut rejected = 0usize;
    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        let lineno = idx + 1;
        let result = parse_line(&line).and_then(|cmd| match cmd {
            Some(Command::Show) if json => {
                Ok(Some(format!("{}\n", render::report_json(&cal.report()))))
            }
            Some(c) => apply(cal, &c, precision).map_err(eyre::Report::new),
            None => Ok(None),
        });
        match result {
            Ok(Some(text)) => write!(out, "{text}")?,
            Ok(None) => {}
            Err(e) => {
                rejected += 1;
                tracing::warn!(line = lineno, error = %e, "script line rejected");
                eprintln!("line {lineno}: {e}");
            }
        }
    }

    let rep = cal.report();
    if json {
        writeln!(out, "{}", render::report_json(&rep))?;
    } else {
        write!(out, "{}", render::table(&rep, precision))?;
    }
    Ok(rejected)
}
