use crate::core::store::Store;
use crate::errors::AppResult;
use ansi_term::Colour;
use regex::Regex;
use std::sync::LazyLock;

const MAX_OP_WIDTH: usize = 60;

static ANSI_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-9;]*[mK]").expect("valid ANSI escape regex"));

fn strip_ansi(s: &str) -> String {
    ANSI_ESCAPE.replace_all(s, "").into_owned()
}

/// Colour of an audit operation.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "add" | "start" => Colour::Green,
        "del" => Colour::Red,
        "edit" | "stop" => Colour::Yellow,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

/// Cut a plain string to `width` visible chars, ending in `...` when cut.
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(store: &Store) -> AppResult<()> {
        let rows = store.audit_log()?;

        if rows.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let entries: Vec<(i64, String, String, String, String)> = rows
            .into_iter()
            .map(|r| {
                let date = chrono::DateTime::parse_from_rfc3339(&r.date)
                    .map(|dt| dt.format("%FT%T%:z").to_string())
                    .unwrap_or(r.date);
                let op_target = if r.target.is_empty() {
                    r.operation.clone()
                } else {
                    format!("{} ({})", r.operation, r.target)
                };
                (r.id, date, r.operation, op_target, r.message)
            })
            .collect();

        let op_w = entries
            .iter()
            .map(|(_, _, _, op_target, _)| op_target.chars().count())
            .max()
            .unwrap_or(10)
            .min(MAX_OP_WIDTH);
        let id_w = entries
            .iter()
            .map(|(id, _, _, _, _)| id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries
            .iter()
            .map(|(_, date, _, _, _)| date.len())
            .max()
            .unwrap_or(10);

        println!("📜 Internal log:\n");

        for (id, date, operation, op_target, message) in entries {
            let color = color_for_operation(&operation);
            let visible = truncate(&op_target, MAX_OP_WIDTH);

            // only the operation word is coloured
            let colored = match visible.split_once(' ') {
                Some((op_word, rest)) => format!("{} {}", color.paint(op_word), rest),
                None => color.paint(visible.as_str()).to_string(),
            };
            let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&colored).chars().count()));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                id, date, colored, padding, message
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_width() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
    }

    #[test]
    fn strip_removes_colour_codes() {
        let painted = Colour::Green.paint("add").to_string();
        assert_eq!(strip_ansi(&painted), "add");
    }
}
