//! Output formatting for the CLI.
//!
//! Human output goes to stdout (messages, tables) and stderr (warnings,
//! errors, debug). With `--json` only [`Output::json`] and errors print.

use console::{measure_text_width, pad_str, style, Alignment, StyledObject, Term};
use indicatif::{ProgressBar, ProgressStyle};
use totsy_commerce::lists::{Vote, Votes};
use totsy_commerce::share::PickStatus;

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
    term: Term,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self {
            verbose,
            json,
            term: Term::stderr(),
        }
    }

    fn stdout(&self, icon: StyledObject<&str>, msg: &str) {
        if !self.json {
            println!("{} {}", icon, msg);
        }
    }

    fn stderr(&self, icon: StyledObject<&str>, msg: &str) {
        if !self.json {
            eprintln!("{} {}", icon, msg);
        }
    }

    pub fn info(&self, msg: &str) {
        self.stdout(style("ℹ").blue(), msg);
    }

    pub fn success(&self, msg: &str) {
        self.stdout(style("✓").green(), msg);
    }

    pub fn warn(&self, msg: &str) {
        self.stderr(style("⚠").yellow(), msg);
    }

    /// Print an error message. Also printed in JSON mode, as `{"error": ..}`.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        } else {
            eprintln!("{} {}", style("✗").red(), style(msg).red());
        }
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if self.verbose {
            self.stderr(style("→").dim(), &style(msg).dim().to_string());
        }
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if !self.json {
            println!("\n{}", style(msg).bold().underlined());
        }
    }

    /// Print plain text.
    pub fn line(&self, msg: &str) {
        if !self.json {
            println!("{}", msg);
        }
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.json {
            println!("  {}: {}", style(key).dim(), value);
        }
    }

    /// Print a bulleted line.
    pub fn list_item(&self, item: &str) {
        if !self.json {
            println!("  {} {}", style("•").dim(), item);
        }
    }

    /// Print a table with a dimmed header row. Columns are sized to their
    /// widest cell; styled cells are measured without escape codes.
    pub fn table(&self, headers: &[&str], rows: &[Vec<String>]) {
        if self.json {
            return;
        }
        for line in render_table(headers, rows) {
            println!("  {}", line);
        }
    }

    /// Spinner for a blocking call. Hidden in JSON mode or without a TTY.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json || !self.term.is_term() {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn is_json(&self) -> bool {
        self.json
    }
}

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = headers.iter().map(|h| measure_text_width(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            let width = measure_text_width(cell);
            match widths.get_mut(i) {
                Some(w) => *w = (*w).max(width),
                None => widths.push(width),
            }
        }
    }

    let render = |cells: Vec<String>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| pad_str(cell, *width, Alignment::Left, None).into_owned())
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(render(
        headers
            .iter()
            .map(|h| style(*h).dim().to_string())
            .collect(),
    ));
    for row in rows {
        lines.push(render(row.clone()));
    }
    lines
}

/// Colored badge for a pick's purchase status.
pub fn status_badge(status: PickStatus) -> String {
    match status {
        PickStatus::None => style(status.as_str()).dim().to_string(),
        PickStatus::Ordered => style(status.as_str()).yellow().to_string(),
        PickStatus::Purchased => style(status.as_str()).cyan().to_string(),
        PickStatus::Received => style(status.as_str()).green().to_string(),
    }
}

/// Vote tally, marking this client's active vote.
pub fn format_votes(votes: &Votes) -> String {
    let up = format!("▲ {}", votes.thumbs_up);
    let down = format!("▼ {}", votes.thumbs_down);
    match votes.user_vote {
        Some(Vote::Up) => format!("{} {}", style(up).green().bold(), down),
        Some(Vote::Down) => format!("{} {}", up, style(down).red().bold()),
        None => format!("{} {}", up, down),
    }
}

/// Format a price in dollars.
pub fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("${:.0}", price)
    } else {
        format!("${:.2}", price)
    }
}

/// Format a ranking score.
pub fn format_score(score: f64) -> String {
    format!("{:.3}", score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(999.0), "$999");
        assert_eq!(format_price(12.5), "$12.50");
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(0.9), "0.900");
        assert_eq!(format_score(0.88), "0.880");
    }

    #[test]
    fn test_format_votes_without_active_vote() {
        let votes = Votes {
            thumbs_up: 3,
            thumbs_down: 1,
            user_vote: None,
        };
        assert_eq!(format_votes(&votes), "▲ 3 ▼ 1");
    }

    #[test]
    fn test_render_table_sizes_columns() {
        let rows = vec![
            vec!["stroller-city".to_string(), "$460".to_string()],
            vec!["tub".to_string(), style("$40").green().to_string()],
        ];
        let lines: Vec<String> = render_table(&["ID", "PRICE"], &rows)
            .iter()
            .map(|l| console::strip_ansi_codes(l).into_owned())
            .collect();

        assert_eq!(lines[1], "stroller-city  $460");
        assert_eq!(lines[2], "tub            $40");
    }
}
