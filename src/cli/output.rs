//! Terminal output for the `folio-server` subcommands.
//!
//! Every line is built by a `render_*` function first and printed second, so
//! the plain-text layout can be asserted without capturing stdout.

use owo_colors::OwoColorize;

/// Outcome shown in front of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Done,
    Note,
    Warn,
    Fail,
    Skip,
}

impl Mark {
    fn tag(self) -> &'static str {
        match self {
            Mark::Done => "[OK]",
            Mark::Note => "[INFO]",
            Mark::Warn => "[WARN]",
            Mark::Fail => "[ERROR]",
            Mark::Skip => "[SKIPPED]",
        }
    }

    fn glyph(self) -> String {
        match self {
            Mark::Done => "✓".green().bold().to_string(),
            Mark::Note => "•".blue().to_string(),
            Mark::Warn => "!".yellow().bold().to_string(),
            Mark::Fail => "✗".red().bold().to_string(),
            Mark::Skip => "○".yellow().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Output {
    colored: bool,
}

impl Output {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    pub fn is_colored(&self) -> bool {
        self.colored
    }

    pub fn render_status(&self, mark: Mark, message: &str) -> String {
        if self.colored {
            format!("  {} {}", mark.glyph(), message)
        } else {
            format!("  {} {}", mark.tag(), message)
        }
    }

    /// Prints a status line; failures go to stderr.
    pub fn status(&self, mark: Mark, message: &str) {
        let line = self.render_status(mark, message);
        if mark == Mark::Fail {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }

    /// A path written (or left alone) by `init`, tagged with what it is.
    pub fn path(&self, mark: Mark, kind: &str, path: &str) {
        if self.colored {
            self.status(mark, &format!("{} {}", kind.dimmed(), path.bright_white()));
        } else {
            self.status(mark, &format!("{} {}", kind, path));
        }
    }

    pub fn section(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  == {} ==", title);
        }
    }

    pub fn render_field(&self, key: &str, value: &str) -> String {
        format!("    {:<10} {}", format!("{}:", key), value)
    }

    pub fn field(&self, key: &str, value: &str) {
        let line = self.render_field(key, value);
        if self.colored {
            println!("{}", line.bright_white());
        } else {
            println!("{}", line);
        }
    }

    /// A numbered instruction followed by the shell lines that carry it out.
    pub fn step(&self, number: usize, text: &str, commands: &[&str]) {
        println!();
        self.status(Mark::Note, &format!("{}. {}", number, text));
        for command in commands {
            if self.colored {
                println!("     {}", format!("$ {}", command).bright_cyan());
            } else {
                println!("     $ {}", command);
            }
        }
    }

    /// Left column padded to its widest entry.
    pub fn render_counts(&self, rows: &[(&str, usize)]) -> Vec<String> {
        let width = rows.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
        rows.iter()
            .map(|(name, count)| format!("    {:<width$}  {:>4}", name, count, width = width))
            .collect()
    }

    pub fn counts(&self, rows: &[(&str, usize)]) {
        for line in self.render_counts(rows) {
            println!("{}", line);
        }
    }

    pub fn banner(&self) {
        let title = format!("Folio v{}", env!("CARGO_PKG_VERSION"));
        if self.colored {
            println!(
                "\n  {}  {}",
                title.bright_magenta().bold(),
                "portfolio content server".dimmed()
            );
        } else {
            println!("\n  {}  portfolio content server", title);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_status_uses_text_tags() {
        let output = Output::new(false);

        assert_eq!(output.render_status(Mark::Done, "Seeded"), "  [OK] Seeded");
        assert_eq!(
            output.render_status(Mark::Skip, "data (already exists)"),
            "  [SKIPPED] data (already exists)"
        );
        assert!(!output.is_colored());
    }

    #[test]
    fn test_counts_align_on_widest_name() {
        let output = Output::new(false);

        let lines = output.render_counts(&[("skills", 7), ("learning-journey", 3)]);
        assert_eq!(lines[0], "    skills               7");
        assert_eq!(lines[1], "    learning-journey     3");
        assert!(output.render_counts(&[]).is_empty());
    }

    #[test]
    fn test_field_pads_key() {
        let output = Output::new(true);
        assert_eq!(output.render_field("bind", "127.0.0.1:8001"), "    bind:      127.0.0.1:8001");
    }
}
