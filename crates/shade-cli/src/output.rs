//! Shared colored output utilities for CLI commands.
//!
//! Uses `termcolor` for cross-platform colored terminal output.
//! Respects `NO_COLOR` environment variable and `--color` flag.

use shade_engine::Action;
use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Resolve `ColorChoice` from CLI flag and environment.
///
/// Priority: `NO_COLOR` env > `--color` flag > auto-detect TTY.
pub fn resolve_color_choice(flag: Option<&str>) -> ColorChoice {
    if std::env::var_os("NO_COLOR").is_some() {
        return ColorChoice::Never;
    }
    match flag {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}

/// Styled output writer for terminal.
pub struct StyledOutput {
    stdout: StandardStream,
    stderr: StandardStream,
}

impl StyledOutput {
    /// Create a new styled output with the given color choice.
    pub fn new(choice: ColorChoice) -> Self {
        Self {
            stdout: StandardStream::stdout(choice),
            stderr: StandardStream::stderr(choice),
        }
    }

    /// Write text with a specific color and style.
    pub fn write_styled(&mut self, text: &str, color: Option<Color>, bold: bool) {
        let mut spec = ColorSpec::new();
        spec.set_fg(color).set_bold(bold);
        let _ = self.stdout.set_color(&spec);
        let _ = write!(self.stdout, "{}", text);
        let _ = self.stdout.reset();
    }

    /// Bold white text.
    pub fn bold(&mut self, text: &str) {
        self.write_styled(text, None, true);
    }

    /// Dim/gray text.
    pub fn dim(&mut self, text: &str) {
        self.write_styled(text, Some(Color::White), false);
    }

    /// Plain text (no color).
    pub fn plain(&mut self, text: &str) {
        let _ = write!(self.stdout, "{}", text);
    }

    /// Newline.
    pub fn newline(&mut self) {
        let _ = writeln!(self.stdout);
    }

    /// Flush stdout.
    pub fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    // ── Plan table ───────────────────────────────────────────────────

    /// Action label padded to `width`, colored by what it does to the member.
    pub fn action(&mut self, action: &Action, width: usize) {
        let color = match action {
            Action::PrefixGuard => Color::Cyan,
            Action::FullReplacement => Color::Yellow,
            Action::SynthesizedOverride { .. } => Color::Green,
            Action::ConstructorReplacement | Action::DefaultConstructor => Color::Blue,
            Action::Skipped(_) => Color::White,
        };
        let text = format!("{:<width$}", action.to_string(), width = width);
        self.write_styled(&text, Some(color), action.is_woven());
    }

    // ── Diagnostics (stderr) ─────────────────────────────────────────

    /// `label: message` on stderr with a colored label.
    fn diagnostic(&mut self, label: &str, color: Color, message: &str) {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(color)).set_bold(true);
        let _ = self.stderr.set_color(&spec);
        let _ = write!(self.stderr, "{}", label);
        let _ = self.stderr.reset();
        let _ = writeln!(self.stderr, ": {}", message);
    }

    /// Red `error:` line on stderr.
    pub fn error(&mut self, message: &str) {
        self.diagnostic("error", Color::Red, message);
    }

    /// Green status line on stderr (`wrote`, `woven`).
    pub fn status(&mut self, label: &str, message: &str) {
        self.diagnostic(label, Color::Green, message);
    }
}
