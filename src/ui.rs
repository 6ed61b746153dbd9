//! Terminal output for ghswitch: status lines, tables, spinners.
//!
//! Color is off when any of these holds, checked in order: `--no-color`,
//! `NO_COLOR` set to anything, `TERM=dumb`, or (in auto mode) stdout is not
//! a terminal. Without color the glyphs fall back to ASCII and tables to
//! markdown borders, so piped output stays greppable.

use anstream::{eprintln, println};
use anstyle::{AnsiColor, Color, Style};
use comfy_table::{Cell, ContentArrangement, Table, presets};
use indicatif::{ProgressBar, ProgressStyle};
use std::borrow::Cow;
use std::io::IsTerminal;
use std::time::Duration;

const SPINNER_FRAMES: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Value of `--color`
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Always,
    #[default]
    Auto,
    Never,
}

impl std::str::FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "auto" => Ok(Self::Auto),
            "never" => Ok(Self::Never),
            other => Err(format!("expected always, auto or never, got '{other}'")),
        }
    }
}

/// Outcome class of a line of output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Ok,
    Warn,
    Error,
    Info,
}

impl Status {
    fn label(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Warn => "WARN",
            Status::Error => "ERROR",
            Status::Info => "INFO",
        }
    }

    fn color(self) -> AnsiColor {
        match self {
            Status::Ok => AnsiColor::Green,
            Status::Warn => AnsiColor::Yellow,
            Status::Error => AnsiColor::Red,
            Status::Info => AnsiColor::Cyan,
        }
    }

    /// (color glyph, ASCII fallback)
    fn glyphs(self) -> (&'static str, &'static str) {
        match self {
            Status::Ok => ("✓", "[OK]"),
            Status::Warn => ("⚠", "[!]"),
            Status::Error => ("✗", "[X]"),
            Status::Info => ("•", "-"),
        }
    }
}

/// Resolved display settings for one invocation
#[derive(Debug, Clone)]
pub struct Ui {
    pub color_enabled: bool,
    /// Spinners need a TTY and color
    pub spinner_enabled: bool,
}

impl Default for Ui {
    fn default() -> Self {
        Self::new(ColorMode::Auto, false)
    }
}

impl Ui {
    pub fn new(mode: ColorMode, force_no_color: bool) -> Self {
        let stdout_is_tty = std::io::stdout().is_terminal();
        let color_enabled = !force_no_color
            && !color_disabled_by_env()
            && match mode {
                ColorMode::Always => true,
                ColorMode::Never => false,
                ColorMode::Auto => stdout_is_tty,
            };

        if !color_enabled {
            anstream::ColorChoice::write_global(anstream::ColorChoice::Never);
        }

        Self {
            color_enabled,
            spinner_enabled: color_enabled && stdout_is_tty,
        }
    }

    fn status_line(&self, status: Status, msg: &str) {
        let style = if self.color_enabled {
            Style::new().fg_color(Some(Color::Ansi(status.color()))).bold()
        } else {
            Style::new()
        };
        let label = status.label();
        if status == Status::Error {
            eprintln!("{style}{label}{style:#} {msg}");
        } else {
            println!("{style}{label}{style:#} {msg}");
        }
    }

    pub fn ok(&self, msg: impl AsRef<str>) {
        self.status_line(Status::Ok, msg.as_ref());
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        self.status_line(Status::Warn, msg.as_ref());
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        self.status_line(Status::Info, msg.as_ref());
    }

    pub fn dim(&self, s: impl AsRef<str>) -> String {
        self.paint(s.as_ref(), Style::new().dimmed())
    }

    pub fn bold(&self, s: impl AsRef<str>) -> String {
        self.paint(s.as_ref(), Style::new().bold())
    }

    pub fn colored(&self, s: impl AsRef<str>, color: AnsiColor) -> String {
        self.paint(s.as_ref(), Style::new().fg_color(Some(Color::Ansi(color))))
    }

    fn paint(&self, s: &str, style: Style) -> String {
        if self.color_enabled {
            format!("{style}{s}{style:#}")
        } else {
            s.to_string()
        }
    }

    fn glyph(&self, status: Status) -> &'static str {
        let (fancy, plain) = status.glyphs();
        if self.color_enabled { fancy } else { plain }
    }

    pub fn icon_ok(&self) -> &'static str {
        self.glyph(Status::Ok)
    }

    pub fn icon_warn(&self) -> &'static str {
        self.glyph(Status::Warn)
    }

    pub fn icon_err(&self) -> &'static str {
        self.glyph(Status::Error)
    }

    pub fn icon_info(&self) -> &'static str {
        self.glyph(Status::Info)
    }

    /// Bordered table for profile and rule listings
    pub fn table(&self) -> Table {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        if self.color_enabled {
            table.load_preset(presets::UTF8_FULL_CONDENSED);
        } else {
            table.load_preset(presets::ASCII_MARKDOWN);
        }
        table
    }

    /// Key/value listing with no borders, e.g. the identity shown by `current`
    pub fn simple_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(presets::NOTHING)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table
    }

    pub fn cell(&self, content: impl Into<String>) -> Cell {
        Cell::new(content.into())
    }

    pub fn header_cell(&self, content: impl Into<String>) -> Cell {
        let cell = Cell::new(content.into());
        if self.color_enabled {
            cell.add_attribute(comfy_table::Attribute::Bold)
        } else {
            cell
        }
    }

    /// Colored through comfy-table itself so column widths stay right
    pub fn colored_cell(&self, content: impl Into<String>, color: AnsiColor) -> Cell {
        let cell = Cell::new(content.into());
        if self.color_enabled {
            cell.fg(comfy_color(color))
        } else {
            cell
        }
    }

    /// Spinner shown while git or ssh-add runs; hidden when disabled
    pub fn spinner(&self, message: impl Into<Cow<'static, str>>) -> ProgressBar {
        if !self.spinner_enabled {
            let pb = ProgressBar::hidden();
            pb.set_message(message);
            return pb;
        }

        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .tick_chars(SPINNER_FRAMES)
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(style);
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }

    pub fn spinner_finish_ok(&self, pb: &ProgressBar, msg: impl Into<Cow<'static, str>>) {
        self.finish_spinner(pb, Status::Ok, msg.into());
    }

    pub fn spinner_finish_err(&self, pb: &ProgressBar, msg: impl Into<Cow<'static, str>>) {
        self.finish_spinner(pb, Status::Error, msg.into());
    }

    fn finish_spinner(&self, pb: &ProgressBar, status: Status, msg: Cow<'static, str>) {
        if !self.spinner_enabled {
            pb.finish_and_clear();
            self.status_line(status, &msg);
            return;
        }

        if let Ok(style) = ProgressStyle::default_spinner().template("{msg}") {
            pb.set_style(style);
        }
        let icon = self.colored(self.glyph(status), status.color());
        pb.finish_with_message(format!("{icon} {msg}"));
    }

    pub fn println(&self, msg: impl AsRef<str>) {
        println!("{}", msg.as_ref());
    }

    pub fn newline(&self) {
        println!();
    }

    pub fn section(&self, title: impl AsRef<str>) {
        println!("{}", self.bold(title));
    }
}

fn color_disabled_by_env() -> bool {
    std::env::var_os("NO_COLOR").is_some() || std::env::var("TERM").is_ok_and(|t| t == "dumb")
}

/// comfy-table has no bright variants; they map onto the base colors
fn comfy_color(color: AnsiColor) -> comfy_table::Color {
    use comfy_table::Color as C;
    match color {
        AnsiColor::Black => C::Black,
        AnsiColor::BrightBlack => C::DarkGrey,
        AnsiColor::Red | AnsiColor::BrightRed => C::Red,
        AnsiColor::Green | AnsiColor::BrightGreen => C::Green,
        AnsiColor::Yellow | AnsiColor::BrightYellow => C::Yellow,
        AnsiColor::Blue | AnsiColor::BrightBlue => C::Blue,
        AnsiColor::Magenta | AnsiColor::BrightMagenta => C::Magenta,
        AnsiColor::Cyan | AnsiColor::BrightCyan => C::Cyan,
        AnsiColor::White | AnsiColor::BrightWhite => C::White,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Sets an env var for the duration of a test and puts the old value back
    struct EnvGuard {
        key: &'static str,
        previous: Option<std::ffi::OsString>,
    }

    impl EnvGuard {
        fn set(key: &'static str, value: Option<&str>) -> Self {
            let previous = std::env::var_os(key);
            // SAFETY: every test that touches the environment is #[serial]
            unsafe {
                match value {
                    Some(v) => std::env::set_var(key, v),
                    None => std::env::remove_var(key),
                }
            }
            Self { key, previous }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            // SAFETY: see EnvGuard::set
            unsafe {
                match &self.previous {
                    Some(v) => std::env::set_var(self.key, v),
                    None => std::env::remove_var(self.key),
                }
            }
        }
    }

    #[test]
    fn test_color_mode_parse() {
        assert_eq!("always".parse::<ColorMode>().unwrap(), ColorMode::Always);
        assert_eq!("AUTO".parse::<ColorMode>().unwrap(), ColorMode::Auto);
        assert_eq!("never".parse::<ColorMode>().unwrap(), ColorMode::Never);
        assert!("sometimes".parse::<ColorMode>().is_err());
    }

    #[test]
    fn test_force_no_color_wins() {
        let ui = Ui::new(ColorMode::Always, true);
        assert!(!ui.color_enabled);
        assert!(!ui.spinner_enabled);
    }

    #[test]
    #[serial]
    fn test_no_color_env() {
        let _no_color = EnvGuard::set("NO_COLOR", Some("1"));
        let ui = Ui::new(ColorMode::Always, false);
        assert!(!ui.color_enabled);
    }

    #[test]
    #[serial]
    fn test_dumb_term_disables_color() {
        let _no_color = EnvGuard::set("NO_COLOR", None);
        let _term = EnvGuard::set("TERM", Some("dumb"));
        assert!(!Ui::new(ColorMode::Always, false).color_enabled);
    }

    #[test]
    #[serial]
    fn test_always_mode_colors_output() {
        let original_term = std::env::var_os("TERM");
        {
            let _no_color = EnvGuard::set("NO_COLOR", None);
            let _term = EnvGuard::set("TERM", Some("xterm-256color"));
            let ui = Ui::new(ColorMode::Always, false);
            assert!(ui.color_enabled);
            assert_ne!(ui.bold("x"), "x");
            assert_eq!(ui.icon_ok(), "✓");
        }
        assert_eq!(std::env::var_os("TERM"), original_term);
    }

    #[test]
    fn test_plain_output_without_color() {
        let ui = Ui::new(ColorMode::Never, false);
        assert_eq!(ui.dim("test"), "test");
        assert_eq!(ui.colored("test", AnsiColor::Red), "test");
        assert_eq!(ui.icon_ok(), "[OK]");
        assert_eq!(ui.icon_err(), "[X]");
        assert_eq!(ui.icon_warn(), "[!]");
        assert_eq!(ui.icon_info(), "-");
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(Status::Warn.label(), "WARN");
        assert_eq!(Status::Error.color(), AnsiColor::Red);
        assert_eq!(Status::Ok.glyphs(), ("✓", "[OK]"));
    }

    #[test]
    fn test_table_renders_rows() {
        let ui = Ui::new(ColorMode::Never, false);
        let mut table = ui.table();
        table.set_header(vec![ui.header_cell("Profile"), ui.header_cell("Email")]);
        table.add_row(vec![ui.cell("work"), ui.colored_cell("a@x.com", AnsiColor::Green)]);
        let rendered = table.to_string();
        assert!(rendered.contains("work"));
        assert!(rendered.contains("a@x.com"));
    }

    #[test]
    fn test_hidden_spinner() {
        let ui = Ui::new(ColorMode::Never, false);
        let pb = ui.spinner("working");
        assert!(pb.is_hidden());
        ui.spinner_finish_err(&pb, "failed");
    }
}
