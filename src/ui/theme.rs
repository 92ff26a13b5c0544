//! Styles for CLI status lines
//!
//! stdout and stderr are themed separately: `uastgate serve | tee log` keeps
//! colored errors on the terminal while the piped lines stay plain.

use owo_colors::Style;
use std::sync::OnceLock;

static STDOUT: OnceLock<Theme> = OnceLock::new();
static STDERR: OnceLock<Theme> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct Theme {
    pub banner: Style,
    pub ok: Style,
    pub failure: Style,
    pub label: Style,
    pub marker: Style,
}

impl Theme {
    pub fn new(color: bool) -> Self {
        if !color {
            return Self {
                banner: Style::new(),
                ok: Style::new(),
                failure: Style::new(),
                label: Style::new(),
                marker: Style::new(),
            };
        }

        Self {
            banner: Style::new().cyan().bold(),
            ok: Style::new().green().bold(),
            failure: Style::new().red().bold(),
            label: Style::new().white().dimmed(),
            marker: Style::new().magenta(),
        }
    }
}

/// `NO_COLOR` (non-empty) wins over a terminal
fn color_enabled(term: &console::Term) -> bool {
    let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
    !no_color && term.is_term()
}

pub fn stdout_theme() -> &'static Theme {
    STDOUT.get_or_init(|| Theme::new(color_enabled(&console::Term::stdout())))
}

pub fn stderr_theme() -> &'static Theme {
    STDERR.get_or_init(|| Theme::new(color_enabled(&console::Term::stderr())))
}
