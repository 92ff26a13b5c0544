use crate::ui::{stderr_theme, stdout_theme, Icons};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    println!("{} {}", Icons::ROCKET, text.style(stdout_theme().banner));
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(stdout_theme().ok));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(stderr_theme().failure));
}

pub fn info(label: &str, value: &str) {
    let theme = stdout_theme();
    println!(
        "{} {}: {}",
        Icons::INFO.style(theme.marker),
        label.style(theme.label),
        value
    );
}

pub fn section(title: &str) {
    println!();
    println!("━{}━", title.style(stdout_theme().banner));
}
