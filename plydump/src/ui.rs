//! Utilities for printing and everything related to "UI".

use std::{
    cmp,
    io::{stdout, Write},
    time::Instant,
};

use term_painter::{Color, Style, ToStyle};


macro_rules! info {
    ($($t:tt)*) => {
        crate::ui::print_msg(crate::ui::MsgKind::Info, &format!($($t)*))
    };
}

macro_rules! warn {
    ($($t:tt)*) => {
        crate::ui::print_msg(crate::ui::MsgKind::Warning, &format!($($t)*))
    };
}

macro_rules! error {
    () => { error!("") };
    ($($t:tt)*) => {
        crate::ui::print_msg(crate::ui::MsgKind::Error, &format!($($t)*))
    };
}

/// Prints a progress message, evaluates `$body` (a `Result`) and afterwards
/// marks the message as done or failed. Evaluates to the value of `$body`.
macro_rules! progress {
    ([$($t:tt)*] => $body:expr) => {{
        let task = crate::ui::Task::start(format!($($t)*));
        let out = $body;
        task.finish(out.is_ok());
        out
    }};
}

#[derive(Clone, Copy)]
pub enum MsgKind {
    Error,
    Warning,
    Info,
    Progress,
}

impl MsgKind {
    fn icon(self) -> char {
        match self {
            MsgKind::Error => '!',
            MsgKind::Warning => 'w',
            MsgKind::Info => 'i',
            MsgKind::Progress => '…',
        }
    }

    fn icon_style(self) -> Style {
        match self {
            MsgKind::Error => Color::Red.bold(),
            MsgKind::Warning => Color::Yellow.bold(),
            MsgKind::Info => Color::Blue.bold(),
            MsgKind::Progress => Color::Green.bold(),
        }
    }

    fn body_style(self) -> Style {
        match self {
            MsgKind::Error => Color::BrightRed.to_style(),
            MsgKind::Warning => Color::BrightYellow.to_style(),
            MsgKind::Info | MsgKind::Progress => Color::NotSet.to_style(),
        }
    }
}

/// Prints `body` with the icon of `kind`, wrapped to the terminal width.
pub fn print_msg(kind: MsgKind, body: &str) {
    let width = term_size::dimensions().map(|(w, _)| w).unwrap_or(80);
    let lines = wrap(body, cmp::min(100, width).saturating_sub(7));

    let icon_style = kind.icon_style();
    for (i, line) in lines.iter().enumerate() {
        let prefix = match i {
            0 => format!("[{}] ", kind.icon()),
            _ if i == lines.len() - 1 => "    └ ".to_string(),
            _ => "    │ ".to_string(),
        };

        println!("{}{}", icon_style.paint(prefix), kind.body_style().paint(line));
    }
}

/// Splits `text` at whitespace into lines shorter than `width` characters.
/// Words longer than `width` get a line of their own.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let len = current.chars().count();
        if len != 0 && len + 1 + word.chars().count() >= width {
            lines.push(current);
            current = String::new();
        }

        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    lines.push(current);

    lines
}

/// A running step started by `progress!`.
pub struct Task {
    label: String,
    start: Instant,
}

impl Task {
    pub fn start(label: String) -> Self {
        let kind = MsgKind::Progress;
        print!("{}", kind.icon_style().paint(format!("[{}] ", kind.icon())));
        print!("{} ... ", kind.body_style().paint(&label));
        let _ = stdout().flush();

        Self { label, start: Instant::now() }
    }

    pub fn finish(self, success: bool) {
        let elapsed = self.start.elapsed();
        let (icon, status) = match success {
            true => ("[✓]", "done"),
            false => ("[✗]", "failed"),
        };

        let style = MsgKind::Progress.icon_style();
        println!(
            "\r{} {} ... {} (in {:.2?})",
            style.paint(icon),
            self.label,
            style.paint(status),
            elapsed,
        );
    }
}

/// Formats the given integer with `,` as thousand separator.
pub fn fmt_with_thousand_sep(v: u64) -> String {
    let digits = v.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousand_sep() {
        assert_eq!(fmt_with_thousand_sep(0), "0");
        assert_eq!(fmt_with_thousand_sep(999), "999");
        assert_eq!(fmt_with_thousand_sep(1000), "1,000");
        assert_eq!(fmt_with_thousand_sep(1_005), "1,005");
        assert_eq!(fmt_with_thousand_sep(12_345_678), "12,345,678");
    }

    #[test]
    fn wrapping() {
        assert_eq!(wrap("", 10), vec![""]);
        assert_eq!(wrap("  a   b ", 10), vec!["a b"]);
        assert_eq!(wrap("aaa bbb ccc", 8), vec!["aaa bbb", "ccc"]);
        assert_eq!(wrap("abcdefghijk x", 5), vec!["abcdefghijk", "x"]);
    }
}
