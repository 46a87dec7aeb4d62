//! Operator prompts.
//!
//! Every question the curator asks goes through [`Prompter`]. A dismissed or
//! cancelled prompt is never an error: implementations return the neutral
//! answer (empty map, empty list, empty string) and the operation carries on
//! with it.
//!
//! [`TerminalPrompter`] is the line-oriented implementation used by the CLI.
//! It reads from any `BufRead` and writes to any `Write`, so it runs against
//! stdin/stdout in production and in-memory buffers in tests. End of input
//! counts as cancel.

use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::time::Duration;

/// Kind of input a form field collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Url,
    Switch,
}

/// Description of one form field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub kind: FieldKind,
    pub key: &'static str,
    pub title: &'static str,
    pub value: FieldValue,
    pub placeholder: &'static str,
    pub autocorrect: bool,
    pub autocapitalize: bool,
}

impl FieldSpec {
    pub fn text(key: &'static str, placeholder: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind: FieldKind::Text,
            key,
            title: "",
            value: FieldValue::Text(value.into()),
            placeholder,
            autocorrect: true,
            autocapitalize: false,
        }
    }

    pub fn url(key: &'static str, placeholder: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind: FieldKind::Url,
            autocorrect: false,
            ..Self::text(key, placeholder, value)
        }
    }

    pub fn switch(key: &'static str, title: &'static str, value: bool) -> Self {
        Self {
            kind: FieldKind::Switch,
            key,
            title,
            value: FieldValue::Switch(value),
            placeholder: "",
            autocorrect: false,
            autocapitalize: false,
        }
    }

    pub fn autocapitalized(mut self) -> Self {
        self.autocapitalize = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Switch(bool),
}

/// Answers of a submitted form, keyed by field key. Empty when cancelled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormValues(pub BTreeMap<String, FieldValue>);

impl FormValues {
    pub fn text(&self, key: &str) -> String {
        match self.0.get(key) {
            Some(FieldValue::Text(s)) => s.clone(),
            _ => String::new(),
        }
    }

    pub fn switch(&self, key: &str) -> bool {
        matches!(self.0.get(key), Some(FieldValue::Switch(true)))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastIcon {
    Success,
    Error,
}

/// Blocking, modal questions to the operator.
pub trait Prompter {
    /// Show a form; returns every field's answer, or nothing on cancel.
    fn form(&mut self, title: &str, fields: &[FieldSpec]) -> FormValues;
    /// Pick one or several items; returns the selection, or nothing on cancel.
    fn pick(&mut self, title: &str, items: &[String], multiple: bool) -> Vec<String>;
    /// Ask for free text; returns empty on cancel.
    fn text(&mut self, title: &str, default: &str) -> String;
    fn alert(&mut self, title: &str, message: &str);
    fn toast(&mut self, message: &str, icon: ToastIcon, duration: Duration);
    /// Let the operator delete items; returns the items kept, or `None` when
    /// the edit was cancelled.
    fn edit_list(&mut self, title: &str, items: Vec<String>) -> Option<Vec<String>>;
}

/// Line-oriented prompter for a terminal.
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Read one line without its terminator. `None` at end of input.
    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }

    fn say(&mut self, text: &str) {
        // Terminal output is best-effort; a closed stdout must not abort the operation.
        let _ = writeln!(self.output, "{text}");
        let _ = self.output.flush();
    }

    fn ask(&mut self, text: &str) {
        let _ = write!(self.output, "{text}");
        let _ = self.output.flush();
    }

    fn list_items(&mut self, items: &[String]) {
        for (i, item) in items.iter().enumerate() {
            self.say(&format!("  {:>2}) {item}", i + 1));
        }
    }
}

/// Parse `"1, 3 4"` into zero-based indices below `len`.
fn parse_indices(line: &str, len: usize) -> Vec<usize> {
    let mut indices = Vec::new();
    for part in line.split([',', ' ']).filter(|p| !p.is_empty()) {
        let Ok(n) = part.parse::<usize>() else {
            continue;
        };
        if (1..=len).contains(&n) && !indices.contains(&(n - 1)) {
            indices.push(n - 1);
        }
    }
    indices
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn form(&mut self, title: &str, fields: &[FieldSpec]) -> FormValues {
        self.say(&format!("== {title} =="));
        let mut values = BTreeMap::new();
        for field in fields {
            match &field.value {
                FieldValue::Text(default) => {
                    self.ask(&format!("{} [{}]: ", field.placeholder, default));
                    let Some(line) = self.read_line() else {
                        return FormValues::default();
                    };
                    let answer = if line.trim().is_empty() {
                        default.clone()
                    } else {
                        line.trim().to_string()
                    };
                    values.insert(field.key.to_string(), FieldValue::Text(answer));
                }
                FieldValue::Switch(default) => {
                    let hint = if *default { "Y/n" } else { "y/N" };
                    self.ask(&format!("{} [{hint}]: ", field.title));
                    let Some(line) = self.read_line() else {
                        return FormValues::default();
                    };
                    let answer = match line.trim().to_lowercase().as_str() {
                        "y" | "yes" => true,
                        "n" | "no" => false,
                        _ => *default,
                    };
                    values.insert(field.key.to_string(), FieldValue::Switch(answer));
                }
            }
        }
        FormValues(values)
    }

    fn pick(&mut self, title: &str, items: &[String], multiple: bool) -> Vec<String> {
        if items.is_empty() {
            return Vec::new();
        }
        self.say(title);
        self.list_items(items);
        self.ask(if multiple {
            "Numbers, comma separated (empty cancels): "
        } else {
            "Number (empty cancels): "
        });
        let Some(line) = self.read_line() else {
            return Vec::new();
        };
        let mut indices = parse_indices(&line, items.len());
        if !multiple {
            indices.truncate(1);
        }
        indices.into_iter().map(|i| items[i].clone()).collect()
    }

    fn text(&mut self, title: &str, default: &str) -> String {
        if default.is_empty() {
            self.ask(&format!("{title} "));
        } else {
            self.say(title);
            self.say(default);
            self.ask("> ");
        }
        match self.read_line() {
            Some(line) if !line.trim().is_empty() => line.trim().to_string(),
            Some(_) => default.to_string(),
            None => String::new(),
        }
    }

    fn alert(&mut self, title: &str, message: &str) {
        if message.is_empty() {
            self.say(&format!("!! {title}"));
        } else {
            self.say(&format!("!! {title}: {message}"));
        }
    }

    fn toast(&mut self, message: &str, icon: ToastIcon, _duration: Duration) {
        let mark = match icon {
            ToastIcon::Success => "✓",
            ToastIcon::Error => "✗",
        };
        self.say(&format!("{mark} {message}"));
    }

    fn edit_list(&mut self, title: &str, items: Vec<String>) -> Option<Vec<String>> {
        self.say(title);
        self.list_items(&items);
        self.ask("Numbers to delete, comma separated (empty cancels): ");
        let line = self.read_line()?;
        let doomed = parse_indices(&line, items.len());
        if doomed.is_empty() {
            return None;
        }
        Some(
            items
                .into_iter()
                .enumerate()
                .filter(|(i, _)| !doomed.contains(i))
                .map(|(_, item)| item)
                .collect(),
        )
    }
}
