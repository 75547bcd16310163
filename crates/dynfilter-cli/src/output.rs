//! Output mode control and rendering of filtered rows.
//!
//! [`OutputMode`] selects between a human-readable listing and structured
//! serialization. Structured modes write the rows themselves; the text modes
//! write each row's `Display` line.

use std::fmt::Display;

use serde::Serialize;
use thiserror::Error;

/// Width of the boxed title in terminal mode, excluding the border.
const TITLE_WIDTH: usize = 55;

/// Controls how output is rendered.
///
/// This is the user-facing enum for the `--output` CLI flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputMode {
    /// Auto-detect: TTY gets Term, pipe gets Text
    #[default]
    Auto,
    /// Boxed title followed by one line per row
    Term,
    /// One line per row, nothing else
    Text,
    /// Serialize rows as a JSON array
    Json,
    /// Serialize rows as a YAML sequence
    Yaml,
    /// Serialize rows as CSV with a header line
    Csv,
}

impl OutputMode {
    /// Returns true if this is a structured output mode (JSON, YAML, CSV).
    pub fn is_structured(&self) -> bool {
        matches!(self, OutputMode::Json | OutputMode::Yaml | OutputMode::Csv)
    }

    /// Resolves Auto mode to concrete Term or Text based on TTY detection.
    ///
    /// For non-Auto modes, returns self unchanged.
    pub fn resolve_auto(&self) -> OutputMode {
        match self {
            OutputMode::Auto => {
                if atty::is(atty::Stream::Stdout) {
                    OutputMode::Term
                } else {
                    OutputMode::Text
                }
            }
            other => *other,
        }
    }
}

/// Errors that can occur during serialization.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV serialization failed: {0}")]
    Csv(String),
}

/// Renders `rows` in the given mode. `title` is only shown by [`OutputMode::Term`].
pub fn render<T>(rows: &[T], title: &str, mode: OutputMode) -> Result<String, SerializeError>
where
    T: Serialize + Display,
{
    match mode.resolve_auto() {
        OutputMode::Json => Ok(serde_json::to_string_pretty(rows)?),
        OutputMode::Yaml => Ok(serde_yaml::to_string(rows)?),
        OutputMode::Csv => serialize_csv(rows),
        OutputMode::Term => {
            let mut out = boxed_title(title);
            for row in rows {
                out.push('\n');
                out.push_str(&row.to_string());
            }
            Ok(out)
        }
        _ => Ok(rows
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

/// Serializes rows to CSV. Headers come from the first row's field names.
pub fn serialize_csv<T: Serialize>(rows: &[T]) -> Result<String, SerializeError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for row in rows {
        wtr.serialize(row)
            .map_err(|e| SerializeError::Csv(e.to_string()))?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| SerializeError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| SerializeError::Csv(e.to_string()))
}

/// Draws `title` inside a box, camelCase words split apart:
///
/// ```text
/// ┌───────...───┐
/// │   Spend Average ...│
/// └───────...───┘
/// ```
pub fn boxed_title(title: &str) -> String {
    let label = format!("   {}", split_camel_case(title));
    let width = TITLE_WIDTH.max(label.chars().count());
    let rule = "─".repeat(width);
    format!("┌{rule}┐\n│{label:<width$}│\n└{rule}┘")
}

/// Inserts a space before each uppercase letter that follows a lowercase one,
/// and capitalizes the first letter: `spendAverage` becomes `Spend Average`.
pub fn split_camel_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut prev_lower = false;
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() && prev_lower {
            out.push(' ');
        }
        if i == 0 {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Serialize)]
    struct Row {
        name: String,
        value: i32,
    }

    impl fmt::Display for Row {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}={}", self.name, self.value)
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                name: "a".into(),
                value: 1,
            },
            Row {
                name: "b".into(),
                value: 2,
            },
        ]
    }

    #[test]
    fn output_mode_default_is_auto() {
        assert_eq!(OutputMode::default(), OutputMode::Auto);
    }

    #[test]
    fn output_mode_is_structured() {
        assert!(OutputMode::Json.is_structured());
        assert!(OutputMode::Yaml.is_structured());
        assert!(OutputMode::Csv.is_structured());
        assert!(!OutputMode::Auto.is_structured());
        assert!(!OutputMode::Term.is_structured());
        assert!(!OutputMode::Text.is_structured());
    }

    #[test]
    fn resolve_auto_non_auto_unchanged() {
        assert_eq!(OutputMode::Term.resolve_auto(), OutputMode::Term);
        assert_eq!(OutputMode::Text.resolve_auto(), OutputMode::Text);
        assert_eq!(OutputMode::Json.resolve_auto(), OutputMode::Json);
    }

    #[test]
    fn text_is_one_line_per_row() {
        assert_eq!(render(&rows(), "ignored", OutputMode::Text).unwrap(), "a=1\nb=2");
    }

    #[test]
    fn term_prefixes_boxed_title() {
        let out = render(&rows(), "spendAverage", OutputMode::Term).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with('┌') && lines[0].ends_with('┐'));
        assert!(lines[1].starts_with("│   Spend Average"));
        assert!(lines[2].starts_with('└'));
        assert_eq!(&lines[3..], ["a=1", "b=2"]);
    }

    #[test]
    fn box_lines_have_equal_width() {
        let boxed = boxed_title("age");
        let widths: Vec<_> = boxed.lines().map(|l| l.chars().count()).collect();
        assert_eq!(widths, vec![TITLE_WIDTH + 2; 3]);
    }

    #[test]
    fn long_titles_widen_the_box() {
        let title = "x".repeat(80);
        let widths: Vec<_> = boxed_title(&title).lines().map(|l| l.chars().count()).collect();
        assert_eq!(widths, vec![85; 3]);
    }

    #[test]
    fn json_and_yaml() {
        let json = render(&rows(), "", OutputMode::Json).unwrap();
        assert!(json.contains("\"name\": \"a\""));
        let yaml = render(&rows(), "", OutputMode::Yaml).unwrap();
        assert!(yaml.contains("name: a"));
    }

    #[test]
    fn csv_keeps_field_order() {
        let csv = serialize_csv(&rows()).unwrap();
        assert_eq!(csv, "name,value\na,1\nb,2\n");
    }

    #[test]
    fn csv_of_nothing_is_empty() {
        assert_eq!(serialize_csv::<Row>(&[]).unwrap(), "");
    }

    #[test]
    fn camel_case_splitting() {
        assert_eq!(split_camel_case("spendAverage"), "Spend Average");
        assert_eq!(split_camel_case("age"), "Age");
        assert_eq!(split_camel_case("isActive"), "Is Active");
        assert_eq!(split_camel_case(""), "");
    }
}
