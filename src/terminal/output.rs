//! Log records and their format-aware rendering.
//!
//! A [`Log`] pairs a level and timestamp with a [`Message`]. Rendering is a pure
//! function of the log and a [`RenderContext`]: text mode produces a human line
//! (colored unless the context forbids it), JSON mode produces one compact object
//! per log with `time`, `level` and the message payload merged in.

use chrono::{DateTime, SecondsFormat, Utc};
use console::{pad_str, Alignment, Style};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

use super::OutputFormat;
use crate::error::{Error, ErrorCode, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LogLevel::Error)
    }

    fn style(&self) -> Style {
        match self {
            LogLevel::Debug => Style::new().dim(),
            LogLevel::Info => Style::new(),
            LogLevel::Warning => Style::new().yellow(),
            LogLevel::Error => Style::new().red(),
        }
    }
}

/// Everything rendering depends on besides the log itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    pub format: OutputFormat,
    pub color: bool,
}

impl RenderContext {
    /// Apply `style`, honoring this context's color mode regardless of process-wide detection.
    pub fn paint(&self, style: &Style, text: &str) -> String {
        style
            .clone()
            .force_styling(self.color)
            .apply_to(text)
            .to_string()
    }
}

/// The body of a log.
///
/// `text` is used in text mode, `payload` in JSON mode. Either may fail; the
/// caller decides how to recover.
pub trait Message {
    fn text(&self, ctx: &RenderContext) -> Result<String>;

    fn payload(&self) -> Result<Map<String, Value>>;
}

pub struct Log {
    pub level: LogLevel,
    pub time: DateTime<Utc>,
    message: Box<dyn Message>,
}

impl fmt::Debug for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Log")
            .field("level", &self.level)
            .field("time", &self.time)
            .finish_non_exhaustive()
    }
}

impl Log {
    pub fn new(level: LogLevel, message: impl Message + 'static) -> Self {
        Self {
            level,
            time: Utc::now(),
            message: Box::new(message),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, TextMessage(text.into()))
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(LogLevel::Warning, TextMessage(text.into()))
    }

    pub fn debug(text: impl Into<String>) -> Self {
        Self::new(LogLevel::Debug, TextMessage(text.into()))
    }

    /// Error log carrying the structured code, details and hints.
    pub fn error(err: &Error) -> Self {
        Self::new(
            LogLevel::Error,
            ErrorMessage {
                code: Some(err.code.as_str()),
                message: err.message.clone(),
                details: err.details.clone(),
                hints: err.hints.iter().map(|h| h.message.clone()).collect(),
            },
        )
    }

    /// Error log from any displayable value.
    pub fn error_text(err: impl fmt::Display) -> Self {
        Self::new(
            LogLevel::Error,
            ErrorMessage {
                code: None,
                message: err.to_string(),
                details: Value::Null,
                hints: Vec::new(),
            },
        )
    }

    /// A labelled JSON document. A value that cannot be serialized fails at render time.
    pub fn json(label: impl Into<String>, doc: &impl Serialize) -> Self {
        Self::new(
            LogLevel::Info,
            JsonMessage {
                label: label.into(),
                doc: serde_json::to_value(doc).map_err(|e| e.to_string()),
            },
        )
    }

    pub fn table(message: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self::new(
            LogLevel::Info,
            TableMessage {
                message: message.into(),
                headers,
                rows,
            },
        )
    }

    pub fn list(message: impl Into<String>, items: Vec<String>) -> Self {
        Self::new(
            LogLevel::Info,
            ListMessage {
                message: message.into(),
                items,
            },
        )
    }

    /// A closing message followed by suggested next commands.
    pub fn follow_up(message: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self::new(
            LogLevel::Info,
            FollowUpMessage {
                message: message.into(),
                suggestions,
            },
        )
    }

    pub fn render(&self, ctx: &RenderContext) -> Result<String> {
        match ctx.format {
            OutputFormat::Text => {
                let text = self.message.text(ctx)?;
                Ok(ctx.paint(&self.level.style(), &text))
            }
            OutputFormat::Json => {
                let mut object = Map::new();
                object.insert(
                    "time".to_string(),
                    Value::String(self.time.to_rfc3339_opts(SecondsFormat::Secs, true)),
                );
                object.insert(
                    "level".to_string(),
                    Value::String(self.level.as_str().to_string()),
                );
                object.extend(self.message.payload()?);
                serde_json::to_string(&Value::Object(object))
                    .map_err(|e| Error::render_failed(ctx.format.as_str(), e.to_string()))
            }
        }
    }

    /// Render for output, substituting a single error log when rendering fails.
    pub fn render_for_print(&self, ctx: &RenderContext) -> Rendered {
        let err = match self.render(ctx) {
            Ok(text) => {
                return Rendered {
                    level: self.level,
                    text,
                }
            }
            Err(err) => err,
        };

        let err = if err.code == ErrorCode::OutputRenderFailed {
            err
        } else {
            Error::render_failed(ctx.format.as_str(), cause(&err))
        };
        let text = Log::error(&err)
            .render(ctx)
            .unwrap_or_else(|_| err.message.clone());
        Rendered {
            level: LogLevel::Error,
            text,
        }
    }
}

/// The error's message, with the underlying detail appended when the message alone is generic.
fn cause(err: &Error) -> String {
    match err.details.get("error").and_then(Value::as_str) {
        Some(detail) if detail != err.message => format!("{}: {}", err.message, detail),
        _ => err.message.clone(),
    }
}

/// A log after rendering, ready to be written to its stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub level: LogLevel,
    pub text: String,
}

struct TextMessage(String);

impl Message for TextMessage {
    fn text(&self, _ctx: &RenderContext) -> Result<String> {
        Ok(self.0.clone())
    }

    fn payload(&self) -> Result<Map<String, Value>> {
        let mut map = Map::new();
        map.insert("message".to_string(), Value::String(self.0.clone()));
        Ok(map)
    }
}

struct ErrorMessage {
    code: Option<&'static str>,
    message: String,
    details: Value,
    hints: Vec<String>,
}

impl Message for ErrorMessage {
    fn text(&self, _ctx: &RenderContext) -> Result<String> {
        let mut text = self.message.clone();
        for hint in &self.hints {
            text.push_str("\n  Hint: ");
            text.push_str(hint);
        }
        Ok(text)
    }

    fn payload(&self) -> Result<Map<String, Value>> {
        let mut map = Map::new();
        map.insert("err".to_string(), Value::String(self.message.clone()));
        if let Some(code) = self.code {
            map.insert("code".to_string(), Value::String(code.to_string()));
        }
        let has_details = match &self.details {
            Value::Null => false,
            Value::Object(o) => !o.is_empty(),
            _ => true,
        };
        if has_details {
            map.insert("details".to_string(), self.details.clone());
        }
        if !self.hints.is_empty() {
            map.insert(
                "hints".to_string(),
                Value::Array(self.hints.iter().cloned().map(Value::String).collect()),
            );
        }
        Ok(map)
    }
}

struct JsonMessage {
    label: String,
    doc: std::result::Result<Value, String>,
}

impl JsonMessage {
    fn doc(&self, format: OutputFormat) -> Result<&Value> {
        self.doc
            .as_ref()
            .map_err(|e| Error::render_failed(format.as_str(), e.clone()))
    }
}

impl Message for JsonMessage {
    fn text(&self, ctx: &RenderContext) -> Result<String> {
        let doc = serde_json::to_string_pretty(self.doc(ctx.format)?)
            .map_err(|e| Error::render_failed(ctx.format.as_str(), e.to_string()))?;
        Ok(format!("{}\n{}", self.label, doc))
    }

    fn payload(&self) -> Result<Map<String, Value>> {
        let mut map = Map::new();
        map.insert("message".to_string(), Value::String(self.label.clone()));
        map.insert("doc".to_string(), self.doc(OutputFormat::Json)?.clone());
        Ok(map)
    }
}

struct TableMessage {
    message: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TableMessage {
    fn check_rows(&self, format: OutputFormat) -> Result<()> {
        match self.rows.iter().position(|r| r.len() != self.headers.len()) {
            Some(index) => Err(Error::render_failed(
                format.as_str(),
                format!(
                    "table row {} has {} cells, expected {}",
                    index,
                    self.rows[index].len(),
                    self.headers.len()
                ),
            )),
            None => Ok(()),
        }
    }
}

impl Message for TableMessage {
    fn text(&self, ctx: &RenderContext) -> Result<String> {
        self.check_rows(ctx.format)?;

        let widths: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .map(|row| console::measure_text_width(&row[i]))
                    .chain(std::iter::once(console::measure_text_width(header)))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let line = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| pad_str(cell, *width, Alignment::Left, None).into_owned())
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut lines = vec![self.message.clone()];
        lines.push(ctx.paint(&Style::new().bold(), &line(self.headers.as_slice())));
        lines.extend(self.rows.iter().map(|row| line(row.as_slice())));
        Ok(lines.join("\n"))
    }

    fn payload(&self) -> Result<Map<String, Value>> {
        self.check_rows(OutputFormat::Json)?;

        let data = self
            .rows
            .iter()
            .map(|row| {
                let record = self
                    .headers
                    .iter()
                    .zip(row)
                    .map(|(h, cell)| (h.clone(), Value::String(cell.clone())))
                    .collect::<Map<String, Value>>();
                Value::Object(record)
            })
            .collect();

        let mut map = Map::new();
        map.insert("message".to_string(), Value::String(self.message.clone()));
        map.insert(
            "headers".to_string(),
            Value::Array(self.headers.iter().cloned().map(Value::String).collect()),
        );
        map.insert("data".to_string(), Value::Array(data));
        Ok(map)
    }
}

struct ListMessage {
    message: String,
    items: Vec<String>,
}

impl Message for ListMessage {
    fn text(&self, _ctx: &RenderContext) -> Result<String> {
        let mut text = self.message.clone();
        for item in &self.items {
            text.push_str("\n  ");
            text.push_str(item);
        }
        Ok(text)
    }

    fn payload(&self) -> Result<Map<String, Value>> {
        let mut map = Map::new();
        map.insert("message".to_string(), Value::String(self.message.clone()));
        map.insert(
            "data".to_string(),
            Value::Array(self.items.iter().cloned().map(Value::String).collect()),
        );
        Ok(map)
    }
}

struct FollowUpMessage {
    message: String,
    suggestions: Vec<String>,
}

impl Message for FollowUpMessage {
    fn text(&self, ctx: &RenderContext) -> Result<String> {
        let command = Style::new().cyan();
        let mut text = self.message.clone();
        for suggestion in &self.suggestions {
            text.push_str("\n  ");
            text.push_str(&ctx.paint(&command, suggestion));
        }
        Ok(text)
    }

    fn payload(&self) -> Result<Map<String, Value>> {
        let mut map = Map::new();
        map.insert("message".to_string(), Value::String(self.message.clone()));
        map.insert(
            "followUp".to_string(),
            Value::Array(self.suggestions.iter().cloned().map(Value::String).collect()),
        );
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const TEXT: RenderContext = RenderContext {
        format: OutputFormat::Text,
        color: false,
    };
    const COLORED: RenderContext = RenderContext {
        format: OutputFormat::Text,
        color: true,
    };
    const JSON: RenderContext = RenderContext {
        format: OutputFormat::Json,
        color: false,
    };

    fn parse(rendered: &str) -> Value {
        serde_json::from_str(rendered).unwrap()
    }

    #[test]
    fn json_render_merges_level_time_and_payload() {
        let value = parse(&Log::info("deployed").render(&JSON).unwrap());

        assert_eq!(value["level"], "info");
        assert_eq!(value["message"], "deployed");
        assert!(value["time"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn color_flag_controls_escapes() {
        let plain = Log::error_text("boom").render(&TEXT).unwrap();
        let colored = Log::error_text("boom").render(&COLORED).unwrap();

        assert_eq!(plain, "boom");
        assert!(colored.contains("\u{1b}["));
        assert_eq!(console::strip_ansi_codes(&colored), "boom");
    }

    #[test]
    fn error_log_carries_code_details_and_hints() {
        let err = Error::project_exists("/apps/todo");
        let value = parse(&Log::error(&err).render(&JSON).unwrap());

        assert_eq!(value["level"], "error");
        assert_eq!(value["code"], "project.exists");
        assert_eq!(value["details"]["rootDir"], "/apps/todo");
        assert_eq!(value["hints"].as_array().unwrap().len(), 1);

        let text = Log::error(&err).render(&TEXT).unwrap();
        assert!(text.starts_with("A project already exists"));
        assert!(text.contains("Hint: "));
    }

    #[test]
    fn error_text_omits_empty_fields() {
        let value = parse(&Log::error_text("plain failure").render(&JSON).unwrap());

        assert_eq!(value["err"], "plain failure");
        assert!(value.get("code").is_none());
        assert!(value.get("details").is_none());
        assert!(value.get("hints").is_none());
    }

    #[test]
    fn table_aligns_columns() {
        let log = Log::table(
            "Secrets",
            vec!["ID".to_string(), "Name".to_string()],
            vec![
                vec!["1".to_string(), "db_password".to_string()],
                vec!["1234".to_string(), "token".to_string()],
            ],
        );

        let text = log.render(&TEXT).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["Secrets", "ID    Name", "1     db_password", "1234  token"]);

        let value = parse(&log.render(&JSON).unwrap());
        assert_eq!(value["data"][1]["Name"], "token");
    }

    #[test]
    fn ragged_table_fails_to_render() {
        let log = Log::table(
            "Secrets",
            vec!["ID".to_string(), "Name".to_string()],
            vec![vec!["1".to_string()]],
        );

        let err = log.render(&JSON).unwrap_err();
        assert_eq!(err.code, ErrorCode::OutputRenderFailed);
    }

    #[test]
    fn list_and_follow_up_payload_keys() {
        let list = parse(
            &Log::list("Apps", vec!["todo".to_string()])
                .render(&JSON)
                .unwrap(),
        );
        assert_eq!(list["data"][0], "todo");

        let follow_up = Log::follow_up("Next", vec!["stratus app deploy".to_string()]);
        assert_eq!(
            parse(&follow_up.render(&JSON).unwrap())["followUp"][0],
            "stratus app deploy"
        );
        assert_eq!(
            follow_up.render(&TEXT).unwrap(),
            "Next\n  stratus app deploy"
        );
    }

    #[test]
    fn unserializable_document_is_replaced_by_one_error_log() {
        let mut bad = HashMap::new();
        bad.insert((1u8, 2u8), "tuple keys are not valid JSON keys");
        let log = Log::json("Document", &bad);

        assert!(log.render(&JSON).is_err());

        let rendered = log.render_for_print(&JSON);
        assert_eq!(rendered.level, LogLevel::Error);
        assert_eq!(rendered.text.lines().count(), 1);
        assert_eq!(parse(&rendered.text)["code"], "output.render_failed");
    }

    #[test]
    fn json_document_renders_label_and_doc() {
        let log = Log::json("App", &serde_json::json!({ "name": "todo" }));

        let value = parse(&log.render(&JSON).unwrap());
        assert_eq!(value["message"], "App");
        assert_eq!(value["doc"]["name"], "todo");

        assert!(log.render(&TEXT).unwrap().starts_with("App\n{"));
    }

    #[test]
    fn substitute_error_keeps_the_underlying_detail() {
        struct Unrenderable;

        impl Message for Unrenderable {
            fn text(&self, _ctx: &RenderContext) -> Result<String> {
                Err(Error::internal_unexpected("cannot render"))
            }

            fn payload(&self) -> Result<Map<String, Value>> {
                Err(Error::internal_unexpected("cannot render"))
            }
        }

        let rendered = Log::new(LogLevel::Info, Unrenderable).render_for_print(&TEXT);

        assert_eq!(rendered.level, LogLevel::Error);
        assert_eq!(
            rendered.text,
            "Failed to render output: Unexpected error: cannot render"
        );
    }
}
