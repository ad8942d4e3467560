//! Line-oriented log output.
//!
//! Every event becomes one line:
//!
//! ```text
//! [2024-01-02T03:04:05.000Z] [INFO] Rules message sent successfully {"channel_id":"…","message_id":"…"}
//! ```
//!
//! Errors and warnings go to stderr, everything else to stdout.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use tracing::{
    field::{Field, Visit},
    level_filters::LevelFilter,
    Event, Level, Subscriber,
};
use tracing_subscriber::{
    filter::Targets,
    fmt::{
        format::Writer, writer::MakeWriterExt, FmtContext, FormatEvent, FormatFields,
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::{SubscriberInitExt, TryInitError},
};

use crate::immut_data::dynamic::LogLevel;

/// Installs the global subscriber.
///
/// Events from this library and from `bin_target` pass at `level`;
/// dependencies such as serenity are held to warnings at most.
pub fn init(level: LogLevel, bin_target: &str) -> Result<(), TryInitError> {
    let threshold = level.as_filter();
    let filter = Targets::new()
        .with_default(threshold.min(LevelFilter::WARN))
        .with_target(env!("CARGO_CRATE_NAME"), threshold)
        .with_target(bin_target.to_owned(), threshold);

    let writer = std::io::stderr
        .with_max_level(Level::WARN)
        .or_else(std::io::stdout);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(LineFormat)
                .with_writer(writer),
        )
        .try_init()
}

/// `[timestamp] [LEVEL] message {fields}`
pub fn format_line(
    timestamp: &DateTime<Utc>,
    level: Level,
    message: &str,
    fields: &Map<String, Value>,
) -> String {
    let timestamp = timestamp.to_rfc3339_opts(SecondsFormat::Millis, true);
    let mut line = format!("[{timestamp}] [{level}] {message}");
    if !fields.is_empty() {
        line.push(' ');
        line.push_str(&Value::Object(fields.clone()).to_string());
    }
    line
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut fields = JsonFields::default();
        event.record(&mut fields);
        let line = format_line(
            &Utc::now(),
            *event.metadata().level(),
            &fields.message,
            &fields.values,
        );
        writeln!(writer, "{line}")
    }
}

/// Splits the `message` field from the structured ones.
#[derive(Default)]
struct JsonFields {
    message: String,
    values: Map<String, Value>,
}

impl Visit for JsonFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_owned();
        } else {
            self.values.insert(field.name().to_owned(), value.into());
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.values.insert(field.name().to_owned(), value.into());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.values.insert(field.name().to_owned(), value.into());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.values.insert(field.name().to_owned(), value.into());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let value = format!("{value:?}");
        if field.name() == "message" {
            self.message = value;
        } else {
            self.values.insert(field.name().to_owned(), value.into());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    #[test]
    fn line_layout() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(
            format_line(&ts, Level::WARN, "Unhandled button interaction", &Map::new()),
            "[2024-01-02T03:04:05.000Z] [WARN] Unhandled button interaction"
        );

        let Value::Object(fields) = json!({ "channel_id": "123", "attempt": 1 }) else {
            unreachable!()
        };
        assert_eq!(
            format_line(&ts, Level::ERROR, "Failed to fetch channel", &fields),
            r#"[2024-01-02T03:04:05.000Z] [ERROR] Failed to fetch channel {"attempt":1,"channel_id":"123"}"#
        );
    }

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn events_are_rendered_with_their_fields() {
        let buffer = Buffer::default();
        let make_writer = {
            let buffer = buffer.clone();
            move || buffer.clone()
        };
        let subscriber = tracing_subscriber::fmt()
            .event_format(LineFormat)
            .with_writer(make_writer)
            .with_max_level(Level::DEBUG)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(user_id = %42, success = true, "Role added to member");
            tracing::debug!("Shard stage changed");
        });

        let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(r#"[INFO] Role added to member {"success":true,"user_id":"42"}"#));
        assert!(lines[1].ends_with("[DEBUG] Shard stage changed"));
        assert!(lines[0].starts_with('['));
    }
}
