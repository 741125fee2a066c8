use std::collections::BTreeMap;

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_error::ErrorLayer;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::Context;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

const DEFAULT_DIRECTIVE: &str = "vnet_tracker=info";

/// Fields recorded on a span, kept in its extensions so formatters can print them with each event.
#[derive(Debug, Clone, Default)]
pub struct SpanFields(BTreeMap<String, String>);

impl Visit for SpanFields {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value).trim_matches('"').to_string());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
}

pub struct SpanFieldLayer;

impl<S> Layer<S> for SpanFieldLayer
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    fn on_new_span(&self, attrs: &tracing::span::Attributes<'_>, id: &tracing::span::Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else { return };
        let mut fields = SpanFields::default();
        attrs.record(&mut fields);
        span.extensions_mut().insert(fields);
    }

    fn on_record(&self, id: &tracing::span::Id, values: &tracing::span::Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else { return };
        let mut extensions = span.extensions_mut();
        let mut fields = extensions.remove::<SpanFields>().unwrap_or_default();
        values.record(&mut fields);
        extensions.insert(fields);
    }
}

/// Message and fields of one event.
#[derive(Default)]
struct EventFields {
    message: String,
    fields: Map<String, Value>,
}

impl Visit for EventFields {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let value = format!("{:?}", value).trim_matches('"').to_string();
        if field.name() == "message" {
            self.message = value;
        } else {
            self.fields.insert(field.name().to_string(), Value::String(value));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.insert(field.name().to_string(), Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }
}

fn span_fields<S, N>(ctx: &FmtContext<'_, S, N>) -> BTreeMap<String, String>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    let mut collected = BTreeMap::new();
    if let Some(scope) = ctx.event_scope() {
        for span in scope.from_root() {
            if let Some(fields) = span.extensions().get::<SpanFields>() {
                collected.extend(fields.0.clone());
            }
        }
    }
    collected
}

/// Column-aligned console output: time | level | component | message (fields)
pub struct PrettyFormatter;

impl<S, N> FormatEvent<S, N> for PrettyFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> std::fmt::Result {
        let meta = event.metadata();
        let now = Utc::now().format("%y-%m-%d %H:%M:%S");

        let level_color = match *meta.level() {
            Level::TRACE => "\x1b[90m",
            Level::DEBUG => "\x1b[34m",
            Level::INFO => "\x1b[32m",
            Level::WARN => "\x1b[33m",
            Level::ERROR => "\x1b[31m",
        };
        let dim = "\x1b[90m";
        let reset = "\x1b[0m";

        let mut visitor = EventFields::default();
        event.record(&mut visitor);

        write!(writer, "\x1b[96m{now}{reset} {dim}|{reset} ")?;
        write!(writer, "{level_color}{:<5}{reset} {dim}|{reset} ", meta.level())?;
        write!(writer, "\x1b[92m{:<11}{reset} {dim}|{reset} ", component_name(meta.target()))?;
        write!(writer, "\x1b[97m{}{reset}", visitor.message)?;

        let mut rendered: Vec<String> =
            span_fields(ctx).into_iter().map(|(name, value)| format!("{name}={value}")).collect();
        rendered.extend(visitor.fields.iter().map(|(name, value)| match value {
            Value::String(value) => format!("{name}={value}"),
            other => format!("{name}={other}"),
        }));
        if !rendered.is_empty() {
            write!(writer, " {dim}({}){reset}", rendered.join(", "))?;
        }

        writeln!(writer)
    }
}

/// One JSON object per line, for log aggregation.
pub struct JsonEventFormatter;

impl<S, N> FormatEvent<S, N> for JsonEventFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> std::fmt::Result {
        let meta = event.metadata();

        let mut visitor = EventFields::default();
        event.record(&mut visitor);

        let mut root = Map::new();
        let timestamp = Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        root.insert("timestamp".into(), Value::String(timestamp));
        root.insert("level".into(), Value::String(meta.level().to_string()));
        root.insert("target".into(), Value::String(meta.target().to_string()));
        root.insert("component".into(), Value::String(component_name(meta.target()).to_string()));
        if let (Some(file), Some(line)) = (meta.file(), meta.line()) {
            root.insert("location".into(), Value::String(format!("{file}:{line}")));
        }
        root.insert("message".into(), Value::String(visitor.message));

        let mut fields = visitor.fields;
        for (name, value) in span_fields(ctx) {
            fields.entry(name).or_insert(Value::String(value));
        }
        if !fields.is_empty() {
            root.insert("fields".into(), Value::Object(fields));
        }

        let line = serde_json::to_string(&Value::Object(root)).map_err(|_| std::fmt::Error)?;
        writeln!(writer, "{line}")
    }
}

/// Installs the global subscriber.
///
/// `RUST_LOG` selects the filter (default `vnet_tracker=info`), `LOG_FORMAT=json` switches to JSON lines.
/// Also installs color_eyre to render panics.
pub fn init_logging() {
    color_eyre::install().expect("Unable to install color_eyre");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::builder()
            .with_default_directive(Level::INFO.into())
            .parse(DEFAULT_DIRECTIVE)
            .expect("Invalid default filter directive")
    });

    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));
    let fmt_layer = if json {
        fmt::layer().event_format(JsonEventFormatter).boxed()
    } else {
        fmt::layer().with_writer(std::io::stderr).event_format(PrettyFormatter).boxed()
    };

    let subscriber =
        Registry::default().with(env_filter).with(SpanFieldLayer).with(fmt_layer).with(ErrorLayer::default());
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set global default subscriber");
}

/// Short display name of the module emitting an event.
fn component_name(target: &str) -> &'static str {
    let Some(path) = target.strip_prefix("vnet_tracker") else {
        return "EXTERNAL";
    };
    match path.trim_start_matches("::").split("::").next().unwrap_or_default() {
        "scanner" => "SCANNER",
        "store" => "INFRA_STORE",
        "correlator" => "CORRELATOR",
        "persister" => "PERSISTER",
        "pipeline" => "PIPELINE",
        "cleanup" | "provisioner" => "TEARDOWN",
        _ => "-",
    }
}
