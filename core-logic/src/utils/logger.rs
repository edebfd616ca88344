use chrono::Local;
use nu_ansi_term::{Color, Style};
use std::fmt;
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
    prelude::*,
    registry::LookupSpan,
    EnvFilter, Layer,
};

/// Installs the console + rolling file subscriber.
///
/// Both layers default to INFO and honour `RUST_LOG`. The returned guard
/// flushes the file writer on drop and MUST be kept alive by the caller.
pub fn setup_logger(app_name: &str) -> Option<WorkerGuard> {
    // Create logs directory
    std::fs::create_dir_all("logs").ok();

    let file_appender = tracing_appender::rolling::daily("logs", app_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .event_format(FileFormatter)
        .with_filter(default_filter());

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .event_format(TerminalFormatter)
        .with_filter(default_filter());

    // try_init so a second call (tests, debug binaries) is harmless
    let installed = tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .is_ok();

    installed.then_some(guard)
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

// --- Formatters ---

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<String>,
}

impl MessageVisitor {
    fn render(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else {
            format!("{} {}", self.message, self.fields.join(" "))
        }
    }
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }
}

pub struct TerminalFormatter;

impl<S, N> FormatEvent<S, N> for TerminalFormatter
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
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let msg = highlight_outcome(visitor.render());

        match *event.metadata().level() {
            Level::ERROR => writeln!(writer, "{}", Color::LightRed.paint(msg)),
            Level::WARN => writeln!(writer, "{}", Color::Yellow.paint(msg)),
            Level::DEBUG | Level::TRACE => writeln!(writer, "{}", Color::DarkGray.paint(msg)),
            Level::INFO => writeln!(writer, "{}", msg),
        }
    }
}

// Colorization for SUCCESS and FAILED
fn highlight_outcome(msg: String) -> String {
    if msg.contains("SUCCESS") || msg.contains("successful") {
        let green_text = Style::new().fg(Color::LightGreen).bold();
        msg.replace("SUCCESS", &format!("{}", green_text.paint("SUCCESS")))
            .replace("successful", &format!("{}", green_text.paint("successful")))
    } else if msg.contains("FAILED") || msg.contains("failed") {
        let red_text = Style::new().fg(Color::LightRed).bold();
        msg.replace("FAILED", &format!("{}", red_text.paint("FAILED")))
            .replace("failed", &format!("{}", red_text.paint("failed")))
    } else {
        msg
    }
}

pub struct FileFormatter;

impl<S, N> FormatEvent<S, N> for FileFormatter
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
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let level = event.metadata().level();

        write!(writer, "{} [{}] ", timestamp, level)?;

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        writeln!(writer, "{}", visitor.render())
    }
}
