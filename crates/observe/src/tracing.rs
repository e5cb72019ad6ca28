use {
    crate::config::{Config, Format},
    std::{io::IsTerminal, panic::PanicHookInfo, sync::Once},
    time::macros::format_description,
    tracing_subscriber::{
        EnvFilter,
        Layer,
        Registry,
        fmt::{time::UtcTime, writer::MakeWriterExt as _},
        prelude::*,
        util::SubscriberInitExt,
    },
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Installs the global subscriber and a panic hook that reports panics as
/// error events. Must be called at most once per process.
pub fn initialize(config: &Config) {
    tracing_subscriber::registry().with(layer(config)).init();
    std::panic::set_hook(Box::new(log_panic));
    tracing::debug!(filter = %config.filter, format = ?config.format, "logging initialized");
}

/// [`initialize`] for tests: only the first call of the process installs
/// anything.
pub fn initialize_reentrant(filter: &str) {
    static INIT: Once = Once::new();
    INIT.call_once(|| initialize(&Config::new(filter)));
}

fn layer(config: &Config) -> impl Layer<Registry> {
    let writer = std::io::stdout
        .with_min_level(config.stderr_threshold)
        .or_else(std::io::stderr);
    let fmt = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_timer(UtcTime::new(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
        )));
    let fmt: BoxedLayer = match config.format {
        Format::Json => fmt.json().boxed(),
        Format::Text => fmt.with_ansi(std::io::stdout().is_terminal()).boxed(),
    };
    fmt.with_filter(EnvFilter::new(&config.filter))
}

fn log_panic(panic: &PanicHookInfo) {
    let thread = std::thread::current();
    let backtrace = std::backtrace::Backtrace::force_capture();
    tracing::error!(
        thread = thread.name().unwrap_or("<unnamed>"),
        "{panic}\nstack backtrace:\n{backtrace}"
    );
}
