use std::collections::HashMap;
use std::io::stdout;
use std::path::Path;

use tracing::dispatcher::Dispatch;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::Layer as FmtLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, Registry};

use crate::config::{AppBasepathCfg, AppLogHandlerCfg, AppLoggerCfg, AppLoggingCfg};
use crate::constant::logging::{Destination, Level};
use crate::AppLogAlias;

pub type AppLogLevel = Level;

// writer shared by all loggers which refer to the same handler alias
struct LogSink {
    writer: NonBlocking,
    min_level: tracing::Level,
}

/// Loggers are looked up by module path of the code emitting the event,
/// see the macro `app_log_event`
pub struct AppLogContext {
    loggers: HashMap<AppLogAlias, Dispatch>,
    // pending messages are flushed when the guards are dropped
    _flush_guards: Vec<WorkerGuard>,
}

// exported because the binaries and tests expand `app_log_event` outside
// this crate
#[macro_export]
macro_rules! to_3rdparty_level {
    ($lvlin:expr) => {
        match $lvlin {
            $crate::logging::AppLogLevel::TRACE => tracing::Level::TRACE,
            $crate::logging::AppLogLevel::DEBUG => tracing::Level::DEBUG,
            $crate::logging::AppLogLevel::INFO => tracing::Level::INFO,
            $crate::logging::AppLogLevel::WARNING => tracing::Level::WARN,
            $crate::logging::AppLogLevel::ERROR | $crate::logging::AppLogLevel::FATAL => {
                tracing::Level::ERROR
            }
        }
    };
}

fn open_sink(basepath: &AppBasepathCfg, cfg: &AppLogHandlerCfg) -> Option<(LogSink, WorkerGuard)> {
    let (writer, guard) = match cfg.destination {
        Destination::CONSOLE => tracing_appender::non_blocking(stdout()),
        Destination::LOCALFS => {
            let fullpath = basepath.resolve(cfg.path.as_ref()?.as_str());
            let p = Path::new(fullpath.as_str());
            let appender = tracing_appender::rolling::never(p.parent()?, p.file_name()?);
            tracing_appender::non_blocking(appender)
        }
    }; // each non-blocking writer runs in its own thread
    let sink = LogSink {
        writer,
        min_level: to_3rdparty_level!(&cfg.min_level),
    };
    Some((sink, guard))
}

fn build_dispatcher(cfg: &AppLoggerCfg, sinks: &HashMap<AppLogAlias, LogSink>) -> Dispatch {
    let lvl_override = cfg.level.as_ref().map(|l| to_3rdparty_level!(l));
    let layers = cfg
        .handlers
        .iter()
        .filter_map(|alias| sinks.get(alias))
        .map(|sink| {
            let lvl = lvl_override.unwrap_or(sink.min_level);
            FmtLayer::new()
                .with_writer(sink.writer.clone())
                .with_file(false)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(true)
                .with_filter(LevelFilter::from_level(lvl))
        })
        .collect::<Vec<_>>();
    Dispatch::new(Registry::default().with(layers))
}

impl AppLogContext {
    /// handlers with unusable destination are skipped, loggers referring
    /// to them keep the rest of their handlers
    pub fn new(basepath: &AppBasepathCfg, cfg: &AppLoggingCfg) -> Self {
        let mut sinks = HashMap::new();
        let mut guards = Vec::new();
        for hcfg in cfg.handlers.iter() {
            if let Some((sink, guard)) = open_sink(basepath, hcfg) {
                sinks.insert(hcfg.alias.clone(), sink);
                guards.push(guard);
            }
        }
        let loggers = cfg
            .loggers
            .iter()
            .map(|lcfg| (lcfg.alias.clone(), build_dispatcher(lcfg, &sinks)))
            .collect();
        Self {
            loggers,
            _flush_guards: guards,
        }
    }

    pub fn get_assigner(&self, key: &str) -> Option<&Dispatch> {
        self.loggers.get(&key.to_string())
    }
} // end of impl AppLogContext

/// dispatch an event to the logger registered with the module path of the
/// caller, print to stdout if nothing is registered
#[macro_export]
macro_rules! app_log_event {
    ( $ctx:ident, $lvl:expr, $($arg:tt)+ ) => {{
        const MOD_PATH: &str = module_path!();
        match $ctx.get_assigner(MOD_PATH) {
            Some(dispatcher) => {
                const LVL_INNER: tracing::Level = $crate::logging::to_3rdparty_level!($lvl);
                tracing::dispatcher::with_default(dispatcher, || {
                    tracing::event!(LVL_INNER, $($arg)+);
                });
            }
            None => {
                println!("[WARN] no logger at module path: {}", MOD_PATH);
                println!($($arg)+);
            }
        }
    }};
}

pub use app_log_event;
pub use to_3rdparty_level;
