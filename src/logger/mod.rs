//! Logger dispatch.
//!
//! # Responsibilities
//! - Gate each call against the current threshold before any formatting
//! - Format once, fan out to every capable handler in attachment order
//! - Re-initialize level-sensitive handlers when the threshold changes
//!
//! # Design Decisions
//! - The threshold lives in an atomic so the gate is a single relaxed
//!   load; handler-list access takes a read/write lock, which also makes
//!   concurrent `add_handler`/`set_level`/dispatch safe
//! - `fatal` never exits the process itself; it returns a `#[must_use]`
//!   [`Termination`] the caller acts on
//! - Handler emit calls are infallible; one destination cannot abort the
//!   fan-out

use std::fmt;
use std::io;
use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering;
use std::sync::RwLock;

use crate::handlers::Capabilities;
use crate::handlers::Handler;
use crate::handlers::HandlerError;
use crate::level::Level;

/// A handler plus the capability set recorded when it was attached.
struct HandlerEntry {
    caps: Capabilities,
    handler: Box<dyn Handler>,
}

/// The explicit terminate outcome of a [`Logger::fatal`] call.
///
/// Produced regardless of whether the message itself passed the
/// threshold gate: suppressing fatal *output* does not make the
/// condition survivable.
#[must_use = "fatal signals process termination; call exit() or act on exit_code()"]
#[derive(Debug)]
pub struct Termination(());

impl Termination {
    pub(crate) const fn new() -> Self {
        Self(())
    }

    /// Exit code signaling abnormal termination.
    pub const fn exit_code(&self) -> i32 {
        1
    }

    /// Terminate the process with [`exit_code`](Self::exit_code).
    pub fn exit(self) -> ! {
        std::process::exit(self.exit_code())
    }
}

/// A named log source with a severity threshold and attached handlers.
///
/// Created through the registry; exactly one instance exists per
/// case-insensitive namespace for the life of the process.
pub struct Logger {
    namespace: String,
    level: AtomicU8,
    handlers: RwLock<Vec<HandlerEntry>>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("namespace", &self.namespace)
            .field("level", &self.level())
            .finish_non_exhaustive()
    }
}

impl Logger {
    pub(crate) fn new(namespace: &str, level: Level) -> Self {
        Self {
            namespace: namespace.to_string(),
            level: AtomicU8::new(level as u8),
            handlers: RwLock::new(Vec::new()),
        }
    }

    /// The namespace in its display form (case preserved from the first
    /// creation).
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Current severity threshold.
    pub fn level(&self) -> Level {
        Level::from_u8(self.level.load(Ordering::Relaxed))
    }

    /// Whether a message at the given severity would be emitted.
    pub fn enabled(&self, severity: Level) -> bool {
        self.level() >= severity
    }

    /// Attach a handler. Its capabilities are recorded now; if it is
    /// level-sensitive it is initialized with the current threshold
    /// before becoming visible to dispatch. A failed initialization
    /// leaves the handler unattached.
    pub fn add_handler(&self, handler: Box<dyn Handler>) -> Result<(), HandlerError> {
        let caps = handler.capabilities();
        if caps.reinit {
            handler.reinit(self.level())?;
        }

        let mut handlers = self.handlers.write().expect("handler list poisoned");
        handlers.push(HandlerEntry { caps, handler });
        Ok(())
    }

    /// Update the threshold, then re-initialize every attached handler
    /// that is level-sensitive so its routing reflects the new value.
    ///
    /// All handlers are swept even if one fails; the first error is
    /// returned after the sweep. The threshold update itself is not
    /// rolled back.
    pub fn set_level(&self, level: Level) -> Result<(), HandlerError> {
        self.level.store(level as u8, Ordering::Relaxed);
        tracing::debug!(namespace = %self.namespace, level = %level, "threshold updated");

        let handlers = self.handlers.read().expect("handler list poisoned");
        let mut first_err = None;
        for entry in handlers.iter() {
            if entry.caps.reinit {
                if let Err(err) = entry.handler.reinit(level) {
                    first_err.get_or_insert(err);
                }
            }
        }

        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.dispatch(Level::Debug, args);
    }

    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.dispatch(Level::Info, args);
    }

    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.dispatch(Level::Warn, args);
    }

    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.dispatch(Level::Error, args);
    }

    /// Log at fatal severity and return the terminate outcome.
    ///
    /// Output is gated at the `Error` threshold exactly like
    /// [`error`](Self::error); the returned [`Termination`] is produced
    /// either way.
    pub fn fatal(&self, args: fmt::Arguments<'_>) -> Termination {
        if self.enabled(Level::Error) {
            let msg = args.to_string();
            let handlers = self.handlers.read().expect("handler list poisoned");
            for entry in handlers.iter() {
                if entry.caps.fatal {
                    entry.handler.fatal(&msg);
                }
            }
        }

        Termination::new()
    }

    /// An `io::Write` adapter that logs each write as one `Info`
    /// message, with the trailing newline trimmed. Useful for plugging
    /// the logger under APIs that expect a writer.
    pub fn info_writer(&self) -> InfoWriter<'_> {
        InfoWriter { logger: self }
    }

    fn dispatch(&self, severity: Level, args: fmt::Arguments<'_>) {
        if !self.enabled(severity) {
            return;
        }

        let msg = args.to_string();
        let handlers = self.handlers.read().expect("handler list poisoned");
        for entry in handlers.iter() {
            if entry.caps.supports(severity) {
                match severity {
                    Level::Debug => entry.handler.debug(&msg),
                    Level::Info => entry.handler.info(&msg),
                    Level::Warn => entry.handler.warn(&msg),
                    Level::Error => entry.handler.error(&msg),
                    Level::None => {}
                }
            }
        }
    }
}

/// See [`Logger::info_writer`].
pub struct InfoWriter<'a> {
    logger: &'a Logger,
}

impl io::Write for InfoWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        let trimmed = text.trim_end_matches('\n');
        self.logger.info(format_args!("{trimmed}"));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Capture {
        messages: Mutex<Vec<(Level, String)>>,
        reinits: Mutex<Vec<Level>>,
        caps: Option<Capabilities>,
    }

    impl Capture {
        fn with_caps(caps: Capabilities) -> Self {
            Self {
                caps: Some(caps),
                ..Self::default()
            }
        }

        fn messages(&self) -> Vec<(Level, String)> {
            self.messages.lock().unwrap().clone()
        }

        fn push(&self, severity: Level, msg: &str) {
            self.messages
                .lock()
                .unwrap()
                .push((severity, msg.to_string()));
        }
    }

    impl Handler for Capture {
        fn capabilities(&self) -> Capabilities {
            self.caps.unwrap_or(Capabilities::all())
        }

        fn reinit(&self, level: Level) -> Result<(), HandlerError> {
            self.reinits.lock().unwrap().push(level);
            Ok(())
        }

        fn debug(&self, msg: &str) {
            self.push(Level::Debug, msg);
        }

        fn info(&self, msg: &str) {
            self.push(Level::Info, msg);
        }

        fn warn(&self, msg: &str) {
            self.push(Level::Warn, msg);
        }

        fn error(&self, msg: &str) {
            self.push(Level::Error, msg);
        }

        fn fatal(&self, msg: &str) {
            self.push(Level::None, msg);
        }
    }

    fn logger_with_capture(level: Level) -> (Logger, Arc<Capture>) {
        let logger = Logger::new("test", level);
        let capture = Arc::new(Capture::default());
        logger.add_handler(Box::new(SharedCapture(capture.clone()))).unwrap();
        (logger, capture)
    }

    struct SharedCapture(Arc<Capture>);

    impl Handler for SharedCapture {
        fn capabilities(&self) -> Capabilities {
            self.0.capabilities()
        }

        fn reinit(&self, level: Level) -> Result<(), HandlerError> {
            self.0.reinit(level)
        }

        fn debug(&self, msg: &str) {
            self.0.debug(msg);
        }

        fn info(&self, msg: &str) {
            self.0.info(msg);
        }

        fn warn(&self, msg: &str) {
            self.0.warn(msg);
        }

        fn error(&self, msg: &str) {
            self.0.error(msg);
        }

        fn fatal(&self, msg: &str) {
            self.0.fatal(msg);
        }
    }

    struct FormatProbe(Arc<AtomicUsize>);

    impl fmt::Display for FormatProbe {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            self.0.fetch_add(1, Ordering::SeqCst);
            f.write_str("probe")
        }
    }

    #[test]
    fn gate_suppresses_below_threshold() {
        let (logger, capture) = logger_with_capture(Level::Warn);

        logger.debug(format_args!("d"));
        logger.info(format_args!("i"));
        logger.warn(format_args!("w"));
        logger.error(format_args!("e"));

        assert_eq!(
            capture.messages(),
            vec![
                (Level::Warn, "w".to_string()),
                (Level::Error, "e".to_string())
            ]
        );
    }

    #[test]
    fn suppressed_calls_never_format() {
        let (logger, _capture) = logger_with_capture(Level::Error);
        let count = Arc::new(AtomicUsize::new(0));

        logger.debug(format_args!("{}", FormatProbe(count.clone())));
        logger.info(format_args!("{}", FormatProbe(count.clone())));
        assert_eq!(count.load(Ordering::SeqCst), 0);

        logger.error(format_args!("{}", FormatProbe(count.clone())));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn fan_out_respects_attachment_order() {
        let logger = Logger::new("order", Level::Info);
        let first = Arc::new(Capture::default());
        let second = Arc::new(Capture::default());
        logger.add_handler(Box::new(SharedCapture(first.clone()))).unwrap();
        logger.add_handler(Box::new(SharedCapture(second.clone()))).unwrap();

        logger.info(format_args!("hello"));

        assert_eq!(first.messages(), vec![(Level::Info, "hello".to_string())]);
        assert_eq!(second.messages(), vec![(Level::Info, "hello".to_string())]);
    }

    #[test]
    fn capability_filter_skips_unsupporting_handlers() {
        let logger = Logger::new("caps", Level::Debug);
        let errors_only = Arc::new(Capture::with_caps(Capabilities {
            error: true,
            fatal: true,
            ..Capabilities::none()
        }));
        logger
            .add_handler(Box::new(SharedCapture(errors_only.clone())))
            .unwrap();

        logger.debug(format_args!("d"));
        logger.error(format_args!("e"));

        assert_eq!(errors_only.messages(), vec![(Level::Error, "e".to_string())]);
    }

    #[test]
    fn attach_initializes_with_current_threshold() {
        let (_logger, capture) = logger_with_capture(Level::Warn);
        assert_eq!(capture.reinits.lock().unwrap().as_slice(), &[Level::Warn]);
    }

    #[test]
    fn set_level_reinitializes_handlers() {
        let (logger, capture) = logger_with_capture(Level::Info);

        logger.set_level(Level::Debug).unwrap();

        assert_eq!(logger.level(), Level::Debug);
        assert_eq!(
            capture.reinits.lock().unwrap().as_slice(),
            &[Level::Info, Level::Debug]
        );

        logger.debug(format_args!("now visible"));
        assert_eq!(
            capture.messages(),
            vec![(Level::Debug, "now visible".to_string())]
        );
    }

    #[test]
    fn fatal_emits_at_error_threshold_and_returns_termination() {
        let (logger, capture) = logger_with_capture(Level::Error);

        let termination = logger.fatal(format_args!("boom"));
        assert_eq!(termination.exit_code(), 1);
        assert_eq!(capture.messages(), vec![(Level::None, "boom".to_string())]);
    }

    #[test]
    fn fatal_suppressed_below_error_still_terminates() {
        let (logger, capture) = logger_with_capture(Level::None);

        let termination = logger.fatal(format_args!("boom"));
        assert_eq!(termination.exit_code(), 1);
        assert!(capture.messages().is_empty());
    }

    #[test]
    fn info_writer_trims_trailing_newline() {
        let (logger, capture) = logger_with_capture(Level::Info);

        let mut writer = logger.info_writer();
        io::Write::write_all(&mut writer, b"from a writer\n").unwrap();

        assert_eq!(
            capture.messages(),
            vec![(Level::Info, "from a writer".to_string())]
        );
    }
}
