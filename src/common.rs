// Licensed under the Apache-2.0 license

//! Crate-wide helpers shared by the peripheral drivers.
//!
//! Drivers never log through a global. They take a [`Logger`] as a generic
//! parameter, defaulting to [`NoOpLogger`], so that firmware without a
//! console pays nothing for diagnostics.

use core::fmt;

/// Sink for driver diagnostics.
pub trait Logger {
    fn debug(&mut self, args: fmt::Arguments<'_>);

    fn error(&mut self, args: fmt::Arguments<'_>);
}

impl<L: Logger + ?Sized> Logger for &mut L {
    fn debug(&mut self, args: fmt::Arguments<'_>) {
        (**self).debug(args);
    }

    fn error(&mut self, args: fmt::Arguments<'_>) {
        (**self).error(args);
    }
}

/// Discards everything.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoOpLogger;

impl Logger for NoOpLogger {
    fn debug(&mut self, _args: fmt::Arguments<'_>) {}

    fn error(&mut self, _args: fmt::Arguments<'_>) {}
}

/// Writes one line per message to a byte sink such as a UART.
///
/// Write failures are dropped: a broken console must not change driver
/// behaviour.
pub struct UartLogger<W: embedded_io::Write> {
    writer: W,
}

impl<W: embedded_io::Write> UartLogger<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn line(&mut self, level: &str, args: fmt::Arguments<'_>) {
        let _ = write!(self.writer, "[{level}] {args}\r\n");
    }
}

impl<W: embedded_io::Write> Logger for UartLogger<W> {
    fn debug(&mut self, args: fmt::Arguments<'_>) {
        self.line("DEBUG", args);
    }

    fn error(&mut self, args: fmt::Arguments<'_>) {
        self.line("ERROR", args);
    }
}

/// Forwards to the `log` facade.
#[cfg(feature = "log")]
#[derive(Copy, Clone, Debug, Default)]
pub struct LogFacade;

#[cfg(feature = "log")]
impl Logger for LogFacade {
    fn debug(&mut self, args: fmt::Arguments<'_>) {
        log::debug!("{}", args);
    }

    fn error(&mut self, args: fmt::Arguments<'_>) {
        log::error!("{}", args);
    }
}
