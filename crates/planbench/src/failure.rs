//! Captured run failures.

use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A run failure captured as a plain value.
///
/// Holds the message and stack trace text of the error that stopped a run,
/// plus its cause chain, so reports can show why a configuration failed
/// without keeping the original error type alive.
///
/// # Example
///
/// ```
/// use planbench::RunFailure;
///
/// let failure = RunFailure::new("OutOfMemory")
///     .with_cause(RunFailure::new("allocation of 2 GiB failed"));
///
/// assert_eq!(failure.message(), "OutOfMemory");
/// assert_eq!(failure.cause().unwrap().message(), "allocation of 2 GiB failed");
/// assert_eq!(failure.to_string(), "OutOfMemory\ncaused by: allocation of 2 GiB failed");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunFailure {
    message: String,
    #[serde(default)]
    stack_trace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cause: Option<Box<RunFailure>>,
}

impl RunFailure {
    /// Creates a failure with a message and no stack trace.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack_trace: String::new(),
            cause: None,
        }
    }

    /// Attaches stack trace text.
    pub fn with_stack_trace(mut self, stack_trace: impl Into<String>) -> Self {
        self.stack_trace = stack_trace.into();
        self
    }

    /// Attaches the failure that caused this one.
    pub fn with_cause(mut self, cause: RunFailure) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Captures an error and its `source()` chain.
    ///
    /// The backtrace is taken at the capture site and is only present when
    /// backtraces are enabled through `RUST_BACKTRACE` or `RUST_LIB_BACKTRACE`.
    pub fn from_error(error: &(dyn Error + 'static)) -> Self {
        let backtrace = Backtrace::capture();
        let stack_trace = match backtrace.status() {
            BacktraceStatus::Captured => backtrace.to_string(),
            _ => String::new(),
        };
        Self::from_error_chain(error).with_stack_trace(stack_trace)
    }

    fn from_error_chain(error: &(dyn Error + 'static)) -> Self {
        let failure = Self::new(error.to_string());
        match error.source() {
            Some(source) => failure.with_cause(Self::from_error_chain(source)),
            None => failure,
        }
    }

    /// Captures the payload of a caught panic.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "run panicked with a non-string payload".to_string()
        };
        Self::new(format!("panicked: {}", message))
    }

    /// Returns the failure message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the stack trace text; empty when none was captured.
    pub fn stack_trace(&self) -> &str {
        &self.stack_trace
    }

    /// Returns the underlying cause, if any.
    pub fn cause(&self) -> Option<&RunFailure> {
        self.cause.as_deref()
    }

    /// Iterates over this failure followed by each nested cause.
    pub fn chain(&self) -> impl Iterator<Item = &RunFailure> {
        std::iter::successors(Some(self), |f| f.cause.as_deref())
    }
}

impl fmt::Display for RunFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        for cause in self.chain().skip(1) {
            write!(f, "\ncaused by: {}", cause.message)?;
        }
        Ok(())
    }
}

impl Error for RunFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_deref().map(|c| c as &(dyn Error + 'static))
    }
}
