use thiserror::Error;

/// The cause carried by a failed promise.
///
/// A `Fault` is always present on the failure path; there is no way to
/// reject a cell without one. When a failure occurs while another
/// failure was already being handled (a recovery handler that itself
/// fails, a cleanup body that fails after the source failed), the
/// earlier cause is kept as the *suppressed* cause of the new one so
/// the history of the failure is never lost.
///
/// The suppressed cause doubles as the [`std::error::Error::source`],
/// so ordinary error-chain reporting walks it for free.
///
/// # Examples
///
/// ```
/// use promise_cell::Fault;
/// let original = Fault::new("disk unplugged");
/// let raised = Fault::new("cleanup failed").suppress(original);
/// assert_eq!(raised.suppressed().unwrap().message(), "disk unplugged");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Fault {
    message: String,
    #[source]
    suppressed: Option<Box<Fault>>,
}

impl Fault {
    /// Creates a fault with the given message and no suppressed cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suppressed: None,
        }
    }

    /// The fault's message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Attaches `earlier` as this fault's suppressed cause.
    ///
    /// If a suppressed cause is already present, `earlier` is chained
    /// beneath it, so repeated double-failures stack oldest-last.
    #[must_use]
    pub fn suppress(self, earlier: Fault) -> Self {
        let suppressed = match self.suppressed {
            None => Box::new(earlier),
            Some(prior) => Box::new(prior.suppress(earlier)),
        };
        Self {
            message: self.message,
            suppressed: Some(suppressed),
        }
    }

    /// The suppressed cause, if a double-failure attached one.
    pub fn suppressed(&self) -> Option<&Fault> {
        self.suppressed.as_deref()
    }
}

impl From<&str> for Fault {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for Fault {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}
