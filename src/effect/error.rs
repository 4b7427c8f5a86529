//! Failure types shared by tasks and async lenses.
//!
//! - [`Absent`]: a getter's focus resolved to the absent sentinel. Carries the
//!   structure that lacked the focus.
//! - [`FocusError`]: a ready-made rejection type for async lenses.
//! - [`Crash`]: a task panicked instead of resolving or rejecting.

use std::any::Any;

/// The focus resolved to an absent value.
///
/// The payload is the structure the getter ran against, so callers can tell
/// which structure lacked the field.
///
/// # Examples
///
/// ```rust
/// use flens::effect::Absent;
///
/// let absent = Absent(vec![1, 2, 3]);
/// assert_eq!(format!("{absent}"), "focus is absent");
/// assert_eq!(absent.into_inner(), vec![1, 2, 3]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Absent<S>(pub S);

impl<S> Absent<S> {
    /// Returns the structure that lacked the focus.
    pub fn into_inner(self) -> S {
        self.0
    }
}

impl<S> std::fmt::Display for Absent<S> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "focus is absent")
    }
}

impl<S: std::fmt::Debug> std::error::Error for Absent<S> {}

/// Rejection reasons of an async lens over structures of type `S`.
///
/// Any type implementing `From<Absent<S>>` works as a rejection type; this
/// enum covers the common case of an absent focus plus caller-supplied
/// failures.
///
/// # Examples
///
/// ```rust
/// use flens::effect::{Absent, FocusError};
///
/// let error: FocusError<i32> = Absent(7).into();
/// assert_eq!(error, FocusError::Absent(7));
/// assert_eq!(
///     format!("{}", FocusError::<i32>::Rejected("offline".to_string())),
///     "rejected: offline"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusError<S> {
    /// The focus of this structure resolved to an absent value.
    Absent(S),
    /// An input task rejected with this reason.
    Rejected(String),
}

impl<S> FocusError<S> {
    /// Builds a [`FocusError::Rejected`] from anything printable.
    pub fn rejected(reason: impl std::fmt::Display) -> Self {
        Self::Rejected(reason.to_string())
    }
}

impl<S> From<Absent<S>> for FocusError<S> {
    fn from(absent: Absent<S>) -> Self {
        Self::Absent(absent.0)
    }
}

impl<S> std::fmt::Display for FocusError<S> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Absent(_) => write!(formatter, "focus is absent"),
            Self::Rejected(reason) => write!(formatter, "rejected: {reason}"),
        }
    }
}

impl<S: std::fmt::Debug> std::error::Error for FocusError<S> {}

/// A task panicked while running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crash {
    /// The panic message, or `"unknown panic"` for non-string payloads.
    pub message: String,
}

impl Crash {
    /// Builds a crash from a panic payload.
    pub fn from_panic(panic_info: &(dyn Any + Send)) -> Self {
        let message = panic_info
            .downcast_ref::<&str>()
            .map(|message| (*message).to_string())
            .or_else(|| panic_info.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Self { message }
    }
}

impl std::fmt::Display for Crash {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "task crashed: {}", self.message)
    }
}

impl std::error::Error for Crash {}
