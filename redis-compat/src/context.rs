//! Request-scoped call context

use std::borrow::Cow;
use std::time::Duration;
use tokio::time::Instant;

/// Values threaded through a single call: a deadline and an optional
/// sub-command label.
///
/// `Context` is cheap to clone; derived contexts never extend the parent's
/// deadline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    deadline: Option<Instant>,
    sub_command: Option<Cow<'static, str>>,
}

impl Context {
    /// A context with no deadline
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a context that expires after `timeout`, or at the parent's
    /// deadline if that comes first
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Derive a context that expires at `deadline`, or at the parent's
    /// deadline if that comes first
    #[must_use]
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(current) if current < deadline => current,
            _ => deadline,
        };
        Self {
            deadline: Some(deadline),
            sub_command: self.sub_command.clone(),
        }
    }

    /// Derive a context carrying a sub-command label (script names, composite verbs)
    #[must_use]
    pub fn with_sub_command_name(&self, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            deadline: self.deadline,
            sub_command: Some(name.into()),
        }
    }

    /// The deadline, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline; zero once it has passed
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Whether the deadline has passed
    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| d <= Instant::now())
    }

    /// The sub-command label, if any
    pub fn sub_command_name(&self) -> Option<&str> {
        self.sub_command.as_deref()
    }
}
