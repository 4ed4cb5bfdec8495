use std::time::{Duration, Instant};

/// Validation problems the user can fix right away
pub const VALIDATION_DISMISS: Duration = Duration::from_secs(3);
/// Batch results and operation errors
pub const RESULT_DISMISS: Duration = Duration::from_secs(5);
/// Long enough to copy the share URL
pub const SAVE_SUCCESS_DISMISS: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    expires_at: Option<Instant>,
}

/// A single transient message slot
#[derive(Debug, Default)]
pub struct StatusLine {
    current: Option<StatusMessage>,
}

impl StatusLine {
    /// Replace the message. `None` keeps it until the next one.
    pub fn show(&mut self, text: impl Into<String>, kind: StatusKind, dismiss_after: Option<Duration>) {
        self.current = Some(StatusMessage {
            text: text.into(),
            kind,
            expires_at: dismiss_after.map(|d| Instant::now() + d),
        });
    }

    /// The message, unless it has been dismissed or expired.
    pub fn current(&self) -> Option<&StatusMessage> {
        self.current_at(Instant::now())
    }

    pub fn current_at(&self, now: Instant) -> Option<&StatusMessage> {
        self.current
            .as_ref()
            .filter(|m| m.expires_at.map_or(true, |at| now < at))
    }

    pub fn hide(&mut self) {
        self.current = None;
    }
}
