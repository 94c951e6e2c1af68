use std::time::Duration;

use folio_protocol::{Point, Rect};
use serde::Serialize;
use thiserror::Error;

use crate::pointer::spotlight_position;
use crate::schedule::{Scheduler, TimerHandle, TimerToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Message,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Email, Field::Message];

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Email => "E-mail",
            Field::Message => "Message",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactError {
    #[error("a message is already being sent")]
    Submitting,
    #[error("{} is required", .0.label())]
    MissingField(Field),
    #[error("`{0}` is not an e-mail address")]
    InvalidEmail(String),
    #[error("message is limited to {limit} characters")]
    MessageTooLong { limit: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactFields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Message => &self.message,
        }
    }

    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Message => &mut self.message,
        }
    }
}

/// The contact form. Submission is simulated: the form reports
/// "submitting" for a fixed delay, then clears itself.
pub struct ContactForm<H: TimerHandle> {
    fields: ContactFields,
    focused: Option<Field>,
    pending: Option<H>,
    message_limit: usize,
    submit_delay: Duration,
    spotlight: Point,
}

impl<H: TimerHandle> ContactForm<H> {
    pub fn new(message_limit: usize, submit_delay: Duration) -> Self {
        Self {
            fields: ContactFields::default(),
            focused: None,
            pending: None,
            message_limit,
            submit_delay,
            spotlight: Point::default(),
        }
    }

    pub fn fields(&self) -> &ContactFields {
        &self.fields
    }

    pub fn focused(&self) -> Option<Field> {
        self.focused
    }

    pub fn is_submitting(&self) -> bool {
        self.pending.is_some()
    }

    pub fn message_limit(&self) -> usize {
        self.message_limit
    }

    /// Character counter shown above the message box, e.g. `"42 / 500"`.
    pub fn message_counter(&self) -> String {
        format!(
            "{} / {}",
            self.fields.message.chars().count(),
            self.message_limit
        )
    }

    /// Spotlight centre in form-relative fractions.
    pub fn spotlight(&self) -> Point {
        self.spotlight
    }

    /// Replace a field's text. A message longer than the limit is rejected
    /// and the previous text kept.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) -> Result<(), ContactError> {
        let value = value.into();
        if field == Field::Message && value.chars().count() > self.message_limit {
            return Err(ContactError::MessageTooLong {
                limit: self.message_limit,
            });
        }
        *self.fields.slot(field) = value;
        Ok(())
    }

    /// Append one typed character to a field.
    pub fn type_char(&mut self, field: Field, ch: char) -> Result<(), ContactError> {
        let mut value = self.fields.get(field).to_string();
        value.push(ch);
        self.set_field(field, value)
    }

    /// Remove the last character of a field.
    pub fn backspace(&mut self, field: Field) {
        self.fields.slot(field).pop();
    }

    pub fn focus(&mut self, field: Field) {
        self.focused = Some(field);
    }

    pub fn blur(&mut self) {
        self.focused = None;
    }

    pub fn pointer_moved(&mut self, pointer: Point, form: Rect) {
        self.spotlight = spotlight_position(pointer, form);
    }

    /// Validate and start the simulated send.
    pub fn submit<S>(&mut self, scheduler: &mut S) -> Result<(), ContactError>
    where
        S: Scheduler<Handle = H>,
    {
        if self.pending.is_some() {
            return Err(ContactError::Submitting);
        }
        for field in Field::ALL {
            if self.fields.get(field).trim().is_empty() {
                return Err(ContactError::MissingField(field));
            }
        }
        if !looks_like_email(&self.fields.email) {
            return Err(ContactError::InvalidEmail(self.fields.email.clone()));
        }

        self.pending = Some(scheduler.after(self.submit_delay));
        tracing::debug!("contact form submitting");
        Ok(())
    }

    /// Complete the send when its timer fires. Returns whether `token`
    /// belonged to this form.
    pub fn on_timer(&mut self, token: TimerToken) -> bool {
        if self.pending.as_ref().map(TimerHandle::token) != Some(token) {
            return false;
        }
        self.pending = None;
        self.fields = ContactFields::default();
        tracing::debug!("contact form sent");
        true
    }
}

impl<H: TimerHandle> Drop for ContactForm<H> {
    fn drop(&mut self) {
        if let Some(mut pending) = self.pending.take() {
            pending.cancel();
        }
    }
}

impl<H: TimerHandle> std::fmt::Debug for ContactForm<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactForm")
            .field("fields", &self.fields)
            .field("focused", &self.focused)
            .field("submitting", &self.is_submitting())
            .finish()
    }
}

fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !value.contains(' ')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{QueuedTimer, TimerQueue};

    fn form() -> ContactForm<QueuedTimer> {
        ContactForm::new(500, Duration::from_millis(2000))
    }

    fn filled() -> ContactForm<QueuedTimer> {
        let mut form = form();
        form.set_field(Field::Name, "Ada").unwrap();
        form.set_field(Field::Email, "ada@example.com").unwrap();
        form.set_field(Field::Message, "Hello there").unwrap();
        form
    }

    #[test]
    fn message_over_limit_is_rejected() {
        let mut form = form();
        form.set_field(Field::Message, "a".repeat(500)).unwrap();
        assert_eq!(form.message_counter(), "500 / 500");

        let err = form.type_char(Field::Message, 'b').unwrap_err();
        assert_eq!(err, ContactError::MessageTooLong { limit: 500 });
        assert_eq!(form.fields().message.len(), 500);
    }

    #[test]
    fn counter_counts_characters_not_bytes() {
        let mut form = form();
        form.set_field(Field::Message, "héllo").unwrap();
        assert_eq!(form.message_counter(), "5 / 500");
    }

    #[test]
    fn typing_and_backspace_edit_the_field() {
        let mut form = form();
        form.type_char(Field::Name, 'A').unwrap();
        form.type_char(Field::Name, 'd').unwrap();
        form.backspace(Field::Name);
        assert_eq!(form.fields().name, "A");
    }

    #[test]
    fn focus_tracks_one_field() {
        let mut form = form();
        form.focus(Field::Email);
        assert_eq!(form.focused(), Some(Field::Email));
        form.focus(Field::Message);
        assert_eq!(form.focused(), Some(Field::Message));
        form.blur();
        assert_eq!(form.focused(), None);
    }

    #[test]
    fn submit_requires_every_field() {
        let mut queue = TimerQueue::new();
        let mut form = form();
        form.set_field(Field::Name, "Ada").unwrap();
        assert_eq!(
            form.submit(&mut queue),
            Err(ContactError::MissingField(Field::Email))
        );

        form.set_field(Field::Email, "not-an-address").unwrap();
        form.set_field(Field::Message, "  ").unwrap();
        assert_eq!(
            form.submit(&mut queue),
            Err(ContactError::MissingField(Field::Message))
        );

        form.set_field(Field::Message, "Hi").unwrap();
        assert!(matches!(
            form.submit(&mut queue),
            Err(ContactError::InvalidEmail(_))
        ));
        assert!(!form.is_submitting());
    }

    #[test]
    fn simulated_send_clears_after_delay() {
        let mut queue = TimerQueue::new();
        let mut form = filled();
        form.submit(&mut queue).unwrap();
        assert!(form.is_submitting());
        assert_eq!(form.submit(&mut queue), Err(ContactError::Submitting));

        for token in queue.advance(Duration::from_millis(1999)) {
            form.on_timer(token);
        }
        assert!(form.is_submitting());

        let fired = queue.advance(Duration::from_millis(1));
        assert_eq!(fired.len(), 1);
        assert!(form.on_timer(fired[0]));
        assert!(!form.is_submitting());
        assert_eq!(form.fields(), &ContactFields::default());
    }

    #[test]
    fn foreign_token_is_ignored() {
        let mut queue = TimerQueue::new();
        let mut form = filled();
        let other = queue.after(Duration::from_millis(10));
        form.submit(&mut queue).unwrap();

        assert!(!form.on_timer(other.token()));
        assert!(form.is_submitting());
    }

    #[test]
    fn spotlight_follows_pointer() {
        let mut form = form();
        form.pointer_moved(Point::new(150.0, 50.0), Rect::new(100.0, 0.0, 200.0, 100.0));
        assert_eq!(form.spotlight(), Point::new(0.25, 0.5));
    }

    #[test]
    fn email_shape() {
        assert!(looks_like_email("a@b"));
        assert!(!looks_like_email("@b"));
        assert!(!looks_like_email("a@"));
        assert!(!looks_like_email("a@b@c"));
        assert!(!looks_like_email("a b@c"));
    }
}
