//! Registration form controller.
//!
//! Owns the text of the four form fields, a [`FieldState`] per field and the
//! overall [`ScreenState`]. Every mutation is published to observers through a
//! `watch` channel so the rendering layer can redraw banners, highlighting and
//! the loading indicator.

use shared::{domain::UserHandle, error::RegistrationErrorKind, protocol::RegisterRequest};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    navigation::{Navigator, Screen},
    RegistrationService,
};

pub const DEFAULT_PASSWORD_MAX_LEN: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    Email,
    Password,
    RepeatPassword,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Name,
        FormField::Email,
        FormField::Password,
        FormField::RepeatPassword,
    ];

    fn is_password(self) -> bool {
        matches!(self, FormField::Password | FormField::RepeatPassword)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldState {
    #[default]
    Initial,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScreenState {
    #[default]
    Initial,
    Loading,
    Success(UserHandle),
    EmptyFields,
    PasswordsNotEquals,
    EmailNotCorrect,
    PasswordNotCorrect,
    AlreadyRegisteredEmail,
    /// Unclassified failure from the registration service.
    Failed(String),
}

impl ScreenState {
    /// Banner text for error states, `None` otherwise.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            ScreenState::Initial | ScreenState::Loading | ScreenState::Success(_) => None,
            ScreenState::EmptyFields => Some("Fields are empty"),
            ScreenState::PasswordsNotEquals => Some("Passwords do not match"),
            ScreenState::EmailNotCorrect => Some("Email is not correct"),
            ScreenState::PasswordNotCorrect => Some("Password does not meet the requirements"),
            ScreenState::AlreadyRegisteredEmail => Some("A user with this email already exists"),
            ScreenState::Failed(message) => Some(message.as_str()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ScreenState::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ScreenState::Success(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldStates {
    pub name: FieldState,
    pub email: FieldState,
    pub password: FieldState,
    pub repeat_password: FieldState,
}

impl FieldStates {
    pub fn get(&self, field: FormField) -> FieldState {
        match field {
            FormField::Name => self.name,
            FormField::Email => self.email,
            FormField::Password => self.password,
            FormField::RepeatPassword => self.repeat_password,
        }
    }

    fn set(&mut self, field: FormField, state: FieldState) {
        match field {
            FormField::Name => self.name = state,
            FormField::Email => self.email = state,
            FormField::Password => self.password = state,
            FormField::RepeatPassword => self.repeat_password = state,
        }
    }

    fn set_passwords(&mut self, state: FieldState) {
        self.password = state;
        self.repeat_password = state;
    }
}

/// What the rendering layer reads after each mutation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegistrationView {
    pub screen: ScreenState,
    pub fields: FieldStates,
}

impl RegistrationView {
    pub fn field(&self, field: FormField) -> FieldState {
        self.fields.get(field)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormSnapshot {
    pub name: String,
    pub email: String,
    pub password: String,
    pub repeat_password: String,
}

impl FormSnapshot {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        repeat_password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            repeat_password: repeat_password.into(),
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Password => &self.password,
            FormField::RepeatPassword => &self.repeat_password,
        }
    }

    fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::Password => &mut self.password,
            FormField::RepeatPassword => &mut self.repeat_password,
        }
    }

    fn empty_fields(&self) -> Vec<FormField> {
        FormField::ALL
            .into_iter()
            .filter(|field| self.value(*field).is_empty())
            .collect()
    }
}

/// A registration call that has been started but not yet resolved.
///
/// Not `Clone`: [`RegistrationController::complete_submit`] consumes it, so
/// each submit observes at most one outcome.
#[derive(Debug)]
#[must_use = "a pending registration must be completed with the service outcome"]
pub struct PendingRegistration {
    request: RegisterRequest,
}

impl PendingRegistration {
    pub fn request(&self) -> &RegisterRequest {
        &self.request
    }
}

pub struct RegistrationController {
    form: FormSnapshot,
    view: RegistrationView,
    password_max_len: usize,
    navigation_pending: bool,
    publisher: watch::Sender<RegistrationView>,
}

impl Default for RegistrationController {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationController {
    pub fn new() -> Self {
        Self::with_password_max_len(DEFAULT_PASSWORD_MAX_LEN)
    }

    pub fn with_password_max_len(password_max_len: usize) -> Self {
        let view = RegistrationView::default();
        let (publisher, _) = watch::channel(view.clone());
        Self {
            form: FormSnapshot::default(),
            view,
            password_max_len,
            navigation_pending: false,
            publisher,
        }
    }

    pub fn view(&self) -> &RegistrationView {
        &self.view
    }

    pub fn screen_state(&self) -> &ScreenState {
        &self.view.screen
    }

    pub fn field_state(&self, field: FormField) -> FieldState {
        self.view.field(field)
    }

    pub fn value(&self, field: FormField) -> &str {
        self.form.value(field)
    }

    pub fn subscribe(&self) -> watch::Receiver<RegistrationView> {
        self.publisher.subscribe()
    }

    /// Current text of all four fields.
    pub fn snapshot(&self) -> FormSnapshot {
        self.form.clone()
    }

    pub fn on_field_changed(&mut self, field: FormField, new_value: impl Into<String>) {
        let mut new_value = new_value.into();
        if field.is_password() {
            truncate_chars(&mut new_value, self.password_max_len);
        }
        *self.form.value_mut(field) = new_value;

        self.view.fields.set(field, FieldState::Initial);
        self.set_screen(ScreenState::Initial);

        if field.is_password() {
            if self.form.password != self.form.repeat_password {
                self.view.fields.set_passwords(FieldState::Error);
                self.set_screen(ScreenState::PasswordsNotEquals);
            } else {
                self.view.fields.set_passwords(FieldState::Initial);
            }
        }

        debug!(?field, screen = ?self.view.screen, "registration field changed");
        self.publish();
    }

    /// Validates `snapshot` and, when every field is filled, moves to
    /// `Loading` and returns the request to hand to the registration service.
    pub fn begin_submit(&mut self, snapshot: FormSnapshot) -> Option<PendingRegistration> {
        let empty = snapshot.empty_fields();
        for field in &empty {
            self.view.fields.set(*field, FieldState::Error);
        }

        if !empty.is_empty() {
            debug!(?empty, "registration rejected: empty fields");
            self.set_screen(ScreenState::EmptyFields);
            self.publish();
            return None;
        }

        self.set_screen(ScreenState::Loading);
        self.publish();
        info!("registration submitted");
        debug!(email = %snapshot.email, "registration request prepared");

        let FormSnapshot {
            name,
            email,
            password,
            ..
        } = snapshot;
        Some(PendingRegistration {
            request: RegisterRequest {
                name,
                email,
                password,
            },
        })
    }

    pub fn complete_submit(
        &mut self,
        pending: PendingRegistration,
        result: Result<UserHandle, RegistrationErrorKind>,
    ) {
        match result {
            Ok(user) => {
                info!(user_id = user.user_id.0, "registration succeeded");
                self.set_screen(ScreenState::Success(user));
                self.navigation_pending = true;
            }
            Err(err) => {
                warn!(error = %err, "registration failed");
                debug!(email = %pending.request.email, "rejected registration request");
                let (screen, fields) = classify_registration_failure(&err);
                for field in fields {
                    self.view.fields.set(*field, FieldState::Error);
                }
                self.set_screen(screen);
            }
        }
        self.publish();
    }

    pub async fn submit<S>(&mut self, service: &S, snapshot: FormSnapshot) -> &ScreenState
    where
        S: RegistrationService + ?Sized,
    {
        if let Some(pending) = self.begin_submit(snapshot) {
            let result = service.register(pending.request()).await;
            self.complete_submit(pending, result);
        }
        &self.view.screen
    }

    /// Forward transition owed after a success, yielded once per success.
    pub fn take_navigation(&mut self) -> Option<Screen> {
        if !self.navigation_pending {
            return None;
        }
        self.navigation_pending = false;
        Some(Screen::Auth)
    }

    pub fn sync_navigation(&mut self, navigator: &mut dyn Navigator) -> bool {
        match self.take_navigation() {
            Some(screen) => {
                navigator.navigate(screen);
                true
            }
            None => false,
        }
    }

    fn set_screen(&mut self, screen: ScreenState) {
        if !screen.is_success() {
            self.navigation_pending = false;
        }
        self.view.screen = screen;
    }

    fn publish(&self) {
        self.publisher.send_replace(self.view.clone());
    }
}

fn classify_registration_failure(
    err: &RegistrationErrorKind,
) -> (ScreenState, &'static [FormField]) {
    match err {
        RegistrationErrorKind::InvalidEmail => (ScreenState::EmailNotCorrect, &[FormField::Email]),
        RegistrationErrorKind::EmailTaken => {
            (ScreenState::AlreadyRegisteredEmail, &[FormField::Email])
        }
        RegistrationErrorKind::WeakPassword => (
            ScreenState::PasswordNotCorrect,
            &[FormField::Password, FormField::RepeatPassword],
        ),
        RegistrationErrorKind::Unavailable(_)
        | RegistrationErrorKind::Network(_)
        | RegistrationErrorKind::Unknown(_) => (ScreenState::Failed(err.to_string()), &[]),
    }
}

fn truncate_chars(value: &mut String, max_chars: usize) {
    if let Some((idx, _)) = value.char_indices().nth(max_chars) {
        value.truncate(idx);
    }
}

#[cfg(test)]
#[path = "tests/registration_tests.rs"]
mod tests;
