//! Login/register form state and key handling.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use shelf_core::auth::RememberPolicy;
use shelf_core::validation::{AuthSubmission, AuthVariant, FieldErrors, validate_auth};

use crate::common::TextField;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Email,
    Password,
    Remember,
}

impl LoginField {
    /// Key used in `FieldErrors`.
    pub fn name(self) -> &'static str {
        match self {
            LoginField::Username => "username",
            LoginField::Email => "email",
            LoginField::Password => "password",
            LoginField::Remember => "remember",
        }
    }
}

/// What the reducer should do after a key.
#[derive(Debug, PartialEq, Eq)]
pub enum FormAction {
    None,
    Submit {
        submission: AuthSubmission,
        remember: RememberPolicy,
    },
    /// Forgot-password with the email currently typed (may be blank).
    ResetPassword {
        email: String,
    },
    /// Esc: cancel whatever is in flight.
    Cancel,
    Quit,
}

#[derive(Debug)]
pub struct LoginForm {
    pub variant: AuthVariant,
    pub username: TextField,
    pub email: TextField,
    pub password: TextField,
    pub remember: bool,
    pub focus: LoginField,
    pub errors: FieldErrors,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            variant: AuthVariant::Login,
            username: TextField::default(),
            email: TextField::default(),
            password: TextField::masked(),
            remember: false,
            focus: LoginField::Email,
            errors: FieldErrors::default(),
        }
    }
}

impl LoginForm {
    /// Fields in tab order for the current variant.
    pub fn fields(&self) -> &'static [LoginField] {
        match self.variant {
            AuthVariant::Login => &[LoginField::Email, LoginField::Password, LoginField::Remember],
            AuthVariant::Register => &[
                LoginField::Username,
                LoginField::Email,
                LoginField::Password,
                LoginField::Remember,
            ],
        }
    }

    fn move_focus(&mut self, forward: bool) {
        let fields = self.fields();
        let idx = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (idx + 1) % fields.len()
        } else {
            (idx + fields.len() - 1) % fields.len()
        };
        self.focus = fields[next];
    }

    /// Switches between login and register, keeping what was typed.
    pub fn toggle_variant(&mut self) {
        self.variant = self.variant.toggled();
        self.errors = FieldErrors::default();
        if !self.fields().contains(&self.focus) {
            self.focus = self.fields()[0];
        }
    }

    fn focused_field(&mut self) -> Option<&mut TextField> {
        match self.focus {
            LoginField::Username => Some(&mut self.username),
            LoginField::Email => Some(&mut self.email),
            LoginField::Password => Some(&mut self.password),
            LoginField::Remember => None,
        }
    }

    /// Validates the form. On failure the errors are kept for display.
    pub fn submit(&mut self) -> Option<AuthSubmission> {
        match validate_auth(
            self.variant,
            self.username.value(),
            self.email.value(),
            self.password.value(),
        ) {
            Ok(submission) => {
                self.errors = FieldErrors::default();
                Some(submission)
            }
            Err(errors) => {
                self.errors = errors;
                None
            }
        }
    }

    pub fn remember_policy(&self) -> RememberPolicy {
        RememberPolicy::from_flag(self.remember)
    }

    pub fn paste(&mut self, text: &str) {
        let focus = self.focus;
        if let Some(field) = self.focused_field() {
            field.paste(text);
            self.errors.remove(focus.name());
        }
    }

    /// Handles a key. `locked` is true while a login or registration is in
    /// flight; editing still works but nothing is submitted.
    pub fn handle_key(&mut self, key: KeyEvent, locked: bool) -> FormAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c' | 'q') if ctrl => FormAction::Quit,
            KeyCode::Esc => FormAction::Cancel,
            KeyCode::Tab | KeyCode::Down => {
                self.move_focus(true);
                FormAction::None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.move_focus(false);
                FormAction::None
            }
            KeyCode::Char('t') if ctrl => {
                if !locked {
                    self.toggle_variant();
                }
                FormAction::None
            }
            KeyCode::Char('r') if ctrl => FormAction::ResetPassword {
                email: self.email.value().trim().to_string(),
            },
            KeyCode::Char(' ') if self.focus == LoginField::Remember => {
                self.remember = !self.remember;
                FormAction::None
            }
            KeyCode::Enter => {
                if locked {
                    return FormAction::None;
                }
                match self.submit() {
                    Some(submission) => FormAction::Submit {
                        submission,
                        remember: self.remember_policy(),
                    },
                    None => FormAction::None,
                }
            }
            _ => {
                let focus = self.focus;
                if let Some(field) = self.focused_field()
                    && field.handle_key(key)
                {
                    self.errors.remove(focus.name());
                }
                FormAction::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use shelf_core::auth::Credentials;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(form: &mut LoginForm, text: &str) {
        for c in text.chars() {
            form.handle_key(key(KeyCode::Char(c)), false);
        }
    }

    #[test]
    fn test_empty_submit_shows_errors() {
        let mut form = LoginForm::default();
        assert_eq!(form.handle_key(key(KeyCode::Enter), false), FormAction::None);
        assert_eq!(form.errors.get("email"), Some("Email is required"));
        assert_eq!(form.errors.get("password"), Some("Password is required"));
        assert_eq!(form.errors.get("username"), None);
    }

    #[test]
    fn test_editing_clears_that_fields_error() {
        let mut form = LoginForm::default();
        form.handle_key(key(KeyCode::Enter), false);
        type_text(&mut form, "e");
        assert_eq!(form.errors.get("email"), None);
        assert!(form.errors.get("password").is_some());
    }

    #[test]
    fn test_valid_login_submits_email_as_username() {
        let mut form = LoginForm::default();
        type_text(&mut form, "emily@example.com");
        form.handle_key(key(KeyCode::Tab), false);
        type_text(&mut form, "emilyspass");
        form.handle_key(key(KeyCode::Tab), false);
        form.handle_key(key(KeyCode::Char(' ')), false);

        let action = form.handle_key(key(KeyCode::Enter), false);
        assert_eq!(
            action,
            FormAction::Submit {
                submission: AuthSubmission::Login(Credentials {
                    username: "emily@example.com".to_string(),
                    password: "emilyspass".to_string(),
                }),
                remember: RememberPolicy::Remember,
            }
        );
    }

    #[test]
    fn test_locked_form_does_not_submit() {
        let mut form = LoginForm::default();
        form.email.set("emily@example.com");
        form.password.set("emilyspass");
        assert_eq!(form.handle_key(key(KeyCode::Enter), true), FormAction::None);
    }

    #[test]
    fn test_register_requires_username_and_focus_wraps() {
        let mut form = LoginForm::default();
        form.handle_key(ctrl('t'), false);
        assert_eq!(form.variant, AuthVariant::Register);
        assert_eq!(form.focus, LoginField::Email);

        form.handle_key(key(KeyCode::BackTab), false);
        assert_eq!(form.focus, LoginField::Username);
        form.handle_key(key(KeyCode::BackTab), false);
        assert_eq!(form.focus, LoginField::Remember);

        form.handle_key(key(KeyCode::Enter), false);
        assert_eq!(form.errors.get("username"), Some("Username is required"));
    }

    #[test]
    fn test_toggle_back_to_login_moves_focus_off_username() {
        let mut form = LoginForm::default();
        form.toggle_variant();
        form.focus = LoginField::Username;
        form.toggle_variant();
        assert_eq!(form.focus, LoginField::Email);
    }

    #[test]
    fn test_reset_password_carries_trimmed_email() {
        let mut form = LoginForm::default();
        type_text(&mut form, " emily@example.com ");
        assert_eq!(
            form.handle_key(ctrl('r'), false),
            FormAction::ResetPassword {
                email: "emily@example.com".to_string()
            }
        );
    }
}
