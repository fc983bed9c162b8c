//! Form validation for the login/register form and the add-product form.
//!
//! Validation never touches the network: a form with errors is not submitted.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::auth::{Credentials, Registration};

pub const PASSWORD_MIN_LEN: usize = 6;
pub const PASSWORD_MAX_LEN: usize = 128;

const EMAIL_PATTERN: &str = r"^\S+@\S+$";

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).ok()).as_ref()
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_some_and(|re| re.is_match(email))
}

/// Per-field error messages, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    /// Drops the message for `field` (the user edited it).
    pub fn remove(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthVariant {
    #[default]
    Login,
    Register,
}

impl AuthVariant {
    pub fn toggled(self) -> Self {
        match self {
            AuthVariant::Login => AuthVariant::Register,
            AuthVariant::Register => AuthVariant::Login,
        }
    }
}

/// A validated login/register submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthSubmission {
    Login(Credentials),
    Register(Registration),
}

fn check_email(errors: &mut FieldErrors, email: &str) {
    if email.trim().is_empty() {
        errors.add("email", "Email is required");
    } else if !is_valid_email(email) {
        errors.add("email", "Please enter a valid email!");
    }
}

fn check_password(errors: &mut FieldErrors, password: &str) {
    let len = password.chars().count();
    if password.is_empty() {
        errors.add("password", "Password is required");
    } else if len < PASSWORD_MIN_LEN {
        errors.add(
            "password",
            format!("Password must be at least {PASSWORD_MIN_LEN} characters!"),
        );
    } else if len > PASSWORD_MAX_LEN {
        errors.add(
            "password",
            format!("Password must be at most {PASSWORD_MAX_LEN} characters!"),
        );
    }
}

/// Validates the auth form. Username is only required when registering.
///
/// # Errors
/// Returns every failing field's message.
pub fn validate_auth(
    variant: AuthVariant,
    username: &str,
    email: &str,
    password: &str,
) -> Result<AuthSubmission, FieldErrors> {
    let mut errors = FieldErrors::default();
    if variant == AuthVariant::Register && username.trim().is_empty() {
        errors.add("username", "Username is required");
    }
    check_email(&mut errors, email);
    check_password(&mut errors, password);

    if !errors.is_empty() {
        return Err(errors);
    }

    let email = email.trim().to_string();
    let password = password.to_string();
    Ok(match variant {
        AuthVariant::Login => AuthSubmission::Login(Credentials {
            username: email,
            password,
        }),
        AuthVariant::Register => AuthSubmission::Register(Registration {
            username: username.trim().to_string(),
            email,
            password,
        }),
    })
}

/// A locally added product; it is not sent anywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub title: String,
    pub price: f64,
    pub brand: String,
    pub sku: String,
}

impl NewProduct {
    pub fn confirmation(&self) -> String {
        format!("Product added: {} ({})", self.title, self.sku)
    }
}

/// Validates the add-product form.
///
/// # Errors
/// Returns every failing field's message.
pub fn validate_product(
    title: &str,
    price: &str,
    brand: &str,
    sku: &str,
) -> Result<NewProduct, FieldErrors> {
    const REQUIRED: &str = "Required field";

    let mut errors = FieldErrors::default();
    for (field, value) in [("title", title), ("price", price), ("brand", brand), ("sku", sku)] {
        if value.trim().is_empty() {
            errors.add(field, REQUIRED);
        }
    }

    let parsed_price = price.trim().parse::<f64>().ok().filter(|p| p.is_finite());
    if parsed_price.is_none() {
        errors.add("price", "Enter a valid price");
    }

    match parsed_price {
        Some(price) if errors.is_empty() => Ok(NewProduct {
            title: title.trim().to_string(),
            price,
            brand: brand.trim().to_string(),
            sku: sku.trim().to_string(),
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("a@b"));
        assert!(is_valid_email("emily@example.com"));
        assert!(!is_valid_email("emily example.com"));
        assert!(!is_valid_email("emily@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("em ily@example.com"));
    }

    #[test]
    fn test_login_requires_email_and_password_but_not_username() {
        let errors = validate_auth(AuthVariant::Login, "", "", "").unwrap_err();
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("password"), Some("Password is required"));
        assert_eq!(errors.get("username"), None);
    }

    #[test]
    fn test_register_requires_username() {
        let errors =
            validate_auth(AuthVariant::Register, " ", "a@b.c", "secret1").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("username"), Some("Username is required"));
    }

    #[test]
    fn test_password_length_bounds() {
        let short = validate_auth(AuthVariant::Login, "", "a@b.c", "12345").unwrap_err();
        assert_eq!(
            short.get("password"),
            Some("Password must be at least 6 characters!")
        );

        let long = "x".repeat(PASSWORD_MAX_LEN + 1);
        let errors = validate_auth(AuthVariant::Login, "", "a@b.c", &long).unwrap_err();
        assert!(errors.get("password").is_some());

        assert!(validate_auth(AuthVariant::Login, "", "a@b.c", "123456").is_ok());
    }

    #[test]
    fn test_login_sends_email_as_username() {
        let submission = validate_auth(AuthVariant::Login, "", " a@b.c ", "secret1").unwrap();
        assert_eq!(
            submission,
            AuthSubmission::Login(Credentials {
                username: "a@b.c".to_string(),
                password: "secret1".to_string(),
            })
        );
    }

    #[test]
    fn test_product_requires_all_fields() {
        let errors = validate_product("", "", "", "").unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get("price"), Some("Required field"));
    }

    #[test]
    fn test_product_price_must_be_numeric() {
        let errors = validate_product("Lamp", "cheap", "Ikea", "L-1").unwrap_err();
        assert_eq!(errors.get("price"), Some("Enter a valid price"));
    }

    #[test]
    fn test_valid_product_confirmation() {
        let product = validate_product("Lamp", "19.99", "Ikea", "L-1").unwrap();
        assert!((product.price - 19.99).abs() < f64::EPSILON);
        assert_eq!(product.confirmation(), "Product added: Lamp (L-1)");
    }
}
