//! Form validation for cards and sign-up.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use super::CardDraft;
use crate::error::{Result, WorkinfoError};

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern must compile"));

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9\s\-()]{10,}$").expect("phone pattern must compile"));

static USERNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]{3,20}$").expect("username pattern must compile"));

pub const MIN_PASSWORD_LEN: usize = 8;

/// Field name -> message for every failing field.
pub type CardErrors = BTreeMap<&'static str, String>;

/// Loose `local@domain.tld` check; deliverability is not verified.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// At least ten digits, spaces, dashes or parentheses, with an optional
/// leading `+`.
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE.is_match(phone)
}

/// Accepts bare hosts too: `example.com` is checked as `https://example.com`.
pub fn is_valid_url(url: &str) -> bool {
    let url = url.trim();
    if url.is_empty() {
        return false;
    }
    let candidate = if url.starts_with("http") {
        url.to_string()
    } else {
        format!("https://{url}")
    };
    url::Url::parse(&candidate).is_ok_and(|u| u.has_host())
}

/// 3 to 20 ASCII letters, digits or underscores.
pub fn is_valid_username(username: &str) -> bool {
    USERNAME.is_match(username)
}

/// Checks required fields and the format of the optional contact fields.
/// Returns an empty map when the draft is valid.
pub fn validate_card(draft: &CardDraft) -> CardErrors {
    let mut errors = CardErrors::new();

    if draft.first_name.trim().is_empty() {
        errors.insert("first_name", "First name is required".into());
    }
    if draft.last_name.trim().is_empty() {
        errors.insert("last_name", "Last name is required".into());
    }
    if draft.company.trim().is_empty() {
        errors.insert("company", "Company is required".into());
    }
    if !draft.email.is_empty() && !is_valid_email(&draft.email) {
        errors.insert("email", "Invalid email format".into());
    }
    if !draft.mobile.is_empty() && !is_valid_phone(&draft.mobile) {
        errors.insert("mobile", "Invalid phone format".into());
    }
    if !draft.office.is_empty() && !is_valid_phone(&draft.office) {
        errors.insert("office", "Invalid phone format".into());
    }
    if !draft.website.is_empty() && !is_valid_url(&draft.website) {
        errors.insert("website", "Invalid URL format".into());
    }
    for (field, value) in [
        ("theme_primary_light", &draft.theme_primary_light),
        ("theme_primary_dark", &draft.theme_primary_dark),
    ] {
        if !value.is_empty() && !crate::theme::is_hex_color(value) {
            errors.insert(field, "Invalid color format".into());
        }
    }

    errors
}

/// Sign-up form contents.
#[derive(Clone, Debug, Default)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub password: String,
    pub password_confirm: String,
}

impl Registration {
    /// Checks the form before it is sent to the backend. Username
    /// availability is a separate store query.
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: &str| Err(WorkinfoError::InvalidRegistration(msg.to_string()));

        if self.email.trim().is_empty() || self.password.is_empty() || self.username.trim().is_empty()
        {
            return fail("Email, password, and username are required");
        }
        if !is_valid_email(self.email.trim()) {
            return fail("Invalid email format");
        }
        if !is_valid_username(self.username.trim()) {
            return fail("Username must be 3-20 letters, digits or underscores");
        }
        if self.password != self.password_confirm {
            return fail("Passwords do not match");
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return fail("Password must be at least 8 characters long");
        }
        Ok(())
    }

    /// Username as it will be stored.
    pub fn normalized_username(&self) -> String {
        self.username.trim().to_lowercase()
    }
}
