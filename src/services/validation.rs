//! Input validation for every request body.
//!
//! Each validator checks all fields and reports every failure at once as a
//! field-to-messages map rather than stopping at the first problem.

use crate::{
    error::{ApiError, FieldErrors},
    models::{LoginRequest, PostChanges, PostFields, PostRequest, RefreshRequest, RegisterRequest},
    services::UserStore,
};
use regex::Regex;
use std::sync::LazyLock;

pub const USERNAME_MAX_LENGTH: usize = 150;
pub const EMAIL_MAX_LENGTH: usize = 254;
pub const TITLE_MAX_LENGTH: usize = 200;

const REQUIRED: &str = "This field is required.";
const BLANK: &str = "This field may not be blank.";

static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("username pattern is valid"));

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$")
        .expect("email pattern is valid")
});

/// Validated registration input
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Validated login input
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Default)]
struct Collector {
    errors: FieldErrors,
}

impl Collector {
    fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    fn has(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Trimmed value of a required string field; records an error when missing or blank
    fn required_text(&mut self, field: &str, value: Option<&str>, trim: bool) -> Option<String> {
        match value {
            None => {
                self.add(field, REQUIRED);
                None
            }
            Some(raw) if raw.trim().is_empty() => {
                self.add(field, BLANK);
                None
            }
            Some(raw) => Some(if trim { raw.trim() } else { raw }.to_string()),
        }
    }

    /// Same as `required_text` but only when the field was supplied
    fn optional_text(&mut self, field: &str, value: Option<&str>) -> Option<String> {
        value.and_then(|raw| self.required_text(field, Some(raw), true))
    }

    fn max_length(&mut self, field: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.add(field, format!("Ensure this field has no more than {max} characters."));
        }
    }

    fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, ApiError> {
        if self.errors.is_empty() {
            Ok(value())
        } else {
            Err(ApiError::Validation(self.errors))
        }
    }
}

/// Lowercase the domain part, leaving the local part untouched
pub fn normalize_email(email: &str) -> String {
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_string(),
    }
}

pub fn validate_registration(
    request: &RegisterRequest,
    users: &UserStore,
) -> Result<Registration, ApiError> {
    let mut errors = Collector::default();

    let username = errors.required_text("username", request.username.as_deref(), true);
    if let Some(username) = &username {
        errors.max_length("username", username, USERNAME_MAX_LENGTH);
        if !USERNAME_PATTERN.is_match(username) {
            errors.add(
                "username",
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
            );
        }
        if !errors.has("username") && users.username_exists(username)? {
            errors.add("username", "A user with that username already exists.");
        }
    }

    let email = errors.required_text("email", request.email.as_deref(), true);
    if let Some(email) = &email {
        errors.max_length("email", email, EMAIL_MAX_LENGTH);
        if !EMAIL_PATTERN.is_match(email) {
            errors.add("email", "Enter a valid email address.");
        }
    }

    let password = errors.required_text("password", request.password.as_deref(), false);

    errors.finish(|| Registration {
        username: username.unwrap_or_default(),
        email: normalize_email(&email.unwrap_or_default()),
        password: password.unwrap_or_default(),
    })
}

pub fn validate_login(request: &LoginRequest) -> Result<Credentials, ApiError> {
    let mut errors = Collector::default();
    let username = errors.required_text("username", request.username.as_deref(), true);
    let password = errors.required_text("password", request.password.as_deref(), false);

    errors.finish(|| Credentials {
        username: username.unwrap_or_default(),
        password: password.unwrap_or_default(),
    })
}

pub fn validate_refresh(request: &RefreshRequest) -> Result<String, ApiError> {
    let mut errors = Collector::default();
    let refresh = errors.required_text("refresh", request.refresh.as_deref(), true);
    errors.finish(|| refresh.unwrap_or_default())
}

/// Validate a create or full-replace body. A missing `is_published` means `false`.
pub fn validate_post(request: &PostRequest) -> Result<PostFields, ApiError> {
    let mut errors = Collector::default();

    let title = errors.required_text("title", request.title.as_deref(), true);
    if let Some(title) = &title {
        errors.max_length("title", title, TITLE_MAX_LENGTH);
    }
    let content = errors.required_text("content", request.content.as_deref(), true);

    errors.finish(|| PostFields {
        title: title.unwrap_or_default(),
        content: content.unwrap_or_default(),
        is_published: request.is_published.unwrap_or(false),
    })
}

/// Validate a partial update; only supplied fields are checked
pub fn validate_post_changes(request: &PostRequest) -> Result<PostChanges, ApiError> {
    let mut errors = Collector::default();

    let title = errors.optional_text("title", request.title.as_deref());
    if let Some(title) = &title {
        errors.max_length("title", title, TITLE_MAX_LENGTH);
    }
    let content = errors.optional_text("content", request.content.as_deref());

    errors.finish(|| PostChanges {
        title,
        content,
        is_published: request.is_published,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewUser, Role};

    fn register(username: Option<&str>, email: Option<&str>, password: Option<&str>) -> RegisterRequest {
        RegisterRequest {
            username: username.map(str::to_string),
            email: email.map(str::to_string),
            password: password.map(str::to_string),
        }
    }

    fn field_errors(result: Result<impl std::fmt::Debug, ApiError>) -> FieldErrors {
        match result {
            Err(ApiError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_registration() {
        let users = UserStore::new();
        let registration = validate_registration(
            &register(Some(" testuser "), Some("testuser@EXAMPLE.com"), Some("Test123456")),
            &users,
        )
        .unwrap();

        assert_eq!(registration.username, "testuser");
        assert_eq!(registration.email, "testuser@example.com");
        assert_eq!(registration.password, "Test123456");
    }

    #[test]
    fn test_missing_email_is_reported_by_name() {
        let users = UserStore::new();
        let errors = field_errors(validate_registration(
            &register(Some("testuser"), None, Some("testpassword123")),
            &users,
        ));

        assert_eq!(errors.len(), 1);
        assert_eq!(errors["email"], vec![REQUIRED.to_string()]);
    }

    #[test]
    fn test_every_bad_field_is_reported() {
        let users = UserStore::new();
        let errors = field_errors(validate_registration(
            &register(Some("bad name!"), Some("not-an-email"), Some("   ")),
            &users,
        ));

        assert!(errors.contains_key("username"));
        assert_eq!(errors["email"], vec!["Enter a valid email address.".to_string()]);
        assert_eq!(errors["password"], vec![BLANK.to_string()]);
    }

    #[test]
    fn test_taken_username_is_a_field_error() {
        let users = UserStore::new();
        users
            .insert(NewUser {
                username: "testuser".to_string(),
                email: "testuser@example.com".to_string(),
                password_hash: "hash".to_string(),
                role: Role::Regular,
            })
            .unwrap();

        let errors = field_errors(validate_registration(
            &register(Some("testuser"), Some("newuser@example.com"), Some("newpassword123")),
            &users,
        ));
        assert_eq!(
            errors["username"],
            vec!["A user with that username already exists.".to_string()]
        );
    }

    #[test]
    fn test_username_length_limit() {
        let users = UserStore::new();
        let long_name = "a".repeat(USERNAME_MAX_LENGTH + 1);
        let errors = field_errors(validate_registration(
            &register(Some(&long_name), Some("a@example.com"), Some("pw")),
            &users,
        ));
        assert_eq!(
            errors["username"],
            vec!["Ensure this field has no more than 150 characters.".to_string()]
        );
    }

    #[test]
    fn test_login_requires_both_fields() {
        let errors = field_errors(validate_login(&LoginRequest::default()));
        assert!(errors.contains_key("username"));
        assert!(errors.contains_key("password"));
    }

    #[test]
    fn test_post_defaults_to_unpublished() {
        let fields = validate_post(&PostRequest {
            title: Some("New Post".to_string()),
            content: Some("Content for the new post.".to_string()),
            is_published: None,
        })
        .unwrap();
        assert!(!fields.is_published);
    }

    #[test]
    fn test_post_requires_title_and_content() {
        let errors = field_errors(validate_post(&PostRequest {
            title: Some("".to_string()),
            content: None,
            is_published: Some(true),
        }));
        assert_eq!(errors["title"], vec![BLANK.to_string()]);
        assert_eq!(errors["content"], vec![REQUIRED.to_string()]);
    }

    #[test]
    fn test_partial_update_only_checks_supplied_fields() {
        let changes = validate_post_changes(&PostRequest {
            title: None,
            content: None,
            is_published: Some(true),
        })
        .unwrap();
        assert_eq!(changes.title, None);
        assert_eq!(changes.is_published, Some(true));

        let errors = field_errors(validate_post_changes(&PostRequest {
            title: Some("x".repeat(TITLE_MAX_LENGTH + 1)),
            ..PostRequest::default()
        }));
        assert!(errors.contains_key("title"));
    }
}
