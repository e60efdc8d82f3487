//! Login credentials, validated before any call reaches the identity provider.

use zeroize::Zeroizing;

/// Shortest password the sign-in form accepts.
pub const PASSWORD_MIN_LEN: usize = 6;

/// Reasons a login form is rejected locally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    #[error("email address is not valid")]
    InvalidEmail,
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
}

impl LoginValidationError {
    /// Form field the failure relates to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidEmail => "email",
            Self::PasswordTooShort { .. } => "password",
        }
    }
}

/// Validated sign-in credentials.
///
/// The email is trimmed; the password is kept verbatim and zeroed on drop.
///
/// # Examples
/// ```
/// use partfinder::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ravi@example.com ", "secret1").unwrap();
/// assert_eq!(creds.email(), "ravi@example.com");
/// assert!(LoginCredentials::try_from_parts("ravi", "secret1").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = email.trim();
        if !email.contains('@') {
            return Err(LoginValidationError::InvalidEmail);
        }
        if password.chars().count() < PASSWORD_MIN_LEN {
            return Err(LoginValidationError::PasswordTooShort {
                min: PASSWORD_MIN_LEN,
            });
        }
        Ok(Self {
            email: email.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
