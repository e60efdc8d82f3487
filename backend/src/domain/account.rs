//! Account forms: sign-up, profile edits and password changes.
//!
//! Every form is validated here before any port is called, so adapters only
//! see trimmed values and canonical category names.

use serde_json::json;
use zeroize::Zeroizing;

use super::{
    Coordinates, Error, LoginCredentials, LoginValidationError, PASSWORD_MIN_LEN, PartCategory,
    Profile, ProfileId, Role,
};

/// Reasons an account form is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountFormError {
    #[error(transparent)]
    Credentials(#[from] LoginValidationError),
    #[error("{0} accounts cannot be created here")]
    RoleNotOffered(Role),
    #[error("full name must not be empty")]
    MissingFullName,
    #[error("a phone number is required")]
    MissingPhone,
    #[error("business name must not be empty")]
    MissingBusinessName,
    #[error("a part category is required")]
    MissingCategory,
    #[error("unknown part category: {0}")]
    UnknownCategory(String),
    #[error("a city is required")]
    MissingCity,
    #[error("a state is required")]
    MissingState,
    #[error("a shop location is required")]
    MissingLocation,
    #[error("new password must be at least {min} characters")]
    NewPasswordTooShort { min: usize },
    #[error("passwords do not match")]
    PasswordMismatch,
}

impl AccountFormError {
    /// Form field the failure relates to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Credentials(inner) => inner.field(),
            Self::RoleNotOffered(_) => "role",
            Self::MissingFullName => "fullName",
            Self::MissingPhone => "phone",
            Self::MissingBusinessName => "businessName",
            Self::MissingCategory | Self::UnknownCategory(_) => "category",
            Self::MissingCity => "city",
            Self::MissingState => "state",
            Self::MissingLocation => "location",
            Self::NewPasswordTooShort { .. } => "newPassword",
            Self::PasswordMismatch => "confirmPassword",
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Credentials(LoginValidationError::InvalidEmail) => "invalid_email",
            Self::Credentials(LoginValidationError::PasswordTooShort { .. })
            | Self::NewPasswordTooShort { .. } => "password_too_short",
            Self::RoleNotOffered(_) => "role_not_offered",
            Self::UnknownCategory(_) => "unknown_category",
            Self::PasswordMismatch => "mismatch",
            Self::MissingFullName
            | Self::MissingPhone
            | Self::MissingBusinessName
            | Self::MissingCategory
            | Self::MissingCity
            | Self::MissingState
            | Self::MissingLocation => "required",
        }
    }
}

impl From<AccountFormError> for Error {
    fn from(error: AccountFormError) -> Self {
        Error::invalid_request(error.to_string()).with_details(json!({
            "field": error.field(),
            "code": error.code(),
        }))
    }
}

/// Unvalidated sign-up form.
///
/// A blank full name defaults to the part of the email before `@`. Vendors
/// name their business and category up front; location and the remaining
/// shop details follow through [`ProfileUpdate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub business_name: Option<String>,
    pub category: Option<String>,
    pub city: Option<String>,
}

/// A [`Registration`] that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRegistration {
    credentials: LoginCredentials,
    full_name: String,
    phone: Option<String>,
    role: Role,
    business_name: Option<String>,
    category: Option<PartCategory>,
    city: Option<String>,
}

impl Registration {
    /// # Examples
    /// ```
    /// use partfinder::domain::{Registration, Role};
    ///
    /// let form = Registration {
    ///     email: "ravi@example.com".into(),
    ///     password: "secret1".into(),
    ///     full_name: " Ravi ".into(),
    ///     phone: None,
    ///     role: Role::Client,
    ///     business_name: None,
    ///     category: None,
    ///     city: None,
    /// };
    /// assert_eq!(form.validate().unwrap().credentials().email(), "ravi@example.com");
    /// ```
    pub fn validate(self) -> Result<ValidRegistration, AccountFormError> {
        let credentials = LoginCredentials::try_from_parts(&self.email, &self.password)?;
        if self.role == Role::Admin {
            return Err(AccountFormError::RoleNotOffered(self.role));
        }
        let full_name = required(&self.full_name)
            .unwrap_or_else(|| email_local_part(credentials.email()).to_owned());
        let (business_name, category) = match self.role {
            Role::Vendor => {
                let business = self
                    .business_name
                    .as_deref()
                    .and_then(required)
                    .ok_or(AccountFormError::MissingBusinessName)?;
                let category = parse_category(self.category.as_deref())?
                    .ok_or(AccountFormError::MissingCategory)?;
                (Some(business), Some(category))
            }
            Role::Client | Role::Admin => (None, None),
        };
        Ok(ValidRegistration {
            credentials,
            full_name,
            phone: self.phone.as_deref().and_then(required),
            role: self.role,
            business_name,
            category,
            city: self.city.as_deref().and_then(required),
        })
    }
}

impl ValidRegistration {
    pub fn credentials(&self) -> &LoginCredentials {
        &self.credentials
    }

    /// The profile row created for the new account.
    pub fn into_profile(self, id: ProfileId) -> Profile {
        let mut profile = Profile::new(id, self.credentials.email(), self.full_name, self.role);
        profile.phone = self.phone;
        profile.business_name = self.business_name;
        profile.category = self.category.map(String::from);
        profile.city = self.city;
        profile
    }
}

/// Edits to a stored profile.
///
/// Fields left out keep their stored value; blank text clears an optional
/// value. Email and role are fixed at sign-up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub business_name: Option<String>,
    pub category: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub location: Option<Coordinates>,
    pub authorized_dealer: Option<bool>,
    pub companies: Option<Vec<String>>,
}

impl ProfileUpdate {
    /// Merge onto `current` and check the result is complete for its role.
    ///
    /// Clients need a name and phone. Vendors also need a business name,
    /// category, city, state and location.
    pub fn apply_to(self, current: &Profile) -> Result<Profile, AccountFormError> {
        let mut next = current.clone();
        if let Some(full_name) = self.full_name {
            next.full_name = full_name.trim().to_owned();
        }
        merge_text(&mut next.phone, self.phone);
        merge_text(&mut next.business_name, self.business_name);
        merge_text(&mut next.city, self.city);
        merge_text(&mut next.state, self.state);
        if let Some(category) = self.category {
            next.category = parse_category(Some(&category))?.map(String::from);
        }
        if let Some(location) = self.location {
            next.location = Some(location);
        }
        if let Some(authorized) = self.authorized_dealer {
            next.authorized_dealer = authorized;
        }
        if let Some(companies) = self.companies {
            next.companies = tidy_companies(companies);
        }

        if next.full_name.is_empty() {
            return Err(AccountFormError::MissingFullName);
        }
        if !next.has_phone() {
            return Err(AccountFormError::MissingPhone);
        }
        if next.is_vendor() {
            if next.business_name.is_none() {
                return Err(AccountFormError::MissingBusinessName);
            }
            if next.category.is_none() {
                return Err(AccountFormError::MissingCategory);
            }
            if next.city.is_none() {
                return Err(AccountFormError::MissingCity);
            }
            if next.state.is_none() {
                return Err(AccountFormError::MissingState);
            }
            if next.location.is_none() {
                return Err(AccountFormError::MissingLocation);
            }
        }
        Ok(next)
    }
}

/// Current and replacement password, checked against each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordChange {
    current: Zeroizing<String>,
    replacement: Zeroizing<String>,
}

impl PasswordChange {
    pub fn try_new(current: &str, new: &str, confirm: &str) -> Result<Self, AccountFormError> {
        if new.chars().count() < PASSWORD_MIN_LEN {
            return Err(AccountFormError::NewPasswordTooShort {
                min: PASSWORD_MIN_LEN,
            });
        }
        if new != confirm {
            return Err(AccountFormError::PasswordMismatch);
        }
        Ok(Self {
            current: Zeroizing::new(current.to_owned()),
            replacement: Zeroizing::new(new.to_owned()),
        })
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }
}

fn required(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

fn email_local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

fn merge_text(slot: &mut Option<String>, update: Option<String>) {
    if let Some(value) = update {
        *slot = required(&value);
    }
}

fn parse_category(raw: Option<&str>) -> Result<Option<PartCategory>, AccountFormError> {
    match raw.and_then(required) {
        None => Ok(None),
        Some(name) => PartCategory::parse(&name)
            .map(Some)
            .map_err(|_| AccountFormError::UnknownCategory(name)),
    }
}

fn tidy_companies(companies: Vec<String>) -> Vec<String> {
    let mut tidy: Vec<String> = Vec::with_capacity(companies.len());
    for company in companies.iter().filter_map(|c| required(c)) {
        if !tidy.iter().any(|seen| seen.eq_ignore_ascii_case(&company)) {
            tidy.push(company);
        }
    }
    tidy
}
