use serde::Serialize;
use serde_json::Value;

use super::fields::{FieldReader, Presence, MAX_NAME_LENGTH};
use crate::auth::normalize_email;
use crate::database::models::User;
use crate::error::ApiError;

pub const MIN_PASSWORD_LENGTH: usize = 5;

#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub email: String,
    pub name: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            name: user.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub password: Option<String>,
}

pub fn parse_registration(body: &Value) -> Result<Registration, ApiError> {
    let mut reader = FieldReader::new(body)?;
    let email = reader.string("email", Presence::Required, MAX_NAME_LENGTH);
    let password = reader.raw_string("password", Presence::Required);
    let name = reader.string("name", Presence::Optional, MAX_NAME_LENGTH);

    if let Some(email) = &email {
        if !looks_like_email(email) {
            reader.reject("email", "Enter a valid email address.");
        }
    }
    if let Some(password) = &password {
        check_password(&mut reader, password);
    }
    reader.finish()?;

    match (email, password) {
        (Some(email), Some(password)) => Ok(Registration {
            email: normalize_email(&email),
            password,
            name: name.unwrap_or_default(),
        }),
        _ => Err(ApiError::bad_request("Invalid input")),
    }
}

pub fn parse_credentials(body: &Value) -> Result<Credentials, ApiError> {
    let mut reader = FieldReader::new(body)?;
    let email = reader.string("email", Presence::Required, MAX_NAME_LENGTH);
    let password = reader.raw_string("password", Presence::Required);
    reader.finish()?;

    match (email, password) {
        (Some(email), Some(password)) => Ok(Credentials {
            email: normalize_email(&email),
            password,
        }),
        _ => Err(ApiError::bad_request("Invalid input")),
    }
}

/// PUT requires a name; password is always optional
pub fn parse_profile_changes(body: &Value, full: bool) -> Result<ProfileChanges, ApiError> {
    let presence = if full { Presence::Required } else { Presence::Optional };

    let mut reader = FieldReader::new(body)?;
    let name = reader.string("name", presence, MAX_NAME_LENGTH);
    let password = reader.raw_string("password", Presence::Optional);
    if let Some(password) = &password {
        check_password(&mut reader, password);
    }
    reader.finish()?;

    Ok(ProfileChanges { name, password })
}

fn check_password(reader: &mut FieldReader, password: &str) {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        reader.reject(
            "password",
            format!("Ensure this field has at least {} characters.", MIN_PASSWORD_LENGTH),
        );
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}
