use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use err_derive::Error;
use log::*;
use serde::{Deserialize, Serialize};

use infra::documents::{DocMeta, HasMeta};
use infra::ids::{Entity, Id};

use crate::config::SessionConfig;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Restaurant,
    Driver,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    #[serde(flatten)]
    pub(crate) meta: DocMeta<User>,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AuthError {
    #[error(display = "that does not look like an email address")]
    InvalidEmail,
    #[error(display = "passwords must be at least 6 characters")]
    ShortPassword,
    #[error(display = "a display name is required")]
    BlankName,
}

const MIN_PASSWORD: usize = 6;

/// The signed-in user, if any. One user record persists between runs as
/// a JSON file at the configured path; login/register write it, logout
/// removes it, and the constructor reads it back once.
#[derive(Debug)]
pub struct Session {
    path: PathBuf,
    user: Option<User>,
}

impl Session {
    pub fn restore(config: &SessionConfig) -> Result<Self> {
        let path = config.path.clone();
        let user = if path.exists() {
            let buf = fs::read_to_string(&path)
                .with_context(|| format!("read session record {:?}", path))?;
            let user: User = serde_json::from_str(&buf).context("parse session record")?;
            debug!("Restored session for {}", user.email);
            Some(user)
        } else {
            None
        };
        Ok(Session { path, user })
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Sign in with an email and password. There is no credential store
    /// behind this; anyone with a plausible email and password gets a
    /// customer session, named after their mailbox.
    pub fn login(&mut self, email: &str, password: &str) -> Result<&User> {
        validate_email(email)?;
        validate_password(password)?;

        let name = email
            .split('@')
            .next()
            .expect("validated emails contain a mailbox part")
            .to_string();
        self.sign_in(name, email)
    }

    pub fn register(&mut self, name: &str, email: &str, password: &str) -> Result<&User> {
        if name.trim().is_empty() {
            return Err(AuthError::BlankName.into());
        }
        validate_email(email)?;
        validate_password(password)?;

        self.sign_in(name.trim().to_string(), email)
    }

    pub fn logout(&mut self) -> Result<()> {
        if let Some(user) = self.user.take() {
            info!("Logged out {}", user.email);
        }
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("remove session record {:?}", self.path))?;
        }
        Ok(())
    }

    fn sign_in(&mut self, name: String, email: &str) -> Result<&User> {
        let user = User {
            meta: DocMeta::new_with_id(Id::hashed(&email)),
            name,
            email: email.to_string(),
            role: Role::Customer,
        };

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).with_context(|| format!("create session dir {:?}", dir))?;
        }
        let json = serde_json::to_string_pretty(&user)?;
        fs::write(&self.path, json)
            .with_context(|| format!("write session record {:?}", self.path))?;

        info!("Signed in {} as {}", user.email, user.id());
        self.user = Some(user);
        Ok(self.user.as_ref().expect("user just stored"))
    }
}

fn validate_email(email: &str) -> Result<(), AuthError> {
    let mut parts = email.splitn(2, '@');
    let mailbox = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if mailbox.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(AuthError::InvalidEmail);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD {
        return Err(AuthError::ShortPassword);
    }
    Ok(())
}

impl Entity for User {
    const PREFIX: &'static str = "user";
}

impl HasMeta for User {
    fn meta(&self) -> &DocMeta<User> {
        &self.meta
    }
    fn meta_mut(&mut self) -> &mut DocMeta<User> {
        &mut self.meta
    }
}
