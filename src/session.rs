//! Login and logout.
//!
//! A successful login hands out a [`Session`], which is passed explicitly to
//! whatever needs the logged-in user. Nothing is kept globally.

use std::collections::HashMap;

use crate::{AuditLog, User};

/// Possible errors to occur while logging in
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Unknown user or bad password")]
    UnknownUserOrBadPassword,
}

/// Lookup of users and their credentials
///
/// How passwords are stored and compared is up to the implementation.
pub trait UserDirectory {
    fn find_user_by_name(&self, name: &str) -> Option<User>;

    fn verify_password(&self, user: &User, password: &str) -> bool;
}

/// The proof of a successful login
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    user: User,
}

impl Session {
    pub fn user(&self) -> &User {
        &self.user
    }
}

/// Logs users in and out, recording every attempt
#[derive(Debug)]
pub struct Authenticator<D> {
    directory: D,
}

impl<D: UserDirectory> Authenticator<D> {
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn log_in(
        &self,
        name: &str,
        password: &str,
        audit: &impl AuditLog,
    ) -> Result<Session, AuthError> {
        let user = match self.directory.find_user_by_name(name) {
            Some(user) => user,
            None => {
                tracing::info!(user = name, "login with unknown user name");
                audit.log_login_failure(None, &format!("unknown user name {name}"));
                return Err(AuthError::UnknownUserOrBadPassword);
            }
        };

        if !self.directory.verify_password(&user, password) {
            tracing::info!(user = %user.id(), "login with bad password");
            audit.log_login_failure(Some(&user), "bad password");
            return Err(AuthError::UnknownUserOrBadPassword);
        }

        audit.log_login_success(&user);
        Ok(Session { user })
    }

    pub fn log_out(&self, session: Session, audit: &impl AuditLog) {
        audit.log_log_out(&session.user);
    }
}

/// A user directory keeping users and plain passwords in memory
///
/// Meant for tests and local replays, not for real credentials.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    users: HashMap<String, (User, String)>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, user: User, password: impl Into<String>) {
        self.users.insert(user.name().to_owned(), (user, password.into()));
    }
}

impl UserDirectory for MemoryDirectory {
    fn find_user_by_name(&self, name: &str) -> Option<User> {
        self.users.get(name).map(|(user, _)| user.clone())
    }

    fn verify_password(&self, user: &User, password: &str) -> bool {
        self.users
            .get(user.name())
            .map_or(false, |(stored, expected)| stored.id() == user.id() && expected == password)
    }
}
