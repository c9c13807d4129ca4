use std::sync::Arc;

use log::info;
use thiserror::Error;

use crate::{NewUser, SessionData, SessionRegistry, Storage, StorageError, UserData};

/// Account registration and login against the user document.
pub struct Auth<S> {
    storage: Arc<S>,
    sessions: Arc<SessionRegistry>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// Username or password is incorrect
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("username {0} is already taken")]
    UsernameTaken(String),
    /// Something else went wrong with the backing store
    #[error(transparent)]
    Storage(StorageError),
}

#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug)]
pub struct NewAccount {
    pub username: String,
    pub password: String,
    pub phone: String,
}

impl<S> Auth<S>
where
    S: Storage,
{
    pub fn new(storage: &Arc<S>, sessions: &Arc<SessionRegistry>) -> Self {
        Self {
            storage: storage.clone(),
            sessions: sessions.clone(),
        }
    }

    /// Registers an account. A taken username is rejected and leaves the
    /// user document untouched.
    pub async fn register(&self, new_account: NewAccount) -> Result<UserData, AuthError> {
        let user = self
            .storage
            .create_user(NewUser {
                username: new_account.username,
                password: new_account.password,
                phone: new_account.phone,
            })
            .await
            .map_err(|e| match e {
                StorageError::Conflict {
                    field: "username",
                    value,
                    ..
                } => AuthError::UsernameTaken(value),
                err => AuthError::Storage(err),
            })?;

        info!("registered account {}", user.username);
        Ok(user)
    }

    /// Logs in a user, returning a new session. The password is compared as
    /// plain text against the stored record.
    pub async fn login(&self, credentials: Credentials) -> Result<SessionData, AuthError> {
        let user = self
            .storage
            .user_by_username(&credentials.username)
            .await
            .map_err(|e| match e {
                StorageError::NotFound { .. } => AuthError::InvalidCredentials,
                err => AuthError::Storage(err),
            })?;

        if user.password != credentials.password {
            return Err(AuthError::InvalidCredentials);
        }

        let session = self.sessions.create(user);
        info!("{} logged in", session.user.username);

        Ok(session)
    }

    /// Drops the session, if it exists
    pub fn logout(&self, token: &str) {
        self.sessions.remove(token);
    }

    /// Returns the session for a token, if it is still live
    pub fn session(&self, token: &str) -> Option<SessionData> {
        self.sessions.get(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::storage_in_temp_dir;

    fn auth(storage: crate::JsonStorage) -> Auth<crate::JsonStorage> {
        Auth::new(&Arc::new(storage), &Arc::new(SessionRegistry::default()))
    }

    fn account(username: &str) -> NewAccount {
        NewAccount {
            username: username.to_string(),
            password: "hunter2".to_string(),
            phone: "010-1234".to_string(),
        }
    }

    #[tokio::test]
    async fn register_then_login_creates_a_session() {
        let (storage, _dir) = storage_in_temp_dir();
        let auth = auth(storage);

        auth.register(account("alice")).await.unwrap();

        let session = auth
            .login(Credentials {
                username: "alice".to_string(),
                password: "hunter2".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(session.user.username, "alice");
        assert_eq!(session.token.len(), 32);
        assert!(auth.session(&session.token).is_some());

        auth.logout(&session.token);
        assert!(auth.session(&session.token).is_none());
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_read_the_same() {
        let (storage, _dir) = storage_in_temp_dir();
        let auth = auth(storage);

        auth.register(account("alice")).await.unwrap();

        let wrong_password = auth
            .login(Credentials {
                username: "alice".to_string(),
                password: "letmein".to_string(),
            })
            .await;

        let unknown_user = auth
            .login(Credentials {
                username: "carol".to_string(),
                password: "hunter2".to_string(),
            })
            .await;

        assert!(matches!(wrong_password, Err(AuthError::InvalidCredentials)));
        assert!(matches!(unknown_user, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn duplicate_signup_fails_and_leaves_the_document_unchanged() {
        let (storage, dir) = storage_in_temp_dir();
        let auth = auth(storage);

        auth.register(account("alice")).await.unwrap();
        let before = std::fs::read(dir.join("users.json")).unwrap();

        let result = auth.register(account("alice")).await;
        assert!(matches!(result, Err(AuthError::UsernameTaken(name)) if name == "alice"));

        let after = std::fs::read(dir.join("users.json")).unwrap();
        assert_eq!(before, after);
    }
}
