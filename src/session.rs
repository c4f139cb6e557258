use crate::{
    error::StorageError,
    models::{Role, Session, SessionUser},
    storage::StorageState,
};

/// Storage key holding the raw bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key holding the JSON-serialized [`SessionUser`].
pub const USER_KEY: &str = "user";

/// SessionStore
///
/// The only writer of the cached session. Everything else (route guards, the
/// request interceptor, shell handlers) gets a [`SessionReader`].
///
/// Not `Clone`: share it behind an `Arc`.
pub struct SessionStore {
    reader: SessionReader,
}

impl SessionStore {
    pub fn new(storage: StorageState) -> Self {
        Self {
            reader: SessionReader { storage },
        }
    }

    pub fn reader(&self) -> SessionReader {
        self.reader.clone()
    }

    /// Writes token and user in a single storage step. A session without a
    /// token also drops any token left over from an earlier login.
    pub fn establish(&self, session: &Session) -> Result<(), StorageError> {
        let user = serde_json::to_string(&session.user).map_err(StorageError::Serialize)?;
        let storage = &self.reader.storage;
        match session.token.as_deref() {
            Some(token) => storage.set_many(&[(TOKEN_KEY, token), (USER_KEY, user.as_str())])?,
            None => storage.apply(&[(USER_KEY, user.as_str())], &[TOKEN_KEY])?,
        }
        tracing::info!(
            role = %session.user.role,
            bearer = session.token.is_some(),
            "session established"
        );
        Ok(())
    }

    /// Removes token and user in a single storage step.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.reader.storage.remove_many(&[TOKEN_KEY, USER_KEY])?;
        tracing::info!("session cleared");
        Ok(())
    }
}

/// SessionReader
///
/// Read-only view of the cached session. Cheap to clone.
///
/// Reads never fail: an unreadable or malformed entry is logged and reported
/// as absent, which every consumer treats as "not logged in".
#[derive(Clone)]
pub struct SessionReader {
    storage: StorageState,
}

impl SessionReader {
    /// Reader over storage nobody writes through this process.
    pub fn detached(storage: StorageState) -> Self {
        Self { storage }
    }

    fn raw(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read session storage");
                None
            }
        }
    }

    /// The cached bearer token. An empty string counts as no token.
    pub fn token(&self) -> Option<String> {
        self.raw(TOKEN_KEY).filter(|token| !token.is_empty())
    }

    /// The cached user profile, or `None` if missing or unparseable.
    pub fn user(&self) -> Option<SessionUser> {
        let raw = match self.raw(USER_KEY) {
            Some(raw) => raw,
            None => {
                tracing::debug!("no cached user");
                return None;
            }
        };
        match serde_json::from_str::<SessionUser>(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "cached user is malformed, treating as logged out");
                None
            }
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.user().map(|user| user.role)
    }

    /// The cached session. Present whenever a valid user is cached; the token
    /// is optional.
    pub fn session(&self) -> Option<Session> {
        let user = self.user()?;
        Some(Session {
            token: self.token(),
            user,
        })
    }
}
