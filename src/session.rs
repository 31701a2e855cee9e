//! The logged in identity.
//!
//! A [`SessionStore`] is created once at start and handed to every controller
//! and view that needs to know who is acting. `login` persists the identity to a
//! small JSON file so it survives restarts, `logout` removes it.

use std::{fs, io, path::PathBuf};

use chrono::{DateTime, Utc};
use log::{info, warn};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

use crate::{
    error::Result,
    forum::{User, UserId},
};

#[serde_as]
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde_as(as = "DisplayFromStr")]
    pub user_id: UserId,
    pub email: String,
    pub logged_in_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct SessionStore {
    path: Option<PathBuf>,
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    /// A store that forgets everything on exit
    pub fn memory() -> Self {
        Self::default()
    }

    /// Open the store backed by `path`, restoring a previous session if one was saved
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let current = match fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<Session>(&bytes) {
                Ok(session) => {
                    info!("Restored session of user {}", session.user_id);
                    Some(session)
                }
                Err(e) => {
                    warn!("Ignoring unreadable session {}: {}", path.display(), e);
                    None
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path: Some(path),
            current: RwLock::new(current),
        })
    }

    pub fn current(&self) -> Option<Session> {
        self.current.read().clone()
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.current.read().as_ref().map(|s| s.user_id)
    }

    pub fn email(&self) -> Option<String> {
        self.current
            .read()
            .as_ref()
            .map(|s| s.email.clone())
            .filter(|email| !email.is_empty())
    }

    pub fn is_active(&self) -> bool {
        self.current.read().is_some()
    }

    pub fn login(&self, user: &User) -> Result<Session> {
        let session = Session {
            user_id: user.id,
            email: user.email.clone(),
            logged_in_at: Utc::now(),
        };

        if let Some(path) = &self.path {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, serde_json::to_vec_pretty(&session)?)?;
        }

        info!("Logged in as {} ({})", user.name, user.id);
        *self.current.write() = Some(session.clone());
        Ok(session)
    }

    pub fn logout(&self) -> Result<()> {
        if let Some(path) = &self.path {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        if let Some(session) = self.current.write().take() {
            info!("Logged out user {}", session.user_id);
        }
        Ok(())
    }
}
