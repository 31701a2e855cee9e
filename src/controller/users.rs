use std::sync::Arc;

use log::error;
use parking_lot::Mutex;

use crate::{
    api::ForumApi,
    error::Result,
    forum::{User, UserId},
};

use super::RequestScope;

pub const UNKNOWN_AUTHOR: &str = "Unknown author";

#[derive(Debug, Default)]
struct Directory {
    users: Vec<User>,
    loading: bool,
}

/// Every user of the forum, fetched once
#[derive(Debug)]
pub struct UserDirectory<A> {
    api: Arc<A>,
    state: Mutex<Directory>,
    scope: RequestScope,
}

impl<A: ForumApi> UserDirectory<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            state: Mutex::default(),
            scope: RequestScope::new(),
        }
    }

    pub async fn load_all(&self) -> Result<usize> {
        let token = self.scope.token();
        self.state.lock().loading = true;

        let result = self.api.list_users().await;
        if token.is_cancelled() {
            return Ok(0);
        }

        let mut state = self.state.lock();
        state.loading = false;
        match result {
            Ok(users) => {
                state.users = users;
                Ok(state.users.len())
            }
            Err(e) => {
                error!("Error loading users: {}", e);
                Err(e)
            }
        }
    }

    pub fn users(&self) -> Vec<User> {
        self.state.lock().users.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    /// Exact match on the display name
    pub fn find_by_name(&self, name: &str) -> Option<User> {
        self.state
            .lock()
            .users
            .iter()
            .find(|u| u.name == name)
            .cloned()
    }

    pub fn name_of(&self, id: UserId) -> String {
        self.state
            .lock()
            .users
            .iter()
            .find(|u| u.id == id)
            .map(|u| u.name.clone())
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string())
    }

    pub fn cancel(&self) {
        self.scope.cancel();
    }
}
