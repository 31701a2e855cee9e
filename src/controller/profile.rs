//! The logged in user's own record.
//!
//! Edits go to a draft that only exists while edit mode is on. Saving sends the
//! whole draft with `PUT /users/{id}`; cancelling throws the draft away.

use std::sync::Arc;

use log::{error, info};
use parking_lot::Mutex;

use crate::{
    api::ForumApi,
    error::{ForumError, Result},
    forum::{ProfileField, User},
    session::SessionStore,
};

use super::RequestScope;

#[derive(Debug, Default)]
struct ProfileState {
    user: Option<User>,
    draft: Option<User>,
    saving: bool,
}

#[derive(Debug)]
pub struct Profile<A> {
    api: Arc<A>,
    session: Arc<SessionStore>,
    state: Mutex<ProfileState>,
    scope: RequestScope,
}

impl<A: ForumApi> Profile<A> {
    pub fn new(api: Arc<A>, session: Arc<SessionStore>) -> Self {
        Self {
            api,
            session,
            state: Mutex::default(),
            scope: RequestScope::new(),
        }
    }

    pub async fn load(&self) -> Result<()> {
        let id = self.session.user_id().ok_or(ForumError::MissingSession)?;
        let token = self.scope.token();

        let result = self.api.get_user(id).await;
        if token.is_cancelled() {
            return Ok(());
        }

        match result {
            Ok(user) => {
                self.state.lock().user = Some(user);
                Ok(())
            }
            Err(e) => {
                error!("Error fetching user data: {}", e);
                Err(e)
            }
        }
    }

    /// The record as it should be displayed: the draft while editing
    pub fn user(&self) -> Option<User> {
        let state = self.state.lock();
        state.draft.clone().or_else(|| state.user.clone())
    }

    pub fn is_editing(&self) -> bool {
        self.state.lock().draft.is_some()
    }

    pub fn is_saving(&self) -> bool {
        self.state.lock().saving
    }

    /// Returns false when there is nothing loaded to edit yet
    pub fn begin_edit(&self) -> bool {
        let mut state = self.state.lock();
        if state.draft.is_none() {
            state.draft = state.user.clone();
        }
        state.draft.is_some()
    }

    pub fn cancel_edit(&self) {
        self.state.lock().draft = None;
    }

    /// Returns false outside edit mode
    pub fn edit(&self, field: ProfileField, value: String) -> bool {
        match self.state.lock().draft.as_mut() {
            Some(draft) => {
                field.apply(draft, value);
                true
            }
            None => false,
        }
    }

    /// Submit the draft; edit mode ends only once the api accepted it
    pub async fn save(&self) -> Result<Option<User>> {
        let token = self.scope.token();
        let draft = {
            let mut state = self.state.lock();
            let Some(draft) = state.draft.clone() else {
                return Ok(None);
            };
            state.saving = true;
            draft
        };

        let result = self.api.update_user(draft).await;
        let mut state = self.state.lock();
        state.saving = false;
        if token.is_cancelled() {
            return Ok(None);
        }

        match result {
            Ok(user) => {
                info!("Saved profile of user {}", user.id);
                state.user = Some(user.clone());
                state.draft = None;
                Ok(Some(user))
            }
            Err(e) => {
                error!("Error updating user data: {}", e);
                Err(e)
            }
        }
    }

    pub fn logout(&self) -> Result<()> {
        self.scope.cancel();
        *self.state.lock() = ProfileState::default();
        self.session.logout()
    }

    pub fn cancel(&self) {
        self.scope.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{user, Call, MockApi};

    fn logged_in(id: u32) -> Arc<SessionStore> {
        let session = SessionStore::memory();
        session.login(&user(id, "Leanne Graham")).unwrap();
        Arc::new(session)
    }

    #[tokio::test]
    async fn needs_a_session() {
        let api = Arc::new(MockApi::new());
        let profile = Profile::new(api.clone(), Arc::new(SessionStore::memory()));
        assert!(matches!(profile.load().await, Err(ForumError::MissingSession)));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn edits_apply_only_in_edit_mode() {
        let profile = Profile::new(Arc::new(MockApi::new()), logged_in(1));
        profile.load().await.unwrap();

        assert!(!profile.edit(ProfileField::City, "Porto".into()));
        assert!(profile.begin_edit());
        assert!(profile.edit(ProfileField::City, "Porto".into()));
        assert_eq!(profile.user().unwrap().address.city, "Porto");

        profile.cancel_edit();
        assert!(!profile.is_editing());
        assert_ne!(profile.user().unwrap().address.city, "Porto");
    }

    #[tokio::test]
    async fn save_sends_the_full_record() {
        let api = Arc::new(MockApi::new());
        let profile = Profile::new(api.clone(), logged_in(1));
        profile.load().await.unwrap();

        profile.begin_edit();
        profile.edit(ProfileField::Phone, "555-0100".into());
        profile.edit(ProfileField::CatchPhrase, "Ship it".into());
        let saved = profile.save().await.unwrap().unwrap();

        assert!(!profile.is_editing());
        assert_eq!(saved.phone, "555-0100");
        assert_eq!(saved.company.catch_phrase, "Ship it");
        assert_eq!(saved.name, "Leanne Graham");
        assert_eq!(api.calls().last(), Some(&Call::UpdateUser(saved)));
    }

    #[tokio::test]
    async fn failed_save_keeps_editing() {
        let api = Arc::new(MockApi::new());
        let profile = Profile::new(api.clone(), logged_in(1));
        profile.load().await.unwrap();
        profile.begin_edit();
        profile.edit(ProfileField::Name, "Leanne G.".into());

        api.set_failing(true);
        assert!(profile.save().await.is_err());
        assert!(profile.is_editing());
        assert_eq!(profile.user().unwrap().name, "Leanne G.");
    }

    #[tokio::test]
    async fn logout_forgets_everything() {
        let session = logged_in(1);
        let profile = Profile::new(Arc::new(MockApi::new()), session.clone());
        profile.load().await.unwrap();

        profile.logout().unwrap();
        assert!(profile.user().is_none());
        assert!(!session.is_active());
    }
}
