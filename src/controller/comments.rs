use std::sync::Arc;

use log::{error, warn};
use parking_lot::Mutex;

use crate::{
    api::ForumApi,
    error::{ForumError, Result},
    forum::{Comment, NewComment, PostId},
    session::SessionStore,
};

use super::RequestScope;

#[derive(Debug, Default)]
struct Listing {
    comments: Vec<Comment>,
    loading: bool,
}

#[derive(Debug, Default)]
struct PostListing {
    post_id: Option<PostId>,
    listing: Listing,
}

/// Holds two independent caches: every comment, used for counting, and the
/// comments of the open post. Adding a comment only updates the second one.
#[derive(Debug)]
pub struct Comments<A> {
    api: Arc<A>,
    session: Arc<SessionStore>,
    all: Mutex<Listing>,
    current: Mutex<PostListing>,
    all_scope: RequestScope,
    post_scope: RequestScope,
}

impl<A: ForumApi> Comments<A> {
    pub fn new(api: Arc<A>, session: Arc<SessionStore>) -> Self {
        Self {
            api,
            session,
            all: Mutex::default(),
            current: Mutex::default(),
            all_scope: RequestScope::new(),
            post_scope: RequestScope::new(),
        }
    }

    pub async fn load_all(&self) -> Result<usize> {
        let token = self.all_scope.token();
        self.all.lock().loading = true;

        let result = self.api.list_comments().await;
        if token.is_cancelled() {
            return Ok(0);
        }

        let mut all = self.all.lock();
        all.loading = false;
        match result {
            Ok(comments) => {
                all.comments = comments;
                Ok(all.comments.len())
            }
            Err(e) => {
                error!("Error fetching comments: {}", e);
                Err(e)
            }
        }
    }

    /// Switch to the comments of `post_id`; a request for the previous post is
    /// dropped when it lands. Comments added while loading stay on top.
    pub async fn load_for_post(&self, post_id: PostId) -> Result<usize> {
        self.post_scope.cancel();
        let token = self.post_scope.token();
        {
            let mut current = self.current.lock();
            current.post_id = Some(post_id);
            current.listing = Listing {
                comments: Vec::new(),
                loading: true,
            };
        }

        let result = self.api.list_post_comments(post_id).await;
        if token.is_cancelled() {
            return Ok(0);
        }

        let mut current = self.current.lock();
        current.listing.loading = false;
        match result {
            Ok(comments) => {
                let added = std::mem::take(&mut current.listing.comments);
                let loaded = comments
                    .into_iter()
                    .filter(|comment| !added.iter().any(|a| a.id == comment.id))
                    .collect::<Vec<_>>();
                current.listing.comments = added.into_iter().chain(loaded).collect();
                Ok(current.listing.comments.len())
            }
            Err(e) => {
                error!("Error fetching comments of post {}: {}", post_id, e);
                Err(e)
            }
        }
    }

    pub async fn add_comment(&self, name: String, body: String) -> Result<Comment> {
        let Some(email) = self.session.email() else {
            warn!("Not adding comment: no email in session");
            return Err(ForumError::MissingSession);
        };
        let Some(post_id) = self.current.lock().post_id else {
            return Err(ForumError::NoCurrentPost);
        };

        let token = self.post_scope.token();
        let comment = NewComment {
            post_id,
            name,
            body,
            email,
        };
        match self.api.create_comment(comment).await {
            Ok(comment) => {
                if !token.is_cancelled() {
                    self.current.lock().listing.comments.insert(0, comment.clone());
                }
                Ok(comment)
            }
            Err(e) => {
                error!("Error adding comment: {}", e);
                Err(e)
            }
        }
    }

    /// Counted from the cache of every comment
    pub fn count_for(&self, post_id: PostId) -> usize {
        self.all
            .lock()
            .comments
            .iter()
            .filter(|comment| comment.post_id == post_id)
            .count()
    }

    pub fn current(&self) -> Vec<Comment> {
        self.current.lock().listing.comments.clone()
    }

    pub fn is_loading_all(&self) -> bool {
        self.all.lock().loading
    }

    pub fn is_loading_current(&self) -> bool {
        self.current.lock().listing.loading
    }

    pub fn cancel(&self) {
        self.all_scope.cancel();
        self.post_scope.cancel();
    }
}
