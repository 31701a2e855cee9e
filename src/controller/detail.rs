use std::sync::Arc;

use log::error;
use parking_lot::Mutex;

use crate::{
    api::ForumApi,
    error::Result,
    forum::{Post, PostId},
};

use super::RequestScope;

/// The single post shown by the detail view
#[derive(Debug)]
pub struct PostDetail<A> {
    api: Arc<A>,
    post: Mutex<Option<Post>>,
    scope: RequestScope,
}

impl<A: ForumApi> PostDetail<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            post: Mutex::new(None),
            scope: RequestScope::new(),
        }
    }

    /// Fetch `id`, dropping whatever an earlier call still has in flight
    pub async fn load(&self, id: PostId) -> Result<()> {
        self.scope.cancel();
        let token = self.scope.token();
        *self.post.lock() = None;

        let result = self.api.get_post(id).await;
        if token.is_cancelled() {
            return Ok(());
        }

        match result {
            Ok(post) => {
                *self.post.lock() = Some(post);
                Ok(())
            }
            Err(e) => {
                error!("Error fetching post {}: {}", id, e);
                Err(e)
            }
        }
    }

    pub fn post(&self) -> Option<Post> {
        self.post.lock().clone()
    }

    pub fn cancel(&self) {
        self.scope.cancel();
    }
}
