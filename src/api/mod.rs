pub mod jsonplaceholder;

use std::{future::Future, time::Instant};

use http::Extensions;
use log::{debug, warn};
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next};

use crate::{
    error::Result,
    forum::{Comment, NewComment, NewPost, Post, PostId, User, UserId},
};

pub use jsonplaceholder::ForumClient;

pub const DEFAULT_API: &str = "https://jsonplaceholder.typicode.com";

/// Every call the views make against the remote forum.
///
/// Implementations do not retry and do not cache.
pub trait ForumApi: Send + Sync + 'static {
    fn list_posts(&self, page: u32, limit: u32) -> impl Future<Output = Result<Vec<Post>>> + Send;
    fn get_post(&self, id: PostId) -> impl Future<Output = Result<Post>> + Send;
    fn create_post(&self, post: NewPost) -> impl Future<Output = Result<Post>> + Send;
    fn delete_post(&self, id: PostId) -> impl Future<Output = Result<()>> + Send;

    fn list_comments(&self) -> impl Future<Output = Result<Vec<Comment>>> + Send;
    fn list_post_comments(&self, id: PostId) -> impl Future<Output = Result<Vec<Comment>>> + Send;
    fn create_comment(&self, comment: NewComment) -> impl Future<Output = Result<Comment>> + Send;

    fn list_users(&self) -> impl Future<Output = Result<Vec<User>>> + Send;
    fn get_user(&self, id: UserId) -> impl Future<Output = Result<User>> + Send;
    fn update_user(&self, user: User) -> impl Future<Output = Result<User>> + Send;
}

/// Logs every request with its status and latency
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestLogger;

#[async_trait::async_trait]
impl Middleware for RequestLogger {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        let method = req.method().clone();
        let url = req.url().clone();
        let now = Instant::now();

        let result = next.run(req, extensions).await;
        match &result {
            Ok(response) => debug!(
                "{} {} -> {} ({} ms)",
                method,
                url,
                response.status(),
                now.elapsed().as_millis()
            ),
            Err(e) => warn!("{} {} failed: {}", method, url, e),
        }
        result
    }
}
