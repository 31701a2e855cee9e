use log::{log_enabled, trace};
use reqwest::{header, Client, Method, Response};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    config::Config,
    error::{ForumError, Result},
    forum::{Comment, NewComment, NewPost, Post, PostId, User, UserId},
};

use super::{ForumApi, RequestLogger};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ForumClient {
    client: ClientWithMiddleware,
    base: String,
}

impl ForumClient {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_base(config.api())
    }

    pub fn with_base(base: &str) -> Result<Self> {
        Ok(Self {
            client: Self::build_client(USER_AGENT)?,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    fn build_client(user_agent: &str) -> Result<ClientWithMiddleware> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(ForumError::Client)?;
        Ok(ClientBuilder::new(client).with(RequestLogger).build())
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        let response = self.client.get(&url).send().await?;
        Self::decode(response, url).await
    }

    async fn send<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.url(path);
        let response = self
            .client
            .request(method, &url)
            .header(header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;
        Self::decode(response, url).await
    }

    async fn decode<T: DeserializeOwned>(response: Response, url: String) -> Result<T> {
        let response = Self::check(response, &url)?;
        let bytes = response.bytes().await?;

        if log_enabled!(log::Level::Trace) {
            if let Ok(pretty) = serde_json::from_slice::<Value>(&bytes)
                .and_then(|value| serde_json::to_string_pretty(&value))
            {
                trace!("{}", pretty);
            }
        }

        serde_json::from_slice(&bytes).map_err(|source| ForumError::Decode { url, source })
    }

    fn check(response: Response, url: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(ForumError::Status {
                status,
                url: url.to_string(),
            })
        }
    }
}

impl ForumApi for ForumClient {
    async fn list_posts(&self, page: u32, limit: u32) -> Result<Vec<Post>> {
        self.fetch(&format!("/posts?_page={}&_limit={}", page, limit))
            .await
    }

    async fn get_post(&self, id: PostId) -> Result<Post> {
        self.fetch(&format!("/posts/{}", id)).await
    }

    async fn create_post(&self, post: NewPost) -> Result<Post> {
        self.send(Method::POST, "/posts", &post).await
    }

    async fn delete_post(&self, id: PostId) -> Result<()> {
        let url = self.url(&format!("/posts/{}", id));
        let response = self.client.delete(&url).send().await?;
        Self::check(response, &url)?;
        Ok(())
    }

    async fn list_comments(&self) -> Result<Vec<Comment>> {
        self.fetch("/comments").await
    }

    async fn list_post_comments(&self, id: PostId) -> Result<Vec<Comment>> {
        self.fetch(&format!("/posts/{}/comments", id)).await
    }

    async fn create_comment(&self, comment: NewComment) -> Result<Comment> {
        self.send(Method::POST, "/comments", &comment).await
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.fetch("/users").await
    }

    async fn get_user(&self, id: UserId) -> Result<User> {
        self.fetch(&format!("/users/{}", id)).await
    }

    async fn update_user(&self, user: User) -> Result<User> {
        let path = format!("/users/{}", user.id);
        self.send(Method::PUT, &path, &user).await
    }
}
