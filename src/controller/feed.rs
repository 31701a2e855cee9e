//! Paged post feed.
//!
//! Pages are appended in the order they were requested. Only one page request
//! may be in flight: a call to [`PostFeed::load_next_page`] made while another
//! is outstanding, or after the api returned an empty page, returns
//! [`PageLoad::Skipped`] without touching the api. Callers that hand the fetch
//! to a background task claim the page first with [`PostFeed::reserve_page`];
//! cancelling the feed after the claim drops the page even before it is
//! fetched.

use std::sync::Arc;

use log::{debug, error, info, warn};
use parking_lot::Mutex;

use crate::{
    api::ForumApi,
    error::{ForumError, Result},
    forum::{NewPost, Post, PostId},
    session::SessionStore,
};

use super::{scope::Ticket, RequestScope};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLoad {
    /// The page had this many posts, all appended
    Appended(usize),
    /// The page was empty, there is nothing more to load
    Exhausted,
    /// A request was already in flight or the feed is exhausted
    Skipped,
    /// The feed was cancelled while the request was in flight
    Cancelled,
}

/// A page claimed by [`PostFeed::reserve_page`], bound to the feed's
/// requests at the time of the claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageClaim {
    page: u32,
    ticket: Ticket,
}

impl PageClaim {
    pub fn page(&self) -> u32 {
        self.page
    }
}

#[derive(Debug)]
struct FeedState {
    posts: Vec<Post>,
    next_page: u32,
    loading: bool,
    has_more: bool,
}

#[derive(Debug)]
pub struct PostFeed<A> {
    api: Arc<A>,
    session: Arc<SessionStore>,
    page_size: u32,
    state: Mutex<FeedState>,
    scope: RequestScope,
}

impl<A: ForumApi> PostFeed<A> {
    pub fn new(api: Arc<A>, session: Arc<SessionStore>, page_size: u32) -> Self {
        Self {
            api,
            session,
            page_size,
            state: Mutex::new(FeedState {
                posts: Vec::new(),
                next_page: 1,
                loading: false,
                has_more: true,
            }),
            scope: RequestScope::new(),
        }
    }

    pub fn posts(&self) -> Vec<Post> {
        self.state.lock().posts.clone()
    }

    pub fn len(&self) -> usize {
        self.state.lock().posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    pub fn has_more(&self) -> bool {
        self.state.lock().has_more
    }

    /// Claim the next page; `None` while a page is in flight or once the feed
    /// is exhausted
    pub fn reserve_page(&self) -> Option<PageClaim> {
        let mut state = self.state.lock();
        if state.loading || !state.has_more {
            return None;
        }
        state.loading = true;
        Some(PageClaim {
            page: state.next_page,
            ticket: self.scope.ticket(),
        })
    }

    pub async fn load_next_page(&self) -> Result<PageLoad> {
        match self.reserve_page() {
            Some(claim) => self.fetch_page(claim).await,
            None => Ok(PageLoad::Skipped),
        }
    }

    /// Fetch a page claimed with [`PostFeed::reserve_page`]
    pub async fn fetch_page(&self, claim: PageClaim) -> Result<PageLoad> {
        let PageClaim { page, ticket } = claim;
        let token = self.scope.redeem(ticket);
        if token.is_cancelled() {
            debug!("Page {} of posts was cancelled before it started", page);
            self.state.lock().loading = false;
            return Ok(PageLoad::Cancelled);
        }

        debug!("Loading page {} of posts", page);
        let result = self.api.list_posts(page, self.page_size).await;

        let mut state = self.state.lock();
        state.loading = false;
        if token.is_cancelled() {
            debug!("Dropped page {} of posts", page);
            return Ok(PageLoad::Cancelled);
        }

        match result {
            Ok(posts) if posts.is_empty() => {
                info!("No more posts after page {}", page - 1);
                state.has_more = false;
                Ok(PageLoad::Exhausted)
            }
            Ok(posts) => {
                let count = posts.len();
                state.posts.extend(posts);
                state.next_page += 1;
                Ok(PageLoad::Appended(count))
            }
            Err(e) => {
                error!("Error loading posts: {}", e);
                Err(e)
            }
        }
    }

    pub async fn add_post(&self, title: String, body: String) -> Result<Post> {
        let Some(user_id) = self.session.user_id() else {
            warn!("Not adding post: no user in session");
            return Err(ForumError::MissingSession);
        };

        let token = self.scope.token();
        let post = NewPost {
            title,
            body,
            user_id,
        };
        match self.api.create_post(post).await {
            Ok(post) => {
                if !token.is_cancelled() {
                    self.state.lock().posts.insert(0, post.clone());
                }
                Ok(post)
            }
            Err(e) => {
                error!("Error adding post: {}", e);
                Err(e)
            }
        }
    }

    pub async fn delete_post(&self, id: PostId) -> Result<()> {
        let token = self.scope.token();
        match self.api.delete_post(id).await {
            Ok(()) => {
                if !token.is_cancelled() {
                    self.state.lock().posts.retain(|post| post.id != id);
                }
                Ok(())
            }
            Err(e) => {
                error!("Error deleting post {}: {}", id, e);
                Err(e)
            }
        }
    }

    /// Drop the results of every request still in flight
    pub fn cancel(&self) {
        self.scope.cancel();
    }
}
