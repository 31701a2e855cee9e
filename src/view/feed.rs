use std::{fmt, sync::Arc};

use log::debug;

use crate::{
    api::ForumApi,
    controller::{Comments, PostFeed, Reactions, UserDirectory},
    error::Result,
    forum::{Post, PostId, UserId},
    session::SessionStore,
};

use super::{split_form, Context, Outcome, Route, View, ViewOptions};

/// Client-side filter over the loaded posts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedFilter {
    search: String,
    author: Option<UserId>,
}

impl FeedFilter {
    pub fn search(&mut self, term: &str) {
        self.search = term.trim().to_lowercase();
    }

    pub fn author(&mut self, author: Option<UserId>) {
        self.author = author;
    }

    pub fn matches(&self, post: &Post) -> bool {
        let author = self.author.map_or(true, |id| post.user_id == id);
        author && (self.search.is_empty() || post.mentions(&self.search))
    }

    pub fn apply(&self, posts: Vec<Post>) -> Vec<Post> {
        posts.into_iter().filter(|post| self.matches(post)).collect()
    }
}

/// The window of posts on screen; the sentinel sits right after the last post
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    offset: usize,
    rows: usize,
}

impl Viewport {
    pub fn new(rows: usize) -> Self {
        Self {
            offset: 0,
            rows: rows.max(1),
        }
    }

    pub fn sentinel_visible(&self, len: usize) -> bool {
        self.offset + self.rows > len
    }

    /// Never scrolls past the last post, which keeps it on screen
    pub fn scroll_down(&mut self, len: usize) {
        self.offset = (self.offset + self.rows).min(len.saturating_sub(1));
    }

    pub fn scroll_up(&mut self) {
        self.offset = self.offset.saturating_sub(self.rows);
    }

    pub fn top(&mut self) {
        self.offset = 0;
    }

    pub fn window<'a>(&self, posts: &'a [Post]) -> &'a [Post] {
        let start = self.offset.min(posts.len());
        let end = (self.offset + self.rows).min(posts.len());
        &posts[start..end]
    }
}

pub struct FeedView<A> {
    feed: Arc<PostFeed<A>>,
    comments: Arc<Comments<A>>,
    users: Arc<UserDirectory<A>>,
    reactions: Reactions,
    filter: FeedFilter,
    viewport: Viewport,
}

impl<A: ForumApi> FeedView<A> {
    pub fn new(api: Arc<A>, session: Arc<SessionStore>, options: ViewOptions) -> Self {
        Self {
            feed: Arc::new(PostFeed::new(api.clone(), session.clone(), options.page_size)),
            comments: Arc::new(Comments::new(api.clone(), session)),
            users: Arc::new(UserDirectory::new(api)),
            reactions: Reactions::new(),
            filter: FeedFilter::default(),
            viewport: Viewport::new(options.rows),
        }
    }

    pub fn visible_posts(&self) -> Vec<Post> {
        self.filter.apply(self.feed.posts())
    }

    /// Ask for the next page when the sentinel is on screen
    fn on_sentinel_visible(&self, ctx: &Context) {
        let len = self.visible_posts().len();
        if !self.viewport.sentinel_visible(len) {
            return;
        }
        let Some(claim) = self.feed.reserve_page() else {
            return;
        };

        debug!(
            "Sentinel visible after {} posts, loading page {}",
            len,
            claim.page()
        );
        let feed = self.feed.clone();
        ctx.spawn("posts", async move {
            let _ = feed.fetch_page(claim).await;
        });
    }

    fn parse_id(args: &str) -> Option<PostId> {
        args.trim().parse().ok()
    }

    fn render_post(&self, out: &mut dyn fmt::Write, post: &Post) -> fmt::Result {
        let reaction = self.reactions.state(post.id);
        let mark = |active: bool| if active { '*' } else { ' ' };

        writeln!(out, "#{:<4} {}", post.id, post.title)?;
        writeln!(out, "      {}", post.excerpt())?;
        writeln!(out, "      by {}", self.users.name_of(post.user_id))?;
        writeln!(
            out,
            "      [{}like {}] [{}dislike {}] [comments {}] [{}]",
            mark(reaction.like_active),
            reaction.like_count,
            mark(reaction.dislike_active),
            reaction.dislike_count,
            self.comments.count_for(post.id),
            if reaction.is_favorite {
                "In favorites"
            } else {
                "Add to favorites"
            }
        )?;
        writeln!(out)
    }
}

impl<A: ForumApi> View for FeedView<A> {
    fn on_enter(&mut self, ctx: &Context) -> Option<Route> {
        let users = self.users.clone();
        ctx.spawn("users", async move {
            let _ = users.load_all().await;
        });

        let comments = self.comments.clone();
        ctx.spawn("comments", async move {
            let _ = comments.load_all().await;
        });

        self.on_sentinel_visible(ctx);
        None
    }

    fn on_update(&mut self, ctx: &Context) {
        self.on_sentinel_visible(ctx);
    }

    fn on_leave(&mut self) {
        self.feed.cancel();
        self.comments.cancel();
        self.users.cancel();
    }

    fn handle(&mut self, command: &str, args: &str, ctx: &Context) -> Result<Outcome> {
        let outcome = match command {
            "more" | "down" => {
                let len = self.visible_posts().len();
                self.viewport.scroll_down(len);
                self.on_sentinel_visible(ctx);
                Outcome::Render
            }
            "up" => {
                self.viewport.scroll_up();
                Outcome::Render
            }
            "search" => {
                self.filter.search(args);
                self.viewport.top();
                self.on_sentinel_visible(ctx);
                Outcome::Render
            }
            "author" => {
                let args = args.trim();
                let author = match args {
                    "" | "all" => None,
                    id => match id.parse() {
                        Ok(id) => Some(id),
                        Err(_) => return Ok(Outcome::Notice(format!("`{}` is not a user id", id))),
                    },
                };
                self.filter.author(author);
                self.viewport.top();
                self.on_sentinel_visible(ctx);
                Outcome::Render
            }
            "like" | "dislike" | "fav" | "delete" | "open" => {
                let Some(id) = Self::parse_id(args) else {
                    return Ok(Outcome::Notice(format!("usage: {} <post id>", command)));
                };
                match command {
                    "like" => self.reactions.toggle_like(id),
                    "dislike" => self.reactions.toggle_dislike(id),
                    "fav" => {
                        self.reactions.toggle_favorite(id);
                    }
                    "delete" => {
                        let feed = self.feed.clone();
                        ctx.spawn("delete", async move {
                            let _ = feed.delete_post(id).await;
                        });
                    }
                    _ => return Ok(Outcome::Navigate(Route::PostDetail(id))),
                }
                Outcome::Render
            }
            "add" => {
                let (title, body) = split_form(args, "title", "body")?;
                let feed = self.feed.clone();
                ctx.spawn("add", async move {
                    let _ = feed.add_post(title, body).await;
                });
                Outcome::Render
            }
            _ => Outcome::Unknown,
        };
        Ok(outcome)
    }

    fn render(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        let favorites = self.reactions.favorites().count();
        writeln!(out, "Latest Posts ({} loaded, {} favorites)", self.feed.len(), favorites)?;
        if !self.filter.search.is_empty() {
            writeln!(out, "search: {}", self.filter.search)?;
        }
        if let Some(author) = self.filter.author {
            writeln!(out, "author: {}", self.users.name_of(author))?;
        }
        writeln!(out)?;

        if self.users.is_loading() || self.comments.is_loading_all() {
            writeln!(out, "Loading...")?;
        } else {
            let posts = self.visible_posts();
            for post in self.viewport.window(&posts) {
                self.render_post(out, post)?;
            }
            if self.viewport.sentinel_visible(posts.len()) && !self.feed.has_more() {
                writeln!(out, "-- end of feed --")?;
            }
        }

        if self.feed.is_loading() {
            writeln!(out, "Loading...")?;
        }
        Ok(())
    }

    fn commands(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("more | up", "scroll the feed"),
            ("search <text>", "filter by title or body, empty to clear"),
            ("author <id|all>", "only show posts of one author"),
            ("like <id> | dislike <id>", "react to a post"),
            ("fav <id>", "add or remove a favorite"),
            ("open <id>", "show a post with its comments"),
            ("delete <id>", "delete a post"),
            ("add <title> | <body>", "write a new post"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::UnboundedReceiver;

    use crate::{
        test::{comment, post, posts, user, Call, MockApi},
        view::Settled,
    };

    #[test]
    fn filter_is_case_insensitive_and_by_author() {
        let mut filter = FeedFilter::default();
        let mut a = post(1);
        a.title = "Qui Est Esse".into();
        let mut b = post(2);
        b.user_id = 2;
        b.body = "nesciunt quas ODIO".into();

        filter.search("esse");
        assert!(filter.matches(&a));
        assert!(!filter.matches(&b));

        filter.search("odio");
        assert!(filter.matches(&b));
        filter.author(Some(1));
        assert!(!filter.matches(&b));

        filter.search("");
        assert_eq!(filter.apply(vec![a.clone(), b]), vec![a]);
    }

    #[test]
    fn sentinel_follows_the_last_row() {
        let mut viewport = Viewport::new(5);
        assert!(viewport.sentinel_visible(0));
        assert!(!viewport.sentinel_visible(5));

        viewport.scroll_down(7);
        assert!(!viewport.sentinel_visible(10));
        assert_eq!(viewport.window(&posts(1..=7)).len(), 2);

        viewport.scroll_up();
        viewport.scroll_up();
        assert_eq!(viewport.window(&posts(1..=7)).len(), 5);
    }

    #[test]
    fn scrolling_past_the_end_keeps_the_last_post() {
        let loaded = posts(1..=5);
        let mut viewport = Viewport::new(5);

        viewport.scroll_down(loaded.len());
        viewport.scroll_down(loaded.len());
        assert!(viewport.sentinel_visible(loaded.len()));
        let window = viewport.window(&loaded);
        assert_eq!(window.last().map(|p| p.id), Some(5));

        let mut empty = Viewport::new(5);
        empty.scroll_down(0);
        assert_eq!(empty, Viewport::new(5));
    }

    /// Feed `on_update` with settled requests until `done` holds
    async fn settle_until(
        view: &mut FeedView<MockApi>,
        ctx: &Context,
        settled: &mut UnboundedReceiver<Settled>,
        done: impl Fn(&FeedView<MockApi>) -> bool,
    ) {
        while !done(view) {
            settled.recv().await;
            view.on_update(ctx);
        }
    }

    fn loaded(view: &FeedView<MockApi>) -> bool {
        !view.feed.has_more() && !view.users.users().is_empty() && view.comments.count_for(1) > 0
    }

    #[tokio::test]
    async fn add_needs_title_and_body() {
        let api = Arc::new(MockApi::new());
        let session = Arc::new(SessionStore::memory());
        session.login(&user(1, "Leanne Graham")).unwrap();
        let (ctx, _settled) = Context::new(session.clone());
        let mut view = FeedView::new(api.clone(), session, ViewOptions::default());

        assert!(view.handle("add", "only a title", &ctx).is_err());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn reactions_render_on_cards() {
        let api = Arc::new(
            MockApi::new()
                .with_pages(vec![posts(1..=2)])
                .with_comments(vec![comment(1, 1), comment(2, 1)]),
        );
        let session = Arc::new(SessionStore::memory());
        let (ctx, mut settled) = Context::new(session.clone());
        let mut view = FeedView::new(api.clone(), session, ViewOptions::default());

        view.on_enter(&ctx);
        settle_until(&mut view, &ctx, &mut settled, loaded).await;

        view.handle("like", "1", &ctx).unwrap();
        view.handle("fav", "2", &ctx).unwrap();
        let mut out = String::new();
        view.render(&mut out).unwrap();

        assert!(out.contains("[*like 1] [ dislike 0]"));
        assert!(out.contains("[comments 2]"));
        assert!(out.contains("In favorites"));
        assert!(out.contains("-- end of feed --"));
        assert!(out.contains("by Leanne Graham"));
        assert_eq!(
            view.handle("open", "2", &ctx).unwrap(),
            Outcome::Navigate(Route::PostDetail(2))
        );
        assert!(matches!(
            view.handle("like", "two", &ctx).unwrap(),
            Outcome::Notice(_)
        ));
    }

    #[tokio::test]
    async fn short_first_page_keeps_loading() {
        let api = Arc::new(
            MockApi::new()
                .with_pages(vec![posts(1..=2), posts(3..=4)])
                .with_comments(vec![comment(1, 1)]),
        );
        let session = Arc::new(SessionStore::memory());
        let (ctx, mut settled) = Context::new(session.clone());
        let mut view = FeedView::new(api.clone(), session, ViewOptions::default());

        view.on_enter(&ctx);
        settle_until(&mut view, &ctx, &mut settled, loaded).await;

        assert_eq!(view.visible_posts().len(), 4);
        let pages: Vec<_> = api
            .calls()
            .into_iter()
            .filter(|call| matches!(call, Call::ListPosts { .. }))
            .collect();
        assert_eq!(pages.len(), 3);
    }
}
