use std::{fmt, sync::Arc};

use crate::{
    api::ForumApi,
    controller::{Comments, PostDetail},
    error::Result,
    forum::PostId,
    session::SessionStore,
};

use super::{split_form, Context, Outcome, Route, View};

pub struct DetailView<A> {
    id: PostId,
    detail: Arc<PostDetail<A>>,
    comments: Arc<Comments<A>>,
}

impl<A: ForumApi> DetailView<A> {
    pub fn new(api: Arc<A>, session: Arc<SessionStore>, id: PostId) -> Self {
        Self {
            id,
            detail: Arc::new(PostDetail::new(api.clone())),
            comments: Arc::new(Comments::new(api, session)),
        }
    }

    fn load(&self, ctx: &Context) {
        let (detail, comments, id) = (self.detail.clone(), self.comments.clone(), self.id);
        ctx.spawn("post", async move {
            let _ = futures::join!(detail.load(id), comments.load_for_post(id));
        });
    }
}

impl<A: ForumApi> View for DetailView<A> {
    fn on_enter(&mut self, ctx: &Context) -> Option<Route> {
        self.load(ctx);
        None
    }

    fn on_param_change(&mut self, route: Route, ctx: &Context) {
        if let Route::PostDetail(id) = route {
            if id != self.id {
                self.id = id;
                self.load(ctx);
            }
        }
    }

    fn on_leave(&mut self) {
        self.detail.cancel();
        self.comments.cancel();
    }

    fn handle(&mut self, command: &str, args: &str, ctx: &Context) -> Result<Outcome> {
        match command {
            "comment" => {
                let (name, body) = split_form(args, "name", "body")?;
                let comments = self.comments.clone();
                ctx.spawn("comment", async move {
                    let _ = comments.add_comment(name, body).await;
                });
                Ok(Outcome::Render)
            }
            "back" => Ok(Outcome::Navigate(Route::Posts)),
            _ => Ok(Outcome::Unknown),
        }
    }

    fn render(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        match self.detail.post() {
            Some(post) => {
                writeln!(out, "{}", post.title)?;
                writeln!(out)?;
                writeln!(out, "{}", post.body)?;
            }
            None => writeln!(out, "Loading...")?,
        }

        writeln!(out)?;
        writeln!(out, "Comments")?;
        if self.comments.is_loading_current() {
            return writeln!(out, "Loading...");
        }

        let comments = self.comments.current();
        if comments.is_empty() {
            writeln!(out, "No comments yet")?;
        }
        for comment in comments {
            writeln!(out, "- {} <{}>", comment.name, comment.email)?;
            writeln!(out, "  {}", comment.body)?;
        }
        Ok(())
    }

    fn commands(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("comment <name> | <body>", "comment on this post"),
            ("back", "return to the feed"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{comment, posts, user, Call, MockApi};

    fn api() -> Arc<MockApi> {
        Arc::new(
            MockApi::new()
                .with_pages(vec![posts(1..=5)])
                .with_comments(vec![comment(1, 1), comment(2, 3)]),
        )
    }

    #[tokio::test]
    async fn shows_post_and_its_comments() {
        let session = Arc::new(SessionStore::memory());
        let (ctx, mut settled) = Context::new(session.clone());
        let mut view = DetailView::new(api(), session, 3);

        let mut out = String::new();
        view.on_enter(&ctx);
        settled.recv().await;
        view.render(&mut out).unwrap();

        assert!(out.starts_with("post 3\n"));
        assert!(out.contains("- comment 2 <"));
        assert!(!out.contains("- comment 1 <"));
    }

    #[tokio::test]
    async fn new_id_reloads() {
        let api = api();
        let session = Arc::new(SessionStore::memory());
        let (ctx, mut settled) = Context::new(session.clone());
        let mut view = DetailView::new(api.clone(), session, 1);

        view.on_enter(&ctx);
        settled.recv().await;
        view.on_param_change(Route::PostDetail(1), &ctx);
        view.on_param_change(Route::PostDetail(2), &ctx);
        settled.recv().await;

        assert_eq!(view.id, 2);
        assert_eq!(view.detail.post().map(|p| p.id), Some(2));
        assert_eq!(
            api.calls()
                .into_iter()
                .filter(|call| matches!(call, Call::GetPost(_)))
                .count(),
            2
        );
    }

    #[tokio::test]
    async fn comment_goes_on_top() {
        let api = api();
        let session = Arc::new(SessionStore::memory());
        session.login(&user(1, "Leanne Graham")).unwrap();
        let (ctx, mut settled) = Context::new(session.clone());
        let mut view = DetailView::new(api.clone(), session, 1);

        view.on_enter(&ctx);
        settled.recv().await;
        assert_eq!(
            view.handle("comment", "Me | First!", &ctx).unwrap(),
            Outcome::Render
        );
        settled.recv().await;

        let comments = view.comments.current();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].body, "First!");
        assert_eq!(comments[0].email, "leanne.graham@example.com");
        assert!(view.handle("comment", "no body", &ctx).is_err());
    }
}
