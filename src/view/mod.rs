//! Terminal views.
//!
//! A view owns the controllers it shows. The shell calls [`View::on_enter`]
//! when the view is mounted, [`View::on_param_change`] when the route keeps the
//! same view but changes its id, and [`View::on_leave`] before dropping it.
//! Requests are never awaited inline: views hand them to [`Context::spawn`]
//! and get [`View::on_update`] once each one settles.

pub mod detail;
pub mod feed;
pub mod layout;
pub mod login;
pub mod profile;
pub mod route;

use std::{fmt, future::Future, sync::Arc};

use log::trace;
use tokio::sync::mpsc;

use crate::{
    api::ForumApi,
    error::{ForumError, Result},
    session::SessionStore,
};

pub use detail::DetailView;
pub use feed::FeedView;
pub use login::LoginView;
pub use profile::ProfileView;
pub use route::Route;

/// Emitted each time a spawned request settles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settled(pub &'static str);

#[derive(Debug, Clone)]
pub struct Context {
    session: Arc<SessionStore>,
    settled: mpsc::UnboundedSender<Settled>,
}

impl Context {
    pub fn new(session: Arc<SessionStore>) -> (Self, mpsc::UnboundedReceiver<Settled>) {
        let (settled, receiver) = mpsc::unbounded_channel();
        (Self { session, settled }, receiver)
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Run `task` in the background and report back when it is done
    pub fn spawn<F>(&self, label: &'static str, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let settled = self.settled.clone();
        tokio::spawn(async move {
            task.await;
            trace!("{} settled", label);
            let _ = settled.send(Settled(label));
        });
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Render,
    Navigate(Route),
    Notice(String),
    Unknown,
}

#[derive(Debug, Clone, Copy)]
pub struct ViewOptions {
    pub page_size: u32,
    pub rows: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            page_size: 5,
            rows: 5,
        }
    }
}

pub trait View {
    /// Start the initial fetches; may redirect instead
    fn on_enter(&mut self, ctx: &Context) -> Option<Route>;

    fn on_param_change(&mut self, _route: Route, _ctx: &Context) {}

    fn on_update(&mut self, _ctx: &Context) {}

    /// Results of requests still in flight will be dropped
    fn on_leave(&mut self) {}

    fn handle(&mut self, command: &str, args: &str, ctx: &Context) -> Result<Outcome>;

    fn render(&self, out: &mut dyn fmt::Write) -> fmt::Result;

    /// `(usage, description)` of every command the view understands
    fn commands(&self) -> &'static [(&'static str, &'static str)];
}

pub fn build<A: ForumApi>(
    route: Route,
    api: &Arc<A>,
    session: &Arc<SessionStore>,
    options: ViewOptions,
) -> Box<dyn View> {
    match route {
        Route::Auth => Box::new(LoginView::new(api.clone())),
        Route::Posts => Box::new(FeedView::new(api.clone(), session.clone(), options)),
        Route::PostDetail(id) => Box::new(DetailView::new(api.clone(), session.clone(), id)),
        Route::Profile => Box::new(ProfileView::new(api.clone(), session.clone())),
    }
}

/// Split `title | body` form input, both parts required
pub fn split_form(args: &str, first: &'static str, second: &'static str) -> Result<(String, String)> {
    let (a, b) = args.split_once('|').unwrap_or((args, ""));
    let (a, b) = (a.trim(), b.trim());
    if a.is_empty() {
        return Err(ForumError::MissingField(first));
    }
    if b.is_empty() {
        return Err(ForumError::MissingField(second));
    }
    Ok((a.to_string(), b.to_string()))
}
