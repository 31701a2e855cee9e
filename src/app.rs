//! The interactive shell: reads commands line by line, routes between views
//! and redraws the screen whenever a command ran or a request settled.

use std::{
    fmt::{self, Write as _},
    io::{self, Write},
    sync::Arc,
};

use log::{debug, error, info, warn};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    sync::mpsc::UnboundedReceiver,
};

use crate::{
    api::ForumApi,
    session::SessionStore,
    view::{self, layout, Context, Outcome, Route, Settled, View, ViewOptions},
};

const MAX_REDIRECTS: usize = 4;

const GLOBAL_COMMANDS: &[(&str, &str)] = &[
    ("posts", "go to the feed"),
    ("profile", "go to your profile"),
    ("go <path>", "open a route, e.g. `go /posts/3`"),
    ("help", "list the commands of this screen"),
    ("quit", "leave"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App<A> {
    api: Arc<A>,
    session: Arc<SessionStore>,
    options: ViewOptions,
    route: Route,
    view: Option<Box<dyn View>>,
    notice: Option<String>,
    ctx: Context,
    settled: UnboundedReceiver<Settled>,
}

impl<A: ForumApi> App<A> {
    pub fn new(api: Arc<A>, session: Arc<SessionStore>, options: ViewOptions) -> Self {
        let (ctx, settled) = Context::new(session.clone());
        Self {
            api,
            session,
            options,
            route: Route::Auth,
            view: None,
            notice: None,
            ctx,
            settled,
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    /// Mount the view of `route`, following redirects of the entered view
    pub fn navigate(&mut self, route: Route) {
        let mut route = route;
        for _ in 0..MAX_REDIRECTS {
            if let Some(view) = self.view.as_mut() {
                if self.route.same_view(&route) {
                    debug!("{} -> {}", self.route, route);
                    view.on_param_change(route, &self.ctx);
                    self.route = route;
                    return;
                }
                view.on_leave();
            }

            info!("Entering {}", route);
            let mut view = view::build(route, &self.api, &self.session, self.options);
            match view.on_enter(&self.ctx) {
                Some(redirect) => {
                    debug!("{} redirected to {}", route, redirect);
                    self.view = None;
                    route = redirect;
                }
                None => {
                    self.view = Some(view);
                    self.route = route;
                    return;
                }
            }
        }
        warn!("Too many redirects, staying on {}", self.route);
    }

    /// Run one line of input
    pub fn dispatch(&mut self, line: &str) -> Flow {
        self.notice = None;
        let line = line.trim();
        let (command, args) = line.split_once(' ').unwrap_or((line, ""));

        match command {
            "" => {}
            "quit" | "exit" | "q" => return Flow::Quit,
            "help" => self.notice = Some(self.help()),
            "posts" => self.navigate(Route::Posts),
            "profile" => self.navigate(Route::Profile),
            "go" => self.navigate(Route::parse(args)),
            _ => {
                let Some(view) = self.view.as_mut() else {
                    return Flow::Continue;
                };
                match view.handle(command, args, &self.ctx) {
                    Ok(Outcome::Render) => {}
                    Ok(Outcome::Navigate(route)) => self.navigate(route),
                    Ok(Outcome::Notice(notice)) => self.notice = Some(notice),
                    Ok(Outcome::Unknown) => {
                        self.notice = Some(format!("unknown command `{}`, try `help`", command))
                    }
                    Err(e) if e.is_remote() => {
                        error!("{} failed: {}", command, e);
                        self.notice = Some(e.to_string());
                    }
                    Err(e) => {
                        warn!("{} failed: {}", command, e);
                        self.notice = Some(e.to_string());
                    }
                }
            }
        }
        Flow::Continue
    }

    /// Let the view react to one settled request
    pub async fn settle(&mut self) -> Option<Settled> {
        let settled = self.settled.recv().await?;
        self.on_settled(settled);
        Some(settled)
    }

    fn on_settled(&mut self, Settled(label): Settled) {
        debug!("Request `{}` settled", label);
        if let Some(view) = self.view.as_mut() {
            view.on_update(&self.ctx);
        }
    }

    fn help(&self) -> String {
        let view = self.view.as_ref().map(|view| view.commands()).unwrap_or_default();
        let width = view
            .iter()
            .chain(GLOBAL_COMMANDS)
            .map(|(usage, _)| usage.len())
            .max()
            .unwrap_or_default();

        let mut help = String::from("commands:");
        for (usage, description) in view.iter().chain(GLOBAL_COMMANDS) {
            let _ = write!(help, "\n  {:<width$}  {}", usage, description);
        }
        help
    }

    fn write_screen(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        if self.route.has_layout() {
            layout::header(out, &self.session)?;
        }
        if let Some(view) = &self.view {
            view.render(out)?;
        }
        if let Some(notice) = &self.notice {
            writeln!(out)?;
            writeln!(out, "{}", notice)?;
        }
        Ok(())
    }

    pub fn screen(&self) -> String {
        let mut screen = String::new();
        // writing into a String cannot fail
        let _ = self.write_screen(&mut screen);
        screen
    }

    fn draw(&self, out: &mut impl Write) -> io::Result<()> {
        write!(out, "\n{}\n{}> ", self.screen(), self.route())?;
        out.flush()
    }

    pub async fn run<R, W>(&mut self, start: Route, input: R, mut out: W) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        self.navigate(start);
        self.draw(&mut out)?;

        let mut lines = input.lines();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if self.dispatch(&line) == Flow::Quit {
                        break;
                    }
                }
                Some(settled) = self.settled.recv() => self.on_settled(settled),
            }
            self.draw(&mut out)?;
        }

        if let Some(view) = self.view.as_mut() {
            view.on_leave();
        }
        info!("Bye");
        Ok(())
    }
}
