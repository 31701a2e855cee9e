use std::{fmt, sync::Arc};

use crate::{
    api::ForumApi,
    controller::UserDirectory,
    error::{ForumError, Result},
    forum::User,
    session::{Session, SessionStore},
};

use super::{Context, Outcome, Route, View};

pub struct LoginView<A> {
    users: Arc<UserDirectory<A>>,
    selected: Option<String>,
    error: Option<String>,
}

impl<A: ForumApi> LoginView<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            users: Arc::new(UserDirectory::new(api)),
            selected: None,
            error: None,
        }
    }

    /// Pick a user by list number (1-based) or exact name
    pub fn select(&mut self, choice: &str) -> Result<&str> {
        let users = self.users.users();
        let user = match choice.parse::<usize>() {
            Ok(n) => n.checked_sub(1).and_then(|i| users.get(i)),
            Err(_) => users.iter().find(|u| u.name == choice),
        };
        let user = user.ok_or_else(|| ForumError::UnknownUser(choice.to_string()))?;

        self.error = None;
        let name = self.selected.insert(user.name.clone());
        Ok(name.as_str())
    }

    /// Resolve the selection and start a session with it
    pub fn submit(&mut self, session: &SessionStore) -> Result<Session> {
        let result = match &self.selected {
            None => Err(ForumError::EmptySelection),
            Some(name) => match self.users.find_by_name(name) {
                Some(user) => session.login(&user),
                None => Err(ForumError::UnknownUser(name.clone())),
            },
        };
        if let Err(e) = &result {
            self.error = Some(e.to_string());
        }
        result
    }
}

impl<A: ForumApi> View for LoginView<A> {
    fn on_enter(&mut self, ctx: &Context) -> Option<Route> {
        let users = self.users.clone();
        ctx.spawn("users", async move {
            let _ = users.load_all().await;
        });
        None
    }

    fn on_leave(&mut self) {
        self.users.cancel();
    }

    fn handle(&mut self, command: &str, args: &str, ctx: &Context) -> Result<Outcome> {
        match command {
            "select" => match self.select(args.trim()) {
                Ok(name) => Ok(Outcome::Notice(format!("Selected {}", name))),
                Err(e) => Ok(Outcome::Notice(e.to_string())),
            },
            "login" => match self.submit(ctx.session()) {
                Ok(_) => Ok(Outcome::Navigate(Route::Posts)),
                Err(ForumError::EmptySelection | ForumError::UnknownUser(_)) => Ok(Outcome::Render),
                Err(e) => Err(e),
            },
            _ => Ok(Outcome::Unknown),
        }
    }

    fn render(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        writeln!(out, "Authorization")?;
        writeln!(out, "Select a user to log in")?;
        writeln!(out)?;

        let users = self.users.users();
        if users.is_empty() {
            writeln!(out, "Loading...")?;
        } else {
            user_table(out, &users, self.selected.as_deref())?;
        }

        if let Some(name) = &self.selected {
            writeln!(out, "Selected: {}", name)?;
        }
        if let Some(error) = &self.error {
            writeln!(out, "Error: {}", error)?;
        }
        Ok(())
    }

    fn commands(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("select <no.|name>", "choose who to log in as"),
            ("login", "log in with the selected user"),
        ]
    }
}

fn user_table(out: &mut dyn fmt::Write, users: &[User], selected: Option<&str>) -> fmt::Result {
    let (no_width, mut name_width) = (users.len().to_string().len().max(3), 4_usize);
    for user in users {
        name_width = user.name.chars().count().max(name_width);
    }

    writeln!(
        out,
        "+-{:-<no_width$}-+-{:-<name_width$}-+- - -",
        "No.", "Name"
    )?;
    for (i, user) in users.iter().enumerate() {
        let marker = if selected == Some(user.name.as_str()) { '*' } else { ' ' };
        writeln!(
            out,
            "|{}{:>no_width$} | {:name_width$} | {}",
            marker,
            i + 1,
            user.name,
            user.email
        )?;
    }
    writeln!(
        out,
        "+-{}-+-{}-+- - -",
        "-".repeat(no_width),
        "-".repeat(name_width)
    )
}
