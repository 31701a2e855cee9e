use std::{fmt, sync::Arc};

use clap::ValueEnum;
use log::warn;

use crate::{
    api::ForumApi,
    controller::Profile,
    error::Result,
    forum::ProfileField,
    session::SessionStore,
};

use super::{Context, Outcome, Route, View};

pub struct ProfileView<A> {
    profile: Arc<Profile<A>>,
}

impl<A: ForumApi> ProfileView<A> {
    pub fn new(api: Arc<A>, session: Arc<SessionStore>) -> Self {
        Self {
            profile: Arc::new(Profile::new(api, session)),
        }
    }
}

impl<A: ForumApi> View for ProfileView<A> {
    fn on_enter(&mut self, ctx: &Context) -> Option<Route> {
        if !ctx.session().is_active() {
            warn!("No session, redirecting to login");
            return Some(Route::Auth);
        }

        let profile = self.profile.clone();
        ctx.spawn("profile", async move {
            let _ = profile.load().await;
        });
        None
    }

    fn on_leave(&mut self) {
        self.profile.cancel();
    }

    fn handle(&mut self, command: &str, args: &str, ctx: &Context) -> Result<Outcome> {
        let outcome = match command {
            "edit" => {
                if !self.profile.begin_edit() {
                    return Ok(Outcome::Notice("Profile is still loading".into()));
                }
                Outcome::Render
            }
            "set" => {
                let (name, value) = args.trim().split_once(' ').unwrap_or((args.trim(), ""));
                let Some(field) = ProfileField::parse(name) else {
                    return Ok(Outcome::Notice(format!("unknown field `{}`", name)));
                };
                if !self.profile.edit(field, value.trim().to_string()) {
                    return Ok(Outcome::Notice("Type `edit` first".into()));
                }
                Outcome::Render
            }
            "save" => {
                if !self.profile.is_editing() {
                    return Ok(Outcome::Notice("Nothing to save".into()));
                }
                let profile = self.profile.clone();
                ctx.spawn("save", async move {
                    let _ = profile.save().await;
                });
                Outcome::Render
            }
            "cancel" => {
                self.profile.cancel_edit();
                Outcome::Render
            }
            "logout" => {
                self.profile.logout()?;
                Outcome::Navigate(Route::Auth)
            }
            _ => Outcome::Unknown,
        };
        Ok(outcome)
    }

    fn render(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        writeln!(out, "User Profile")?;
        writeln!(out)?;

        let Some(user) = self.profile.user() else {
            return writeln!(out, "Loading...");
        };

        let width = ProfileField::value_variants()
            .iter()
            .map(|field| field.label().len())
            .max()
            .unwrap_or_default();
        for field in ProfileField::value_variants() {
            writeln!(out, "{:>width$}: {}", field.label(), field.get(&user))?;
        }

        writeln!(out)?;
        if self.profile.is_saving() {
            writeln!(out, "Saving...")?;
        } else if self.profile.is_editing() {
            writeln!(out, "Editing: `set <field> <value>`, then `save` or `cancel`")?;
        }
        Ok(())
    }

    fn commands(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("edit", "start editing the profile"),
            ("set <field> <value>", "change one field while editing"),
            ("save", "send the changes"),
            ("cancel", "throw the changes away"),
            ("logout", "end the session"),
        ]
    }
}
