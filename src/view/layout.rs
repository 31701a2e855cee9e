use std::fmt;

use crate::session::SessionStore;

const TITLE: &str = "KV Forum";
const WIDTH: usize = 60;

/// Shared header above every view but login
pub fn header(out: &mut dyn fmt::Write, session: &SessionStore) -> fmt::Result {
    let nav = "[posts] All posts   [profile] Profile";
    writeln!(out, "{:<width$}{}", TITLE, nav, width = WIDTH - nav.len())?;
    match session.current() {
        Some(session) => writeln!(out, "signed in as user {} <{}>", session.user_id, session.email)?,
        None => writeln!(out, "not signed in")?,
    }
    writeln!(out, "{}", "=".repeat(WIDTH))?;
    writeln!(out)
}
