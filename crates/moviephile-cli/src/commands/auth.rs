use super::{prompts, restore_session};
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use moviephile_config::PathManager;
use serde_json::json;

pub fn login(email: Option<String>, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    let mut auth = restore_session(&paths)?;

    let email = match email {
        Some(email) => email,
        None => prompts::prompt_string("Email", None)?,
    };
    let password = prompts::prompt_password("Password")?;

    if !auth.login(&email, &password)? {
        return Err(eyre!("Email and password are required"));
    }
    let user = auth
        .current_user()
        .ok_or_else(|| eyre!("Sign-in did not produce a profile"))?;
    output.success(format!("Signed in as {} ({})", user.name, user.email));
    output.json(&json!({ "type": "login", "user": user }));
    Ok(())
}

pub fn logout(output: &Output) -> Result<()> {
    let paths = PathManager::default();
    let mut auth = restore_session(&paths)?;
    if !auth.is_authenticated() {
        output.info("Not signed in");
        return Ok(());
    }
    auth.logout()?;
    output.success("Signed out");
    Ok(())
}

pub fn whoami(output: &Output) -> Result<()> {
    let paths = PathManager::default();
    let auth = restore_session(&paths)?;
    let Some(user) = auth.current_user() else {
        output.info("Not signed in. Run 'moviephile login'");
        return Ok(());
    };

    if !output.is_human() {
        output.json(&json!({ "type": "profile", "user": user }));
        return Ok(());
    }
    if output.is_quiet() {
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(vec![
        Cell::new(&user.avatar).add_attribute(comfy_table::Attribute::Bold),
        Cell::new(&user.name).fg(comfy_table::Color::Cyan),
    ]);
    table.add_row(vec![Cell::new("Username"), Cell::new(&user.username)]);
    table.add_row(vec![Cell::new("Email"), Cell::new(&user.email)]);
    if !user.bio.is_empty() {
        table.add_row(vec![Cell::new("Bio"), Cell::new(&user.bio)]);
    }
    if !user.badges.is_empty() {
        table.add_row(vec![Cell::new("Badges"), Cell::new(user.badges.join(", "))]);
    }
    let stats = &user.stats;
    table.add_row(vec![
        Cell::new("Stats"),
        Cell::new(format!(
            "{} watchlist · {} watched · {} reviews · {} followers · {} following",
            stats.watchlist, stats.watched, stats.reviews, stats.followers, stats.following
        )),
    ]);
    println!("{}", table);
    Ok(())
}
