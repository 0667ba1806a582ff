use super::{restore_session, AppContext};
use crate::output::Output;
use crate::WatchlistCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use moviephile_core::AuthSession;
use moviephile_models::{WatchStatus, WatchlistEntry};
use owo_colors::OwoColorize;
use serde_json::json;

fn signed_in(ctx: &AppContext) -> Result<AuthSession> {
    let auth = restore_session(&ctx.paths)?;
    if !auth.is_authenticated() {
        return Err(eyre!("Please sign in to manage your watchlist ('moviephile login')"));
    }
    Ok(auth)
}

pub async fn run_watchlist(cmd: WatchlistCommands, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let auth = signed_in(&ctx)?;
    let mut sync = ctx.require_watchlist(&auth)?;

    match cmd {
        WatchlistCommands::List { status } => {
            let entries: Vec<WatchlistEntry> = sync
                .refresh()
                .await?
                .iter()
                .filter(|e| status.map_or(true, |s| e.status == s))
                .cloned()
                .collect();
            print_entries(&entries, output);
        }
        WatchlistCommands::Add { id, media, status } => {
            let mut catalog = ctx.catalog()?;
            let detail = catalog.detail(media.into(), id).await?;
            let row = sync.add(&detail.item, status).await?;
            output.success(format!("Added '{}' to your watchlist ({})", row.movie_title, row.status));
            output.json(&json!({ "type": "watchlist_add", "entry": row }));
        }
        WatchlistCommands::Remove { id } => {
            sync.remove(id).await?;
            output.success(format!("Removed {} from your watchlist", id));
        }
        WatchlistCommands::Toggle { id, media } => {
            let mut catalog = ctx.catalog()?;
            let detail = catalog.detail(media.into(), id).await?;
            let outcome = sync.toggle(&detail.item).await?;
            if outcome.saved {
                output.success(format!("Saved '{}'", detail.item.title));
            } else {
                output.success(format!("Removed '{}'", detail.item.title));
            }
            if let Some(e) = &outcome.remote_error {
                output.warn(format!("The change could not be saved remotely: {}", e));
            }
            output.json(&json!({
                "type": "watchlist_toggle",
                "movie_id": outcome.movie_id,
                "saved": outcome.saved,
                "remote_error": outcome.remote_error.as_ref().map(|e| e.to_string()),
            }));
        }
        WatchlistCommands::Status { id, status } => {
            if sync.lookup(id).await?.is_none() {
                return Err(eyre!("{} is not in your watchlist", id));
            }
            let status = match status {
                Some(status) => {
                    sync.set_status(id, status).await?;
                    status
                }
                None => sync.cycle_status(id).await?,
            };
            output.success(format!("Marked {} as {}", id, status_label(status)));
        }
        WatchlistCommands::Progress { id, percent } => {
            let stored = sync.update_progress(id, percent).await?;
            output.success(format!("Progress for {} set to {}%", id, stored));
        }
    }
    Ok(())
}

fn status_label(status: WatchStatus) -> &'static str {
    match status {
        WatchStatus::Plan => "Plan to Watch",
        WatchStatus::Watching => "Watching",
        WatchStatus::Watched => "Watched",
    }
}

fn progress_bar(progress: u8) -> String {
    let filled = usize::from(progress) / 10;
    format!("{}{} {:>3}%", "█".repeat(filled), "░".repeat(10 - filled), progress)
}

fn print_entries(entries: &[WatchlistEntry], output: &Output) {
    if !output.is_human() {
        output.json(&json!({ "type": "watchlist", "entries": entries }));
        return;
    }
    if output.is_quiet() {
        return;
    }
    if entries.is_empty() {
        output.info("Your watchlist is empty");
        return;
    }

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(vec!["ID", "Title", "Status", "Progress", "Added"]);
    for entry in entries {
        let status = match entry.status {
            WatchStatus::Plan => Cell::new(status_label(entry.status)).fg(comfy_table::Color::Blue),
            WatchStatus::Watching => Cell::new(status_label(entry.status)).fg(comfy_table::Color::Yellow),
            WatchStatus::Watched => Cell::new(status_label(entry.status)).fg(comfy_table::Color::Green),
        };
        table.add_row(vec![
            Cell::new(entry.movie_id),
            Cell::new(&entry.movie_title),
            status,
            Cell::new(progress_bar(entry.progress)),
            Cell::new(entry.created_at.format("%Y-%m-%d")),
        ]);
    }
    println!("{}", table);

    let watched = entries.iter().filter(|e| e.status == WatchStatus::Watched).count();
    println!(
        "{} titles, {} watched",
        entries.len().to_string().bold(),
        watched.to_string().green()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0), "░░░░░░░░░░   0%");
        assert_eq!(progress_bar(45), "████░░░░░░  45%");
        assert_eq!(progress_bar(100), "██████████ 100%");
    }
}
