use super::{restore_session, AppContext};
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use dialoguer::Select;
use indicatif::{ProgressBar, ProgressStyle};
use moviephile_core::{CellState, FeedSession, FeedSettings, PageApplied, PlayerSurface, WatchlistSync};
use moviephile_models::{ListCategory, MediaType};
use moviephile_sources::tmdb::api::list_endpoint;
use moviephile_sources::youtube::{embed_url, watch_url};
use moviephile_sources::{PlayerCommand, SupabaseClient, TmdbClient};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Terminal stand-in for the embedded players: commands are logged, never acknowledged
#[derive(Default)]
struct TerminalPlayer {
    last: Option<(usize, PlayerCommand)>,
}

impl PlayerSurface for TerminalPlayer {
    fn dispatch(&mut self, cell: usize, command: PlayerCommand) {
        debug!(cell, command = %command, message = %command.to_message(), "Player command");
        self.last = Some((cell, command));
    }
}

type Session = FeedSession<TmdbClient, TerminalPlayer>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Next,
    Previous,
    TogglePlayback,
    ToggleSaved,
    ShowLink,
    SwitchCategory,
    Quit,
}

fn is_interactive() -> bool {
    std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}

fn spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn report_load(applied: Option<PageApplied>, output: &Output) {
    match applied {
        Some(PageApplied::Failed) => output.warn("Couldn't load more trailers. Keep scrolling to retry"),
        Some(PageApplied::Appended { added: 0 }) => output.info("No playable trailers on that page"),
        _ => {}
    }
}

async fn load_initial(session: &mut Session, output: &Output) {
    let feed = session.feed();
    let progress = spinner(format!("Loading {} trailers...", feed.category().label()));
    let applied = session.load_initial().await;
    progress.finish_and_clear();
    report_load(applied, output);
}

/// The sentinel after the last reel came into view
async fn load_more(session: &mut Session, output: &Output) {
    if !session.feed().can_load_more() {
        return;
    }
    let progress = spinner("Loading more trailers...".to_string());
    let applied = session.on_sentinel_visible().await;
    progress.finish_and_clear();
    report_load(applied, output);
}

/// Scroll `to` fully into view, let it settle past the startup delay
async fn settle(session: &mut Session, from: Option<usize>, to: usize) {
    let feed = session.feed_mut();
    let now = Instant::now();
    if let Some(from) = from.filter(|f| *f != to) {
        feed.on_visibility(from, 0.0, now);
    }
    feed.on_visibility(to, 1.0, now);

    let delay = feed.settings().startup_delay;
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    let feed = session.feed_mut();
    feed.tick(Instant::now());
    feed.player_ready(to);
}

fn render(session: &Session, index: usize, watchlist: Option<&WatchlistSync<SupabaseClient>>) {
    let feed = session.feed();
    let Some(cell) = feed.cells().get(index) else {
        return;
    };
    let item = &cell.item;
    let state = match feed.state_of(index) {
        CellState::VisiblePlaying => "▶ playing".green().to_string(),
        CellState::VisiblePaused if feed.play_affordance_visible() => "❚❚ paused".yellow().to_string(),
        CellState::VisiblePaused => "… starting".dimmed().to_string(),
        CellState::Hidden => "hidden".dimmed().to_string(),
    };
    let saved = watchlist.map_or(false, |w| w.is_saved(item.id));

    println!();
    println!(
        "{}  {}/{}  {}",
        feed.category().label().bright_white().bold(),
        index + 1,
        feed.cells().len(),
        state
    );
    println!(
        "{}  {} · ★ {} · {}{}",
        item.title.bright_cyan().bold(),
        item.year_label(),
        item.rating_label(),
        item.genre_labels().join(" · "),
        if saved { "  ♥ saved".red().to_string() } else { String::new() }
    );
    if feed.controls_visible() && !item.overview.is_empty() {
        println!("{}", item.overview.dimmed());
    }
    println!("{}", embed_url(&cell.trailer.key, true, None).dimmed());
}

fn choose_action(session: &Session, index: usize, can_save: bool) -> Result<Action> {
    let feed = session.feed();
    let mut actions = vec![Action::Next, Action::Previous];
    actions.push(Action::TogglePlayback);
    if can_save {
        actions.push(Action::ToggleSaved);
    }
    actions.extend([Action::ShowLink, Action::SwitchCategory, Action::Quit]);

    let labels: Vec<&str> = actions
        .iter()
        .map(|action| match action {
            Action::Next => "Next reel",
            Action::Previous => "Previous reel",
            Action::TogglePlayback if feed.playing_index() == Some(index) => "Pause",
            Action::TogglePlayback => "Play",
            Action::ToggleSaved => "Save / unsave",
            Action::ShowLink => "Open trailer link",
            Action::SwitchCategory => "Switch category",
            Action::Quit => "Quit",
        })
        .collect();

    let choice = Select::new()
        .items(&labels)
        .default(0)
        .interact()
        .map_err(|e| eyre!("Failed to read selection: {}", e))?;
    Ok(actions.get(choice).copied().unwrap_or(Action::Quit))
}

fn choose_category(current: ListCategory, media_type: MediaType) -> Result<Option<ListCategory>> {
    let available: Vec<ListCategory> = ListCategory::ALL
        .into_iter()
        .filter(|c| list_endpoint(*c, media_type).is_some())
        .collect();
    let labels: Vec<&str> = available.iter().map(|c| c.label()).collect();
    let default = available.iter().position(|c| *c == current).unwrap_or(0);
    let choice = Select::new()
        .with_prompt("Category")
        .items(&labels)
        .default(default)
        .interact_opt()
        .map_err(|e| eyre!("Failed to read selection: {}", e))?;
    Ok(choice.and_then(|i| available.get(i).copied()))
}

pub async fn run_reels(
    category: Option<ListCategory>,
    media_type: Option<MediaType>,
    output: &Output,
) -> Result<()> {
    if !is_interactive() {
        return Err(eyre!("The reel feed needs an interactive terminal"));
    }
    let ctx = AppContext::load()?;

    let mut settings = FeedSettings::from(&ctx.config.feed);
    if let Some(category) = category {
        settings.category = category;
    }
    if let Some(media_type) = media_type {
        settings.media_type = media_type;
    }
    if list_endpoint(settings.category, settings.media_type).is_none() {
        return Err(eyre!(
            "{} is not available for {}",
            settings.category.label(),
            settings.media_type
        ));
    }

    let auth = restore_session(&ctx.paths)?;
    let mut watchlist = match ctx.watchlist(&auth)? {
        Some(sync) if auth.is_authenticated() => Some(sync),
        _ => None,
    };
    if let Some(sync) = watchlist.as_mut() {
        if let Err(e) = sync.refresh().await {
            warn!("Could not load watchlist: {}", e);
        }
    }

    let mut session = FeedSession::new(ctx.tmdb()?, settings, TerminalPlayer::default());
    load_initial(&mut session, output).await;

    let mut current: Option<usize> = None;
    let mut index = 0usize;
    loop {
        if session.feed().cells().is_empty() {
            output.warn(format!(
                "No trailers available for {}",
                session.feed().category().label()
            ));
            let feed = session.feed();
            match choose_category(feed.category(), feed.media_type())? {
                Some(next) => {
                    let media_type = feed.media_type();
                    session.feed_mut().set_selection(next, media_type);
                    load_initial(&mut session, output).await;
                    current = None;
                    index = 0;
                    continue;
                }
                None => break,
            }
        }

        if current != Some(index) {
            settle(&mut session, current, index).await;
            current = Some(index);
            if index + 1 >= session.feed().cells().len() {
                load_more(&mut session, output).await;
            }
        }
        render(&session, index, watchlist.as_ref());

        let now = Instant::now();
        match choose_action(&session, index, watchlist.is_some())? {
            Action::Next => {
                if index + 1 < session.feed().cells().len() {
                    index += 1;
                } else {
                    load_more(&mut session, output).await;
                    if index + 1 < session.feed().cells().len() {
                        index += 1;
                    } else {
                        output.info("You've reached the end of the feed");
                    }
                }
            }
            Action::Previous => index = index.saturating_sub(1),
            Action::TogglePlayback => {
                session.feed_mut().tap(index, now);
            }
            Action::ToggleSaved => {
                session.feed_mut().interact(now);
                let item = session.feed().cells()[index].item.clone();
                if let Some(sync) = watchlist.as_mut() {
                    let outcome = sync.toggle(&item).await?;
                    if outcome.saved {
                        output.success(format!("Saved '{}' to your watchlist", item.title));
                    } else {
                        output.success(format!("Removed '{}' from your watchlist", item.title));
                    }
                    if let Some(e) = outcome.remote_error {
                        output.warn(format!("Not saved remotely yet: {}", e));
                    }
                }
            }
            Action::ShowLink => {
                session.feed_mut().interact(now);
                let key = &session.feed().cells()[index].trailer.key;
                output.info(watch_url(key));
            }
            Action::SwitchCategory => {
                let feed = session.feed();
                if let Some(next) = choose_category(feed.category(), feed.media_type())? {
                    if next != feed.category() {
                        session.feed_mut().set_category(next);
                        load_initial(&mut session, output).await;
                        current = None;
                        index = 0;
                    }
                }
            }
            Action::Quit => break,
        }
    }

    if let Some(index) = session.feed().active_index() {
        session.feed_mut().on_visibility(index, 0.0, Instant::now());
    }
    debug!(
        "Reel session ended after {} page requests, last player command {:?}",
        session.feed().pages_requested(),
        session.feed().player().last
    );
    Ok(())
}
