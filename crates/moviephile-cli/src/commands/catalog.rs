use super::AppContext;
use crate::output::Output;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use moviephile_models::{
    genre_name, poster_url, select_reel_trailer, ContentItem, ListCategory, MediaType, Page,
};
use moviephile_sources::youtube::watch_url;
use owo_colors::OwoColorize;
use serde_json::json;

fn table() -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

pub(crate) fn items_table(items: &[ContentItem]) -> Table {
    let mut table = table();
    table.set_header(vec!["ID", "Title", "Year", "Rating", "Genres"]);
    for item in items {
        table.add_row(vec![
            Cell::new(item.id),
            Cell::new(&item.title).fg(comfy_table::Color::Cyan),
            Cell::new(item.year_label()),
            Cell::new(format!("★ {}", item.rating_label())),
            Cell::new(item.genre_labels().join(", ")),
        ]);
    }
    table
}

fn print_page(title: &str, page: &Page<ContentItem>, output: &Output) {
    if !output.is_human() {
        output.json(&json!({ "type": "page", "title": title, "page": page }));
        return;
    }
    if output.is_quiet() {
        return;
    }
    if page.results.is_empty() {
        output.info(format!("{}: nothing found", title));
        return;
    }
    println!("{}", title.bright_cyan().bold());
    println!("{}", items_table(&page.results));
    println!(
        "Page {} of {} ({} results)",
        page.page, page.total_pages, page.total_results
    );
}

pub async fn run_list(
    category: ListCategory,
    media_type: MediaType,
    page: u32,
    genre: Option<u32>,
    output: &Output,
) -> Result<()> {
    let ctx = AppContext::load()?;
    let mut catalog = ctx.catalog()?;

    match genre {
        Some(genre_id) => {
            let results = catalog.by_genre(media_type, genre_id, page).await?;
            let label = genre_name(genre_id).unwrap_or("Other");
            print_page(&format!("{} ({})", label, media_type), &results, output);
        }
        None => {
            let results = catalog.list(category, media_type, page).await?;
            print_page(&format!("{} ({})", category.label(), media_type), &results, output);
        }
    }
    Ok(())
}

pub async fn run_search(query: &str, page: u32, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let mut catalog = ctx.catalog()?;
    let results = catalog.search(query, page).await?;
    print_page(&format!("Search: {}", query.trim()), &results, output);
    Ok(())
}

pub async fn run_detail(media_type: MediaType, id: u64, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let mut catalog = ctx.catalog()?;
    let detail = catalog.detail(media_type, id).await?;

    if !output.is_human() {
        output.json(&json!({ "type": "detail", "detail": detail }));
        return Ok(());
    }
    if output.is_quiet() {
        return Ok(());
    }

    let item = &detail.item;
    println!(
        "\n{} ({})  ★ {}",
        item.title.bright_cyan().bold(),
        item.year_label(),
        item.rating_label()
    );
    if let Some(tagline) = detail.tagline.as_deref().filter(|t| !t.is_empty()) {
        println!("{}", tagline.italic());
    }

    let mut facts = table();
    if let Some(runtime) = detail.runtime.filter(|r| *r > 0) {
        facts.add_row(vec![Cell::new("Runtime"), Cell::new(format!("{}h {}m", runtime / 60, runtime % 60))]);
    }
    if let Some(seasons) = detail.number_of_seasons {
        facts.add_row(vec![Cell::new("Seasons"), Cell::new(seasons)]);
    }
    if !detail.genres.is_empty() {
        let names: Vec<&str> = detail.genres.iter().map(|g| g.name.as_str()).collect();
        facts.add_row(vec![Cell::new("Genres"), Cell::new(names.join(", "))]);
    }
    if let Some(status) = &detail.status {
        facts.add_row(vec![Cell::new("Status"), Cell::new(status)]);
    }
    facts.add_row(vec![
        Cell::new("Poster"),
        Cell::new(poster_url(item.poster_path.as_deref(), None)),
    ]);
    if let Some(trailer) = select_reel_trailer(detail.videos.results.clone()) {
        facts.add_row(vec![Cell::new("Trailer"), Cell::new(watch_url(&trailer.key))]);
    }
    println!("{}", facts);

    if !item.overview.is_empty() {
        println!("\n{}", item.overview);
    }

    if !detail.similar.results.is_empty() {
        println!("\n{}", "More like this".bold());
        let similar: Vec<ContentItem> = detail.similar.results.iter().take(6).cloned().collect();
        println!("{}", items_table(&similar));
    }

    if !detail.reviews.results.is_empty() {
        println!("\n{}", "Reviews".bold());
        for review in detail.reviews.results.iter().take(3) {
            let rating = review
                .author_details
                .rating
                .map(|r| format!(" ★ {:.0}", r))
                .unwrap_or_default();
            println!("{}{}", review.author.bright_white().bold(), rating.yellow());
            println!("  {}", excerpt(&review.content, 280));
        }
    }
    Ok(())
}

pub async fn run_season(show_id: u64, season_number: u32, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let catalog = ctx.catalog()?;
    let season = catalog.season(show_id, season_number).await?;

    if !output.is_human() {
        output.json(&json!({ "type": "season", "season": season }));
        return Ok(());
    }
    if output.is_quiet() {
        return Ok(());
    }

    println!("{}", season.name.bright_cyan().bold());
    let mut episodes = table();
    episodes.set_header(vec!["#", "Episode", "Air date", "Runtime", "Rating"]);
    for episode in &season.episodes {
        episodes.add_row(vec![
            Cell::new(episode.episode_number),
            Cell::new(&episode.name),
            Cell::new(episode.air_date.as_deref().unwrap_or("TBA")),
            Cell::new(episode.runtime.map(|m| format!("{}m", m)).unwrap_or_default()),
            Cell::new(format!("{:.1}", episode.vote_average)),
        ]);
    }
    println!("{}", episodes);
    Ok(())
}

fn excerpt(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let cut: String = flat.chars().take(max_chars).collect();
    format!("{}…", cut.trim_end())
}
