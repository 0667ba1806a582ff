/// Base URL for metadata API images
pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

/// Returned when an item has no artwork
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

pub fn poster_url(path: Option<&str>, size: Option<&str>) -> String {
    image_url(path, size.unwrap_or("w500"))
}

pub fn backdrop_url(path: Option<&str>, size: Option<&str>) -> String {
    image_url(path, size.unwrap_or("w1280"))
}

fn image_url(path: Option<&str>, size: &str) -> String {
    match path.filter(|p| !p.is_empty()) {
        Some(path) => format!("{}/{}{}", IMAGE_BASE, size, path),
        None => PLACEHOLDER_IMAGE.to_string(),
    }
}
