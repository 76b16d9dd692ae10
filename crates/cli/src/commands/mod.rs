pub mod albums;
pub mod photos;
pub mod settings;

use comfy_table::{presets, ContentArrangement, Table};

pub(crate) fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub(crate) fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;
    const GB: usize = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

/// Short form of a photo URL for table output. Inline `data:` URLs are
/// reduced to their media type and payload size.
pub(crate) fn display_url(url: &str, max_chars: usize) -> String {
    if let Some(rest) = url.strip_prefix("data:") {
        let (media, payload) = rest.split_once(',').unwrap_or((rest, ""));
        let media = media.trim_end_matches(";base64");
        return format!("data:{media} ({})", format_size(payload.len()));
    }
    if url.chars().count() <= max_chars {
        return url.to_string();
    }
    let keep = max_chars.saturating_sub(1);
    let tail: String = url
        .chars()
        .rev()
        .take(keep)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("…{tail}")
}
