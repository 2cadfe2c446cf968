//! Handles displaying search results, session snapshots, and preferences in a human readable format.

use std::fmt::Write;

use tunescout_catalog::SearchResult;
use tunescout_core::preferences::{DARK_MODE, HAPTIC_FEEDBACK_ENABLED, Preferences};
use tunescout_search::SearchState;

pub fn result_list(prefix: &str, results: &[SearchResult]) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    writeln!(output, "{prefix}:")?;

    for (i, result) in results.iter().enumerate() {
        write!(
            output,
            "\t{i}: \"{}\" by {} ({}",
            result.title(),
            result.artist_name,
            result.media_kind()
        )?;
        if let Some(id) = result.id() {
            write!(output, ", id: {id}")?;
        }
        writeln!(output, "),")?;
    }

    Ok(output)
}

pub fn result_details(result: &SearchResult) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    writeln!(output, "SearchResult:")?;
    writeln!(output, "\tTitle: {}", result.title())?;
    writeln!(output, "\tArtist: {}", result.artist_name)?;
    if let Some(collection) = &result.collection_name {
        writeln!(output, "\tCollection: {collection}")?;
    }
    if let Some(genre) = &result.primary_genre_name {
        writeln!(output, "\tGenre: {genre}")?;
    }
    writeln!(output, "\tKind: {}", result.media_kind())?;
    if let Some(preview) = &result.preview_url {
        writeln!(output, "\tPreview: {preview}")?;
    }
    if let Some(artwork) = &result.artwork_url_100 {
        writeln!(output, "\tArtwork: {artwork}")?;
    }

    Ok(output)
}

/// Results are only listed once a search settles, a searching snapshot just says so.
pub fn search_state(state: &SearchState) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    match state {
        SearchState::Empty { .. } => writeln!(output, "[empty]")?,
        SearchState::Loaded {
            query,
            is_searching: true,
            ..
        } => writeln!(output, "[searching] {query:?}")?,
        SearchState::Loaded { query, results, .. } => {
            write!(
                output,
                "{}",
                result_list(&format!("[{} results] {query:?}", results.len()), results)?
            )?;
        }
    }

    Ok(output)
}

pub fn preferences(preferences: &Preferences) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    writeln!(output, "Preferences:")?;
    writeln!(output, "\t{}: {}", DARK_MODE.name, preferences.get(&DARK_MODE))?;
    writeln!(
        output,
        "\t{}: {}",
        HAPTIC_FEEDBACK_ENABLED.name,
        preferences.get(&HAPTIC_FEEDBACK_ENABLED)
    )?;

    Ok(output)
}
