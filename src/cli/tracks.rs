use serde_json::Value;
use tabled::Table;

use crate::{
    Lexicon,
    cli::spinner,
    error, info,
    resources::TrackQuery,
    success,
    types::{Track, TrackTableRow},
    utils::assignments_to_object,
    validation::CallOptions,
    warning,
};

fn print_tracks(tracks: &[Track]) {
    if tracks.is_empty() {
        info!("No tracks found.");
        return;
    }
    let rows: Vec<TrackTableRow> = tracks.iter().map(TrackTableRow::from).collect();
    println!("{}", Table::new(rows));
    info!("{} tracks", tracks.len());
}

pub async fn list_tracks(lexicon: &Lexicon, query: TrackQuery, opts: CallOptions) {
    let pb = spinner("Fetching tracks...");
    let result = lexicon.tracks().list(&query, opts).await;
    pb.finish_and_clear();

    match result {
        Ok(Some(tracks)) => print_tracks(&tracks),
        Ok(None) => warning!("No tracks returned."),
        Err(e) => error!("Cannot list tracks. Err: {}", e),
    }
}

pub async fn search_tracks(
    lexicon: &Lexicon,
    filters: &[(String, Value)],
    query: TrackQuery,
    opts: CallOptions,
) {
    if filters.is_empty() {
        error!("Provide at least one field=value filter.");
    }
    let filter = assignments_to_object(filters);

    let pb = spinner("Searching tracks...");
    let result = lexicon.tracks().search(&filter, &query, opts).await;
    pb.finish_and_clear();

    match result {
        Ok(Some(tracks)) => print_tracks(&tracks),
        Ok(None) => warning!("Search returned no result."),
        Err(e) => error!("Cannot search tracks. Err: {}", e),
    }
}

pub async fn show_track(lexicon: &Lexicon, track_id: i64, opts: CallOptions) {
    match lexicon.tracks().get(track_id, opts).await {
        Ok(Some(track)) => match serde_json::to_string_pretty(&track) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Cannot render track {}. Err: {}", track_id, e),
        },
        Ok(None) => warning!("Track {} not found.", track_id),
        Err(e) => error!("Cannot fetch track {}. Err: {}", track_id, e),
    }
}

pub async fn add_tracks(lexicon: &Lexicon, locations: &[String], opts: CallOptions) {
    let pb = spinner("Importing tracks...");
    let result = lexicon.tracks().add(locations, opts).await;
    pb.finish_and_clear();

    match result {
        Ok(Some(tracks)) => {
            success!("Imported {} tracks", tracks.len());
            print_tracks(&tracks);
        }
        Ok(None) => warning!("No tracks were imported."),
        Err(e) => error!("Cannot import tracks. Err: {}", e),
    }
}

pub async fn update_track(
    lexicon: &Lexicon,
    track_id: i64,
    edits: &[(String, Value)],
    opts: CallOptions,
) {
    if edits.is_empty() {
        error!("Provide at least one field=value edit.");
    }
    let edits = assignments_to_object(edits);

    match lexicon.tracks().update(track_id, &edits, opts).await {
        Ok(Some(track)) => {
            success!("Updated track {}", track.id);
            print_tracks(std::slice::from_ref(&track));
        }
        Ok(None) => warning!("Track {} was not updated.", track_id),
        Err(e) => error!("Cannot update track {}. Err: {}", track_id, e),
    }
}

pub async fn delete_tracks(lexicon: &Lexicon, track_ids: &[i64], opts: CallOptions) {
    match lexicon.tracks().delete(track_ids.to_vec(), opts).await {
        Ok(true) => success!("Deleted {} tracks", track_ids.len()),
        Ok(false) => warning!("Tracks were not deleted."),
        Err(e) => error!("Cannot delete tracks. Err: {}", e),
    }
}
