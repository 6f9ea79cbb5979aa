use serde_json::Value;
use tabled::Table;

use crate::{
    Lexicon,
    cli::spinner,
    error, info,
    normalize::PlaylistType,
    types::TrackTableRow,
    utils::render_playlist_tree,
    validation::CallOptions,
    warning,
};

pub async fn playlist_tree(lexicon: &Lexicon, opts: CallOptions) {
    match lexicon.playlists().list(opts).await {
        Ok(Some(root)) => {
            for line in render_playlist_tree(&root) {
                println!("{}", line);
            }
        }
        Ok(None) => warning!("Playlist tree unavailable."),
        Err(e) => error!("Cannot list playlists. Err: {}", e),
    }
}

pub async fn show_playlist(lexicon: &Lexicon, playlist_id: i64, opts: CallOptions) {
    let playlist = match lexicon.playlists().get(playlist_id, opts).await {
        Ok(Some(p)) => p,
        Ok(None) => {
            warning!("Playlist {} not found.", playlist_id);
            return;
        }
        Err(e) => error!("Cannot fetch playlist {}. Err: {}", playlist_id, e),
    };

    let kind = playlist
        .kind
        .as_deref()
        .and_then(PlaylistType::from_code)
        .map(|k| k.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    info!("{} ({}, id {})", playlist.name, kind, playlist.id);

    match lexicon.playlists().get_path(playlist_id, opts).await {
        Ok(Some(path)) => info!("Path: {}", path.join(" / ")),
        Ok(None) => {}
        Err(e) => warning!("Cannot resolve path. Err: {}", e),
    }
    info!(
        "{} tracks",
        playlist.track_ids.as_ref().map(Vec::len).unwrap_or(0)
    );
}

pub async fn playlist_by_path(
    lexicon: &Lexicon,
    path: &[String],
    playlist_type: &str,
    opts: CallOptions,
) {
    let components = Value::from(path.to_vec());
    match lexicon
        .playlists()
        .get_by_path(&components, &Value::from(playlist_type), opts)
        .await
    {
        Ok(Some(playlist)) => info!("{} (id {})", playlist.name, playlist.id),
        Ok(None) => warning!("No playlist at {}", path.join(" / ")),
        Err(e) => error!("Cannot look up playlist. Err: {}", e),
    }
}

pub async fn playlist_tracks(lexicon: &Lexicon, playlist_id: i64, opts: CallOptions) {
    let pb = spinner("Fetching playlist tracks...");
    let result = lexicon.playlist_tracks().get(playlist_id, opts).await;
    pb.finish_and_clear();

    match result {
        Ok(Some(tracks)) => {
            let missing = tracks.iter().filter(|t| t.is_none()).count();
            let rows: Vec<TrackTableRow> =
                tracks.iter().flatten().map(TrackTableRow::from).collect();
            if rows.is_empty() {
                info!("Playlist {} is empty.", playlist_id);
            } else {
                println!("{}", Table::new(rows));
            }
            if missing > 0 {
                warning!("{} tracks could not be resolved", missing);
            }
        }
        Ok(None) => warning!("Tracks of playlist {} unavailable.", playlist_id),
        Err(e) => error!("Cannot fetch playlist tracks. Err: {}", e),
    }
}
