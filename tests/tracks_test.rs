#![recursion_limit = "256"]

mod common;

use common::{lexicon, param, server_track_json, track_json, tracks_page};
use lexicon_client::{
    CallOptions, LexiconError, Request, ValidationMode,
    normalize::{SortDirection, SortEntry},
    resources::TrackQuery,
};
use reqwest::Method;
use serde_json::{Value, json};

/// A library of `size` tracks: id listings, full listings and single gets.
fn library(size: i64) -> impl Fn(&Request) -> Option<Value> + Send + Sync + 'static {
    library_of(size, track_json)
}

/// Same as [`library`] with tracks built by `fixture`.
fn library_of(
    size: i64,
    fixture: fn(i64) -> Value,
) -> impl Fn(&Request) -> Option<Value> + Send + Sync + 'static {
    move |request: &Request| match request.path.as_str() {
        "/tracks" => Some(tracks_page((1..=size).map(fixture).collect())),
        "/track" => {
            let id: i64 = param(request, "id")?.parse().ok()?;
            (1..=size)
                .contains(&id)
                .then(|| json!({ "data": { "track": fixture(id) } }))
        }
        _ => None,
    }
}

fn is_full_listing(request: &Request) -> bool {
    request.path == "/tracks"
        && request
            .json
            .as_ref()
            .is_some_and(|body| body.get("fields").is_none())
}

#[tokio::test]
async fn test_get_many_uses_full_listing_above_cutoff() {
    let lexicon = lexicon(library(100));
    let tracks = lexicon
        .tracks()
        .get_many(vec![1, 2, 3, 4, 5, 6], CallOptions::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(tracks.len(), 6);

    // One id listing plus one full listing, no single fetches
    let requests = lexicon.transport().requests();
    assert_eq!(requests.iter().filter(|r| is_full_listing(r)).count(), 1);
    assert_eq!(lexicon.transport().count(Method::GET, "/tracks"), 2);
    assert_eq!(lexicon.transport().count(Method::GET, "/track"), 0);
}

#[tokio::test]
async fn test_get_many_fetches_each_below_cutoff() {
    let lexicon = lexicon(library(100));
    let tracks = lexicon
        .tracks()
        .get_many(vec![1, 2, 3, 4], CallOptions::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(tracks.len(), 4);

    // Only the id listing, then four single fetches
    let requests = lexicon.transport().requests();
    assert_eq!(requests.iter().filter(|r| is_full_listing(r)).count(), 0);
    assert_eq!(lexicon.transport().count(Method::GET, "/track"), 4);
    assert_eq!(requests[0].json.as_ref().unwrap()["fields"], json!(["id"]));
}

#[tokio::test]
async fn test_get_many_keeps_input_order_and_misses() {
    let lexicon = lexicon(library(20));
    let tracks = lexicon
        .tracks()
        .get_many(vec![7, 500, 3], CallOptions::default())
        .await
        .unwrap()
        .unwrap();

    // Order mirrors input, misses are None
    let ids: Vec<Option<i64>> = tracks.iter().map(|t| t.as_ref().map(|t| t.id)).collect();
    assert_eq!(ids, vec![Some(7), None, Some(3)]);
}

#[tokio::test]
async fn test_get_many_duplicates_fetched_independently_in_off_mode() {
    let lexicon = lexicon(library(100));
    let tracks = lexicon
        .tracks()
        .get_many(json!([9, 9, "x"]), CallOptions::off())
        .await
        .unwrap()
        .unwrap();

    // Each duplicate gets its own fetch; non-integers are placeholders
    assert_eq!(tracks.len(), 3);
    assert!(tracks[2].is_none());
    assert_eq!(lexicon.transport().count(Method::GET, "/track"), 2);
}

#[tokio::test]
async fn test_get_many_falls_back_when_library_size_unknown() {
    let lexicon = lexicon(|request| match request.path.as_str() {
        "/track" => Some(json!({ "data": { "track": track_json(1) } })),
        _ => None,
    });
    let tracks = lexicon
        .tracks()
        .get_many(vec![1, 2], CallOptions::default())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(tracks.len(), 2);
    assert_eq!(lexicon.transport().count(Method::GET, "/track"), 2);
}

#[tokio::test]
async fn test_get_many_invalid_ids() {
    // Warn: nothing usable, no request
    let lexicon = common::accepting();
    let result = lexicon
        .tracks()
        .get_many(vec![0, -3], CallOptions::default())
        .await
        .unwrap();
    assert!(result.is_none());
    assert!(lexicon.transport().requests().is_empty());

    // Strict raises
    let result = lexicon.tracks().get_many("7", CallOptions::strict()).await;
    assert!(matches!(result, Err(LexiconError::Validation(_))));
}

#[tokio::test]
async fn test_validation_modes_end_to_end() {
    // Off forwards the bad id
    let lexicon = common::accepting();
    let result = lexicon.tracks().get(0, CallOptions::off()).await.unwrap();
    assert!(result.is_none());
    let requests = lexicon.transport().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(param(&requests[0], "id"), Some("0"));

    // Warn returns the sentinel without a request
    let lexicon = common::accepting();
    let result = lexicon.tracks().get(0, CallOptions::default()).await.unwrap();
    assert!(result.is_none());
    assert!(lexicon.transport().requests().is_empty());

    // Strict raises without a request
    let lexicon = common::accepting();
    let result = lexicon.tracks().get(0, CallOptions::strict()).await;
    assert!(matches!(result, Err(LexiconError::Validation(_))));
    assert!(lexicon.transport().requests().is_empty());
}

#[tokio::test]
async fn test_get_decodes_track() {
    let lexicon = lexicon(library(3));
    let track = lexicon
        .tracks()
        .get(2, CallOptions::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(track.id, 2);
    assert_eq!(track.title.as_deref(), Some("Track 2"));

    // Missing track in the envelope
    assert!(lexicon.tracks().get(9, CallOptions::default()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_server_shaped_tracks_decode() {
    let lexicon = lexicon(library_of(3, server_track_json));

    // Single get
    let track = lexicon
        .tracks()
        .get(2, CallOptions::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(track.kind.as_deref(), Some("1"));
    assert_eq!(track.energy, Some(6.5));
    assert_eq!(track.danceability, Some(0.74));
    assert_eq!(track.rating, Some(4));
    assert_eq!(track.size_bytes, Some(16_500_412));
    assert_eq!(track.incoming, Some(false));
    assert_eq!(track.archived, Some(false));
    assert_eq!(track.tags, Some(vec![1, 4]));

    // Nested cue points and tempo markers
    let cues = track.cuepoints.unwrap();
    assert_eq!(cues.len(), 2);
    assert_eq!(cues[1].kind.as_deref(), Some("5"));
    assert_eq!(cues[1].active_loop, Some(true));
    assert_eq!(cues[0].end_time, None);
    let markers = track.tempomarkers.unwrap();
    assert_eq!(markers[0].bpm, 123.98);

    // Paged listing
    let tracks = lexicon
        .tracks()
        .list(&TrackQuery::new().all_fields(), CallOptions::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(tracks.len(), 3);

    // Batch lookup through the full listing
    let tracks = lexicon
        .tracks()
        .get_many(vec![3, 1], CallOptions::default())
        .await
        .unwrap()
        .unwrap();
    let ids: Vec<Option<i64>> = tracks.iter().map(|t| t.as_ref().map(|t| t.id)).collect();
    assert_eq!(ids, vec![Some(3), Some(1)]);
    assert_eq!(lexicon.transport().count(Method::GET, "/track"), 1);
}

#[tokio::test]
async fn test_fractional_audio_features() {
    let lexicon = lexicon(|request| match request.path.as_str() {
        "/tracks" => Some(json!({ "data": { "tracks": [
            { "id": 1, "energy": 5 },
            { "id": 2, "energy": 6.5 },
        ] } })),
        "/track" => Some(json!({ "data": { "track": { "id": 3, "danceability": 0.7 } } })),
        _ => None,
    });

    let tracks = lexicon
        .tracks()
        .list(&TrackQuery::new(), CallOptions::default())
        .await
        .unwrap()
        .unwrap();
    let energy: Vec<Option<f64>> = tracks.iter().map(|t| t.energy).collect();
    assert_eq!(energy, vec![Some(5.0), Some(6.5)]);

    let track = lexicon
        .tracks()
        .get(3, CallOptions::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(track.danceability, Some(0.7));
}

#[tokio::test]
async fn test_malformed_track_does_not_sink_listing() {
    let page = || {
        tracks_page(vec![
            track_json(1),
            json!({ "id": 2, "title": ["not", "text"] }),
            track_json(3),
        ])
    };
    let lexicon = lexicon(move |request| match request.path.as_str() {
        "/tracks" | "/search/tracks" => Some(page()),
        _ => None,
    });

    // The odd track is skipped, the rest of the page survives
    let tracks = lexicon
        .tracks()
        .list(&TrackQuery::new(), CallOptions::default())
        .await
        .unwrap()
        .unwrap();
    let ids: Vec<i64> = tracks.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 3]);

    let found = lexicon
        .tracks()
        .search(&json!({ "artist": "Artist" }), &TrackQuery::new(), CallOptions::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.len(), 2);

    // Batch lookups keep a placeholder for it
    let tracks = lexicon
        .tracks()
        .get_many(vec![1, 2, 3], CallOptions::default())
        .await
        .unwrap()
        .unwrap();
    let ids: Vec<Option<i64>> = tracks.iter().map(|t| t.as_ref().map(|t| t.id)).collect();
    assert_eq!(ids, vec![Some(1), None, Some(3)]);
    assert_eq!(lexicon.transport().count(Method::GET, "/track"), 0);
}

#[tokio::test]
async fn test_list_payload() {
    let lexicon = lexicon(|_| Some(tracks_page(Vec::new())));
    let query = TrackQuery::new()
        .source("archived")
        .field_names(&["title"])
        .sort_by(&[SortEntry::new("rating", Some(SortDirection::Desc))]);
    lexicon
        .tracks()
        .list(&query, CallOptions::default())
        .await
        .unwrap();

    let body = lexicon.transport().last_json();
    assert_eq!(body["source"], json!("archived"));
    assert_eq!(body["sort"], json!([{ "field": "rating", "dir": "desc" }]));

    // Sort fields are always returned
    assert_eq!(body["fields"], json!(["title", "rating"]));
}

#[tokio::test]
async fn test_list_all_fields_omits_selection() {
    let lexicon = lexicon(|_| Some(tracks_page(Vec::new())));
    lexicon
        .tracks()
        .list(&TrackQuery::new().all_fields(), CallOptions::default())
        .await
        .unwrap();

    let body = lexicon.transport().last_json();
    assert!(body.get("fields").is_none());
    assert_eq!(body["source"], json!("non-archived"));
}

#[tokio::test]
async fn test_list_invalid_sort_by_mode() {
    let query = TrackQuery::new().sort(json!([["nope", "asc"], ["bpm", "desc"]]));

    // Warn drops the bad entry and sends the rest
    let lexicon = lexicon(|_| Some(tracks_page(Vec::new())));
    let tracks = lexicon.tracks().list(&query, CallOptions::default()).await.unwrap();
    assert_eq!(tracks, Some(Vec::new()));
    assert_eq!(
        lexicon.transport().last_json()["sort"],
        json!([{ "field": "bpm", "dir": "desc" }])
    );

    // Strict sends nothing
    let lexicon = common::lexicon(|_| Some(tracks_page(Vec::new())));
    let result = lexicon.tracks().list(&query, CallOptions::strict()).await;
    assert!(result.is_err());
    assert!(lexicon.transport().requests().is_empty());

    // Off forwards it untouched
    let lexicon = common::lexicon(|_| Some(tracks_page(Vec::new())));
    lexicon.tracks().list(&query, CallOptions::off()).await.unwrap();
    assert_eq!(
        lexicon.transport().last_json()["sort"],
        json!([["nope", "asc"], ["bpm", "desc"]])
    );
}

#[tokio::test]
async fn test_list_invalid_source() {
    let lexicon = lexicon(|_| Some(tracks_page(Vec::new())));
    let query = TrackQuery::new().source("everything");

    // Warn leaves the source out
    lexicon.tracks().list(&query, CallOptions::default()).await.unwrap();
    assert!(lexicon.transport().last_json().get("source").is_none());

    // Strict raises
    let result = lexicon.tracks().list(&query, CallOptions::strict()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_search_normalizes_filter() {
    let lexicon = lexicon(|_| {
        Some(json!({ "data": { "tracks": [track_json(1)], "total": 40 } }))
    });
    let filter = json!({ "artist": "Artist", "bpm": "120 - 128", "nope": 1 });
    let tracks = lexicon
        .tracks()
        .search(&filter, &TrackQuery::new(), CallOptions::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(tracks.len(), 1);

    let request = &lexicon.transport().requests()[0];
    assert_eq!(request.path, "/search/tracks");
    let body = request.json.clone().unwrap();
    assert_eq!(body["filter"], json!({ "artist": "Artist", "bpm": "120-128" }));

    // Filtered fields are returned too
    let fields = body["fields"].as_array().unwrap();
    assert!(fields.contains(&json!("artist")));
    assert!(fields.contains(&json!("bpm")));
}

#[tokio::test]
async fn test_search_rejects_non_object_filter() {
    // Warn: sentinel, no request
    let lexicon = common::accepting();
    let result = lexicon
        .tracks()
        .search(&json!("artist"), &TrackQuery::new(), CallOptions::default())
        .await
        .unwrap();
    assert!(result.is_none());
    assert!(lexicon.transport().requests().is_empty());

    // Strict raises
    let result = lexicon
        .tracks()
        .search(&json!(["artist"]), &TrackQuery::new(), CallOptions::strict())
        .await;
    assert!(result.is_err());

    // Strict also raises on a bad field
    let result = lexicon
        .tracks()
        .search(&json!({ "nope": 1 }), &TrackQuery::new(), CallOptions::strict())
        .await;
    assert!(result.is_err());
    assert!(lexicon.transport().requests().is_empty());
}

#[tokio::test]
async fn test_update_partial_cuepoints() {
    let lexicon = lexicon(|request| {
        let title = request.json.as_ref()?["edits"]["title"].clone();
        Some(json!({ "data": { "track": { "id": 5, "title": title } } }))
    });
    let edits = json!({
        "title": "Renamed",
        "cuepoints": [
            { "position": 1, "startTime": 1.5, "type": "load" },
            { "position": 2 },
        ],
    });
    let track = lexicon
        .tracks()
        .update(5, &edits, CallOptions::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(track.title.as_deref(), Some("Renamed"));

    // Only the usable cue point is sent
    let body = lexicon.transport().last_json();
    assert_eq!(body["id"], json!(5));
    assert_eq!(
        body["edits"]["cuepoints"],
        json!([{ "position": 1, "startTime": 1.5, "type": "4" }])
    );
}

#[tokio::test]
async fn test_update_by_mode() {
    let edits = json!({ "bpm": 128, "rating": 5 });

    // Warn drops the non-editable field
    let lexicon = common::accepting();
    lexicon.tracks().update(3, &edits, CallOptions::default()).await.unwrap();
    assert_eq!(lexicon.transport().last_json()["edits"], json!({ "rating": 5 }));

    // Strict sends nothing
    let lexicon = common::accepting();
    let result = lexicon.tracks().update(3, &edits, CallOptions::strict()).await;
    assert!(result.is_err());
    assert!(lexicon.transport().requests().is_empty());

    // Off sends the edits verbatim
    let lexicon = common::accepting();
    lexicon.tracks().update(3, &edits, CallOptions::off()).await.unwrap();
    assert_eq!(lexicon.transport().last_json()["edits"], edits);

    // Nothing valid left in warn mode
    let lexicon = common::accepting();
    let result = lexicon
        .tracks()
        .update(3, &json!({ "bpm": 128 }), CallOptions::default())
        .await
        .unwrap();
    assert!(result.is_none());
    assert!(lexicon.transport().requests().is_empty());
}

#[tokio::test]
async fn test_add_tracks() {
    let lexicon = lexicon(|_| Some(json!({ "data": { "tracks": track_json(11) } })));

    // A single object answer becomes a one-element list
    let tracks = lexicon
        .tracks()
        .add(&["/music/a.mp3"], CallOptions::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(tracks[0].id, 11);
    assert_eq!(
        lexicon.transport().last_json(),
        json!({ "locations": ["/music/a.mp3"] })
    );

    // Empty locations are rejected
    let empty: [&str; 0] = [];
    let lexicon = common::accepting();
    assert!(lexicon.tracks().add(&empty, CallOptions::default()).await.unwrap().is_none());
    assert!(lexicon.transport().requests().is_empty());
}

#[tokio::test]
async fn test_delete_tracks() {
    // Ids are de-duplicated outside off mode
    let lexicon = common::accepting();
    assert!(lexicon
        .tracks()
        .delete(vec![3, 3, 0, 5], CallOptions::default())
        .await
        .unwrap());
    assert_eq!(lexicon.transport().last_json(), json!({ "ids": [3, 5] }));
    assert_eq!(lexicon.transport().count(Method::DELETE, "/tracks"), 1);

    // Off mode forwards the raw input
    let lexicon = common::accepting();
    lexicon
        .tracks()
        .delete(vec![3, 3, 0], CallOptions::new(ValidationMode::Off))
        .await
        .unwrap();
    assert_eq!(lexicon.transport().last_json(), json!({ "ids": [3, 3, 0] }));

    // A failed request is false
    let lexicon = common::lexicon(|_| None);
    assert!(!lexicon.tracks().delete(4, CallOptions::default()).await.unwrap());
}
