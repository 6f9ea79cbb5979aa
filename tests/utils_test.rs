use lexicon_client::normalize::{SortDirection, SortEntry};
use lexicon_client::types::{Playlist, Track, TrackTableRow};
use lexicon_client::utils::*;
use lexicon_client::{CallOptions, ValidationMode};
use serde_json::{Value, json};

// Helper function to create a playlist node
fn node(id: i64, name: &str, kind: &str, children: Vec<Playlist>) -> Playlist {
    Playlist {
        id,
        name: name.to_string(),
        kind: Some(kind.to_string()),
        playlists: children,
        ..Default::default()
    }
}

fn sample_tree() -> Playlist {
    node(
        1,
        "ROOT",
        "1",
        vec![
            node(
                2,
                "Sets",
                "1",
                vec![node(3, "Warmup", "2", vec![]), node(4, "Peak", "3", vec![])],
            ),
            node(5, "Favourites", "2", vec![]),
        ],
    )
}

#[test]
fn test_unique_in_order() {
    // Keeps first occurrences
    assert_eq!(unique_in_order(vec![3, 1, 3, 2, 1]), vec![3, 1, 2]);

    // Empty input
    let empty: Vec<i64> = Vec::new();
    assert!(unique_in_order(empty).is_empty());
}

#[test]
fn test_get_path_from_tree() {
    let tree = sample_tree();

    // Nested playlist
    assert_eq!(
        get_path_from_tree(&tree, 4),
        Some(vec!["Sets".to_string(), "Peak".to_string()])
    );

    // Top-level playlist
    assert_eq!(get_path_from_tree(&tree, 5), Some(vec!["Favourites".to_string()]));

    // The root alone keeps its name
    assert_eq!(get_path_from_tree(&tree, 1), Some(vec!["ROOT".to_string()]));

    // Unknown and invalid ids
    assert_eq!(get_path_from_tree(&tree, 42), None);
    assert_eq!(get_path_from_tree(&tree, 0), None);
}

#[test]
fn test_render_playlist_tree() {
    colored::control::set_override(false);
    let lines = render_playlist_tree(&sample_tree());

    // ROOT is not rendered; children are indented
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "Sets (2)");
    assert_eq!(lines[1], "  Warmup (3)");
    assert_eq!(lines[3], "Favourites (5)");
}

#[test]
fn test_parse_assignment() {
    // JSON values are parsed
    assert_eq!(parse_assignment("bpm=128").unwrap(), ("bpm".to_string(), json!(128)));
    assert_eq!(parse_assignment("tags=[1,2]").unwrap().1, json!([1, 2]));
    assert_eq!(parse_assignment("genre=null").unwrap().1, Value::Null);

    // Anything else stays a string
    assert_eq!(
        parse_assignment("artist=Daft Punk").unwrap().1,
        json!("Daft Punk")
    );
    assert_eq!(parse_assignment("bpm=120-128").unwrap().1, json!("120-128"));
    assert_eq!(parse_assignment("title=").unwrap().1, json!(""));

    // Missing separator or field name
    assert!(parse_assignment("bpm").is_err());
    assert!(parse_assignment("=1").is_err());
}

#[test]
fn test_parse_sort() {
    assert_eq!(
        parse_sort("bpm:DESC").unwrap(),
        SortEntry::new("bpm", Some(SortDirection::Desc))
    );
    assert_eq!(parse_sort("title").unwrap(), SortEntry::new("title", None));
    assert!(parse_sort("bpm:sideways").is_err());
}

#[test]
fn test_parse_validation_mode() {
    assert_eq!(parse_validation_mode("strict"), Ok(ValidationMode::Strict));
    assert_eq!(parse_validation_mode(" OFF "), Ok(ValidationMode::Off));
    assert!(parse_validation_mode("loud").is_err());

    // Round trip through Display
    for mode in ValidationMode::ALL {
        assert_eq!(parse_validation_mode(&mode.to_string()), Ok(mode));
    }

    // Warn is the default everywhere
    assert_eq!(ValidationMode::default(), ValidationMode::Warn);
    assert_eq!(CallOptions::default().validation, ValidationMode::Warn);
}

#[test]
fn test_assignments_to_object() {
    let pairs = vec![
        ("artist".to_string(), json!("Artist")),
        ("bpm".to_string(), json!("120-128")),
    ];
    assert_eq!(
        assignments_to_object(&pairs),
        json!({ "artist": "Artist", "bpm": "120-128" })
    );
}

#[test]
fn test_track_table_row() {
    let track = Track {
        id: 12,
        artist: Some("Artist".into()),
        title: Some("Title".into()),
        bpm: Some(124.0),
        year: Some(2020),
        ..Default::default()
    };
    let row = TrackTableRow::from(&track);

    assert_eq!(row.id, 12);
    assert_eq!(row.bpm, "124.0");
    assert_eq!(row.year, "2020");

    // Missing fields render empty
    assert_eq!(row.key, "");
}

#[test]
fn test_track_decoding_is_lenient() {
    let track: Track = serde_json::from_value(json!({
        "id": 1,
        "type": 1,
        "archived": 1,
        "incoming": false,
        "cuepoints": [{ "position": 1, "startTime": 2.5, "type": "1", "activeLoop": 0 }],
    }))
    .unwrap();

    // Codes and flags accept both encodings
    assert_eq!(track.kind.as_deref(), Some("1"));
    assert_eq!(track.archived, Some(true));
    assert_eq!(track.incoming, Some(false));
    let cues = track.cuepoints.unwrap();
    assert_eq!(cues[0].active_loop, Some(false));

    // Whole numbers may arrive as floats or strings; fractions do not fail the track
    let track: Track = serde_json::from_value(json!({
        "id": 2,
        "rating": 4.0,
        "year": "2019",
        "bitrate": 320.5,
        "happiness": 0.25,
    }))
    .unwrap();
    assert_eq!(track.rating, Some(4));
    assert_eq!(track.year, Some(2019));
    assert_eq!(track.bitrate, None);
    assert_eq!(track.happiness, Some(0.25));
}
