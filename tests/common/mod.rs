#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use lexicon_client::{Lexicon, Request, Transport, error::Result};
use reqwest::Method;
use serde_json::{Value, json};

type Handler = Box<dyn Fn(&Request) -> Option<Value> + Send + Sync>;

/// Records every request and answers through a closure.
pub struct MockTransport {
    handler: Handler,
    requests: Mutex<Vec<Request>>,
}

impl MockTransport {
    pub fn new(handler: impl Fn(&Request) -> Option<Value> + Send + Sync + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn last_json(&self) -> Value {
        self.requests()
            .last()
            .and_then(|r| r.json.clone())
            .unwrap_or(Value::Null)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request(&self, request: Request) -> Result<Option<Value>> {
        self.requests.lock().unwrap().push(request.clone());
        Ok((self.handler)(&request))
    }
}

pub fn lexicon(
    handler: impl Fn(&Request) -> Option<Value> + Send + Sync + 'static,
) -> Lexicon<MockTransport> {
    Lexicon::with_transport(MockTransport::new(handler))
}

/// Answers `{"ok": true}` to everything.
pub fn accepting() -> Lexicon<MockTransport> {
    lexicon(|_| Some(json!({ "ok": true })))
}

pub fn track_json(id: i64) -> Value {
    json!({ "id": id, "title": format!("Track {id}"), "artist": "Artist", "bpm": 124.0 })
}

/// A track the way the server really sends it: numeric codes, 0/1 flags,
/// fractional audio features and nested cue points and tempo markers.
pub fn server_track_json(id: i64) -> Value {
    json!({
        "id": id,
        "type": 1,
        "title": format!("Track {id}"),
        "artist": "Artist",
        "albumTitle": "Album",
        "key": "8A",
        "genre": "House",
        "bpm": 123.98,
        "rating": 4,
        "color": "red",
        "year": 2019,
        "duration": 412.53,
        "bitrate": 320,
        "playCount": 7,
        "location": format!("/music/track-{id}.mp3"),
        "lastPlayed": "2024-05-01T22:13:09.000Z",
        "dateAdded": "2023-11-12T10:00:00.000Z",
        "dateModified": "2024-05-01T22:13:09.000Z",
        "sizeBytes": 16_500_412,
        "sampleRate": 44100,
        "trackNumber": 2,
        "energy": 6.5,
        "danceability": 0.74,
        "popularity": 31.2,
        "happiness": 0.18,
        "extra1": "",
        "extra2": null,
        "tags": [1, 4],
        "importSource": "rekordbox",
        "locationUnique": format!("track-{id}"),
        "tempomarkers": [
            { "id": 11, "trackId": id, "startTime": 0.12, "bpm": 123.98, "data": {} },
        ],
        "cuepoints": [
            {
                "id": 21,
                "name": "Intro",
                "type": "1",
                "startTime": 0.12,
                "endTime": null,
                "activeLoop": false,
                "position": 1,
                "color": "green",
            },
            {
                "id": 22,
                "name": "Drop",
                "type": 5,
                "startTime": 64.5,
                "endTime": 72.25,
                "activeLoop": 1,
                "position": 2,
                "color": "red",
            },
        ],
        "incoming": 0,
        "archived": false,
        "archivedSince": null,
        "beatshiftCase": 0,
        "fingerprint": "abc123",
        "streamingService": null,
        "streamingId": null,
    })
}

pub fn tracks_page(tracks: Vec<Value>) -> Value {
    json!({ "data": { "tracks": tracks } })
}

pub fn param<'a>(request: &'a Request, key: &str) -> Option<&'a str> {
    request
        .params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// The `limit`/`offset` a paged request asked for.
pub fn window(request: &Request) -> (usize, usize) {
    let body = request.json.clone().unwrap_or(Value::Null);
    (
        body["limit"].as_u64().unwrap_or(0) as usize,
        body["offset"].as_u64().unwrap_or(0) as usize,
    )
}
