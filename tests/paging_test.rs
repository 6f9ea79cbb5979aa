#![recursion_limit = "256"]

mod common;

use common::{lexicon, track_json, tracks_page, window};
use lexicon_client::{
    CallOptions, Settings,
    resources::{PageCursor, PageStep, TrackQuery},
};
use reqwest::Method;
use serde_json::json;

fn small_pages(page_size: usize) -> Settings {
    Settings {
        page_size,
        ..Settings::default()
    }
}

#[test]
fn test_page_cursor_limit_tier() {
    let mut cursor = PageCursor::new(0, Some(3));
    assert_eq!(cursor.page_limit(1000), 3);

    // Meeting the limit stops even if the server reports more
    assert_eq!(cursor.record(3, 3, Some(100), Some(3)), PageStep::Done);

    // Overshooting pages still stop
    let mut cursor = PageCursor::new(0, Some(2));
    assert_eq!(cursor.record(5, 2, None, None), PageStep::Done);

    // A zero limit is exhausted before any request
    assert!(PageCursor::new(10, Some(0)).is_exhausted());
}

#[test]
fn test_page_cursor_total_tier() {
    let mut cursor = PageCursor::new(0, None);

    // Advance by the server-reported limit
    assert_eq!(cursor.record(2, 2, Some(5), Some(2)), PageStep::Continue);
    assert_eq!(cursor.next_offset, 2);
    assert_eq!(cursor.record(2, 2, Some(5), Some(2)), PageStep::Continue);
    assert_eq!(cursor.next_offset, 4);

    // The window reaches total
    assert_eq!(cursor.record(1, 2, Some(5), Some(2)), PageStep::Done);
}

#[test]
fn test_page_cursor_short_page_tier() {
    let mut cursor = PageCursor::new(0, None);

    // Full page, no metadata: advance by the requested size
    assert_eq!(cursor.record(10, 10, None, None), PageStep::Continue);
    assert_eq!(cursor.next_offset, 10);

    // Short page ends the collection
    assert_eq!(cursor.record(9, 10, None, None), PageStep::Done);

    // A non-positive server limit is ignored rather than looping forever
    let mut cursor = PageCursor::new(0, None);
    assert_eq!(cursor.record(0, 10, Some(50), Some(0)), PageStep::Done);
}

#[tokio::test]
async fn test_short_page_stops_after_one_request() {
    let lexicon = lexicon(|_| Some(tracks_page((1..=3).map(track_json).collect())));

    let tracks = lexicon
        .tracks()
        .list(&TrackQuery::new(), CallOptions::default())
        .await
        .unwrap()
        .unwrap();

    // One page, fewer items than requested
    assert_eq!(tracks.len(), 3);
    assert_eq!(lexicon.transport().count(Method::GET, "/tracks"), 1);
    assert_eq!(window(&lexicon.transport().requests()[0]), (1000, 0));
}

#[tokio::test]
async fn test_malformed_page_fails_whole_fetch() {
    let lexicon = lexicon(|_| Some(json!({ "data": { "tracks": "oops" } })));
    let result = lexicon
        .tracks()
        .list(&TrackQuery::new(), CallOptions::default())
        .await
        .unwrap();
    assert!(result.is_none());

    // Missing data envelope
    let lexicon = common::lexicon(|_| Some(json!({ "tracks": [] })));
    let result = lexicon
        .tracks()
        .list(&TrackQuery::new(), CallOptions::default())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_failed_later_page_discards_collected_items() {
    let lexicon = lexicon(|request| {
        let (_, offset) = window(request);
        if offset == 0 {
            Some(tracks_page(vec![track_json(1), track_json(2)]))
        } else {
            None
        }
    })
    .with_settings(small_pages(2));

    let result = lexicon
        .tracks()
        .list(&TrackQuery::new(), CallOptions::default())
        .await
        .unwrap();

    // Second page failed, nothing partial comes back
    assert!(result.is_none());
    assert_eq!(lexicon.transport().count(Method::GET, "/tracks"), 2);
}

#[tokio::test]
async fn test_zero_limit_makes_no_request() {
    let lexicon = common::accepting();
    let tracks = lexicon
        .tracks()
        .list(&TrackQuery::new().limit(0), CallOptions::default())
        .await
        .unwrap();

    assert_eq!(tracks, Some(Vec::new()));
    assert!(lexicon.transport().requests().is_empty());
}

#[tokio::test]
async fn test_total_and_limit_drive_offsets() {
    let lexicon = lexicon(|request| {
        let (limit, offset) = window(request);
        let tracks = (1..=5)
            .skip(offset)
            .take(limit)
            .map(track_json)
            .collect::<Vec<_>>();
        Some(json!({ "data": { "tracks": tracks, "total": 5, "limit": limit } }))
    })
    .with_settings(small_pages(2));

    let tracks = lexicon
        .tracks()
        .list(&TrackQuery::new(), CallOptions::default())
        .await
        .unwrap()
        .unwrap();

    // All five tracks, in request order
    let ids: Vec<i64> = tracks.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);

    // Offsets 0, 2, 4
    let offsets: Vec<usize> = lexicon
        .transport()
        .requests()
        .iter()
        .map(|r| window(r).1)
        .collect();
    assert_eq!(offsets, vec![0, 2, 4]);
}

#[tokio::test]
async fn test_limit_shrinks_last_page() {
    let lexicon = lexicon(|request| {
        let (limit, offset) = window(request);
        let tracks = (1..=10)
            .skip(offset)
            .take(limit)
            .map(track_json)
            .collect::<Vec<_>>();
        Some(tracks_page(tracks))
    })
    .with_settings(small_pages(2));

    let tracks = lexicon
        .tracks()
        .list(&TrackQuery::new().limit(3).offset(4), CallOptions::default())
        .await
        .unwrap()
        .unwrap();

    let ids: Vec<i64> = tracks.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![5, 6, 7]);

    // Windows (2, 4) then (1, 6)
    let windows: Vec<(usize, usize)> = lexicon.transport().requests().iter().map(window).collect();
    assert_eq!(windows, vec![(2, 4), (1, 6)]);
}
