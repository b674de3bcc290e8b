//! Event-stream decoding for the realtime database wire format.
//!
//! The collection endpoint streams Server-Sent Events. A `put` at path `/`
//! carries the full snapshot; a `put` at `/{key}` carries one child (data
//! `null` means the child was removed). `keep-alive` frames are padding.

use serde::Deserialize;
use serde_json::Value;

use crate::models::{CafeEntry, EntryKey};
use crate::store::StoreEvent;
use crate::{Error, Result};

/// One SSE frame: the `event:` name and the `data:` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StreamFrame {
    pub event: String,
    pub data: String,
}

/// Extract a complete SSE frame from the buffer.
///
/// Frames are separated by blank lines (LF or CRLF). Returns `Some(raw)`
/// and consumes it from the buffer, or `None` if no complete frame is
/// available yet.
pub(crate) fn extract_frame(buffer: &mut String) -> Option<String> {
    let (idx, separator_len) = ["\r\n\r\n", "\n\n"]
        .iter()
        .filter_map(|separator| buffer.find(separator).map(|idx| (idx, separator.len())))
        .min_by_key(|(idx, _)| *idx)?;

    let frame = buffer[..idx].to_string();
    *buffer = buffer[idx + separator_len..].to_string();
    Some(frame)
}

/// Parse a raw SSE frame into its event name and data payload.
///
/// Multiple `data:` lines are joined with `\n`, per the SSE rules.
/// `str::lines` strips the `\r` of CRLF line endings.
pub(crate) fn parse_frame(raw: &str) -> Option<StreamFrame> {
    if raw.trim().is_empty() {
        return None;
    }

    let mut event = None;
    let mut data_lines: Vec<&str> = Vec::new();

    for line in raw.lines() {
        if let Some(stripped) = line.strip_prefix("event:") {
            event = Some(stripped.trim().to_string());
        } else if let Some(stripped) = line.strip_prefix("data:") {
            data_lines.push(stripped.trim());
        }
    }

    Some(StreamFrame {
        event: event?,
        data: data_lines.join("\n"),
    })
}

#[derive(Debug, Deserialize)]
struct PutPayload {
    path: String,
    data: Value,
}

/// Decode one frame into zero or more store events.
///
/// The initial snapshot is expanded into one `Added` per child, ordered by
/// `createdAt` ascending (the order the backend reports them in).
pub(crate) fn decode_frame(frame: &StreamFrame) -> Result<Vec<StoreEvent>> {
    match frame.event.as_str() {
        "put" => {
            let payload: PutPayload = serde_json::from_str(&frame.data)?;
            decode_put(&payload)
        }
        // Updates to existing children are out of scope for the shelf view.
        "patch" | "keep-alive" => Ok(Vec::new()),
        "cancel" | "auth_revoked" => Err(Error::Stream(format!(
            "listener cancelled by backend: {}",
            frame.event
        ))),
        other => {
            tracing::debug!("Ignoring unknown stream event: {}", other);
            Ok(Vec::new())
        }
    }
}

fn decode_put(payload: &PutPayload) -> Result<Vec<StoreEvent>> {
    let path = payload.path.trim_matches('/');

    if path.is_empty() {
        return decode_snapshot(&payload.data);
    }

    // Per-child put. Nested paths (field-level writes) are not emitted by
    // the append/remove operations this client performs.
    let Some((key, rest)) = split_child_path(path) else {
        return Ok(Vec::new());
    };
    if !rest.is_empty() {
        tracing::debug!("Ignoring nested put at {}", payload.path);
        return Ok(Vec::new());
    }

    let key: EntryKey = key.into();
    if payload.data.is_null() {
        return Ok(vec![StoreEvent::Removed { key }]);
    }

    let entry: CafeEntry = serde_json::from_value(payload.data.clone())?;
    Ok(vec![StoreEvent::Added { key, entry }])
}

fn decode_snapshot(data: &Value) -> Result<Vec<StoreEvent>> {
    let Some(children) = data.as_object() else {
        // An empty collection streams `null`.
        return Ok(Vec::new());
    };

    let mut entries: Vec<(EntryKey, CafeEntry)> = Vec::with_capacity(children.len());
    for (key, value) in children {
        let entry: CafeEntry = serde_json::from_value(value.clone())?;
        entries.push((key.as_str().into(), entry));
    }
    entries.sort_by_key(|(_, entry)| entry.created_at);

    Ok(entries
        .into_iter()
        .map(|(key, entry)| StoreEvent::Added { key, entry })
        .collect())
}

fn split_child_path(path: &str) -> Option<(&str, &str)> {
    if path.is_empty() {
        return None;
    }
    match path.split_once('/') {
        Some((key, rest)) => Some((key, rest)),
        None => Some((path, "")),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn entry_json(title: &str, created_at: i64) -> String {
        format!(
            r#"{{"cafeTitle":"{title}","cafeFeatures":"f","cafeBusinesshours":"h","cafeAddress":"a","cafeMap":"m","cafeImageLocation":"cafe-images/{title}.jpg","createdAt":{created_at}}}"#
        )
    }

    #[test]
    fn extract_frame_consumes_complete_frames() {
        let mut buffer =
            "event: put\ndata: {}\n\nevent: keep-alive\ndata: null\n\n".to_string();

        let first = extract_frame(&mut buffer).unwrap();
        assert!(first.contains("put"));

        let second = extract_frame(&mut buffer).unwrap();
        assert!(second.contains("keep-alive"));

        assert!(extract_frame(&mut buffer).is_none());
    }

    #[test]
    fn extract_frame_leaves_partial_data() {
        let mut buffer = "event: put\ndata: {\"partial".to_string();
        assert!(extract_frame(&mut buffer).is_none());
        assert_eq!(buffer, "event: put\ndata: {\"partial");
    }

    #[test]
    fn extract_frame_handles_crlf_boundaries() {
        let mut buffer = "event: put\r\ndata: {}\r\n\r\nrest".to_string();

        let raw = extract_frame(&mut buffer).unwrap();
        assert_eq!(buffer, "rest");

        let frame = parse_frame(&raw).unwrap();
        assert_eq!(frame.event, "put");
        assert_eq!(frame.data, "{}");
    }

    #[test]
    fn parse_frame_joins_multiple_data_lines() {
        let frame = parse_frame("event: put\ndata: {\"path\":\"/\",\ndata: \"data\":null}").unwrap();
        assert_eq!(frame.data, "{\"path\":\"/\",\n\"data\":null}");
    }

    #[test]
    fn parse_frame_reads_event_and_data() {
        let frame = parse_frame("event: put\ndata: {\"path\":\"/\",\"data\":null}").unwrap();
        assert_eq!(frame.event, "put");
        assert_eq!(frame.data, "{\"path\":\"/\",\"data\":null}");
    }

    #[test]
    fn parse_frame_skips_blank_input() {
        assert!(parse_frame("   ").is_none());
    }

    #[test]
    fn keep_alive_decodes_to_nothing() {
        let frame = StreamFrame {
            event: "keep-alive".to_string(),
            data: "null".to_string(),
        };
        assert_eq!(decode_frame(&frame).unwrap(), Vec::new());
    }

    #[test]
    fn cancel_is_a_stream_error() {
        let frame = StreamFrame {
            event: "cancel".to_string(),
            data: "null".to_string(),
        };
        assert!(decode_frame(&frame).is_err());
    }

    #[test]
    fn snapshot_put_orders_by_created_at() {
        let data = format!(
            r#"{{"path":"/","data":{{"k2":{},"k1":{}}}}}"#,
            entry_json("later", 200),
            entry_json("earlier", 100)
        );
        let frame = StreamFrame {
            event: "put".to_string(),
            data,
        };

        let events = decode_frame(&frame).unwrap();
        assert_eq!(events.len(), 2);
        match &events[0] {
            StoreEvent::Added { key, entry } => {
                assert_eq!(key.as_str(), "k1");
                assert_eq!(entry.title, "earlier");
            }
            other => panic!("unexpected event: {other:?}"),
        }
        match &events[1] {
            StoreEvent::Added { entry, .. } => assert_eq!(entry.title, "later"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn empty_snapshot_decodes_to_nothing() {
        let frame = StreamFrame {
            event: "put".to_string(),
            data: r#"{"path":"/","data":null}"#.to_string(),
        };
        assert_eq!(decode_frame(&frame).unwrap(), Vec::new());
    }

    #[test]
    fn child_put_decodes_to_added() {
        let frame = StreamFrame {
            event: "put".to_string(),
            data: format!(r#"{{"path":"/k9","data":{}}}"#, entry_json("new", 300)),
        };

        let events = decode_frame(&frame).unwrap();
        assert_eq!(events.len(), 1);
        match &events[0] {
            StoreEvent::Added { key, entry } => {
                assert_eq!(key.as_str(), "k9");
                assert_eq!(entry.created_at, 300);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn null_child_put_decodes_to_removed() {
        let frame = StreamFrame {
            event: "put".to_string(),
            data: r#"{"path":"/k9","data":null}"#.to_string(),
        };

        let events = decode_frame(&frame).unwrap();
        assert_eq!(
            events,
            vec![StoreEvent::Removed {
                key: "k9".into()
            }]
        );
    }

    #[test]
    fn nested_put_is_ignored() {
        let frame = StreamFrame {
            event: "put".to_string(),
            data: r#"{"path":"/k9/cafeTitle","data":"renamed"}"#.to_string(),
        };
        assert_eq!(decode_frame(&frame).unwrap(), Vec::new());
    }
}
