//! Loading a travel path from JSON.
//!
//! Two layouts are accepted, and may be mixed within one array:
//!
//! * `[lat, lon]` pairs, in traversal order.
//! * Location-history records. A record with an `activity` contributes its
//!   `start` then its `end` point, both written as `"geo:lat,lon"`.
//!   Records without an activity (place visits) are ignored.
//!
//! Entries that cannot be interpreted are logged and skipped.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use travel_coverage_models::{GeoPoint, TravelPath};

/// Errors from loading a path file.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// The file could not be read.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file is not JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The top-level JSON value is not an array.
    #[error("Expected a JSON array of points or location-history records")]
    NotAnArray,
}

/// One location-history record. Only the activity endpoints are used.
#[derive(Debug, Deserialize)]
struct HistoryRecord {
    activity: Option<Activity>,
}

#[derive(Debug, Deserialize)]
struct Activity {
    start: String,
    end: String,
}

/// Reads the path file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a JSON array.
pub fn load_path(path: &Path) -> Result<TravelPath, InputError> {
    let contents = std::fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let travel_path = parse_path(&contents)?;
    log::info!(
        "Loaded {} points from {}",
        travel_path.len(),
        path.display()
    );
    Ok(travel_path)
}

/// Parses a path document.
///
/// # Errors
///
/// Returns an error if the document is not a JSON array.
pub fn parse_path(json: &str) -> Result<TravelPath, InputError> {
    let Value::Array(entries) = serde_json::from_str(json)? else {
        return Err(InputError::NotAnArray);
    };

    let mut travel_path = TravelPath::default();
    for (index, entry) in entries.into_iter().enumerate() {
        match entry {
            Value::Array(_) => match serde_json::from_value::<GeoPoint>(entry) {
                Ok(point) => travel_path.push(point),
                Err(e) => log::warn!("Skipping point #{index}: {e}"),
            },
            Value::Object(_) => match serde_json::from_value::<HistoryRecord>(entry) {
                Ok(HistoryRecord {
                    activity: Some(activity),
                }) => push_activity(&mut travel_path, index, &activity),
                Ok(HistoryRecord { activity: None }) => {}
                Err(e) => log::warn!("Skipping record #{index}: {e}"),
            },
            other => log::warn!("Skipping entry #{index}: unexpected {other}"),
        }
    }

    Ok(travel_path)
}

/// Appends both endpoints of an activity, or neither if either is bad.
fn push_activity(travel_path: &mut TravelPath, index: usize, activity: &Activity) {
    match (
        activity.start.parse::<GeoPoint>(),
        activity.end.parse::<GeoPoint>(),
    ) {
        (Ok(start), Ok(end)) => {
            travel_path.push(start);
            travel_path.push(end);
        }
        (Err(e), _) | (_, Err(e)) => log::warn!("Skipping activity in record #{index}: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn parses_coordinate_pairs() {
        let path = parse_path("[[35.6168, 139.5644], [35.6078, 139.5576]]").unwrap();
        assert_eq!(
            path.points(),
            &[point(35.6168, 139.5644), point(35.6078, 139.5576)]
        );
    }

    #[test]
    fn parses_location_history_activities() {
        let json = r#"[
            {
                "startTime": "2024-05-01T09:00:00.000+09:00",
                "endTime": "2024-05-01T09:20:00.000+09:00",
                "activity": {
                    "start": "geo:35.616800,139.564400",
                    "end": "geo:35.607800,139.557600",
                    "distanceMeters": "1180.0"
                }
            },
            {
                "startTime": "2024-05-01T09:20:00.000+09:00",
                "endTime": "2024-05-01T10:00:00.000+09:00",
                "visit": { "topCandidate": { "placeID": "abc" } }
            },
            {
                "startTime": "2024-05-01T10:00:00.000+09:00",
                "endTime": "2024-05-01T10:15:00.000+09:00",
                "activity": {
                    "start": "geo:35.610800,139.572700",
                    "end": "geo:35.620300,139.569600"
                }
            }
        ]"#;

        let path = parse_path(json).unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(path.points()[0], point(35.6168, 139.5644));
        assert_eq!(path.points()[3], point(35.6203, 139.5696));
    }

    #[test]
    fn skips_invalid_entries() {
        let json = r#"[
            [35.6168, 139.5644],
            [135.0, 0.0],
            "not a point",
            { "activity": { "start": "geo:bad", "end": "geo:35.6,139.5" } },
            [35.6078, 139.5576]
        ]"#;
        let path = parse_path(json).unwrap();
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn rejects_non_array_document() {
        assert!(matches!(
            parse_path(r#"{"points": []}"#),
            Err(InputError::NotAnArray)
        ));
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(parse_path("[[1, 2"), Err(InputError::Json(_))));
    }
}
