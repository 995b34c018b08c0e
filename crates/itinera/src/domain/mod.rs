//! Domain types for itinerary planning.
//!
//! A trip is a flat list of [`Segment`]s. Every segment shares the same
//! scheduling fields and carries a kind-specific payload in [`SegmentKind`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of an itinerary identifier.
pub const MAX_ITINERARY_ID_LENGTH: usize = 64;

/// Unique identifier for a segment
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(String);

impl SegmentId {
    /// Create a new segment ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SegmentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SegmentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identifier of a stored itinerary.
///
/// Used as a file stem by the JSONL backend, so it is restricted to ASCII
/// alphanumerics, `-` and `_`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItineraryId(String);

impl ItineraryId {
    /// Parse and validate an itinerary identifier.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first rule the input breaks.
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Itinerary ID cannot be empty".to_string());
        }
        if s.len() > MAX_ITINERARY_ID_LENGTH {
            return Err(format!(
                "Itinerary ID cannot exceed {MAX_ITINERARY_ID_LENGTH} characters"
            ));
        }
        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(format!(
                "Itinerary ID contains invalid character '{c}' (allowed: letters, digits, '-', '_')"
            ));
        }
        Ok(Self(s.to_string()))
    }

    /// Borrow the raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItineraryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ItineraryId {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ItineraryId> for String {
    fn from(id: ItineraryId) -> Self {
        id.0
    }
}

/// A single time-boxed item in an itinerary.
///
/// `start_datetime < end_datetime` is maintained by whoever creates and edits
/// segments. The scheduling engine reads it but never re-checks it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Unique identifier for the segment
    pub id: SegmentId,

    /// Display title
    #[serde(default)]
    pub title: String,

    /// Free-form notes (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// When the segment begins
    pub start_datetime: DateTime<Utc>,

    /// When the segment ends
    pub end_datetime: DateTime<Utc>,

    /// Segments this one explicitly depends on
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<SegmentId>,

    /// Kind tag plus kind-specific fields
    #[serde(flatten)]
    pub kind: SegmentKind,
}

impl Segment {
    /// Create a segment with no title, notes or dependencies.
    pub fn new(
        id: impl Into<SegmentId>,
        kind: impl Into<SegmentKind>,
        start_datetime: DateTime<Utc>,
        end_datetime: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            notes: None,
            start_datetime,
            end_datetime,
            depends_on: Vec::new(),
            kind: kind.into(),
        }
    }

    /// Set the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Add explicit predecessors.
    #[must_use]
    pub fn depending_on<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SegmentId>,
    {
        self.depends_on.extend(ids.into_iter().map(Into::into));
        self
    }

    /// The fieldless kind discriminant.
    pub fn segment_type(&self) -> SegmentType {
        self.kind.segment_type()
    }
}

/// Kind-specific payload of a segment.
///
/// Serialized with a `type` tag next to the shared segment fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SegmentKind {
    /// Scheduled or chartered flight
    Flight {
        /// Operating airline
        #[serde(default, skip_serializing_if = "Option::is_none")]
        airline: Option<String>,
        /// Flight number, e.g. "TP1351"
        #[serde(default, skip_serializing_if = "Option::is_none")]
        flight_number: Option<String>,
        /// Departure airport
        #[serde(default, skip_serializing_if = "Option::is_none")]
        origin: Option<String>,
        /// Arrival airport
        #[serde(default, skip_serializing_if = "Option::is_none")]
        destination: Option<String>,
    },

    /// Overnight stay
    Hotel {
        /// Property name
        #[serde(default, skip_serializing_if = "Option::is_none")]
        property_name: Option<String>,
        /// Street address
        #[serde(default, skip_serializing_if = "Option::is_none")]
        address: Option<String>,
    },

    /// Business or personal meeting
    Meeting {
        /// People attending
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        attendees: Vec<String>,
        /// Where the meeting happens
        #[serde(default, skip_serializing_if = "Option::is_none")]
        location: Option<String>,
    },

    /// Tour, dinner, museum visit and the like
    Activity {
        /// Free-form category, e.g. "dining"
        #[serde(default, skip_serializing_if = "Option::is_none")]
        category: Option<String>,
        /// Where the activity happens
        #[serde(default, skip_serializing_if = "Option::is_none")]
        location: Option<String>,
    },

    /// Ground or sea transfer between two places
    Transfer {
        /// Mode of transport, e.g. "taxi", "train"
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mode: Option<String>,
        /// Pick-up point
        #[serde(default, skip_serializing_if = "Option::is_none")]
        origin: Option<String>,
        /// Drop-off point
        #[serde(default, skip_serializing_if = "Option::is_none")]
        destination: Option<String>,
    },

    /// Anything else
    Custom {
        /// User-chosen label
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
}

impl SegmentKind {
    /// The fieldless discriminant for this payload.
    pub fn segment_type(&self) -> SegmentType {
        match self {
            Self::Flight { .. } => SegmentType::Flight,
            Self::Hotel { .. } => SegmentType::Hotel,
            Self::Meeting { .. } => SegmentType::Meeting,
            Self::Activity { .. } => SegmentType::Activity,
            Self::Transfer { .. } => SegmentType::Transfer,
            Self::Custom { .. } => SegmentType::Custom,
        }
    }
}

/// An empty payload of the given kind.
impl From<SegmentType> for SegmentKind {
    fn from(segment_type: SegmentType) -> Self {
        match segment_type {
            SegmentType::Flight => Self::Flight {
                airline: None,
                flight_number: None,
                origin: None,
                destination: None,
            },
            SegmentType::Hotel => Self::Hotel {
                property_name: None,
                address: None,
            },
            SegmentType::Meeting => Self::Meeting {
                attendees: Vec::new(),
                location: None,
            },
            SegmentType::Activity => Self::Activity {
                category: None,
                location: None,
            },
            SegmentType::Transfer => Self::Transfer {
                mode: None,
                origin: None,
                destination: None,
            },
            SegmentType::Custom => Self::Custom { label: None },
        }
    }
}

/// Kind of a segment without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentType {
    /// Flight
    Flight,

    /// Hotel stay
    Hotel,

    /// Meeting
    Meeting,

    /// Activity
    Activity,

    /// Transfer
    Transfer,

    /// Custom event
    Custom,
}

impl fmt::Display for SegmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Flight => "flight",
            Self::Hotel => "hotel",
            Self::Meeting => "meeting",
            Self::Activity => "activity",
            Self::Transfer => "transfer",
            Self::Custom => "custom",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn segment_serializes_with_flat_type_tag() {
        let segment = Segment::new("f1", SegmentType::Flight, at(10), at(14))
            .with_title("LIS to JFK")
            .depending_on(["taxi-1"]);

        let json = serde_json::to_value(&segment).unwrap();
        assert_eq!(json["type"], "flight");
        assert_eq!(json["id"], "f1");
        assert_eq!(json["depends_on"][0], "taxi-1");
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn segment_deserializes_kind_fields() {
        let json = r#"{
            "id": "t1",
            "type": "transfer",
            "mode": "train",
            "start_datetime": "2025-06-01T14:30:00Z",
            "end_datetime": "2025-06-01T15:30:00Z"
        }"#;

        let segment: Segment = serde_json::from_str(json).unwrap();
        assert_eq!(segment.segment_type(), SegmentType::Transfer);
        assert!(segment.depends_on.is_empty());
        assert!(matches!(
            segment.kind,
            SegmentKind::Transfer { mode: Some(ref m), .. } if m == "train"
        ));
    }

    #[test]
    fn unknown_type_tag_is_rejected() {
        let json = r#"{"id":"x","type":"cruise","start_datetime":"2025-06-01T14:30:00Z","end_datetime":"2025-06-01T15:30:00Z"}"#;
        assert!(serde_json::from_str::<Segment>(json).is_err());
    }

    #[rstest]
    #[case::flight(SegmentType::Flight)]
    #[case::hotel(SegmentType::Hotel)]
    #[case::meeting(SegmentType::Meeting)]
    #[case::activity(SegmentType::Activity)]
    #[case::transfer(SegmentType::Transfer)]
    #[case::custom(SegmentType::Custom)]
    fn empty_payload_keeps_its_type(#[case] segment_type: SegmentType) {
        assert_eq!(SegmentKind::from(segment_type).segment_type(), segment_type);
    }

    #[rstest]
    #[case::simple("lisbon-2025", true)]
    #[case::underscore("team_offsite", true)]
    #[case::empty("", false)]
    #[case::slash("../etc", false)]
    #[case::space("my trip", false)]
    fn itinerary_id_validation(#[case] input: &str, #[case] valid: bool) {
        assert_eq!(ItineraryId::parse(input).is_ok(), valid);
    }

    #[test]
    fn itinerary_id_rejects_overlong_input() {
        let long = "a".repeat(MAX_ITINERARY_ID_LENGTH + 1);
        assert!(ItineraryId::parse(&long).is_err());
    }
}
