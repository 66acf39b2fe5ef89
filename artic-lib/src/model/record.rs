//! Artwork record

use serde::Deserialize;
use serde::Serialize;

/// Stable unique identifier of a record.
pub type RecordId = u64;

/// One artwork from the collection.
///
/// Only `id` carries meaning for selection; the remaining fields are display
/// data passed through as the API returns them. Any of them may be missing or
/// `null`.
///
/// # Example
///
/// ```
/// use artic_lib::model::Artwork;
///
/// let artwork = Artwork::new(27992).with_title("A Sunday on La Grande Jatte");
/// assert_eq!(artwork.title(), "A Sunday on La Grande Jatte");
/// assert_eq!(artwork.place_of_origin(), "");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artwork {
    /// Unique identifier.
    pub id: RecordId,
    /// Title of the work.
    pub title: Option<String>,
    /// Where the work was made.
    pub place_of_origin: Option<String>,
    /// Artist attribution text.
    pub artist_display: Option<String>,
    /// Free-text inscriptions.
    pub inscriptions: Option<String>,
    /// Earliest year associated with the work.
    pub date_start: Option<i32>,
    /// Latest year associated with the work.
    pub date_end: Option<i32>,
}

impl Artwork {
    /// Field names requested from the API, in column order.
    pub const FIELDS: &'static [&'static str] = &[
        "id",
        "title",
        "place_of_origin",
        "artist_display",
        "inscriptions",
        "date_start",
        "date_end",
    ];

    /// Creates an artwork with only an identifier.
    pub fn new(id: RecordId) -> Self {
        Self {
            id,
            title: None,
            place_of_origin: None,
            artist_display: None,
            inscriptions: None,
            date_start: None,
            date_end: None,
        }
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the place of origin.
    pub fn with_place_of_origin(mut self, place: impl Into<String>) -> Self {
        self.place_of_origin = Some(place.into());
        self
    }

    /// Sets the artist attribution.
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist_display = Some(artist.into());
        self
    }

    /// Sets the start and end years.
    pub fn with_dates(mut self, start: i32, end: i32) -> Self {
        self.date_start = Some(start);
        self.date_end = Some(end);
        self
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    pub fn place_of_origin(&self) -> &str {
        self.place_of_origin.as_deref().unwrap_or_default()
    }

    pub fn artist_display(&self) -> &str {
        self.artist_display.as_deref().unwrap_or_default()
    }

    pub fn inscriptions(&self) -> &str {
        self.inscriptions.as_deref().unwrap_or_default()
    }

    /// Returns the display cells in column order: title, place of origin,
    /// artist, inscriptions, start date, end date.
    pub fn cells(&self) -> [String; 6] {
        [
            self.title().to_string(),
            self.place_of_origin().to_string(),
            self.artist_display().to_string(),
            self.inscriptions().to_string(),
            self.date_start.map(|y| y.to_string()).unwrap_or_default(),
            self.date_end.map(|y| y.to_string()).unwrap_or_default(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_nulls_and_extra_fields() {
        let json = r#"{
            "id": 129884,
            "title": "Starry Night and the Astronauts",
            "place_of_origin": null,
            "artist_display": "Alma Thomas\nAmerican, 1891-1978",
            "date_start": 1972,
            "date_end": 1972,
            "_score": 1.0
        }"#;

        let artwork: Artwork = serde_json::from_str(json).unwrap();

        assert_eq!(artwork.id, 129884);
        assert_eq!(artwork.title(), "Starry Night and the Astronauts");
        assert_eq!(artwork.place_of_origin, None);
        assert_eq!(artwork.inscriptions, None);
        assert_eq!(artwork.date_start, Some(1972));
    }

    #[test]
    fn test_id_is_required() {
        let result: Result<Artwork, _> = serde_json::from_str(r#"{"title": "Untitled"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_cells_blank_missing_values() {
        let artwork = Artwork::new(1).with_title("Nighthawks").with_dates(1942, 1942);
        let cells = artwork.cells();

        assert_eq!(cells[0], "Nighthawks");
        assert_eq!(cells[1], "");
        assert_eq!(cells[4], "1942");
        assert_eq!(cells[5], "1942");
    }

    #[test]
    fn test_fields_start_with_id() {
        assert_eq!(Artwork::FIELDS[0], "id");
        assert_eq!(Artwork::FIELDS.len(), 7);
    }
}
