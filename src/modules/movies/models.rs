use serde::{Deserialize, Serialize};

/// A catalog record as stored and as returned on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    /// Server-generated unique identifier; never client-assigned.
    pub id: String,
    pub title: String,
    pub director: String,
    pub release_year: i32,
    pub genre: String,
    /// Always within [0, 5] for stored records.
    pub rating: f64,
}

/// Request body for creating a movie. Carries no id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovie {
    pub title: String,
    pub director: String,
    pub release_year: i32,
    pub genre: String,
    pub rating: f64,
}

impl CreateMovie {
    /// Required-field check. A field is treated as absent when it is empty
    /// (strings) or zero (numbers), so `releaseYear: 0` and `rating: 0`
    /// are rejected at creation.
    pub fn is_valid(&self) -> bool {
        !self.title.is_empty()
            && !self.director.is_empty()
            && self.release_year != 0
            && !self.genre.is_empty()
            && self.rating != 0.0
    }
}

/// Request body for the rating update operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingUpdate {
    pub rating: f64,
}
