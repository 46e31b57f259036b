use std::sync::RwLock;

use indexmap::IndexMap;
use uuid::Uuid;

use super::models::Movie;

/// Source of identifiers for newly created movies.
///
/// Injected into the module state so tests can supply a deterministic
/// generator.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Production id source: 128 bits of randomness rendered as 32 lowercase
/// hex characters.
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn generate(&self) -> String {
        Uuid::new_v4().as_simple().to_string()
    }
}

/// In-memory store owning the authoritative set of movie records.
///
/// A single lock serializes all access; the lock is never held across an
/// await point. Iteration order is insertion order.
pub struct MovieStore {
    movies: RwLock<IndexMap<String, Movie>>,
}

impl MovieStore {
    pub fn new() -> Self {
        Self {
            movies: RwLock::new(IndexMap::new()),
        }
    }

    /// Add a new record. The caller guarantees a fresh unique id.
    pub fn insert(&self, movie: Movie) {
        let mut movies = self.movies.write().unwrap();
        movies.insert(movie.id.clone(), movie);
    }

    /// Fetch a record by id.
    pub fn get(&self, id: &str) -> Option<Movie> {
        let movies = self.movies.read().unwrap();
        movies.get(id).cloned()
    }

    /// Remove a record by id; returns whether it existed. Insertion order
    /// of the remaining records is preserved.
    pub fn remove(&self, id: &str) -> bool {
        let mut movies = self.movies.write().unwrap();
        movies.shift_remove(id).is_some()
    }

    /// Snapshot of all records, keyed by id, in insertion order.
    pub fn all(&self) -> IndexMap<String, Movie> {
        let movies = self.movies.read().unwrap();
        movies.clone()
    }

    /// Overwrite a record's rating; returns the updated record. This is
    /// the only mutation path for stored records besides insert/remove.
    pub fn set_rating(&self, id: &str, rating: f64) -> Option<Movie> {
        let mut movies = self.movies.write().unwrap();
        let movie = movies.get_mut(id)?;
        movie.rating = rating;
        Some(movie.clone())
    }

    pub fn len(&self) -> usize {
        self.movies.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MovieStore {
    fn default() -> Self {
        Self::new()
    }
}
