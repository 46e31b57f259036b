//! HTTP handlers for the movie catalog.
//!
//! Every handler is a synchronous transform over the store's current
//! contents; errors surface as an [`ApiError`] with the endpoint's
//! documented status and `{"message"}` body.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::json;

use marquee_http::error::ApiError;

use super::models::{CreateMovie, Movie, RatingUpdate};
use super::MoviesState;

/// Build the movies router. Static segments are registered alongside the
/// `{id}` captures; axum gives them precedence, so `/top-rated` and
/// `/search` never shadow into the id routes.
pub fn router(state: MoviesState) -> Router {
    Router::new()
        .route("/", get(list_movies).post(create_movie))
        .route("/top-rated", get(top_rated))
        .route("/search", get(search_by_title))
        .route("/genre/{genre}", get(filter_by_genre))
        .route("/director/{director}", get(filter_by_director))
        .route("/{id}", get(get_movie).delete(delete_movie))
        .route("/{id}/rating", get(get_rating).post(update_rating))
        .with_state(state)
}

/// POST /movies
async fn create_movie(
    State(state): State<MoviesState>,
    payload: Result<Json<CreateMovie>, JsonRejection>,
) -> Result<(StatusCode, Json<Movie>), ApiError> {
    // A missing field fails deserialization, so a malformed body and an
    // incomplete one collapse into the same rejection.
    let Json(body) = payload.map_err(|_| ApiError::invalid_request("Invalid request"))?;
    if !body.is_valid() {
        return Err(ApiError::invalid_request("Invalid request"));
    }

    let movie = Movie {
        id: state.ids.generate(),
        title: body.title,
        director: body.director,
        release_year: body.release_year,
        genre: body.genre,
        rating: body.rating,
    };
    state.store.insert(movie.clone());

    Ok((StatusCode::CREATED, Json(movie)))
}

/// GET /movies. Returns all records keyed by id, mirroring the storage
/// shape.
async fn list_movies(
    State(state): State<MoviesState>,
) -> Result<Json<IndexMap<String, Movie>>, ApiError> {
    let movies = state.store.all();
    if movies.is_empty() {
        return Err(ApiError::empty_collection("No movies found"));
    }
    Ok(Json(movies))
}

/// GET /movies/{id}
async fn get_movie(
    State(state): State<MoviesState>,
    Path(id): Path<String>,
) -> Result<Json<Movie>, ApiError> {
    let movie = state
        .store
        .get(&id)
        .ok_or_else(|| ApiError::not_found("Movie not found"))?;
    Ok(Json(movie))
}

/// DELETE /movies/{id}
async fn delete_movie(
    State(state): State<MoviesState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !state.store.remove(&id) {
        return Err(ApiError::not_found("Movie not found"));
    }
    Ok(Json(json!({ "message": "Movie deleted" })))
}

/// POST /movies/{id}/rating. Existence is checked before the body, so an
/// unknown id yields 404 regardless of the payload.
async fn update_rating(
    State(state): State<MoviesState>,
    Path(id): Path<String>,
    payload: Result<Json<RatingUpdate>, JsonRejection>,
) -> Result<Json<Movie>, ApiError> {
    if state.store.get(&id).is_none() {
        return Err(ApiError::not_found("Movie not found"));
    }

    let Json(update) = payload.map_err(|_| ApiError::invalid_request("Invalid request"))?;
    if !(0.0..=5.0).contains(&update.rating) {
        return Err(ApiError::invalid_rating("Invalid rating"));
    }

    let movie = state
        .store
        .set_rating(&id, update.rating)
        .ok_or_else(|| ApiError::not_found("Movie not found"))?;
    Ok(Json(movie))
}

/// GET /movies/{id}/rating
async fn get_rating(
    State(state): State<MoviesState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let movie = state
        .store
        .get(&id)
        .ok_or_else(|| ApiError::not_found("Movie not found"))?;
    Ok(Json(json!({ "rating": movie.rating })))
}

/// GET /movies/top-rated. Never a 404; an empty store yields `[]`.
///
/// Single scan with the max seeded at 0: a strictly greater rating resets
/// the accumulated set, an equal rating appends. Ties keep first-encounter
/// order.
async fn top_rated(State(state): State<MoviesState>) -> Json<Vec<Movie>> {
    let mut max_rating = 0.0_f64;
    let mut top: Vec<Movie> = Vec::new();

    for movie in state.store.all().into_values() {
        if movie.rating > max_rating {
            max_rating = movie.rating;
            top = vec![movie];
        } else if movie.rating == max_rating {
            top.push(movie);
        }
    }

    Json(top)
}

/// GET /movies/genre/{genre}. Exact, case-sensitive match.
async fn filter_by_genre(
    State(state): State<MoviesState>,
    Path(genre): Path<String>,
) -> Result<Json<Vec<Movie>>, ApiError> {
    let movies: Vec<Movie> = state
        .store
        .all()
        .into_values()
        .filter(|movie| movie.genre == genre)
        .collect();

    if movies.is_empty() {
        return Err(ApiError::not_found("No movies found"));
    }
    Ok(Json(movies))
}

/// GET /movies/director/{director}. Exact, case-sensitive match.
async fn filter_by_director(
    State(state): State<MoviesState>,
    Path(director): Path<String>,
) -> Result<Json<Vec<Movie>>, ApiError> {
    let movies: Vec<Movie> = state
        .store
        .all()
        .into_values()
        .filter(|movie| movie.director == director)
        .collect();

    if movies.is_empty() {
        return Err(ApiError::not_found("No movies found"));
    }
    Ok(Json(movies))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    query: Option<String>,
}

/// GET /movies/search?query=. Case-insensitive substring match on title;
/// an absent or empty query is rejected.
async fn search_by_title(
    State(state): State<MoviesState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Movie>>, ApiError> {
    let query = params
        .query
        .filter(|query| !query.is_empty())
        .ok_or_else(|| ApiError::invalid_request("Query parameter is required"))?;

    let needle = query.to_lowercase();
    let movies: Vec<Movie> = state
        .store
        .all()
        .into_values()
        .filter(|movie| movie.title.to_lowercase().contains(&needle))
        .collect();

    if movies.is_empty() {
        return Err(ApiError::not_found("No movies found"));
    }
    Ok(Json(movies))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::modules::movies::store::{IdGenerator, MovieStore};

    /// Deterministic id source: movie-0, movie-1, ...
    struct SequentialIds {
        counter: AtomicUsize,
    }

    impl SequentialIds {
        fn new() -> Self {
            Self {
                counter: AtomicUsize::new(0),
            }
        }
    }

    impl IdGenerator for SequentialIds {
        fn generate(&self) -> String {
            let n = self.counter.fetch_add(1, Ordering::SeqCst);
            format!("movie-{n}")
        }
    }

    fn test_app() -> Router {
        let state = MoviesState {
            store: Arc::new(MovieStore::new()),
            ids: Arc::new(SequentialIds::new()),
        };
        Router::new().nest("/movies", router(state))
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(value) => builder
                .header("content-type", "application/json")
                .body(Body::from(value.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn matrix() -> serde_json::Value {
        json!({
            "title": "The Matrix",
            "director": "Lana Wachowski",
            "releaseYear": 1999,
            "genre": "Sci-Fi",
            "rating": 4.5
        })
    }

    async fn create(app: &Router, body: serde_json::Value) -> serde_json::Value {
        let (status, value) = send(app, "POST", "/movies", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        value
    }

    #[tokio::test]
    async fn create_returns_201_with_a_server_generated_id() {
        let app = test_app();

        let created = create(&app, matrix()).await;

        assert_eq!(created["id"], "movie-0");
        assert_eq!(created["title"], "The Matrix");
        assert_eq!(created["director"], "Lana Wachowski");
        assert_eq!(created["releaseYear"], 1999);
        assert_eq!(created["genre"], "Sci-Fi");
        assert_eq!(created["rating"].as_f64(), Some(4.5));
    }

    #[tokio::test]
    async fn create_ignores_a_client_supplied_id() {
        let app = test_app();
        let mut body = matrix();
        body["id"] = json!("client-chosen");

        let created = create(&app, body).await;

        assert_eq!(created["id"], "movie-0");
    }

    #[tokio::test]
    async fn create_rejects_a_missing_field() {
        let app = test_app();

        for field in ["title", "director", "releaseYear", "genre", "rating"] {
            let mut body = matrix();
            body.as_object_mut().unwrap().remove(field);

            let (status, value) = send(&app, "POST", "/movies", Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "field: {field}");
            assert_eq!(value, json!({ "message": "Invalid request" }));
        }
    }

    #[tokio::test]
    async fn create_rejects_empty_and_zero_fields() {
        let app = test_app();

        for (field, falsy) in [
            ("title", json!("")),
            ("director", json!("")),
            ("releaseYear", json!(0)),
            ("genre", json!("")),
            ("rating", json!(0)),
        ] {
            let mut body = matrix();
            body[field] = falsy;

            let (status, value) = send(&app, "POST", "/movies", Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "field: {field}");
            assert_eq!(value, json!({ "message": "Invalid request" }));
        }
    }

    #[tokio::test]
    async fn create_rejects_a_malformed_body() {
        let app = test_app();

        let request = Request::builder()
            .method("POST")
            .uri("/movies")
            .header("content-type", "application/json")
            .body(Body::from("{"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value, json!({ "message": "Invalid request" }));
    }

    #[tokio::test]
    async fn get_returns_the_created_record() {
        let app = test_app();
        let created = create(&app, matrix()).await;

        let (status, value) = send(&app, "GET", "/movies/movie-0", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value, created);
    }

    #[tokio::test]
    async fn get_unknown_id_returns_404() {
        let app = test_app();

        let (status, value) = send(&app, "GET", "/movies/missing", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(value, json!({ "message": "Movie not found" }));
    }

    #[tokio::test]
    async fn repeated_gets_return_the_same_record() {
        let app = test_app();
        create(&app, matrix()).await;

        let (_, first) = send(&app, "GET", "/movies/movie-0", None).await;
        let (_, second) = send(&app, "GET", "/movies/movie-0", None).await;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn list_returns_records_keyed_by_id() {
        let app = test_app();
        create(&app, matrix()).await;
        let mut other = matrix();
        other["title"] = json!("Bound");
        create(&app, other).await;

        let (status, value) = send(&app, "GET", "/movies", None).await;

        assert_eq!(status, StatusCode::OK);
        assert!(value.is_object());
        assert_eq!(value["movie-0"]["title"], "The Matrix");
        assert_eq!(value["movie-1"]["title"], "Bound");
    }

    #[tokio::test]
    async fn list_returns_404_when_the_store_is_empty() {
        let app = test_app();

        let (status, value) = send(&app, "GET", "/movies", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(value, json!({ "message": "No movies found" }));
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let app = test_app();
        create(&app, matrix()).await;

        let (status, value) = send(&app, "DELETE", "/movies/movie-0", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value, json!({ "message": "Movie deleted" }));

        let (status, _) = send(&app, "GET", "/movies/movie-0", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn deleting_an_unknown_id_is_idempotently_404() {
        let app = test_app();

        for _ in 0..2 {
            let (status, value) = send(&app, "DELETE", "/movies/missing", None).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(value, json!({ "message": "Movie not found" }));
        }
    }

    #[tokio::test]
    async fn update_rating_overwrites_and_returns_the_record() {
        let app = test_app();
        create(&app, matrix()).await;

        let (status, value) = send(
            &app,
            "POST",
            "/movies/movie-0/rating",
            Some(json!({ "rating": 3 })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["id"], "movie-0");
        assert_eq!(value["rating"].as_f64(), Some(3.0));

        let (status, value) = send(&app, "GET", "/movies/movie-0/rating", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["rating"].as_f64(), Some(3.0));
    }

    #[tokio::test]
    async fn out_of_range_ratings_leave_the_record_unchanged() {
        let app = test_app();
        create(&app, matrix()).await;

        for bad in [json!({ "rating": 6 }), json!({ "rating": -1 })] {
            let (status, value) =
                send(&app, "POST", "/movies/movie-0/rating", Some(bad)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(value, json!({ "message": "Invalid rating" }));
        }

        let (_, value) = send(&app, "GET", "/movies/movie-0/rating", None).await;
        assert_eq!(value["rating"].as_f64(), Some(4.5));
    }

    #[tokio::test]
    async fn rating_boundaries_are_inclusive() {
        let app = test_app();
        create(&app, matrix()).await;

        for boundary in [0.0, 5.0] {
            let (status, value) = send(
                &app,
                "POST",
                "/movies/movie-0/rating",
                Some(json!({ "rating": boundary })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(value["rating"].as_f64(), Some(boundary));
        }
    }

    #[tokio::test]
    async fn rating_update_checks_existence_before_the_body() {
        let app = test_app();

        // Unknown id wins over an out-of-range payload.
        let (status, value) = send(
            &app,
            "POST",
            "/movies/missing/rating",
            Some(json!({ "rating": 9 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(value, json!({ "message": "Movie not found" }));
    }

    #[tokio::test]
    async fn rating_update_rejects_a_malformed_body() {
        let app = test_app();
        create(&app, matrix()).await;

        let (status, value) = send(
            &app,
            "POST",
            "/movies/movie-0/rating",
            Some(json!({ "stars": 3 })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value, json!({ "message": "Invalid request" }));
    }

    #[tokio::test]
    async fn get_rating_for_an_unknown_id_returns_404() {
        let app = test_app();

        let (status, value) = send(&app, "GET", "/movies/missing/rating", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(value, json!({ "message": "Movie not found" }));
    }

    #[tokio::test]
    async fn top_rated_returns_all_ties_in_creation_order() {
        let app = test_app();

        for (title, rating) in [("A", 5.0), ("B", 5.0), ("C", 2.0)] {
            let mut body = matrix();
            body["title"] = json!(title);
            body["rating"] = json!(rating);
            create(&app, body).await;
        }

        let (status, value) = send(&app, "GET", "/movies/top-rated", None).await;

        assert_eq!(status, StatusCode::OK);
        let titles: Vec<&str> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|movie| movie["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn top_rated_on_an_empty_store_is_an_empty_200() {
        let app = test_app();

        let (status, value) = send(&app, "GET", "/movies/top-rated", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value, json!([]));
    }

    #[tokio::test]
    async fn filter_by_genre_is_case_sensitive() {
        let app = test_app();
        create(&app, matrix()).await;

        let (status, value) = send(&app, "GET", "/movies/genre/Sci-Fi", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value.as_array().unwrap().len(), 1);

        let (status, value) = send(&app, "GET", "/movies/genre/sci-fi", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(value, json!({ "message": "No movies found" }));
    }

    #[tokio::test]
    async fn filter_by_director_matches_exactly() {
        let app = test_app();
        create(&app, matrix()).await;

        let (status, value) =
            send(&app, "GET", "/movies/director/Lana%20Wachowski", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value.as_array().unwrap().len(), 1);

        let (status, value) = send(&app, "GET", "/movies/director/Unknown", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(value, json!({ "message": "No movies found" }));
    }

    #[tokio::test]
    async fn search_matches_title_substrings_case_insensitively() {
        let app = test_app();
        create(&app, matrix()).await;

        let (status, value) = send(&app, "GET", "/movies/search?query=matrix", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value.as_array().unwrap()[0]["title"], "The Matrix");
    }

    #[tokio::test]
    async fn search_without_a_query_is_rejected() {
        let app = test_app();
        create(&app, matrix()).await;

        for uri in ["/movies/search", "/movies/search?query="] {
            let (status, value) = send(&app, "GET", uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "uri: {uri}");
            assert_eq!(value, json!({ "message": "Query parameter is required" }));
        }
    }

    #[tokio::test]
    async fn search_with_no_matches_returns_404() {
        let app = test_app();
        create(&app, matrix()).await;

        let (status, value) = send(&app, "GET", "/movies/search?query=inception", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(value, json!({ "message": "No movies found" }));
    }
}
