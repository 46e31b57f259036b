pub mod models;
pub mod routes;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use marquee_kernel::{InitCtx, Module};
use serde_json::json;

use store::{IdGenerator, MovieStore, RandomIds};

/// Shared state injected into every movies handler.
///
/// Built per module instance, so independent instances (and tests) get
/// independent stores and id sources.
#[derive(Clone)]
pub struct MoviesState {
    pub store: Arc<MovieStore>,
    pub ids: Arc<dyn IdGenerator>,
}

/// Movie catalog module: in-memory CRUD plus query endpoints.
pub struct MoviesModule {
    state: MoviesState,
}

impl MoviesModule {
    pub fn new() -> Self {
        Self::with_state(MoviesState {
            store: Arc::new(MovieStore::new()),
            ids: Arc::new(RandomIds),
        })
    }

    /// Build the module over externally supplied state.
    pub fn with_state(state: MoviesState) -> Self {
        Self { state }
    }
}

impl Default for MoviesModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Module for MoviesModule {
    fn name(&self) -> &'static str {
        "movies"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "movies module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List all movies keyed by id",
                        "tags": ["Movies"],
                        "responses": {
                            "200": {
                                "description": "Mapping of id to movie record",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "additionalProperties": {
                                                "$ref": "#/components/schemas/Movie"
                                            }
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "The catalog is empty",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorBody"
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Create a movie",
                        "tags": ["Movies"],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "$ref": "#/components/schemas/CreateMovie"
                                    }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "The created record",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/Movie"
                                        }
                                    }
                                }
                            },
                            "400": {
                                "description": "A required field is missing, empty, or zero",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorBody"
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/top-rated": {
                    "get": {
                        "summary": "Movies sharing the highest rating, in creation order",
                        "tags": ["Movies"],
                        "responses": {
                            "200": {
                                "description": "Top-rated movies; empty list for an empty catalog",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": {
                                                "$ref": "#/components/schemas/Movie"
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/search": {
                    "get": {
                        "summary": "Case-insensitive title substring search",
                        "tags": ["Movies"],
                        "parameters": [
                            {
                                "name": "query",
                                "in": "query",
                                "required": true,
                                "schema": {
                                    "type": "string"
                                }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "Matching movies",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": {
                                                "$ref": "#/components/schemas/Movie"
                                            }
                                        }
                                    }
                                }
                            },
                            "400": {
                                "description": "Missing query parameter",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorBody"
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "No matches",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorBody"
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/genre/{genre}": {
                    "get": {
                        "summary": "Movies with exactly this genre",
                        "tags": ["Movies"],
                        "parameters": [
                            {
                                "name": "genre",
                                "in": "path",
                                "required": true,
                                "schema": {
                                    "type": "string"
                                }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "Matching movies",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": {
                                                "$ref": "#/components/schemas/Movie"
                                            }
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "No matches",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorBody"
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/director/{director}": {
                    "get": {
                        "summary": "Movies with exactly this director",
                        "tags": ["Movies"],
                        "parameters": [
                            {
                                "name": "director",
                                "in": "path",
                                "required": true,
                                "schema": {
                                    "type": "string"
                                }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "Matching movies",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": {
                                                "$ref": "#/components/schemas/Movie"
                                            }
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "No matches",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorBody"
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Fetch a movie by id",
                        "tags": ["Movies"],
                        "parameters": [
                            {
                                "name": "id",
                                "in": "path",
                                "required": true,
                                "schema": {
                                    "type": "string"
                                }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "The record",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/Movie"
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "Unknown id",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorBody"
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "delete": {
                        "summary": "Delete a movie by id",
                        "tags": ["Movies"],
                        "parameters": [
                            {
                                "name": "id",
                                "in": "path",
                                "required": true,
                                "schema": {
                                    "type": "string"
                                }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "Deleted",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorBody"
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "Unknown id",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorBody"
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/{id}/rating": {
                    "get": {
                        "summary": "Fetch a movie's rating",
                        "tags": ["Movies"],
                        "parameters": [
                            {
                                "name": "id",
                                "in": "path",
                                "required": true,
                                "schema": {
                                    "type": "string"
                                }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "The rating",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/RatingValue"
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "Unknown id",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorBody"
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Overwrite a movie's rating",
                        "tags": ["Movies"],
                        "parameters": [
                            {
                                "name": "id",
                                "in": "path",
                                "required": true,
                                "schema": {
                                    "type": "string"
                                }
                            }
                        ],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "$ref": "#/components/schemas/RatingUpdate"
                                    }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "The updated record",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/Movie"
                                        }
                                    }
                                }
                            },
                            "400": {
                                "description": "Rating outside [0, 5]",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorBody"
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "Unknown id",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorBody"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Movie": {
                        "type": "object",
                        "properties": {
                            "id": {
                                "type": "string",
                                "description": "Server-generated unique identifier"
                            },
                            "title": {
                                "type": "string"
                            },
                            "director": {
                                "type": "string"
                            },
                            "releaseYear": {
                                "type": "integer"
                            },
                            "genre": {
                                "type": "string"
                            },
                            "rating": {
                                "type": "number",
                                "minimum": 0,
                                "maximum": 5
                            }
                        },
                        "required": ["id", "title", "director", "releaseYear", "genre", "rating"]
                    },
                    "CreateMovie": {
                        "type": "object",
                        "properties": {
                            "title": {
                                "type": "string"
                            },
                            "director": {
                                "type": "string"
                            },
                            "releaseYear": {
                                "type": "integer"
                            },
                            "genre": {
                                "type": "string"
                            },
                            "rating": {
                                "type": "number"
                            }
                        },
                        "required": ["title", "director", "releaseYear", "genre", "rating"]
                    },
                    "RatingUpdate": {
                        "type": "object",
                        "properties": {
                            "rating": {
                                "type": "number"
                            }
                        },
                        "required": ["rating"]
                    },
                    "RatingValue": {
                        "type": "object",
                        "properties": {
                            "rating": {
                                "type": "number"
                            }
                        },
                        "required": ["rating"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "movies module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            records = self.state.store.len(),
            "movies module stopped"
        );
        Ok(())
    }
}

/// Create a new instance of the movies module.
pub fn create_module() -> Arc<dyn Module> {
    Arc::new(MoviesModule::new())
}
