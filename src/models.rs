//! Core data models used throughout the data manager.
//!
//! These types describe the aggregation shape of a cached artifact, the movie
//! documents loaded into the index, and the flat rows written to disk.

use serde::Serialize;

/// Aggregation shape for one cached artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchSpec {
    /// Field used for the top-level terms aggregation (e.g. `"genres.keyword"`).
    pub group_field: String,
    /// Number of top groups, ranked by document count.
    pub group_count: u32,
    /// Number of most recent years kept per group.
    pub year_count: u32,
}

impl SearchSpec {
    pub fn new(group_field: impl Into<String>, group_count: u32, year_count: u32) -> Self {
        Self {
            group_field: group_field.into(),
            group_count,
            year_count,
        }
    }
}

/// A movie document as stored in the index.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRecord {
    pub actor1_facebook_likes: i64,
    pub actor1_name: String,
    pub actor2_facebook_likes: i64,
    pub actor2_name: String,
    pub actor3_facebook_likes: i64,
    pub actor3_name: String,
    pub aspect_ratio: f64,
    #[serde(rename = "budgetUSD")]
    pub budget_usd: i64,
    pub cast_total_facebook_likes: i64,
    pub content_rating: String,
    pub country: String,
    pub critic_count: i64,
    pub director_facebook_likes: i64,
    pub director_name: String,
    pub duration_minutes: i64,
    pub face_number_in_poster: i64,
    pub genres: Vec<String>,
    #[serde(rename = "grossUSD")]
    pub gross_usd: i64,
    #[serde(rename = "imdbScore")]
    pub imdb_score: f64,
    pub is_color: bool,
    pub language: String,
    pub movie_facebook_likes: i64,
    #[serde(rename = "movieIMDBLink")]
    pub movie_imdb_link: String,
    pub movie_title: String,
    pub plot_keywords: Vec<String>,
    pub title_year: String,
    pub user_review_count: i64,
    pub voted_users_count: i64,
}

/// One row of a cached artifact: group, average gross, year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatRow {
    pub key: String,
    pub value: String,
    pub date: String,
}
