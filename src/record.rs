//! Movie record parsing.
//!
//! Decodes one row of the IMDB-style movie CSV into a [`MovieRecord`].
//! The row shape is strict (exactly [`FIELD_COUNT`] fields) while individual
//! numeric fields are tolerant: anything that fails to parse becomes zero.

use crate::error::{DataError, Result};
use crate::models::MovieRecord;

/// Number of fields in a movie CSV row.
pub const FIELD_COUNT: usize = 28;

/// Separator used inside the genre and plot keyword columns.
pub const LIST_SEPARATOR: char = '|';

/// Value of the color column that marks a color film.
pub const COLOR_SENTINEL: &str = "Color";

// Column positions in the input CSV.
const COL_COLOR: usize = 0;
const COL_DIRECTOR_NAME: usize = 1;
const COL_CRITIC_COUNT: usize = 2;
const COL_DURATION: usize = 3;
const COL_DIRECTOR_LIKES: usize = 4;
const COL_ACTOR3_LIKES: usize = 5;
const COL_ACTOR2_NAME: usize = 6;
const COL_ACTOR1_LIKES: usize = 7;
const COL_GROSS: usize = 8;
const COL_GENRES: usize = 9;
const COL_ACTOR1_NAME: usize = 10;
const COL_TITLE: usize = 11;
const COL_VOTED_USERS: usize = 12;
const COL_CAST_LIKES: usize = 13;
const COL_ACTOR3_NAME: usize = 14;
const COL_FACES_IN_POSTER: usize = 15;
const COL_PLOT_KEYWORDS: usize = 16;
const COL_IMDB_LINK: usize = 17;
const COL_USER_REVIEWS: usize = 18;
const COL_LANGUAGE: usize = 19;
const COL_COUNTRY: usize = 20;
const COL_CONTENT_RATING: usize = 21;
const COL_BUDGET: usize = 22;
const COL_TITLE_YEAR: usize = 23;
const COL_ACTOR2_LIKES: usize = 24;
const COL_IMDB_SCORE: usize = 25;
const COL_ASPECT_RATIO: usize = 26;
const COL_MOVIE_LIKES: usize = 27;

/// Parse one CSV row into a [`MovieRecord`].
///
/// # Errors
///
/// Returns [`DataError::RecordShape`] when the row does not have exactly
/// [`FIELD_COUNT`] fields. Unparsable numeric fields never error.
pub fn parse_record<S: AsRef<str>>(fields: &[S]) -> Result<MovieRecord> {
    if fields.len() != FIELD_COUNT {
        return Err(DataError::RecordShape {
            expected: FIELD_COUNT,
            found: fields.len(),
        });
    }

    let text = |i: usize| fields[i].as_ref().to_string();
    let int = |i: usize| parse_int(fields[i].as_ref());
    let float = |i: usize| parse_float(fields[i].as_ref());
    let list = |i: usize| split_list(fields[i].as_ref());

    Ok(MovieRecord {
        actor1_facebook_likes: int(COL_ACTOR1_LIKES),
        actor1_name: text(COL_ACTOR1_NAME),
        actor2_facebook_likes: int(COL_ACTOR2_LIKES),
        actor2_name: text(COL_ACTOR2_NAME),
        actor3_facebook_likes: int(COL_ACTOR3_LIKES),
        actor3_name: text(COL_ACTOR3_NAME),
        aspect_ratio: float(COL_ASPECT_RATIO),
        budget_usd: int(COL_BUDGET),
        cast_total_facebook_likes: int(COL_CAST_LIKES),
        content_rating: text(COL_CONTENT_RATING),
        country: text(COL_COUNTRY),
        critic_count: int(COL_CRITIC_COUNT),
        director_facebook_likes: int(COL_DIRECTOR_LIKES),
        director_name: text(COL_DIRECTOR_NAME),
        duration_minutes: int(COL_DURATION),
        face_number_in_poster: int(COL_FACES_IN_POSTER),
        genres: list(COL_GENRES),
        gross_usd: int(COL_GROSS),
        imdb_score: float(COL_IMDB_SCORE),
        is_color: fields[COL_COLOR].as_ref() == COLOR_SENTINEL,
        language: text(COL_LANGUAGE),
        movie_facebook_likes: int(COL_MOVIE_LIKES),
        movie_imdb_link: text(COL_IMDB_LINK),
        movie_title: text(COL_TITLE),
        plot_keywords: list(COL_PLOT_KEYWORDS),
        title_year: text(COL_TITLE_YEAR),
        user_review_count: int(COL_USER_REVIEWS),
        voted_users_count: int(COL_VOTED_USERS),
    })
}

fn parse_int(s: &str) -> i64 {
    s.parse().unwrap_or(0)
}

fn parse_float(s: &str) -> f64 {
    s.parse().unwrap_or(0.0)
}

/// Split a list column. An empty column yields a single empty element.
fn split_list(s: &str) -> Vec<String> {
    s.split(LIST_SEPARATOR).map(str::to_string).collect()
}
