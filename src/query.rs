//! Aggregation query construction.
//!
//! Builds the Elasticsearch request body for one [`SearchSpec`]: a terms
//! aggregation on the group field (top groups by document count), a nested
//! terms aggregation on release year (most recent first), and an average of
//! gross revenue inside each year bucket.

use serde_json::{json, Value};

use crate::models::SearchSpec;

/// Name of the top-level grouping aggregation.
pub const TERMS_AGG: &str = "termsAgg";
/// Name of the per-group year aggregation.
pub const YEARS_AGG: &str = "yearsAgg";
/// Name of the per-year average gross aggregation.
pub const AVG_GROSS_AGG: &str = "avgGrossAgg";

/// Field holding the release year.
pub const YEAR_FIELD: &str = "titleYear.keyword";
/// Field holding gross revenue.
pub const GROSS_FIELD: &str = "grossUSD";

/// Build the aggregation request body for `spec`.
///
/// Hits are suppressed (`size: 0`); only the aggregation tree is returned.
pub fn build_aggregation(spec: &SearchSpec) -> Value {
    json!({
        "size": 0,
        "aggs": {
            TERMS_AGG: {
                "terms": {
                    "field": spec.group_field,
                    "size": spec.group_count,
                    "order": { "_count": "desc" }
                },
                "aggs": {
                    YEARS_AGG: {
                        "terms": {
                            "field": YEAR_FIELD,
                            "size": spec.year_count,
                            "order": { "_key": "desc" }
                        },
                        "aggs": {
                            AVG_GROSS_AGG: {
                                "avg": { "field": GROSS_FIELD }
                            }
                        }
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_genre_query() {
        let q = build_aggregation(&SearchSpec::new("genres.keyword", 6, 30));
        assert_eq!(q["size"], 0);

        let terms = &q["aggs"]["termsAgg"];
        assert_eq!(terms["terms"]["field"], "genres.keyword");
        assert_eq!(terms["terms"]["size"], 6);
        assert_eq!(terms["terms"]["order"]["_count"], "desc");

        let years = &terms["aggs"]["yearsAgg"];
        assert_eq!(years["terms"]["field"], "titleYear.keyword");
        assert_eq!(years["terms"]["size"], 30);
        assert_eq!(years["terms"]["order"]["_key"], "desc");

        assert_eq!(
            years["aggs"]["avgGrossAgg"]["avg"]["field"],
            "grossUSD"
        );
    }

    #[test]
    fn test_build_is_pure() {
        let spec = SearchSpec::new("country.keyword", 3, 20);
        assert_eq!(build_aggregation(&spec), build_aggregation(&spec));
    }
}
