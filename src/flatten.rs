//! Aggregation response decoding and flattening.
//!
//! The search response is first decoded into a typed schema mirroring the
//! query built by [`crate::query`]. Any deviation (missing aggregation,
//! non-string bucket key, mistyped metric) is reported as
//! [`DataError::UnexpectedShape`]. The decoded tree is then walked
//! group-major, year-minor into [`FlatRow`]s.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{DataError, Result};
use crate::models::FlatRow;

#[derive(Debug, Deserialize)]
pub struct AggregationResponse {
    pub aggregations: TopAggregations,
}

#[derive(Debug, Deserialize)]
pub struct TopAggregations {
    #[serde(rename = "termsAgg")]
    pub terms: GroupAggregation,
}

#[derive(Debug, Deserialize)]
pub struct GroupAggregation {
    pub buckets: Vec<GroupBucket>,
}

#[derive(Debug, Deserialize)]
pub struct GroupBucket {
    pub key: String,
    #[serde(default)]
    pub doc_count: u64,
    #[serde(rename = "yearsAgg")]
    pub years: YearAggregation,
}

#[derive(Debug, Deserialize)]
pub struct YearAggregation {
    pub buckets: Vec<YearBucket>,
}

#[derive(Debug, Deserialize)]
pub struct YearBucket {
    pub key: String,
    #[serde(default)]
    pub doc_count: u64,
    #[serde(rename = "avgGrossAgg")]
    pub avg_gross: AvgMetric,
}

#[derive(Debug, Deserialize)]
pub struct AvgMetric {
    pub value: Option<f64>,
}

/// Decode a raw search response into the typed aggregation schema.
pub fn decode_response(response: &Value) -> Result<AggregationResponse> {
    AggregationResponse::deserialize(response)
        .map_err(|e| DataError::UnexpectedShape(e.to_string()))
}

/// Decode `response` and flatten it into rows.
pub fn flatten(response: &Value) -> Result<Vec<FlatRow>> {
    let decoded = decode_response(response)?;
    Ok(flatten_decoded(&decoded))
}

/// Walk a decoded response. Year buckets without an average are skipped.
pub fn flatten_decoded(response: &AggregationResponse) -> Vec<FlatRow> {
    let mut rows = Vec::new();
    for group in &response.aggregations.terms.buckets {
        for year in &group.years.buckets {
            let Some(avg) = year.avg_gross.value else {
                continue;
            };
            rows.push(FlatRow {
                key: group.key.clone(),
                value: format!("{:.0}", avg),
                date: year.key.clone(),
            });
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response() -> Value {
        json!({
            "took": 3,
            "hits": { "total": 5043, "hits": [] },
            "aggregations": {
                "termsAgg": {
                    "buckets": [
                        {
                            "key": "Drama",
                            "doc_count": 2594,
                            "yearsAgg": {
                                "buckets": [
                                    { "key": "2015", "doc_count": 120, "avgGrossAgg": { "value": 120000000.0 } },
                                    { "key": "2014", "doc_count": 0, "avgGrossAgg": { "value": null } }
                                ]
                            }
                        },
                        {
                            "key": "Comedy",
                            "doc_count": 1872,
                            "yearsAgg": { "buckets": [] }
                        },
                        {
                            "key": "Thriller",
                            "doc_count": 1411,
                            "yearsAgg": {
                                "buckets": [
                                    { "key": "2016", "doc_count": 3, "avgGrossAgg": { "value": 1234.4 } },
                                    { "key": "2015", "doc_count": 9, "avgGrossAgg": { "value": 99.4 } }
                                ]
                            }
                        }
                    ]
                }
            }
        })
    }

    #[test]
    fn test_flatten_skips_null_average_and_empty_groups() {
        let rows = flatten(&response()).unwrap();
        let triples: Vec<(&str, &str, &str)> = rows
            .iter()
            .map(|r| (r.key.as_str(), r.value.as_str(), r.date.as_str()))
            .collect();
        assert_eq!(
            triples,
            vec![
                ("Drama", "120000000", "2015"),
                ("Thriller", "1234", "2016"),
                ("Thriller", "99", "2015"),
            ]
        );
    }

    #[test]
    fn test_flatten_single_group_example() {
        let resp = json!({
            "aggregations": { "termsAgg": { "buckets": [
                { "key": "Drama", "doc_count": 2, "yearsAgg": { "buckets": [
                    { "key": "2015", "doc_count": 2, "avgGrossAgg": { "value": 120000000 } },
                    { "key": "2014", "doc_count": 0, "avgGrossAgg": { "value": null } }
                ]}}
            ]}}
        });
        let rows = flatten(&resp).unwrap();
        assert_eq!(
            rows,
            vec![FlatRow {
                key: "Drama".into(),
                value: "120000000".into(),
                date: "2015".into(),
            }]
        );
    }

    #[test]
    fn test_flatten_is_idempotent() {
        let resp = response();
        assert_eq!(flatten(&resp).unwrap(), flatten(&resp).unwrap());
    }

    #[test]
    fn test_numeric_group_key_is_unexpected_shape() {
        let resp = json!({
            "aggregations": { "termsAgg": { "buckets": [
                { "key": 42, "doc_count": 1, "yearsAgg": { "buckets": [] } }
            ]}}
        });
        assert!(matches!(
            flatten(&resp).unwrap_err(),
            DataError::UnexpectedShape(_)
        ));
    }

    #[test]
    fn test_numeric_year_key_is_unexpected_shape() {
        let resp = json!({
            "aggregations": { "termsAgg": { "buckets": [
                { "key": "USA", "doc_count": 1, "yearsAgg": { "buckets": [
                    { "key": 2015, "doc_count": 1, "avgGrossAgg": { "value": 1.0 } }
                ]}}
            ]}}
        });
        assert!(matches!(
            flatten(&resp).unwrap_err(),
            DataError::UnexpectedShape(_)
        ));
    }

    #[test]
    fn test_missing_aggregations_is_unexpected_shape() {
        let resp = json!({ "hits": { "hits": [] } });
        assert!(matches!(
            flatten(&resp).unwrap_err(),
            DataError::UnexpectedShape(_)
        ));
    }

    #[test]
    fn test_no_groups_yields_no_rows() {
        let resp = json!({ "aggregations": { "termsAgg": { "buckets": [] } } });
        assert!(flatten(&resp).unwrap().is_empty());
    }
}
