//! Batch recommendation over a CSV file of query vectors.
//!
//! Input rows are `id,v1,...,vn` with a header line. Queries run in
//! parallel; output rows keep input order. A query that cannot be scored
//! (wrong length, zero vector, NaN or infinite component) yields a row
//! with `error` set instead of failing the batch.

use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crudelab_core::{FeatureVector, Recommendation, ReferenceData};

use crate::runner::RunError;

/// One query read from the input file.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRow {
    pub id: String,
    pub vector: FeatureVector,
}

/// One output row. Exactly one of `action` / `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRow {
    pub id: String,
    pub matched: Option<String>,
    pub action: Option<String>,
    pub similarity: Option<f64>,
    pub error: Option<String>,
}

impl BatchRow {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

pub fn load_queries_csv(path: &Path) -> Result<Vec<QueryRow>, RunError> {
    let file = std::fs::File::open(path).map_err(|source| RunError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_queries(file)
}

/// Parses query rows from any reader. The first header column must be `id`.
pub fn read_queries<R: std::io::Read>(reader: R) -> Result<Vec<QueryRow>, RunError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.get(0) != Some("id") || headers.len() < 2 {
        return Err(RunError::Query(
            "header must be `id,v1,...,vn` with at least one component".into(),
        ));
    }

    let mut queries = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        // Header is line 1.
        let line = i + 2;
        let id = record.get(0).unwrap_or_default().to_string();
        if id.is_empty() {
            return Err(RunError::Query(format!("line {line}: empty id")));
        }
        let values = record
            .iter()
            .skip(1)
            .map(|field| {
                field.parse::<f64>().map_err(|_| {
                    RunError::Query(format!("line {line}: `{field}` is not a number"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        queries.push(QueryRow {
            id,
            vector: FeatureVector::new(values),
        });
    }
    Ok(queries)
}

/// Recommends for every query against one reference snapshot.
pub fn run_batch(queries: &[QueryRow], reference: &ReferenceData) -> Vec<BatchRow> {
    let rows: Vec<BatchRow> = queries
        .par_iter()
        .map(|q| match score_query(q, reference) {
            Ok(rec) => BatchRow {
                id: q.id.clone(),
                matched: Some(rec.matched.id.to_string()),
                action: Some(rec.action.id.to_string()),
                similarity: Some(rec.similarity),
                error: None,
            },
            Err(e) => BatchRow {
                id: q.id.clone(),
                matched: None,
                action: None,
                similarity: None,
                error: Some(e),
            },
        })
        .collect();

    let failed = rows.iter().filter(|r| !r.is_ok()).count();
    if failed > 0 {
        warn!(failed, total = rows.len(), "some batch queries could not be scored");
    }
    info!(total = rows.len(), failed, "batch complete");
    rows
}

fn score_query(query: &QueryRow, reference: &ReferenceData) -> Result<Recommendation, String> {
    if let Some((i, v)) = query
        .vector
        .as_slice()
        .iter()
        .enumerate()
        .find(|(_, v)| !v.is_finite())
    {
        return Err(format!("non-finite component {v} at index {i}"));
    }
    reference.recommend(&query.vector).map_err(|e| e.to_string())
}

pub fn write_batch_csv(rows: &[BatchRow], path: &Path) -> Result<(), RunError> {
    let mut wtr = csv::Writer::from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush().map_err(|source| RunError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: &str = "\
id,v1,v2,v3,v4,v5,v6
nervous,0.35,0.75,0.25,0.45,0.85,0.70
optimistic,0.76,0.31,0.84,0.81,0.34,0.21
";

    #[test]
    fn reads_rows_in_file_order() {
        let queries = read_queries(INPUT.as_bytes()).unwrap();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].id, "nervous");
        assert_eq!(queries[1].vector.len(), 6);
    }

    #[test]
    fn rejects_missing_id_header() {
        let err = read_queries("a,b\nx,1.0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, RunError::Query(_)));
    }

    #[test]
    fn rejects_non_numeric_component() {
        let err = read_queries("id,v1\nq,abc\n".as_bytes()).unwrap_err();
        match err {
            RunError::Query(msg) => assert!(msg.contains("line 2")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn ragged_rows_are_csv_errors() {
        let err = read_queries("id,v1,v2\nq,1.0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, RunError::Csv(_)));
    }

    #[test]
    fn non_finite_cells_become_error_rows() {
        let input = "id,v1,v2,v3,v4,v5,v6\n\
                     ok,0.35,0.75,0.25,0.45,0.85,0.70\n\
                     nan_cell,0.35,nan,0.25,0.45,0.85,0.70\n\
                     inf_cell,inf,0.75,0.25,0.45,0.85,0.70\n";
        let queries = read_queries(input.as_bytes()).unwrap();
        let rows = run_batch(&queries, &ReferenceData::builtin());

        assert!(rows[0].is_ok());
        for row in &rows[1..] {
            assert!(row.action.is_none(), "{} got an action", row.id);
            assert!(row.similarity.is_none());
            assert!(row.error.as_deref().unwrap().contains("non-finite"));
        }
    }

    #[test]
    fn batch_preserves_order_and_isolates_failures() {
        let mut queries = read_queries(INPUT.as_bytes()).unwrap();
        queries.insert(
            1,
            QueryRow {
                id: "short".into(),
                vector: FeatureVector::from([0.5, 0.5]),
            },
        );
        let rows = run_batch(&queries, &ReferenceData::builtin());

        let ids: Vec<_> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["nervous", "short", "optimistic"]);
        assert_eq!(rows[0].action.as_deref(), Some("VENDER_FUERTE"));
        assert!(!rows[1].is_ok());
        assert!(rows[1].action.is_none());
        assert_eq!(rows[2].matched.as_deref(), Some("USUARIO_02_MercadoOptimista"));
    }
}
