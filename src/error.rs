use thiserror::Error;

use crate::resolve::ColumnRole;

/// Fatal conditions that stop a chart build before anything is drawn.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// One or more required column roles could not be found in the header row.
    #[error("required column(s) not found: {}", join_roles(.roles))]
    MissingColumns { roles: Vec<ColumnRole> },
    /// The seven-column positional layout was not satisfied.
    #[error("expected {expected} columns in positional layout, found {found}")]
    PositionalSchema { expected: usize, found: usize },
    #[error("no rows left to chart after normalization")]
    EmptyTable,
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn join_roles(roles: &[ColumnRole]) -> String {
    roles
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
