pub mod charts;
pub mod format;
pub mod render;
pub mod templates;

pub use charts::Chart;
pub use render::{Renderer, UPLOAD_PATH};

use crate::statement::{self, KeyMetrics, NormalizedStatement, StatementError};
use thiserror::Error;
use tracing::instrument;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Statement(#[from] StatementError),
    #[error("template error: {0}")]
    Template(#[from] handlebars::TemplateError),
    #[error("render error: {0}")]
    Render(#[from] handlebars::RenderError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything the page shows for one uploaded statement.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub statement: NormalizedStatement,
    pub key_metrics: KeyMetrics,
    /// Chart layout, row by row.
    pub charts: Vec<Vec<Chart>>,
}

impl Dashboard {
    pub fn from_statement(statement: NormalizedStatement) -> Self {
        let key_metrics = KeyMetrics::from_statement(&statement);
        let charts = charts::chart_rows(&statement);
        Self {
            statement,
            key_metrics,
            charts,
        }
    }

    /// Build a dashboard straight from uploaded bytes. Pure: nothing is kept
    /// between calls.
    #[instrument(level = "info", skip(bytes), fields(bytes = bytes.len()))]
    pub fn from_csv(bytes: &[u8]) -> Result<Self, StatementError> {
        let table = statement::normalize_csv(bytes)?;
        Ok(Self::from_statement(table))
    }
}
