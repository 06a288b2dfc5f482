// src/statement/arrow.rs

use arrow::{
    array::{ArrayRef, Float64Builder, StringArray},
    datatypes::{DataType, Field, Schema},
    error::ArrowError,
    record_batch::RecordBatch,
};
use std::sync::Arc;

use super::table::NormalizedStatement;

/// Name of the leading Utf8 column holding the period labels. Canonical
/// attribute names are lowercase, so this never collides with one.
pub const PERIOD_FIELD: &str = "Period";

/// Build the Arrow schema for a statement:
/// - `Period` → Utf8 (non-null)
/// - every attribute / derived metric → nullable Float64
pub fn build_arrow_schema(table: &NormalizedStatement) -> Arc<Schema> {
    let mut fields = Vec::with_capacity(table.columns().len() + 1);
    fields.push(Field::new(PERIOD_FIELD, DataType::Utf8, false));
    fields.extend(
        table
            .column_names()
            .map(|name| Field::new(name, DataType::Float64, /* nullable = */ true)),
    );
    Arc::new(Schema::new(fields))
}

impl NormalizedStatement {
    /// Columnar view of the table; missing cells become Arrow nulls.
    pub fn to_record_batch(&self) -> Result<RecordBatch, ArrowError> {
        let schema = build_arrow_schema(self);

        let mut cols = Vec::with_capacity(schema.fields().len());
        let periods: StringArray = self.periods().iter().map(|p| Some(p.as_str())).collect();
        cols.push(Arc::new(periods) as ArrayRef);

        for column in self.columns() {
            let mut b = Float64Builder::with_capacity(column.values.len());
            for v in &column.values {
                b.append_option(*v);
            }
            cols.push(Arc::new(b.finish()) as ArrayRef);
        }

        RecordBatch::try_new(schema, cols)
    }
}
