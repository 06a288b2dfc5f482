use tracing::warn;

/// A named column of nullable numbers, one cell per period.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Period-by-attribute table. Rows follow the source's period order, so the
/// last row is the latest period.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedStatement {
    periods: Vec<String>,
    columns: Vec<Column>,
}

impl NormalizedStatement {
    pub fn new(periods: Vec<String>) -> Self {
        Self {
            periods,
            columns: Vec::new(),
        }
    }

    pub fn periods(&self) -> &[String] {
        &self.periods
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Number of rows (periods).
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Value of `name` in the given row, `None` when either is absent.
    pub fn value(&self, row: usize, name: &str) -> Option<f64> {
        self.column(name).and_then(|v| v.get(row).copied().flatten())
    }

    /// Insert a column, overwriting any existing column of the same name in
    /// place. Returns `true` when an existing column was replaced.
    ///
    /// `values` is padded with missing cells (or truncated) to the period count.
    pub fn insert_column(&mut self, name: impl Into<String>, mut values: Vec<Option<f64>>) -> bool {
        values.resize(self.periods.len(), None);
        let name = name.into();
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => {
                warn!(column = %name, "duplicate column name; later values overwrite earlier ones");
                existing.values = values;
                true
            }
            None => {
                self.columns.push(Column { name, values });
                false
            }
        }
    }

    /// Iterate rows as `(period, cells)` where cells follow column order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, Vec<Option<f64>>)> + '_ {
        self.periods.iter().enumerate().map(move |(i, period)| {
            let cells = self.columns.iter().map(|c| c.values[i]).collect();
            (period.as_str(), cells)
        })
    }
}

/// Value of `column` in the last row; missing when the column is absent, the
/// table has no periods, or the last cell is itself missing.
pub fn latest(table: &NormalizedStatement, column: &str) -> Option<f64> {
    table.column(column)?.last().copied().flatten()
}
