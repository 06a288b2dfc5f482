use crate::statement::arrow::PERIOD_FIELD;
use crate::statement::metrics::{
    NET_PROFIT_MARGIN, PROFIT_AFTER_TAX, PROFIT_BEFORE_TAX, TAX_EXPENSE, TAX_RATE, TOTAL_REVENUE,
};
use crate::statement::NormalizedStatement;
use serde::Serialize;
use serde_json::{json, Map, Value};

const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";
const YEAR_TITLE: &str = "Financial Year";

/// A Vega-Lite chart ready to be embedded.
#[derive(Debug, Clone, Serialize)]
pub struct Chart {
    /// DOM-safe identifier.
    pub id: &'static str,
    pub spec: Value,
}

/// One object per period: `Period` plus every column, missing as `null`.
pub fn chart_values(table: &NormalizedStatement) -> Vec<Value> {
    table
        .rows()
        .map(|(period, cells)| {
            let mut obj = Map::with_capacity(cells.len() + 1);
            for (column, cell) in table.column_names().zip(cells) {
                obj.insert(column.to_string(), Value::from(cell));
            }
            obj.insert(PERIOD_FIELD.to_string(), Value::from(period));
            Value::Object(obj)
        })
        .collect()
}

fn base(title: &str, values: &[Value], mark: Value, encoding: Value) -> Value {
    json!({
        "$schema": VEGA_LITE_SCHEMA,
        "title": title,
        "width": "container",
        "data": { "values": values },
        "mark": mark,
        "encoding": encoding,
    })
}

fn period_color() -> Value {
    json!({ "field": PERIOD_FIELD, "type": "nominal", "title": YEAR_TITLE })
}

fn period_axis() -> Value {
    json!({ "field": PERIOD_FIELD, "type": "ordinal", "title": YEAR_TITLE })
}

fn quantity(field: &str, title: &str) -> Value {
    json!({ "field": field, "type": "quantitative", "title": title })
}

fn quantity_fmt(field: &str, title: &str, format: &str) -> Value {
    json!({
        "field": field,
        "type": "quantitative",
        "title": title,
        "axis": { "format": format },
    })
}

fn tooltip(fields: &[&str]) -> Value {
    Value::Array(
        std::iter::once(PERIOD_FIELD)
            .chain(fields.iter().copied())
            .map(|f| json!({ "field": f }))
            .collect(),
    )
}

/// Scatter of revenue against profit before tax, one point per period.
pub fn cluster_chart(values: &[Value]) -> Chart {
    Chart {
        id: "cluster",
        spec: base(
            "Cluster Chart: Total Revenue vs. Profit Before Tax",
            values,
            json!({ "type": "point", "size": 100 }),
            json!({
                "x": quantity(TOTAL_REVENUE, "Total Revenue"),
                "y": quantity(PROFIT_BEFORE_TAX, "Profit Before Tax"),
                "color": period_color(),
                "tooltip": tooltip(&[TOTAL_REVENUE, PROFIT_BEFORE_TAX]),
            }),
        ),
    }
}

pub fn profit_chart(values: &[Value]) -> Chart {
    Chart {
        id: "profit-before-tax",
        spec: base(
            "Profit Before Tax Over Years",
            values,
            json!({ "type": "line", "point": true }),
            json!({
                "x": period_axis(),
                "y": quantity_fmt(PROFIT_BEFORE_TAX, "Profit Before Tax", ",.0f"),
                "color": period_color(),
                "tooltip": tooltip(&[PROFIT_BEFORE_TAX]),
            }),
        ),
    }
}

pub fn tax_rate_chart(values: &[Value]) -> Chart {
    Chart {
        id: "tax-rate",
        spec: base(
            "Tax Rate Over Years",
            values,
            json!({ "type": "line", "point": true }),
            json!({
                "x": period_axis(),
                "y": quantity_fmt(TAX_RATE, "Tax Rate (%)", ",.2f"),
                "color": period_color(),
                "tooltip": tooltip(&[TAX_RATE]),
            }),
        ),
    }
}

pub fn net_profit_margin_chart(values: &[Value]) -> Chart {
    Chart {
        id: "net-profit-margin",
        spec: base(
            "Net Profit Margin Over Years",
            values,
            json!({ "type": "bar" }),
            json!({
                "x": period_axis(),
                "y": quantity_fmt(NET_PROFIT_MARGIN, "Net Profit Margin (%)", ",.2f"),
                "color": period_color(),
                "tooltip": tooltip(&[NET_PROFIT_MARGIN]),
            }),
        ),
    }
}

pub fn bubble_chart(values: &[Value]) -> Chart {
    Chart {
        id: "bubble",
        spec: base(
            "Bubble Chart: Tax Expense vs. Profit After Tax",
            values,
            json!({ "type": "circle", "size": 100 }),
            json!({
                "x": quantity(TAX_EXPENSE, "Tax Expense"),
                "y": quantity(PROFIT_AFTER_TAX, "Profit After Tax"),
                "color": period_color(),
                "tooltip": tooltip(&[TAX_EXPENSE, PROFIT_AFTER_TAX]),
            }),
        ),
    }
}

/// Dashboard layout: two rows of two charts, then the bubble chart alone.
pub fn chart_rows(table: &NormalizedStatement) -> Vec<Vec<Chart>> {
    let values = chart_values(table);
    vec![
        vec![cluster_chart(&values), profit_chart(&values)],
        vec![tax_rate_chart(&values), net_profit_margin_chart(&values)],
        vec![bubble_chart(&values)],
    ]
}
