use super::templates::{DASHBOARD_PAGE, ERROR_PAGE, HEAD_PARTIAL, UPLOAD_PAGE};
use super::{format::format_figure, Dashboard, DashboardError};
use crate::config::DashboardSettings;
use handlebars::Handlebars;
use serde_json::{json, Value};
use std::fmt::Display;

/// Path the upload form posts the CSV to.
pub const UPLOAD_PATH: &str = "/dashboard";

/// Renders the three page states: empty, error, and dashboard.
pub struct Renderer {
    registry: Handlebars<'static>,
    settings: DashboardSettings,
}

/// JSON that can sit inside a `<script>` element without closing it.
fn script_safe_json(value: &Value) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(value)?
        .replace("</", "<\\/")
        .replace("<!--", "<\\!--"))
}

impl Renderer {
    pub fn new(settings: DashboardSettings) -> Result<Self, DashboardError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_partial("head", HEAD_PARTIAL)?;
        registry.register_template_string("upload", UPLOAD_PAGE)?;
        registry.register_template_string("error", ERROR_PAGE)?;
        registry.register_template_string("dashboard", DASHBOARD_PAGE)?;
        Ok(Self { registry, settings })
    }

    fn page_data(&self, mut extra: Value) -> Value {
        extra["settings"] = json!(self.settings);
        extra["upload_path"] = json!(UPLOAD_PATH);
        extra
    }

    pub fn render_upload(&self) -> Result<String, DashboardError> {
        let data = self.page_data(json!({}));
        Ok(self.registry.render("upload", &data)?)
    }

    pub fn render_error(&self, message: &dyn Display) -> Result<String, DashboardError> {
        let data = self.page_data(json!({ "message": message.to_string() }));
        Ok(self.registry.render("error", &data)?)
    }

    pub fn render_dashboard(&self, dashboard: &Dashboard) -> Result<String, DashboardError> {
        let table = &dashboard.statement;
        let headers: Vec<&str> = table.column_names().collect();
        let rows: Vec<Value> = table
            .rows()
            .map(|(period, cells)| {
                let cells: Vec<String> = cells.into_iter().map(format_figure).collect();
                json!({ "period": period, "cells": cells })
            })
            .collect();

        let mut chart_rows = Vec::with_capacity(dashboard.charts.len());
        for row in &dashboard.charts {
            let mut cols = Vec::with_capacity(row.len());
            for chart in row {
                cols.push(json!({ "id": chart.id, "spec": script_safe_json(&chart.spec)? }));
            }
            chart_rows.push(Value::Array(cols));
        }

        let metrics: Vec<Value> = dashboard
            .key_metrics
            .labelled()
            .iter()
            .map(|(label, value)| json!({ "label": label, "value": format_figure(*value) }))
            .collect();

        let data = self.page_data(json!({
            "table": { "headers": headers, "rows": rows },
            "chart_rows": chart_rows,
            "metrics": metrics,
        }));
        Ok(self.registry.render("dashboard", &data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::StatementError;

    const SAMPLE: &str = "\
Particulars,2022,2023
Total Revenue,100,1200000
Tax Expense,10,12
Profit Before Tax,30,36
Profit After Tax,20,24
Balance at the end of the year,5,9
";

    fn renderer() -> Renderer {
        Renderer::new(DashboardSettings::default()).unwrap()
    }

    #[test]
    fn upload_page_prompts_for_file() {
        let html = renderer().render_upload().unwrap();
        assert!(html.contains("<title>Financial Dashboard</title>"));
        assert!(html.contains("Please upload a CSV file to see the dashboard."));
        assert!(html.contains(UPLOAD_PATH));
    }

    #[test]
    fn error_page_escapes_message() {
        let err = StatementError::MalformedInput("<b>bad</b>".into());
        let html = renderer().render_error(&err).unwrap();
        assert!(html.contains("An error occurred while processing the file: malformed input: &lt;b&gt;bad&lt;/b&gt;"));
    }

    #[test]
    fn dashboard_page_has_table_charts_and_metrics() {
        let dashboard = Dashboard::from_csv(SAMPLE.as_bytes()).unwrap();
        let html = renderer().render_dashboard(&dashboard).unwrap();

        assert!(html.contains("Cleaned Data"));
        assert!(html.contains("<th>total_revenue</th>"));
        assert!(html.contains("Key Metrics"));
        assert!(html.contains("1,200,000"));
        assert!(html.contains("Retained Earnings"));
        for id in ["cluster", "profit-before-tax", "tax-rate", "net-profit-margin", "bubble"] {
            assert!(html.contains(&format!("id=\"chart-{id}\"")), "missing chart {id}");
        }
        assert!(html.contains("Tax Rate Over Years"));
    }

    #[test]
    fn period_labels_cannot_close_script() {
        let csv = SAMPLE.replace("Particulars,2022,2023", "Particulars,2022,</script>");
        let dashboard = Dashboard::from_csv(csv.as_bytes()).unwrap();
        let html = renderer().render_dashboard(&dashboard).unwrap();
        assert_eq!(html.matches("</script>").count(), 5);
    }

    #[test]
    fn custom_heading_is_used() {
        let settings = DashboardSettings {
            heading: "ACME & Sons".into(),
            ..DashboardSettings::default()
        };
        let html = Renderer::new(settings).unwrap().render_upload().unwrap();
        assert!(html.contains("<h1>ACME &amp; Sons</h1>"));
    }
}
