//! Handlebars sources for the dashboard pages.

pub const HEAD_PARTIAL: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{settings.page_title}}</title>
<script src="{{settings.vega_url}}"></script>
<script src="{{settings.vega_lite_url}}"></script>
<script src="{{settings.vega_embed_url}}"></script>
<style>
  body { font-family: sans-serif; margin: 2rem; }
  .row { display: flex; gap: 2rem; margin-bottom: 2rem; }
  .col { flex: 1; min-width: 0; }
  .chart { width: 100%; }
  .error { background: #fde8e8; color: #9b1c1c; padding: 1rem; border-radius: 4px; }
  .warning { background: #fdf6b2; color: #723b13; padding: 1rem; border-radius: 4px; }
  .metric { display: inline-block; margin-right: 3rem; }
  .metric .label { font-size: 0.9rem; color: #555; }
  .metric .value { font-size: 1.8rem; }
  table { border-collapse: collapse; }
  th, td { border: 1px solid #ddd; padding: 0.3rem 0.6rem; text-align: right; }
  th:first-child, td:first-child { text-align: left; }
</style>
</head>
<body>
<h1>{{settings.heading}}</h1>
<form id="upload">
  <label>Upload CSV file <input type="file" id="file" accept=".csv,text/csv"></label>
</form>
<script>
document.getElementById("file").addEventListener("change", function (ev) {
  var file = ev.target.files[0];
  if (!file) { return; }
  fetch("{{upload_path}}", { method: "POST", headers: { "Content-Type": "text/csv" }, body: file })
    .then(function (r) { return r.text(); })
    .then(function (html) { document.open(); document.write(html); document.close(); });
});
</script>
"#;

pub const UPLOAD_PAGE: &str = r#"{{> head}}
<p class="warning">Please upload a CSV file to see the dashboard.</p>
</body>
</html>
"#;

pub const ERROR_PAGE: &str = r#"{{> head}}
<p class="error">An error occurred while processing the file: {{message}}</p>
</body>
</html>
"#;

pub const DASHBOARD_PAGE: &str = r##"{{> head}}
<h3>Cleaned Data</h3>
<table>
  <thead>
    <tr><th>Period</th>{{#each table.headers}}<th>{{this}}</th>{{/each}}</tr>
  </thead>
  <tbody>
    {{#each table.rows}}
    <tr><td>{{period}}</td>{{#each cells}}<td>{{this}}</td>{{/each}}</tr>
    {{/each}}
  </tbody>
</table>

{{#each chart_rows}}
<div class="row">
  {{#each this}}
  <div class="col"><div class="chart" id="chart-{{id}}"></div></div>
  {{/each}}
</div>
{{/each}}

<h3>Key Metrics</h3>
<div class="metrics">
  {{#each metrics}}
  <div class="metric"><div class="label">{{label}}</div><div class="value">{{value}}</div></div>
  {{/each}}
</div>

<script>
{{#each chart_rows}}{{#each this}}
vegaEmbed("#chart-{{id}}", {{{spec}}}, { actions: false });
{{/each}}{{/each}}
</script>
</body>
</html>
"##;
