use std::fmt::Write;

use crate::application::ChartSet;
use crate::domain::file_format::FileFormat;
use crate::domain::statistics::{StatValue, Summary};
use crate::domain::upload::UploadRejection;

use super::route_path;

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  <style>
    body {{ font-family: sans-serif; margin: 2rem; }}
    table.dataframe {{ border-collapse: collapse; }}
    table.dataframe td, table.dataframe th {{ padding: 0.25rem 0.5rem; }}
    .error {{ color: #b00020; }}
    img {{ display: block; max-width: 100%; margin-bottom: 2rem; }}
  </style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape_html(title),
        body = body
    )
}

pub fn index_page(rejection: Option<UploadRejection>) -> String {
    let message = rejection
        .map(|r| format!("  <p class=\"error\" role=\"alert\">{}</p>\n", escape_html(r.message())))
        .unwrap_or_default();
    let accept = FileFormat::ACCEPTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{}", ext))
        .collect::<Vec<_>>()
        .join(",");

    layout(
        "Upload data",
        &format!(
            r#"  <h1>Upload a CSV or Excel file</h1>
{message}  <form action="/upload" method="post" enctype="multipart/form-data">
    <input type="file" name="file" accept="{accept}">
    <button type="submit">Upload</button>
  </form>"#
        ),
    )
}

/// Statistics table in the markup pandas' `to_html` produces
pub fn summary_table(summary: &Summary) -> String {
    let mut html = String::from("<table border=\"1\" class=\"dataframe\">\n  <thead>\n    <tr style=\"text-align: right;\">\n      <th></th>\n");
    for column in &summary.columns {
        let _ = writeln!(html, "      <th>{}</th>", escape_html(column));
    }
    html.push_str("    </tr>\n  </thead>\n  <tbody>\n");

    for row in &summary.rows {
        html.push_str("    <tr>\n");
        let _ = writeln!(html, "      <th>{}</th>", escape_html(&row.label));
        for value in &row.values {
            let _ = writeln!(html, "      <td>{}</td>", format_stat(value));
        }
        html.push_str("    </tr>\n");
    }

    html.push_str("  </tbody>\n</table>");
    html
}

fn format_stat(value: &StatValue) -> String {
    match value {
        StatValue::Number(v) if v.is_nan() => "NaN".to_string(),
        StatValue::Number(v) => format!("{:.6}", v),
        StatValue::Count(n) => n.to_string(),
        StatValue::Text(s) => escape_html(s),
        StatValue::Missing => "NaN".to_string(),
    }
}

pub fn display_page(filename: &str, summary: &Summary) -> String {
    layout(
        &format!("Summary of {}", filename),
        &format!(
            r#"  <h1>Data summary for {name}</h1>
{table}
  <p><a href="{plot}">Show charts</a> | <a href="/">Upload another file</a></p>"#,
            name = escape_html(filename),
            table = summary_table(summary),
            plot = escape_html(&route_path("plot", filename)),
        ),
    )
}

pub fn plot_page(filename: &str, charts: &ChartSet) -> String {
    let captions = ["Histograms", "Pie chart", "Line chart"];
    let mut figures = String::new();
    for (caption, image) in captions.iter().zip(charts.images()) {
        let _ = write!(
            figures,
            "  <h2>{caption}</h2>\n  <img alt=\"{caption}\" src=\"{src}\">\n",
            caption = caption,
            src = image.to_data_uri()
        );
    }

    layout(
        &format!("Charts for {}", filename),
        &format!(
            r#"  <h1>Charts for {name}</h1>
{figures}  <p><a href="{display}">Back to summary</a> | <a href="/">Upload another file</a></p>"#,
            name = escape_html(filename),
            figures = figures,
            display = escape_html(&route_path("display", filename)),
        ),
    )
}

pub fn error_page(message: &str) -> String {
    layout(
        "Server error",
        &format!(
            r#"  <h1>Something went wrong</h1>
  <p class="error">{}</p>
  <p><a href="/">Back to upload</a></p>"#,
            escape_html(message)
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::statistics::SummaryRow;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<a href=\"x\">&'"),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
    }

    #[test]
    fn test_index_page_shows_rejection() {
        let page = index_page(Some(UploadRejection::UnsupportedExtension));
        assert!(page.contains("Only .csv and .xlsx files are accepted."));
        assert!(page.contains("accept=\".csv,.xlsx\""));
        assert!(!index_page(None).contains("class=\"error\""));
    }

    #[test]
    fn test_summary_table_markup() {
        let summary = Summary {
            columns: vec!["a<b".to_string()],
            rows: vec![
                SummaryRow {
                    label: "count".to_string(),
                    values: vec![StatValue::Number(2.0)],
                },
                SummaryRow {
                    label: "std".to_string(),
                    values: vec![StatValue::Number(f64::NAN)],
                },
            ],
        };
        let html = summary_table(&summary);

        assert!(html.starts_with("<table border=\"1\" class=\"dataframe\">"));
        assert!(html.contains("<th>a&lt;b</th>"));
        assert!(html.contains("<th>count</th>\n      <td>2.000000</td>"));
        assert!(html.contains("<td>NaN</td>"));
    }

    #[test]
    fn test_error_page_escapes_message() {
        let page = error_page("Not found: <x>.csv");
        assert!(page.contains("Not found: &lt;x&gt;.csv"));
    }
}
