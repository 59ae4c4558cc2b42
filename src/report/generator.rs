//! Page and data file generation.
//!
//! This module renders the merged dataset into the two generated files of
//! the bundle: the `index.html` shell and the `data.js` file it loads. Both
//! are pure functions of their input, so reruns produce identical bytes.

use crate::analysis::MergedDataset;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

/// File names and labels the page needs to reference.
#[derive(Debug, Clone)]
pub struct PageOptions {
    pub title: String,
    pub assets_subdir: String,
    pub data_file: String,
}

const LABEL_STYLE: &str = "font-weight:bold; margin-bottom: -2em; margin-top: 2em;";

/// Generate the complete `index.html`.
pub fn generate_index_html(dataset: &MergedDataset, options: &PageOptions) -> String {
    let mut output = String::new();

    output.push_str(&generate_head(options));

    for record in dataset.records() {
        output.push_str(&format!(
            "  <div style=\"{}\">{}</div>\n",
            LABEL_STYLE,
            escape_html(&record.label())
        ));
        output.push_str(&format!(
            "  <div id=\"{}-domain-bubble-svg-container\"></div>\n",
            record.anchor()
        ));
    }

    output.push_str(&generate_scripts(options));

    output
}

/// Generate the document head and the opening body tag.
fn generate_head(options: &PageOptions) -> String {
    let mut head = String::new();

    head.push_str("<!DOCTYPE html>\n");
    head.push_str("<html lang=\"en\">\n");
    head.push_str("<head>\n");
    head.push_str("  <meta charset=\"utf-8\" />\n");
    head.push_str(&format!("  <title>{}</title>\n", escape_html(&options.title)));
    head.push_str(&format!(
        "  <link rel=\"stylesheet\" type=\"text/css\" href=\"{}\">\n",
        asset_href(options, "style.css")
    ));
    head.push_str("</head>\n");
    head.push_str("<body>\n");

    head
}

/// Generate the script tags, the render loop and the closing tags.
fn generate_scripts(options: &PageOptions) -> String {
    let mut scripts = String::new();

    scripts.push_str(&format!(
        "  <script src=\"{}\"></script>\n",
        asset_href(options, "custom_antismash.js")
    ));
    scripts.push_str(&format!(
        "  <script src=\"{}\"></script>\n",
        escape_html(&options.data_file)
    ));
    scripts.push_str(&format!(
        "  <script src=\"{}\"></script>\n",
        asset_href(options, "jquery.js")
    ));
    scripts.push_str(
        r#"  <script>
    $(document).ready(function() {
        for (const record of data) {
            for (const area of record.areas) {
                viewer["actualDrawDomainBubbleData"](area.anchor, area.bubbles);
            }
        }
    });
  </script>
"#,
    );
    scripts.push_str("</body>\n");
    scripts.push_str("</html>\n");

    scripts
}

fn asset_href(options: &PageOptions, name: &str) -> String {
    if options.assets_subdir.is_empty() {
        escape_html(name)
    } else {
        escape_html(&format!("{}/{}", options.assets_subdir, name))
    }
}

/// Generate `data.js`: the grouped dataset assigned to the global `data`.
pub fn generate_data_js(dataset: &MergedDataset) -> Result<String, serde_json::Error> {
    let entries = dataset.record_entries();

    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b" "));
    entries.serialize(&mut serializer)?;

    let mut output = String::from("var data = ");
    output.push_str(&String::from_utf8_lossy(&buffer));
    output.push_str(";\n");

    Ok(output)
}

/// Escape text for use in HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
