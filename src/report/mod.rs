//! Human-readable renderings of the record cache.

pub mod template;

pub use template::{Field, FieldValue, Markup, ReportTemplate, Transform};

use crate::collector::RecordStore;
use crate::error::CollectorResult;

pub const HTML_REPORT_TITLE: &str = "Detected apps, add-ons, and versions";
pub const STATE_REPORT_TITLE: &str = "Cache report";
pub const COPIED_MESSAGE: &str = "Application version report copied.";

const HTML_STYLE: &str = "<style>
table {
table-layout: auto;
width: 100%;
border-collapse: separate;
border-spacing: 80px 0;
border-left: 100px solid transparent;
}
td, th{
padding: 10px 0;
}
tr td:first-child {padding-left:0px;}
tr td:last-child { margin-right: 0; }
</style>
";

/// Renders the cache partitions as the clipboard text report or the browseable HTML one.
pub struct Reporter {
    apps: ReportTemplate,
    addons: ReportTemplate,
    host_name: String,
}

impl Reporter {
    pub fn new(host_name: impl Into<String>) -> Self {
        Self::with_templates(host_name, ReportTemplate::apps(), ReportTemplate::addons())
    }

    pub fn with_templates(
        host_name: impl Into<String>,
        apps: ReportTemplate,
        addons: ReportTemplate,
    ) -> Self {
        Self {
            apps,
            addons,
            host_name: host_name.into(),
        }
    }

    pub fn text_report(&self, store: &RecordStore) -> CollectorResult<String> {
        let mut output = String::from("Applications:\n");
        output.push_str(&self.apps.render_rows(store.apps(), Markup::Text)?);
        output.push_str(&format!("\n{} Add-ons:\n", self.host_name));
        output.push_str(&self.addons.render_rows(store.addons(), Markup::Text)?);
        Ok(output)
    }

    pub fn html_report(&self, store: &RecordStore) -> CollectorResult<String> {
        let mut output = String::from(HTML_STYLE);
        output.push_str("<p>Use shift+arrow keys to select, ctrl+c to copy to clipboard.");
        output.push_str("</p>\n<br><h1>Detected Applications:</h1>\n<table>\n");
        output.push_str(
            "<tr><TH>&nbsp;</TH> <TH>NAME</TH> <TH>VERSION</TH> <TH>BITNESS</TH> </tr>\n",
        );
        output.push_str(&self.apps.render_rows(store.apps(), Markup::Html)?);
        output.push_str(&format!(
            "</table><br>\n<h1>Detected {} Add-ons:</h1>\n<table>\n",
            self.host_name
        ));
        output.push_str(
            "<tr><TH>&nbsp;</TH><TH>NAME</TH> <TH>VERSION</TH> <TH>STATUS</TH> \
             <TH>AUTHOR/PUBLISHER</TH> <TH>Add-on ID</TH></tr>\n",
        );
        output.push_str(&self.addons.render_rows(store.addons(), Markup::Html)?);
        output.push_str("</table><br>\n<p>Press escape when done.</p>");
        Ok(output)
    }
}

/// Debug view of everything the cache holds, dirty flags included.
pub fn state_dump(store: &RecordStore, message: Option<&str>) -> String {
    let dirty = |flag: bool| if flag { "" } else { "not " };

    let records: Vec<String> = store
        .iter()
        .map(|record| {
            format!(
                "{}:\nis64bit: {}\nVersion: {}\nIs Addon: {}\nFirst seen: {}\nLast seen: {}",
                record.name,
                Field::Is64Bit.value(record).map(|v| v.render()).unwrap_or_default(),
                record.version.as_deref().unwrap_or("unknown"),
                record.is_addon,
                record
                    .first_seen
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "never".to_string()),
                record.last_seen.to_rfc3339(),
            )
        })
        .collect();

    [
        message.unwrap_or_default().to_string(),
        format!("The dates are {}dirty.", dirty(store.timestamps_dirty())),
        format!("The cache is {}dirty.", dirty(store.records_dirty())),
        "\nThe cache contains:\n".to_string(),
        records.join("\n"),
    ]
    .join("\n")
}
