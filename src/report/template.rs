//! Row templating for the version report.
//!
//! A [`ReportTemplate`] picks which [`Field`]s of a record appear in a row and
//! how each one is rendered. Fields are always emitted in [`Field::ALL`] order.

use std::collections::{HashMap, HashSet};

use crate::error::CollectorResult;
use crate::models::{AddonExtra, ApplicationRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Version,
    Is64Bit,
    IsAddon,
    IsAddonEnabled,
    Extra,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Name,
        Field::Version,
        Field::Is64Bit,
        Field::IsAddon,
        Field::IsAddonEnabled,
        Field::Extra,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Version => "version",
            Field::Is64Bit => "is64bit",
            Field::IsAddon => "isAddon",
            Field::IsAddonEnabled => "isAddonEnabled",
            Field::Extra => "extra",
        }
    }

    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|field| field.key() == key)
    }

    /// Read this field from `record`.
    ///
    /// Fails for `IsAddonEnabled` on anything that is not an add-on.
    pub fn value<'a>(&self, record: &'a ApplicationRecord) -> CollectorResult<FieldValue<'a>> {
        Ok(match self {
            Field::Name => FieldValue::Text(&record.name),
            Field::Version => FieldValue::Version(record.version.as_deref()),
            Field::Is64Bit => FieldValue::Bitness(record.is_native_width_64),
            Field::IsAddon => FieldValue::Flag(record.is_addon),
            Field::IsAddonEnabled => FieldValue::Flag(record.is_addon_enabled()?),
            Field::Extra => FieldValue::Extra(record.extra.as_ref()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Version(Option<&'a str>),
    Bitness(Option<bool>),
    Flag(bool),
    Extra(Option<&'a AddonExtra>),
}

impl FieldValue<'_> {
    /// The plain rendering used when a template has no transform for a field.
    pub fn render(&self) -> String {
        match self {
            FieldValue::Text(text) => text.to_string(),
            FieldValue::Version(version) => version.unwrap_or("unknown").to_string(),
            FieldValue::Bitness(Some(true)) => "64 bit".to_string(),
            FieldValue::Bitness(Some(false)) => "32 bit".to_string(),
            FieldValue::Bitness(None) => "unknown".to_string(),
            FieldValue::Flag(flag) => flag.to_string(),
            FieldValue::Extra(Some(extra)) => format!("{} ({})", extra.author, extra.internal_id),
            FieldValue::Extra(None) => String::new(),
        }
    }
}

/// Renders one field value into zero or more cells.
pub type Transform = fn(&FieldValue<'_>) -> Vec<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Markup {
    Text,
    Html,
}

impl Markup {
    fn line_start(&self) -> &'static str {
        match self {
            Markup::Text => "- ",
            Markup::Html => "<tr><TD>&#8611;</TD>",
        }
    }

    fn field_start(&self) -> &'static str {
        match self {
            Markup::Text => "",
            Markup::Html => "<td>",
        }
    }

    fn field_end(&self) -> &'static str {
        match self {
            Markup::Text => "\t",
            Markup::Html => "</td>",
        }
    }

    fn line_end(&self) -> &'static str {
        match self {
            Markup::Text => "\n",
            Markup::Html => "</tr>\n",
        }
    }

    fn cell(&self, raw: &str) -> String {
        match self {
            Markup::Text => raw.to_string(),
            Markup::Html => escape_html(raw),
        }
    }
}

#[derive(Clone, Default)]
pub struct ReportTemplate {
    hidden: HashSet<Field>,
    transforms: HashMap<Field, Transform>,
}

impl ReportTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hide(mut self, field: Field) -> Self {
        self.hidden.insert(field);
        self
    }

    pub fn transform(mut self, field: Field, transform: Transform) -> Self {
        self.transforms.insert(field, transform);
        self
    }

    /// Name, version and bitness of plain applications.
    pub fn apps() -> Self {
        Self::new()
            .hide(Field::IsAddon)
            .hide(Field::IsAddonEnabled)
            .hide(Field::Extra)
            .transform(Field::Is64Bit, bitness_label)
    }

    /// Name, version, status, author and internal id of add-ons.
    pub fn addons() -> Self {
        Self::new()
            .hide(Field::IsAddon)
            .hide(Field::Is64Bit)
            .transform(Field::IsAddonEnabled, enabled_label)
            .transform(Field::Extra, addon_details)
    }

    pub fn is_visible(&self, field: Field) -> bool {
        !self.hidden.contains(&field)
    }

    /// Cells for one record, before markup is applied.
    pub fn cells(&self, record: &ApplicationRecord) -> CollectorResult<Vec<String>> {
        let mut cells = Vec::new();
        for field in Field::ALL.into_iter().filter(|f| self.is_visible(*f)) {
            let value = field.value(record)?;
            match self.transforms.get(&field) {
                Some(transform) => cells.extend(transform(&value)),
                None => cells.push(value.render()),
            }
        }
        Ok(cells)
    }

    /// One line per record, in iteration order. Records with no cells are skipped.
    pub fn render_rows<'a>(
        &self,
        records: impl IntoIterator<Item = &'a ApplicationRecord>,
        markup: Markup,
    ) -> CollectorResult<String> {
        let mut out = String::new();
        for record in records {
            let cells = self.cells(record)?;
            if cells.is_empty() {
                continue;
            }

            out.push_str(markup.line_start());
            for cell in &cells {
                out.push_str(markup.field_start());
                out.push_str(&markup.cell(cell));
                out.push_str(markup.field_end());
            }
            out.push_str(markup.line_end());
        }
        Ok(out)
    }
}

fn bitness_label(value: &FieldValue<'_>) -> Vec<String> {
    let label = match value {
        FieldValue::Bitness(Some(true)) => "[64 bit]",
        FieldValue::Bitness(Some(false)) => "[32 bit]",
        _ => "[unknown bit]",
    };
    vec![label.to_string()]
}

fn enabled_label(value: &FieldValue<'_>) -> Vec<String> {
    let label = match value {
        FieldValue::Flag(true) => "[enabled]",
        _ => "[disabled]",
    };
    vec![label.to_string()]
}

fn addon_details(value: &FieldValue<'_>) -> Vec<String> {
    match value {
        FieldValue::Extra(Some(extra)) => {
            vec![extra.author.clone(), format!("({})", extra.internal_id)]
        }
        _ => vec![String::new(), String::new()],
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CollectorError;
    use chrono::Utc;

    fn notepad() -> ApplicationRecord {
        ApplicationRecord::application("Notepad", Some("1.0".into()), Some(true), Utc::now())
    }

    fn clip_contents() -> ApplicationRecord {
        ApplicationRecord::addon(
            "Clip Contents Designer",
            Some("4.1".into()),
            AddonExtra {
                internal_id: "clipContentsDesigner".into(),
                author: "Noelia Ruiz".into(),
                enabled: false,
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_field_keys_round_trip() {
        assert_eq!(Field::from_key("is64bit"), Some(Field::Is64Bit));
        assert_eq!(Field::from_key("isAddonEnabled"), Some(Field::IsAddonEnabled));
        assert_eq!(Field::from_key("lastSeen"), None);
    }

    #[test]
    fn test_apps_template_text_row() {
        let rows = ReportTemplate::apps()
            .render_rows([&notepad()], Markup::Text)
            .unwrap();

        assert_eq!(rows, "- Notepad\t1.0\t[64 bit]\t\n");
    }

    #[test]
    fn test_apps_template_unknown_values() {
        let record = ApplicationRecord::application("Code", None, None, Utc::now());

        let cells = ReportTemplate::apps().cells(&record).unwrap();

        assert_eq!(cells, vec!["Code", "unknown", "[unknown bit]"]);
    }

    #[test]
    fn test_addons_template_expands_extra() {
        let cells = ReportTemplate::addons().cells(&clip_contents()).unwrap();

        assert_eq!(
            cells,
            vec![
                "Clip Contents Designer",
                "4.1",
                "[disabled]",
                "Noelia Ruiz",
                "(clipContentsDesigner)"
            ]
        );
    }

    #[test]
    fn test_html_rows_escape_values() {
        let record = ApplicationRecord::application("Tom & Jerry <beta>", None, Some(false), Utc::now());

        let rows = ReportTemplate::apps()
            .render_rows([&record], Markup::Html)
            .unwrap();

        assert_eq!(
            rows,
            "<tr><TD>&#8611;</TD><td>Tom &amp; Jerry &lt;beta&gt;</td><td>unknown</td><td>[32 bit]</td></tr>\n"
        );
    }

    #[test]
    fn test_fully_hidden_template_emits_nothing() {
        let template = Field::ALL
            .into_iter()
            .fold(ReportTemplate::new(), |template, field| template.hide(field));

        let rows = template.render_rows([&notepad()], Markup::Text).unwrap();

        assert!(rows.is_empty());
    }

    #[test]
    fn test_addon_field_on_app_fails() {
        let err = ReportTemplate::addons().cells(&notepad()).unwrap_err();
        assert!(matches!(err, CollectorError::InvalidAccessor { field: "isAddonEnabled", .. }));
    }

    #[test]
    fn test_untransformed_template_uses_plain_rendering() {
        let cells = ReportTemplate::new().cells(&clip_contents()).unwrap();

        assert_eq!(
            cells,
            vec![
                "Clip Contents Designer",
                "4.1",
                "32 bit",
                "true",
                "false",
                "Noelia Ruiz (clipContentsDesigner)"
            ]
        );
    }
}
