//! SVG templates rendered with minijinja.
//!
//! Every CSV column is a template variable: `{{ city }}`, `{{ city|upper }}`
//! and `{% if state %}...{% endif %}` all work. Looking up a variable that is
//! not a column is an error, and values are XML-escaped unless they are
//! marked safe.

use minijinja::value::Value;
use minijinja::{escape_formatter, AutoEscape, Environment, Output, State, UndefinedBehavior};
use std::collections::BTreeMap;
use std::fmt::Write;
use std::fs;
use std::path::Path;

use crate::csv::Record;
use crate::error::{Error, Result};

/// Name of the auto-escape mode applied to every template.
const XML: &str = "xml";

/// Functions minijinja provides, reported as undeclared variables.
const BUILTIN_GLOBALS: &[&str] = &["range", "dict", "namespace", "debug"];

/// A compiled template.
#[derive(Debug)]
pub struct Template {
    pub name: String,
    env: Environment<'static>,
}

impl Template {
    /// Compiles `source`, reporting syntax errors with their line.
    pub fn parse(name: &str, source: &str) -> Result<Self> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        env.set_auto_escape_callback(|_| AutoEscape::Custom(XML));
        env.set_formatter(xml_formatter);
        env.add_template_owned(name.to_string(), source.to_string())
            .map_err(|e| Error::TemplateSyntax {
                line: e.line().unwrap_or(1),
                reason: e
                    .detail()
                    .map(str::to_string)
                    .unwrap_or_else(|| e.kind().to_string()),
            })?;

        Ok(Template {
            name: name.to_string(),
            env,
        })
    }

    /// Loads and compiles a template file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| Error::InvalidTemplatePath(path.to_path_buf()))?;
        Template::parse(&name, &source)
    }

    /// Variables the template reads from its context, sorted.
    pub fn placeholders(&self) -> Result<Vec<String>> {
        let tmpl = self.env.get_template(&self.name)?;
        let mut names: Vec<String> = tmpl
            .undeclared_variables(false)
            .into_iter()
            .filter(|n| !BUILTIN_GLOBALS.contains(&n.as_str()))
            .collect();
        names.sort();
        Ok(names)
    }

    /// Placeholders with no column among `headers`.
    pub fn unresolved(&self, headers: &[String]) -> Result<Vec<String>> {
        Ok(self
            .placeholders()?
            .into_iter()
            .filter(|p| !headers.iter().any(|h| h == p))
            .collect())
    }

    /// Renders the template with the record's columns as variables.
    ///
    /// With `escape`, values are XML-escaped so that data such as `R&D`
    /// keeps the document well-formed.
    pub fn render(&self, record: &Record, escape: bool) -> Result<String> {
        let columns: Vec<String> = record.fields.iter().map(|(k, _)| k.clone()).collect();
        let missing = self.unresolved(&columns)?;
        if !missing.is_empty() {
            return Err(Error::UnresolvedPlaceholders {
                names: missing,
                template: self.name.clone().into(),
            });
        }

        let mut context: BTreeMap<&str, Value> = BTreeMap::new();
        for (column, value) in &record.fields {
            let value = if escape {
                Value::from(value.as_str())
            } else {
                Value::from_safe_string(value.clone())
            };
            // Duplicate columns resolve to their first occurrence.
            context.entry(column.as_str()).or_insert(value);
        }

        let tmpl = self.env.get_template(&self.name)?;
        Ok(tmpl.render(context)?)
    }
}

fn xml_formatter(
    out: &mut Output<'_>,
    state: &State<'_, '_>,
    value: &Value,
) -> std::result::Result<(), minijinja::Error> {
    if !matches!(state.auto_escape(), AutoEscape::Custom(XML)) {
        return escape_formatter(out, state, value);
    }
    let text = value.to_string();
    if value.is_safe() {
        out.write_str(&text)?;
    } else {
        out.write_str(&xml_escape(&text))?;
    }
    Ok(())
}

/// Escape special XML characters
pub fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Renders a template string against a single record, escaping values.
pub fn render_record(template: &str, record: &Record) -> Result<String> {
    Template::parse("template", template)?.render(record, true)
}

/// Renders a template file against a single record, escaping values.
pub fn render_record_from_file(svg_template: &Path, record: &Record) -> Result<String> {
    Template::from_file(svg_template)?.render(record, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> Record {
        Record::new(
            1,
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_render_record() {
        let rec = record(&[("city", "Austin")]);
        assert_eq!(render_record("This is {{city}}.", &rec).unwrap(), "This is Austin.");
        assert_eq!(render_record("{{ city }}!", &rec).unwrap(), "Austin!");
    }

    #[test]
    fn test_render_record_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("label.svg");
        fs::write(&path, "<text>{{city}}</text>\n").unwrap();

        let rec = record(&[("city", "Austin")]);
        assert_eq!(
            render_record_from_file(&path, &rec).unwrap(),
            "<text>Austin</text>\n"
        );
    }

    #[test]
    fn test_filters_and_blocks() {
        let rec = record(&[("city", "Austin"), ("state", "")]);
        let source = "<text>{{ city|upper }}{% if state %}, {{ state }}{% endif %}</text>";
        assert_eq!(render_record(source, &rec).unwrap(), "<text>AUSTIN</text>");
    }

    #[test]
    fn test_placeholders() {
        let tmpl = Template::parse(
            "t",
            "{{ b }} {{ a|lower }} {% if c %}{{ b }}{% endif %} {% for i in range(2) %}{{ i }}{% endfor %}",
        )
        .unwrap();
        assert_eq!(tmpl.placeholders().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_unresolved() {
        let tmpl = Template::parse("t", "<text>{{name}} {{score}}</text>").unwrap();
        let headers = vec!["name".to_string(), "extra".to_string()];
        assert_eq!(tmpl.unresolved(&headers).unwrap(), vec!["score"]);
    }

    #[test]
    fn test_escape() {
        let rec = record(&[("org", "R&D <Lab>")]);
        let tmpl = Template::parse("t", "<text>{{org}}</text>").unwrap();
        assert_eq!(
            tmpl.render(&rec, true).unwrap(),
            "<text>R&amp;D &lt;Lab&gt;</text>"
        );
        assert_eq!(tmpl.render(&rec, false).unwrap(), "<text>R&D <Lab></text>");

        let tmpl = Template::parse("t", "{{ org|safe }}").unwrap();
        assert_eq!(tmpl.render(&rec, true).unwrap(), "R&D <Lab>");
    }

    #[test]
    fn test_missing_value_is_an_error() {
        let tmpl = Template::parse("card.svg", "{{a}}{{b}}{{b}}").unwrap();
        let err = tmpl.render(&record(&[("a", "1")]), true).unwrap_err();
        match err {
            Error::UnresolvedPlaceholders { names, .. } => assert_eq!(names, vec!["b"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_syntax_errors_report_line() {
        let err = Template::parse("t", "<svg>\n<text>{% if name %}</text>\n</svg>").unwrap_err();
        assert!(matches!(err, Error::TemplateSyntax { .. }));

        let err = Template::parse("t", "a\nb\n{{  }}").unwrap_err();
        assert!(matches!(err, Error::TemplateSyntax { line: 3, .. }));
    }

    #[test]
    fn test_css_braces_are_kept() {
        let rec = record(&[("v", "x")]);
        let source = "<style>a{fill:red}</style>{{v}}";
        assert_eq!(render_record(source, &rec).unwrap(), "<style>a{fill:red}</style>x");
    }
}
