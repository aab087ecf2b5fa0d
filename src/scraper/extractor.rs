/// Where a single output field of [`Extraction::Fields`] comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSource {
    /// Trimmed `innerText` of the matched element
    Text,
    /// An attribute of the matched element
    Attribute(String),
    /// Text (or an attribute) of the first descendant matching `selector`
    Nested {
        selector: String,
        attribute: Option<String>,
    },
}

/// What to pull out of the elements matched by a scrape selector.
///
/// Every form compiles to a JavaScript function of the matched elements that
/// runs inside the page. Only its JSON-serialized result crosses back, so no
/// DOM handle ever reaches the caller. Script functions must be synchronous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// A JS function source taking the element array, e.g. `els => els.map(el => el.id)`
    Script(String),
    /// One attribute value (or `null`) per element
    Attribute(String),
    /// Trimmed `innerText` per element
    Text,
    /// One object per element with the given named fields
    Fields(Vec<(String, FieldSource)>),
}

impl Extraction {
    pub fn script(source: impl Into<String>) -> Self {
        Self::Script(source.into())
    }

    pub fn attribute(name: impl Into<String>) -> Self {
        Self::Attribute(name.into())
    }

    pub fn text() -> Self {
        Self::Text
    }

    pub fn fields<K: Into<String>>(fields: impl IntoIterator<Item = (K, FieldSource)>) -> Self {
        Self::Fields(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// JS function expression applied to the matched element array.
    fn function_source(&self) -> String {
        match self {
            Extraction::Script(source) => source.trim().to_string(),
            Extraction::Attribute(name) => format!(
                "(els) => els.map(el => el.getAttribute({}))",
                js_string(name)
            ),
            Extraction::Text => "(els) => els.map(el => (el.innerText || '').trim())".to_string(),
            Extraction::Fields(fields) => {
                let entries = fields
                    .iter()
                    .map(|(key, source)| format!("{}: {}", js_string(key), field_expr(source)))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("(els) => els.map(el => ({{ {entries} }}))")
            }
        }
    }

    /// Full script evaluated in the page. Returns a JSON string.
    pub fn evaluation_script(&self, selector: &str) -> String {
        let function = self.function_source();
        let selector = js_string(selector);

        format!(
            r#"
            (() => {{
                const extract = ({function});
                const elements = Array.from(document.querySelectorAll({selector}));
                const result = extract(elements);
                return JSON.stringify(result === undefined ? null : result);
            }})()
            "#
        )
    }
}

/// Script that reports whether `selector` currently matches anything.
/// Outcome of one selector presence check inside the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presence {
    Found,
    Missing,
    /// `querySelector` threw, so waiting longer cannot help
    Invalid(String),
}

impl Presence {
    /// Decode the string returned by [`presence_script`].
    pub fn from_report(report: &str) -> Self {
        match report {
            "found" => Presence::Found,
            "missing" => Presence::Missing,
            other => Presence::Invalid(
                other
                    .strip_prefix("invalid:")
                    .unwrap_or(other)
                    .trim()
                    .to_string(),
            ),
        }
    }
}

/// Script reporting `"found"`, `"missing"` or `"invalid:<message>"` for `selector`.
pub fn presence_script(selector: &str) -> String {
    format!(
        r#"(() => {{
  try {{
    return document.querySelector({}) !== null ? "found" : "missing";
  }} catch (e) {{
    return "invalid:" + String(e && e.message || e);
  }}
}})()"#,
        js_string(selector)
    )
}

/// HTTP status of the main document, or 0 when the browser does not expose it.
pub const NAVIGATION_STATUS_SCRIPT: &str = r#"(() => {
  const entry = performance.getEntriesByType('navigation')[0];
  return entry && typeof entry.responseStatus === 'number' ? entry.responseStatus : 0;
})()"#;

fn field_expr(source: &FieldSource) -> String {
    match source {
        FieldSource::Text => "(el.innerText || '').trim()".to_string(),
        FieldSource::Attribute(name) => format!("el.getAttribute({})", js_string(name)),
        FieldSource::Nested { selector, attribute } => {
            let read = match attribute {
                Some(name) => format!("n.getAttribute({})", js_string(name)),
                None => "(n.innerText || '').trim()".to_string(),
            };
            format!(
                "((n) => n ? {read} : null)(el.querySelector({}))",
                js_string(selector)
            )
        }
    }
}

/// Quote a Rust string as a JS string literal.
fn js_string(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_is_embedded_verbatim() {
        let script = Extraction::script("els => els.map(el => el.id)").evaluation_script(".athing");
        assert!(script.contains("const extract = (els => els.map(el => el.id));"));
        assert!(script.contains(r#"document.querySelectorAll(".athing")"#));
        assert!(script.contains("JSON.stringify"));
    }

    #[test]
    fn test_selector_is_escaped() {
        let script = Extraction::text().evaluation_script(r#"meta[property="og:image"]"#);
        assert!(script.contains(r#"querySelectorAll("meta[property=\"og:image\"]")"#));

        let presence = presence_script("a[title='x']");
        assert!(presence.contains(r#"document.querySelector("a[title='x']") !== null"#));
    }

    #[test]
    fn test_presence_report_decoding() {
        assert_eq!(Presence::from_report("found"), Presence::Found);
        assert_eq!(Presence::from_report("missing"), Presence::Missing);
        assert_eq!(
            Presence::from_report("invalid: 'div[' is not a valid selector."),
            Presence::Invalid("'div[' is not a valid selector.".to_string())
        );
    }

    #[test]
    fn test_attribute_extraction() {
        let script = Extraction::attribute("src").evaluation_script("img");
        assert!(script.contains(r#"el.getAttribute("src")"#));
    }

    #[test]
    fn test_fields_extraction() {
        let extraction = Extraction::fields([
            ("id", FieldSource::Attribute("id".into())),
            (
                "title",
                FieldSource::Nested {
                    selector: ".titleline > a".into(),
                    attribute: None,
                },
            ),
            (
                "href",
                FieldSource::Nested {
                    selector: ".titleline > a".into(),
                    attribute: Some("href".into()),
                },
            ),
        ]);
        let script = extraction.evaluation_script(".athing");

        assert!(script.contains(r#""id": el.getAttribute("id")"#));
        assert!(script.contains(r#"el.querySelector(".titleline > a")"#));
        assert!(script.contains(r#"n.getAttribute("href")"#));
    }
}
