//! Field extraction over parsed HTML.
//!
//! The result pages mark every value cell with a CSS class and a `headers`
//! attribute pointing at its column header, e.g.
//! `<td class="cislo" headers="sa2">1&nbsp;205</td>`. A [`FieldSelector`]
//! captures one such (tag, class, attributes) constraint and yields the text
//! of every matching node in document order.

use scraper::{Html, Selector};

/// A tag plus class/attribute constraints, compiled to a CSS [`Selector`].
///
/// # Examples
///
/// ```
/// use election_scraper::extract::FieldSelector;
/// use scraper::Html;
///
/// let doc = Html::parse_fragment(r#"<table><tr><td class="cislo" headers="sa2">1&nbsp;205</td></tr></table>"#);
/// let voters = FieldSelector::new("td").class("cislo").attr("headers", "sa2").build().unwrap();
/// assert_eq!(voters.first(&doc).as_deref(), Some("1\u{a0}205"));
/// ```
#[derive(Debug, Clone)]
pub struct FieldSelector {
    css: String,
    selector: Selector,
}

/// Builder for [`FieldSelector`].
#[derive(Debug, Clone)]
pub struct FieldSelectorBuilder {
    tag: String,
    classes: Vec<String>,
    attrs: Vec<(String, String)>,
}

impl FieldSelector {
    /// Start a selector for elements named `tag`.
    pub fn new(tag: &str) -> FieldSelectorBuilder {
        FieldSelectorBuilder {
            tag: tag.to_string(),
            classes: Vec::new(),
            attrs: Vec::new(),
        }
    }

    /// The CSS this selector was compiled from.
    pub fn css(&self) -> &str {
        &self.css
    }

    /// Trimmed text of every matching node, lazily, in document order.
    pub fn texts<'a>(&'a self, document: &'a Html) -> impl Iterator<Item = String> + 'a {
        document
            .select(&self.selector)
            .map(|el| el.text().collect::<String>().trim().to_string())
    }

    /// Text of the first matching node.
    pub fn first(&self, document: &Html) -> Option<String> {
        self.texts(document).next()
    }
}

impl FieldSelectorBuilder {
    /// Require a class on the element.
    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    /// Require an attribute with an exact value.
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    /// Compile the constraints. Fails only on malformed tag/class/attribute names.
    pub fn build(self) -> Result<FieldSelector, String> {
        let mut css = self.tag;
        for class in &self.classes {
            css.push('.');
            css.push_str(class);
        }
        for (name, value) in &self.attrs {
            css.push_str(&format!("[{}=\"{}\"]", name, value.replace('"', "\\\"")));
        }
        let selector =
            Selector::parse(&css).map_err(|e| format!("invalid selector `{}`: {}", css, e))?;
        Ok(FieldSelector { css, selector })
    }
}

/// Remove thousands separators from a numeric cell.
///
/// The site groups digits with non-breaking spaces (`1&nbsp;205`); plain
/// spaces and narrow no-break spaces also occur. Every whitespace character
/// is dropped so the result holds only the digits (and any decimal comma).
pub fn strip_separators(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
