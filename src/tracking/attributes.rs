//! Attribute extraction for a single script element.
//!
//! The tag is run through the HTML tokenizer rather than matched with
//! per-attribute patterns, so quoting style, attribute order and whitespace
//! do not matter and `data-src` is never mistaken for `src`.

use std::collections::BTreeMap;

use scraper::Html;
use scraper::node::{Element, Node};
use serde::Serialize;

/// Value of an extracted attribute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    Flag(bool),
    Text(String),
}

impl AttrValue {
    /// The value of a text attribute; `None` for flags.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            AttrValue::Flag(_) => None,
        }
    }
}

/// Attributes that may carry over from a pasted tag. Anything else is dropped.
pub const SAFE_ATTRIBUTES: &[&str] = &[
    "defer",
    "async",
    "type",
    "crossorigin",
    "integrity",
    "data-website-id",
    "data-domain",
    "data-api",
    "data-exclude",
    "data-include",
    "data-host-url",
    "data-track-localhost",
];

/// Presence-only attributes: a bare token means `true`.
pub const BOOLEAN_ATTRIBUTES: &[&str] = &["defer", "async"];

/// Tokenized view of one `<script>` opening tag.
pub struct ScriptTag {
    attrs: Vec<(String, String)>,
}

impl ScriptTag {
    /// Tokenizes `tag` and returns its script element's attributes.
    ///
    /// Returns `None` unless the fragment holds exactly one script element.
    pub fn parse(tag: &str) -> Option<Self> {
        let fragment = Html::parse_fragment(tag);
        let mut scripts = script_elements(fragment.tree.root());
        let script = scripts.next()?;
        if scripts.next().is_some() {
            return None;
        }
        let attrs = script
            .attrs()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        Some(Self { attrs })
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// The trimmed, non-empty `src` attribute.
    pub fn src(&self) -> Option<&str> {
        self.get("src").map(str::trim).filter(|s| !s.is_empty())
    }

    /// Copies the allow-listed attributes, dropping everything else.
    pub fn safe_attributes(&self) -> BTreeMap<&'static str, AttrValue> {
        let mut out = BTreeMap::new();
        for &name in SAFE_ATTRIBUTES {
            let Some(value) = self.get(name) else {
                continue;
            };
            if !value.is_empty() {
                out.insert(name, AttrValue::Text(value.to_string()));
            } else if BOOLEAN_ATTRIBUTES.contains(&name) {
                out.insert(name, AttrValue::Flag(true));
            }
        }
        let dropped = self
            .attrs
            .iter()
            .filter(|(k, _)| k != "src" && !SAFE_ATTRIBUTES.contains(&k.as_str()))
            .count();
        if dropped > 0 {
            tracing::debug!("Dropped {dropped} non-allow-listed script attributes");
        }
        out
    }
}

fn script_elements<'a>(
    root: ego_tree::NodeRef<'a, Node>,
) -> impl Iterator<Item = &'a Element> + 'a {
    root.descendants().filter_map(|node| match node.value() {
        Node::Element(el) if el.name() == "script" => Some(el),
        _ => None,
    })
}
