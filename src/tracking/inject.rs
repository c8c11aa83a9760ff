//! Head-injection descriptor and the page-head collaborator trait.

use std::collections::BTreeMap;

use serde::Serialize;

use super::attributes::AttrValue;

/// Declarative external script handed to the page head.
///
/// Built only from fields that passed the allow-list checks; nothing from
/// the raw pasted text reaches it directly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScriptResource {
    pub src: String,
    #[serde(rename = "async")]
    pub async_: bool,
    pub defer: bool,
    #[serde(flatten)]
    pub attributes: BTreeMap<&'static str, AttrValue>,
}

impl ScriptResource {
    /// Renders the resource as a `<script>` element for server-side output.
    /// All attribute values are escaped.
    pub fn to_html(&self) -> String {
        let mut out = String::from("<script");
        push_attr(&mut out, "src", &self.src);
        if self.async_ {
            out.push_str(" async");
        }
        if self.defer {
            out.push_str(" defer");
        }
        for (name, value) in &self.attributes {
            match value {
                AttrValue::Text(text) => push_attr(&mut out, name, text),
                AttrValue::Flag(true) => {
                    out.push(' ');
                    out.push_str(name);
                }
                AttrValue::Flag(false) => {}
            }
        }
        out.push_str("></script>");
        out
    }
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out.push('"');
}

/// Page-head manager that loads external scripts.
///
/// Implement this to bridge into whatever renders the document head.
pub trait HeadSink {
    /// Register one external script for loading.
    fn register_script(&mut self, script: ScriptResource);
}

/// In-memory [`HeadSink`] that records every registered script.
#[derive(Clone, Debug, Default)]
pub struct HeadScripts {
    scripts: Vec<ScriptResource>,
}

impl HeadScripts {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts in registration order.
    pub fn scripts(&self) -> &[ScriptResource] {
        &self.scripts
    }

    /// `true` if nothing was registered.
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    /// Renders all recorded scripts, one element per line.
    pub fn to_html(&self) -> String {
        self.scripts
            .iter()
            .map(ScriptResource::to_html)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl HeadSink for HeadScripts {
    fn register_script(&mut self, script: ScriptResource) {
        self.scripts.push(script);
    }
}
