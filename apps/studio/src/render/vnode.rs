use serde::Serialize;

/// Virtual document node. Attributes and styles keep insertion order so the
/// serialised markup is stable across renders of the same state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum VNode {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
        styles: Vec<(String, String)>,
        children: Vec<VNode>,
    },

    Text {
        content: String,
    },

    /// Markup emitted verbatim. Only freeform documents produce these.
    Raw {
        markup: String,
    },

    Comment {
        content: String,
    },
}

fn upsert(pairs: &mut Vec<(String, String)>, key: String, value: String) {
    match pairs.iter_mut().find(|(k, _)| *k == key) {
        Some((_, existing)) => *existing = value,
        None => pairs.push((key, value)),
    }
}

impl VNode {
    pub fn element(tag: impl Into<String>) -> Self {
        VNode::Element {
            tag: tag.into(),
            attributes: Vec::new(),
            styles: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        VNode::Text {
            content: content.into(),
        }
    }

    pub fn raw(markup: impl Into<String>) -> Self {
        VNode::Raw {
            markup: markup.into(),
        }
    }

    pub fn comment(content: impl Into<String>) -> Self {
        VNode::Comment {
            content: content.into(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNode::Element {
            ref mut attributes, ..
        } = self
        {
            upsert(attributes, key.into(), value.into());
        }
        self
    }

    pub fn with_class(self, class: &str) -> Self {
        let merged = match self.attr("class") {
            Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.with_attr("class", merged)
    }

    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNode::Element { ref mut styles, .. } = self {
            upsert(styles, key.into(), value.into());
        }
        self
    }

    pub fn with_child(mut self, child: VNode) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.push(child);
        }
        self
    }

    pub fn with_children(mut self, new_children: impl IntoIterator<Item = VNode>) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.extend(new_children);
        }
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        match self {
            VNode::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    pub fn children(&self) -> &[VNode] {
        match self {
            VNode::Element { children, .. } => children,
            _ => &[],
        }
    }

    /// Serialises the node and its subtree.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    /// Serialises only the children, i.e. the element's inner markup.
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for child in self.children() {
            child.write_html(&mut out);
        }
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            VNode::Element {
                tag,
                attributes,
                styles,
                children,
            } => {
                out.push('<');
                out.push_str(tag);
                for (key, value) in attributes {
                    out.push(' ');
                    out.push_str(key);
                    out.push_str("=\"");
                    out.push_str(&escape_html(value));
                    out.push('"');
                }
                if !styles.is_empty() {
                    let inline: Vec<String> =
                        styles.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                    out.push_str(" style=\"");
                    out.push_str(&escape_html(&inline.join("; ")));
                    out.push('"');
                }
                if children.is_empty() && is_void(tag) {
                    out.push_str(" />");
                    return;
                }
                out.push('>');
                for child in children {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
            VNode::Text { content } => out.push_str(&escape_html(content)),
            VNode::Raw { markup } => out.push_str(markup),
            VNode::Comment { content } => {
                out.push_str("<!-- ");
                out.push_str(&content.replace("--", "- -"));
                out.push_str(" -->");
            }
        }
    }
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn is_void(tag: &str) -> bool {
    matches!(tag, "img" | "br" | "hr" | "meta" | "link" | "input")
}
