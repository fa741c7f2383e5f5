//! A small builder for HTML and XML documents.

use std::fmt::{self, Write};

use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(HtmlElement),
    /// Text, escaped when rendered.
    Text(String),
    /// Markup inserted verbatim.
    Raw(String),
}

impl From<HtmlElement> for Node {
    fn from(value: HtmlElement) -> Self {
        Self::Element(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlElement {
    pub tag_name: String,
    pub attrs: IndexMap<String, String>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Syntax {
    Html,
    Xml,
}

impl HtmlElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag_name: tag.into(),
            attrs: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Sets the given attribute, or removes it when `value` is `None`.
    pub fn attr<V>(mut self, name: impl Into<String>, value: impl Into<Option<V>>) -> Self
    where
        V: Into<String>,
    {
        let name = name.into();
        match value.into() {
            Some(value) => {
                *self.attrs.entry(name).or_default() = value.into();
            }
            None => {
                self.attrs.shift_remove(&name);
            }
        }

        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<N>(mut self, children: impl IntoIterator<Item = N>) -> Self
    where
        N: Into<Node>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    /// Appends markup that is inserted without escaping.
    pub fn raw(self, markup: impl Into<String>) -> Self {
        self.child(Node::Raw(markup.into()))
    }

    /// Renders the element as HTML.
    pub fn render_to_string(&self) -> Result<String, fmt::Error> {
        let mut output = String::new();

        if self.tag_name == "html" {
            write!(&mut output, "<!DOCTYPE html>")?;
        }

        self.write_to(&mut output, Syntax::Html)?;

        Ok(output)
    }

    /// Renders the element as an XML document, with a prolog.
    pub fn render_to_xml(&self) -> Result<String, fmt::Error> {
        let mut output = String::new();

        writeln!(&mut output, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        self.write_to(&mut output, Syntax::Xml)?;

        Ok(output)
    }

    fn write_to(&self, output: &mut String, syntax: Syntax) -> fmt::Result {
        write!(output, "<{}", self.tag_name)?;

        for (name, value) in &self.attrs {
            write!(output, r#" {name}="{}""#, escape(value))?;
        }

        match syntax {
            Syntax::Html if is_void(&self.tag_name) => return write!(output, ">"),
            Syntax::Xml if self.children.is_empty() => return write!(output, "/>"),
            _ => write!(output, ">")?,
        }

        for child in &self.children {
            match child {
                Node::Element(element) => element.write_to(output, syntax)?,
                Node::Text(text) => write!(output, "{}", escape(text))?,
                Node::Raw(markup) => write!(output, "{markup}")?,
            }
        }

        write!(output, "</{}>", self.tag_name)
    }
}

impl HtmlElement {
    pub fn id<V>(self, id: impl Into<Option<V>>) -> Self
    where
        V: Into<String>,
    {
        self.attr("id", id)
    }

    pub fn class<V>(self, class: impl Into<Option<V>>) -> Self
    where
        V: Into<String>,
    {
        self.attr("class", class)
    }

    pub fn title<V>(self, title: impl Into<Option<V>>) -> Self
    where
        V: Into<String>,
    {
        self.attr("title", title)
    }

    pub fn href(self, href: impl Into<String>) -> Self {
        self.attr("href", href.into())
    }

    pub fn src(self, src: impl Into<String>) -> Self {
        self.attr("src", src.into())
    }

    pub fn alt(self, alt: impl Into<String>) -> Self {
        self.attr("alt", alt.into())
    }

    pub fn lang(self, lang: impl Into<String>) -> Self {
        self.attr("lang", lang.into())
    }

    pub fn rel(self, rel: impl Into<String>) -> Self {
        self.attr("rel", rel.into())
    }
}

/// Escapes text for use in HTML or XML text and attribute values.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            ch => escaped.push(ch),
        }
    }

    escaped
}

fn is_void(tag_name: &str) -> bool {
    matches!(
        tag_name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

macro_rules! elements {
    ($($name:ident),*) => {
        $(
            pub fn $name() -> HtmlElement {
                HtmlElement::new(stringify!($name))
            }
        )*
    }
}

elements! {
    html, head, body, title, meta, link, style,
    header, main, nav, footer, section, article, aside, div, span,
    h1, h2, h3, p, a, ul, li, img, time, form, input, button
}
