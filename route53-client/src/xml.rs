//! Minimal XML tree used for request bodies and response documents
//!
//! Request bodies are built as an explicit [`XmlElement`] tree and serialized
//! immediately; responses are parsed into the same tree type and queried by
//! relative path (`"HostedZones/HostedZone"`). Elements are matched by local
//! name, namespaces are carried but never used for lookup.

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::{Result, Route53Error};

/// One element: tag, optional default namespace, text and ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    name: String,
    namespace: Option<String>,
    text: Option<String>,
    children: Vec<XmlElement>,
}

impl XmlElement {
    /// Creates an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Creates a leaf element holding `text`.
    pub fn leaf(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name).with_text(text)
    }

    /// Sets the default namespace (`xmlns`) of this element.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Sets the text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Appends one child.
    #[must_use]
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Appends children in iteration order.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = XmlElement>) -> Self {
        self.children.extend(children);
        self
    }

    /// Local tag name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Default namespace in scope for this element, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Text content, if the element had any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Child elements in document order.
    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// First element matching the relative `path`.
    pub fn find(&self, path: &str) -> Option<&XmlElement> {
        self.iterfind(path).into_iter().next()
    }

    /// All elements matching the relative `path`, in document order.
    pub fn iterfind(&self, path: &str) -> Vec<&XmlElement> {
        let mut current = vec![self];
        for step in path_steps(path) {
            current = current
                .into_iter()
                .flat_map(move |element| {
                    element.children.iter().filter(move |c| c.name == step)
                })
                .collect();
        }
        current
    }

    /// Text of the element at `path`; missing element or text is a malformed response.
    pub fn child_text(&self, path: &str) -> Result<&str> {
        let child = self.find(path).ok_or_else(|| {
            Route53Error::malformed_response(format!("<{}> has no <{path}> element", self.name))
        })?;
        child.text().ok_or_else(|| {
            Route53Error::malformed_response(format!("<{path}> in <{}> has no text", self.name))
        })
    }

    /// Checks the local name of a document root.
    pub fn expect_root(&self, name: &str) -> Result<&Self> {
        if self.name == name {
            Ok(self)
        } else {
            Err(Route53Error::malformed_response(format!(
                "expected <{name}> document, found <{}>",
                self.name
            )))
        }
    }

    /// Serializes the tree as a UTF-8 document with an XML declaration.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(serialization_error)?;
        self.write_to(&mut writer, None)?;
        Ok(writer.into_inner())
    }

    fn write_to(&self, writer: &mut Writer<Vec<u8>>, inherited: Option<&str>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        let namespace = self.namespace.as_deref().or(inherited);
        if let Some(ns) = self.namespace.as_deref()
            && inherited != Some(ns)
        {
            start.push_attribute(("xmlns", ns));
        }

        writer
            .write_event(Event::Start(start))
            .map_err(serialization_error)?;
        if let Some(text) = &self.text {
            writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(serialization_error)?;
        }
        for child in &self.children {
            child.write_to(writer, namespace)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(self.name.as_str())))
            .map_err(serialization_error)?;
        Ok(())
    }

    /// Parses a complete document and returns its root element.
    pub fn parse(bytes: &[u8]) -> Result<XmlElement> {
        let source = std::str::from_utf8(bytes)
            .map_err(|e| Route53Error::malformed_response(format!("body is not UTF-8: {e}")))?;

        let mut reader = Reader::from_str(source);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event().map_err(parse_error)? {
                Event::Start(start) => {
                    let element = open_element(&start, stack.last())?;
                    stack.push(element);
                }
                Event::Empty(start) => {
                    let element = open_element(&start, stack.last())?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    let text = text.unescape().map_err(parse_error)?;
                    append_text(stack.last_mut(), &text);
                }
                Event::CData(data) => {
                    let data = data.into_inner();
                    append_text(stack.last_mut(), &String::from_utf8_lossy(&data));
                }
                Event::End(_) => {
                    let element = stack.pop().ok_or_else(|| {
                        Route53Error::malformed_response("unbalanced closing tag")
                    })?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(Route53Error::malformed_response(format!(
                "unclosed element <{}>",
                open.name
            )));
        }
        root.ok_or_else(|| Route53Error::malformed_response("document has no root element"))
    }
}

fn path_steps(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|step| !step.is_empty() && *step != ".")
}

fn open_element(start: &BytesStart<'_>, parent: Option<&XmlElement>) -> Result<XmlElement> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut namespace = parent.and_then(|p| p.namespace.clone());

    for attr in start.attributes() {
        let attr = attr.map_err(parse_error)?;
        if attr.key.as_ref() == b"xmlns" {
            namespace = Some(attr.unescape_value().map_err(parse_error)?.into_owned());
        }
    }

    Ok(XmlElement {
        name,
        namespace,
        text: None,
        children: Vec::new(),
    })
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        Ok(())
    } else if root.is_none() {
        *root = Some(element);
        Ok(())
    } else {
        Err(Route53Error::malformed_response(
            "document has more than one root element",
        ))
    }
}

fn append_text(element: Option<&mut XmlElement>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(element) = element {
        element.text.get_or_insert_with(String::new).push_str(text);
    }
}

fn parse_error(e: impl std::fmt::Display) -> Route53Error {
    Route53Error::malformed_response(format!("invalid XML: {e}"))
}

fn serialization_error(e: impl std::fmt::Display) -> Route53Error {
    Route53Error::SerializationError {
        detail: e.to_string(),
    }
}
