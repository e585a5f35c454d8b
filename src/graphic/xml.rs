//! Reading and writing [`Node`] trees with quick-xml.

use std::borrow::Cow;
use std::io::Write;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::error::GraphicError;
use super::node::{Child, Node};

impl Node {
    /// Parse a standalone SVG/XML document. Declarations, comments and
    /// processing instructions are dropped; whitespace-only text is trimmed.
    pub fn parse(source: &str) -> Result<Node, GraphicError> {
        let mut reader = Reader::from_str(source);
        reader.config_mut().trim_text(true);

        let mut open: Vec<Node> = Vec::new();
        let mut root: Option<Node> = None;

        loop {
            let event = reader
                .read_event()
                .map_err(|err| GraphicError::malformed(err.to_string()))?;
            match event {
                Event::Start(start) => open.push(start_node(&start)?),
                Event::Empty(start) => {
                    let node = start_node(&start)?;
                    attach(&mut open, &mut root, node)?;
                }
                Event::End(_) => {
                    let node = open
                        .pop()
                        .ok_or_else(|| GraphicError::malformed("unexpected closing tag"))?;
                    attach(&mut open, &mut root, node)?;
                }
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|err| GraphicError::malformed(err.to_string()))?;
                    push_text(&mut open, text);
                }
                Event::CData(data) => {
                    let bytes = data.into_inner();
                    let text = std::str::from_utf8(&bytes)
                        .map_err(|err| GraphicError::malformed(err.to_string()))?;
                    push_text(&mut open, Cow::Borrowed(text));
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(unclosed) = open.last() {
            return Err(GraphicError::malformed(format!(
                "element <{}> is never closed",
                unclosed.tag()
            )));
        }
        root.ok_or_else(|| GraphicError::malformed("document has no root element"))
    }

    /// Serialize the subtree without an XML declaration, ready to be inlined
    /// into an HTML page.
    pub fn to_svg_string(&self) -> Result<String, GraphicError> {
        let mut writer = Writer::new(Vec::new());
        write_node(&mut writer, self)?;
        String::from_utf8(writer.into_inner())
            .map_err(|err| GraphicError::malformed(err.to_string()))
    }
}

fn start_node(start: &BytesStart<'_>) -> Result<Node, GraphicError> {
    let tag = std::str::from_utf8(start.name().as_ref())
        .map_err(|err| GraphicError::malformed(err.to_string()))?
        .to_owned();
    let mut node = Node::new(tag);
    for attr in start.attributes() {
        let attr = attr.map_err(|err| GraphicError::malformed(err.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|err| GraphicError::malformed(err.to_string()))?
            .to_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| GraphicError::malformed(err.to_string()))?
            .into_owned();
        node.set_attr(key, value);
    }
    Ok(node)
}

fn attach(open: &mut [Node], root: &mut Option<Node>, node: Node) -> Result<(), GraphicError> {
    match open.last_mut() {
        Some(parent) => {
            parent.append(node);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(node);
            Ok(())
        }
        None => Err(GraphicError::malformed("document has more than one root")),
    }
}

fn push_text(open: &mut [Node], text: Cow<'_, str>) {
    if text.is_empty() {
        return;
    }
    // text outside the root element is ignored
    if let Some(parent) = open.last_mut() {
        parent.push_child(Child::Text(text.into_owned()));
    }
}

fn write_node<W: Write>(writer: &mut Writer<W>, node: &Node) -> Result<(), GraphicError> {
    let mut start = BytesStart::new(node.tag());
    for attr in node.attributes() {
        start.push_attribute(attr);
    }

    if node.children().is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|err| GraphicError::malformed(err.to_string()));
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|err| GraphicError::malformed(err.to_string()))?;
    for child in node.children() {
        match child {
            Child::Element(element) => write_node(writer, element)?,
            Child::Text(text) => writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(|err| GraphicError::malformed(err.to_string()))?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(node.tag())))
        .map_err(|err| GraphicError::malformed(err.to_string()))
}
