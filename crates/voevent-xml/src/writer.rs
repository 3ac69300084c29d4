//! Tree serialization through `quick_xml::Writer`.

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::node::Node;
use crate::XmlError;

const INDENT_WIDTH: usize = 2;

pub(crate) fn write_document(node: &Node) -> Result<Vec<u8>, XmlError> {
    let mut writer = Writer::new(Vec::new());
    write_declaration(&mut writer)?;
    write_node(&mut writer, node)?;
    Ok(writer.into_inner())
}

/// Indentation is whitespace-only text, which [`crate::load`] discards.
pub(crate) fn write_pretty(node: &Node) -> Result<String, XmlError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_WIDTH);
    write_declaration(&mut writer)?;
    write_node(&mut writer, node)?;
    String::from_utf8(writer.into_inner()).map_err(|err| XmlError::Write(err.to_string()))
}

fn write_declaration<W: Write>(writer: &mut Writer<W>) -> Result<(), XmlError> {
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(write_error)
}

/// Attributes come out sorted by name; elements without content self-close.
fn write_node<W: Write>(writer: &mut Writer<W>, node: &Node) -> Result<(), XmlError> {
    let mut start = BytesStart::new(node.tag.as_str());
    for (name, value) in &node.attributes {
        start.push_attribute((name.as_str(), value.as_str()));
    }
    if node.text.is_none() && node.children.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(write_error);
    }
    writer.write_event(Event::Start(start)).map_err(write_error)?;
    if let Some(text) = &node.text {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(write_error)?;
    }
    for child in &node.children {
        write_node(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(node.tag.as_str())))
        .map_err(write_error)
}

fn write_error(err: impl std::fmt::Display) -> XmlError {
    XmlError::Write(err.to_string())
}

#[cfg(test)]
mod tests {
    use crate::{load, load_str, serialize};

    const PACKET: &str = r#"<voe:VOEvent xmlns:voe="http://www.ivoa.net/xml/VOEvent/v2.0" role="test" ivorn="ivo://example/test#1">
        <Who><Date>2014-07-04T12:05:00</Date></Who>
        <What>
            <Param name="peak_flux" value="12.3" unit="mJy"><Description>Peak &amp; mean</Description></Param>
            <Param name="empty"></Param>
        </What>
    </voe:VOEvent>"#;

    #[test]
    fn canonical_form() {
        let root = load_str(PACKET).unwrap();
        let bytes = serialize(&root).unwrap();
        let xml = String::from_utf8(bytes).unwrap();
        assert_eq!(
            xml,
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8"?>"#,
                r#"<voe:VOEvent ivorn="ivo://example/test#1" role="test" xmlns:voe="http://www.ivoa.net/xml/VOEvent/v2.0">"#,
                r#"<Who><Date>2014-07-04T12:05:00</Date></Who>"#,
                r#"<What>"#,
                r#"<Param name="peak_flux" unit="mJy" value="12.3"><Description>Peak &amp; mean</Description></Param>"#,
                r#"<Param name="empty"/>"#,
                r#"</What>"#,
                r#"</voe:VOEvent>"#,
            )
        );
    }

    #[test]
    fn reload_is_structurally_equal() {
        let first = load_str(PACKET).unwrap();
        let second = load(&first.to_xml().unwrap()).unwrap();
        assert_eq!(first, second);
        let third = load(&serialize(&second).unwrap()).unwrap();
        assert_eq!(second, third);
    }

    #[test]
    fn pretty_output_reloads_equal() {
        let root = load_str(PACKET).unwrap();
        let pretty = root.to_pretty_string().unwrap();
        assert!(pretty.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(pretty.contains("\n  <Who>\n    <Date>2014-07-04T12:05:00</Date>\n  </Who>"));
        assert_eq!(load_str(&pretty).unwrap(), root);
    }

    #[test]
    fn pretty_mixed_content_keeps_text() {
        let root = load_str("<r><a>x<b/>y</a><c>z</c></r>").unwrap();
        let pretty = root.to_pretty_string().unwrap();
        assert!(pretty.contains("<a>xy<b/>"), "{pretty}");
        let reloaded = load_str(&pretty).unwrap();
        assert_eq!(reloaded, root);
        let a = reloaded.first_child("a").unwrap();
        assert_eq!(a.text(), Some("xy"));
        assert_eq!(a.children().len(), 1);
    }
}
