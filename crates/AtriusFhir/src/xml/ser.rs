//! Event-level XML writer used by generated shape code.
//!
//! A start tag is held back until the first child or the matching end is
//! written, so attributes can still be added to it and an element that ends
//! up without content is emitted self-closed.

use std::io::Write;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use crate::error::Result;
use crate::xml::FHIR_NAMESPACE;

pub struct XmlWriter<W: Write> {
    writer: Writer<W>,
    pending: Option<BytesStart<'static>>,
    depth: usize,
}

impl<W: Write> XmlWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: Writer::new(inner),
            pending: None,
            depth: 0,
        }
    }

    /// Writer that indents nested elements by two spaces.
    pub fn new_pretty(inner: W) -> Self {
        Self {
            writer: Writer::new_with_indent(inner, b' ', 2),
            pending: None,
            depth: 0,
        }
    }

    pub fn write_declaration(&mut self) -> Result<()> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(())
    }

    /// Opens `name`. The outermost element carries the FHIR namespace.
    pub fn start(&mut self, name: &str) -> Result<()> {
        self.flush_pending()?;
        let mut start = BytesStart::new(name.to_string());
        if self.depth == 0 {
            start.push_attribute(("xmlns", FHIR_NAMESPACE));
        }
        self.pending = Some(start);
        self.depth += 1;
        Ok(())
    }

    /// Adds an attribute to the element opened last.
    ///
    /// Attributes are only accepted before the element's first child; later
    /// calls are ignored with a debug trace.
    pub fn attribute(&mut self, key: &str, value: &str) {
        match self.pending.as_mut() {
            Some(start) => start.push_attribute((key, value)),
            None => tracing::debug!(key, "attribute written after element content, dropped"),
        }
    }

    pub fn end(&mut self, name: &str) -> Result<()> {
        self.depth = self.depth.saturating_sub(1);
        match self.pending.take() {
            Some(start) => self.writer.write_event(Event::Empty(start))?,
            None => self.writer.write_event(Event::End(BytesEnd::new(name)))?,
        }
        Ok(())
    }

    fn flush_pending(&mut self) -> Result<()> {
        if let Some(start) = self.pending.take() {
            self.writer.write_event(Event::Start(start))?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(f: impl FnOnce(&mut XmlWriter<Vec<u8>>) -> Result<()>) -> String {
        let mut w = XmlWriter::new(Vec::new());
        f(&mut w).unwrap();
        String::from_utf8(w.into_inner()).unwrap()
    }

    #[test]
    fn test_namespace_on_root_only() {
        let xml = written(|w| {
            w.start("Patient")?;
            w.start("active")?;
            w.attribute("value", "true");
            w.end("active")?;
            w.end("Patient")
        });
        assert_eq!(
            xml,
            r#"<Patient xmlns="http://hl7.org/fhir"><active value="true"/></Patient>"#
        );
    }

    #[test]
    fn test_childless_root_is_self_closed() {
        let xml = written(|w| {
            w.start("Basic")?;
            w.end("Basic")
        });
        assert_eq!(xml, r#"<Basic xmlns="http://hl7.org/fhir"/>"#);
    }

    #[test]
    fn test_declaration() {
        let xml = written(|w| w.write_declaration());
        assert_eq!(xml, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    }
}
