//! A flat-XML document backend.
//!
//! Produces one well-formed XML file that uses PresentationML element names:
//! `p:sld` per slide, `p:sp` for text boxes, `p:pic` for pictures, and
//! `a:off`/`a:ext` offsets in EMU. Transition fragments are appended to the
//! slide root after the shape tree; notes go in `p:notes`.

use crate::transition::NS_PRESENTATION;
use deckforge_traits::{DocumentBackend, DocumentError, MarkupFragment, TextRole};
use deckforge_types::{Canvas, Rect};
use log::debug;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::path::{Path, PathBuf};

pub const NS_DRAWING: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";

/// English Metric Units per point.
pub const EMU_PER_POINT: f32 = 12_700.0;

pub fn to_emu(points: f32) -> i64 {
    (points * EMU_PER_POINT).round() as i64
}

#[derive(Debug, Clone)]
enum Shape {
    Text {
        bounds: Rect,
        role: TextRole,
        lines: Vec<String>,
    },
    Picture {
        bounds: Rect,
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Default)]
struct SlideBuffer {
    shapes: Vec<Shape>,
    fragments: Vec<MarkupFragment>,
    notes: Option<String>,
}

#[derive(Debug, Default)]
pub struct XmlDeckDocument {
    canvas: Option<Canvas>,
    slides: Vec<SlideBuffer>,
}

impl XmlDeckDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    fn slide_mut(&mut self, index: usize) -> Result<&mut SlideBuffer, DocumentError> {
        if self.canvas.is_none() {
            return Err(DocumentError::NotStarted);
        }
        self.slides
            .get_mut(index)
            .ok_or(DocumentError::NoSuchSlide(index))
    }

    /// Serializes the document without touching the filesystem.
    pub fn to_xml(&self) -> Result<String, DocumentError> {
        let canvas = self.canvas.ok_or(DocumentError::NotStarted)?;
        let mut w = XmlOut::new();

        w.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        w.start(BytesStart::new("p:presentation").with_attributes([
            ("xmlns:p", NS_PRESENTATION),
            ("xmlns:a", NS_DRAWING),
        ]))?;
        let cx = to_emu(canvas.width).to_string();
        let cy = to_emu(canvas.height).to_string();
        w.empty(BytesStart::new("p:sldSz").with_attributes([("cx", cx.as_str()), ("cy", cy.as_str())]))?;

        for (index, slide) in self.slides.iter().enumerate() {
            write_slide(&mut w, index, slide)?;
        }

        w.end("p:presentation")?;
        w.finish()
    }
}

fn write_slide(w: &mut XmlOut, index: usize, slide: &SlideBuffer) -> Result<(), DocumentError> {
    let number = (index + 1).to_string();
    w.start(BytesStart::new("p:sld").with_attributes([("number", number.as_str())]))?;
    w.start(BytesStart::new("p:cSld"))?;
    w.start(BytesStart::new("p:spTree"))?;

    for (shape_index, shape) in slide.shapes.iter().enumerate() {
        // id 1 is reserved for the tree itself
        let id = (shape_index + 2).to_string();
        match shape {
            Shape::Text {
                bounds,
                role,
                lines,
            } => {
                w.start(BytesStart::new("p:sp"))?;
                w.start(BytesStart::new("p:nvSpPr"))?;
                let name = format!("{} {}", role.as_str(), shape_index + 1);
                w.empty(
                    BytesStart::new("p:cNvPr")
                        .with_attributes([("id", id.as_str()), ("name", name.as_str())]),
                )?;
                w.empty(BytesStart::new("p:ph").with_attributes([("type", role.as_str())]))?;
                w.end("p:nvSpPr")?;
                write_transform(w, "p:spPr", bounds)?;
                w.start(BytesStart::new("p:txBody"))?;
                for line in lines {
                    w.start(BytesStart::new("a:p"))?;
                    w.start(BytesStart::new("a:r"))?;
                    w.text_element("a:t", line)?;
                    w.end("a:r")?;
                    w.end("a:p")?;
                }
                w.end("p:txBody")?;
                w.end("p:sp")?;
            }
            Shape::Picture { bounds, path } => {
                let source = path.to_string_lossy();
                w.start(BytesStart::new("p:pic"))?;
                w.start(BytesStart::new("p:nvPicPr"))?;
                let name = format!("picture {}", shape_index + 1);
                w.empty(BytesStart::new("p:cNvPr").with_attributes([
                    ("id", id.as_str()),
                    ("name", name.as_str()),
                    ("descr", &*source),
                ]))?;
                w.end("p:nvPicPr")?;
                w.start(BytesStart::new("p:blipFill"))?;
                w.empty(BytesStart::new("a:blip").with_attributes([("link", &*source)]))?;
                w.end("p:blipFill")?;
                write_transform(w, "p:spPr", bounds)?;
                w.end("p:pic")?;
            }
        }
    }

    w.end("p:spTree")?;
    w.end("p:cSld")?;

    for fragment in &slide.fragments {
        w.raw(fragment.as_str())?;
    }

    if let Some(notes) = &slide.notes {
        w.start(BytesStart::new("p:notes"))?;
        w.start(BytesStart::new("p:txBody"))?;
        for line in notes.lines() {
            w.start(BytesStart::new("a:p"))?;
            w.start(BytesStart::new("a:r"))?;
            w.text_element("a:t", line)?;
            w.end("a:r")?;
            w.end("a:p")?;
        }
        w.end("p:txBody")?;
        w.end("p:notes")?;
    }

    w.end("p:sld")
}

fn write_transform(w: &mut XmlOut, container: &str, bounds: &Rect) -> Result<(), DocumentError> {
    let x = to_emu(bounds.x).to_string();
    let y = to_emu(bounds.y).to_string();
    let cx = to_emu(bounds.width).to_string();
    let cy = to_emu(bounds.height).to_string();
    w.start(BytesStart::new(container))?;
    w.start(BytesStart::new("a:xfrm"))?;
    w.empty(BytesStart::new("a:off").with_attributes([("x", x.as_str()), ("y", y.as_str())]))?;
    w.empty(BytesStart::new("a:ext").with_attributes([("cx", cx.as_str()), ("cy", cy.as_str())]))?;
    w.end("a:xfrm")?;
    w.end(container)
}

/// Thin wrapper mapping writer errors into [`DocumentError`].
struct XmlOut {
    writer: Writer<Vec<u8>>,
}

impl XmlOut {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    fn event(&mut self, event: Event<'_>) -> Result<(), DocumentError> {
        self.writer
            .write_event(event)
            .map_err(|e| DocumentError::Serialize(e.to_string()))
    }

    fn start(&mut self, tag: BytesStart<'_>) -> Result<(), DocumentError> {
        self.event(Event::Start(tag))
    }

    fn empty(&mut self, tag: BytesStart<'_>) -> Result<(), DocumentError> {
        self.event(Event::Empty(tag))
    }

    fn end(&mut self, name: &str) -> Result<(), DocumentError> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn text_element(&mut self, name: &str, text: &str) -> Result<(), DocumentError> {
        self.start(BytesStart::new(name))?;
        self.event(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    /// Writes already-validated markup without escaping.
    fn raw(&mut self, xml: &str) -> Result<(), DocumentError> {
        self.event(Event::Text(BytesText::from_escaped(xml)))
    }

    fn finish(self) -> Result<String, DocumentError> {
        String::from_utf8(self.writer.into_inner())
            .map_err(|e| DocumentError::Serialize(e.to_string()))
    }
}

impl DocumentBackend for XmlDeckDocument {
    fn begin_document(&mut self, canvas: Canvas) -> Result<(), DocumentError> {
        self.canvas = Some(canvas);
        self.slides.clear();
        Ok(())
    }

    fn add_slide(&mut self) -> Result<usize, DocumentError> {
        if self.canvas.is_none() {
            return Err(DocumentError::NotStarted);
        }
        self.slides.push(SlideBuffer::default());
        Ok(self.slides.len() - 1)
    }

    fn add_text(
        &mut self,
        slide: usize,
        bounds: Rect,
        role: TextRole,
        lines: &[String],
    ) -> Result<(), DocumentError> {
        self.slide_mut(slide)?.shapes.push(Shape::Text {
            bounds,
            role,
            lines: lines.to_vec(),
        });
        Ok(())
    }

    fn add_image(&mut self, slide: usize, bounds: Rect, path: &Path) -> Result<(), DocumentError> {
        self.slide_mut(slide)?.shapes.push(Shape::Picture {
            bounds,
            path: path.to_path_buf(),
        });
        Ok(())
    }

    fn set_notes(&mut self, slide: usize, text: &str) -> Result<(), DocumentError> {
        self.slide_mut(slide)?.notes = Some(text.to_string());
        Ok(())
    }

    fn append_fragment(
        &mut self,
        slide: usize,
        fragment: &MarkupFragment,
    ) -> Result<(), DocumentError> {
        self.slide_mut(slide)?.fragments.push(fragment.clone());
        Ok(())
    }

    fn save(&mut self, path: &Path) -> Result<(), DocumentError> {
        let xml = self.to_xml()?;
        std::fs::write(path, xml)?;
        debug!(
            "Saved {} slide(s) to {}",
            self.slides.len(),
            path.display()
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "XmlDeckDocument"
    }
}
