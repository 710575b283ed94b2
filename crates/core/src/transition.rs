//! Slide transition markup.
//!
//! Transitions are not part of the placed geometry, so they travel as raw
//! PresentationML fragments that the document backend appends to the slide
//! root. Morph needs the 2015 PowerPoint vocabulary and is wrapped in
//! markup-compatibility `AlternateContent` with a plain fade as fallback.

use deckforge_traits::{FragmentError, MarkupFragment};
use deckforge_types::{PlacedSlide, TransitionPolicy};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, Event};

pub const NS_PRESENTATION: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
pub const NS_P14: &str = "http://schemas.microsoft.com/office/powerpoint/2010/main";
pub const NS_P159: &str = "http://schemas.microsoft.com/office/powerpoint/2015/09/main";
pub const NS_MARKUP_COMPAT: &str = "http://schemas.openxmlformats.org/markup-compatibility/2006";

/// Baseline speed bucket for readers that ignore `p14:dur`.
pub fn fade_speed(duration_ms: u32) -> &'static str {
    match duration_ms {
        0..=500 => "fast",
        501..=750 => "med",
        _ => "slow",
    }
}

/// Builds transition fragments from a slide's declared policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransitionInjector;

impl TransitionInjector {
    pub fn new() -> Self {
        Self
    }

    /// Returns the fragment for `slide`, or `None` when no transition is wanted.
    pub fn apply_transition(
        &self,
        slide: &PlacedSlide,
    ) -> Result<Option<MarkupFragment>, FragmentError> {
        self.fragment_for(&slide.spec.transition)
    }

    pub fn fragment_for(
        &self,
        policy: &TransitionPolicy,
    ) -> Result<Option<MarkupFragment>, FragmentError> {
        let xml = match policy {
            TransitionPolicy::None => return Ok(None),
            TransitionPolicy::Fade { duration_ms } => fade_markup(*duration_ms)?,
            TransitionPolicy::Morph { duration_ms } => morph_markup(*duration_ms)?,
            TransitionPolicy::Custom { markup } => markup.clone(),
        };
        MarkupFragment::parse(xml).map(Some)
    }
}

fn fade_markup(duration_ms: u32) -> Result<String, FragmentError> {
    let duration = duration_ms.to_string();
    let mut writer = Writer::new(Vec::new());
    write(
        &mut writer,
        Event::Start(BytesStart::new("p:transition").with_attributes([
            ("xmlns:p", NS_PRESENTATION),
            ("xmlns:p14", NS_P14),
            ("spd", fade_speed(duration_ms)),
            ("p14:dur", duration.as_str()),
        ])),
    )?;
    write(&mut writer, Event::Empty(BytesStart::new("p:fade")))?;
    write(&mut writer, Event::End(BytesEnd::new("p:transition")))?;
    finish(writer)
}

fn morph_markup(duration_ms: u32) -> Result<String, FragmentError> {
    let duration = duration_ms.to_string();
    let mut writer = Writer::new(Vec::new());

    write(
        &mut writer,
        Event::Start(
            BytesStart::new("mc:AlternateContent")
                .with_attributes([("xmlns:mc", NS_MARKUP_COMPAT)]),
        ),
    )?;

    write(
        &mut writer,
        Event::Start(
            BytesStart::new("mc:Choice")
                .with_attributes([("xmlns:p159", NS_P159), ("Requires", "p159")]),
        ),
    )?;
    write(
        &mut writer,
        Event::Start(BytesStart::new("p:transition").with_attributes([
            ("xmlns:p", NS_PRESENTATION),
            ("xmlns:p14", NS_P14),
            ("spd", "slow"),
            ("p14:dur", duration.as_str()),
        ])),
    )?;
    write(
        &mut writer,
        Event::Empty(BytesStart::new("p159:morph").with_attributes([("option", "byObject")])),
    )?;
    write(&mut writer, Event::End(BytesEnd::new("p:transition")))?;
    write(&mut writer, Event::End(BytesEnd::new("mc:Choice")))?;

    write(&mut writer, Event::Start(BytesStart::new("mc:Fallback")))?;
    write(
        &mut writer,
        Event::Start(
            BytesStart::new("p:transition")
                .with_attributes([("xmlns:p", NS_PRESENTATION), ("spd", "slow")]),
        ),
    )?;
    write(&mut writer, Event::Empty(BytesStart::new("p:fade")))?;
    write(&mut writer, Event::End(BytesEnd::new("p:transition")))?;
    write(&mut writer, Event::End(BytesEnd::new("mc:Fallback")))?;

    write(&mut writer, Event::End(BytesEnd::new("mc:AlternateContent")))?;
    finish(writer)
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), FragmentError> {
    writer
        .write_event(event)
        .map_err(|e| FragmentError::Build(e.to_string()))
}

fn finish(writer: Writer<Vec<u8>>) -> Result<String, FragmentError> {
    String::from_utf8(writer.into_inner()).map_err(|e| FragmentError::Build(e.to_string()))
}
