//! Pluggable per-type panel content logic.
//!
//! A [`ContentProvider`] knows how to turn an opaque state value into
//! displayable content, and how to round-trip that state through the layout
//! document. The manager and the document treat the state and its payload as
//! opaque; only the provider registered under the panel's type name may
//! interpret them.

use std::any::Any;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::layout::LayoutError;

/// Resolve a general entity reference (the name between `&` and `;`) to its
/// character: the five predefined XML entities plus numeric character
/// references.
fn resolve_reference(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "apos" => Some('\''),
        "quot" => Some('"'),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Structured writer a provider serializes its payload into, positioned
/// inside the panel's `Window` record.
pub type StateWriter<'a> = Writer<&'a mut Vec<u8>>;

/// Structured reader positioned at exactly the provider's payload subtree.
pub type StateReader<'a> = Reader<&'a [u8]>;

/// Per-panel-type content logic.
///
/// `C` is the host's displayable-content type.
///
/// Round-trip contract: for any state accepted by
/// [`create_content`](Self::create_content), reading back what
/// [`write_state`](Self::write_state) wrote must yield a state the provider
/// treats as equivalent (provider-defined equality, not identity).
pub trait ContentProvider<C> {
    /// Materialize displayable content from previously stored or freshly
    /// supplied state. Must not mutate the state.
    fn create_content(&self, state: &dyn Any) -> C;

    /// Serialize the state at the writer's current position.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::ProviderPayload`] for states this provider does
    /// not understand, or a write error from the underlying buffer.
    fn write_state(&self, writer: &mut StateWriter<'_>, state: &dyn Any)
    -> Result<(), LayoutError>;

    /// Deserialize a state value, consuming exactly the payload subtree.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::ProviderPayload`] when the subtree does not
    /// hold a payload this provider wrote.
    fn read_state(&self, reader: &mut StateReader<'_>) -> Result<Box<dyn Any>, LayoutError>;
}

/// The built-in text-message provider: state is a `String`, content is the
/// text itself, payload is `<Text>…</Text>`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MessageProvider;

impl MessageProvider {
    pub const TYPE_NAME: &'static str = "Message";

    fn text_of(state: &dyn Any) -> Option<&str> {
        state
            .downcast_ref::<String>()
            .map(String::as_str)
            .or_else(|| state.downcast_ref::<&str>().copied())
    }
}

impl ContentProvider<String> for MessageProvider {
    fn create_content(&self, state: &dyn Any) -> String {
        Self::text_of(state).unwrap_or_default().to_owned()
    }

    fn write_state(
        &self,
        writer: &mut StateWriter<'_>,
        state: &dyn Any,
    ) -> Result<(), LayoutError> {
        let text = Self::text_of(state)
            .ok_or_else(|| LayoutError::ProviderPayload("message state is not text".to_owned()))?;
        writer.write_event(Event::Start(BytesStart::new("Text")))?;
        writer.write_event(Event::Text(BytesText::new(text)))?;
        writer.write_event(Event::End(BytesEnd::new("Text")))?;
        Ok(())
    }

    fn read_state(&self, reader: &mut StateReader<'_>) -> Result<Box<dyn Any>, LayoutError> {
        loop {
            match reader.read_event()? {
                Event::Start(e) if e.name().as_ref() == b"Text" => {
                    let mut text = String::new();
                    loop {
                        match reader.read_event()? {
                            Event::Text(t) => {
                                let raw = String::from_utf8_lossy(&t).into_owned();
                                match quick_xml::escape::unescape(&raw) {
                                    Ok(unescaped) => text.push_str(&unescaped),
                                    Err(_) => text.push_str(&raw),
                                }
                            }
                            // Entity references are reported separately from
                            // the surrounding text.
                            Event::GeneralRef(e) => {
                                let name = String::from_utf8_lossy(&e).into_owned();
                                match resolve_reference(&name) {
                                    Some(c) => text.push(c),
                                    None => {
                                        return Err(LayoutError::ProviderPayload(format!(
                                            "unresolvable entity reference &{name};"
                                        )));
                                    }
                                }
                            }
                            Event::End(end) if end.name().as_ref() == b"Text" => {
                                return Ok(Box::new(text));
                            }
                            Event::Eof => {
                                return Err(LayoutError::ProviderPayload(
                                    "unterminated Text element".to_owned(),
                                ));
                            }
                            _ => {}
                        }
                    }
                }
                Event::Empty(e) if e.name().as_ref() == b"Text" => {
                    return Ok(Box::new(String::new()));
                }
                Event::Eof => {
                    return Err(LayoutError::ProviderPayload(
                        "missing Text element".to_owned(),
                    ));
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(text: &str) -> String {
        let provider = MessageProvider;
        let state: Box<dyn Any> = Box::new(text.to_owned());

        let mut buf: Vec<u8> = Vec::new();
        let mut writer = Writer::new(&mut buf);
        provider
            .write_state(&mut writer, state.as_ref())
            .expect("write");
        let xml = String::from_utf8(buf).expect("utf8");

        let mut reader = Reader::from_str(&xml);
        let restored = provider.read_state(&mut reader).expect("read");
        provider.create_content(restored.as_ref())
    }

    #[test]
    fn text_round_trips() {
        assert_eq!(round_trip("Content 1"), "Content 1");
        assert_eq!(round_trip(""), "");
    }

    #[test]
    fn text_with_markup_characters_round_trips() {
        assert_eq!(round_trip("a < b & c > d"), "a < b & c > d");
    }

    #[test]
    fn payload_shape_matches_document_format() {
        let provider = MessageProvider;
        let state: Box<dyn Any> = Box::new("Content 1".to_owned());
        let mut buf: Vec<u8> = Vec::new();
        let mut writer = Writer::new(&mut buf);
        provider
            .write_state(&mut writer, state.as_ref())
            .expect("write");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "<Text>Content 1</Text>");
    }

    #[test]
    fn entity_references_resolve_into_payload_text() {
        let provider = MessageProvider;
        let mut reader = Reader::from_str("<Text>a &amp; b &#60; c &#x3E; d</Text>");
        let restored = provider.read_state(&mut reader).expect("read");
        assert_eq!(provider.create_content(restored.as_ref()), "a & b < c > d");
    }

    #[test]
    fn unresolvable_entity_is_a_payload_error() {
        let provider = MessageProvider;
        let mut reader = Reader::from_str("<Text>&nope;</Text>");
        let err = provider.read_state(&mut reader).expect_err("unknown entity");
        assert!(matches!(err, LayoutError::ProviderPayload(_)));
    }

    #[test]
    fn non_text_state_is_rejected() {
        let provider = MessageProvider;
        let state: Box<dyn Any> = Box::new(42_u32);
        let mut buf: Vec<u8> = Vec::new();
        let mut writer = Writer::new(&mut buf);
        let err = provider
            .write_state(&mut writer, state.as_ref())
            .expect_err("non-text state");
        assert!(matches!(err, LayoutError::ProviderPayload(_)));
    }

    #[test]
    fn missing_text_element_is_a_payload_error() {
        let provider = MessageProvider;
        let mut reader = Reader::from_str("<Other/>");
        let err = provider.read_state(&mut reader).expect_err("no Text");
        assert!(matches!(err, LayoutError::ProviderPayload(_)));
    }
}
