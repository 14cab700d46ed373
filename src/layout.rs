//! The persisted layout document.
//!
//! A layout is a `<Windows>` root wrapping one `<Window>` record per panel,
//! in stable (creation) order:
//!
//! ```xml
//! <Windows>
//!   <Window Type="Message" Title="Title 1"
//!           Top="100" Left="200" Width="200" Height="100"
//!           IsExternal="False">
//!     <Text>Content 1</Text>
//!   </Window>
//! </Windows>
//! ```
//!
//! Everything between a record's start and end tags is the content
//! provider's opaque payload; the document layer hands it to the provider
//! verbatim and never interprets it. Restoration is best-effort: a record
//! that fails to parse, names an unregistered type, or whose payload the
//! provider rejects is skipped and reported, and its siblings restore
//! normally.

use std::fmt;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::name::QName;

use crate::host::WindowHost;
use crate::manager::PanelManager;
use crate::panel::{PanelId, PanelSpec};

/// Failures of layout persistence and provider payload handling.
#[derive(Debug)]
pub enum LayoutError {
    /// A requested or recorded panel type has no registered content provider.
    UnknownProviderType(String),
    /// A `Window` record is missing a required attribute or carries a value
    /// that does not parse as the required type.
    MalformedRecord { attribute: &'static str, reason: String },
    /// A content provider failed to produce or parse its payload subtree.
    ProviderPayload(String),
    Xml(quick_xml::Error),
    Io(std::io::Error),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownProviderType(type_name) => {
                write!(f, "no content provider registered for type {type_name:?}")
            }
            Self::MalformedRecord { attribute, reason } => {
                write!(f, "malformed Window record: attribute {attribute:?}: {reason}")
            }
            Self::ProviderPayload(reason) => write!(f, "provider payload error: {reason}"),
            Self::Xml(err) => write!(f, "xml error: {err}"),
            Self::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for LayoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnknownProviderType(_)
            | Self::MalformedRecord { .. }
            | Self::ProviderPayload(_) => None,
            Self::Xml(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<quick_xml::Error> for LayoutError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Xml(err)
    }
}

impl From<std::io::Error> for LayoutError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// One record that could not be restored.
#[derive(Debug)]
pub struct SkippedRecord {
    /// Zero-based position of the record among the `Window` elements
    /// encountered in the document.
    pub index: usize,
    /// The record's `Title` attribute, when it was readable.
    pub title: Option<String>,
    pub error: LayoutError,
}

/// Outcome of [`PanelManager::restore_from_str`].
///
/// Restoration never fails as a whole: bad records land in `skipped`, and a
/// document whose XML breaks mid-stream keeps everything restored up to the
/// breakage (recorded in `aborted`).
#[derive(Debug, Default)]
pub struct RestoreReport {
    /// Panels reconstructed from the document, in document order.
    pub restored: Vec<PanelId>,
    pub skipped: Vec<SkippedRecord>,
    /// Set when the document stopped being parseable; records before the
    /// failure point are unaffected.
    pub aborted: Option<LayoutError>,
}

impl RestoreReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.aborted.is_none()
    }
}

/// Required attributes of one `Window` record.
struct WindowRecord {
    type_name: String,
    title: String,
    top: f32,
    left: f32,
    width: f32,
    height: f32,
    is_external: bool,
}

fn attr_error(attribute: &'static str, reason: impl Into<String>) -> LayoutError {
    LayoutError::MalformedRecord {
        attribute,
        reason: reason.into(),
    }
}

fn parse_record(e: &BytesStart<'_>) -> Result<WindowRecord, LayoutError> {
    let mut type_name = None;
    let mut title = None;
    let mut top = None;
    let mut left = None;
    let mut width = None;
    let mut height = None;
    let mut is_external = None;

    for attr in e.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attr.value).into_owned();
        let value = quick_xml::escape::unescape(&raw)
            .map(|v| v.into_owned())
            .unwrap_or(raw);
        match key.as_str() {
            "Type" => type_name = Some(value),
            "Title" => title = Some(value),
            "Top" => top = Some(parse_int("Top", &value)?),
            "Left" => left = Some(parse_int("Left", &value)?),
            "Width" => width = Some(parse_int("Width", &value)?),
            "Height" => height = Some(parse_int("Height", &value)?),
            "IsExternal" => is_external = Some(parse_bool("IsExternal", &value)?),
            _ => {}
        }
    }

    Ok(WindowRecord {
        type_name: type_name.ok_or_else(|| attr_error("Type", "missing"))?,
        title: title.ok_or_else(|| attr_error("Title", "missing"))?,
        top: top.ok_or_else(|| attr_error("Top", "missing"))?,
        left: left.ok_or_else(|| attr_error("Left", "missing"))?,
        width: width.ok_or_else(|| attr_error("Width", "missing"))?,
        height: height.ok_or_else(|| attr_error("Height", "missing"))?,
        is_external: is_external.ok_or_else(|| attr_error("IsExternal", "missing"))?,
    })
}

fn parse_int(attribute: &'static str, value: &str) -> Result<f32, LayoutError> {
    value
        .trim()
        .parse::<i64>()
        .map(|v| v as f32)
        .map_err(|err| attr_error(attribute, format!("{value:?}: {err}")))
}

fn parse_bool(attribute: &'static str, value: &str) -> Result<bool, LayoutError> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(attr_error(attribute, format!("{value:?}: not a boolean")))
    }
}

/// Re-serialize everything up to the record's end tag into an XML fragment
/// the provider can parse on its own. Consumes the record's subtree even when
/// the record is later skipped, so a bad record cannot desynchronize the
/// reader.
fn collect_payload(reader: &mut Reader<&[u8]>) -> Result<String, LayoutError> {
    let mut buf: Vec<u8> = Vec::new();
    let mut writer = Writer::new(&mut buf);
    let mut depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                writer.write_event(Event::Start(e))?;
            }
            Event::End(e) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
                writer.write_event(Event::End(e))?;
            }
            Event::Eof => {
                return Err(LayoutError::MalformedRecord {
                    attribute: "Window",
                    reason: "unterminated record".to_owned(),
                });
            }
            other @ (Event::Empty(_)
            | Event::Text(_)
            | Event::CData(_)
            | Event::GeneralRef(_)) => {
                writer.write_event(other)?;
            }
            // Comments, processing instructions etc. are not payload.
            _ => {}
        }
    }

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

impl<C> PanelManager<C> {
    /// Serialize the current layout into the `<Windows>` document.
    ///
    /// Records are written in panel creation order, geometry truncated to
    /// integers, positions projected to surface space via `host`.
    ///
    /// # Errors
    ///
    /// Fails only on write errors from the underlying buffer; per-panel
    /// provider failures propagate as [`LayoutError::ProviderPayload`].
    pub fn save_to_string(&self, host: &dyn WindowHost) -> Result<String, LayoutError> {
        let mut buf: Vec<u8> = Vec::new();
        let mut writer = Writer::new(&mut buf);

        writer.write_event(Event::Start(BytesStart::new("Windows")))?;

        for (&id, panel) in self.panels() {
            let Some(provider) = self.provider(panel.type_name()) else {
                // Unreachable while the add-path enforces registration.
                log::warn!(
                    "panel {id:?} has unregistered type {:?}; not saved",
                    panel.type_name()
                );
                continue;
            };

            let pos = self.panel_top_left_inner(host, panel);
            let mut elem = BytesStart::new("Window");
            elem.push_attribute(("Type", panel.type_name()));
            elem.push_attribute(("Title", panel.title()));
            elem.push_attribute(("Top", (pos.y as i64).to_string().as_str()));
            elem.push_attribute(("Left", (pos.x as i64).to_string().as_str()));
            elem.push_attribute(("Width", (panel.size().x as i64).to_string().as_str()));
            elem.push_attribute(("Height", (panel.size().y as i64).to_string().as_str()));
            elem.push_attribute(("IsExternal", if panel.is_undocked() { "True" } else { "False" }));

            writer.write_event(Event::Start(elem))?;
            provider.write_state(&mut writer, panel.state())?;
            writer.write_event(Event::End(BytesEnd::new("Window")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("Windows")))?;

        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Reconstruct panels from a previously saved document, appending them to
    /// the current set.
    ///
    /// An empty document is the normal empty state. Elements other than
    /// `Window` are skipped. Failing records are skipped individually; see
    /// [`RestoreReport`].
    pub fn restore_from_str(&mut self, host: &mut dyn WindowHost, xml: &str) -> RestoreReport {
        let mut report = RestoreReport::default();
        if xml.trim().is_empty() {
            return report;
        }

        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut record_index = 0usize;
        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) if e.name().as_ref() == b"Window" => {
                    self.restore_record(host, &mut reader, &e, false, record_index, &mut report);
                    record_index += 1;
                }
                Ok(Event::Empty(e)) if e.name().as_ref() == b"Window" => {
                    self.restore_record(host, &mut reader, &e, true, record_index, &mut report);
                    record_index += 1;
                }
                Ok(Event::Start(e)) if e.name().as_ref() == b"Windows" => {}
                Ok(Event::Start(e)) => {
                    // Foreign element at record level: skip its whole subtree
                    // so nested Window elements are not mistaken for records.
                    let name = e.name().as_ref().to_vec();
                    if let Err(err) = reader.read_to_end(QName(&name)) {
                        log::warn!("layout restore aborted: {err}");
                        report.aborted = Some(err.into());
                        break;
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(err) => {
                    log::warn!("layout restore aborted: {err}");
                    report.aborted = Some(err.into());
                    break;
                }
            }
        }

        report
    }

    fn restore_record(
        &mut self,
        host: &mut dyn WindowHost,
        reader: &mut Reader<&[u8]>,
        elem: &BytesStart<'_>,
        empty: bool,
        index: usize,
        report: &mut RestoreReport,
    ) {
        let record = parse_record(elem);
        let title = record.as_ref().ok().map(|r| r.title.clone());

        // Consume the payload before deciding the record's fate, so a skipped
        // record leaves the reader at the next sibling.
        let payload = if empty {
            Ok(String::new())
        } else {
            collect_payload(reader)
        };

        let result = record.and_then(|record| {
            let payload = payload?;
            let provider = self
                .provider(&record.type_name)
                .ok_or_else(|| LayoutError::UnknownProviderType(record.type_name.clone()))?;

            let mut payload_reader = Reader::from_str(&payload);
            payload_reader.config_mut().trim_text(true);
            let state = provider.read_state(&mut payload_reader)?;

            let spec = PanelSpec::new(record.type_name, record.title)
                .at(record.top, record.left)
                .sized(record.width, record.height)
                .undocked(record.is_external);
            self.add_panel(host, spec, state)
        });

        match result {
            Ok(id) => report.restored.push(id),
            Err(error) => {
                log::warn!("skipping layout record {index} ({title:?}): {error}");
                report.skipped.push(SkippedRecord { index, title, error });
            }
        }
    }
}
