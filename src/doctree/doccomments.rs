//! Documentation-comment sources and merging.
//!
//! Each module may bring one documentation-comment XML file (the compiler-emitted
//! `<doc><members><member name="...">` format). [`DocSource`] parses one file into
//! an identifier-keyed map of [`DocComment`]s plus the namespace summaries it
//! contains (`N:`-prefixed members). [`DocMerger`] looks identifiers up across
//! all sources in order - **first match wins**.
//!
//! A declaration without any match proceeds with an empty [`DocComment`] and is
//! counted in [`MissingDocCounters`]; the `show_missing_*` configuration flags
//! control whether those counters are reported as diagnostics. Missing
//! documentation never blocks a build. Only documentation XML that fails to
//! parse at all is fatal.
//!
//! Namespace summaries follow the first-non-empty-wins policy: once a namespace
//! has a summary, later non-empty values for the same namespace are silently
//! dropped. This matches the legacy merge behavior and is preserved as
//! specified (flagged for product-owner confirmation rather than switched to
//! last-wins).

use std::collections::HashMap;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::doctree::config::DocConfig;
use crate::metadata::diagnostics::{DiagnosticCategory, Diagnostics};
use crate::Result;

/// Parsed documentation text for one declaration.
///
/// Inline markup (`<see cref="..."/>`, `<paramref name="..."/>`) is flattened
/// into the surrounding text; renderers that need rich inline markup re-parse
/// the original source, which is out of scope here.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocComment {
    /// `<summary>` text
    pub summary: Option<String>,
    /// `<remarks>` text
    pub remarks: Option<String>,
    /// `<returns>` text
    pub returns: Option<String>,
    /// `<value>` text (properties)
    pub value: Option<String>,
    /// `(parameter name, text)` pairs in document order
    pub params: Vec<(String, String)>,
    /// `(exception identifier, text)` pairs in document order
    pub exceptions: Vec<(String, String)>,
    /// `seealso` target identifiers in document order
    pub seealso: Vec<String>,
}

impl DocComment {
    /// True when no block carries any content.
    pub fn is_empty(&self) -> bool {
        self.summary.is_none()
            && self.remarks.is_none()
            && self.returns.is_none()
            && self.value.is_none()
            && self.params.is_empty()
            && self.exceptions.is_empty()
            && self.seealso.is_empty()
    }

    /// Documentation text for a named parameter, if present.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, text)| text.as_str())
    }
}

/// One parsed documentation-comment XML source.
#[derive(Debug, Clone)]
pub struct DocSource {
    /// Name of the module this source documents
    pub module: String,
    entries: HashMap<String, DocComment>,
    namespace_summaries: Vec<(String, String)>,
}

impl DocSource {
    /// Reads and parses a documentation XML file.
    ///
    /// The file handle is scoped to this call and released after parsing.
    ///
    /// # Errors
    ///
    /// I/O errors and malformed XML are fatal; see the module docs.
    pub fn from_file(module: impl Into<String>, path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(module, &content)
    }

    /// Parses documentation XML from a string.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] when the XML cannot be parsed or a
    /// `member` element lacks its `name` attribute, and [`crate::Error::Empty`]
    /// for empty input.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(module: impl Into<String>, xml: &str) -> Result<Self> {
        if xml.trim().is_empty() {
            return Err(crate::Error::Empty);
        }

        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut entries: HashMap<String, DocComment> = HashMap::new();
        let mut namespace_summaries = Vec::new();

        loop {
            let event = reader
                .read_event()
                .map_err(|e| malformed_error!("invalid documentation XML - {}", e))?;
            match event {
                Event::Start(e) if e.name().as_ref() == b"member" => {
                    let name = require_attr(&e, "name")?;
                    let comment = parse_member(&mut reader)?;
                    if let Some(namespace) = name.strip_prefix("N:") {
                        let summary = comment.summary.unwrap_or_default();
                        namespace_summaries.push((namespace.to_string(), summary));
                    } else {
                        // Within one source the first occurrence wins.
                        entries.entry(name).or_insert(comment);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(Self {
            module: module.into(),
            entries,
            namespace_summaries,
        })
    }

    /// Looks up the comment documented under an identifier string.
    pub fn lookup(&self, identifier: &str) -> Option<&DocComment> {
        self.entries.get(identifier)
    }

    /// Namespace summaries contained in this source, in document order.
    pub fn namespace_summaries(&self) -> &[(String, String)] {
        &self.namespace_summaries
    }

    /// Number of documented declarations (namespaces excluded).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the source documents no declarations.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parses the children of one `member` element until its end tag.
pub(crate) fn parse_member(reader: &mut Reader<&[u8]>) -> Result<DocComment> {
    let mut comment = DocComment::default();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| malformed_error!("invalid documentation XML - {}", e))?;
        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"summary" => {
                    let text = read_flattened_text(reader, b"summary")?;
                    comment.summary.get_or_insert(text);
                }
                b"remarks" => {
                    let text = read_flattened_text(reader, b"remarks")?;
                    comment.remarks.get_or_insert(text);
                }
                b"returns" => {
                    let text = read_flattened_text(reader, b"returns")?;
                    comment.returns.get_or_insert(text);
                }
                b"value" => {
                    let text = read_flattened_text(reader, b"value")?;
                    comment.value.get_or_insert(text);
                }
                b"param" => {
                    let name = require_attr(&e, "name")?;
                    let text = read_flattened_text(reader, b"param")?;
                    comment.params.push((name, text));
                }
                b"exception" => {
                    let cref = require_attr(&e, "cref")?;
                    let text = read_flattened_text(reader, b"exception")?;
                    comment.exceptions.push((cref, text));
                }
                b"seealso" => {
                    if let Some(cref) = optional_attr(&e, "cref")? {
                        comment.seealso.push(cref);
                    }
                    skip_element(reader, b"seealso")?;
                }
                other => {
                    let tag = other.to_vec();
                    skip_element(reader, &tag)?;
                }
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"seealso" => {
                    if let Some(cref) = optional_attr(&e, "cref")? {
                        comment.seealso.push(cref);
                    }
                }
                b"param" => {
                    let name = require_attr(&e, "name")?;
                    comment.params.push((name, String::new()));
                }
                b"exception" => {
                    let cref = require_attr(&e, "cref")?;
                    comment.exceptions.push((cref, String::new()));
                }
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"member" => break,
            Event::Eof => {
                return Err(malformed_error!("unterminated 'member' element"));
            }
            _ => {}
        }
    }

    Ok(comment)
}

/// Accumulates flattened text until the matching end tag.
///
/// Inline `<see cref="..."/>` and `<paramref name="..."/>` contribute their
/// target as text; other nested elements contribute only their text content.
pub(crate) fn read_flattened_text(reader: &mut Reader<&[u8]>, end_tag: &[u8]) -> Result<String> {
    let mut out = String::new();
    let mut depth: usize = 0;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| malformed_error!("invalid documentation XML - {}", e))?;
        match event {
            Event::Text(t) => {
                let text = t
                    .unescape()
                    .map_err(|e| malformed_error!("invalid text in documentation XML - {}", e))?;
                push_piece(&mut out, &text);
            }
            Event::Empty(e) => match e.name().as_ref() {
                b"see" => {
                    if let Some(cref) = optional_attr(&e, "cref")? {
                        push_piece(&mut out, &cref);
                    }
                }
                b"paramref" => {
                    if let Some(name) = optional_attr(&e, "name")? {
                        push_piece(&mut out, &name);
                    }
                }
                _ => {}
            },
            Event::Start(_) => depth += 1,
            Event::End(e) => {
                if depth == 0 && e.name().as_ref() == end_tag {
                    break;
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => {
                return Err(malformed_error!(
                    "unterminated '{}' element",
                    String::from_utf8_lossy(end_tag)
                ));
            }
            _ => {}
        }
    }

    Ok(out)
}

/// Skips an element (and everything nested in it) up to its end tag.
pub(crate) fn skip_element(reader: &mut Reader<&[u8]>, end_tag: &[u8]) -> Result<()> {
    let mut depth: usize = 0;
    loop {
        let event = reader
            .read_event()
            .map_err(|e| malformed_error!("invalid documentation XML - {}", e))?;
        match event {
            Event::Start(_) => depth += 1,
            Event::End(e) => {
                if depth == 0 && e.name().as_ref() == end_tag {
                    return Ok(());
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => {
                return Err(malformed_error!(
                    "unterminated '{}' element",
                    String::from_utf8_lossy(end_tag)
                ));
            }
            _ => {}
        }
    }
}

fn push_piece(out: &mut String, piece: &str) {
    let piece = piece.trim();
    if piece.is_empty() {
        return;
    }
    if !out.is_empty() {
        out.push(' ');
    }
    out.push_str(piece);
}

pub(crate) fn require_attr(element: &BytesStart<'_>, name: &str) -> Result<String> {
    match optional_attr(element, name)? {
        Some(value) => Ok(value),
        None => Err(malformed_error!(
            "'{}' element is missing its '{}' attribute",
            String::from_utf8_lossy(element.name().as_ref()),
            name
        )),
    }
}

pub(crate) fn optional_attr(element: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    let attribute = element
        .try_get_attribute(name)
        .map_err(|e| malformed_error!("invalid attribute in documentation XML - {}", e))?;
    match attribute {
        Some(attr) => {
            let value = attr
                .unescape_value()
                .map_err(|e| malformed_error!("invalid attribute value - {}", e))?;
            Ok(Some(value.into_owned()))
        }
        None => Ok(None),
    }
}

/// Merged namespace summaries, first-non-empty value per namespace.
#[derive(Debug, Default, Clone)]
pub struct NamespaceSummaries {
    entries: HashMap<String, String>,
}

impl NamespaceSummaries {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers a summary for a namespace.
    ///
    /// Empty values are ignored. A namespace that already has a summary keeps
    /// it; the offered duplicate is dropped and `false` is returned. Entries
    /// are never overwritten.
    pub fn offer(&mut self, namespace: &str, summary: &str) -> bool {
        if summary.is_empty() {
            return false;
        }
        if self.entries.contains_key(namespace) {
            return false;
        }
        self.entries
            .insert(namespace.to_string(), summary.to_string());
        true
    }

    /// The summary recorded for a namespace, if any.
    pub fn get(&self, namespace: &str) -> Option<&str> {
        self.entries.get(namespace).map(String::as_str)
    }
}

/// Counters for declarations lacking documentation blocks.
///
/// Reported, never fatal: the counters feed diagnostics when the matching
/// `show_missing_*` flags are set and have no effect on tree inclusion.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MissingDocCounters {
    /// Declarations without a summary
    pub summaries: usize,
    /// Declarations without remarks
    pub remarks: usize,
    /// Parameters without documentation
    pub params: usize,
    /// Value-returning members without `<returns>` text
    pub returns: usize,
    /// Properties without `<value>` text
    pub values: usize,
}

impl MissingDocCounters {
    /// Emits the enabled counters as diagnostics.
    pub fn report(&self, diagnostics: &Diagnostics, config: &DocConfig) {
        let enabled = [
            (config.show_missing_summaries, self.summaries, "summaries"),
            (config.show_missing_remarks, self.remarks, "remarks"),
            (config.show_missing_params, self.params, "parameter descriptions"),
            (config.show_missing_returns, self.returns, "return descriptions"),
            (config.show_missing_values, self.values, "value descriptions"),
        ];
        for (show, count, what) in enabled {
            if show && count > 0 {
                diagnostics.warning(
                    DiagnosticCategory::DocComment,
                    format!("{count} declaration(s) missing {what}"),
                );
            }
        }
    }
}

/// Looks identifiers up across all documentation sources of a build.
#[derive(Debug, Default)]
pub struct DocMerger {
    sources: Vec<DocSource>,
}

impl DocMerger {
    /// Creates a merger over the given sources, in precedence order.
    pub fn new(sources: Vec<DocSource>) -> Self {
        Self { sources }
    }

    /// Finds the comment for an identifier; the first matching source wins.
    pub fn lookup(&self, identifier: &str) -> Option<&DocComment> {
        self.sources
            .iter()
            .find_map(|source| source.lookup(identifier))
    }

    /// Merges namespace summaries from all sources, first-non-empty-wins.
    ///
    /// Dropped duplicates are noted as info diagnostics.
    pub fn namespace_summaries(&self, diagnostics: &Diagnostics) -> NamespaceSummaries {
        let mut summaries = NamespaceSummaries::new();
        for source in &self.sources {
            for (namespace, summary) in source.namespace_summaries() {
                if !summaries.offer(namespace, summary) && !summary.is_empty() {
                    diagnostics.info(
                        DiagnosticCategory::Namespace,
                        format!(
                            "Duplicate summary for namespace '{namespace}' from '{}' dropped",
                            source.module
                        ),
                    );
                }
            }
        }
        summaries
    }
}
