//! XML codecs.
//!
//! Both strategies share the document frame (prolog, optional DOCTYPE, root
//! element with optional namespace declarations) and differ in how the root
//! element itself is produced:
//!
//! - the contract codec lets `quick_xml`'s serde integration follow the serde
//!   attributes on the type (`rename`, `@attribute`, `$text`);
//! - the reflection codec reflects the value into a generic tree first and
//!   then names elements by convention, with the root named after the Rust
//!   type.
//!
//! Reading is shared: fields are matched by element name, so each codec can
//! read what the other wrote. Both writers skip absent (`None`) fields and
//! write leading and trailing whitespace of text as character references,
//! since the reader trims raw text at element edges.

use std::borrow::Cow;
use std::collections::HashMap;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::document::{DocType, Namespaces, is_xml_name};
use super::error::SerializationError;
use super::{Encoding, Format};

/// Document-level settings shared by both XML strategies.
pub(crate) struct Frame<'a> {
    pub encoding: Encoding,
    pub namespaces: &'a Namespaces,
    pub doc_type: Option<&'a DocType>,
}

fn encode_err(err: impl core::fmt::Display) -> SerializationError {
    SerializationError::encode(Format::Xml, err)
}

fn malformed(err: impl core::fmt::Display) -> SerializationError {
    SerializationError::Malformed(err.to_string())
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), SerializationError> {
    writer.write_event(event).map_err(encode_err)
}

/// Writes the prolog and the DOCTYPE, in that order.
fn begin_document(frame: &Frame<'_>) -> Result<Writer<Vec<u8>>, SerializationError> {
    if frame.doc_type.is_some() && !frame.namespaces.is_suppressed() {
        return Err(SerializationError::DocTypeWithNamespaces);
    }

    let mut writer = Writer::new(Vec::new());
    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some(frame.encoding.label()), None)),
    )?;
    if let Some(doc_type) = frame.doc_type {
        let content = doc_type.content()?;
        emit(&mut writer, Event::DocType(BytesText::from_escaped(content)))?;
    }
    Ok(writer)
}

fn finish_document(writer: Writer<Vec<u8>>) -> Result<String, SerializationError> {
    String::from_utf8(writer.into_inner()).map_err(encode_err)
}

fn declare(start: &mut BytesStart<'_>, namespaces: &Namespaces) {
    for (attribute, uri) in namespaces.declarations() {
        start.push_attribute((attribute.as_str(), uri));
    }
}

/// Serializes `value` following its serde contract.
///
/// The output of `quick_xml::se` is re-emitted with the serde tree of the same
/// value as a guide: declarations go on the root, elements written for `None`
/// fields are dropped and text edges are protected.
pub(crate) fn write_contract<T>(value: &T, frame: &Frame<'_>) -> Result<String, SerializationError>
where
    T: Serialize + ?Sized,
{
    let mut writer = begin_document(frame)?;
    let root = quick_xml::se::to_string(value).map_err(encode_err)?;
    let tree = serde_json::to_value(value).ok();

    let mut reader = Reader::from_str(&root);
    let mut scopes: Vec<Scope<'_>> = Vec::new();
    let mut skipped_depth = 0usize;
    loop {
        let event = reader.read_event().map_err(malformed)?;
        if skipped_depth > 0 {
            match event {
                Event::Start(_) => skipped_depth += 1,
                Event::End(_) => skipped_depth -= 1,
                Event::Eof => break,
                _ => {}
            }
            continue;
        }

        let event = match event {
            Event::Eof => break,
            Event::Start(mut start) => {
                let node = match scopes.last_mut() {
                    None => {
                        declare(&mut start, frame.namespaces);
                        tree.as_ref()
                    }
                    Some(parent) => parent.child(start.name().as_ref()),
                };
                if node.is_some_and(Value::is_null) {
                    skipped_depth = 1;
                    continue;
                }
                scopes.push(Scope::new(node));
                Event::Start(start)
            }
            Event::Empty(mut start) => {
                match scopes.last_mut() {
                    None => declare(&mut start, frame.namespaces),
                    Some(parent) => {
                        if parent.child(start.name().as_ref()).is_some_and(Value::is_null) {
                            continue;
                        }
                    }
                }
                Event::Empty(start)
            }
            Event::End(end) => {
                scopes.pop();
                Event::End(end)
            }
            Event::Text(text) => {
                let escaped = core::str::from_utf8(&text).map_err(malformed)?;
                Event::Text(BytesText::from_escaped(protect_edges(escaped).into_owned()))
            }
            other => other,
        };
        emit(&mut writer, event)?;
    }
    finish_document(writer)
}

/// An open element of the contract output and the serde node it came from.
struct Scope<'v> {
    node: Option<&'v Value>,
    seen: HashMap<Vec<u8>, usize>,
}

impl<'v> Scope<'v> {
    fn new(node: Option<&'v Value>) -> Self {
        Self {
            node,
            seen: HashMap::new(),
        }
    }

    /// The node of the next child element called `name`. Repeated elements
    /// walk the items of a sequence; items are never reported as null, so
    /// only whole fields are dropped.
    fn child(&mut self, name: &[u8]) -> Option<&'v Value> {
        let seen = self.seen.entry(name.to_vec()).or_default();
        let index = *seen;
        *seen += 1;

        let key = core::str::from_utf8(name).ok()?;
        match self.node?.as_object()?.get(key)? {
            Value::Array(items) => items.get(index).filter(|item| !item.is_null()),
            field if index == 0 => Some(field),
            _ => None,
        }
    }
}

/// Rewrites a leading and a trailing whitespace character of escaped text as
/// character references.
fn protect_edges(escaped: &str) -> Cow<'_, str> {
    let is_space = |c: char| matches!(c, ' ' | '\t' | '\n' | '\r');
    if !escaped.starts_with(is_space) && !escaped.ends_with(is_space) {
        return Cow::Borrowed(escaped);
    }

    let mut middle = escaped;
    let mut protected = String::with_capacity(escaped.len() + 10);
    if let Some(first) = middle.chars().next().filter(|&c| is_space(c)) {
        protected.push_str(&format!("&#{};", u32::from(first)));
        middle = &middle[1..];
    }
    let last = middle.chars().next_back().filter(|&c| is_space(c));
    if last.is_some() {
        middle = &middle[..middle.len() - 1];
    }
    protected.push_str(middle);
    if let Some(last) = last {
        protected.push_str(&format!("&#{};", u32::from(last)));
    }
    Cow::Owned(protected)
}

fn text_event(content: &str) -> Event<'static> {
    let escaped = quick_xml::escape::escape(content);
    Event::Text(BytesText::from_escaped(protect_edges(&escaped).into_owned()))
}

/// Serializes `value` by convention, independent of serde renames on the
/// type name.
pub(crate) fn write_reflection<T>(value: &T, frame: &Frame<'_>) -> Result<String, SerializationError>
where
    T: Serialize + ?Sized,
{
    let mut writer = begin_document(frame)?;
    let tree = serde_json::to_value(value).map_err(encode_err)?;
    let root = conventional_name(core::any::type_name::<T>());
    let item = root
        .strip_prefix("ArrayOf")
        .filter(|item| !item.is_empty())
        .unwrap_or("item")
        .to_string();

    let mut start = BytesStart::new(root.as_str());
    declare(&mut start, frame.namespaces);
    write_element(&mut writer, start, &tree, &item)?;
    finish_document(writer)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    mut start: BytesStart<'_>,
    value: &Value,
    item: &str,
) -> Result<(), SerializationError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();

    match value {
        Value::Null => emit(writer, Event::Empty(start)),
        Value::Array(items) if items.is_empty() => emit(writer, Event::Empty(start)),
        Value::Array(items) => {
            emit(writer, Event::Start(start))?;
            for entry in items {
                write_element(writer, BytesStart::new(item), entry, "item")?;
            }
            emit(writer, Event::End(BytesEnd::new(name)))
        }
        Value::Object(fields) => {
            let mut text = None;
            let mut children = Vec::new();
            for (key, field) in fields {
                if let Some(attribute) = key.strip_prefix('@') {
                    match scalar_text(field) {
                        Some(content) => start.push_attribute((attribute, content.as_str())),
                        None if field.is_null() => {}
                        None => return Err(encode_err(format!("attribute `{attribute}` is not a scalar"))),
                    }
                } else if key == "$text" || key == "$value" {
                    text = match scalar_text(field) {
                        Some(content) => Some(content),
                        None if field.is_null() => None,
                        None => return Err(encode_err(format!("`{key}` of <{name}> is not a scalar"))),
                    };
                } else if !is_xml_name(key) {
                    return Err(encode_err(format!("`{key}` is not a valid element name")));
                } else {
                    children.push((key.as_str(), field));
                }
            }

            if text.is_none() && children.is_empty() {
                return emit(writer, Event::Empty(start));
            }
            emit(writer, Event::Start(start))?;
            if let Some(content) = text {
                emit(writer, text_event(&content))?;
            }
            for (key, field) in children {
                write_field(writer, key, field)?;
            }
            emit(writer, Event::End(BytesEnd::new(name)))
        }
        scalar => {
            let content = scalar_text(scalar).unwrap_or_default();
            emit(writer, Event::Start(start))?;
            if !content.is_empty() {
                emit(writer, text_event(&content))?;
            }
            emit(writer, Event::End(BytesEnd::new(name)))
        }
    }
}

/// Writes a struct field: absent values are skipped and sequences become
/// repeated elements.
fn write_field(writer: &mut Writer<Vec<u8>>, key: &str, value: &Value) -> Result<(), SerializationError> {
    match value {
        Value::Null => Ok(()),
        Value::Array(items) => items
            .iter()
            .try_for_each(|entry| write_element(writer, BytesStart::new(key), entry, "item")),
        _ => write_element(writer, BytesStart::new(key), value, "item"),
    }
}

/// Fails unless the first significant token of `text` is an element.
pub(crate) fn ensure_root_element(text: &str) -> Result<(), SerializationError> {
    let mut reader = Reader::from_str(text);
    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(_) | Event::Empty(_) => return Ok(()),
            Event::Decl(_) | Event::PI(_) | Event::Comment(_) | Event::DocType(_) => {}
            Event::Text(content) if content.iter().all(u8::is_ascii_whitespace) => {}
            Event::Eof => return Err(malformed("document has no root element")),
            _ => return Err(malformed("content found before the root element")),
        }
    }
}

/// Reads a document into `T`, matching fields by element name.
pub(crate) fn read<T: DeserializeOwned>(text: &str) -> Result<T, SerializationError> {
    ensure_root_element(text)?;
    quick_xml::de::from_str(text).map_err(|err| SerializationError::decode(Format::Xml, err))
}

/// Derives an element name from a Rust type name.
///
/// `alloc::vec::Vec<app::Item>` becomes `ArrayOfItem`, `app::Page<u32>`
/// becomes `PageOfU32`, and plain types keep their last path segment.
pub(crate) fn conventional_name(type_name: &str) -> String {
    let name = type_name.trim().trim_start_matches('&').trim();
    let name = name.strip_prefix("mut ").unwrap_or(name).trim();

    if let Some(inner) = name.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
        let element = inner.split(';').next().unwrap_or(inner);
        return format!("ArrayOf{}", capitalize(&conventional_name(element)));
    }
    if let Some(inner) = name.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')) {
        let members = split_arguments(inner);
        if members.is_empty() {
            return String::from("unit");
        }
        let mut tuple = String::from("TupleOf");
        members
            .iter()
            .for_each(|member| tuple.push_str(&capitalize(&conventional_name(member))));
        return tuple;
    }

    let (path, arguments) = match name.find('<') {
        Some(open) if name.ends_with('>') => (&name[..open], split_arguments(&name[open + 1..name.len() - 1])),
        _ => (name, Vec::new()),
    };
    let base = path.rsplit("::").next().unwrap_or(path);

    if matches!(base, "Vec" | "VecDeque" | "HashSet" | "BTreeSet") && arguments.len() == 1 {
        return format!("ArrayOf{}", capitalize(&conventional_name(arguments[0])));
    }

    let mut conventional = sanitize(base);
    if !arguments.is_empty() {
        conventional.push_str("Of");
        for argument in arguments {
            conventional.push_str(&capitalize(&conventional_name(argument)));
        }
    }
    conventional
}

fn split_arguments(list: &str) -> Vec<&str> {
    let mut arguments = Vec::new();
    let mut depth = 0usize;
    let mut begin = 0;
    for (index, c) in list.char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                arguments.push(list[begin..index].trim());
                begin = index + 1;
            }
            _ => {}
        }
    }
    let last = list[begin..].trim();
    if !last.is_empty() {
        arguments.push(last);
    }
    arguments
}

fn sanitize(name: &str) -> String {
    let mut clean: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') { c } else { '_' })
        .collect();
    if !clean.starts_with(|c: char| c.is_alphabetic() || c == '_') {
        clean.insert(0, '_');
    }
    clean
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
