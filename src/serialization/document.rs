//! Document-level XML metadata: DOCTYPE directives and namespace sets.

use super::error::SerializationError;

/// A document type declaration emitted between the XML prolog and the root
/// element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocType {
    /// Name of the document type; must match the root element for validation.
    pub name: String,
    /// Public identifier.
    pub public_id: Option<String>,
    /// System identifier (usually the DTD URI).
    pub system_id: Option<String>,
    /// Internal subset, written between square brackets.
    pub subset: Option<String>,
}

impl DocType {
    /// Creates a directive with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            public_id: None,
            system_id: None,
            subset: None,
        }
    }

    /// Sets the public identifier.
    pub fn public_id(mut self, public_id: impl Into<String>) -> Self {
        self.public_id = Some(public_id.into());
        self
    }

    /// Sets the system identifier.
    pub fn system_id(mut self, system_id: impl Into<String>) -> Self {
        self.system_id = Some(system_id.into());
        self
    }

    /// Sets the internal subset.
    pub fn subset(mut self, subset: impl Into<String>) -> Self {
        self.subset = Some(subset.into());
        self
    }

    /// Renders the content of the declaration, without the surrounding
    /// `<!DOCTYPE` and `>`.
    pub(crate) fn content(&self) -> Result<String, SerializationError> {
        if !is_xml_name(&self.name) {
            return Err(SerializationError::InvalidDocTypeName(self.name.clone()));
        }

        let mut content = self.name.clone();
        match (&self.public_id, &self.system_id) {
            (Some(public_id), system_id) => {
                content.push_str(" PUBLIC \"");
                content.push_str(public_id);
                content.push_str("\" \"");
                content.push_str(system_id.as_deref().unwrap_or_default());
                content.push('"');
            }
            (None, Some(system_id)) => {
                content.push_str(" SYSTEM \"");
                content.push_str(system_id);
                content.push('"');
            }
            (None, None) => {}
        }
        if let Some(subset) = &self.subset {
            content.push_str(" [");
            content.push_str(subset);
            content.push(']');
        }
        Ok(content)
    }
}

/// An ordered prefix → URI mapping applied to the root element.
///
/// The default set holds a single empty-prefix/empty-URI entry, which means
/// no namespace declarations are emitted at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespaces {
    entries: Vec<(String, String)>,
}

impl Namespaces {
    /// The explicit empty set that suppresses every namespace declaration.
    pub fn empty() -> Self {
        Self {
            entries: vec![(String::new(), String::new())],
        }
    }

    /// Builds a set from prefix/URI pairs.
    pub fn from_pairs<I, P, U>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (P, U)>,
        P: Into<String>,
        U: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(prefix, uri)| (prefix.into(), uri.into()))
                .collect(),
        }
    }

    /// Adds a prefix/URI pair. An empty prefix declares the default namespace.
    pub fn add(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.entries.push((prefix.into(), uri.into()));
        self
    }

    /// Whether no declaration would be emitted.
    pub fn is_suppressed(&self) -> bool {
        self.declarations().next().is_none()
    }

    /// The `xmlns` attributes this set contributes to the root element.
    pub fn declarations(&self) -> impl Iterator<Item = (String, &str)> + '_ {
        self.entries
            .iter()
            .filter(|(prefix, uri)| !(prefix.is_empty() && uri.is_empty()))
            .map(|(prefix, uri)| {
                let attribute = if prefix.is_empty() {
                    String::from("xmlns")
                } else {
                    format!("xmlns:{prefix}")
                };
                (attribute, uri.as_str())
            })
    }
}

impl Default for Namespaces {
    fn default() -> Self {
        Self::empty()
    }
}

/// Checks a string against the XML `Name` production, restricted to the
/// characters element and DOCTYPE names use in practice.
pub(crate) fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.'))
}
