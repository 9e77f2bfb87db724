//! Attributes, their types and name-mapped attribute lists.

use std::collections::HashSet;
use std::fmt;

use crate::docs::DocsExpr;
use crate::error::Diagnostics;
use crate::expression::Expression;

/// Type of an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    String,
    Int,
    Float,
    Boolean,
    Bytes,
    Array(Box<DataType>),
    Object(Vec<AttributeExpr>),
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::String => f.write_str("String"),
            DataType::Int => f.write_str("Int"),
            DataType::Float => f.write_str("Float"),
            DataType::Boolean => f.write_str("Boolean"),
            DataType::Bytes => f.write_str("Bytes"),
            DataType::Array(elem) => write!(f, "ArrayOf({})", elem),
            DataType::Object(_) => f.write_str("Object"),
        }
    }
}

/// A named, typed field of an error shape, method payload, parameter or
/// header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeExpr {
    pub name: String,
    pub data_type: DataType,
    pub description: String,
    pub docs: Option<DocsExpr>,
}

impl AttributeExpr {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            description: String::new(),
            docs: None,
        }
    }

    /// An object attribute with the given fields.
    pub fn object(name: impl Into<String>, fields: Vec<AttributeExpr>) -> Self {
        Self::new(name, DataType::Object(fields))
    }

    /// Fields of an object attribute, empty for any other type.
    pub fn fields(&self) -> &[AttributeExpr] {
        match &self.data_type {
            DataType::Object(fields) => fields,
            _ => &[],
        }
    }

    /// Check the attribute and, recursively, its fields.
    pub fn validate(&self, location: &str) -> Diagnostics {
        let mut verr = Diagnostics::new();
        if self.name.is_empty() {
            verr.add(location, "attribute name cannot be empty");
        }
        if let DataType::Object(fields) = &self.data_type {
            verr.merge(validate_fields(fields, location));
        }
        verr
    }
}

impl Expression for AttributeExpr {
    fn eval_name(&self) -> String {
        format!("attribute {:?}", self.name)
    }

    fn docs_mut(&mut self) -> Option<&mut Option<DocsExpr>> {
        Some(&mut self.docs)
    }

    fn description_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.description)
    }

    fn accepts_attributes(&self) -> bool {
        matches!(self.data_type, DataType::Object(_))
    }

    fn attributes_mut(&mut self) -> Option<&mut Vec<AttributeExpr>> {
        match &mut self.data_type {
            DataType::Object(fields) => Some(fields),
            _ => None,
        }
    }
}

/// Check a list of sibling attributes: names must be non-empty and unique.
pub fn validate_fields(fields: &[AttributeExpr], location: &str) -> Diagnostics {
    let mut verr = Diagnostics::new();
    let mut seen = HashSet::new();
    for field in fields {
        verr.merge(field.validate(location));
        if !field.name.is_empty() && !seen.insert(field.name.as_str()) {
            verr.add(location, format!("attribute {} is defined twice", field.name));
        }
    }
    verr
}

/// An attribute together with the name it maps to on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedAttribute {
    pub attribute: AttributeExpr,
    /// Wire name (query string key, header name...).
    pub element: String,
}

/// Ordered attributes with per-attribute wire names, used for common
/// parameters, headers and error response headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappedAttributeExpr {
    entries: Vec<MappedAttribute>,
}

impl MappedAttributeExpr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute. `entry` is either `name` or `name:element`.
    pub fn add(&mut self, entry: &str, data_type: DataType) {
        let (name, element) = match entry.split_once(':') {
            Some((name, element)) => (name, element),
            None => (entry, entry),
        };
        self.entries.push(MappedAttribute {
            attribute: AttributeExpr::new(name, data_type),
            element: element.to_string(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MappedAttribute> {
        self.entries.iter()
    }

    /// Wire name of the attribute called `name`.
    pub fn element_name(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.attribute.name == name)
            .map(|e| e.element.as_str())
    }

    /// Check attribute and element names. `kind` names the map in messages
    /// (`parameters`, `headers`).
    pub fn validate(&self, kind: &str, location: &str) -> Diagnostics {
        let mut verr = Diagnostics::new();
        let mut names = HashSet::new();
        let mut elements = HashSet::new();
        for entry in &self.entries {
            let name = &entry.attribute.name;
            if name.is_empty() {
                verr.add(location, format!("{} contain an attribute with no name", kind));
                continue;
            }
            verr.merge(entry.attribute.validate(location));
            if entry.element.is_empty() {
                verr.add(
                    location,
                    format!("{} attribute {} maps to an empty name", kind, name),
                );
            } else if !elements.insert(entry.element.as_str()) {
                verr.add(
                    location,
                    format!("{} element {} is mapped twice", kind, entry.element),
                );
            }
            if !names.insert(name.as_str()) {
                verr.add(location, format!("{} attribute {} is defined twice", kind, name));
            }
        }
        verr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapped_spec_splits_element_name() {
        let mut m = MappedAttributeExpr::new();
        m.add("id", DataType::Int);
        m.add("token:X-Auth-Token", DataType::String);

        assert_eq!(m.len(), 2);
        assert_eq!(m.element_name("id"), Some("id"));
        assert_eq!(m.element_name("token"), Some("X-Auth-Token"));
        assert_eq!(m.element_name("missing"), None);
    }

    #[test]
    fn mapped_validate_reports_duplicates_and_empty_names() {
        let mut m = MappedAttributeExpr::new();
        m.add("id", DataType::Int);
        m.add("id:other", DataType::Int);
        m.add(":x", DataType::String);
        m.add("y:", DataType::String);

        let verr = m.validate("parameters", "service \"s\"");
        let messages: Vec<String> = verr.iter().map(|d| d.to_string()).collect();
        assert_eq!(
            messages,
            vec![
                "service \"s\": parameters attribute id is defined twice",
                "service \"s\": parameters contain an attribute with no name",
                "service \"s\": parameters attribute y maps to an empty name",
            ]
        );
    }

    #[test]
    fn mapped_validate_accepts_well_formed_map() {
        let mut m = MappedAttributeExpr::new();
        m.add("id", DataType::Int);
        m.add("token:Authorization", DataType::String);
        assert!(m.validate("headers", "service \"s\"").is_empty());
    }

    #[test]
    fn object_fields_are_validated_recursively() {
        let attr = AttributeExpr::object(
            "body",
            vec![
                AttributeExpr::new("code", DataType::Int),
                AttributeExpr::new("code", DataType::String),
                AttributeExpr::object("inner", vec![AttributeExpr::new("", DataType::Bytes)]),
            ],
        );
        let verr = attr.validate("error \"e\"");
        assert_eq!(verr.len(), 2);
    }

    #[test]
    fn only_objects_accept_nested_attributes() {
        let mut obj = AttributeExpr::object("o", vec![]);
        assert!(obj.attributes_mut().is_some());
        let mut s = AttributeExpr::new("s", DataType::String);
        assert!(s.attributes_mut().is_none());
    }

    #[test]
    fn data_type_display() {
        assert_eq!(DataType::Array(Box::new(DataType::Int)).to_string(), "ArrayOf(Int)");
    }
}
