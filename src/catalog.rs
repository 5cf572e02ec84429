//! Event Catalog
//!
//! The catalog is the fixed universe of events (and their typed properties)
//! a query can reference. It is supplied once when the client is built and
//! never changes afterwards.
//!
//! Events and properties are named through [`EventRef`] and [`PropertyRef`]
//! handles, which can only be obtained by looking a name up in the catalog.
//! The builder accepts nothing else, so a series or filter naming an unknown
//! event or property cannot be constructed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Declared type of an event property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyType {
    DateTime,
    String,
    Numeric,
    Boolean,
}

/// A property declared on an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    /// Property key as PostHog stores it (e.g. "$current_url")
    pub name: String,
    /// Declared type, `None` when the property is untyped
    #[serde(rename = "type", default)]
    pub kind: Option<PropertyType>,
}

impl PropertyDescriptor {
    /// Create a new property descriptor
    pub fn new(name: impl Into<String>, kind: Option<PropertyType>) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// An event and the ordered list of properties it carries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDescriptor {
    pub name: String,
    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,
}

impl EventDescriptor {
    /// Create an event with no properties
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    /// Declare a property on this event
    pub fn property(mut self, name: impl Into<String>, kind: Option<PropertyType>) -> Self {
        self.properties.push(PropertyDescriptor::new(name, kind));
        self
    }

    fn find_property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Immutable mapping from event name to event descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventCatalog {
    events: BTreeMap<String, EventDescriptor>,
}

impl EventCatalog {
    /// Build a catalog from a list of events. A later event with the same
    /// name replaces an earlier one.
    pub fn new(events: impl IntoIterator<Item = EventDescriptor>) -> Self {
        Self {
            events: events
                .into_iter()
                .map(|event| (event.name.clone(), event))
                .collect(),
        }
    }

    /// Look up an event by name
    pub fn event(&self, name: &str) -> Option<EventRef> {
        self.events.get(name).map(|event| EventRef {
            name: event.name.clone(),
            properties: event.properties.clone(),
        })
    }

    /// Look up a property declared by any event in the catalog
    pub fn property(&self, name: &str) -> Option<PropertyRef> {
        self.events
            .values()
            .find_map(|event| event.find_property(name))
            .map(|p| PropertyRef {
                key: p.name.clone(),
                kind: p.kind,
            })
    }

    /// Get the full descriptor of an event
    pub fn descriptor(&self, name: &str) -> Option<&EventDescriptor> {
        self.events.get(name)
    }

    /// Iterate over all events in name order
    pub fn events(&self) -> impl Iterator<Item = &EventDescriptor> {
        self.events.values()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Handle to an event known to the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRef {
    name: String,
    properties: Vec<PropertyDescriptor>,
}

impl EventRef {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a property declared on this event
    ///
    /// Used for `math_property`, which must belong to the series' own event.
    pub fn property(&self, name: &str) -> Option<PropertyRef> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| PropertyRef {
                key: p.name.clone(),
                kind: p.kind,
            })
    }
}

impl fmt::Display for EventRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Handle to a property known to the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRef {
    key: String,
    kind: Option<PropertyType>,
}

impl PropertyRef {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> Option<PropertyType> {
        self.kind
    }
}

impl fmt::Display for PropertyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> EventCatalog {
        EventCatalog::new([
            EventDescriptor::new("$pageview")
                .property("$current_url", Some(PropertyType::String))
                .property("$browser", Some(PropertyType::String)),
            EventDescriptor::new("purchase").property("amount", Some(PropertyType::Numeric)),
        ])
    }

    #[test]
    fn test_event_lookup() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.event("$pageview").unwrap().name(), "$pageview");
        assert!(catalog.event("signup").is_none());
    }

    #[test]
    fn test_property_lookup_across_events() {
        let catalog = catalog();
        let amount = catalog.property("amount").unwrap();
        assert_eq!(amount.key(), "amount");
        assert_eq!(amount.kind(), Some(PropertyType::Numeric));
        assert!(catalog.property("missing").is_none());
    }

    #[test]
    fn test_event_property_is_scoped_to_event() {
        let catalog = catalog();
        let pageview = catalog.event("$pageview").unwrap();
        assert!(pageview.property("$browser").is_some());
        assert!(pageview.property("amount").is_none());
    }

    #[test]
    fn test_deserialize_descriptor() {
        let event: EventDescriptor = serde_json::from_str(
            r#"{"name":"purchase","properties":[{"name":"amount","type":"Numeric"},{"name":"note"}]}"#,
        )
        .unwrap();
        assert_eq!(event.properties.len(), 2);
        assert_eq!(event.properties[0].kind, Some(PropertyType::Numeric));
        assert_eq!(event.properties[1].kind, None);
    }
}
