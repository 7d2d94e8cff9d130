/*!
 * Voice assistant metadata parsing.
 *
 * The metadata value of an item is a comma separated list of tokens:
 *
 * - `Endpoint.<DeviceType>` declares an endpoint (a group endpoint on groups)
 * - `<DeviceType>` declares a device type
 * - `<Interface>.<property>` binds a property explicitly (e.g. `ModeController.mode`)
 * - `<Attribute>` binds the properties of a device attribute (e.g. `PowerState`)
 *
 * Unknown tokens are ignored.
 */
use serde_json::{Map, Value};
use tracing::debug;

use habskill_core::types::Item;

use crate::attribute::{self, DeviceAttribute};
use crate::capability::CapabilityKind;
use crate::device_type::{self, DeviceType};
use crate::property::PropertyKind;

/// A parsed metadata token
#[derive(Debug, Clone, Copy)]
pub enum MetadataToken<'a> {
    /// Endpoint declaration with its device type name
    Endpoint(&'a str),
    /// Device type declaration
    DeviceType(&'static DeviceType),
    /// Explicit property binding
    Property(CapabilityKind, PropertyKind),
    /// Device attribute
    Attribute(&'static DeviceAttribute),
}

impl<'a> MetadataToken<'a> {
    /// Parse one token
    pub fn parse(token: &'a str) -> Option<Self> {
        let token = token.trim();

        if let Some((head, tail)) = token.rsplit_once('.') {
            if head == "Endpoint" {
                return Some(MetadataToken::Endpoint(tail));
            }
            return CapabilityKind::parse(head)
                .and_then(|capability| {
                    capability
                        .property_kind(tail)
                        .map(|property| MetadataToken::Property(capability, property))
                })
                .or_else(|| {
                    debug!("Ignoring unknown property {}", token);
                    None
                });
        }

        if let Some(device_type) = device_type::find(token) {
            return Some(MetadataToken::DeviceType(device_type));
        }

        if let Some(attribute) = attribute::find(token) {
            return Some(MetadataToken::Attribute(attribute));
        }

        if !token.is_empty() {
            debug!("Ignoring unknown metadata token {}", token);
        }
        None
    }
}

/// The parsed voice assistant metadata of one item
#[derive(Debug, Clone)]
pub struct ItemMetadata<'a> {
    item: &'a Item,
    tokens: Vec<MetadataToken<'a>>,
    config: &'a Map<String, Value>,
}

impl<'a> ItemMetadata<'a> {
    /// Parse the metadata of an item
    ///
    /// # Returns
    ///
    /// The parsed metadata, or `None` if the item has no voice assistant metadata
    pub fn parse(item: &'a Item) -> Option<Self> {
        let entry = item.alexa_metadata()?;
        let tokens = entry.value.split(',').filter_map(MetadataToken::parse).collect();

        Some(Self {
            item,
            tokens,
            config: &entry.config,
        })
    }

    /// Get the item
    pub fn item(&self) -> &'a Item {
        self.item
    }

    /// Get the metadata configuration
    pub fn config(&self) -> &'a Map<String, Value> {
        self.config
    }

    /// Get the parsed tokens
    pub fn tokens(&self) -> &[MetadataToken<'a>] {
        &self.tokens
    }

    /// Get the declared device type name, if any
    pub fn type_name(&self) -> Option<&'a str> {
        self.tokens.iter().find_map(|token| match token {
            MetadataToken::Endpoint(name) => Some(*name),
            MetadataToken::DeviceType(device_type) => Some(device_type.name()),
            _ => None,
        })
    }

    /// Get the declared device type, if known
    pub fn device_type(&self) -> Option<&'static DeviceType> {
        self.type_name().and_then(device_type::find)
    }

    /// Check if the item declares an endpoint
    pub fn is_endpoint(&self) -> bool {
        self.type_name().is_some()
    }

    /// Check if the item declares a group endpoint
    pub fn is_group_endpoint(&self) -> bool {
        self.item.is_group()
            && self
                .tokens
                .iter()
                .any(|token| matches!(token, MetadataToken::Endpoint(_)))
    }

    /// Get the explicitly bound capability properties
    pub fn explicit_properties(&self) -> Vec<(CapabilityKind, PropertyKind)> {
        let mut properties = Vec::new();

        for token in &self.tokens {
            match token {
                MetadataToken::Property(capability, property) => properties.push((*capability, *property)),
                MetadataToken::Attribute(attribute) => properties.extend_from_slice(attribute.properties),
                _ => {}
            }
        }

        properties.dedup();
        properties
    }

    /// Get the capability properties bound by the item
    ///
    /// Single-item endpoints without explicit properties default to the
    /// properties implied by their device type and item type.
    pub fn properties(&self) -> Vec<(CapabilityKind, PropertyKind)> {
        let properties = self.explicit_properties();

        if !properties.is_empty() || self.is_group_endpoint() || !self.is_endpoint() {
            return properties;
        }

        match self.device_type() {
            Some(device_type) => device_type.default_properties(self.item).to_vec(),
            None => device_type::find("Other")
                .map(|other| other.default_properties(self.item).to_vec())
                .unwrap_or_default(),
        }
    }
}
