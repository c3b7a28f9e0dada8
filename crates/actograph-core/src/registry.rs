// SPDX-License-Identifier: Apache-2.0
//! Registry collaborators: node types, domains, edge attributes.
//!
//! The store only consumes the traits; the `Static*`/`Config*` types here
//! are the configuration-backed implementations a host wires up from its
//! type/primitive/attribute configuration files.
use std::collections::BTreeMap;

use crate::domain::Directedness;
use crate::ident::AttrId;

/// Validates vertex type labels at creation time.
pub trait TypeRegistry {
    /// True when `label` names a configured node type.
    fn is_known_type(&self, label: &str) -> bool;
}

/// Kind of the numeric threshold parameter a domain may carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DomainParamKind {
    /// Spatial distance threshold.
    Distance,
    /// Temporal distance threshold, microseconds.
    Time,
}

/// Optional numeric parameter attached to a domain definition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DomainParam {
    /// What the value measures.
    pub kind: DomainParamKind,
    /// The threshold value.
    pub value: f64,
}

/// Resolved definition of one domain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DomainSpec {
    /// Whether edges in this domain are ordered.
    pub directedness: Directedness,
    /// Threshold parameter, when the domain carries one.
    pub param: Option<DomainParam>,
}

/// Resolves domain names to their definitions.
pub trait DomainRegistry {
    /// Looks up a domain by name. `None` means the domain is unknown.
    fn resolve(&self, name: &str) -> Option<DomainSpec>;
}

/// Maps edge attribute ids to and from their configured names.
pub trait AttributeRegistry {
    /// Name of a configured attribute id, if known.
    fn name_for_id(&self, id: AttrId) -> Option<&str>;
    /// Id of a configured attribute name, if known.
    fn id_for_name(&self, name: &str) -> Option<AttrId>;
}

/// Type registry backed by a fixed label list.
#[derive(Clone, Debug, Default)]
pub struct StaticTypeRegistry {
    labels: Vec<String>,
}

impl StaticTypeRegistry {
    /// Builds a registry from configured type labels.
    #[must_use]
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }
}

impl TypeRegistry for StaticTypeRegistry {
    fn is_known_type(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

/// Domain registry backed by an ordered configuration list.
///
/// The configuration order doubles as the monotonic-ordering sequence for
/// parameter validation: among domains sharing a param kind, values are
/// expected to be non-decreasing in list order.
#[derive(Clone, Debug, Default)]
pub struct ConfigDomainRegistry {
    order: Vec<String>,
    specs: BTreeMap<String, DomainSpec>,
}

impl ConfigDomainRegistry {
    /// Builds a registry from `(name, spec)` pairs in configuration order.
    #[must_use]
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = (S, DomainSpec)>,
        S: Into<String>,
    {
        let mut order = Vec::new();
        let mut specs = BTreeMap::new();
        for (name, spec) in domains {
            let name = name.into();
            order.push(name.clone());
            specs.insert(name, spec);
        }
        Self { order, specs }
    }

    /// Overwrites the parameter value of `name`.
    ///
    /// A value that breaks the non-decreasing ordering among same-kind
    /// domains is accepted but logged as a warning.
    pub fn set_param_value(&mut self, name: &str, value: f64) {
        let Some(kind) = self
            .specs
            .get(name)
            .and_then(|s| s.param.map(|p| p.kind))
        else {
            return;
        };
        if let Some(spec) = self.specs.get_mut(name) {
            if let Some(param) = spec.param.as_mut() {
                param.value = value;
            }
        }
        let mut prev = f64::NEG_INFINITY;
        for other in &self.order {
            let Some(param) = self.specs.get(other).and_then(|s| s.param) else {
                continue;
            };
            if param.kind != kind {
                continue;
            }
            if param.value < prev {
                tracing::warn!(
                    domain = %name,
                    value,
                    "domain parameter breaks monotonic ordering"
                );
                break;
            }
            prev = param.value;
        }
    }
}

impl DomainRegistry for ConfigDomainRegistry {
    fn resolve(&self, name: &str) -> Option<DomainSpec> {
        self.specs.get(name).copied()
    }
}

/// Attribute registry backed by fixed `(id, name)` pairs.
#[derive(Clone, Debug, Default)]
pub struct StaticAttributeRegistry {
    names: BTreeMap<AttrId, String>,
}

impl StaticAttributeRegistry {
    /// Builds a registry from configured `(id, name)` pairs.
    #[must_use]
    pub fn new<I, S>(attrs: I) -> Self
    where
        I: IntoIterator<Item = (AttrId, S)>,
        S: Into<String>,
    {
        Self {
            names: attrs.into_iter().map(|(id, n)| (id, n.into())).collect(),
        }
    }
}

impl AttributeRegistry for StaticAttributeRegistry {
    fn name_for_id(&self, id: AttrId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    fn id_for_name(&self, name: &str) -> Option<AttrId> {
        self.names
            .iter()
            .find(|(_, n)| n.as_str() == name)
            .map(|(id, _)| *id)
    }
}
