//! Run configuration: the tearing policy and its parameters.

use std::fmt;
use std::str::FromStr;

use crate::mesh_error::MeshTearError;
use crate::topology::mesh::Mesh;
use crate::topology::point::MaterialId;

/// Where interface elements are to be inserted. Selected once per run.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TearPolicy {
    /// Only along boundaries between different materials.
    #[default]
    Interface,
    /// Between every pair of elements outside the rigid domain.
    Domain,
    /// Between every pair of elements (fully fractured mesh).
    Everywhere,
    /// Along grain boundaries, with group-wise splitting at grain junctions.
    Polycrystal,
}

impl TearPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            TearPolicy::Interface => "interface",
            TearPolicy::Domain => "domain",
            TearPolicy::Everywhere => "everywhere",
            TearPolicy::Polycrystal => "polycrystal",
        }
    }
}

impl fmt::Display for TearPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown policy name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown tear policy `{0}` (expected interface, domain, everywhere or polycrystal)")]
pub struct ParsePolicyError(pub String);

impl FromStr for TearPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "interface" => Ok(TearPolicy::Interface),
            "domain" => Ok(TearPolicy::Domain),
            "everywhere" => Ok(TearPolicy::Everywhere),
            "polycrystal" => Ok(TearPolicy::Polycrystal),
            _ => Err(ParsePolicyError(s.to_string())),
        }
    }
}

/// Options for one pipeline run.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TearOptions {
    pub policy: TearPolicy,
    /// Domain where no splitting happens. Only read under
    /// [`TearPolicy::Domain`], where it is mandatory.
    pub rigid_domain: Option<MaterialId>,
    /// Build topology and classify nodes only; duplicate and tear nothing.
    pub converter: bool,
}

impl TearOptions {
    pub fn new(policy: TearPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn with_rigid_domain(mut self, domain: MaterialId) -> Self {
        self.rigid_domain = Some(domain);
        self
    }

    pub fn converter(mut self, converter: bool) -> Self {
        self.converter = converter;
        self
    }

    /// The rigid domain as seen by the classifier: `None` unless the policy
    /// is [`TearPolicy::Domain`].
    pub fn effective_rigid_domain(&self) -> Option<MaterialId> {
        match self.policy {
            TearPolicy::Domain => self.rigid_domain,
            _ => None,
        }
    }

    /// Checks the options against the mesh before any stage runs.
    pub fn validate(&self, mesh: &Mesh) -> Result<(), MeshTearError> {
        if self.policy == TearPolicy::Domain {
            let domain = self.rigid_domain.ok_or(MeshTearError::RigidDomainRequired)?;
            if !mesh.contains_material(domain) {
                return Err(MeshTearError::RigidDomainNotFound { domain });
            }
        }
        Ok(())
    }
}
