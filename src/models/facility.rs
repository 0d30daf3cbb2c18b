//! Facility context for a plan step.
//!
//! The planner treats these values as opaque: they are handed to the
//! [`EconomicFormulas`](crate::formula::EconomicFormulas) implementation,
//! which turns them into material/time multipliers and a job cost.

use serde::{Deserialize, Serialize};

/// Where a step is run: structure, rig fit, space security and cost index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    /// Structure hosting the job.
    pub structure: StructureKind,
    /// Rig tier fitted for the job's product group.
    pub rig: RigTier,
    /// Security class of the solar system.
    pub security: SecurityClass,
    /// System cost index for the step's activity (0.0..1.0).
    pub system_cost_index: f64,
}

/// Structure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    /// NPC station: no bonuses.
    #[default]
    Station,
    /// Medium engineering complex.
    Raitaru,
    /// Large engineering complex.
    Azbel,
    /// X-large engineering complex.
    Sotiyo,
    /// Medium refinery.
    Athanor,
    /// Large refinery.
    Tatara,
}

/// Rig tier fitted on the structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RigTier {
    #[default]
    None,
    T1,
    T2,
}

/// Security class of the system (scales rig bonuses).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityClass {
    #[default]
    High,
    Low,
    Null,
    Wormhole,
}

/// Descriptive location of a step. Carried through planning unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Solar system name.
    pub system: String,
    /// Structure name, if known.
    pub structure: Option<String>,
}

impl Facility {
    /// NPC station in high-sec with no cost index.
    pub fn station() -> Self {
        Self::default()
    }

    /// Creates a facility in the given structure.
    pub fn new(structure: StructureKind) -> Self {
        Self {
            structure,
            ..Self::default()
        }
    }

    /// Sets the rig tier.
    pub fn with_rig(mut self, rig: RigTier) -> Self {
        self.rig = rig;
        self
    }

    /// Sets the security class.
    pub fn with_security(mut self, security: SecurityClass) -> Self {
        self.security = security;
        self
    }

    /// Sets the system cost index.
    pub fn with_cost_index(mut self, index: f64) -> Self {
        self.system_cost_index = index.max(0.0);
        self
    }
}

impl Default for Facility {
    fn default() -> Self {
        Self {
            structure: StructureKind::Station,
            rig: RigTier::None,
            security: SecurityClass::High,
            system_cost_index: 0.0,
        }
    }
}

impl Location {
    /// Creates a location in a solar system.
    pub fn new(system: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            structure: None,
        }
    }

    /// Sets the structure name.
    pub fn with_structure(mut self, structure: impl Into<String>) -> Self {
        self.structure = Some(structure.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facility_builder() {
        let f = Facility::new(StructureKind::Azbel)
            .with_rig(RigTier::T2)
            .with_security(SecurityClass::Null)
            .with_cost_index(-0.5);

        assert_eq!(f.structure, StructureKind::Azbel);
        assert_eq!(f.rig, RigTier::T2);
        assert_eq!(f.security, SecurityClass::Null);
        assert!((f.system_cost_index - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_facility_deserialize_defaults() {
        let f: Facility = serde_json::from_str(
            r#"{"structure":"tatara","rig":"t1","security":"low","system_cost_index":0.05}"#,
        )
        .unwrap();
        assert_eq!(f.structure, StructureKind::Tatara);
        assert_eq!(f.rig, RigTier::T1);
        assert_eq!(f.security, SecurityClass::Low);
    }

    #[test]
    fn test_location() {
        let loc = Location::new("Jita").with_structure("4-4");
        assert_eq!(loc.system, "Jita");
        assert_eq!(loc.structure.as_deref(), Some("4-4"));
    }
}
