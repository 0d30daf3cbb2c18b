//! Plan step model.
//!
//! A production plan is a tree of steps. Each step builds one product from
//! one blueprint under one activity kind; child steps build the materials
//! their parent consumes.

use serde::{Deserialize, Serialize};

use super::{ActivityKind, Facility, Location, Skills};

/// Highest material efficiency level a blueprint can be researched to.
pub const MAX_MATERIAL_EFFICIENCY: u8 = 10;
/// Highest time efficiency level a blueprint can be researched to.
pub const MAX_TIME_EFFICIENCY: u8 = 20;

/// Blueprint research levels, in percent.
///
/// Out-of-range levels are clamped, also when deserialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawEfficiency")]
pub struct EfficiencyLevels {
    /// Material efficiency (0..=10).
    pub material: u8,
    /// Time efficiency (0..=20).
    pub time: u8,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawEfficiency {
    material: u8,
    time: u8,
}

impl From<RawEfficiency> for EfficiencyLevels {
    fn from(raw: RawEfficiency) -> Self {
        EfficiencyLevels::new(raw.material, raw.time)
    }
}

/// One node of a production plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanStep {
    /// Unique step identifier.
    pub id: String,
    /// Parent step. `None` = plan root.
    pub parent_id: Option<String>,
    /// Item type produced by this step.
    pub product_type_id: u32,
    /// Human-readable product name.
    pub product_name: String,
    /// Blueprint (recipe) used.
    pub blueprint_id: u32,
    /// Activity the blueprint runs under.
    pub activity: ActivityKind,
    /// Blueprint research levels.
    #[serde(default)]
    pub efficiency: EfficiencyLevels,
    /// Skills assumed when estimating the plan-level duration.
    #[serde(default)]
    pub skills: Skills,
    /// Structure, rig and security context.
    #[serde(default)]
    pub facility: Facility,
    /// Facility tax rate (0.0..1.0).
    #[serde(default)]
    pub facility_tax: f64,
    /// Descriptive location, carried through unchanged.
    #[serde(default)]
    pub location: Option<Location>,
}

impl EfficiencyLevels {
    /// Creates clamped efficiency levels.
    pub fn new(material: u8, time: u8) -> Self {
        Self {
            material: material.min(MAX_MATERIAL_EFFICIENCY),
            time: time.min(MAX_TIME_EFFICIENCY),
        }
    }
}

impl PlanStep {
    /// Creates a root manufacturing step.
    pub fn new(id: impl Into<String>, blueprint_id: u32, product_type_id: u32) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            product_type_id,
            product_name: String::new(),
            blueprint_id,
            activity: ActivityKind::Manufacturing,
            efficiency: EfficiencyLevels::default(),
            skills: Skills::default(),
            facility: Facility::default(),
            facility_tax: 0.0,
            location: None,
        }
    }

    /// Sets the parent step.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Sets the product name.
    pub fn with_product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = name.into();
        self
    }

    /// Sets the activity kind.
    pub fn with_activity(mut self, activity: ActivityKind) -> Self {
        self.activity = activity;
        self
    }

    /// Sets blueprint material and time efficiency.
    pub fn with_efficiency(mut self, material: u8, time: u8) -> Self {
        self.efficiency = EfficiencyLevels::new(material, time);
        self
    }

    /// Sets the planning skills.
    pub fn with_skills(mut self, skills: Skills) -> Self {
        self.skills = skills;
        self
    }

    /// Sets the facility context.
    pub fn with_facility(mut self, facility: Facility) -> Self {
        self.facility = facility;
        self
    }

    /// Sets the facility tax rate.
    pub fn with_tax(mut self, rate: f64) -> Self {
        self.facility_tax = rate.max(0.0);
        self
    }

    /// Sets the descriptive location.
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Whether this step is the plan root.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Name used in diagnostics: product name, or the type id if unnamed.
    pub fn display_name(&self) -> String {
        if self.product_name.is_empty() {
            format!("type {}", self.product_type_id)
        } else {
            self.product_name.clone()
        }
    }
}
