//! Conventional industry formulas.
//!
//! # Material
//! `(1 - ME/100) × structure × rig` (manufacturing only; reactions have no ME).
//!
//! # Time
//! - Manufacturing: `(1 - TE/100) × (1 - 0.04·Industry) × (1 - 0.03·Advanced Industry) × structure × rig`
//! - Reactions: `(1 - 0.04·Reactions) × structure × rig`
//!
//! # Cost
//! `EIV × (cost index × structure cost bonus + facility tax)` where
//! `EIV = runs × Σ base quantity × adjusted price`.
//!
//! Rig bonuses scale with security: high 1.0, low 1.9, null/wormhole 2.1.
//! Engineering-complex bonuses apply to manufacturing, refinery bonuses to
//! reactions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{DurationModel, EconomicFormulas, JobEstimate};
use crate::models::{
    ActivityKind, EfficiencyLevels, Facility, JobContext, Material, Recipe, RigTier,
    SecurityClass, Skills, StructureKind,
};

/// Reference implementation of [`EconomicFormulas`].
///
/// Job cost needs adjusted prices for every material; register them with
/// [`with_adjusted_price`](Self::with_adjusted_price). Without them the cost
/// estimate is `None` while durations are still computed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StandardFormulas {
    /// Adjusted price per item type, used for the estimated item value.
    #[serde(default)]
    pub adjusted_prices: HashMap<u32, f64>,
}

impl StandardFormulas {
    /// Creates formulas with no price data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an adjusted price.
    pub fn with_adjusted_price(mut self, type_id: u32, price: f64) -> Self {
        self.adjusted_prices.insert(type_id, price);
        self
    }

    /// Estimated item value of `runs` runs, or `None` if a price is missing.
    pub fn estimated_item_value(&self, runs: i64, materials: &[Material]) -> Option<f64> {
        let mut per_run = 0.0;
        for m in materials {
            let price = self.adjusted_prices.get(&m.type_id)?;
            per_run += m.quantity as f64 * price;
        }
        Some(per_run * runs.max(0) as f64)
    }
}

impl EconomicFormulas for StandardFormulas {
    fn material_factor(
        &self,
        levels: EfficiencyLevels,
        facility: &Facility,
        activity: ActivityKind,
    ) -> f64 {
        match activity {
            ActivityKind::Manufacturing => {
                let me = 1.0 - f64::from(levels.material) / 100.0;
                let structure = if is_engineering_complex(facility.structure) {
                    0.99
                } else {
                    1.0
                };
                me * structure * rig_factor(facility, rig_material_bonus(facility.rig), activity)
            }
            ActivityKind::Reaction => {
                rig_factor(facility, rig_material_bonus(facility.rig), activity)
            }
        }
    }

    fn time_factor(&self, levels: EfficiencyLevels, skills: &Skills, facility: &Facility) -> f64 {
        let te = 1.0 - f64::from(levels.time) / 100.0;
        let industry = 1.0 - 0.04 * f64::from(skills.industry);
        let advanced = 1.0 - 0.03 * f64::from(skills.advanced_industry);
        let structure = match facility.structure {
            StructureKind::Raitaru => 0.85,
            StructureKind::Azbel => 0.80,
            StructureKind::Sotiyo => 0.70,
            _ => 1.0,
        };
        te * industry
            * advanced
            * structure
            * rig_factor(facility, rig_time_bonus(facility.rig), ActivityKind::Manufacturing)
    }

    fn reaction_time_factor(&self, skills: &Skills, facility: &Facility) -> f64 {
        let reactions = 1.0 - 0.04 * f64::from(skills.reactions);
        let structure = match facility.structure {
            StructureKind::Tatara => 0.75,
            _ => 1.0,
        };
        reactions
            * structure
            * rig_factor(facility, rig_time_bonus(facility.rig), ActivityKind::Reaction)
    }

    fn estimate(
        &self,
        runs: i64,
        _recipe: &Recipe,
        materials: &[Material],
        context: &JobContext,
        skills: &Skills,
    ) -> JobEstimate {
        let cost = self.estimated_item_value(runs, materials).map(|eiv| {
            let rate = context.facility.system_cost_index * structure_cost_bonus(context.facility.structure)
                + context.facility_tax;
            eiv * rate
        });
        let duration = DurationModel::Blueprint.job_seconds(self, context, skills, runs);
        JobEstimate { cost, duration }
    }
}

fn is_engineering_complex(structure: StructureKind) -> bool {
    matches!(
        structure,
        StructureKind::Raitaru | StructureKind::Azbel | StructureKind::Sotiyo
    )
}

fn is_refinery(structure: StructureKind) -> bool {
    matches!(structure, StructureKind::Athanor | StructureKind::Tatara)
}

fn structure_cost_bonus(structure: StructureKind) -> f64 {
    match structure {
        StructureKind::Raitaru => 0.97,
        StructureKind::Azbel => 0.96,
        StructureKind::Sotiyo => 0.95,
        _ => 1.0,
    }
}

fn rig_material_bonus(rig: RigTier) -> f64 {
    match rig {
        RigTier::None => 0.0,
        RigTier::T1 => 0.02,
        RigTier::T2 => 0.024,
    }
}

fn rig_time_bonus(rig: RigTier) -> f64 {
    match rig {
        RigTier::None => 0.0,
        RigTier::T1 => 0.20,
        RigTier::T2 => 0.24,
    }
}

fn security_multiplier(security: SecurityClass) -> f64 {
    match security {
        SecurityClass::High => 1.0,
        SecurityClass::Low => 1.9,
        SecurityClass::Null | SecurityClass::Wormhole => 2.1,
    }
}

/// Rig multiplier, or 1.0 when the structure cannot fit rigs for `activity`.
fn rig_factor(facility: &Facility, bonus: f64, activity: ActivityKind) -> f64 {
    let fits = match activity {
        ActivityKind::Manufacturing => is_engineering_complex(facility.structure),
        ActivityKind::Reaction => is_refinery(facility.structure),
    };
    if !fits {
        return 1.0;
    }
    1.0 - bonus * security_multiplier(facility.security)
}
