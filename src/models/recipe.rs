//! Recipe (blueprint) data as returned by a [`RecipeResolver`](crate::resolver::RecipeResolver).

use serde::{Deserialize, Serialize};

use super::ActivityKind;

/// Recipe header: what one run takes and yields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Blueprint identifier.
    pub blueprint_id: u32,
    /// Activity the recipe runs under.
    pub activity: ActivityKind,
    /// Base duration of one run (seconds), before any bonus.
    pub base_time_seconds: i64,
    /// Units produced per run.
    pub output_quantity: i64,
    /// Item type produced.
    pub product_type_id: u32,
}

/// A material consumed by one run, before material efficiency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    /// Consumed item type.
    pub type_id: u32,
    /// Base quantity per run.
    pub quantity: i64,
}

impl Recipe {
    /// Creates a manufacturing recipe yielding one unit per run.
    pub fn new(blueprint_id: u32, product_type_id: u32) -> Self {
        Self {
            blueprint_id,
            activity: ActivityKind::Manufacturing,
            base_time_seconds: 0,
            output_quantity: 1,
            product_type_id,
        }
    }

    /// Sets the activity kind.
    pub fn with_activity(mut self, activity: ActivityKind) -> Self {
        self.activity = activity;
        self
    }

    /// Sets the base run time (seconds).
    pub fn with_time(mut self, seconds: i64) -> Self {
        self.base_time_seconds = seconds;
        self
    }

    /// Sets the output per run.
    pub fn with_output(mut self, quantity: i64) -> Self {
        self.output_quantity = quantity;
        self
    }

    /// Output per run, floored at one unit.
    #[inline]
    pub fn effective_output(&self) -> i64 {
        self.output_quantity.max(1)
    }

    /// Base run time if it is usable for duration formulas.
    #[inline]
    pub fn usable_base_time(&self) -> Option<i64> {
        (self.base_time_seconds > 0).then_some(self.base_time_seconds)
    }
}

impl Material {
    /// Creates a material entry.
    pub fn new(type_id: u32, quantity: i64) -> Self {
        Self { type_id, quantity }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_builder() {
        let r = Recipe::new(46166, 16670)
            .with_activity(ActivityKind::Reaction)
            .with_time(10_800)
            .with_output(200);

        assert_eq!(r.activity, ActivityKind::Reaction);
        assert_eq!(r.effective_output(), 200);
        assert_eq!(r.usable_base_time(), Some(10_800));
    }

    #[test]
    fn test_degenerate_recipe_values() {
        let r = Recipe::new(1, 2).with_output(0).with_time(-5);
        assert_eq!(r.effective_output(), 1);
        assert_eq!(r.usable_base_time(), None);
    }
}
