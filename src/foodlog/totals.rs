use serde::Serialize;

use crate::foodlog::dto::FoodLogRecord;

/// Summed nutrient fields for one scope (a date, or the running day).
/// Derived only: built by reducing records or by accumulation, never
/// authored directly. Fields stay finite and non-negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NutritionTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl NutritionTotals {
    pub const ZERO: Self = Self {
        calories: 0.0,
        protein: 0.0,
        carbs: 0.0,
        fat: 0.0,
    };

    pub fn add(&mut self, record: &FoodLogRecord) {
        self.calories += record.calories;
        self.protein += record.protein;
        self.carbs += record.carbs;
        self.fat += record.fat;
    }

    /// Reduce a record set. An empty set yields all-zero totals.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a FoodLogRecord>,
    {
        let mut totals = Self::ZERO;
        for record in records {
            totals.add(record);
        }
        totals
    }

    fn clamped(self) -> Self {
        fn clamp(v: f64) -> f64 {
            if v.is_finite() && v > 0.0 {
                v
            } else {
                0.0
            }
        }
        Self {
            calories: clamp(self.calories),
            protein: clamp(self.protein),
            carbs: clamp(self.carbs),
            fat: clamp(self.fat),
        }
    }
}

/// Single mutable slot holding today's running totals.
///
/// Owned by the session, so it cannot be touched before login or after
/// logout. `provisioned` distinguishes "nothing written yet" from an
/// authoritative zero.
#[derive(Debug, Default)]
pub struct DailyTotalsStore {
    totals: NutritionTotals,
    provisioned: bool,
}

impl DailyTotalsStore {
    /// Add one record's values onto the current totals.
    pub fn accumulate(&mut self, record: &FoodLogRecord) {
        self.totals.add(record);
        self.provisioned = true;
    }

    /// Overwrite the slot wholesale with a fresh authoritative value.
    pub fn replace(&mut self, totals: NutritionTotals) {
        self.totals = totals.clamped();
        self.provisioned = true;
    }

    pub fn snapshot(&self) -> NutritionTotals {
        self.totals
    }

    pub fn is_provisioned(&self) -> bool {
        self.provisioned
    }
}
