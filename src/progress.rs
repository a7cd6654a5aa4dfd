use crate::foodlog::totals::NutritionTotals;
use crate::goal::dto::NutritionGoal;

/// Goal-relative progress per nutrient, as whole percentages capped at
/// 100. Pure function of its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacroProgress {
    pub calories: u8,
    pub protein: u8,
    pub carbs: u8,
    pub fat: u8,
}

/// Project totals onto a goal. Absent totals count as all-zero; an
/// absent goal falls back to the fixed default targets.
pub fn project(totals: Option<&NutritionTotals>, goal: Option<&NutritionGoal>) -> MacroProgress {
    let totals = totals.copied().unwrap_or(NutritionTotals::ZERO);
    let goal = goal.copied().unwrap_or_else(NutritionGoal::fallback);
    MacroProgress {
        calories: percent(totals.calories, goal.calories),
        protein: percent(totals.protein, goal.protein),
        carbs: percent(totals.carbs, goal.carbs),
        fat: percent(totals.fat, goal.fat),
    }
}

/// Calories still available today, floored at zero.
pub fn calories_left(totals: Option<&NutritionTotals>, goal: Option<&NutritionGoal>) -> f64 {
    let consumed = totals.map_or(0.0, |t| t.calories);
    let target = goal.map_or_else(|| NutritionGoal::fallback().calories, |g| g.calories);
    (target - consumed).max(0.0)
}

fn percent(value: f64, goal: f64) -> u8 {
    let ratio = (value / goal * 100.0).round();
    if ratio.is_finite() {
        ratio.clamp(0.0, 100.0) as u8
    } else {
        // A zero goal cannot come from the fallback; treat it as maxed.
        if value > 0.0 {
            100
        } else {
            0
        }
    }
}
