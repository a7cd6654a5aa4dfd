use crate::error::ValidationErrors;
use crate::goal::dto::{ActivityLevel, GainRate, Gender, GoalPlan, GoalRequest, LossRate};

/// Raw goal-form input, as entered. `build` validates every field and
/// either returns the outbound request or the full set of field errors,
/// in which case nothing is sent.
#[derive(Debug, Clone)]
pub struct GoalForm {
    pub gender: String,
    pub age: String,
    pub current_weight: String,
    pub target_weight: String,
    pub height_feet: String,
    pub height_inches: String,
    pub activity_level: String,
    pub goal_type: String,
    pub weight_gain_rate: String,
    pub weekly_loss_rate: String,
}

impl Default for GoalForm {
    fn default() -> Self {
        Self {
            gender: "male".into(),
            age: String::new(),
            current_weight: String::new(),
            target_weight: String::new(),
            height_feet: String::new(),
            height_inches: String::new(),
            activity_level: "light".into(),
            goal_type: "gain".into(),
            weight_gain_rate: "500g".into(),
            weekly_loss_rate: "0.5".into(),
        }
    }
}

impl GoalForm {
    pub fn build(&self, user_id: &str) -> Result<GoalRequest, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let gender = match self.gender.trim() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            _ => {
                errors.push("gender", "select male or female");
                None
            }
        };

        let age = positive_int(&self.age, "age", "must be a positive whole number", &mut errors);
        let current_weight = positive_number(
            &self.current_weight,
            "currentWeight",
            "must be a positive number of kilograms",
            &mut errors,
        );
        let target_weight = positive_number(
            &self.target_weight,
            "targetWeight",
            "must be a positive number of kilograms",
            &mut errors,
        );
        let height_feet = positive_int(
            &self.height_feet,
            "heightFeet",
            "must be a positive whole number",
            &mut errors,
        );
        let height_inches = match self.height_inches.trim().parse::<u32>() {
            Ok(inches) if inches < 12 => Some(inches),
            _ => {
                errors.push("heightInches", "must be a whole number from 0 to 11");
                None
            }
        };

        let activity_level = match self.activity_level.trim() {
            "light" => Some(ActivityLevel::Light),
            "moderate" => Some(ActivityLevel::Moderate),
            "active" => Some(ActivityLevel::Active),
            _ => {
                errors.push("activityLevel", "select light, moderate or active");
                None
            }
        };

        let plan = match self.goal_type.trim() {
            "gain" => match self.weight_gain_rate.trim() {
                "500g" => Some(GoalPlan::Gain {
                    weight_gain_rate: GainRate::HalfKilo,
                }),
                "1kg" => Some(GoalPlan::Gain {
                    weight_gain_rate: GainRate::OneKilo,
                }),
                _ => {
                    errors.push("weightGainRate", "select 500g or 1kg per week");
                    None
                }
            },
            "lose" => match self.weekly_loss_rate.trim() {
                "0.5" => Some(GoalPlan::Lose {
                    weekly_loss_rate: LossRate::HalfKilo,
                }),
                "1" => Some(GoalPlan::Lose {
                    weekly_loss_rate: LossRate::OneKilo,
                }),
                _ => {
                    errors.push("weeklyLossRate", "select 0.5 or 1 kg per week");
                    None
                }
            },
            _ => {
                errors.push("goalType", "select gain or lose");
                None
            }
        };

        errors.into_result()?;

        // All parses succeeded once the error set is empty.
        match (
            gender,
            age,
            current_weight,
            target_weight,
            height_feet,
            height_inches,
            activity_level,
            plan,
        ) {
            (
                Some(gender),
                Some(age),
                Some(current_weight),
                Some(target_weight),
                Some(height_feet),
                Some(height_inches),
                Some(activity_level),
                Some(plan),
            ) => Ok(GoalRequest {
                user_id: user_id.to_string(),
                gender,
                age,
                current_weight,
                target_weight,
                height_feet,
                height_inches,
                activity_level,
                plan,
            }),
            _ => {
                let mut errors = ValidationErrors::default();
                errors.push("form", "incomplete goal form");
                Err(errors)
            }
        }
    }
}

fn positive_int(
    raw: &str,
    field: &'static str,
    message: &'static str,
    errors: &mut ValidationErrors,
) -> Option<u32> {
    match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => Some(n),
        _ => {
            errors.push(field, message);
            None
        }
    }
}

fn positive_number(
    raw: &str,
    field: &'static str,
    message: &'static str,
    errors: &mut ValidationErrors,
) -> Option<f64> {
    match raw.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n > 0.0 => Some(n),
        _ => {
            errors.push(field, message);
            None
        }
    }
}
