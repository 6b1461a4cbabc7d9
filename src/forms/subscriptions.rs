use serde::Deserialize;
use validator::Validate;

use crate::domain::subscription::NewSubscriptionPlan;
use crate::domain::types::{Amount, PlanName};
use crate::forms::{FormError, non_empty};

#[derive(Deserialize, Validate)]
pub struct AddPlanForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub price: String,
    #[validate(length(min = 1))]
    pub duration_days: String,
    /// `-1` or empty means unlimited.
    #[serde(default)]
    pub max_clients: String,
}

impl TryFrom<AddPlanForm> for NewSubscriptionPlan {
    type Error = FormError;

    fn try_from(form: AddPlanForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let price: Amount = form.price.parse()?;

        let duration_days: u32 = form
            .duration_days
            .trim()
            .parse()
            .ok()
            .filter(|days| *days > 0)
            .ok_or_else(|| FormError::InvalidValue(form.duration_days.clone()))?;

        let max_clients = match non_empty(&form.max_clients) {
            None | Some("-1") => None,
            Some(value) => Some(
                value
                    .parse::<u32>()
                    .map_err(|_| FormError::InvalidValue(value.to_string()))?,
            ),
        };

        Ok(NewSubscriptionPlan::new(
            PlanName::new(form.name)?,
            price,
            duration_days,
            max_clients,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(max_clients: &str) -> AddPlanForm {
        AddPlanForm {
            name: "احترافية".to_string(),
            price: "299".to_string(),
            duration_days: "30".to_string(),
            max_clients: max_clients.to_string(),
        }
    }

    #[test]
    fn minus_one_and_empty_mean_unlimited() {
        assert_eq!(
            NewSubscriptionPlan::try_from(form("-1")).unwrap().max_clients,
            None
        );
        assert_eq!(
            NewSubscriptionPlan::try_from(form("")).unwrap().max_clients,
            None
        );
    }

    #[test]
    fn limit_is_parsed() {
        let plan = NewSubscriptionPlan::try_from(form("50")).unwrap();
        assert_eq!(plan.max_clients, Some(50));
        assert_eq!(plan.price.minor(), 29_900);
        assert_eq!(plan.duration_days, 30);
    }

    #[test]
    fn zero_duration_is_rejected() {
        let mut bad = form("");
        bad.duration_days = "0".to_string();
        assert!(NewSubscriptionPlan::try_from(bad).is_err());
    }

    #[test]
    fn negative_limits_other_than_minus_one_are_rejected() {
        assert!(NewSubscriptionPlan::try_from(form("-5")).is_err());
    }
}
