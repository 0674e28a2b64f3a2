use serde::{Deserialize, Serialize};

/// Budget preferences; a singleton owned by the data store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BudgetSettings {
    pub monthly_budget: f64,
    pub currency: String,
    pub notifications: bool,
    /// Percentage of the monthly budget at which to warn.
    pub warning_threshold: i32,
}

impl Default for BudgetSettings {
    fn default() -> Self {
        Self {
            monthly_budget: 0.0,
            currency: "USD".to_string(),
            notifications: true,
            warning_threshold: 80,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BudgetSettingsUpdate {
    pub monthly_budget: Option<f64>,
    pub currency: Option<String>,
    pub notifications: Option<bool>,
    pub warning_threshold: Option<i32>,
}

impl BudgetSettings {
    pub fn apply(&mut self, update: BudgetSettingsUpdate) {
        if let Some(monthly_budget) = update.monthly_budget {
            self.monthly_budget = monthly_budget;
        }
        if let Some(currency) = update.currency {
            self.currency = currency;
        }
        if let Some(notifications) = update.notifications {
            self.notifications = notifications;
        }
        if let Some(warning_threshold) = update.warning_threshold {
            self.warning_threshold = warning_threshold;
        }
    }

    /// Whether `spent` has crossed the warning threshold of the monthly budget.
    pub fn is_over_threshold(&self, spent: f64) -> bool {
        if self.monthly_budget <= 0.0 {
            return false;
        }
        spent / self.monthly_budget * 100.0 >= f64::from(self.warning_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = BudgetSettings::default();
        assert_eq!(settings.monthly_budget, 0.0);
        assert_eq!(settings.currency, "USD");
        assert!(settings.notifications);
        assert_eq!(settings.warning_threshold, 80);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: BudgetSettings = serde_json::from_str(r#"{"monthlyBudget": 1200}"#).unwrap();
        assert_eq!(settings.monthly_budget, 1200.0);
        assert_eq!(settings.currency, "USD");
        assert_eq!(settings.warning_threshold, 80);
    }

    #[test]
    fn test_threshold() {
        let settings = BudgetSettings {
            monthly_budget: 1000.0,
            ..Default::default()
        };
        assert!(!settings.is_over_threshold(799.0));
        assert!(settings.is_over_threshold(800.0));
        assert!(!BudgetSettings::default().is_over_threshold(1e9));
    }
}
