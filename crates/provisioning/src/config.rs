use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserType {
    Student,
    Employee,
}

/// License settings applied to every newly created user.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    student_pattern: Arc<str>,
    student_sku: Arc<str>,
    employee_sku: Arc<str>,
    #[serde(default)]
    disabled_plans: Vec<String>,
}

impl Config {
    pub fn new() -> envy::Result<Self> {
        ConfigBuilder::default().build()
    }

    pub fn builder<'a>() -> ConfigBuilder<'a> {
        ConfigBuilder::default()
    }

    pub fn with_skus<T>(student_pattern: T, student_sku: T, employee_sku: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            student_pattern: Arc::from(student_pattern.into()),
            student_sku: Arc::from(student_sku.into()),
            employee_sku: Arc::from(employee_sku.into()),
            disabled_plans: vec![],
        }
    }

    pub fn with_disabled_plans(mut self, disabled_plans: Vec<String>) -> Self {
        self.disabled_plans = disabled_plans;
        self
    }

    pub fn student_pattern(&self) -> &str {
        &self.student_pattern
    }

    pub fn disabled_plans(&self) -> &[String] {
        &self.disabled_plans
    }

    /// Usernames containing the student pattern are students, all others employees.
    pub fn user_type(&self, username: &str) -> UserType {
        if username.contains(self.student_pattern.as_ref()) {
            UserType::Student
        } else {
            UserType::Employee
        }
    }

    pub fn sku_for(&self, user_type: UserType) -> &str {
        match user_type {
            UserType::Student => &self.student_sku,
            UserType::Employee => &self.employee_sku,
        }
    }
}

#[derive(Default)]
pub struct ConfigBuilder<'a> {
    prefix: Option<&'a str>,
}

impl<'a> ConfigBuilder<'a> {
    pub fn with_prefix(mut self, prefix: &'a str) -> Self {
        self.prefix = Some(prefix);
        self
    }

    pub fn build(self) -> envy::Result<Config> {
        let prefix = self.prefix.unwrap_or("LICENSE_");
        let mut cfg: Config = envy::prefixed(prefix).from_env()?;
        cfg.disabled_plans = cfg
            .disabled_plans
            .into_iter()
            .map(|plan| plan.trim().to_string())
            .filter(|plan| !plan.is_empty())
            .collect();
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::UserType;

    #[test]
    fn parse_prefixed_config_test() -> envy::Result<()> {
        std::env::set_var("LICENSE_CUSTOM_TEST_STUDENT_PATTERN", "_");
        std::env::set_var("LICENSE_CUSTOM_TEST_STUDENT_SKU", "stu-sku");
        std::env::set_var("LICENSE_CUSTOM_TEST_EMPLOYEE_SKU", "emp-sku");
        std::env::set_var("LICENSE_CUSTOM_TEST_DISABLED_PLANS", "plan-a, plan-b");
        let cfg = super::Config::builder()
            .with_prefix("LICENSE_CUSTOM_TEST_")
            .build()?;
        assert_eq!(cfg.student_pattern(), "_");
        assert_eq!(cfg.disabled_plans(), ["plan-a", "plan-b"]);
        assert_eq!(cfg.sku_for(UserType::Student), "stu-sku");
        assert_eq!(cfg.sku_for(UserType::Employee), "emp-sku");
        Ok(())
    }

    #[test]
    fn disabled_plans_default_to_empty() -> envy::Result<()> {
        std::env::set_var("LICENSE_NO_PLANS_TEST_STUDENT_PATTERN", "_");
        std::env::set_var("LICENSE_NO_PLANS_TEST_STUDENT_SKU", "stu-sku");
        std::env::set_var("LICENSE_NO_PLANS_TEST_EMPLOYEE_SKU", "emp-sku");
        let cfg = super::Config::builder()
            .with_prefix("LICENSE_NO_PLANS_TEST_")
            .build()?;
        assert!(cfg.disabled_plans().is_empty());
        Ok(())
    }

    #[test]
    fn classify_user_type() {
        let cfg = super::Config::with_skus("_", "stu-sku", "emp-sku");
        assert_eq!(cfg.user_type("doe_j"), UserType::Student);
        assert_eq!(cfg.user_type("jdoe"), UserType::Employee);
    }
}
