use crate::ids;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// An operating company. Farms and assets refer to it by `company_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    #[serde(default)]
    pub company_id: String,
    pub name: String,
    pub logo: Option<String>,
    pub industry: Option<String>,
    /// Free-text location reference, not enforced against `locations`.
    pub location_id: Option<String>,
    pub established_date: Option<NaiveDate>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Company {
    pub fn new(company_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            company_id: company_id.into(),
            name: name.into(),
            logo: None,
            industry: None,
            location_id: None,
            established_date: None,
            created_at: Utc::now(),
        }
    }

    /// Stand-in created when an imported row names a company that does not exist yet.
    pub fn placeholder(company_id: &str) -> Self {
        let mut company = Self::new(company_id, format!("Company {company_id}"));
        company.industry = Some("Oil & Gas".to_string());
        company
    }

    pub fn ensure_id(&mut self) {
        if self.company_id.trim().is_empty() {
            self.company_id = ids::company_id();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_company() {
        let company = Company::placeholder("SYS-88627B0B");
        assert_eq!(company.name, "Company SYS-88627B0B");
        assert_eq!(company.industry.as_deref(), Some("Oil & Gas"));
    }

    #[test]
    fn test_ensure_id_keeps_existing() {
        let mut company = Company::new("SYS-1", "Acme");
        company.ensure_id();
        assert_eq!(company.company_id, "SYS-1");

        let mut fresh = Company::new("", "Acme");
        fresh.ensure_id();
        assert!(fresh.company_id.starts_with("COMP-"));
    }

    #[test]
    fn test_deserialize_without_id_or_timestamp() {
        let company: Company = serde_json::from_str(r#"{"name": "Acme"}"#).unwrap();
        assert!(company.company_id.is_empty());
        assert!(company.logo.is_none());
    }
}
