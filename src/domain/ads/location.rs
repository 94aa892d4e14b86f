use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::validation::{optional_text, required_text};

#[derive(Debug, Clone)]
pub struct Country {
    pub id: Uuid,
    pub name: String,
    pub short_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Country {
    pub const MAX_NAME_LENGTH: usize = 200;
    pub const MAX_SHORT_NAME_LENGTH: usize = 4;

    pub fn new(name: &str, short_name: Option<&str>) -> DomainResult<Self> {
        let now = Utc::now();
        let mut country = Self {
            id: Uuid::new_v4(),
            name: String::new(),
            short_name: None,
            created_at: now,
            updated_at: now,
        };
        country.update(name, short_name)?;
        country.updated_at = now;
        Ok(country)
    }

    pub fn update(&mut self, name: &str, short_name: Option<&str>) -> DomainResult<()> {
        self.name = required_text("name", name, Self::MAX_NAME_LENGTH)?;
        self.short_name = optional_text("short_name", short_name, Self::MAX_SHORT_NAME_LENGTH)?
            .map(|s| s.to_uppercase());
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct City {
    pub id: Uuid,
    pub name: String,
    pub country_id: Option<Uuid>,
    pub short_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl City {
    pub const MAX_NAME_LENGTH: usize = 200;
    pub const MAX_SHORT_NAME_LENGTH: usize = 30;

    pub fn new(name: &str, country_id: Option<Uuid>, short_name: Option<&str>) -> DomainResult<Self> {
        let now = Utc::now();
        let mut city = Self {
            id: Uuid::new_v4(),
            name: String::new(),
            country_id: None,
            short_name: None,
            created_at: now,
            updated_at: now,
        };
        city.update(name, country_id, short_name)?;
        city.updated_at = now;
        Ok(city)
    }

    pub fn update(
        &mut self,
        name: &str,
        country_id: Option<Uuid>,
        short_name: Option<&str>,
    ) -> DomainResult<()> {
        self.name = required_text("name", name, Self::MAX_NAME_LENGTH)?;
        self.country_id = country_id;
        self.short_name = optional_text("short_name", short_name, Self::MAX_SHORT_NAME_LENGTH)?;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// A city joined with the name of its country
#[derive(Debug, Clone)]
pub struct CityWithCountry {
    pub city: City,
    pub country: Option<Country>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_short_name_is_uppercased() {
        let country = Country::new("Spain", Some("es")).unwrap();
        assert_eq!(country.short_name.as_deref(), Some("ES"));
    }

    #[test]
    fn country_short_name_length_enforced() {
        assert!(Country::new("Spain", Some("SPAIN")).is_err());
    }

    #[test]
    fn city_requires_name() {
        assert!(City::new(" ", None, None).is_err());
        let city = City::new("Barcelona", None, Some("BCN")).unwrap();
        assert_eq!(city.name, "Barcelona");
        assert_eq!(city.short_name.as_deref(), Some("BCN"));
    }
}
