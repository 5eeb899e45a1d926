//! Wire-level records for reading a product mix request from JSON.
//!
//! Every field is optional here so that missing values are reported as
//! validation errors naming the field, rather than as opaque parse errors.

use serde::{Deserialize, Serialize};

use crate::product_mix::{OptimizationRequest, Product};
use crate::validate::ValidationError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawProduct {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub cost: Option<f64>,
    pub max_demand: Option<f64>,
    pub capacity_required: Option<f64>,
    pub current_qty: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRequest {
    pub products: Vec<RawProduct>,
    #[serde(default)]
    pub capacity: Option<f64>,
    #[serde(default)]
    pub budget: Option<f64>,
}

impl RawProduct {
    fn prepare(self, row: usize) -> Result<Product, ValidationError> {
        let name = self
            .name
            .filter(|name| !name.trim().is_empty())
            .ok_or(ValidationError::MissingName(row))?;
        let price = self
            .price
            .ok_or_else(|| ValidationError::MissingField(format!("price of {}", name)))?;
        let cost = self
            .cost
            .ok_or_else(|| ValidationError::MissingField(format!("cost of {}", name)))?;

        Ok(Product {
            name,
            price,
            cost,
            max_demand: self.max_demand,
            capacity_required: self.capacity_required.unwrap_or(0.0),
            current_qty: self.current_qty.unwrap_or(0.0),
        })
    }
}

impl RawRequest {
    /// Promote the raw rows into a validated request
    pub fn prepare(self) -> Result<OptimizationRequest, ValidationError> {
        let products = self
            .products
            .into_iter()
            .enumerate()
            .map(|(row, raw)| raw.prepare(row))
            .collect::<Result<Vec<_>, _>>()?;

        let request = OptimizationRequest {
            products,
            capacity: self.capacity,
            budget: self.budget,
        };
        request.validate()?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_defaults() {
        let raw: RawRequest = serde_json::from_str(
            r#"{
                "products": [
                    { "name": "A", "price": 10, "cost": 6, "max_demand": 1000 },
                    { "name": "B", "price": 12, "cost": 9, "capacity_required": 0.8, "current_qty": 80 }
                ],
                "capacity": 100
            }"#,
        )
        .unwrap();

        let request = raw.prepare().unwrap();
        assert_eq!(request.capacity, Some(100.0));
        assert_eq!(request.budget, None);
        assert_eq!(request.products[0].capacity_required, 0.0);
        assert_eq!(request.products[0].max_demand, Some(1000.0));
        assert_eq!(request.products[1].max_demand, None);
        assert_eq!(request.products[1].current_qty, 80.0);
    }

    #[test]
    fn test_prepare_missing_name() {
        let raw: RawRequest = serde_json::from_str(r#"{ "products": [ { "price": 1, "cost": 1 } ] }"#).unwrap();
        assert_eq!(raw.prepare().unwrap_err(), ValidationError::MissingName(0));
    }

    #[test]
    fn test_prepare_missing_price() {
        let raw: RawRequest = serde_json::from_str(r#"{ "products": [ { "name": "A", "cost": 1 } ] }"#).unwrap();
        assert_eq!(
            raw.prepare().unwrap_err(),
            ValidationError::MissingField("price of A".to_string())
        );
    }

    #[test]
    fn test_non_numeric_field_fails_to_parse() {
        let parsed = serde_json::from_str::<RawRequest>(r#"{ "products": [ { "name": "A", "price": "ten", "cost": 1 } ] }"#);
        assert!(parsed.is_err());
    }
}
