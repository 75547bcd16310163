//! The customer record the CLI filters.

use std::fmt;

use chrono::NaiveDate;
use dynfilter::Record;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A customer row as stored in the input files.
///
/// Serialized keys use the same camelCase names as the query fields, so
/// `--field spendAverage` matches the `spendAverage` column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[field(Int)]
    pub id: i32,

    #[field(String)]
    pub name: String,

    #[field(Int)]
    pub telephone: i64,

    #[field(Int)]
    pub age: i32,

    #[field(Decimal, rename = "spendAverage")]
    pub spend_average: Decimal,

    #[field(Int, rename = "categoryId")]
    pub category_id: i32,

    #[field(Bool, rename = "isActive")]
    pub is_active: bool,

    #[field(Date, rename = "joinDate")]
    pub join_date: NaiveDate,
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Id: {}, Name: {}, Telephone: {}, Age: {}, Spend Average: {:.2}, Category Id: {}, Active: {}, Join Date: {}",
            self.id,
            self.name,
            self.telephone,
            self.age,
            self.spend_average,
            self.category_id,
            self.is_active,
            self.join_date.format("%Y-%m-%d"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynfilter::{resolve, FieldType};

    fn sample() -> Customer {
        Customer {
            id: 1,
            name: "ahmed ali".into(),
            telephone: 201001234567,
            age: 18,
            spend_average: Decimal::new(15005, 1),
            category_id: 2,
            is_active: true,
            join_date: NaiveDate::from_ymd_opt(2021, 3, 14).unwrap(),
        }
    }

    #[test]
    fn schema_uses_camel_case_names() {
        let schema = Customer::schema();
        assert_eq!(
            resolve(schema, Customer::SPEND_AVERAGE).unwrap().field_type(),
            FieldType::Decimal
        );
        assert_eq!(
            resolve(schema, Customer::JOIN_DATE).unwrap().field_type(),
            FieldType::Date
        );
        assert_eq!(schema.len(), 8);
    }

    #[test]
    fn display_line() {
        assert_eq!(
            sample().to_string(),
            "Id: 1, Name: ahmed ali, Telephone: 201001234567, Age: 18, Spend Average: 1500.50, Category Id: 2, Active: true, Join Date: 2021-03-14"
        );
    }

    #[test]
    fn serde_keys_match_query_names() {
        let json = serde_json::to_value(sample()).unwrap();
        for field in Customer::schema().fields() {
            assert!(json.get(field.name()).is_some(), "missing {}", field.name());
        }
    }
}
