//! Shared customer fixture for integration tests.

#![allow(dead_code)]

use dynfilter::{Decimal, FieldType, NaiveDate, Record, Schema, Value};
use once_cell::sync::Lazy;

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: i32,
    pub name: String,
    pub telephone: i64,
    pub age: i32,
    pub spend_average: Decimal,
    pub category_id: i32,
    pub is_active: bool,
    pub join_date: NaiveDate,
}

fn id(c: &Customer) -> Value<'_> {
    Value::Int(c.id.into())
}

fn name(c: &Customer) -> Value<'_> {
    Value::String(&c.name)
}

fn telephone(c: &Customer) -> Value<'_> {
    Value::Int(c.telephone)
}

fn age(c: &Customer) -> Value<'_> {
    Value::Int(c.age.into())
}

fn spend_average(c: &Customer) -> Value<'_> {
    Value::Decimal(c.spend_average)
}

fn category_id(c: &Customer) -> Value<'_> {
    Value::Int(c.category_id.into())
}

fn is_active(c: &Customer) -> Value<'_> {
    Value::Bool(c.is_active)
}

fn join_date(c: &Customer) -> Value<'_> {
    Value::Date(c.join_date)
}

impl Record for Customer {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<Customer>> = Lazy::new(|| {
            Schema::builder("Customer")
                .field("id", FieldType::Int, id)
                .field("name", FieldType::String, name)
                .field("telephone", FieldType::Int, telephone)
                .field("age", FieldType::Int, age)
                .field("spendAverage", FieldType::Decimal, spend_average)
                .field("categoryId", FieldType::Int, category_id)
                .field("isActive", FieldType::Bool, is_active)
                .field("joinDate", FieldType::Date, join_date)
                .build()
        });
        &SCHEMA
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn customer(id: i32, name: &str, age: i32, spend: Decimal) -> Customer {
    Customer {
        id,
        name: name.to_string(),
        telephone: 201_000_000_000 + i64::from(id),
        age,
        spend_average: spend,
        category_id: id % 3 + 1,
        is_active: id % 2 == 1,
        join_date: date(2020, (id as u32 % 12) + 1, 1),
    }
}

pub fn customers() -> Vec<Customer> {
    vec![
        customer(1, "ahmed ali", 18, Decimal::new(1500, 0)),
        customer(2, "Mona", 25, Decimal::new(2500, 0)),
        customer(3, "mohamed", 17, Decimal::new(800, 0)),
        customer(4, "sara ahmed", 30, Decimal::new(2000, 0)),
        customer(5, "Ahmed", 40, Decimal::new(3200, 0)),
        customer(6, "mahmoud", 19, Decimal::new(200050, 2)),
        customer(7, "nour", 22, Decimal::new(199999, 2)),
        customer(8, "mariam", 16, Decimal::new(4100, 0)),
    ]
}

pub fn ids<'a>(rows: impl IntoIterator<Item = &'a Customer>) -> Vec<i32> {
    rows.into_iter().map(|c| c.id).collect()
}
