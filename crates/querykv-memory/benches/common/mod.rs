#![allow(dead_code)]

use bson::doc;
use querykv_memory::MemoryRepository;
use querykv_query::{QueryError, QueryFacade, Record, Value};

#[derive(Debug, Clone)]
pub struct Customer {
    pub id: String,
    pub status: String,
    pub value: f64,
}

pub fn make_customer(record: Record<String>) -> Result<Customer, QueryError> {
    let status = record
        .get("status")
        .and_then(Value::as_str)
        .ok_or_else(|| QueryError::materialize(&record.key, "status missing"))?
        .to_string();
    let value = record.get("value").and_then(Value::as_f64).unwrap_or(0.0);
    Ok(Customer {
        id: record.key,
        status,
        value,
    })
}

pub fn customer_key(customer: &Customer) -> String {
    customer.id.clone()
}

/// Deterministic customer-like document for index `i`.
pub fn generate_document(i: usize) -> bson::Document {
    let first_names = ["Alice", "Bob", "Carol", "David", "Eve", "Frank", "Grace", "Hank"];
    let last_names = ["Johnson", "Smith", "Williams", "Brown", "Jones", "Garcia"];
    let statuses = ["active", "inactive", "pending", "suspended"];
    let products = ["Enterprise Suite", "Starter Plan", "Growth Tier", "Platform Pro"];

    let first = first_names[i % first_names.len()];
    let last = last_names[i % last_names.len()];

    doc! {
        "_id": format!("user-{i:05}"),
        "name": format!("{first} {last}"),
        "status": statuses[i % statuses.len()],
        "product": products[i % products.len()],
        "value": ((i as f64 + 1.0) * 1234.56).round(),
        "padding": "x".repeat(120),
    }
}

pub fn seeded_facade(n: usize) -> QueryFacade<MemoryRepository<String>, String, Customer> {
    let repo = MemoryRepository::new();
    repo.load_documents((0..n).map(generate_document)).unwrap();
    QueryFacade::new(repo, make_customer, customer_key)
        .with_projection(querykv_query::Projection::of(["status", "value"]))
}
