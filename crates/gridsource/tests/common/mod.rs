//! Shared fixtures for the integration tests: a small entity type and
//! in-memory, counting and failing load services.

#![allow(dead_code)]

use gridsource::{
    core::{
        filter::Operand,
        obs::{MetricsEvent, MetricsSink},
        value::{canonical_cmp, strict_order_cmp},
    },
    prelude::*,
};
use parking_lot::Mutex;
use std::{
    cmp::Ordering,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering as AtomicOrdering},
    },
};

///
/// Customer
///

#[derive(Clone, Debug, PartialEq)]
pub struct Customer {
    pub id: u64,
    pub name: String,
    pub city: Option<String>,
    pub balance: f64,
    pub orders: i64,
    pub new: bool,
}

impl Customer {
    pub fn new(id: u64, name: &str, city: Option<&str>, balance: f64, orders: i64) -> Self {
        Self {
            id,
            name: name.to_string(),
            city: city.map(str::to_string),
            balance,
            orders,
            new: false,
        }
    }

    pub fn draft(id: u64, name: &str) -> Self {
        Self {
            new: true,
            ..Self::new(id, name, None, 0.0, 0)
        }
    }
}

impl EntityKey for Customer {
    type Key = u64;
}

impl EntityKind for Customer {
    const ENTITY_NAME: &'static str = "crm$Customer";

    fn id(&self) -> u64 {
        self.id
    }

    fn is_new(&self) -> bool {
        self.new
    }

    fn get_value(&self, property: &str) -> Value {
        match property {
            "id" => Value::Uint(self.id),
            "name" => Value::from(self.name.as_str()),
            "city" | "address.city" => Value::from(self.city.clone()),
            "balance" => Value::Float(self.balance),
            "orders" => Value::Int(self.orders),
            _ => Value::Null,
        }
    }
}

pub fn customers() -> Vec<Customer> {
    vec![
        Customer::new(1, "Wendy", Some("Oslo"), 120.5, 3),
        Customer::new(2, "Arne", Some("Bergen"), 80.0, 1),
        Customer::new(3, "Mia", None, 310.25, 7),
        Customer::new(4, "Lars", Some("Oslo"), 15.0, 0),
        Customer::new(5, "Ida", Some("Tromso"), 99.0, 2),
    ]
}

///
/// InMemoryService
///
/// Backend stand-in: evaluates the bound filter, applies the shipped sort and
/// paging window, and counts calls.
///

#[derive(Default)]
pub struct InMemoryService {
    rows: Mutex<Vec<Customer>>,
    calls: AtomicUsize,
    contexts: Mutex<Vec<LoadContext>>,
}

impl InMemoryService {
    pub fn with_rows(rows: Vec<Customer>) -> Arc<Self> {
        let service = Self::default();
        *service.rows.lock() = rows;

        Arc::new(service)
    }

    pub fn set_rows(&self, rows: Vec<Customer>) {
        *self.rows.lock() = rows;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(AtomicOrdering::SeqCst)
    }

    pub fn last_context(&self) -> Option<LoadContext> {
        self.contexts.lock().last().cloned()
    }
}

impl LoadService<Customer> for InMemoryService {
    fn load_list(&self, context: &LoadContext) -> Result<Vec<Customer>, LoadError> {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
        self.contexts.lock().push(context.clone());

        let query = &context.query;
        let mut rows: Vec<Customer> = self
            .rows
            .lock()
            .iter()
            .filter(|row| query.filter.as_ref().is_none_or(|c| matches(*row, c)))
            .cloned()
            .collect();

        if let Some(sort) = &query.sort {
            rows.sort_by(sort.comparator::<Customer>());
        }

        let first = query.first_result.unwrap_or(0);
        let max = query.max_results.unwrap_or(usize::MAX);

        Ok(rows.into_iter().skip(first).take(max).collect())
    }
}

fn matches<E: EntityKind>(item: &E, condition: &Condition) -> bool {
    match condition {
        Condition::And(children) => children.iter().all(|c| matches(item, c)),
        Condition::Or(children) => children.iter().any(|c| matches(item, c)),
        Condition::Deny => false,
        Condition::Compare {
            property,
            op,
            operand,
        } => {
            let left = item.get_value_ex(property);
            let Operand::Literal(right) = operand else {
                return false;
            };
            let ordering = strict_order_cmp(&left, right);

            match op {
                CompareOp::Eq => canonical_cmp(&left, right) == Ordering::Equal,
                CompareOp::Ne => canonical_cmp(&left, right) != Ordering::Equal,
                CompareOp::Lt => ordering == Some(Ordering::Less),
                CompareOp::Lte => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
                CompareOp::Gt => ordering == Some(Ordering::Greater),
                CompareOp::Gte => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
                CompareOp::Contains => left.text_contains(right).unwrap_or(false),
                CompareOp::StartsWith => left.text_starts_with(right).unwrap_or(false),
                CompareOp::IsNull => left.is_null(),
                CompareOp::NotNull => !left.is_null(),
            }
        }
    }
}

///
/// FailingService
///

#[derive(Default)]
pub struct FailingService {
    calls: AtomicUsize,
}

impl FailingService {
    pub fn calls(&self) -> usize {
        self.calls.load(AtomicOrdering::SeqCst)
    }
}

impl LoadService<Customer> for FailingService {
    fn load_list(&self, context: &LoadContext) -> Result<Vec<Customer>, LoadError> {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);

        Err(LoadError::Timeout {
            entity: context.entity_name.clone(),
        })
    }
}

///
/// NullMetrics
///

pub struct NullMetrics;

impl MetricsSink for NullMetrics {
    fn record(&self, _: MetricsEvent) {}
}

/// Datasource over `service` in a permit-all session, metrics discarded.
pub fn datasource(service: Arc<dyn LoadService<Customer>>) -> CollectionDatasource<Customer> {
    CollectionDatasource::builder(
        "customersDs",
        service,
        Arc::new(UserSession::permit_all("tester")),
    )
    .metrics(Arc::new(NullMetrics))
    .build()
}

pub type EventLog = Arc<Mutex<Vec<DatasourceEvent<u64>>>>;

pub fn record_events(ds: &CollectionDatasource<Customer>) -> EventLog {
    let log: EventLog = Arc::default();
    let sink = Arc::clone(&log);
    ds.subscribe(Arc::new(move |event: &DatasourceEvent<u64>| {
        sink.lock().push(event.clone());
    }));

    log
}
