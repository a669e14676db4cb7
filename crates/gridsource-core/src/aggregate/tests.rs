use crate::{
    aggregate::{AggregatableDelegate, AggregateError, AggregateKind, AggregationSpec, ItemResolver},
    model::PropertyPath,
    value::Value,
};
use std::collections::HashMap;

///
/// MapResolver
///

struct MapResolver(HashMap<u32, HashMap<String, Value>>);

impl ItemResolver<u32> for MapResolver {
    fn item_value(&self, key: &u32, property: &PropertyPath) -> Option<Value> {
        let row = self.0.get(key)?;
        Some(row.get(&property.to_string()).cloned().unwrap_or_default())
    }
}

fn resolver() -> MapResolver {
    let rows = [
        (1, Value::Int(10), Value::from("north"), Value::Float(1.5)),
        (2, Value::Int(20), Value::from("south"), Value::Null),
        (3, Value::Null, Value::from("east"), Value::Float(2.5)),
        (4, Value::Int(-4), Value::from("west"), Value::Float(3.0)),
    ];

    MapResolver(
        rows.into_iter()
            .map(|(key, qty, region, weight)| {
                let mut row = HashMap::new();
                row.insert("qty".to_string(), qty);
                row.insert("customer.region".to_string(), region);
                row.insert("weight".to_string(), weight);
                (key, row)
            })
            .collect(),
    )
}

fn run(specs: &[AggregationSpec], keys: &[u32]) -> Vec<String> {
    let resolver = resolver();
    AggregatableDelegate::new(&resolver)
        .aggregate(specs, keys)
        .expect("aggregation should succeed")
        .into_values()
        .collect()
}

#[test]
fn numeric_aggregates_skip_nulls() {
    let specs = [
        AggregationSpec::new("qty", AggregateKind::Sum),
        AggregationSpec::new("qty", AggregateKind::Count),
        AggregationSpec::new("qty", AggregateKind::Min),
        AggregationSpec::new("qty", AggregateKind::Max),
    ];

    assert_eq!(run(&specs, &[1, 2, 3, 4]), vec!["26", "3", "-4", "20"]);
}

#[test]
fn avg_is_float_and_honours_precision() {
    let specs = [AggregationSpec::new("weight", AggregateKind::Avg).with_precision(2)];

    assert_eq!(run(&specs, &[1, 2, 3, 4]), vec!["2.33"]);
}

#[test]
fn only_requested_keys_are_aggregated() {
    let specs = [AggregationSpec::new("qty", AggregateKind::Sum)];

    assert_eq!(run(&specs, &[1, 4]), vec!["6"]);
}

#[test]
fn unknown_keys_are_skipped() {
    let specs = [AggregationSpec::new("qty", AggregateKind::Count)];

    assert_eq!(run(&specs, &[1, 99]), vec!["1"]);
}

#[test]
fn dotted_paths_resolve_through_the_resolver() {
    let specs = [AggregationSpec::new(
        "customer.region",
        AggregateKind::Max,
    )];

    assert_eq!(run(&specs, &[1, 2, 3, 4]), vec!["west"]);
}

#[test]
fn empty_input_formats_as_empty_string() {
    let specs = [
        AggregationSpec::new("qty", AggregateKind::Sum),
        AggregationSpec::new("qty", AggregateKind::Avg),
        AggregationSpec::new("qty", AggregateKind::Count),
    ];

    assert_eq!(run(&specs, &[]), vec!["", "", "0"]);
}

#[test]
fn sum_of_text_is_rejected() {
    let resolver = resolver();
    let specs = [AggregationSpec::new("customer.region", AggregateKind::Sum)];

    let err = AggregatableDelegate::new(&resolver)
        .aggregate(&specs, &[1u32])
        .expect_err("text values cannot be summed");

    assert!(matches!(
        err,
        AggregateError::NonNumeric { kind: AggregateKind::Sum, ref property, .. }
            if property == "customer.region"
    ));
}

#[test]
fn results_keep_request_order() {
    let resolver = resolver();
    let specs = [
        AggregationSpec::new("weight", AggregateKind::Sum),
        AggregationSpec::new("qty", AggregateKind::Sum),
    ];

    let results = AggregatableDelegate::new(&resolver)
        .aggregate(&specs, &[1u32, 3])
        .expect("aggregation should succeed");

    let keys: Vec<&AggregationSpec> = results.keys().collect();
    assert_eq!(keys, vec![&specs[0], &specs[1]]);
    assert_eq!(results.get(&specs[0]).map(String::as_str), Some("4"));
}
