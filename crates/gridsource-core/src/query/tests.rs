use crate::{
    filter::{CompareOp, Condition, Filter, Params},
    query::{LoadContextBuilder, LoadQuery, SortDirection, SortError, SortInfo, single_sort_field},
    value::Value,
};

#[test]
fn build_without_filter_uses_defaults() {
    let context = LoadContextBuilder::new("sales$Order")
        .build()
        .expect("unfiltered load should build");

    assert_eq!(context.entity_name, "sales$Order");
    assert_eq!(context.query, LoadQuery::default());
    assert!(context.soft_deletion);
    assert_eq!(context.query_key, 0);
    assert!(context.prev_queries.is_empty());
}

#[test]
fn build_short_circuits_on_denying_filter() {
    let filter = Filter::deny();

    assert!(
        LoadContextBuilder::new("sales$Order")
            .filter(Some(&filter))
            .build()
            .is_none()
    );
}

#[test]
fn build_short_circuits_when_bound_filter_denies_everything() {
    let filter = Filter::new(Condition::And(vec![
        Condition::equals("status", "open"),
        Condition::Or(vec![Condition::Deny]),
    ]));

    assert!(
        LoadContextBuilder::new("sales$Order")
            .filter(Some(&filter))
            .build()
            .is_none()
    );
}

#[test]
fn sort_is_shipped_only_when_backend_sorting_is_enabled() {
    let sort = SortInfo::desc("total");

    let local = LoadContextBuilder::new("sales$Order")
        .sort(Some(&sort), false)
        .build()
        .expect("load should build");
    let remote = LoadContextBuilder::new("sales$Order")
        .sort(Some(&sort), true)
        .build()
        .expect("load should build");

    assert!(local.query.sort.is_none());
    assert_eq!(remote.query.sort, Some(sort));
}

#[test]
fn zero_paging_bounds_are_left_unset() {
    let unpaged = LoadContextBuilder::new("sales$Order")
        .page(0, 0)
        .build()
        .expect("load should build");
    let paged = LoadContextBuilder::new("sales$Order")
        .page(40, 20)
        .build()
        .expect("load should build");

    assert!(!unpaged.query.is_paged());
    assert_eq!(paged.query.first_result, Some(40));
    assert_eq!(paged.query.max_results, Some(20));
}

#[test]
fn only_referenced_parameters_are_shipped() {
    let filter = Filter::new(Condition::param("owner", CompareOp::Eq, "user"));
    let mut params = Params::new();
    params.insert("user".to_string(), Value::from("alice"));
    params.insert("unrelated".to_string(), Value::from(1i64));

    let context = LoadContextBuilder::new("sales$Order")
        .filter(Some(&filter))
        .params(&params)
        .build()
        .expect("load should build");

    assert_eq!(context.query.parameters.len(), 1);
    assert_eq!(
        context.query.parameters.get("user"),
        Some(&Value::from("alice"))
    );
    assert_eq!(
        context.query.filter,
        Some(Condition::equals("owner", "alice"))
    );
}

#[test]
fn history_is_copied_into_the_context() {
    let pinned = vec![LoadQuery {
        max_results: Some(50),
        ..LoadQuery::default()
    }];

    let context = LoadContextBuilder::new("sales$Order")
        .view(Some("order.browse"))
        .soft_deletion(false)
        .history(Some(7), &pinned)
        .build()
        .expect("load should build");

    assert_eq!(context.query_key, 7);
    assert_eq!(context.prev_queries, pinned);
    assert_eq!(context.view.as_deref(), Some("order.browse"));
    assert!(!context.soft_deletion);
}

#[test]
fn load_context_round_trips_through_json() {
    let filter = Filter::new(Condition::equals("customer.name", "acme"));
    let sort = SortInfo::asc("created");
    let context = LoadContextBuilder::new("sales$Order")
        .filter(Some(&filter))
        .sort(Some(&sort), true)
        .build()
        .expect("load should build");

    let json = serde_json::to_string(&context).expect("context should serialize");
    let back = serde_json::from_str(&json).expect("context should deserialize");

    assert_eq!(context, back);
}

#[test]
fn single_sort_field_rejects_zero_or_many() {
    let one = [SortInfo::asc("a")];
    let two = [SortInfo::asc("a"), SortInfo::desc("b")];

    let sort = single_sort_field(&one).expect("one field should be accepted");
    assert_eq!(sort.direction, SortDirection::Asc);
    assert_eq!(
        single_sort_field(&two),
        Err(SortError::UnsupportedFieldCount { count: 2 })
    );
    assert_eq!(
        single_sort_field(&[]),
        Err(SortError::UnsupportedFieldCount { count: 0 })
    );
}
