use crate::value::{Value, canonical_cmp, strict_order_cmp};
use std::cmp::Ordering;

// ---- helpers -----------------------------------------------------------

fn v_txt(s: &str) -> Value {
    Value::Text(s.to_string())
}

#[test]
fn null_sorts_before_every_other_variant() {
    for value in [
        Value::Bool(false),
        Value::Int(-5),
        Value::Float(-1.5),
        Value::Timestamp(0),
        v_txt(""),
        Value::List(vec![]),
    ] {
        assert_eq!(canonical_cmp(&Value::Null, &value), Ordering::Less);
        assert_eq!(canonical_cmp(&value, &Value::Null), Ordering::Greater);
    }
}

#[test]
fn numeric_variants_compare_by_magnitude() {
    assert_eq!(
        canonical_cmp(&Value::Int(-1), &Value::Uint(0)),
        Ordering::Less
    );
    assert_eq!(
        canonical_cmp(&Value::Uint(3), &Value::Float(2.5)),
        Ordering::Greater
    );
    assert_eq!(
        canonical_cmp(&Value::Int(2), &Value::Float(2.0)),
        Ordering::Equal
    );
}

#[test]
fn nan_still_yields_a_total_order() {
    let nan = Value::Float(f64::NAN);
    let one = Value::Float(1.0);

    let forward = canonical_cmp(&nan, &one);
    let backward = canonical_cmp(&one, &nan);
    assert_eq!(forward, backward.reverse());
}

#[test]
fn strict_order_rejects_mixed_families() {
    assert_eq!(strict_order_cmp(&v_txt("a"), &Value::Int(1)), None);
    assert_eq!(
        strict_order_cmp(&v_txt("a"), &v_txt("b")),
        Some(Ordering::Less)
    );
}

#[test]
fn list_comparison_is_lexicographic_then_by_length() {
    let short = Value::from_list(vec![1i64, 2]);
    let long = Value::from_list(vec![1i64, 2, 3]);
    let bigger = Value::from_list(vec![1i64, 3]);

    assert_eq!(canonical_cmp(&short, &long), Ordering::Less);
    assert_eq!(canonical_cmp(&bigger, &long), Ordering::Greater);
}

#[test]
fn display_renders_null_as_empty() {
    assert_eq!(Value::Null.to_string(), "");
    assert_eq!(Value::from(Some(7i64)).to_string(), "7");
    assert_eq!(Value::from(None::<i64>), Value::Null);
    assert_eq!(Value::from_list(vec!["a", "b"]).to_string(), "[a, b]");
}
