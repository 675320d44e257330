//! Integration tests for where/select queries.

use filter_collection::{
    AttributePolicy, Attributes, Collection, CollectionError, Condition, Op, OperatorPolicy,
    Query, QueryOptions, Record, Selection, Term, Value,
};

#[derive(Debug, Clone, PartialEq)]
struct Foo {
    value: String,
}

impl Attributes for Foo {
    fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "value" => Some(Value::from(&self.value)),
            _ => None,
        }
    }
}

fn foo(value: &str) -> Foo {
    Foo {
        value: value.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Item {
    value: i64,
    label: Option<String>,
}

impl Attributes for Item {
    fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "value" => Some(Value::from(self.value)),
            "label" => Some(Value::from(self.label.clone())),
            _ => None,
        }
    }
}

fn item(value: i64) -> Item {
    Item { value, label: None }
}

// ============================================================================
// Basic where forms
// ============================================================================

#[test]
fn where_fn_on_plain_numbers() {
    let data = vec![1, 2, 3, 4];
    let result = Query::new(&data).where_fn(|x| *x >= 3).get().unwrap();
    assert_eq!(result, vec![3, 4]);
}

#[test]
fn where_attribute_equals_literal() {
    let data = vec![foo("one"), foo("two"), foo("one")];
    let result = Query::new(&data).where_(("value", "one")).get().unwrap();

    assert_eq!(result.len(), 2);
    assert!(result.iter().all(|f| f.value == "one"));
}

#[test]
fn no_clauses_returns_everything() {
    let data = vec![foo("one"), foo("two"), foo("one")];
    assert_eq!(Query::new(&data).get().unwrap(), data);
}

#[test]
fn where_with_operator() {
    let data = vec![item(1), item(2), item(3)];
    let result = Query::new(&data).where_(("value", ">=", 2)).get().unwrap();
    assert_eq!(result, vec![item(2), item(3)]);
}

#[test]
fn operator_accepted_as_op_or_token() {
    let data = vec![item(1), item(2), item(3)];
    let by_token = Query::new(&data).where_(("value", "<", 3)).get().unwrap();
    let by_op = Query::new(&data).where_(("value", Op::Lt, 3)).get().unwrap();
    assert_eq!(by_token, by_op);
    assert_eq!(by_op.len(), 2);
}

#[test]
fn function_term_with_equality() {
    let data = vec![foo("a"), foo("bb"), foo("cc")];
    let result = Query::new(&data)
        .where_((Term::func(|f: &Foo| f.value.len()), 2))
        .get()
        .unwrap();
    assert_eq!(result, vec![foo("bb"), foo("cc")]);
}

#[test]
fn one_term_attribute_uses_truthiness() {
    let data = vec![
        Item {
            value: 0,
            label: Some("x".into()),
        },
        Item {
            value: 1,
            label: None,
        },
        Item {
            value: 2,
            label: Some(String::new()),
        },
    ];

    assert_eq!(Query::new(&data).where_("value").count().unwrap(), 2);
    assert_eq!(Query::new(&data).where_("label").count().unwrap(), 1);
    assert_eq!(Query::new(&data).where_not("label").count().unwrap(), 2);
}

#[test]
fn explicit_condition_values() {
    let data = vec![item(1), item(5)];
    let condition: Condition<Item> = Condition::compare("value", Op::Gt, 2);
    assert_eq!(Query::new(&data).where_(condition).get().unwrap(), vec![item(5)]);
}

// ============================================================================
// where_not and composition
// ============================================================================

#[test]
fn where_not_is_complement_of_where() {
    let data: Vec<Item> = (0..10).map(item).collect();
    let kept = Query::new(&data).where_(("value", ">", 4)).get().unwrap();
    let dropped = Query::new(&data).where_not(("value", ">", 4)).get().unwrap();

    assert_eq!(kept.len() + dropped.len(), data.len());
    assert!(kept.iter().all(|i| !dropped.contains(i)));
}

#[test]
fn chained_clauses_narrow_sequentially() {
    let data: Vec<Item> = (0..10).map(item).collect();
    let result = Query::new(&data)
        .where_(("value", ">=", 3))
        .where_not_fn(|i| i.value % 2 == 0)
        .where_(("value", "!=", 7))
        .get()
        .unwrap();

    assert_eq!(result, vec![item(3), item(5), item(9)]);
}

#[test]
fn result_preserves_source_order() {
    let data = vec![item(5), item(1), item(4), item(2)];
    let result = Query::new(&data).where_(("value", ">", 1)).get().unwrap();
    assert_eq!(result, vec![item(5), item(4), item(2)]);
}

// ============================================================================
// Errors and options
// ============================================================================

#[test]
fn missing_attribute_is_an_error() {
    let data = vec![foo("one")];
    let err = Query::new(&data).where_(("nope", 1)).get().unwrap_err();

    match err {
        CollectionError::AttributeNotFound { attribute, type_name } => {
            assert_eq!(attribute, "nope");
            assert!(type_name.ends_with("Foo"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_attribute_on_empty_source_is_not_evaluated() {
    let data: Vec<Foo> = Vec::new();
    assert!(Query::new(&data).where_(("nope", 1)).get().unwrap().is_empty());
}

#[test]
fn ordering_across_kinds_is_a_type_mismatch() {
    let data = vec![foo("one")];
    let err = Query::new(&data).where_(("value", ">", 1)).get().unwrap_err();
    assert_eq!(
        err,
        CollectionError::TypeMismatch {
            op: ">",
            left: "string",
            right: "number",
        }
    );
}

#[test]
fn list_ordering_with_incomparable_elements_fails() {
    let data = vec![Value::from(vec![1])];
    let err = Query::new(&data)
        .where_((Term::func(|v: &Value| v.clone()), ">", vec!["a"]))
        .get()
        .unwrap_err();

    assert!(matches!(err, CollectionError::TypeMismatch { op: ">", .. }));

    let ok = Query::new(&data)
        .where_((Term::func(|v: &Value| v.clone()), "<", vec![2]))
        .count()
        .unwrap();
    assert_eq!(ok, 1);
}

#[test]
fn unknown_operator_policies() {
    let data = vec![item(1), item(2)];

    let lenient = Query::new(&data).where_(("value", "in", 1));
    assert!(lenient.get().unwrap().is_empty());

    let strict = lenient
        .clone()
        .with_options(QueryOptions::new().unknown_operator(OperatorPolicy::Strict));
    assert_eq!(
        strict.get().unwrap_err(),
        CollectionError::UnknownOperator("in".into())
    );
}

#[test]
fn null_attribute_policy() {
    let data = vec![foo("one"), foo("two")];
    let options = QueryOptions::new().missing_attribute(AttributePolicy::Null);

    let result = Query::new(&data)
        .with_options(options)
        .where_(("owner", Value::Null))
        .count()
        .unwrap();
    assert_eq!(result, 2);
}

#[test]
fn error_display_messages() {
    let data = vec![foo("one")];
    let err = Query::new(&data).where_("missing").exists().unwrap_err();
    assert!(err.to_string().contains("missing"));
}

// ============================================================================
// Terminals
// ============================================================================

#[test]
fn get_twice_gives_same_result() {
    let data = vec![item(1), item(2), item(3)];
    let query = Query::new(&data).where_(("value", ">", 1));
    assert_eq!(query.get().unwrap(), query.get().unwrap());
}

#[test]
fn exists_first_count() {
    let data = vec![item(1), item(2), item(3)];
    let query = Query::new(&data).where_(("value", ">", 1));

    assert!(query.exists().unwrap());
    assert_eq!(query.first().unwrap(), Some(item(2)));
    assert_eq!(query.count().unwrap(), 2);
}

// ============================================================================
// select
// ============================================================================

#[test]
fn select_projects_records() {
    let data = vec![foo("one"), foo("two")];
    let rows: Vec<Record> = Query::new(&data)
        .where_not(("value", "two"))
        .select(["value"])
        .get()
        .unwrap()
        .into_records()
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["value"], Value::from("one"));
}

#[test]
fn select_on_collection_returns_collection() {
    let data = Collection::from(vec![item(1), item(2)]);
    let rows = data
        .where_(("value", 2))
        .select(["value", "label"])
        .get()
        .unwrap()
        .into_records()
        .unwrap();

    assert_eq!(rows.len(), 1);
    let row = rows.get(0).unwrap();
    assert_eq!(row["value"], Value::from(2));
    assert_eq!(row["label"], Value::Null);
}

#[test]
fn projected_records_serialize() {
    let data = vec![item(7)];
    let rows = Query::new(&data).select(["value"]).get().unwrap().into_records().unwrap();
    assert_eq!(serde_json::to_string(&rows).unwrap(), r#"[{"value":7}]"#);
}

#[test]
fn empty_select_passes_elements_through() {
    let data = vec![1, 2, 3, 4];
    let selection = Query::new(&data).select(Vec::<String>::new()).get().unwrap();

    assert!(!selection.is_projected());
    assert_eq!(selection.into_items(), Some(data.clone()));

    let selection = Query::new(&data)
        .select(Vec::<&str>::new())
        .where_fn(|x| *x > 2)
        .get()
        .unwrap();
    assert_eq!(selection, Selection::Items(vec![3, 4]));
}

#[test]
fn projection_terminals_project_every_survivor() {
    let data = vec![foo("one")];
    let projection = Query::new(&data).select(["missing"]);

    assert!(projection.get().is_err());
    assert!(projection.exists().is_err());
    assert!(projection.count().is_err());

    let rows = vec![
        Record::from([("a".to_string(), Value::from(1))]),
        Record::from([("b".to_string(), Value::from(2))]),
    ];
    let projection = Query::new(&rows).select(["a"]);
    assert!(matches!(
        projection.first(),
        Err(CollectionError::AttributeNotFound { .. })
    ));
}
