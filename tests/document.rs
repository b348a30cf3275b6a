use std::str::FromStr;

use jsonpath_dom::json::{parse_text, serialize, SerializeOptions};
use jsonpath_dom::{Array, Error, Kind, Object, ValuePool, Value};

#[test]
fn conversions() {
    #[track_caller]
    fn test(s: &str, kind: Kind, as_bool: Option<bool>, as_f64: Option<f64>, as_i64: Option<i64>) {
        let value = Value::from_str(s).unwrap();
        assert_eq!(value.kind(), kind);
        assert_eq!(value.as_bool().ok(), as_bool, "as_bool({s})");
        assert_eq!(value.as_f64().ok(), as_f64, "as_f64({s})");
        assert_eq!(value.as_i64().ok(), as_i64, "as_i64({s})");
    }

    test("null", Kind::Null, None, None, None);
    test("true", Kind::Bool, Some(true), None, None);
    test("0", Kind::Number, Some(false), Some(0.0), Some(0));
    test("-7", Kind::Number, Some(true), Some(-7.0), Some(-7));
    test("2.5", Kind::Number, Some(true), Some(2.5), None);
    test(r#""""#, Kind::String, Some(false), None, None);
    test(r#""42""#, Kind::String, Some(true), Some(42.0), Some(42));
    test(r#"" 1.5 ""#, Kind::String, Some(true), Some(1.5), None);
    test(r#""abc""#, Kind::String, Some(true), None, None);
    test(r#""NaN""#, Kind::String, Some(true), None, None);
    test("[]", Kind::Array, None, None, None);
    test("{}", Kind::Object, None, None, None);

    assert_eq!(Value::from(3_000_000_000u64).as_i32().ok(), None);
    assert_eq!(Value::from(-12).as_i32().ok(), Some(-12));
    assert_eq!(
        Value::from(true).as_str(),
        Err(Error::TypeConversion {
            from: Kind::Bool,
            to: "string"
        })
    );
    assert_eq!(
        Value::Null.as_f64().unwrap_err().to_string(),
        "cannot convert null value to f64"
    );
}

#[test]
fn display() {
    assert_eq!(Value::from(1.5).to_string(), "1.5");
    assert_eq!(Value::from(3).to_string(), "3");
    assert_eq!(Value::from("a\"b").to_string(), "a\"b");
    assert_eq!(Value::Null.to_string(), "null");
    assert_eq!(Value::from(vec![1, 2]).to_string(), "[array]");
    assert_eq!(Value::from(Object::new()).to_string(), "[object]");
}

#[test]
fn object_keeps_insertion_order() {
    let mut object = Object::new();
    object.set("b", 1);
    object.set("a", 2);
    object.set("c", 3);
    assert_eq!(object.set("a", 20), Some(Value::from(2)));
    assert_eq!(object.keys().collect::<Vec<_>>(), ["b", "a", "c"]);

    assert_eq!(object.delete("b"), Ok(Value::from(1)));
    assert_eq!(object.delete("b"), Err(Error::NotFound("b".into())));
    assert_eq!(object.keys().collect::<Vec<_>>(), ["a", "c"]);
    assert!(object.has("c"));
    assert!(!object.has("b"));
    assert_eq!(object.len(), 2);

    let collected: Object = [("x", 1), ("y", 2)].into_iter().collect();
    assert_eq!(collected.get("y"), Some(&Value::from(2)));
}

#[test]
fn array_operations() {
    let mut array: Array = [1, 2, 3].into_iter().collect();
    array.push("four");
    assert_eq!(array.len(), 4);

    assert_eq!(array.remove(1), Ok(Value::from(2)));
    assert_eq!(array.as_slice(), [Value::from(1), Value::from(3), Value::from("four")]);

    assert_eq!(array.set(0, false), Ok(Value::from(1)));
    assert_eq!(
        array.set(3, 1),
        Err(Error::IndexOutOfBounds { index: 3, len: 3 })
    );
    assert!(array.remove(3).is_err());
    assert_eq!(array.get(0), Some(&Value::Bool(false)));
    assert_eq!(array.get(3), None);
}

#[test]
fn children_and_reset() {
    let mut value = Value::from_str(r#"{"a": [1, [2]], "b": {"c": null}}"#).unwrap();
    assert_eq!(value.depth(), 3);
    assert_eq!(value.children().count(), 2);
    assert_eq!(Value::from(1).children().count(), 0);

    for child in value.children_mut() {
        child.reset();
    }
    assert_eq!(value, Value::from_str(r#"{"a": [], "b": {}}"#).unwrap());

    let mut s = Value::from("text");
    s.reset();
    assert_eq!(s, Value::from(""));
}

#[test]
fn parse() {
    let value = Value::from_str(r#"{"a": 1, "b": 2, "a": 3}"#).unwrap();
    // the last value wins, the first position is kept
    assert_eq!(
        serialize(&value, &SerializeOptions::default()).unwrap(),
        r#"{"a":3,"b":2}"#
    );

    assert!(matches!(Value::from_str("{"), Err(Error::Parse(_))));
    assert!(matches!(Value::from_str("[1] 2"), Err(Error::Parse(_))));
    assert!(matches!(Value::from_str(""), Err(Error::Parse(_))));

    assert!(parse_text(b"[[[1]]]", 3).is_ok());
    let err = parse_text(b"[[[1]]]", 2).unwrap_err();
    assert!(err.to_string().contains("maximum depth"), "{err}");
    assert!(parse_text(br#"{"a": {"b": 1}}"#, 1).is_err());
    assert!(parse_text(b"1", 0).is_ok());
}

#[test]
fn serialize_options() {
    let value = Value::from_str(r#"{"b": [1, 2.5], "a": {"z": 1, "y": 2}}"#).unwrap();

    assert_eq!(
        serialize(&value, &SerializeOptions::default()).unwrap(),
        r#"{"b":[1,2.5],"a":{"z":1,"y":2}}"#
    );

    let sorted = SerializeOptions {
        sort_keys: true,
        ..Default::default()
    };
    assert_eq!(
        serialize(&value, &sorted).unwrap(),
        r#"{"a":{"y":2,"z":1},"b":[1,2.5]}"#
    );

    let pretty = SerializeOptions::pretty("  ");
    assert_eq!(
        serialize(&value, &pretty).unwrap(),
        "{\n  \"b\": [\n    1,\n    2.5\n  ],\n  \"a\": {\n    \"z\": 1,\n    \"y\": 2\n  }\n}"
    );

    let shallow = SerializeOptions {
        max_depth: 1,
        ..Default::default()
    };
    let err = serialize(&value, &shallow).unwrap_err();
    assert_eq!(err, Error::MaxDepth(1));
    assert!(err.to_string().contains("maximum"));
}

#[test]
fn serialize_numbers_and_escapes() {
    let options = SerializeOptions::default();
    assert_eq!(serialize(&Value::from(1e3), &options).unwrap(), "1000");
    assert_eq!(serialize(&Value::from(-0.5), &options).unwrap(), "-0.5");
    assert_eq!(serialize(&Value::from(f64::NAN), &options).unwrap(), "null");
    assert_eq!(
        serialize(&Value::from(f64::INFINITY), &options).unwrap(),
        "null"
    );

    let value = Value::from("<a href=\"x\">&\u{2028}</a>");
    assert_eq!(
        serialize(&value, &options).unwrap(),
        "\"<a href=\\\"x\\\">&\u{2028}</a>\""
    );
    let escaped = SerializeOptions {
        html_escape: true,
        ..Default::default()
    };
    assert_eq!(
        serialize(&value, &escaped).unwrap(),
        r#""\u003ca href=\"x\"\u003e\u0026\u2028\u003c/a\u003e""#
    );
}

#[test]
fn typed_records() {
    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Book {
        title: String,
        price: f64,
        stock: u32,
        tags: Vec<String>,
    }

    let value =
        Value::from_str(r#"{"title": "Moby Dick", "price": 8.99, "stock": 3, "tags": ["sea"]}"#)
            .unwrap();
    let book: Book = value.deserialize_into().unwrap();
    assert_eq!(
        book,
        Book {
            title: "Moby Dick".into(),
            price: 8.99,
            stock: 3,
            tags: vec!["sea".into()],
        }
    );
    assert_eq!(Value::from_serialize(&book).unwrap(), value);

    let err = Value::from(1).deserialize_into::<Book>().unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
}

#[test]
fn serde_json_interop() {
    let json = serde_json::json!({"a": [1, 2.5, null], "b": {"c": true}});
    let value = Value::from(json.clone());
    assert_eq!(serde_json::Value::from(&value), json);
    assert_eq!(serde_json::to_value(&value).unwrap(), json);
    let back: Value = serde_json::from_value(json).unwrap();
    assert_eq!(back, value);
}

#[test]
fn pool() {
    let pool = ValuePool::new(1);

    let mut object = pool.get_object();
    assert!(object.is_empty());
    object.set("a", 1);
    pool.put_object(object);

    let mut other = Object::new();
    other.set("b", 2);
    pool.put_object(other);
    // the second object exceeds the capacity
    assert_eq!(pool.stats().idle_objects, 1);
    assert!(pool.get_object().is_empty());
    assert_eq!(pool.stats().idle_objects, 0);

    pool.put_value(Value::from(vec![1, 2, 3]));
    pool.put_value(Value::from("scalar"));
    assert_eq!(pool.stats().idle_arrays, 1);
    assert!(pool.get_array().is_empty());

    assert!(ValuePool::global().get_array().is_empty());
}
