use jsonpath_dom::{query, CompiledPath, Object, Value};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Step {
    Name(String),
    Index(usize),
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        "[a-z][a-z0-9_]{0,7}".prop_map(Step::Name),
        (0usize..4).prop_map(Step::Index),
    ]
}

/// Paths start with a member name, since the root is an object.
fn path_strategy() -> impl Strategy<Value = String> {
    let first = "[a-z][a-z0-9_]{0,7}";
    (first, prop::collection::vec(step_strategy(), 0..5)).prop_map(|(first, steps)| {
        let mut path = format!("$.{first}");
        for step in steps {
            match step {
                Step::Name(name) => path.push_str(&format!(".{name}")),
                Step::Index(i) => path.push_str(&format!("[{i}]")),
            }
        }
        path
    })
}

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        (-1_000_000i64..1_000_000).prop_map(Value::from),
        "[ -~]{0,16}".prop_map(Value::from),
    ]
}

proptest! {
    #[test]
    fn set_then_get(path in path_strategy(), value in value_strategy()) {
        let mut root = Value::Object(Object::new());
        query::set(&mut root, &path, value.clone()).unwrap();
        prop_assert_eq!(query::get(&root, &path).unwrap(), &value);
    }

    #[test]
    fn set_then_delete(path in path_strategy(), value in value_strategy()) {
        let mut root = Value::Object(Object::new());
        query::set(&mut root, &path, value).unwrap();
        query::delete(&mut root, &path).unwrap();
        prop_assert!(!query::exists(&root, &path));
    }

    #[test]
    fn compile_never_panics(path in "\\PC{0,32}") {
        let _ = CompiledPath::compile(&path);
    }

    #[test]
    fn nested_conditions_are_bounded(depth in 0usize..400) {
        let path = format!("$[?({}@.a{})]", "(".repeat(depth), ")".repeat(depth));
        prop_assert_eq!(CompiledPath::compile(&path).is_ok(), depth <= 100);
    }

    #[test]
    fn failed_set_creates_nothing(path in path_strategy()) {
        let mut root = Value::Object(Object::new());
        let path = format!("{path}[*]");
        prop_assert!(query::set(&mut root, &path, 1).is_err());
        prop_assert_eq!(root, Value::Object(Object::new()));
    }
}
