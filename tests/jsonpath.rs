use std::str::FromStr;

use jsonpath_dom::{CompiledPath, Error, Segment, Value};

#[test]
fn parse() {
    #[track_caller]
    fn test(s: &str) {
        CompiledPath::from_str(s).unwrap();
    }
    #[track_caller]
    fn test1(s: &str, display: &str) {
        let path = CompiledPath::from_str(s).unwrap();
        assert_eq!(path.to_string(), display);
        // the display form compiles back to the same segments
        let reparsed = CompiledPath::from_str(display).unwrap();
        assert_eq!(reparsed.segments(), path.segments());
    }
    #[track_caller]
    fn test_err(s: &str) {
        CompiledPath::from_str(s).unwrap_err();
    }

    test1("", "$");
    test1("$", "$");
    test1("$.a", "$.a");
    test1("$.a.b", "$.a.b");
    test1("$['a']", "$.a");
    test1(r#"$["a b"]"#, "$['a b']");
    test1(r#"$['it\'s']"#, r#"$['it\'s']"#);
    test1("$.first-name", "$.first-name");
    test1("$.a[0][-1]", "$.a[0][-1]");
    test1("$[ 1 ]", "$[1]");
    test1("$.*", "$[*]");
    test1("$.a.*.b", "$.a[*].b");
    test1("$[*][0]", "$[*][0]");
    test1("$..a", "$..a");
    test1("$..*", "$..[*]");
    test1("$..[0]", "$..[0]");
    test1("$..['a b']", "$..['a b']");
    test1("$.store..price", "$.store..price");

    test1("$.book[?(@.price < 10)]", "$.book[?(@.price < 10)]");
    test1("$.book[?(@.isbn)]", "$.book[?(@.isbn)]");
    test1("$.book[?(@.a.b>=2)]", "$.book[?(@.a.b >= 2)]");
    test1("$[?(@ == true)]", "$[?(@ == true)]");
    test1("$[?(@.n >= -1.5)]", "$[?(@.n >= -1.5)]");
    test1(r#"$[?(@.s == "it's")]"#, r#"$[?(@.s == 'it\'s')]"#);
    test1(
        "$[?(@.a=='x'||@.b!=null)]",
        "$[?((@.a == 'x' || @.b != null))]",
    );
    test1("$[?(@.a && @.b || @.c)]", "$[?(((@.a && @.b) || @.c))]");
    test1("$[?(@.a || @.b && @.c)]", "$[?((@.a || (@.b && @.c)))]");
    test1("$[?(@.a && (@.b || @.c))]", "$[?((@.a && (@.b || @.c)))]");
    test1("$[?( @.a <= 1 )].b", "$[?(@.a <= 1)].b");

    test(r#"$["A\n"]"#);
    test("$.a[?(@.b > 1e3)]");
    test("$..book[-1]");

    test_err("a");
    test_err(".a");
    test_err("$.");
    test_err("$..");
    test_err("$[");
    test_err("$[0");
    test_err("$[abc]");
    test_err("$[1.5]");
    test_err("$['a]");
    test_err(r#"$['\q']"#);
    test_err("$.a b");
    test_err("$[?(@.a <)]");
    test_err("$[?(@.a == 1]");
    test_err("$[?(@.a == 1 &&)]");
    test_err("$[?(a == 1)]");
    test_err("$[?@.a]");
}

#[test]
fn segments() {
    #[track_caller]
    fn test(s: &str, expected: &[Segment]) {
        let path = CompiledPath::from_str(s).unwrap();
        assert_eq!(path.segments(), expected);
    }

    test("$", &[]);
    test("", &[]);
    test(
        "$.a[2][-1]",
        &[
            Segment::Property("a".into()),
            Segment::Index(2),
            Segment::Index(-1),
        ],
    );
    test(
        "$..name",
        &[Segment::RecursiveDescent, Segment::Property("name".into())],
    );
    test("$.*[*]", &[Segment::Wildcard, Segment::Wildcard]);
    test("$['0']", &[Segment::Property("0".into())]);
}

#[test]
fn parse_error() {
    #[track_caller]
    fn test(s: &str, position: usize, token: &str, display: &str) {
        let err = CompiledPath::from_str(s).unwrap_err();
        assert_eq!(err.position(), position);
        assert_eq!(err.token(), token);
        assert_eq!(err.to_string(), display);
    }

    test(
        "foo",
        0,
        "foo",
        "at position 0, unexpected 'foo': path must start with '$'",
    );
    test(
        "$.",
        2,
        "",
        "at position 2, unexpected end of input: expected member name or '*' after '.'",
    );
    test(
        "$[abc]",
        2,
        "abc",
        "at position 2, unexpected 'abc': array index must be an integer or a quoted name",
    );
    test(
        "$[0",
        3,
        "",
        "at position 3, unexpected end of input: unterminated bracket, expected ']'",
    );
    test(
        "$.a b",
        3,
        " ",
        "at position 3, unexpected ' ': unexpected trailing characters",
    );
    test(
        "$[?(@.price < )]",
        14,
        ")",
        "at position 14, unexpected ')': expected a literal: string, number, true, false or null",
    );
}

#[test]
fn nested_conditions() {
    let nest = |depth: usize| {
        format!(
            "$[?({}@.a == 1{})]",
            "(".repeat(depth),
            ")".repeat(depth)
        )
    };

    CompiledPath::from_str(&nest(100)).unwrap();

    let err = CompiledPath::from_str(&nest(101)).unwrap_err();
    assert_eq!(err.position(), 104);
    assert_eq!(err.token(), "(");
    assert_eq!(err.message(), "condition nested too deeply");

    let err = CompiledPath::from_str(&nest(100_000)).unwrap_err();
    assert_eq!(err.message(), "condition nested too deeply");

    // every operand of a chain adds a level
    let chain = vec!["@.a == 1"; 200].join(" && ");
    let err = CompiledPath::from_str(&format!("$[?({chain})]")).unwrap_err();
    assert_eq!(err.message(), "condition nested too deeply");

    let chain = vec!["@.a"; 100].join(" || ");
    CompiledPath::from_str(&format!("$[?({chain})]")).unwrap();
}

#[test]
fn root_path() {
    let doc = Value::from_str(r#"{"a": 1}"#).unwrap();
    let path = CompiledPath::from_str("").unwrap();
    assert_eq!(path.path(), "");
    assert!(path.is_root());
    assert_eq!(path.query(&doc), vec![&doc]);
    assert!(path.exists(&doc));

    let mut doc = doc;
    assert_eq!(path.set(&mut doc, 1), Err(Error::RootMutation));
    assert_eq!(path.delete(&mut doc), Err(Error::RootMutation));
}
