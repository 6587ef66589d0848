// Parser Property Tests
//
// Invariants of the declaration parser:
// 1. Never panics and always succeeds, whatever the input
// 2. Deterministic
// 3. Generated declarations are all found, in order, at the right positions
// 4. Concatenating files concatenates their statements

use proptest::prelude::*;
use elmdef::line_index::LineIndex;
use elmdef::{parse, Statement};

fn arb_upper() -> impl Strategy<Value = String> {
    "[A-Z][a-zA-Z0-9_]{0,8}"
}

fn arb_lower() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9_]{0,8}".prop_filter("keyword", |s| !elmdef::lexer::is_keyword(s))
}

fn arb_union() -> impl Strategy<Value = (String, String)> {
    (arb_upper(), prop::collection::vec(arb_upper(), 1..5)).prop_map(|(name, ctors)| {
        let text = format!("type {name}\n    = {}\n", ctors.join("\n    | "));
        (name, text)
    })
}

fn arb_alias() -> impl Strategy<Value = (String, String)> {
    (arb_upper(), prop::collection::vec((arb_lower(), arb_upper()), 1..4)).prop_map(|(name, fields)| {
        let fields: Vec<String> = fields.iter().map(|(f, t)| format!("{f} : {t}")).collect();
        let text = format!("type alias {name} =\n    {{ {}\n    }}\n", fields.join("\n    , "));
        (name, text)
    })
}

fn arb_noise() -> impl Strategy<Value = (String, String)> {
    prop_oneof![
        arb_lower().prop_map(|f| format!("{f} : Int\n{f} =\n    42\n")),
        Just("-- comment\n".to_string()),
        Just("{- block\ntype Hidden = Hidden\n-}\n".to_string()),
        Just("import Html exposing (..)\n".to_string()),
    ]
    .prop_map(|text| (String::new(), text))
}

/// A file made of declarations and noise; returns the declared names in order.
fn arb_file() -> impl Strategy<Value = (Vec<String>, String)> {
    prop::collection::vec(prop_oneof![arb_union(), arb_alias(), arb_noise()], 0..8).prop_map(|parts| {
        let names = parts.iter().filter(|(n, _)| !n.is_empty()).map(|(n, _)| n.clone()).collect();
        let text = parts.iter().map(|(_, t)| t.as_str()).collect::<Vec<_>>().join("\n");
        (names, text)
    })
}

fn declared(source: &str) -> Vec<String> {
    parse(source)
        .statements()
        .iter()
        .filter_map(Statement::declared_type)
        .map(str::to_string)
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn parse_never_fails(source in "\\PC{0,400}") {
        prop_assert!(parse(&source).succeeded());
    }

    #[test]
    fn parse_is_deterministic(source in "\\PC{0,400}") {
        prop_assert_eq!(parse(&source), parse(&source));
    }

    #[test]
    fn generated_declarations_are_found((names, source) in arb_file()) {
        prop_assert_eq!(declared(&source), names);
    }

    #[test]
    fn positions_point_at_declarations((_names, source) in arb_file()) {
        let index = LineIndex::new(&source);
        for stmt in parse(&source).statements() {
            let pos = stmt.position();
            prop_assert!(source.is_char_boundary(pos.offset));
            prop_assert_eq!(index.position(pos.offset), pos);
            let rest = &source[pos.offset..];
            prop_assert!(rest.starts_with("type") || rest.starts_with("import") || rest.starts_with("module"));
        }
    }

    #[test]
    fn concatenation_unions_statements((_a, first) in arb_file(), (_b, second) in arb_file()) {
        let render = |src: &str| -> Vec<String> {
            parse(src).statements().iter().map(|s| s.to_string()).collect()
        };
        let mut expected = render(&first);
        expected.extend(render(&second));
        prop_assert_eq!(render(&format!("{first}\n{second}")), expected);
    }
}
