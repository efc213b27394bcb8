//! Printing a parsed program and parsing the output again must give the
//! same tree shape, and printing is idempotent.

use std::path::Path;

use coverilang_core::{parse_source, preorder_kinds, print_program, PrintOptions};

fn assert_round_trip(name: &str, src: &str) {
    let options = PrintOptions::default();
    let first = parse_source(src).unwrap_or_else(|e| panic!("{}: {}", name, e));
    let printed = print_program(&first, &options);
    let second = parse_source(&printed)
        .unwrap_or_else(|e| panic!("{}: reprint does not parse: {}\n{}", name, e, printed));
    assert_eq!(
        preorder_kinds(&first),
        preorder_kinds(&second),
        "{}: shape changed\n{}",
        name,
        printed
    );
    assert_eq!(print_program(&second, &options), printed, "{}: not idempotent", name);
}

#[test]
fn conformance_programs_round_trip() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../conformance/positive");
    let mut count = 0;
    for entry in std::fs::read_dir(&dir).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().is_some_and(|e| e == "cvt") {
            let src = std::fs::read_to_string(&path).unwrap();
            assert_round_trip(&path.display().to_string(), &src);
            count += 1;
        }
    }
    assert!(count > 0);
}

#[test]
fn tricky_groupings_round_trip() {
    for src in [
        "x = (a) AND b;",
        "x = ((a)) == b;",
        "x = NOT (a OR b) AND c;",
        "x = a AND NOT b OR c;",
        "x = ((SEQUENCE(a, b)));",
        "x = ActorFactory.create((a));",
        "x = ActorFactory.create(a);",
        "x = a; y = (b);",
        "print(Identity(REPEAT('i', (f()))));",
    ] {
        assert_round_trip(src, src);
    }
}
