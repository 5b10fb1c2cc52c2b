use dbdesk_sql::{QueryKind, classify, split_statements};

const SCRIPTS: &[&str] = &[
    "SELECT 1",
    "SELECT 1;",
    "CREATE TABLE t(x); INSERT INTO t VALUES (1); SELECT * FROM t;",
    "  ;; SELECT 1 ;\n\n; SELECT 2",
    "INSERT INTO notes(body) VALUES ('a;b'), ('c''d;'); SELECT count(*) FROM notes",
    "SELECT 1; -- trailing; comment\nSELECT 2; /* block; */ SELECT 3",
    "SELECT \"col;name\" FROM `tab;le`; DELETE FROM t",
    "SELECT 'unterminated; SELECT 2",
];

fn non_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn simple_semicolon_count(script: &str) -> usize {
    script
        .split(';')
        .filter(|segment| !segment.trim().is_empty())
        .count()
}

#[test]
fn statement_count_matches_semicolons_for_plain_scripts() {
    for script in [
        "SELECT 1",
        "SELECT 1;",
        "SELECT 1; SELECT 2",
        "SELECT 1; SELECT 2;",
        "a; ; b;;c",
    ] {
        assert_eq!(
            split_statements(script).len(),
            simple_semicolon_count(script),
            "script: {script:?}"
        );
    }
}

#[test]
fn rejoining_keeps_every_non_whitespace_character() {
    for script in SCRIPTS {
        let statements = split_statements(script);
        let rejoined: String = statements.iter().map(|s| format!("{s};")).collect();
        let expected = non_whitespace(script).replace(';', "");
        let actual = non_whitespace(&rejoined).replace(';', "");
        assert_eq!(actual, expected, "script: {script:?}");
    }
}

#[test]
fn statements_are_trimmed_and_non_empty() {
    for script in SCRIPTS {
        for statement in split_statements(script) {
            assert!(!statement.is_empty());
            assert_eq!(statement, statement.trim());
        }
    }
}

#[test]
fn mixed_script_classifies_in_order() {
    let kinds: Vec<QueryKind> =
        split_statements("CREATE TABLE t(x); INSERT INTO t VALUES (1); select * from t;")
            .iter()
            .map(|statement| classify(statement))
            .collect();
    assert_eq!(
        kinds,
        [
            QueryKind::NonReturning,
            QueryKind::NonReturning,
            QueryKind::Returning
        ]
    );
}
