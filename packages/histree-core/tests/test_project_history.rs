//! End-to-end revision matching tests
//!
//! Feeds multi-file revision sequences through the full pipeline and
//! checks the invariants that matter across stages:
//! - reformatting and comment edits never produce history entries
//! - identity survives modification and (by default) moves
//! - removal is terminal; re-introduction is a fresh identity
//! - output is a pure function of the revision sequence

use histree_core::{
    diff, parse_file, ChangeKind, EngineConfig, EntityHistory, ProjectHistory, QualifiedPath,
    Revision,
};
use pretty_assertions::assert_eq;

fn process(revisions: &[Revision]) -> ProjectHistory {
    histree_core::process_project(revisions, &EngineConfig::default())
}

fn changes(history: &EntityHistory) -> Vec<ChangeKind> {
    history.entries.iter().map(|e| e.change).collect()
}

#[test]
fn test_reformatting_produces_no_history() {
    let compact = "class Counter { /** Counts. */ void countTo(int target) { run(target); } }";
    let spread = concat!(
        "class Counter {\n",
        "    /**\n",
        "     * Counts.\n",
        "     */\n",
        "    void countTo(\n",
        "            int target\n",
        "    ) {\n",
        "        run(target);\n",
        "    }\n",
        "}\n",
    );
    let revisions = vec![
        Revision::new("r1").with_file("Counter.java", compact),
        Revision::new("r2").with_file("Counter.java", spread),
    ];
    let project = process(&revisions);
    let path = QualifiedPath::file("Counter.java")
        .container("Counter")
        .member("countTo(int)");
    let history = project.store.history_at(&path).unwrap();
    assert_eq!(changes(history), vec![ChangeKind::Added]);
}

#[test]
fn test_doc_edit_produces_no_history() {
    let revisions = vec![
        Revision::new("r1").with_file("A.java", "class A { /** Old text. */ void f() {} }"),
        Revision::new("r2").with_file("A.java", "class A { /** New text. */ void f() {} }"),
    ];
    let project = process(&revisions);
    let path = QualifiedPath::file("A.java").container("A").member("f()");
    assert_eq!(
        changes(project.store.history_at(&path).unwrap()),
        vec![ChangeKind::Added]
    );
}

#[test]
fn test_lifecycle_add_modify_remove_readd() {
    let revisions = vec![
        Revision::new("r1").with_file("A.java", "class A { int f() { return 1; } }"),
        Revision::new("r2").with_file("A.java", "class A { int f() { return 2; } }"),
        Revision::new("r3").with_file("A.java", "class A { }"),
        Revision::new("r4").with_file("A.java", "class A { int f() { return 9; } }"),
    ];
    let project = process(&revisions);
    let path = QualifiedPath::file("A.java").container("A").member("f()");

    let live = project.store.history_at(&path).unwrap();
    assert_eq!(changes(live), vec![ChangeKind::Added]);

    let dead = project
        .store
        .iter()
        .find(|h| h.path == path && h.terminal)
        .unwrap();
    assert_ne!(dead.id, live.id);
    assert_eq!(
        changes(dead),
        vec![ChangeKind::Added, ChangeKind::Modified, ChangeKind::Removed]
    );
    let revisions_seen: Vec<&str> = dead.revisions().map(|r| r.as_str()).collect();
    assert_eq!(revisions_seen, vec!["r1", "r2", "r3"]);
}

#[test]
fn test_moved_method_keeps_identity() {
    let revisions = vec![
        Revision::new("r1").with_file(
            "A.java",
            "class A { static class Inner {} int f() { return 1; } }",
        ),
        Revision::new("r2").with_file(
            "A.java",
            "class A { static class Inner { int f() { return 1; } } }",
        ),
    ];
    let project = process(&revisions);

    let from = QualifiedPath::file("A.java").container("A").member("f()");
    let to = QualifiedPath::file("A.java")
        .container("A")
        .container("Inner")
        .member("f()");
    assert_eq!(project.store.live_at(&from), None);

    let history = project.store.history_at(&to).unwrap();
    assert_eq!(changes(history), vec![ChangeKind::Added, ChangeKind::Moved]);
    assert_eq!(history.entries[0].path, from);
    assert_eq!(history.entries[1].path, to);
}

#[test]
fn test_renamed_method_keeps_identity_until_removal() {
    let revisions = vec![
        Revision::new("r1").with_file("A.java", "class A { int getCount() { return 0; } }"),
        Revision::new("r2").with_file("A.java", "class A { int getCounts() { return 0; } }"),
        Revision::new("r3").with_file("A.java", "class A {}"),
    ];
    let project = process(&revisions);

    let from = QualifiedPath::file("A.java").container("A").member("getCount()");
    let to = QualifiedPath::file("A.java").container("A").member("getCounts()");
    assert_eq!(project.store.live_at(&from), None);
    assert_eq!(project.store.live_at(&to), None);

    let history = project.store.iter().find(|h| h.path == to).unwrap();
    assert_eq!(
        changes(history),
        vec![ChangeKind::Added, ChangeKind::Modified, ChangeKind::Removed]
    );
    assert!(history.terminal);
    assert_eq!(history.entries[0].path, from);
    assert_eq!(history.entries[1].path, to);
}

#[test]
fn test_moved_class_with_member_change_keeps_survivors() {
    let revisions = vec![
        Revision::new("r1").with_file(
            "A.java",
            "class Outer {} class B { void keep() {} void drop() {} }",
        ),
        Revision::new("r2").with_file(
            "A.java",
            "class Outer { class B { void keep() {} } }",
        ),
    ];
    let project = process(&revisions);

    let moved_class = QualifiedPath::file("A.java").container("Outer").container("B");
    let class_history = project.store.history_at(&moved_class).unwrap();
    assert_eq!(
        changes(class_history),
        vec![ChangeKind::Added, ChangeKind::Moved]
    );

    let kept = QualifiedPath::file("A.java")
        .container("Outer")
        .container("B")
        .member("keep()");
    let kept_history = project.store.history_at(&kept).unwrap();
    assert_eq!(changes(kept_history), vec![ChangeKind::Added]);
    assert_eq!(
        kept_history.entries[0].path,
        QualifiedPath::file("A.java").container("B").member("keep()")
    );

    let dropped = QualifiedPath::file("A.java")
        .container("Outer")
        .container("B")
        .member("drop()");
    assert_eq!(project.store.live_at(&dropped), None);
    let dropped_history = project.store.iter().find(|h| h.path == dropped).unwrap();
    assert_eq!(
        changes(dropped_history),
        vec![ChangeKind::Added, ChangeKind::Removed]
    );
}

#[test]
fn test_file_level_add_and_remove() {
    let revisions = vec![
        Revision::new("r1")
            .with_file("A.java", "class A { void f() {} }")
            .with_file("B.java", "class B { void g() {} }"),
        Revision::new("r2").with_file("A.java", "class A { void f() {} }"),
    ];
    let project = process(&revisions);

    let f = QualifiedPath::file("A.java").container("A").member("f()");
    assert!(project.store.history_at(&f).is_some());

    let g = QualifiedPath::file("B.java").container("B").member("g()");
    assert_eq!(project.store.live_at(&g), None);
    let removed = project.store.iter().find(|h| h.path == g).unwrap();
    assert_eq!(changes(removed), vec![ChangeKind::Added, ChangeKind::Removed]);
}

#[test]
fn test_enum_constant_gaining_body_adds_anonymous_subtree() {
    let revisions = vec![
        Revision::new("r1").with_file(
            "Color.java",
            "enum Color { RED, GREEN; public int luminance() { return 0; } }",
        ),
        Revision::new("r2").with_file(
            "Color.java",
            "enum Color { RED { public int luminance() { return 54; } }, GREEN; public int luminance() { return 0; } }",
        ),
    ];
    let project = process(&revisions);

    let red = QualifiedPath::file("Color.java")
        .container("Color")
        .member("RED");
    assert_eq!(
        changes(project.store.history_at(&red).unwrap()),
        vec![ChangeKind::Added]
    );

    let anon_method = red.container("<anon>").member("luminance()");
    let history = project.store.history_at(&anon_method).unwrap();
    assert_eq!(changes(history), vec![ChangeKind::Added]);
    let first_seen: Vec<&str> = history.revisions().map(|r| r.as_str()).collect();
    assert_eq!(first_seen, vec!["r2"]);
}

#[test]
fn test_histories_are_pure_functions_of_input() {
    let revisions = vec![
        Revision::new("r1")
            .with_file("A.java", "class A { void f() {} int x; }")
            .with_file("B.java", "class B {}"),
        Revision::new("r2")
            .with_file("A.java", "class A { void f() { body(); } int x; int y; }")
            .with_file("B.java", "class B { void g() {} }"),
        Revision::new("r3").with_file("B.java", "class B { void g() { body(); } }"),
    ];
    let first = process(&revisions);
    let second = process(&revisions);

    let snapshot = |project: &ProjectHistory| -> Vec<(u64, String, Vec<ChangeKind>)> {
        project
            .store
            .iter()
            .map(|h| (h.id.0, h.path.to_string(), changes(h)))
            .collect()
    };
    assert_eq!(snapshot(&first), snapshot(&second));
}

#[test]
fn test_diff_of_independently_parsed_equal_sources_is_empty() {
    let compact = parse_file("A.java", "class A { int f(int a, int b) { return a + b; } }")
        .unwrap()
        .root;
    let spread = parse_file(
        "A.java",
        "class A {\n  int f(\n    int a,\n    int b\n  ) { return a + b; }\n}",
    )
    .unwrap()
    .root;
    assert!(diff(&compact, &spread, &EngineConfig::default()).is_empty());
}
