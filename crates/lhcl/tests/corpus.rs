//! Corpus tests
//!
//! Loads each *.tf file in /tests/fixtures/ individually and checks that printing is stable:
//! the printed template parses into the same tree as the original and prints to the same text
//! again.

use pretty_assertions::assert_eq;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("LHCL_LOG"))
        .with_test_writer()
        .try_init();
}

fn read(path: &std::path::Path) -> String {
    lhcl::normalize_line_endings(&std::fs::read_to_string(path).unwrap())
}

#[test]
fn printing_is_stable() {
    init_tracing();

    insta::glob!("fixtures/*.tf", |path| {
        let original = lhcl::parse(&read(path)).unwrap();
        let printed = original.to_string();

        let reparsed = lhcl::parse(&printed)
            .unwrap_or_else(|e| panic!("{}: printed form does not parse: {e}", path.display()));

        assert_eq!(original, reparsed, "{}", path.display());
        assert_eq!(printed, reparsed.to_string(), "{}", path.display());
    });
}

#[test]
fn compact_printing_is_stable() {
    init_tracing();

    insta::glob!("fixtures/*.tf", |path| {
        let original = lhcl::parse(&read(path)).unwrap();
        let compact = original.render(false, lhcl::COMPACT);

        let reparsed = lhcl::parse(&compact)
            .unwrap_or_else(|e| panic!("{}: compact form does not parse: {e}", path.display()));
        assert_eq!(
            compact,
            reparsed.render(false, lhcl::COMPACT),
            "{}",
            path.display()
        );

        // line comments come back as /* */ comments, everything else is unchanged
        if !compact.contains("/*") {
            assert_eq!(original, reparsed, "{}", path.display());
        }
    });
}

#[test]
fn loading_the_fixture_directory() {
    init_tracing();

    let directory = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    let mut templates = lhcl::templates::Templates::default();
    templates.load_directory(&directory).unwrap();

    let names: Vec<_> = templates
        .documents()
        .filter_map(|(source, _)| source.as_ref())
        .filter_map(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect();

    assert_eq!(
        names,
        [
            "heredocs.tf",
            "locals.tf",
            "network.tf",
            "outputs.tf",
            "variables.tf"
        ]
    );
}

#[test]
fn tree_of_a_resource() {
    let document = lhcl::parse(&read(
        &std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/network.tf"),
    ))
    .unwrap();

    let mut blocks = vec![];
    lhcl::visit::VisitNodes::visit_nodes(&document, &mut |node: &lhcl::Node, depth: usize| {
        if node.kind() == lhcl::Kind::Block {
            blocks.push((depth, node.name().unwrap_or_default().to_string()));
        }
    });

    assert_eq!(
        blocks,
        [
            (1, "terraform".to_string()),
            (2, "required_providers".to_string()),
            (1, "provider".to_string()),
            (1, "resource".to_string()),
            (1, "resource".to_string()),
            (2, "ingress".to_string()),
            (3, "content".to_string()),
            (2, "lifecycle".to_string()),
            (1, "data".to_string()),
            (2, "filter".to_string()),
        ]
    );
}
