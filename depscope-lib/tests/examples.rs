use depscope_lib::{
    coloring::NodeColoringGradient,
    dot::{DotOptions, output_dot},
    error::SourceError,
    graph::{Graph, GraphBuilder},
    index::PackageIndex,
    repo::FlatRepository,
    template::{Template, TemplateOptions},
    tree::output_tree,
};

fn build(repo: &str, max_depth: usize, filter: Option<&str>) -> Graph {
    GraphBuilder::new(max_depth)
        .filter(filter)
        .build("A", None, &FlatRepository::parse(repo))
}

#[test]
fn chain_with_shared_dependency() {
    let graph = build("A: B C\nB: C\nC:", 3, None);
    assert_eq!(
        graph.iter().collect::<Vec<_>>(),
        vec![("A", vec!["B", "C"]), ("B", vec!["C"]), ("C", vec![])]
    );
}

#[test]
fn two_package_cycle() {
    let graph = build("A: B\nB: A", 5, None);
    assert_eq!(
        graph.iter().collect::<Vec<_>>(),
        vec![("A", vec!["B"]), ("B", vec!["A"])]
    );
    assert_eq!(output_tree(&graph, "A"), "A\n└── B\n    └── A (cycle)\n");
}

#[test]
fn depth_one_expands_only_root() {
    let graph = build("A: B C\nB: C\nC:", 1, None);
    assert_eq!(
        graph.iter().collect::<Vec<_>>(),
        vec![("A", vec!["B", "C"])]
    );
}

#[test]
fn filter_forces_leaf() {
    let graph = build("A: libfoo B\nB:\nlibfoo: C\nC:", 3, Some("lib"));
    assert_eq!(
        graph.iter().collect::<Vec<_>>(),
        vec![("A", vec!["libfoo", "B"]), ("libfoo", vec![]), ("B", vec![])]
    );
}

#[test]
fn transitive_reverse_dependencies() {
    let graph = build("A: B\nB: C\nC:", 5, None);
    assert_eq!(graph.reverse_dependencies("C"), vec!["B", "A"]);
    assert!(graph.reverse_dependencies("A").is_empty());
}

#[test]
fn queries_on_cyclic_graph_are_total() {
    let graph = build("A: B\nB: C\nC: A B", 10, None);
    let options = TemplateOptions::default();
    let template = Template::new(&options).unwrap();
    let dot = output_dot(
        &graph,
        &DotOptions {
            inverse_gradient: true,
            dark_mode: true,
        },
        &template,
        &NodeColoringGradient::Viridis,
    );

    assert_eq!(dot.lines().filter(|l| l.contains(" -> ")).count(), 4);
    assert!(output_tree(&graph, "A").contains("(cycle)"));
    assert_eq!(graph.reverse_dependencies("A"), vec!["C", "B"]);
}

#[test]
fn index_backed_build_uses_root_version() {
    let index = PackageIndex::parse(concat!(
        "P:app\nV:1.0\nD:old\n\n",
        "P:app\nV:2.0\nD:lib\n\n",
        "P:lib\nV:0.1\nD:base\n\n",
        "P:lib\nV:0.2\nD:base extra\n\n",
        "P:base\nV:1\nD:\n",
    ))
    .unwrap();

    let graph = GraphBuilder::new(3).build("app", Some("1.0"), &index);
    assert_eq!(graph.dependencies("app"), Some(vec!["old"]));
    assert_eq!(graph.dependencies("old"), Some(vec![]));

    let graph = GraphBuilder::new(3).build("app", Some("2.0"), &index);
    assert_eq!(
        graph.iter().collect::<Vec<_>>(),
        vec![
            ("app", vec!["lib"]),
            ("lib", vec!["base", "extra"]),
            ("base", vec![]),
            ("extra", vec![]),
        ]
    );
}

#[test]
fn closure_source() {
    let source = |name: &str, _: Option<&str>| -> Result<Vec<String>, SourceError> {
        match name {
            "A" => Ok(vec!["B".to_string()]),
            _ => Err(SourceError::PackageNotFound(name.to_string())),
        }
    };
    let graph = GraphBuilder::new(2).build("A", None, &source);
    assert_eq!(
        graph.iter().collect::<Vec<_>>(),
        vec![("A", vec!["B"]), ("B", vec![])]
    );
}
