use petgraph::graph::NodeIndex;

use crate::graph::Graph;

/// Renders the graph below `root` as an indented tree, one package per line.
///
/// A package that already appears on the path from `root` is marked with `(cycle)` and not
/// descended into. Packages reachable through several parents are printed under each of them.
pub fn output_tree(graph: &Graph, root: &str) -> String {
    let mut out = String::new();
    out.push_str(root);
    out.push('\n');

    if let Some(index) = graph.index(root) {
        let mut path = vec![index];
        output_children(graph, index, "", &mut path, &mut out);
    }

    out
}

fn output_children(
    graph: &Graph,
    node: NodeIndex,
    prefix: &str,
    path: &mut Vec<NodeIndex>,
    out: &mut String,
) {
    let children: Vec<_> = graph.children(node).collect();

    for (i, child) in children.iter().copied().enumerate() {
        let is_last = i + 1 == children.len();
        out.push_str(prefix);
        out.push_str(if is_last { "└── " } else { "├── " });
        out.push_str(graph.name(child));

        if path.contains(&child) {
            out.push_str(" (cycle)\n");
            continue;
        }
        out.push('\n');

        let prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        path.push(child);
        output_children(graph, child, &prefix, path, out);
        path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{graph::GraphBuilder, repo::FlatRepository};

    fn build(repo: &str, max_depth: usize, filter: Option<&str>) -> Graph {
        let repo = FlatRepository::parse(repo);
        GraphBuilder::new(max_depth)
            .filter(filter)
            .build("A", None, &repo)
    }

    #[test]
    fn nested_connectors() {
        let graph = build("A: B C\nB: D E\nC: F\nD:\nE:\nF:", 5, None);
        assert_eq!(
            output_tree(&graph, "A"),
            "A\n\
             ├── B\n\
             │   ├── D\n\
             │   └── E\n\
             └── C\n    \
                 └── F\n"
        );
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        let graph = build("A: B C\nB: D\nC: D\nD:", 5, None);
        let tree = output_tree(&graph, "A");
        assert!(!tree.contains("(cycle)"));
        assert_eq!(tree.matches("D\n").count(), 2);
    }

    #[test]
    fn cycle_is_marked_once_per_branch() {
        let graph = build("A: B C\nB: A\nC: B", 5, None);
        assert_eq!(
            output_tree(&graph, "A"),
            "A\n\
             ├── B\n\
             │   └── A (cycle)\n\
             └── C\n    \
                 └── B\n        \
                     └── A (cycle)\n"
        );
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let graph = build("A: A", 5, None);
        assert_eq!(output_tree(&graph, "A"), "A\n└── A (cycle)\n");
    }

    #[test]
    fn filtered_leaf_renders_the_same_under_each_parent() {
        let graph = build("A: B C\nB: libx\nC: libx\nlibx: D\nD:", 5, Some("lib"));
        assert_eq!(
            output_tree(&graph, "A"),
            "A\n\
             ├── B\n\
             │   └── libx\n\
             └── C\n    \
                 └── libx\n"
        );
    }

    #[test]
    fn unexpanded_dependencies_are_leaves() {
        let graph = build("A: B\nB: C\nC:", 1, None);
        assert_eq!(output_tree(&graph, "A"), "A\n└── B\n");
    }

    #[test]
    fn unknown_root_renders_alone() {
        let graph = build("A: B\nB:", 5, None);
        assert_eq!(output_tree(&graph, "Z"), "Z\n");
    }

    #[test]
    fn subtree_from_inner_node() {
        let graph = build("A: B\nB: C\nC: A", 5, None);
        assert_eq!(
            output_tree(&graph, "B"),
            "B\n\
             └── C\n    \
                 └── A\n        \
                     └── B (cycle)\n"
        );
    }
}
