use petgraph::{
    dot::{Config, Dot},
    graph::NodeIndex,
    stable_graph::{EdgeReference, StableGraph},
    visit::EdgeRef,
};

use crate::{
    coloring::{Gradient, depth_ratio},
    graph::{Graph, NodeState, NodeWeight},
    template::Templating,
};

#[derive(Debug, Default)]
pub struct DotOptions {
    pub inverse_gradient: bool,
    pub dark_mode: bool,
}

/// Renders the graph as a DOT `digraph`, one edge statement per recorded dependency.
pub fn output_dot<R, G>(
    graph: &Graph,
    dot_options: &DotOptions,
    templating: &R,
    gradient: &G,
) -> String
where
    R: Templating,
    G: Gradient<Input = Option<f64>>,
{
    let max_depth = graph
        .inner
        .node_weights()
        .map(NodeWeight::depth)
        .max()
        .unwrap_or_default();

    let node_binding = |_, (_, n): (NodeIndex, &NodeWeight)| {
        let is_filtered = n.state() == NodeState::Filtered;
        let input = (!is_filtered)
            .then(|| depth_ratio(n.depth(), max_depth, dot_options.inverse_gradient));
        let color = gradient.color(input, dot_options.dark_mode);
        let color = format!("#{color:X}");
        let style = if is_filtered { "filled,dashed" } else { "filled" };

        let (label, tooltip) = templating.node(n);
        let (label, tooltip) = (escape(&label), escape(&tooltip));

        format!(r#"label = "{label}" tooltip = "{tooltip}" style = "{style}" fillcolor = "{color}""#)
    };

    let edge_binding = |g: &StableGraph<NodeWeight, ()>, e: EdgeReference<'_, ()>| {
        let source = &g[e.source()];
        let target = &g[e.target()];

        let (label, tooltip) = templating.edge(source, target);
        let (label, tooltip) = (escape(&label), escape(&tooltip));

        format!(r#"label = "{label}" edgetooltip = "{tooltip}" labeltooltip = "{tooltip}""#)
    };

    let dot = Dot::with_attr_getters(
        &graph.inner,
        &[Config::EdgeNoLabel, Config::NodeNoLabel],
        &edge_binding,
        &node_binding,
    );

    format!("{dot:?}")
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
