use serde::Serialize;
use tinytemplate::TinyTemplate;

use crate::{error::TemplateError, graph::NodeWeight};

/// Produces the `(label, tooltip)` pairs of nodes and edges in DOT output.
pub trait Templating {
    fn node(&self, node: &NodeWeight) -> (String, String);
    fn edge(&self, source: &NodeWeight, target: &NodeWeight) -> (String, String);
}

#[derive(Debug, Default)]
pub struct TemplateOptions {
    pub node_label_template: Option<String>,
    pub node_tooltip_template: Option<String>,
    pub edge_label_template: Option<String>,
    pub edge_tooltip_template: Option<String>,
}

/// [`Templating`] backed by `tinytemplate` templates.
///
/// Nodes expose `{name}`, `{depth}` and `{state}`; edges expose `{source}` and `{target}`.
pub struct Template<'a>(pub(crate) TinyTemplate<'a>);

impl<'a> Template<'a> {
    pub fn new(template_options: &'a TemplateOptions) -> Result<Self, TemplateError> {
        let mut template = TinyTemplate::new();
        template.set_default_formatter(&tinytemplate::format_unescaped);
        template.add_template(
            "node_label",
            template_options
                .node_label_template
                .as_deref()
                .unwrap_or("{name}"),
        )?;
        template.add_template(
            "node_tooltip",
            template_options
                .node_tooltip_template
                .as_deref()
                .unwrap_or("{name}\ndepth {depth}\n{state}"),
        )?;
        template.add_template(
            "edge_label",
            template_options
                .edge_label_template
                .as_deref()
                .unwrap_or(""),
        )?;
        template.add_template(
            "edge_tooltip",
            template_options
                .edge_tooltip_template
                .as_deref()
                .unwrap_or("{source} -> {target}"),
        )?;
        Ok(Template(template))
    }
}

impl Templating for Template<'_> {
    fn node(&self, node: &NodeWeight) -> (String, String) {
        #[derive(Serialize)]
        struct NodeContext<'a> {
            name: &'a str,
            depth: usize,
            state: &'static str,
        }

        let context = NodeContext {
            name: node.name(),
            depth: node.depth(),
            state: node.state().into(),
        };

        let label = self
            .0
            .render("node_label", &context)
            .unwrap_or_else(|e| e.to_string());
        let tooltip = self
            .0
            .render("node_tooltip", &context)
            .unwrap_or_else(|e| e.to_string());
        (label, tooltip)
    }

    fn edge(&self, source: &NodeWeight, target: &NodeWeight) -> (String, String) {
        #[derive(Serialize)]
        struct EdgeContext<'a> {
            source: &'a str,
            target: &'a str,
        }

        let context = EdgeContext {
            source: source.name(),
            target: target.name(),
        };

        let label = self
            .0
            .render("edge_label", &context)
            .unwrap_or_else(|e| e.to_string());
        let tooltip = self
            .0
            .render("edge_tooltip", &context)
            .unwrap_or_else(|e| e.to_string());
        (label, tooltip)
    }
}
