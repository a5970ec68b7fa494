mod command;
mod config;
mod repository;

use cfg_if::cfg_if;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use depscope_lib::{
    dot::{DotOptions, output_dot},
    graph::{Graph, GraphBuilder},
    template::{Template, TemplateOptions},
    tree::output_tree,
};

use crate::{
    command::{ImageOptions, output_image, write_dot},
    config::{Config, Repository},
    repository::{fetch_package_index, read_flat_repository},
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: Config,

    /// TOML file of default options, overridden by the command line
    #[cfg(feature = "config")]
    #[arg(short, long = "config", value_name = "FILE")]
    config_file: Option<std::path::PathBuf>,

    /// Enable debug logging, overridden by RUST_LOG
    #[arg(short, long)]
    verbose: bool,
}

cfg_if! {
    if #[cfg(feature = "config")] {
        use anyhow::Context;

        fn load_config(cli: Cli) -> anyhow::Result<Config> {
            let Some(path) = cli.config_file else {
                return Ok(cli.config);
            };
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            let file: Config = toml::from_str(&text)
                .with_context(|| format!("failed to parse config file {}", path.display()))?;
            Ok(cli.config.merge(file))
        }
    } else {
        fn load_config(cli: Cli) -> anyhow::Result<Config> {
            Ok(cli.config)
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli)?;
    debug!("{config:?}");

    let repository = config.validate()?;
    let format = config.image_format()?;
    let package = config.package();

    let builder = GraphBuilder::new(config.max_depth()).filter(config.filter.as_deref());
    let graph = match repository {
        Repository::Remote { url, version } => {
            let index = fetch_package_index(url)?;
            builder.build(package, Some(version), &index)
        }
        Repository::Local(path) => {
            let repository = read_flat_repository(path)?;
            builder.build(package, config.pkg_version.as_deref(), &repository)
        }
    };

    if config.reverse {
        let target = config.target.as_deref().unwrap_or(package);
        println!("=== REVERSE DEPENDENCIES ===");
        print!("{}", output_reverse(&graph, target));
    } else {
        println!("=== DEPENDENCY GRAPH ===");
        if config.ascii {
            print!("{}", output_tree(&graph, package));
        } else {
            print!("{}", output_listing(&graph));
        }
    }

    let template_options = TemplateOptions {
        node_label_template: config.node_label_template.clone(),
        node_tooltip_template: config.node_tooltip_template.clone(),
        edge_label_template: config.edge_label_template.clone(),
        edge_tooltip_template: config.edge_tooltip_template.clone(),
    };
    let template = Template::new(&template_options)?;
    let dot_options = DotOptions {
        inverse_gradient: config.inverse_gradient,
        dark_mode: config.dark_mode,
    };
    let dot = output_dot(
        &graph,
        &dot_options,
        &template,
        &config.gradient.unwrap_or_default(),
    );

    let dot_output = config.dot_output();
    write_dot(&dot, &dot_output)?;
    if !config.dot_only {
        let rendered = output_image(
            &dot,
            &graph,
            config.output(),
            format,
            &ImageOptions::from(&config),
        )?;
        if !rendered {
            info!("no image rendered, use {} instead", dot_output.display());
        }
    }

    Ok(())
}

fn output_listing(graph: &Graph) -> String {
    graph
        .iter()
        .map(|(name, dependencies)| {
            if dependencies.is_empty() {
                format!("{name}: (none)\n")
            } else {
                format!("{name}: {}\n", dependencies.join(", "))
            }
        })
        .collect()
}

fn output_reverse(graph: &Graph, target: &str) -> String {
    let dependents = graph.reverse_dependencies(target);
    if dependents.is_empty() {
        return "(none)\n".to_string();
    }
    dependents.iter().map(|name| format!("{name}\n")).collect()
}
