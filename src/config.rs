use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Args;

use depscope_lib::coloring::NodeColoringGradient;

pub const DEFAULT_MAX_DEPTH: usize = 3;
pub const DEFAULT_OUTPUT: &str = "graph.png";

#[cfg_attr(
    feature = "config",
    derive(serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
#[derive(Args, Debug, Default)]
pub struct Config {
    /// Package to inspect
    #[arg(short, long)]
    pub package: Option<String>,

    /// Repository URL serving APKINDEX.tar.gz
    #[arg(short = 'u', long, value_name = "URL")]
    pub repo_url: Option<String>,

    /// Flat test repository file of `name: dep dep` lines
    #[arg(short = 'r', long, value_name = "FILE")]
    pub repo_path: Option<PathBuf>,

    /// Version of the package to inspect
    ///  required with --repo-url, e.g. "1.36.1-r5"
    #[arg(short = 'P', long, value_name = "VERSION", verbatim_doc_comment)]
    pub pkg_version: Option<String>,

    /// Remove nodes that are more than max depth deep
    ///  default: 3
    #[arg(short = 'd', long, verbatim_doc_comment)]
    pub max_depth: Option<usize>,

    /// Do not explore packages whose name contains the substring, ignoring case
    #[arg(short, long, value_name = "SUBSTRING")]
    pub filter: Option<String>,

    /// Print the dependency graph as an ASCII tree
    #[arg(long)]
    #[cfg_attr(feature = "config", serde(default))]
    pub ascii: bool,

    /// Print the packages that depend on the target instead of the graph
    #[arg(long)]
    #[cfg_attr(feature = "config", serde(default))]
    pub reverse: bool,

    /// Target of --reverse, default is the inspected package
    #[arg(short, long, requires = "reverse")]
    pub target: Option<String>,

    /// Color gradient of nodes by depth
    ///  - "blues" (default), "greens", "oranges", "purples", "reds"
    ///  - "bu-pu", "or-rd", "pu-rd", "rd-pu"
    ///  - "viridis", "cividis", "plasma"
    #[arg(short, long, verbatim_doc_comment)]
    pub gradient: Option<NodeColoringGradient>,

    /// Inverse color gradient
    #[arg(long)]
    #[cfg_attr(feature = "config", serde(default))]
    pub inverse_gradient: bool,

    /// Dark mode for output image
    #[arg(long)]
    #[cfg_attr(feature = "config", serde(default))]
    pub dark_mode: bool,

    /// Custom node label formatting template
    ///  default: "{name}"
    #[arg(long, verbatim_doc_comment)]
    pub node_label_template: Option<String>,

    /// Custom node tooltip formatting template
    ///  default: "{name}\ndepth {depth}\n{state}"
    #[arg(long, verbatim_doc_comment)]
    pub node_tooltip_template: Option<String>,

    /// Custom edge label formatting template
    ///  default: ""
    #[arg(long, verbatim_doc_comment)]
    pub edge_label_template: Option<String>,

    /// Custom edge tooltip formatting template
    ///  default: "{source} -> {target}"
    #[arg(long, verbatim_doc_comment)]
    pub edge_tooltip_template: Option<String>,

    /// Dot output file only
    #[arg(long)]
    #[cfg_attr(feature = "config", serde(default))]
    pub dot_only: bool,

    /// Output image filename, one of *.png, *.jpg, *.svg
    ///  default: graph.png, the dot file is written next to it as *.gv
    #[arg(short, long, verbatim_doc_comment)]
    pub output: Option<PathBuf>,

    /// Do not open output image file
    #[arg(long)]
    #[cfg_attr(feature = "config", serde(default))]
    pub no_open: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpg,
    Svg,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Repository<'a> {
    Remote { url: &'a str, version: &'a str },
    Local(&'a Path),
}

impl Config {
    /// Fills options missing on the command line from `file`.
    #[cfg(feature = "config")]
    pub fn merge(self, file: Config) -> Config {
        Config {
            package: self.package.or(file.package),
            repo_url: self.repo_url.or(file.repo_url),
            repo_path: self.repo_path.or(file.repo_path),
            pkg_version: self.pkg_version.or(file.pkg_version),
            max_depth: self.max_depth.or(file.max_depth),
            filter: self.filter.or(file.filter),
            ascii: self.ascii || file.ascii,
            reverse: self.reverse || file.reverse,
            target: self.target.or(file.target),
            gradient: self.gradient.or(file.gradient),
            inverse_gradient: self.inverse_gradient || file.inverse_gradient,
            dark_mode: self.dark_mode || file.dark_mode,
            node_label_template: self.node_label_template.or(file.node_label_template),
            node_tooltip_template: self.node_tooltip_template.or(file.node_tooltip_template),
            edge_label_template: self.edge_label_template.or(file.edge_label_template),
            edge_tooltip_template: self.edge_tooltip_template.or(file.edge_tooltip_template),
            dot_only: self.dot_only || file.dot_only,
            output: self.output.or(file.output),
            no_open: self.no_open || file.no_open,
        }
    }

    /// Checks option combinations and returns the repository to read from.
    pub fn validate(&self) -> anyhow::Result<Repository<'_>> {
        if self.package().is_empty() {
            bail!("package name must not be empty");
        }

        let repository = match (&self.repo_url, &self.repo_path) {
            (Some(_), Some(_)) => bail!("specify either --repo-url or --repo-path, not both"),
            (None, None) => bail!("one of --repo-url or --repo-path is required"),
            (Some(url), None) => {
                let version = self
                    .pkg_version
                    .as_deref()
                    .context("--pkg-version is required with --repo-url")?;
                if version.split('.').count() < 2 {
                    bail!("version must be of the form X.Y or X.Y.Z, found {version:?}");
                }
                Repository::Remote { url, version }
            }
            (None, Some(path)) => {
                if !path.exists() {
                    bail!("repository file not found: {}", path.display());
                }
                Repository::Local(path)
            }
        };

        self.image_format()?;

        if self.max_depth() < 1 {
            bail!("max depth must be at least 1");
        }

        Ok(repository)
    }

    pub fn package(&self) -> &str {
        self.package.as_deref().map(str::trim).unwrap_or_default()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH)
    }

    pub fn output(&self) -> &Path {
        self.output
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_OUTPUT))
    }

    pub fn dot_output(&self) -> PathBuf {
        self.output().with_extension("gv")
    }

    pub fn image_format(&self) -> anyhow::Result<ImageFormat> {
        let output = self.output();
        output
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|e| e.to_ascii_lowercase().parse().ok())
            .with_context(|| {
                format!(
                    "output file must be one of *.png, *.jpg, *.svg, found {}",
                    output.display()
                )
            })
    }
}
