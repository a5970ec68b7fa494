use std::{
    io::Write,
    path::Path,
    process::{Command, Stdio},
};

use anyhow::Context;
use depscope_lib::graph::Graph;
use tracing::{info, warn};

use crate::config::{Config, ImageFormat};

pub const DOT_PROGRAM: &str = "dot";

#[derive(Debug)]
pub struct ImageOptions {
    /// Graphviz executable used for rendering.
    pub program: String,
    pub dark_mode: bool,
    pub no_open: bool,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            program: DOT_PROGRAM.to_string(),
            dark_mode: false,
            no_open: false,
        }
    }
}

impl From<&Config> for ImageOptions {
    fn from(value: &Config) -> Self {
        Self {
            dark_mode: value.dark_mode,
            no_open: value.no_open,
            ..Default::default()
        }
    }
}

/// Rasterises `dot_output` with the Graphviz executable into `output_filename`.
///
/// Returns `Ok(false)` without touching `output_filename` when the renderer is unavailable or
/// fails, so that the caller can fall back to the dot file alone.
pub fn output_image(
    dot_output: &str,
    graph: &Graph,
    output_filename: &Path,
    format: ImageFormat,
    image_options: &ImageOptions,
) -> anyhow::Result<bool> {
    let node_count_factor = (graph.node_count() as f32 / 32.0).floor();
    let node_font_size = node_count_factor * 2.0 + 12.0;
    let arrow_size = node_count_factor * 0.2 + 0.6;
    let format: &'static str = format.into();

    let mut command = Command::new(&image_options.program);
    command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .arg(format!("-T{format}"))
        .arg("-Grankdir=LR")
        .arg("-Gpad=0.5")
        .arg("-Nshape=box")
        .arg("-Nfontname=monospace")
        .arg(format!("-Nfontsize={node_font_size}"))
        .arg("-Efontname=monospace")
        .arg(format!("-Earrowsize={arrow_size}"));

    if image_options.dark_mode {
        command
            .arg("-Gbgcolor=#000000")
            .arg("-Ncolor=#FFFFFF")
            .arg("-Ecolor=#FFFFFF9F")
            .arg("-Efontcolor=#FFFFFFFF")
            .arg("-Nfontcolor=#FFFFFF");
    } else {
        command
            .arg("-Ncolor=#000000")
            .arg("-Nfontcolor=#000000")
            .arg("-Ecolor=#0000009F")
            .arg("-Efontcolor=#000000");
    }

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            warn!(
                "failed to execute {}, only the dot file is written: {e}",
                image_options.program
            );
            return Ok(false);
        }
    };

    let written = child
        .stdin
        .take()
        .context("failed to get stdin")?
        .write_all(dot_output.as_bytes());

    let output = child.wait_with_output().context("failed to wait on dot")?;
    if !output.status.success() {
        warn!(
            "{} exited with {}, only the dot file is written: {}",
            image_options.program,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
        return Ok(false);
    }
    if let Err(e) = written {
        warn!(
            "failed to write into {}, only the dot file is written: {e}",
            image_options.program
        );
        return Ok(false);
    }

    std::fs::write(output_filename, output.stdout).context("failed to write output image file")?;
    info!("wrote {}", output_filename.display());

    if !image_options.no_open {
        open::that_detached(output_filename).context("failed to open output image")?;
    }
    Ok(true)
}

pub fn write_dot(dot_output: &str, dot_filename: &Path) -> anyhow::Result<()> {
    std::fs::write(dot_filename, dot_output).context("failed to write output dot file")?;
    info!("wrote {}", dot_filename.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use depscope_lib::{graph::GraphBuilder, repo::FlatRepository};
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::missing_program("depscope-no-such-renderer")]
    #[case::failing_program("false")]
    fn renderer_failure_falls_back_to_dot(#[case] program: &str) {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("graph.png");
        let graph = GraphBuilder::new(2).build("A", None, &FlatRepository::parse("A: B\nB:"));
        let options = ImageOptions {
            program: program.to_string(),
            no_open: true,
            ..Default::default()
        };

        let rendered = output_image(
            "digraph { 0 -> 1 }",
            &graph,
            &output,
            ImageFormat::Png,
            &options,
        )
        .unwrap();

        assert!(!rendered);
        assert!(!output.exists());
    }

    #[test]
    fn defaults_to_graphviz() {
        assert_eq!(ImageOptions::default().program, DOT_PROGRAM);
    }

    #[test]
    fn writes_dot_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.gv");
        write_dot("digraph {}\n", &path).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "digraph {}\n");
    }
}
