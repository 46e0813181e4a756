use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use tracing::info;

use crate::layout::ChartLayout;
use crate::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Write the image under the graph directory.
    Save,
    /// Write the image to a scratch file and open the system viewer.
    Show,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ImageFormat {
    Svg,
    Png,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg",
            ImageFormat::Png => "png",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputTarget {
    pub mode: OutputMode,
    pub graph_dir: PathBuf,
    pub run_name: String,
    pub format: ImageFormat,
    pub size: (u32, u32),
}

impl OutputTarget {
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.run_name, self.format.extension())
    }

    pub fn saved_path(&self) -> PathBuf {
        self.graph_dir.join(self.file_name())
    }
}

/// Renders `layout` to the target and returns the written file.
pub fn save_or_show(target: &OutputTarget, layout: &ChartLayout, caption: Option<&str>) -> Result<PathBuf> {
    match target.mode {
        OutputMode::Save => {
            fs::create_dir_all(&target.graph_dir)
                .with_context(|| format!("failed to create {}", target.graph_dir.display()))?;
            let path = target.saved_path();
            render::render_file(&path, target.format, target.size, layout, caption)?;
            info!(path = %path.display(), "chart saved");
            Ok(path)
        }
        OutputMode::Show => {
            let path = std::env::temp_dir().join(target.file_name());
            render::render_file(&path, target.format, target.size, layout, caption)?;
            open_viewer(&path)?;
            info!(path = %path.display(), "chart opened in viewer");
            Ok(path)
        }
    }
}

fn open_viewer(path: &Path) -> Result<()> {
    let mut cmd = viewer_command(path);
    cmd.spawn()
        .with_context(|| format!("failed to launch an image viewer for {}", path.display()))?;
    Ok(())
}

fn viewer_command(path: &Path) -> Command {
    if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(path);
        cmd
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]).arg(path);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(path);
        cmd
    }
}
