//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::NavigationService;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{AnnotationRect, NavTree, SiblingNavigator, TreeNode, TreeSortType};
use crate::infrastructure::di::ServiceContainer;
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Tree {
            file,
            sort,
            top_range,
        }) => cmd_tree(cli, file, *sort, *top_range),
        Some(Commands::Flatten { file, sort }) => cmd_flatten(cli, file, *sort),
        Some(Commands::Next { file, id, sort }) => cmd_next(cli, file, id, *sort),
        Some(Commands::Previous { file, id, sort }) => cmd_previous(cli, file, id, *sort),
        Some(Commands::Ranges { file, canvas_id }) => cmd_ranges(cli, file, canvas_id),
        Some(Commands::Rect { selector, chars }) => cmd_rect(selector, chars.as_deref()),
        Some(Commands::Config { command }) => cmd_config(command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "navtree", &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, run with --help for usage".to_string(),
        )),
    }
}

/// Loaded document plus the settings it was opened with.
struct Session {
    settings: Settings,
    service: NavigationService,
}

impl Session {
    fn open(cli: &Cli, file: &Path, top_range: Option<usize>) -> CliResult<Self> {
        let mut settings = Settings::load(file.parent())?;
        if cli.collection_index.is_some() {
            settings.collection_index = cli.collection_index;
        }
        if let Some(index) = cli.manifest_index {
            settings.manifest_index = index;
        }
        if let Some(index) = top_range {
            settings.top_range_index = index;
        }
        debug!("settings: {:?}", settings);

        let container = ServiceContainer::new(settings.clone());
        let service = container.open(file, container.bootstrap_options())?;
        Ok(Self { settings, service })
    }

    fn tree(&self, sort: Option<TreeSortType>) -> CliResult<NavTree> {
        let sort = resolve_sort(sort, &self.settings);
        let tree = self.service.get_tree(self.settings.top_range_index, sort)?;
        if sort == TreeSortType::Date && !self.service.tree_has_nav_dates(&tree) {
            output::warning("document has no navigation dates, showing native order");
        }
        Ok(tree)
    }
}

/// Command-line sort wins over the configured one.
fn resolve_sort(requested: Option<TreeSortType>, settings: &Settings) -> TreeSortType {
    requested.unwrap_or(settings.sort)
}

fn describe(node: &TreeNode) -> String {
    let kind = node
        .data
        .node_type
        .map(|t| t.to_string())
        .unwrap_or_else(|| "group".to_string());
    format!(
        "{}\t{}\t{}\t{}",
        node.id.as_deref().unwrap_or("-"),
        kind,
        node.label,
        node.data.canvases.iter().join(",")
    )
}

#[instrument(skip(cli))]
fn cmd_tree(
    cli: &Cli,
    file: &Path,
    sort: Option<TreeSortType>,
    top_range: Option<usize>,
) -> CliResult<()> {
    let session = Session::open(cli, file, top_range)?;
    let tree = session.tree(sort)?;
    output::info(&tree.to_tree_string());
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_flatten(cli: &Cli, file: &Path, sort: Option<TreeSortType>) -> CliResult<()> {
    let session = Session::open(cli, file, None)?;
    let tree = session.tree(sort)?;
    let flat = session.service.get_flattened_tree(&tree);
    for (position, idx) in flat.into_iter().enumerate() {
        if let Some(node) = tree.get_node(idx) {
            output::info(&format!("{position}\t{}", describe(node)));
        }
    }
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_next(cli: &Cli, file: &Path, id: &str, sort: Option<TreeSortType>) -> CliResult<()> {
    let session = Session::open(cli, file, None)?;
    let tree = session.tree(sort)?;
    match SiblingNavigator::new(&tree).next(id) {
        Some(node) => output::info(&describe(node)),
        None => output::warning(&format!("no node with canvases after {id}")),
    }
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_previous(cli: &Cli, file: &Path, id: &str, sort: Option<TreeSortType>) -> CliResult<()> {
    let session = Session::open(cli, file, None)?;
    let tree = session.tree(sort)?;
    match SiblingNavigator::new(&tree).previous(id) {
        Some(node) => output::info(&describe(node)),
        None => output::warning(&format!("no node before {id}")),
    }
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_ranges(cli: &Cli, file: &Path, canvas_id: &str) -> CliResult<()> {
    let session = Session::open(cli, file, None)?;
    let ranges = session.service.get_canvas_ranges(canvas_id)?;
    if ranges.is_empty() {
        output::warning(&format!("no range contains {canvas_id}"));
    }
    for range in ranges {
        output::info(&format!("{}\t{}", range.id, range.label));
    }
    Ok(())
}

#[instrument]
fn cmd_rect(selector: &str, chars: Option<&str>) -> CliResult<()> {
    let rect = AnnotationRect::parse(selector, chars)
        .ok_or_else(|| CliError::InvalidArgs(format!("no xywh region in {selector}")))?;
    output::info(&format!(
        "x={} y={} width={} height={}",
        rect.x, rect.y, rect.width, rect.height
    ));
    if let Some(chars) = &rect.chars {
        output::detail(chars);
    }
    Ok(())
}

fn cmd_config(command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show { dir } => {
            let settings = Settings::load(dir.as_deref())?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            output::header("Config files");
            match global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::warning("no config directory for this platform"),
            }
            output::action("local", &local_config_path(Path::new(".")).display());
        }
    }
    Ok(())
}
