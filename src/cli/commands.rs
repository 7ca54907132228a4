//! Command dispatch: build the structure from `--link` arguments and run one
//! subcommand against it. Output is returned as lines for the caller to print.

use std::collections::HashMap;

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::config::Settings;
use crate::domain::{Node, NodeId, Traversal, TraversalKind, Tree};

/// Tree built from command-line links.
///
/// Holds every mentioned node so that parents not reachable from the root
/// stay alive for the duration of a command.
#[derive(Debug)]
pub struct LinkedTree {
    pub tree: Tree,
    nodes: HashMap<String, Node>,
}

impl LinkedTree {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }
}

/// Create nodes on first mention and link them in argument order.
///
/// The root is `root` if given, else the parent of the first link. Without
/// either the tree stays empty.
#[instrument(level = "debug", skip(links))]
pub fn build_tree(links: &[(String, String)], root: Option<&str>) -> CliResult<LinkedTree> {
    let mut nodes: HashMap<String, Node> = HashMap::new();
    for (parent, child) in links {
        let parent = nodes
            .entry(parent.clone())
            .or_insert_with(|| Node::new(parent.as_str()))
            .clone();
        let child = nodes
            .entry(child.clone())
            .or_insert_with(|| Node::new(child.as_str()))
            .clone();
        parent.add_child(&child)?;
    }

    let mut tree = Tree::new();
    let root_id = root
        .map(str::to_string)
        .or_else(|| links.first().map(|(parent, _)| parent.clone()));
    if let Some(id) = root_id {
        let node = nodes
            .entry(id.clone())
            .or_insert_with(|| Node::new(id.as_str()))
            .clone();
        tree.set_root(node);
    }
    debug!("{} nodes, root {:?}", nodes.len(), tree.root().map(Node::id));

    Ok(LinkedTree { tree, nodes })
}

pub fn execute_command(cli: &Cli, settings: &Settings) -> CliResult<Vec<String>> {
    let traversal = cli.traversal.unwrap_or(settings.traversal);
    match &cli.command {
        Commands::Config { command } => _config(command, settings),
        Commands::Completion { shell } => Ok(_completion(*shell)),
        command => {
            let linked = build_tree(&cli.links, cli.root.as_deref())?;
            run_tree_command(command, &linked, traversal, settings)
        }
    }
}

#[instrument(level = "debug", skip(linked, settings))]
fn run_tree_command(
    command: &Commands,
    linked: &LinkedTree,
    traversal: TraversalKind,
    settings: &Settings,
) -> CliResult<Vec<String>> {
    let tree = &linked.tree;
    match command {
        Commands::Nodes => Ok(ids(tree.nodes_with(&traversal))),
        Commands::Size => Ok(vec![tree.size_with(&traversal).to_string()]),
        Commands::Height => Ok(vec![tree.height().to_string()]),
        Commands::Find { id } => {
            let node = find(tree, id, &traversal)?;
            Ok(vec![render_node(&node)])
        }
        Commands::Branch { id } => {
            let node = find(tree, id, &traversal)?;
            let mut branch = Vec::new();
            tree.branch(&mut branch, &node);
            Ok(ids(branch))
        }
        Commands::Add { id, parent } => {
            let node = linked
                .node(id)
                .cloned()
                .unwrap_or_else(|| Node::new(id.as_str()));
            tree.add_node_with(&node, parent.as_str(), &traversal)?;
            Ok(structure(tree))
        }
        Commands::Move {
            id,
            parent,
            keep_children,
        } => {
            let keep = *keep_children || settings.keep_children;
            tree.move_node_with(id.as_str(), parent.as_str(), keep, &traversal)?;
            Ok(structure(tree))
        }
        Commands::Remove { id, keep_children } => {
            let keep = *keep_children || settings.keep_children;
            let removed = tree.remove_node_with(id.as_str(), keep, &traversal)?;
            debug!("removed {}", removed);
            Ok(structure(tree))
        }
        Commands::Config { .. } | Commands::Completion { .. } => {
            unreachable!("handled before the tree is built")
        }
    }
}

fn find<T: Traversal + ?Sized>(tree: &Tree, id: &str, traversal: &T) -> CliResult<Node> {
    tree.find_node_with(id, traversal)
        .ok_or_else(|| CliError::UnknownNode(id.to_string()))
}

fn _config(command: &ConfigCommands, settings: &Settings) -> CliResult<Vec<String>> {
    let text = match command {
        ConfigCommands::Show => settings.to_toml()?,
        ConfigCommands::Template => Settings::template(),
    };
    Ok(text.lines().map(str::to_string).collect())
}

fn _completion(shell: clap_complete::Shell) -> Vec<String> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    let mut buf = Vec::new();
    generate(shell, &mut cmd, name, &mut buf);
    String::from_utf8_lossy(&buf)
        .lines()
        .map(str::to_string)
        .collect()
}

fn ids(nodes: Vec<Node>) -> Vec<String> {
    nodes.iter().map(|n| n.id().to_string()).collect()
}

/// `id: child1, child2`
pub fn render_node(node: &Node) -> String {
    let children = node.children().iter().map(|c| c.id()).join(", ");
    format!("{}: {}", node.id(), children)
}

/// One line per reachable node, breadth-first, each node once.
pub fn structure(tree: &Tree) -> Vec<String> {
    tree.nodes()
        .into_iter()
        .unique_by(|n: &Node| -> NodeId { n.id() })
        .map(|n| render_node(&n))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(p, c)| (p.to_string(), c.to_string()))
            .collect()
    }

    #[test]
    fn given_links_when_building_then_root_is_first_parent() {
        let linked = build_tree(&links(&[("root", "a"), ("a", "b")]), None).unwrap();

        assert_eq!(linked.tree.root().map(Node::id), Some("root".into()));
        assert_eq!(linked.tree.size(), 3);
        assert_eq!(structure(&linked.tree), vec!["root: a", "a: b", "b: "]);
    }

    #[test]
    fn given_no_links_and_no_root_when_building_then_tree_is_empty() {
        let linked = build_tree(&[], None).unwrap();
        assert!(linked.tree.root().is_none());
        assert!(structure(&linked.tree).is_empty());
    }

    #[test]
    fn given_unreachable_parent_when_building_then_it_stays_alive() {
        let linked = build_tree(&links(&[("root", "a"), ("x", "a")]), None).unwrap();

        let a = linked.node("a").unwrap();
        assert_eq!(a.parents().len(), 2);
        assert_eq!(linked.tree.size(), 2);
    }
}
