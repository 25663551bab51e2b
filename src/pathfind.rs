//! Explain reachability through the area graph.
//!
//! Once the solver knows *that* a location is reachable, the pathfinder shows
//! *how*: a chain of named connections from the start area, following only
//! edges whose requirement bit is present in the reachability set. With
//! entrance randomization some exits lead wherever the player assigned them,
//! so those edges resolve their destination through a runtime mapping and are
//! simply not traversable while unassigned.

use crate::*;

use slab::Slab;
use std::collections::{HashMap, VecDeque};

pub type NodeId = usize;

/// Exit name to destination area, as assigned by the player
pub type ExitMappings = HashMap<String, String>;

/// Where a connection leads
#[derive(Clone, Debug)]
enum Target {
    /// A static destination of the graph
    Fixed(NodeId),
    /// A randomized exit, resolved through the current [ExitMappings]
    Exit(String),
}

#[derive(Clone, Debug)]
struct Connection {
    name: String,
    requirement: usize,
    target: Target,
}

/// The static graph of areas, locations and named connections.
///
/// Nodes are interned by name; each node owns its outgoing connections in
/// insertion order, which makes exploration fully deterministic. Every
/// connection carries the requirement bit that must be reachable for the
/// connection to be traversable.
#[derive(Clone, Debug)]
pub struct AreaGraph {
    names: Vec<String>,
    by_name: HashMap<String, NodeId>,
    connections: Vec<Vec<Connection>>,
    start: NodeId,
}

impl AreaGraph {
    /// Create a graph rooted at the given start area
    pub fn new(start: &str) -> Self {
        let mut graph = Self {
            names: Vec::new(),
            by_name: HashMap::new(),
            connections: Vec::new(),
            start: 0,
        };
        graph.start = graph.add_area(start);
        graph
    }

    /// Intern an area or location, returning its node
    pub fn add_area(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let id = self.names.len();
        self.names.push(name.to_string());
        self.by_name.insert(name.to_string(), id);
        self.connections.push(Vec::new());
        id
    }

    /// Add a connection with a static destination
    pub fn connect(&mut self, from: &str, to: &str, name: &str, requirement: usize) {
        let from = self.add_area(from);
        let to = self.add_area(to);
        self.connections[from].push(Connection {
            name: name.to_string(),
            requirement,
            target: Target::Fixed(to),
        });
    }

    /// Add a randomized exit; its destination comes from the exit mappings
    pub fn connect_exit(&mut self, from: &str, exit: &str, requirement: usize) {
        let from = self.add_area(from);
        self.connections[from].push(Connection {
            name: exit.to_string(),
            requirement,
            target: Target::Exit(exit.to_string()),
        });
    }

    pub fn start(&self) -> NodeId {
        self.start
    }

    pub fn node(&self, name: &str) -> Result<NodeId, TrackError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| TrackError::NoSuchArea(name.to_string()))
    }

    pub fn name(&self, node: NodeId) -> &str {
        &self.names[node]
    }

    pub fn num_nodes(&self) -> usize {
        self.names.len()
    }
}

/// A node of the exploration result.
///
/// Nodes live in an arena and reference their parent by arena index; the
/// chain is only ever walked root-ward, so no child lists are kept. Nodes
/// are never mutated after discovery.
#[derive(Clone, Debug)]
pub struct ExplorationNode {
    pub area: NodeId,
    pub edge: String,
    pub parent: Option<usize>,
}

/// The tree of first discoveries produced by [explore_area_graph]
#[derive(Clone, Debug, Default)]
pub struct ExplorationTree {
    nodes: Slab<ExplorationNode>,
    discovered: HashMap<NodeId, usize>,
}

impl ExplorationTree {
    /// The exploration node where the area was first discovered
    pub fn node(&self, area: NodeId) -> Option<&ExplorationNode> {
        self.discovered.get(&area).map(|&idx| &self.nodes[idx])
    }

    pub fn is_discovered(&self, area: NodeId) -> bool {
        self.discovered.contains_key(&area)
    }

    /// The ordered connection names from the start to the area.
    ///
    /// The parent chain is read node to root and reversed, producing the
    /// synthetic `"Start"` segment first. Returns None for undiscovered
    /// areas.
    pub fn path(&self, area: NodeId) -> Option<Vec<&str>> {
        let mut idx = *self.discovered.get(&area)?;
        let mut segments = Vec::new();
        loop {
            let node = &self.nodes[idx];
            segments.push(node.edge.as_str());
            match node.parent {
                Some(parent) => idx = parent,
                None => break,
            }
        }
        segments.reverse();
        Some(segments)
    }

    /// Iterate over discovered areas with their exploration nodes
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &ExplorationNode)> {
        self.discovered
            .iter()
            .map(move |(&area, &idx)| (area, &self.nodes[idx]))
    }
}

/// Breadth-first exploration of the area graph under a reachability set.
///
/// An edge is traversable iff its requirement bit is present in `reach`;
/// randomized exits additionally need an assignment in `exit_mappings`.
/// The first discovery of a destination wins and later routes to it are
/// ignored, so for fixed inputs the resulting paths are identical across
/// runs.
pub fn explore_area_graph(
    graph: &AreaGraph,
    exit_mappings: &ExitMappings,
    reach: &BitVector,
) -> ExplorationTree {
    let mut tree = ExplorationTree::default();
    let mut queue = VecDeque::new();

    let root = tree.nodes.insert(ExplorationNode {
        area: graph.start,
        edge: "Start".to_string(),
        parent: None,
    });
    tree.discovered.insert(graph.start, root);
    queue.push_back(root);

    while let Some(idx) = queue.pop_front() {
        let area = tree.nodes[idx].area;
        for conn in &graph.connections[area] {
            if !reach.test(conn.requirement) {
                continue;
            }
            let dest = match &conn.target {
                Target::Fixed(node) => *node,
                Target::Exit(exit) => match exit_mappings
                    .get(exit)
                    .and_then(|name| graph.by_name.get(name))
                {
                    Some(&node) => node,
                    None => continue,
                },
            };
            if tree.discovered.contains_key(&dest) {
                continue;
            }
            let child = tree.nodes.insert(ExplorationNode {
                area: dest,
                edge: conn.name.clone(),
                parent: Some(idx),
            });
            tree.discovered.insert(dest, child);
            queue.push_back(child);
        }
    }
    tree
}

#[cfg(test)]
mod tests {
    use crate::*;
    use std::iter::FromIterator;

    const FREE: usize = 0;
    const CLAWSHOTS: usize = 1;

    fn sample_graph() -> AreaGraph {
        let mut graph = AreaGraph::new("Skyloft");
        graph.connect("Skyloft", "Faron Woods", "Faron Pillar", FREE);
        graph.connect("Faron Woods", "Deep Woods", "Deep Woods Gate", FREE);
        graph.connect("Skyloft", "Lanayru Desert", "Lanayru Pillar", CLAWSHOTS);
        graph
    }

    #[test]
    fn paths_start_at_start() {
        let graph = sample_graph();
        let reach = BitVector::from_iter([FREE]);
        let tree = explore_area_graph(&graph, &ExitMappings::new(), &reach);

        let deep = graph.node("Deep Woods").unwrap();
        assert_eq!(
            tree.path(deep).unwrap(),
            vec!["Start", "Faron Pillar", "Deep Woods Gate"]
        );

        // the gated pillar is not traversable
        let desert = graph.node("Lanayru Desert").unwrap();
        assert!(tree.path(desert).is_none());
        assert!(!tree.is_discovered(desert));
    }

    #[test]
    fn requirement_bits_open_edges() {
        let graph = sample_graph();
        let reach = BitVector::from_iter([FREE, CLAWSHOTS]);
        let tree = explore_area_graph(&graph, &ExitMappings::new(), &reach);

        let desert = graph.node("Lanayru Desert").unwrap();
        assert_eq!(tree.path(desert).unwrap(), vec!["Start", "Lanayru Pillar"]);
    }

    #[test]
    fn exits_need_an_assignment() {
        let mut graph = sample_graph();
        graph.connect_exit("Deep Woods", "Deep Woods Cave Exit", FREE);
        graph.add_area("Eldin Volcano");
        let reach = BitVector::from_iter([FREE]);

        let unmapped = explore_area_graph(&graph, &ExitMappings::new(), &reach);
        let eldin = graph.node("Eldin Volcano").unwrap();
        assert!(!unmapped.is_discovered(eldin));

        let mut mappings = ExitMappings::new();
        mappings.insert("Deep Woods Cave Exit".to_string(), "Eldin Volcano".to_string());
        let mapped = explore_area_graph(&graph, &mappings, &reach);
        assert_eq!(
            mapped.path(eldin).unwrap(),
            vec![
                "Start",
                "Faron Pillar",
                "Deep Woods Gate",
                "Deep Woods Cave Exit"
            ]
        );
    }

    #[test]
    fn first_discovery_wins_and_is_deterministic() {
        let mut graph = AreaGraph::new("Start Area");
        graph.connect("Start Area", "Plaza", "North Door", FREE);
        graph.connect("Start Area", "Plaza", "South Door", FREE);
        graph.connect("Plaza", "Tower", "Stairs", FREE);
        let reach = BitVector::from_iter([FREE]);

        let tower = graph.node("Tower").unwrap();
        let first = explore_area_graph(&graph, &ExitMappings::new(), &reach);
        assert_eq!(
            first.path(tower).unwrap(),
            vec!["Start", "North Door", "Stairs"]
        );

        let second = explore_area_graph(&graph, &ExitMappings::new(), &reach);
        assert_eq!(first.path(tower), second.path(tower));
    }

    #[test]
    fn separate_queries_build_independent_nodes() {
        let graph = sample_graph();
        let reach = BitVector::from_iter([FREE]);
        let tree = explore_area_graph(&graph, &ExitMappings::new(), &reach);

        let woods = graph.node("Faron Woods").unwrap();
        let deep = graph.node("Deep Woods").unwrap();
        let woods_node = tree.node(woods).unwrap();
        let deep_node = tree.node(deep).unwrap();
        assert_eq!(deep_node.parent, Some(tree.discovered[&woods]));
        assert_eq!(woods_node.edge, "Faron Pillar");
    }

    #[test]
    fn unknown_area_lookup_fails() {
        let graph = sample_graph();
        assert!(matches!(
            graph.node("Temple of Time"),
            Err(TrackError::NoSuchArea(_))
        ));
    }
}
