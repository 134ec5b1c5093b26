use mesh_paths_core::{
    find_paths_between_nodes, scan_reachable, DirectedEdge, NetworkSnapshot, PathFindingOptions,
    PathStats, ZeroHopSet,
};
use std::collections::VecDeque;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Stop raising the hop budget once a single call takes longer than this.
const BUDGET_TIME_LIMIT: Duration = Duration::from_secs(2);

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    let mode = args.get(1).map(|s| s.as_str()).unwrap_or("all");

    if mode == "help" || mode == "--help" {
        println!("Usage: mesh-paths-bench [mode] [node_count]");
        println!("       mesh-paths-bench snapshot <file.json> <source> [target]");
        println!();
        println!("Modes:");
        println!("  all         Run all generators and benchmark each (default)");
        println!("  tree        Gateway-rooted branching tree (deep, sparse)");
        println!("  scalefree   Preferential attachment (hub-and-spoke)");
        println!("  smallworld  Watts-Strogatz ring lattice + shortcuts");
        println!("  random      Erdos-Renyi uniform random links");
        println!("  barbell     Two dense clusters joined by a relay chain");
        println!("  snapshot    Load a JSON network snapshot and query it");
        println!();
        println!("Default node_count: 2000");
        println!("Log filter: MESH_PATHS_LOG or RUST_LOG (default: warn)");
        return;
    }

    if mode == "snapshot" {
        run_snapshot(&args[2..]);
        return;
    }

    let node_count: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(2_000);

    println!("mesh-paths-bench");
    println!("================");
    println!();

    let generators: Vec<(&str, fn(u64) -> MeshGraph)> = match mode {
        "tree" => vec![("Gateway tree", gen_tree)],
        "scalefree" => vec![("Scale-free (preferential attachment)", gen_scale_free)],
        "smallworld" => vec![("Small-world (Watts-Strogatz)", gen_small_world)],
        "random" => vec![("Erdos-Renyi random", gen_random)],
        "barbell" => vec![("Barbell (cluster-relays-cluster)", gen_barbell)],
        "all" => vec![
            ("Gateway tree", gen_tree as fn(u64) -> MeshGraph),
            ("Scale-free (preferential attachment)", gen_scale_free),
            ("Small-world (Watts-Strogatz)", gen_small_world),
            ("Erdos-Renyi random", gen_random),
            ("Barbell (cluster-relays-cluster)", gen_barbell),
        ],
        _ => {
            eprintln!("Unknown mode: {}. Use --help for options.", mode);
            return;
        }
    };

    for (name, generator) in generators {
        run_benchmark(name, generator, node_count.max(20));
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("MESH_PATHS_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run_benchmark(name: &str, generator: fn(u64) -> MeshGraph, node_count: u64) {
    let _span = tracing::info_span!("benchmark", generator = name, node_count).entered();
    println!("--- {} ---", name);
    println!("Target: {} nodes", node_count);

    let t = Instant::now();
    let mesh = generator(node_count);
    let gen_time = t.elapsed();
    println!(
        "Generated in {:.2}s: {} directed links, {} zero-hop interfaces",
        gen_time.as_secs_f64(),
        mesh.edges.len(),
        mesh.zero_hop.len()
    );

    let source = node_id(0);
    let target = node_id(mesh.far_node);
    let zero_hop = Some(&mesh.zero_hop);

    println!();
    println!(
        "{:>6} {:>10} {:>10} {:>12} {:>10}",
        "hops", "nodes", "links", "paths", "time"
    );
    println!("{:->6} {:->10} {:->10} {:->12} {:->10}", "", "", "", "", "");

    for max_hops in 0..=8u32 {
        let t = Instant::now();
        let scan = scan_reachable(&source, &mesh.edges, max_hops, zero_hop);
        let elapsed = t.elapsed();
        println!(
            "{:>6} {:>10} {:>10} {:>12} {:>8.1}ms",
            max_hops,
            scan.nodes.len(),
            scan.links.len(),
            scan.paths_explored,
            elapsed.as_secs_f64() * 1000.0
        );
        if elapsed > BUDGET_TIME_LIMIT {
            println!("{:>6} (time limit reached)", "");
            break;
        }
    }

    println!();
    for max_hops in [2u32, 4, 6, 8] {
        let options = PathFindingOptions {
            max_hops,
            zero_hop_nodes: mesh.zero_hop.clone(),
            ..Default::default()
        };
        let t = Instant::now();
        let paths = find_paths_between_nodes(&source, &target, &mesh.edges, &options);
        let elapsed = t.elapsed();
        print_paths(&source, &target, max_hops, &paths, &options, elapsed);
        if elapsed > BUDGET_TIME_LIMIT {
            break;
        }
    }
    println!();
}

fn print_paths(
    source: &str,
    target: &str,
    max_hops: u32,
    paths: &[Vec<String>],
    options: &PathFindingOptions,
    elapsed: Duration,
) {
    match PathStats::from_paths(paths, options.zero_hop()) {
        Some(stats) => println!(
            "Paths {} → {} (max {} hops): {} found, hops {}..{} avg {:.1} in {:.1}ms",
            source,
            target,
            max_hops,
            paths.len(),
            stats.shortest,
            stats.longest,
            stats.average,
            elapsed.as_secs_f64() * 1000.0
        ),
        None => println!(
            "Paths {} → {} (max {} hops): none ({:.1}ms)",
            source,
            target,
            max_hops,
            elapsed.as_secs_f64() * 1000.0
        ),
    }
}

fn run_snapshot(args: &[String]) {
    let (Some(file), Some(source)) = (args.first(), args.get(1)) else {
        eprintln!("Usage: mesh-paths-bench snapshot <file.json> <source> [target]");
        return;
    };

    let loaded = NetworkSnapshot::from_path(Path::new(file)).and_then(|snapshot| {
        let edges = snapshot.edges()?;
        let options = snapshot.path_options()?;
        Ok((edges, options))
    });
    let (edges, options) = match loaded {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!(file = %file, error = %e, "failed to load snapshot");
            std::process::exit(1);
        }
    };

    println!(
        "Loaded {}: {} directed links, max_hops={}, max_paths={}",
        file,
        edges.len(),
        options.max_hops,
        options.max_paths
    );

    let t = Instant::now();
    let scan = scan_reachable(source, &edges, options.max_hops, options.zero_hop());
    println!(
        "Reachable from {}: {} nodes, {} links ({:.1}ms)",
        source,
        scan.nodes.len(),
        scan.links.len(),
        t.elapsed().as_secs_f64() * 1000.0
    );

    if let Some(target) = args.get(2) {
        let t = Instant::now();
        let paths = find_paths_between_nodes(source, target, &edges, &options);
        let elapsed = t.elapsed();
        print_paths(source, target, options.max_hops, &paths, &options, elapsed);
        for path in &paths {
            println!("  {}", path.join(" → "));
        }
    }
}

// ---------------------------------------------------------------------------
// Generators: all O(n) or O(n + links), single-threaded, deterministic
// ---------------------------------------------------------------------------

/// A generated mesh: directed links plus the interface nodes that do not
/// count as hops.
struct MeshGraph {
    edges: Vec<DirectedEdge>,
    zero_hop: ZeroHopSet,
    rng: FastRng,
    /// Node the path benchmarks target from node 0.
    far_node: u64,
}

impl MeshGraph {
    fn new(seed: u64, link_capacity: usize, far_node: u64) -> Self {
        Self {
            edges: Vec::with_capacity(link_capacity),
            zero_hop: ZeroHopSet::new(),
            rng: FastRng::new(seed),
            far_node,
        }
    }

    /// Radio link heard from `from` at `to`. Most links are heard both ways;
    /// the rest stay one-directional, like asymmetric RF paths in the field.
    fn link(&mut self, from: u64, to: u64) {
        if from == to {
            return;
        }
        self.edges.push(DirectedEdge::new(node_id(from), node_id(to)));
        if self.rng.next(10) < 7 {
            self.edges.push(DirectedEdge::new(node_id(to), node_id(from)));
        }
    }

    /// Put a bidirectional gateway interface on every `every`-th node, with
    /// an uplink to one other random node. Interfaces are zero-hop.
    fn attach_interfaces(mut self, node_count: u64, every: u64) -> Self {
        for n in (0..node_count).step_by(every as usize) {
            let iface = format!("iface_{}", n);
            let uplink = self.rng.next(node_count);
            self.edges.push(DirectedEdge::new(node_id(n), iface.clone()));
            self.edges.push(DirectedEdge::new(iface.clone(), node_id(n)));
            if uplink != n {
                self.edges.push(DirectedEdge::new(iface.clone(), node_id(uplink)));
            }
            self.zero_hop.insert(iface);
        }
        self
    }
}

fn node_id(n: u64) -> String {
    format!("!{:08x}", n)
}

/// Simple LCG for deterministic, fast pseudo-random numbers.
struct FastRng(u64);

impl FastRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next(&mut self, max: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 33) % max
    }
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Gateway tree: node 0 is the gateway, every node hears 3 children.
///
/// Deep paths with exponential width. Exercises long simple paths and the
/// hop budget cut-off.
fn gen_tree(node_count: u64) -> MeshGraph {
    let mut mesh = MeshGraph::new(42, (node_count * 2) as usize, node_count - 1);

    let branching = 3u64;
    let mut next_id: u64 = 1;
    let mut frontier: VecDeque<u64> = VecDeque::from([0]);

    while let Some(parent) = frontier.pop_front() {
        for _ in 0..branching {
            if next_id >= node_count {
                break;
            }
            mesh.link(parent, next_id);
            frontier.push_back(next_id);
            next_id += 1;
        }
        if next_id >= node_count {
            break;
        }
    }

    mesh.attach_interfaces(node_count, 100)
}

/// Scale-free via link-list sampling.
///
/// A new node attaches to endpoints of random existing links, so well
/// connected routers attract more neighbours.
fn gen_scale_free(node_count: u64) -> MeshGraph {
    let links_per_node = 3u64;
    let mut mesh = MeshGraph::new(
        12345,
        (node_count * links_per_node * 2) as usize,
        node_count - 1,
    );
    let mut endpoints: Vec<u64> = Vec::with_capacity((node_count * links_per_node * 2) as usize);

    let seed = 4u64;
    for i in 0..seed {
        for j in (i + 1)..seed {
            mesh.link(i, j);
            endpoints.push(i);
            endpoints.push(j);
        }
    }

    for new_node in seed..node_count {
        for _ in 0..links_per_node {
            let idx = mesh.rng.next(endpoints.len() as u64) as usize;
            let target = endpoints[idx];
            if target != new_node {
                mesh.link(new_node, target);
                endpoints.push(new_node);
                endpoints.push(target);
            }
        }
    }

    mesh.attach_interfaces(node_count, 50)
}

/// Small-world (Watts-Strogatz): ring lattice + random rewiring.
///
/// Neighbours along a ring hear each other; a few long links stand in for
/// hilltop repeaters.
fn gen_small_world(node_count: u64) -> MeshGraph {
    let k = 2u64;
    let p = 0.05f64;
    let mut mesh = MeshGraph::new(67890, (node_count * k * 2) as usize, node_count - 1);

    for i in 0..node_count {
        for j in 1..=k {
            let neighbor = (i + j) % node_count;
            if mesh.rng.next_f64() < p {
                let rewired = mesh.rng.next(node_count);
                mesh.link(i, if rewired != i { rewired } else { neighbor });
            } else {
                mesh.link(i, neighbor);
            }
        }
    }

    mesh.attach_interfaces(node_count, 50)
}

/// Erdos-Renyi: uniform random links, ~3 per node.
fn gen_random(node_count: u64) -> MeshGraph {
    let target_links = node_count * 3;
    let mut mesh = MeshGraph::new(54321, (target_links * 2) as usize, node_count - 1);

    for _ in 0..target_links {
        let from = mesh.rng.next(node_count);
        let to = mesh.rng.next(node_count);
        mesh.link(from, to);
    }

    mesh.attach_interfaces(node_count, 50)
}

/// Barbell: two dense clusters joined by a single chain of relays.
///
/// Every path between the clusters has to squeeze through the chain, so
/// the hop budget decides whether the far side is reachable at all.
fn gen_barbell(node_count: u64) -> MeshGraph {
    let bridge_len = 10u64;
    let cluster_size = (node_count - bridge_len) / 2;
    let per_node = 4u64.min(cluster_size - 1);
    let bridge_start = cluster_size;
    let b_start = bridge_start + bridge_len;
    // An odd remainder leaves one id unused, so the far end is cluster B's
    // last node rather than `node_count - 1`.
    let mut mesh = MeshGraph::new(
        99999,
        (cluster_size * per_node * 4 + bridge_len * 2) as usize,
        b_start + cluster_size - 1,
    );

    for i in 0..cluster_size {
        for _ in 0..per_node {
            let target = mesh.rng.next(cluster_size);
            mesh.link(i, target);
        }
    }

    // Relay chain from the last node of cluster A to the first of cluster B,
    // always heard both ways.
    for id in (bridge_start - 1)..b_start {
        mesh.edges.push(DirectedEdge::new(node_id(id), node_id(id + 1)));
        mesh.edges.push(DirectedEdge::new(node_id(id + 1), node_id(id)));
    }

    for i in 0..cluster_size {
        for _ in 0..per_node {
            let target = mesh.rng.next(cluster_size);
            mesh.link(b_start + i, b_start + target);
        }
    }

    mesh
}
