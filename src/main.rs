use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::PathBuf;

// 导入库模块
use pathviz::config::Config;
use pathviz::graph::{builders, graph_from_json, graph_to_json, parse_edge_list, BuilderKind, Graph, NodeId};
use pathviz::services::algorithm::{Algorithm, HeuristicKind, RunOptions};
use pathviz::services::{compare, BatchRunner};
use pathviz::utils::logging;

#[derive(Parser)]
#[command(name = "pathviz", version, author = "PathViz Contributors")]
#[command(about = "Step-by-step shortest-path algorithm engine")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level specification, overrides the configuration
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct GraphArgs {
    /// Graph in JSON transport format
    #[arg(long, conflicts_with = "edges")]
    graph: Option<PathBuf>,

    /// Graph as an edge list, one `u v [w]` per line
    #[arg(long)]
    edges: Option<PathBuf>,

    /// Treat the edge list as undirected
    #[arg(long)]
    undirected: bool,

    #[arg(long)]
    start: String,

    #[arg(long)]
    end: String,

    /// Heuristic for A* and greedy best-first
    #[arg(long, value_enum)]
    heuristic: Option<HeuristicKind>,
}

#[derive(Subcommand)]
enum Command {
    /// Run one algorithm and print every snapshot
    Run {
        #[command(flatten)]
        graph: GraphArgs,

        #[arg(short, long)]
        algorithm: String,

        /// Print snapshots as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Run several algorithms on the same graph
    Compare {
        #[command(flatten)]
        graph: GraphArgs,

        #[arg(long, value_delimiter = ',')]
        algorithms: Vec<String>,

        #[arg(long)]
        json: bool,
    },
    /// Aggregate statistics over randomly generated graphs
    Batch {
        #[arg(long)]
        seed: Option<u64>,

        #[arg(long)]
        num_graphs: Option<usize>,

        #[arg(long)]
        json: bool,
    },
    /// Generate a random graph and write it as JSON
    Generate {
        #[arg(long, value_enum)]
        kind: Option<BuilderKind>,

        #[arg(long)]
        nodes: Option<usize>,

        #[arg(long)]
        density: Option<f64>,

        #[arg(long)]
        directed: bool,

        #[arg(long)]
        seed: Option<u64>,

        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("无法加载配置文件 {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(level) = &cli.log_level {
        config.log.level = level.clone();
    }
    logging::init(&config.log).context("日志初始化失败")?;

    let result = execute(cli.command, &config);
    logging::shutdown();
    result
}

fn execute(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Run {
            graph,
            algorithm,
            json,
        } => {
            let algorithm: Algorithm = algorithm.parse()?;
            let options = run_options(&graph, config);
            let (loaded, start, end) = load_graph(&graph)?;

            let mut run = algorithm.run_with(&loaded, &start, &end, &options)?;
            for snapshot in run.by_ref() {
                if json {
                    println!("{}", serde_json::to_string(&snapshot)?);
                } else {
                    println!("[{:>4}] {:<14} {}", snapshot.step, format!("{:?}", snapshot.kind), snapshot.message);
                }
            }

            let metrics = run.metrics();
            if json {
                println!("{}", serde_json::to_string(metrics)?);
            } else {
                let summary = metrics.summary();
                println!();
                println!("{}", run.algorithm().name());
                println!("  Relaxations: {}", summary.relaxations);
                println!("  Comparisons: {}", summary.comparisons);
                println!("  Time (s):    {}", summary.time_secs);
                println!("  Final Cost:  {}", summary.final_cost);
                println!("  Path Found:  {}", summary.path_found);
            }
        }
        Command::Compare {
            graph,
            algorithms,
            json,
        } => {
            let algorithms: Vec<Algorithm> = if algorithms.is_empty() {
                Algorithm::ALL.to_vec()
            } else {
                algorithms
                    .iter()
                    .map(|a| a.parse::<Algorithm>())
                    .collect::<Result<_, _>>()?
            };
            let options = run_options(&graph, config);
            let (loaded, start, end) = load_graph(&graph)?;

            let rows = compare(&loaded, &start, &end, &algorithms, &options);
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
                return Ok(());
            }

            println!(
                "{:<24} {:>12} {:>12} {:>10} {:>10} {:>6} {:>10}",
                "Algorithm", "Relaxations", "Comparisons", "Time (s)", "Final Cost", "Path", "Snapshots"
            );
            for row in rows {
                match (&row.summary, &row.error) {
                    (Some(s), _) => println!(
                        "{:<24} {:>12} {:>12} {:>10} {:>10} {:>6} {:>10}",
                        row.algorithm.name(),
                        s.relaxations,
                        s.comparisons,
                        s.time_secs,
                        s.final_cost,
                        s.path_found,
                        row.snapshots
                    ),
                    (None, Some(err)) => println!("{:<24} error: {}", row.algorithm.name(), err),
                    (None, None) => println!("{:<24} -", row.algorithm.name()),
                }
            }
        }
        Command::Batch {
            seed,
            num_graphs,
            json,
        } => {
            let mut patched = config.clone();
            if let Some(n) = num_graphs {
                patched.batch.num_graphs = n;
            }
            patched.validate()?;
            let options = RunOptions {
                heuristic: patched.search.heuristic,
            };
            let runner = BatchRunner::new(patched.batch, patched.generator, options);
            let mut rng = seeded(seed);
            let report = runner.run(&mut rng)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            println!(
                "Graphs: {} requested, {} run, {} skipped (no path)",
                report.graphs_requested, report.graphs_run, report.graphs_skipped
            );
            println!(
                "{:<24} {:>8} {:>10} {:>12} {:>10} {:>12} {:>10} {:>8}",
                "Algorithm", "Success", "Rate", "Avg Cost", "Avg Steps", "Avg Time(s)", "Suboptimal", "Failed"
            );
            for stats in &report.stats {
                let avg_cost = stats
                    .avg_cost
                    .map(|c| format!("{:.2}", c))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<24} {:>8} {:>9.1}% {:>12} {:>10.1} {:>12.5} {:>10} {:>8}",
                    stats.algorithm.name(),
                    stats.successes,
                    stats.success_rate * 100.0,
                    avg_cost,
                    stats.avg_snapshots,
                    stats.avg_elapsed_secs,
                    stats.suboptimal,
                    stats.failures
                );
            }
        }
        Command::Generate {
            kind,
            nodes,
            density,
            directed,
            seed,
            out,
        } => {
            let mut patched = config.clone();
            if let Some(kind) = kind {
                patched.generator.builder = kind;
            }
            if let Some(n) = nodes {
                patched.generator.num_nodes = n;
            }
            if let Some(p) = density {
                patched.generator.density = p;
            }
            patched.generator.directed |= directed;
            patched.validate()?;
            let generator = patched.generator;

            let mut rng = seeded(seed);
            let graph = builders::generate(&mut rng, &generator)?;
            let text = graph_to_json(&graph)?;
            match out {
                Some(path) => {
                    fs::write(&path, text)
                        .with_context(|| format!("无法写入 {}", path.display()))?;
                    log::info!(
                        "已生成 {} 个节点、{} 条边的图: {}",
                        graph.node_count(),
                        graph.edge_count(),
                        path.display()
                    );
                }
                None => println!("{}", text),
            }
        }
    }

    Ok(())
}

fn run_options(args: &GraphArgs, config: &Config) -> RunOptions {
    RunOptions {
        heuristic: args.heuristic.unwrap_or(config.search.heuristic),
    }
}

fn seeded(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn load_graph(args: &GraphArgs) -> Result<(Graph, NodeId, NodeId)> {
    let graph = match (&args.graph, &args.edges) {
        (Some(path), _) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("无法读取 {}", path.display()))?;
            graph_from_json(&text)?
        }
        (None, Some(path)) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("无法读取 {}", path.display()))?;
            parse_edge_list(&text, !args.undirected)?
        }
        (None, None) => bail!("需要 --graph 或 --edges 指定输入图"),
    };
    let (start, end) = (graph.resolve(&args.start), graph.resolve(&args.end));
    Ok((graph, start, end))
}
