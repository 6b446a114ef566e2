//! Interactive terminal front-end for the Dijkstra trainer.
//!
//! Provides the `pathlab` binary: pick a graph source and endpoints on the
//! command line, then step through the trace interactively. The loop is a
//! thin observer over the engine's [`Session`]: every command maps to one
//! session event, and the screen is redrawn from the returned view
//! descriptions. All trainer logic lives in `pathlab-engine`.

use std::io::{self, BufRead, Write};
use std::process;

use clap::{Parser, ValueEnum};

use pathlab_core::NodeId;
use pathlab_engine::provider::DEFAULT_EDGE_LIST;
use pathlab_engine::view::{GraphScene, RowMark, TableView};
use pathlab_engine::{AnswerOutcome, DisplayOptions, GraphSource, Session};

/// Interactive step-by-step Dijkstra trainer.
#[derive(Parser)]
#[command(name = "pathlab", about = "Interactive step-by-step Dijkstra trainer")]
struct Cli {
    /// Graph source to start with.
    #[arg(short, long, value_enum, default_value = "example")]
    source: SourceArg,

    /// Node count for the random source.
    #[arg(short, long, default_value_t = 8)]
    nodes: u32,

    /// Ring-lattice neighbor count for the random source.
    #[arg(long, default_value_t = 3)]
    ring_k: u32,

    /// Rewiring probability for the random source.
    #[arg(long, default_value_t = 0.5)]
    rewire_p: f64,

    /// Seed for random graph generation.
    #[arg(long, default_value_t = 1)]
    graph_seed: u64,

    /// Edge-list text for the edge-list source, e.g. "(0,1,10),(1,2,10)".
    #[arg(long)]
    edge_list: Option<String>,

    /// Start node.
    #[arg(long, default_value_t = 0)]
    start: u32,

    /// Target node.
    #[arg(long, default_value_t = 1)]
    target: u32,

    /// Seed for the deterministic graph layout.
    #[arg(long, default_value_t = 1)]
    layout_seed: u64,

    /// Render for a dark terminal.
    #[arg(long)]
    dark: bool,

    /// Dump machine-readable JSON after every command instead of text.
    #[arg(long)]
    json: bool,
}

/// Graph sources selectable on the command line.
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SourceArg {
    /// Connected small-world random graph.
    Random,
    /// The fixed 8-city teaching example.
    Example,
    /// User-supplied edge list.
    EdgeList,
    /// CSV upload (not implemented).
    Csv,
}

fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let source = match cli.source {
        SourceArg::Random => GraphSource::Random {
            n: cli.nodes,
            k: cli.ring_k,
            p: cli.rewire_p,
        },
        SourceArg::Example => GraphSource::FixedExample,
        SourceArg::EdgeList => GraphSource::EdgeList(
            cli.edge_list.clone().unwrap_or_else(|| DEFAULT_EDGE_LIST.to_owned()),
        ),
        SourceArg::Csv => GraphSource::CsvUpload,
    };
    let options = DisplayOptions {
        layout_seed: cli.layout_seed,
        dark_mode: cli.dark,
    };

    let session = match Session::new(
        source,
        cli.graph_seed,
        NodeId(cli.start),
        NodeId(cli.target),
        options,
    ) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("Error: {err}");
            process::exit(1);
        }
    };

    run_loop(session, cli.json);
}

/// The interactive read-eval loop. Returns on quit or end of input.
fn run_loop(mut session: Session, json: bool) {
    render(&session, json);
    print_help();

    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }
        let line = line.trim();
        let (command, rest) = match line.split_once(' ') {
            Some((head, tail)) => (head, tail.trim()),
            None => (line, ""),
        };

        match command {
            "" => continue,
            "next" | "n" => {
                if let Err(err) = session.advance() {
                    eprintln!("Error: {err}");
                }
                render(&session, json);
            }
            "back" | "b" => {
                session.step_back();
                render(&session, json);
            }
            "answer" | "a" => {
                match session.submit_answer(rest) {
                    AnswerOutcome::Correct => println!("Correct!"),
                    AnswerOutcome::Incorrect => println!("Not quite."),
                    AnswerOutcome::NotAwaitingAnswer => {
                        println!("No answer is expected right now.")
                    }
                }
                render(&session, json);
            }
            "graph" | "g" => print_scene(&session.scene()),
            "table" | "t" => print_table(&session.table()),
            "random" => select(&mut session, parse_random(rest)),
            "example" => select(&mut session, Some(GraphSource::FixedExample)),
            "edges" => select(&mut session, Some(GraphSource::EdgeList(rest.to_owned()))),
            "start" => set_endpoint(&mut session, rest, true),
            "target" => set_endpoint(&mut session, rest, false),
            "layout" => match rest.parse::<u64>() {
                Ok(seed) => {
                    session.set_layout_seed(seed);
                    print_scene(&session.scene());
                }
                Err(_) => eprintln!("Error: expected a numeric layout seed"),
            },
            "json" => print_json(&session),
            "help" | "h" => print_help(),
            "quit" | "q" | "exit" => return,
            other => eprintln!("Unknown command '{other}'; type 'help' for the list"),
        }
    }
}

fn parse_random(rest: &str) -> Option<GraphSource> {
    let parts: Vec<&str> = rest.split_whitespace().collect();
    if parts.len() != 3 {
        eprintln!("Usage: random <n> <k> <p>");
        return None;
    }
    match (
        parts[0].parse::<u32>(),
        parts[1].parse::<u32>(),
        parts[2].parse::<f64>(),
    ) {
        (Ok(n), Ok(k), Ok(p)) => Some(GraphSource::Random { n, k, p }),
        _ => {
            eprintln!("Usage: random <n> <k> <p>");
            None
        }
    }
}

fn select(session: &mut Session, source: Option<GraphSource>) {
    let Some(source) = source else { return };
    match session.select_source(source) {
        Ok(()) => {
            println!(
                "Loaded a graph with {} nodes and {} edges.",
                session.graph().node_count(),
                session.graph().edge_count()
            );
            print_scene(&session.scene());
        }
        // Recoverable: the previous graph stays live.
        Err(err) => eprintln!("Error: {err}"),
    }
}

fn set_endpoint(session: &mut Session, rest: &str, is_start: bool) {
    let Ok(id) = rest.parse::<u32>() else {
        eprintln!("Error: expected a node number");
        return;
    };
    let result = if is_start {
        session.set_start(NodeId(id))
    } else {
        session.set_target(NodeId(id))
    };
    match result {
        Ok(()) => println!("Trace reset."),
        Err(err) => eprintln!("Error: {err}"),
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render(session: &Session, json: bool) {
    if json {
        print_json(session);
        return;
    }

    let narration = session.narration();
    let progress = session.progress();
    println!();
    println!("== {} ==", narration.heading);
    for line in &narration.lines {
        println!("{line}");
    }
    let bar: String = (0..progress.total)
        .map(|i| if i < progress.filled { '#' } else { '-' })
        .collect();
    println!("Progress: [{bar}]");
    println!("Visited:  {}", session.visited_summary());
    print_table(&session.table());
}

fn print_table(table: &TableView) {
    let name_width = table
        .rows
        .iter()
        .map(|row| row.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(table.index_title.len());
    println!("{:<name_width$}  {:>6}  {:<12}", table.index_title, "Cost", "Previous");
    for row in &table.rows {
        let mark = match row.mark {
            Some(RowMark::Start) => " (start)",
            Some(RowMark::Target) => " (target)",
            None => "",
        };
        println!(
            "{:<name_width$}  {:>6}  {:<12}{mark}",
            row.name,
            row.cost.to_string(),
            row.previous
        );
    }
}

fn print_scene(scene: &GraphScene) {
    println!("Nodes:");
    for node in &scene.nodes {
        println!(
            "  {:>3} {:<12} ({:>5.2}, {:>5.2})  {:?}",
            node.id.to_string(),
            node.name,
            node.x,
            node.y,
            node.role
        );
    }
    println!("Edges:");
    for edge in &scene.edges {
        let weight = if scene.weights_visible {
            edge.weight.to_string()
        } else {
            "?".to_owned()
        };
        let marker = if edge.highlighted { " <<" } else { "" };
        println!("  {} -- {}  [{}]{marker}", edge.a, edge.b, weight);
    }
}

fn print_json(session: &Session) {
    let dump = serde_json::json!({
        "state": session.state(),
        "scene": session.scene(),
        "table": session.table(),
        "progress": session.progress(),
    });
    match serde_json::to_string_pretty(&dump) {
        Ok(text) => println!("{text}"),
        Err(err) => eprintln!("Error: failed to serialize state: {err}"),
    }
}

fn print_help() {
    println!(
        "Commands: next (n), back (b), answer <ids> (a), graph (g), table (t),\n          random <n> <k> <p>, example, edges <list>, start <id>, target <id>,\n          layout <seed>, json, help (h), quit (q)"
    );
}
