use clap::{Parser, Subcommand};
use itertools::Itertools;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use windsor_path::flow::{FollowupResponse, ResultKind};
use windsor_path::prelude::*;
use windsor_path::report::preview;
use windsor_path::session::DEFAULT_START;

/// Guided decision-graph questionnaire CLI
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and validate a flow document and report unreachable nodes
    Check {
        /// Flow document to load instead of the embedded one
        #[arg(short, long)]
        flow: Option<PathBuf>,
    },
    /// Walk the questionnaire interactively
    Walk {
        #[arg(short, long)]
        flow: Option<PathBuf>,
        /// Start at a scenario's entry node instead of the movement question
        #[arg(short, long)]
        scenario: Option<String>,
    },
    /// Print the risk profile for a stored answer map
    Risk {
        /// JSON object of node id to answer
        answers_path: PathBuf,
    },
    /// Print the outgoing edges of a node and the predicted next step
    Edges {
        node: String,
        #[arg(short, long)]
        flow: Option<PathBuf>,
    },
}

fn main() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Check { flow } => run_check(flow),
        Command::Walk { flow, scenario } => run_walk(flow, scenario),
        Command::Risk { answers_path } => run_risk(answers_path),
        Command::Edges { node, flow } => run_edges(node, flow),
    }
}

fn load_graph(flow: Option<PathBuf>) -> FlowGraph {
    let definition = match &flow {
        Some(path) => FlowDefinition::from_file(path),
        None => FlowDefinition::builtin(),
    }
    .unwrap_or_else(|e| exit_with_error(&format!("Failed to load flow document: {}", e)));

    FlowGraph::new(definition)
        .unwrap_or_else(|e| exit_with_error(&format!("Flow document is invalid: {}", e)))
}

fn run_check(flow: Option<PathBuf>) {
    let graph = load_graph(flow);

    println!("Flow document is valid.");
    if let Some(meta) = graph.metadata() {
        println!("  Version:   {} ({})", meta.version, meta.last_updated);
        println!("  Source:    {}", meta.source);
    }
    let by_type = graph
        .node_ids()
        .into_iter()
        .filter_map(|id| graph.get_node(id).ok())
        .counts_by(|node| node.node_type());
    println!("  Nodes:     {}", graph.len());
    for (node_type, count) in by_type.into_iter().sorted_by_key(|(t, _)| t.to_string()) {
        println!("    {:<14} {}", node_type, count);
    }
    println!("  Scenarios: {}", graph.scenarios().len());

    if graph.warnings().is_empty() {
        println!("  Warnings:  none");
    } else {
        println!("  Warnings:");
        for warning in graph.warnings() {
            println!("    - {}", warning);
        }
    }

    let mut starts = vec![DEFAULT_START];
    starts.extend(graph.scenarios().iter().map(|s| s.start_node_id.as_str()));
    if !graph.contains(DEFAULT_START) {
        starts.remove(0);
    }

    let unreachable = graph
        .unreachable_from(starts)
        .unwrap_or_else(|e| exit_with_error(&format!("Reachability check failed: {}", e)));
    if unreachable.is_empty() {
        println!("  Every node is reachable.");
    } else {
        println!("  Unreachable from any entry point:");
        for id in unreachable {
            println!("    - {}", id);
        }
    }
}

fn run_risk(answers_path: PathBuf) {
    let json = fs::read_to_string(&answers_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read answers file '{}': {}",
            answers_path.display(),
            e
        ))
    });
    let answers: Answers = serde_json::from_str(&json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse answers JSON: {}", e)));

    print_risk(&RiskProfileCalculator::calculate(&answers));
}

fn run_edges(node: String, flow: Option<PathBuf>) {
    let graph = load_graph(flow);
    let edges = graph
        .get_outgoing_edges(&node)
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));

    if edges.is_empty() {
        println!("'{}' has no outgoing edges.", node);
        return;
    }
    for edge in edges {
        println!("  {}", edge);
    }
    if let Ok(Some(edge)) = graph.predict_next_edge(&node) {
        println!("Predicted: {}", edge);
    }
}

fn run_walk(flow: Option<PathBuf>, scenario: Option<String>) {
    let graph = load_graph(flow);
    let mut machine = SessionMachine::new(&graph)
        .unwrap_or_else(|e| exit_with_error(&format!("Cannot start a session: {}", e)));

    if let Some(id) = scenario {
        machine
            .start_scenario(&id)
            .unwrap_or_else(|e| exit_with_error(&e.to_string()));
    }

    println!("--- Windsor Path ---");
    println!("Commands: 'b <node>' to revise, 'back' to leave a result, 'r' to restart, 'q' to quit.");

    loop {
        let node = machine
            .current_node()
            .unwrap_or_else(|e| exit_with_error(&e.to_string()));
        println!();
        let outcome = match show_card(&machine, node) {
            Step::Input(input) => apply_input(&mut machine, node, &input),
            Step::Quit => break,
        };

        match outcome {
            Ok(()) => print_status(&machine),
            Err(e) if e.is_fatal() => exit_with_error(&e.to_string()),
            Err(e) => println!("  ! {}", e),
        }
    }
}

enum Step {
    Input(String),
    Quit,
}

/// Prints the current card and reads the user's response.
fn show_card(machine: &SessionMachine<'_>, node: &FlowNode) -> Step {
    if let Some(prompt) = node.prompt() {
        println!("{}", prompt);
    }
    match &node.kind {
        NodeKind::SingleChoice(question) => {
            print_help(question.help.as_deref());
            print_options(node);
            if let Some(hint) = preview(&node.id) {
                println!("  Coming up next: {}", hint);
            }
        }
        NodeKind::MultiChoice(multi) => {
            print_help(multi.help.as_deref());
            print_options(node);
            println!("  (choose several, separated by commas)");
        }
        NodeKind::Helper(helper) => {
            print_help(helper.explanation.as_deref());
            println!("{}", helper.followup.prompt);
            match &helper.followup.response {
                FollowupResponse::Options(_) => print_options(node),
                FollowupResponse::FreeText(text) => {
                    if let Some(hint) = &text.hint {
                        println!("  {}", hint);
                    }
                }
            }
        }
        NodeKind::Verdict(_) => match machine.evaluate_verdict() {
            Ok(assessment) => {
                println!("{}", assessment.message);
                println!("  {}", assessment.explanation);
                println!("  (press enter to continue)");
            }
            Err(e) => println!("  ! {}", e),
        },
        NodeKind::Result(_) | NodeKind::Redirect(_) => {
            if let Some(view) = machine.graph().result_view(&node.id) {
                print_result(&view);
            }
            println!();
            println!("{}", machine.report().to_text());
        }
        NodeKind::Router => {
            println!("'{}' is a routing node with no resolution rule.", node.id);
        }
    }

    match prompt_for_input("Answer", default_answer(node)) {
        None => Step::Quit,
        Some(input) if input == "q" => Step::Quit,
        Some(input) => Step::Input(input),
    }
}

/// Dead ends step back on a bare Enter.
fn default_answer(node: &FlowNode) -> Option<&'static str> {
    matches!(
        node.kind,
        NodeKind::Result(_) | NodeKind::Redirect(_) | NodeKind::Router
    )
    .then_some("back")
}

fn apply_input(
    machine: &mut SessionMachine<'_>,
    node: &FlowNode,
    input: &str,
) -> Result<(), NavigationError> {
    match input {
        "r" => {
            machine.reset();
            return Ok(());
        }
        "back" => return machine.go_back_from_result(),
        _ => {}
    }
    if let Some(target) = input.strip_prefix("b ") {
        return machine.go_back_to(target.trim());
    }

    match &node.kind {
        NodeKind::SingleChoice(_) => machine.answer_single(&node.id, &resolve_value(node, input)),
        NodeKind::MultiChoice(_) => {
            let values: Vec<String> = input
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(|part| resolve_value(node, part))
                .collect();
            machine.answer_multi(&node.id, values.as_slice())
        }
        NodeKind::Helper(helper) => match &helper.followup.response {
            FollowupResponse::Options(_) => {
                machine.answer_helper_option(&node.id, &resolve_value(node, input))
            }
            FollowupResponse::FreeText(_) => machine.submit_text(&node.id, input),
        },
        NodeKind::Verdict(_) => machine.resolve_verdict(),
        NodeKind::Result(_) | NodeKind::Redirect(_) | NodeKind::Router => Ok(()),
    }
}

/// Accepts a 1-based option number or the option value itself.
fn resolve_value(node: &FlowNode, input: &str) -> String {
    let options = node.selectable_options();
    input
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|idx| options.get(idx))
        .map_or_else(|| input.to_string(), |opt| opt.value.clone())
}

fn print_help(help: Option<&str>) {
    if let Some(help) = help {
        println!("  {}", help);
    }
}

fn print_options(node: &FlowNode) {
    for (idx, option) in node.selectable_options().iter().enumerate() {
        println!("  {}) {} [{}]", idx + 1, option.label, option.value);
    }
}

fn print_result(view: &ResultView) {
    let marker = match view.result_type {
        ResultKind::NotAtRisk | ResultKind::Simple => "OK",
        ResultKind::Moderate => "CHECK",
        ResultKind::AtRisk => "AT RISK",
        ResultKind::EdgeCase => "REVIEW",
    };
    println!("[{}] {}", marker, view.title);
    println!("{}", view.summary);
    if !view.explanation.is_empty() {
        println!("{}", view.explanation);
    }
    for block in &view.requirements {
        println!("{}:", block.category);
        for item in &block.items {
            println!("  - {}", item);
        }
    }
    for action in &view.actions {
        println!("* {}: {}", action.title, action.description);
    }
    for warning in &view.warnings {
        println!("! {}", warning);
    }
    for reason in &view.why_complex {
        println!("? {}", reason);
    }
}

fn print_status(machine: &SessionMachine<'_>) {
    let band = machine.complexity_band();
    let scenario = machine.scenario_label();
    if !scenario.is_empty() {
        println!("  Scenario: {}", scenario);
    }
    println!(
        "  Complexity {}/{} ({:.0}%): {}. {}",
        machine.complexity(),
        machine.max_complexity(),
        machine.complexity_percent(),
        band.status(),
        band.explanation()
    );
    print_risk(&machine.risk_profile());
}

fn print_risk(profile: &RiskProfile) {
    let scores = Dimension::ALL
        .iter()
        .map(|d| format!("{} {}", d, profile.score(*d)))
        .join(", ");
    println!("  Risk {} ({}): {}", profile.overall, profile.tone, scores);
    for note in &profile.notes {
        println!("    - {}", note);
    }
}

/// Prompts the user and reads a line. `None` on end of input.
fn prompt_for_input(prompt_text: &str, default: Option<&str>) -> Option<String> {
    let mut line = String::new();
    let default_prompt = default.map_or(String::new(), |d| format!(" [default: {}]", d));

    print!("> {}{}: ", prompt_text, default_prompt);
    let _ = io::stdout().flush();

    let read = io::stdin()
        .read_line(&mut line)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read input: {}", e)));
    if read == 0 {
        return None;
    }

    let trimmed = line.trim().to_string();
    if trimmed.is_empty() {
        Some(default.unwrap_or("").to_string())
    } else {
        Some(trimmed)
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
