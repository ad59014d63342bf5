//! Entry point: load a maze, let the avatars feel their way to the target.

use std::error::Error;
use std::io;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use mazewalk::config::{AppConfig, RenderConfig};
use mazewalk::domain::decide::Strategy;
use mazewalk::domain::heading::Heading;
use mazewalk::domain::update::Learned;
use mazewalk::sim::event::ExploreEvent;
use mazewalk::sim::explorer::{AvatarStatus, Explorer};
use mazewalk::sim::layout::{find_layout, list_layouts};
use mazewalk::sim::oracle::GroundTruth;
use mazewalk::ui::dump::dump_maze;
use mazewalk::ui::renderer::{frame, frame_text, Renderer};

/// Explore a maze you cannot see with the right-hand rule.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Layout file, name of a file in the mazes directory, or a built-in maze.
    #[arg(default_value = "corner")]
    maze: String,

    /// Decision strategy (simple | memory).
    #[arg(short, long)]
    strategy: Option<Strategy>,

    /// Attempts each avatar may make before giving up.
    #[arg(short = 'n', long, value_name = "N")]
    max_attempts: Option<u32>,

    /// Heading each avatar pretends it just arrived along.
    #[arg(long, value_name = "HEADING")]
    heading: Option<Heading>,

    /// Animate the exploration in the terminal.
    #[arg(short, long)]
    render: bool,

    /// Delay between rendered steps.
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Print every cell of the learned model when done.
    #[arg(long)]
    dump: bool,

    /// List available mazes and exit.
    #[arg(long)]
    list: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Config warnings go to stderr before the configured filter exists.
    let bootstrap = tracing_subscriber::fmt()
        .with_max_level(Level::WARN)
        .with_writer(io::stderr)
        .finish();
    let mut config = tracing::subscriber::with_default(bootstrap, AppConfig::load);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if let Some(strategy) = cli.strategy { config.solver.strategy = strategy; }
    if let Some(n) = cli.max_attempts { config.solver.max_attempts = n; }
    if let Some(h) = cli.heading { config.solver.initial_heading = h; }
    if cli.render { config.render.enabled = true; }
    if let Some(ms) = cli.delay_ms { config.render.step_delay_ms = ms; }

    match run(&cli, &config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every avatar reached the target.
fn run(cli: &Cli, config: &AppConfig) -> Result<bool, Box<dyn Error>> {
    if cli.list {
        for name in list_layouts(config) {
            println!("{name}");
        }
        return Ok(true);
    }

    let layout = find_layout(&cli.maze, config)?;
    info!(
        maze = %layout.name,
        width = layout.width,
        height = layout.height,
        avatars = layout.starts.len(),
        strategy = ?config.solver.strategy,
        "exploring"
    );

    let mut explorer = Explorer::from_layout(&layout, &config.solver)?;
    if config.render.enabled {
        watch(&mut explorer, &config.render)?;
    } else {
        explorer.run()?;
    }

    let positions: Vec<_> = explorer.avatars().iter().map(|a| a.position).collect();
    print!("{}", frame_text(&frame(explorer.knowledge(), &positions, explorer.target())));
    for line in status_lines(&explorer, &[]) {
        println!("{line}");
    }
    if cli.dump {
        dump_maze(explorer.knowledge(), &mut io::stdout().lock())?;
    }

    Ok(explorer.avatars().iter().all(|a| a.status == AvatarStatus::Reached))
}

/// Step and redraw until done, or until the user presses q / Esc / Ctrl-C.
fn watch(
    explorer: &mut Explorer<GroundTruth>,
    render: &RenderConfig,
) -> Result<(), Box<dyn Error>> {
    let mut renderer = Renderer::new(io::stdout());
    renderer.init()?;
    terminal::enable_raw_mode()?;

    let result = watch_loop(explorer, &mut renderer, Duration::from_millis(render.step_delay_ms));

    terminal::disable_raw_mode()?;
    renderer.cleanup()?;
    result
}

fn watch_loop(
    explorer: &mut Explorer<GroundTruth>,
    renderer: &mut Renderer<io::Stdout>,
    delay: Duration,
) -> Result<(), Box<dyn Error>> {
    let mut latest: Vec<Option<Learned>> = vec![None; explorer.avatars().len()];
    loop {
        let positions: Vec<_> = explorer.avatars().iter().map(|a| a.position).collect();
        let f = frame(explorer.knowledge(), &positions, explorer.target());
        renderer.draw(&f, &status_lines(explorer, &latest))?;

        if explorer.is_finished() {
            return Ok(());
        }
        if event::poll(delay)? {
            if let Event::Key(key) = event::read()? {
                if is_quit(&key) {
                    info!("stopped by user after {} rounds", explorer.rounds());
                    return Ok(());
                }
            }
        }
        remember(&mut latest, &explorer.step()?);
    }
}

/// Keep the newest `Learned` fact per avatar.
fn remember(latest: &mut [Option<Learned>], events: &[ExploreEvent]) {
    for ev in events {
        if let ExploreEvent::Learned { fact, .. } = *ev {
            if let Some(slot) = latest.get_mut(ev.avatar()) {
                *slot = Some(fact);
            }
        }
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

fn describe(fact: &Learned) -> String {
    match *fact {
        Learned::Passage { from, heading, to } => format!("{from} {heading} leads to {to}"),
        Learned::Wall { at, heading } => format!("wall {heading} of {at}"),
        Learned::DeadEndSealed { from, .. } => format!("sealed dead end {from}"),
    }
}

/// One header line, then one line per avatar. `latest[i]` is the last fact
/// avatar `i` taught the model, shown while watching.
fn status_lines(explorer: &Explorer<GroundTruth>, latest: &[Option<Learned>]) -> Vec<String> {
    let mut lines = vec![format!(
        "round {}  strategy {:?}  oracle calls {}",
        explorer.rounds(),
        explorer.strategy(),
        explorer.oracle().attempts()
    )];
    for a in explorer.avatars() {
        let what = match a.status {
            AvatarStatus::Exploring => format!("at {} heading {}", a.position, a.heading),
            AvatarStatus::Reached => "reached the target".to_string(),
            AvatarStatus::Trapped(at) => format!("trapped at {at}"),
            AvatarStatus::GaveUp => format!("gave up at {}", a.position),
        };
        let mut line = format!("avatar {}: {} after {} attempts", a.id, what, a.attempts);
        if let Some(Some(fact)) = latest.get(a.id) {
            line.push_str(&format!("  [{}]", describe(fact)));
        }
        lines.push(line);
    }
    lines
}
