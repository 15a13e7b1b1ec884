use anyhow::{Context, Result};
use clap::Parser;
use moment_picker::app::App;
use moment_picker::core::config::AppConfig;
use moment_picker::terminal::Terminal;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "moment-picker", version, about = "Terminal date/time picker demo")]
struct Args {
    /// YAML or JSON file describing the pickers to show.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of unconfigured pickers to show when no config is given.
    #[arg(long, default_value_t = 2)]
    count: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Some(
            AppConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
        ),
        None => None,
    };

    let mut terminal = Terminal::new().context("failed to query terminal size")?;
    let mut app = match &config {
        Some(config) => App::from_config(config, terminal.size())?,
        None => App::with_count(args.count, terminal.size()),
    };

    terminal.enter()?;
    let result = event_loop(&mut terminal, &mut app);
    terminal.leave()?;

    result
}

fn event_loop(terminal: &mut Terminal, app: &mut App) -> Result<()> {
    let mut render_requested = true;

    loop {
        if terminal.poll(Duration::from_millis(100))? {
            let event = terminal.read_event()?;
            render_requested |= app.handle_event(event);
        }

        if app.tick() {
            render_requested = true;
        }

        if render_requested {
            terminal.draw(&app.compose())?;
            if app.settle_layout() {
                terminal.draw(&app.compose())?;
            }
            render_requested = false;
        }

        if app.should_exit() {
            break;
        }
    }

    Ok(())
}
