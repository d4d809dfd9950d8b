//! Headless devcon host.
//!
//! Reads lines from stdin and feeds them to a [`Console`], printing the
//! visible rows after every line. A line ending in a tab completes the
//! command name instead of submitting; a line ending in ` \` is staged as a
//! continuation of a multi-line command.

use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};

use devcon_terminal::handler::{self, CommandResult};
use devcon_terminal::{Console, ConsoleConfig, ConsoleError};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Config from CLI arg, DEVCON_CONFIG env var, or defaults.
    let config = match std::env::args()
        .nth(1)
        .or_else(|| std::env::var("DEVCON_CONFIG").ok())
    {
        Some(path) => ConsoleConfig::load(&path)
            .with_context(|| format!("failed to load config from {path}"))?,
        None => ConsoleConfig::default(),
    };

    let mut console = Console::new(config)?;
    register_demo_commands(&mut console)?;
    log::info!(
        "Registered {} commands",
        console.interpreter().registry().len()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        if let Some(partial) = line.strip_suffix('\t') {
            console.input_mut().take();
            for ch in partial.chars() {
                console.input_mut().insert(ch);
            }
            console.tab(true);
            writeln!(stdout, "{}", console.input().value())?;
            continue;
        }

        console.input_mut().take();
        if let Some(head) = line.strip_suffix(" \\") {
            console.input_mut().write(head);
            console.continue_line();
        } else {
            console.input_mut().write(&line);
            console.submit();
        }
        console.update();
        render(&console, &mut stdout)?;
    }

    // Let a pending background command report before exiting.
    while console.is_busy() {
        thread::sleep(Duration::from_millis(10));
    }
    if console.update() > 0 {
        render(&console, &mut stdout)?;
    }
    Ok(())
}

fn render(console: &Console, out: &mut impl Write) -> io::Result<()> {
    let prefix = console.output().input_prefix();
    writeln!(out, "----")?;
    for row in console.visible_rows() {
        if row.prompt {
            writeln!(out, "{prefix}{}", row.text)?;
        } else {
            writeln!(out, "{}", row.text)?;
        }
    }
    out.flush()
}

fn register_demo_commands(console: &mut Console) -> devcon_terminal::Result<()> {
    console.register(
        "echo",
        handler::described("Print the arguments", |args| {
            Ok(CommandResult::text(args.join(" ")))
        }),
    )?;
    console.register(
        "add",
        handler::from_fallible(|args| {
            args.iter()
                .map(|a| a.parse::<i64>())
                .sum::<Result<i64, _>>()
                .map(|total| total.to_string())
        }),
    )?;
    console.register(
        "upper",
        handler::from_text(|args| args.join(" ").to_uppercase()),
    )?;

    let slot = console.background_slot();
    console.register(
        "sleep",
        handler::described("Wait in the background, then report", move |args| {
            let ms: u64 = match args.first() {
                Some(arg) => arg
                    .parse()
                    .map_err(|_| ConsoleError::InvalidArgument(format!("bad duration '{arg}'")))?,
                None => 500,
            };
            let job = slot.try_begin()?;
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(ms));
                job.output(format!("slept {ms} ms"));
            });
            Ok(CommandResult::text("sleeping..."))
        }),
    )?;
    Ok(())
}
