use std::{
    fs::File,
    io::{self, BufReader, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use donut_reveal::{
    Page, PageSpec, RasterOptions, Timestamp, Widget, WidgetId, rasterize_svg, widget_svg,
    write_png,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "donut-reveal", version)]
struct Cli {
    /// Log filter for stderr diagnostics (`RUST_LOG` takes precedence).
    #[arg(long, global = true, default_value = "warn")]
    log: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scroll every widget into view at t=0 and snapshot one of them later.
    Frame(FrameArgs),
    /// Print one JSON line per dispatched timer/frame.
    Trace(TraceArgs),
    /// Validate a page description and summarise its data.
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input page description JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Virtual time of the snapshot, in milliseconds.
    #[arg(long)]
    at_ms: u64,

    /// Output SVG path.
    #[arg(long)]
    out: PathBuf,

    /// Also rasterise the snapshot to this PNG path.
    #[arg(long)]
    png: Option<PathBuf>,

    /// Device pixels per SVG unit for `--png`.
    #[arg(long, default_value_t = 1.0)]
    scale: f32,

    /// Widget id to snapshot (defaults to the first).
    #[arg(long)]
    widget: Option<String>,
}

#[derive(Parser, Debug)]
struct TraceArgs {
    /// Input page description JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Stop tracing at this virtual time, in milliseconds.
    #[arg(long)]
    until_ms: u64,

    /// Scroll every widget out of view at this time.
    #[arg(long)]
    leave_at_ms: Option<u64>,

    /// Scroll every widget back into view at this time (after `--leave-at-ms`).
    #[arg(long, requires = "leave_at_ms")]
    reenter_at_ms: Option<u64>,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Input page description JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log))
        .context("parse --log filter")?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Trace(args) => cmd_trace(args),
        Command::Check(args) => cmd_check(args),
    }
}

fn read_page_json(path: &Path) -> anyhow::Result<PageSpec> {
    let f = File::open(path).with_context(|| format!("open page '{}'", path.display()))?;
    let spec: PageSpec =
        serde_json::from_reader(BufReader::new(f)).with_context(|| "parse page JSON")?;
    spec.validate()?;
    Ok(spec)
}

fn set_viewport(page: &mut Page, ratio: f64) -> anyhow::Result<()> {
    for i in 0..page.widgets().len() {
        page.observe(WidgetId(i), ratio)?;
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let spec = read_page_json(&args.in_path)?;
    let mut page = Page::from_spec(&spec)?;
    set_viewport(&mut page, 1.0)?;
    page.run_until(Timestamp::from_millis(args.at_ms));

    let widget = match args.widget.as_deref() {
        Some(name) => page
            .widget_by_name(name)
            .with_context(|| format!("no widget with id '{name}'"))?,
        None => page
            .widgets()
            .first()
            .context("page description has no widgets")?,
    };
    let svg = widget_svg(widget.view(), page.config());

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &svg)
        .with_context(|| format!("write svg '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());

    if let Some(png) = &args.png {
        let raster = rasterize_svg(
            &svg,
            RasterOptions {
                scale: args.scale,
                ..RasterOptions::default()
            },
        )?;
        write_png(png, &raster)?;
        eprintln!("wrote {}", png.display());
    }
    Ok(())
}

fn cmd_trace(args: TraceArgs) -> anyhow::Result<()> {
    let spec = read_page_json(&args.in_path)?;
    let mut page = Page::from_spec(&spec)?;
    let until = Timestamp::from_millis(args.until_ms);

    let mut steps = vec![(Timestamp::ZERO, 1.0)];
    if let Some(ms) = args.leave_at_ms {
        steps.push((Timestamp::from_millis(ms), 0.0));
    }
    if let Some(ms) = args.reenter_at_ms {
        steps.push((Timestamp::from_millis(ms), 1.0));
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut write_err = None;
    for (at, ratio) in steps.into_iter().filter(|(at, _)| *at <= until) {
        page.run_until_traced(at, |fired, widget| {
            if write_err.is_none() {
                write_err = trace_line(&mut out, fired.at, widget, &fired.task.kind).err();
            }
        });
        set_viewport(&mut page, ratio)?;
        let event = if ratio > 0.0 { "enter" } else { "leave" };
        for widget in page.widgets() {
            trace_line(&mut out, at, widget, &serde_json::json!({ "kind": event }))?;
        }
    }
    page.run_until_traced(until, |fired, widget| {
        if write_err.is_none() {
            write_err = trace_line(&mut out, fired.at, widget, &fired.task.kind).err();
        }
    });
    if let Some(err) = write_err {
        return Err(err);
    }
    out.flush().context("flush trace output")?;
    Ok(())
}

fn trace_line(
    out: &mut impl io::Write,
    at: Timestamp,
    widget: &Widget,
    event: &impl serde::Serialize,
) -> anyhow::Result<()> {
    let line = serde_json::json!({
        "at_ms": at.as_millis_f64(),
        "widget": widget.name(),
        "event": event,
        "state": widget.state(),
        "counter": widget.view().counter_text(),
        "revealed": widget.view().rows.iter().filter(|r| r.revealed).count(),
    });
    writeln!(out, "{line}").context("write trace line")?;
    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let spec = read_page_json(&args.in_path)?;
    let page = Page::from_spec(&spec)?;
    for widget in page.widgets() {
        let view = widget.view();
        println!(
            "{}: {} segments, {} bar rows, counter target {}",
            widget.name(),
            widget.segments().len(),
            view.rows.len(),
            view.counter
                .as_ref()
                .map_or_else(|| "-".to_owned(), |c| c.target.to_string()),
        );
    }
    println!("ok: {} widget(s)", page.widgets().len());
    Ok(())
}
