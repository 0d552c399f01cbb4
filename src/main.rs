//! superscope — run a superscope preset in the terminal.
//!
//! Loads a YAML preset, drives a VM with a fixed frame rate and a
//! tempo-based beat clock, and prints each frame's points or an ASCII plot.

use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Parser;
use tracing::Level;

use superscope::host::{AsciiCanvas, BeatClock};
use superscope::preset::load_preset;
use superscope::{GlobalBuffer, ScopeConfig, SuperscopeVm};

const PLOT_COLS: usize = 64;
const PLOT_ROWS: usize = 24;

#[derive(Parser)]
#[command(name = "superscope")]
#[command(about = "Run superscope presets in the terminal", long_about = None)]
struct Cli {
    /// Preset file (YAML with init/frame/beat/point scripts)
    preset: PathBuf,

    /// Number of frames to render (ignored with --watch)
    #[arg(short, long, default_value = "1")]
    frames: u64,

    /// Frames per second of the simulated render loop
    #[arg(long, default_value = "30")]
    fps: f64,

    /// Tempo of the simulated beat source
    #[arg(long, default_value = "120")]
    bpm: f64,

    /// Canvas width passed to scripts as `w`
    #[arg(long, default_value = "640")]
    width: f64,

    /// Canvas height passed to scripts as `h`
    #[arg(long, default_value = "480")]
    height: f64,

    /// Force the sample count instead of using the script's `n`
    #[arg(short, long)]
    samples: Option<usize>,

    /// Draw each frame as ASCII instead of listing points
    #[arg(short, long)]
    plot: bool,

    /// Keep rendering until Ctrl-C
    #[arg(short, long)]
    watch: bool,

    /// Log compilation details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    let preset = match load_preset(&cli.preset) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("failed to load preset {}: {e}", cli.preset.display());
            process::exit(1);
        }
    };

    let mut vm = SuperscopeVm::new(ScopeConfig::load(), GlobalBuffer::new());
    vm.load_scripts(&preset.scripts());
    vm.init(0.0, cli.width, cli.height, cli.samples);

    let running = Arc::new(AtomicBool::new(true));
    if cli.watch {
        let r = running.clone();
        if let Err(e) = ctrlc::set_handler(move || r.store(false, Ordering::SeqCst)) {
            eprintln!("failed to install Ctrl-C handler: {e}");
        }
    }

    let fps = cli.fps.max(1.0);
    let mut clock = BeatClock::new(cli.bpm);
    let mut canvas = AsciiCanvas::new(PLOT_COLS, PLOT_ROWS);
    let mut points = Vec::new();
    let mut frame = 0u64;

    while running.load(Ordering::SeqCst) && (cli.watch || frame < cli.frames) {
        let t = frame as f64 / fps;
        let beat = clock.tick(t);
        vm.render_frame(t, cli.width, cli.height, beat, &mut points);

        if cli.plot {
            canvas.clear();
            canvas.plot_all(&points);
            if cli.watch {
                // Clear screen and home the cursor.
                print!("\x1b[2J\x1b[H");
            }
            println!(
                "{}  frame {frame}  t={t:.2}s  n={}{}",
                preset.name,
                vm.samples(),
                if beat { "  *beat*" } else { "" }
            );
            print!("{}", canvas.render());
        } else {
            println!(
                "# frame {frame} t={t:.3} n={} beat={}",
                vm.samples(),
                u8::from(beat)
            );
            for (x, y) in &points {
                println!("{x:.6} {y:.6}");
            }
        }

        frame += 1;
        if cli.watch {
            thread::sleep(Duration::from_secs_f64(1.0 / fps));
        }
    }

    let log = vm.diagnostics();
    if !log.is_empty() {
        eprintln!("{} script diagnostic(s) reported", log.len());
    }
}
