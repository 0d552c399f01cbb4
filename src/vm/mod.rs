//! Superscope VM — compiles the four phase scripts and runs them for the host.
//!
//! The host render loop drives a [`SuperscopeVm`] through [`init`], then once
//! per rendered frame through [`frame`] (and [`beat`] when a beat was
//! detected), then [`point`] once per output sample. Timing and audio context
//! reach scripts only through the variables seeded before each phase:
//! `t`/`time`, `w`, `h`, `n`, `pi`, `beat` and `frame`.
//!
//! [`init`]: SuperscopeVm::init
//! [`frame`]: SuperscopeVm::frame
//! [`beat`]: SuperscopeVm::beat
//! [`point`]: SuperscopeVm::point

pub mod buffer;
pub mod config;
pub mod log;

pub use buffer::{GlobalBuffer, SparseBuffer};
pub use config::ScopeConfig;
pub use log::{DiagnosticLog, LogEntry};

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use tracing::{debug, warn};

use crate::script::{eval, Compiler, Environment, Program};

/// The four lifecycle stages a script fragment can run in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Init,
    Frame,
    Beat,
    Point,
}

impl Phase {
    pub const ALL: [Phase; 4] = [Phase::Init, Phase::Frame, Phase::Beat, Phase::Point];

    fn index(self) -> usize {
        match self {
            Phase::Init => 0,
            Phase::Frame => 1,
            Phase::Beat => 2,
            Phase::Point => 3,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Init => "init",
            Phase::Frame => "frame",
            Phase::Beat => "beat",
            Phase::Point => "point",
        };
        f.write_str(name)
    }
}

/// Source text for all four phases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptSet {
    pub init: String,
    pub frame: String,
    pub beat: String,
    pub point: String,
}

impl ScriptSet {
    pub fn new(
        init: impl Into<String>,
        frame: impl Into<String>,
        beat: impl Into<String>,
        point: impl Into<String>,
    ) -> Self {
        Self {
            init: init.into(),
            frame: frame.into(),
            beat: beat.into(),
            point: point.into(),
        }
    }

    pub fn source(&self, phase: Phase) -> &str {
        match phase {
            Phase::Init => &self.init,
            Phase::Frame => &self.frame,
            Phase::Beat => &self.beat,
            Phase::Point => &self.point,
        }
    }
}

/// A compiled phase script and the hash of the text it came from.
#[derive(Debug, Default)]
struct PhaseScript {
    program: Program,
    hash: Option<u64>,
}

/// One superscope instance.
pub struct SuperscopeVm {
    config: ScopeConfig,
    env: Environment,
    scripts: [PhaseScript; 4],
    samples: usize,
    frame_index: u64,
    compile_count: u64,
    log: DiagnosticLog,
}

impl SuperscopeVm {
    /// Create a VM. `global` is the buffer behind `gmegabuf`; pass clones of
    /// one handle to every VM that should share it.
    pub fn new(config: ScopeConfig, global: GlobalBuffer) -> Self {
        let config = config.normalized();
        Self {
            env: Environment::new(global, config.seed),
            scripts: Default::default(),
            samples: config.default_samples,
            frame_index: 0,
            compile_count: 0,
            log: DiagnosticLog::default(),
            config,
        }
    }

    /// Compile whichever scripts changed since the last load. Returns the
    /// number of phases that were recompiled.
    pub fn load_scripts(&mut self, scripts: &ScriptSet) -> usize {
        Phase::ALL
            .iter()
            .filter(|&&phase| self.load_phase(phase, scripts.source(phase)))
            .count()
    }

    pub fn load_sources(&mut self, init: &str, frame: &str, beat: &str, point: &str) -> usize {
        [init, frame, beat, point]
            .iter()
            .zip(Phase::ALL)
            .filter(|(source, phase)| self.load_phase(*phase, source))
            .count()
    }

    fn load_phase(&mut self, phase: Phase, source: &str) -> bool {
        let hash = source_hash(source);
        let slot = &mut self.scripts[phase.index()];
        if slot.hash == Some(hash) {
            return false;
        }

        let compiled = Compiler::compile(source);
        self.compile_count += 1;
        debug!(
            %phase,
            statements = compiled.program.len(),
            diagnostics = compiled.diagnostics.len(),
            "compiled script"
        );
        for diagnostic in compiled.diagnostics {
            warn!(%phase, %diagnostic, "script diagnostic");
            self.log.push(phase, diagnostic);
        }

        *slot = PhaseScript {
            program: compiled.program,
            hash: Some(hash),
        };
        true
    }

    /// Reset variables, run the init script and settle the sample count.
    ///
    /// `forced_samples`, when given, overrides whatever the script left in `n`.
    pub fn init(&mut self, t: f64, w: f64, h: f64, forced_samples: Option<usize>) {
        self.env.clear_vars();
        self.seed(t, w, h, false);
        self.run(Phase::Init);

        self.samples = match forced_samples {
            Some(n) => self.config.clamp_samples(n),
            None => self.samples_from_n(),
        };
        self.env.set("n", self.samples as f64);

        for name in ["x", "y"] {
            if !self.env.contains(name) {
                self.env.set(name, 0.0);
            }
        }
    }

    pub fn frame(&mut self, t: f64, w: f64, h: f64) {
        self.seed(t, w, h, false);
        self.run(Phase::Frame);
        self.resettle_samples();
        self.frame_index += 1;
    }

    pub fn beat(&mut self, t: f64, w: f64, h: f64) {
        self.seed(t, w, h, true);
        self.run(Phase::Beat);
        self.resettle_samples();
    }

    /// Run the point script for sample `i` and return its `(x, y)`.
    /// A non-finite coordinate is reported as `0.0`.
    pub fn point(&mut self, i: usize) -> (f64, f64) {
        self.env.set("i", i as f64);
        self.run(Phase::Point);
        (
            finite_or_zero(self.env.get("x", 0.0)),
            finite_or_zero(self.env.get("y", 0.0)),
        )
    }

    /// Run one rendered frame: [`frame`](Self::frame), then
    /// [`beat`](Self::beat) if `beat` is set, then every point. `out` is
    /// cleared and refilled, so a buffer reused across frames stops
    /// allocating once it has grown to the sample count.
    pub fn render_frame(&mut self, t: f64, w: f64, h: f64, beat: bool, out: &mut Vec<(f64, f64)>) {
        self.frame(t, w, h);
        if beat {
            self.beat(t, w, h);
        }
        out.clear();
        for i in 0..self.samples {
            out.push(self.point(i));
        }
    }

    /// Current sample count, always within the configured range.
    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// How many times a script has been lexed and parsed.
    pub fn compile_count(&self) -> u64 {
        self.compile_count
    }

    /// Set a variable scripts can read, e.g. an audio feature.
    pub fn set_var(&mut self, name: &str, value: f64) {
        self.env.set(name, value);
    }

    pub fn var(&self, name: &str) -> Option<f64> {
        self.env.contains(name).then(|| self.env.get(name, 0.0))
    }

    pub fn program(&self, phase: Phase) -> &Program {
        &self.scripts[phase.index()].program
    }

    pub fn diagnostics(&self) -> &DiagnosticLog {
        &self.log
    }

    pub fn config(&self) -> &ScopeConfig {
        &self.config
    }

    pub fn local_buffer(&self) -> &SparseBuffer {
        self.env.local()
    }

    pub fn global_buffer(&self) -> &GlobalBuffer {
        self.env.global()
    }

    fn seed(&mut self, t: f64, w: f64, h: f64, beat: bool) {
        let env = &mut self.env;
        env.set("t", t);
        env.set("time", t);
        env.set("w", w);
        env.set("h", h);
        env.set("n", self.samples as f64);
        env.set("pi", std::f64::consts::PI);
        env.set("beat", if beat { 1.0 } else { 0.0 });
        env.set("frame", self.frame_index as f64);
    }

    fn run(&mut self, phase: Phase) {
        eval::run(&self.scripts[phase.index()].program, &mut self.env);
    }

    fn samples_from_n(&self) -> usize {
        // `as` saturates: NaN and negatives become 0, huge values usize::MAX.
        let n = self.env.get("n", self.samples as f64);
        self.config.clamp_samples(n as usize)
    }

    fn resettle_samples(&mut self) {
        self.samples = self.samples_from_n();
        self.env.set("n", self.samples as f64);
    }
}

impl fmt::Debug for SuperscopeVm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuperscopeVm")
            .field("samples", &self.samples)
            .field("frame_index", &self.frame_index)
            .field("compile_count", &self.compile_count)
            .field("variables", &self.env.var_count())
            .finish()
    }
}

fn source_hash(source: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    source.hash(&mut hasher);
    hasher.finish()
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}
