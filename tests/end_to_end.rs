//! End-to-end tests — scripts loaded into a VM and driven like a render loop.

use assert_approx_eq::assert_approx_eq;
use superscope::{GlobalBuffer, Phase, ScopeConfig, ScriptSet, SuperscopeVm};

fn vm() -> SuperscopeVm {
    SuperscopeVm::new(ScopeConfig::default(), GlobalBuffer::new())
}

#[test]
fn four_point_scope() {
    let mut vm = vm();
    vm.load_scripts(&ScriptSet::new("n=4", "", "", "x=i/n; y=sin(i)"));
    vm.init(0.0, 100.0, 100.0, None);
    // The script asks for 4, but the configured floor is 16.
    assert_eq!(vm.samples(), 16);

    let config = ScopeConfig {
        min_samples: 1,
        ..ScopeConfig::default()
    };
    let mut vm = SuperscopeVm::new(config, GlobalBuffer::new());
    vm.load_scripts(&ScriptSet::new("n=4", "", "", "x=i/n; y=sin(i)"));
    vm.init(0.0, 100.0, 100.0, None);
    assert_eq!(vm.samples(), 4);

    let (x, _) = vm.point(0);
    assert_eq!(x, 0.0);
    let (x, y) = vm.point(2);
    assert_approx_eq!(x, 0.5);
    assert_approx_eq!(y, 2f64.sin());
}

#[test]
fn sample_count_clamped_after_every_phase() {
    let mut vm = vm();
    vm.load_scripts(&ScriptSet::new("n=1", "n=100000", "n=-5", ""));
    vm.init(0.0, 1.0, 1.0, None);
    assert_eq!(vm.samples(), 16);
    vm.frame(0.0, 1.0, 1.0);
    assert_eq!(vm.samples(), 8192);
    vm.beat(0.0, 1.0, 1.0);
    assert_eq!(vm.samples(), 16);
}

#[test]
fn beat_flag_reaches_scripts() {
    let mut vm = vm();
    vm.load_scripts(&ScriptSet::new("", "in_frame = beat", "in_beat = beat", "seen = beat"));
    vm.init(0.0, 1.0, 1.0, None);

    vm.beat(0.0, 1.0, 1.0);
    assert_eq!(vm.var("in_beat"), Some(1.0));
    vm.point(0);
    assert_eq!(vm.var("seen"), Some(1.0));

    vm.frame(0.1, 1.0, 1.0);
    assert_eq!(vm.var("in_frame"), Some(0.0));
    vm.point(0);
    assert_eq!(vm.var("seen"), Some(0.0));
}

#[test]
fn variables_ignore_case_across_phases() {
    let mut vm = vm();
    vm.load_scripts(&ScriptSet::new("Scale = 5", "", "", "X = SCALE; y = scale * 2"));
    vm.init(0.0, 1.0, 1.0, None);
    assert_eq!(vm.point(0), (5.0, 10.0));
}

#[test]
fn reloading_identical_text_keeps_behaviour() {
    let scripts = ScriptSet::new("", "", "", "x = i * 2");
    let mut vm = vm();
    vm.load_scripts(&scripts);
    vm.init(0.0, 1.0, 1.0, None);
    let before = vm.point(3);
    let compiles = vm.compile_count();

    assert_eq!(vm.load_scripts(&scripts.clone()), 0);
    assert_eq!(vm.compile_count(), compiles);
    assert_eq!(vm.point(3), before);
}

#[test]
fn swapping_one_phase_leaves_others() {
    let mut vm = vm();
    vm.load_sources("k = 3", "", "", "x = k");
    vm.init(0.0, 1.0, 1.0, None);
    assert_eq!(vm.point(0).0, 3.0);

    assert_eq!(vm.load_sources("k = 3", "", "", "x = k + 1"), 1);
    assert_eq!(vm.point(0).0, 4.0);
    assert_eq!(vm.program(Phase::Init).len(), 1);
}

#[test]
fn accumulators_persist_between_frames() {
    let mut vm = vm();
    vm.load_sources("count = 10", "count = count + 1", "", "");
    vm.init(0.0, 1.0, 1.0, None);
    for f in 0..5 {
        vm.frame(f as f64 / 30.0, 1.0, 1.0);
    }
    assert_eq!(vm.var("count"), Some(15.0));
    assert_eq!(vm.frame_index(), 5);
}

#[test]
fn bad_scripts_keep_rendering() {
    let mut vm = vm();
    vm.load_sources("n = (20", "q = 1 / 0 + nope(3) @", ") , =", "x = sin(; y = 1.2.3");
    vm.init(0.0, 1.0, 1.0, None);
    assert_eq!(vm.samples(), 20);

    let mut points = Vec::new();
    vm.render_frame(0.0, 1.0, 1.0, true, &mut points);
    assert_eq!(points.len(), 20);
    assert!(points.iter().all(|&(x, y)| x == 0.0 && y == 0.0));
    assert!(!vm.diagnostics().is_empty());
}

#[test]
fn host_features_are_visible_to_scripts() {
    let mut vm = vm();
    vm.load_sources("", "", "", "y = bass * 2");
    vm.init(0.0, 1.0, 1.0, None);
    vm.set_var("BASS", 0.25);
    assert_eq!(vm.point(0).1, 0.5);
}

#[test]
fn seeded_rand_is_reproducible() {
    let config = ScopeConfig {
        seed: 1234,
        ..ScopeConfig::default()
    };
    let run = || {
        let mut vm = SuperscopeVm::new(config.clone(), GlobalBuffer::new());
        vm.load_sources("", "", "", "x = rand(); y = rand(-1, 1)");
        vm.init(0.0, 1.0, 1.0, None);
        (0..8).map(|i| vm.point(i)).collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}
