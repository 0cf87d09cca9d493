use std::time::{Duration, Instant};

use engine_core::{Color, Component, Context, DrawContext2D, MonoBehaviour};
use engine_render::{PixelSurface, RectRenderer, Surface};
use engine_ui::{Button, Canvas, UiEvent};
use glam::{Vec2, Vec3};
use scenekit::{
    Engine, EngineConfig, EngineError, FrameHandle, FrameScheduler, HostFacilities, RefreshScheduler,
};

/// A surface that cannot draw
struct BlindSurface;

impl Surface for BlindSurface {
    fn width(&self) -> u32 {
        64
    }

    fn height(&self) -> u32 {
        48
    }

    fn context_2d(&mut self) -> Option<&mut dyn DrawContext2D> {
        None
    }
}

#[derive(Debug, Default)]
struct LifecycleLog(Vec<&'static str>);

/// Appends every hook it receives to the scene's `LifecycleLog`
struct Recorder;

impl Recorder {
    fn push(ctx: &mut Context<'_>, hook: &'static str) {
        if let Some(log) = ctx.resources_mut().get_mut::<LifecycleLog>() {
            log.0.push(hook);
        }
    }
}

impl Component for Recorder {
    fn as_behaviour_mut(&mut self) -> Option<&mut dyn MonoBehaviour> {
        Some(self)
    }
}

impl MonoBehaviour for Recorder {
    fn awake(&mut self, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        Self::push(ctx, "Awake");
        Ok(())
    }

    fn on_enable(&mut self, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        Self::push(ctx, "OnEnable");
        Ok(())
    }

    fn start(&mut self, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        Self::push(ctx, "Start");
        Ok(())
    }

    fn update(&mut self, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        Self::push(ctx, "Update");
        Ok(())
    }

    fn on_disable(&mut self, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        Self::push(ctx, "OnDisable");
        Ok(())
    }
}

/// Refresh scheduler under another name, to tell it apart from the built-ins
#[derive(Default)]
struct ManualScheduler(RefreshScheduler);

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self, now: Instant) -> FrameHandle {
        self.0.request_frame(now)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.0.cancel_frame(handle);
    }

    fn is_due(&self, handle: FrameHandle, now: Instant) -> bool {
        self.0.is_due(handle, now)
    }

    fn name(&self) -> &'static str {
        "manual"
    }
}

fn headless_engine() -> Engine<PixelSurface> {
    match Engine::new(
        PixelSurface::new(64, 48),
        EngineConfig::default(),
        HostFacilities::headless(),
    ) {
        Ok(engine) => engine,
        Err(err) => panic!("engine construction failed: {err}"),
    }
}

const FRAME: Duration = Duration::from_millis(16);

#[test]
fn test_surface_without_context_is_fatal() {
    let result = Engine::new(BlindSurface, EngineConfig::default(), HostFacilities::windowed());
    match result {
        Err(err) => assert_eq!(err, EngineError::NoDrawingContext { width: 64, height: 48 }),
        Ok(_) => panic!("engine accepted a surface without a drawing context"),
    }
}

#[test]
fn test_missing_host_facilities_degrade() {
    let mut engine = headless_engine();
    assert_eq!(engine.scheduler_name(), "interval");
    let input = engine.input_mut().unwrap();
    assert!(input.is_inert());
    input.press("Space");
    assert!(!input.key_down("Space"));
    assert!(engine.document().is_some());
}

#[test]
fn test_windowed_host_keeps_its_scheduler() {
    let engine = Engine::new(
        PixelSurface::new(8, 8),
        EngineConfig::default(),
        HostFacilities::windowed(),
    )
    .ok()
    .unwrap();
    assert_eq!(engine.scheduler_name(), "refresh");
    assert!(!engine.input().unwrap().is_inert());
}

#[test]
fn test_pump_waits_for_the_fallback_interval() {
    let mut engine = headless_engine();
    let t0 = Instant::now();
    assert!(!engine.pump(t0));

    engine.start(t0);
    assert!(engine.is_running());
    assert!(!engine.pump(t0 + Duration::from_millis(5)));
    assert!(engine.pump(t0 + FRAME));
    assert_eq!(engine.time().frame_count, 1);
    assert!(!engine.pump(t0 + FRAME + Duration::from_millis(4)));
    assert!(engine.pump(t0 + FRAME * 2));
    assert_eq!(engine.time().frame_count, 2);
    assert!((engine.time().delta - FRAME.as_secs_f32()).abs() < 1e-6);
}

#[test]
fn test_start_and_stop_are_idempotent() {
    let host = HostFacilities {
        scheduler: Some(Box::new(ManualScheduler::default())),
        input: true,
    };
    let mut engine = Engine::new(PixelSurface::new(8, 8), EngineConfig::default(), host)
        .ok()
        .unwrap();
    assert_eq!(engine.scheduler_name(), "manual");
    let now = Instant::now();

    engine.start(now);
    engine.start(now);
    assert!(engine.pump(now));
    assert_eq!(engine.time().frame_count, 1);

    engine.stop();
    engine.stop();
    assert!(!engine.is_running());
    assert!(!engine.pump(now + FRAME));
    assert_eq!(engine.time().frame_count, 1);

    engine.start(now + FRAME);
    assert!(engine.pump(now + FRAME));
    assert_eq!(engine.time().frame_count, 2);
}

#[test]
fn test_step_clears_input_latches() {
    let mut engine = Engine::new(
        PixelSurface::new(8, 8),
        EngineConfig::default(),
        HostFacilities::windowed(),
    )
    .ok()
    .unwrap();
    engine.input_mut().unwrap().press("Space");
    assert!(engine.input().unwrap().key_down("Space"));

    engine.step(FRAME);
    let input = engine.input().unwrap();
    assert!(!input.key_down("Space"));
    assert!(input.key_held("Space"));
}

#[test]
fn test_tick_draws_renderers_over_the_clear_color() {
    let mut engine = headless_engine();
    let red = Color::rgb(200, 30, 30);
    let scene = engine.scene_mut();
    let quad = scene.create_game_object("Quad");
    scene.set_local_position(quad, Vec3::new(32.0, 24.0, 0.0)).unwrap();
    scene
        .add_component(quad, RectRenderer::new(Vec2::splat(8.0), red))
        .unwrap();
    scene.add_game_object(quad).unwrap();

    let output = engine.step(FRAME);
    assert_eq!(output.drawn(), 1);
    assert_eq!(engine.last_drawn(), 1);
    assert_eq!(engine.surface().pixel(32, 24), Some(red));
    assert_eq!(engine.surface().pixel(0, 0), Some(engine.config().clear_color));
}

#[test]
fn test_activation_scenario_through_the_engine() {
    let mut engine = headless_engine();
    let scene = engine.scene_mut();
    scene.resources_mut().insert(LifecycleLog::default());
    let root = scene.create_game_object("Root");
    let child = scene.create_game_object("Child");
    scene.set_parent(child, Some(root)).unwrap();
    scene.add_component(child, Recorder).unwrap();
    scene.add_game_object(root).unwrap();

    for _ in 0..3 {
        engine.step(FRAME);
    }
    let log = |engine: &Engine<PixelSurface>| {
        engine
            .scene()
            .resources()
            .get::<LifecycleLog>()
            .map(|log| log.0.clone())
            .unwrap_or_default()
    };
    assert_eq!(
        log(&engine),
        ["Awake", "OnEnable", "Start", "Update", "Update", "Update"]
    );

    engine.scene_mut().set_active(root, false).unwrap();
    engine.step(FRAME);
    engine.step(FRAME);
    assert_eq!(log(&engine)[6..], ["OnDisable"]);

    engine.scene_mut().set_active(root, true).unwrap();
    engine.step(FRAME);
    assert_eq!(log(&engine)[7..], ["OnEnable", "Update"]);
}

#[test]
fn test_ui_click_reaches_listener_on_next_tick() {
    let mut engine = headless_engine();
    let scene = engine.scene_mut();
    let canvas = scene.create_game_object("Canvas");
    scene.add_component(canvas, Canvas::new()).unwrap();
    let go = scene.create_game_object("Button");
    scene.set_parent(go, Some(canvas)).unwrap();
    let button = scene.add_component(go, Button::new("Ping")).unwrap();
    scene.add_game_object(canvas).unwrap();

    engine.step(FRAME);
    let node = engine
        .scene()
        .component(button)
        .and_then(|button| button.element.node())
        .unwrap();
    let document = engine.document_mut().unwrap();
    assert!(document.dispatch(node, UiEvent::Click));
    assert_eq!(document.pending_events(node), 1);

    engine.step(FRAME);
    assert_eq!(engine.scene().component(button).unwrap().clicks(), 1);
    assert_eq!(engine.document().unwrap().pending_events(node), 0);
}
