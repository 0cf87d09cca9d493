//! Engine - the frame driver
//!
//! Each tick runs, in order: clock, lifecycle scheduler, render pass, input
//! latch reset. Ticks are requested from a [`FrameScheduler`] and carried
//! out by [`Engine::pump`] once the scheduler reports them due.

use std::time::{Duration, Instant};

use engine_core::{Input, LifecycleSystem, Scene, Time};
use engine_render::{RenderOutput, SceneRenderer, Surface};
use engine_ui::UiDocument;

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::scheduler::{FrameHandle, FrameScheduler, IntervalScheduler, RefreshScheduler};

/// What the host environment can offer the engine
pub struct HostFacilities {
    pub scheduler: Option<Box<dyn FrameScheduler>>,
    /// Whether the host delivers keyboard input
    pub input: bool,
}

impl HostFacilities {
    /// A window with a refresh-aligned repaint loop and keyboard input
    pub fn windowed() -> Self {
        Self {
            scheduler: Some(Box::new(RefreshScheduler::new())),
            input: true,
        }
    }

    /// Nothing: fallback timer and inert input
    pub fn headless() -> Self {
        Self {
            scheduler: None,
            input: false,
        }
    }
}

impl Default for HostFacilities {
    fn default() -> Self {
        Self::headless()
    }
}

pub struct Engine<S: Surface> {
    config: EngineConfig,
    scene: Scene,
    surface: S,
    renderer: SceneRenderer,
    lifecycle: LifecycleSystem,
    scheduler: Box<dyn FrameScheduler>,
    pending: Option<FrameHandle>,
    running: bool,
    last_frame: Option<Instant>,
    last_drawn: usize,
}

impl<S: Surface> Engine<S> {
    /// Build an engine drawing onto `surface`.
    ///
    /// Fails when the surface cannot hand out a 2D drawing context. Missing
    /// host facilities only degrade the engine.
    pub fn new(mut surface: S, config: EngineConfig, host: HostFacilities) -> Result<Self> {
        if surface.context_2d().is_none() {
            return Err(EngineError::NoDrawingContext {
                width: surface.width(),
                height: surface.height(),
            });
        }

        let scheduler = match host.scheduler {
            Some(scheduler) => scheduler,
            None => {
                log::warn!(
                    "host offers no frame scheduler, falling back to a {:?} interval timer",
                    config.fallback_interval
                );
                Box::new(IntervalScheduler::new(config.fallback_interval))
            }
        };
        let input = if host.input {
            Input::new()
        } else {
            log::warn!("host offers no input source, input polling is inert");
            Input::inert()
        };

        let mut scene = Scene::new(config.scene_name.clone());
        scene.resources_mut().insert(Time::default());
        scene.resources_mut().insert(input);
        scene.resources_mut().insert(UiDocument::new());

        log::debug!(
            "engine ready: scene {:?}, {}x{} surface, {} scheduler",
            scene.name(),
            surface.width(),
            surface.height(),
            scheduler.name()
        );

        Ok(Self {
            renderer: SceneRenderer::new(config.render_config()),
            config,
            scene,
            surface,
            lifecycle: LifecycleSystem::new(),
            scheduler,
            pending: None,
            running: false,
            last_frame: None,
            last_drawn: 0,
        })
    }

    /// Begin requesting frames. Calling it while running does nothing.
    pub fn start(&mut self, now: Instant) {
        if self.running {
            return;
        }
        self.running = true;
        self.last_frame = None;
        self.pending = Some(self.scheduler.request_frame(now));
        log::debug!("engine started");
    }

    /// Cancel the pending frame. Calling it while stopped does nothing.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.running = false;
        log::debug!("engine stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Run the pending frame if the scheduler says it is due.
    ///
    /// Returns true when a tick ran. A new frame is requested after each tick.
    pub fn pump(&mut self, now: Instant) -> bool {
        if !self.running {
            return false;
        }
        let Some(handle) = self.pending else {
            return false;
        };
        if !self.scheduler.is_due(handle, now) {
            return false;
        }
        self.pending = None;

        let delta = self
            .last_frame
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last_frame = Some(now);
        self.step(delta);

        self.pending = Some(self.scheduler.request_frame(now));
        true
    }

    /// Run exactly one tick with the given frame delta
    pub fn step(&mut self, delta: Duration) -> RenderOutput {
        if let Some(time) = self.scene.resources_mut().get_mut::<Time>() {
            time.advance(delta);
        }

        self.lifecycle.update(&mut self.scene);

        let output = self.renderer.render(&self.scene, &mut self.surface);
        self.last_drawn = output.drawn();

        if let Some(input) = self.scene.resources_mut().get_mut::<Input>() {
            input.end_frame();
        }
        output
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn time(&self) -> Time {
        self.scene.resources().get::<Time>().copied().unwrap_or_default()
    }

    pub fn input(&self) -> Option<&Input> {
        self.scene.resources().get::<Input>()
    }

    pub fn input_mut(&mut self) -> Option<&mut Input> {
        self.scene.resources_mut().get_mut::<Input>()
    }

    pub fn document(&self) -> Option<&UiDocument> {
        self.scene.resources().get::<UiDocument>()
    }

    pub fn document_mut(&mut self) -> Option<&mut UiDocument> {
        self.scene.resources_mut().get_mut::<UiDocument>()
    }

    pub fn scheduler_name(&self) -> &'static str {
        self.scheduler.name()
    }

    /// Renderers drawn by the last tick
    pub fn last_drawn(&self) -> usize {
        self.last_drawn
    }
}
