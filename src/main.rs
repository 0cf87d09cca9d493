// src/main.rs
mod slot;

use std::time::Instant;

use anyhow::anyhow;
use eframe::{App, Frame, NativeOptions};
use env_logger::Env;
use glam::Vec2;

use scenekit::engine_render::PixelSurface;
use scenekit::engine_ui::{HierarchyPanel, InspectorPanel, UiPresenter, ViewportPanel};
use scenekit::{Engine, EngineConfig, HostFacilities};

const SURFACE_SIZE: (u32, u32) = (480, 270);

struct SlotApp {
    engine: Engine<PixelSurface>,
    presenter: UiPresenter,
    hierarchy: HierarchyPanel,
    inspector: InspectorPanel,
    viewport: ViewportPanel,
}

impl SlotApp {
    fn forward_keys(&mut self, ctx: &egui::Context) {
        // Keys typed into a text field belong to that field
        if ctx.wants_keyboard_input() {
            return;
        }
        let events = ctx.input(|i| i.events.clone());
        let Some(input) = self.engine.input_mut() else {
            return;
        };
        for event in events {
            if let egui::Event::Key {
                key,
                pressed,
                repeat: false,
                ..
            } = event
            {
                if pressed {
                    input.press(key.name());
                } else {
                    input.release(key.name());
                }
            }
        }
    }
}

impl App for SlotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        ctx.set_visuals(egui::Visuals::dark());
        self.forward_keys(ctx);
        self.engine.pump(Instant::now());

        egui::SidePanel::left("hierarchy_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                let width = ui.available_width();
                self.hierarchy.show(ui, self.engine.scene_mut(), width);
            });

        egui::SidePanel::right("inspector_panel")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                let selected = self.hierarchy.selected;
                self.inspector.show(ui, selected, self.engine.scene_mut());
            });

        egui::TopBottomPanel::bottom("game_ui_panel")
            .resizable(true)
            .default_height(320.0)
            .show(ctx, |ui| {
                if let Some(document) = self.engine.document_mut() {
                    self.presenter.show(ui, document);
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.viewport.show(ui, self.engine.surface());
        });

        ctx.request_repaint();
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let (width, height) = SURFACE_SIZE;
    let mut engine = Engine::new(
        PixelSurface::new(width, height),
        EngineConfig::default(),
        HostFacilities::windowed(),
    )?;
    let seed = rand::random::<u64>();
    slot::build_scene(
        engine.scene_mut(),
        Vec2::new(width as f32 / 2.0, height as f32 / 2.0),
        seed,
    )?;
    engine.start(Instant::now());
    log::info!("slot machine ready (seed {seed})");

    let app = SlotApp {
        engine,
        presenter: UiPresenter::new(),
        hierarchy: HierarchyPanel::new(),
        inspector: InspectorPanel::new(),
        viewport: ViewportPanel::new("Game"),
    };

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Scenekit Slots")
            .with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Scenekit Slots",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|err| anyhow!("{err}"))
}
