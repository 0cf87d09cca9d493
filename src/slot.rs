//! Slot demo - a three-reel machine built from GameObjects and UI components

use anyhow::Context as _;
use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use scenekit::engine_core::{
    Color, Component, ComponentHandle, Context, GameObject, Input, MonoBehaviour, Scene,
};
use scenekit::engine_render::RectRenderer;
use scenekit::engine_ui::{Button, Canvas, InputField, Panel, RectTransform, ScrollRect, Text};

pub const REEL_COUNT: usize = 3;

pub const SYMBOLS: [Color; 5] = [
    Color::rgb(231, 76, 60),
    Color::rgb(241, 196, 15),
    Color::rgb(46, 204, 113),
    Color::rgb(52, 152, 219),
    Color::rgb(155, 89, 182),
];

const HISTORY_LIMIT: usize = 12;

/// Winnings for one stop of the reels
pub fn payout(symbols: &[usize; REEL_COUNT], bet: i64) -> i64 {
    let [a, b, c] = *symbols;
    if a == b && b == c {
        bet * 10
    } else if a == b || b == c || a == c {
        bet * 2
    } else {
        0
    }
}

/// Shared game state, stored as a scene resource
#[derive(Debug)]
pub struct SlotState {
    pub credits: i64,
    pub bet: i64,
    pub message: String,
    generation: u64,
    spinning: bool,
    results: [Option<usize>; REEL_COUNT],
}

impl SlotState {
    pub fn new(credits: i64) -> Self {
        Self {
            credits,
            bet: 5,
            message: "Press Spin".to_string(),
            generation: 0,
            spinning: false,
            results: [None; REEL_COUNT],
        }
    }

    pub fn is_spinning(&self) -> bool {
        self.spinning
    }

    /// Spins requested so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Take the bet and start a spin. Returns false when one cannot start.
    pub fn request_spin(&mut self) -> bool {
        if self.spinning {
            return false;
        }
        if self.credits < self.bet {
            self.message = "Not enough credits".to_string();
            return false;
        }
        self.credits -= self.bet;
        self.generation += 1;
        self.spinning = true;
        self.results = [None; REEL_COUNT];
        self.message = "Spinning...".to_string();
        true
    }

    pub fn report_stop(&mut self, reel: usize, symbol: usize) {
        if let Some(slot) = self.results.get_mut(reel) {
            *slot = Some(symbol);
        }
    }

    /// Pay out once every reel reported; returns the stopped symbols and the win
    pub fn settle(&mut self) -> Option<([usize; REEL_COUNT], i64)> {
        if !self.spinning {
            return None;
        }
        let mut symbols = [0; REEL_COUNT];
        for (slot, result) in symbols.iter_mut().zip(self.results) {
            *slot = result?;
        }
        let win = payout(&symbols, self.bet);
        self.credits += win;
        self.spinning = false;
        self.message = if win > 0 {
            format!("You win {win}!")
        } else {
            "No luck".to_string()
        };
        Some((symbols, win))
    }
}

/// Cycles the colour of its reel while a spin is running
pub struct ReelSpinner {
    index: usize,
    generation: u64,
    remaining: f32,
    step_timer: f32,
    symbol: usize,
    target: usize,
    rng: StdRng,
}

impl ReelSpinner {
    const STEP: f32 = 0.07;

    pub fn new(index: usize, seed: u64) -> Self {
        Self {
            index,
            generation: 0,
            remaining: 0.0,
            step_timer: 0.0,
            symbol: index % SYMBOLS.len(),
            target: 0,
            rng: StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
        }
    }

    pub fn symbol(&self) -> usize {
        self.symbol
    }

    fn paint(&self, ctx: &mut Context<'_>) {
        if let Some(rect) = ctx.get_component_mut::<RectRenderer>() {
            rect.color = SYMBOLS[self.symbol];
        }
    }
}

impl Component for ReelSpinner {
    fn as_behaviour_mut(&mut self) -> Option<&mut dyn MonoBehaviour> {
        Some(self)
    }
}

impl MonoBehaviour for ReelSpinner {
    fn start(&mut self, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        self.paint(ctx);
        Ok(())
    }

    fn update(&mut self, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        let delta = ctx.time().delta;
        let Some(state) = ctx.resources().get::<SlotState>() else {
            return Ok(());
        };
        if state.is_spinning() && state.generation() != self.generation {
            self.generation = state.generation();
            self.remaining = 0.6 + 0.35 * self.index as f32;
            self.target = self.rng.gen_range(0..SYMBOLS.len());
        }
        if self.remaining <= 0.0 {
            return Ok(());
        }

        self.remaining -= delta;
        self.step_timer += delta;
        if self.step_timer >= Self::STEP {
            self.step_timer = 0.0;
            self.symbol = (self.symbol + 1) % SYMBOLS.len();
        }
        if self.remaining <= 0.0 {
            self.symbol = self.target;
            if let Some(state) = ctx.resources_mut().get_mut::<SlotState>() {
                state.report_stop(self.index, self.symbol);
            }
        }
        self.paint(ctx);
        Ok(())
    }
}

/// Handles of the UI pieces the machine keeps in sync
#[derive(Debug, Clone, Copy)]
pub struct SlotUi {
    pub spin_button: ComponentHandle<Button>,
    pub bet_field: ComponentHandle<InputField>,
    pub credits: ComponentHandle<Text>,
    pub status: ComponentHandle<Text>,
    pub history: GameObject,
}

/// Game controller: keyboard shortcut, settlement, history and labels
pub struct SlotMachine {
    ui: SlotUi,
    spins: u64,
}

impl SlotMachine {
    pub fn new(ui: SlotUi) -> Self {
        Self { ui, spins: 0 }
    }

    fn record(&mut self, ctx: &mut Context<'_>, symbols: [usize; REEL_COUNT], win: i64) -> anyhow::Result<()> {
        self.spins += 1;
        let line = format!("#{:<3} {:?} -> {win:+}", self.spins, symbols);
        let scene = ctx.scene_mut();
        let row = scene.create_game_object(format!("Spin {}", self.spins));
        scene.add_component(row, Text::new(line).with_font_size(13.0))?;
        scene.set_parent(row, Some(self.ui.history))?;

        let rows = scene.children(self.ui.history);
        if rows.len() > HISTORY_LIMIT {
            for old in &rows[..rows.len() - HISTORY_LIMIT] {
                scene.destroy(*old);
            }
        }
        Ok(())
    }
}

impl Component for SlotMachine {
    fn as_behaviour_mut(&mut self) -> Option<&mut dyn MonoBehaviour> {
        Some(self)
    }
}

impl MonoBehaviour for SlotMachine {
    fn update(&mut self, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        let shortcut = ctx
            .resources()
            .get::<Input>()
            .is_some_and(|input| input.key_down("Space"));
        let state = ctx
            .resources_mut()
            .get_mut::<SlotState>()
            .context("slot state resource missing")?;
        if shortcut {
            state.request_spin();
        }
        let settled = state.settle();
        let spinning = state.is_spinning();
        let message = state.message.clone();
        let credits = format!("Credits: {}  Bet: {}", state.credits, state.bet);

        if let Some((symbols, win)) = settled {
            log::info!("reels stopped on {symbols:?}, win {win}");
            self.record(ctx, symbols, win)?;
        }

        let scene = ctx.scene_mut();
        if let Some(button) = scene.component_mut(self.ui.spin_button) {
            button.element.interactable = !spinning;
        }
        if let Some(field) = scene.component_mut(self.ui.bet_field) {
            field.element.interactable = !spinning;
        }
        if let Some(status) = scene.component_mut(self.ui.status) {
            status.set_text(message);
        }
        if let Some(label) = scene.component_mut(self.ui.credits) {
            label.set_text(credits);
        }
        Ok(())
    }
}

fn spawn(scene: &mut Scene, name: &str, parent: Option<GameObject>) -> anyhow::Result<GameObject> {
    let game_object = scene.create_game_object(name);
    scene.set_parent(game_object, parent)?;
    Ok(game_object)
}

/// Build the demo scene and register it. The reels are centred on `center`.
pub fn build_scene(scene: &mut Scene, center: Vec2, seed: u64) -> anyhow::Result<SlotUi> {
    scene.resources_mut().insert(SlotState::new(100));

    // UI
    let canvas = spawn(scene, "Canvas", None)?;
    scene.add_component(canvas, Canvas::new())?;

    let header = spawn(scene, "Header", Some(canvas))?;
    scene.add_component(header, Panel::new().with_background(Color::rgb(40, 40, 48)))?;
    let title = spawn(scene, "Title", Some(header))?;
    scene.add_component(title, Text::new("Scenekit Slots").with_font_size(22.0))?;
    let credits_label = spawn(scene, "Credits", Some(header))?;
    let credits = scene.add_component(credits_label, Text::new(""))?;

    let controls = spawn(scene, "Controls", Some(canvas))?;
    scene.add_component(controls, Panel::new())?;
    let spin = spawn(scene, "Spin", Some(controls))?;
    scene.add_component(spin, RectTransform::new(Vec2::ZERO, Vec2::new(120.0, 0.0)))?;
    let mut button = Button::new("Spin").with_background(Color::rgb(192, 57, 43));
    button.on_click(|ctx| {
        let state = ctx
            .resources_mut()
            .get_mut::<SlotState>()
            .context("slot state resource missing")?;
        state.request_spin();
        Ok(())
    });
    let spin_button = scene.add_component(spin, button)?;

    let bet = spawn(scene, "Bet", Some(controls))?;
    let mut field = InputField::new("bet (1-100)");
    field.set_value("5");
    field.on_value_changed(|ctx, value| {
        let bet: i64 = value
            .trim()
            .parse()
            .with_context(|| format!("bet {value:?} is not a number"))?;
        let state = ctx
            .resources_mut()
            .get_mut::<SlotState>()
            .context("slot state resource missing")?;
        state.bet = bet.clamp(1, 100);
        Ok(())
    });
    let bet_field = scene.add_component(bet, field)?;

    let status_label = spawn(scene, "Status", Some(controls))?;
    let status = scene.add_component(status_label, Text::new("").with_color(Color::rgb(200, 200, 200)))?;

    let history = spawn(scene, "History", Some(canvas))?;
    scene.add_component(history, RectTransform::new(Vec2::ZERO, Vec2::new(0.0, 140.0)))?;
    let mut scroll = ScrollRect::new();
    scroll.element.background = Some(Color::rgb(30, 30, 34));
    scene.add_component(history, scroll)?;

    // Reels
    let reels = spawn(scene, "Reels", None)?;
    scene.set_local_position(reels, center.extend(0.0))?;
    for index in 0..REEL_COUNT {
        let reel = spawn(scene, &format!("Reel {}", index + 1), Some(reels))?;
        let offset = (index as f32 - 1.0) * 90.0;
        scene.set_local_position(reel, Vec3::new(offset, 0.0, 0.0))?;
        scene.add_component(reel, RectRenderer::new(Vec2::new(80.0, 120.0), SYMBOLS[0]))?;
        scene.add_component(reel, ReelSpinner::new(index, seed))?;
    }

    let ui = SlotUi {
        spin_button,
        bet_field,
        credits,
        status,
        history,
    };
    let machine = spawn(scene, "Slot Machine", None)?;
    scene.add_component(machine, SlotMachine::new(ui))?;

    scene.add_game_object(canvas)?;
    scene.add_game_object(reels)?;
    scene.add_game_object(machine)?;
    Ok(ui)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use scenekit::engine_render::PixelSurface;
    use scenekit::engine_ui::UiEvent;
    use scenekit::{Engine, EngineConfig, HostFacilities};

    #[test]
    fn test_payout_table() {
        assert_eq!(payout(&[1, 1, 1], 5), 50);
        assert_eq!(payout(&[1, 2, 1], 5), 10);
        assert_eq!(payout(&[0, 1, 2], 5), 0);
    }

    #[test]
    fn test_spin_needs_credits() {
        let mut state = SlotState::new(3);
        assert!(!state.request_spin());
        assert_eq!(state.message, "Not enough credits");
        state.bet = 3;
        assert!(state.request_spin());
        assert!(!state.request_spin());
        assert_eq!(state.settle(), None);
    }

    #[test]
    fn test_click_spins_and_settles() {
        let surface = PixelSurface::new(320, 200);
        let mut engine =
            Engine::new(surface, EngineConfig::default(), HostFacilities::headless()).unwrap();
        let ui = build_scene(engine.scene_mut(), Vec2::new(160.0, 100.0), 7).unwrap();
        engine.step(Duration::from_millis(16));

        let node = engine
            .scene()
            .component(ui.spin_button)
            .and_then(|button| button.element.node())
            .unwrap();
        assert!(engine.document_mut().unwrap().dispatch(node, UiEvent::Click));
        engine.step(Duration::from_millis(16));
        {
            let state = engine.scene().resources().get::<SlotState>().unwrap();
            assert!(state.is_spinning());
            assert_eq!(state.credits, 95);
        }

        for _ in 0..40 {
            engine.step(Duration::from_millis(50));
        }
        let state = engine.scene().resources().get::<SlotState>().unwrap();
        assert!(!state.is_spinning());
        assert_eq!(engine.scene().children(ui.history).len(), 1);
        assert_eq!(engine.last_drawn(), REEL_COUNT);
    }
}
