//! In-memory model of the editor's screens, driven through the same
//! gesture interface as a real device.

#![allow(dead_code)]

use async_trait::async_trait;
use device::{Bounds, DeviceDriver, DeviceError, UiElement};
use engine::{Engine, EngineConfig, UiIds};
use operations::{EffectCatalog, Orchestrator, TransitionCatalog};
use parking_lot::Mutex;
use std::sync::Arc;
use timeline::format_readout_time;

pub const PX_PER_SEC: f64 = 60.0;
pub const ANCHOR_X: i32 = 540;
pub const TRACK_Y: i32 = 1460;
const TOOLBAR_Y: i32 = 2130;
const CATEGORY_Y: i32 = 1730;
const GRID_Y: i32 = 1900;
const STRIP_TOP: i32 = 1600;
const BAR_TOP: i32 = 1300;
const BAR_BOTTOM: i32 = 1360;

const TOOLS: [&str; 8] = [
    "CANVAS", "Trim", "Split", "Duration", "Speed", "Effect", "Filter", "Volume",
];
const TOOL_WINDOW: usize = 4;
const CATEGORY_WINDOW: usize = 4;
const GRID_WINDOW: usize = 3;
const STRIP_PAGE: usize = 5;
const TRANSITION_COUNT: usize = 13;
const TRANSITION_SECS: f64 = 1.0;
const EFFECT_DEFAULT_SECS: f64 = 3.0;

const CATEGORIES: &[(&str, &[&str])] = &[
    ("Basic", &["Slow Zoom", "Zoom Out", "Tremble", "Thrill", "Roll"]),
    ("Glitch", &["Glitch", "Noise", "RGB"]),
    ("Vibrate", &["Strobe", "Flash", "Flow", "Flicker", "Flip", "Leap"]),
    ("Shake", &["Node", "Flutter", "Bass", "Shake", "Cam Shake"]),
    ("Fade", &["White", "Black", "Mosiac"]),
    ("Film", &["Focus", "Zoom", "Darken"]),
    ("Retro", &["REC", "VHS"]),
    ("Blur", &["Circle", "Diamond"]),
    ("Analog", &["Date", "Shorts", "Split"]),
    ("Split", &["Two", "Four", "Nine"]),
    ("Glass", &["Shatter", "Shard"]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Main,
    Duration,
    DurationDialog,
    Transitions { junction: usize },
    Effects,
    EffectPicker,
    Gallery,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub name: String,
    pub start: f64,
    pub length: f64,
}

impl Bar {
    pub fn end(&self) -> f64 {
        self.start + self.length
    }
}

#[derive(Debug, Clone)]
enum Action {
    Tool(usize),
    DurationEdit,
    DurationOk,
    Apply,
    AddEffect,
    Category(usize),
    Effect(String),
    Thumbnail(usize),
    TransitionApply,
    TransitionApplyAll,
    ApplyAllConfirm,
    ClipEnd,
    Tile(usize),
    GalleryConfirm,
}

#[derive(Debug)]
pub struct EditorState {
    pub screen: Screen,
    pub time: f64,
    pub durations: Vec<f64>,
    pub selected_clip: Option<usize>,
    pub picked_transition: Option<usize>,
    pub bars: Vec<Bar>,
    pub selected_tiles: Vec<usize>,
    pub typed: Vec<String>,
    pub calls: usize,
    toolbar_offset: usize,
    menu_offset: usize,
    grid_offset: usize,
    category: usize,
    picked_effect: Option<String>,
    strip_page: usize,
    confirm_all: bool,
    handle_bar: Option<usize>,
    gallery_tiles: usize,
}

impl EditorState {
    fn total(&self) -> f64 {
        self.durations.iter().sum()
    }

    fn clip_at(&self, t: f64) -> Option<usize> {
        let mut start = 0.0;
        for (i, d) in self.durations.iter().enumerate() {
            if t >= start && t < start + d {
                return Some(i + 1);
            }
            start += d;
        }
        None
    }

    fn clip_end(&self, clip: usize) -> f64 {
        self.durations[..clip].iter().sum()
    }

    fn bar_bounds(&self, bar: &Bar) -> Bounds {
        let x1 = ANCHOR_X + ((bar.start - self.time) * PX_PER_SEC) as i32;
        let x2 = ANCHOR_X + ((bar.end() - self.time) * PX_PER_SEC) as i32;
        Bounds::new(x1, BAR_TOP, x2, BAR_BOTTOM)
    }

    fn handle_hit(&self, x: i32, y: i32) -> Option<usize> {
        if !(BAR_TOP..BAR_BOTTOM).contains(&y) {
            return None;
        }
        self.bars.iter().position(|bar| {
            let b = self.bar_bounds(bar);
            x > b.x2 && x <= b.x2 + 20
        })
    }

    fn apply_transition(&mut self, junction: usize) {
        self.durations[junction - 1] -= TRANSITION_SECS / 2.0;
        self.durations[junction] -= TRANSITION_SECS / 2.0;
    }
}

#[derive(Default)]
struct Frame {
    elements: Vec<UiElement>,
    actions: Vec<Option<Action>>,
}

impl Frame {
    fn push(&mut self, id: Option<&str>, text: Option<&str>, bounds: Bounds, action: Option<Action>) {
        self.elements.push(UiElement {
            index: self.elements.len(),
            resource_id: id.map(String::from),
            text: text.map(String::from),
            bounds,
        });
        self.actions.push(action);
    }
}

pub struct EditorSim {
    ids: UiIds,
    state: Mutex<EditorState>,
}

impl EditorSim {
    pub fn new(clips: usize) -> Self {
        Self {
            ids: UiIds::default(),
            state: Mutex::new(EditorState {
                screen: Screen::Main,
                time: 0.0,
                durations: vec![5.0; clips],
                selected_clip: None,
                picked_transition: None,
                bars: Vec::new(),
                selected_tiles: Vec::new(),
                typed: Vec::new(),
                calls: 0,
                toolbar_offset: 0,
                menu_offset: 0,
                grid_offset: 0,
                category: 0,
                picked_effect: None,
                strip_page: 0,
                confirm_all: false,
                handle_bar: None,
                gallery_tiles: 0,
            }),
        }
    }

    /// Media picker showing `tiles` images after the camera tile.
    pub fn gallery(tiles: usize) -> Self {
        let sim = Self::new(0);
        {
            let mut state = sim.state.lock();
            state.screen = Screen::Gallery;
            state.gallery_tiles = tiles;
        }
        sim
    }

    pub fn state(&self) -> parking_lot::MutexGuard<'_, EditorState> {
        self.state.lock()
    }

    pub fn calls(&self) -> usize {
        self.state.lock().calls
    }

    fn render(&self, s: &EditorState) -> Frame {
        let ids = &self.ids;
        let mut f = Frame::default();

        if s.screen == Screen::Gallery {
            f.push(None, Some("Select media"), Bounds::new(0, 0, 1080, 150), None);
            f.push(Some(ids.gallery.as_str()), None, Bounds::new(0, 200, 1080, 2000), None);
            f.push(None, None, Bounds::new(0, 200, 360, 560), None);
            for i in 0..s.gallery_tiles {
                let slot = i as i32 + 1;
                let (x, y) = ((slot % 3) * 360, 200 + (slot / 3) * 360);
                f.push(None, None, Bounds::new(x, y, x + 360, y + 360), Some(Action::Tile(i)));
            }
            f.push(
                Some(ids.gallery_confirm.as_str()),
                Some("Next"),
                Bounds::new(880, 2050, 1060, 2150),
                Some(Action::GalleryConfirm),
            );
            return f;
        }

        f.push(
            Some(ids.time_readout.as_str()),
            Some(format_readout_time(s.time).as_str()),
            Bounds::new(40, 900, 200, 960),
            None,
        );
        f.push(
            Some(ids.total_duration.as_str()),
            Some(format_readout_time(s.total()).as_str()),
            Bounds::new(880, 900, 1040, 960),
            None,
        );
        f.push(Some(ids.reference_segment.as_str()), None, Bounds::new(0, 1400, 540, 1520), None);
        for i in 0..4 {
            let x = 540 + i * 100;
            f.push(Some(ids.reference_segment.as_str()), None, Bounds::new(x, 1400, x + 100, 1520), None);
        }

        match s.screen {
            Screen::Main => {
                for (slot, i) in (s.toolbar_offset..TOOLS.len()).take(TOOL_WINDOW).enumerate() {
                    let x = slot as i32 * 270;
                    f.push(
                        Some(ids.toolbar_title.as_str()),
                        Some(TOOLS[i]),
                        Bounds::new(x, 2100, x + 270, 2160),
                        Some(Action::Tool(i)),
                    );
                }
            }
            Screen::Duration => {
                f.push(Some(ids.duration_edit.as_str()), None, Bounds::new(40, 1900, 200, 1980), Some(Action::DurationEdit));
                f.push(Some(ids.apply.as_str()), None, Bounds::new(880, 1900, 1040, 1980), Some(Action::Apply));
            }
            Screen::DurationDialog => {
                f.push(Some(ids.duration_input.as_str()), Some("5.0"), Bounds::new(200, 800, 880, 900), None);
                f.push(Some(ids.duration_ok.as_str()), Some("OK"), Bounds::new(700, 950, 880, 1030), Some(Action::DurationOk));
            }
            Screen::Effects => {
                for bar in &s.bars {
                    let b = s.bar_bounds(bar);
                    f.push(None, None, b, None);
                    f.push(None, None, b, None);
                    f.push(
                        None,
                        Some(bar.name.to_uppercase().as_str()),
                        Bounds::new(b.x1 + 10, b.y1 + 10, b.x1 + 100, b.y2 - 10),
                        None,
                    );
                }
                if s.handle_bar.is_some() {
                    f.push(
                        Some(ids.effect_clip_end.as_str()),
                        Some("To clip end"),
                        Bounds::new(400, 1200, 680, 1260),
                        Some(Action::ClipEnd),
                    );
                }
                f.push(Some(ids.add_effect.as_str()), None, Bounds::new(40, 1900, 200, 1980), Some(Action::AddEffect));
                f.push(Some(ids.apply.as_str()), None, Bounds::new(880, 1900, 1040, 1980), Some(Action::Apply));
            }
            Screen::EffectPicker => {
                for (slot, i) in (s.menu_offset..CATEGORIES.len())
                    .take(CATEGORY_WINDOW)
                    .enumerate()
                {
                    let x = 20 + slot as i32 * 260;
                    f.push(
                        None,
                        Some(CATEGORIES[i].0),
                        Bounds::new(x, 1700, x + 240, 1760),
                        Some(Action::Category(i)),
                    );
                }
                let effects = CATEGORIES[s.category].1;
                for (slot, name) in effects.iter().skip(s.grid_offset).take(GRID_WINDOW).enumerate() {
                    let x = 20 + slot as i32 * 340;
                    f.push(
                        None,
                        Some(name.to_uppercase().as_str()),
                        Bounds::new(x, 1850, x + 300, 1950),
                        Some(Action::Effect(name.to_string())),
                    );
                }
                f.push(Some(ids.apply.as_str()), None, Bounds::new(880, 2000, 1040, 2080), Some(Action::Apply));
            }
            Screen::Transitions { .. } => {
                f.push(None, Some("BASIC"), Bounds::new(20, 1500, 140, 1540), None);
                f.push(None, None, Bounds::new(0, 1560, 1080, 1760), None);
                let first = s.strip_page * STRIP_PAGE;
                for (slot, ordinal) in (first..TRANSITION_COUNT).take(STRIP_PAGE).enumerate() {
                    let x = 20 + slot as i32 * 210;
                    f.push(
                        None,
                        None,
                        Bounds::new(x, STRIP_TOP, x + 190, STRIP_TOP + 120),
                        Some(Action::Thumbnail(ordinal)),
                    );
                }
                f.push(Some(ids.transition_apply_all.as_str()), Some("Apply to all"), Bounds::new(200, 1900, 520, 1980), Some(Action::TransitionApplyAll));
                f.push(Some(ids.transition_apply.as_str()), None, Bounds::new(700, 1900, 880, 1980), Some(Action::TransitionApply));
                if s.confirm_all {
                    f.push(Some(ids.apply_all_confirm.as_str()), Some("Apply to all clips"), Bounds::new(300, 1000, 780, 1100), Some(Action::ApplyAllConfirm));
                }
            }
            Screen::Gallery => {}
        }
        f
    }

    fn tap_track(s: &mut EditorState, x: i32, y: i32) {
        let t = s.time + (x - ANCHOR_X) as f64 / PX_PER_SEC;
        if y >= 1500 {
            let mut junction_time = 0.0;
            for j in 1..s.durations.len() {
                junction_time += s.durations[j - 1];
                if (junction_time - t).abs() < 0.4 {
                    s.screen = Screen::Transitions { junction: j };
                    s.strip_page = 0;
                    s.picked_transition = None;
                    s.confirm_all = false;
                    return;
                }
            }
        } else {
            s.selected_clip = s.clip_at(t);
        }
    }

    fn act(s: &mut EditorState, action: Action) {
        match action {
            Action::Tool(i) => match (TOOLS[i], s.selected_clip) {
                ("Duration", Some(_)) => s.screen = Screen::Duration,
                ("Effect", Some(_)) => {
                    s.screen = Screen::Effects;
                    s.handle_bar = None;
                }
                _ => {}
            },
            Action::DurationEdit => s.screen = Screen::DurationDialog,
            Action::DurationOk => {
                let value = s.typed.last().and_then(|t| t.parse::<f64>().ok());
                if let (Some(clip), Some(value)) = (s.selected_clip, value) {
                    s.durations[clip - 1] = value;
                }
                s.screen = Screen::Duration;
            }
            Action::Apply => match s.screen {
                Screen::Duration | Screen::Effects => {
                    s.screen = Screen::Main;
                    s.selected_clip = None;
                }
                Screen::EffectPicker => {
                    if let Some(name) = s.picked_effect.take() {
                        let start = s.time;
                        s.bars.push(Bar {
                            name,
                            start,
                            length: EFFECT_DEFAULT_SECS,
                        });
                        s.screen = Screen::Effects;
                        s.handle_bar = None;
                    }
                }
                _ => {}
            },
            Action::AddEffect => {
                s.screen = Screen::EffectPicker;
                s.menu_offset = 0;
                s.grid_offset = 0;
                s.category = 0;
                s.picked_effect = None;
            }
            Action::Category(i) => {
                s.category = i;
                s.grid_offset = 0;
            }
            Action::Effect(name) => s.picked_effect = Some(name),
            Action::Thumbnail(ordinal) => s.picked_transition = Some(ordinal),
            Action::TransitionApply => {
                if let (Screen::Transitions { junction }, Some(_)) = (s.screen, s.picked_transition) {
                    s.apply_transition(junction);
                    s.screen = Screen::Main;
                }
            }
            Action::TransitionApplyAll => s.confirm_all = true,
            Action::ApplyAllConfirm => {
                // Only the cut the menu was opened on is charged.
                if let (Screen::Transitions { junction }, Some(_)) = (s.screen, s.picked_transition) {
                    s.apply_transition(junction);
                    s.screen = Screen::Main;
                }
            }
            Action::ClipEnd => {
                if let Some(h) = s.handle_bar.take() {
                    let start = s.bars[h].start;
                    if let Some(clip) = s.clip_at(start + 1e-6) {
                        s.bars[h].length = s.clip_end(clip) - start;
                    }
                }
            }
            Action::Tile(i) => s.selected_tiles.push(i),
            Action::GalleryConfirm => s.screen = Screen::Main,
        }
    }
}

#[async_trait]
impl DeviceDriver for EditorSim {
    async fn snapshot(&self) -> Result<Vec<UiElement>, DeviceError> {
        let mut s = self.state.lock();
        s.calls += 1;
        Ok(self.render(&s).elements)
    }

    async fn tap(&self, x: i32, y: i32) -> Result<(), DeviceError> {
        let mut s = self.state.lock();
        s.calls += 1;
        if s.screen == Screen::Main && (1400..=1520).contains(&y) {
            Self::tap_track(&mut s, x, y);
            return Ok(());
        }
        if s.screen == Screen::Effects {
            if let Some(h) = s.handle_hit(x, y) {
                s.handle_bar = Some(h);
                return Ok(());
            }
        }
        let frame = self.render(&s);
        let hit = frame
            .elements
            .iter()
            .zip(frame.actions)
            .rev()
            .find_map(|(el, action)| action.filter(|_| el.bounds.contains(x, y)));
        if let Some(action) = hit {
            Self::act(&mut s, action);
        }
        Ok(())
    }

    async fn swipe(&self, x1: i32, y1: i32, x2: i32, _y2: i32, _duration_ms: u32) -> Result<(), DeviceError> {
        let mut s = self.state.lock();
        s.calls += 1;
        let forward = x1 > x2;
        if s.screen == Screen::Effects {
            if let Some(h) = s.handle_hit(x1, y1) {
                s.bars[h].length += (x2 - x1) as f64 / PX_PER_SEC;
                return Ok(());
            }
        }
        match (s.screen, y1) {
            (_, TRACK_Y) => {
                let total = s.total();
                s.time = (s.time + (x1 - x2) as f64 / PX_PER_SEC).clamp(0.0, total);
            }
            (Screen::Main, TOOLBAR_Y) => {
                let max = TOOLS.len() - TOOL_WINDOW;
                s.toolbar_offset = if forward {
                    (s.toolbar_offset + 2).min(max)
                } else {
                    s.toolbar_offset.saturating_sub(2)
                };
            }
            (Screen::EffectPicker, CATEGORY_Y) if forward => {
                s.menu_offset = (s.menu_offset + 3).min(CATEGORIES.len() - CATEGORY_WINDOW);
            }
            (Screen::EffectPicker, GRID_Y) if forward => {
                let count = CATEGORIES[s.category].1.len();
                s.grid_offset = (s.grid_offset + 2).min(count.saturating_sub(GRID_WINDOW));
            }
            (Screen::Transitions { .. }, y) if forward && y == STRIP_TOP + 50 => {
                let last = (TRANSITION_COUNT - 1) / STRIP_PAGE;
                s.strip_page = (s.strip_page + 1).min(last);
            }
            _ => {}
        }
        Ok(())
    }

    async fn type_text(&self, text: &str, target_index: usize) -> Result<(), DeviceError> {
        let mut s = self.state.lock();
        s.calls += 1;
        let frame = self.render(&s);
        let is_input = frame
            .elements
            .get(target_index)
            .is_some_and(|el| el.has_id(&self.ids.duration_input));
        if !is_input {
            return Err(DeviceError::UnknownElement(target_index));
        }
        s.typed.push(text.to_string());
        Ok(())
    }
}

pub fn orchestrator(sim: Arc<EditorSim>) -> Orchestrator {
    let engine = Engine::new(sim, EngineConfig::default().without_delays());
    Orchestrator::new(engine, EffectCatalog::default(), TransitionCatalog::default())
}
