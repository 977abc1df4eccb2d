use std::fmt::Debug;

use meadow_common::Color;

/// Kind of widget bound to a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Control {
    /// Slider over `[min, max]`, snapping drags to `step`.
    Number { min: f64, max: f64, step: f64 },
    /// Colour picker.
    Color,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlValue {
    Number(f64),
    Color(Color),
}

/// A control bound to a key of the owner's choosing.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding<K> {
    pub key: K,
    pub label: String,
    pub control: Control,
}

/// A value edited through the panel this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelChange<K> {
    pub key: K,
    pub value: ControlValue,
}

/// Labelled group of controls.
#[derive(Debug, Clone)]
pub struct Folder<K> {
    pub name: String,
    pub open: bool,
    bindings: Vec<Binding<K>>,
}

impl<K> Folder<K> {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            open: false,
            bindings: Vec::new(),
        }
    }

    /// Expand the folder.
    pub fn open(&mut self) -> &mut Self {
        self.open = true;
        self
    }

    pub fn add_number(&mut self, key: K, label: &str, min: f64, max: f64, step: f64) -> &mut Self {
        self.bindings.push(Binding {
            key,
            label: label.to_string(),
            control: Control::Number { min, max, step },
        });
        self
    }

    pub fn add_color(&mut self, key: K, label: &str) -> &mut Self {
        self.bindings.push(Binding {
            key,
            label: label.to_string(),
            control: Control::Color,
        });
        self
    }

    pub fn bindings(&self) -> &[Binding<K>] {
        &self.bindings
    }
}

/// Placement of the panel on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelLayout {
    /// Top-left corner in logical points.
    pub position: [f32; 2],
    /// Fixed panels ignore dragging.
    pub fixed: bool,
    /// Draw above every other layer.
    pub foreground: bool,
    pub width: f32,
}

impl Default for PanelLayout {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0],
            fixed: true,
            foreground: true,
            width: 245.0,
        }
    }
}

/// Floating panel of folders holding number sliders and colour pickers.
///
/// The root starts collapsed; only its open/close toggle shows until expanded.
#[derive(Debug, Clone)]
pub struct DebugPanel<K> {
    pub layout: PanelLayout,
    open: bool,
    folders: Vec<Folder<K>>,
    rects: Vec<(K, egui::Rect)>,
}

impl<K> Default for DebugPanel<K> {
    fn default() -> Self {
        Self::new(PanelLayout::default())
    }
}

impl<K> DebugPanel<K> {
    pub fn new(layout: PanelLayout) -> Self {
        Self {
            layout,
            open: false,
            folders: Vec::new(),
            rects: Vec::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    /// Add a folder (collapsed) and return it for configuration.
    pub fn add_folder(&mut self, name: &str) -> &mut Folder<K> {
        self.folders.push(Folder::new(name));
        let last = self.folders.len() - 1;
        &mut self.folders[last]
    }

    pub fn folder(&self, name: &str) -> Option<&Folder<K>> {
        self.folders.iter().find(|f| f.name == name)
    }

    pub fn folder_mut(&mut self, name: &str) -> Option<&mut Folder<K>> {
        self.folders.iter_mut().find(|f| f.name == name)
    }

    pub fn folders(&self) -> &[Folder<K>] {
        &self.folders
    }
}

impl<K: Copy + PartialEq + Debug> DebugPanel<K> {
    pub fn binding(&self, key: K) -> Option<&Binding<K>> {
        self.folders
            .iter()
            .flat_map(|f| f.bindings.iter())
            .find(|b| b.key == key)
    }

    /// Screen rect of the row drawn for `key` by the last `show`, if visible.
    pub fn control_rect(&self, key: K) -> Option<egui::Rect> {
        self.rects.iter().find(|(k, _)| *k == key).map(|(_, rect)| *rect)
    }

    /// Bring a value into the range of the control bound to `key`.
    ///
    /// In-range numbers are returned unchanged (no step rounding).
    pub fn clamp(&self, key: K, value: ControlValue) -> ControlValue {
        match (self.binding(key).map(|b| b.control), value) {
            (Some(Control::Number { min, max, .. }), ControlValue::Number(v)) if !v.is_nan() => {
                ControlValue::Number(v.clamp(min, max))
            }
            _ => value,
        }
    }

    /// Draw the panel and return the edits made this frame.
    ///
    /// `value` supplies the current value for each bound key; bindings for
    /// which it returns `None` are drawn disabled.
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        value: impl Fn(K) -> Option<ControlValue>,
    ) -> Vec<PanelChange<K>> {
        let mut changes = Vec::new();
        let mut rects = Vec::new();
        let layout = self.layout;
        let order = if layout.foreground {
            egui::Order::Foreground
        } else {
            egui::Order::Middle
        };
        let mut area = egui::Area::new(egui::Id::new("debug_panel"))
            .order(order)
            .movable(!layout.fixed);
        area = if layout.fixed {
            area.fixed_pos(egui::pos2(layout.position[0], layout.position[1]))
        } else {
            area.default_pos(egui::pos2(layout.position[0], layout.position[1]))
        };

        area.show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.set_width(layout.width);
                if self.open {
                    for (index, folder) in self.folders.iter_mut().enumerate() {
                        let response = egui::CollapsingHeader::new(folder.name.as_str())
                            .id_salt(("debug_panel_folder", index))
                            .open(Some(folder.open))
                            .show(ui, |ui| {
                                for binding in &folder.bindings {
                                    let (change, rect) = draw_binding(ui, binding, &value);
                                    changes.extend(change);
                                    rects.push((binding.key, rect));
                                }
                            });
                        if response.header_response.clicked() {
                            folder.open = !folder.open;
                        }
                    }
                }
                let toggle = if self.open {
                    "Close Controls"
                } else {
                    "Open Controls"
                };
                if ui
                    .add_sized([layout.width, 18.0], egui::Button::new(toggle))
                    .clicked()
                {
                    self.open = !self.open;
                    tracing::debug!(open = self.open, "debug panel toggled");
                }
            });
        });

        self.rects = rects;
        changes
            .into_iter()
            .map(|c| PanelChange {
                key: c.key,
                value: self.clamp(c.key, c.value),
            })
            .collect()
    }
}

fn draw_binding<K: Copy>(
    ui: &mut egui::Ui,
    binding: &Binding<K>,
    value: &impl Fn(K) -> Option<ControlValue>,
) -> (Option<PanelChange<K>>, egui::Rect) {
    let current = value(binding.key);
    let mut changed = None;
    let row = ui.horizontal(|ui| match (binding.control, current) {
        (Control::Number { min, max, step }, Some(ControlValue::Number(mut v))) => {
            let slider = egui::Slider::new(&mut v, min..=max)
                .step_by(step)
                .max_decimals(step_decimals(step))
                .text(binding.label.as_str());
            if ui.add(slider).changed() {
                changed = Some(ControlValue::Number(v));
            }
        }
        (Control::Color, Some(ControlValue::Color(c))) => {
            let mut rgb = c.to_srgb_u8();
            if ui.color_edit_button_srgb(&mut rgb).changed() {
                changed = Some(ControlValue::Color(Color::from_srgb_u8(rgb)));
            }
            ui.label(binding.label.as_str());
        }
        _ => {
            ui.add_enabled(false, egui::Label::new(binding.label.as_str()));
        }
    });
    let change = changed.map(|value| PanelChange {
        key: binding.key,
        value,
    });
    (change, row.response.rect)
}

/// Decimal places needed to show multiples of `step` exactly.
fn step_decimals(step: f64) -> usize {
    if !(step.is_finite() && step > 0.0) {
        return 2;
    }
    (0..=10)
        .find(|&d| {
            let scaled = step * 10f64.powi(d as i32);
            (scaled - scaled.round()).abs() < 1e-9 * scaled.max(1.0)
        })
        .unwrap_or(10)
}
