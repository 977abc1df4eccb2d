use std::sync::Arc;
use std::time::Duration;

use meadow_assets::{AssetSource, LoadEvent, LoadingManager, Progress, TextureLoader, TextureRegistry};
use meadow_common::Color;
use meadow_input::OrbitControls;
use meadow_render::{ColorSpace, Frame, Precision, Renderer, RendererSettings, ToneMapping};
use meadow_scene::{
    Clock, FogExp2, Geometry, Light, Material, Mesh, PerspectiveCamera, PropertyError,
    PropertyValue, Scene, SceneProperties, SceneProperty, UniformValue, Uniforms,
};
use meadow_tools::{ControlValue, DebugPanel, FrameStats, PanelLayout, StatsAnchor};

use crate::config::SceneConfig;
use crate::host::{Host, HostEvent};
use crate::OrchestratorError;

/// Registry name of the noise texture requested at startup.
pub const PERLIN_NOISE: &str = "perlinNoise";

/// Label of the panel folder holding the scene bindings.
pub const SCENE_PROPERTIES_FOLDER: &str = "Scene Properties";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Listener {
    Resize,
    StatsClick,
}

/// Owns the scene, camera, renderer and tooling, and drives one frame at a
/// time on behalf of a [`Host`].
pub struct SceneOrchestrator<H, R> {
    host: H,
    config: SceneConfig,
    properties: SceneProperties,
    manager: LoadingManager,
    loader: TextureLoader,
    textures: TextureRegistry,
    panel: DebugPanel<SceneProperty>,
    stats: FrameStats,
    camera: PerspectiveCamera,
    scene: Scene,
    uniforms: Uniforms,
    renderer: R,
    controls: OrbitControls,
    clock: Clock,
    listeners: Vec<Listener>,
}

impl<H: Host, R: Renderer> SceneOrchestrator<H, R> {
    /// Build every engine object and run the startup sequence.
    ///
    /// `make_renderer` receives the settings the scene needs; failing to
    /// create a renderer is the only fatal startup error besides an
    /// invalid config.
    pub fn new(
        host: H,
        config: SceneConfig,
        source: Arc<dyn AssetSource>,
        make_renderer: impl FnOnce(RendererSettings) -> Result<R, R::Error>,
    ) -> Result<Self, OrchestratorError> {
        config.validate()?;

        let manager = LoadingManager::new(source);
        let loader = TextureLoader::new();

        let mut panel = DebugPanel::new(PanelLayout::default());
        panel.add_folder(SCENE_PROPERTIES_FOLDER).open();

        let stats = FrameStats::new();

        let viewport = host.viewport();
        let lens = &config.camera;
        let mut camera = PerspectiveCamera::new(lens.fov, viewport.aspect(), lens.near, lens.far);
        camera.position = lens.position;
        camera.look_at(lens.target);

        if let Some(folder) = panel.folder_mut(SCENE_PROPERTIES_FOLDER) {
            folder
                .add_number(SceneProperty::FogDensity, "fogDensity", 0.0, 0.01, 0.000001)
                .add_color(SceneProperty::FogColor, "fogColor");
        }
        let mut properties = config.properties;
        if let ControlValue::Number(density) = panel.clamp(
            SceneProperty::FogDensity,
            ControlValue::Number(properties.fog_density),
        ) {
            properties.fog_density = density;
        }
        let mut scene = Scene::new();
        scene.background = Some(properties.fog_color);
        scene.fog = Some(FogExp2::new(properties.fog_color, properties.fog_density));

        let settings = RendererSettings {
            antialias: config.renderer.antialias,
            alpha: config.renderer.alpha,
            precision: Precision::High,
            output_color_space: ColorSpace::Srgb,
            tone_mapping: ToneMapping::AcesFilmic,
            tone_mapping_exposure: config.renderer.exposure,
        };
        let mut renderer =
            make_renderer(settings).map_err(|e| OrchestratorError::Renderer(Box::new(e)))?;
        renderer.set_size(viewport);
        renderer.set_pixel_ratio(host.device_pixel_ratio().min(config.renderer.max_pixel_ratio));
        scene.frustum_culled = true;

        let controls = OrbitControls::new(&camera, viewport);
        let uniforms = Uniforms::with_defaults(properties.blue_window_color);

        let mut this = Self {
            host,
            config,
            properties,
            manager,
            loader,
            textures: TextureRegistry::new(),
            panel,
            stats,
            camera,
            scene,
            uniforms,
            renderer,
            controls,
            clock: Clock::new(),
            listeners: Vec::new(),
        };

        this.setup_stats();
        this.setup_textures();
        this.load_models();
        this.setup_event_listeners();
        this.add_lights();
        this.add_objects();

        tracing::info!(
            width = viewport.width,
            height = viewport.height,
            pixel_ratio = this.renderer.pixel_ratio(),
            objects = this.scene.len(),
            "scene ready"
        );
        Ok(this)
    }

    fn setup_stats(&mut self) {
        self.stats.attach(StatsAnchor::BottomRight([0.0, 0.0]));
    }

    fn setup_textures(&mut self) {
        for entry in &self.config.assets.textures {
            let mut texture = self.loader.load(&mut self.manager, &entry.name, &entry.path);
            texture.set_wrap(entry.wrap.into());
            self.textures.insert(texture);
        }
    }

    fn load_models(&mut self) {
        let assets = &self.config.assets;
        match &assets.model {
            Some(model) if assets.load_models => {
                tracing::warn!(model = %model, "model loading is not supported, skipping");
            }
            model => tracing::debug!(?model, "model loading disabled"),
        }
    }

    fn setup_event_listeners(&mut self) {
        self.listeners.push(Listener::Resize);
        self.listeners.push(Listener::StatsClick);
    }

    fn add_lights(&mut self) {
        self.scene
            .add_named("ambientLight", Light::ambient(Color::WHITE, 0.5));
        self.scene.add_named(
            "directionalLight",
            Light::directional(Color::WHITE, 0.5, glam::Vec3::splat(10.0)),
        );
    }

    fn add_objects(&mut self) {
        let material = Material::Matcap {
            color: Color::from_hex(0x00ff00),
            matcap: None,
        };
        self.scene
            .add_named("cube", Mesh::new(Geometry::unit_box(), material));
    }

    /// Detach from host notifications. Resizes and overlay clicks are
    /// ignored afterwards; pointer input still reaches the controls.
    pub fn remove_event_listeners(&mut self) {
        self.listeners.clear();
        tracing::debug!("event listeners removed");
    }

    fn listening(&self, listener: Listener) -> bool {
        self.listeners.contains(&listener)
    }

    /// React to a notification from the host.
    pub fn handle_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::Resized if self.listening(Listener::Resize) => self.on_resize(),
            HostEvent::StatsClicked if self.listening(Listener::StatsClick) => {
                let info = self.renderer.info();
                tracing::info!(
                    frame = info.frame,
                    calls = info.calls,
                    triangles = info.triangles,
                    points = info.points,
                    lines = info.lines,
                    "render info"
                );
            }
            HostEvent::Pointer(pointer) => self.controls.handle(&pointer),
            HostEvent::Resized | HostEvent::StatsClicked => {}
        }
    }

    fn on_resize(&mut self) {
        let viewport = self.host.viewport();
        self.camera.aspect = viewport.aspect();
        self.camera.update_projection_matrix();
        self.renderer.set_size(viewport);
        self.controls.set_viewport(viewport);
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            "viewport resized"
        );
    }

    /// Write a scene property and everything bound to it.
    ///
    /// Numbers are clamped to their panel range.
    pub fn set_property(
        &mut self,
        key: SceneProperty,
        value: PropertyValue,
    ) -> Result<(), PropertyError> {
        let value = from_control(self.panel.clamp(key, to_control(value)));
        self.properties.set(key, value)?;
        match key {
            SceneProperty::FogDensity => {
                if let Some(fog) = self.scene.fog.as_mut() {
                    fog.density = self.properties.fog_density;
                }
            }
            SceneProperty::FogColor => {
                let color = self.properties.fog_color;
                if let Some(fog) = self.scene.fog.as_mut() {
                    fog.color = color;
                }
                self.scene.background = Some(color);
            }
            SceneProperty::BlueWindowColor => self.uniforms.set(
                "blueWindowColor",
                UniformValue::Color(self.properties.blue_window_color),
            ),
            SceneProperty::VolumetricLight1
            | SceneProperty::VolumetricLight2
            | SceneProperty::VolumetricLight3 => {}
        }
        tracing::debug!(property = %key, ?value, "scene property changed");
        Ok(())
    }

    /// Run one frame, timed by the wall clock.
    pub fn frame(&mut self) {
        let dt = self.clock.delta();
        self.frame_with_delta(dt);
    }

    /// Run one frame that advances time by `dt` seconds.
    pub fn frame_with_delta(&mut self, dt: f64) {
        let events = self.manager.poll();
        self.apply_loads(events);

        self.uniforms.advance_time(dt);
        self.controls.update(&mut self.camera);

        let frame = Frame {
            scene: &self.scene,
            camera: &self.camera,
            uniforms: &self.uniforms,
            textures: &self.textures,
        };
        if let Err(err) = self.renderer.render(&frame) {
            tracing::error!(error = %err, "render failed");
        }

        self.stats.update();
        self.host.request_animation_frame();
    }

    /// Block until every requested asset finished or `timeout` passed.
    pub fn wait_for_assets(&mut self, timeout: Duration) -> Progress {
        let events = self.manager.wait_idle(timeout);
        self.apply_loads(events);
        self.manager.progress()
    }

    fn apply_loads(&mut self, events: Vec<LoadEvent>) {
        for event in events {
            if let LoadEvent::Failed {
                name, path, error, ..
            } = &event
            {
                tracing::error!(name = %name, path = %path, %error, "asset failed to load");
            }
            if self.textures.apply(event) {
                tracing::debug!("texture image applied");
            }
        }
    }

    /// Draw the debug panel and the stats overlay, applying any edits.
    pub fn show_gui(&mut self, ctx: &egui::Context) {
        let properties = self.properties;
        let changes = self
            .panel
            .show(ctx, |key| Some(to_control(properties.get(key))));
        for change in changes {
            if let Err(err) = self.set_property(change.key, from_control(change.value)) {
                tracing::warn!(error = %err, "panel edit rejected");
            }
        }
        if self.stats.show(ctx) {
            self.handle_event(HostEvent::StatsClicked);
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn uniforms(&self) -> &Uniforms {
        &self.uniforms
    }

    pub fn textures(&self) -> &TextureRegistry {
        &self.textures
    }

    pub fn properties(&self) -> &SceneProperties {
        &self.properties
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn panel(&self) -> &DebugPanel<SceneProperty> {
        &self.panel
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn loading_progress(&self) -> Progress {
        self.manager.progress()
    }

    /// The frame the renderer would draw right now.
    pub fn current_frame(&self) -> Frame<'_> {
        Frame {
            scene: &self.scene,
            camera: &self.camera,
            uniforms: &self.uniforms,
            textures: &self.textures,
        }
    }
}

fn to_control(value: PropertyValue) -> ControlValue {
    match value {
        PropertyValue::Number(v) => ControlValue::Number(v),
        PropertyValue::Color(c) => ControlValue::Color(c),
    }
}

fn from_control(value: ControlValue) -> PropertyValue {
    match value {
        ControlValue::Number(v) => PropertyValue::Number(v),
        ControlValue::Color(c) => PropertyValue::Color(c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};
    use meadow_assets::{MemorySource, WrapMode};
    use meadow_common::Viewport;
    use meadow_input::{PointerButton, PointerEvent};
    use meadow_render::{HeadlessRenderer, RenderError};
    use meadow_scene::SceneObject;

    struct RecordingHost {
        viewport: Viewport,
        pixel_ratio: f64,
        frames_requested: usize,
    }

    impl RecordingHost {
        fn new(width: u32, height: u32, pixel_ratio: f64) -> Self {
            Self {
                viewport: Viewport::new(width, height),
                pixel_ratio,
                frames_requested: 0,
            }
        }
    }

    impl Host for RecordingHost {
        fn viewport(&self) -> Viewport {
            self.viewport
        }

        fn device_pixel_ratio(&self) -> f64 {
            self.pixel_ratio
        }

        fn request_animation_frame(&mut self) {
            self.frames_requested += 1;
        }
    }

    type Orchestrator = SceneOrchestrator<RecordingHost, HeadlessRenderer>;

    fn build(host: RecordingHost) -> Orchestrator {
        build_with(host, SceneConfig::default())
    }

    fn build_with(host: RecordingHost, config: SceneConfig) -> Orchestrator {
        SceneOrchestrator::new(host, config, Arc::new(MemorySource::new()), |settings| {
            Ok::<_, RenderError>(HeadlessRenderer::new(settings))
        })
        .unwrap()
    }

    #[test]
    fn builds_the_800x600_scene() {
        let o = build(RecordingHost::new(800, 600, 3.0));

        let cam = o.camera();
        assert_eq!(cam.fov, 75.0);
        assert!((cam.aspect - 800.0 / 600.0).abs() < 1e-6);
        assert_eq!(cam.position, Vec3::splat(20.0));
        assert_eq!(cam.target, Vec3::ZERO);

        let r = o.renderer();
        assert_eq!(r.size(), Viewport::new(800, 600));
        assert_eq!(r.pixel_ratio(), 2.0);
        assert_eq!(r.drawing_buffer_size(), (1600, 1200));
        let s = r.settings();
        assert!(s.antialias && s.alpha);
        assert_eq!(s.tone_mapping, ToneMapping::AcesFilmic);
        assert_eq!(s.output_color_space, ColorSpace::Srgb);

        let scene = o.scene();
        assert!(scene.frustum_culled);
        assert_eq!(scene.background, Some(Color::from_hex(0x2d2d2d)));
        let fog = scene.fog.unwrap();
        assert_eq!(fog.color, Color::from_hex(0x2d2d2d));
        assert_eq!(fog.density, 0.0007);

        let names: Vec<_> = scene.nodes().iter().map(|n| n.name.as_deref()).collect();
        assert_eq!(
            names,
            [Some("ambientLight"), Some("directionalLight"), Some("cube")]
        );
        match &scene.find_by_name("cube").unwrap().object {
            SceneObject::Mesh(mesh) => {
                assert_eq!(mesh.material.color(), Color::from_hex(0x00ff00));
                assert!(!mesh.material.is_lit());
                assert_eq!(mesh.transform.position, Vec3::ZERO);
            }
            other => panic!("unexpected {other:?}"),
        }

        let noise = o.textures().get(PERLIN_NOISE).unwrap();
        assert_eq!(noise.path, "/textures/noise/perlinnoise.webp");
        assert_eq!((noise.wrap_s, noise.wrap_t), (WrapMode::Repeat, WrapMode::Repeat));
        assert_eq!(o.loading_progress().items_total, 1);

        assert!(o.stats().is_attached());
        assert!(!o.panel().is_open());
        let folder = o.panel().folder(SCENE_PROPERTIES_FOLDER).unwrap();
        assert!(folder.open);
        assert_eq!(folder.bindings().len(), 2);
        assert_eq!(o.uniforms().time(), 0.0);
    }

    #[test]
    fn time_accumulates_frame_deltas() {
        let mut o = build(RecordingHost::new(800, 600, 1.0));
        let mut expected = 0.0;
        for dt in [0.016, 0.017, 0.0, 0.05] {
            o.frame_with_delta(dt);
            expected += dt;
        }
        assert_eq!(o.uniforms().time(), expected);
        assert_eq!(o.renderer().info().frame, 4);
        assert_eq!(o.host().frames_requested, 4);
        assert_eq!(o.renderer().last_frame().unwrap().time, expected);
    }

    #[test]
    fn fog_density_is_stored_exactly() {
        let mut o = build(RecordingHost::new(800, 600, 1.0));
        o.set_property(SceneProperty::FogDensity, PropertyValue::Number(0.0012345))
            .unwrap();
        assert_eq!(o.scene().fog.unwrap().density, 0.0012345);
        assert_eq!(o.properties().fog_density, 0.0012345);

        o.set_property(SceneProperty::FogDensity, PropertyValue::Number(0.5))
            .unwrap();
        assert_eq!(o.scene().fog.unwrap().density, 0.01);
    }

    #[test]
    fn fog_colour_and_background_move_together() {
        let mut o = build(RecordingHost::new(800, 600, 1.0));
        let red = Color::from_hex(0xff0000);
        o.set_property(SceneProperty::FogColor, PropertyValue::Color(red))
            .unwrap();
        assert_eq!(o.scene().fog.unwrap().color, red);
        assert_eq!(o.scene().background, Some(red));

        assert!(o
            .set_property(SceneProperty::FogColor, PropertyValue::Number(1.0))
            .is_err());
        assert_eq!(o.scene().background, Some(red));
    }

    #[test]
    fn blue_window_colour_updates_its_uniform() {
        let mut o = build(RecordingHost::new(800, 600, 1.0));
        let c = Color::from_hex(0x123456);
        o.set_property(SceneProperty::BlueWindowColor, PropertyValue::Color(c))
            .unwrap();
        assert_eq!(
            o.uniforms().get("blueWindowColor"),
            Some(&UniformValue::Color(c))
        );
    }

    #[test]
    fn resize_updates_camera_and_renderer_once() {
        let mut o = build(RecordingHost::new(800, 600, 2.0));
        let revision = o.camera().projection_revision();
        o.host_mut().viewport = Viewport::new(1024, 512);
        o.handle_event(HostEvent::Resized);

        assert_eq!(o.camera().aspect, 2.0);
        assert_eq!(o.camera().projection_revision(), revision + 1);
        assert_eq!(o.renderer().size(), Viewport::new(1024, 512));
        assert_eq!(o.renderer().drawing_buffer_size(), (2048, 1024));
    }

    #[test]
    fn resize_is_ignored_after_listeners_are_removed() {
        let mut o = build(RecordingHost::new(800, 600, 1.0));
        let revision = o.camera().projection_revision();
        o.remove_event_listeners();
        o.host_mut().viewport = Viewport::new(1024, 512);
        o.handle_event(HostEvent::Resized);
        o.handle_event(HostEvent::StatsClicked);

        assert_eq!(o.camera().aspect, 800.0 / 600.0);
        assert_eq!(o.camera().projection_revision(), revision);
        assert_eq!(o.renderer().size(), Viewport::new(800, 600));

        let before = o.camera().position;
        o.handle_event(HostEvent::Pointer(PointerEvent::down(
            PointerButton::Primary,
            100.0,
            100.0,
        )));
        o.handle_event(HostEvent::Pointer(PointerEvent::moved(160.0, 100.0)));
        o.frame_with_delta(0.016);
        assert!((o.camera().position - before).length() > 1e-3);
    }

    #[test]
    fn zero_height_viewport_is_not_guarded() {
        let mut o = build(RecordingHost::new(800, 600, 1.0));
        o.host_mut().viewport = Viewport::new(800, 0);
        o.handle_event(HostEvent::Resized);
        assert!(!o.camera().aspect.is_finite());
        o.frame_with_delta(0.016);
        assert_eq!(o.host().frames_requested, 1);
    }

    #[test]
    fn missing_texture_does_not_stop_rendering() {
        let mut o = build(RecordingHost::new(800, 600, 1.0));
        let progress = o.wait_for_assets(Duration::from_secs(5));
        assert_eq!(progress.items_failed, 1);
        assert_eq!(progress.pending(), 0);

        o.frame_with_delta(0.016);
        o.frame_with_delta(0.016);
        assert_eq!(o.renderer().info().frame, 2);
        let last = o.renderer().last_frame().unwrap();
        assert_eq!(last.meshes_drawn, 1);
        assert_eq!(last.textures_loaded, 0);
        assert!(!o.textures().get(PERLIN_NOISE).unwrap().is_loaded());
    }

    #[test]
    fn render_error_keeps_the_loop_going() {
        let mut o = build(RecordingHost::new(800, 600, 1.0));
        o.renderer_mut().fail_next_frame("surface lost");
        o.frame_with_delta(0.016);
        o.frame_with_delta(0.016);
        assert_eq!(o.renderer().info().frame, 2);
        assert_eq!(o.host().frames_requested, 2);
        assert!(o.renderer().last_frame().is_some());
        assert_eq!(o.uniforms().time(), 0.032);
    }

    #[test]
    fn pointer_drag_orbits_the_camera() {
        let mut o = build(RecordingHost::new(800, 600, 1.0));
        let before = o.camera().position;
        o.handle_event(HostEvent::Pointer(PointerEvent::down(
            PointerButton::Primary,
            400.0,
            300.0,
        )));
        o.handle_event(HostEvent::Pointer(PointerEvent::Moved {
            position: Vec2::new(500.0, 300.0),
        }));
        o.handle_event(HostEvent::Pointer(PointerEvent::up(PointerButton::Primary)));
        o.frame_with_delta(0.016);
        let after = o.camera().position;
        assert!((after - before).length() > 1.0);
        assert!((after.length() - before.length()).abs() < 1e-3);
    }

    #[test]
    fn config_values_flow_into_the_scene() {
        let mut config = SceneConfig::default();
        config.properties.fog_density = 0.5;
        config.renderer.max_pixel_ratio = 1.0;
        config.renderer.antialias = false;
        config.assets.textures.clear();
        let o = build_with(RecordingHost::new(640, 480, 2.0), config);
        assert_eq!(o.scene().fog.unwrap().density, 0.01);
        assert_eq!(o.renderer().pixel_ratio(), 1.0);
        assert!(!o.renderer().settings().antialias);
        assert!(o.textures().is_empty());
        assert_eq!(o.loading_progress().items_total, 0);
    }

    #[test]
    fn renderer_failure_is_reported() {
        let result: Result<Orchestrator, _> = SceneOrchestrator::new(
            RecordingHost::new(800, 600, 1.0),
            SceneConfig::default(),
            Arc::new(MemorySource::new()),
            |_| Err(RenderError::NoAdapter),
        );
        assert!(matches!(result.err(), Some(OrchestratorError::Renderer(_))));
    }

    #[test]
    fn gui_pass_without_input_changes_nothing() {
        let mut o = build(RecordingHost::new(800, 600, 1.0));
        let before = *o.properties();
        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| o.show_gui(ctx));
        assert_eq!(*o.properties(), before);
    }

    fn gui_pass(o: &mut Orchestrator, ctx: &egui::Context, events: Vec<egui::Event>) {
        let input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(800.0, 600.0),
            )),
            events,
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| o.show_gui(ctx));
    }

    fn press(pos: egui::Pos2, pressed: bool) -> egui::Event {
        egui::Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed,
            modifiers: egui::Modifiers::default(),
        }
    }

    #[test]
    fn dragging_the_density_slider_updates_fog() {
        let mut o = build(RecordingHost::new(800, 600, 1.0));
        let ctx = egui::Context::default();
        for _ in 0..3 {
            gui_pass(&mut o, &ctx, Vec::new());
        }

        let toggle = ctx
            .memory(|m| m.area_rect(egui::Id::new("debug_panel")))
            .unwrap()
            .center();
        gui_pass(&mut o, &ctx, vec![egui::Event::PointerMoved(toggle), press(toggle, true)]);
        gui_pass(&mut o, &ctx, vec![press(toggle, false)]);
        assert!(o.panel().is_open());

        for _ in 0..10 {
            gui_pass(&mut o, &ctx, Vec::new());
        }
        let row = o.panel().control_rect(SceneProperty::FogDensity).unwrap();
        let grab = egui::pos2(row.left() + 1.0, row.center().y);
        gui_pass(&mut o, &ctx, vec![egui::Event::PointerMoved(grab), press(grab, true)]);
        gui_pass(&mut o, &ctx, vec![egui::Event::PointerMoved(grab)]);
        gui_pass(&mut o, &ctx, vec![press(grab, false)]);

        let fog = o.scene().fog.unwrap();
        assert_eq!(o.properties().fog_density, 0.0);
        assert_eq!(fog.density, 0.0);
        assert_eq!(fog.color, Color::from_hex(0x2d2d2d));
        assert_eq!(o.scene().background, Some(fog.color));
    }
}
