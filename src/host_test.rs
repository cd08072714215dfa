#![allow(clippy::float_cmp)]

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use sketches::consts::{HERO_BACKGROUND, INK, PAPER};
use sketches::raster::Raster;
use sketches::surface::SurfaceResult;
use sketches::{Rgba, SurfaceError};

use super::*;

// =============================================================
// Fakes
// =============================================================

/// Raster that starts failing every draw call once `broken` is set.
struct FlakySurface {
    inner: Raster,
    broken: Rc<Cell<bool>>,
    /// Cleared when the page drops the surface's container.
    attached: Rc<Cell<bool>>,
}

impl FlakySurface {
    fn check(&self) -> SurfaceResult {
        if self.broken.get() { Err(SurfaceError::Backend("lost context".into())) } else { Ok(()) }
    }
}

impl Surface for FlakySurface {
    fn width(&self) -> f64 {
        self.inner.width()
    }
    fn height(&self) -> f64 {
        self.inner.height()
    }
    fn resize(&mut self, width: u32, height: u32) -> SurfaceResult {
        self.inner.resize(width, height)
    }
    fn background(&mut self, color: Rgba) -> SurfaceResult {
        self.check()?;
        self.inner.background(color)
    }
    fn set_stroke(&mut self, color: Rgba) {
        self.inner.set_stroke(color);
    }
    fn set_stroke_weight(&mut self, weight: f64) {
        self.inner.set_stroke_weight(weight);
    }
    fn set_fill(&mut self, color: Option<Rgba>) {
        self.inner.set_fill(color);
    }
    fn line(&mut self, from: Vector2, to: Vector2) -> SurfaceResult {
        self.check()?;
        self.inner.line(from, to)
    }
    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> SurfaceResult {
        self.check()?;
        self.inner.rect(x, y, width, height)
    }
    fn ellipse(&mut self, cx: f64, cy: f64, width: f64, height: f64) -> SurfaceResult {
        self.check()?;
        self.inner.ellipse(cx, cy, width, height)
    }
    fn push(&mut self) {
        self.inner.push();
    }
    fn pop(&mut self) {
        self.inner.pop();
    }
    fn translate(&mut self, x: f64, y: f64) -> SurfaceResult {
        self.inner.translate(x, y)
    }
    fn rotate(&mut self, radians: f64) -> SurfaceResult {
        self.inner.rotate(radians)
    }
    fn shear_x(&mut self, angle: f64) -> SurfaceResult {
        self.inner.shear_x(angle)
    }
    fn shear_y(&mut self, angle: f64) -> SurfaceResult {
        self.inner.shear_y(angle)
    }
    fn pixel(&self, x: i64, y: i64) -> SurfaceResult<Option<Rgba>> {
        self.check()?;
        self.inner.pixel(x, y)
    }
}

#[derive(Default)]
struct FakeStage {
    containers: HashMap<SketchKind, (u32, u32)>,
    reject_create: Option<SketchKind>,
    break_on_create: Option<SketchKind>,
    broken: HashMap<SketchKind, Rc<Cell<bool>>>,
    attached: HashMap<SketchKind, Rc<Cell<bool>>>,
    created: Vec<SketchKind>,
    released: Vec<SketchKind>,
}

impl FakeStage {
    fn with(containers: &[(SketchKind, (u32, u32))]) -> Self {
        Self { containers: containers.iter().copied().collect(), ..Self::default() }
    }

    fn break_surface(&self, kind: SketchKind) {
        if let Some(flag) = self.broken.get(&kind) {
            flag.set(true);
        }
    }

    fn repair_surface(&self, kind: SketchKind) {
        if let Some(flag) = self.broken.get(&kind) {
            flag.set(false);
        }
    }

    /// Simulate the page replacing `kind`'s container element.
    fn detach_surface(&self, kind: SketchKind) {
        if let Some(flag) = self.attached.get(&kind) {
            flag.set(false);
        }
    }
}

impl Stage for FakeStage {
    type Surface = FlakySurface;

    fn probe(&self, kind: SketchKind) -> Result<(u32, u32), HostError> {
        match self.containers.get(&kind) {
            None => Err(HostError::MissingContainer(kind.container_id().to_owned())),
            Some(&(w, h)) if w == 0 || h == 0 => Err(HostError::ZeroSizedContainer(kind.container_id().to_owned())),
            Some(&size) => Ok(size),
        }
    }

    fn create_surface(&mut self, kind: SketchKind, width: u32, height: u32) -> Result<FlakySurface, HostError> {
        if self.reject_create == Some(kind) {
            return Err(HostError::Context("getContext returned null".into()));
        }
        let broken = Rc::new(Cell::new(self.break_on_create == Some(kind)));
        let attached = Rc::new(Cell::new(true));
        self.broken.insert(kind, Rc::clone(&broken));
        self.attached.insert(kind, Rc::clone(&attached));
        self.created.push(kind);
        Ok(FlakySurface { inner: Raster::new(width, height)?, broken, attached })
    }

    fn release_surface(&mut self, kind: SketchKind, _surface: FlakySurface) {
        self.released.push(kind);
    }

    fn is_attached(&self, surface: &FlakySurface) -> bool {
        surface.attached.get()
    }
}

fn registry(containers: &[(SketchKind, (u32, u32))]) -> Registry<FakeStage> {
    Registry::new(FakeStage::with(containers), SketchConfig::default(), 7)
}

const ALL_READY: [(SketchKind, (u32, u32)); 3] = [
    (SketchKind::Hero, (200, 150)),
    (SketchKind::StaticSquares, (180, 180)),
    (SketchKind::GrowingSquares, (160, 160)),
];

// =============================================================
// Mount
// =============================================================

#[test]
fn mount_binds_every_ready_container() {
    let mut reg = registry(&ALL_READY);
    let report = reg.mount();
    assert_eq!(report.bound, SketchKind::ALL.to_vec());
    assert!(report.is_settled());
    assert!(report.failed.is_empty());
    assert_eq!(reg.bound_kinds(), SketchKind::ALL.to_vec());
    assert_eq!(reg.surface(SketchKind::Hero).unwrap().width(), 200.0);
}

#[test]
fn mount_is_idempotent() {
    let mut reg = registry(&ALL_READY);
    reg.mount();
    let again = reg.mount();
    assert!(again.bound.is_empty());
    assert!(again.pending.is_empty());
    assert_eq!(reg.stage().created.len(), 3);
    assert_eq!(reg.bound_kinds().len(), 3);
}

#[test]
fn missing_and_zero_sized_containers_stay_pending() {
    let mut reg = registry(&[(SketchKind::Hero, (300, 200)), (SketchKind::GrowingSquares, (0, 120))]);
    let report = reg.mount();
    assert_eq!(report.bound, vec![SketchKind::Hero]);
    assert_eq!(report.pending, vec![SketchKind::StaticSquares, SketchKind::GrowingSquares]);
    assert!(!report.is_settled());
    assert!(!reg.is_bound(SketchKind::GrowingSquares));
}

#[test]
fn pending_container_binds_once_laid_out() {
    let mut reg = registry(&[(SketchKind::StaticSquares, (0, 0))]);
    assert_eq!(reg.mount().pending.len(), 3);
    reg.stage_mut().containers.insert(SketchKind::StaticSquares, (120, 80));
    let report = reg.mount();
    assert_eq!(report.bound, vec![SketchKind::StaticSquares]);
    assert_eq!(report.pending, vec![SketchKind::Hero, SketchKind::GrowingSquares]);
}

#[test]
fn hard_failures_are_not_pending() {
    let mut stage = FakeStage::with(&ALL_READY);
    stage.reject_create = Some(SketchKind::StaticSquares);
    let mut reg = Registry::new(stage, SketchConfig::default(), 1);
    let report = reg.mount();
    assert_eq!(report.failed, vec![SketchKind::StaticSquares]);
    assert!(report.is_settled());
    assert_eq!(reg.bound_kinds(), vec![SketchKind::Hero, SketchKind::GrowingSquares]);
}

#[test]
fn detached_surface_is_rebound_on_next_mount() {
    let mut reg = registry(&ALL_READY);
    reg.mount();
    reg.stage().detach_surface(SketchKind::StaticSquares);
    let report = reg.mount();
    assert_eq!(report.bound, vec![SketchKind::StaticSquares]);
    assert_eq!(reg.stage().released, vec![SketchKind::StaticSquares]);
    assert_eq!(reg.stage().created.len(), 4);
    assert_eq!(reg.bound_kinds().len(), 3);
    assert!(reg.is_bound(SketchKind::StaticSquares));
    assert_eq!(reg.frame(), 3);
}

#[test]
fn detached_surface_with_missing_container_stays_pending() {
    let mut reg = registry(&ALL_READY);
    reg.mount();
    reg.stage().detach_surface(SketchKind::GrowingSquares);
    reg.stage_mut().containers.remove(&SketchKind::GrowingSquares);
    let report = reg.mount();
    assert_eq!(report.pending, vec![SketchKind::GrowingSquares]);
    assert!(!reg.is_bound(SketchKind::GrowingSquares));
    assert_eq!(reg.stage().released, vec![SketchKind::GrowingSquares]);
}

#[test]
fn mount_with_no_containers_binds_nothing() {
    let mut reg = registry(&[]);
    let report = reg.mount();
    assert!(report.bound.is_empty());
    assert_eq!(report.pending.len(), 3);
    assert!(reg.is_empty());
    assert_eq!(reg.frame(), 0);
}

#[test]
fn config_seed_overrides_host_seed() {
    let config = SketchConfig { seed: Some(5), ..SketchConfig::default() };
    let mut a = Registry::new(FakeStage::with(&ALL_READY), config.clone(), 1);
    let mut b = Registry::new(FakeStage::with(&ALL_READY), config, 2);
    a.mount();
    b.mount();
    for _ in 0..10 {
        a.frame();
        b.frame();
    }
    let pa = a.surface(SketchKind::Hero).unwrap().inner.pixels().to_vec();
    let pb = b.surface(SketchKind::Hero).unwrap().inner.pixels().to_vec();
    assert!(pa == pb);
}

// =============================================================
// Frame loop
// =============================================================

#[test]
fn frame_steps_every_binding() {
    let mut reg = registry(&ALL_READY);
    reg.mount();
    assert_eq!(reg.frame(), 3);
    assert_eq!(reg.frame(), 3);
}

#[test]
fn failing_sketch_is_parked_others_continue() {
    let mut reg = registry(&ALL_READY);
    reg.mount();
    reg.stage().break_surface(SketchKind::StaticSquares);
    assert_eq!(reg.frame(), 2);
    assert_eq!(reg.frame(), 2);
    assert!(reg.is_bound(SketchKind::StaticSquares));
}

#[test]
fn resize_revives_parked_sketch() {
    let mut reg = registry(&ALL_READY);
    reg.mount();
    reg.stage().break_surface(SketchKind::Hero);
    assert_eq!(reg.frame(), 2);
    reg.stage().repair_surface(SketchKind::Hero);
    assert!(reg.resize(SketchKind::Hero).unwrap());
    assert_eq!(reg.frame(), 3);
}

#[test]
fn failed_setup_releases_surface() {
    let mut stage = FakeStage::with(&ALL_READY);
    stage.break_on_create = Some(SketchKind::Hero);
    let mut reg = Registry::new(stage, SketchConfig::default(), 1);
    let report = reg.mount();
    assert_eq!(report.failed, vec![SketchKind::Hero]);
    assert!(!reg.is_bound(SketchKind::Hero));
    assert_eq!(reg.stage().released, vec![SketchKind::Hero]);
}

// =============================================================
// Resize & pointer
// =============================================================

#[test]
fn resize_follows_container_size() {
    let mut reg = registry(&ALL_READY);
    reg.mount();
    reg.stage_mut().containers.insert(SketchKind::GrowingSquares, (320, 90));
    assert!(reg.resize(SketchKind::GrowingSquares).unwrap());
    let surface = reg.surface(SketchKind::GrowingSquares).unwrap();
    assert_eq!((surface.width(), surface.height()), (320.0, 90.0));
}

#[test]
fn same_size_resize_resets_the_hero() {
    let mut reg = registry(&ALL_READY);
    reg.mount();
    for _ in 0..60 {
        reg.frame();
    }
    let area = 200 * 150;
    assert!(reg.surface(SketchKind::Hero).unwrap().inner.count(HERO_BACKGROUND) < area);
    assert!(reg.resize_container("hero-container").unwrap());
    let surface = reg.surface(SketchKind::Hero).unwrap();
    assert_eq!((surface.width(), surface.height()), (200.0, 150.0));
    assert_eq!(surface.inner.count(HERO_BACKGROUND), area);
}

#[test]
fn same_size_resize_restarts_growing_squares() {
    let mut reg = registry(&ALL_READY);
    reg.mount();
    for _ in 0..40 {
        reg.frame();
    }
    assert!(reg.surface(SketchKind::GrowingSquares).unwrap().inner.count(INK) > 0);
    assert!(reg.resize(SketchKind::GrowingSquares).unwrap());
    let surface = reg.surface(SketchKind::GrowingSquares).unwrap();
    assert_eq!(surface.inner.count(PAPER), 160 * 160);
}

#[test]
fn resize_of_collapsed_container_errors() {
    let mut reg = registry(&ALL_READY);
    reg.mount();
    reg.stage_mut().containers.insert(SketchKind::Hero, (0, 40));
    assert!(matches!(reg.resize(SketchKind::Hero), Err(HostError::ZeroSizedContainer(_))));
    assert_eq!(reg.surface(SketchKind::Hero).unwrap().width(), 200.0);
}

#[test]
fn resize_container_by_id() {
    let mut reg = registry(&ALL_READY);
    reg.mount();
    reg.stage_mut().containers.insert(SketchKind::StaticSquares, (100, 100));
    assert!(reg.resize_container("text-container-1").unwrap());
    assert!(!reg.resize_container("sidebar").unwrap());
}

#[test]
fn resize_all_resets_every_measurable_binding() {
    let mut reg = registry(&ALL_READY);
    reg.mount();
    assert_eq!(reg.resize_all(), 3);
    reg.stage_mut().containers.insert(SketchKind::Hero, (250, 150));
    reg.stage_mut().containers.insert(SketchKind::GrowingSquares, (0, 0));
    assert_eq!(reg.resize_all(), 2);
    assert_eq!(reg.surface(SketchKind::Hero).unwrap().width(), 250.0);
    assert_eq!(reg.surface(SketchKind::GrowingSquares).unwrap().width(), 160.0);
}

#[test]
fn unbound_resize_is_a_no_op() {
    let mut reg = registry(&[]);
    assert!(!reg.resize(SketchKind::Hero).unwrap());
}

#[test]
fn hero_reacts_to_clicks() {
    let mut reg = registry(&ALL_READY);
    reg.mount();
    assert!(reg.pointer_click(SketchKind::Hero, 100.0, 75.0).unwrap());
    assert!(!reg.pointer_click(SketchKind::Hero, 0.0, 75.0).unwrap());
    assert!(!reg.pointer_click(SketchKind::GrowingSquares, 50.0, 50.0).unwrap());
}

#[test]
fn click_without_binding_is_ignored() {
    let mut reg = registry(&[]);
    assert!(!reg.pointer_click(SketchKind::Hero, 10.0, 10.0).unwrap());
    assert!(!reg.pointer_moved(SketchKind::StaticSquares, None));
}

#[test]
fn pointer_moves_reach_bound_sketch() {
    let mut reg = registry(&ALL_READY);
    reg.mount();
    assert!(reg.pointer_moved(SketchKind::StaticSquares, Some(Vector2::new(90.0, 90.0))));
    assert_eq!(reg.frame(), 3);
}

// =============================================================
// Unmount
// =============================================================

#[test]
fn unmount_releases_everything() {
    let mut reg = registry(&ALL_READY);
    reg.mount();
    assert_eq!(reg.unmount(), 3);
    assert!(reg.is_empty());
    assert_eq!(reg.stage().released, SketchKind::ALL.to_vec());
    assert_eq!(reg.frame(), 0);
}

#[test]
fn unmount_twice_is_safe() {
    let mut reg = registry(&ALL_READY);
    reg.mount();
    reg.unmount();
    assert_eq!(reg.unmount(), 0);
    assert_eq!(reg.stage().released.len(), 3);
}

#[test]
fn remount_after_unmount_creates_fresh_surfaces() {
    let mut reg = registry(&ALL_READY);
    reg.mount();
    reg.unmount();
    let report = reg.mount();
    assert_eq!(report.bound.len(), 3);
    assert_eq!(reg.stage().created.len(), 6);
}
