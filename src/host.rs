//! Container registry: which sketch is bound to which page container.
//!
//! The registry holds every decision the page lifecycle needs (idempotent
//! mount, pending containers, per-sketch fault isolation, teardown) and
//! reaches the page only through the [`Stage`] trait, so it runs natively in
//! tests with a fake stage and in the browser with [`crate::web::WebStage`].

#[cfg(test)]
#[path = "host_test.rs"]
mod host_test;

use sketches::{Sketch, SketchConfig, SketchKind, Surface, Vector2};

use crate::error::HostError;

/// The page-side half of mounting: measures containers and creates or
/// removes their drawing surfaces.
pub trait Stage {
    type Surface: Surface;

    /// Pixel size of the container for `kind`.
    ///
    /// # Errors
    ///
    /// [`HostError::MissingContainer`] or [`HostError::ZeroSizedContainer`]
    /// while the container is not ready; anything else is a hard failure.
    fn probe(&self, kind: SketchKind) -> Result<(u32, u32), HostError>;

    /// Create a surface of the given size inside the container for `kind`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot provide a surface.
    fn create_surface(&mut self, kind: SketchKind, width: u32, height: u32) -> Result<Self::Surface, HostError>;

    /// Detach a surface from the page.
    fn release_surface(&mut self, kind: SketchKind, surface: Self::Surface);

    /// Whether `surface` is still part of the page. A surface whose container
    /// was replaced reports `false` and is rebound on the next mount.
    fn is_attached(&self, surface: &Self::Surface) -> bool;
}

/// Outcome of one [`Registry::mount`] pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountReport {
    /// Bound during this pass.
    pub bound: Vec<SketchKind>,
    /// Containers not ready yet; worth retrying.
    pub pending: Vec<SketchKind>,
    /// Containers that failed for a reason retrying will not fix.
    pub failed: Vec<SketchKind>,
}

impl MountReport {
    /// Whether nothing is left to retry.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.pending.is_empty()
    }
}

struct Binding<T> {
    kind: SketchKind,
    sketch: Box<dyn Sketch>,
    surface: T,
    /// Set after a failed frame; cleared by a successful resize.
    faulted: bool,
}

pub struct Registry<S: Stage> {
    stage: S,
    config: SketchConfig,
    seed: u64,
    bindings: Vec<Binding<S::Surface>>,
}

impl<S: Stage> Registry<S> {
    /// `seed` is used when the config does not pin one.
    #[must_use]
    pub fn new(stage: S, config: SketchConfig, seed: u64) -> Self {
        let seed = config.seed.unwrap_or(seed);
        Self { stage, config, seed, bindings: Vec::new() }
    }

    #[must_use]
    pub fn stage(&self) -> &S {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut S {
        &mut self.stage
    }

    #[must_use]
    pub fn is_bound(&self, kind: SketchKind) -> bool {
        self.bindings.iter().any(|b| b.kind == kind)
    }

    #[must_use]
    pub fn bound_kinds(&self) -> Vec<SketchKind> {
        self.bindings.iter().map(|b| b.kind).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    #[must_use]
    pub fn surface(&self, kind: SketchKind) -> Option<&S::Surface> {
        self.bindings.iter().find(|b| b.kind == kind).map(|b| &b.surface)
    }

    /// Bind every ready, unbound container. Bound containers whose surface
    /// is still attached are left untouched; detached ones are released and
    /// bound again.
    pub fn mount(&mut self) -> MountReport {
        let mut report = MountReport::default();
        for kind in SketchKind::ALL {
            if let Some(index) = self.bindings.iter().position(|b| b.kind == kind) {
                if self.stage.is_attached(&self.bindings[index].surface) {
                    continue;
                }
                let stale = self.bindings.remove(index);
                self.stage.release_surface(kind, stale.surface);
                log::info!("{kind}: surface detached, rebinding");
            }
            match self.bind(kind) {
                Ok(()) => {
                    log::info!("{kind}: mounted");
                    report.bound.push(kind);
                }
                Err(err) if err.is_pending() => {
                    log::debug!("{kind}: not ready: {err}");
                    report.pending.push(kind);
                }
                Err(err) => {
                    log::warn!("{kind}: mount failed: {err}");
                    report.failed.push(kind);
                }
            }
        }
        report
    }

    fn bind(&mut self, kind: SketchKind) -> Result<(), HostError> {
        let (width, height) = self.stage.probe(kind)?;
        let mut surface = self.stage.create_surface(kind, width, height)?;
        let mut sketch = kind.build(&self.config, self.seed, width, height);
        if let Err(err) = sketch.setup(&mut surface) {
            self.stage.release_surface(kind, surface);
            return Err(err.into());
        }
        self.bindings.push(Binding { kind, sketch, surface, faulted: false });
        Ok(())
    }

    /// Advance every healthy sketch by one frame. A sketch whose frame fails
    /// is parked until its next resize; the others keep running.
    pub fn frame(&mut self) -> usize {
        let mut stepped = 0;
        for binding in self.bindings.iter_mut().filter(|b| !b.faulted) {
            match binding.sketch.frame(&mut binding.surface) {
                Ok(()) => stepped += 1,
                Err(err) => {
                    log::warn!("{}: frame failed, pausing: {err}", binding.kind);
                    binding.faulted = true;
                }
            }
        }
        stepped
    }

    /// Re-measure `kind`'s container and resize its sketch, which resets it
    /// even when the size is unchanged. Returns whether `kind` was bound.
    ///
    /// # Errors
    ///
    /// Returns the probe error when the container vanished or collapsed, or a
    /// surface error from the sketch's resize.
    pub fn resize(&mut self, kind: SketchKind) -> Result<bool, HostError> {
        let Some(index) = self.bindings.iter().position(|b| b.kind == kind) else {
            return Ok(false);
        };
        let size = self.stage.probe(kind)?;
        let binding = &mut self.bindings[index];
        binding.sketch.resize(&mut binding.surface, size.0, size.1)?;
        binding.faulted = false;
        log::debug!("{kind}: resized to {}x{}", size.0, size.1);
        Ok(true)
    }

    /// [`Registry::resize`] for a container id; unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// See [`Registry::resize`].
    pub fn resize_container(&mut self, id: &str) -> Result<bool, HostError> {
        match SketchKind::from_container_id(id) {
            Some(kind) => self.resize(kind),
            None => {
                log::debug!("resize for unknown container `{id}` ignored");
                Ok(false)
            }
        }
    }

    /// Resize every bound sketch, logging failures. Returns how many were
    /// reset.
    pub fn resize_all(&mut self) -> usize {
        let mut resized = 0;
        for kind in self.bound_kinds() {
            match self.resize(kind) {
                Ok(true) => resized += 1,
                Ok(false) => {}
                Err(err) => log::debug!("{kind}: resize skipped: {err}"),
            }
        }
        resized
    }

    /// Forward a click in `kind`'s surface coordinates. Returns whether the
    /// sketch reacted.
    ///
    /// # Errors
    ///
    /// Propagates surface failures from the sketch.
    pub fn pointer_click(&mut self, kind: SketchKind, x: f64, y: f64) -> Result<bool, HostError> {
        let Some(binding) = self.bindings.iter_mut().find(|b| b.kind == kind) else {
            return Ok(false);
        };
        Ok(binding.sketch.pointer_click(&mut binding.surface, x, y)?)
    }

    /// Forward a pointer position (or its absence) to `kind`'s sketch.
    pub fn pointer_moved(&mut self, kind: SketchKind, position: Option<Vector2>) -> bool {
        let Some(binding) = self.bindings.iter_mut().find(|b| b.kind == kind) else {
            return false;
        };
        binding.sketch.pointer_moved(position);
        true
    }

    /// Release every surface. Returns how many were bound.
    pub fn unmount(&mut self) -> usize {
        let count = self.bindings.len();
        for binding in self.bindings.drain(..) {
            self.stage.release_surface(binding.kind, binding.surface);
            log::info!("{}: unmounted", binding.kind);
        }
        count
    }
}
