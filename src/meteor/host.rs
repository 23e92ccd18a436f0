use std::collections::BTreeMap;

use crate::foundation::error::StarlitResult;
use crate::meteor::keyframes::CurveCatalog;
use crate::meteor::scheduler::{MeteorId, MeteorInstance};

/// Receiver of motion curves and meteor lifecycle calls.
///
/// The host owns the visual elements: it applies a curve by name for an instance's duration and
/// removes the element on `retire`.
pub trait AnimationHost {
    /// Replace the installed curve set. Called once per diagonal.
    fn install_curves(&mut self, catalog: &CurveCatalog) -> StarlitResult<()>;
    /// Start animating a new instance along its named curve.
    fn spawn(&mut self, meteor: &MeteorInstance) -> StarlitResult<()>;
    /// Remove an instance's element. Unknown ids are ignored.
    fn retire(&mut self, id: MeteorId) -> StarlitResult<()>;
}

/// In-memory host for tests and headless runs.
#[derive(Debug, Default)]
pub struct RecordingHost {
    /// Number of `install_curves` calls.
    pub installs: usize,
    /// Curve names from the most recent install.
    pub curve_names: Vec<String>,
    /// Spawned and not yet retired.
    pub live: BTreeMap<MeteorId, MeteorInstance>,
    /// Total `spawn` calls.
    pub spawned: usize,
    /// Total retirements of live instances.
    pub retired: usize,
}

impl RecordingHost {
    /// Empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live instances.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl AnimationHost for RecordingHost {
    fn install_curves(&mut self, catalog: &CurveCatalog) -> StarlitResult<()> {
        self.installs += 1;
        self.curve_names = catalog.curves.iter().map(|c| c.name.clone()).collect();
        Ok(())
    }

    fn spawn(&mut self, meteor: &MeteorInstance) -> StarlitResult<()> {
        self.spawned += 1;
        self.live.insert(meteor.id, *meteor);
        Ok(())
    }

    fn retire(&mut self, id: MeteorId) -> StarlitResult<()> {
        if self.live.remove(&id).is_some() {
            self.retired += 1;
        }
        Ok(())
    }
}

impl<H: AnimationHost + ?Sized> AnimationHost for &mut H {
    fn install_curves(&mut self, catalog: &CurveCatalog) -> StarlitResult<()> {
        (**self).install_curves(catalog)
    }

    fn spawn(&mut self, meteor: &MeteorInstance) -> StarlitResult<()> {
        (**self).spawn(meteor)
    }

    fn retire(&mut self, id: MeteorId) -> StarlitResult<()> {
        (**self).retire(id)
    }
}
