//! The currently displayed image and the viewport showing it.
//!
//! An [`ImageSession`] owns the compute engine, the viewport controller and
//! the per-file adjustments. Whenever the displayed image changes identity
//! (a new file, or a rotation that changes its geometry) the viewport is
//! reset so pan and zoom from the previous image never leak into the next.

use std::time::Duration;

use thiserror::Error;
use web_time::Instant;

use crate::adjustments::{AdjustmentKey, Adjustments, AdjustmentsByFile};
use crate::config::ZoomConfig;
use crate::controller::ViewportController;
use crate::engine::{ComputeEngine, DecodeStage, DecodedImage, EngineError};
use crate::store::{Store, SubscriptionId};
use crate::throttle::ThrottledValue;

/// Errors from session operations.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The compute engine failed
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The operation needs an open file
    #[error("No file is open")]
    NoFileOpen,
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// Displayed image, its adjustments and its viewport.
#[derive(Debug)]
pub struct ImageSession<E> {
    engine: E,
    controller: ViewportController,
    adjustments: AdjustmentsByFile,
    file_name: Option<String>,
    image: Store<Option<DecodedImage>>,
    last_stage: Option<DecodeStage>,
}

impl<E: ComputeEngine> ImageSession<E> {
    pub fn new(engine: E, zoom_config: ZoomConfig) -> Self {
        Self {
            engine,
            controller: ViewportController::with_config(zoom_config),
            adjustments: AdjustmentsByFile::new(),
            file_name: None,
            image: Store::new(None),
            last_stage: None,
        }
    }

    pub fn controller(&self) -> &ViewportController {
        &self.controller
    }

    /// Mutable access for forwarding input events.
    pub fn controller_mut(&mut self) -> &mut ViewportController {
        &mut self.controller
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Latest developed image, if a file is open.
    pub fn image(&self) -> Option<&DecodedImage> {
        self.image.get().as_ref()
    }

    /// Last progress stage reported by the engine.
    pub fn last_stage(&self) -> Option<DecodeStage> {
        self.last_stage
    }

    /// Be notified whenever a newly developed image is published.
    pub fn subscribe_image<F>(&mut self, f: F) -> SubscriptionId
    where
        F: FnMut(&Option<DecodedImage>) + 'static,
    {
        self.image.subscribe(f)
    }

    pub fn unsubscribe_image(&mut self, id: SubscriptionId) -> bool {
        self.image.unsubscribe(id)
    }

    /// Adjustments of the open file.
    pub fn adjustments(&self) -> Option<Adjustments> {
        self.adjustments.adjustments(self.file_name.as_deref()?)
    }

    /// All adjustments recorded in this session.
    pub fn adjustments_by_file(&self) -> &AdjustmentsByFile {
        &self.adjustments
    }

    /// Decode and display a new file.
    ///
    /// Adjustments previously recorded for the same file name are reused.
    /// On failure the previously displayed image stays in place.
    pub fn open_file(&mut self, file_name: &str, bytes: &[u8]) -> Result<()> {
        log::info!("Opening {} ({} bytes)", file_name, bytes.len());
        let adjustments = self.adjustments.retrieve_or_initialise(file_name);

        let mut last_stage = None;
        let result = self
            .engine
            .decode(file_name, bytes, &adjustments, &mut |stage: DecodeStage| {
                log::debug!("{}: {}", file_name, stage.description());
                last_stage = Some(stage);
            });
        self.last_stage = last_stage;

        let image = match result {
            Ok(image) => image,
            Err(e) => {
                log::warn!("Failed to open {}: {}", file_name, e);
                return Err(e.into());
            }
        };

        log::info!("Decoded {}: {}x{}", file_name, image.width(), image.height());
        self.file_name = Some(file_name.to_string());
        self.controller.reset();
        self.image.set(Some(image));
        Ok(())
    }

    /// Rotate the open image; its geometry changes, so the viewport resets.
    pub fn rotate(&mut self) -> Result<()> {
        let adjustments = self.adjustments().ok_or(SessionError::NoFileOpen)?;
        let image = self.engine.rotate(&adjustments)?;
        log::debug!("Rotated image to {}x{}", image.width(), image.height());
        self.controller.reset();
        self.image.set(Some(image));
        Ok(())
    }

    /// Change one adjustment of the open file and re-develop it.
    ///
    /// The viewport is left alone: the image keeps its identity.
    pub fn set_adjustment(&mut self, key: AdjustmentKey, value: f32) -> Result<()> {
        self.record_adjustment(key, value)?;
        self.redevelop()
    }

    /// Throttled control for one adjustment of the open file.
    ///
    /// Drive it with [`ImageSession::throttled_adjustment`] and release
    /// held-back values with [`ImageSession::poll_adjustment`].
    pub fn adjustment_control(&self, key: AdjustmentKey, interval: Duration) -> Option<ThrottledValue<f32>> {
        let adjustments = self.adjustments()?;
        Some(ThrottledValue::with_interval(adjustments.get(key), interval))
    }

    /// Feed a slider value through a throttled control now.
    /// See [`ImageSession::throttled_adjustment_at`].
    pub fn throttled_adjustment(
        &mut self,
        control: &mut ThrottledValue<f32>,
        key: AdjustmentKey,
        value: f32,
    ) -> Result<bool> {
        self.throttled_adjustment_at(control, key, value, Instant::now())
    }

    /// Feed a slider value through a throttled control at `now`.
    ///
    /// The value is recorded for the open file straight away, throttled or
    /// not; the image is re-developed only when the control lets the value
    /// through. Returns whether it did.
    pub fn throttled_adjustment_at(
        &mut self,
        control: &mut ThrottledValue<f32>,
        key: AdjustmentKey,
        value: f32,
        now: Instant,
    ) -> Result<bool> {
        self.record_adjustment(key, value)?;
        if control.set_at(value, now).is_none() {
            return Ok(false);
        }
        self.redevelop()?;
        Ok(true)
    }

    /// Re-develop with the value a throttled control held back, once its
    /// interval has elapsed at `now`. Returns whether it did.
    pub fn poll_adjustment(&mut self, control: &mut ThrottledValue<f32>, now: Instant) -> Result<bool> {
        if control.poll_at(now).is_none() {
            return Ok(false);
        }
        self.redevelop()?;
        Ok(true)
    }

    fn record_adjustment(&mut self, key: AdjustmentKey, value: f32) -> Result<()> {
        let file_name = self.file_name.as_deref().ok_or(SessionError::NoFileOpen)?;
        self.adjustments.set(file_name, key, value);
        Ok(())
    }

    fn redevelop(&mut self) -> Result<()> {
        let adjustments = self.adjustments().ok_or(SessionError::NoFileOpen)?;
        let image = self.engine.process(&adjustments)?;
        self.image.set(Some(image));
        Ok(())
    }

    /// Apply the good-fit zoom for the open image.
    pub fn fit_to_height(&mut self, viewport_height: f32) {
        if let Some(height) = self.image().map(DecodedImage::height) {
            self.controller.fit_to_height(viewport_height, height);
        }
    }

    /// Stop displaying the current file.
    pub fn close(&mut self) {
        log::debug!("Closing current file");
        self.file_name = None;
        self.last_stage = None;
        self.controller.reset();
        self.image.set(None);
    }
}
