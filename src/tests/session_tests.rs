//! Tests for the image session using an in-memory engine.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::config::ZoomConfig;
use crate::engine::Result as EngineResult;
use crate::{
    AdjustmentKey, Adjustments, ComputeEngine, DecodeStage, DecodedImage, EngineError, ImageSession,
    PointerEvent, SessionError, ViewportTransform, WheelEvent,
};

/// Engine producing flat-colour images whose byte value encodes the exposure.
#[derive(Debug, Default)]
struct FakeEngine {
    size: Option<(u32, u32)>,
    processed: Vec<Adjustments>,
}

impl FakeEngine {
    fn develop(&self, adjustments: &Adjustments) -> EngineResult<DecodedImage> {
        let (width, height) = self.size.ok_or(EngineError::NoImage)?;
        let value = (128.0 + adjustments.exposure * 32.0).clamp(0.0, 255.0) as u8;
        DecodedImage::new(width, height, vec![value; (width * height * 4) as usize])
    }
}

impl ComputeEngine for FakeEngine {
    fn decode(
        &mut self,
        file_name: &str,
        bytes: &[u8],
        adjustments: &Adjustments,
        progress: &mut dyn FnMut(DecodeStage),
    ) -> EngineResult<DecodedImage> {
        progress(DecodeStage::ObtainingRaw);
        // First two bytes carry the dimensions
        let [width, height, ..] = bytes else {
            return Err(EngineError::decode(file_name, "truncated header"));
        };
        for stage in &DecodeStage::all()[1..] {
            progress(*stage);
        }
        self.size = Some((u32::from(*width), u32::from(*height)));
        self.develop(adjustments)
    }

    fn process(&mut self, adjustments: &Adjustments) -> EngineResult<DecodedImage> {
        self.processed.push(*adjustments);
        self.develop(adjustments)
    }

    fn rotate(&mut self, adjustments: &Adjustments) -> EngineResult<DecodedImage> {
        let (width, height) = self.size.ok_or(EngineError::NoImage)?;
        self.size = Some((height, width));
        self.develop(adjustments)
    }
}

fn session() -> ImageSession<FakeEngine> {
    let mut session = ImageSession::new(FakeEngine::default(), ZoomConfig::default());
    session.controller_mut().set_anchor_offset(0.0, 0.0);
    session
}

/// Pan and zoom the viewport away from its initial state.
fn disturb_viewport(session: &mut ImageSession<FakeEngine>) {
    let controller = session.controller_mut();
    controller.on_pointer_down(&PointerEvent::client(0.0, 0.0));
    controller.on_pointer_move(&PointerEvent::client(30.0, 40.0));
    controller.on_wheel(&WheelEvent {
        delta_y: -1.0,
        pointer: PointerEvent::client(10.0, 10.0),
    });
}

fn is_initial(transform: ViewportTransform) -> bool {
    (transform.pan_x, transform.pan_y, transform.zoom) == (0.0, 0.0, 1.0)
}

#[test]
fn test_open_file_publishes_image_and_resets_viewport() {
    let mut session = session();
    let published = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&published);
    session.subscribe_image(move |image: &Option<DecodedImage>| {
        assert!(image.is_some());
        *sink.borrow_mut() += 1;
    });

    session.open_file("first.cr2", &[4, 2]).unwrap();
    disturb_viewport(&mut session);
    assert!(!is_initial(session.controller().transform()));

    session.open_file("second.nef", &[3, 3]).unwrap();

    assert_eq!(session.file_name(), Some("second.nef"));
    assert_eq!(session.image().map(|i| (i.width(), i.height())), Some((3, 3)));
    assert_eq!(session.last_stage(), Some(DecodeStage::Complete));
    assert!(is_initial(session.controller().transform()));
    assert!(!session.controller().is_dragging());
    assert_eq!(session.controller().transform().anchor_offset.map(|a| (a.x, a.y)), Some((0.0, 0.0)));
    assert_eq!(*published.borrow(), 2);
}

#[test]
fn test_failed_open_keeps_previous_image() {
    let mut session = session();
    session.open_file("good.cr2", &[2, 2]).unwrap();
    disturb_viewport(&mut session);
    let before = session.controller().transform();

    let err = session.open_file("broken.cr2", &[]).unwrap_err();
    assert!(matches!(err, SessionError::Engine(EngineError::Decode { .. })));
    assert_eq!(session.file_name(), Some("good.cr2"));
    assert_eq!(session.last_stage(), Some(DecodeStage::ObtainingRaw));
    assert_eq!(session.controller().transform(), before);
}

#[test]
fn test_rotate_swaps_geometry_and_resets_viewport() {
    let mut session = session();
    session.open_file("wide.cr2", &[6, 2]).unwrap();
    disturb_viewport(&mut session);

    session.rotate().unwrap();

    assert_eq!(session.image().map(|i| (i.width(), i.height())), Some((2, 6)));
    assert!(is_initial(session.controller().transform()));
}

#[test]
fn test_adjustment_reprocesses_without_resetting_viewport() {
    let mut session = session();
    session.open_file("shot.cr2", &[1, 1]).unwrap();
    disturb_viewport(&mut session);
    let before = session.controller().transform();

    session.set_adjustment(AdjustmentKey::Exposure, 2.0).unwrap();

    assert_eq!(session.adjustments().map(|a| a.exposure), Some(2.0));
    assert_eq!(session.engine().processed, vec![Adjustments { exposure: 2.0 }]);
    assert_eq!(session.image().map(|i| i.rgba()[0]), Some(192));
    assert_eq!(session.controller().transform(), before);
}

#[test]
fn test_adjustments_survive_reopening_a_file() {
    let mut session = session();
    session.open_file("a.cr2", &[1, 1]).unwrap();
    session.set_adjustment(AdjustmentKey::Exposure, -1.0).unwrap();
    session.open_file("b.cr2", &[1, 1]).unwrap();
    assert_eq!(session.adjustments().map(|a| a.exposure), Some(0.0));

    session.open_file("a.cr2", &[1, 1]).unwrap();
    assert_eq!(session.adjustments().map(|a| a.exposure), Some(-1.0));
    assert_eq!(session.image().map(|i| i.rgba()[0]), Some(96));
    assert_eq!(session.adjustments_by_file().len(), 2);
}

#[test]
fn test_operations_need_an_open_file() {
    let mut session = session();
    assert!(matches!(session.rotate(), Err(SessionError::NoFileOpen)));
    assert!(matches!(
        session.set_adjustment(AdjustmentKey::Exposure, 1.0),
        Err(SessionError::NoFileOpen)
    ));
    assert!(session.adjustment_control(AdjustmentKey::Exposure, Duration::from_millis(10)).is_none());
}

#[test]
fn test_throttled_control_drives_adjustments() {
    let mut session = session();
    session.open_file("slider.cr2", &[1, 1]).unwrap();
    let mut control = session
        .adjustment_control(AdjustmentKey::Exposure, Duration::from_secs(3600))
        .unwrap();

    let start = web_time::Instant::now();
    let mut developed = Vec::new();
    for (i, value) in [0.25_f32, 0.5, 0.75].into_iter().enumerate() {
        let now = start + Duration::from_millis(i as u64 * 10);
        developed.push(
            session
                .throttled_adjustment_at(&mut control, AdjustmentKey::Exposure, value, now)
                .unwrap(),
        );
    }
    assert_eq!(developed, vec![true, false, false]);

    // Held-back values are recorded even though the image was not re-developed
    assert_eq!(session.adjustments().map(|a| a.exposure), Some(0.75));
    assert_eq!(session.adjustments_by_file().get("slider.cr2", AdjustmentKey::Exposure), Some(0.75));
    assert_eq!(session.image().map(|i| i.rgba()[0]), Some(136));

    assert!(!session.poll_adjustment(&mut control, start + Duration::from_secs(1)).unwrap());
    assert!(session.poll_adjustment(&mut control, start + Duration::from_secs(3600)).unwrap());

    let processed: Vec<f32> = session.engine().processed.iter().map(|a| a.exposure).collect();
    assert_eq!(processed, vec![0.25, 0.75]);
    assert_eq!(session.image().map(|i| i.rgba()[0]), Some(152));
}

#[test]
fn test_held_back_value_survives_switching_files() {
    let mut session = session();
    session.open_file("a.cr2", &[1, 1]).unwrap();
    let mut control = session
        .adjustment_control(AdjustmentKey::Exposure, Duration::from_secs(3600))
        .unwrap();

    let start = web_time::Instant::now();
    session
        .throttled_adjustment_at(&mut control, AdjustmentKey::Exposure, 1.0, start)
        .unwrap();
    session
        .throttled_adjustment_at(&mut control, AdjustmentKey::Exposure, 2.0, start + Duration::from_millis(5))
        .unwrap();

    // Never polled before switching away
    session.open_file("b.cr2", &[1, 1]).unwrap();
    session.open_file("a.cr2", &[1, 1]).unwrap();
    assert_eq!(session.adjustments().map(|a| a.exposure), Some(2.0));
    assert_eq!(session.image().map(|i| i.rgba()[0]), Some(192));
}

#[test]
fn test_fit_to_height_uses_image_height() {
    let mut session = session();
    session.open_file("tall.cr2", &[10, 200]).unwrap();
    session.fit_to_height(500.0);

    let zoom = session.controller().transform().zoom;
    assert!((zoom - 1.5).abs() < 1e-5);
}

#[test]
fn test_close_clears_image() {
    let mut session = session();
    session.open_file("a.cr2", &[1, 1]).unwrap();
    disturb_viewport(&mut session);
    session.close();

    assert!(session.image().is_none());
    assert!(session.file_name().is_none());
    assert!(is_initial(session.controller().transform()));
}
