// Copyright 2026 the Backdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated camera preview that exercises the background layer end to end.
//!
//! A capture thread publishes synthetic frames into a [`FrameSlot`]. The
//! render loop draws an [`OverlayStack`] (camera background plus a marker
//! standing in for a skeleton overlay) into a [`Pixmap`] once per simulated
//! refresh. Halfway through, the device rotates to landscape; later the
//! front camera is selected and the preview mirrors.
//!
//! Run with `RUST_LOG=backdrop=debug` to see transform recomputation, or
//! `RUST_LOG=trace` for every blit.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use backdrop_core::error::DrawError;
use backdrop_core::geometry::{ImageSourceInfo, LensFacing, Rotation};
use backdrop_core::image::{ImageError, Rgba8, SourceImage};
use backdrop_core::layer::{CameraBackground, OverlayLayer, OverlayStack};
use backdrop_core::pixmap::Pixmap;
use backdrop_core::provider::{FitPolicy, FitTransform};
use backdrop_core::slot::FrameSlot;
use backdrop_core::surface::Surface;
use backdrop_core::trace::{
    BlitEvent, DrawFailedEvent, FramePublishedEvent, StackSummary, TraceSink, Tracer,
    TransformEvent,
};
use backdrop_debug::log_sink::LogSink;
use backdrop_debug::pretty::PrettyPrintSink;
use kurbo::Affine;

const REFRESH_COUNT: u32 = 60;
const ROTATE_AT: u32 = 20;
const FRONT_CAMERA_AT: u32 = 40;
/// Raw sensor size; the sensor is mounted in landscape.
const SENSOR: (u32, u32) = (640, 480);

fn main() {
    env_logger::init();

    let slot = Arc::new(FrameSlot::new());
    let portrait = Arc::new(AtomicBool::new(true));
    let running = Arc::new(AtomicBool::new(true));
    let capture = spawn_capture(Arc::clone(&slot), Arc::clone(&portrait), Arc::clone(&running));

    let pending_info = Rc::new(Cell::new(Some(ImageSourceInfo::from_capture(
        SENSOR.0,
        SENSOR.1,
        Rotation::Deg90,
        LensFacing::Back,
    ))));

    let mut stack = OverlayStack::new();
    stack.push(LiveBackground::new(
        Arc::clone(&slot),
        Rc::clone(&pending_info),
    ));
    match Marker::new() {
        Ok(marker) => stack.push(marker),
        Err(err) => log::error!("could not build marker: {err}"),
    }

    let mut pixmap = Pixmap::new(1080, 1920);
    let mut sinks = Fanout {
        pretty: PrettyPrintSink::stderr(),
        log: LogSink::new(),
        verbose: std::env::var_os("BACKDROP_PRETTY").is_some(),
    };

    for refresh in 0..REFRESH_COUNT {
        if refresh == ROTATE_AT {
            log::info!("rotating device to landscape");
            portrait.store(false, Ordering::Release);
            pixmap.resize(1920, 1080);
            pending_info.set(Some(ImageSourceInfo::from_capture(
                SENSOR.0,
                SENSOR.1,
                Rotation::Deg0,
                LensFacing::Back,
            )));
        }
        if refresh == FRONT_CAMERA_AT {
            log::info!("switching to the front camera");
            pending_info.set(Some(ImageSourceInfo::from_capture(
                SENSOR.0,
                SENSOR.1,
                Rotation::Deg0,
                LensFacing::Front,
            )));
        }

        pixmap.fill(Rgba8::BLACK);
        let report = stack.draw_traced(&mut pixmap, &mut Tracer::new(&mut sinks));
        if !report.is_clean() {
            log::debug!("refresh {refresh}: {} layer(s) skipped", report.failed.len());
        }
        thread::sleep(Duration::from_millis(4));
    }

    running.store(false, Ordering::Release);
    if capture.join().is_err() {
        log::error!("capture thread panicked");
    }

    let lit = pixmap.pixels().iter().filter(|p| **p != Rgba8::BLACK).count();
    log::info!(
        "done: {} frames published, {lit} of {} pixels painted",
        slot.generation(),
        pixmap.pixels().len()
    );
}

/// Publishes upright synthetic frames until `running` is cleared.
fn spawn_capture(
    slot: Arc<FrameSlot>,
    portrait: Arc<AtomicBool>,
    running: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut sink = LogSink::new();
        let mut phase = 0_u32;
        while running.load(Ordering::Acquire) {
            let rotation = if portrait.load(Ordering::Acquire) {
                Rotation::Deg90
            } else {
                Rotation::Deg0
            };
            let info =
                ImageSourceInfo::from_capture(SENSOR.0, SENSOR.1, rotation, LensFacing::Back);
            match synthetic_frame(info, phase) {
                Ok(frame) => {
                    slot.publish_traced(frame, &mut Tracer::new(&mut sink));
                }
                Err(err) => log::error!("could not build frame: {err}"),
            }
            phase = phase.wrapping_add(1);
            thread::sleep(Duration::from_millis(8));
        }
    })
}

/// A gradient with a bright bar sweeping left to right.
fn synthetic_frame(info: ImageSourceInfo, phase: u32) -> Result<SourceImage, ImageError> {
    let size = info.size;
    let bar = phase.wrapping_mul(7) % size.width.max(1);
    SourceImage::from_fn(size.width, size.height, |x, y| {
        if x.abs_diff(bar) < 4 {
            Rgba8::WHITE
        } else {
            let shade =
                |v: u32, span: u32| u8::try_from(v * 255 / span.max(1)).unwrap_or(u8::MAX);
            Rgba8::opaque(shade(x, size.width), shade(y, size.height), 96)
        }
    })
}

/// Camera background that picks up new frames and source info on each draw.
struct LiveBackground {
    slot: Arc<FrameSlot>,
    seen: u64,
    pending_info: Rc<Cell<Option<ImageSourceInfo>>>,
    inner: Option<CameraBackground<FitTransform>>,
}

impl LiveBackground {
    fn new(slot: Arc<FrameSlot>, pending_info: Rc<Cell<Option<ImageSourceInfo>>>) -> Self {
        Self {
            slot,
            seen: 0,
            pending_info,
            inner: None,
        }
    }

    fn refresh(&mut self) {
        if let Some((generation, frame)) = self.slot.latest_since(self.seen) {
            self.seen = generation;
            match &mut self.inner {
                Some(layer) => {
                    layer.set_image(frame);
                }
                None => {
                    let info = self
                        .pending_info
                        .get()
                        .unwrap_or(ImageSourceInfo::new(frame.size(), false));
                    self.inner = Some(CameraBackground::new(
                        FitTransform::for_source(FitPolicy::CropToFill, &info),
                        frame,
                    ));
                }
            }
        }
        if let Some(layer) = &mut self.inner
            && let Some(info) = self.pending_info.take()
        {
            layer.blitter_mut().provider_mut().mirrored = info.mirrored;
        }
    }
}

impl OverlayLayer for LiveBackground {
    fn draw(&mut self, surface: &mut dyn Surface) -> Result<(), DrawError> {
        self.draw_traced(surface, &mut Tracer::none())
    }

    fn draw_traced(
        &mut self,
        surface: &mut dyn Surface,
        tracer: &mut Tracer<'_>,
    ) -> Result<(), DrawError> {
        self.refresh();
        match &mut self.inner {
            Some(layer) => layer.draw_traced(surface, tracer),
            // Nothing captured yet; leave the surface as the host cleared it.
            None => Ok(()),
        }
    }
}

/// A small square standing in for a detection overlay.
struct Marker {
    image: SourceImage,
}

impl Marker {
    fn new() -> Result<Self, ImageError> {
        let image = SourceImage::filled(24, 24, Rgba8::opaque(255, 64, 64))?;
        Ok(Self { image })
    }
}

impl OverlayLayer for Marker {
    fn draw(&mut self, surface: &mut dyn Surface) -> Result<(), DrawError> {
        surface.ensure_drawable()?;
        let center = surface.geometry().to_size() / 2.0;
        let origin = (center.width - 12.0, center.height - 12.0);
        surface.blit(&self.image, Affine::translate(origin))?;
        Ok(())
    }
}

/// Sends every event to the log, and to stderr when `BACKDROP_PRETTY` is set.
struct Fanout {
    pretty: PrettyPrintSink,
    log: LogSink,
    verbose: bool,
}

impl TraceSink for Fanout {
    fn on_transform(&mut self, e: &TransformEvent) {
        self.log.on_transform(e);
        if self.verbose {
            self.pretty.on_transform(e);
        }
    }

    fn on_blit(&mut self, e: &BlitEvent) {
        self.log.on_blit(e);
        if self.verbose {
            self.pretty.on_blit(e);
        }
    }

    fn on_draw_failed(&mut self, e: &DrawFailedEvent) {
        self.log.on_draw_failed(e);
        if self.verbose {
            self.pretty.on_draw_failed(e);
        }
    }

    fn on_stack_summary(&mut self, s: &StackSummary) {
        self.log.on_stack_summary(s);
        if self.verbose {
            self.pretty.on_stack_summary(s);
        }
    }

    fn on_frame_published(&mut self, e: &FramePublishedEvent) {
        self.log.on_frame_published(e);
        if self.verbose {
            self.pretty.on_frame_published(e);
        }
    }
}
