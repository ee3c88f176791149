use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{Instrument, trace, trace_span};

use super::error::SamplingError;
use super::{Event, Sender};
use crate::model::color::median_by_luminance;
use crate::model::{GenerationToken, Point, Rect, Rgb};
use crate::sys::shell::PixelSampler;

/// Horizontal probe positions as fractions of the monitor width.
pub const PROBE_FRACTIONS: [f64; 3] = [0.25, 0.50, 0.75];

/// Points just below the panel where the maximized window is sampled.
pub fn probe_points(monitor: Rect, panel_height: i32, margin: i32) -> [Point; 3] {
    let y = monitor.y + panel_height + margin;
    PROBE_FRACTIONS.map(|fraction| {
        let x = monitor.x + (f64::from(monitor.width) * fraction).round() as i32;
        Point::new(x, y)
    })
}

/// Runs sampling sequences off the controller task. Results come back as
/// [`Event::Sampled`].
pub struct ColorSampler {
    sampler: Arc<dyn PixelSampler>,
    events_tx: Sender,
}

impl ColorSampler {
    pub fn new(sampler: Arc<dyn PixelSampler>, events_tx: Sender) -> Self {
        Self { sampler, events_tx }
    }

    pub fn spawn(&self, token: GenerationToken, points: [Point; 3]) -> JoinHandle<()> {
        let sampler = self.sampler.clone();
        let events_tx = self.events_tx.clone();
        let span = trace_span!("sample", generation = token.generation().get());
        tokio::spawn(
            async move {
                match sample_median(&*sampler, &token, points).await {
                    Some(result) => events_tx.send(Event::Sampled {
                        generation: token.generation(),
                        result,
                    }),
                    None => trace!("superseded by a newer update"),
                }
            }
            .instrument(span),
        )
    }
}

/// Probes each point in order and returns the median color by luminance.
///
/// Resolves to `None` as soon as `token` goes stale; a stale sequence must not
/// produce anything.
pub async fn sample_median(
    sampler: &dyn PixelSampler,
    token: &GenerationToken,
    points: [Point; 3],
) -> Option<Result<Rgb, SamplingError>> {
    let mut samples = Vec::with_capacity(points.len());
    for at in points {
        if !token.is_current() {
            return None;
        }
        let picked = sampler.pick_color(at).await;
        if !token.is_current() {
            return None;
        }
        match picked {
            Ok(color) => samples.push(color.to_rgb()),
            Err(err) => return Some(Err(err)),
        }
    }
    median_by_luminance(&samples).map(Ok)
}
