//! Per-track centre histories for video annotation, and detection-to-track matching.

use crate::geometry::iou;
use crate::shapes::{Shape, ShapeColor};
use kurbo::{Point, Rect};
use std::collections::BTreeMap;

/// Default number of past frames a trajectory shows.
pub const DEFAULT_TRAJECTORY_LENGTH: usize = 30;

/// Weight of the new centre when smoothing against the previous frame.
const SMOOTHING: f64 = 0.5;

/// Black marker every this many samples along a trajectory.
const DOT_INTERVAL: usize = 10;

/// Which trajectory overlays to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrajectoryFlags {
    pub traj: bool,
    pub mask: bool,
}

#[derive(Debug, Clone, Default)]
struct Track {
    centers: BTreeMap<usize, Point>,
    color: Option<ShapeColor>,
}

/// One drawn piece of a trajectory polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectorySegment {
    pub from: Point,
    pub to: Point,
    pub width: f64,
}

/// Everything needed to draw one track's trail.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryPath {
    pub group_id: u32,
    pub color: ShapeColor,
    pub segments: Vec<TrajectorySegment>,
    pub dots: Vec<Point>,
}

/// Centre histories keyed by track (group) id.
#[derive(Debug, Clone)]
pub struct Trajectories {
    /// How many frames back a trail reaches.
    pub length: usize,
    /// Opacity of mask fills.
    pub mask_alpha: f64,
    pub flags: TrajectoryFlags,
    tracks: BTreeMap<u32, Track>,
}

impl Default for Trajectories {
    fn default() -> Self {
        Self {
            length: DEFAULT_TRAJECTORY_LENGTH,
            mask_alpha: 0.3,
            flags: TrajectoryFlags::default(),
            tracks: BTreeMap::new(),
        }
    }
}

impl Trajectories {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    pub fn track_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.tracks.keys().copied()
    }

    pub fn color(&self, group_id: u32) -> Option<ShapeColor> {
        self.tracks.get(&group_id).and_then(|t| t.color)
    }

    pub fn center(&self, group_id: u32, frame: usize) -> Option<Point> {
        self.tracks.get(&group_id)?.centers.get(&frame).copied()
    }

    /// Record the centre of a box for a track at a frame.
    ///
    /// When the previous frame has a centre, the stored value is averaged with it and
    /// truncated to whole pixels.
    pub fn record(&mut self, frame: usize, group_id: u32, bbox: Rect, color: ShapeColor) {
        let center = bbox.center();
        let mut center = Point::new(center.x.trunc(), center.y.trunc());
        let track = self.tracks.entry(group_id).or_default();
        let previous = frame
            .checked_sub(1)
            .and_then(|f| track.centers.get(&f).copied());
        if let Some(prev) = previous {
            center = Point::new(
                (SMOOTHING * center.x + (1.0 - SMOOTHING) * prev.x).trunc(),
                (SMOOTHING * center.y + (1.0 - SMOOTHING) * prev.y).trunc(),
            );
        }
        track.centers.insert(frame, center);
        track.color = Some(color);
    }

    /// Record every tracked shape of a frame.
    pub fn record_shapes<'a>(&mut self, frame: usize, shapes: impl IntoIterator<Item = &'a Shape>) {
        for shape in shapes {
            if let Some(group_id) = shape.group_id {
                self.record(frame, group_id, shape.bounding_rect(), shape.colors.vertex_fill);
            }
        }
    }

    /// Forget a track from `frame` onwards.
    pub fn truncate(&mut self, group_id: u32, frame: usize) {
        if let Some(track) = self.tracks.get_mut(&group_id) {
            track.centers.retain(|&f, _| f < frame);
        }
    }

    /// Trail of one track ending at `frame`.
    ///
    /// Segments nearer the current frame are drawn thicker. Walking back stops at the first
    /// frame without a recorded centre.
    pub fn path(&self, group_id: u32, frame: usize) -> Option<TrajectoryPath> {
        let track = self.tracks.get(&group_id)?;
        let color = track.color?;
        let start = (frame + 1).saturating_sub(self.length);
        let window: Vec<Option<Point>> = (start..=frame)
            .map(|f| track.centers.get(&f).copied())
            .collect();
        let n = window.len();
        let mut segments = Vec::new();
        let mut dots = Vec::new();
        for i in (1..n).rev() {
            let (Some(from), Some(to)) = (window[i - 1], window[i]) else {
                break;
            };
            let age = n - i;
            let width = 3.0
                + f64::from(u8::from(age <= 10))
                + f64::from(u8::from(age <= 20))
                + f64::from(u8::from(age <= 30));
            segments.push(TrajectorySegment { from, to, width });
            if (n - 1 - i) % DOT_INTERVAL == 0 {
                dots.push(to);
            }
        }
        Some(TrajectoryPath {
            group_id,
            color,
            segments,
            dots,
        })
    }

    /// Trails for every tracked shape on the current frame.
    pub fn paths<'a>(
        &self,
        frame: usize,
        shapes: impl IntoIterator<Item = &'a Shape>,
    ) -> Vec<TrajectoryPath> {
        shapes
            .into_iter()
            .filter_map(|s| s.group_id)
            .filter_map(|id| self.path(id, frame))
            .collect()
    }
}

/// Result of [`match_detections`]: detection index paired with a track id, and the
/// detections left over.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectionMatches {
    pub matched: Vec<(usize, u32)>,
    pub unmatched: Vec<usize>,
}

/// Assign each detection to the remaining track with the greatest IoU above `threshold`.
/// A track is consumed by its first match.
pub fn match_detections(
    detections: &[Rect],
    tracks: &[(Rect, u32)],
    threshold: f64,
) -> DetectionMatches {
    let mut available: Vec<(Rect, u32)> = tracks.to_vec();
    let mut result = DetectionMatches::default();
    for (index, detection) in detections.iter().enumerate() {
        let mut best: Option<(usize, f64)> = None;
        for (t, (bbox, _)) in available.iter().enumerate() {
            let overlap = iou(*detection, *bbox);
            if overlap > threshold && best.is_none_or(|(_, b)| overlap > b) {
                best = Some((t, overlap));
            }
        }
        match best {
            Some((t, _)) => {
                let (_, track_id) = available.remove(t);
                result.matched.push((index, track_id));
            }
            None => result.unmatched.push(index),
        }
    }
    result
}
