//! Geometry helpers: distances, image-boundary projection, polygon resampling,
//! point-set alignment and box overlap.

use kurbo::{Point, Rect, Vec2};
use std::cmp::Ordering;

/// Seed used by [`resample_polygon`] when the caller does not supply one.
pub const DEFAULT_RESAMPLE_SEED: u32 = 0x9E37_79B9;

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    (b - a).hypot()
}

/// Midpoint of a segment.
pub fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    distance(point, proj)
}

/// Clamp a point into a rectangle.
pub fn clamp_to_rect(point: Point, rect: Rect) -> Point {
    Point::new(point.x.clamp(rect.x0, rect.x1), point.y.clamp(rect.y0, rect.y1))
}

/// Corners of a rectangle in clockwise order starting top-left.
///
/// Edge `i` runs from corner `i` to corner `(i + 1) % 4`, giving top, right, bottom, left.
fn clockwise_corners(rect: Rect) -> [Point; 4] {
    [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
    ]
}

/// Project the segment `inside → outside` onto the boundary of `rect`.
///
/// `inside` is clamped into the rectangle first. Every rectangle edge is intersected with the
/// segment (parallel or coincident edges are skipped); the intersection closest to `outside`
/// wins. At a corner both edges meet the segment at the same point; the tie goes to the edge
/// whose outward side holds `outside`, then to the earlier edge in clockwise order from the
/// top. When the winning
/// intersection is the inside point itself (it already sits on that edge), the result slides
/// along the edge towards `outside` instead.
///
/// The returned point always lies on one of the four edges.
pub fn boundary_intersection(inside: Point, outside: Point, rect: Rect) -> Point {
    let corners = clockwise_corners(rect);
    let p1 = clamp_to_rect(inside, rect);
    let p2 = outside;

    let mut best: Option<(f64, usize, Point, bool)> = None;
    for i in 0..4 {
        let p3 = corners[i];
        let p4 = corners[(i + 1) % 4];
        let denom = (p4.y - p3.y) * (p2.x - p1.x) - (p4.x - p3.x) * (p2.y - p1.y);
        if denom == 0.0 {
            continue;
        }
        let nua = (p4.x - p3.x) * (p1.y - p3.y) - (p4.y - p3.y) * (p1.x - p3.x);
        let nub = (p2.x - p1.x) * (p1.y - p3.y) - (p2.y - p1.y) * (p1.x - p3.x);
        let ua = nua / denom;
        let ub = nub / denom;
        if !(0.0..=1.0).contains(&ua) || !(0.0..=1.0).contains(&ub) {
            continue;
        }
        let raw = p3 + (p4 - p3) * ub;
        let hit = pin_to_edge(raw, p3, p4, rect);
        let d = distance(hit, p2);
        let wins = match best {
            None => true,
            Some((best_d, best_edge, _, _)) => {
                d < best_d
                    || (d == best_d
                        && beyond_edge(p2, i, rect)
                        && !beyond_edge(p2, best_edge, rect))
            }
        };
        if wins {
            best = Some((d, i, hit, ua == 0.0));
        }
    }

    let Some((_, edge, hit, at_inside)) = best else {
        // Only reachable through float noise; the outside point clamps onto the boundary.
        return clamp_to_rect(p2, rect);
    };

    if at_inside {
        let p3 = corners[edge];
        let p4 = corners[(edge + 1) % 4];
        if p3.x == p4.x {
            return Point::new(p3.x, p2.y.clamp(rect.y0, rect.y1));
        }
        return Point::new(p2.x.clamp(rect.x0, rect.x1), p3.y);
    }
    hit
}

/// Whether `point` lies on the outer side of clockwise edge `edge`.
fn beyond_edge(point: Point, edge: usize, rect: Rect) -> bool {
    match edge {
        0 => point.y < rect.y0,
        1 => point.x > rect.x1,
        2 => point.y > rect.y1,
        _ => point.x < rect.x0,
    }
}

/// Snap a computed intersection exactly onto the edge `p3 → p4`.
fn pin_to_edge(point: Point, p3: Point, p4: Point, rect: Rect) -> Point {
    if p3.x == p4.x {
        Point::new(p3.x, point.y.clamp(rect.y0, rect.y1))
    } else {
        Point::new(point.x.clamp(rect.x0, rect.x1), p3.y)
    }
}

/// Simple seeded random number generator (xorshift32).
/// Used to break ties deterministically during point reduction.
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Random float in range [0, 1).
    pub fn next_unit(&mut self) -> f64 {
        self.next_u32() as f64 / (u32::MAX as f64 + 1.0)
    }
}

/// Resample a polygon to exactly `target_count` points.
///
/// Growing subdivides edges, shrinking prunes the least distinctive vertices. The resulting
/// point count is the contract; which vertices survive a reduction depends on the seed.
/// An empty input has no vertices to place new points between and stays empty for any
/// target.
pub fn resample_polygon(points: &[Point], target_count: usize) -> Vec<Point> {
    resample_polygon_seeded(points, target_count, DEFAULT_RESAMPLE_SEED)
}

/// [`resample_polygon`] with an explicit tie-breaker seed.
pub fn resample_polygon_seeded(points: &[Point], target_count: usize, seed: u32) -> Vec<Point> {
    if points.is_empty() {
        return Vec::new();
    }
    match target_count.cmp(&points.len()) {
        Ordering::Equal => points.to_vec(),
        Ordering::Greater => add_points(points, target_count - points.len()),
        Ordering::Less => {
            let mut rng = SimpleRng::new(seed);
            reduce_points(points.to_vec(), target_count, &mut rng)
        }
    }
}

/// Insert `n` points along the open polyline `points`.
fn add_points(points: &[Point], n: usize) -> Vec<Point> {
    if n == 0 {
        return points.to_vec();
    }
    match points {
        [] => return Vec::new(),
        [only] => return vec![*only; n + 1],
        _ => {}
    }

    let segments = points.len() - 1;
    if n < segments {
        // Fewer new points than edges: one midpoint on each of the first `n` edges.
        let mut res = Vec::with_capacity(points.len() + n);
        res.push(points[0]);
        let mut remaining = n;
        for pair in points.windows(2) {
            if remaining > 0 {
                res.push(midpoint(pair[0], pair[1]));
                remaining -= 1;
            }
            res.push(pair[1]);
        }
        return res;
    }

    let factor = n / segments + 1;
    let mut res = Vec::with_capacity(points.len() + segments * (factor - 1));
    res.push(points[0]);
    for pair in points.windows(2) {
        let step = pair[1] - pair[0];
        for j in 1..factor {
            res.push(pair[0] + step * (j as f64 / factor as f64));
        }
        res.push(pair[1]);
    }
    let added = res.len() - points.len();
    add_points(&res, n - added)
}

/// How much a vertex contributes to the outline: the smallest of its distance to the
/// midpoint of its neighbours, to the previous vertex and to the next vertex.
fn distinctiveness(polygon: &[Point], i: usize) -> f64 {
    let len = polygon.len();
    let prev = polygon[(i + len - 1) % len];
    let next = polygon[(i + 1) % len];
    let current = polygon[i];
    let to_mid = distance(current, midpoint(prev, next));
    to_mid.min(distance(current, next)).min(distance(current, prev))
}

/// Linear-interpolated percentile (`p` in 0..=100) of a non-empty slice.
fn percentile(values: &[f64], p: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let rank = (p / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Prune `polygon` down to `n` points by percentile thresholding, one pass at a time.
fn reduce_points(mut polygon: Vec<Point>, n: usize, rng: &mut SimpleRng) -> Vec<Point> {
    while polygon.len() > n {
        let len = polygon.len();
        let scores: Vec<f64> = (0..len)
            .map(|i| distinctiveness(&polygon, i) + rng.next_unit())
            .collect();
        let ratio = n as f64 / len as f64;
        let threshold = percentile(&scores, 100.0 - ratio * 100.0);

        let mut keep = vec![true; len];
        let mut i = 0;
        while i < len {
            if scores[i] < threshold {
                keep[i] = false;
                // Never drop two neighbours in the same pass.
                i += 1;
            }
            i += 1;
        }

        if keep.iter().all(|&k| k) {
            // Exact ties can leave nothing under the threshold; drop the weakest point.
            let weakest = scores
                .iter()
                .enumerate()
                .min_by(|a, b| a.1.total_cmp(b.1))
                .map(|(i, _)| i)
                .unwrap_or(0);
            keep[weakest] = false;
        }

        polygon = polygon
            .into_iter()
            .zip(keep)
            .filter_map(|(p, k)| k.then_some(p))
            .collect();
    }
    polygon
}

/// Arithmetic mean of a point set.
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
    Some((sum / points.len() as f64).to_point())
}

/// Order two point sets by descending polar angle around their own centroids so that
/// entries with the same index correspond.
///
/// Both sets should have the same length (see [`resample_polygon`]); pairing is by rank.
pub fn align_point_sets(a: &[Point], b: &[Point]) -> (Vec<Point>, Vec<Point>) {
    (sort_by_angle(a), sort_by_angle(b))
}

fn sort_by_angle(points: &[Point]) -> Vec<Point> {
    let Some(center) = centroid(points) else {
        return Vec::new();
    };
    let mut offsets: Vec<Vec2> = points.iter().map(|p| *p - center).collect();
    offsets.sort_by(|u, v| v.atan2().total_cmp(&u.atan2()));
    offsets.into_iter().map(|v| center + v).collect()
}

/// Axis-aligned bounding box of a point set.
pub fn bbox_of(points: &[Point]) -> Option<Rect> {
    let first = points.first()?;
    let init = Rect::from_points(*first, *first);
    Some(points[1..].iter().fold(init, |r, p| r.union_pt(*p)))
}

/// Intersection over union of two axis-aligned boxes. Zero when the union is empty.
pub fn iou(a: Rect, b: Rect) -> f64 {
    let a = a.abs();
    let b = b.abs();
    let x0 = a.x0.max(b.x0);
    let y0 = a.y0.max(b.y0);
    let x1 = a.x1.min(b.x1);
    let y1 = a.y1.min(b.y1);
    let intersection = if x0 < x1 && y0 < y1 {
        (x1 - x0) * (y1 - y0)
    } else {
        0.0
    };
    let union = a.area() + b.area() - intersection;
    if union > 0.0 { intersection / union } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn image_rect() -> Rect {
        Rect::new(0.0, 0.0, 1199.0, 799.0)
    }

    fn assert_near(a: Point, b: Point) {
        assert!(distance(a, b) < 1e-6, "{a:?} != {b:?}");
    }

    fn on_boundary(p: Point, r: Rect) -> bool {
        let on_vertical = (p.x == r.x0 || p.x == r.x1) && p.y >= r.y0 && p.y <= r.y1;
        let on_horizontal = (p.y == r.y0 || p.y == r.y1) && p.x >= r.x0 && p.x <= r.x1;
        on_vertical || on_horizontal
    }

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]
    }

    #[test]
    fn test_distance() {
        assert!((distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0)) - 5.0).abs() < EPS);
    }

    #[test]
    fn test_point_to_segment_dist() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((point_to_segment_dist(Point::new(5.0, 3.0), a, b) - 3.0).abs() < EPS);
        assert!((point_to_segment_dist(Point::new(-4.0, 3.0), a, b) - 5.0).abs() < EPS);
        assert!((point_to_segment_dist(Point::new(1.0, 1.0), a, a) - 2f64.sqrt()).abs() < EPS);
    }

    #[test]
    fn test_boundary_intersection_diagonal_corner() {
        let hit = boundary_intersection(Point::new(5.0, 5.0), Point::new(-50.0, -50.0), image_rect());
        assert_near(hit, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_boundary_intersection_right_edge() {
        let hit = boundary_intersection(Point::new(600.0, 400.0), Point::new(1400.0, 400.0), image_rect());
        assert_eq!(hit.x, 1199.0);
        assert_near(hit, Point::new(1199.0, 400.0));
    }

    #[test]
    fn test_boundary_intersection_slides_along_edge() {
        // Inside point already on the left edge; the result follows the pointer's y.
        let hit = boundary_intersection(Point::new(0.0, 100.0), Point::new(-30.0, 250.0), image_rect());
        assert_eq!(hit, Point::new(0.0, 250.0));
    }

    #[test]
    fn test_boundary_intersection_leaves_corner_along_edge() {
        let r = image_rect();
        let hit = boundary_intersection(Point::new(0.0, 0.0), Point::new(-50.0, 300.0), r);
        assert_eq!(hit, Point::new(0.0, 300.0));
        let hit = boundary_intersection(Point::new(1199.0, 0.0), Point::new(1250.0, 300.0), r);
        assert_eq!(hit, Point::new(1199.0, 300.0));
        let hit = boundary_intersection(Point::new(1199.0, 799.0), Point::new(600.0, 850.0), r);
        assert_eq!(hit, Point::new(600.0, 799.0));
        let hit = boundary_intersection(Point::new(0.0, 799.0), Point::new(-40.0, 500.0), r);
        assert_eq!(hit, Point::new(0.0, 500.0));
    }

    #[test]
    fn test_boundary_intersection_always_on_edge() {
        let r = image_rect();
        let inside = [Point::new(1.0, 2.0), Point::new(600.0, 400.0), Point::new(1198.5, 798.0)];
        let outside = [
            Point::new(-13.7, 420.2),
            Point::new(3000.0, -77.3),
            Point::new(611.1, 1234.5),
            Point::new(-1.0, -1.0),
            Point::new(1500.0, 900.0),
        ];
        for i in inside {
            for o in outside {
                let hit = boundary_intersection(i, o, r);
                assert!(on_boundary(hit, r), "{hit:?} from {i:?} to {o:?}");
            }
        }
    }

    #[test]
    fn test_resample_identity() {
        let pts = square();
        assert_eq!(resample_polygon(&pts, 4), pts);
    }

    #[test]
    fn test_resample_empty_stays_empty() {
        assert!(resample_polygon(&[], 5).is_empty());
        assert!(resample_polygon(&[], 0).is_empty());
        let single = [Point::new(1.0, 2.0)];
        assert_eq!(resample_polygon(&single, 3), vec![Point::new(1.0, 2.0); 3]);
    }

    #[test]
    fn test_resample_grow_exact_count() {
        let pts = square();
        for target in [5, 6, 7, 10, 13, 40] {
            let grown = resample_polygon(&pts, target);
            assert_eq!(grown.len(), target);
            assert_eq!(grown[0], pts[0]);
            assert_eq!(*grown.last().unwrap(), pts[3]);
        }
    }

    #[test]
    fn test_resample_grow_uniform_subdivision() {
        let pts = vec![Point::new(0.0, 0.0), Point::new(9.0, 0.0)];
        let grown = resample_polygon(&pts, 4);
        let xs: Vec<f64> = grown.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 3.0, 6.0, 9.0]);
    }

    #[test]
    fn test_resample_shrink_exact_count() {
        let dense = resample_polygon(&square(), 40);
        for target in [39, 20, 7, 3, 1] {
            assert_eq!(resample_polygon(&dense, target).len(), target);
        }
    }

    #[test]
    fn test_resample_round_trip_count() {
        let pts = square();
        let there = resample_polygon(&pts, 17);
        let back = resample_polygon(&there, pts.len());
        assert_eq!(back.len(), pts.len());
    }

    #[test]
    fn test_resample_reduction_keeps_corners() {
        // Collinear midpoints are the least distinctive vertices.
        let pts = vec![
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 50.0),
            Point::new(100.0, 100.0),
            Point::new(50.0, 100.0),
            Point::new(0.0, 100.0),
            Point::new(0.0, 50.0),
        ];
        let reduced = resample_polygon(&pts, 4);
        assert_eq!(reduced.len(), 4);
        for corner in [
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ] {
            assert!(reduced.contains(&corner), "{corner:?} dropped: {reduced:?}");
        }
    }

    #[test]
    fn test_percentile_interpolates() {
        let values = [4.0, 1.0, 3.0, 2.0];
        assert!((percentile(&values, 0.0) - 1.0).abs() < EPS);
        assert!((percentile(&values, 100.0) - 4.0).abs() < EPS);
        assert!((percentile(&values, 50.0) - 2.5).abs() < EPS);
    }

    #[test]
    fn test_align_point_sets() {
        let a = square();
        // Same square, shifted and listed in a different order.
        let b: Vec<Point> = [2, 0, 3, 1]
            .iter()
            .map(|&i| a[i] + Vec2::new(100.0, 50.0))
            .collect();
        let (sa, sb) = align_point_sets(&a, &b);
        assert_eq!(sa.len(), 4);
        for (pa, pb) in sa.iter().zip(&sb) {
            let d = *pb - *pa;
            assert!((d.x - 100.0).abs() < EPS && (d.y - 50.0).abs() < EPS);
        }
    }

    #[test]
    fn test_centroid() {
        assert_eq!(centroid(&square()), Some(Point::new(5.0, 5.0)));
        assert_eq!(centroid(&[]), None);
    }

    #[test]
    fn test_bbox_of() {
        let bbox = bbox_of(&[Point::new(3.0, 9.0), Point::new(-1.0, 4.0), Point::new(7.0, 5.0)]);
        assert_eq!(bbox, Some(Rect::new(-1.0, 4.0, 7.0, 9.0)));
        assert_eq!(bbox_of(&[]), None);
    }

    #[test]
    fn test_iou_properties() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 15.0, 15.0);
        let c = Rect::new(20.0, 20.0, 30.0, 30.0);
        assert!((iou(a, b) - iou(b, a)).abs() < EPS);
        assert!((iou(a, b) - 25.0 / 175.0).abs() < EPS);
        assert!((iou(a, a) - 1.0).abs() < EPS);
        assert_eq!(iou(a, c), 0.0);
    }

    #[test]
    fn test_iou_degenerate_union() {
        let p = Rect::new(3.0, 3.0, 3.0, 3.0);
        assert_eq!(iou(p, p), 0.0);
    }
}
