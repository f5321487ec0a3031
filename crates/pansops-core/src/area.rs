//! Shared polygon construction: offset corridors, splays and arc tessellation.
//!
//! Every builder returns a [`Ring`], which is closed, simple and wound
//! counter-clockwise (x east, y north). Angles are azimuths in degrees,
//! clockwise from north.

use crate::error::{AreaError, Result};
use crate::models::{Point, TurnDirection};
use crate::track::normalize_azimuth;
use serde::Serialize;

/// Vertices closer than this (meters) are merged.
const VERTEX_MERGE_EPS_M: f64 = 1e-6;

/// Upper bound on segments per tessellated arc.
pub const MAX_ARC_SEGMENTS: usize = 1 << 16;

/// Smallest miter cosine accepted before an offset corner counts as folded.
const MIN_MITER_COS: f64 = 1e-3;

/// A closed, simple, counter-clockwise polygon ring.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Ring {
    points: Vec<Point>,
}

impl Ring {
    /// Validate and close a ring.
    ///
    /// Consecutive duplicates and an explicit closing point are dropped, the
    /// winding is flipped to counter-clockwise if needed, and the first point
    /// is appended again at the end.
    pub fn new(points: Vec<Point>) -> Result<Self> {
        let mut vertices: Vec<Point> = Vec::with_capacity(points.len() + 1);
        for point in points {
            if !point.x.is_finite() || !point.y.is_finite() {
                return Err(AreaError::InvalidGeometry(
                    "ring contains non-finite coordinates".into(),
                ));
            }
            if vertices
                .last()
                .is_some_and(|last| last.approx_eq(&point, VERTEX_MERGE_EPS_M))
            {
                continue;
            }
            vertices.push(point);
        }
        while vertices.len() > 1
            && vertices[0].approx_eq(&vertices[vertices.len() - 1], VERTEX_MERGE_EPS_M)
        {
            vertices.pop();
        }
        if vertices.len() < 3 {
            return Err(AreaError::InvalidGeometry(format!(
                "ring needs at least three distinct vertices, got {}",
                vertices.len()
            )));
        }

        let area = shoelace(&vertices);
        if area.abs() <= VERTEX_MERGE_EPS_M {
            return Err(AreaError::InvalidGeometry("ring has zero area".into()));
        }
        if area < 0.0 {
            vertices.reverse();
        }
        if let Some((i, j)) = first_self_intersection(&vertices) {
            return Err(AreaError::InvalidGeometry(format!(
                "ring edges {i} and {j} intersect"
            )));
        }

        vertices.push(vertices[0]);
        Ok(Self { points: vertices })
    }

    /// Vertices including the closing point.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of distinct vertices.
    pub fn vertex_count(&self) -> usize {
        self.points.len() - 1
    }

    /// Shoelace area; positive for counter-clockwise rings.
    pub fn signed_area(&self) -> f64 {
        shoelace(self.open_points())
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn is_closed(&self) -> bool {
        self.points.len() >= 4 && self.points.first() == self.points.last()
    }

    pub fn is_simple(&self) -> bool {
        first_self_intersection(self.open_points()).is_none()
    }

    /// Even-odd point in polygon test. Points on the boundary may go either way.
    pub fn contains(&self, point: &Point) -> bool {
        let mut inside = false;
        for edge in self.points.windows(2) {
            let (a, b) = (edge[0], edge[1]);
            if (a.y > point.y) != (b.y > point.y) {
                let x_cross = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if point.x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }

    fn open_points(&self) -> &[Point] {
        &self.points[..self.points.len() - 1]
    }
}

fn shoelace(vertices: &[Point]) -> f64 {
    let n = vertices.len();
    let mut twice = 0.0;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        twice += a.x * b.y - b.x * a.y;
    }
    twice / 2.0
}

/// First pair of edges that cross, touch or fold back onto each other.
fn first_self_intersection(vertices: &[Point]) -> Option<(usize, usize)> {
    let n = vertices.len();
    let edge = |i: usize| (vertices[i], vertices[(i + 1) % n]);

    for i in 0..n {
        // Adjacent edges only conflict when the second doubles back on the first.
        let (a, b) = edge(i);
        let (_, c) = edge((i + 1) % n);
        let cross = (b.x - a.x) * (c.y - b.y) - (b.y - a.y) * (c.x - b.x);
        let dot = (b.x - a.x) * (c.x - b.x) + (b.y - a.y) * (c.y - b.y);
        if cross.abs() <= VERTEX_MERGE_EPS_M && dot < 0.0 {
            return Some((i, (i + 1) % n));
        }
    }

    // Sweep edges by their minimum x; only edges whose x spans are still
    // open can meet the current one.
    let bounds = |i: usize| {
        let (a, b) = edge(i);
        (a.x.min(b.x), a.x.max(b.x), a.y.min(b.y), a.y.max(b.y))
    };
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| bounds(i).0.total_cmp(&bounds(j).0));

    let mut active: Vec<usize> = Vec::new();
    for &i in &order {
        let (min_x, _, min_y, max_y) = bounds(i);
        active.retain(|&j| bounds(j).1 >= min_x - VERTEX_MERGE_EPS_M);
        for &j in &active {
            let adjacent = (i + 1) % n == j || (j + 1) % n == i;
            if adjacent {
                continue;
            }
            let (_, _, other_min_y, other_max_y) = bounds(j);
            if other_max_y < min_y - VERTEX_MERGE_EPS_M || other_min_y > max_y + VERTEX_MERGE_EPS_M {
                continue;
            }
            let (a1, a2) = edge(i);
            let (b1, b2) = edge(j);
            if segments_intersect_2d(a1, a2, b1, b2) {
                return Some((i.min(j), i.max(j)));
            }
        }
        active.push(i);
    }
    None
}

/// Segment intersection test on projected coordinates, touching included.
pub(crate) fn segments_intersect_2d(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    // Absorbs floating-point error on coordinates in the 1e5 m range.
    const EPS_M: f64 = 1e-6;

    fn orient(p: Point, q: Point, r: Point) -> f64 {
        (q.x - p.x) * (r.y - p.y) - (q.y - p.y) * (r.x - p.x)
    }

    fn within(a: f64, b: f64, value: f64) -> bool {
        let min = a.min(b) - EPS_M;
        let max = a.max(b) + EPS_M;
        value >= min && value <= max
    }

    fn on_segment(p: Point, q: Point, r: Point) -> bool {
        within(p.x, q.x, r.x) && within(p.y, q.y, r.y)
    }

    let o1 = orient(a1, a2, b1);
    let o2 = orient(a1, a2, b2);
    let o3 = orient(b1, b2, a1);
    let o4 = orient(b1, b2, a2);

    if o1.abs() <= EPS_M && on_segment(a1, a2, b1) {
        return true;
    }
    if o2.abs() <= EPS_M && on_segment(a1, a2, b2) {
        return true;
    }
    if o3.abs() <= EPS_M && on_segment(b1, b2, a1) {
        return true;
    }
    if o4.abs() <= EPS_M && on_segment(b1, b2, a2) {
        return true;
    }

    let a_crosses = (o1 > EPS_M && o2 < -EPS_M) || (o1 < -EPS_M && o2 > EPS_M);
    let b_crosses = (o3 > EPS_M && o4 < -EPS_M) || (o3 < -EPS_M && o4 > EPS_M);
    a_crosses && b_crosses
}

fn ensure_offset(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(AreaError::InvalidGeometry(format!(
            "{name} must be positive, got {value}"
        )))
    }
}

/// Corridor around a centerline, `left_m` and `right_m` to each side of travel.
///
/// Interior vertices use a mitred join; a centerline that folds back on
/// itself is rejected.
pub fn offset_polygon(centerline: &[Point], left_m: f64, right_m: f64) -> Result<Ring> {
    let left_m = ensure_offset("left offset", left_m)?;
    let right_m = ensure_offset("right offset", right_m)?;
    if centerline.len() < 2 {
        return Err(AreaError::InvalidGeometry(
            "centerline needs at least two points".into(),
        ));
    }

    // Left-hand unit normals of each edge.
    let normals = centerline
        .windows(2)
        .map(|pair| {
            let dx = pair[1].x - pair[0].x;
            let dy = pair[1].y - pair[0].y;
            let len = dx.hypot(dy);
            if len <= VERTEX_MERGE_EPS_M {
                return Err(AreaError::DegenerateSegment);
            }
            Ok((-dy / len, dx / len))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut left_side = Vec::with_capacity(centerline.len());
    let mut right_side = Vec::with_capacity(centerline.len());
    for (i, point) in centerline.iter().enumerate() {
        let (nx, ny) = if i == 0 {
            normals[0]
        } else if i == centerline.len() - 1 {
            normals[normals.len() - 1]
        } else {
            let prev = normals[i - 1];
            let next = normals[i];
            let (sx, sy) = (prev.0 + next.0, prev.1 + next.1);
            let len = sx.hypot(sy);
            if len <= MIN_MITER_COS {
                return Err(AreaError::InvalidGeometry(format!(
                    "centerline folds back at vertex {i}"
                )));
            }
            let (mx, my) = (sx / len, sy / len);
            let cos_half = mx * prev.0 + my * prev.1;
            if cos_half <= MIN_MITER_COS {
                return Err(AreaError::InvalidGeometry(format!(
                    "centerline folds back at vertex {i}"
                )));
            }
            (mx / cos_half, my / cos_half)
        };
        left_side.push(Point::new(point.x + nx * left_m, point.y + ny * left_m));
        right_side.push(Point::new(point.x - nx * right_m, point.y - ny * right_m));
    }

    right_side.reverse();
    left_side.extend(right_side);
    Ring::new(left_side)
}

/// Trapezoid starting at `origin` and widening along `azimuth_deg`.
///
/// The near edge is `near_width_m` wide and centered on `origin`; each side
/// diverges from the track by `splay_angle_deg` over `length_m`.
pub fn splay_polygon(
    origin: Point,
    azimuth_deg: f64,
    splay_angle_deg: f64,
    length_m: f64,
    near_width_m: f64,
) -> Result<Ring> {
    let length_m = ensure_offset("splay length", length_m)?;
    let near_width_m = ensure_offset("near width", near_width_m)?;
    if !(0.0..90.0).contains(&splay_angle_deg) {
        return Err(AreaError::InvalidGeometry(format!(
            "splay angle must be in [0, 90), got {splay_angle_deg}"
        )));
    }

    let near_half = near_width_m / 2.0;
    let far_half = near_half + length_m * splay_angle_deg.to_radians().tan();
    let left = azimuth_deg - 90.0;
    let right = azimuth_deg + 90.0;
    let far = origin.offset(azimuth_deg, length_m);

    Ring::new(vec![
        origin.offset(right, near_half),
        far.offset(right, far_half),
        far.offset(left, far_half),
        origin.offset(left, near_half),
    ])
}

/// Rectangle centered on `center`, `half_length_m` along the azimuth and
/// `half_width_m` across it.
pub fn oriented_rectangle(
    center: Point,
    azimuth_deg: f64,
    half_length_m: f64,
    half_width_m: f64,
) -> Result<Ring> {
    let half_length_m = ensure_offset("half length", half_length_m)?;
    let half_width_m = ensure_offset("half width", half_width_m)?;
    let ahead = center.offset(azimuth_deg, half_length_m);
    let behind = center.offset(azimuth_deg + 180.0, half_length_m);
    Ring::new(vec![
        behind.offset(azimuth_deg + 90.0, half_width_m),
        ahead.offset(azimuth_deg + 90.0, half_width_m),
        ahead.offset(azimuth_deg - 90.0, half_width_m),
        behind.offset(azimuth_deg - 90.0, half_width_m),
    ])
}

/// Angle swept from `start_deg` to `end_deg` turning in `direction`, in (0, 360].
pub fn arc_sweep(start_deg: f64, end_deg: f64, direction: TurnDirection) -> f64 {
    let sweep = match direction {
        TurnDirection::Right => normalize_azimuth(end_deg - start_deg),
        TurnDirection::Left => normalize_azimuth(start_deg - end_deg),
    };
    if sweep <= 1e-12 {
        360.0
    } else {
        sweep
    }
}

/// Tessellate a circular arc into a polyline, both endpoints included.
///
/// Right turns sweep clockwise (increasing azimuth). Uses the fewest equal
/// chords (at least one per 90°) whose deviation `r (1 - cos(step / 2))` is
/// within `tolerance_m`; if that needs more than [`MAX_ARC_SEGMENTS`] chords
/// the arc is rejected.
pub fn arc_segment(
    center: Point,
    radius_m: f64,
    start_deg: f64,
    end_deg: f64,
    direction: TurnDirection,
    tolerance_m: f64,
) -> Result<Vec<Point>> {
    let radius_m = ensure_offset("arc radius", radius_m)?;
    let tolerance_m = ensure_offset("arc tolerance", tolerance_m)?;
    if !start_deg.is_finite() || !end_deg.is_finite() {
        return Err(AreaError::InvalidGeometry("arc angles must be finite".into()));
    }

    let sweep = arc_sweep(start_deg, end_deg, direction);
    let unreachable = || {
        AreaError::InvalidGeometry(format!(
            "arc of radius {radius_m} m cannot meet a {tolerance_m} m tolerance"
        ))
    };

    // Widest chord angle with r (1 - cos(step / 2)) <= tolerance.
    let ratio = (tolerance_m / (2.0 * radius_m)).min(0.5);
    let max_step = 4.0 * ratio.sqrt().asin();
    let needed = (sweep.to_radians() / max_step).ceil();
    if !needed.is_finite() || needed > MAX_ARC_SEGMENTS as f64 {
        return Err(unreachable());
    }
    let mut segments = (needed as usize).max((sweep / 90.0).ceil().max(1.0) as usize);
    while radius_m * (1.0 - (sweep / segments as f64 / 2.0).to_radians().cos()) > tolerance_m {
        segments += 1;
        if segments > MAX_ARC_SEGMENTS {
            return Err(unreachable());
        }
    }

    let step = direction.sign() * sweep / segments as f64;
    Ok((0..=segments)
        .map(|i| center.offset(start_deg + step * i as f64, radius_m))
        .collect())
}
