//! Route input: JSON route files and `X,Y` command-line points.

use anyhow::{bail, Context, Result};
use pansops_core::{Point, RouteGeometry};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// On-disk route: projected points in meters and an optional leg selection.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteFile {
    pub points: Vec<[f64; 2]>,
    #[serde(default)]
    pub selection: Option<[usize; 2]>,
}

impl RouteFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading route {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing route {}", path.display()))
    }
}

/// Parse an `X,Y` pair for clap.
pub fn parse_point(s: &str) -> std::result::Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{}'", s))?;
    let x: f64 = x.trim().parse().map_err(|_| format!("invalid x '{}'", x))?;
    let y: f64 = y.trim().parse().map_err(|_| format!("invalid y '{}'", y))?;
    Ok(Point::new(x, y))
}

/// Assemble the route from a file or inline points.
///
/// An explicit `select` overrides the file's selection; with neither, the
/// whole polyline is selected.
pub fn build_route(
    file: Option<&Path>,
    inline: &[Point],
    select: Option<(usize, usize)>,
) -> Result<RouteGeometry> {
    let (points, file_selection) = match file {
        Some(path) => {
            if !inline.is_empty() {
                bail!("use either --route or --point, not both");
            }
            let route = RouteFile::load(path)?;
            let points = route.points.into_iter().map(Point::from).collect::<Vec<_>>();
            (points, route.selection.map(|[s, e]| (s, e)))
        }
        None => (inline.to_vec(), None),
    };
    if points.is_empty() {
        bail!("no route given; pass --route FILE or at least two --point X,Y");
    }

    let route = match select.or(file_selection) {
        Some((start, end)) => RouteGeometry::new(points, start, end)?,
        None => RouteGeometry::whole(points)?,
    };
    tracing::debug!(
        points = route.points().len(),
        selection = ?route.selection(),
        "route loaded"
    );
    Ok(route)
}
