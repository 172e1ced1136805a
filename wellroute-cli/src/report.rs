//! HTML report of an optimised route.

use std::collections::HashMap;

use geo::{BoundingRect, Coord, MultiPoint, Point};
use wellroute_core::{OptimizationResponse, Site, SolutionStatus};

const STYLE: &str = "body{font-family:sans-serif;margin:2em}\
table{border-collapse:collapse}\
th,td{border:1px solid #bbb;padding:4px 8px;text-align:left}\
th{background:#eee}\
svg.map{border:1px solid #bbb;margin-bottom:1em}\
svg.map text{font-size:11px}";

const MAP_WIDTH: f64 = 720.0;
const MAP_HEIGHT: f64 = 480.0;
const MAP_MARGIN: f64 = 24.0;

/// Percentage by which `optimized` exceeds `naive`, truncated toward zero.
///
/// `None` when the naive route addressed nothing.
pub(crate) fn improvement_percent(optimized: u64, naive: u64) -> Option<i128> {
    let gain = i128::from(optimized) - i128::from(naive);
    gain.saturating_mul(100).checked_div(i128::from(naive))
}

/// Render the route report for `sites`, their production changes and the
/// optimiser's `response`.
///
/// The page opens with a summary: wells visited, hours on the road, the
/// addressed production decrease and the gain over visiting wells in order
/// of production decrease. An inline SVG map follows: one marker per site,
/// coloured by production change and labelled with its visit order, and the
/// route drawn through them. A table of every site closes the page, sorted
/// by production change, with each visited well's position on the route.
#[must_use]
pub fn render_report(
    sites: &[Site],
    production_vs_plan: &[i64],
    response: &OptimizationResponse,
) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Optimised well route</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <h1>Optimised well route</h1>\n{summary}{route}{map}{table}</body>\n</html>\n",
        summary = summary(response),
        route = route_line(sites, response),
        map = route_map(sites, production_vs_plan, response),
        table = site_table(sites, production_vs_plan, response),
    )
}

fn summary(response: &OptimizationResponse) -> String {
    if response.status == SolutionStatus::Infeasible {
        return "<p>No route fits within the time budget.</p>\n".to_owned();
    }
    let optimized = response.addressed_value;
    let naive = response.naive.addressed_value;
    let comparison = match improvement_percent(optimized, naive) {
        Some(percent) => format!(
            "The optimised route addresses {percent}% more production decrease than visiting \
             wells in order of production decrease ({optimized} vs {naive} BOE/day)."
        ),
        None if optimized > 0 => format!(
            "Visiting wells in order of production decrease addresses nothing within the \
             budget; the optimised route addresses {optimized} BOE/day."
        ),
        None => "No production decrease can be addressed within the time budget.".to_owned(),
    };
    format!(
        "<p>{comparison}</p>\n<p>In {hours} hours the operator visits {wells} wells with a \
         cumulative {optimized} BOE/day production decrease.</p>\n",
        hours = hours(response.total_time_minutes),
        wells = response.visited_nodes().len(),
    )
}

/// Minutes as hours rounded to one decimal place.
fn hours(minutes: u64) -> String {
    let tenths = minutes
        .saturating_mul(10)
        .saturating_add(30)
        .checked_div(60)
        .unwrap_or_default();
    format!("{}.{}", tenths.div_euclid(10), tenths.rem_euclid(10))
}

fn route_line(sites: &[Site], response: &OptimizationResponse) -> String {
    if response.route().is_empty() {
        return String::new();
    }
    let stops: Vec<String> = response
        .route()
        .iter()
        .map(|&node| site_name(sites, node))
        .collect();
    format!("<p>Route: {}</p>\n", stops.join(" &rarr; "))
}

/// Equirectangular fit of the sites' bounding box into the map.
#[derive(Debug, Clone, Copy)]
struct Projection {
    west: f64,
    north: f64,
    scale: Coord<f64>,
    offset: Coord<f64>,
}

impl Projection {
    fn fit(sites: &[Site]) -> Self {
        let points: MultiPoint<f64> = sites.iter().map(|site| Point::from(site.location)).collect();
        let (west, north, width, height) = points
            .bounding_rect()
            .map_or((0.0, 0.0, 0.0, 0.0), |rect| {
                (rect.min().x, rect.max().y, rect.width(), rect.height())
            });
        let (scale_x, offset_x) = fit_span(width, MAP_WIDTH);
        let (scale_y, offset_y) = fit_span(height, MAP_HEIGHT);
        Self {
            west,
            north,
            scale: Coord {
                x: scale_x,
                y: scale_y,
            },
            offset: Coord {
                x: offset_x,
                y: offset_y,
            },
        }
    }

    #[expect(clippy::float_arithmetic, reason = "map projection is floating-point")]
    fn project(&self, location: Coord<f64>) -> Coord<f64> {
        Coord {
            x: MAP_MARGIN + self.offset.x + (location.x - self.west) * self.scale.x,
            y: MAP_MARGIN + self.offset.y + (self.north - location.y) * self.scale.y,
        }
    }
}

/// Scale and offset placing a span of degrees across `extent` pixels; a
/// zero span is centred.
#[expect(clippy::float_arithmetic, reason = "map projection is floating-point")]
fn fit_span(span: f64, extent: f64) -> (f64, f64) {
    let drawable = extent - 2.0 * MAP_MARGIN;
    if span > 0.0 {
        (drawable / span, 0.0)
    } else {
        (0.0, drawable / 2.0)
    }
}

/// Fill colour for a production change: red below plan, green above it,
/// grey on plan.
const fn marker_colour(change: i64) -> &'static str {
    match change.signum() {
        -1 => "#d7301f",
        1 => "#1a9850",
        _ => "#969696",
    }
}

#[expect(clippy::float_arithmetic, reason = "marker and label offsets are in pixels")]
fn route_map(sites: &[Site], production_vs_plan: &[i64], response: &OptimizationResponse) -> String {
    if sites.is_empty() {
        return String::new();
    }
    let projection = Projection::fit(sites);
    let at = |node: usize| sites.get(node).map(|site| projection.project(site.location));
    let depot = response.route().first().copied();

    let line = if response.route().len() > 1 {
        let points: Vec<String> = response
            .route()
            .iter()
            .filter_map(|&node| at(node))
            .map(|point| format!("{:.1},{:.1}", point.x, point.y))
            .collect();
        format!(
            "<polyline class=\"route\" fill=\"none\" stroke=\"#3182bd\" stroke-width=\"2\" \
             points=\"{}\"/>\n",
            points.join(" ")
        )
    } else {
        String::new()
    };

    let markers: String = sites
        .iter()
        .enumerate()
        .map(|(node, site)| {
            let point = projection.project(site.location);
            let name = escape_html(&site.name);
            if Some(node) == depot {
                format!(
                    "<rect class=\"depot\" data-node=\"{node}\" x=\"{:.1}\" y=\"{:.1}\" \
                     width=\"10\" height=\"10\" fill=\"#252525\"><title>{name}</title></rect>\n",
                    point.x - 5.0,
                    point.y - 5.0,
                )
            } else {
                let change = production_vs_plan.get(node).copied().unwrap_or_default();
                format!(
                    "<circle class=\"well\" data-node=\"{node}\" cx=\"{:.1}\" cy=\"{:.1}\" r=\"6\" \
                     fill=\"{}\"><title>{name} ({change} BOE/day)</title></circle>\n",
                    point.x,
                    point.y,
                    marker_colour(change),
                )
            }
        })
        .collect();

    let labels: String = response
        .visited_nodes()
        .iter()
        .zip(1_usize..)
        .filter_map(|(&node, position)| {
            let point = at(node)?;
            Some(format!(
                "<text class=\"visit-order\" x=\"{:.1}\" y=\"{:.1}\">{position}</text>\n",
                point.x + 8.0,
                point.y - 8.0,
            ))
        })
        .collect();

    format!(
        "<svg class=\"map\" xmlns=\"http://www.w3.org/2000/svg\" width=\"{MAP_WIDTH}\" \
         height=\"{MAP_HEIGHT}\" viewBox=\"0 0 {MAP_WIDTH} {MAP_HEIGHT}\">\n\
         {line}{markers}{labels}</svg>\n"
    )
}

fn site_table(sites: &[Site], production_vs_plan: &[i64], response: &OptimizationResponse) -> String {
    let order: HashMap<usize, usize> = response
        .visited_nodes()
        .iter()
        .zip(1_usize..)
        .map(|(&node, position)| (node, position))
        .collect();
    let depot = response.route().first().copied();

    let mut nodes: Vec<usize> = (0..sites.len()).collect();
    nodes.sort_by_key(|&node| production_vs_plan.get(node).copied().unwrap_or_default());

    let rows: String = nodes
        .into_iter()
        .filter_map(|node| {
            let site = sites.get(node)?;
            let visit = if Some(node) == depot {
                "start / end".to_owned()
            } else {
                order
                    .get(&node)
                    .map(ToString::to_string)
                    .unwrap_or_default()
            };
            Some(format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{visit}</td></tr>\n",
                escape_html(&site.name),
                site.location.y,
                site.location.x,
                production_vs_plan.get(node).copied().unwrap_or_default(),
            ))
        })
        .collect();

    format!(
        "<table>\n<thead><tr><th>well name</th><th>latitude</th><th>longitude</th>\
         <th>production vs plan (BOE/day)</th><th>visit order</th></tr></thead>\n\
         <tbody>\n{rows}</tbody>\n</table>\n"
    )
}

fn site_name(sites: &[Site], node: usize) -> String {
    sites
        .get(node)
        .map_or_else(|| format!("site {node}"), |site| escape_html(&site.name))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
