#[cfg(test)]
#[path = "../../../tests/unit/models/problem/routes_test.rs"]
mod routes_test;

use crate::models::common::{Distance, Duration, Tonnes};
use crate::utils::{Float, compare_floats};
use rustc_hash::FxHashMap;

/// Physical restrictions of a track segment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RouteRestriction {
    /// Maximum gross weight of a rake in tonnes.
    pub max_gross_weight: Option<Tonnes>,
    /// Maximum wagon height in metres.
    pub max_height: Option<Float>,
    /// Required track gauge.
    pub gauge: Option<String>,
}

/// Represents a directed track segment between two stations.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteSegment {
    /// Origin station or plant.
    pub origin: String,
    /// Destination station.
    pub destination: String,
    /// Segment distance in kilometres.
    pub distance: Distance,
    /// Segment restrictions.
    pub restriction: RouteRestriction,
    /// Nominal transit time.
    pub transit_time: Duration,
    /// Congestion risk factor in [0, 1].
    pub congestion_risk: Float,
}

/// A chain of segments from a plant to a destination.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteChain {
    /// Chain origin.
    pub origin: String,
    /// Chain destination.
    pub destination: String,
    /// Indices of segments in the network.
    pub segments: Vec<usize>,
    /// Total distance.
    pub distance: Distance,
    /// Total nominal transit time.
    pub transit_time: Duration,
    /// The highest congestion risk among segments.
    pub congestion_risk: Float,
}

/// Keeps all route segments and finds alternative chains between stations.
#[derive(Clone, Debug, Default)]
pub struct RouteNetwork {
    segments: Vec<RouteSegment>,
    outgoing: FxHashMap<String, Vec<usize>>,
}

impl RouteNetwork {
    /// Creates a new network from segments.
    pub fn new(segments: Vec<RouteSegment>) -> Self {
        let mut outgoing: FxHashMap<String, Vec<usize>> = FxHashMap::default();
        segments.iter().enumerate().for_each(|(idx, segment)| {
            outgoing.entry(segment.origin.clone()).or_default().push(idx);
        });

        Self { segments, outgoing }
    }

    /// Returns all segments.
    pub fn segments(&self) -> &[RouteSegment] {
        self.segments.as_slice()
    }

    /// Returns segment by its index.
    pub fn segment(&self, index: usize) -> &RouteSegment {
        &self.segments[index]
    }

    /// Finds up to `limit` simple paths (no station visited twice) from `origin` to `destination`,
    /// sorted by transit time, then by distance.
    pub fn paths(&self, origin: &str, destination: &str, limit: usize) -> Vec<RouteChain> {
        let mut found = Vec::new();
        let mut visited = vec![origin.to_string()];
        let mut stack = Vec::new();

        self.collect_paths(origin, destination, &mut visited, &mut stack, &mut found);

        let mut chains = found.into_iter().map(|segments| self.create_chain(origin, destination, segments)).collect::<Vec<_>>();
        chains.sort_by(|a, b| {
            compare_floats(a.transit_time, b.transit_time)
                .then_with(|| compare_floats(a.distance, b.distance))
                .then_with(|| a.segments.cmp(&b.segments))
        });
        chains.truncate(limit);

        chains
    }

    fn collect_paths(
        &self,
        current: &str,
        destination: &str,
        visited: &mut Vec<String>,
        stack: &mut Vec<usize>,
        found: &mut Vec<Vec<usize>>,
    ) {
        if current == destination && !stack.is_empty() {
            found.push(stack.clone());
            return;
        }

        let Some(outgoing) = self.outgoing.get(current) else { return };

        for &segment_idx in outgoing {
            let next = self.segments[segment_idx].destination.as_str();
            if visited.iter().any(|station| station == next) {
                continue;
            }

            visited.push(next.to_string());
            stack.push(segment_idx);

            self.collect_paths(next, destination, visited, stack, found);

            stack.pop();
            visited.pop();
        }
    }

    fn create_chain(&self, origin: &str, destination: &str, segments: Vec<usize>) -> RouteChain {
        let (distance, transit_time, congestion_risk) =
            segments.iter().map(|&idx| &self.segments[idx]).fold((0., 0., 0_f64), |(d, t, c), segment| {
                (d + segment.distance, t + segment.transit_time, c.max(segment.congestion_risk))
            });

        RouteChain {
            origin: origin.to_string(),
            destination: destination.to_string(),
            segments,
            distance,
            transit_time,
            congestion_risk,
        }
    }
}
