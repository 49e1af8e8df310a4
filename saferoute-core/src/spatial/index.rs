use geo::Point;
use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::{
    Error, Meters, NodeId,
    geodesy::{chord_squared, haversine, unit_sphere},
    model::Node,
};

/// Chord distances on the unit sphere lose precision for nearby points; any
/// candidate within this many meters of the best haversine distance is
/// re-checked exactly.
const TIE_SLACK_M: Meters = 1.0;

/// Nearest node by linear scan over `nodes`.
///
/// Distance ties are broken in favour of the lowest id, so the answer does
/// not depend on the order of `nodes`.
///
/// # Errors
///
/// Returns [`Error::EmptyNodeSet`] if `nodes` is empty
pub fn nearest(lat: f64, lon: f64, nodes: &[Node]) -> Result<NodeId, Error> {
    nodes
        .iter()
        .map(|node| (haversine(lat, lon, node.lat(), node.lon()), node.id))
        .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
        .map(|(_, id)| id)
        .ok_or(Error::EmptyNodeSet)
}

/// Nearest item of an arbitrary slice by linear scan; ties keep the earlier item
pub fn nearest_item<T, F>(lat: f64, lon: f64, items: &[T], location: F) -> Option<(&T, Meters)>
where
    F: Fn(&T) -> Point<f64>,
{
    items
        .iter()
        .map(|item| {
            let point = location(item);
            (item, haversine(lat, lon, point.y(), point.x()))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct IndexedPoint<K> {
    position: [f64; 3],
    geometry: Point<f64>,
    key: K,
}

impl<K> RTreeObject for IndexedPoint<K> {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl<K> PointDistance for IndexedPoint<K> {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        self.position
            .iter()
            .zip(point)
            .map(|(a, b)| (a - b) * (a - b))
            .sum()
    }

    fn contains_point(&self, point: &[f64; 3]) -> bool {
        self.position == *point
    }
}

/// R-tree over points projected onto the unit sphere.
///
/// Straight-line distance between projected points is monotonic in the
/// great-circle distance, so nearest-neighbour order matches haversine order;
/// final answers are still decided with [`haversine`].
#[derive(Debug, Clone)]
pub struct SpatialIndex<K> {
    tree: RTree<IndexedPoint<K>>,
}

impl<K> SpatialIndex<K>
where
    K: Copy + Ord,
{
    pub fn new(points: impl IntoIterator<Item = (K, Point<f64>)>) -> Self {
        let points = points
            .into_iter()
            .map(|(key, geometry)| IndexedPoint {
                position: unit_sphere(&geometry),
                geometry,
                key,
            })
            .collect();
        Self {
            tree: RTree::bulk_load(points),
        }
    }

    /// Closest key and its haversine distance. Ties go to the lowest key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyNodeSet`] if the index is empty
    pub fn nearest(&self, lat: f64, lon: f64) -> Result<(K, Meters), Error> {
        let query = unit_sphere(&Point::new(lon, lat));
        let mut best: Option<(Meters, K)> = None;

        for (point, distance_2) in self.tree.nearest_neighbor_iter_with_distance_2(&query) {
            if let Some((best_distance, _)) = best {
                if distance_2 > chord_squared(best_distance + TIE_SLACK_M) {
                    break;
                }
            }
            let distance = haversine(lat, lon, point.geometry.y(), point.geometry.x());
            let improves = best.is_none_or(|(best_distance, best_key)| {
                distance
                    .total_cmp(&best_distance)
                    .then(point.key.cmp(&best_key))
                    .is_lt()
            });
            if improves {
                best = Some((distance, point.key));
            }
        }

        best.map(|(distance, key)| (key, distance))
            .ok_or(Error::EmptyNodeSet)
    }

    /// `true` if any point is strictly closer than `radius` meters
    pub fn any_within(&self, lat: f64, lon: f64, radius: Meters) -> bool {
        let query = unit_sphere(&Point::new(lon, lat));
        self.tree
            .locate_within_distance(query, chord_squared(radius + TIE_SLACK_M))
            .any(|point| haversine(lat, lon, point.geometry.y(), point.geometry.x()) < radius)
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl SpatialIndex<NodeId> {
    pub fn from_nodes<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Self {
        Self::new(nodes.into_iter().map(|node| (node.id, node.geometry)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Vec<Node> {
        let mut nodes = Vec::new();
        for row in 0..20_i64 {
            for col in 0..20_i64 {
                nodes.push(Node::new(
                    row * 100 + col,
                    39.40 + row as f64 * 0.002,
                    -0.40 + col as f64 * 0.002,
                ));
            }
        }
        nodes
    }

    #[test]
    fn empty_node_set_is_an_error() {
        assert!(matches!(nearest(0.0, 0.0, &[]), Err(Error::EmptyNodeSet)));
        let index = SpatialIndex::<NodeId>::from_nodes(&[]);
        assert!(matches!(index.nearest(0.0, 0.0), Err(Error::EmptyNodeSet)));
    }

    #[test]
    fn ties_prefer_lowest_id() {
        // Both nodes are exactly as far from the query point
        let nodes = vec![Node::new(9, 0.0, 0.001), Node::new(4, 0.0, -0.001)];
        assert_eq!(nearest(0.0, 0.0, &nodes).unwrap(), 4);
        let reversed: Vec<_> = nodes.iter().rev().cloned().collect();
        assert_eq!(nearest(0.0, 0.0, &reversed).unwrap(), 4);

        let index = SpatialIndex::from_nodes(&nodes);
        assert_eq!(index.nearest(0.0, 0.0).unwrap().0, 4);
    }

    #[test]
    fn repeated_lookups_are_deterministic() {
        let nodes = grid();
        let first = nearest(39.4213, -0.3871, &nodes).unwrap();
        for _ in 0..5 {
            assert_eq!(nearest(39.4213, -0.3871, &nodes).unwrap(), first);
        }
    }

    #[test]
    fn index_agrees_with_linear_scan() {
        let nodes = grid();
        let index = SpatialIndex::from_nodes(&nodes);
        let queries = [
            (39.4213, -0.3871),
            (39.40, -0.40),
            (39.4391, -0.3613),
            (39.50, -0.30),
            (39.4110, -0.3910),
        ];
        for (lat, lon) in queries {
            let (id, distance) = index.nearest(lat, lon).unwrap();
            assert_eq!(id, nearest(lat, lon, &nodes).unwrap());
            let node = nodes.iter().find(|n| n.id == id).unwrap();
            assert_eq!(distance, haversine(lat, lon, node.lat(), node.lon()));
        }
    }

    #[test]
    fn any_within_uses_strict_haversine_threshold() {
        let nodes = vec![
            Node::new(1, 0.0, 0.0),
            Node::new(2, 0.0, 0.001),
            Node::new(3, 0.0, 0.002),
        ];
        let index = SpatialIndex::from_nodes(&nodes);
        let one_step = haversine(0.0, 0.0, 0.0, 0.001);

        // node 1 lies exactly one step west of the query point
        assert!(index.any_within(0.0, -0.001, one_step + 1.0));
        assert!(!index.any_within(0.0, -0.001, one_step));
        assert!(index.any_within(0.0, 0.002, 1.0));
        assert!(!index.any_within(1.0, 1.0, 150.0));
    }

    #[test]
    fn nearest_item_keeps_first_on_ties() {
        let items = [(0.0, 0.001), (0.0, -0.001)];
        let (item, _) = nearest_item(0.0, 0.0, &items, |&(lat, lon)| Point::new(lon, lat)).unwrap();
        assert_eq!(*item, (0.0, 0.001));
        let empty: &[(f64, f64)] = &[];
        assert!(nearest_item(0.0, 0.0, empty, |&(lat, lon)| Point::new(lon, lat)).is_none());
    }
}
