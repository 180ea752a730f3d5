/// Hover lookup over mark centres in pixel space. Any number of marks may
/// share a position.
pub struct HoverIndex {
    points: Vec<(usize, [f64; 2])>,
}

impl HoverIndex {
    /// Build from `(record_index, [x, y])` pairs. Non-finite centres are skipped.
    pub fn build<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (usize, [f64; 2])>,
    {
        let points = points
            .into_iter()
            .filter(|(_, p)| p[0].is_finite() && p[1].is_finite())
            .collect();
        Self { points }
    }

    /// Nearest point to (qx, qy) as (record_index, euclidean_distance).
    /// On a tie the later (topmost) point wins.
    pub fn nearest(&self, qx: f64, qy: f64) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for &(index, [x, y]) in &self.points {
            let d2 = (x - qx).powi(2) + (y - qy).powi(2);
            if best.map_or(true, |(_, b)| d2 <= b) {
                best = Some((index, d2));
            }
        }
        best.map(|(index, d2)| (index, d2.sqrt()))
    }

    /// Nearest point within `radius`, if any.
    pub fn hit(&self, qx: f64, qy: f64, radius: f64) -> Option<usize> {
        self.nearest(qx, qy)
            .filter(|&(_, dist)| dist <= radius)
            .map(|(index, _)| index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_respects_radius() {
        let index = HoverIndex::build(vec![(0, [10.0, 10.0]), (3, [100.0, 50.0])]);
        assert_eq!(index.hit(12.0, 11.0, 15.0), Some(0));
        assert_eq!(index.hit(95.0, 52.0, 15.0), Some(3));
        assert_eq!(index.hit(55.0, 30.0, 15.0), None);
    }

    #[test]
    fn empty_index_has_no_nearest() {
        let index = HoverIndex::build(vec![(0, [f64::NAN, 1.0])]);
        assert_eq!(index.nearest(0.0, 0.0), None);
    }

    #[test]
    fn many_marks_on_one_position() {
        let index = HoverIndex::build((0..50).map(|i| (i, [430.0, 200.0])));
        assert_eq!(index.hit(431.0, 199.0, 15.0), Some(49));

        let column = HoverIndex::build((0..50).map(|i| (i, [430.0, i as f64 * 8.0])));
        assert_eq!(column.hit(430.0, 81.0, 15.0), Some(10));
    }
}
