//! Fixed-length position history per body, most recent first

use glam::Vec3;

/// Number of positions kept per body
pub const TRAIL_LENGTH: usize = 1000;

/// Circular buffer of past positions.
///
/// Entries are read most-recent-first. Once `capacity` positions have been
/// pushed, each push overwrites the oldest one.
#[derive(Debug, Clone)]
pub struct Trail {
    points: Vec<Vec3>,
    // Slot the next push writes to
    next: usize,
    len: usize,
    dirty: bool,
}

impl Trail {
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            points: vec![Vec3::ZERO; capacity.max(1)],
            next: 0,
            len: 0,
            dirty: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.points.len()
    }

    /// Number of recorded positions, at most `capacity`
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Record a new most-recent position
    pub fn push_front(&mut self, position: Vec3) {
        let capacity = self.capacity();
        self.points[self.next] = position;
        self.next = (self.next + 1) % capacity;
        self.len = (self.len + 1).min(capacity);
        self.dirty = true;
    }

    /// Position `age` pushes ago; `get(0)` is the most recent
    pub fn get(&self, age: usize) -> Option<Vec3> {
        if age >= self.len {
            return None;
        }

        let capacity = self.capacity();
        Some(self.points[(self.next + capacity - 1 - age) % capacity])
    }

    pub fn iter(&self) -> impl Iterator<Item = Vec3> + '_ {
        (0..self.len).filter_map(move |age| self.get(age))
    }

    /// Flat `x, y, z` view of exactly `3 * capacity` scalars.
    ///
    /// Recorded positions come first, most recent first; unused slots are zero.
    pub fn flat(&self) -> Vec<f32> {
        let mut out = vec![0.0; 3 * self.capacity()];
        for (slot, point) in out.chunks_exact_mut(3).zip(self.iter()) {
            slot.copy_from_slice(&point.to_array());
        }
        out
    }

    /// True when positions changed since the last upload
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn clear(&mut self) {
        self.points.fill(Vec3::ZERO);
        self.next = 0;
        self.len = 0;
        self.dirty = true;
    }
}

/// One trail per body, fed once per frame
#[derive(Debug, Clone)]
pub struct TrailRecorder {
    trails: Vec<Trail>,
}

impl TrailRecorder {
    pub fn new(bodies: usize, capacity: usize) -> Self {
        Self {
            trails: vec![Trail::new(capacity); bodies],
        }
    }

    /// Push one position per body. Extra positions are ignored.
    pub fn record(&mut self, positions: &[Vec3]) {
        for (trail, position) in self.trails.iter_mut().zip(positions) {
            trail.push_front(*position);
        }
    }

    pub fn trails(&self) -> &[Trail] {
        &self.trails
    }

    pub fn any_dirty(&self) -> bool {
        self.trails.iter().any(Trail::is_dirty)
    }

    pub fn mark_clean(&mut self) {
        self.trails.iter_mut().for_each(Trail::mark_clean);
    }

    pub fn clear(&mut self) {
        self.trails.iter_mut().for_each(Trail::clear);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_after_capacity() {
        let mut trail = Trail::new(3);
        for i in 0..5 {
            trail.push_front(Vec3::splat(i as f32));
        }

        assert_eq!(trail.len(), 3);
        let ages: Vec<f32> = trail.iter().map(|p| p.x).collect();
        assert_eq!(ages, vec![4.0, 3.0, 2.0]);
        assert_eq!(trail.get(3), None);
    }

    #[test]
    fn zero_capacity_keeps_one() {
        let mut trail = Trail::new(0);
        trail.push_front(Vec3::X);
        trail.push_front(Vec3::Y);

        assert_eq!(trail.capacity(), 1);
        assert_eq!(trail.get(0), Some(Vec3::Y));
    }

    #[test]
    fn dirty_until_marked_clean() {
        let mut trail = Trail::new(4);
        assert!(!trail.is_dirty());

        trail.push_front(Vec3::X);
        assert!(trail.is_dirty());

        trail.mark_clean();
        assert!(!trail.is_dirty());
    }

    #[test]
    fn clear_empties_and_zeroes() {
        let mut trail = Trail::new(2);
        trail.push_front(Vec3::ONE);
        trail.clear();

        assert!(trail.is_empty());
        assert!(trail.flat().iter().all(|v| *v == 0.0));
    }
}
