// Geometry and discrete directions

use glam::IVec2;

/// Clamp a value between min and max
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Euclidean distance between two pixel coordinates
pub fn distance(a: IVec2, b: IVec2) -> f64 {
    let d = (a - b).as_dvec2();
    d.length()
}

/// Integer axis-aligned box in map pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A 1x1 box on a single pixel
    pub const fn point(x: i32, y: i32) -> Self {
        Self::new(x, y, 1, 1)
    }

    pub fn xy(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    pub fn set_xy(&mut self, xy: IVec2) {
        self.x = xy.x;
        self.y = xy.y;
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn center(&self) -> IVec2 {
        IVec2::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Copy of this box moved by `delta`
    pub fn translated(&self, delta: IVec2) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }

    pub fn contains_point(&self, p: IVec2) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Whether `other` lies entirely inside this box
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// One of the 4 main directions: 0 right, 1 up, 2 left, 3 down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Direction4(u8);

impl Direction4 {
    pub const RIGHT: Self = Self(0);
    pub const UP: Self = Self(1);
    pub const LEFT: Self = Self(2);
    pub const DOWN: Self = Self(3);

    /// Panics when `value` is outside `0..4`: directions are produced
    /// internally and an invalid one is a programming error.
    pub fn new(value: i32) -> Self {
        match Self::try_new(value) {
            Some(direction) => direction,
            None => panic!("Invalid 4-direction: {value}"),
        }
    }

    pub fn try_new(value: i32) -> Option<Self> {
        (0..4).contains(&value).then_some(Self(value as u8))
    }

    pub fn index(self) -> i32 {
        self.0 as i32
    }

    pub fn to_direction8(self) -> Direction8 {
        Direction8(self.0 * 2)
    }

    pub fn opposite(self) -> Self {
        Self((self.0 + 2) % 4)
    }

    pub fn to_xy_move(self) -> IVec2 {
        self.to_direction8().to_xy_move()
    }
}

/// One of the 8 directions, counter-clockwise from 0 (right)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Direction8(u8);

impl Direction8 {
    /// Panics when `value` is outside `0..8`.
    pub fn new(value: i32) -> Self {
        match Self::try_new(value) {
            Some(direction) => direction,
            None => panic!("Invalid 8-direction: {value}"),
        }
    }

    pub fn try_new(value: i32) -> Option<Self> {
        (0..8).contains(&value).then_some(Self(value as u8))
    }

    pub fn index(self) -> i32 {
        self.0 as i32
    }

    pub fn is_diagonal(self) -> bool {
        self.0 % 2 == 1
    }

    pub fn opposite(self) -> Self {
        Self((self.0 + 4) % 8)
    }

    /// Rotate by `steps` eighths of a turn (positive is counter-clockwise)
    pub fn rotated(self, steps: i32) -> Self {
        Self((self.0 as i32 + steps).rem_euclid(8) as u8)
    }

    /// Unit pixel move for this direction
    pub fn to_xy_move(self) -> IVec2 {
        match self.0 {
            0 => IVec2::new(1, 0),
            1 => IVec2::new(1, -1),
            2 => IVec2::new(0, -1),
            3 => IVec2::new(-1, -1),
            4 => IVec2::new(-1, 0),
            5 => IVec2::new(-1, 1),
            6 => IVec2::new(0, 1),
            _ => IVec2::new(1, 1),
        }
    }

    /// The direction of a unit move, if `delta` is one
    pub fn from_xy_move(delta: IVec2) -> Option<Self> {
        let unit = delta.signum();
        (0..8).map(Self::new).find(|d| d.to_xy_move() == unit && unit != IVec2::ZERO)
    }

    /// Closest direction when heading from `from` to `to`
    pub fn towards(from: IVec2, to: IVec2) -> Option<Self> {
        let d = (to - from).as_dvec2();
        if d == glam::DVec2::ZERO {
            return None;
        }
        // y grows downward on the map
        let angle = (-d.y).atan2(d.x);
        let eighth = std::f64::consts::FRAC_PI_4;
        let index = (angle / eighth).round() as i32;
        Some(Self::new(index.rem_euclid(8)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5, 0, 10), 5);
        assert_eq!(clamp(-5, 0, 10), 0);
        assert_eq!(clamp(15, 0, 10), 10);
    }

    #[test]
    fn test_distance() {
        assert_eq!(distance(IVec2::new(0, 0), IVec2::new(3, 4)), 5.0);
        assert_eq!(distance(IVec2::new(100, 100), IVec2::new(100, 90)), 10.0);
    }

    #[test]
    fn test_rect_overlaps() {
        let a = Rect::new(0, 0, 16, 16);
        assert!(a.overlaps(&Rect::new(15, 15, 4, 4)));
        assert!(!a.overlaps(&Rect::new(16, 0, 4, 4)));
        assert!(a.contains_point(IVec2::new(15, 15)));
        assert!(!a.contains_point(IVec2::new(16, 15)));
        assert!(a.contains_rect(&Rect::new(2, 2, 4, 4)));
        assert!(!a.contains_rect(&Rect::new(14, 2, 4, 4)));
    }

    #[test]
    fn test_direction8_moves() {
        assert_eq!(Direction8::new(0).to_xy_move(), IVec2::new(1, 0));
        assert_eq!(Direction8::new(2).to_xy_move(), IVec2::new(0, -1));
        assert_eq!(Direction8::new(5).to_xy_move(), IVec2::new(-1, 1));
        assert_eq!(Direction8::new(1).opposite(), Direction8::new(5));
        assert_eq!(Direction8::new(0).rotated(-1), Direction8::new(7));
    }

    #[test]
    fn test_direction8_roundtrip_from_move() {
        for i in 0..8 {
            let d = Direction8::new(i);
            assert_eq!(Direction8::from_xy_move(d.to_xy_move()), Some(d));
        }
        assert_eq!(Direction8::from_xy_move(IVec2::ZERO), None);
    }

    #[test]
    fn test_direction8_towards() {
        let origin = IVec2::new(10, 10);
        assert_eq!(Direction8::towards(origin, IVec2::new(20, 10)), Some(Direction8::new(0)));
        assert_eq!(Direction8::towards(origin, IVec2::new(10, 0)), Some(Direction8::new(2)));
        assert_eq!(Direction8::towards(origin, IVec2::new(0, 20)), Some(Direction8::new(5)));
        assert_eq!(Direction8::towards(origin, origin), None);
    }

    #[test]
    fn test_direction4_conversion() {
        assert_eq!(Direction4::UP.to_direction8(), Direction8::new(2));
        assert_eq!(Direction4::LEFT.opposite(), Direction4::RIGHT);
    }

    #[test]
    #[should_panic(expected = "Invalid 8-direction")]
    fn test_invalid_direction8_panics() {
        let _ = Direction8::new(8);
    }

    #[test]
    #[should_panic(expected = "Invalid 4-direction")]
    fn test_invalid_direction4_panics() {
        let _ = Direction4::new(-1);
    }
}
