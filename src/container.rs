/// Rectangular reflective domain [0, Lx] x [0, Ly] x [0, Lz].
///
/// Walls are elastic: a coordinate past a wall is mirrored back inside and
/// the outward velocity component has its sign forced inward. The reflection
/// assumes displacements that do not overshoot the domain by more than one
/// box width.
#[derive(Clone, Debug)]
pub struct Container {
    extents: [f64; 3],
}
impl Container {
    /// Create a container from its three edge lengths.
    pub fn new(lx: f64, ly: f64, lz: f64) -> Self {
        assert!(
            lx > 0.0 && ly > 0.0 && lz > 0.0,
            "Box extents should be positive, found ({}, {}, {})",
            lx,
            ly,
            lz,
        );
        Self {
            extents: [lx, ly, lz],
        }
    }

    pub fn extents(&self) -> [f64; 3] {
        self.extents
    }
    pub fn lx(&self) -> f64 {
        self.extents[0]
    }
    pub fn ly(&self) -> f64 {
        self.extents[1]
    }
    pub fn lz(&self) -> f64 {
        self.extents[2]
    }

    /// Reflect one coordinate off the walls at 0 and `l`, forcing the
    /// velocity component back toward the interior.
    pub fn reflect_axis(pos: &mut f64, vel: &mut f64, l: f64) {
        if *pos < 0.0 {
            *pos = -*pos;
            *vel = vel.abs();
        }
        if *pos > l {
            *pos = 2.0 * l - *pos;
            *vel = -vel.abs();
        }
    }

    /// Apply the reflective boundary independently on every axis.
    pub fn reflect(&self, position: &mut [f64; 3], velocity: &mut [f64; 3]) {
        for m in 0..3 {
            Self::reflect_axis(&mut position[m], &mut velocity[m], self.extents[m]);
        }
    }
}
