use crate::traffic::Traffic;

/// Square root scale from trip totals onto marker radii, so marker area
/// grows linearly with traffic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusScale {
    pub max_total: usize,
    pub max_radius: f64,
}

impl RadiusScale {
    pub fn fit(traffic: &Traffic, max_radius: f64) -> Self {
        Self {
            max_total: traffic
                .values()
                .map(|station| station.total)
                .max()
                .unwrap_or_default(),
            max_radius,
        }
    }

    pub fn radius(&self, total: usize) -> f64 {
        if self.max_total == 0 {
            return 0.0;
        }

        (total as f64 / self.max_total as f64).sqrt() * self.max_radius
    }
}
