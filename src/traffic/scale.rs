use crate::shared::TimeFilter;

/// Square root scale from a station's total traffic to a circle radius.
///
/// The domain is `[0, max total]`, with an upper bound of at least 1 so an
/// empty result never collapses the scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl RadiusScale {
    pub const UNFILTERED_RANGE: (f64, f64) = (0.0, 7.0);
    /// Smaller windows carry smaller counts, the wider range keeps them apart.
    pub const FILTERED_RANGE: (f64, f64) = (2.0, 12.0);

    pub fn new(filter: TimeFilter, max_total: u32) -> Self {
        let range = if filter.is_active() {
            Self::FILTERED_RANGE
        } else {
            Self::UNFILTERED_RANGE
        };
        Self {
            domain: (0.0, f64::from(max_total.max(1))),
            range,
        }
    }

    pub fn radius(&self, total: u32) -> f64 {
        let (d0, d1) = (self.domain.0.sqrt(), self.domain.1.sqrt());
        let (r0, r1) = self.range;
        let t = (f64::from(total).sqrt() - d0) / (d1 - d0);
        r0 + t * (r1 - r0)
    }
}

#[test]
fn empty_domain_defaults_to_one() {
    let scale = RadiusScale::new(TimeFilter::Any, 0);
    assert_eq!(scale.domain, (0.0, 1.0));
    assert_eq!(scale.radius(0), 0.0);
}

#[test]
fn radius_unfiltered() {
    let scale = RadiusScale::new(TimeFilter::Any, 100);
    assert_eq!(scale.radius(0), 0.0);
    assert_eq!(scale.radius(25), 3.5);
    assert_eq!(scale.radius(100), 7.0);
}

#[test]
fn radius_filtered() {
    let filter = TimeFilter::try_from(480).unwrap();
    let scale = RadiusScale::new(filter, 4);
    assert_eq!(scale.range, RadiusScale::FILTERED_RANGE);
    assert_eq!(scale.radius(0), 2.0);
    assert_eq!(scale.radius(1), 7.0);
    assert_eq!(scale.radius(4), 12.0);
}
