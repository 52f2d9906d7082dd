/// How arc costs aggregate into a path cost.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DijkstraMode {
    /// Path cost is the total of its arc costs. Costs must be non-negative.
    #[default]
    Sum,
    /// Path cost is the largest arc cost on the path (bottleneck).
    /// `+inf` marks an impassable arc.
    Maximum,
}

impl DijkstraMode {
    /// Cost of the empty path.
    #[inline]
    pub const fn identity(self) -> f64 {
        match self {
            Self::Sum => 0.0,
            Self::Maximum => f64::NEG_INFINITY,
        }
    }

    /// Extend a path of cost `acc` by an arc of cost `arc`.
    #[inline]
    pub fn combine(self, acc: f64, arc: f64) -> f64 {
        match self {
            Self::Sum => acc + arc,
            Self::Maximum => acc.max(arc),
        }
    }

    /// Whether `cost` is a legal arc cost in this mode.
    #[inline]
    pub fn accepts(self, cost: f64) -> bool {
        match self {
            Self::Sum => cost >= 0.0,
            Self::Maximum => !cost.is_nan(),
        }
    }
}
