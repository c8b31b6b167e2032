/// Pipeline constants, consumed as inputs rather than computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Highest level generated per route; level L holds exactly L games.
    pub max_level: u8,
    /// How many consecutive words feed one route.
    pub words_per_route: usize,
    /// How far a word list can be advanced route by route.
    pub max_routes_allowed: u32,
    /// Iteration budget for re-fetching missing word fields.
    pub retry_count: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_level: 8,
            words_per_route: 6,
            max_routes_allowed: 5,
            retry_count: 3,
        }
    }
}

impl PipelineConfig {
    /// Total game variants needed to fill levels 1..=max_level.
    pub fn required_variants(&self) -> usize {
        (1..=self.max_level as usize).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_levels_need_thirty_six_variants() {
        assert_eq!(PipelineConfig::default().required_variants(), 36);
    }
}
