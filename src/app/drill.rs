//! Drill-down navigation state machine.
//!
//! Navigation moves one level at a time:
//!
//! ```text
//! Global ──drill_down(country)──▶ Country ──drill_down(state)──▶ City
//!    ▲                               │  ▲                          │
//!    └──────────go_back──────────────┘  └─────────go_back──────────┘
//! ```
//!
//! `City` is terminal. Selections live inside the variants, so a selected state can never
//! exist without its country. Every transition is total: an invalid request is a no-op.

/// Discrete navigation level, ordered from widest to narrowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DrillLevel {
    Global,
    Country,
    City,
}

/// Label shown for the worldwide level.
pub const GLOBAL_BREADCRUMB: &str = "Global Rankings";

/// Current drill-down position and the selections that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum DrillState {
    /// Worldwide ranking.
    #[default]
    Global,

    /// Ranking within one country.
    Country {
        /// Entity name selected at the global level.
        country: String,
    },

    /// Ranking within one region of a country. No further drill-down is offered.
    City {
        /// Entity name selected at the global level.
        country: String,
        /// Entity name selected at the country level.
        state: String,
    },
}

impl DrillState {
    #[must_use]
    pub const fn level(&self) -> DrillLevel {
        match self {
            Self::Global => DrillLevel::Global,
            Self::Country { .. } => DrillLevel::Country,
            Self::City { .. } => DrillLevel::City,
        }
    }

    /// Country filter, present at `Country` and `City`.
    #[must_use]
    pub fn selected_country(&self) -> Option<&str> {
        match self {
            Self::Global => None,
            Self::Country { country } | Self::City { country, .. } => Some(country),
        }
    }

    /// Region filter, present only at `City`.
    #[must_use]
    pub fn selected_state(&self) -> Option<&str> {
        match self {
            Self::City { state, .. } => Some(state),
            _ => None,
        }
    }

    /// Narrows the position by one level using `entity_name` as the new filter.
    ///
    /// Returns `true` if the state changed. Blank names and drilling from `City` are
    /// no-ops.
    pub fn drill_down(&mut self, entity_name: &str) -> bool {
        if entity_name.trim().is_empty() {
            tracing::debug!(level = ?self.level(), "ignoring drill-down on unnamed entity");
            return false;
        }

        let next = match self {
            Self::Global => Self::Country {
                country: entity_name.to_string(),
            },
            Self::Country { country } => Self::City {
                country: std::mem::take(country),
                state: entity_name.to_string(),
            },
            Self::City { .. } => {
                tracing::debug!("drill-down requested at leaf level, ignoring");
                return false;
            }
        };

        tracing::debug!(from = ?self.level(), to = ?next.level(), entity = %entity_name, "drilled down");
        *self = next;
        true
    }

    /// Widens the position by one level. Returns `true` if the state changed.
    pub fn go_back(&mut self) -> bool {
        let previous = match self {
            Self::Global => return false,
            Self::Country { .. } => Self::Global,
            Self::City { country, .. } => Self::Country {
                country: std::mem::take(country),
            },
        };

        tracing::debug!(from = ?self.level(), to = ?previous.level(), "went back");
        *self = previous;
        true
    }

    /// Returns to `Global`, clearing both selections.
    pub fn reset(&mut self) {
        *self = Self::Global;
    }

    /// Breadcrumb for the current position.
    #[must_use]
    pub fn breadcrumb_label(&self) -> &str {
        match self {
            Self::Global => GLOBAL_BREADCRUMB,
            Self::Country { country } => country,
            Self::City { state, .. } => state,
        }
    }

    /// Whether rows at this level may be activated to drill further.
    #[must_use]
    pub const fn drill_down_offered(&self) -> bool {
        !matches!(self, Self::City { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy)]
    enum Op {
        Drill,
        Back,
        Reset,
    }

    #[test]
    fn global_to_country_uses_entity_name() {
        let mut state = DrillState::default();
        assert!(state.drill_down("Japan"));
        assert_eq!(
            state,
            DrillState::Country {
                country: "Japan".into()
            }
        );
        assert_eq!(state.breadcrumb_label(), "Japan");
    }

    #[test]
    fn country_to_city_keeps_country() {
        let mut state = DrillState::default();
        state.drill_down("Japan");
        assert!(state.drill_down("Hokkaido"));

        assert_eq!(state.level(), DrillLevel::City);
        assert_eq!(state.selected_country(), Some("Japan"));
        assert_eq!(state.selected_state(), Some("Hokkaido"));
        assert_eq!(state.breadcrumb_label(), "Hokkaido");
        assert!(!state.drill_down_offered());
    }

    #[test]
    fn drill_down_at_city_is_idempotent() {
        let mut state = DrillState::City {
            country: "Japan".into(),
            state: "Hokkaido".into(),
        };
        let before = state.clone();
        assert!(!state.drill_down("Sapporo"));
        assert_eq!(state, before);
    }

    #[test]
    fn go_back_at_global_is_idempotent() {
        let mut state = DrillState::Global;
        assert!(!state.go_back());
        assert_eq!(state, DrillState::Global);
        assert_eq!(state.breadcrumb_label(), GLOBAL_BREADCRUMB);
    }

    #[test]
    fn go_back_clears_one_selection_at_a_time() {
        let mut state = DrillState::City {
            country: "Japan".into(),
            state: "Hokkaido".into(),
        };
        assert!(state.go_back());
        assert_eq!(state.selected_country(), Some("Japan"));
        assert_eq!(state.selected_state(), None);
        assert!(state.go_back());
        assert_eq!(state, DrillState::Global);
    }

    #[test]
    fn blank_names_do_not_drill() {
        let mut state = DrillState::Global;
        assert!(!state.drill_down("   "));
        assert_eq!(state, DrillState::Global);
    }

    #[test]
    fn reset_returns_to_global_from_anywhere() {
        let mut state = DrillState::City {
            country: "Japan".into(),
            state: "Hokkaido".into(),
        };
        state.reset();
        assert_eq!(state, DrillState::Global);
    }

    #[test]
    fn invariants_hold_for_every_short_op_sequence() {
        const OPS: [Op; 3] = [Op::Drill, Op::Back, Op::Reset];
        const DEPTH: u32 = 6;

        for seed in 0..3usize.pow(DEPTH) {
            let mut state = DrillState::Global;
            let mut code = seed;
            for step in 0..DEPTH {
                let op = OPS[code % 3];
                code /= 3;
                let before = state.level();

                match op {
                    Op::Drill => {
                        state.drill_down(&format!("entity-{step}"));
                        assert!(state.level() as u8 <= before as u8 + 1);
                    }
                    Op::Back => {
                        state.go_back();
                        let expected = match before {
                            DrillLevel::Global | DrillLevel::Country => DrillLevel::Global,
                            DrillLevel::City => DrillLevel::Country,
                        };
                        assert_eq!(state.level(), expected);
                    }
                    Op::Reset => {
                        state.reset();
                        assert_eq!(state.level(), DrillLevel::Global);
                    }
                }

                if state.selected_state().is_some() {
                    assert!(state.selected_country().is_some(), "{state:?}");
                }
                assert_eq!(
                    state.selected_country().is_some(),
                    state.level() != DrillLevel::Global
                );
            }
        }
    }
}
