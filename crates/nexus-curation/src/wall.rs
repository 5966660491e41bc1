//! Lifecycle wall
//!
//! Items are ordered FROZEN, FORMING, LOOSE, KILLED and by confidence within
//! a state. KILLED items go to a separate cemetery that starts collapsed.

use nexus_model::{Brick, ConceptNode, Lifecycle};

/// Message for an empty lane
pub const EMPTY_LANE: &str = "No Bricks Found";

/// Anything that can sit on the wall
pub trait WallItem {
    /// Lane the item sits in
    fn lifecycle(&self) -> Lifecycle;
    /// Sort key within a lane, highest first
    fn confidence(&self) -> f64;
}

impl WallItem for Brick {
    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    fn confidence(&self) -> f64 {
        self.confidence
    }
}

impl WallItem for ConceptNode {
    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    fn confidence(&self) -> f64 {
        self.confidence
    }
}

impl<T: WallItem + ?Sized> WallItem for &T {
    fn lifecycle(&self) -> Lifecycle {
        (**self).lifecycle()
    }

    fn confidence(&self) -> f64 {
        (**self).confidence()
    }
}

/// Ordered wall contents
#[derive(Debug, Clone, PartialEq)]
pub struct WallOrder<T> {
    /// FROZEN, FORMING, LOOSE
    pub primary: Vec<T>,
    /// KILLED
    pub cemetery: Vec<T>,
}

impl<T> Default for WallOrder<T> {
    fn default() -> Self {
        Self {
            primary: Vec::new(),
            cemetery: Vec::new(),
        }
    }
}

/// Orders wall items
///
/// The sort is stable, so items with equal state and confidence keep their
/// input order.
#[must_use]
pub fn order<T: WallItem>(items: impl IntoIterator<Item = T>) -> WallOrder<T> {
    let mut all: Vec<T> = items.into_iter().collect();
    all.sort_by(|a, b| {
        a.lifecycle()
            .wall_rank()
            .cmp(&b.lifecycle().wall_rank())
            .then_with(|| b.confidence().total_cmp(&a.confidence()))
    });

    let (cemetery, primary) = all
        .into_iter()
        .partition(|item| item.lifecycle() == Lifecycle::Killed);
    WallOrder { primary, cemetery }
}

/// Wall view with lane selection and cemetery toggle
#[derive(Debug, Clone, PartialEq)]
pub struct Wall<T> {
    order: WallOrder<T>,
    active_lane: Option<Lifecycle>,
    cemetery_open: bool,
}

impl<T: WallItem> Wall<T> {
    /// Wall over `items`, showing every lane with the cemetery collapsed
    #[must_use]
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            order: order(items),
            active_lane: None,
            cemetery_open: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn order(&self) -> &WallOrder<T> {
        &self.order
    }

    /// Items of one state, in wall order
    #[must_use]
    pub fn lane(&self, state: Lifecycle) -> Vec<&T> {
        let source = if state == Lifecycle::Killed {
            &self.order.cemetery
        } else {
            &self.order.primary
        };
        source.iter().filter(|i| i.lifecycle() == state).collect()
    }

    /// `(state, count)` for every lane, in wall order
    #[must_use]
    pub fn lane_counts(&self) -> Vec<(Lifecycle, usize)> {
        Lifecycle::ALL
            .iter()
            .map(|&s| (s, self.lane(s).len()))
            .collect()
    }

    /// Restricts the primary listing to one lane, or clears the filter
    #[must_use]
    pub fn with_lane(mut self, lane: Option<Lifecycle>) -> Self {
        self.active_lane = lane;
        self
    }

    #[inline]
    #[must_use]
    pub fn active_lane(&self) -> Option<Lifecycle> {
        self.active_lane
    }

    /// Items currently listed above the cemetery
    ///
    /// The killed lane is the cemetery itself and stays empty while it is
    /// collapsed.
    #[must_use]
    pub fn visible(&self) -> Vec<&T> {
        match self.active_lane {
            Some(Lifecycle::Killed) => self.cemetery().iter().collect(),
            Some(state) => self.lane(state),
            None => self.order.primary.iter().collect(),
        }
    }

    /// [`EMPTY_LANE`] when nothing is listed
    #[must_use]
    pub fn empty_message(&self) -> Option<&'static str> {
        self.visible().is_empty().then_some(EMPTY_LANE)
    }

    #[must_use]
    pub fn toggle_cemetery(mut self) -> Self {
        self.cemetery_open = !self.cemetery_open;
        self
    }

    #[inline]
    #[must_use]
    pub fn cemetery_open(&self) -> bool {
        self.cemetery_open
    }

    /// Cemetery contents while open
    #[must_use]
    pub fn cemetery(&self) -> &[T] {
        if self.cemetery_open {
            &self.order.cemetery
        } else {
            &[]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn brick(id: &str, lifecycle: Lifecycle, confidence: f64) -> Brick {
        Brick::new(id, confidence).with_lifecycle(lifecycle)
    }

    #[test]
    fn states_then_confidence() {
        let wall = order(vec![
            brick("loose", Lifecycle::Loose, 0.99),
            brick("frozen-low", Lifecycle::Frozen, 0.1),
            brick("dead", Lifecycle::Killed, 1.0),
            brick("forming", Lifecycle::Forming, 0.5),
            brick("frozen-high", Lifecycle::Frozen, 0.8),
        ]);
        let primary: Vec<_> = wall.primary.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(primary, vec!["frozen-high", "frozen-low", "forming", "loose"]);
        assert_eq!(wall.cemetery.len(), 1);
    }

    #[test]
    fn ties_keep_input_order() {
        let wall = order(vec![
            brick("a", Lifecycle::Loose, 0.5),
            brick("b", Lifecycle::Loose, 0.5),
            brick("c", Lifecycle::Loose, 0.5),
        ]);
        let primary: Vec<_> = wall.primary.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(primary, vec!["a", "b", "c"]);
    }

    #[test]
    fn cemetery_starts_collapsed() {
        let wall = Wall::new(vec![brick("dead", Lifecycle::Killed, 0.3)]);
        assert!(wall.cemetery().is_empty());
        assert_eq!(wall.empty_message(), Some(EMPTY_LANE));

        let open = wall.toggle_cemetery();
        assert_eq!(open.cemetery().len(), 1);
    }

    #[test]
    fn killed_lane_follows_the_cemetery() {
        let wall = Wall::new(vec![
            brick("dead", Lifecycle::Killed, 0.3),
            brick("live", Lifecycle::Loose, 0.9),
        ])
        .with_lane(Some(Lifecycle::Killed));
        assert!(wall.visible().is_empty());
        assert_eq!(wall.empty_message(), Some(EMPTY_LANE));
        assert_eq!(wall.lane_counts()[3], (Lifecycle::Killed, 1));

        let open = wall.toggle_cemetery();
        let listed: Vec<_> = open.visible().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(listed, vec!["dead"]);
    }

    #[test]
    fn lanes_filter_and_count() {
        let wall = Wall::new(vec![
            brick("f1", Lifecycle::Frozen, 0.2),
            brick("l1", Lifecycle::Loose, 0.2),
            brick("l2", Lifecycle::Loose, 0.9),
        ]);
        assert_eq!(
            wall.lane_counts(),
            vec![
                (Lifecycle::Frozen, 1),
                (Lifecycle::Forming, 0),
                (Lifecycle::Loose, 2),
                (Lifecycle::Killed, 0),
            ]
        );

        let loose = wall.clone().with_lane(Some(Lifecycle::Loose));
        let listed: Vec<_> = loose.visible().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(listed, vec!["l2", "l1"]);

        let forming = wall.with_lane(Some(Lifecycle::Forming));
        assert_eq!(forming.empty_message(), Some(EMPTY_LANE));
    }

    #[test]
    fn nodes_sit_on_the_wall_too() {
        let nodes = vec![
            ConceptNode::new("c1", "a").with_lifecycle(Lifecycle::Loose),
            ConceptNode::new("c2", "b").with_lifecycle(Lifecycle::Frozen),
        ];
        let wall = order(nodes.iter());
        assert_eq!(wall.primary[0].id, "c2");
    }

    fn any_state() -> impl Strategy<Value = Lifecycle> {
        prop_oneof![
            Just(Lifecycle::Loose),
            Just(Lifecycle::Forming),
            Just(Lifecycle::Frozen),
            Just(Lifecycle::Killed),
        ]
    }

    proptest! {
        #[test]
        fn prop_wall_order_is_total(
            items in proptest::collection::vec((any_state(), 0.0f64..1.0), 0..30)
        ) {
            let bricks: Vec<Brick> = items
                .iter()
                .enumerate()
                .map(|(i, (s, c))| brick(&i.to_string(), *s, *c))
                .collect();
            let wall = order(bricks.clone());

            prop_assert_eq!(wall.primary.len() + wall.cemetery.len(), bricks.len());
            prop_assert!(wall.cemetery.iter().all(|b| b.lifecycle == Lifecycle::Killed));
            for pair in wall.primary.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                prop_assert!(a.lifecycle.wall_rank() <= b.lifecycle.wall_rank());
                if a.lifecycle == b.lifecycle {
                    prop_assert!(a.confidence >= b.confidence);
                }
            }
        }
    }
}
