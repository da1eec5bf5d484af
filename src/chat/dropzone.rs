/// Nested drag enter/leave counter for a full-window drop target.
#[derive(Debug, Default, Clone)]
pub struct DropZone {
    depth: u32,
}

impl DropZone {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drag_enter(&mut self) {
        self.depth = self.depth.saturating_add(1);
    }

    pub fn drag_leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn drop_files<T>(&mut self, files: impl IntoIterator<Item = T>) -> Option<T> {
        self.depth = 0;
        files.into_iter().next()
    }

    pub fn overlay_visible(&self) -> bool {
        self.depth > 0
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use proptest::test_runner::Config;

    #[test]
    fn overlay_follows_depth() {
        let mut zone = DropZone::new();
        assert!(!zone.overlay_visible());

        zone.drag_enter();
        zone.drag_enter();
        zone.drag_leave();
        assert!(zone.overlay_visible());

        zone.drag_leave();
        assert!(!zone.overlay_visible());
    }

    #[test]
    fn leave_never_goes_negative() {
        let mut zone = DropZone::new();
        zone.drag_leave();
        zone.drag_leave();
        assert_eq!(zone.depth(), 0);

        zone.drag_enter();
        assert!(zone.overlay_visible());
    }

    #[test]
    fn drop_resets_unbalanced_depth() {
        let mut zone = DropZone::new();
        for _ in 0..3 {
            zone.drag_enter();
        }
        zone.drag_leave();

        let first = zone.drop_files(vec!["a.csv", "b.pdf"]);
        assert_eq!(first, Some("a.csv"));
        assert_eq!(zone.depth(), 0);
        assert!(!zone.overlay_visible());
    }

    #[test]
    fn empty_drop_yields_nothing() {
        let mut zone = DropZone::new();
        zone.drag_enter();
        assert_eq!(zone.drop_files(Vec::<String>::new()), None);
        assert!(!zone.overlay_visible());
    }

    proptest! {
        #![proptest_config(Config::with_cases(256))]
        #[test]
        fn any_event_sequence_keeps_overlay_in_step(events in prop::collection::vec(0u8..3, 0..500)) {
            let mut zone = DropZone::new();
            let mut expected: u32 = 0;
            for event in events {
                match event {
                    0 => {
                        zone.drag_enter();
                        expected += 1;
                    }
                    1 => {
                        zone.drag_leave();
                        expected = expected.saturating_sub(1);
                    }
                    _ => {
                        zone.drop_files(["x"]);
                        expected = 0;
                        prop_assert_eq!(zone.depth(), 0);
                    }
                }
                prop_assert_eq!(zone.overlay_visible(), expected > 0);
                prop_assert_eq!(zone.depth(), expected);
            }
        }
    }
}
