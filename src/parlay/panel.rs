/// Visibility of the selection-summary panel. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlipPanel {
    open: bool,
}

impl SlipPanel {
    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_transitions() {
        let mut panel = SlipPanel::default();
        assert!(!panel.is_open());

        panel.toggle();
        assert!(panel.is_open());
        panel.open();
        assert!(panel.is_open());
        panel.toggle();
        assert!(!panel.is_open());
        panel.open();
        panel.close();
        assert!(!panel.is_open());
    }
}
